use roxmltree::Node;

use crate::knx::error::Result;
use crate::knx::ids::{GroupAddressId, GroupRangeId};
use crate::knx::model::{GroupAddress, GroupRange};
use crate::knx::xml_tags;
use crate::knx::xml_utils::{attr_string, child_elements, uint_attribute};

/// Decodes a `GroupRange` with its direct group addresses and nested ranges.
/// Nesting depth is not limited.
pub(crate) fn parse_group_range(node: &Node<'_, '_>) -> Result<GroupRange> {
    let addresses = child_elements(node, xml_tags::GROUP_ADDRESS)
        .map(|address| parse_group_address(&address))
        .collect::<Result<Vec<_>>>()?;
    let sub_ranges = child_elements(node, xml_tags::GROUP_RANGE)
        .map(|range| parse_group_range(&range))
        .collect::<Result<Vec<_>>>()?;

    Ok(GroupRange {
        id: GroupRangeId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        range_start: uint_attribute(node, "RangeStart")?,
        range_end: uint_attribute(node, "RangeEnd")?,
        addresses,
        sub_ranges,
    })
}

fn parse_group_address(node: &Node<'_, '_>) -> Result<GroupAddress> {
    Ok(GroupAddress {
        id: GroupAddressId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        address: uint_attribute(node, "Address")?,
    })
}
