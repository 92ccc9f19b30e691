use roxmltree::Node;

use crate::knx::error::Result;
use crate::knx::ids::{AreaId, ComObjectRefId, DeviceInstanceId, GroupAddressId, LineId};
use crate::knx::model::{Area, ComObjectInstanceRef, Connector, DeviceInstance, Line};
use crate::knx::xml_tags;
use crate::knx::xml_utils::{attr_string, child_elements, elements_at_path, uint_attribute};

pub(crate) fn parse_area(node: &Node<'_, '_>) -> Result<Area> {
    let lines = child_elements(node, xml_tags::LINE)
        .map(|line| parse_line(&line))
        .collect::<Result<Vec<_>>>()?;

    Ok(Area {
        id: AreaId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        address: uint_attribute(node, "Address")?,
        lines,
    })
}

fn parse_line(node: &Node<'_, '_>) -> Result<Line> {
    let devices = child_elements(node, xml_tags::DEVICE_INSTANCE)
        .map(|device| parse_device_instance(&device))
        .collect::<Result<Vec<_>>>()?;

    Ok(Line {
        id: LineId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        address: uint_attribute(node, "Address")?,
        devices,
    })
}

fn parse_device_instance(node: &Node<'_, '_>) -> Result<DeviceInstance> {
    let com_objects = elements_at_path(
        node,
        &[xml_tags::COM_OBJECT_INSTANCE_REFS, xml_tags::COM_OBJECT_INSTANCE_REF],
    )
    .iter()
    .map(parse_com_object_instance_ref)
    .collect();

    Ok(DeviceInstance {
        id: DeviceInstanceId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        address: uint_attribute(node, "Address")?,
        com_objects,
    })
}

fn parse_com_object_instance_ref(node: &Node<'_, '_>) -> ComObjectInstanceRef {
    let connectors = child_elements(node, xml_tags::CONNECTORS)
        .flat_map(|connectors| connectors.children().filter(|child| child.is_element()))
        .filter_map(|child| parse_connector(&child))
        .collect();

    ComObjectInstanceRef {
        ref_id: ComObjectRefId::from(attr_string(node, "RefId")),
        datapoint_type: attr_string(node, "DatapointType"),
        connectors,
    }
}

/// `Send` and `Receive` children become connectors; any other element is skipped.
fn parse_connector(node: &Node<'_, '_>) -> Option<Connector> {
    let receive = match node.tag_name().name() {
        xml_tags::RECEIVE => true,
        xml_tags::SEND => false,
        _ => return None,
    };
    Some(Connector {
        receive,
        ref_id: GroupAddressId::from(attr_string(node, "GroupAddressRefId")),
    })
}
