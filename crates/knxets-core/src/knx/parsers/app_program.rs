use roxmltree::Node;

use crate::knx::error::Result;
use crate::knx::ids::{ApplicationProgramId, ManufacturerId};
use crate::knx::model::{ApplicationProgram, ManufacturerData};
use crate::knx::parsers::com_objects::{parse_com_object, parse_com_object_ref};
use crate::knx::xml_tags;
use crate::knx::xml_utils::{attr_string, elements_at_path, uint_attribute};

/// Decodes `ManufacturerData/Manufacturer` below the document root. Only the first
/// `Manufacturer` element is considered.
pub(crate) fn parse_manufacturer_data(root: &Node<'_, '_>) -> Result<ManufacturerData> {
    let manufacturer = match elements_at_path(root, &[xml_tags::MANUFACTURER_DATA, xml_tags::MANUFACTURER])
        .into_iter()
        .next()
    {
        Some(node) => node,
        None => return Ok(ManufacturerData::default()),
    };

    let programs = elements_at_path(
        &manufacturer,
        &[xml_tags::APPLICATION_PROGRAMS, xml_tags::APPLICATION_PROGRAM],
    )
    .iter()
    .map(parse_application_program)
    .collect::<Result<Vec<_>>>()?;

    Ok(ManufacturerData {
        manufacturer: ManufacturerId::from(attr_string(&manufacturer, "RefId")),
        programs,
    })
}

fn parse_application_program(node: &Node<'_, '_>) -> Result<ApplicationProgram> {
    let objects = elements_at_path(
        node,
        &[xml_tags::STATIC, xml_tags::COM_OBJECT_TABLE, xml_tags::COM_OBJECT],
    )
    .iter()
    .map(parse_com_object)
    .collect();
    let object_refs = elements_at_path(
        node,
        &[xml_tags::STATIC, xml_tags::COM_OBJECT_REFS, xml_tags::COM_OBJECT_REF],
    )
    .iter()
    .map(parse_com_object_ref)
    .collect();

    Ok(ApplicationProgram {
        id: ApplicationProgramId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        version: uint_attribute(node, "ApplicationVersion")?,
        objects,
        object_refs,
    })
}
