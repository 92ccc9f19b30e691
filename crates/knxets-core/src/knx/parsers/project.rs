use roxmltree::Node;

use crate::knx::error::Result;
use crate::knx::ids::ProjectId;
use crate::knx::model::{Installation, Project, ProjectInfo};
use crate::knx::parsers::group_addresses::parse_group_range;
use crate::knx::parsers::topology::parse_area;
use crate::knx::xml_tags;
use crate::knx::xml_utils::{attr_string, elements_at_path, find_child_element};

/// Reads `Project/@Id` and `Project/ProjectInformation/@Name` below the document root.
pub(crate) fn parse_project_info(root: &Node<'_, '_>) -> Result<ProjectInfo> {
    let project = find_child_element(root, xml_tags::PROJECT);
    let id = project
        .as_ref()
        .map(|node| attr_string(node, "Id"))
        .unwrap_or_default();
    let name = project
        .as_ref()
        .and_then(|node| find_child_element(node, xml_tags::PROJECT_INFORMATION))
        .map(|node| attr_string(&node, "Name"))
        .unwrap_or_default();

    Ok(ProjectInfo {
        id: ProjectId::from(id),
        name,
    })
}

/// Decodes the `Project` element of an installation file with all its installations.
pub(crate) fn parse_project(root: &Node<'_, '_>) -> Result<Project> {
    let project = match find_child_element(root, xml_tags::PROJECT) {
        Some(node) => node,
        None => return Ok(Project::default()),
    };

    let installations = elements_at_path(&project, &[xml_tags::INSTALLATIONS, xml_tags::INSTALLATION])
        .iter()
        .map(parse_installation)
        .collect::<Result<Vec<_>>>()?;

    Ok(Project {
        id: ProjectId::from(attr_string(&project, "Id")),
        installations,
    })
}

fn parse_installation(node: &Node<'_, '_>) -> Result<Installation> {
    let topology = elements_at_path(node, &[xml_tags::TOPOLOGY, xml_tags::AREA])
        .iter()
        .map(parse_area)
        .collect::<Result<Vec<_>>>()?;
    let group_addresses = elements_at_path(
        node,
        &[xml_tags::GROUP_ADDRESSES, xml_tags::GROUP_RANGES, xml_tags::GROUP_RANGE],
    )
    .iter()
    .map(parse_group_range)
    .collect::<Result<Vec<_>>>()?;

    Ok(Installation {
        name: attr_string(node, "Name"),
        topology,
        group_addresses,
    })
}
