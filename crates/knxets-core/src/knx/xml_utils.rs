use roxmltree::Node;

use crate::knx::error::{Error, Result};

/// Attribute value as written, or an empty string when absent.
pub fn attr_string(node: &Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or("").to_string()
}

/// Attribute value if the attribute is present. An empty value still counts as present.
pub fn optional_attribute(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(|value| value.to_string())
}

/// Parses an unsigned integer attribute. Absent or blank attributes decode to 0.
pub fn uint_attribute(node: &Node<'_, '_>, name: &str) -> Result<u64> {
    let raw = node.attribute(name).unwrap_or("");
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<u64>().map_err(|_| Error::MalformedValue {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
        value: raw.to_string(),
        context: format!("byte {}", node.range().start),
    })
}

/// A flag attribute is set only when its value is exactly `Enabled`.
pub fn is_enabled(value: Option<&str>) -> bool {
    value == Some("Enabled")
}

pub fn flag_attribute(node: &Node<'_, '_>, name: &str) -> bool {
    is_enabled(node.attribute(name))
}

/// Like [`flag_attribute`] but keeps the absence of the attribute.
pub fn optional_flag_attribute(node: &Node<'_, '_>, name: &str) -> Option<bool> {
    node.attribute(name).map(|value| is_enabled(Some(value)))
}

pub fn child_elements<'a, 'input: 'a>(
    node: &Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

pub fn find_child_element<'a, 'input: 'a>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

/// Collects the elements reached by following `path` through direct children,
/// e.g. `["Topology", "Area"]`. Every matching branch contributes, in document order.
pub fn elements_at_path<'a, 'input: 'a>(node: &Node<'a, 'input>, path: &[&'a str]) -> Vec<Node<'a, 'input>> {
    match path.split_first() {
        None => vec![*node],
        Some((tag, rest)) => child_elements(node, *tag)
            .flat_map(|child| elements_at_path(&child, rest))
            .collect(),
    }
}
