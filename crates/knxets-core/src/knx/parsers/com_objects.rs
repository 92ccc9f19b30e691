use roxmltree::Node;

use crate::knx::ids::{ComObjectId, ComObjectRefId};
use crate::knx::model::{ComObject, ComObjectRef, ObjectFlags, RefFlags};
use crate::knx::xml_utils::{attr_string, flag_attribute, optional_attribute, optional_flag_attribute};

const READ_FLAG: &str = "ReadFlag";
const WRITE_FLAG: &str = "WriteFlag";
const COMMUNICATION_FLAG: &str = "CommunicationFlag";
const TRANSMIT_FLAG: &str = "TransmitFlag";
const UPDATE_FLAG: &str = "UpdateFlag";
const READ_ON_INIT_FLAG: &str = "ReadOnInitFlag";

impl ObjectFlags {
    pub(crate) fn from_node(node: &Node<'_, '_>) -> Self {
        Self {
            read: flag_attribute(node, READ_FLAG),
            write: flag_attribute(node, WRITE_FLAG),
            communication: flag_attribute(node, COMMUNICATION_FLAG),
            transmit: flag_attribute(node, TRANSMIT_FLAG),
            update: flag_attribute(node, UPDATE_FLAG),
            read_on_init: flag_attribute(node, READ_ON_INIT_FLAG),
        }
    }
}

impl RefFlags {
    pub(crate) fn from_node(node: &Node<'_, '_>) -> Self {
        Self {
            read: optional_flag_attribute(node, READ_FLAG),
            write: optional_flag_attribute(node, WRITE_FLAG),
            communication: optional_flag_attribute(node, COMMUNICATION_FLAG),
            transmit: optional_flag_attribute(node, TRANSMIT_FLAG),
            update: optional_flag_attribute(node, UPDATE_FLAG),
            read_on_init: optional_flag_attribute(node, READ_ON_INIT_FLAG),
        }
    }
}

pub(crate) fn parse_com_object(node: &Node<'_, '_>) -> ComObject {
    ComObject {
        id: ComObjectId::from(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        text: attr_string(node, "Text"),
        description: attr_string(node, "Description"),
        function_text: attr_string(node, "FunctionText"),
        object_size: attr_string(node, "ObjectSize"),
        datapoint_type: attr_string(node, "DatapointType"),
        priority: attr_string(node, "Priority"),
        flags: ObjectFlags::from_node(node),
    }
}

/// Absent attributes stay `None` so callers can inherit them from the referenced object.
pub(crate) fn parse_com_object_ref(node: &Node<'_, '_>) -> ComObjectRef {
    ComObjectRef {
        id: ComObjectRefId::from(attr_string(node, "Id")),
        ref_id: ComObjectId::from(attr_string(node, "RefId")),
        name: optional_attribute(node, "Name"),
        text: optional_attribute(node, "Text"),
        description: optional_attribute(node, "Description"),
        function_text: optional_attribute(node, "FunctionText"),
        object_size: optional_attribute(node, "ObjectSize"),
        datapoint_type: optional_attribute(node, "DatapointType"),
        priority: optional_attribute(node, "Priority"),
        flags: RefFlags::from_node(node),
    }
}
