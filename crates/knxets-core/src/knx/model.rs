use serde::{Deserialize, Serialize};

use crate::knx::ids::*;

/// Header record of a project (`P-xxxx/Project.xml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: ProjectId,
    pub name: String,
}

/// A project and the installations decoded from its installation files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub installations: Vec<Installation>,
}

/// One deployment inside a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub name: String,
    /// Areas in document order
    pub topology: Vec<Area>,
    /// Top-level group ranges in document order
    pub group_addresses: Vec<GroupRange>,
}

/// Topology root (first tier of the individual address)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub address: u64,
    pub lines: Vec<Line>,
}

/// Second tier of the topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub address: u64,
    pub devices: Vec<DeviceInstance>,
}

/// A device placed on a line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInstance {
    pub id: DeviceInstanceId,
    pub name: String,
    pub address: u64,
    pub com_objects: Vec<ComObjectInstanceRef>,
}

/// Instance of a manufacturer communication object reference on a device.
///
/// `ref_id` points at a [`ComObjectRef`] of the device's application program;
/// it is not resolved here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComObjectInstanceRef {
    pub ref_id: ComObjectRefId,
    pub datapoint_type: String,
    pub connectors: Vec<Connector>,
}

/// Link between a communication object instance and a group address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    /// `true` for a `Receive` connector, `false` for `Send`
    pub receive: bool,
    pub ref_id: GroupAddressId,
}

/// Range of group addresses; ranges nest to any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRange {
    pub id: GroupRangeId,
    pub name: String,
    pub range_start: u64,
    pub range_end: u64,
    pub addresses: Vec<GroupAddress>,
    pub sub_ranges: Vec<GroupRange>,
}

impl GroupRange {
    /// Visits every group address of this range and its sub ranges, depth first.
    pub fn all_addresses(&self) -> Vec<&GroupAddress> {
        let mut found: Vec<&GroupAddress> = self.addresses.iter().collect();
        for sub in &self.sub_ranges {
            found.extend(sub.all_addresses());
        }
        found
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAddress {
    pub id: GroupAddressId,
    pub name: String,
    /// Raw 16-bit group address value
    pub address: u64,
}

/// Content of a manufacturer file (`M-xxxx/M-xxxx_....xml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerData {
    pub manufacturer: ManufacturerId,
    pub programs: Vec<ApplicationProgram>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProgram {
    pub id: ApplicationProgramId,
    pub name: String,
    pub version: u64,
    pub objects: Vec<ComObject>,
    pub object_refs: Vec<ComObjectRef>,
}

impl ApplicationProgram {
    pub fn object(&self, id: &ComObjectId) -> Option<&ComObject> {
        self.objects.iter().find(|object| &object.id == id)
    }
}

/// Communication object flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    /// Read flag (R) - respond to read requests
    pub read: bool,
    /// Write flag (W) - accept write requests
    pub write: bool,
    /// Communication flag (C) - connection to bus
    pub communication: bool,
    /// Transmit flag (T) - send value on change
    pub transmit: bool,
    /// Update flag (U) - update value from bus
    pub update: bool,
    /// Read On Init flag (I) - read value on bus reset
    pub read_on_init: bool,
}

/// Flags of a [`ComObjectRef`]; `None` means "inherit from the referenced object".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_on_init: Option<bool>,
}

impl RefFlags {
    pub fn resolve(&self, base: &ObjectFlags) -> ObjectFlags {
        ObjectFlags {
            read: self.read.unwrap_or(base.read),
            write: self.write.unwrap_or(base.write),
            communication: self.communication.unwrap_or(base.communication),
            transmit: self.transmit.unwrap_or(base.transmit),
            update: self.update.unwrap_or(base.update),
            read_on_init: self.read_on_init.unwrap_or(base.read_on_init),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == RefFlags::default()
    }
}

/// Communication object of an application program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComObject {
    pub id: ComObjectId,
    pub name: String,
    pub text: String,
    pub description: String,
    pub function_text: String,
    pub object_size: String,
    pub datapoint_type: String,
    pub priority: String,
    pub flags: ObjectFlags,
}

/// Override record for a [`ComObject`]. Every field except the ids is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComObjectRef {
    pub id: ComObjectRefId,
    pub ref_id: ComObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datapoint_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "RefFlags::is_empty")]
    pub flags: RefFlags,
}

impl ComObjectRef {
    /// Applies this reference on top of `base`, keeping the base value of every
    /// field the reference leaves unset. The result carries the base object's id.
    pub fn resolve(&self, base: &ComObject) -> ComObject {
        fn pick(value: &Option<String>, fallback: &str) -> String {
            value.clone().unwrap_or_else(|| fallback.to_string())
        }

        ComObject {
            id: base.id.clone(),
            name: pick(&self.name, &base.name),
            text: pick(&self.text, &base.text),
            description: pick(&self.description, &base.description),
            function_text: pick(&self.function_text, &base.function_text),
            object_size: pick(&self.object_size, &base.object_size),
            datapoint_type: pick(&self.datapoint_type, &base.datapoint_type),
            priority: pick(&self.priority, &base.priority),
            flags: self.flags.resolve(&base.flags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_object() -> ComObject {
        ComObject {
            id: ComObjectId::from("O-1"),
            name: "Switch".to_string(),
            text: "On/Off".to_string(),
            datapoint_type: "DPST-1-1".to_string(),
            object_size: "1 Bit".to_string(),
            flags: ObjectFlags {
                read: false,
                write: true,
                communication: true,
                transmit: false,
                update: false,
                read_on_init: false,
            },
            ..ComObject::default()
        }
    }

    #[test]
    fn ref_flags_inherit_unset_values() {
        let flags = RefFlags {
            read: Some(true),
            write: Some(false),
            ..RefFlags::default()
        };
        let resolved = flags.resolve(&base_object().flags);
        assert!(resolved.read);
        assert!(!resolved.write);
        assert!(resolved.communication);
        assert!(!resolved.transmit);
    }

    #[test]
    fn com_object_ref_overrides_only_present_fields() {
        let reference = ComObjectRef {
            id: ComObjectRefId::from("O-1_R-1"),
            ref_id: ComObjectId::from("O-1"),
            text: Some("Channel A".to_string()),
            datapoint_type: Some(String::new()),
            ..ComObjectRef::default()
        };
        let resolved = reference.resolve(&base_object());
        assert_eq!(resolved.id, "O-1");
        assert_eq!(resolved.name, "Switch");
        assert_eq!(resolved.text, "Channel A");
        // present but empty still overrides
        assert_eq!(resolved.datapoint_type, "");
        assert_eq!(resolved.flags, base_object().flags);
    }

    #[test]
    fn all_addresses_walks_nested_ranges() {
        let range = GroupRange {
            addresses: vec![GroupAddress {
                id: GroupAddressId::from("GA-1"),
                address: 1,
                ..GroupAddress::default()
            }],
            sub_ranges: vec![GroupRange {
                addresses: vec![GroupAddress {
                    id: GroupAddressId::from("GA-2"),
                    address: 2,
                    ..GroupAddress::default()
                }],
                ..GroupRange::default()
            }],
            ..GroupRange::default()
        };
        let ids: Vec<&str> = range.all_addresses().iter().map(|ga| ga.id.as_str()).collect();
        assert_eq!(ids, vec!["GA-1", "GA-2"]);
    }
}
