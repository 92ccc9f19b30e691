//! Element names of the KNX project schema (11, 12 and 13 share them).

pub const PROJECT: &str = "Project";
pub const PROJECT_INFORMATION: &str = "ProjectInformation";
pub const INSTALLATIONS: &str = "Installations";
pub const INSTALLATION: &str = "Installation";

pub const TOPOLOGY: &str = "Topology";
pub const AREA: &str = "Area";
pub const LINE: &str = "Line";
pub const DEVICE_INSTANCE: &str = "DeviceInstance";
pub const COM_OBJECT_INSTANCE_REFS: &str = "ComObjectInstanceRefs";
pub const COM_OBJECT_INSTANCE_REF: &str = "ComObjectInstanceRef";
pub const CONNECTORS: &str = "Connectors";
pub const SEND: &str = "Send";
pub const RECEIVE: &str = "Receive";

pub const GROUP_ADDRESSES: &str = "GroupAddresses";
pub const GROUP_RANGES: &str = "GroupRanges";
pub const GROUP_RANGE: &str = "GroupRange";
pub const GROUP_ADDRESS: &str = "GroupAddress";

pub const MANUFACTURER_DATA: &str = "ManufacturerData";
pub const MANUFACTURER: &str = "Manufacturer";
pub const APPLICATION_PROGRAMS: &str = "ApplicationPrograms";
pub const APPLICATION_PROGRAM: &str = "ApplicationProgram";
pub const STATIC: &str = "Static";
pub const COM_OBJECT_TABLE: &str = "ComObjectTable";
pub const COM_OBJECT: &str = "ComObject";
pub const COM_OBJECT_REFS: &str = "ComObjectRefs";
pub const COM_OBJECT_REF: &str = "ComObjectRef";
