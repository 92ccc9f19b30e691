pub(crate) mod app_program;
pub(crate) mod com_objects;
pub(crate) mod group_addresses;
pub(crate) mod project;
pub(crate) mod topology;
