pub mod address;
pub mod archive;
pub mod error;
pub mod ids;
pub mod model;
pub mod schema;

pub(crate) mod parsers;
pub(crate) mod xml_tags;
pub(crate) mod xml_utils;
pub(crate) mod zip_utils;

pub use archive::{Archive, InstallationFile, ManufacturerFile, ProjectFile};
pub use error::{Error, Result};
pub use ids::*;
pub use model::*;
pub use schema::{decode_manufacturer_data, decode_project, decode_project_info};
