//! Extracts structured data from KNX ETS exports.
//!
//! `.knxproj` and `.knxprod` files are ZIP containers of XML documents. An
//! [`Archive`] indexes the project and manufacturer files inside one; each
//! handle decodes its file on demand into the types of [`knx::model`].
//!
//! ```no_run
//! use knxets_core::Archive;
//!
//! fn main() -> knxets_core::Result<()> {
//!     let archive = Archive::open("my-project.knxproj")?;
//!     for project_file in archive.project_files() {
//!         let info = project_file.decode_info()?;
//!         println!("Project {} {}", info.id, info.name);
//!
//!         for installation in project_file.decode()?.installations {
//!             println!("Installation {}", installation.name);
//!         }
//!     }
//!     archive.close()
//! }
//! ```

pub mod knx;

pub use knx::address::{
    format_group_address,
    format_individual_address,
    parse_group_address_style,
    GroupAddressStyle,
};
pub use knx::{
    decode_manufacturer_data,
    decode_project,
    decode_project_info,
    Archive,
    Error,
    InstallationFile,
    ManufacturerFile,
    ProjectFile,
    Result,
};
pub use knx::ids::*;
pub use knx::model::*;
