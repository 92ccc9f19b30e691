//! Routes a document to the decoder of its KNX project schema.
//!
//! The schema is identified by the default namespace declared on the root
//! element (`<KNX xmlns="http://knx.org/xml/project/13">`). Revisions 11, 12
//! and 13 share one decoder; a diverging revision registers its own entry in
//! [`SCHEMAS`].

use std::io::Read;

use roxmltree::{Document, Node};
use zip::result::ZipError;

use crate::knx::error::{Error, Result};
use crate::knx::model::{ManufacturerData, Project, ProjectInfo};
use crate::knx::parsers::app_program::parse_manufacturer_data;
use crate::knx::parsers::project::{parse_project, parse_project_info};
use crate::knx::zip_utils::strip_bom;

pub const SCHEMA_11_NAMESPACE: &str = "http://knx.org/xml/project/11";
pub const SCHEMA_12_NAMESPACE: &str = "http://knx.org/xml/project/12";
pub const SCHEMA_13_NAMESPACE: &str = "http://knx.org/xml/project/13";

/// Decoders for the three document kinds of one schema revision. Each method
/// receives the document root element.
pub trait SchemaDecoder: Send + Sync {
    fn decode_project_info(&self, root: &Node<'_, '_>) -> Result<ProjectInfo>;
    fn decode_project(&self, root: &Node<'_, '_>) -> Result<Project>;
    fn decode_manufacturer_data(&self, root: &Node<'_, '_>) -> Result<ManufacturerData>;
}

/// Decoder for schema 11 and the revisions compatible with it.
pub struct Schema11;

impl SchemaDecoder for Schema11 {
    fn decode_project_info(&self, root: &Node<'_, '_>) -> Result<ProjectInfo> {
        parse_project_info(root)
    }

    fn decode_project(&self, root: &Node<'_, '_>) -> Result<Project> {
        parse_project(root)
    }

    fn decode_manufacturer_data(&self, root: &Node<'_, '_>) -> Result<ManufacturerData> {
        parse_manufacturer_data(root)
    }
}

static SCHEMAS: &[(&str, &dyn SchemaDecoder)] = &[
    (SCHEMA_11_NAMESPACE, &Schema11),
    (SCHEMA_12_NAMESPACE, &Schema11),
    (SCHEMA_13_NAMESPACE, &Schema11),
];

/// Looks up the decoder registered for `namespace`.
pub fn schema_for(namespace: &str) -> Result<&'static dyn SchemaDecoder> {
    SCHEMAS
        .iter()
        .find(|(uri, _)| *uri == namespace)
        .map(|(_, decoder)| *decoder)
        .ok_or_else(|| Error::UnsupportedSchema {
            namespace: namespace.to_string(),
        })
}

/// Namespace declared by the root element. A plain `xmlns` attribute wins; otherwise
/// the default namespace as resolved by the parser is used. Missing yields "".
pub fn root_namespace<'a>(root: &Node<'a, '_>) -> &'a str {
    root.attributes()
        .find(|attr| attr.namespace().is_none() && attr.name() == "xmlns")
        .map(|attr| attr.value())
        .or_else(|| root.lookup_namespace_uri(None))
        .unwrap_or("")
}

fn decode_document<T>(
    xml: &str,
    decode: impl FnOnce(&dyn SchemaDecoder, &Node<'_, '_>) -> Result<T>,
) -> Result<T> {
    let doc = Document::parse(strip_bom(xml))?;
    let root = doc.root_element();
    let namespace = root_namespace(&root);
    let schema = schema_for(namespace)?;
    log::debug!(
        "Decoding <{}> with schema {}",
        root.tag_name().name(),
        namespace
    );
    decode(schema, &root)
}

/// Entry name reported when a caller supplied reader fails.
const READER_ENTRY: &str = "<reader>";

fn read_document<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| Error::EntryOpen {
            entry: READER_ENTRY.to_string(),
            source: ZipError::Io(err),
        })?;
    let text = std::str::from_utf8(&bytes)?;
    Ok(text.to_string())
}

pub fn decode_project_info_str(xml: &str) -> Result<ProjectInfo> {
    decode_document(xml, |schema, root| schema.decode_project_info(root))
}

pub fn decode_project_str(xml: &str) -> Result<Project> {
    decode_document(xml, |schema, root| schema.decode_project(root))
}

pub fn decode_manufacturer_data_str(xml: &str) -> Result<ManufacturerData> {
    decode_document(xml, |schema, root| schema.decode_manufacturer_data(root))
}

/// Decodes a project header document (`P-xxxx/Project.xml`) from any reader.
pub fn decode_project_info<R: Read>(reader: R) -> Result<ProjectInfo> {
    decode_project_info_str(&read_document(reader)?)
}

/// Decodes an installation document (`P-xxxx/0.xml`) from any reader.
pub fn decode_project<R: Read>(reader: R) -> Result<Project> {
    decode_project_str(&read_document(reader)?)
}

/// Decodes a manufacturer document (`M-xxxx/M-xxxx_....xml`) from any reader.
pub fn decode_manufacturer_data<R: Read>(reader: R) -> Result<ManufacturerData> {
    decode_manufacturer_data_str(&read_document(reader)?)
}
