use std::fmt;
use std::sync::Arc;

use zip::result::ZipError;

use crate::knx::error::{Error, Result};
use crate::knx::ids::{InstallationId, ManufacturerId, ProjectId};
use crate::knx::model::{ManufacturerData, Project, ProjectInfo};
use crate::knx::schema::{decode_manufacturer_data_str, decode_project_info_str, decode_project_str};
use crate::knx::zip_utils::read_entry_bytes;

use super::ArchiveState;

/// Location of one entry: the container holding it and its name there.
#[derive(Clone)]
pub(crate) struct EntryHandle {
    state: Arc<ArchiveState>,
    container: usize,
    name: String,
    path: String,
}

impl EntryHandle {
    pub(crate) fn new(state: Arc<ArchiveState>, container: usize, name: String, path: String) -> Self {
        Self {
            state,
            container,
            name,
            path,
        }
    }

    /// Fails with [`Error::ClosedArchive`] once the archive has been closed.
    pub(crate) fn ensure_open(&self) -> Result<()> {
        let guard = self
            .state
            .containers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(_) => Ok(()),
            None => Err(Error::ClosedArchive),
        }
    }

    /// Opens the entry stream, decodes it and releases the stream again.
    fn decode<T>(&self, decode: impl FnOnce(&str) -> Result<T>) -> Result<T> {
        let bytes = {
            let mut guard = self
                .state
                .containers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let containers = guard.as_mut().ok_or(Error::ClosedArchive)?;
            let zip = containers
                .get_mut(self.container)
                .ok_or_else(|| Error::EntryOpen {
                    entry: self.path.clone(),
                    source: ZipError::FileNotFound,
                })?;
            read_entry_bytes(zip, &self.name, self.state.password.as_deref())?
        };
        log::debug!("Decoding {} ({} bytes)", self.path, bytes.len());
        let text = std::str::from_utf8(&bytes)?;
        decode(text)
    }
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHandle")
            .field("container", &self.container)
            .field("path", &self.path)
            .finish()
    }
}

/// Installation file of a project (`P-xxxx/<digit>.xml`).
#[derive(Debug, Clone)]
pub struct InstallationFile {
    entry: EntryHandle,
    installation_id: InstallationId,
}

impl InstallationFile {
    pub(crate) fn new(entry: EntryHandle, installation_id: InstallationId) -> Self {
        Self {
            entry,
            installation_id,
        }
    }

    pub fn installation_id(&self) -> &InstallationId {
        &self.installation_id
    }

    /// Path of the entry inside the archive.
    pub fn name(&self) -> &str {
        &self.entry.path
    }

    /// Decodes this file alone. The result may hold several installations.
    pub fn decode(&self) -> Result<Project> {
        self.entry.decode(decode_project_str)
    }
}

/// Project header file (`P-xxxx/Project.xml`) and the installation files next to it.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    entry: EntryHandle,
    project_id: ProjectId,
    installation_files: Vec<InstallationFile>,
}

impl ProjectFile {
    pub(crate) fn new(
        entry: EntryHandle,
        project_id: ProjectId,
        installation_files: Vec<InstallationFile>,
    ) -> Self {
        Self {
            entry,
            project_id,
            installation_files,
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn name(&self) -> &str {
        &self.entry.path
    }

    pub fn installation_files(&self) -> &[InstallationFile] {
        &self.installation_files
    }

    /// Decodes only the project header.
    pub fn decode_info(&self) -> Result<ProjectInfo> {
        self.entry.decode(decode_project_info_str)
    }

    /// Decodes every installation file and concatenates their installations in
    /// file order. Fails as a whole if any installation file fails.
    pub fn decode(&self) -> Result<Project> {
        self.entry.ensure_open()?;
        let mut project = Project {
            id: self.project_id.clone(),
            installations: Vec::new(),
        };
        for file in &self.installation_files {
            let decoded = file.decode()?;
            project.installations.extend(decoded.installations);
        }
        Ok(project)
    }
}

/// Manufacturer file (`M-xxxx/M-xxxx<suffix>.xml`).
#[derive(Debug, Clone)]
pub struct ManufacturerFile {
    entry: EntryHandle,
    manufacturer_id: ManufacturerId,
    content_id: String,
}

impl ManufacturerFile {
    pub(crate) fn new(entry: EntryHandle, manufacturer_id: ManufacturerId, content_id: String) -> Self {
        Self {
            entry,
            manufacturer_id,
            content_id,
        }
    }

    pub fn manufacturer_id(&self) -> &ManufacturerId {
        &self.manufacturer_id
    }

    /// `M-` followed by the file's base name, e.g. `M-0083_A-00B0-32-0DFC`.
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn name(&self) -> &str {
        &self.entry.path
    }

    pub fn decode(&self) -> Result<ManufacturerData> {
        self.entry.decode(decode_manufacturer_data_str)
    }
}
