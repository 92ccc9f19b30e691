//! Export archive index.
//!
//! An ETS export is a ZIP container. Its entries are classified by name into
//! project headers, installation files and manufacturer files; nothing is
//! decoded until one of the returned handles is asked to.

mod classify;
mod files;

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::knx::error::{Error, Result};
use crate::knx::zip_utils::{derive_zip_password, entry_names, read_entry_bytes};

pub use classify::{classify_entry, EntryKind};
pub use files::{InstallationFile, ManufacturerFile, ProjectFile};

use files::EntryHandle;

pub(crate) trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

type Container = ZipArchive<Box<dyn ReadSeek>>;

/// Shared between the archive and its file handles. `containers` is `None` once closed.
pub(crate) struct ArchiveState {
    containers: Mutex<Option<Vec<Container>>>,
    password: Option<String>,
}

/// An entry found while scanning, possibly inside a nested project archive.
struct ScannedEntry {
    container: usize,
    name: String,
    /// Name as if the nested archive were a directory of the outer one
    path: String,
}

/// Handle to an opened `.knxproj` or `.knxprod` export.
///
/// Entry streams are opened one at a time; decode calls coming from several
/// threads are serialized on the archive.
pub struct Archive {
    source: PathBuf,
    state: Arc<ArchiveState>,
    project_files: Vec<ProjectFile>,
    manufacturer_files: Vec<ManufacturerFile>,
}

impl Archive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_file(path.as_ref(), None)
    }

    /// Opens an export whose project is protected with the ETS project password.
    pub fn open_with_password<P: AsRef<Path>>(path: P, password: &str) -> Result<Self> {
        Self::open_file(path.as_ref(), Some(password))
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(Box::new(Cursor::new(data)), PathBuf::from("<memory>"), None)
    }

    pub fn from_bytes_with_password(data: Vec<u8>, password: &str) -> Result<Self> {
        Self::from_source(
            Box::new(Cursor::new(data)),
            PathBuf::from("<memory>"),
            Some(password),
        )
    }

    fn open_file(path: &Path, password: Option<&str>) -> Result<Self> {
        log::info!("Opening KNX export archive: {}", path.display());
        let file = File::open(path).map_err(|err| Error::ArchiveOpen {
            path: path.to_path_buf(),
            source: ZipError::Io(err),
        })?;
        Self::from_source(Box::new(file), path.to_path_buf(), password)
    }

    fn from_source(
        reader: Box<dyn ReadSeek>,
        source: PathBuf,
        password: Option<&str>,
    ) -> Result<Self> {
        let outer = ZipArchive::new(reader).map_err(|err| Error::ArchiveOpen {
            path: source.clone(),
            source: err,
        })?;

        let zip_password = password.map(derive_zip_password);
        if zip_password.is_some() {
            log::info!("Derived zip password for protected project");
        }

        let (containers, entries) = scan_containers(outer, &source, zip_password.as_deref())?;
        let state = Arc::new(ArchiveState {
            containers: Mutex::new(Some(containers)),
            password: zip_password,
        });
        let (project_files, manufacturer_files) = index_entries(&state, &entries);

        log::info!(
            "Indexed {}: {} project file(s), {} manufacturer file(s)",
            source.display(),
            project_files.len(),
            manufacturer_files.len()
        );

        Ok(Self {
            source,
            state,
            project_files,
            manufacturer_files,
        })
    }

    /// Project header files in archive directory order.
    pub fn project_files(&self) -> &[ProjectFile] {
        &self.project_files
    }

    /// Manufacturer files in archive directory order.
    pub fn manufacturer_files(&self) -> &[ManufacturerFile] {
        &self.manufacturer_files
    }

    pub fn path(&self) -> &Path {
        &self.source
    }

    /// Releases the underlying ZIP readers. Calling it again is a no-op. Handles
    /// obtained earlier fail with [`Error::ClosedArchive`] afterwards.
    pub fn close(&self) -> Result<()> {
        let mut guard = self
            .state
            .containers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.take().is_some() {
            log::debug!("Closed archive {}", self.source.display());
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .containers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

/// Lists the outer archive and expands every nested project archive into a
/// container of its own. Container 0 is always the outer archive.
fn scan_containers(
    mut outer: Container,
    source: &Path,
    password: Option<&str>,
) -> Result<(Vec<Container>, Vec<ScannedEntry>)> {
    let names = entry_names(&mut outer).map_err(|err| Error::ArchiveOpen {
        path: source.to_path_buf(),
        source: err,
    })?;

    let mut nested = Vec::new();
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        if let EntryKind::NestedProject { project } = classify_entry(&name) {
            log::debug!("Expanding nested project archive {}", name);
            let bytes = read_entry_bytes(&mut outer, &name, password)?;
            let reader: Box<dyn ReadSeek> = Box::new(Cursor::new(bytes));
            let mut inner = ZipArchive::new(reader).map_err(|err| Error::EntryOpen {
                entry: name.clone(),
                source: err,
            })?;
            let inner_names = entry_names(&mut inner).map_err(|err| Error::EntryOpen {
                entry: name.clone(),
                source: err,
            })?;
            nested.push(inner);
            let container = nested.len();
            entries.extend(inner_names.into_iter().map(|inner_name| ScannedEntry {
                container,
                path: format!("{}/{}", project, inner_name),
                name: inner_name,
            }));
        } else {
            entries.push(ScannedEntry {
                container: 0,
                path: name.clone(),
                name,
            });
        }
    }

    let mut containers = Vec::with_capacity(nested.len() + 1);
    containers.push(outer);
    containers.extend(nested);
    Ok((containers, entries))
}

fn index_entries(
    state: &Arc<ArchiveState>,
    entries: &[ScannedEntry],
) -> (Vec<ProjectFile>, Vec<ManufacturerFile>) {
    let handle = |entry: &ScannedEntry| {
        EntryHandle::new(
            Arc::clone(state),
            entry.container,
            entry.name.clone(),
            entry.path.clone(),
        )
    };

    let mut project_files = Vec::new();
    let mut manufacturer_files = Vec::new();
    for entry in entries {
        match classify_entry(&entry.path) {
            EntryKind::ProjectMeta { project } => {
                let installation_files = entries
                    .iter()
                    .filter_map(|candidate| match classify_entry(&candidate.path) {
                        EntryKind::Installation {
                            project: owner,
                            installation,
                        } if owner == project => {
                            Some(InstallationFile::new(handle(candidate), installation))
                        }
                        _ => None,
                    })
                    .collect();
                project_files.push(ProjectFile::new(handle(entry), project, installation_files));
            }
            EntryKind::Manufacturer {
                manufacturer,
                content_id,
            } => {
                manufacturer_files.push(ManufacturerFile::new(handle(entry), manufacturer, content_id));
            }
            EntryKind::Installation { .. } | EntryKind::NestedProject { .. } | EntryKind::Ignored => {}
        }
    }
    (project_files, manufacturer_files)
}
