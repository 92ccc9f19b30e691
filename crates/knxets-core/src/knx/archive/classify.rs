use lazy_static::lazy_static;
use regex::Regex;

use crate::knx::ids::{InstallationId, ManufacturerId, ProjectId};

lazy_static! {
    static ref PROJECT_META_RE: Regex =
        Regex::new(r"^[pP]-([0-9a-zA-Z]+)/[pP]roject\.xml$").expect("valid project regex");
    static ref INSTALLATION_RE: Regex =
        Regex::new(r"^([pP]-[0-9a-zA-Z]+)/([0-9])\.xml$").expect("valid installation regex");
    static ref MANUFACTURER_RE: Regex =
        Regex::new(r"^[mM]-([0-9a-zA-Z]+)/[mM]-([0-9a-zA-Z]+)([^.]*)\.xml$").expect("valid manufacturer regex");
    static ref NESTED_PROJECT_RE: Regex =
        Regex::new(r"^([pP]-[0-9a-zA-Z]+)\.zip$").expect("valid nested project regex");
}

/// What an archive entry is, judged from its name alone (`/` separated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// `P-xxxx/Project.xml`
    ProjectMeta { project: ProjectId },
    /// `P-xxxx/<digit>.xml`
    Installation {
        project: ProjectId,
        installation: InstallationId,
    },
    /// `M-xxxx/M-xxxx<suffix>.xml`
    Manufacturer {
        manufacturer: ManufacturerId,
        content_id: String,
    },
    /// `P-xxxx.zip` holding the files of a password protected project
    NestedProject { project: ProjectId },
    Ignored,
}

pub fn classify_entry(name: &str) -> EntryKind {
    if PROJECT_META_RE.is_match(name) {
        return EntryKind::ProjectMeta {
            project: ProjectId::from(parent_dir(name)),
        };
    }
    if let Some(captures) = INSTALLATION_RE.captures(name) {
        return EntryKind::Installation {
            project: ProjectId::from(&captures[1]),
            installation: InstallationId::from(&captures[2]),
        };
    }
    if let Some(captures) = MANUFACTURER_RE.captures(name) {
        return EntryKind::Manufacturer {
            manufacturer: ManufacturerId::from(format!("M-{}", &captures[1])),
            content_id: format!("M-{}{}", &captures[2], &captures[3]),
        };
    }
    if let Some(captures) = NESTED_PROJECT_RE.captures(name) {
        return EntryKind::NestedProject {
            project: ProjectId::from(&captures[1]),
        };
    }
    EntryKind::Ignored
}

/// Everything before the final `/`.
pub(crate) fn parent_dir(name: &str) -> &str {
    name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}
