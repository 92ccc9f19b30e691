use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use knxets_core::{
    format_group_address,
    format_individual_address,
    Archive,
    GroupAddressStyle,
    GroupRange,
    Installation,
    ManufacturerData,
    Project,
    ProjectInfo,
};
use serde::Serialize;

use crate::cli::Command;
use crate::config::CliConfig;

pub fn run(command: &Command, config: &CliConfig) -> Result<()> {
    let archive = open_archive(command.archive(), config)?;
    let output = match command {
        Command::List { .. } => list(&archive),
        Command::Info { .. } => info(&archive)?,
        Command::Tree { .. } => tree(&archive, config.group_style)?,
        Command::Dump { .. } => dump(&archive, config.compact)?,
    };
    archive.close()?;
    print!("{}", output);
    Ok(())
}

fn open_archive(path: &Path, config: &CliConfig) -> Result<Archive> {
    let archive = match config.password.as_deref() {
        Some(password) => Archive::open_with_password(path, password),
        None => Archive::open(path),
    };
    archive.with_context(|| format!("Failed to open {}", path.display()))
}

fn list(archive: &Archive) -> String {
    let mut out = String::new();
    for project_file in archive.project_files() {
        let _ = writeln!(out, "project {} ({})", project_file.project_id(), project_file.name());
        for installation_file in project_file.installation_files() {
            let _ = writeln!(
                out,
                "  installation {} ({})",
                installation_file.installation_id(),
                installation_file.name()
            );
        }
    }
    for manufacturer_file in archive.manufacturer_files() {
        let _ = writeln!(
            out,
            "manufacturer {} {} ({})",
            manufacturer_file.manufacturer_id(),
            manufacturer_file.content_id(),
            manufacturer_file.name()
        );
    }
    out
}

fn info(archive: &Archive) -> Result<String> {
    let mut out = String::new();
    for project_file in archive.project_files() {
        let info = project_file
            .decode_info()
            .with_context(|| format!("Failed to decode {}", project_file.name()))?;
        let _ = writeln!(out, "{}\t{}", info.id, info.name);
    }
    Ok(out)
}

fn tree(archive: &Archive, style: GroupAddressStyle) -> Result<String> {
    let mut out = String::new();
    for project_file in archive.project_files() {
        let project = project_file
            .decode()
            .with_context(|| format!("Failed to decode project {}", project_file.project_id()))?;
        let _ = writeln!(out, "{}", project.id);
        for installation in &project.installations {
            write_installation(&mut out, installation, style);
        }
    }
    Ok(out)
}

fn write_installation(out: &mut String, installation: &Installation, style: GroupAddressStyle) {
    let _ = writeln!(out, "  Installation {}", installation.name);
    for area in &installation.topology {
        let _ = writeln!(out, "    {} {}", area.address, area.name);
        for line in &area.lines {
            let _ = writeln!(out, "      {}.{} {}", area.address, line.address, line.name);
            for device in &line.devices {
                let _ = writeln!(
                    out,
                    "        {} {}",
                    format_individual_address(area.address, line.address, device.address),
                    device.name
                );
            }
        }
    }
    for range in &installation.group_addresses {
        write_group_range(out, range, style, 4);
    }
}

fn write_group_range(out: &mut String, range: &GroupRange, style: GroupAddressStyle, indent: usize) {
    let _ = writeln!(
        out,
        "{:indent$}[{} - {}] {}",
        "",
        format_group_address(range.range_start, style),
        format_group_address(range.range_end, style),
        range.name,
        indent = indent
    );
    for address in &range.addresses {
        let _ = writeln!(
            out,
            "{:indent$}{} {}",
            "",
            format_group_address(address.address, style),
            address.name,
            indent = indent + 2
        );
    }
    for sub in &range.sub_ranges {
        write_group_range(out, sub, style, indent + 2);
    }
}

#[derive(Serialize)]
struct DumpProject {
    info: ProjectInfo,
    #[serde(flatten)]
    project: Project,
}

#[derive(Serialize)]
struct Dump {
    projects: Vec<DumpProject>,
    manufacturers: Vec<ManufacturerData>,
}

fn dump(archive: &Archive, compact: bool) -> Result<String> {
    let mut dump = Dump {
        projects: Vec::new(),
        manufacturers: Vec::new(),
    };
    for project_file in archive.project_files() {
        let info = project_file
            .decode_info()
            .with_context(|| format!("Failed to decode {}", project_file.name()))?;
        let project = project_file
            .decode()
            .with_context(|| format!("Failed to decode project {}", project_file.project_id()))?;
        dump.projects.push(DumpProject { info, project });
    }
    for manufacturer_file in archive.manufacturer_files() {
        let data = manufacturer_file
            .decode()
            .with_context(|| format!("Failed to decode {}", manufacturer_file.name()))?;
        dump.manufacturers.push(data);
    }

    let mut json = if compact {
        serde_json::to_string(&dump)?
    } else {
        serde_json::to_string_pretty(&dump)?
    };
    json.push('\n');
    Ok(json)
}
