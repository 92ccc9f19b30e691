use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ETS project password for protected exports
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Group address notation: ThreeLevel, TwoLevel or Free
    #[arg(long, global = true)]
    pub group_style: Option<String>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List project, installation and manufacturer files
    List { archive: PathBuf },
    /// Print the header of every project
    Info { archive: PathBuf },
    /// Print topology and group address trees
    Tree { archive: PathBuf },
    /// Print every decoded file as JSON
    Dump { archive: PathBuf },
}

impl Command {
    pub fn archive(&self) -> &Path {
        match self {
            Command::List { archive }
            | Command::Info { archive }
            | Command::Tree { archive }
            | Command::Dump { archive } => archive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "knxets",
            "tree",
            "house.knxproj",
            "--group-style",
            "TwoLevel",
            "--compact",
        ])?;
        assert!(matches!(args.command, Command::Tree { .. }));
        assert_eq!(args.command.archive(), Path::new("house.knxproj"));
        assert_eq!(args.group_style.as_deref(), Some("TwoLevel"));
        assert!(args.compact);
        assert!(args.password.is_none());
        Ok(())
    }

    #[test]
    fn archive_is_required() {
        assert!(Args::try_parse_from(["knxets", "dump"]).is_err());
    }
}
