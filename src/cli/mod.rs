pub mod commands;

use clap::{Parser, Subcommand};

use crate::domain::WisdomSource;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "A daily verse, koan, stoic quote or poem", long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    /// IANA timezone overriding the configured one (e.g. "Europe/Berlin")
    #[arg(long, global = true)]
    pub tz: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's wisdom
    Today {
        /// Also bookmark it
        #[arg(long)]
        save: bool,
    },
    /// Show a random item, refetching remote catalogs
    Refresh {
        /// Also bookmark it
        #[arg(long)]
        save: bool,
    },
    /// Show this week's koans
    Week {
        /// Show every item logged this week
        #[arg(long)]
        all: bool,
    },
    /// List sources and whether they are enabled
    Sources,
    /// Enable a source
    Enable {
        /// bible, koan, stoic or poetry
        source: WisdomSource,
    },
    /// Disable a source
    Disable {
        /// bible, koan, stoic or poetry
        source: WisdomSource,
    },
    /// Load a source's catalog and report where it came from
    Catalog {
        /// bible, koan, stoic or poetry
        source: WisdomSource,
    },
    /// List bookmarked items
    Saved,
    /// Remove a bookmark
    Unsave {
        /// ID of the saved item
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enable_source() {
        let cli = Cli::try_parse_from(["almanac", "enable", "koans"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Enable {
                source: WisdomSource::Koan
            }
        ));
    }

    #[test]
    fn test_parse_unknown_source_fails() {
        assert!(Cli::try_parse_from(["almanac", "disable", "tarot"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["almanac", "today", "--save", "--tz", "UTC"]).unwrap();
        assert_eq!(cli.tz.as_deref(), Some("UTC"));
        assert!(matches!(cli.command, Commands::Today { save: true }));
    }
}
