use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ffeed")]
#[command(about = "A terminal client for a FriendFeed-style activity feed", long_about = None)]
pub struct Cli {
    /// Server base URL, e.g. http://localhost:8080
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Feed path to show, e.g. / or /friends?start=30
    #[arg(short, long, value_name = "PATH")]
    pub feed: Option<String>,

    /// Seconds between polls
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Theme name (see `ffeed theme list`)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/ffeed)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect built-in themes
    Theme(ThemeArgs),
    /// Manage the settings file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommands,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// List available themes
    List {
        /// Show variant and description of each theme
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show a theme's colors
    Show {
        name: String,

        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: OutputFormat,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Write the effective settings (flags included) to the settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'toml' or 'json'")),
        }
    }
}
