//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::desktop::WallpaperStyle;

#[derive(Debug, Parser)]
#[command(name = "wallguard")]
#[command(about = "Preview and set the desktop wallpaper, or keep a deployed one in place", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ~/.wallguard/config.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log INFO lines regardless of the configured level.
    #[arg(long, global = true)]
    pub debug: bool,

    // Ignored while a wallpaper.* file in the working directory is being enforced.
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load an image and render its preview.
    Preview {
        image: PathBuf,

        /// Write the rendered preview here (format picked from the extension).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Set an image as the desktop wallpaper.
    Apply {
        image: PathBuf,

        #[arg(long, value_enum, default_value_t = WallpaperStyle::Stretch)]
        style: WallpaperStyle,
    },

    /// List the styles this system supports.
    Styles,
}
