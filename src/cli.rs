use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bootcraft - desktop package sets and Containerfiles for bootc images
#[derive(Parser)]
#[command(name = "bootcraft")]
#[command(about = "Resolves desktop package sets and generates Containerfiles for bootc images")]
#[command(version)]
pub struct Cli {
    /// Package set store directory
    #[arg(long, global = true, env = "BOOTCRAFT_STORE", default_value = "packages")]
    pub store: PathBuf,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// List available window managers
    #[arg(long)]
    pub list_wms: bool,

    /// List available desktop environments
    #[arg(long)]
    pub list_des: bool,

    /// Window manager to resolve
    #[arg(long, value_name = "NAME")]
    pub wm: Option<String>,

    /// Desktop environment to resolve
    #[arg(long, value_name = "NAME")]
    pub de: Option<String>,

    /// Do not merge common/base or apply common/remove
    #[arg(long)]
    pub no_common: bool,

    /// Extra packages (space or comma separated)
    #[arg(long, value_name = "PACKAGES")]
    pub extra: Option<String>,

    /// Export the resolved lists instead of printing them
    #[arg(long, requires = "output_dir")]
    pub export: bool,

    /// Directory for --export
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Containerfile from a blueprint
    Generate {
        /// Path to the blueprint
        blueprint: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Install every package with a single instruction
        #[arg(long)]
        batch: bool,
    },
    /// Validate a blueprint against the store
    Validate {
        /// Path to the blueprint
        blueprint: PathBuf,
    },
    /// Write a starter blueprint
    Init {
        /// Where to write the blueprint
        path: PathBuf,

        /// Image type (fedora, arch, debian, opensuse, ...)
        #[arg(short, long, default_value = "fedora")]
        image_type: String,

        /// Window manager to select
        #[arg(long, value_name = "NAME")]
        window_manager: Option<String>,

        /// Desktop environment to select
        #[arg(long, value_name = "NAME")]
        desktop_environment: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Whether any flag-mode action was requested.
    ///
    /// `--extra` on its own resolves the common sets plus the extras;
    /// `--no-common` alone selects nothing.
    pub fn has_flag_action(&self) -> bool {
        self.list_wms
            || self.list_des
            || self.wm.is_some()
            || self.de.is_some()
            || self.extra.is_some()
            || self.export
    }
}
