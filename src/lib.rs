//! bootcraft library
//!
//! Loads declarative package-set documents, resolves a build blueprint
//! against them, and renders the result as a Containerfile or as exported
//! package lists.
//!
//! Data flow: store → loader → resolver → generator / exporter.

pub mod cli;
pub mod config_file;
pub mod engine;
pub mod error;
pub mod logic;
pub mod package_list;
pub mod package_set;
pub mod package_utils;
pub mod profiles;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config_file::{BuildConfig, DesktopSelection, ImageConfig, ModuleConfig};
pub use engine::containerfile::{generate, write_containerfile, Instruction};
pub use engine::export::export;
pub use error::{BootcraftError, Result};
pub use logic::resolver::{resolve, resolve_packages, PackageResolution, ResolutionPlan};
pub use package_list::{merge_sets, ResolvedPackageList};
pub use package_set::{Category, PackageSet};
pub use profiles::DistroProfile;
pub use store::PackageStore;
pub use types::{InstallMode, PackageOp, SetKind};
