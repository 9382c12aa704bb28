//! Type-safe enums shared across bootcraft
//!
//! Closed, string-valued choices are modelled as Rust enums so that
//! documents are validated once at load time and matches stay exhaustive.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of a package set document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SetKind {
    WindowManager,
    DesktopEnvironment,
    Common,
}

impl SetKind {
    /// Store subdirectory holding documents of this kind
    pub fn dir_name(&self) -> &'static str {
        match self {
            SetKind::WindowManager => "window-managers",
            SetKind::DesktopEnvironment => "desktop-environments",
            SetKind::Common => "common",
        }
    }
}

/// How install instructions are laid out in the generated Containerfile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InstallMode {
    /// One install instruction per category
    #[default]
    PerCategory,
    /// A single install instruction for every package
    Batched,
}

/// Abstract package-manager operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PackageOp {
    Install,
    Remove,
    Update,
}
