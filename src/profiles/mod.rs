//! Distro profiles.
//!
//! Each profile supplies the package-manager command templates for one
//! distribution family. Templates use `{packages}` as the placeholder for the
//! shell-quoted package identifiers.
//!
//! # Supported Families
//!
//! | Profile  | Image types | Package manager |
//! |----------|-------------|-----------------|
//! | Fedora   | fedora, fedora-bootc, silverblue, kinoite, centos, centos-stream, rhel, almalinux | dnf |
//! | Arch     | arch, archlinux | pacman |
//! | Debian   | debian, ubuntu | apt-get |
//! | OpenSuse | opensuse, tumbleweed | zypper |

use strum::{Display, EnumIter, EnumString};

use crate::error::{BootcraftError, Result};
use crate::package_utils::join_quoted;
use crate::types::PackageOp;

/// Placeholder substituted with the package identifiers
pub const PACKAGES_PLACEHOLDER: &str = "{packages}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DistroProfile {
    Fedora,
    Arch,
    Debian,
    OpenSuse,
}

impl DistroProfile {
    /// Pick the profile for an image type (case-insensitive)
    pub fn for_image_type(image_type: &str) -> Result<Self> {
        match image_type.trim().to_ascii_lowercase().as_str() {
            "fedora" | "fedora-bootc" | "silverblue" | "kinoite" | "centos" | "centos-stream"
            | "rhel" | "almalinux" => Ok(DistroProfile::Fedora),
            "arch" | "archlinux" => Ok(DistroProfile::Arch),
            "debian" | "ubuntu" => Ok(DistroProfile::Debian),
            "opensuse" | "tumbleweed" => Ok(DistroProfile::OpenSuse),
            _ => Err(BootcraftError::UnsupportedDistro(image_type.to_string())),
        }
    }

    /// Command template for an abstract package operation
    pub fn template(&self, op: PackageOp) -> &'static str {
        match (self, op) {
            (DistroProfile::Fedora, PackageOp::Install) => "dnf -y install {packages}",
            (DistroProfile::Fedora, PackageOp::Remove) => "dnf -y remove {packages}",
            (DistroProfile::Fedora, PackageOp::Update) => "dnf -y upgrade",

            (DistroProfile::Arch, PackageOp::Install) => "pacman -Syu --noconfirm --needed {packages}",
            (DistroProfile::Arch, PackageOp::Remove) => "pacman -Rns --noconfirm {packages}",
            (DistroProfile::Arch, PackageOp::Update) => "pacman -Syu --noconfirm",

            (DistroProfile::Debian, PackageOp::Install) => {
                "apt-get update && apt-get install -y --no-install-recommends {packages}"
            }
            (DistroProfile::Debian, PackageOp::Remove) => "apt-get purge -y {packages}",
            (DistroProfile::Debian, PackageOp::Update) => "apt-get update && apt-get -y upgrade",

            (DistroProfile::OpenSuse, PackageOp::Install) => {
                "zypper --non-interactive install --no-recommends {packages}"
            }
            (DistroProfile::OpenSuse, PackageOp::Remove) => "zypper --non-interactive remove {packages}",
            (DistroProfile::OpenSuse, PackageOp::Update) => "zypper --non-interactive dup",
        }
    }

    /// Render a command, substituting the quoted package identifiers
    pub fn render<S: AsRef<str>>(&self, op: PackageOp, packages: &[S]) -> String {
        self.template(op)
            .replace(PACKAGES_PLACEHOLDER, &join_quoted(packages))
    }

    /// Cache cleanup run after package installation, if the family has one
    pub fn clean_command(&self) -> Option<&'static str> {
        match self {
            DistroProfile::Fedora => Some("dnf clean all"),
            DistroProfile::Arch => Some("yes | pacman -Scc"),
            DistroProfile::Debian => Some("apt-get clean && rm -rf /var/lib/apt/lists/*"),
            DistroProfile::OpenSuse => Some("zypper clean --all"),
        }
    }

    /// Base image used when the blueprint does not name one
    pub fn default_base_image(&self) -> &'static str {
        match self {
            DistroProfile::Fedora => "quay.io/fedora/fedora-bootc:latest",
            DistroProfile::Arch => "docker.io/archlinux/archlinux:latest",
            DistroProfile::Debian => "docker.io/library/debian:stable",
            DistroProfile::OpenSuse => "registry.opensuse.org/opensuse/tumbleweed:latest",
        }
    }
}
