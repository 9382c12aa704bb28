//! Blueprint resolver
//!
//! Translates a blueprint into a concrete plan: which package sets apply,
//! the merged package list, the removal set, and the module steps.
//!
//! # Resolution Rules
//!
//! | Source                      | Contributes |
//! |-----------------------------|-------------|
//! | `desktop.window_manager`    | Window manager set, merged first |
//! | `desktop.desktop_environment` | Desktop environment set, merged first |
//! | `include_common`            | `common/base` merged next, `common/remove` added to removals |
//! | `packages` modules          | `install` merged last, `remove` added to removals |
//! | `systemd`/`files`/`script` modules | Carried through to the plan untouched |
//!
//! Removals are subtracted after everything is merged, so a removal always
//! wins over any source that installs the same identifier.

use serde::Serialize;
use tracing::{debug, info};

use crate::config_file::{
    BuildConfig, DesktopSelection, FileCopy, ImageConfig, ModuleConfig, PackagesModule,
};
use crate::error::Result;
use crate::package_list::ResolvedPackageList;
use crate::package_utils::dedup_preserving_order;
use crate::profiles::DistroProfile;
use crate::store::{COMMON_BASE, PackageStore};
use crate::types::SetKind;

/// Packages resolved for one selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageResolution {
    /// Sets that contributed, as `kind/name`
    pub sources: Vec<String>,
    pub packages: ResolvedPackageList,
    /// Identifiers to remove, in first-seen order
    pub removals: Vec<String>,
}

/// Everything the Containerfile generator needs
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    pub image: ImageConfig,
    pub profile: DistroProfile,
    pub resolution: PackageResolution,
    pub enable_units: Vec<String>,
    pub disable_units: Vec<String>,
    pub files: Vec<FileCopy>,
    pub scripts: Vec<String>,
}

impl ResolutionPlan {
    /// Base image reference, falling back to the profile default
    pub fn base_image(&self) -> &str {
        self.image
            .base
            .as_deref()
            .unwrap_or_else(|| self.profile.default_base_image())
    }
}

/// Resolve the package list for a desktop selection plus package modules.
///
/// Merge order: desktop selection, then `common/base` (when
/// `include_common`), then module packages. Duplicates keep their first
/// position.
pub fn resolve_packages(
    store: &PackageStore,
    desktop: &DesktopSelection,
    modules: &[ModuleConfig],
) -> Result<PackageResolution> {
    let selected = desktop.selected()?;

    let mut sources = Vec::new();
    let mut packages = ResolvedPackageList::new();
    let mut removals = Vec::new();

    if let Some((kind, name)) = selected {
        let set = store.load(kind, name)?;
        packages.merge_set(&set);
        sources.push(format!("{}/{}", kind, set.name));
    }

    if desktop.include_common {
        let base = store.load_common()?;
        packages.merge_set(&base);
        sources.push(format!("{}/{}", SetKind::Common, COMMON_BASE));
        removals.extend(store.load_removals()?);
    }

    for module in modules {
        if let ModuleConfig::Packages(m) = module {
            packages.extend_category(m.category(), m.install.iter().cloned());
            removals.extend(m.remove.iter().cloned());
        }
    }

    let removals = dedup_preserving_order(removals);
    packages.subtract(&removals);

    info!(
        "Resolved {} packages in {} categories from [{}], {} removals",
        packages.len(),
        packages.categories().len(),
        sources.join(", "),
        removals.len()
    );

    Ok(PackageResolution {
        sources,
        packages,
        removals,
    })
}

/// Resolve a validated blueprint into a full plan.
///
/// The distro profile is checked before any store document is read.
pub fn resolve(config: &BuildConfig, store: &PackageStore) -> Result<ResolutionPlan> {
    config.validate()?;
    let profile = DistroProfile::for_image_type(&config.image.image_type)?;
    debug!("Image type '{}' uses the {} profile", config.image.image_type, profile);

    let resolution = resolve_packages(store, &config.desktop, &config.modules)?;

    let mut enable_units = Vec::new();
    let mut disable_units = Vec::new();
    let mut files = Vec::new();
    let mut scripts = Vec::new();
    for module in &config.modules {
        match module {
            ModuleConfig::Packages(_) => {}
            ModuleConfig::Systemd(m) => {
                enable_units.extend(m.enable.iter().cloned());
                disable_units.extend(m.disable.iter().cloned());
            }
            ModuleConfig::Files(m) => files.extend(m.files.iter().cloned()),
            ModuleConfig::Script(m) => scripts.extend(m.run.iter().cloned()),
        }
    }

    Ok(ResolutionPlan {
        image: config.image.clone(),
        profile,
        resolution,
        enable_units: dedup_preserving_order(enable_units),
        disable_units: dedup_preserving_order(disable_units),
        files,
        scripts,
    })
}

/// Build the modules list for ad-hoc extra packages given on the command line
pub fn extra_packages_module(packages: Vec<String>) -> Option<ModuleConfig> {
    if packages.is_empty() {
        return None;
    }
    Some(ModuleConfig::Packages(PackagesModule {
        install: packages,
        ..Default::default()
    }))
}
