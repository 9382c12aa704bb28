//! Package set store.
//!
//! The store is a directory with one subdirectory per set kind:
//!
//! ```text
//! packages/
//! ├── window-managers/      sway.yml, hyprland.yml, ...
//! ├── desktop-environments/ gnome.yml, kde.yml, ...
//! └── common/               base.yml, remove.yml
//! ```
//!
//! Documents are looked up by file stem. Lookups fail loudly; listings skip
//! broken documents with a warning so one bad file cannot hide the catalog.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BootcraftError, Result};
use crate::package_set::PackageSet;
use crate::types::SetKind;

/// Selection key for the always-merged common set
pub const COMMON_BASE: &str = "base";
/// Common document listing packages to exclude
pub const COMMON_REMOVE: &str = "remove";

const EXTENSIONS: [&str; 2] = ["yml", "yaml"];

#[derive(Debug, Clone)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    /// Open a store rooted at an existing directory
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(BootcraftError::not_found(
                "package store",
                root.display().to_string(),
                root,
            ));
        }
        debug!("Opened package store at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding documents of the given kind
    pub fn kind_dir(&self, kind: SetKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Find the document path for a named set, if one exists
    fn locate(&self, kind: SetKind, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        let dir = self.kind_dir(kind);
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    }

    /// Load a named set of the given kind
    pub fn load(&self, kind: SetKind, name: &str) -> Result<PackageSet> {
        let path = self
            .locate(kind, name)
            .ok_or_else(|| BootcraftError::set_not_found(kind, name, &self.kind_dir(kind)))?;

        let set = PackageSet::load_from_file(&path)?;
        check_placement(&set, kind, &path)?;

        debug!(
            "Loaded {} '{}' ({} packages in {} categories)",
            kind,
            set.name,
            set.package_count(),
            set.categories.len()
        );
        Ok(set)
    }

    /// Load the common base set (the `common` selection key)
    pub fn load_common(&self) -> Result<PackageSet> {
        self.load(SetKind::Common, COMMON_BASE)
    }

    /// Load the identifiers listed in `common/remove`.
    ///
    /// The document is optional: when it is absent nothing is removed.
    pub fn load_removals(&self) -> Result<Vec<String>> {
        match self.load(SetKind::Common, COMMON_REMOVE) {
            Ok(set) => Ok(set.flatten()),
            Err(BootcraftError::NotFound { .. }) => {
                debug!("No common/{} document, nothing to exclude", COMMON_REMOVE);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// List every valid set of a kind, sorted by name.
    ///
    /// Invalid documents are skipped with a warning.
    pub fn list(&self, kind: SetKind) -> Result<Vec<PackageSet>> {
        let dir = self.kind_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} directory in store", kind.dir_name());
                return Ok(Vec::new());
            }
            Err(e) => return Err(BootcraftError::io(&dir, e)),
        };

        let mut sets = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| BootcraftError::io(&dir, e))?.path();
            let is_document = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext));
            if !path.is_file() || !is_document {
                continue;
            }

            match PackageSet::load_from_file(&path)
                .and_then(|set| check_placement(&set, kind, &path).map(|()| set))
            {
                Ok(set) => sets.push(set),
                Err(e) => warn!("Skipping invalid document: {}", e),
            }
        }

        sets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sets)
    }

    /// Names of every valid set of a kind
    pub fn names(&self, kind: SetKind) -> Result<Vec<String>> {
        Ok(self.list(kind)?.into_iter().map(|s| s.name).collect())
    }
}

/// A document must sit in its kind's directory under its own name, so that
/// every listed name can be loaded back.
fn check_placement(set: &PackageSet, kind: SetKind, path: &Path) -> Result<()> {
    if set.kind != kind {
        return Err(BootcraftError::parse(
            path,
            format!("declares type '{}' but is stored as {}", set.kind, kind),
        ));
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if set.name != stem {
        return Err(BootcraftError::parse(
            path,
            format!("metadata.name '{}' does not match file name '{}'", set.name, stem),
        ));
    }
    Ok(())
}
