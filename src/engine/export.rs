//! Package list export.
//!
//! Writes a resolved selection to a directory as plain-text lists, one
//! identifier per line, plus a JSON manifest. All files are rendered in
//! memory before anything touches the disk.
//!
//! ```text
//! <output-dir>/
//! ├── categories/<category>.txt
//! ├── packages.txt
//! ├── remove.txt        (only with removals)
//! └── manifest.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{BootcraftError, Result};
use crate::logic::resolver::PackageResolution;
use crate::package_set::Category;

pub const ALL_PACKAGES_FILE: &str = "packages.txt";
pub const REMOVE_FILE: &str = "remove.txt";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const CATEGORIES_DIR: &str = "categories";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    sources: &'a [String],
    categories: &'a [Category],
    removals: &'a [String],
}

fn lines<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().fold(String::new(), |mut acc, item| {
        acc.push_str(item);
        acc.push('\n');
        acc
    })
}

fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Render every export file as `(relative path, contents)`
pub fn render_export(resolution: &PackageResolution) -> Result<Vec<(PathBuf, String)>> {
    let packages = &resolution.packages;
    let mut files = Vec::new();

    for category in packages.categories() {
        if !is_safe_file_stem(&category.name) {
            return Err(BootcraftError::parse(
                Path::new(CATEGORIES_DIR),
                format!("category name '{}' is not a valid file name", category.name),
            ));
        }
        files.push((
            Path::new(CATEGORIES_DIR).join(format!("{}.txt", category.name)),
            lines(category.packages.iter().map(String::as_str)),
        ));
    }
    files.push((PathBuf::from(ALL_PACKAGES_FILE), lines(packages.packages())));
    if !resolution.removals.is_empty() {
        files.push((
            PathBuf::from(REMOVE_FILE),
            lines(resolution.removals.iter().map(String::as_str)),
        ));
    }

    let manifest = Manifest {
        sources: &resolution.sources,
        categories: packages.categories(),
        removals: &resolution.removals,
    };
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| BootcraftError::parse(Path::new(MANIFEST_FILE), e.to_string()))?;
    files.push((PathBuf::from(MANIFEST_FILE), json + "\n"));

    Ok(files)
}

/// Export a resolution into `output_dir`, returning the written paths
pub fn export(resolution: &PackageResolution, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let rendered = render_export(resolution)?;

    let categories_dir = output_dir.join(CATEGORIES_DIR);
    fs::create_dir_all(&categories_dir).map_err(|e| BootcraftError::io(&categories_dir, e))?;

    let mut written = Vec::with_capacity(rendered.len());
    for (name, content) in rendered {
        let path = output_dir.join(name);
        fs::write(&path, content).map_err(|e| BootcraftError::io(&path, e))?;
        written.push(path);
    }

    info!("Exported {} files to {}", written.len(), output_dir.display());
    Ok(written)
}
