//! Package set documents.
//!
//! A package set is one YAML document from the store describing a window
//! manager, a desktop environment or a common set. Apart from `metadata`,
//! every top-level key is a category holding an ordered list of package
//! identifiers:
//!
//! ```yaml
//! metadata:
//!   name: sway
//!   type: window-manager
//!   description: i3-compatible Wayland compositor
//! core: [sway, waybar]
//! terminals: [foot]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{BootcraftError, Result};
use crate::package_utils::{dedup_preserving_order, is_single_line, is_valid_identifier};
use crate::types::SetKind;

const METADATA_KEY: &str = "metadata";

/// A named, ordered group of package identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub packages: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, packages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            packages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: String,
    homepage: Option<String>,
}

/// One parsed store document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet {
    pub name: String,
    pub kind: SetKind,
    pub description: String,
    pub homepage: Option<String>,
    /// Categories in document order
    pub categories: Vec<Category>,
    /// Document the set was parsed from
    pub source: PathBuf,
}

impl PackageSet {
    /// Read and parse a package set document
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BootcraftError::io(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse a package set from YAML text; `source` is used for diagnostics
    pub fn from_yaml_str(content: &str, source: &Path) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(content)
            .map_err(|e| BootcraftError::parse(source, format!("invalid YAML: {}", e)))?;

        let Value::Mapping(map) = doc else {
            return Err(BootcraftError::parse(source, "document must be a mapping"));
        };

        let metadata = map
            .get(METADATA_KEY)
            .ok_or_else(|| BootcraftError::parse(source, "missing metadata section"))?;
        let metadata: RawMetadata = serde_yaml::from_value(metadata.clone())
            .map_err(|e| BootcraftError::parse(source, format!("invalid metadata: {}", e)))?;

        let name = match metadata.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(BootcraftError::parse(source, "missing metadata.name")),
        };
        if !is_single_line(&name) {
            return Err(BootcraftError::parse(source, "metadata.name must be a single line"));
        }
        let kind_str = metadata
            .kind
            .ok_or_else(|| BootcraftError::parse(source, "missing metadata.type"))?;
        let kind = SetKind::from_str(&kind_str).map_err(|_| {
            BootcraftError::parse(source, format!("unknown metadata.type '{}'", kind_str))
        })?;

        let mut categories = Vec::new();
        for (key, value) in &map {
            let Value::String(category) = key else {
                return Err(BootcraftError::parse(source, "category names must be strings"));
            };
            if category == METADATA_KEY {
                continue;
            }
            if category.trim().is_empty() || !is_single_line(category) {
                return Err(BootcraftError::parse(
                    source,
                    format!("invalid category name {:?}", category),
                ));
            }
            categories.push(Category::new(
                category.clone(),
                parse_category(category, value, source)?,
            ));
        }

        Ok(Self {
            name,
            kind,
            description: metadata.description,
            homepage: metadata.homepage,
            categories,
            source: source.to_path_buf(),
        })
    }

    /// Serialize back into the store document format
    pub fn to_yaml(&self) -> Result<String> {
        let mut metadata = Mapping::new();
        metadata.insert("name".into(), self.name.clone().into());
        metadata.insert("type".into(), self.kind.to_string().into());
        metadata.insert("description".into(), self.description.clone().into());
        if let Some(homepage) = &self.homepage {
            metadata.insert("homepage".into(), homepage.clone().into());
        }

        let mut doc = Mapping::new();
        doc.insert(METADATA_KEY.into(), Value::Mapping(metadata));
        for category in &self.categories {
            let packages = category
                .packages
                .iter()
                .map(|p| Value::String(p.clone()))
                .collect();
            doc.insert(category.name.clone().into(), Value::Sequence(packages));
        }

        serde_yaml::to_string(&Value::Mapping(doc))
            .map_err(|e| BootcraftError::parse(&self.source, e.to_string()))
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.packages.as_slice())
    }

    /// Every identifier in the set, deduplicated, in document order
    pub fn flatten(&self) -> Vec<String> {
        dedup_preserving_order(
            self.categories
                .iter()
                .flat_map(|c| c.packages.iter().cloned()),
        )
    }

    /// Total number of identifiers across categories, duplicates included
    pub fn package_count(&self) -> usize {
        self.categories.iter().map(|c| c.packages.len()).sum()
    }
}

fn parse_category(category: &str, value: &Value, source: &Path) -> Result<Vec<String>> {
    let Value::Sequence(items) = value else {
        return Err(BootcraftError::parse(
            source,
            format!("category '{}' must be a sequence of package names", category),
        ));
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(id) if is_valid_identifier(id) => Ok(id.clone()),
            Value::String(id) => Err(BootcraftError::parse(
                source,
                format!("category '{}' has invalid package name '{}'", category, id),
            )),
            _ => Err(BootcraftError::parse(
                source,
                format!("category '{}' must only contain strings", category),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWAY: &str = r#"
metadata:
  name: sway
  type: window-manager
  description: i3-compatible Wayland compositor
  homepage: https://swaywm.org
core:
  - sway
  - waybar
terminals:
  - foot
"#;

    fn parse(content: &str) -> Result<PackageSet> {
        PackageSet::from_yaml_str(content, Path::new("test.yml"))
    }

    #[test]
    fn test_parse_package_set() {
        let set = parse(SWAY).unwrap();
        assert_eq!(set.name, "sway");
        assert_eq!(set.kind, SetKind::WindowManager);
        assert_eq!(set.homepage.as_deref(), Some("https://swaywm.org"));
        assert_eq!(set.categories.len(), 2);
        assert_eq!(set.categories[0].name, "core");
        assert_eq!(set.category("core").unwrap(), ["sway", "waybar"]);
        assert_eq!(set.category("terminals").unwrap(), ["foot"]);
        assert_eq!(set.package_count(), 3);
    }

    #[test]
    fn test_category_order_follows_document() {
        let set = parse(
            "metadata: {name: x, type: common}\nzeta: [a]\nalpha: [b]\nmid: [c]\n",
        )
        .unwrap();
        let names: Vec<_> = set.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_metadata_name() {
        let err = parse("metadata: {type: common}\ncore: [bash]\n").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("metadata.name"));
    }

    #[test]
    fn test_missing_metadata_type() {
        let err = parse("metadata: {name: base}\ncore: [bash]\n").unwrap_err();
        assert!(err.to_string().contains("metadata.type"));
    }

    #[test]
    fn test_missing_metadata_section() {
        let err = parse("core: [bash]\n").unwrap_err();
        assert!(err.to_string().contains("metadata"));
    }

    #[test]
    fn test_unknown_type() {
        let err = parse("metadata: {name: x, type: compositor}\n").unwrap_err();
        assert!(err.to_string().contains("compositor"));
    }

    #[test]
    fn test_category_not_a_sequence() {
        let err = parse("metadata: {name: x, type: common}\ncore: bash\n").unwrap_err();
        assert!(err.to_string().contains("'core'"));

        let err = parse("metadata: {name: x, type: common}\ncore:\n").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_category_with_non_string_item() {
        let err = parse("metadata: {name: x, type: common}\ncore: [bash, {a: b}]\n").unwrap_err();
        assert!(err.to_string().contains("only contain strings"));
    }

    #[test]
    fn test_category_with_blank_item() {
        let err = parse("metadata: {name: x, type: common}\ncore: [bash, '']\n").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_not_a_mapping() {
        assert!(parse("- a\n- b\n").unwrap_err().is_parse());
        assert!(parse("metadata: [\n").unwrap_err().is_parse());
    }

    #[test]
    fn test_multiline_category_name_rejected() {
        let err = parse("metadata: {name: x, type: common}\n\"core\\nFROM evil\": [bash]\n")
            .unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("invalid category name"));
    }

    #[test]
    fn test_multiline_name_rejected() {
        let err = parse("metadata: {name: \"x\\nRUN y\", type: common}\ncore: [bash]\n")
            .unwrap_err();
        assert!(err.to_string().contains("single line"));
    }

    #[test]
    fn test_empty_category_allowed() {
        let set = parse("metadata: {name: x, type: common}\ncore: []\n").unwrap();
        assert_eq!(set.category("core").unwrap().len(), 0);
    }

    #[test]
    fn test_to_yaml_roundtrip() {
        let set = parse(SWAY).unwrap();
        let yaml = set.to_yaml().unwrap();
        let reparsed = parse(&yaml).unwrap();
        assert_eq!(reparsed.categories, set.categories);
        assert_eq!(reparsed.name, set.name);
        assert_eq!(reparsed.kind, set.kind);
        assert_eq!(reparsed.homepage, set.homepage);
    }

    #[test]
    fn test_flatten_dedups() {
        let set = parse("metadata: {name: x, type: common}\na: [bash, vim]\nb: [vim, git]\n").unwrap();
        assert_eq!(set.flatten(), vec!["bash", "vim", "git"]);
    }
}
