//! Flattened, deduplicated package lists.
//!
//! Categories keep the order in which they were first seen. Every identifier
//! appears at most once across the whole list; when the same identifier shows
//! up again (in the same or another category) the first occurrence wins.

use std::collections::HashSet;

use serde::Serialize;

use crate::package_set::{Category, PackageSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPackageList {
    categories: Vec<Category>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ResolvedPackageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append packages to a category, creating it at the end if needed.
    ///
    /// Identifiers already present anywhere in the list are skipped, and a
    /// category that would stay empty is not created.
    pub fn extend_category<I, S>(&mut self, name: &str, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fresh = Vec::new();
        for package in packages {
            let package = package.into();
            if self.seen.insert(package.clone()) {
                fresh.push(package);
            }
        }
        if fresh.is_empty() {
            return;
        }

        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(category) => category.packages.extend(fresh),
            None => self.categories.push(Category::new(name, fresh)),
        }
    }

    /// Merge every category of a package set into the list
    pub fn merge_set(&mut self, set: &PackageSet) {
        for category in &set.categories {
            self.extend_category(&category.name, category.packages.iter().cloned());
        }
    }

    /// Drop the given identifiers from every category.
    ///
    /// Categories left empty are removed.
    pub fn subtract<S: AsRef<str>>(&mut self, removals: &[S]) {
        let removals: HashSet<&str> = removals.iter().map(|r| r.as_ref()).collect();
        for category in &mut self.categories {
            category.packages.retain(|p| !removals.contains(p.as_str()));
        }
        self.categories.retain(|c| !c.packages.is_empty());
        self.seen.retain(|p| !removals.contains(p.as_str()));
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.packages.as_slice())
    }

    /// All identifiers in category order
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.packages.iter().map(String::as_str))
    }

    pub fn contains(&self, package: &str) -> bool {
        self.seen.contains(package)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Merge package sets in order into a single list
pub fn merge_sets<'a>(sets: impl IntoIterator<Item = &'a PackageSet>) -> ResolvedPackageList {
    let mut list = ResolvedPackageList::new();
    for set in sets {
        list.merge_set(set);
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn set(yaml: &str) -> PackageSet {
        PackageSet::from_yaml_str(yaml, Path::new("test.yml")).unwrap()
    }

    #[test]
    fn test_merge_concatenates_per_category() {
        let sway = set("metadata: {name: sway, type: window-manager}\ncore: [sway, waybar]\nterminals: [foot]\n");
        let base = set("metadata: {name: base, type: common}\ncore: [bash, coreutils]\n");

        let list = merge_sets([&sway, &base]);
        assert_eq!(list.category("core").unwrap(), ["sway", "waybar", "bash", "coreutils"]);
        assert_eq!(list.category("terminals").unwrap(), ["foot"]);
        let names: Vec<_> = list.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["core", "terminals"]);
    }

    #[test]
    fn test_cross_set_duplicates_keep_first() {
        let a = set("metadata: {name: a, type: window-manager}\ncore: [sway, foot]\n");
        let b = set("metadata: {name: b, type: common}\ncore: [bash, sway]\n");
        let list = merge_sets([&a, &b]);
        assert_eq!(list.category("core").unwrap(), ["sway", "foot", "bash"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_first_seen_category_wins() {
        let a = set("metadata: {name: a, type: window-manager}\nterminals: [foot]\n");
        let b = set("metadata: {name: b, type: common}\ncore: [bash, foot]\n");
        let list = merge_sets([&a, &b]);
        assert_eq!(list.category("terminals").unwrap(), ["foot"]);
        assert_eq!(list.category("core").unwrap(), ["bash"]);
    }

    #[test]
    fn test_subtract_removes_everywhere() {
        let mut list = ResolvedPackageList::new();
        list.extend_category("core", ["sway", "bash", "coreutils"]);
        list.extend_category("shells", ["bash", "zsh"]);
        list.extend_category("only", ["bash"]);

        list.subtract(&["bash"]);
        assert_eq!(list.category("core").unwrap(), ["sway", "coreutils"]);
        assert_eq!(list.category("shells").unwrap(), ["zsh"]);
        assert!(list.category("only").is_none());
        assert!(!list.contains("bash"));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_packages_iterates_in_order() {
        let mut list = ResolvedPackageList::new();
        list.extend_category("b", ["2", "3"]);
        list.extend_category("a", ["1"]);
        list.extend_category("b", ["4"]);
        assert_eq!(list.packages().collect::<Vec<_>>(), vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn test_empty_list() {
        let list = ResolvedPackageList::new();
        assert!(list.is_empty());
        assert_eq!(list.packages().count(), 0);
    }
}
