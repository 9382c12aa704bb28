//! Property-Based Tests for bootcraft
//!
//! Uses proptest for testing invariants of the resolution pipeline:
//! - package set documents survive a YAML round-trip
//! - window manager + common merges are complete, duplicate-free and honor removals
//! - conflicting selections always fail
//! - generation is deterministic

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use bootcraft::engine::containerfile;
use bootcraft::{
    BootcraftError, BuildConfig, Category, DesktopSelection, PackageSet, PackageStore, SetKind,
    resolve, resolve_packages,
};

// =============================================================================
// Strategies
// =============================================================================

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9+._-]{0,11}"
}

fn category_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}".prop_filter("reserved key", |name| name != "metadata")
}

/// Distinct category names, each with a list of identifiers
fn categories_strategy() -> impl Strategy<Value = Vec<Category>> {
    prop::collection::btree_map(
        category_name_strategy(),
        prop::collection::vec(identifier_strategy(), 0..6),
        1..5,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(name, packages)| Category::new(name, packages))
            .collect()
    })
}

fn set_kind_strategy() -> impl Strategy<Value = SetKind> {
    prop_oneof![
        Just(SetKind::WindowManager),
        Just(SetKind::DesktopEnvironment),
        Just(SetKind::Common),
    ]
}

// =============================================================================
// Helpers
// =============================================================================

fn render_document(name: &str, kind: SetKind, categories: &[Category]) -> String {
    let set = PackageSet {
        name: name.to_string(),
        kind,
        description: format!("{} test set", name),
        homepage: None,
        categories: categories.to_vec(),
        source: Path::new("generated.yml").to_path_buf(),
    };
    set.to_yaml().expect("Should serialize")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn all_ids(categories: &[Category]) -> HashSet<String> {
    categories
        .iter()
        .flat_map(|c| c.packages.iter().cloned())
        .collect()
}

// =============================================================================
// Round-trip
// =============================================================================

proptest! {
    /// PackageSet: parse → to_yaml → parse keeps every category's identifiers
    #[test]
    fn package_set_roundtrip(
        kind in set_kind_strategy(),
        categories in categories_strategy(),
    ) {
        let yaml = render_document("generated", kind, &categories);
        let parsed = PackageSet::from_yaml_str(&yaml, Path::new("a.yml")).expect("Should parse");
        let reserialized = parsed.to_yaml().expect("Should serialize");
        let reparsed = PackageSet::from_yaml_str(&reserialized, Path::new("b.yml")).expect("Should parse");

        prop_assert_eq!(&parsed.categories, &categories);
        prop_assert_eq!(&reparsed.categories, &parsed.categories);
        prop_assert_eq!(reparsed.kind, kind);
    }
}

// =============================================================================
// Merge invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// WM + include_common: complete, no duplicates, removals excluded
    #[test]
    fn wm_with_common_is_complete_and_unique(
        wm_categories in categories_strategy(),
        base_categories in categories_strategy(),
        removals in prop::collection::vec(identifier_strategy(), 0..4),
    ) {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "window-managers/wm.yml", &render_document("wm", SetKind::WindowManager, &wm_categories));
        write(dir.path(), "common/base.yml", &render_document("base", SetKind::Common, &base_categories));
        write(
            dir.path(),
            "common/remove.yml",
            &render_document("remove", SetKind::Common, &[Category::new("packages", removals.clone())]),
        );
        let store = PackageStore::open(dir.path()).unwrap();

        let desktop = DesktopSelection {
            window_manager: Some("wm".to_string()),
            desktop_environment: None,
            include_common: true,
        };
        let res = resolve_packages(&store, &desktop, &[]).unwrap();

        let resolved: Vec<&str> = res.packages.packages().collect();
        let unique: HashSet<&str> = resolved.iter().copied().collect();
        prop_assert_eq!(resolved.len(), unique.len(), "duplicates in {:?}", resolved);

        let removed: HashSet<String> = removals.into_iter().collect();
        let mut expected = all_ids(&wm_categories);
        expected.extend(all_ids(&base_categories));
        for id in &expected {
            if removed.contains(id) {
                prop_assert!(!unique.contains(id.as_str()), "{} should be removed", id);
            } else {
                prop_assert!(unique.contains(id.as_str()), "{} missing", id);
            }
        }
        for id in &unique {
            prop_assert!(expected.contains(*id), "{} does not trace back to a set", id);
        }
    }

    /// Both selections always conflict, whatever the names
    #[test]
    fn both_selections_always_conflict(
        wm in identifier_strategy(),
        de in identifier_strategy(),
        include_common in any::<bool>(),
    ) {
        let dir = TempDir::new().unwrap();
        let store = PackageStore::open(dir.path()).unwrap();
        let desktop = DesktopSelection {
            window_manager: Some(wm),
            desktop_environment: Some(de),
            include_common,
        };
        let err = resolve_packages(&store, &desktop, &[]).unwrap_err();
        let is_conflict = matches!(err, BootcraftError::ConflictingSelection { .. });
        prop_assert!(is_conflict);
    }

    /// Generation: identical inputs render identical bytes
    #[test]
    fn generation_is_deterministic(
        wm_categories in categories_strategy(),
        image_type in prop_oneof![Just("fedora"), Just("arch"), Just("debian"), Just("opensuse")],
    ) {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "window-managers/wm.yml", &render_document("wm", SetKind::WindowManager, &wm_categories));
        let store = PackageStore::open(dir.path()).unwrap();

        let mut config = BuildConfig::new(image_type);
        config.desktop.window_manager = Some("wm".to_string());
        config.desktop.include_common = false;

        let first = containerfile::generate(&resolve(&config, &store).unwrap());
        let second = containerfile::generate(&resolve(&config, &store).unwrap());
        prop_assert_eq!(first, second);
    }
}
