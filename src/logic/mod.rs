//! Logic modules: translate blueprint choices into concrete plans.
//!
//! The logic layer resolves abstract selections (e.g., "sway", "gnome") into
//! specific package lists, removals and module steps.

pub mod resolver;
