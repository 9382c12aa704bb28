//! Engine modules: turn a resolved plan into text artifacts.
//!
//! The engine layer sits between resolution (what the blueprint asks for) and
//! the external image builder. It renders Containerfiles and exported package
//! lists.

pub mod containerfile;
pub mod export;
