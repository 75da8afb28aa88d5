//! Deployment functions used across test cases.

use std::path::PathBuf;

/// Resolve a path relative to the project root.
///
/// The root is the closest ancestor of this crate that holds both a `Cargo.toml` and a
/// `crates` directory.
pub fn get_path_from_project_root(path: &str) -> PathBuf {
    let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let project_root = crate_root
        .ancestors()
        .find(|dir| dir.join("crates").is_dir() && dir.join("Cargo.toml").is_file())
        .map_or_else(|| crate_root.join("../../.."), PathBuf::from);
    project_root.join(path)
}
