//! Source-tree enforcement of the engine's concurrency and error rules.
//!
//! Scans production sources with walkdir. Lines inside a file's
//! `#[cfg(test)]` module are exempt - the scan stops at the marker, since
//! the convention in this workspace keeps unit tests at the bottom of each
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Workspace root, two levels up from this package.
fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("workspace root exists")
}

/// All `.rs` files under `dir`.
fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|entry| entry.into_path())
        .collect()
}

/// The production portion of a source file: everything above the first
/// `#[cfg(test)]` marker.
fn production_portion(path: &Path) -> String {
    let content = fs::read_to_string(path).expect("source file is readable");
    match content.find("#[cfg(test)]") {
        Some(index) => content[..index].to_string(),
        None => content,
    }
}

/// Files in the engine crate's production source tree.
fn engine_sources() -> Vec<PathBuf> {
    rust_sources(&workspace_root().join("engine/core/src"))
}

#[test]
fn no_blocking_sleep_in_production_code() {
    let mut violations = Vec::new();

    for path in engine_sources()
        .into_iter()
        .chain(rust_sources(&workspace_root().join("engine/headless/src")))
    {
        let production = production_portion(&path);
        if production.contains("std::thread::sleep") || production.contains("thread::sleep") {
            violations.push(path);
        }
    }

    assert!(
        violations.is_empty(),
        "blocking sleep stalls the tick loop; use tokio::time::sleep: {violations:?}"
    );
}

#[test]
fn no_unwrap_in_engine_production_code() {
    let mut violations = Vec::new();

    for path in engine_sources() {
        let production = production_portion(&path);
        for (number, line) in production.lines().enumerate() {
            if line.contains(".unwrap()") {
                violations.push(format!("{}:{}", path.display(), number + 1));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "engine failures are absorbed into state, never unwrapped: {violations:?}"
    );
}

#[test]
fn engine_has_no_rendering_or_audio_dependencies() {
    let manifest =
        fs::read_to_string(workspace_root().join("engine/core/Cargo.toml")).expect("manifest");

    for forbidden in ["ratatui", "crossterm", "wgpu", "winit", "rodio", "cpal"] {
        assert!(
            !manifest.contains(forbidden),
            "engine crate must stay renderer- and audio-free, found {forbidden}"
        );
    }
}

#[test]
fn collaborators_are_reached_through_traits_only() {
    // The director must not name concrete collaborator implementations;
    // construction happens at the surface.
    let director = production_portion(&workspace_root().join("engine/core/src/director.rs"));

    for concrete in ["HttpGateway", "SimulatedTts", "NullTts", "MonospaceMeasurer"] {
        assert!(
            !director.contains(concrete),
            "director must depend on collaborator traits, found {concrete}"
        );
    }
}
