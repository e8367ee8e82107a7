//! Layering guardrails between the workspace crates.
//!
//! `lexy_core` is pure vocabulary and depends on nothing. `lexy_syntax` is the syntax layer and may depend on
//! `lexy_core` but never on the compiler crate (`lexy`), which owns validation and ordering.

/// Names of the entries in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let manifest = include_str!("../crates/lexy_core/Cargo.toml");
    assert_eq!(dependencies(manifest), Vec::<String>::new());
}

#[test]
fn syntax_does_not_depend_on_the_compiler() {
    let manifest = include_str!("../crates/lexy_syntax/Cargo.toml");
    let names = dependencies(manifest);
    assert!(names.contains(&"lexy_core".to_string()));
    assert!(!names.contains(&"lexy".to_string()), "`lexy_syntax` must not depend on `lexy`");
}

#[test]
fn compiler_uses_the_shared_crates() {
    let names = dependencies(include_str!("../Cargo.toml"));
    assert!(names.contains(&"lexy_core".to_string()));
    assert!(names.contains(&"lexy_syntax".to_string()));
}
