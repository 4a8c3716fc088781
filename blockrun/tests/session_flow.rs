//! End-to-end session tests: config resolution, manifest discovery, the
//! memory provider, and menu navigation driven by a scripted prompt.

use std::fs;
use std::path::Path;

use blockrun::error::EngineError;
use blockrun::start::{StartOptions, start_session};
use blockrun::test_support::{Reply, ScriptedPrompt};

const USERS_MANIFEST: &str = r#"
[[block]]
name = "list-users"
description = "All users"
query = "users.all"

[[block]]
name = "get-user"
query = "users.find"

[block.schema]
kind = "object"
fields = [{ name = "id", kind = "number" }]
"#;

/// Write a project (config + blocks + seed) into `root` and return the
/// config path.
fn write_project(root: &Path, seed_rows: usize) -> std::path::PathBuf {
    let blocks_dir = root.join("blocks");
    fs::create_dir_all(&blocks_dir).expect("mkdir blocks");
    fs::write(blocks_dir.join("users.toml"), USERS_MANIFEST).expect("write manifest");

    let rows: Vec<String> = (1..=seed_rows)
        .map(|i| format!("{{ \"id\": {i}, \"name\": \"user-{i}\" }}"))
        .collect();
    let seed_path = root.join("seed.json");
    fs::write(&seed_path, format!("{{ \"users\": [{}] }}", rows.join(", "))).expect("write seed");

    let config_path = root.join("blockrun.toml");
    fs::write(
        &config_path,
        format!(
            "root_dir = \"{}\"\nseed = \"{}\"\npage_size = 5\n",
            blocks_dir.display(),
            seed_path.display()
        ),
    )
    .expect("write config");
    config_path
}

fn options(config_path: &Path) -> StartOptions {
    StartOptions {
        config_path: Some(config_path.to_path_buf()),
        ..StartOptions::default()
    }
}

#[test]
fn empty_project_exits_cleanly() {
    let temp = tempfile::tempdir().expect("tempdir");
    let blocks_dir = temp.path().join("blocks");
    fs::create_dir_all(&blocks_dir).expect("mkdir");
    let config_path = temp.path().join("blockrun.toml");
    fs::write(
        &config_path,
        format!("root_dir = \"{}\"\n", blocks_dir.display()),
    )
    .expect("write config");

    let mut prompt = ScriptedPrompt::new([]);
    let code = start_session(options(&config_path), &mut prompt).expect("session");
    assert_eq!(code, 0);
    assert!(prompt.transcript.is_empty());
}

#[test]
fn discovered_blocks_run_against_the_seeded_provider() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = write_project(temp.path(), 2);

    // Single namespace, so the session opens it directly. Two seeded rows
    // fit one page, so the table renders without a navigation menu.
    let mut prompt = ScriptedPrompt::new([
        Reply::Select("list-users"),
        Reply::Select("Re-run"),
        Reply::Select("Go back to namespace"),
        Reply::Select("get-user"),
        Reply::Input("1"),
        Reply::Select("Main menu"),
    ]);
    let err = start_session(options(&config_path), &mut prompt).expect_err("script runs out");
    assert!(err.to_string().contains("script exhausted"));

    let expected = [
        "Select a block to run",
        "Choose an action:",
        "Choose an action:",
        "Select a block to run",
        "Enter value for id (number):",
        "Choose an action:",
        "Select a block to run",
    ];
    let transcript: Vec<&str> = prompt.transcript.iter().map(String::as_str).collect();
    assert_eq!(transcript, expected);
}

#[test]
fn large_results_page_through_navigation() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = write_project(temp.path(), 12);

    // 12 rows at page size 5 is three pages, so the renderer must offer
    // navigation before the post-run menu appears.
    let mut prompt = ScriptedPrompt::new([
        Reply::Select("list-users"),
        Reply::Select("[>]"),
        Reply::Select("[3]"),
        Reply::Select("Query menu"),
        Reply::Select("Main menu"),
    ]);
    let err = start_session(options(&config_path), &mut prompt).expect_err("script runs out");
    assert!(err.to_string().contains("script exhausted"));

    let navigations = prompt
        .transcript
        .iter()
        .filter(|m| m.as_str() == "Navigation:")
        .count();
    assert_eq!(navigations, 3);
}

#[test]
fn malformed_manifest_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = write_project(temp.path(), 1);
    fs::write(temp.path().join("blocks/broken.toml"), "[[block]\nname=").expect("write manifest");

    let mut prompt = ScriptedPrompt::new([]);
    let err = start_session(options(&config_path), &mut prompt).expect_err("should fail");
    let engine = err.downcast_ref::<EngineError>().expect("engine error");
    assert!(matches!(engine, EngineError::DiscoveryLoadFailure { .. }));
    // Discovery failed before any prompting.
    assert!(prompt.transcript.is_empty());
}

#[test]
fn missing_explicit_config_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut prompt = ScriptedPrompt::new([]);
    let err = start_session(options(&temp.path().join("absent.toml")), &mut prompt)
        .expect_err("should fail");
    let engine = err.downcast_ref::<EngineError>().expect("engine error");
    assert!(matches!(engine, EngineError::ConfigPathInvalid(_)));
}
