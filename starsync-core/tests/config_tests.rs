//! Config loading tests for `starsync-core`.
//!
//! Each test gets an isolated `TempDir` home — no shared state, no real
//! environment lookups.

use std::collections::HashMap;
use std::fs;

use rstest::rstest;
use starsync_core::config::{self, ENV_GH_TOKEN, ENV_GH_USERNAME, ENV_NOTION_TABLE_URL, ENV_NOTION_TOKEN};
use starsync_core::ConfigError;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_home() -> TempDir {
    TempDir::new().expect("tempdir")
}

fn write_config(home: &TempDir, content: &str) {
    let path = config::config_path_at(home.path());
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write config");
}

fn env_of(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    move |k: &str| map.get(k).map(|v| v.to_string())
}

const FULL: &str = "\
github:
  username: octocat
  token: ghp_file
notion:
  token_v2: secret_file
  table_url: https://www.notion.so/me/Stars-0123456789abcdef0123456789abcdef
sync:
  delete: true
  fields:
    name: Repo
";

// ---------------------------------------------------------------------------
// File only
// ---------------------------------------------------------------------------

#[test]
fn loads_default_file() {
    let home = make_home();
    write_config(&home, FULL);
    let cfg = config::load_at(home.path(), None, env_of(&[])).expect("load");
    assert_eq!(cfg.github.username, "octocat");
    assert_eq!(cfg.notion.token.expose(), "secret_file");
    assert!(cfg.sync.delete);
    assert_eq!(cfg.sync.fields.name, "Repo");
    assert_eq!(cfg.sync.fields.url, "URL");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let home = make_home();
    let path = home.path().join("nope.yaml");
    let err = config::load_at(home.path(), Some(&path), env_of(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::ConfigNotFound { .. }));
}

#[test]
fn malformed_yaml_reports_path() {
    let home = make_home();
    write_config(&home, "github: [unclosed\n");
    let err = config::load_at(home.path(), None, env_of(&[])).unwrap_err();
    match err {
        ConfigError::Parse { path, .. } => assert!(path.ends_with("config.yaml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let home = make_home();
    write_config(&home, "gitlab: {}\n");
    let err = config::load_at(home.path(), None, env_of(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

// ---------------------------------------------------------------------------
// Environment only
// ---------------------------------------------------------------------------

#[test]
fn environment_alone_is_enough() {
    let home = make_home();
    let env = env_of(&[
        (ENV_GH_USERNAME, "octocat"),
        (ENV_GH_TOKEN, "ghp_env"),
        (ENV_NOTION_TOKEN, "secret_env"),
        (ENV_NOTION_TABLE_URL, "0123456789abcdef0123456789abcdef"),
    ]);
    let cfg = config::load_at(home.path(), None, env).expect("load");
    assert_eq!(cfg.github.token.expose(), "ghp_env");
    assert!(!cfg.sync.delete);
}

#[rstest]
#[case(ENV_GH_USERNAME, "github.username")]
#[case(ENV_GH_TOKEN, "github.token")]
#[case(ENV_NOTION_TOKEN, "notion.token")]
#[case(ENV_NOTION_TABLE_URL, "notion.table_url")]
fn each_required_key_is_reported(#[case] missing_env: &str, #[case] expected_key: &str) {
    let home = make_home();
    let all = [
        (ENV_GH_USERNAME, "octocat"),
        (ENV_GH_TOKEN, "ghp_env"),
        (ENV_NOTION_TOKEN, "secret_env"),
        (ENV_NOTION_TABLE_URL, "t"),
    ];
    let pairs: Vec<_> = all.into_iter().filter(|(k, _)| *k != missing_env).collect();
    let err = config::load_at(home.path(), None, env_of(&pairs)).unwrap_err();
    match err {
        ConfigError::MissingKey { key, env } => {
            assert_eq!(key, expected_key);
            assert_eq!(env, missing_env);
        }
        other => panic!("expected missing key, got {other:?}"),
    }
}

#[test]
fn secrets_never_appear_in_debug_output() {
    let home = make_home();
    write_config(&home, FULL);
    let cfg = config::load_at(home.path(), None, env_of(&[])).expect("load");
    let dump = format!("{cfg:?}");
    assert!(!dump.contains("ghp_file"));
    assert!(!dump.contains("secret_file"));
    assert!(dump.contains("octocat"));
}
