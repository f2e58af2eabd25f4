//! YAML configuration with environment overrides.
//!
//! # Storage layout
//!
//! ```text
//! ~/.starsync/
//!   config.yaml   (mode 0600, written by `starsync config init`)
//! ```
//!
//! # Resolution
//!
//! Values from the file are overridden by `GH_USERNAME`, `GH_TOKEN`,
//! `NOTION_TOKEN`, `NOTION_TABLE_URL` and `STARSYNC_DELETE`. Empty values
//! count as unset. A missing default file is fine as long as the
//! environment supplies every required key.
//!
//! # API pattern
//!
//! As elsewhere in the workspace, functions that touch the home directory
//! come in two forms: `fn_at(home: &Path, …)` for tests, and `fn(…)` which
//! derives home from `dirs::home_dir()`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{FieldNames, Secret};

pub const ENV_GH_USERNAME: &str = "GH_USERNAME";
pub const ENV_GH_TOKEN: &str = "GH_TOKEN";
pub const ENV_NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const ENV_NOTION_TABLE_URL: &str = "NOTION_TABLE_URL";
pub const ENV_DELETE: &str = "STARSYNC_DELETE";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TEMPLATE: &str = "\
github:
  username: \"\"
  token: \"\"
notion:
  token: \"\"
  table_url: \"\"
sync:
  delete: false
  timeout_secs: 30
  fields:
    name: Name
    url: URL
    description: Description
";

// ---------------------------------------------------------------------------
// 1. File shape
// ---------------------------------------------------------------------------

/// The config file as written by the user; every key optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub notion: NotionSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubSection {
    pub username: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotionSection {
    #[serde(alias = "token_v2")]
    pub token: Option<String>,
    pub table_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncSection {
    pub delete: Option<bool>,
    #[serde(default)]
    pub fields: FieldNames,
    pub timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// 2. Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub username: String,
    pub token: Secret,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: Secret,
    pub table_url: String,
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Remove rows whose URL no longer matches a star.
    pub delete: bool,
    pub fields: FieldNames,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

/// What commands that only read stars need: no Notion section.
#[derive(Debug, Clone)]
pub struct StarsConfig {
    pub github: GithubConfig,
    pub sync: SyncSettings,
}

/// Fully validated configuration; every required key is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GithubConfig,
    pub notion: NotionConfig,
    pub sync: SyncSettings,
}

/// Look up `env_name`, falling back to the file value; empty counts as unset.
fn pick<F>(
    env: &F,
    env_name: &'static str,
    from_file: Option<String>,
    key: &'static str,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    env(env_name)
        .filter(|v| !v.trim().is_empty())
        .or_else(|| from_file.filter(|v| !v.trim().is_empty()))
        .ok_or(ConfigError::MissingKey { key, env: env_name })
}

impl GithubConfig {
    pub fn resolve<F>(section: GithubSection, env: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            username: pick(env, ENV_GH_USERNAME, section.username, "github.username")?,
            token: Secret::new(pick(env, ENV_GH_TOKEN, section.token, "github.token")?),
        })
    }
}

impl NotionConfig {
    pub fn resolve<F>(section: NotionSection, env: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            token: Secret::new(pick(env, ENV_NOTION_TOKEN, section.token, "notion.token")?),
            table_url: pick(env, ENV_NOTION_TABLE_URL, section.table_url, "notion.table_url")?,
        })
    }
}

impl SyncSettings {
    pub fn resolve<F>(section: SyncSection, env: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let delete = match env(ENV_DELETE).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: "sync.delete",
                value: raw,
            })?,
            None => section.delete.unwrap_or(false),
        };

        let fields = section.fields;
        for (key, value) in [
            ("sync.fields.name", &fields.name),
            ("sync.fields.url", &fields.url),
            ("sync.fields.description", &fields.description),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: value.clone(),
                });
            }
        }

        let timeout_secs = section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync.timeout_secs",
                value: timeout_secs.to_string(),
            });
        }

        Ok(Self {
            delete,
            fields,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Config {
    /// Merge `file` with overrides looked up through `env`, then validate.
    pub fn resolve<F>(file: ConfigFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            github: GithubConfig::resolve(file.github, &env)?,
            notion: NotionConfig::resolve(file.notion, &env)?,
            sync: SyncSettings::resolve(file.sync, &env)?,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// 3. Paths
// ---------------------------------------------------------------------------

/// `<home>/.starsync/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".starsync").join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 4. Load
// ---------------------------------------------------------------------------

/// Parse the config file at `path`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read `explicit` (must exist) or the default file under `home` (may be absent).
pub fn read_at(home: &Path, explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match explicit {
        Some(path) => read_file(path),
        None => {
            let path = config_path_at(home);
            if path.exists() {
                read_file(&path)
            } else {
                tracing::debug!(path = %path.display(), "no config file; using environment only");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Load the full configuration, applying `env` overrides.
pub fn load_at<F>(home: &Path, explicit: Option<&Path>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Config::resolve(read_at(home, explicit)?, env)
}

/// Load the GitHub and sync sections; enough for commands that never touch the table.
pub fn load_stars_at<F>(
    home: &Path,
    explicit: Option<&Path>,
    env: F,
) -> Result<StarsConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = read_at(home, explicit)?;
    Ok(StarsConfig {
        github: GithubConfig::resolve(file.github, &env)?,
        sync: SyncSettings::resolve(file.sync, &env)?,
    })
}

/// `load_at` convenience wrapper reading the process environment.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    load_at(&home()?, explicit, process_env)
}

/// `load_stars_at` convenience wrapper reading the process environment.
pub fn load_stars(explicit: Option<&Path>) -> Result<StarsConfig, ConfigError> {
    load_stars_at(&home()?, explicit, process_env)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

// ---------------------------------------------------------------------------
// 5. Init (atomic)
// ---------------------------------------------------------------------------

/// Write a blank template to `<home>/.starsync/config.yaml`.
///
/// Write flow: `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// Refuses to replace an existing file unless `force` is set; returns the
/// path written.
pub fn init_at(home: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path });
    }
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp = path.with_file_name("config.yaml.tmp");
    std::fs::write(&tmp, TEMPLATE)?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

/// `init_at` convenience wrapper.
pub fn init(force: bool) -> Result<PathBuf, ConfigError> {
    init_at(&home()?, force)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
