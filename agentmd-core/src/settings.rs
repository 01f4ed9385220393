//! Process-wide root paths, resolved once at startup.
//!
//! Precedence for each override: explicit flag > environment variable >
//! built-in default. [`Settings::from_env`] is the only place that reads the
//! process environment; everything below receives the resolved [`Settings`].

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths;

/// Environment variable overriding the config root directory.
pub const ROOT_ENV: &str = "AGENTMD_ROOT";
/// Environment variable overriding the template root directory.
pub const TEMPLATES_ENV: &str = "AGENTMD_TEMPLATES";

/// Default root directory name under `$HOME`.
pub const DEFAULT_ROOT_DIR: &str = ".agentmd";
/// Config document file name inside the root directory.
pub const CONFIG_FILE: &str = "agentmd.json";
/// Template root directory name inside the root directory.
pub const TEMPLATES_DIR: &str = "templates";

/// Explicit flag values, before environment fallback.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub root: Option<PathBuf>,
    pub templates: Option<PathBuf>,
}

/// Resolved root paths for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Config root; also the sanctioned root for the path-safety guard.
    pub root_dir: PathBuf,
    pub config_path: PathBuf,
    pub templates_dir: PathBuf,
    pub home: PathBuf,
}

impl Settings {
    /// Resolve against the real environment and `dirs::home_dir()`.
    pub fn from_env(overrides: SettingsOverrides, cwd: &Path) -> Result<Settings, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(Self::resolve(
            overrides,
            |key| std::env::var(key).ok(),
            &home,
            cwd,
        ))
    }

    /// Resolve settings from flags, an environment lookup, and the home/cwd pair.
    ///
    /// `env` is injected so tests never touch the real process environment.
    pub fn resolve<F>(overrides: SettingsOverrides, env: F, home: &Path, cwd: &Path) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |flag: Option<PathBuf>, key: &str| -> Option<PathBuf> {
            let raw = flag
                .map(|p| p.to_string_lossy().into_owned())
                .or_else(|| env(key).filter(|v| !v.trim().is_empty()))?;
            Some(paths::resolve_workspace(&raw, cwd, home))
        };

        let root_dir = lookup(overrides.root, ROOT_ENV)
            .unwrap_or_else(|| home.join(DEFAULT_ROOT_DIR));
        let templates_dir = lookup(overrides.templates, TEMPLATES_ENV)
            .unwrap_or_else(|| root_dir.join(TEMPLATES_DIR));

        Settings {
            config_path: root_dir.join(CONFIG_FILE),
            root_dir,
            templates_dir,
            home: home.to_path_buf(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
