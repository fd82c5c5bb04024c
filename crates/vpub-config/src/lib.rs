//! Configuration management for vpub.
//!
//! Parses `vpub.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `vercel.token`
//! - `vercel.project`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vpub.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override vault root directory.
    pub vault_dir: Option<PathBuf>,
    /// Override Vercel API token.
    pub token: Option<String>,
    /// Override Vercel project name.
    pub project: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault configuration (paths are relative strings from TOML).
    vault: VaultConfigRaw,
    /// Vercel configuration.
    pub vercel: Option<VercelConfig>,

    /// Resolved vault configuration (set after loading).
    #[serde(skip)]
    pub vault_resolved: VaultConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw vault configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VaultConfigRaw {
    dir: Option<String>,
}

/// Resolved vault configuration with absolute paths.
#[derive(Debug, Default)]
pub struct VaultConfig {
    /// Vault root directory.
    pub dir: PathBuf,
    /// Project state directory (.vpub/).
    pub state_dir: PathBuf,
}

impl VaultConfig {
    /// Path of the durable published-page registry file.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.state_dir.join("published.json")
    }
}

/// Vercel configuration.
#[derive(Debug, Deserialize)]
pub struct VercelConfig {
    /// Bearer token for the Vercel API.
    pub token: String,
    /// Vercel project name; also the deployment name.
    pub project: String,
}

impl VercelConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.token, "vercel.token")?;
        require_non_empty(&self.project, "vercel.project")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`vercel.token`").
        field: String,
        /// Error message (e.g., "${`VERCEL_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vpub.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(vault_dir) = &settings.vault_dir {
            self.vault_resolved.dir.clone_from(vault_dir);
        }
        // A full credential pair on the command line stands in for a
        // missing [vercel] section.
        if self.vercel.is_none() && settings.token.is_some() && settings.project.is_some() {
            self.vercel = Some(VercelConfig {
                token: String::new(),
                project: String::new(),
            });
        }
        if let Some(vercel) = &mut self.vercel {
            if let Some(token) = &settings.token {
                vercel.token.clone_from(token);
            }
            if let Some(project) = &settings.project {
                vercel.project.clone_from(project);
            }
        }
    }

    /// Get validated Vercel configuration.
    ///
    /// Returns the Vercel config if the `[vercel]` section is present
    /// and all fields are valid. Use this instead of accessing the
    /// `vercel` field directly when the command requires the API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_vercel(&self) -> Result<&VercelConfig, ConfigError> {
        let vercel = self
            .vercel
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("[vercel] section required in config".into()))?;
        vercel.validate()?;
        Ok(vercel)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            vault: VaultConfigRaw::default(),
            vercel: None,
            vault_resolved: VaultConfig {
                dir: base.to_path_buf(),
                state_dir: base.join(".vpub"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut vercel) = self.vercel {
            vercel.token = expand::expand_env(&vercel.token, "vercel.token")?;
            vercel.project = expand::expand_env(&vercel.project, "vercel.project")?;
        }
        Ok(())
    }

    /// Resolve raw relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let dir = match &self.vault.dir {
            Some(dir) => {
                let p = Path::new(dir);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    config_dir.join(p)
                }
            }
            None => config_dir.to_path_buf(),
        };
        self.vault_resolved = VaultConfig {
            dir,
            state_dir: config_dir.join(".vpub"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/vpub.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[vault]
dir = "notes"

[vercel]
token = "tok_123"
project = "my-site"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.vault_resolved.dir, dir.path().join("notes"));
        assert_eq!(config.vault_resolved.state_dir, dir.path().join(".vpub"));
        let vercel = config.require_vercel().unwrap();
        assert_eq!(vercel.token, "tok_123");
        assert_eq!(vercel.project, "my-site");
    }

    #[test]
    fn test_vault_dir_defaults_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.vault_resolved.dir, dir.path());
    }

    #[test]
    fn test_require_vercel_missing_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");

        let config = Config::load(Some(&path), None).unwrap();
        let err = config.require_vercel().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_require_vercel_empty_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[vercel]
token = ""
project = "my-site"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        let err = config.require_vercel().unwrap_err();
        assert!(err.to_string().contains("vercel.token"));
    }

    #[test]
    fn test_cli_settings_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[vercel]
token = "tok_123"
project = "my-site"
"#,
        );

        let settings = CliSettings {
            project: Some("other-site".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.require_vercel().unwrap().project, "other-site");
    }

    #[test]
    fn test_cli_settings_supply_whole_vercel_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");

        let settings = CliSettings {
            token: Some("tok_cli".to_owned()),
            project: Some("cli-site".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        let vercel = config.require_vercel().unwrap();
        assert_eq!(vercel.token, "tok_cli");
        assert_eq!(vercel.project, "cli-site");
    }

    #[test]
    fn test_env_expansion_in_token() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("VPUB_CONF_TOKEN", "tok_env");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[vercel]
token = "${VPUB_CONF_TOKEN}"
project = "site"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.require_vercel().unwrap().token, "tok_env");
        unsafe {
            std::env::remove_var("VPUB_CONF_TOKEN");
        }
    }

    #[test]
    fn test_registry_path() {
        let vault = VaultConfig {
            dir: PathBuf::from("/v"),
            state_dir: PathBuf::from("/v/.vpub"),
        };
        assert_eq!(vault.registry_path(), PathBuf::from("/v/.vpub/published.json"));
    }
}
