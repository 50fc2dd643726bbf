//! Configuration management for Lore.
//!
//! Parses `lore.toml` configuration files with serde and provides
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
//! - `server.host`
//! - `wiki.source_dir`
//! - `wiki.structure_file`
//! - `wiki.assets_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content documents directory.
    pub source_dir: Option<PathBuf>,
    /// Override structure document path.
    pub structure_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lore.toml";

/// Default structure document name.
pub const DEFAULT_STRUCTURE_FILE: &str = "Wiki-Structure.json";

/// Default suffix appended to a logical path to form a content address.
pub const DEFAULT_CONTENT_SUFFIX: &str = ".md";

/// Default reserved prefix marking wiki-internal links.
pub const DEFAULT_LINK_PREFIX: &str = "#sectionWiki/";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Wiki configuration (paths are relative strings from TOML).
    #[serde(default)]
    wiki: WikiConfigRaw,

    /// Resolved wiki configuration (set after loading).
    #[serde(skip)]
    pub wiki_resolved: WikiConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw wiki configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WikiConfigRaw {
    source_dir: Option<String>,
    structure_file: Option<String>,
    content_suffix: Option<String>,
    link_prefix: Option<String>,
    assets_dir: Option<String>,
}

/// Resolved wiki configuration with absolute paths.
#[derive(Debug, Default)]
pub struct WikiConfig {
    /// Directory holding the markdown content documents.
    pub source_dir: PathBuf,
    /// Structure document describing the category tree.
    pub structure_file: PathBuf,
    /// Suffix appended to a logical path to form its content address.
    pub content_suffix: String,
    /// Reserved href prefix for wiki-internal links.
    pub link_prefix: String,
    /// Directory with frontend assets served by the HTTP server.
    pub assets_dir: PathBuf,
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
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`LORE_HOST`} not set").
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
    /// Otherwise, searches for `lore.toml` in current directory and parents.
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
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.wiki_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(structure_file) = &settings.structure_file {
            self.wiki_resolved.structure_file.clone_from(structure_file);
        }
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
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            wiki: WikiConfigRaw::default(),
            wiki_resolved: WikiConfig {
                source_dir: base.join("wiki"),
                structure_file: base.join(DEFAULT_STRUCTURE_FILE),
                content_suffix: DEFAULT_CONTENT_SUFFIX.to_owned(),
                link_prefix: DEFAULT_LINK_PREFIX.to_owned(),
                assets_dir: base.join("public"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_wiki()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_wiki(&self) -> Result<(), ConfigError> {
        let wiki = &self.wiki_resolved;
        require_non_empty(&wiki.content_suffix, "wiki.content_suffix")?;
        if !wiki.content_suffix.starts_with('.') {
            return Err(ConfigError::Validation(
                "wiki.content_suffix must start with '.'".to_owned(),
            ));
        }
        require_non_empty(&wiki.link_prefix, "wiki.link_prefix")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        let wiki = &mut self.wiki;
        if let Some(ref dir) = wiki.source_dir {
            wiki.source_dir = Some(expand::expand_env(dir, "wiki.source_dir")?);
        }
        if let Some(ref file) = wiki.structure_file {
            wiki.structure_file = Some(expand::expand_env(file, "wiki.structure_file")?);
        }
        if let Some(ref dir) = wiki.assets_dir {
            wiki.assets_dir = Some(expand::expand_env(dir, "wiki.assets_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.wiki_resolved = WikiConfig {
            source_dir: resolve(self.wiki.source_dir.as_deref(), "wiki"),
            structure_file: resolve(
                self.wiki.structure_file.as_deref(),
                DEFAULT_STRUCTURE_FILE,
            ),
            content_suffix: self
                .wiki
                .content_suffix
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_SUFFIX.to_owned()),
            link_prefix: self
                .wiki
                .link_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_LINK_PREFIX.to_owned()),
            assets_dir: resolve(self.wiki.assets_dir.as_deref(), "public"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.wiki_resolved.source_dir, PathBuf::from("/test/wiki"));
        assert_eq!(
            config.wiki_resolved.structure_file,
            PathBuf::from("/test/Wiki-Structure.json")
        );
        assert_eq!(config.wiki_resolved.content_suffix, ".md");
        assert_eq!(config.wiki_resolved.link_prefix, "#sectionWiki/");
        assert_eq!(config.wiki_resolved.assets_dir, PathBuf::from("/test/public"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r##"
[wiki]
source_dir = "Documents/md"
structure_file = "Json/Wiki-Structure.json"
content_suffix = ".markdown"
link_prefix = "#wiki/"
"##;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.wiki_resolved.source_dir,
            PathBuf::from("/project/Documents/md")
        );
        assert_eq!(
            config.wiki_resolved.structure_file,
            PathBuf::from("/project/Json/Wiki-Structure.json")
        );
        assert_eq!(config.wiki_resolved.content_suffix, ".markdown");
        assert_eq!(config.wiki_resolved.link_prefix, "#wiki/");
        assert_eq!(
            config.wiki_resolved.assets_dir,
            PathBuf::from("/project/public")
        );
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[wiki]\nsource_dir = \"pages\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.wiki_resolved.source_dir, dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/lore.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_apply_cli_settings_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/wiki")),
            structure_file: Some(PathBuf::from("/custom/tree.json")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.wiki_resolved.source_dir,
            PathBuf::from("/custom/wiki")
        );
        assert_eq!(
            config.wiki_resolved.structure_file,
            PathBuf::from("/custom/tree.json")
        );
        assert_eq!(config.wiki_resolved.assets_dir, PathBuf::from("/test/public"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, config_before.server.host);
        assert_eq!(config.server.port, config_before.server.port);
        assert_eq!(
            config.wiki_resolved.source_dir,
            config_before.wiki_resolved.source_dir
        );
    }

    #[test]
    fn test_expand_env_vars_source_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LORE_TEST_WIKI_DIR", "/srv/wiki");
        }

        let toml = r#"
[wiki]
source_dir = "${LORE_TEST_WIKI_DIR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.wiki_resolved.source_dir, PathBuf::from("/srv/wiki"));

        unsafe {
            std::env::remove_var("LORE_TEST_WIKI_DIR");
        }
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_content_suffix_without_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.wiki_resolved.content_suffix = "md".to_owned();
        assert_validation_error(&config, &["content_suffix", "'.'"]);
    }

    #[test]
    fn test_validate_link_prefix_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.wiki_resolved.link_prefix = String::new();
        assert_validation_error(&config, &["link_prefix", "empty"]);
    }
}
