//! Configuration management for quire.
//!
//! Parses `quire.toml` configuration files with serde and provides
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
//! A bare `$name` is not a reference and is kept as written.
//!
//! Expanded fields:
//! - `content.root`
//! - `feed.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root directory.
    pub root: Option<PathBuf>,
    /// Override the number of feed entries.
    pub feed_limit: Option<usize>,
    /// Override the feed output file.
    pub feed_output: Option<PathBuf>,
    /// Override the staleness check flag.
    pub check_stale: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Feed configuration (paths are relative strings from TOML).
    feed: FeedConfigRaw,
    /// Placeholder values for fields missing from a page file.
    pub defaults: DefaultsConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved feed configuration (set after loading).
    #[serde(skip)]
    pub feed_resolved: FeedConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    index: Option<String>,
    extension: Option<String>,
    private_prefix: Option<String>,
    cache_file: Option<String>,
    check_stale: Option<bool>,
}

/// Resolved content configuration with an absolute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Content root directory.
    pub root: PathBuf,
    /// Stem of the index page in every directory (`index` -> `index.md`).
    pub index: String,
    /// Content file extension, without the dot.
    pub extension: String,
    /// Files starting with this prefix are excluded from listings.
    pub private_prefix: String,
    /// Name of the per-directory navigation record.
    pub cache_file: String,
    /// Rebuild navigation records older than the content they describe.
    pub check_stale: bool,
}

impl ContentConfig {
    /// Content configuration with stock layout values rooted at `root`.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            index: "index".to_owned(),
            extension: "md".to_owned(),
            private_prefix: "_".to_owned(),
            cache_file: "_nav_cache".to_owned(),
            check_stale: false,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_root(PathBuf::from("markdown"))
    }
}

/// Raw feed configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FeedConfigRaw {
    limit: Option<usize>,
    base_url: Option<String>,
    output: Option<String>,
}

/// Resolved feed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Maximum number of entries in the feed.
    pub limit: usize,
    /// Absolute site URL used for feed and entry ids.
    pub base_url: String,
    /// File the rendered feed is written to.
    pub output: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FEED_LIMIT,
            base_url: DEFAULT_BASE_URL.to_owned(),
            output: PathBuf::from("atom.xml"),
        }
    }
}

const DEFAULT_FEED_LIMIT: usize = 20;
const DEFAULT_BASE_URL: &str = "http://www.example.com";

/// Placeholder values for page fields missing from the source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub template: String,
    pub image: String,
    pub thumbnail: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: "Generic, Untitled Page".to_owned(),
            description: "No description available.".to_owned(),
            keywords: "keywords, key phrases".to_owned(),
            template: String::new(),
            image: String::new(),
            thumbnail: String::new(),
        }
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
        /// Config field path (e.g., "`content.root`").
        field: String,
        /// Error message (e.g., "${`CONTENT_ROOT`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quire.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.content_resolved.root.clone_from(root);
        }
        if let Some(limit) = settings.feed_limit {
            self.feed_resolved.limit = limit;
        }
        if let Some(output) = &settings.feed_output {
            self.feed_resolved.output.clone_from(output);
        }
        if let Some(check_stale) = settings.check_stale {
            self.content_resolved.check_stale = check_stale;
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
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            feed: FeedConfigRaw::default(),
            defaults: DefaultsConfig::default(),
            content_resolved: ContentConfig::with_root(base.join("markdown")),
            feed_resolved: FeedConfig {
                output: base.join("atom.xml"),
                ..FeedConfig::default()
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

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.validate_feed()?;
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;
        require_non_empty(&content.index, "content.index")?;
        require_non_empty(&content.extension, "content.extension")?;
        require_non_empty(&content.cache_file, "content.cache_file")?;

        if content.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "content.extension must not start with a dot".to_owned(),
            ));
        }

        // The record lives beside the pages it lists and must never be one
        let cache_file = content.cache_file.as_str();
        if cache_file.contains(['/', '\\']) || cache_file == "." || cache_file == ".." {
            return Err(ConfigError::Validation(
                "content.cache_file must be a plain file name".to_owned(),
            ));
        }
        if cache_file.ends_with(&format!(".{}", content.extension)) {
            return Err(ConfigError::Validation(format!(
                "content.cache_file must not use the content extension .{}",
                content.extension
            )));
        }

        Ok(())
    }

    fn validate_feed(&self) -> Result<(), ConfigError> {
        if self.feed_resolved.limit == 0 {
            return Err(ConfigError::Validation(
                "feed.limit must be greater than 0".to_owned(),
            ));
        }
        require_http_url(&self.feed_resolved.base_url, "feed.base_url")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.content.root {
            self.content.root = Some(expand::expand_env(root, "content.root")?);
        }
        if let Some(ref base_url) = self.feed.base_url {
            self.feed.base_url = Some(expand::expand_env(base_url, "feed.base_url")?);
        }
        Ok(())
    }

    /// Resolve raw values and relative paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let stock = ContentConfig::default();
        let raw = &self.content;

        self.content_resolved = ContentConfig {
            root: resolve(raw.root.as_deref(), "markdown"),
            index: raw.index.clone().unwrap_or(stock.index),
            extension: raw.extension.clone().unwrap_or(stock.extension),
            private_prefix: raw.private_prefix.clone().unwrap_or(stock.private_prefix),
            cache_file: raw.cache_file.clone().unwrap_or(stock.cache_file),
            check_stale: raw.check_stale.unwrap_or(stock.check_stale),
        };

        self.feed_resolved = FeedConfig {
            limit: self.feed.limit.unwrap_or(DEFAULT_FEED_LIMIT),
            base_url: self
                .feed
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            output: resolve(self.feed.output.as_deref(), "atom.xml"),
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
        assert_eq!(
            config.content_resolved.root,
            PathBuf::from("/test/markdown")
        );
        assert_eq!(config.content_resolved.index, "index");
        assert_eq!(config.content_resolved.extension, "md");
        assert_eq!(config.content_resolved.private_prefix, "_");
        assert_eq!(config.content_resolved.cache_file, "_nav_cache");
        assert!(!config.content_resolved.check_stale);
        assert_eq!(config.feed_resolved.limit, 20);
        assert_eq!(config.feed_resolved.output, PathBuf::from("/test/atom.xml"));
        assert_eq!(config.defaults.title, "Generic, Untitled Page");
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/site"));
        assert_eq!(config.content_resolved.root, PathBuf::from("/site/markdown"));
        assert_eq!(config.feed_resolved.base_url, "http://www.example.com");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_defaults_section() {
        let toml = r#"
[defaults]
title = "Untitled"
template = "page.html"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.title, "Untitled");
        assert_eq!(config.defaults.template, "page.html");
        // Unset fields keep their stock placeholder
        assert_eq!(config.defaults.description, "No description available.");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
root = "pages"
index = "home"
extension = "txt"
cache_file = ".nav.json"
check_stale = true

[feed]
limit = 5
base_url = "https://blog.example.org/"
output = "public/atom.xml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved,
            ContentConfig {
                root: PathBuf::from("/project/pages"),
                index: "home".to_owned(),
                extension: "txt".to_owned(),
                private_prefix: "_".to_owned(),
                cache_file: ".nav.json".to_owned(),
                check_stale: true,
            }
        );
        assert_eq!(
            config.feed_resolved,
            FeedConfig {
                limit: 5,
                base_url: "https://blog.example.org".to_owned(),
                output: PathBuf::from("/project/public/atom.xml"),
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.feed_resolved.limit = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("feed.limit"));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.feed_resolved.base_url = "ftp://example.com".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.base_url"));
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.extension = ".md".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_index() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.index = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.index"));
    }

    #[test]
    fn test_validate_rejects_cache_file_colliding_with_content() {
        for name in ["index.md", "nav.md", ".md"] {
            let mut config = Config::default_with_base(Path::new("/test"));
            config.content_resolved.cache_file = name.to_owned();

            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("content.cache_file"), "{name}");
        }
    }

    #[test]
    fn test_validate_rejects_cache_file_outside_directory() {
        for name in ["../escape", "sub/nav", "..", "a\\b"] {
            let mut config = Config::default_with_base(Path::new("/test"));
            config.content_resolved.cache_file = name.to_owned();

            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("plain file name"), "{name}");
        }
    }

    #[test]
    fn test_validate_accepts_dotted_cache_file() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.cache_file = ".nav.json".to_owned();
        config.validate().unwrap();
    }

    #[test]
    fn test_load_rejects_cache_file_named_like_index() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("quire.toml");
        std::fs::write(&path, "[content]\ncache_file = \"index.md\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_cli_settings_root() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            root: Some(PathBuf::from("/custom/markdown")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.content_resolved.root,
            PathBuf::from("/custom/markdown")
        );
        assert_eq!(config.feed_resolved.limit, 20); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            feed_limit: Some(3),
            feed_output: Some(PathBuf::from("/out/feed.xml")),
            check_stale: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.feed_resolved.limit, 3);
        assert_eq!(config.feed_resolved.output, PathBuf::from("/out/feed.xml"));
        assert!(config.content_resolved.check_stale);
    }

    #[test]
    fn test_expand_env_vars_content_root() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUIRE_TEST_ROOT", "site/markdown");
        }

        let toml = r#"
[content]
root = "${QUIRE_TEST_ROOT}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved.root,
            PathBuf::from("/project/site/markdown")
        );

        unsafe {
            std::env::remove_var("QUIRE_TEST_ROOT");
        }
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/quire.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("quire.toml");
        std::fs::write(&path, "[feed]\nlimit = 7\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.root, tmp.path().join("markdown"));
        assert_eq!(config.feed_resolved.limit, 7);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("quire.toml");
        std::fs::write(&path, "[feed]\nlimit = 0\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
