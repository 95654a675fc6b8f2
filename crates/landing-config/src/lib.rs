//! Configuration management for the landing page generator.
//!
//! Parses `landing.toml` files with serde and provides auto-discovery of the
//! config file in parent directories. Every section is optional; the defaults
//! reproduce the Windows Wget landing page.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` and `${VAR:-default}`.
//!
//! Expanded fields:
//! - `markdown.link_base`
//! - `page.repository_url`
//! - `page.maintainer_url`
//! - `download.release_base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source file.
    pub source: Option<PathBuf>,
    /// Override output HTML file.
    pub output: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "landing.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input/output paths (relative strings from TOML).
    paths: PathsConfigRaw,
    /// Markdown rendering options.
    pub markdown: MarkdownConfig,
    /// Static page chrome.
    pub page: PageConfig,
    /// Download dialog options.
    pub download: DownloadConfig,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw paths configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    source: Option<String>,
    output: Option<String>,
}

/// Resolved input and output paths.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Markdown file to render.
    pub source: PathBuf,
    /// HTML file to write.
    pub output: PathBuf,
}

/// Markdown rendering options.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Render line breaks inside paragraphs as `<br>`.
    pub hard_breaks: bool,
    /// Base URL for repository-relative links (e.g. `.../blob/main`).
    pub link_base: Option<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            hard_breaks: true,
            link_base: None,
        }
    }
}

/// Header and footer content.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub subtitle: String,
    /// Target of the "View on GitHub" button.
    pub repository_url: String,
    pub maintainer: String,
    pub maintainer_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Windows Binaries of GNU Wget 1.24.5".to_owned(),
            subtitle:
                "A command-line tool for retrieving files via HTTP, HTTPS, and FTP protocols"
                    .to_owned(),
            repository_url: "https://github.com/KnugiHK/wget-on-windows".to_owned(),
            maintainer: "KnugiHK".to_owned(),
            maintainer_url: "https://github.com/KnugiHK".to_owned(),
        }
    }
}

/// One selectable button in the download dialog.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DownloadOption {
    /// Value used in the file name (`wget-{ssl}-{arch}.exe`).
    pub value: String,
    /// Button text.
    pub label: String,
}

impl DownloadOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Download dialog configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// URL the selected file name is appended to.
    pub release_base_url: String,
    pub architectures: Vec<DownloadOption>,
    pub ssl_libraries: Vec<DownloadOption>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            release_base_url:
                "https://github.com/KnugiHK/wget-on-windows/releases/latest/download".to_owned(),
            architectures: vec![
                DownloadOption::new("x64", "x64 (64-bit)"),
                DownloadOption::new("x86", "x86 (32-bit)"),
            ],
            ssl_libraries: vec![
                DownloadOption::new("gnutls", "GnuTLS"),
                DownloadOption::new("openssl", "OpenSSL"),
            ],
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
        /// Config field path (e.g., "`page.repository_url`").
        field: String,
        /// Error message (e.g., "${`OWNER`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
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

/// Require a non-empty list of options whose values are safe in a file name.
fn require_options(options: &[DownloadOption], field: &str) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} needs at least one option"
        )));
    }
    for (i, option) in options.iter().enumerate() {
        require_non_empty(&option.label, &format!("{field}[{i}].label"))?;
        let valid = !option.value.is_empty()
            && option
                .value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigError::Validation(format!(
                "{field}[{i}].value must be non-empty and contain only letters, digits, '-' or '_'"
            )));
        }
        if options[..i].iter().any(|o| o.value == option.value) {
            return Err(ConfigError::Validation(format!(
                "{field} contains duplicate value {:?}",
                option.value
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `landing.toml` in current directory and parents.
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
        if let Some(source) = &settings.source {
            self.paths_resolved.source.clone_from(source);
        }
        if let Some(output) = &settings.output {
            self.paths_resolved.output.clone_from(output);
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
        let mut config = Self {
            paths: PathsConfigRaw::default(),
            markdown: MarkdownConfig::default(),
            page: PageConfig::default(),
            download: DownloadConfig::default(),
            paths_resolved: PathsConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
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
        self.validate_page()?;
        self.validate_download()?;
        if let Some(link_base) = &self.markdown.link_base {
            require_http_url(link_base, "markdown.link_base")?;
        }
        Ok(())
    }

    fn validate_page(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.page.title, "page.title")?;
        require_http_url(&self.page.repository_url, "page.repository_url")?;
        require_http_url(&self.page.maintainer_url, "page.maintainer_url")?;
        Ok(())
    }

    fn validate_download(&self) -> Result<(), ConfigError> {
        require_http_url(&self.download.release_base_url, "download.release_base_url")?;
        require_options(&self.download.architectures, "download.architectures")?;
        require_options(&self.download.ssl_libraries, "download.ssl_libraries")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref link_base) = self.markdown.link_base {
            self.markdown.link_base = Some(expand::expand_env(link_base, "markdown.link_base")?);
        }
        self.page.repository_url =
            expand::expand_env(&self.page.repository_url, "page.repository_url")?;
        self.page.maintainer_url =
            expand::expand_env(&self.page.maintainer_url, "page.maintainer_url")?;
        self.download.release_base_url =
            expand::expand_env(&self.download.release_base_url, "download.release_base_url")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            source: resolve(self.paths.source.as_deref(), "README.md"),
            output: resolve(self.paths.output.as_deref(), "docs/index.html"),
        };
    }
}
