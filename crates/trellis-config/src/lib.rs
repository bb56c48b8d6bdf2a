//! Configuration management for trellis.
//!
//! Parses `trellis.toml` configuration files with serde and provides
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
//! - `site.source_dir`, `site.output_dir`, `site.template`, `site.outline`
//! - `converters.markdown`, `converters.smartypants`
//! - `converters.haml`, `converters.kramdown`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override page source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override navigation outline document.
    pub outline: Option<PathBuf>,
    /// Override converter timeout.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "trellis.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site layout (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Stylesheet handling.
    pub stylesheet: StylesheetConfig,
    /// External converter commands.
    pub converters: ConvertersConfig,
    /// Breadcrumb and table of contents rendering.
    pub navigation: NavigationConfig,
    /// Section cross-references.
    pub xref: XrefConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    template: Option<String>,
    outline: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory containing page sources and `styles/`.
    pub source_dir: PathBuf,
    /// Directory the rendered site is written to.
    pub output_dir: PathBuf,
    /// Default page template.
    pub template: Option<PathBuf>,
    /// Navigation outline document (OPML or indented text).
    pub outline: Option<PathBuf>,
}

/// Stylesheet configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Identifier of the one stylesheet compiled as SCSS.
    pub scss_sheet: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            scss_sheet: "s2".to_owned(),
        }
    }
}

/// External converter configuration.
///
/// Each command is run as a filter: page text on stdin, converted text on stdout.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertersConfig {
    /// Seconds a converter process may run before it is killed.
    pub timeout_secs: u64,
    /// Markdown command. The built-in converter is used when unset.
    pub markdown: Option<String>,
    /// SmartyPants command.
    pub smartypants: Option<String>,
    /// Haml command.
    pub haml: Option<String>,
    /// Kramdown command.
    pub kramdown: Option<String>,
}

impl Default for ConvertersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            markdown: None,
            smartypants: None,
            haml: None,
            kramdown: None,
        }
    }
}

impl ConvertersConfig {
    /// Converter timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What to render for a page that is missing from the outline.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UnlistedPage {
    /// Render the whole outline unpruned.
    #[default]
    FullTree,
    /// Render nothing.
    Omit,
}

/// Navigation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Name of the table of contents page.
    pub toc_page: String,
    /// Behavior for pages absent from the outline.
    pub unlisted_page: UnlistedPage,
    /// Emit links relative to the current page.
    pub relative_links: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            toc_page: "toc".to_owned(),
            unlisted_page: UnlistedPage::FullTree,
            relative_links: false,
        }
    }
}

/// How a repeated cross-reference slug is handled.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Collisions {
    /// Last registration wins silently.
    #[default]
    Overwrite,
    /// Last registration wins, with a warning.
    Warn,
    /// The repeated heading fails the page.
    Error,
}

/// Cross-reference configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct XrefConfig {
    /// Prefix for section slugs.
    pub prefix: String,
    /// Collision policy.
    pub collisions: Collisions,
}

impl Default for XrefConfig {
    fn default() -> Self {
        Self {
            prefix: "SEC".to_owned(),
            collisions: Collisions::Overwrite,
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
        /// Config field path (e.g., "`converters.smartypants`").
        field: String,
        /// Error message (e.g., "${`TM_SUPPORT_PATH`} not set").
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
    /// Otherwise, searches for `trellis.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(outline) = &settings.outline {
            self.site_resolved.outline = Some(outline.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.converters.timeout_secs = timeout_secs;
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
            site: SiteConfigRaw::default(),
            stylesheet: StylesheetConfig::default(),
            converters: ConvertersConfig::default(),
            navigation: NavigationConfig::default(),
            xref: XrefConfig::default(),
            site_resolved: SiteConfig {
                source_dir: base.join("pages"),
                output_dir: base.join("site"),
                template: None,
                outline: None,
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
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.stylesheet.scss_sheet, "stylesheet.scss_sheet")?;
        require_non_empty(&self.navigation.toc_page, "navigation.toc_page")?;
        self.validate_converters()?;
        self.validate_xref()?;
        Ok(())
    }

    fn validate_converters(&self) -> Result<(), ConfigError> {
        if self.converters.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "converters.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        for (field, command) in [
            ("converters.markdown", &self.converters.markdown),
            ("converters.smartypants", &self.converters.smartypants),
            ("converters.haml", &self.converters.haml),
            ("converters.kramdown", &self.converters.kramdown),
        ] {
            if let Some(command) = command {
                require_non_empty(command.trim(), field)?;
            }
        }
        Ok(())
    }

    fn validate_xref(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.xref.prefix, "xref.prefix")?;
        // Slugs must stay valid HTML ids and survive their own normalization.
        if !self.xref.prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Validation(
                "xref.prefix must contain only ASCII letters".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.site.source_dir, "site.source_dir")?;
        expand::expand_opt(&mut self.site.output_dir, "site.output_dir")?;
        expand::expand_opt(&mut self.site.template, "site.template")?;
        expand::expand_opt(&mut self.site.outline, "site.outline")?;

        expand::expand_opt(&mut self.converters.markdown, "converters.markdown")?;
        expand::expand_opt(&mut self.converters.smartypants, "converters.smartypants")?;
        expand::expand_opt(&mut self.converters.haml, "converters.haml")?;
        expand::expand_opt(&mut self.converters.kramdown, "converters.kramdown")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            source_dir: resolve(self.site.source_dir.as_deref(), "pages"),
            output_dir: resolve(self.site.output_dir.as_deref(), "site"),
            template: self.site.template.as_deref().map(|t| config_dir.join(t)),
            outline: self.site.outline.as_deref().map(|o| config_dir.join(o)),
        };
    }
}
