//! Build session configuration.

use std::path::PathBuf;
use std::time::Duration;

use trellis_config::{Collisions, Config, UnlistedPage};
use trellis_convert::CommandSettings;
use trellis_nav::{CollisionPolicy, DEFAULT_PREFIX, NavOptions};

/// Default identifier of the SCSS stylesheet.
pub const DEFAULT_SCSS_SHEET: &str = "s2";

/// Everything a [`BuildSession`](crate::BuildSession) needs to know.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding page sources.
    pub source_dir: PathBuf,
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
    /// Template for pages that name none.
    pub default_template: Option<PathBuf>,
    /// Outline document.
    pub outline: Option<PathBuf>,
    /// Stylesheet name compiled as SCSS.
    pub scss_sheet: String,
    /// Navigation rendering options.
    pub navigation: NavOptions,
    /// Section slug prefix.
    pub xref_prefix: String,
    /// Section slug collision handling.
    pub collisions: CollisionPolicy,
    /// External converter commands.
    pub commands: CommandSettings,
}

impl SessionConfig {
    /// Configuration with defaults for the given directories.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            default_template: None,
            outline: None,
            scss_sheet: DEFAULT_SCSS_SHEET.to_owned(),
            navigation: NavOptions::default(),
            xref_prefix: DEFAULT_PREFIX.to_owned(),
            collisions: CollisionPolicy::default(),
            commands: CommandSettings {
                timeout: Duration::from_secs(30),
                ..CommandSettings::default()
            },
        }
    }

    /// Derive session settings from a loaded [`Config`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let site = &config.site_resolved;
        Self {
            source_dir: site.source_dir.clone(),
            output_dir: site.output_dir.clone(),
            default_template: site.template.clone(),
            outline: site.outline.clone(),
            scss_sheet: config.stylesheet.scss_sheet.clone(),
            navigation: NavOptions {
                toc_page: config.navigation.toc_page.clone(),
                unlisted_page: match config.navigation.unlisted_page {
                    UnlistedPage::FullTree => trellis_nav::UnlistedPage::FullTree,
                    UnlistedPage::Omit => trellis_nav::UnlistedPage::Omit,
                },
                relative_links: config.navigation.relative_links,
            },
            xref_prefix: config.xref.prefix.clone(),
            collisions: match config.xref.collisions {
                Collisions::Overwrite => CollisionPolicy::Overwrite,
                Collisions::Warn => CollisionPolicy::Warn,
                Collisions::Error => CollisionPolicy::Error,
            },
            commands: CommandSettings {
                markdown: config.converters.markdown.clone(),
                smartypants: config.converters.smartypants.clone(),
                haml: config.converters.haml.clone(),
                kramdown: config.converters.kramdown.clone(),
                timeout: config.converters.timeout(),
            },
        }
    }
}
