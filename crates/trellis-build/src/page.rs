//! Page sources: discovery and front matter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use trellis_pipeline::ContextFlags;

/// File extensions treated as pages.
const PAGE_EXTENSIONS: &[&str] = &["md", "markdown", "txt", "html"];

/// Top-level source directory holding stylesheets rather than pages.
pub(crate) const STYLES_DIR: &str = "styles";

/// Per-page directives from the front matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Display title; the page name when absent.
    pub title: Option<String>,
    /// Subtitle shown in the table of contents.
    pub subtitle: Option<String>,
    /// Template file, relative to the source directory.
    pub template: Option<String>,
    /// Converter switches.
    #[serde(flatten)]
    pub flags: ContextFlags,
}

/// Split a leading `---` block from `source`.
///
/// Returns the YAML text (without delimiters) and the remaining body. A
/// source without a complete block is all body.
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

/// Parse the front matter of `source`, returning it with the body.
///
/// # Errors
///
/// Returns an error if the block is not valid YAML or a known key has the
/// wrong type. Unknown keys are ignored.
pub fn parse_front_matter(source: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    let (yaml, body) = split_front_matter(source);
    let front = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => FrontMatter::default(),
    };
    Ok((front, body))
}

/// A page file found in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    /// Page name (file stem), the page's identity in outlines.
    pub name: String,
    /// Folder relative to the source directory, `/`-separated.
    pub folder: String,
    /// Absolute source file path.
    pub source_path: PathBuf,
}

impl SourcePage {
    /// Output path relative to the output directory, `/`-separated.
    #[must_use]
    pub fn output_path(&self) -> String {
        if self.folder.is_empty() {
            format!("{}.html", self.name)
        } else {
            format!("{}/{}.html", self.folder, self.name)
        }
    }
}

/// Find page files under `source_dir`, sorted by output path.
///
/// Hidden entries and the top-level `styles` directory are skipped.
pub(crate) fn scan_pages(source_dir: &Path) -> Vec<SourcePage> {
    let mut pages = Vec::new();
    scan_directory(source_dir, "", &mut pages);
    pages.sort_by_key(SourcePage::output_path);
    pages
}

fn scan_directory(dir: &Path, folder: &str, pages: &mut Vec<SourcePage>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }
        let path = entry.path();

        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            if folder.is_empty() && file_name == STYLES_DIR {
                continue;
            }
            let child = if folder.is_empty() {
                file_name
            } else {
                format!("{folder}/{file_name}")
            };
            scan_directory(&path, &child, pages);
        } else if is_page(&path)
            && let Some(stem) = path.file_stem()
        {
            pages.push(SourcePage {
                name: stem.to_string_lossy().into_owned(),
                folder: folder.to_owned(),
                source_path: path,
            });
        }
    }
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext))
}
