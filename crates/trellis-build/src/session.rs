//! Site build session.
//!
//! A [`BuildSession`] owns everything shared across the pages of one site:
//! the pipeline and its converters, the cross-reference table, the parsed
//! outline, and the cancellation flag. Pages are rendered independently
//! and a failing page never stops the others.
//!
//! # Page flow
//!
//! 1. Front matter is split off and becomes the page's flags.
//! 2. Body stage.
//! 3. Navigation macros (`<%breadcrumbs%>`, `<%toc%>`, `<%nextprevlinks%>`,
//!    `<%section("...")%>`) are expanded into the post-macro text.
//! 4. Post-macro stage.
//! 5. The template is expanded with `<%bodytext%>` and `<%title%>`.
//! 6. Final stage.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::Instant;

use glob::Pattern;
use trellis_convert::ConverterRegistry;
use trellis_nav::{
    CrossReferenceStore, PageEntry, SiteIndex, render_navigation, render_prev_next, section,
};
use trellis_outline::OutlineTree;
use trellis_pipeline::{ContextFlags, Field, Pipeline, RenderContext, StylesheetKind};

use crate::config::SessionConfig;
use crate::error::{BuildError, OutlineError, PageError, RenderError};
use crate::macros::{MacroCall, expand_macros};
use crate::page::{FrontMatter, STYLES_DIR, SourcePage, parse_front_matter, scan_pages};
use crate::report::BuildReport;

/// Template used when a page has none.
const BARE_TEMPLATE: &str = "<%bodytext%>";

static STYLESHEET_PATTERNS: LazyLock<[Pattern; 2]> = LazyLock::new(|| {
    [
        Pattern::new("*.css").unwrap(),
        Pattern::new("*.scss").unwrap(),
    ]
});

type OutlineResult = Result<Arc<OutlineTree>, Arc<OutlineError>>;

/// Renders the pages of one site.
///
/// Shareable across threads; the cross-reference table and the outline
/// cache are internally synchronized.
#[derive(Debug)]
pub struct BuildSession {
    config: SessionConfig,
    pipeline: Pipeline,
    xrefs: CrossReferenceStore,
    outline: OnceLock<OutlineResult>,
    cancelled: Arc<AtomicBool>,
}

impl BuildSession {
    /// Create a session with converters built from the configured commands.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let converters = ConverterRegistry::from_settings(&config.commands);
        let pipeline =
            Pipeline::new(Arc::new(converters)).with_cancellation(Arc::clone(&cancelled));
        let xrefs = CrossReferenceStore::new(config.xref_prefix.clone(), config.collisions);

        Self {
            config,
            pipeline,
            xrefs,
            outline: OnceLock::new(),
            cancelled,
        }
    }

    /// Replace the converter registry.
    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.pipeline =
            Pipeline::new(Arc::new(converters)).with_cancellation(Arc::clone(&self.cancelled));
        self
    }

    /// Use an already parsed outline instead of reading the configured file.
    #[must_use]
    pub fn with_outline(mut self, tree: OutlineTree) -> Self {
        self.outline = OnceLock::from(Ok(Arc::new(tree)));
        self
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cross-reference table filled by `<%section%>` macros.
    #[must_use]
    pub fn cross_references(&self) -> &CrossReferenceStore {
        &self.xrefs
    }

    /// Flag that stops the build when set; shareable with signal handlers.
    #[must_use]
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Request cancellation. The page in progress fails at its next stage
    /// and no further pages are started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Start a new build: forget the previous build's cross-references.
    pub fn begin_build(&self) {
        self.xrefs.reset();
    }

    /// The navigation outline, read and parsed on first use.
    ///
    /// The result, success or failure, is cached for the session.
    ///
    /// # Errors
    ///
    /// Returns the cached [`OutlineError`] if no outline is configured or it
    /// could not be loaded.
    pub fn outline(&self) -> OutlineResult {
        self.outline
            .get_or_init(|| {
                let loaded = self.load_outline().map(Arc::new).map_err(Arc::new);
                if let Err(err) = &loaded {
                    tracing::error!(error = %err, "Navigation outline unavailable");
                }
                loaded
            })
            .clone()
    }

    fn load_outline(&self) -> Result<OutlineTree, OutlineError> {
        let path = self
            .config
            .outline
            .as_ref()
            .ok_or(OutlineError::NotConfigured)?;
        let text = fs::read_to_string(path).map_err(|source| OutlineError::Read {
            path: path.clone(),
            source,
        })?;
        let tree = trellis_outline::parse(&text).map_err(|source| OutlineError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), entries = tree.len(), "Outline loaded");
        Ok(tree)
    }

    /// Page files under the source directory.
    #[must_use]
    pub fn discover(&self) -> Vec<SourcePage> {
        scan_pages(&self.config.source_dir)
    }

    /// Site index over `pages`, with titles and subtitles from front matter.
    ///
    /// A page whose front matter cannot be read is indexed under its name;
    /// the error surfaces when the page itself is rendered. When two pages
    /// share a name the first one wins.
    #[must_use]
    pub fn site_index(&self, pages: &[SourcePage]) -> SiteIndex {
        let mut site = SiteIndex::new();
        for page in pages {
            if let Some(existing) = site.get(&page.name) {
                tracing::warn!(
                    page = %page.name,
                    path = %page.output_path(),
                    existing = %existing.path,
                    "Duplicate page name, keeping the first"
                );
                continue;
            }

            let front = fs::read_to_string(&page.source_path)
                .ok()
                .and_then(|source| parse_front_matter(&source).ok().map(|(front, _)| front))
                .unwrap_or_default();

            let title = front.title.unwrap_or_else(|| page.name.clone());
            let mut entry = PageEntry::new(&page.name, title, site_path(page))
                .with_folder(&page.folder);
            if let Some(subtitle) = front.subtitle {
                entry = entry.with_directive("subtitle", subtitle);
            }
            site.insert(entry);
        }
        site
    }

    /// Render one page file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Read`] if the file cannot be read, or any
    /// error from [`render_source`](Self::render_source).
    pub fn render_page(&self, page: &SourcePage, site: &SiteIndex) -> Result<String, RenderError> {
        let source =
            fs::read_to_string(&page.source_path).map_err(|source| RenderError::Read {
                path: page.source_path.clone(),
                source,
            })?;
        self.render_source(&page.name, &source, site)
    }

    /// Render page `name` from its source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is invalid, a stage fails, a
    /// navigation macro needs the outline and it is unavailable, a section
    /// slug is rejected, or the template cannot be read. Nothing is produced
    /// for a failed page.
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        site: &SiteIndex,
    ) -> Result<String, RenderError> {
        let started = Instant::now();
        let (front, body) = parse_front_matter(source)?;

        let mut ctx = RenderContext::new(name, front.flags).with_body(body);
        if let Some(template) = self.template_for(&front) {
            ctx = ctx.with_template(template);
        }

        self.pipeline.body_stage(&mut ctx)?;

        let title = front.title.as_deref().unwrap_or(name);
        let subtitle = front.subtitle.as_deref().unwrap_or_default();
        let body_macros = PageMacros {
            session: self,
            site,
            page: name,
            title,
            subtitle,
            body: None,
        };
        let expanded = expand_macros(ctx.body_text(), |call| body_macros.expand(call))?;
        ctx.set(Field::PostMacroText, expanded);

        self.pipeline.post_macro_stage(&mut ctx)?;

        let rendered = {
            let template = template_text(&ctx)?;
            let template_macros = PageMacros {
                body: Some(ctx.post_macro_text()),
                ..body_macros
            };
            expand_macros(&template, |call| template_macros.expand(call))?
        };
        ctx.set(Field::RenderedText, rendered);

        self.pipeline.final_stage(&mut ctx)?;

        tracing::debug!(
            page = name,
            elapsed_ms = started.elapsed().as_millis(),
            "Page rendered"
        );
        Ok(ctx.into_rendered_text())
    }

    /// Compile one stylesheet through the style stage.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Read`] if the file cannot be read, or
    /// [`RenderError::Pipeline`] if SCSS compilation fails.
    pub fn render_stylesheet(&self, path: &Path) -> Result<String, RenderError> {
        let css = fs::read_to_string(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = sheet_name(path);
        let kind = StylesheetKind::for_sheet(&name, &self.config.scss_sheet);

        let mut ctx = RenderContext::new(name, ContextFlags::default()).with_stylesheet(kind, css);
        self.pipeline.style_stage(&mut ctx)?;
        Ok(ctx.css_text().to_owned())
    }

    /// Render every stylesheet and page into the output directory.
    ///
    /// Failures are collected per page in the report. Cancellation stops
    /// the build before the next page.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::SourceNotFound`] if the source directory does
    /// not exist, or [`BuildError::Io`] if the output directory cannot be
    /// created.
    pub fn build_all(&self) -> Result<BuildReport, BuildError> {
        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;
        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir.clone()));
        }
        fs::create_dir_all(output_dir).map_err(|source| BuildError::Io {
            path: output_dir.clone(),
            source,
        })?;

        self.begin_build();
        let started = Instant::now();
        let mut report = BuildReport::default();

        for path in scan_stylesheets(source_dir) {
            if self.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let output = format!("{STYLES_DIR}/{}.css", sheet_name(&path));
            let result = self
                .render_stylesheet(&path)
                .and_then(|css| write_output(output_dir, &output, &css));
            match result {
                Ok(()) => report.stylesheets.push(output),
                Err(err) => self.record_failure(&mut report, path.display().to_string(), err),
            }
        }

        let pages = self.discover();
        let site = self.site_index(&pages);

        for page in &pages {
            if report.cancelled || self.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let output = page.output_path();
            let result = self
                .render_page(page, &site)
                .and_then(|html| write_output(output_dir, &output, &html));
            match result {
                Ok(()) => report.rendered.push(output),
                Err(err) => self.record_failure(&mut report, page.name.clone(), err),
            }
        }

        tracing::info!(
            rendered = report.rendered.len(),
            stylesheets = report.stylesheets.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            elapsed_ms = started.elapsed().as_millis(),
            "Build finished"
        );
        Ok(report)
    }

    fn record_failure(&self, report: &mut BuildReport, page: String, err: RenderError) {
        if err.is_cancelled() {
            tracing::debug!(page = %page, "Page abandoned on cancellation");
            report.cancelled = true;
            return;
        }
        let stage = match &err {
            RenderError::Pipeline(pipeline) => Some(pipeline.stage()),
            _ => None,
        };
        tracing::warn!(page = %page, stage = ?stage, error = %err, "Page failed");
        report.failed.push(PageError::new(page, err));
    }

    /// Template file for a page: its own, else the site default.
    fn template_for(&self, front: &FrontMatter) -> Option<PathBuf> {
        front
            .template
            .as_ref()
            .map(|template| self.config.source_dir.join(template))
            .or_else(|| self.config.default_template.clone())
    }
}

/// Macro handlers for one page.
#[derive(Clone, Copy)]
struct PageMacros<'a> {
    session: &'a BuildSession,
    site: &'a SiteIndex,
    page: &'a str,
    title: &'a str,
    subtitle: &'a str,
    /// Post-macro text; set only while expanding the template.
    body: Option<&'a str>,
}

impl PageMacros<'_> {
    fn expand(&self, call: MacroCall<'_>) -> Result<Option<String>, RenderError> {
        let nav = &self.session.config.navigation;
        let html = match (call.name, call.argument, self.body) {
            ("breadcrumbs", None, _) => {
                let outline = self.session.outline()?;
                render_navigation(&outline, self.site, self.page, false, nav)
            }
            ("toc", None, _) => {
                let outline = self.session.outline()?;
                render_navigation(&outline, self.site, self.page, true, nav)
            }
            ("nextprevlinks", None, _) => render_prev_next(self.site, self.page, nav),
            ("section", Some(heading), _) => section(&self.session.xrefs, heading)?,
            ("title", None, _) => self.title.to_owned(),
            ("subtitle", None, _) => self.subtitle.to_owned(),
            ("bodytext", None, Some(body)) => body.to_owned(),
            _ => {
                tracing::warn!(
                    page = self.page,
                    name = call.name,
                    argument = call.argument,
                    "Unknown macro left verbatim"
                );
                return Ok(None);
            }
        };
        Ok(Some(html))
    }
}

/// Template text for a context that has been through the body stage.
fn template_text(ctx: &RenderContext) -> Result<Cow<'_, str>, RenderError> {
    if let Some(direct) = ctx.direct_template() {
        return Ok(Cow::Borrowed(direct));
    }
    match ctx.template_path() {
        Some(path) => fs::read_to_string(path)
            .map(Cow::Owned)
            .map_err(|source| RenderError::Read {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(Cow::Borrowed(BARE_TEMPLATE)),
    }
}

/// Root-absolute site path of a page.
fn site_path(page: &SourcePage) -> String {
    format!("/{}", page.output_path())
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Stylesheets directly under `<source_dir>/styles`, sorted by path.
fn scan_stylesheets(source_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(source_dir.join(STYLES_DIR)) else {
        return Vec::new();
    };

    let mut sheets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| STYLESHEET_PATTERNS.iter().any(|p| p.matches(name)))
        })
        .collect();
    sheets.sort();
    sheets
}

fn write_output(output_dir: &Path, relative: &str, content: &str) -> Result<(), RenderError> {
    let path = output_dir.join(relative);
    let write = || {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
    };
    write().map_err(|source| RenderError::Write {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis_nav::CollisionPolicy;
    use trellis_outline::parse;

    use super::*;

    static_assertions::assert_impl_all!(BuildSession: Send, Sync);

    fn session(root: &Path) -> BuildSession {
        BuildSession::new(SessionConfig::new(root.join("src"), root.join("out")))
    }

    fn site() -> SiteIndex {
        SiteIndex::new()
            .with_page(PageEntry::new("index", "Home", "/index.html"))
            .with_page(PageEntry::new("guide", "Guide", "/guide.html"))
            .with_page(PageEntry::new("setup", "Setup", "/setup.html"))
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_render_plain_page_with_bare_template() {
        let dir = tempfile::tempdir().unwrap();

        let html = session(dir.path())
            .render_source("index", "---\ntitle: Home\n---\n<p>Hello</p>\n", &site())
            .unwrap();

        assert_eq!(html, "<p>Hello</p>\n");
    }

    #[test]
    fn test_render_expands_template_and_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.html");
        write(
            &template,
            "<title><%title%></title>\n<%breadcrumbs%>\n<%bodytext%>",
        );
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.default_template = Some(template);
        let session =
            BuildSession::new(config).with_outline(parse("index\n  guide\n  setup\n").unwrap());

        let html = session
            .render_source(
                "guide",
                "---\ntitle: The Guide\n---\n<%section(\"First Steps\")%>\n",
                &site(),
            )
            .unwrap();

        assert_eq!(
            html,
            "<title>The Guide</title>\n\
             <div class='breadcrumbs'><p><a href=\"/index.html\">Home</a></p>\n\
             <div class='toc_level'>\n\
             <p><b>Guide</b></p>\n\
             <p><a href=\"/setup.html\">Setup</a></p>\n\
             </div>\n\
             </div><div style='clear:both'></div>\n\
             <h2 id=\"SECfirststeps\">First Steps</h2>\n"
        );
        assert!(session.cross_references().get("SECfirststeps").is_some());
    }

    #[test]
    fn test_toc_macro_renders_full_tree() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            session(dir.path()).with_outline(parse("index\n  guide\n  setup\n").unwrap());

        let html = session.render_source("setup", "<%toc%>", &site()).unwrap();

        assert!(html.starts_with("<div class='toc'>"));
        assert!(html.contains("<a href=\"/setup.html\">Setup</a>"));
    }

    #[test]
    fn test_relative_self_link_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.navigation.relative_links = true;
        let session = BuildSession::new(config).with_outline(parse("index\n  guide\n").unwrap());

        let html = session.render_source("guide", "<%toc%>", &site()).unwrap();

        assert!(html.contains("<p>Guide</p>"));
        assert!(html.contains("<a href=\"index.html\">Home</a>"));
    }

    #[test]
    fn test_prev_next_links() {
        let dir = tempfile::tempdir().unwrap();

        let html = session(dir.path())
            .render_source("index", "<%nextprevlinks%>", &site())
            .unwrap();

        assert_eq!(
            html,
            "<p class='prevlink'>Prev: <a href=\"/guide.html\">Guide</a></p>\n\
             <p class='nextlink'>Next: <a href=\"/setup.html\">Setup</a></p>\n\
             <div style='clear:both' />\n"
        );
    }

    #[test]
    fn test_unknown_macro_left_verbatim() {
        let dir = tempfile::tempdir().unwrap();

        let html = session(dir.path())
            .render_source("index", "a <%mystery%> b", &site())
            .unwrap();

        assert_eq!(html, "a <%mystery%> b");
    }

    #[test]
    fn test_bodytext_in_body_is_not_expanded() {
        let dir = tempfile::tempdir().unwrap();

        let html = session(dir.path())
            .render_source("index", "<%bodytext%>", &site())
            .unwrap();

        assert_eq!(html, "<%bodytext%>");
    }

    #[test]
    fn test_breadcrumbs_without_outline_fails_page() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path());

        let err = session
            .render_source("index", "<%breadcrumbs%>", &site())
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Outline(ref e) if matches!(**e, OutlineError::NotConfigured)
        ));
        assert!(session.render_source("index", "<p>ok</p>", &site()).is_ok());
    }

    #[test]
    fn test_outline_parse_error_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let outline = dir.path().join("nav.opml");
        write(&outline, "<opml><body><outline/></body></opml>");
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.outline = Some(outline.clone());
        let session = BuildSession::new(config);

        assert!(matches!(
            *session.outline().unwrap_err(),
            OutlineError::Parse { .. }
        ));

        write(&outline, "index\n");
        assert!(session.outline().is_err());
    }

    #[test]
    fn test_outline_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let outline = dir.path().join("nextprevs");
        write(&outline, "index\n\tguide\n");
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.outline = Some(outline);

        let tree = BuildSession::new(config).outline().unwrap();

        assert_eq!(tree.len(), 2);
        assert!(tree.find_by_name("guide").is_some());
    }

    #[test]
    fn test_section_collision_error_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.collisions = CollisionPolicy::Error;
        let session = BuildSession::new(config);
        session
            .render_source("index", "<%section(\"Intro\")%>", &site())
            .unwrap();

        let err = session
            .render_source("guide", "<%section(\"intro\")%>", &site())
            .unwrap_err();

        assert!(matches!(err, RenderError::Xref(_)));

        session.begin_build();
        assert!(session
            .render_source("guide", "<%section(\"intro\")%>", &site())
            .is_ok());
    }

    #[test]
    fn test_invalid_front_matter_fails_page() {
        let dir = tempfile::tempdir().unwrap();

        let err = session(dir.path())
            .render_source("index", "---\nmarkdown: [1]\n---\nBody", &site())
            .unwrap_err();

        assert!(matches!(err, RenderError::FrontMatter(_)));
    }

    #[test]
    fn test_missing_page_template_fails_page() {
        let dir = tempfile::tempdir().unwrap();

        let err = session(dir.path())
            .render_source("index", "---\ntemplate: nope.html\n---\nBody", &site())
            .unwrap_err();

        assert!(matches!(err, RenderError::Read { ref path, .. } if path.ends_with("nope.html")));
    }

    #[test]
    fn test_site_index_reads_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write(
            &src.join("guide/setup.md"),
            "---\ntitle: Setting Up\nsubtitle: First run\n---\nBody",
        );
        write(&src.join("index.md"), "No front matter");
        write(&src.join("other/setup.md"), "---\ntitle: Shadowed\n---\n");
        let session = session(dir.path());

        let site = session.site_index(&session.discover());

        let setup = site.get("setup").unwrap();
        assert_eq!(setup.title, "Setting Up");
        assert_eq!(setup.path, "/guide/setup.html");
        assert_eq!(setup.folder, "guide");
        assert_eq!(setup.directives.get("subtitle").map(String::as_str), Some("First run"));
        assert_eq!(site.get("index").unwrap().title, "index");
        assert_eq!(site.len(), 2);
    }

    #[test]
    fn test_render_stylesheet_compiles_scss_sheet_only() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("src/styles");
        write(&styles.join("s2.scss"), ".nav { a { color: red; } }");
        write(&styles.join("print.css"), ".nav { a { color: red; } }");
        let session = session(dir.path());

        let compiled = session.render_stylesheet(&styles.join("s2.scss")).unwrap();
        let plain = session.render_stylesheet(&styles.join("print.css")).unwrap();

        assert!(compiled.contains(".nav a {"));
        assert_eq!(plain, ".nav { a { color: red; } }");
    }

    #[test]
    fn test_build_all_writes_outputs_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write(&src.join("index.html"), "---\ntitle: Home\n---\n<p>Home</p>\n");
        write(&src.join("guide/setup.html"), "<%section(\"Setup\")%>\n");
        write(&src.join("broken.html"), "---\nmarkdown: [1]\n---\n");
        write(&src.join("styles/s2.scss"), "$c: #333;\nbody { p { color: $c; } }\n");
        let session = session(dir.path());

        let report = session.build_all().unwrap();

        assert_eq!(report.rendered, ["guide/setup.html", "index.html"]);
        assert_eq!(report.stylesheets, ["styles/s2.css"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].page, "broken");
        assert!(!report.is_success());

        let out = dir.path().join("out");
        assert_eq!(
            fs::read_to_string(out.join("index.html")).unwrap(),
            "<p>Home</p>\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("guide/setup.html")).unwrap(),
            "<h2 id=\"SECsetup\">Setup</h2>\n"
        );
        assert!(fs::read_to_string(out.join("styles/s2.css"))
            .unwrap()
            .contains("body p {"));
        assert!(!out.join("broken.html").exists());
    }

    #[test]
    fn test_build_all_resets_cross_references() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write(&src.join("index.html"), "<%section(\"Intro\")%>");
        let mut config = SessionConfig::new(src, dir.path().join("out"));
        config.collisions = CollisionPolicy::Error;
        let session = BuildSession::new(config);

        assert!(session.build_all().unwrap().is_success());
        assert!(session.build_all().unwrap().is_success());
    }

    #[test]
    fn test_build_all_stops_on_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("src/index.html"), "<p>Home</p>");
        let session = session(dir.path());
        session.cancel();

        let report = session.build_all().unwrap();

        assert!(report.cancelled);
        assert!(report.rendered.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_cancelled_page_fails_with_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path());
        session.cancellation_handle().store(true, Ordering::SeqCst);

        let err = session.render_source("index", "Body", &site()).unwrap_err();

        assert!(err.is_cancelled());
    }

    #[test]
    fn test_build_all_missing_source() {
        let dir = tempfile::tempdir().unwrap();

        let err = session(dir.path()).build_all().unwrap_err();

        assert!(matches!(err, BuildError::SourceNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_page_runs_smartypants_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SessionConfig::new(dir.path().join("src"), dir.path().join("out"));
        config.commands.smartypants = Some("cat".to_owned());
        let session = BuildSession::new(config);

        let html = session
            .render_source("index", "---\nmarkdown: true\n---\n# Hello\n", &site())
            .unwrap();

        assert_eq!(html, "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_markdown_page_without_smartypants_fails() {
        let dir = tempfile::tempdir().unwrap();

        let err = session(dir.path())
            .render_source("index", "---\nmarkdown: true\n---\n# Hello\n", &site())
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Pipeline(ref e) if e.stage() == trellis_pipeline::Stage::Final
        ));
    }
}
