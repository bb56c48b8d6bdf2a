//! The four page stages.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use trellis_convert::{ConverterKind, ConverterRegistry};

use crate::cleanup::{repair_macro_escapes, strip_self_links, unescape_quotes};
use crate::context::{Field, RenderContext, StylesheetKind};
use crate::error::{PipelineError, Stage};
use crate::haml::replace_haml_regions;

/// Runs pipeline stages against render contexts.
///
/// Cheap to clone; clones share the converter registry and the
/// cancellation flag.
#[derive(Debug, Clone)]
pub struct Pipeline {
    converters: Arc<ConverterRegistry>,
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    /// Create a pipeline over `converters`.
    #[must_use]
    pub fn new(converters: Arc<ConverterRegistry>) -> Self {
        Self {
            converters,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag.
    ///
    /// Once the flag is set, every stage fails with
    /// [`PipelineError::Cancelled`] before touching the context.
    #[must_use]
    pub fn with_cancellation(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Request cancellation of all pipelines sharing this flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Converter registry used by the stages.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Compile the stylesheet when it is the SCSS sheet.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Conversion`] if the SCSS compiler rejects
    /// the stylesheet.
    pub fn style_stage(&self, ctx: &mut RenderContext) -> Result<(), PipelineError> {
        let stage = Stage::Style;
        self.check_cancelled(stage)?;
        if ctx.stylesheet_kind() != StylesheetKind::Scss {
            return Ok(());
        }

        let started = Instant::now();
        let css = self.convert(stage, ConverterKind::Scss, ctx.css_text())?;
        commit(ctx, stage, started, |ctx| ctx.set(Field::CssText, css));
        Ok(())
    }

    /// Convert the body and render the Haml template.
    ///
    /// Applied in order when the matching flag is set:
    /// 1. Markdown over the whole body, then repair of escaped macro
    ///    delimiters.
    /// 2. Haml over each embedded region.
    /// 3. Haml over the template file, stored as the direct template.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Conversion`] if a converter fails, or
    /// [`PipelineError::Template`] if the template file cannot be read.
    pub fn body_stage(&self, ctx: &mut RenderContext) -> Result<(), PipelineError> {
        let stage = Stage::Body;
        self.check_cancelled(stage)?;
        let flags = ctx.flags();
        let started = Instant::now();

        let mut body = None;
        if flags.markdown {
            let html = self.convert(stage, ConverterKind::Markdown, ctx.body_text())?;
            body = Some(repair_macro_escapes(&html));
        }
        if flags.embedded_haml {
            let source = body.as_deref().unwrap_or(ctx.body_text());
            body = Some(replace_haml_regions(source, |haml| {
                self.convert(stage, ConverterKind::Haml, haml)
            })?);
        }

        let mut direct_template = None;
        if flags.haml_template
            && let Some(path) = ctx.template_path()
        {
            let source = fs::read_to_string(path).map_err(|source| PipelineError::Template {
                stage,
                path: path.to_path_buf(),
                source,
            })?;
            direct_template = Some(self.convert(stage, ConverterKind::Haml, &source)?);
        }

        if body.is_none() && direct_template.is_none() {
            return Ok(());
        }
        commit(ctx, stage, started, |ctx| {
            if let Some(body) = body {
                ctx.set(Field::BodyText, body);
            }
            if let Some(template) = direct_template {
                ctx.set(Field::DirectTemplate, template);
            }
        });
        Ok(())
    }

    /// Convert the macro-expanded text with Kramdown.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Conversion`] if Kramdown fails.
    pub fn post_macro_stage(&self, ctx: &mut RenderContext) -> Result<(), PipelineError> {
        let stage = Stage::PostMacro;
        self.check_cancelled(stage)?;
        if !ctx.flags().kramdown {
            return Ok(());
        }

        let started = Instant::now();
        let html = self.convert(stage, ConverterKind::Kramdown, ctx.post_macro_text())?;
        let text = unescape_quotes(&html);
        commit(ctx, stage, started, |ctx| ctx.set(Field::PostMacroText, text));
        Ok(())
    }

    /// Apply SmartyPants when enabled, then strip empty self-links.
    ///
    /// SmartyPants runs when the markdown or smartypants flag is set. The
    /// self-link cleanup always runs.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Conversion`] if SmartyPants fails.
    pub fn final_stage(&self, ctx: &mut RenderContext) -> Result<(), PipelineError> {
        let stage = Stage::Final;
        self.check_cancelled(stage)?;
        let flags = ctx.flags();
        let started = Instant::now();

        let smart = if flags.markdown || flags.smartypants {
            Some(self.convert(stage, ConverterKind::SmartyPants, ctx.rendered_text())?)
        } else {
            None
        };
        let source = smart.as_deref().unwrap_or(ctx.rendered_text());
        let text = strip_self_links(source).into_owned();

        commit(ctx, stage, started, |ctx| ctx.set(Field::RenderedText, text));
        Ok(())
    }

    fn check_cancelled(&self, stage: Stage) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            return Err(PipelineError::Cancelled { stage });
        }
        Ok(())
    }

    fn convert(
        &self,
        stage: Stage,
        kind: ConverterKind,
        input: &str,
    ) -> Result<String, PipelineError> {
        self.converters
            .convert(kind, input)
            .map_err(|source| PipelineError::Conversion { stage, source })
    }
}

/// Write computed fields back in one step, after every converter succeeded.
fn commit(
    ctx: &mut RenderContext,
    stage: Stage,
    started: Instant,
    apply: impl FnOnce(&mut RenderContext),
) {
    apply(ctx);
    tracing::debug!(
        page = ctx.page(),
        stage = %stage,
        elapsed_ms = started.elapsed().as_millis(),
        "Stage applied"
    );
}
