//! Staged page transform pipeline for trellis.
//!
//! A [`RenderContext`] carries one page through four stages, each rewriting
//! only its own field:
//!
//! | Stage | Field | Runs when |
//! |---|---|---|
//! | [`Pipeline::style_stage`] | stylesheet text | sheet is the SCSS sheet |
//! | [`Pipeline::body_stage`] | body text, direct template | markdown / embedded Haml / Haml template flags |
//! | [`Pipeline::post_macro_stage`] | post-macro text | kramdown flag |
//! | [`Pipeline::final_stage`] | rendered text | always (SmartyPants only with markdown or smartypants flag) |
//!
//! The host calls the stages in that order, expanding macros between the
//! body and post-macro stages and inserting the page into its template
//! before the final stage. A failing stage leaves the context untouched.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_convert::ConverterRegistry;
//! use trellis_pipeline::{ContextFlags, Pipeline, RenderContext};
//!
//! let pipeline = Pipeline::new(Arc::new(ConverterRegistry::with_builtins()));
//! let flags = ContextFlags { markdown: true, ..ContextFlags::default() };
//! let mut ctx = RenderContext::new("index", flags).with_body("Hello *world*");
//!
//! pipeline.body_stage(&mut ctx).unwrap();
//! assert_eq!(ctx.body_text(), "<p>Hello <em>world</em></p>\n");
//! ```

mod cleanup;
mod context;
mod error;
mod haml;
mod pipeline;

pub use cleanup::{repair_macro_escapes, strip_self_links, unescape_quotes};
pub use context::{ContextFlags, Field, RenderContext, StylesheetKind};
pub use error::{PipelineError, Stage};
pub use haml::{HAML_CLOSE, HAML_OPEN, HamlRegion, find_haml_regions, replace_haml_regions};
pub use pipeline::Pipeline;
