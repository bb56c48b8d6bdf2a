//! Site builds for trellis.
//!
//! Ties the pipeline, the outline and the navigation renderers together:
//! pages are discovered under the source directory, taken through the four
//! pipeline stages with navigation macros expanded in between, inserted
//! into their templates, and written to the output directory.
//!
//! # Example
//!
//! ```no_run
//! use trellis_build::{BuildSession, SessionConfig};
//!
//! let session = BuildSession::new(SessionConfig::new("pages", "site"));
//! let report = session.build_all()?;
//! for failure in &report.failed {
//!     eprintln!("{failure}");
//! }
//! # Ok::<(), trellis_build::BuildError>(())
//! ```

mod config;
mod error;
mod macros;
mod page;
mod report;
mod session;

pub use config::{DEFAULT_SCSS_SHEET, SessionConfig};
pub use error::{BuildError, OutlineError, PageError, RenderError};
pub use macros::{MacroCall, expand_macros};
pub use page::{FrontMatter, SourcePage, parse_front_matter, split_front_matter};
pub use report::BuildReport;
pub use session::BuildSession;
