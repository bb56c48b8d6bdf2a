//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod nav;
pub(crate) mod section;

pub(crate) use build::BuildArgs;
pub(crate) use nav::NavArgs;
pub(crate) use section::SectionArgs;
