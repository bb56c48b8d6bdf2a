//! Section headings and the cross-reference table.
//!
//! [`section`] derives a slug from a heading, registers it in a
//! [`CrossReferenceStore`], and returns the anchored `<h2>`. A later pass
//! resolves "see also" links by slug.

use std::collections::HashMap;
use std::sync::Mutex;

/// Default slug prefix.
pub const DEFAULT_PREFIX: &str = "SEC";

/// What happens when a slug is registered twice in one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Last registration wins silently.
    #[default]
    Overwrite,
    /// Last registration wins, with a warning.
    Warn,
    /// The second registration fails.
    Error,
}

/// Metadata registered for a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Anchor slug.
    pub slug: String,
    /// Original heading text.
    pub heading: String,
}

/// Cross-reference registration error.
#[derive(Debug, thiserror::Error)]
pub enum XrefError {
    /// The slug is already registered.
    #[error("Cross-reference {slug} for \"{heading}\" is already registered for \"{previous}\"")]
    Collision {
        /// Colliding slug.
        slug: String,
        /// Heading registered first.
        previous: String,
        /// Heading being registered.
        heading: String,
    },
}

/// Build-scoped table of section anchors.
///
/// Registration is serialized through an internal lock, so pages may be
/// rendered in parallel against one store.
#[derive(Debug)]
pub struct CrossReferenceStore {
    prefix: String,
    policy: CollisionPolicy,
    entries: Mutex<HashMap<String, CrossReference>>,
}

impl Default for CrossReferenceStore {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, CollisionPolicy::default())
    }
}

impl CrossReferenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(prefix: impl Into<String>, policy: CollisionPolicy) -> Self {
        Self {
            prefix: prefix.into(),
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Slug prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Collision policy.
    #[must_use]
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Slug for `heading`: the prefix followed by the heading's ASCII
    /// letters, lowercased.
    #[must_use]
    pub fn slug(&self, heading: &str) -> String {
        let mut slug = self.prefix.clone();
        slug.extend(
            heading
                .chars()
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase()),
        );
        slug
    }

    /// Register `heading` under `slug`, returning the entry it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`XrefError::Collision`] under [`CollisionPolicy::Error`] if
    /// the slug is taken; the earlier entry is kept.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    pub fn register(
        &self,
        slug: &str,
        heading: &str,
    ) -> Result<Option<CrossReference>, XrefError> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(previous) = entries.get(slug) {
            match self.policy {
                CollisionPolicy::Overwrite => {}
                CollisionPolicy::Warn => {
                    tracing::warn!(
                        slug,
                        previous = %previous.heading,
                        heading,
                        "Cross-reference slug registered twice, keeping the latest"
                    );
                }
                CollisionPolicy::Error => {
                    return Err(XrefError::Collision {
                        slug: slug.to_owned(),
                        previous: previous.heading.clone(),
                        heading: heading.to_owned(),
                    });
                }
            }
        }

        Ok(entries.insert(
            slug.to_owned(),
            CrossReference {
                slug: slug.to_owned(),
                heading: heading.to_owned(),
            },
        ))
    }

    /// Entry registered for `slug`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<CrossReference> {
        self.entries.lock().unwrap().get(slug).cloned()
    }

    /// All entries, sorted by slug.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<CrossReference> {
        let mut entries: Vec<_> = self.entries.lock().unwrap().values().cloned().collect();
        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        entries
    }

    /// Number of registered slugs.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every entry, starting a new build.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    pub fn reset(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// Emit an anchored section heading, registering its slug first.
///
/// # Errors
///
/// Returns [`XrefError::Collision`] when the store rejects the slug.
pub fn section(store: &CrossReferenceStore, heading: &str) -> Result<String, XrefError> {
    let slug = store.slug(heading);
    store.register(&slug, heading)?;
    Ok(format!(r#"<h2 id="{slug}">{heading}</h2>"#))
}
