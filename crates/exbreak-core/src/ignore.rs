//! Ignore list and the configuration source that owns it.
//!
//! The configuration source is the single writer. It replaces the whole list
//! at once; readers (the policy engine) hold an [`IgnorePredicate`] that
//! looks the current list up on every call, so edits show up without a
//! restart and a reader never sees a half-written list.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::pattern::ExceptionPattern;

/// Read-only capability answering "is this exception name ignored?".
pub type IgnorePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Ordered collection of ignore patterns. Any match suffices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreList
{
    patterns: Vec<ExceptionPattern>,
}

impl IgnoreList
{
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Whether at least one pattern matches `exception_name`.
    #[must_use]
    pub fn is_ignored(&self, exception_name: &str) -> bool
    {
        self.patterns.iter().any(|pattern| pattern.matches(exception_name))
    }

    /// The first pattern matching `exception_name`, for diagnostics.
    #[must_use]
    pub fn first_match(&self, exception_name: &str) -> Option<&ExceptionPattern>
    {
        self.patterns.iter().find(|pattern| pattern.matches(exception_name))
    }

    pub fn patterns(&self) -> &[ExceptionPattern]
    {
        &self.patterns
    }

    #[must_use]
    pub fn len(&self) -> usize
    {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.patterns.is_empty()
    }
}

impl From<Vec<ExceptionPattern>> for IgnoreList
{
    fn from(patterns: Vec<ExceptionPattern>) -> Self
    {
        Self { patterns }
    }
}

impl<P: Into<ExceptionPattern>> FromIterator<P> for IgnoreList
{
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self
    {
        Self {
            patterns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Shared-read, single-writer-replace holder of the current [`IgnoreList`].
///
/// Cloning yields another handle to the same list.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSource
{
    current: Arc<RwLock<Arc<IgnoreList>>>,
}

impl IgnoreSource
{
    #[must_use]
    pub fn new(list: IgnoreList) -> Self
    {
        Self {
            current: Arc::new(RwLock::new(Arc::new(list))),
        }
    }

    /// Replace the list wholesale.
    pub fn replace(&self, list: IgnoreList)
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(list);
    }

    /// Snapshot of the list as it is right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<IgnoreList>
    {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Evaluate `exception_name` against the current list.
    #[must_use]
    pub fn is_ignored(&self, exception_name: &str) -> bool
    {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_ignored(exception_name)
    }

    /// Hand out the read-only capability the policy engine consumes.
    ///
    /// The predicate is evaluated against whatever list is current at call
    /// time; it never caches.
    #[must_use]
    pub fn predicate(&self) -> IgnorePredicate
    {
        let source = self.clone();
        Arc::new(move |name: &str| source.is_ignored(name))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_any_pattern_matches()
    {
        let list: IgnoreList = ["System.*", "MyApp.ExpectedException"].into_iter().collect();
        assert!(list.is_ignored("System.ArgumentException"));
        assert!(list.is_ignored("MyApp.ExpectedException"));
        assert!(!list.is_ignored("MyApp.OtherException"));
        assert_eq!(list.first_match("System.X").map(ExceptionPattern::text), Some("System.*"));
    }

    #[test]
    fn test_empty_list_ignores_nothing()
    {
        let list = IgnoreList::new();
        assert!(list.is_empty());
        assert!(!list.is_ignored("System.Exception"));
        assert!(!list.is_ignored(""));
    }

    #[test]
    fn test_predicate_sees_replacement()
    {
        let source = IgnoreSource::new(["A.*"].into_iter().collect());
        let predicate = source.predicate();
        assert!(predicate("A.Error"));
        assert!(!predicate("B.Error"));

        source.replace(["B.*"].into_iter().collect());
        assert!(!predicate("A.Error"));
        assert!(predicate("B.Error"));

        source.replace(IgnoreList::new());
        assert!(!predicate("B.Error"));
    }

    #[test]
    fn test_snapshot_is_stable_across_replace()
    {
        let source = IgnoreSource::new(["A.*"].into_iter().collect());
        let before = source.snapshot();
        source.replace(["B.*"].into_iter().collect());
        assert!(before.is_ignored("A.Error"));
        assert!(source.snapshot().is_ignored("B.Error"));
    }
}
