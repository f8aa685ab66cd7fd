//! # Exception Patterns
//!
//! Matching of exception type names against user-supplied ignore patterns.
//!
//! This sits on the hot path: every exception thrown while break-on-all is
//! armed is checked against the ignore list, so matching is a single
//! comparison over the name and never allocates.
//!
//! ## Match modes
//!
//! - [`MatchMode::Exact`]: case-sensitive equality on the full type name
//! - [`MatchMode::Prefix`] and [`MatchMode::Wildcard`]: a single trailing
//!   `*` means "any suffix"; without `*` the pattern behaves like `Exact`
//!
//! A `*` anywhere other than the very end is not supported. Such a pattern
//! is accepted anyway and matched as the literal string.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the pattern text is compared to an exception name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode
{
    /// Case-sensitive equality.
    Exact,
    /// Trailing `*` matches any suffix; written out explicitly in settings.
    Prefix,
    /// Trailing `*` matches any suffix (the form users type).
    #[default]
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rule
{
    Literal,
    Prefix(usize),
}

/// An immutable ignore pattern.
///
/// Build one with [`ExceptionPattern::new`] (wildcard mode, the user-facing
/// syntax) or [`ExceptionPattern::with_mode`].
///
/// ```rust
/// use exbreak_core::pattern::ExceptionPattern;
///
/// let pattern = ExceptionPattern::new("System.*");
/// assert!(pattern.matches("System.NullReferenceException"));
/// assert!(!pattern.matches("MyLib.Exception"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PatternRepr", into = "PatternRepr")]
pub struct ExceptionPattern
{
    text: String,
    mode: MatchMode,
    rule: Rule,
}

impl ExceptionPattern
{
    /// Create a wildcard-mode pattern.
    pub fn new(text: impl Into<String>) -> Self
    {
        Self::with_mode(text, MatchMode::Wildcard)
    }

    /// Create a pattern with an explicit match mode.
    ///
    /// Never fails: an unsupported wildcard form is logged and degrades to an
    /// exact match on the literal text.
    pub fn with_mode(text: impl Into<String>, mode: MatchMode) -> Self
    {
        let text = text.into();
        let rule = match mode {
            MatchMode::Exact => Rule::Literal,
            MatchMode::Prefix | MatchMode::Wildcard => wildcard_rule(&text),
        };
        Self { text, mode, rule }
    }

    /// The pattern text as configured.
    #[must_use]
    pub fn text(&self) -> &str
    {
        &self.text
    }

    /// The configured match mode.
    #[must_use]
    pub const fn mode(&self) -> MatchMode
    {
        self.mode
    }

    /// Whether this pattern is matched as a plain string comparison.
    ///
    /// True for exact patterns and for wildcard patterns that either have no
    /// `*` or use an unsupported form.
    #[must_use]
    pub const fn is_literal(&self) -> bool
    {
        matches!(self.rule, Rule::Literal)
    }

    /// Check a fully qualified exception type name against this pattern.
    #[must_use]
    pub fn matches(&self, exception_name: &str) -> bool
    {
        match self.rule {
            Rule::Literal => exception_name == self.text,
            Rule::Prefix(len) => exception_name.as_bytes().starts_with(&self.text.as_bytes()[..len]),
        }
    }
}

/// `Matches(pattern, name)` as a free function.
#[must_use]
pub fn matches(pattern: &ExceptionPattern, exception_name: &str) -> bool
{
    pattern.matches(exception_name)
}

fn wildcard_rule(text: &str) -> Rule
{
    match text.find('*') {
        None => Rule::Literal,
        Some(star) if star + 1 == text.len() => Rule::Prefix(star),
        Some(_) => {
            warn!(pattern = text, "unsupported wildcard pattern, matching it literally");
            Rule::Literal
        }
    }
}

impl PartialEq for ExceptionPattern
{
    fn eq(&self, other: &Self) -> bool
    {
        self.mode == other.mode && self.text == other.text
    }
}

impl Eq for ExceptionPattern {}

impl fmt::Display for ExceptionPattern
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.mode {
            MatchMode::Wildcard => write!(f, "{}", self.text),
            MatchMode::Exact => write!(f, "{} (exact)", self.text),
            MatchMode::Prefix => write!(f, "{} (prefix)", self.text),
        }
    }
}

impl From<&str> for ExceptionPattern
{
    fn from(text: &str) -> Self
    {
        Self::new(text)
    }
}

/// On-disk shape: a bare string for wildcard patterns, a table otherwise.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PatternRepr
{
    Bare(String),
    Table
    {
        pattern: String,
        #[serde(default)]
        mode: MatchMode,
    },
}

impl From<PatternRepr> for ExceptionPattern
{
    fn from(repr: PatternRepr) -> Self
    {
        match repr {
            PatternRepr::Bare(text) => Self::new(text),
            PatternRepr::Table { pattern, mode } => Self::with_mode(pattern, mode),
        }
    }
}

impl From<ExceptionPattern> for PatternRepr
{
    fn from(pattern: ExceptionPattern) -> Self
    {
        match pattern.mode {
            MatchMode::Wildcard => Self::Bare(pattern.text),
            mode => Self::Table {
                pattern: pattern.text,
                mode,
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_exact_is_case_sensitive()
    {
        let pattern = ExceptionPattern::with_mode("System.IO.IOException", MatchMode::Exact);
        assert!(pattern.matches("System.IO.IOException"));
        assert!(!pattern.matches("system.io.ioexception"));
        assert!(!pattern.matches("System.IO.IOExceptionX"));
    }

    #[test]
    fn test_exact_mode_keeps_star_literal()
    {
        let pattern = ExceptionPattern::with_mode("System.*", MatchMode::Exact);
        assert!(pattern.matches("System.*"));
        assert!(!pattern.matches("System.NullReferenceException"));
    }

    #[test]
    fn test_trailing_star_matches_any_suffix()
    {
        let pattern = ExceptionPattern::new("System.*");
        assert!(pattern.matches("System.NullReferenceException"));
        assert!(pattern.matches("System."));
        assert!(!pattern.matches("MyLib.Exception"));
        assert!(!pattern.matches("System"));
    }

    #[test]
    fn test_wildcard_without_star_is_exact()
    {
        let pattern = ExceptionPattern::new("MyApp.ExpectedException");
        assert!(pattern.is_literal());
        assert!(pattern.matches("MyApp.ExpectedException"));
        assert!(!pattern.matches("MyApp.ExpectedExceptionTwo"));
    }

    #[test]
    fn test_lone_star_matches_everything()
    {
        let pattern = ExceptionPattern::new("*");
        assert!(pattern.matches("Anything.AtAll"));
        assert!(pattern.matches(""));
    }

    #[test]
    fn test_unsupported_wildcard_degrades_to_literal()
    {
        let leading = ExceptionPattern::new("*Exception");
        assert!(leading.is_literal());
        assert!(leading.matches("*Exception"));
        assert!(!leading.matches("System.Exception"));

        let double = ExceptionPattern::new("System.*.*");
        assert!(double.is_literal());
        assert!(!double.matches("System.IO.IOException"));
    }

    #[test]
    fn test_prefix_mode()
    {
        let pattern = ExceptionPattern::with_mode("System.*", MatchMode::Prefix);
        assert!(pattern.matches("System.NullReferenceException"));
        assert!(pattern.matches("System."));
        assert!(!pattern.matches("MyLib.Exception"));

        let narrow = ExceptionPattern::with_mode("System.IO.*", MatchMode::Prefix);
        assert!(narrow.matches("System.IO.FileNotFoundException"));
        assert!(!narrow.matches("System.InvalidOperationException"));
    }

    #[test]
    fn test_prefix_mode_without_star_is_exact()
    {
        let pattern = ExceptionPattern::with_mode("System.IO.", MatchMode::Prefix);
        assert!(pattern.is_literal());
        assert!(pattern.matches("System.IO."));
        assert!(!pattern.matches("System.IO.FileNotFoundException"));
    }

    #[test]
    fn test_multibyte_names_do_not_panic()
    {
        let pattern = ExceptionPattern::new("Ünïcode.*");
        assert!(pattern.matches("Ünïcode.Failure"));
        assert!(!pattern.matches("Ü"));
    }

    #[test]
    fn test_equality_ignores_compiled_rule()
    {
        assert_eq!(ExceptionPattern::new("A.*"), ExceptionPattern::from("A.*"));
        assert_ne!(
            ExceptionPattern::new("A.*"),
            ExceptionPattern::with_mode("A.*", MatchMode::Exact)
        );
    }
}
