//! Settings document.
//!
//! The host owns persistence; this is the shape it stores. TOML is used for
//! settings files:
//!
//! ```toml
//! break_on_all = true
//! ignored = [
//!     "System.*",
//!     { pattern = "MyApp.ExpectedException", mode = "exact" },
//! ]
//! ```
//!
//! Malformed patterns never fail a load; see [`crate::pattern`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BreakerResult;
use crate::ignore::IgnoreList;

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings
{
    /// Last desired break-on-all state, restored at startup.
    pub break_on_all: bool,
    /// Exceptions that never break.
    pub ignored: IgnoreList,
}

impl BreakerSettings
{
    /// Parse a TOML document.
    ///
    /// ## Errors
    ///
    /// `Settings` if the document is not valid TOML or has the wrong shape.
    pub fn from_toml_str(text: &str) -> BreakerResult<Self>
    {
        Ok(toml::from_str(text)?)
    }

    /// Render as a TOML document.
    ///
    /// ## Errors
    ///
    /// `SettingsWrite` if serialization fails.
    pub fn to_toml_string(&self) -> BreakerResult<String>
    {
        Ok(toml::to_string(self)?)
    }

    /// Read settings from `path`.
    ///
    /// ## Errors
    ///
    /// `Io` if the file cannot be read, `Settings` if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> BreakerResult<Self>
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), patterns = settings.ignored.len(), "settings loaded");
        Ok(settings)
    }

    /// Write settings to `path`, replacing the file.
    ///
    /// ## Errors
    ///
    /// `SettingsWrite` or `Io`.
    pub fn save(&self, path: impl AsRef<Path>) -> BreakerResult<()>
    {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?)?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::pattern::{ExceptionPattern, MatchMode};

    #[test]
    fn test_empty_document_uses_defaults()
    {
        let settings = BreakerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, BreakerSettings::default());
        assert!(!settings.break_on_all);
    }

    #[test]
    fn test_mixed_pattern_forms()
    {
        let settings = BreakerSettings::from_toml_str(
            r#"
            break_on_all = true
            ignored = ["System.*", { pattern = "MyApp.Expected", mode = "exact" }, { pattern = "Lib.*", mode = "prefix" }]
            "#,
        )
        .unwrap();

        assert!(settings.break_on_all);
        assert_eq!(
            settings.ignored.patterns(),
            &[
                ExceptionPattern::new("System.*"),
                ExceptionPattern::with_mode("MyApp.Expected", MatchMode::Exact),
                ExceptionPattern::with_mode("Lib.*", MatchMode::Prefix),
            ]
        );
        assert!(settings.ignored.is_ignored("Lib.Failure"));
        assert!(!settings.ignored.is_ignored("Library.Failure"));
    }

    #[test]
    fn test_table_without_mode_defaults_to_wildcard()
    {
        let settings = BreakerSettings::from_toml_str(r#"ignored = [{ pattern = "A.*" }]"#).unwrap();
        assert!(settings.ignored.is_ignored("A.B"));
    }

    #[test]
    fn test_malformed_pattern_still_loads()
    {
        let settings = BreakerSettings::from_toml_str(r#"ignored = ["*.Bad", "Good.*"]"#).unwrap();
        assert!(settings.ignored.is_ignored("*.Bad"));
        assert!(!settings.ignored.is_ignored("Some.Bad"));
        assert!(settings.ignored.is_ignored("Good.One"));
    }

    #[test]
    fn test_wrong_shape_is_an_error()
    {
        assert!(BreakerSettings::from_toml_str("ignored = 5").is_err());
        assert!(BreakerSettings::from_toml_str(r#"ignored = [{ pattern = "A", mode = "regex" }]"#).is_err());
    }
}
