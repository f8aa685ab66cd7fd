//! Tests for ignore patterns and settings persistence

use exbreak_core::prelude::*;

fn sample_settings() -> BreakerSettings
{
    BreakerSettings {
        break_on_all: true,
        ignored: ["System.*", "MyApp.ExpectedException"].into_iter().collect(),
    }
}

const SAMPLE_NAMES: [&str; 7] = [
    "System.NullReferenceException",
    "System.IO.IOException",
    "System",
    "MyApp.ExpectedException",
    "MyApp.ExpectedExceptionTwo",
    "MyLib.Exception",
    "",
];

#[test]
fn test_system_prefix_pattern()
{
    let pattern = ExceptionPattern::new("System.*");
    assert!(exbreak_core::pattern::matches(&pattern, "System.NullReferenceException"));
    assert!(!exbreak_core::pattern::matches(&pattern, "MyLib.Exception"));
}

#[test]
fn test_is_ignored_is_any_match()
{
    let source = IgnoreSource::new(sample_settings().ignored);
    let predicate = source.predicate();
    for name in SAMPLE_NAMES {
        let expected = source.snapshot().patterns().iter().any(|pattern| pattern.matches(name));
        assert_eq!(predicate(name), expected, "{name}");
    }

    source.replace(IgnoreList::new());
    for name in SAMPLE_NAMES {
        assert!(!predicate(name), "{name}");
    }
}

#[test]
fn test_settings_round_trip_preserves_matching()
{
    let original = sample_settings();
    let text = original.to_toml_string().unwrap();
    let reloaded = BreakerSettings::from_toml_str(&text).unwrap();

    assert_eq!(reloaded, original);
    for name in SAMPLE_NAMES {
        assert_eq!(reloaded.ignored.is_ignored(name), original.ignored.is_ignored(name), "{name}");
    }
}

#[test]
fn test_settings_round_trip_with_explicit_modes()
{
    let original = BreakerSettings {
        break_on_all: false,
        ignored: IgnoreList::from(vec![
            ExceptionPattern::with_mode("System.*", MatchMode::Exact),
            ExceptionPattern::with_mode("MyApp.*", MatchMode::Prefix),
            ExceptionPattern::with_mode("MyLib.Expected", MatchMode::Prefix),
        ]),
    };
    let reloaded = BreakerSettings::from_toml_str(&original.to_toml_string().unwrap()).unwrap();

    assert_eq!(reloaded, original);
    assert!(reloaded.ignored.is_ignored("System.*"));
    assert!(!reloaded.ignored.is_ignored("System.Exception"));
    assert!(reloaded.ignored.is_ignored("MyApp.Anything"));
    assert!(reloaded.ignored.is_ignored("MyLib.Expected"));
    assert!(!reloaded.ignored.is_ignored("MyLib.ExpectedTwo"));
}

#[test]
fn test_prefix_mode_system_pattern()
{
    let pattern = ExceptionPattern::with_mode("System.*", MatchMode::Prefix);
    assert!(exbreak_core::pattern::matches(&pattern, "System.NullReferenceException"));
    assert!(!exbreak_core::pattern::matches(&pattern, "MyLib.Exception"));
}

#[test]
fn test_settings_file_round_trip()
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exbreak.toml");

    sample_settings().save(&path).unwrap();
    let loaded = BreakerSettings::load(&path).unwrap();
    assert_eq!(loaded, sample_settings());
}

#[test]
fn test_missing_settings_file_is_io_error()
{
    let dir = tempfile::tempdir().unwrap();
    let err = BreakerSettings::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, BreakerError::Io(_)));
}

#[test]
fn test_breaker_reports_current_settings()
{
    let breaker = Breaker::bootstrap(BootstrapOptions {
        host: HostVersion::V12,
        native: None,
        settings: sample_settings(),
    });
    breaker.command().invoke();
    breaker.ignore_source().replace(["Only.This"].into_iter().collect());

    let settings = breaker.settings();
    assert!(!settings.break_on_all);
    assert_eq!(settings.ignored.patterns(), &[ExceptionPattern::new("Only.This")]);
}
