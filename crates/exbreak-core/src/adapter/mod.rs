//! # Debugger Adapters
//!
//! A uniform "break on all exceptions" interface over the version-specific
//! native debugger services in [`crate::native`].
//!
//! Each host version maps to exactly one adapter variant. The variant is
//! chosen once, by [`create_adapter`], when the session manager is built and
//! is never re-evaluated afterwards.
//!
//! ## Variants
//!
//! | Host       | Native shape          | Adapter                       | Native filter |
//! |------------|-----------------------|-------------------------------|---------------|
//! | 10, 11     | exception groups      | [`LegacyAdapter`]             | no            |
//! | 12         | exception settings    | [`ExceptionSettingsAdapter`]  | yes           |

mod legacy;
mod settings;

use std::fmt;
use std::str::FromStr;

pub use legacy::LegacyAdapter;
pub use settings::ExceptionSettingsAdapter;
use tracing::info;

use crate::error::{BreakerError, BreakerResult};
use crate::ignore::IgnorePredicate;
use crate::native::NativeDebugger;

/// Version-independent control over a debugger's exception-break feature.
///
/// ## Thread Safety
///
/// Adapters are owned by the session manager and only ever called with
/// exclusive access, so implementations need `Send` but not `Sync`.
pub trait DebuggerAdapter: Send
{
    /// Short adapter name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Make the debugger stop on every thrown exception.
    ///
    /// ## Errors
    ///
    /// - `AdapterUnsupported`: the native service cannot do this
    /// - `SessionUnavailable`: there is no session to configure
    /// - `NativeFailure`: any other native error
    fn arm_break_on_all_exceptions(&mut self) -> BreakerResult<()>;

    /// Stop breaking on every thrown exception.
    ///
    /// ## Errors
    ///
    /// Same as [`DebuggerAdapter::arm_break_on_all_exceptions`].
    fn disarm_break_on_all_exceptions(&mut self) -> BreakerResult<()>;

    /// Whether the native debugger currently has a live session.
    fn is_session_active(&self) -> bool;

    /// Whether [`DebuggerAdapter::set_exception_filter`] is available.
    fn supports_per_exception_filter(&self) -> bool
    {
        false
    }

    /// Hand the ignore predicate to the native debugger so it skips ignored
    /// exceptions itself. `None` removes a previously installed filter.
    ///
    /// ## Errors
    ///
    /// The default implementation reports `AdapterUnsupported`.
    fn set_exception_filter(&mut self, _filter: Option<IgnorePredicate>) -> BreakerResult<()>
    {
        Err(BreakerError::AdapterUnsupported {
            adapter: self.name(),
            operation: "set exception filter",
        })
    }

    /// The native can-break query: would the debugger stop on this exception?
    fn would_break(&self, exception_name: &str) -> bool;
}

/// Host versions whose debugger service shape is known at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostVersion
{
    /// Host 10.x
    V10,
    /// Host 11.x
    V11,
    /// Host 12.x
    V12,
}

impl HostVersion
{
    /// Every supported version, oldest first.
    pub const ALL: [Self; 3] = [Self::V10, Self::V11, Self::V12];

    /// Major version number.
    #[must_use]
    pub const fn major(self) -> u32
    {
        match self {
            Self::V10 => 10,
            Self::V11 => 11,
            Self::V12 => 12,
        }
    }
}

impl fmt::Display for HostVersion
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}.0", self.major())
    }
}

impl FromStr for HostVersion
{
    type Err = BreakerError;

    /// Parse `"11"`, `"11.0"` or `"11.0.61030"`.
    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let major = s.trim().split('.').next().unwrap_or_default();
        major
            .parse::<u32>()
            .ok()
            .and_then(|major| Self::ALL.into_iter().find(|version| version.major() == major))
            .ok_or_else(|| BreakerError::ConfigurationInvalid(format!("Unknown host version: {s}. Supported: 10, 11, 12")))
    }
}

/// Select the adapter variant for `version`.
///
/// ## Errors
///
/// - `SessionUnavailable`: the host did not provide a debugger service
/// - `AdapterUnsupported`: the service shape does not belong to `version`
pub fn create_adapter(version: HostVersion, native: Option<NativeDebugger>) -> BreakerResult<Box<dyn DebuggerAdapter>>
{
    let Some(native) = native else {
        return Err(BreakerError::SessionUnavailable);
    };

    let adapter: Box<dyn DebuggerAdapter> = match (version, native) {
        (HostVersion::V10 | HostVersion::V11, NativeDebugger::Legacy(service)) => Box::new(LegacyAdapter::new(service)),
        (HostVersion::V12, NativeDebugger::ExceptionSettings(service)) => {
            Box::new(ExceptionSettingsAdapter::new(service))
        }
        (_, native) => {
            return Err(BreakerError::AdapterUnsupported {
                adapter: native.shape(),
                operation: "adapt debugger service",
            })
        }
    };

    info!(host = %version, adapter = adapter.name(), "selected debugger adapter");
    Ok(adapter)
}
