//! # Error Types
//!
//! General error handling for the exception-break subsystem.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! None of these errors is fatal. The policy engine absorbs adapter failures
//! and reports them through `tracing`; only settings loading and adapter
//! selection hand a [`BreakerError`] back to the caller.

use thiserror::Error;

use crate::native::NativeStatus;

/// Main error type for exception-break operations
///
/// ## Error Categories
///
/// 1. **Capability errors**: `AdapterUnsupported`
/// 2. **Session errors**: `SessionUnavailable`
/// 3. **Configuration errors**: `ConfigurationInvalid`, `Settings`, `SettingsWrite`
/// 4. **Native errors**: `NativeFailure`
/// 5. **I/O errors**: `Io` (settings files)
#[derive(Error, Debug)]
pub enum BreakerError
{
    /// The operation cannot be expressed on this host version
    ///
    /// Raised when the native debugger service reports "not implemented" or
    /// when the adapter has no way to issue the call at all. The engine logs
    /// it and keeps the desired policy so it is retried next session.
    #[error("{adapter} adapter does not support {operation}")]
    AdapterUnsupported
    {
        /// Adapter that refused the operation
        adapter: &'static str,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// No debugger session is available
    ///
    /// Either the host never provided a debugger service or no session is
    /// currently running. Work is deferred until the next Active transition.
    #[error("No debugger session available")]
    SessionUnavailable,

    /// Malformed configuration value
    ///
    /// Ignore patterns never fail to load because of this; they degrade to a
    /// literal match. It is returned for things that have no fallback, such
    /// as an unknown host version string.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// The native service failed with a status other than "not implemented"
    #[error("{adapter} adapter failed to {operation}: {status}")]
    NativeFailure
    {
        /// Adapter that issued the call
        adapter: &'static str,
        /// Operation that was attempted
        operation: &'static str,
        /// Status code reported by the native service
        status: NativeStatus,
    },

    /// Settings document could not be parsed
    #[error("Failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    /// I/O error while reading or writing settings files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BreakerError
{
    /// Map a native status code returned by `adapter` for `operation`.
    ///
    /// "Not implemented" becomes [`BreakerError::AdapterUnsupported`] and
    /// "no session" becomes [`BreakerError::SessionUnavailable`]; everything
    /// else is kept as a [`BreakerError::NativeFailure`].
    #[must_use]
    pub fn from_native(adapter: &'static str, operation: &'static str, status: NativeStatus) -> Self
    {
        match status {
            NativeStatus::NotImplemented => Self::AdapterUnsupported { adapter, operation },
            NativeStatus::NoSession => Self::SessionUnavailable,
            status => Self::NativeFailure {
                adapter,
                operation,
                status,
            },
        }
    }

    /// Whether the failure means the host cannot express the operation at all.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool
    {
        matches!(self, Self::AdapterUnsupported { .. })
    }
}

/// Convenience type alias for `Result<T, BreakerError>`
///
/// ```rust
/// use exbreak_core::error::BreakerResult;
/// fn foo() -> BreakerResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type BreakerResult<T> = std::result::Result<T, BreakerError>;
