//! # Native Status Codes
//!
//! Host debugger services report failures as 32-bit status codes in the
//! `HRESULT` layout. This module converts those codes into a Rust enum with
//! descriptive messages.

use std::fmt;

/// Operation succeeded.
pub const S_OK: i32 = 0;
/// The service exposes the method but does not implement it.
pub const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;
/// Unspecified failure.
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
/// Access denied.
pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;
/// The debugger has no program attached (no current session).
pub const E_NO_SESSION: i32 = 0x8004_0001_u32 as i32;

/// Status code reported by a native debugger service call.
///
/// - `E_NOTIMPL`: the host version cannot express the call
/// - `E_NO_SESSION`: there is no live session to apply the call to
/// - `E_ACCESSDENIED`: the debugger refused the change
/// - anything else is preserved verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeStatus
{
    /// `E_NOTIMPL`
    NotImplemented,
    /// `E_NO_SESSION`
    NoSession,
    /// `E_ACCESSDENIED`
    AccessDenied,
    /// Any other failure code, kept so it can be looked up.
    Failed(i32),
}

impl NativeStatus
{
    /// Raw status code.
    #[must_use]
    pub const fn code(self) -> i32
    {
        match self {
            Self::NotImplemented => E_NOTIMPL,
            Self::NoSession => E_NO_SESSION,
            Self::AccessDenied => E_ACCESSDENIED,
            Self::Failed(code) => code,
        }
    }

    /// Turn a raw status code into a result; success codes (>= 0) are `Ok`.
    pub const fn check(code: i32) -> NativeResult
    {
        if code >= S_OK {
            Ok(())
        } else {
            Err(Self::from_code(code))
        }
    }

    /// Classify a failure code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self
    {
        match code {
            E_NOTIMPL => Self::NotImplemented,
            E_NO_SESSION => Self::NoSession,
            E_ACCESSDENIED => Self::AccessDenied,
            _ => Self::Failed(code),
        }
    }
}

impl From<i32> for NativeStatus
{
    fn from(code: i32) -> Self
    {
        Self::from_code(code)
    }
}

impl fmt::Display for NativeStatus
{
    #[allow(clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::NotImplemented => write!(f, "E_NOTIMPL: not implemented"),
            Self::NoSession => write!(f, "no debug session"),
            Self::AccessDenied => write!(f, "E_ACCESSDENIED: access denied"),
            Self::Failed(code) => write!(f, "native error 0x{:08x}", *code as u32),
        }
    }
}

/// Result of a native service call.
pub type NativeResult = Result<(), NativeStatus>;

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_success_codes_are_ok()
    {
        assert_eq!(NativeStatus::check(S_OK), Ok(()));
        assert_eq!(NativeStatus::check(1), Ok(()));
    }

    #[test]
    fn test_known_failures_are_classified()
    {
        assert_eq!(NativeStatus::check(E_NOTIMPL), Err(NativeStatus::NotImplemented));
        assert_eq!(NativeStatus::check(E_NO_SESSION), Err(NativeStatus::NoSession));
        assert_eq!(NativeStatus::from(E_ACCESSDENIED), NativeStatus::AccessDenied);
    }

    #[test]
    fn test_unknown_code_round_trips()
    {
        let status = NativeStatus::from_code(E_FAIL);
        assert_eq!(status, NativeStatus::Failed(E_FAIL));
        assert_eq!(status.code(), E_FAIL);
        assert!(status.to_string().contains("80004005"));
    }
}
