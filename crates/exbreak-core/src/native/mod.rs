//! # Native Debugger Services
//!
//! The host exposes its "break on thrown exception" control through
//! different, incompatible service shapes depending on its version. Each
//! shape is a trait here; [`NativeDebugger`] tags which one the host handed
//! us. Adapters in [`crate::adapter`] put a uniform face on top.
//!
//! ## Known shapes
//!
//! - **Legacy** (hosts 10 and 11): exceptions are grouped by runtime and the
//!   only control is a per-group "break when thrown" toggle. There is no way
//!   to tell the debugger to skip individual exception types.
//! - **Exception settings** (host 12): a settings service with a global
//!   first-chance toggle and a condition hook the debugger evaluates before
//!   it stops.

pub mod simulated;
pub mod status;

use std::fmt;

pub use status::{NativeResult, NativeStatus};

use crate::ignore::IgnorePredicate;

/// Exception group toggled by the legacy adapter.
pub const CLR_EXCEPTION_GROUP: &str = "Common Language Runtime Exceptions";

/// Legacy exception-group service.
pub trait LegacyExceptionService: Send
{
    /// Set "break when thrown" for every exception in `group`.
    fn set_group_break_when_thrown(&mut self, group: &str, enabled: bool) -> NativeResult;

    /// Whether the debugger will stop on a thrown exception from `group`.
    fn group_breaks_when_thrown(&self, group: &str) -> bool;

    /// Whether a program is currently being debugged.
    fn has_current_session(&self) -> bool;
}

/// Exception settings service.
pub trait ExceptionSettingsService: Send
{
    /// Stop on every first-chance exception.
    fn set_break_first_chance(&mut self, enabled: bool) -> NativeResult;

    /// Install (or clear) the condition consulted before stopping.
    ///
    /// The debugger skips the stop when the condition returns `true`.
    fn set_skip_condition(&mut self, condition: Option<IgnorePredicate>) -> NativeResult;

    /// The debugger's own can-break query for a thrown exception.
    fn should_break(&self, exception_name: &str) -> bool;

    /// Whether a program is currently being debugged.
    fn has_current_session(&self) -> bool;
}

/// Native debugger service handed over by the host, tagged by shape.
pub enum NativeDebugger
{
    /// Exception-group toggles.
    Legacy(Box<dyn LegacyExceptionService>),
    /// Exception settings service with a skip condition.
    ExceptionSettings(Box<dyn ExceptionSettingsService>),
}

impl NativeDebugger
{
    /// Short name of the service shape, for logs.
    #[must_use]
    pub const fn shape(&self) -> &'static str
    {
        match self {
            Self::Legacy(_) => "legacy",
            Self::ExceptionSettings(_) => "exception-settings",
        }
    }
}

impl fmt::Debug for NativeDebugger
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_tuple("NativeDebugger").field(&self.shape()).finish()
    }
}
