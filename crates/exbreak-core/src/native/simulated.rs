//! In-memory native services.
//!
//! These stand in for the host's debugger service when there is no real
//! host: the CLI drives them, and tests use them to count native calls. Each
//! service shares a [`NativeRecorder`] with its creator so calls can be
//! inspected after the service has been moved into an adapter.
//!
//! Break flags are session-scoped, as on a real host: the stand-in host calls
//! [`NativeRecorder::end_session`] when a debug session ends and every flag and
//! skip condition is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ExceptionSettingsService, LegacyExceptionService, NativeResult, NativeStatus};
use crate::ignore::IgnorePredicate;

/// A native call as observed by a simulated service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall
{
    /// Legacy per-group toggle.
    SetGroupBreakWhenThrown
    {
        /// Exception group name.
        group: String,
        /// Requested state.
        enabled: bool,
    },
    /// Settings service first-chance toggle.
    SetBreakFirstChance(bool),
    /// Settings service skip condition; `true` when one was installed.
    SetSkipCondition(bool),
}

struct RecorderState
{
    calls: Vec<NativeCall>,
    session_active: bool,
    unsupported: bool,
    groups: HashMap<String, bool>,
    first_chance: bool,
    skip: Option<IgnorePredicate>,
}

impl Default for RecorderState
{
    fn default() -> Self
    {
        Self {
            calls: Vec::new(),
            session_active: true,
            unsupported: false,
            groups: HashMap::new(),
            first_chance: false,
            skip: None,
        }
    }
}

impl fmt::Debug for RecorderState
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("RecorderState")
            .field("calls", &self.calls)
            .field("session_active", &self.session_active)
            .field("unsupported", &self.unsupported)
            .field("groups", &self.groups)
            .field("first_chance", &self.first_chance)
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

/// Shared view into a simulated service.
#[derive(Debug, Clone, Default)]
pub struct NativeRecorder
{
    state: Arc<Mutex<RecorderState>>,
}

impl NativeRecorder
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RecorderState>
    {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every mutating call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<NativeCall>
    {
        self.lock().calls.clone()
    }

    /// Number of recorded calls equal to `call`.
    #[must_use]
    pub fn count(&self, call: &NativeCall) -> usize
    {
        self.lock().calls.iter().filter(|recorded| *recorded == call).count()
    }

    /// Forget recorded calls.
    pub fn clear(&self)
    {
        self.lock().calls.clear();
    }

    /// Make every mutating call fail with `E_NOTIMPL`.
    pub fn set_unsupported(&self, unsupported: bool)
    {
        self.lock().unsupported = unsupported;
    }

    /// Control what `has_current_session` reports.
    pub fn set_session_active(&self, active: bool)
    {
        self.lock().session_active = active;
    }

    /// The debug session ended: drop every break flag and skip condition.
    ///
    /// Recorded calls are kept.
    pub fn end_session(&self)
    {
        let mut state = self.lock();
        state.groups.clear();
        state.first_chance = false;
        state.skip = None;
    }

    /// Record `call` and, if accepted, let `apply` update the break state.
    fn record(&self, call: NativeCall, apply: impl FnOnce(&mut RecorderState)) -> NativeResult
    {
        let mut state = self.lock();
        if state.unsupported {
            return Err(NativeStatus::NotImplemented);
        }
        state.calls.push(call);
        apply(&mut state);
        Ok(())
    }

    fn session_active(&self) -> bool
    {
        self.lock().session_active
    }
}

/// Simulated legacy exception-group service.
#[derive(Debug, Default)]
pub struct SimulatedLegacyService
{
    recorder: NativeRecorder,
}

impl SimulatedLegacyService
{
    /// Create a service together with its recorder.
    #[must_use]
    pub fn new() -> (Self, NativeRecorder)
    {
        let recorder = NativeRecorder::new();
        let service = Self { recorder: recorder.clone() };
        (service, recorder)
    }
}

impl LegacyExceptionService for SimulatedLegacyService
{
    fn set_group_break_when_thrown(&mut self, group: &str, enabled: bool) -> NativeResult
    {
        let call = NativeCall::SetGroupBreakWhenThrown {
            group: group.to_string(),
            enabled,
        };
        self.recorder.record(call, |state| {
            state.groups.insert(group.to_string(), enabled);
        })
    }

    fn group_breaks_when_thrown(&self, group: &str) -> bool
    {
        self.recorder.lock().groups.get(group).copied().unwrap_or(false)
    }

    fn has_current_session(&self) -> bool
    {
        self.recorder.session_active()
    }
}

/// Simulated exception settings service.
#[derive(Debug, Default)]
pub struct SimulatedSettingsService
{
    recorder: NativeRecorder,
}

impl SimulatedSettingsService
{
    /// Create a service together with its recorder.
    #[must_use]
    pub fn new() -> (Self, NativeRecorder)
    {
        let recorder = NativeRecorder::new();
        let service = Self { recorder: recorder.clone() };
        (service, recorder)
    }
}

impl ExceptionSettingsService for SimulatedSettingsService
{
    fn set_break_first_chance(&mut self, enabled: bool) -> NativeResult
    {
        self.recorder
            .record(NativeCall::SetBreakFirstChance(enabled), |state| state.first_chance = enabled)
    }

    fn set_skip_condition(&mut self, condition: Option<IgnorePredicate>) -> NativeResult
    {
        self.recorder
            .record(NativeCall::SetSkipCondition(condition.is_some()), |state| state.skip = condition)
    }

    fn should_break(&self, exception_name: &str) -> bool
    {
        let skip = {
            let state = self.recorder.lock();
            if !state.first_chance {
                return false;
            }
            state.skip.clone()
        };
        !skip.is_some_and(|skip| skip(exception_name))
    }

    fn has_current_session(&self) -> bool
    {
        self.recorder.session_active()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_legacy_records_and_applies()
    {
        let (mut service, recorder) = SimulatedLegacyService::new();
        assert!(!service.group_breaks_when_thrown("G"));
        service.set_group_break_when_thrown("G", true).unwrap();
        assert!(service.group_breaks_when_thrown("G"));
        assert_eq!(
            recorder.calls(),
            vec![NativeCall::SetGroupBreakWhenThrown {
                group: "G".to_string(),
                enabled: true
            }]
        );
    }

    #[test]
    fn test_unsupported_rejects_without_recording()
    {
        let (mut service, recorder) = SimulatedSettingsService::new();
        recorder.set_unsupported(true);
        assert_eq!(service.set_break_first_chance(true), Err(NativeStatus::NotImplemented));
        assert!(recorder.calls().is_empty());
        assert!(!service.should_break("X"));
    }

    #[test]
    fn test_skip_condition_filters()
    {
        let (mut service, _recorder) = SimulatedSettingsService::new();
        service.set_break_first_chance(true).unwrap();
        service
            .set_skip_condition(Some(Arc::new(|name: &str| name.starts_with("Skip"))))
            .unwrap();
        assert!(service.should_break("Other"));
        assert!(!service.should_break("SkipMe"));
    }

    #[test]
    fn test_end_session_drops_break_state()
    {
        let (mut legacy, legacy_recorder) = SimulatedLegacyService::new();
        legacy.set_group_break_when_thrown("G", true).unwrap();
        legacy_recorder.end_session();
        assert!(!legacy.group_breaks_when_thrown("G"));
        assert_eq!(legacy_recorder.calls().len(), 1);

        let (mut settings, settings_recorder) = SimulatedSettingsService::new();
        settings.set_break_first_chance(true).unwrap();
        settings.set_skip_condition(Some(Arc::new(|_: &str| false))).unwrap();
        settings_recorder.end_session();
        assert!(!settings.should_break("Any.Exception"));

        settings.set_break_first_chance(true).unwrap();
        assert!(settings.should_break("Any.Exception"));
    }

    #[test]
    fn test_session_active_is_reported()
    {
        let (service, recorder) = SimulatedSettingsService::new();
        assert!(service.has_current_session());
        recorder.set_session_active(false);
        assert!(!service.has_current_session());
    }
}
