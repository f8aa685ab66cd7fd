//! Adapter for the exception settings service (host 12).

use tracing::debug;

use super::DebuggerAdapter;
use crate::error::{BreakerError, BreakerResult};
use crate::ignore::IgnorePredicate;
use crate::native::ExceptionSettingsService;

const NAME: &str = "exception-settings";

/// Adapter over an [`ExceptionSettingsService`]. Filters natively.
pub struct ExceptionSettingsAdapter
{
    service: Box<dyn ExceptionSettingsService>,
}

impl ExceptionSettingsAdapter
{
    #[must_use]
    pub fn new(service: Box<dyn ExceptionSettingsService>) -> Self
    {
        Self { service }
    }

    fn set_first_chance(&mut self, enabled: bool, operation: &'static str) -> BreakerResult<()>
    {
        debug!(enabled, "setting first-chance break");
        self.service
            .set_break_first_chance(enabled)
            .map_err(|status| BreakerError::from_native(NAME, operation, status))
    }
}

impl DebuggerAdapter for ExceptionSettingsAdapter
{
    fn name(&self) -> &'static str
    {
        NAME
    }

    fn arm_break_on_all_exceptions(&mut self) -> BreakerResult<()>
    {
        self.set_first_chance(true, "arm break-on-all")
    }

    fn disarm_break_on_all_exceptions(&mut self) -> BreakerResult<()>
    {
        self.set_first_chance(false, "disarm break-on-all")
    }

    fn is_session_active(&self) -> bool
    {
        self.service.has_current_session()
    }

    fn supports_per_exception_filter(&self) -> bool
    {
        true
    }

    fn set_exception_filter(&mut self, filter: Option<IgnorePredicate>) -> BreakerResult<()>
    {
        self.service
            .set_skip_condition(filter)
            .map_err(|status| BreakerError::from_native(NAME, "set exception filter", status))
    }

    fn would_break(&self, exception_name: &str) -> bool
    {
        self.service.should_break(exception_name)
    }
}

#[cfg(test)]
mod tests
{
    use std::sync::Arc;

    use super::*;
    use crate::native::simulated::{NativeCall, SimulatedSettingsService};

    #[test]
    fn test_native_filter_skips_ignored_names()
    {
        let (service, recorder) = SimulatedSettingsService::new();
        let mut adapter = ExceptionSettingsAdapter::new(Box::new(service));

        adapter.arm_break_on_all_exceptions().unwrap();
        adapter
            .set_exception_filter(Some(Arc::new(|name: &str| name == "Expected")))
            .unwrap();

        assert!(adapter.would_break("Unexpected"));
        assert!(!adapter.would_break("Expected"));
        assert_eq!(
            recorder.calls(),
            vec![NativeCall::SetBreakFirstChance(true), NativeCall::SetSkipCondition(true)]
        );
    }

    #[test]
    fn test_no_session_maps_to_session_unavailable()
    {
        struct Detached;

        impl ExceptionSettingsService for Detached
        {
            fn set_break_first_chance(&mut self, _enabled: bool) -> crate::native::NativeResult
            {
                Err(crate::native::NativeStatus::NoSession)
            }

            fn set_skip_condition(&mut self, _condition: Option<IgnorePredicate>) -> crate::native::NativeResult
            {
                Ok(())
            }

            fn should_break(&self, _exception_name: &str) -> bool
            {
                false
            }

            fn has_current_session(&self) -> bool
            {
                false
            }
        }

        let mut adapter = ExceptionSettingsAdapter::new(Box::new(Detached));
        assert!(!adapter.is_session_active());
        assert!(matches!(
            adapter.arm_break_on_all_exceptions(),
            Err(BreakerError::SessionUnavailable)
        ));
    }
}
