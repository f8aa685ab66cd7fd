//! Adapter for the legacy exception-group service (hosts 10 and 11).
//!
//! The legacy service only knows groups, so "break on all" means toggling
//! "break when thrown" on the CLR exception group. It cannot skip individual
//! exception types; the policy engine vetoes ignored names itself.

use tracing::debug;

use super::DebuggerAdapter;
use crate::error::{BreakerError, BreakerResult};
use crate::native::{LegacyExceptionService, CLR_EXCEPTION_GROUP};

const NAME: &str = "legacy";

/// Adapter over a [`LegacyExceptionService`].
pub struct LegacyAdapter
{
    service: Box<dyn LegacyExceptionService>,
}

impl LegacyAdapter
{
    #[must_use]
    pub fn new(service: Box<dyn LegacyExceptionService>) -> Self
    {
        Self { service }
    }

    fn set_group(&mut self, enabled: bool, operation: &'static str) -> BreakerResult<()>
    {
        debug!(group = CLR_EXCEPTION_GROUP, enabled, "setting group break-when-thrown");
        self.service
            .set_group_break_when_thrown(CLR_EXCEPTION_GROUP, enabled)
            .map_err(|status| BreakerError::from_native(NAME, operation, status))
    }
}

impl DebuggerAdapter for LegacyAdapter
{
    fn name(&self) -> &'static str
    {
        NAME
    }

    fn arm_break_on_all_exceptions(&mut self) -> BreakerResult<()>
    {
        self.set_group(true, "arm break-on-all")
    }

    fn disarm_break_on_all_exceptions(&mut self) -> BreakerResult<()>
    {
        self.set_group(false, "disarm break-on-all")
    }

    fn is_session_active(&self) -> bool
    {
        self.service.has_current_session()
    }

    fn would_break(&self, _exception_name: &str) -> bool
    {
        self.service.group_breaks_when_thrown(CLR_EXCEPTION_GROUP)
    }
}
