//! The "Break on All Exceptions" command.
//!
//! Thin UI-facing layer: invoking the command toggles the policy engine and
//! the status reflects the engine's desired state as a checkmark. It never
//! sees adapter errors; those end in the engine's log output.

use std::sync::Arc;

use crate::engine::BreakPolicyEngine;
use crate::session::SessionManager;

/// What the UI should show for the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus
{
    /// Checkmark: break-on-all is wanted.
    pub checked: bool,
    /// Shown only while debugging.
    pub visible: bool,
}

/// Toggle command bound to a [`BreakPolicyEngine`].
#[derive(Debug, Clone)]
pub struct BreakOnAllCommand
{
    engine: Arc<BreakPolicyEngine>,
    session: SessionManager,
}

impl BreakOnAllCommand
{
    /// Display text of the command.
    pub const TEXT: &'static str = "Break on All Exceptions";

    #[must_use]
    pub fn new(engine: Arc<BreakPolicyEngine>, session: SessionManager) -> Self
    {
        Self { engine, session }
    }

    /// Handle a click; returns the new checkmark state.
    pub fn invoke(&self) -> bool
    {
        self.engine.toggle()
    }

    /// Current status for rendering.
    #[must_use]
    pub fn status(&self) -> CommandStatus
    {
        CommandStatus {
            checked: self.engine.is_enabled(),
            visible: self.session.state().is_live(),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::adapter::HostVersion;
    use crate::ignore::IgnoreSource;
    use crate::native::simulated::SimulatedSettingsService;
    use crate::native::NativeDebugger;
    use crate::session::SessionEvent;

    #[test]
    fn test_invoke_toggles_checkmark()
    {
        let (service, _recorder) = SimulatedSettingsService::new();
        let session = SessionManager::new(HostVersion::V12, Some(NativeDebugger::ExceptionSettings(Box::new(service))));
        let engine = BreakPolicyEngine::new(session.clone(), IgnoreSource::default().predicate(), false);
        let command = BreakOnAllCommand::new(engine, session.clone());

        assert_eq!(
            command.status(),
            CommandStatus {
                checked: false,
                visible: false
            }
        );

        session.notify(SessionEvent::Starting);
        assert!(command.status().visible);
        assert!(command.invoke());
        assert!(command.status().checked);
        assert!(!command.invoke());
        assert!(!command.status().checked);

        session.notify(SessionEvent::Ready);
        session.notify(SessionEvent::Ended);
        assert!(!command.status().visible);
    }
}
