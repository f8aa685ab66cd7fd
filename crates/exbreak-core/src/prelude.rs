//! Common module for library exports

pub use crate::adapter::{create_adapter, DebuggerAdapter, HostVersion};
pub use crate::bootstrap::{BootstrapOptions, Breaker};
pub use crate::command::{BreakOnAllCommand, CommandStatus};
pub use crate::engine::{BreakPolicy, BreakPolicyEngine, FilterMode, PolicyStatus};
pub use crate::error::{BreakerError, BreakerResult};
pub use crate::ignore::{IgnoreList, IgnorePredicate, IgnoreSource};
pub use crate::native::NativeDebugger;
pub use crate::pattern::{ExceptionPattern, MatchMode};
pub use crate::session::{BreakDecision, SessionEvent, SessionId, SessionManager, SessionState, SessionTransition};
pub use crate::settings::BreakerSettings;
