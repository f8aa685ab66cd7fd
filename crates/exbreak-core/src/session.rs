//! # Debug Session Tracking
//!
//! Follows the host's debug-session lifecycle and owns the one
//! [`DebuggerAdapter`] for the process.
//!
//! ## State machine
//!
//! ```text
//! NoSession --Starting--> Starting --Ready--> Active --Ended--> Stopped
//!                            ^                                     |
//!                            +---------------Starting--------------+
//! ```
//!
//! `Ended` is also accepted while `Starting` (a launch that failed). Any
//! other event is ignored.
//!
//! ## Subscribers
//!
//! [`SessionManager::on_transition`] callbacks run synchronously on the
//! thread that delivered the host notification, in registration order. No
//! lock is held while they run, so a callback may call back into the
//! manager.
//!
//! ## Degraded mode
//!
//! When the host has no usable debugger service the manager is built
//! degraded: it stays in `NoSession` forever, events are dropped and no
//! subscriber is ever called. This is logged once, at construction.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace, warn};

use crate::adapter::{create_adapter, DebuggerAdapter, HostVersion};
use crate::error::BreakerResult;
use crate::native::NativeDebugger;

/// Lifecycle state of the current debug session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState
{
    /// Nothing has been debugged yet.
    #[default]
    NoSession,
    /// The debugger is launching or attaching.
    Starting,
    /// The session is fully initialized.
    Active,
    /// The last session ended; a new one may start.
    Stopped,
}

impl SessionState
{
    /// Whether a session exists (starting or running).
    #[must_use]
    pub const fn is_live(self) -> bool
    {
        matches!(self, Self::Starting | Self::Active)
    }
}

impl fmt::Display for SessionState
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::NoSession => write!(f, "no session"),
            Self::Starting => write!(f, "starting"),
            Self::Active => write!(f, "active"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Lifecycle notification delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent
{
    /// A session is being launched or attached.
    Starting,
    /// The session finished initializing.
    Ready,
    /// The session ended.
    Ended,
}

/// Generation counter of debug sessions; bumped on every `Starting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

impl SessionId
{
    /// Create an identifier from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self
    {
        Self(value)
    }

    /// Get the raw numeric representation.
    #[must_use]
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

impl fmt::Display for SessionId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// A state change, as delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTransition
{
    pub from: SessionState,
    pub to: SessionState,
    /// Session the transition belongs to.
    pub session: SessionId,
}

/// Outcome of the can-break query for a thrown exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision
{
    /// The debugger stops.
    Break,
    /// The debugger would not stop on its own.
    Continue,
    /// The debugger would stop but the installed veto suppressed it.
    Vetoed,
}

/// Handle returned by [`SessionManager::on_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked on every session transition.
pub type TransitionCallback = Arc<dyn Fn(&SessionTransition) + Send + Sync>;

/// Session-scoped veto: returning `true` suppresses the break.
pub type BreakVeto = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Default)]
struct Lifecycle
{
    state: SessionState,
    session: SessionId,
    veto: Option<BreakVeto>,
}

struct Shared
{
    lifecycle: Mutex<Lifecycle>,
    adapter: Option<Mutex<Box<dyn DebuggerAdapter>>>,
    subscribers: Mutex<Vec<(SubscriptionId, TransitionCallback)>>,
    next_subscription: AtomicU64,
}

/// Tracks the debug session and owns the process's debugger adapter.
///
/// Cloning yields another handle to the same manager.
#[derive(Clone)]
pub struct SessionManager
{
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T>
{
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionManager
{
    /// Select the adapter for `host` and build a manager around it.
    ///
    /// If no adapter can be built (no service, or a service shape the host
    /// version does not use) the manager is degraded; see
    /// [`SessionManager::degraded`].
    #[must_use]
    pub fn new(host: HostVersion, native: Option<NativeDebugger>) -> Self
    {
        Self::from_adapter_result(create_adapter(host, native))
    }

    /// Build a manager from an adapter selection result.
    #[must_use]
    pub fn from_adapter_result(adapter: BreakerResult<Box<dyn DebuggerAdapter>>) -> Self
    {
        match adapter {
            Ok(adapter) => Self::with_adapter_instance(adapter),
            Err(err) => {
                warn!(%err, "debugger service unavailable; exception breaking is disabled for this process");
                Self::degraded()
            }
        }
    }

    /// Build a manager around an already selected adapter.
    #[must_use]
    pub fn with_adapter_instance(adapter: Box<dyn DebuggerAdapter>) -> Self
    {
        Self::build(Some(Mutex::new(adapter)))
    }

    /// Build a manager with no adapter. It never leaves `NoSession`.
    #[must_use]
    pub fn degraded() -> Self
    {
        Self::build(None)
    }

    fn build(adapter: Option<Mutex<Box<dyn DebuggerAdapter>>>) -> Self
    {
        Self {
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(Lifecycle::default()),
                adapter,
                subscribers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
            }),
        }
    }

    /// Whether the manager has no adapter.
    #[must_use]
    pub fn is_degraded(&self) -> bool
    {
        self.shared.adapter.is_none()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState
    {
        lock(&self.shared.lifecycle).state
    }

    /// The current (or most recent) session.
    #[must_use]
    pub fn current_session(&self) -> SessionId
    {
        lock(&self.shared.lifecycle).session
    }

    /// Register a transition callback. Callbacks run in registration order.
    pub fn on_transition<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SessionTransition) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.shared.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.shared.subscribers).push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool
    {
        let mut subscribers = lock(&self.shared.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(registered, _)| *registered != id);
        subscribers.len() != before
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize
    {
        lock(&self.shared.subscribers).len()
    }

    /// Deliver a host lifecycle notification.
    ///
    /// Returns the transition that happened, or `None` if the event was not
    /// valid from the current state (or the manager is degraded).
    pub fn notify(&self, event: SessionEvent) -> Option<SessionTransition>
    {
        if self.is_degraded() {
            trace!(?event, "ignoring session event, no debugger adapter");
            return None;
        }

        let transition = {
            let mut lifecycle = lock(&self.shared.lifecycle);
            let from = lifecycle.state;
            let to = match (from, event) {
                (SessionState::NoSession | SessionState::Stopped, SessionEvent::Starting) => {
                    lifecycle.session = SessionId(lifecycle.session.0.wrapping_add(1));
                    SessionState::Starting
                }
                (SessionState::Starting, SessionEvent::Ready) => SessionState::Active,
                (SessionState::Starting | SessionState::Active, SessionEvent::Ended) => {
                    lifecycle.veto = None;
                    SessionState::Stopped
                }
                _ => {
                    debug!(state = %from, ?event, "ignoring session event not valid in this state");
                    return None;
                }
            };
            lifecycle.state = to;
            SessionTransition {
                from,
                to,
                session: lifecycle.session,
            }
        };

        info!(session = %transition.session, from = %transition.from, to = %transition.to, "debug session transition");

        let subscribers: Vec<TransitionCallback> = lock(&self.shared.subscribers)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(&transition);
        }

        Some(transition)
    }

    /// Run `f` with exclusive access to the adapter.
    ///
    /// Returns `None` when the manager is degraded.
    pub fn with_adapter<R>(&self, f: impl FnOnce(&mut dyn DebuggerAdapter) -> R) -> Option<R>
    {
        let adapter = self.shared.adapter.as_ref()?;
        let mut guard = lock(adapter);
        Some(f(&mut **guard))
    }

    /// Whether the lifecycle is `Active` and the adapter agrees.
    #[must_use]
    pub fn is_active(&self) -> bool
    {
        self.state() == SessionState::Active && self.with_adapter(|adapter| adapter.is_session_active()).unwrap_or(false)
    }

    /// Install a veto for the current session.
    ///
    /// The veto is dropped when the session ends. Returns `false` (and
    /// installs nothing) when there is no live session.
    pub fn install_break_veto(&self, veto: BreakVeto) -> bool
    {
        let mut lifecycle = lock(&self.shared.lifecycle);
        if !lifecycle.state.is_live() {
            return false;
        }
        lifecycle.veto = Some(veto);
        true
    }

    /// Remove the current session's veto, if any.
    pub fn clear_break_veto(&self)
    {
        lock(&self.shared.lifecycle).veto = None;
    }

    /// Whether a veto is installed for the current session.
    #[must_use]
    pub fn has_break_veto(&self) -> bool
    {
        lock(&self.shared.lifecycle).veto.is_some()
    }

    /// Host notification that `exception_name` was thrown; answers whether
    /// the debugger should stop.
    pub fn notify_exception(&self, exception_name: &str) -> BreakDecision
    {
        let veto = {
            let lifecycle = lock(&self.shared.lifecycle);
            if lifecycle.state != SessionState::Active {
                return BreakDecision::Continue;
            }
            lifecycle.veto.clone()
        };

        let would_break = self
            .with_adapter(|adapter| adapter.would_break(exception_name))
            .unwrap_or(false);
        if !would_break {
            return BreakDecision::Continue;
        }

        match veto {
            Some(veto) if veto(exception_name) => {
                debug!(exception = exception_name, "break vetoed, exception is ignored");
                BreakDecision::Vetoed
            }
            _ => BreakDecision::Break,
        }
    }
}

impl fmt::Debug for SessionManager
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("session", &self.current_session())
            .field("degraded", &self.is_degraded())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
