//! # Break Policy Engine
//!
//! Keeps the user's "break on all exceptions, except these" intent and
//! re-applies it to the debugger every time a session becomes active.
//!
//! ## Two layers of state
//!
//! The native "break on throw" flag belongs to a single debug session: the
//! debugger forgets it when the session ends. The user's intent belongs to
//! the process. The engine therefore keeps the desired state itself and
//! re-arms the adapter on every `Starting -> Active` transition, at most
//! once per session.
//!
//! ## Ignored exceptions
//!
//! If the adapter can filter natively it is handed a live predicate over the
//! ignore list. Otherwise the engine installs a session-scoped veto on the
//! [`SessionManager`] that suppresses breaks on ignored names. Either way the
//! ignore list is looked up on every query, so edits apply immediately.
//!
//! ## Failures
//!
//! Adapter failures stop here. They are logged once per attempt with
//! `warn!`, the desired state is left untouched and the next session tries
//! again. Nothing is returned to the caller.
//!
//! ## Locking
//!
//! The desired state sits behind one mutex; every public operation takes it
//! for its whole duration, so mutations are serialized even if the host
//! delivers notifications from more than one thread. The ignore predicate
//! has its own lock and is never held while calling into the adapter.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use tracing::{debug, info, warn};

use crate::error::BreakerResult;
use crate::ignore::IgnorePredicate;
use crate::session::{SessionId, SessionManager, SessionState, SessionTransition, SubscriptionId};

/// How ignored exceptions are kept from breaking in an armed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode
{
    /// The adapter filters with the ignore predicate itself.
    Native,
    /// The engine vetoes breaks through the session manager.
    Veto,
}

/// Whether the desired policy is currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus
{
    /// Break-on-all is not wanted.
    Disabled,
    /// Wanted, waiting for the next active session.
    Deferred,
    /// Armed in the given session.
    Applied
    {
        session: SessionId,
        filter: FilterMode,
    },
    /// The adapter refused in the given session; retried next session.
    NotApplied
    {
        session: SessionId
    },
}

/// Value snapshot of the effective policy.
///
/// With `enabled == false` nothing breaks, whatever the ignore list says.
#[derive(Clone)]
pub struct BreakPolicy
{
    pub enabled: bool,
    is_ignored: IgnorePredicate,
}

impl BreakPolicy
{
    #[must_use]
    pub fn new(enabled: bool, is_ignored: IgnorePredicate) -> Self
    {
        Self { enabled, is_ignored }
    }

    /// Whether `exception_name` is on the ignore list.
    #[must_use]
    pub fn is_ignored(&self, exception_name: &str) -> bool
    {
        (self.is_ignored)(exception_name)
    }

    /// Whether the policy wants a break on `exception_name`.
    #[must_use]
    pub fn breaks_on(&self, exception_name: &str) -> bool
    {
        self.enabled && !self.is_ignored(exception_name)
    }
}

impl fmt::Debug for BreakPolicy
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("BreakPolicy").field("enabled", &self.enabled).finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Desired
{
    enabled: bool,
    status: PolicyStatus,
}

/// Owner of the break-on-all intent.
///
/// Built with [`BreakPolicyEngine::new`], which registers the engine with
/// the session manager. Build it before any other session consumer so it is
/// reconciled first.
pub struct BreakPolicyEngine
{
    me: Weak<Self>,
    session: SessionManager,
    ignore: RwLock<IgnorePredicate>,
    desired: Mutex<Desired>,
    subscription: SubscriptionId,
}

impl BreakPolicyEngine
{
    /// Create the engine and subscribe it to `session`.
    ///
    /// `enabled` is the desired state restored from settings. If a session
    /// is already active it is applied right away.
    pub fn new(session: SessionManager, ignore: IgnorePredicate, enabled: bool) -> Arc<Self>
    {
        if session.subscriber_count() > 0 {
            warn!("policy engine registered after other session consumers; they will observe unreconciled state");
        }

        let engine = Arc::new_cyclic(|me: &Weak<Self>| {
            let weak = me.clone();
            let subscription = session.on_transition(move |transition| {
                if let Some(engine) = weak.upgrade() {
                    engine.reconcile(transition);
                }
            });
            Self {
                me: me.clone(),
                session: session.clone(),
                ignore: RwLock::new(ignore),
                desired: Mutex::new(Desired {
                    enabled,
                    status: if enabled { PolicyStatus::Deferred } else { PolicyStatus::Disabled },
                }),
                subscription,
            }
        });

        if enabled && engine.session.state() == SessionState::Active {
            let mut desired = engine.lock();
            engine.apply(&mut desired, engine.session.current_session());
        }
        engine
    }

    fn lock(&self) -> MutexGuard<'_, Desired>
    {
        self.desired.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Desired break-on-all state (for the command checkmark).
    #[must_use]
    pub fn is_enabled(&self) -> bool
    {
        self.lock().enabled
    }

    /// Whether the desired state is currently in effect.
    #[must_use]
    pub fn status(&self) -> PolicyStatus
    {
        self.lock().status
    }

    /// Current effective policy.
    #[must_use]
    pub fn policy(&self) -> BreakPolicy
    {
        BreakPolicy::new(self.is_enabled(), self.live_predicate())
    }

    /// Whether any configured pattern matches `exception_name`.
    #[must_use]
    pub fn is_ignored(&self, exception_name: &str) -> bool
    {
        let predicate = Arc::clone(&self.ignore.read().unwrap_or_else(PoisonError::into_inner));
        predicate(exception_name)
    }

    /// Swap the ignore predicate source.
    ///
    /// Filters and vetoes already handed out pick the new source up on their
    /// next query.
    pub fn replace_ignore_predicate(&self, ignore: IgnorePredicate)
    {
        *self.ignore.write().unwrap_or_else(PoisonError::into_inner) = ignore;
        debug!("ignore predicate replaced");
    }

    /// Record whether break-on-all is wanted.
    ///
    /// Takes effect immediately while a session is active, otherwise at the
    /// next `Starting -> Active` transition. No adapter call is made while
    /// there is no active session.
    pub fn set_enabled(&self, enabled: bool)
    {
        let mut desired = self.lock();
        if desired.enabled == enabled {
            debug!(enabled, "break-on-all already in requested state");
            return;
        }
        desired.enabled = enabled;
        info!(enabled, "break-on-all toggled");

        if !self.session.is_active() {
            desired.status = if enabled { PolicyStatus::Deferred } else { PolicyStatus::Disabled };
            debug!(state = %self.session.state(), "no active session, change deferred");
            return;
        }

        let session = self.session.current_session();
        if enabled {
            self.apply(&mut desired, session);
        } else {
            self.withdraw(&mut desired, session);
        }
    }

    /// Flip the desired state; returns the new value.
    pub fn toggle(&self) -> bool
    {
        let enabled = !self.is_enabled();
        self.set_enabled(enabled);
        enabled
    }

    /// React to a session transition. Called by the session manager.
    pub fn reconcile(&self, transition: &SessionTransition)
    {
        let mut desired = self.lock();
        match transition.to {
            SessionState::Active => {
                if !desired.enabled {
                    desired.status = PolicyStatus::Disabled;
                    return;
                }
                if matches!(desired.status, PolicyStatus::Applied { session, .. } if session == transition.session) {
                    return;
                }
                self.apply(&mut desired, transition.session);
            }
            SessionState::Stopped | SessionState::NoSession => {
                // The debugger drops its exception settings with the session.
                desired.status = if desired.enabled { PolicyStatus::Deferred } else { PolicyStatus::Disabled };
            }
            SessionState::Starting => {
                debug!(session = %transition.session, enabled = desired.enabled, "session starting");
            }
        }
    }

    fn live_predicate(&self) -> IgnorePredicate
    {
        let me = self.me.clone();
        Arc::new(move |name: &str| me.upgrade().is_some_and(|engine| engine.is_ignored(name)))
    }

    fn apply(&self, desired: &mut Desired, session: SessionId)
    {
        let filter = self.live_predicate();
        let outcome = self.session.with_adapter(|adapter| -> BreakerResult<FilterMode> {
            adapter.arm_break_on_all_exceptions()?;
            if !adapter.supports_per_exception_filter() {
                return Ok(FilterMode::Veto);
            }
            match adapter.set_exception_filter(Some(filter)) {
                Ok(()) => Ok(FilterMode::Native),
                Err(err) => {
                    debug!(%err, adapter = adapter.name(), "native filter rejected, vetoing instead");
                    Ok(FilterMode::Veto)
                }
            }
        });

        desired.status = match outcome {
            None => PolicyStatus::Deferred,
            Some(Ok(FilterMode::Veto)) if !self.session.install_break_veto(self.live_predicate()) => {
                warn!(session = %session, "session ended before the veto was installed; will retry next session");
                PolicyStatus::NotApplied { session }
            }
            Some(Ok(filter)) => {
                info!(session = %session, ?filter, "break-on-all armed");
                PolicyStatus::Applied { session, filter }
            }
            Some(Err(err)) => {
                warn!(session = %session, %err, "break-on-all not applied; will retry next session");
                PolicyStatus::NotApplied { session }
            }
        };
    }

    fn withdraw(&self, desired: &mut Desired, session: SessionId)
    {
        let native_filter = matches!(
            desired.status,
            PolicyStatus::Applied {
                filter: FilterMode::Native,
                ..
            }
        );
        self.session.clear_break_veto();

        let outcome = self.session.with_adapter(|adapter| -> BreakerResult<()> {
            adapter.disarm_break_on_all_exceptions()?;
            if native_filter {
                if let Err(err) = adapter.set_exception_filter(None) {
                    debug!(%err, adapter = adapter.name(), "could not clear native filter");
                }
            }
            Ok(())
        });

        desired.status = match outcome {
            Some(Err(err)) => {
                warn!(session = %session, %err, "break-on-all not disarmed");
                PolicyStatus::NotApplied { session }
            }
            _ => {
                info!(session = %session, "break-on-all disarmed");
                PolicyStatus::Disabled
            }
        };
    }
}

impl Drop for BreakPolicyEngine
{
    fn drop(&mut self)
    {
        self.session.unsubscribe(self.subscription);
    }
}

impl fmt::Debug for BreakPolicyEngine
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let desired = self.lock();
        f.debug_struct("BreakPolicyEngine")
            .field("enabled", &desired.enabled)
            .field("status", &desired.status)
            .finish_non_exhaustive()
    }
}
