//! One-time wiring of the subsystem.
//!
//! Everything is constructed once here and handed out by reference; there is
//! no global instance to look up. Order matters: the policy engine is
//! subscribed to the session manager before anything else can be, so it is
//! always reconciled first.

use std::sync::Arc;

use tracing::info;

use crate::adapter::HostVersion;
use crate::command::BreakOnAllCommand;
use crate::engine::BreakPolicyEngine;
use crate::ignore::IgnoreSource;
use crate::native::NativeDebugger;
use crate::session::SessionManager;
use crate::settings::BreakerSettings;

/// Inputs supplied by the host at startup.
#[derive(Debug)]
pub struct BootstrapOptions
{
    /// Detected host version.
    pub host: HostVersion,
    /// The host's debugger service, if it has one.
    pub native: Option<NativeDebugger>,
    /// Settings loaded by the host.
    pub settings: BreakerSettings,
}

/// The wired subsystem.
#[derive(Debug)]
pub struct Breaker
{
    ignore: IgnoreSource,
    session: SessionManager,
    engine: Arc<BreakPolicyEngine>,
    command: BreakOnAllCommand,
}

impl Breaker
{
    /// Build and connect every component.
    #[must_use]
    pub fn bootstrap(options: BootstrapOptions) -> Self
    {
        let BootstrapOptions { host, native, settings } = options;
        info!(host = %host, patterns = settings.ignored.len(), break_on_all = settings.break_on_all, "bootstrapping exception breaker");

        let ignore = IgnoreSource::new(settings.ignored);
        let session = SessionManager::new(host, native);
        let engine = BreakPolicyEngine::new(session.clone(), ignore.predicate(), settings.break_on_all);
        let command = BreakOnAllCommand::new(Arc::clone(&engine), session.clone());

        Self {
            ignore,
            session,
            engine,
            command,
        }
    }

    /// Configuration source handle; the host replaces the list through it.
    #[must_use]
    pub fn ignore_source(&self) -> &IgnoreSource
    {
        &self.ignore
    }

    /// Session manager; the host delivers lifecycle notifications to it.
    #[must_use]
    pub fn session(&self) -> &SessionManager
    {
        &self.session
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<BreakPolicyEngine>
    {
        &self.engine
    }

    #[must_use]
    pub fn command(&self) -> &BreakOnAllCommand
    {
        &self.command
    }

    /// Current settings, for the host to persist.
    #[must_use]
    pub fn settings(&self) -> BreakerSettings
    {
        BreakerSettings {
            break_on_all: self.engine.is_enabled(),
            ignored: (*self.ignore.snapshot()).clone(),
        }
    }
}
