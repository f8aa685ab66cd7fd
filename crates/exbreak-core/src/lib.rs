//! # exbreak-core
//!
//! Exception-break policy for debuggers.
//!
//! This crate keeps a user's "break on every thrown exception, except these"
//! intent alive across debug sessions and across host versions whose
//! debuggers expose that control through different native interfaces:
//! - Ignore patterns and the configuration source that owns them
//! - A policy engine that re-arms break-on-all whenever a session starts
//! - A session manager tracking the debugger lifecycle
//! - Version-specific adapters over the native debugger services
//!
//! ## Host Support
//!
//! - **Host 10/11**: legacy exception-group service, ignored exceptions are
//!   vetoed by the engine
//! - **Host 12**: exception settings service, ignored exceptions are filtered
//!   natively
//!
//! ## Quick Start
//!
//! ```rust
//! use exbreak_core::prelude::*;
//! use exbreak_core::native::simulated::SimulatedSettingsService;
//!
//! let (service, _recorder) = SimulatedSettingsService::new();
//! let breaker = Breaker::bootstrap(BootstrapOptions {
//!     host: HostVersion::V12,
//!     native: Some(NativeDebugger::ExceptionSettings(Box::new(service))),
//!     settings: BreakerSettings::from_toml_str(r#"ignored = ["System.*"]"#)?,
//! });
//!
//! breaker.command().invoke();
//! breaker.session().notify(SessionEvent::Starting);
//! breaker.session().notify(SessionEvent::Ready);
//!
//! assert_eq!(breaker.session().notify_exception("MyApp.Failure"), BreakDecision::Break);
//! assert_eq!(breaker.session().notify_exception("System.IO.IOException"), BreakDecision::Continue);
//! # Ok::<(), exbreak_core::error::BreakerError>(())
//! ```

pub mod adapter;
pub mod bootstrap;
pub mod command;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod native;
pub mod pattern;
pub mod prelude;
pub mod session;
pub mod settings;

pub use adapter::{create_adapter, DebuggerAdapter, HostVersion};
pub use bootstrap::{BootstrapOptions, Breaker};
pub use engine::BreakPolicyEngine;
// Re-export commonly used types
pub use error::{BreakerError, BreakerResult};
pub use session::SessionManager;
