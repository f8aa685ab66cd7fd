//! Scripted host for the `simulate` command.
//!
//! Plays a list of steps against a fully wired [`Breaker`] backed by an
//! in-memory debugger service and records a transcript.

use std::fmt;
use std::str::FromStr;

use exbreak_core::native::simulated::{NativeRecorder, SimulatedLegacyService, SimulatedSettingsService};
use exbreak_core::prelude::*;

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step
{
    /// Lifecycle notification.
    Session(SessionEvent),
    /// Click on the "Break on All Exceptions" command.
    Toggle,
    /// An exception of the given type is thrown.
    Throw(String),
}

impl FromStr for Step
{
    type Err = BreakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            "start" => Ok(Self::Session(SessionEvent::Starting)),
            "ready" => Ok(Self::Session(SessionEvent::Ready)),
            "end" => Ok(Self::Session(SessionEvent::Ended)),
            "toggle" => Ok(Self::Toggle),
            _ => match s.strip_prefix("throw:") {
                Some(name) if !name.is_empty() => Ok(Self::Throw(name.to_string())),
                _ => Err(BreakerError::ConfigurationInvalid(format!(
                    "Unknown step: {s}. Use start, ready, end, toggle or throw:<Name>"
                ))),
            },
        }
    }
}

impl fmt::Display for Step
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Session(SessionEvent::Starting) => write!(f, "start"),
            Self::Session(SessionEvent::Ready) => write!(f, "ready"),
            Self::Session(SessionEvent::Ended) => write!(f, "end"),
            Self::Toggle => write!(f, "toggle"),
            Self::Throw(name) => write!(f, "throw:{name}"),
        }
    }
}

/// Wire a breaker against the simulated service shape `host` uses.
pub fn wire(host: HostVersion, settings: BreakerSettings, unsupported: bool) -> (Breaker, NativeRecorder)
{
    let (native, recorder) = match host {
        HostVersion::V10 | HostVersion::V11 => {
            let (service, recorder) = SimulatedLegacyService::new();
            (NativeDebugger::Legacy(Box::new(service)), recorder)
        }
        HostVersion::V12 => {
            let (service, recorder) = SimulatedSettingsService::new();
            (NativeDebugger::ExceptionSettings(Box::new(service)), recorder)
        }
    };
    recorder.set_unsupported(unsupported);

    let breaker = Breaker::bootstrap(BootstrapOptions {
        host,
        native: Some(native),
        settings,
    });
    (breaker, recorder)
}

/// Play `steps` and return one transcript line per step.
///
/// On `end` the simulated debugger forgets its exception settings before the
/// lifecycle notification is delivered, as a real host does.
pub fn run(breaker: &Breaker, recorder: &NativeRecorder, steps: &[Step]) -> Vec<String>
{
    steps
        .iter()
        .map(|step| match step {
            Step::Session(event) => {
                if *event == SessionEvent::Ended && breaker.session().state().is_live() {
                    recorder.end_session();
                }
                describe_transition(breaker, step, *event)
            }
            Step::Toggle => {
                let checked = breaker.command().invoke();
                format!(
                    "{step}: break on all {} ({})",
                    if checked { "on" } else { "off" },
                    describe_status(breaker.engine().status())
                )
            }
            Step::Throw(name) => {
                let decision = match breaker.session().notify_exception(name) {
                    BreakDecision::Break => "break",
                    BreakDecision::Continue => "continue",
                    BreakDecision::Vetoed => "continue (ignored)",
                };
                format!("{step}: {decision}")
            }
        })
        .collect()
}

fn describe_transition(breaker: &Breaker, step: &Step, event: SessionEvent) -> String
{
    match breaker.session().notify(event) {
        Some(transition) => format!(
            "{step}: session {} {} -> {} ({})",
            transition.session,
            transition.from,
            transition.to,
            describe_status(breaker.engine().status())
        ),
        None => format!("{step}: ignored in state {}", breaker.session().state()),
    }
}

fn describe_status(status: PolicyStatus) -> String
{
    match status {
        PolicyStatus::Disabled => "disabled".to_string(),
        PolicyStatus::Deferred => "waiting for session".to_string(),
        PolicyStatus::Applied { session, filter } => {
            let filter = match filter {
                FilterMode::Native => "native filter",
                FilterMode::Veto => "veto",
            };
            format!("armed in session {session}, {filter}")
        }
        PolicyStatus::NotApplied { session } => format!("not applied in session {session}"),
    }
}
