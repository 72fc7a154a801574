//! Process runtime for the PHOENIX launcher.
//!
//! Adapters for the ports defined in `phoenix-core` (accelerator probe,
//! release fetcher, terminal reporter) plus the [`Session`] that ties them
//! together: resolve a runnable binary once, then launch simulations and
//! stream their progress.
#![deny(unsafe_code)]

pub mod detect;
pub mod env;
pub mod fetch;
pub mod invocation;
pub mod reporter;
pub mod resolve;
mod session;
pub mod stream;
pub mod verify;

pub use detect::{AccelerationDecision, NvidiaSmiProbe, decide_acceleration, parse_attached_gpus};
pub use fetch::HttpFetcher;
pub use invocation::PhoenixCommandBuilder;
pub use reporter::TerminalReporter;
pub use resolve::{Resolution, ResolutionSource, ResolveError, Resolver};
pub use session::{BinaryState, RunOutcome, Session, SessionBuilder};
pub use stream::{ProgressFilter, is_progress_line};
pub use verify::{VerifyError, verify_binary};

