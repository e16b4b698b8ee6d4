pub mod catalog;
pub mod command;
pub mod deploy;
pub mod error;
pub mod history;
pub mod pricing;
pub mod state;
pub mod telemetry;

pub use catalog::{Catalog, CloudProvider, Pillar};
pub use command::{dispatch, Command, Outcome, OutputKind, OutputLine};
pub use error::NexusError;
pub use history::ShellHistory;
pub use state::ConsoleState;
