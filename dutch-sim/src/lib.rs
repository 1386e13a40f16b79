//! Dutch auction simulator library.
//!
//! Deploys an auction against an in-memory ledger, escrows the supply,
//! funds bidders and replays scripted scenarios. Used by the `dutch-sim`
//! binary and by its tests.

pub mod cli;
pub mod config;
pub mod output;
pub mod runner;
pub mod scenario;

pub use config::SimConfig;
pub use runner::{BidderReport, Report, Simulation, StepRecord, StepResult};
pub use scenario::{Scenario, Step};
