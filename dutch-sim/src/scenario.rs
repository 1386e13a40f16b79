//! Scenario files.
//!
//! A scenario names its bidders with their starting payment balances and
//! lists the steps to replay:
//!
//! ```json
//! {
//!   "name": "late buyers",
//!   "bidders": { "alice": 10000000, "bob": 10000000 },
//!   "steps": [
//!     { "action": "start" },
//!     { "action": "advance", "seconds": 600 },
//!     { "action": "bid", "bidder": "alice", "units": 500, "payment": 1000000 },
//!     { "action": "advance", "seconds": 600 },
//!     { "action": "claim", "bidder": "alice" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use dutch_core::{Amount, Units};

/// Label of the deploying administrator.
pub const ADMIN_LABEL: &str = "deployer";

/// Label of the engine's custody account.
pub const ENGINE_LABEL: &str = "dutch-auction-engine";

/// A scripted auction run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Bidder label to initial payment balance.
    pub bidders: BTreeMap<String, Amount>,

    /// Steps replayed in order.
    pub steps: Vec<Step>,
}

/// One scripted action.
///
/// Parsed through the flat [`RawStep`] form: internally tagged enums buffer
/// their content, and that buffer cannot hold `u128` payments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", try_from = "RawStep")]
pub enum Step {
    /// Start the sale (as the administrator unless `caller` is given).
    Start {
        /// Label of the caller.
        caller: Option<String>,
    },

    /// Bid for `units`. Without `payment`, pays exactly the current cost.
    Bid {
        /// Label of the bidder.
        bidder: String,
        /// Units requested.
        units: Units,
        /// Payment attached to the bid.
        payment: Option<Amount>,
    },

    /// Claim units and refund.
    Claim {
        /// Label of the claimant.
        bidder: String,
    },

    /// Move the clock forward.
    Advance {
        /// Seconds to add.
        seconds: u64,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Action {
    Start,
    Bid,
    Claim,
    Advance,
}

/// Wire form of a [`Step`]: every field optional, checked per action.
#[derive(Debug, Deserialize)]
struct RawStep {
    action: Action,
    caller: Option<String>,
    bidder: Option<String>,
    units: Option<Units>,
    payment: Option<Amount>,
    seconds: Option<u64>,
}

impl TryFrom<RawStep> for Step {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        fn required<T>(value: Option<T>, action: &str, field: &str) -> Result<T, String> {
            value.ok_or_else(|| format!("{} step is missing `{}`", action, field))
        }

        Ok(match raw.action {
            Action::Start => Step::Start { caller: raw.caller },
            Action::Bid => Step::Bid {
                bidder: required(raw.bidder, "bid", "bidder")?,
                units: required(raw.units, "bid", "units")?,
                payment: raw.payment,
            },
            Action::Claim => Step::Claim {
                bidder: required(raw.bidder, "claim", "bidder")?,
            },
            Action::Advance => Step::Advance {
                seconds: required(raw.seconds, "advance", "seconds")?,
            },
        })
    }
}

impl Scenario {
    /// Read a scenario from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Parse a scenario from JSON text.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// The reference flow: two bidders take 2500 units each one second
    /// apart, selling out the supply, then both claim.
    pub fn reference() -> Self {
        let bidders = [("alice", 10_000_000), ("bob", 10_000_000)]
            .into_iter()
            .map(|(label, funds)| (label.to_string(), funds))
            .collect();

        Self {
            name: "reference sellout".to_string(),
            bidders,
            steps: vec![
                Step::Start { caller: None },
                Step::Advance { seconds: 1 },
                Step::Bid { bidder: "alice".to_string(), units: 2500, payment: None },
                Step::Advance { seconds: 1 },
                Step::Bid { bidder: "bob".to_string(), units: 2500, payment: None },
                Step::Claim { bidder: "alice".to_string() },
                Step::Claim { bidder: "bob".to_string() },
            ],
        }
    }

    /// Every bid or claim must name a declared bidder.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            let bidder = match step {
                Step::Bid { bidder, .. } | Step::Claim { bidder } => bidder,
                Step::Start { .. } | Step::Advance { .. } => continue,
            };
            if !self.bidders.contains_key(bidder) {
                anyhow::bail!("step {}: unknown bidder {:?}", index + 1, bidder);
            }
        }
        Ok(())
    }
}
