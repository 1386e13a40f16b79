//! Effect handlers.
//!
//! Each handler validates an operation against the current state, applies
//! every state mutation, and returns the ledger instructions and events the
//! engine must issue afterwards. Handlers never touch the ledger themselves,
//! which is what keeps all bookkeeping ahead of any outbound transfer.

mod bid;
mod claim;
mod context;
mod effects;
mod settlement;
mod start;

pub use bid::execute_bid;
pub use claim::execute_claim;
pub use context::{ExecutionContext, DEFAULT_SALE_DURATION};
pub use effects::Effects;
pub use settlement::{fix_clearing, settle_account, Settlement};
pub use start::execute_start;
