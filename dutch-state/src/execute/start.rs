//! Start handler.

use dutch_core::{AccountId, AuctionEvent, Operation, Stage};

use crate::error::{AuctionError, AuctionResult};
use crate::state::AuctionWriter;
use super::context::ExecutionContext;
use super::effects::Effects;

/// Execute a start.
///
/// Opens the sale at `ctx.timestamp` with the deadline
/// `ctx.timestamp + ctx.sale_duration`.
///
/// # Validation
/// - Caller must be the administrator
/// - Stage must be `Pending`
/// - The full supply must be escrowed to the engine (`escrowed`)
pub fn execute_start<S: AuctionWriter>(
    state: &mut S,
    ctx: &ExecutionContext,
    caller: &AccountId,
    escrowed: bool,
) -> AuctionResult<Effects<()>> {
    // Verify caller is the administrator
    let administrator = state.administrator();
    if *caller != administrator {
        return Err(AuctionError::Unauthorized {
            expected: administrator,
            caller: *caller,
        });
    }

    if state.stage() != Stage::Pending {
        return Err(AuctionError::WrongStage {
            operation: Operation::Start,
            stage: state.stage(),
        });
    }

    if !escrowed {
        return Err(AuctionError::InsufficientFunding {
            required: state.parameters().total_supply,
        });
    }

    let close_time = ctx
        .timestamp
        .checked_add(ctx.sale_duration)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    state.open(ctx.timestamp, close_time);

    tracing::info!(
        start_time = ctx.timestamp,
        close_time,
        supply = state.parameters().total_supply,
        "Auction started"
    );

    let mut effects = Effects::new(());
    effects.push_event(AuctionEvent::Started {
        start_time: ctx.timestamp,
        close_time,
    });
    Ok(effects)
}
