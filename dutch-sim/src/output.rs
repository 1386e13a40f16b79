//! Terminal output.

use colored::Colorize;

use dutch_core::crypto::to_hex;
use dutch_core::{short_hex, AuctionEvent, SaleParameters};
use dutch_state::{floor_reached_at, price_at, AuctionState, Outcome};

use crate::runner::{Report, StepRecord, StepResult};
use crate::scenario::Step;

pub fn banner(title: &str) {
    println!("\n{}", "=".repeat(70).bright_blue());
    println!("{}", format!("  {}", title).bright_blue().bold());
    println!("{}", "=".repeat(70).bright_blue());
}

pub fn describe_step(step: &Step) -> String {
    match step {
        Step::Start { caller: None } => "start".to_string(),
        Step::Start { caller: Some(caller) } => format!("start as {}", caller),
        Step::Bid { bidder, units, payment: Some(payment) } => {
            format!("{} bids {} units paying {}", bidder, units, payment)
        }
        Step::Bid { bidder, units, payment: None } => {
            format!("{} bids {} units at the current price", bidder, units)
        }
        Step::Claim { bidder } => format!("{} claims", bidder),
        Step::Advance { seconds } => format!("advance {}s", seconds),
    }
}

pub fn print_record(record: &StepRecord) {
    let prefix = format!("[t+{:>5}]", record.offset).bright_cyan().bold();
    let description = describe_step(&record.step);

    match &record.result {
        StepResult::Advanced(_) => println!("{} {}", prefix, description.dimmed()),
        StepResult::Accepted(outcome) => {
            println!("{} {} {}", prefix, "OK".bright_green().bold(), description);
            match outcome {
                Outcome::Started => {}
                Outcome::Bid(receipt) => {
                    println!(
                        "           granted {} @ {} = {}, refund {}{}",
                        receipt.granted_units,
                        receipt.price,
                        receipt.cost,
                        receipt.refund,
                        if receipt.closed { ", sold out" } else { "" }
                    );
                }
                Outcome::Claimed(receipt) if receipt.is_nothing() => {
                    println!("           nothing to claim");
                }
                Outcome::Claimed(receipt) => {
                    println!(
                        "           received {} units, refund {}",
                        receipt.payout_units, receipt.refund_amount
                    );
                }
            }
        }
        StepResult::Rejected(err) => {
            println!(
                "{} {} {}: {}",
                prefix,
                "REJECTED".bright_red().bold(),
                description,
                err
            );
        }
    }
}

pub fn print_report(report: &Report) {
    banner("SETTLEMENT REPORT");
    println!("  Stage:           {}", report.stage);
    match report.clearing_price {
        Some(price) => println!("  Clearing price:  {}", price),
        None => println!("  Clearing price:  {}", "not fixed".yellow()),
    }
    println!("  Sold:            {}", report.sold);
    println!("  Burned:          {}", report.burned);
    println!("  Custody tokens:  {}", report.custody_tokens);
    println!("  Custody payment: {}", report.custody_payment);
    println!();
    println!(
        "  {:<12} {:>10} {:>14} {:>8} {:>10} {:>14}",
        "bidder", "allocated", "paid", "claimed", "tokens", "payment"
    );
    for bidder in &report.bidders {
        println!(
            "  {:<12} {:>10} {:>14} {:>8} {:>10} {:>14}",
            bidder.label,
            bidder.allocated_units,
            bidder.paid_total,
            if bidder.claimed { "yes" } else { "no" },
            bidder.token_balance,
            bidder.payment_balance
        );
    }
    println!();
    if report.conserved {
        println!("  {} value conserved", "OK".bright_green().bold());
    } else {
        println!("  {} value NOT conserved", "FAIL".bright_red().bold());
    }
}

pub fn print_events(events: &[AuctionEvent]) {
    println!("\n  {}", "Events".bold());
    for event in events {
        let line = match event {
            AuctionEvent::Started { start_time, close_time } => {
                format!("started at {}, closes at {}", start_time, close_time)
            }
            AuctionEvent::BidAccepted { bidder, granted_units, cost } => {
                format!("bid {} granted {} for {}", short_hex(bidder), granted_units, cost)
            }
            AuctionEvent::Refunded { bidder, amount } => {
                format!("refund {} to {}", amount, short_hex(bidder))
            }
            AuctionEvent::Closed { timestamp, clearing_price, unsold_burned } => format!(
                "closed at {}, clearing {}, burned {}",
                timestamp, clearing_price, unsold_burned
            ),
            AuctionEvent::Claimed { bidder, units, refund } => {
                format!("claim {} received {} units, refund {}", short_hex(bidder), units, refund)
            }
        };
        println!("    {}", line);
    }
}

/// Price at every `step` seconds from start to `duration`, plus the deadline.
pub fn schedule_rows(params: &SaleParameters, duration: u64, step: u64) -> Vec<(u64, u128)> {
    let step = step.max(1);
    let mut rows: Vec<(u64, u128)> = (0..duration)
        .step_by(usize::try_from(step).unwrap_or(usize::MAX))
        .map(|offset| (offset, price_at(params, 0, offset)))
        .collect();
    rows.push((duration, price_at(params, 0, duration)));
    rows
}

pub fn print_schedule(params: &SaleParameters, duration: u64, step: u64) {
    banner("PRICE SCHEDULE");
    match floor_reached_at(params, 0) {
        Some(floor) if floor <= duration => {
            println!("  Floor {} reached at t+{}s", params.reserved_price, floor)
        }
        Some(floor) => println!(
            "  Floor {} reached at t+{}s, after the {}s deadline",
            params.reserved_price, floor, duration
        ),
        None => println!("  Price never decays"),
    }
    println!();
    for (offset, price) in schedule_rows(params, duration, step) {
        let line = format!("  t+{:>6}s  {:>10}", offset, price);
        if offset == duration {
            println!("{}  {}", line, "deadline".bright_yellow());
        } else {
            println!("{}", line);
        }
    }
}

pub fn print_snapshot(state: &AuctionState, digest: &[u8; 32]) {
    banner("SNAPSHOT");
    println!("  Digest:          {}", to_hex(digest));
    println!("  Administrator:   {}", short_hex(&state.administrator));
    println!("  Stage:           {}", state.stage);
    println!(
        "  Prices:          {} -> {} (-{}/s)",
        state.parameters.starting_price, state.parameters.reserved_price, state.parameters.decay_per_second
    );
    println!("  Supply:          {}", state.parameters.total_supply);
    println!("  Start / close:   {:?} / {:?}", state.start_time, state.close_time);
    println!("  Closed at:       {:?}", state.closed_at);
    println!("  Clearing price:  {:?}", state.clearing_price);
    println!("  Allocated:       {}", state.total_allocated);
    println!("  Burned:          {}", state.unsold_burned);
    for (account, entry) in state.accounts() {
        println!(
            "    {}  units {:>8}  paid {:>14}  {}",
            short_hex(account),
            entry.allocated_units,
            entry.paid_total,
            if entry.claimed { "claimed" } else { "unclaimed" }
        );
    }
    if state.invariants_hold() {
        println!("  {} invariants hold", "OK".bright_green().bold());
    } else {
        println!("  {} invariants violated", "FAIL".bright_red().bold());
    }
}
