use chrono::{DateTime, Utc};
use num_bigint::Sign;
use std::collections::HashMap;
use tracing::warn;

use crate::indexer::transformations::amounts::{parse_amount, split_coins};
use crate::models::errors::AmountError;
use crate::models::logs::{LogEventsAttributes, LogFormat};
use crate::models::transactions::{
    Account, EventTransfer, SubsetEvent, TransactionAmount, TransactionEvent,
};

/// Escrow account of the staking module; never a reward recipient.
pub const UNBONDED_TOKENS_POOL: &str = "kava1tygms3xhhs3yv487phx3dw4a95jn7t7lawprey";

const TRANSFER_EVENT: &str = "transfer";

/// Rebuilds per-recipient transfers from the positional attribute stream of `transfer` events.
///
/// An amount belongs to the most recent recipient seen before it in the same event.
/// Amounts that appear before any recipient, or that belong to `skip_addr`, are ignored.
/// The map is left untouched when nothing was found.
pub fn produce_transfers(
    se: &mut SubsetEvent,
    transfer_type: &str,
    skip_addr: Option<&str>,
    logf: &LogFormat,
) -> Result<(), AmountError> {
    let mut order: Vec<String> = Vec::new();
    let mut by_recipient: HashMap<String, Vec<TransactionAmount>> = HashMap::new();

    for event in logf.events.iter().filter(|e| e.kind == TRANSFER_EVENT) {
        let mut latest_recipient: Option<&str> = None;

        for attr in &event.attributes {
            if let Some(first) = attr.recipient.first() {
                latest_recipient = Some(first.as_str());
            }

            let Some(recipient) = latest_recipient else {
                continue;
            };
            if skip_addr == Some(recipient) || attr.amount.is_empty() {
                continue;
            }

            let amounts = parse_attribute_amounts(attr)?;
            if !by_recipient.contains_key(recipient) {
                order.push(recipient.to_string());
            }
            by_recipient
                .entry(recipient.to_string())
                .or_default()
                .extend(amounts);
        }
    }

    if order.is_empty() {
        return Ok(());
    }

    let transfers = order
        .into_iter()
        .map(|recipient| {
            let amounts = by_recipient.remove(&recipient).unwrap_or_default();
            EventTransfer {
                account: Account::new(recipient),
                amounts,
            }
        })
        .collect();
    se.transfers.insert(transfer_type.to_string(), transfers);

    Ok(())
}

/// Undelegation variant: every non-zero amount outside the unbonding pool is a single
/// `reward` transfer to the last non-pool recipient.
pub fn produce_unbonding_transfers(
    se: &mut SubsetEvent,
    logf: &LogFormat,
) -> Result<(), AmountError> {
    let mut withdraw_addr = "";
    let mut rewards = Vec::new();

    for event in logf.events.iter().filter(|e| e.kind == TRANSFER_EVENT) {
        let mut latest_recipient = "";

        for attr in &event.attributes {
            if let Some(first) = attr.recipient.first() {
                latest_recipient = first.as_str();
            }
            if latest_recipient == UNBONDED_TOKENS_POOL {
                continue;
            }
            withdraw_addr = latest_recipient;

            rewards.extend(
                parse_attribute_amounts(attr)?
                    .into_iter()
                    .filter(|amount| amount.numeric.sign() != Sign::NoSign),
            );
        }
    }

    if rewards.is_empty() {
        return Ok(());
    }

    se.transfers.insert(
        "reward".to_string(),
        vec![EventTransfer {
            account: Account::new(withdraw_addr),
            amounts: rewards,
        }],
    );
    Ok(())
}

fn parse_attribute_amounts(
    attr: &LogEventsAttributes,
) -> Result<Vec<TransactionAmount>, AmountError> {
    let mut out = Vec::new();
    for raw in &attr.amount {
        for coin in split_coins(raw) {
            out.push(parse_amount(coin)?);
        }
    }
    Ok(out)
}

/// Builds an event purely from the log of a message that has no decoded counterpart.
pub fn build_fallback_event(logf: &LogFormat) -> TransactionEvent {
    let sub = logf
        .events
        .iter()
        .map(|event| {
            let mut sub = SubsetEvent {
                kind: vec![event.kind.clone()],
                ..Default::default()
            };
            let mut amount_index = 0usize;

            for attr in &event.attributes {
                if !attr.module.is_empty() {
                    sub.module = attr.module.clone();
                }
                if !attr.action.is_empty() {
                    sub.action = attr.action.clone();
                }

                sub.sender.extend(attr.sender.iter().map(|id| EventTransfer {
                    account: Account::new(id.as_str()),
                    amounts: Vec::new(),
                }));
                sub.recipient.extend(attr.recipient.iter().map(|id| EventTransfer {
                    account: Account::new(id.as_str()),
                    amounts: Vec::new(),
                }));

                if !attr.completion_time.is_empty() {
                    match DateTime::parse_from_rfc3339(&attr.completion_time) {
                        Ok(t) => sub.completion = Some(t.with_timezone(&Utc)),
                        Err(e) => warn!(
                            value = %attr.completion_time,
                            error = %e,
                            "Unparseable completion time in log"
                        ),
                    }
                }

                for (role, ids) in &attr.validator {
                    sub.node
                        .entry(role.clone())
                        .or_default()
                        .extend(ids.iter().map(|id| Account::new(id.as_str())));
                }

                for (key, values) in &attr.others {
                    sub.additional
                        .entry(key.clone())
                        .or_default()
                        .extend(values.iter().cloned());
                }

                for raw in &attr.amount {
                    match parse_amount(raw) {
                        Ok(amount) => {
                            sub.amount.insert(amount_index.to_string(), amount);
                        }
                        Err(e) => warn!(amount = %raw, error = %e, "Dropping unparseable log amount"),
                    }
                    amount_index += 1;
                }
            }

            sub
        })
        .collect();

    TransactionEvent {
        id: logf.index(),
        kind: String::new(),
        sub,
    }
}
