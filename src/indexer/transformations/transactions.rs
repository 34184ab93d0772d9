use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::indexer::transformations::amounts::coin_amount;
use crate::indexer::transformations::mappers::lookup;
use crate::indexer::transformations::messages::{DecodedMessage, decode_message};
use crate::indexer::transformations::reconciler::build_fallback_event;
use crate::metrics::MetricsSink;
use crate::models::common::Block;
use crate::models::errors::AssembleError;
use crate::models::logs::{LogFormat, TxLogError};
use crate::models::proto::{AuthInfo, TxBody, TxRaw};
use crate::models::rpc::{ResultTxSearch, TxResponse};
use crate::models::transactions::{
    SubsetEvent, SubsetEventError, Transaction, TransactionAmount, TransactionEvent,
};

pub trait TransactionTransformer {
    fn transform_transactions(
        self,
        blocks: &HashMap<u64, Block>,
        metrics: &dyn MetricsSink,
    ) -> Vec<Transaction>;
}

impl TransactionTransformer for ResultTxSearch {
    /// Transactions that cannot be assembled are logged, counted as broken and
    /// left out; the rest of the page is kept.
    fn transform_transactions(
        self,
        blocks: &HashMap<u64, Block>,
        metrics: &dyn MetricsSink,
    ) -> Vec<Transaction> {
        self.txs
            .iter()
            .filter_map(|raw| match assemble_transaction(raw, blocks, metrics) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    error!(hash = %raw.hash, height = %raw.height, error = %e, "Skipping transaction");
                    metrics.broken_message("tx", "decode");
                    None
                }
            })
            .collect()
    }
}

/// Converts one raw `tx_search` entry into a normalized transaction.
///
/// Only an unreadable base64 payload is an error. Every other problem is logged,
/// counted through `metrics`, and leaves the affected fields at their defaults.
pub fn assemble_transaction(
    raw: &TxResponse,
    blocks: &HashMap<u64, Block>,
    metrics: &dyn MetricsSink,
) -> Result<Transaction, AssembleError> {
    let started = Instant::now();

    let height = parse_scalar(&raw.height, "height", &raw.hash);
    let (logs, mut errors) = parse_logs(raw);
    errors.extend(nested_errors(&logs));

    let payload = STANDARD
        .decode(raw.tx.trim())
        .map_err(|source| AssembleError::Base64 {
            hash: raw.hash.clone(),
            source,
        })?;
    let (body, auth_info) = decode_envelope(&payload, &raw.hash);

    let mut events = Vec::with_capacity(body.messages.len() + logs.len() + errors.len());
    let mut covered = HashSet::new();

    ////////////////////////////////// Embedded Messages //////////////////////////////////
    for (index, any) in body.messages.iter().enumerate() {
        let id = index.to_string();
        let empty = LogFormat::default();
        let logf = find_log(&logs, index).unwrap_or(&empty);
        covered.insert(id.clone());

        let mut tev = TransactionEvent {
            id,
            ..Default::default()
        };

        match decode_message(any) {
            DecodedMessage::Known { route, action, msg } => match lookup(route, action) {
                Some(mapper) => match mapper(&msg, logf) {
                    Ok(sub) if sub.is_present() => {
                        tev.kind = action.to_string();
                        tev.sub.push(sub);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        metrics.broken_message(route, action);
                        warn!(route, action, height, hash = %raw.hash, error = %e, "Problem mapping message");
                    }
                },
                None => {
                    metrics.unknown_message(route, action);
                    debug!(route, action, height, "Decoded message without a mapper");
                }
            },
            DecodedMessage::Broken {
                route,
                action,
                error,
            } => {
                metrics.broken_message(route, action);
                warn!(route, action, height, hash = %raw.hash, error = %error, "Problem decoding message");
            }
            DecodedMessage::Unknown { route, action } => {
                metrics.unknown_message(&route, &action);
                debug!(route = %route, action = %action, height, hash = %raw.hash, "Unknown message type");
            }
        }

        events.push(tev);
    }

    ////////////////////////////////// Log-only Entries ///////////////////////////////////
    for logf in &logs {
        if covered.insert(logf.index()) {
            events.push(build_fallback_event(logf));
        }
    }

    ////////////////////////////////////// Errors ////////////////////////////////////////
    events.extend(errors.into_iter().map(error_event));

    let fee = auth_info
        .fee
        .map(|fee| fee_amounts(&fee.amount, &raw.hash))
        .unwrap_or_default();

    let mut tx = Transaction {
        hash: raw.hash.clone(),
        memo: body.memo,
        height,
        gas_wanted: parse_scalar(&raw.tx_result.gas_wanted, "gas_wanted", &raw.hash),
        gas_used: parse_scalar(&raw.tx_result.gas_used, "gas_used", &raw.hash),
        fee,
        raw_log: raw.tx_result.log.as_bytes().to_vec(),
        raw: payload,
        events,
        ..Default::default()
    };

    match blocks.get(&height) {
        Some(block) => {
            tx.time = block.time;
            tx.chain_id = block.chain_id.clone();
            tx.block_hash = block.hash.clone();
        }
        None => debug!(height, hash = %raw.hash, "No block metadata for transaction"),
    }

    metrics.transaction_converted(started.elapsed());
    Ok(tx)
}

/// Success logs are a list; a failed transaction carries a single error object instead.
fn parse_logs(raw: &TxResponse) -> (Vec<LogFormat>, Vec<TxLogError>) {
    let result = &raw.tx_result;
    match serde_json::from_str::<Vec<LogFormat>>(&result.log) {
        Ok(logs) => (logs, Vec::new()),
        Err(e) if result.code != 0 => {
            let err = serde_json::from_str::<TxLogError>(&result.log).unwrap_or_else(|_| {
                TxLogError {
                    codespace: result.codespace.clone(),
                    code: f64::from(result.code),
                    message: result.log.clone(),
                }
            });
            debug!(hash = %raw.hash, code = result.code, error = %e, "Transaction failed on chain");
            (Vec::new(), vec![err])
        }
        Err(e) => {
            if !result.log.is_empty() {
                warn!(hash = %raw.hash, error = %e, "Unreadable transaction log");
            }
            (Vec::new(), Vec::new())
        }
    }
}

fn nested_errors(logs: &[LogFormat]) -> Vec<TxLogError> {
    logs.iter()
        .filter_map(|logf| serde_json::from_str::<TxLogError>(&logf.log).ok())
        .filter(|err| !err.message.is_empty())
        .collect()
}

fn decode_envelope(payload: &[u8], hash: &str) -> (TxBody, AuthInfo) {
    let envelope = TxRaw::decode(payload).unwrap_or_else(|e| {
        warn!(hash, error = %e, "Problem decoding transaction envelope");
        TxRaw::default()
    });
    let body = TxBody::decode(envelope.body_bytes.as_slice()).unwrap_or_else(|e| {
        warn!(hash, error = %e, "Problem decoding transaction body");
        TxBody::default()
    });
    let auth_info = AuthInfo::decode(envelope.auth_info_bytes.as_slice()).unwrap_or_else(|e| {
        warn!(hash, error = %e, "Problem decoding transaction auth info");
        AuthInfo::default()
    });
    (body, auth_info)
}

/// Positional match first; logs may be sparse or out of order, so fall back to a scan.
fn find_log(logs: &[LogFormat], index: usize) -> Option<&LogFormat> {
    let wanted = index.to_string();
    logs.get(index)
        .filter(|logf| logf.index() == wanted)
        .or_else(|| logs.iter().find(|logf| logf.index() == wanted))
}

fn fee_amounts(coins: &[crate::models::proto::Coin], hash: &str) -> Vec<TransactionAmount> {
    coins
        .iter()
        .filter_map(|coin| match coin_amount(coin) {
            Ok(amount) => Some(amount),
            Err(e) => {
                warn!(hash, denom = %coin.denom, error = %e, "Dropping unreadable fee amount");
                None
            }
        })
        .collect()
}

fn parse_scalar(value: &str, field: &str, hash: &str) -> u64 {
    value.trim().parse().unwrap_or_else(|e| {
        warn!(hash, field, value, error = %e, "Problem parsing transaction field");
        0
    })
}

fn error_event(err: TxLogError) -> TransactionEvent {
    TransactionEvent {
        id: String::new(),
        kind: "error".to_string(),
        sub: vec![SubsetEvent {
            kind: vec!["error".to_string()],
            module: err.codespace,
            error: Some(SubsetEventError {
                message: err.message,
            }),
            ..Default::default()
        }],
    }
}
