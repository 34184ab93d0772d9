use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use kava_worker::indexer::transformations::reconciler::UNBONDED_TOKENS_POOL;
use kava_worker::indexer::transformations::transactions::{
    TransactionTransformer, assemble_transaction,
};
use kava_worker::metrics::MetricsSink;
use kava_worker::models::common::Block;
use kava_worker::models::proto::{Any, AuthInfo, Coin, Fee, TxBody, TxRaw, cosmos, kava};
use kava_worker::models::rpc::{ResponseDeliverTx, ResultTxSearch, TxResponse};

//////// Test accounts ////////
const DELEGATOR: &str = "kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrq";
const RECIPIENT_A: &str = "kava1xy7hrjy9r0algz9w3gzm8u6mrpq97kwta747gj";
const RECIPIENT_B: &str = "kava1xm5cdwr9w3g8zn2d6uxk0ad8jfekvxz7plsja0";
const VALIDATOR: &str = "kavavaloper1ffcujj05v6220ccxa6qdnpz3j48ng024ykh2df";

#[derive(Default)]
struct CountingSink {
    unknown: AtomicUsize,
    broken: AtomicUsize,
    converted: AtomicUsize,
}

impl MetricsSink for CountingSink {
    fn unknown_message(&self, _route: &str, _action: &str) {
        self.unknown.fetch_add(1, Ordering::SeqCst);
    }
    fn broken_message(&self, _route: &str, _action: &str) {
        self.broken.fetch_add(1, Ordering::SeqCst);
    }
    fn transaction_converted(&self, _elapsed: std::time::Duration) {
        self.converted.fetch_add(1, Ordering::SeqCst);
    }
}

fn any<M: Message>(type_url: &str, msg: &M) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: msg.encode_to_vec(),
    }
}

fn encode_tx(messages: Vec<Any>) -> String {
    let body = TxBody {
        messages,
        memo: String::new(),
        timeout_height: 0,
    };
    let auth = AuthInfo {
        fee: Some(Fee {
            amount: vec![Coin::new("ukava", "2500")],
            gas_limit: 250_000,
            ..Default::default()
        }),
    };
    let raw = TxRaw {
        body_bytes: body.encode_to_vec(),
        auth_info_bytes: auth.encode_to_vec(),
        signatures: vec![vec![0u8; 64]],
    };
    STANDARD.encode(raw.encode_to_vec())
}

/// One log entry per message, each with a single transfer event built from `pairs`.
fn transfer_logs(entries: &[&[(&str, &str)]]) -> String {
    let logs: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(index, pairs)| {
            let attributes: Vec<_> = pairs
                .iter()
                .map(|(key, value)| json!({"key": key, "value": value}))
                .collect();
            json!({
                "msg_index": index,
                "success": true,
                "log": "",
                "events": [{"type": "transfer", "attributes": attributes}]
            })
        })
        .collect();
    serde_json::to_string(&logs).unwrap()
}

fn response(hash: &str, height: u64, tx: String, log: String) -> TxResponse {
    TxResponse {
        hash: hash.to_string(),
        height: height.to_string(),
        index: 0,
        tx_result: ResponseDeliverTx {
            log,
            code: 0,
            codespace: String::new(),
            gas_wanted: "250000".to_string(),
            gas_used: "120000".to_string(),
        },
        tx,
    }
}

fn delegate() -> Any {
    any(
        cosmos::MSG_DELEGATE,
        &cosmos::MsgDelegate {
            delegator_address: DELEGATOR.to_string(),
            validator_address: VALIDATOR.to_string(),
            amount: Some(Coin::new("ukava", "1000000")),
        },
    )
}

#[test]
fn test_multi_message_transaction() {
    let claim = any(
        kava::MSG_CLAIM_ATOMIC_SWAP,
        &kava::MsgClaimAtomicSwap {
            from: DELEGATOR.to_string(),
            swap_id: "E0BC".to_string(),
            random_number: "52FA".to_string(),
        },
    );
    let log = transfer_logs(&[
        &[("recipient", DELEGATOR), ("sender", VALIDATOR), ("amount", "1523ukava")],
        &[("recipient", RECIPIENT_A), ("amount", "5000000bnb")],
    ]);
    let raw = response("AA01", 1_581_000, encode_tx(vec![delegate(), claim]), log);
    let blocks = HashMap::from([(
        1_581_000,
        Block {
            hash: "B10C".to_string(),
            height: 1_581_000,
            chain_id: "kava-4".to_string(),
            number_of_transactions: 1,
            ..Default::default()
        },
    )]);
    let sink = CountingSink::default();

    let tx = assemble_transaction(&raw, &blocks, &sink).unwrap();

    assert_eq!(tx.events.len(), 2);
    assert_eq!(tx.chain_id, "kava-4");
    assert_eq!(tx.block_hash, "B10C");

    let delegate = &tx.events[0].sub[0];
    assert_eq!(tx.events[0].kind, "delegate");
    assert_eq!(delegate.node["validator"][0].id, VALIDATOR);
    assert_eq!(delegate.amount["delegate"].text, "1000000");
    assert_eq!(delegate.transfers["reward"][0].account.id, DELEGATOR);
    assert_eq!(delegate.transfers["reward"][0].amounts[0].text, "1523ukava");

    let claim = &tx.events[1].sub[0];
    assert_eq!(tx.events[1].kind, "claimAtomicSwap");
    assert_eq!(claim.additional["swap_id"], vec!["E0BC"]);
    assert_eq!(claim.transfers["send"][0].amounts[0].currency, "bnb");

    assert_eq!(sink.unknown.load(Ordering::SeqCst), 0);
    assert_eq!(sink.broken.load(Ordering::SeqCst), 0);
}

#[test]
fn test_recipient_amount_correlation() {
    let send = any(
        cosmos::MSG_SEND,
        &cosmos::MsgSend {
            from_address: DELEGATOR.to_string(),
            to_address: RECIPIENT_A.to_string(),
            amount: vec![Coin::new("ukava", "10")],
        },
    );
    let log = transfer_logs(&[&[
        ("recipient", RECIPIENT_A),
        ("amount", "10ukava"),
        ("recipient", RECIPIENT_B),
        ("amount", "20ukava"),
    ]]);
    let raw = response("AA02", 10, encode_tx(vec![send]), log);

    let tx = assemble_transaction(&raw, &HashMap::new(), &CountingSink::default()).unwrap();
    let transfers = &tx.events[0].sub[0].transfers["send"];

    assert_eq!(transfers.len(), 2);
    assert_eq!(transfers[0].account.id, RECIPIENT_A);
    assert_eq!(transfers[0].amounts[0].text, "10ukava");
    assert_eq!(transfers[1].account.id, RECIPIENT_B);
    assert_eq!(transfers[1].amounts[0].text, "20ukava");
}

#[test]
fn test_unbonding_pool_is_not_a_reward_recipient() {
    let undelegate = any(
        cosmos::MSG_UNDELEGATE,
        &cosmos::MsgUndelegate {
            delegator_address: DELEGATOR.to_string(),
            validator_address: VALIDATOR.to_string(),
            amount: Some(Coin::new("ukava", "500")),
        },
    );
    let log = transfer_logs(&[&[("recipient", UNBONDED_TOKENS_POOL), ("amount", "500ukava")]]);
    let raw = response("AA03", 10, encode_tx(vec![undelegate]), log);

    let tx = assemble_transaction(&raw, &HashMap::new(), &CountingSink::default()).unwrap();
    let sub = &tx.events[0].sub[0];
    assert_eq!(sub.kind, vec!["begin_unbonding"]);
    assert!(!sub.transfers.contains_key("reward"));
}

#[test]
fn test_assembly_is_deterministic() {
    let log = transfer_logs(&[&[("recipient", DELEGATOR), ("amount", "7ukava")]]);
    let raw = response("AA04", 10, encode_tx(vec![delegate()]), log);

    let first = assemble_transaction(&raw, &HashMap::new(), &CountingSink::default()).unwrap();
    let second = assemble_transaction(&raw, &HashMap::new(), &CountingSink::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_search_page_transform_and_wire_shape() {
    let page = ResultTxSearch {
        txs: vec![
            response("AA05", 10, encode_tx(vec![delegate()]), "[]".to_string()),
            response(
                "AA06",
                10,
                encode_tx(vec![Any {
                    type_url: "/kava.swap.v1beta1.MsgDeposit".to_string(),
                    value: vec![],
                }]),
                "[]".to_string(),
            ),
        ],
        total_count: "2".to_string(),
    };
    let sink = CountingSink::default();

    let txs = page.transform_transactions(&HashMap::new(), &sink);
    assert_eq!(txs.len(), 2);
    assert_eq!(sink.converted.load(Ordering::SeqCst), 2);
    assert_eq!(sink.unknown.load(Ordering::SeqCst), 1);

    let wire = serde_json::to_value(&txs[0]).unwrap();
    assert_eq!(wire["events"][0]["sub"][0]["type"][0], "delegate");
    assert_eq!(wire["events"][0]["sub"][0]["amount"]["delegate"]["numeric"], "1000000");
    assert_eq!(wire["fee"][0]["currency"], "ukava");
    assert!(wire["raw"].is_string());
}

#[test]
fn test_unreadable_transaction_does_not_sink_its_page() {
    let page = ResultTxSearch {
        txs: vec![
            response("AA07", 11, encode_tx(vec![delegate()]), "[]".to_string()),
            response("BAD", 11, "!!!not-base64".to_string(), "[]".to_string()),
            response("AA08", 11, encode_tx(vec![delegate()]), "[]".to_string()),
        ],
        total_count: "3".to_string(),
    };
    let sink = CountingSink::default();

    let txs = page.transform_transactions(&HashMap::new(), &sink);
    let hashes: Vec<&str> = txs.iter().map(|tx| tx.hash.as_str()).collect();
    assert_eq!(hashes, vec!["AA07", "AA08"]);
    assert_eq!(sink.converted.load(Ordering::SeqCst), 2);
    assert_eq!(sink.broken.load(Ordering::SeqCst), 1);
}
