use super::{account, insert_indexed_coins};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn create_atomic_swap_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::Bep3CreateAtomicSwap(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "createAtomicSwap",
        });
    };

    let mut se = SubsetEvent::new("create_atomic_swap", "bep3")
        .with_node("from", account("from", &m.from)?)
        .with_node("to", account("to", &m.to)?)
        .with_additional("recipient_other_chain", m.recipient_other_chain.as_str())
        .with_additional("sender_other_chain", m.sender_other_chain.as_str())
        .with_additional("random_number_hash", m.random_number_hash.as_str())
        .with_additional("timestamp", m.timestamp.to_string())
        .with_additional("height_span", m.height_span.to_string());
    insert_indexed_coins(&mut se, Some("send"), &m.amount)?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

/// The claimed amount only shows up in the execution log.
pub fn claim_atomic_swap_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::Bep3ClaimAtomicSwap(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "claimAtomicSwap",
        });
    };

    let mut se = SubsetEvent::new("claim_atomic_swap", "bep3")
        .with_node("from", account("from", &m.from)?)
        .with_additional("swap_id", m.swap_id.as_str())
        .with_additional("random_number", m.random_number.as_str());

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn refund_atomic_swap_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::Bep3RefundAtomicSwap(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "refundAtomicSwap",
        });
    };

    let mut se = SubsetEvent::new("refund_atomic_swap", "bep3")
        .with_node("from", account("from", &m.from)?)
        .with_additional("swap_id", m.swap_id.as_str());

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}
