use super::{account, insert_coin};
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn issue_tokens_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::IssuanceIssueTokens(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "issue_tokens",
        });
    };

    let mut se = SubsetEvent::new("issue_tokens", "issuance")
        .with_node("sender", account("sender", &m.sender)?)
        .with_node("receiver", account("receiver", &m.receiver)?);
    insert_coin(&mut se, "send", m.tokens.as_ref())?;
    Ok(se)
}

pub fn redeem_tokens_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::IssuanceRedeemTokens(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "redeem_tokens",
        });
    };

    let mut se = SubsetEvent::new("redeem_tokens", "issuance")
        .with_node("sender", account("sender", &m.sender)?);
    insert_coin(&mut se, "send", m.tokens.as_ref())?;
    Ok(se)
}

pub fn block_address_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::IssuanceBlockAddress(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "block_address",
        });
    };

    Ok(SubsetEvent::new("block_address", "issuance")
        .with_node("sender", account("sender", &m.sender)?)
        .with_node("blocked_address", account("address", &m.address)?)
        .with_additional("denom", m.denom.as_str()))
}

pub fn unblock_address_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::IssuanceUnblockAddress(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "unblock_address",
        });
    };

    Ok(SubsetEvent::new("unblock_address", "issuance")
        .with_node("sender", account("sender", &m.sender)?)
        .with_node("address", account("address", &m.address)?)
        .with_additional("denom", m.denom.as_str()))
}

pub fn set_pause_status_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::IssuanceSetPauseStatus(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "change_pause_status",
        });
    };

    Ok(SubsetEvent::new("change_pause_status", "issuance")
        .with_node("sender", account("sender", &m.sender)?)
        .with_additional("denom", m.denom.as_str())
        .with_additional("status", m.status.to_string()))
}
