use super::{account, insert_coin};
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::kava::MsgCdpCollateral;
use crate::models::transactions::SubsetEvent;

pub fn create_cdp_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CdpCreate(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "create_cdp",
        });
    };

    let mut se = SubsetEvent::new("create_cdp", "cdp")
        .with_node("sender", account("sender", &m.sender)?)
        .with_additional("collateral_type", m.collateral_type.as_str());
    insert_coin(&mut se, "collateral", m.collateral.as_ref())?;
    insert_coin(&mut se, "principal", m.principal.as_ref())?;
    Ok(se)
}

fn collateral_to_sub(kind: &str, m: &MsgCdpCollateral) -> Result<SubsetEvent, MapperError> {
    let mut se = SubsetEvent::new(kind, "cdp")
        .with_node("depositor", account("depositor", &m.depositor)?)
        .with_node("owner", account("owner", &m.owner)?)
        .with_additional("collateral_type", m.collateral_type.as_str());
    insert_coin(&mut se, "collateral", m.collateral.as_ref())?;
    Ok(se)
}

pub fn deposit_cdp_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::CdpDeposit(m) => collateral_to_sub("deposit_cdp", m),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "deposit_cdp",
        }),
    }
}

pub fn withdraw_cdp_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::CdpWithdraw(m) => collateral_to_sub("withdraw_cdp", m),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "withdraw_cdp",
        }),
    }
}

pub fn draw_cdp_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CdpDrawDebt(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "draw_cdp",
        });
    };

    let mut se = SubsetEvent::new("draw_cdp", "cdp")
        .with_node("sender", account("sender", &m.sender)?)
        .with_additional("collateral_type", m.collateral_type.as_str());
    insert_coin(&mut se, "principal", m.principal.as_ref())?;
    Ok(se)
}

pub fn repay_cdp_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CdpRepayDebt(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "repay_cdp",
        });
    };

    let mut se = SubsetEvent::new("repay_cdp", "cdp")
        .with_node("sender", account("sender", &m.sender)?)
        .with_additional("collateral_type", m.collateral_type.as_str());
    insert_coin(&mut se, "payment", m.payment.as_ref())?;
    Ok(se)
}

pub fn liquidate_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CdpLiquidate(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "liquidate",
        });
    };

    Ok(SubsetEvent::new("liquidate", "cdp")
        .with_node("keeper", account("keeper", &m.keeper)?)
        .with_node("borrower", account("borrower", &m.borrower)?)
        .with_additional("collateral_type", m.collateral_type.as_str()))
}
