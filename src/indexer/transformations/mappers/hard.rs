use super::{account, insert_indexed_coins};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::kava::MsgHardDeposit;
use crate::models::transactions::SubsetEvent;

fn deposit_like(kind: &str, m: &MsgHardDeposit, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let mut se = SubsetEvent::new(kind, "hard")
        .with_node("depositor", account("depositor", &m.depositor)?);
    insert_indexed_coins(&mut se, None, &m.amount)?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn deposit_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::HardDeposit(m) => deposit_like("hard_deposit", m, logf),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "hard_deposit",
        }),
    }
}

pub fn withdraw_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::HardWithdraw(m) => deposit_like("hard_withdraw", m, logf),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "hard_withdraw",
        }),
    }
}

pub fn borrow_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::HardBorrow(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "hard_borrow",
        });
    };

    let mut se = SubsetEvent::new("hard_borrow", "hard")
        .with_node("borrower", account("borrower", &m.borrower)?);
    insert_indexed_coins(&mut se, None, &m.amount)?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn repay_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::HardRepay(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "hard_repay",
        });
    };

    let mut se = SubsetEvent::new("hard_repay", "hard")
        .with_node("sender", account("sender", &m.sender)?)
        .with_node("owner", account("owner", &m.owner)?);
    insert_indexed_coins(&mut se, None, &m.amount)?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn liquidate_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::HardLiquidate(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "hard_liquidate",
        });
    };

    let mut se = SubsetEvent::new("hard_liquidate", "hard")
        .with_node("keeper", account("keeper", &m.keeper)?)
        .with_node("borrower", account("borrower", &m.borrower)?);

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}
