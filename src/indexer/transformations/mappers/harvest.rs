use super::{account, insert_coin};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::kava::MsgHarvestDeposit;
use crate::models::transactions::SubsetEvent;

fn deposit_like(
    kind: &str,
    m: &MsgHarvestDeposit,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let mut se = SubsetEvent::new(kind, "harvest")
        .with_node("depositor", account("depositor", &m.depositor)?)
        .with_additional("deposit_type", m.deposit_type.as_str());
    insert_coin(&mut se, "send", m.amount.as_ref())?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn deposit_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::HarvestDeposit(m) => deposit_like("harvest_deposit", m, logf),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "harvest_deposit",
        }),
    }
}

pub fn withdraw_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    match msg {
        ChainMsg::HarvestWithdraw(m) => deposit_like("harvest_withdraw", m, logf),
        _ => Err(MapperError::UnexpectedMessage {
            expected: "harvest_withdraw",
        }),
    }
}

/// The claimed amount only shows up in the transfer log.
pub fn claim_reward_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::HarvestClaimReward(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "claim_harvest_reward",
        });
    };

    let mut se = SubsetEvent::new("claim_harvest_reward", "harvest")
        .with_node("sender", account("sender", &m.sender)?)
        .with_node("receiver", account("receiver", &m.receiver)?)
        .with_additional("deposit_denom", m.deposit_denom.as_str())
        .with_additional("deposit_type", m.deposit_type.as_str())
        .with_additional("multiplier_name", m.multiplier_name.as_str());

    produce_transfers(&mut se, "reward", None, logf)?;
    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Coin, kava};

    #[test]
    fn test_harvest_deposit_and_withdraw() {
        let deposit = kava::MsgHarvestDeposit {
            depositor: DELEGATOR.to_string(),
            amount: Some(Coin::new("ukava", "250000")),
            deposit_type: "lp".to_string(),
        };
        let logf = transfer_log(&[("recipient", RECIPIENT), ("amount", "250000ukava")]);

        let se = deposit_to_sub(&ChainMsg::HarvestDeposit(deposit.clone()), &logf).unwrap();
        assert_eq!(se.kind, vec!["harvest_deposit"]);
        assert_eq!(se.module, "harvest");
        assert_eq!(se.node["depositor"][0].id, DELEGATOR);
        assert_eq!(se.amount["send"].currency, "ukava");
        assert_eq!(se.amount["send"].text, "250000");
        assert_eq!(se.additional["deposit_type"], vec!["lp"]);
        assert_eq!(se.transfers["send"][0].account.id, RECIPIENT);

        let se = withdraw_to_sub(&ChainMsg::HarvestWithdraw(deposit), &LogFormat::default())
            .unwrap();
        assert_eq!(se.kind, vec!["harvest_withdraw"]);
        assert!(se.transfers.is_empty());
    }

    #[test]
    fn test_harvest_withdraw_rejects_deposit() {
        let msg = ChainMsg::HarvestDeposit(kava::MsgHarvestDeposit::default());
        assert!(withdraw_to_sub(&msg, &LogFormat::default()).is_err());
    }

    #[test]
    fn test_claim_harvest_reward() {
        let msg = ChainMsg::HarvestClaimReward(kava::MsgHarvestClaimReward {
            sender: DELEGATOR.to_string(),
            receiver: RECIPIENT.to_string(),
            deposit_denom: "bnb".to_string(),
            multiplier_name: "medium".to_string(),
            deposit_type: "stake".to_string(),
        });
        let logf = transfer_log(&[("recipient", RECIPIENT), ("amount", "1200000hard")]);

        let se = claim_reward_to_sub(&msg, &logf).unwrap();
        assert_eq!(se.node["sender"][0].id, DELEGATOR);
        assert_eq!(se.node["receiver"][0].id, RECIPIENT);
        assert_eq!(se.additional["deposit_denom"], vec!["bnb"]);
        assert_eq!(se.additional["multiplier_name"], vec!["medium"]);
        assert_eq!(se.transfers["reward"][0].amounts[0].currency, "hard");
        assert!(se.amount.is_empty());
    }
}
