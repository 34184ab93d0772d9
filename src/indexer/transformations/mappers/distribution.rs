use super::{account, transfer};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::{EventTransfer, SubsetEvent};

pub fn withdraw_validator_commission_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::DistributionWithdrawValidatorCommission(wvc) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "withdraw_validator_commission",
        });
    };

    let validator = account("validator_address", &wvc.validator_address)?;
    let mut se = SubsetEvent::new("withdraw_validator_commission", "distribution")
        .with_node("validator", validator.clone());
    se.recipient.push(EventTransfer {
        account: validator,
        amounts: Vec::new(),
    });

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn set_withdraw_address_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::DistributionSetWithdrawAddress(swa) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "set_withdraw_address",
        });
    };

    Ok(SubsetEvent::new("set_withdraw_address", "distribution")
        .with_node(
            "delegator",
            account("delegator_address", &swa.delegator_address)?,
        )
        .with_node("withdraw", account("withdraw_address", &swa.withdraw_address)?))
}

pub fn withdraw_delegator_reward_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::DistributionWithdrawDelegatorReward(wdr) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "withdraw_delegator_reward",
        });
    };

    let delegator = account("delegator_address", &wdr.delegator_address)?;
    let mut se = SubsetEvent::new("withdraw_delegator_reward", "distribution")
        .with_node("delegator", delegator.clone())
        .with_node(
            "validator",
            account("validator_address", &wdr.validator_address)?,
        );
    se.recipient.push(EventTransfer {
        account: delegator,
        amounts: Vec::new(),
    });

    produce_transfers(&mut se, "reward", None, logf)?;
    Ok(se)
}

pub fn fund_community_pool_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::DistributionFundCommunityPool(fcp) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "fund_community_pool",
        });
    };

    let mut se = SubsetEvent::new("fund_community_pool", "distribution")
        .with_node("depositor", account("depositor", &fcp.depositor)?);
    se.sender
        .push(transfer("depositor", &fcp.depositor, &fcp.amount)?);

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Coin, cosmos};

    #[test]
    fn test_withdraw_delegator_reward() {
        let msg = ChainMsg::DistributionWithdrawDelegatorReward(
            cosmos::MsgWithdrawDelegatorReward {
                delegator_address: DELEGATOR.to_string(),
                validator_address: VALIDATOR.to_string(),
            },
        );
        let logf = transfer_log(&[
            ("recipient", DELEGATOR),
            ("sender", RECIPIENT),
            ("amount", "1234ukava,5hard"),
        ]);

        let se = withdraw_delegator_reward_to_sub(&msg, &logf).unwrap();
        assert_eq!(se.recipient[0].account.id, DELEGATOR);
        let reward = &se.transfers["reward"];
        assert_eq!(reward.len(), 1);
        assert_eq!(reward[0].amounts.len(), 2);
        assert_eq!(reward[0].amounts[1].currency, "hard");
    }

    #[test]
    fn test_fund_community_pool() {
        let msg = ChainMsg::DistributionFundCommunityPool(cosmos::MsgFundCommunityPool {
            amount: vec![Coin::new("ukava", "77")],
            depositor: DELEGATOR.to_string(),
        });

        let se = fund_community_pool_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.node["depositor"][0].id, DELEGATOR);
        assert_eq!(se.sender[0].amounts[0].text, "77");
    }

    #[test]
    fn test_set_withdraw_address_validates_both() {
        let msg = ChainMsg::DistributionSetWithdrawAddress(cosmos::MsgSetWithdrawAddress {
            delegator_address: DELEGATOR.to_string(),
            withdraw_address: String::new(),
        });
        assert!(matches!(
            set_withdraw_address_to_sub(&msg, &LogFormat::default()),
            Err(MapperError::InvalidAddress {
                field: "withdraw_address",
                ..
            })
        ));
    }
}
