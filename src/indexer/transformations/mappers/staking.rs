use super::{account, insert_coin};
use crate::indexer::transformations::amounts::{coin_amount, dec_amount};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::{produce_transfers, produce_unbonding_transfers};
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::Coin;
use crate::models::proto::cosmos::Description;
use crate::models::transactions::{Account, AccountDetails, SubsetEvent, TransactionAmount};

pub fn delegate_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::StakingDelegate(d) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "delegate",
        });
    };

    let mut se = SubsetEvent::new("delegate", "staking")
        .with_node("delegator", account("delegator_address", &d.delegator_address)?)
        .with_node("validator", account("validator_address", &d.validator_address)?);
    insert_coin(&mut se, "delegate", d.amount.as_ref())?;

    produce_transfers(&mut se, "reward", None, logf)?;
    Ok(se)
}

pub fn undelegate_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::StakingUndelegate(u) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "begin_unbonding",
        });
    };

    let mut se = SubsetEvent::new("begin_unbonding", "staking")
        .with_node("delegator", account("delegator_address", &u.delegator_address)?)
        .with_node("validator", account("validator_address", &u.validator_address)?);
    insert_coin(&mut se, "undelegate", u.amount.as_ref())?;

    produce_unbonding_transfers(&mut se, logf)?;
    Ok(se)
}

pub fn begin_redelegate_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::StakingBeginRedelegate(br) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "begin_redelegate",
        });
    };

    let mut se = SubsetEvent::new("begin_redelegate", "staking")
        .with_node("delegator", account("delegator_address", &br.delegator_address)?)
        .with_node(
            "validator_destination",
            account("validator_dst_address", &br.validator_dst_address)?,
        )
        .with_node(
            "validator_source",
            account("validator_src_address", &br.validator_src_address)?,
        );
    insert_coin(&mut se, "delegate", br.amount.as_ref())?;

    produce_transfers(&mut se, "reward", None, logf)?;
    Ok(se)
}

fn validator_with_details(
    address: &str,
    description: Option<&Description>,
) -> Result<Account, MapperError> {
    let mut validator = account("validator_address", address)?;
    validator.details = description.map(|d| AccountDetails {
        name: d.moniker.clone(),
        description: d.details.clone(),
        contact: d.security_contact.clone(),
        website: d.website.clone(),
    });
    Ok(validator)
}

pub fn create_validator_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::StakingCreateValidator(cv) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "create_validator",
        });
    };

    let mut se = SubsetEvent::new("create_validator", "distribution")
        .with_node("delegator", account("delegator_address", &cv.delegator_address)?)
        .with_node(
            "validator",
            validator_with_details(&cv.validator_address, cv.description.as_ref())?,
        );

    insert_coin(&mut se, "self_delegation", cv.value.as_ref())?;
    if !cv.min_self_delegation.is_empty() {
        se.amount.insert(
            "self_delegation_min".to_string(),
            int_amount(&cv.min_self_delegation)?,
        );
    }
    if let Some(commission) = &cv.commission {
        for (role, value) in [
            ("commission_rate", &commission.rate),
            ("commission_max_rate", &commission.max_rate),
            ("commission_max_change_rate", &commission.max_change_rate),
        ] {
            if !value.is_empty() {
                se.amount.insert(role.to_string(), dec_amount(value)?);
            }
        }
    }

    Ok(se)
}

pub fn edit_validator_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::StakingEditValidator(ev) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "edit_validator",
        });
    };

    let mut se = SubsetEvent::new("edit_validator", "distribution").with_node(
        "validator",
        validator_with_details(&ev.validator_address, ev.description.as_ref())?,
    );

    if !ev.min_self_delegation.is_empty() {
        se.amount.insert(
            "self_delegation_min".to_string(),
            int_amount(&ev.min_self_delegation)?,
        );
    }
    if !ev.commission_rate.is_empty() {
        se.amount
            .insert("commission_rate".to_string(), dec_amount(&ev.commission_rate)?);
    }

    Ok(se)
}

/// `min_self_delegation` is an `sdk.Int`, already in base units.
fn int_amount(value: &str) -> Result<TransactionAmount, MapperError> {
    Ok(coin_amount(&Coin::new("", value))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::indexer::transformations::reconciler::UNBONDED_TOKENS_POOL;
    use crate::models::proto::cosmos;
    use num_bigint::BigInt;

    fn delegate_msg() -> cosmos::MsgDelegate {
        cosmos::MsgDelegate {
            delegator_address: DELEGATOR.to_string(),
            validator_address: VALIDATOR.to_string(),
            amount: Some(Coin::new("ukava", "1000000")),
        }
    }

    #[test]
    fn test_delegate_collects_rewards() {
        let logf = transfer_log(&[
            ("recipient", DELEGATOR),
            ("sender", RECIPIENT),
            ("amount", "42ukava"),
        ]);
        let se = delegate_to_sub(&ChainMsg::StakingDelegate(delegate_msg()), &logf).unwrap();

        assert_eq!(se.node["delegator"][0].id, DELEGATOR);
        assert_eq!(se.node["validator"][0].id, VALIDATOR);
        assert_eq!(se.amount["delegate"].numeric, BigInt::from(1_000_000));
        assert_eq!(se.transfers["reward"][0].amounts[0].numeric, BigInt::from(42));
    }

    #[test]
    fn test_undelegate_ignores_unbonding_pool() {
        let logf = transfer_log(&[
            ("recipient", UNBONDED_TOKENS_POOL),
            ("sender", DELEGATOR),
            ("amount", "1000000ukava"),
        ]);
        let se =
            undelegate_to_sub(&ChainMsg::StakingUndelegate(delegate_msg()), &logf).unwrap();

        assert_eq!(se.kind, vec!["begin_unbonding"]);
        assert_eq!(se.amount["undelegate"].currency, "ukava");
        assert!(se.transfers.is_empty());
    }

    #[test]
    fn test_create_validator_scales_rates() {
        let msg = ChainMsg::StakingCreateValidator(cosmos::MsgCreateValidator {
            description: Some(cosmos::Description {
                moniker: "figment".to_string(),
                website: "https://figment.io".to_string(),
                ..Default::default()
            }),
            commission: Some(cosmos::CommissionRates {
                rate: "100000000000000000".to_string(),
                max_rate: "200000000000000000".to_string(),
                max_change_rate: "10000000000000000".to_string(),
            }),
            min_self_delegation: "1".to_string(),
            delegator_address: DELEGATOR.to_string(),
            validator_address: VALIDATOR.to_string(),
            pubkey: None,
            value: Some(Coin::new("ukava", "5000")),
        });

        let se = create_validator_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.module, "distribution");
        let details = se.node["validator"][0].details.as_ref().unwrap();
        assert_eq!(details.name, "figment");
        assert_eq!(se.amount["commission_rate"].text, "0.100000000000000000");
        assert_eq!(se.amount["commission_rate"].exp, 18);
        assert_eq!(se.amount["self_delegation_min"].numeric, BigInt::from(1));
        assert_eq!(se.amount["self_delegation"].currency, "ukava");
    }

    #[test]
    fn test_edit_validator_optional_amounts() {
        let msg = ChainMsg::StakingEditValidator(cosmos::MsgEditValidator {
            description: None,
            validator_address: VALIDATOR.to_string(),
            commission_rate: String::new(),
            min_self_delegation: String::new(),
        });

        let se = edit_validator_to_sub(&msg, &LogFormat::default()).unwrap();
        assert!(se.amount.is_empty());
        assert!(se.node["validator"][0].details.is_none());
    }
}
