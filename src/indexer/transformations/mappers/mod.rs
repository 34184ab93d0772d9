//! Per-module conversion of decoded chain messages into [`SubsetEvent`]s.
//!
//! Every mapper is a plain function of the decoded message and the log produced by
//! executing it, looked up by the legacy `(route, action)` pair of the message.

pub mod auction;
pub mod bank;
pub mod bep3;
pub mod cdp;
pub mod committee;
pub mod crisis;
pub mod distribution;
pub mod evidence;
pub mod gov;
pub mod hard;
pub mod harvest;
pub mod incentive;
pub mod issuance;
pub mod pricefeed;
pub mod slashing;
pub mod staking;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::indexer::transformations::amounts::coin_amount;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::{AmountError, MapperError};
use crate::models::logs::LogFormat;
use crate::models::proto::Coin;
use crate::models::transactions::{Account, EventTransfer, SubsetEvent, TransactionAmount};

pub type Mapper = fn(&ChainMsg, &LogFormat) -> Result<SubsetEvent, MapperError>;

static REGISTRY: Lazy<HashMap<(&'static str, &'static str), Mapper>> = Lazy::new(|| {
    let entries: [((&'static str, &'static str), Mapper); 46] = [
        (("bank", "send"), bank::send_to_sub),
        (("bank", "multisend"), bank::multisend_to_sub),
        (("staking", "delegate"), staking::delegate_to_sub),
        (("staking", "begin_unbonding"), staking::undelegate_to_sub),
        (("staking", "begin_redelegate"), staking::begin_redelegate_to_sub),
        (("staking", "create_validator"), staking::create_validator_to_sub),
        (("staking", "edit_validator"), staking::edit_validator_to_sub),
        (
            ("distribution", "withdraw_validator_commission"),
            distribution::withdraw_validator_commission_to_sub,
        ),
        (
            ("distribution", "set_withdraw_address"),
            distribution::set_withdraw_address_to_sub,
        ),
        (
            ("distribution", "withdraw_delegator_reward"),
            distribution::withdraw_delegator_reward_to_sub,
        ),
        (
            ("distribution", "fund_community_pool"),
            distribution::fund_community_pool_to_sub,
        ),
        (("gov", "deposit"), gov::deposit_to_sub),
        (("gov", "vote"), gov::vote_to_sub),
        (("gov", "submit_proposal"), gov::submit_proposal_to_sub),
        (("slashing", "unjail"), slashing::unjail_to_sub),
        (("evidence", "submit_evidence"), evidence::submit_evidence_to_sub),
        (("crisis", "verify_invariant"), crisis::verify_invariant_to_sub),
        (("auction", "place_bid"), auction::place_bid_to_sub),
        (("cdp", "create_cdp"), cdp::create_cdp_to_sub),
        (("cdp", "deposit_cdp"), cdp::deposit_cdp_to_sub),
        (("cdp", "withdraw_cdp"), cdp::withdraw_cdp_to_sub),
        (("cdp", "draw_cdp"), cdp::draw_cdp_to_sub),
        (("cdp", "repay_cdp"), cdp::repay_cdp_to_sub),
        (("cdp", "liquidate"), cdp::liquidate_to_sub),
        (("bep3", "createAtomicSwap"), bep3::create_atomic_swap_to_sub),
        (("bep3", "claimAtomicSwap"), bep3::claim_atomic_swap_to_sub),
        (("bep3", "refundAtomicSwap"), bep3::refund_atomic_swap_to_sub),
        (
            ("committee", "commmittee_submit_proposal"),
            committee::submit_proposal_to_sub,
        ),
        (("committee", "committee_vote"), committee::vote_to_sub),
        (("hard", "hard_deposit"), hard::deposit_to_sub),
        (("hard", "hard_withdraw"), hard::withdraw_to_sub),
        (("hard", "hard_borrow"), hard::borrow_to_sub),
        (("hard", "hard_repay"), hard::repay_to_sub),
        (("hard", "hard_liquidate"), hard::liquidate_to_sub),
        (("harvest", "harvest_deposit"), harvest::deposit_to_sub),
        (("harvest", "harvest_withdraw"), harvest::withdraw_to_sub),
        (("harvest", "claim_harvest_reward"), harvest::claim_reward_to_sub),
        (
            ("incentive", "claim_usdx_minting_reward"),
            incentive::claim_reward_to_sub,
        ),
        (("incentive", "claim_hard_reward"), incentive::claim_reward_to_sub),
        (
            ("incentive", "claim_delegator_reward"),
            incentive::claim_reward_to_sub,
        ),
        (("issuance", "issue_tokens"), issuance::issue_tokens_to_sub),
        (("issuance", "redeem_tokens"), issuance::redeem_tokens_to_sub),
        (("issuance", "block_address"), issuance::block_address_to_sub),
        (("issuance", "unblock_address"), issuance::unblock_address_to_sub),
        (
            ("issuance", "change_pause_status"),
            issuance::set_pause_status_to_sub,
        ),
        (("pricefeed", "post_price"), pricefeed::post_price_to_sub),
    ];
    HashMap::from(entries)
});

pub fn lookup(route: &str, action: &str) -> Option<Mapper> {
    REGISTRY.get(&(route, action)).copied()
}

////////////////////////////////////////// Helpers //////////////////////////////////////////

/// Accepts a lowercase `<hrp>1<data>` address whose bech32 checksum verifies.
pub fn is_bech32_address(address: &str) -> bool {
    if address.bytes().any(|b| b.is_ascii_uppercase()) {
        return false;
    }
    match bech32::decode(address) {
        Ok((hrp, data)) => {
            !data.is_empty() && hrp.as_str().bytes().all(|b| b.is_ascii_lowercase())
        }
        Err(_) => false,
    }
}

pub(crate) fn account(field: &'static str, address: &str) -> Result<Account, MapperError> {
    if !is_bech32_address(address) {
        return Err(MapperError::InvalidAddress {
            field,
            address: address.to_string(),
        });
    }
    Ok(Account::new(address))
}

pub(crate) fn coin_amounts(coins: &[Coin]) -> Result<Vec<TransactionAmount>, AmountError> {
    coins.iter().map(coin_amount).collect()
}

pub(crate) fn transfer(
    field: &'static str,
    address: &str,
    coins: &[Coin],
) -> Result<EventTransfer, MapperError> {
    Ok(EventTransfer {
        account: account(field, address)?,
        amounts: coin_amounts(coins)?,
    })
}

/// Inserts a single optional coin under `role`; absent coins are skipped.
pub(crate) fn insert_coin(
    se: &mut SubsetEvent,
    role: &str,
    coin: Option<&Coin>,
) -> Result<(), MapperError> {
    if let Some(coin) = coin {
        se.amount.insert(role.to_string(), coin_amount(coin)?);
    }
    Ok(())
}

/// Keys coins as `prefix`, `prefix_1`, `prefix_2`... or by bare index without a prefix.
pub(crate) fn insert_indexed_coins(
    se: &mut SubsetEvent,
    prefix: Option<&str>,
    coins: &[Coin],
) -> Result<(), MapperError> {
    for (i, coin) in coins.iter().enumerate() {
        let key = match prefix {
            Some(p) if i == 0 => p.to_string(),
            Some(p) => format!("{p}_{i}"),
            None => i.to_string(),
        };
        se.amount.insert(key, coin_amount(coin)?);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::logs::{LogEvents, LogEventsAttributes, LogFormat};

    pub const DELEGATOR: &str = "kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrq";
    pub const RECIPIENT: &str = "kava1xy7hrjy9r0algz9w3gzm8u6mrpq97kwta747gj";
    pub const VALIDATOR: &str = "kavavaloper1ffcujj05v6220ccxa6qdnpz3j48ng024ykh2df";

    pub fn transfer_log(pairs: &[(&str, &str)]) -> LogFormat {
        LogFormat {
            success: true,
            events: vec![LogEvents {
                kind: "transfer".to_string(),
                attributes: pairs
                    .iter()
                    .map(|&(k, v)| LogEventsAttributes::from_pairs([(k, v)]))
                    .collect(),
            }],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::indexer::transformations::messages::{ChainMsg, route_of};
    use crate::models::proto::{cosmos, kava};

    #[test]
    fn test_address_shape() {
        assert!(is_bech32_address(DELEGATOR));
        assert!(is_bech32_address(VALIDATOR));
        assert!(!is_bech32_address(""));
        assert!(!is_bech32_address("kava1"));
        assert!(!is_bech32_address("KAVA1M5CTMU8HLSQM7WQSTXYKVL8PXDM9DTVZXH9RRQ"));
        assert!(!is_bech32_address("kava1bbbbbbbbbb"));
        assert!(!is_bech32_address("0x52908400098527886E0F7030069857D2E4169EE7"));
    }

    #[test]
    fn test_corrupted_checksum_is_rejected() {
        assert!(!is_bech32_address("kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrp"));

        let msg = ChainMsg::BankSend(cosmos::MsgSend {
            from_address: "kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrp".to_string(),
            to_address: RECIPIENT.to_string(),
            amount: vec![],
        });
        let mapper = lookup("bank", "send").unwrap();
        assert!(matches!(
            mapper(&msg, &LogFormat::default()),
            Err(MapperError::InvalidAddress { field: "from_address", .. })
        ));
    }

    #[test]
    fn test_every_routed_message_has_a_mapper() {
        for type_url in [
            cosmos::MSG_SEND,
            cosmos::MSG_UNDELEGATE,
            cosmos::MSG_VERIFY_INVARIANT,
            kava::MSG_CREATE_ATOMIC_SWAP,
            kava::MSG_COMMITTEE_SUBMIT_PROPOSAL,
            kava::MSG_CLAIM_DELEGATOR_REWARD,
            kava::MSG_HARVEST_CLAIM_REWARD,
            kava::MSG_SET_PAUSE_STATUS,
            kava::MSG_POST_PRICE,
        ] {
            let (route, action) = route_of(type_url).unwrap();
            assert!(lookup(route, action).is_some(), "{route}/{action}");
        }
        assert!(lookup("bank", "burn").is_none());
    }

    #[test]
    fn test_wrong_message_is_rejected() {
        let mapper = lookup("bank", "send").unwrap();
        let msg = ChainMsg::SlashingUnjail(cosmos::MsgUnjail {
            validator_addr: VALIDATOR.to_string(),
        });
        assert!(matches!(
            mapper(&msg, &LogFormat::default()),
            Err(MapperError::UnexpectedMessage { .. })
        ));
    }

    #[test]
    fn test_indexed_coin_keys() {
        let mut se = SubsetEvent::new("deposit", "gov");
        let coins = [Coin::new("ukava", "1"), Coin::new("hard", "2")];
        insert_indexed_coins(&mut se, Some("deposit"), &coins).unwrap();
        assert!(se.amount.contains_key("deposit"));
        assert!(se.amount.contains_key("deposit_1"));

        let mut se = SubsetEvent::new("hard_deposit", "hard");
        insert_indexed_coins(&mut se, None, &coins).unwrap();
        assert_eq!(se.amount["1"].currency, "hard");
    }
}
