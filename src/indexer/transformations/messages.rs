use once_cell::sync::Lazy;
use prost::Message;
use std::collections::HashMap;

use crate::models::proto::{Any, cosmos, kava};

/// Every message the worker knows how to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainMsg {
    BankSend(cosmos::MsgSend),
    BankMultiSend(cosmos::MsgMultiSend),
    StakingDelegate(cosmos::MsgDelegate),
    StakingUndelegate(cosmos::MsgUndelegate),
    StakingBeginRedelegate(cosmos::MsgBeginRedelegate),
    StakingCreateValidator(cosmos::MsgCreateValidator),
    StakingEditValidator(cosmos::MsgEditValidator),
    DistributionWithdrawValidatorCommission(cosmos::MsgWithdrawValidatorCommission),
    DistributionSetWithdrawAddress(cosmos::MsgSetWithdrawAddress),
    DistributionWithdrawDelegatorReward(cosmos::MsgWithdrawDelegatorReward),
    DistributionFundCommunityPool(cosmos::MsgFundCommunityPool),
    GovDeposit(cosmos::MsgDeposit),
    GovVote(cosmos::MsgVote),
    GovSubmitProposal(cosmos::MsgSubmitProposal),
    SlashingUnjail(cosmos::MsgUnjail),
    EvidenceSubmitEvidence(cosmos::MsgSubmitEvidence),
    CrisisVerifyInvariant(cosmos::MsgVerifyInvariant),
    AuctionPlaceBid(kava::MsgPlaceBid),
    CdpCreate(kava::MsgCreateCdp),
    CdpDeposit(kava::MsgCdpCollateral),
    CdpWithdraw(kava::MsgCdpCollateral),
    CdpDrawDebt(kava::MsgDrawDebt),
    CdpRepayDebt(kava::MsgRepayDebt),
    CdpLiquidate(kava::MsgLiquidateCdp),
    Bep3CreateAtomicSwap(kava::MsgCreateAtomicSwap),
    Bep3ClaimAtomicSwap(kava::MsgClaimAtomicSwap),
    Bep3RefundAtomicSwap(kava::MsgRefundAtomicSwap),
    CommitteeSubmitProposal(kava::MsgCommitteeSubmitProposal),
    CommitteeVote(kava::MsgCommitteeVote),
    HardDeposit(kava::MsgHardDeposit),
    HardWithdraw(kava::MsgHardDeposit),
    HardBorrow(kava::MsgHardBorrow),
    HardRepay(kava::MsgHardRepay),
    HardLiquidate(kava::MsgHardLiquidate),
    HarvestDeposit(kava::MsgHarvestDeposit),
    HarvestWithdraw(kava::MsgHarvestDeposit),
    HarvestClaimReward(kava::MsgHarvestClaimReward),
    IncentiveClaimUsdxMintingReward(kava::MsgClaimReward),
    IncentiveClaimHardReward(kava::MsgClaimReward),
    IncentiveClaimDelegatorReward(kava::MsgClaimReward),
    IssuanceIssueTokens(kava::MsgIssueTokens),
    IssuanceRedeemTokens(kava::MsgRedeemTokens),
    IssuanceBlockAddress(kava::MsgBlockAddress),
    IssuanceUnblockAddress(kava::MsgBlockAddress),
    IssuanceSetPauseStatus(kava::MsgSetPauseStatus),
    PricefeedPostPrice(kava::MsgPostPrice),
}

/// Outcome of resolving one embedded `Any` message.
#[derive(Debug)]
pub enum DecodedMessage {
    Known {
        route: &'static str,
        action: &'static str,
        msg: ChainMsg,
    },
    /// Type is registered but its bytes do not decode.
    Broken {
        route: &'static str,
        action: &'static str,
        error: prost::DecodeError,
    },
    Unknown {
        route: String,
        action: String,
    },
}

/// Legacy (route, action) names keyed by protobuf type URL.
static MESSAGE_ROUTES: Lazy<HashMap<&'static str, (&'static str, &'static str)>> =
    Lazy::new(|| {
        HashMap::from([
            (cosmos::MSG_SEND, ("bank", "send")),
            (cosmos::MSG_MULTI_SEND, ("bank", "multisend")),
            (cosmos::MSG_DELEGATE, ("staking", "delegate")),
            (cosmos::MSG_UNDELEGATE, ("staking", "begin_unbonding")),
            (cosmos::MSG_BEGIN_REDELEGATE, ("staking", "begin_redelegate")),
            (cosmos::MSG_CREATE_VALIDATOR, ("staking", "create_validator")),
            (cosmos::MSG_EDIT_VALIDATOR, ("staking", "edit_validator")),
            (
                cosmos::MSG_WITHDRAW_VALIDATOR_COMMISSION,
                ("distribution", "withdraw_validator_commission"),
            ),
            (
                cosmos::MSG_SET_WITHDRAW_ADDRESS,
                ("distribution", "set_withdraw_address"),
            ),
            (
                cosmos::MSG_WITHDRAW_DELEGATOR_REWARD,
                ("distribution", "withdraw_delegator_reward"),
            ),
            (
                cosmos::MSG_FUND_COMMUNITY_POOL,
                ("distribution", "fund_community_pool"),
            ),
            (cosmos::MSG_GOV_DEPOSIT, ("gov", "deposit")),
            (cosmos::MSG_GOV_VOTE, ("gov", "vote")),
            (cosmos::MSG_GOV_SUBMIT_PROPOSAL, ("gov", "submit_proposal")),
            (cosmos::MSG_UNJAIL, ("slashing", "unjail")),
            (cosmos::MSG_SUBMIT_EVIDENCE, ("evidence", "submit_evidence")),
            (cosmos::MSG_VERIFY_INVARIANT, ("crisis", "verify_invariant")),
            (kava::MSG_PLACE_BID, ("auction", "place_bid")),
            (kava::MSG_CREATE_CDP, ("cdp", "create_cdp")),
            (kava::MSG_DEPOSIT_CDP, ("cdp", "deposit_cdp")),
            (kava::MSG_WITHDRAW_CDP, ("cdp", "withdraw_cdp")),
            (kava::MSG_DRAW_DEBT, ("cdp", "draw_cdp")),
            (kava::MSG_REPAY_DEBT, ("cdp", "repay_cdp")),
            (kava::MSG_LIQUIDATE_CDP, ("cdp", "liquidate")),
            (kava::MSG_CREATE_ATOMIC_SWAP, ("bep3", "createAtomicSwap")),
            (kava::MSG_CLAIM_ATOMIC_SWAP, ("bep3", "claimAtomicSwap")),
            (kava::MSG_REFUND_ATOMIC_SWAP, ("bep3", "refundAtomicSwap")),
            (
                kava::MSG_COMMITTEE_SUBMIT_PROPOSAL,
                ("committee", "commmittee_submit_proposal"),
            ),
            (kava::MSG_COMMITTEE_VOTE, ("committee", "committee_vote")),
            (kava::MSG_HARD_DEPOSIT, ("hard", "hard_deposit")),
            (kava::MSG_HARD_WITHDRAW, ("hard", "hard_withdraw")),
            (kava::MSG_HARD_BORROW, ("hard", "hard_borrow")),
            (kava::MSG_HARD_REPAY, ("hard", "hard_repay")),
            (kava::MSG_HARD_LIQUIDATE, ("hard", "hard_liquidate")),
            (kava::MSG_HARVEST_DEPOSIT, ("harvest", "harvest_deposit")),
            (kava::MSG_HARVEST_WITHDRAW, ("harvest", "harvest_withdraw")),
            (
                kava::MSG_HARVEST_CLAIM_REWARD,
                ("harvest", "claim_harvest_reward"),
            ),
            (
                kava::MSG_CLAIM_USDX_MINTING_REWARD,
                ("incentive", "claim_usdx_minting_reward"),
            ),
            (kava::MSG_CLAIM_HARD_REWARD, ("incentive", "claim_hard_reward")),
            (
                kava::MSG_CLAIM_DELEGATOR_REWARD,
                ("incentive", "claim_delegator_reward"),
            ),
            (kava::MSG_ISSUE_TOKENS, ("issuance", "issue_tokens")),
            (kava::MSG_REDEEM_TOKENS, ("issuance", "redeem_tokens")),
            (kava::MSG_BLOCK_ADDRESS, ("issuance", "block_address")),
            (kava::MSG_UNBLOCK_ADDRESS, ("issuance", "unblock_address")),
            (kava::MSG_SET_PAUSE_STATUS, ("issuance", "change_pause_status")),
            (kava::MSG_POST_PRICE, ("pricefeed", "post_price")),
        ])
    });

pub fn route_of(type_url: &str) -> Option<(&'static str, &'static str)> {
    MESSAGE_ROUTES.get(type_url).copied()
}

pub fn decode_message(any: &Any) -> DecodedMessage {
    let Some((route, action)) = route_of(&any.type_url) else {
        let (route, action) = derive_route(&any.type_url);
        return DecodedMessage::Unknown { route, action };
    };

    match decode_known(&any.type_url, &any.value) {
        Some(Ok(msg)) => DecodedMessage::Known { route, action, msg },
        Some(Err(error)) => DecodedMessage::Broken {
            route,
            action,
            error,
        },
        None => DecodedMessage::Unknown {
            route: route.to_string(),
            action: action.to_string(),
        },
    }
}

fn decode_known(type_url: &str, bytes: &[u8]) -> Option<Result<ChainMsg, prost::DecodeError>> {
    let decoded = match type_url {
        cosmos::MSG_SEND => cosmos::MsgSend::decode(bytes).map(ChainMsg::BankSend),
        cosmos::MSG_MULTI_SEND => cosmos::MsgMultiSend::decode(bytes).map(ChainMsg::BankMultiSend),
        cosmos::MSG_DELEGATE => cosmos::MsgDelegate::decode(bytes).map(ChainMsg::StakingDelegate),
        cosmos::MSG_UNDELEGATE => {
            cosmos::MsgUndelegate::decode(bytes).map(ChainMsg::StakingUndelegate)
        }
        cosmos::MSG_BEGIN_REDELEGATE => {
            cosmos::MsgBeginRedelegate::decode(bytes).map(ChainMsg::StakingBeginRedelegate)
        }
        cosmos::MSG_CREATE_VALIDATOR => {
            cosmos::MsgCreateValidator::decode(bytes).map(ChainMsg::StakingCreateValidator)
        }
        cosmos::MSG_EDIT_VALIDATOR => {
            cosmos::MsgEditValidator::decode(bytes).map(ChainMsg::StakingEditValidator)
        }
        cosmos::MSG_WITHDRAW_VALIDATOR_COMMISSION => {
            cosmos::MsgWithdrawValidatorCommission::decode(bytes)
                .map(ChainMsg::DistributionWithdrawValidatorCommission)
        }
        cosmos::MSG_SET_WITHDRAW_ADDRESS => cosmos::MsgSetWithdrawAddress::decode(bytes)
            .map(ChainMsg::DistributionSetWithdrawAddress),
        cosmos::MSG_WITHDRAW_DELEGATOR_REWARD => cosmos::MsgWithdrawDelegatorReward::decode(bytes)
            .map(ChainMsg::DistributionWithdrawDelegatorReward),
        cosmos::MSG_FUND_COMMUNITY_POOL => cosmos::MsgFundCommunityPool::decode(bytes)
            .map(ChainMsg::DistributionFundCommunityPool),
        cosmos::MSG_GOV_DEPOSIT => cosmos::MsgDeposit::decode(bytes).map(ChainMsg::GovDeposit),
        cosmos::MSG_GOV_VOTE => cosmos::MsgVote::decode(bytes).map(ChainMsg::GovVote),
        cosmos::MSG_GOV_SUBMIT_PROPOSAL => {
            cosmos::MsgSubmitProposal::decode(bytes).map(ChainMsg::GovSubmitProposal)
        }
        cosmos::MSG_UNJAIL => cosmos::MsgUnjail::decode(bytes).map(ChainMsg::SlashingUnjail),
        cosmos::MSG_SUBMIT_EVIDENCE => {
            cosmos::MsgSubmitEvidence::decode(bytes).map(ChainMsg::EvidenceSubmitEvidence)
        }
        cosmos::MSG_VERIFY_INVARIANT => {
            cosmos::MsgVerifyInvariant::decode(bytes).map(ChainMsg::CrisisVerifyInvariant)
        }
        kava::MSG_PLACE_BID => kava::MsgPlaceBid::decode(bytes).map(ChainMsg::AuctionPlaceBid),
        kava::MSG_CREATE_CDP => kava::MsgCreateCdp::decode(bytes).map(ChainMsg::CdpCreate),
        kava::MSG_DEPOSIT_CDP => kava::MsgCdpCollateral::decode(bytes).map(ChainMsg::CdpDeposit),
        kava::MSG_WITHDRAW_CDP => kava::MsgCdpCollateral::decode(bytes).map(ChainMsg::CdpWithdraw),
        kava::MSG_DRAW_DEBT => kava::MsgDrawDebt::decode(bytes).map(ChainMsg::CdpDrawDebt),
        kava::MSG_REPAY_DEBT => kava::MsgRepayDebt::decode(bytes).map(ChainMsg::CdpRepayDebt),
        kava::MSG_LIQUIDATE_CDP => kava::MsgLiquidateCdp::decode(bytes).map(ChainMsg::CdpLiquidate),
        kava::MSG_CREATE_ATOMIC_SWAP => {
            kava::MsgCreateAtomicSwap::decode(bytes).map(ChainMsg::Bep3CreateAtomicSwap)
        }
        kava::MSG_CLAIM_ATOMIC_SWAP => {
            kava::MsgClaimAtomicSwap::decode(bytes).map(ChainMsg::Bep3ClaimAtomicSwap)
        }
        kava::MSG_REFUND_ATOMIC_SWAP => {
            kava::MsgRefundAtomicSwap::decode(bytes).map(ChainMsg::Bep3RefundAtomicSwap)
        }
        kava::MSG_COMMITTEE_SUBMIT_PROPOSAL => kava::MsgCommitteeSubmitProposal::decode(bytes)
            .map(ChainMsg::CommitteeSubmitProposal),
        kava::MSG_COMMITTEE_VOTE => {
            kava::MsgCommitteeVote::decode(bytes).map(ChainMsg::CommitteeVote)
        }
        kava::MSG_HARD_DEPOSIT => kava::MsgHardDeposit::decode(bytes).map(ChainMsg::HardDeposit),
        kava::MSG_HARD_WITHDRAW => kava::MsgHardDeposit::decode(bytes).map(ChainMsg::HardWithdraw),
        kava::MSG_HARD_BORROW => kava::MsgHardBorrow::decode(bytes).map(ChainMsg::HardBorrow),
        kava::MSG_HARD_REPAY => kava::MsgHardRepay::decode(bytes).map(ChainMsg::HardRepay),
        kava::MSG_HARD_LIQUIDATE => {
            kava::MsgHardLiquidate::decode(bytes).map(ChainMsg::HardLiquidate)
        }
        kava::MSG_HARVEST_DEPOSIT => {
            kava::MsgHarvestDeposit::decode(bytes).map(ChainMsg::HarvestDeposit)
        }
        kava::MSG_HARVEST_WITHDRAW => {
            kava::MsgHarvestDeposit::decode(bytes).map(ChainMsg::HarvestWithdraw)
        }
        kava::MSG_HARVEST_CLAIM_REWARD => {
            kava::MsgHarvestClaimReward::decode(bytes).map(ChainMsg::HarvestClaimReward)
        }
        kava::MSG_CLAIM_USDX_MINTING_REWARD => {
            kava::MsgClaimReward::decode(bytes).map(ChainMsg::IncentiveClaimUsdxMintingReward)
        }
        kava::MSG_CLAIM_HARD_REWARD => {
            kava::MsgClaimReward::decode(bytes).map(ChainMsg::IncentiveClaimHardReward)
        }
        kava::MSG_CLAIM_DELEGATOR_REWARD => {
            kava::MsgClaimReward::decode(bytes).map(ChainMsg::IncentiveClaimDelegatorReward)
        }
        kava::MSG_ISSUE_TOKENS => {
            kava::MsgIssueTokens::decode(bytes).map(ChainMsg::IssuanceIssueTokens)
        }
        kava::MSG_REDEEM_TOKENS => {
            kava::MsgRedeemTokens::decode(bytes).map(ChainMsg::IssuanceRedeemTokens)
        }
        kava::MSG_BLOCK_ADDRESS => {
            kava::MsgBlockAddress::decode(bytes).map(ChainMsg::IssuanceBlockAddress)
        }
        kava::MSG_UNBLOCK_ADDRESS => {
            kava::MsgBlockAddress::decode(bytes).map(ChainMsg::IssuanceUnblockAddress)
        }
        kava::MSG_SET_PAUSE_STATUS => {
            kava::MsgSetPauseStatus::decode(bytes).map(ChainMsg::IssuanceSetPauseStatus)
        }
        kava::MSG_POST_PRICE => kava::MsgPostPrice::decode(bytes).map(ChainMsg::PricefeedPostPrice),
        _ => return None,
    };
    Some(decoded)
}

/// `/kava.swap.v1beta1.MsgSwapExactForTokens` becomes `("swap", "swap_exact_for_tokens")`.
pub fn derive_route(type_url: &str) -> (String, String) {
    let path = type_url.trim_start_matches('/');
    let mut segments: Vec<&str> = path.split('.').collect();
    let name = segments.pop().unwrap_or_default();
    let route = segments
        .iter()
        .rev()
        .find(|s| !s.starts_with('v') || !s[1..].starts_with(|c: char| c.is_ascii_digit()))
        .copied()
        .unwrap_or_default();

    let name = name.strip_prefix("Msg").unwrap_or(name);
    let mut action = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                action.push('_');
            }
            action.push(c.to_ascii_lowercase());
        } else {
            action.push(c);
        }
    }

    (route.to_string(), action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proto::Coin;

    fn any<M: Message>(type_url: &str, msg: &M) -> Any {
        Any {
            type_url: type_url.to_string(),
            value: msg.encode_to_vec(),
        }
    }

    #[test]
    fn test_known_message_decodes() {
        let send = cosmos::MsgSend {
            from_address: "kava1from".to_string(),
            to_address: "kava1to".to_string(),
            amount: vec![Coin::new("ukava", "10")],
        };

        match decode_message(&any(cosmos::MSG_SEND, &send)) {
            DecodedMessage::Known { route, action, msg } => {
                assert_eq!((route, action), ("bank", "send"));
                assert_eq!(msg, ChainMsg::BankSend(send));
            }
            other => panic!("unexpected decode result: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_bytes_are_broken() {
        let garbage = Any {
            type_url: cosmos::MSG_DELEGATE.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };
        assert!(matches!(
            decode_message(&garbage),
            DecodedMessage::Broken {
                route: "staking",
                action: "delegate",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_type_url_derives_route() {
        let unknown = Any {
            type_url: "/kava.swap.v1beta1.MsgSwapExactForTokens".to_string(),
            value: vec![],
        };
        match decode_message(&unknown) {
            DecodedMessage::Unknown { route, action } => {
                assert_eq!(route, "swap");
                assert_eq!(action, "swap_exact_for_tokens");
            }
            other => panic!("unexpected decode result: {other:?}"),
        }
    }

    #[test]
    fn test_every_route_decodes_empty_message() {
        for type_url in MESSAGE_ROUTES.keys() {
            assert!(
                matches!(decode_known(type_url, &[]), Some(Ok(_))),
                "{type_url} has no decoder"
            );
        }
    }
}
