use super::{Any, Coin, Timestamp};

pub const MSG_PLACE_BID: &str = "/kava.auction.v1beta1.MsgPlaceBid";
pub const MSG_CREATE_CDP: &str = "/kava.cdp.v1beta1.MsgCreateCDP";
pub const MSG_DEPOSIT_CDP: &str = "/kava.cdp.v1beta1.MsgDeposit";
pub const MSG_WITHDRAW_CDP: &str = "/kava.cdp.v1beta1.MsgWithdraw";
pub const MSG_DRAW_DEBT: &str = "/kava.cdp.v1beta1.MsgDrawDebt";
pub const MSG_REPAY_DEBT: &str = "/kava.cdp.v1beta1.MsgRepayDebt";
pub const MSG_LIQUIDATE_CDP: &str = "/kava.cdp.v1beta1.MsgLiquidate";
pub const MSG_CREATE_ATOMIC_SWAP: &str = "/kava.bep3.v1beta1.MsgCreateAtomicSwap";
pub const MSG_CLAIM_ATOMIC_SWAP: &str = "/kava.bep3.v1beta1.MsgClaimAtomicSwap";
pub const MSG_REFUND_ATOMIC_SWAP: &str = "/kava.bep3.v1beta1.MsgRefundAtomicSwap";
pub const MSG_COMMITTEE_SUBMIT_PROPOSAL: &str = "/kava.committee.v1beta1.MsgSubmitProposal";
pub const MSG_COMMITTEE_VOTE: &str = "/kava.committee.v1beta1.MsgVote";
pub const MSG_HARD_DEPOSIT: &str = "/kava.hard.v1beta1.MsgDeposit";
pub const MSG_HARD_WITHDRAW: &str = "/kava.hard.v1beta1.MsgWithdraw";
pub const MSG_HARD_BORROW: &str = "/kava.hard.v1beta1.MsgBorrow";
pub const MSG_HARD_REPAY: &str = "/kava.hard.v1beta1.MsgRepay";
pub const MSG_HARD_LIQUIDATE: &str = "/kava.hard.v1beta1.MsgLiquidate";
pub const MSG_HARVEST_DEPOSIT: &str = "/kava.harvest.v1beta1.MsgDeposit";
pub const MSG_HARVEST_WITHDRAW: &str = "/kava.harvest.v1beta1.MsgWithdraw";
pub const MSG_HARVEST_CLAIM_REWARD: &str = "/kava.harvest.v1beta1.MsgClaimReward";
pub const MSG_CLAIM_USDX_MINTING_REWARD: &str = "/kava.incentive.v1beta1.MsgClaimUSDXMintingReward";
pub const MSG_CLAIM_HARD_REWARD: &str = "/kava.incentive.v1beta1.MsgClaimHardReward";
pub const MSG_CLAIM_DELEGATOR_REWARD: &str = "/kava.incentive.v1beta1.MsgClaimDelegatorReward";
pub const MSG_ISSUE_TOKENS: &str = "/kava.issuance.v1beta1.MsgIssueTokens";
pub const MSG_REDEEM_TOKENS: &str = "/kava.issuance.v1beta1.MsgRedeemTokens";
pub const MSG_BLOCK_ADDRESS: &str = "/kava.issuance.v1beta1.MsgBlockAddress";
pub const MSG_UNBLOCK_ADDRESS: &str = "/kava.issuance.v1beta1.MsgUnblockAddress";
pub const MSG_SET_PAUSE_STATUS: &str = "/kava.issuance.v1beta1.MsgSetPauseStatus";
pub const MSG_POST_PRICE: &str = "/kava.pricefeed.v1beta1.MsgPostPrice";

//////////////////////////////////////// Auction /////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgPlaceBid {
    #[prost(uint64, tag = "1")]
    pub auction_id: u64,
    #[prost(string, tag = "2")]
    pub bidder: String,
    #[prost(message, optional, tag = "3")]
    pub amount: Option<Coin>,
}

////////////////////////////////////////// CDP ///////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateCdp {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(message, optional, tag = "2")]
    pub collateral: Option<Coin>,
    #[prost(message, optional, tag = "3")]
    pub principal: Option<Coin>,
    #[prost(string, tag = "4")]
    pub collateral_type: String,
}

/// Layout shared by the cdp deposit and withdraw messages.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCdpCollateral {
    #[prost(string, tag = "1")]
    pub depositor: String,
    #[prost(string, tag = "2")]
    pub owner: String,
    #[prost(message, optional, tag = "3")]
    pub collateral: Option<Coin>,
    #[prost(string, tag = "4")]
    pub collateral_type: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDrawDebt {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub collateral_type: String,
    #[prost(message, optional, tag = "3")]
    pub principal: Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgRepayDebt {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub collateral_type: String,
    #[prost(message, optional, tag = "3")]
    pub payment: Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgLiquidateCdp {
    #[prost(string, tag = "1")]
    pub keeper: String,
    #[prost(string, tag = "2")]
    pub borrower: String,
    #[prost(string, tag = "3")]
    pub collateral_type: String,
}

////////////////////////////////////////// BEP3 //////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateAtomicSwap {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub to: String,
    #[prost(string, tag = "3")]
    pub recipient_other_chain: String,
    #[prost(string, tag = "4")]
    pub sender_other_chain: String,
    #[prost(string, tag = "5")]
    pub random_number_hash: String,
    #[prost(int64, tag = "6")]
    pub timestamp: i64,
    #[prost(message, repeated, tag = "7")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "8")]
    pub height_span: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgClaimAtomicSwap {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub swap_id: String,
    #[prost(string, tag = "3")]
    pub random_number: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgRefundAtomicSwap {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub swap_id: String,
}

/////////////////////////////////////// Committee ////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCommitteeSubmitProposal {
    #[prost(message, optional, tag = "1")]
    pub pub_proposal: Option<Any>,
    #[prost(string, tag = "2")]
    pub proposer: String,
    #[prost(uint64, tag = "3")]
    pub committee_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCommitteeVote {
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
    #[prost(string, tag = "2")]
    pub voter: String,
    #[prost(int32, tag = "3")]
    pub vote_type: i32,
}

pub fn committee_vote_name(vote_type: i32) -> &'static str {
    match vote_type {
        1 => "Yes",
        2 => "No",
        3 => "Abstain",
        _ => "Unspecified",
    }
}

////////////////////////////////////////// Hard //////////////////////////////////////////

/// Layout shared by hard deposit and withdraw.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHardDeposit {
    #[prost(string, tag = "1")]
    pub depositor: String,
    #[prost(message, repeated, tag = "2")]
    pub amount: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHardBorrow {
    #[prost(string, tag = "1")]
    pub borrower: String,
    #[prost(message, repeated, tag = "2")]
    pub amount: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHardRepay {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub owner: String,
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHardLiquidate {
    #[prost(string, tag = "1")]
    pub keeper: String,
    #[prost(string, tag = "2")]
    pub borrower: String,
}

//////////////////////////////////////// Harvest /////////////////////////////////////////

/// Layout shared by harvest deposit and withdraw; predecessor of the hard module.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHarvestDeposit {
    #[prost(string, tag = "1")]
    pub depositor: String,
    #[prost(message, optional, tag = "2")]
    pub amount: Option<Coin>,
    #[prost(string, tag = "3")]
    pub deposit_type: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgHarvestClaimReward {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub receiver: String,
    #[prost(string, tag = "3")]
    pub deposit_denom: String,
    #[prost(string, tag = "4")]
    pub multiplier_name: String,
    #[prost(string, tag = "5")]
    pub deposit_type: String,
}

/////////////////////////////////////// Incentive ////////////////////////////////////////

/// Layout shared by every incentive claim message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgClaimReward {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub multiplier_name: String,
}

//////////////////////////////////////// Issuance ////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgIssueTokens {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(message, optional, tag = "2")]
    pub tokens: Option<Coin>,
    #[prost(string, tag = "3")]
    pub receiver: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgRedeemTokens {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(message, optional, tag = "2")]
    pub tokens: Option<Coin>,
}

/// Layout shared by block and unblock address.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgBlockAddress {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub denom: String,
    #[prost(string, tag = "3")]
    pub address: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSetPauseStatus {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub denom: String,
    #[prost(bool, tag = "3")]
    pub status: bool,
}

/////////////////////////////////////// Pricefeed ////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgPostPrice {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub market_id: String,
    #[prost(string, tag = "3")]
    pub price: String,
    #[prost(message, optional, tag = "4")]
    pub expiry: Option<Timestamp>,
}
