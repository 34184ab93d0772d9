use super::{Any, Coin, Timestamp};

pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_MULTI_SEND: &str = "/cosmos.bank.v1beta1.MsgMultiSend";
pub const MSG_DELEGATE: &str = "/cosmos.staking.v1beta1.MsgDelegate";
pub const MSG_UNDELEGATE: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
pub const MSG_BEGIN_REDELEGATE: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
pub const MSG_CREATE_VALIDATOR: &str = "/cosmos.staking.v1beta1.MsgCreateValidator";
pub const MSG_EDIT_VALIDATOR: &str = "/cosmos.staking.v1beta1.MsgEditValidator";
pub const MSG_WITHDRAW_VALIDATOR_COMMISSION: &str =
    "/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission";
pub const MSG_SET_WITHDRAW_ADDRESS: &str = "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress";
pub const MSG_WITHDRAW_DELEGATOR_REWARD: &str =
    "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";
pub const MSG_FUND_COMMUNITY_POOL: &str = "/cosmos.distribution.v1beta1.MsgFundCommunityPool";
pub const MSG_GOV_DEPOSIT: &str = "/cosmos.gov.v1beta1.MsgDeposit";
pub const MSG_GOV_VOTE: &str = "/cosmos.gov.v1beta1.MsgVote";
pub const MSG_GOV_SUBMIT_PROPOSAL: &str = "/cosmos.gov.v1beta1.MsgSubmitProposal";
pub const MSG_UNJAIL: &str = "/cosmos.slashing.v1beta1.MsgUnjail";
pub const MSG_SUBMIT_EVIDENCE: &str = "/cosmos.evidence.v1beta1.MsgSubmitEvidence";
pub const MSG_VERIFY_INVARIANT: &str = "/cosmos.crisis.v1beta1.MsgVerifyInvariant";

////////////////////////////////////////// Bank //////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSend {
    #[prost(string, tag = "1")]
    pub from_address: String,
    #[prost(string, tag = "2")]
    pub to_address: String,
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Input {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(message, repeated, tag = "2")]
    pub coins: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Output {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(message, repeated, tag = "2")]
    pub coins: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgMultiSend {
    #[prost(message, repeated, tag = "1")]
    pub inputs: Vec<Input>,
    #[prost(message, repeated, tag = "2")]
    pub outputs: Vec<Output>,
}

//////////////////////////////////////// Staking /////////////////////////////////////////

/// Shared by `MsgDelegate` and `MsgUndelegate`, which have identical layouts.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDelegate {
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    #[prost(string, tag = "2")]
    pub validator_address: String,
    #[prost(message, optional, tag = "3")]
    pub amount: Option<Coin>,
}

pub type MsgUndelegate = MsgDelegate;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgBeginRedelegate {
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    #[prost(string, tag = "2")]
    pub validator_src_address: String,
    #[prost(string, tag = "3")]
    pub validator_dst_address: String,
    #[prost(message, optional, tag = "4")]
    pub amount: Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Description {
    #[prost(string, tag = "1")]
    pub moniker: String,
    #[prost(string, tag = "2")]
    pub identity: String,
    #[prost(string, tag = "3")]
    pub website: String,
    #[prost(string, tag = "4")]
    pub security_contact: String,
    #[prost(string, tag = "5")]
    pub details: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommissionRates {
    #[prost(string, tag = "1")]
    pub rate: String,
    #[prost(string, tag = "2")]
    pub max_rate: String,
    #[prost(string, tag = "3")]
    pub max_change_rate: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateValidator {
    #[prost(message, optional, tag = "1")]
    pub description: Option<Description>,
    #[prost(message, optional, tag = "2")]
    pub commission: Option<CommissionRates>,
    #[prost(string, tag = "3")]
    pub min_self_delegation: String,
    #[prost(string, tag = "4")]
    pub delegator_address: String,
    #[prost(string, tag = "5")]
    pub validator_address: String,
    #[prost(message, optional, tag = "6")]
    pub pubkey: Option<Any>,
    #[prost(message, optional, tag = "7")]
    pub value: Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgEditValidator {
    #[prost(message, optional, tag = "1")]
    pub description: Option<Description>,
    #[prost(string, tag = "2")]
    pub validator_address: String,
    #[prost(string, tag = "3")]
    pub commission_rate: String,
    #[prost(string, tag = "4")]
    pub min_self_delegation: String,
}

////////////////////////////////////// Distribution //////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgWithdrawValidatorCommission {
    #[prost(string, tag = "1")]
    pub validator_address: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSetWithdrawAddress {
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    #[prost(string, tag = "2")]
    pub withdraw_address: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgWithdrawDelegatorReward {
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    #[prost(string, tag = "2")]
    pub validator_address: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgFundCommunityPool {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(string, tag = "2")]
    pub depositor: String,
}

////////////////////////////////////////// Gov ///////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDeposit {
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
    #[prost(string, tag = "2")]
    pub depositor: String,
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgVote {
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
    #[prost(string, tag = "2")]
    pub voter: String,
    #[prost(int32, tag = "3")]
    pub option: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSubmitProposal {
    #[prost(message, optional, tag = "1")]
    pub content: Option<Any>,
    #[prost(message, repeated, tag = "2")]
    pub initial_deposit: Vec<Coin>,
    #[prost(string, tag = "3")]
    pub proposer: String,
}

/// Leading fields every proposal content type shares.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProposalContent {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub description: String,
}

pub fn vote_option_name(option: i32) -> &'static str {
    match option {
        1 => "Yes",
        2 => "Abstain",
        3 => "No",
        4 => "NoWithVeto",
        _ => "Unspecified",
    }
}

////////////////////////////////// Slashing / Evidence //////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgUnjail {
    #[prost(string, tag = "1")]
    pub validator_addr: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSubmitEvidence {
    #[prost(string, tag = "1")]
    pub submitter: String,
    #[prost(message, optional, tag = "2")]
    pub evidence: Option<Any>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Equivocation {
    #[prost(int64, tag = "1")]
    pub height: i64,
    #[prost(message, optional, tag = "2")]
    pub time: Option<Timestamp>,
    #[prost(int64, tag = "3")]
    pub power: i64,
    #[prost(string, tag = "4")]
    pub consensus_address: String,
}

///////////////////////////////////////// Crisis /////////////////////////////////////////

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgVerifyInvariant {
    #[prost(string, tag = "1")]
    pub sender: String,
    #[prost(string, tag = "2")]
    pub invariant_module_name: String,
    #[prost(string, tag = "3")]
    pub invariant_route: String,
}
