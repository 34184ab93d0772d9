use prost::Message;
use tracing::debug;

use super::{account, insert_indexed_coins, transfer};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::Any;
use crate::models::proto::cosmos::{ProposalContent, vote_option_name};
use crate::models::transactions::SubsetEvent;

pub fn deposit_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::GovDeposit(dep) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "deposit",
        });
    };

    let mut se = SubsetEvent::new("deposit", "gov")
        .with_node("depositor", account("depositor", &dep.depositor)?)
        .with_additional("proposalID", dep.proposal_id.to_string());
    se.sender
        .push(transfer("depositor", &dep.depositor, &dep.amount)?);
    insert_indexed_coins(&mut se, Some("deposit"), &dep.amount)?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

pub fn vote_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::GovVote(vote) = msg else {
        return Err(MapperError::UnexpectedMessage { expected: "vote" });
    };

    Ok(SubsetEvent::new("vote", "gov")
        .with_node("voter", account("voter", &vote.voter)?)
        .with_additional("proposalID", vote.proposal_id.to_string())
        .with_additional("option", vote_option_name(vote.option)))
}

pub fn submit_proposal_to_sub(
    msg: &ChainMsg,
    logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::GovSubmitProposal(sp) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "submit_proposal",
        });
    };

    let mut se = SubsetEvent::new("submit_proposal", "gov")
        .with_node("proposer", account("proposer", &sp.proposer)?);
    se.sender
        .push(transfer("proposer", &sp.proposer, &sp.initial_deposit)?);
    insert_indexed_coins(&mut se, Some("initial_deposit"), &sp.initial_deposit)?;

    if let Some(content) = &sp.content {
        se = with_proposal_content(se, content);
    }

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

/// Describes a proposal payload by its type URL and the title/description every
/// content type starts with.
pub(crate) fn with_proposal_content(mut se: SubsetEvent, content: &Any) -> SubsetEvent {
    let path = content.type_url.trim_start_matches('/');
    let mut segments = path.split('.');
    if let Some(route) = segments.nth(1) {
        se = se.with_additional("proposal_route", route);
    }
    if let Some(kind) = path.rsplit('.').next().filter(|k| !k.is_empty()) {
        se = se.with_additional("proposal_type", kind.trim_end_matches("Proposal"));
    }

    match ProposalContent::decode(content.value.as_slice()) {
        Ok(parsed) => {
            if !parsed.description.is_empty() {
                se = se.with_additional("description", parsed.description);
            }
            if !parsed.title.is_empty() {
                se = se.with_additional("title", parsed.title);
            }
        }
        Err(e) => debug!(type_url = %content.type_url, error = %e, "Proposal content without title"),
    }

    if !content.type_url.is_empty() {
        se = se.with_additional("content", content.type_url.clone());
    }
    se
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Coin, cosmos};

    #[test]
    fn test_deposit_keys() {
        let msg = ChainMsg::GovDeposit(cosmos::MsgDeposit {
            proposal_id: 12,
            depositor: DELEGATOR.to_string(),
            amount: vec![Coin::new("ukava", "10"), Coin::new("hard", "3")],
        });

        let se = deposit_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.additional["proposalID"], vec!["12"]);
        assert_eq!(se.amount["deposit"].currency, "ukava");
        assert_eq!(se.amount["deposit_1"].currency, "hard");
        assert_eq!(se.sender[0].amounts.len(), 2);
    }

    #[test]
    fn test_vote_option_name() {
        let msg = ChainMsg::GovVote(cosmos::MsgVote {
            proposal_id: 3,
            voter: DELEGATOR.to_string(),
            option: 4,
        });
        let se = vote_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.additional["option"], vec!["NoWithVeto"]);
    }

    #[test]
    fn test_submit_proposal_content() {
        let content = ProposalContent {
            title: "Raise debt limit".to_string(),
            description: "Raise the USDX debt limit".to_string(),
        };
        let msg = ChainMsg::GovSubmitProposal(cosmos::MsgSubmitProposal {
            content: Some(Any {
                type_url: "/cosmos.gov.v1beta1.TextProposal".to_string(),
                value: content.encode_to_vec(),
            }),
            initial_deposit: vec![Coin::new("ukava", "1000")],
            proposer: DELEGATOR.to_string(),
        });

        let se = submit_proposal_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.additional["proposal_route"], vec!["gov"]);
        assert_eq!(se.additional["proposal_type"], vec!["Text"]);
        assert_eq!(se.additional["title"], vec!["Raise debt limit"]);
        assert_eq!(se.amount["initial_deposit"].text, "1000");
    }
}
