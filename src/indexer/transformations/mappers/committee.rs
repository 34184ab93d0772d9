use super::account;
use super::gov::with_proposal_content;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::kava::committee_vote_name;
use crate::models::transactions::SubsetEvent;

/// Downstream consumers key on the historical `commmittee` module spelling.
const MODULE: &str = "commmittee";

pub fn submit_proposal_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CommitteeSubmitProposal(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "commmittee_submit_proposal",
        });
    };

    let mut se = SubsetEvent::new("commmittee_submit_proposal", MODULE)
        .with_node("proposer", account("proposer", &m.proposer)?)
        .with_additional("committee_id", m.committee_id.to_string());
    if let Some(proposal) = &m.pub_proposal {
        se = with_proposal_content(se, proposal);
    }
    Ok(se)
}

pub fn vote_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CommitteeVote(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "committee_vote",
        });
    };

    Ok(SubsetEvent::new("committee_vote", MODULE)
        .with_node("voter", account("voter", &m.voter)?)
        .with_additional("proposal_id", m.proposal_id.to_string())
        .with_additional("vote_type", committee_vote_name(m.vote_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::kava;

    #[test]
    fn test_committee_vote() {
        let msg = ChainMsg::CommitteeVote(kava::MsgCommitteeVote {
            proposal_id: 7,
            voter: DELEGATOR.to_string(),
            vote_type: 1,
        });

        let se = vote_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.module, "commmittee");
        assert_eq!(se.additional["proposal_id"], vec!["7"]);
        assert_eq!(se.additional["vote_type"], vec!["Yes"]);
    }
}
