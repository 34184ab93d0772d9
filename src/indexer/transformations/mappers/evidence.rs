use prost::Message;
use tracing::warn;

use super::account;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::proto::cosmos::Equivocation;
use crate::models::transactions::SubsetEvent;

pub fn submit_evidence_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::EvidenceSubmitEvidence(mse) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "submit_evidence",
        });
    };

    let mut se = SubsetEvent::new("submit_evidence", "evidence")
        .with_node("submitter", account("submitter", &mse.submitter)?);

    let Some(evidence) = &mse.evidence else {
        return Ok(se);
    };
    match Equivocation::decode(evidence.value.as_slice()) {
        Ok(eq) => {
            se = se
                .with_additional("evidence_consensus", eq.consensus_address)
                .with_additional("evidence_height", eq.height.to_string())
                .with_additional("evidence_validator_power", eq.power.to_string());
            if let Some(time) = eq.time.as_ref().and_then(|t| t.to_datetime()) {
                se = se.with_additional("evidence_time", time.to_rfc3339());
            }
        }
        Err(e) => warn!(type_url = %evidence.type_url, error = %e, "Unsupported evidence payload"),
    }

    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Any, Timestamp, cosmos};

    #[test]
    fn test_equivocation_fields() {
        let eq = Equivocation {
            height: 1200,
            time: Some(Timestamp {
                seconds: 1_614_592_800,
                nanos: 0,
            }),
            power: 55,
            consensus_address: "kavavalcons1qy352euf40x77qfrg4ncn27dauqjx3t8vk4240".to_string(),
        };
        let msg = ChainMsg::EvidenceSubmitEvidence(cosmos::MsgSubmitEvidence {
            submitter: DELEGATOR.to_string(),
            evidence: Some(Any {
                type_url: "/cosmos.evidence.v1beta1.Equivocation".to_string(),
                value: eq.encode_to_vec(),
            }),
        });

        let se = submit_evidence_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.additional["evidence_height"], vec!["1200"]);
        assert_eq!(se.additional["evidence_validator_power"], vec!["55"]);
        assert_eq!(
            se.additional["evidence_time"],
            vec!["2021-03-01T10:00:00+00:00"]
        );
    }
}
