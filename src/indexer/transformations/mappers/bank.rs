use tracing::warn;

use super::transfer;
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn send_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::BankSend(send) = msg else {
        return Err(MapperError::UnexpectedMessage { expected: "send" });
    };

    let mut se = SubsetEvent::new("send", "bank");
    se.sender
        .push(transfer("from_address", &send.from_address, &send.amount)?);
    se.recipient
        .push(transfer("to_address", &send.to_address, &send.amount)?);

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

/// Inputs and outputs with unusable addresses are skipped rather than failing the message.
pub fn multisend_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::BankMultiSend(multisend) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "multisend",
        });
    };

    let mut se = SubsetEvent::new("multisend", "bank");
    for input in &multisend.inputs {
        match transfer("input", &input.address, &input.coins) {
            Ok(evt) => se.sender.push(evt),
            Err(e) => warn!(error = %e, "Skipping multisend input"),
        }
    }
    for output in &multisend.outputs {
        match transfer("output", &output.address, &output.coins) {
            Ok(evt) => se.recipient.push(evt),
            Err(e) => warn!(error = %e, "Skipping multisend output"),
        }
    }

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Coin, cosmos};
    use num_bigint::BigInt;

    #[test]
    fn test_send() {
        let msg = ChainMsg::BankSend(cosmos::MsgSend {
            from_address: DELEGATOR.to_string(),
            to_address: RECIPIENT.to_string(),
            amount: vec![Coin::new("ukava", "1500")],
        });
        let logf = transfer_log(&[
            ("recipient", RECIPIENT),
            ("sender", DELEGATOR),
            ("amount", "1500ukava"),
        ]);

        let se = send_to_sub(&msg, &logf).unwrap();
        assert_eq!(se.kind, vec!["send"]);
        assert_eq!(se.module, "bank");
        assert_eq!(se.sender[0].account.id, DELEGATOR);
        assert_eq!(se.recipient[0].amounts[0].numeric, BigInt::from(1500));
        assert_eq!(se.transfers["send"][0].account.id, RECIPIENT);

        // Pure function of its inputs.
        assert_eq!(se, send_to_sub(&msg, &logf).unwrap());
    }

    #[test]
    fn test_send_with_bad_address_fails() {
        let msg = ChainMsg::BankSend(cosmos::MsgSend {
            from_address: "not an address".to_string(),
            to_address: RECIPIENT.to_string(),
            amount: vec![],
        });
        assert!(matches!(
            send_to_sub(&msg, &LogFormat::default()),
            Err(MapperError::InvalidAddress {
                field: "from_address",
                ..
            })
        ));
    }

    #[test]
    fn test_multisend_skips_bad_entries() {
        let msg = ChainMsg::BankMultiSend(cosmos::MsgMultiSend {
            inputs: vec![cosmos::Input {
                address: DELEGATOR.to_string(),
                coins: vec![Coin::new("ukava", "30")],
            }],
            outputs: vec![
                cosmos::Output {
                    address: RECIPIENT.to_string(),
                    coins: vec![Coin::new("ukava", "20")],
                },
                cosmos::Output {
                    address: "garbage".to_string(),
                    coins: vec![Coin::new("ukava", "10")],
                },
            ],
        });

        let se = multisend_to_sub(&msg, &LogFormat::default()).unwrap();
        assert_eq!(se.sender.len(), 1);
        assert_eq!(se.recipient.len(), 1);
        assert!(se.transfers.is_empty());
    }
}
