use super::account;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::{EventTransfer, SubsetEvent};

pub fn verify_invariant_to_sub(
    msg: &ChainMsg,
    _logf: &LogFormat,
) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::CrisisVerifyInvariant(mvi) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "verify_invariant",
        });
    };

    let mut se = SubsetEvent::new("verify_invariant", "crisis")
        .with_additional("invariant_route", mvi.invariant_route.as_str())
        .with_additional("invariant_module_name", mvi.invariant_module_name.as_str());
    se.sender.push(EventTransfer {
        account: account("sender", &mvi.sender)?,
        amounts: Vec::new(),
    });
    Ok(se)
}
