use super::account;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn unjail_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::SlashingUnjail(unjail) = msg else {
        return Err(MapperError::UnexpectedMessage { expected: "unjail" });
    };

    Ok(SubsetEvent::new("unjail", "slashing")
        .with_node("validator", account("validator_addr", &unjail.validator_addr)?))
}
