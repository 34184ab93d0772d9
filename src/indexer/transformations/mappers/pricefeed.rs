use super::account;
use crate::indexer::transformations::amounts::dec_amount;
use crate::indexer::transformations::messages::ChainMsg;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn post_price_to_sub(msg: &ChainMsg, _logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::PricefeedPostPrice(m) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "post_price",
        });
    };

    let mut se = SubsetEvent::new("post_price", "pricefeed")
        .with_node("from", account("from", &m.from)?)
        .with_additional("market_id", m.market_id.as_str());

    if !m.price.is_empty() {
        let mut value = dec_amount(&m.price)?;
        value.currency = m.market_id.clone();
        se.amount.insert("value".to_string(), value);
    }
    if let Some(expiry) = m.expiry.as_ref().and_then(|t| t.to_datetime()) {
        se = se.with_additional("expiry", expiry.to_rfc3339());
    }

    Ok(se)
}
