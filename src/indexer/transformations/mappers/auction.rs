use super::{account, insert_coin};
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

pub fn place_bid_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let ChainMsg::AuctionPlaceBid(bid) = msg else {
        return Err(MapperError::UnexpectedMessage {
            expected: "place_bid",
        });
    };

    let mut se = SubsetEvent::new("place_bid", "auction")
        .with_node("bidder", account("bidder", &bid.bidder)?)
        .with_additional("auction_id", bid.auction_id.to_string());
    insert_coin(&mut se, "bid", bid.amount.as_ref())?;

    produce_transfers(&mut se, "send", None, logf)?;
    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::{Coin, kava};

    #[test]
    fn test_place_bid() {
        let msg = ChainMsg::AuctionPlaceBid(kava::MsgPlaceBid {
            auction_id: 981,
            bidder: DELEGATOR.to_string(),
            amount: Some(Coin::new("usdx", "250000")),
        });
        let logf = transfer_log(&[("recipient", RECIPIENT), ("amount", "250000usdx")]);

        let se = place_bid_to_sub(&msg, &logf).unwrap();
        assert_eq!(se.additional["auction_id"], vec!["981"]);
        assert_eq!(se.amount["bid"].currency, "usdx");
        assert_eq!(se.transfers["send"][0].account.id, RECIPIENT);
    }
}
