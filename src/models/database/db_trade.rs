use crate::models::trade::{Direction, Trade, TradeFields, TradeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row shape of the remote `trades` table. Carries the owning user next to
/// the trade fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DBTrade {
    pub id: TradeId,
    pub user_id: String,
    pub date: NaiveDate,
    pub instrument: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub profit_loss: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DBTrade {
    pub fn from_trade(trade: &Trade, user_id: &str) -> Self {
        let fields = &trade.fields;

        Self {
            id: trade.id,
            user_id: user_id.to_string(),
            date: fields.date,
            instrument: fields.instrument.clone(),
            direction: fields.direction,
            entry_price: fields.entry_price,
            exit_price: fields.exit_price,
            stop_loss: fields.stop_loss,
            take_profit: fields.take_profit,
            profit_loss: fields.profit_loss,
            notes: Some(fields.notes.clone()),
        }
    }
}

impl From<DBTrade> for Trade {
    fn from(row: DBTrade) -> Self {
        Trade::new(
            row.id,
            TradeFields {
                date: row.date,
                instrument: row.instrument,
                direction: row.direction,
                entry_price: row.entry_price,
                exit_price: row.exit_price,
                stop_loss: row.stop_loss,
                take_profit: row.take_profit,
                profit_loss: row.profit_loss,
                notes: row.notes.unwrap_or_default(),
            },
        )
    }
}
