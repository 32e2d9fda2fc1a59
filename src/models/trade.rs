use crate::utils::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use uuid::Uuid;

/// Identifier of a journaled trade. Assigned once on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TradeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TradeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(ValidationError::Invalid {
                field: "direction",
                expected: "LONG or SHORT",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything a user edits on a trade. Create and update both take a full
/// set of fields; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFields {
    pub date: NaiveDate,
    pub instrument: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    /// Realized result as entered by the user, fees included. Never derived
    /// from the prices.
    pub profit_loss: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    #[serde(flatten)]
    pub fields: TradeFields,
}

impl Trade {
    pub fn new(id: TradeId, fields: TradeFields) -> Self {
        Self { id, fields }
    }

    pub fn is_winner(&self) -> bool {
        self.fields.profit_loss > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> TradeFields {
        TradeFields {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            instrument: "EURUSD".to_string(),
            direction: Direction::Short,
            entry_price: 1.0921,
            exit_price: 1.0875,
            stop_loss: None,
            take_profit: Some(1.08),
            profit_loss: 46.0,
            notes: String::new(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let trade = Trade::new(TradeId::new(), sample_fields());
        let value = serde_json::to_value(&trade).unwrap();

        assert_eq!(value["id"], json!(trade.id.to_string()));
        assert_eq!(value["date"], json!("2024-03-15"));
        assert_eq!(value["direction"], json!("SHORT"));
        assert_eq!(value["entryPrice"], json!(1.0921));
        assert_eq!(value["stopLoss"], json!(null));
        assert_eq!(value["takeProfit"], json!(1.08));
        assert_eq!(value["profitLoss"], json!(46.0));
    }

    #[test]
    fn missing_notes_deserialize_as_empty() {
        let id = TradeId::new();
        let raw = json!({
            "id": id.to_string(),
            "date": "2024-03-15",
            "instrument": "BTCUSDT",
            "direction": "LONG",
            "entryPrice": 64000.0,
            "exitPrice": 65000.0,
            "stopLoss": null,
            "takeProfit": null,
            "profitLoss": 100.0
        });

        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.id, id);
        assert_eq!(trade.fields.notes, "");
        assert_eq!(trade.fields.direction, Direction::Long);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!(" short ".parse::<Direction>().unwrap(), Direction::Short);
        assert_eq!("Long".parse::<Direction>().unwrap(), Direction::Long);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn breakeven_is_not_a_winner() {
        let mut fields = sample_fields();
        fields.profit_loss = 0.0;
        assert!(!Trade::new(TradeId::new(), fields).is_winner());
    }
}
