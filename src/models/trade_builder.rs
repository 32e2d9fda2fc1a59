use crate::{
    models::trade::{Direction, TradeFields},
    utils::error::ValidationError,
};
use chrono::NaiveDate;

/// Assembles the fields of a trade. Used by form submission and by tests to
/// put together fixtures without spelling out every field.
#[derive(Debug, Clone, Default)]
pub struct TradeBuilder {
    pub date: Option<NaiveDate>,
    pub instrument: Option<String>,
    pub direction: Option<Direction>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub profit_loss: Option<f64>,
    pub notes: String,
}

impl TradeBuilder {
    pub fn new() -> Self {
        TradeBuilder {
            direction: Some(Direction::Long),
            ..Default::default()
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn instrument(mut self, instrument: &str) -> Self {
        self.instrument = Some(instrument.to_string());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn entry_price(mut self, entry_price: f64) -> Self {
        self.entry_price = Some(entry_price);
        self
    }

    pub fn exit_price(mut self, exit_price: f64) -> Self {
        self.exit_price = Some(exit_price);
        self
    }

    pub fn stop_loss(mut self, stop_loss: Option<f64>) -> Self {
        self.stop_loss = stop_loss;
        self
    }

    pub fn take_profit(mut self, take_profit: Option<f64>) -> Self {
        self.take_profit = take_profit;
        self
    }

    pub fn profit_loss(mut self, profit_loss: f64) -> Self {
        self.profit_loss = Some(profit_loss);
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    pub fn build(&self) -> Result<TradeFields, ValidationError> {
        let date = self.date.ok_or(ValidationError::Missing("date"))?;
        let instrument = self
            .instrument
            .as_deref()
            .map(str::trim)
            .filter(|instrument| !instrument.is_empty())
            .ok_or(ValidationError::Missing("instrument"))?
            .to_string();
        let direction = self.direction.ok_or(ValidationError::Missing("direction"))?;
        let entry_price = self
            .entry_price
            .ok_or(ValidationError::Missing("entry price"))?;
        let exit_price = self
            .exit_price
            .ok_or(ValidationError::Missing("exit price"))?;
        let profit_loss = self
            .profit_loss
            .ok_or(ValidationError::Missing("profit/loss"))?;

        Ok(TradeFields {
            date,
            instrument,
            direction,
            entry_price,
            exit_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            profit_loss,
            notes: self.notes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults_for_direction_and_optionals() {
        let fields = TradeBuilder::new()
            .date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .instrument("  AAPL ")
            .entry_price(180.0)
            .exit_price(185.0)
            .profit_loss(50.0)
            .build()
            .unwrap();

        assert_eq!(fields.instrument, "AAPL");
        assert_eq!(fields.direction, Direction::Long);
        assert_eq!(fields.stop_loss, None);
        assert_eq!(fields.take_profit, None);
        assert_eq!(fields.notes, "");
    }

    #[test]
    fn blank_instrument_is_missing() {
        let err = TradeBuilder::new()
            .date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .instrument("   ")
            .entry_price(1.0)
            .exit_price(1.0)
            .profit_loss(0.0)
            .build()
            .unwrap_err();

        assert_eq!(err, ValidationError::Missing("instrument"));
    }

    #[test]
    fn profit_loss_is_required() {
        let err = TradeBuilder::new()
            .date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .instrument("ES")
            .entry_price(5000.0)
            .exit_price(5010.0)
            .build()
            .unwrap_err();

        assert_eq!(err, ValidationError::Missing("profit/loss"));
    }
}
