use crate::{
    models::{
        trade::{Direction, Trade, TradeFields, TradeId},
        trade_builder::TradeBuilder,
    },
    utils::error::ValidationError,
};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Instrument,
    Direction,
    EntryPrice,
    ExitPrice,
    StopLoss,
    TakeProfit,
    ProfitLoss,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Date,
        FormField::Instrument,
        FormField::Direction,
        FormField::EntryPrice,
        FormField::ExitPrice,
        FormField::StopLoss,
        FormField::TakeProfit,
        FormField::ProfitLoss,
        FormField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Date => "Date (YYYY-MM-DD)",
            FormField::Instrument => "Instrument",
            FormField::Direction => "Direction (LONG/SHORT)",
            FormField::EntryPrice => "Entry Price",
            FormField::ExitPrice => "Exit Price",
            FormField::StopLoss => "Stop Loss",
            FormField::TakeProfit => "Take Profit",
            FormField::ProfitLoss => "Profit / Loss",
            FormField::Notes => "Notes",
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            FormField::StopLoss | FormField::TakeProfit | FormField::Notes
        )
    }
}

/// Raw text of the add/edit form. Edit mode is decided only by `trade_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub trade_id: Option<TradeId>,
    pub date: String,
    pub instrument: String,
    pub direction: String,
    pub entry_price: String,
    pub exit_price: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub profit_loss: String,
    pub notes: String,
}

impl FormState {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            trade_id: None,
            date: today.format("%Y-%m-%d").to_string(),
            instrument: String::new(),
            direction: Direction::Long.to_string(),
            entry_price: String::new(),
            exit_price: String::new(),
            stop_loss: String::new(),
            take_profit: String::new(),
            profit_loss: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_trade(trade: &Trade) -> Self {
        let fields = &trade.fields;

        Self {
            trade_id: Some(trade.id),
            date: fields.date.format("%Y-%m-%d").to_string(),
            instrument: fields.instrument.clone(),
            direction: fields.direction.to_string(),
            entry_price: fields.entry_price.to_string(),
            exit_price: fields.exit_price.to_string(),
            stop_loss: fields.stop_loss.map(|p| p.to_string()).unwrap_or_default(),
            take_profit: fields.take_profit.map(|p| p.to_string()).unwrap_or_default(),
            profit_loss: fields.profit_loss.to_string(),
            notes: fields.notes.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.trade_id.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit Trade"
        } else {
            "Add New Trade"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update Trade"
        } else {
            "Save Trade"
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Instrument => &self.instrument,
            FormField::Direction => &self.direction,
            FormField::EntryPrice => &self.entry_price,
            FormField::ExitPrice => &self.exit_price,
            FormField::StopLoss => &self.stop_loss,
            FormField::TakeProfit => &self.take_profit,
            FormField::ProfitLoss => &self.profit_loss,
            FormField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::Date => &mut self.date,
            FormField::Instrument => &mut self.instrument,
            FormField::Direction => &mut self.direction,
            FormField::EntryPrice => &mut self.entry_price,
            FormField::ExitPrice => &mut self.exit_price,
            FormField::StopLoss => &mut self.stop_loss,
            FormField::TakeProfit => &mut self.take_profit,
            FormField::ProfitLoss => &mut self.profit_loss,
            FormField::Notes => &mut self.notes,
        };
        *slot = value.to_string();
    }

    /// Coerces the text fields into trade fields. Empty optional prices
    /// become absent, never zero.
    pub fn submit(&self) -> Result<TradeFields, ValidationError> {
        let date = parse_date(&self.date)?;
        let direction = self.direction.parse::<Direction>()?;
        let entry_price = parse_required("entry price", &self.entry_price)?;
        let exit_price = parse_required("exit price", &self.exit_price)?;
        let stop_loss = parse_optional("stop loss", &self.stop_loss)?;
        let take_profit = parse_optional("take profit", &self.take_profit)?;
        let profit_loss = parse_required("profit/loss", &self.profit_loss)?;

        TradeBuilder::new()
            .date(date)
            .instrument(&self.instrument)
            .direction(direction)
            .entry_price(entry_price)
            .exit_price(exit_price)
            .stop_loss(stop_loss)
            .take_profit(take_profit)
            .profit_loss(profit_loss)
            .notes(&self.notes)
            .build()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing("date"));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::Invalid {
        field: "date",
        expected: "a date like 2024-01-31",
        value: value.to_string(),
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(ValidationError::Invalid {
            field,
            expected: "a number",
            value: value.to_string(),
        })
}

fn parse_required(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    parse_number(field, value)
}

fn parse_optional(field: &'static str, value: &str) -> Result<Option<f64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_number(field, value).map(Some)
}

impl Display for FormState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title())?;
        if let Some(id) = self.trade_id {
            writeln!(f, "Trade ID: {}", id)?;
        }
        for field in FormField::ALL {
            writeln!(f, "{:<24} {}", field.label(), self.value(field))?;
        }
        writeln!(f, "[{}] [Cancel]", self.submit_label())
    }
}
