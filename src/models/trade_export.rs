use crate::models::trade::Trade;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CsvTrade<'a> {
    id: String,
    date: String,
    instrument: &'a str,
    direction: String,
    entry_price: f64,
    exit_price: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    profit_loss: f64,
    notes: &'a str,
}

/// Writes trades as CSV, newest first. Absent stop/take are empty cells.
pub fn write_csv<'a, I, W>(trades: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a Trade>,
    W: Write,
{
    let mut trades: Vec<&Trade> = trades.into_iter().collect();
    trades.sort_by(|a, b| b.fields.date.cmp(&a.fields.date));

    let mut csv_writer = csv::Writer::from_writer(writer);

    for trade in &trades {
        let fields = &trade.fields;
        csv_writer.serialize(CsvTrade {
            id: trade.id.to_string(),
            date: fields.date.format("%Y-%m-%d").to_string(),
            instrument: &fields.instrument,
            direction: fields.direction.to_string(),
            entry_price: fields.entry_price,
            exit_price: fields.exit_price,
            stop_loss: fields.stop_loss,
            take_profit: fields.take_profit,
            profit_loss: fields.profit_loss,
            notes: &fields.notes,
        })?;
    }

    csv_writer.flush()?;

    Ok(trades.len())
}
