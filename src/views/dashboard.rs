use crate::{
    models::{
        statistics::Statistics,
        trade::{Trade, TradeId},
    },
    utils::constants::NOTES_PREVIEW_LEN,
};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub id: TradeId,
    pub date: String,
    pub instrument: String,
    pub direction: String,
    pub entry_price: String,
    pub exit_price: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub profit_loss: String,
    pub is_profit: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub statistics: Statistics,
    /// Newest trade date first.
    pub rows: Vec<DashboardRow>,
}

pub fn render<'a, I>(trades: I) -> DashboardView
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut trades: Vec<&Trade> = trades.into_iter().collect();
    let statistics = Statistics::from_trades(trades.iter().copied());

    trades.sort_by(|a, b| b.fields.date.cmp(&a.fields.date));

    let rows = trades.into_iter().map(row).collect();

    DashboardView { statistics, rows }
}

fn row(trade: &Trade) -> DashboardRow {
    let fields = &trade.fields;

    DashboardRow {
        id: trade.id,
        date: fields.date.format("%Y-%m-%d").to_string(),
        instrument: fields.instrument.clone(),
        direction: fields.direction.to_string(),
        entry_price: fields.entry_price.to_string(),
        exit_price: fields.exit_price.to_string(),
        stop_loss: optional_price(fields.stop_loss),
        take_profit: optional_price(fields.take_profit),
        profit_loss: format!("${:.2}", fields.profit_loss),
        is_profit: trade.is_winner(),
        notes: truncate_notes(&fields.notes),
    }
}

fn optional_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}

/// Display-only preview of the notes; counts characters, not bytes.
pub fn truncate_notes(notes: &str) -> String {
    if notes.chars().count() > NOTES_PREVIEW_LEN {
        let preview: String = notes.chars().take(NOTES_PREVIEW_LEN).collect();
        format!("{}...", preview)
    } else {
        notes.to_string()
    }
}

impl Display for DashboardView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let stats = &self.statistics;

        writeln!(f, "== Dashboard ==")?;
        writeln!(
            f,
            "Total Trades: {} | Winning: {} | Losing: {} | Win Rate: {}% | Total P&L: ${:.2}",
            stats.total, stats.winning, stats.losing, stats.win_rate, stats.total_pnl
        )?;
        writeln!(f)?;
        writeln!(f, "Recent Trades")?;

        if self.rows.is_empty() {
            return writeln!(f, "No trades yet. Type 'add' to add one.");
        }

        writeln!(
            f,
            "{:<10} {:<10} {:<12} {:<6} {:>10} {:>10} {:>10} {:>10} {:>12}  {}",
            "ID", "Date", "Instrument", "Dir", "Entry", "Exit", "Stop", "Take", "P&L", "Notes"
        )?;

        for row in &self.rows {
            let id = row.id.to_string();
            let marker = if row.is_profit { "+" } else { "-" };

            writeln!(
                f,
                "{:<10} {:<10} {:<12} {:<6} {:>10} {:>10} {:>10} {:>10} {:>11}{}  {}",
                &id[..8],
                row.date,
                row.instrument,
                row.direction,
                row.entry_price,
                row.exit_price,
                row.stop_loss,
                row.take_profit,
                row.profit_loss,
                marker,
                row.notes
            )?;
        }

        Ok(())
    }
}
