use crate::models::trade::Trade;

/// Aggregates shown on the dashboard. Recomputed on every render, never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub winning: usize,
    /// Breakeven trades count as losing.
    pub losing: usize,
    /// Percentage rounded to one decimal, 0 for an empty journal.
    pub win_rate: f64,
    /// Rounded to two decimals.
    pub total_pnl: f64,
}

impl Statistics {
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut total = 0;
        let mut winning = 0;
        let mut pnl = 0.0;

        for trade in trades {
            total += 1;
            if trade.is_winner() {
                winning += 1;
            }
            pnl += trade.fields.profit_loss;
        }

        let win_rate = if total == 0 {
            0.0
        } else {
            round_to(winning as f64 / total as f64 * 100.0, 1)
        };

        Self {
            total,
            winning,
            losing: total - winning,
            win_rate,
            total_pnl: round_to(pnl, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
