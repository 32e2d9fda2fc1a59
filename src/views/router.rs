use crate::{
    models::{trade::TradeId, trade_store::TradeStore},
    utils::error::{JournalError, JournalResult},
    views::{
        dashboard::{self, DashboardView},
        form::FormState,
        log_view::{self, LogView},
    },
};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    /// Add mode without an id, edit mode with one.
    Form(Option<TradeId>),
    Log,
}

impl View {
    /// Maps a navigation target (`dashboard`, `add`, `edit`, `logs`) to a
    /// view. `edit` needs the id parameter.
    pub fn from_target(target: &str, param: Option<TradeId>) -> Option<View> {
        match (target.trim().to_lowercase().as_str(), param) {
            ("dashboard", _) => Some(View::Dashboard),
            ("add", _) => Some(View::Form(None)),
            ("edit", Some(id)) => Some(View::Form(Some(id))),
            ("logs" | "log", _) => Some(View::Log),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Form(None) => "add",
            View::Form(Some(_)) => "edit",
            View::Log => "logs",
        }
    }
}

/// A fully rendered view.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Dashboard(DashboardView),
    Form(FormState),
    Log(LogView),
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Dashboard(view) => write!(f, "{}", view),
            Screen::Form(form) => write!(f, "{}", form),
            Screen::Log(view) => write!(f, "{}", view),
        }
    }
}

/// Owns the current view. Every navigation renders from scratch.
#[derive(Debug, Clone)]
pub struct Router {
    current: View,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: View::Dashboard,
        }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Editing an unknown trade fails with `NotFound` and keeps the current
    /// view.
    pub fn navigate(
        &mut self,
        view: View,
        store: &TradeStore,
        today: NaiveDate,
    ) -> JournalResult<Screen> {
        let screen = render(view, store, today)?;
        self.current = view;
        Ok(screen)
    }

    pub fn render(&self, store: &TradeStore, today: NaiveDate) -> JournalResult<Screen> {
        render(self.current, store, today)
    }
}

fn render(view: View, store: &TradeStore, today: NaiveDate) -> JournalResult<Screen> {
    let screen = match view {
        View::Dashboard => Screen::Dashboard(dashboard::render(store.list())),
        View::Form(None) => Screen::Form(FormState::blank(today)),
        View::Form(Some(id)) => {
            let trade = store.get(id).ok_or(JournalError::NotFound(id))?;
            Screen::Form(FormState::from_trade(trade))
        }
        View::Log => Screen::Log(log_view::render(store.logs(), |id| store.contains(id))),
    };

    Ok(screen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_targets() {
        let id = TradeId::new();

        assert_eq!(View::from_target("dashboard", None), Some(View::Dashboard));
        assert_eq!(View::from_target("ADD", None), Some(View::Form(None)));
        assert_eq!(View::from_target("edit", Some(id)), Some(View::Form(Some(id))));
        assert_eq!(View::from_target("edit", None), None);
        assert_eq!(View::from_target("logs", None), Some(View::Log));
        assert_eq!(View::from_target("settings", None), None);
    }

    #[test]
    fn starts_on_dashboard() {
        assert_eq!(Router::new().current(), View::Dashboard);
        assert_eq!(View::Form(Some(TradeId::new())).name(), "edit");
    }
}
