use crate::{
    models::{trade::TradeId, trade_export, trade_store::TradeStore},
    utils::error::{JournalError, JournalResult},
    views::{
        form::FormState,
        router::{Router, Screen, View},
    },
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::{fs::File, path::Path};

/// A delete waiting for the user's confirmation. The store is not touched
/// until it is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: TradeId,
    pub summary: String,
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        format!("Delete this trade? ({}) [y/N]", self.summary)
    }
}

/// The journal session: owns the store and the router and handles one user
/// event at a time. Methods take `&mut self`, so a new event cannot start
/// while a previous save is still in flight.
pub struct Journal {
    store: TradeStore,
    router: Router,
}

impl Journal {
    pub fn new(store: TradeStore) -> Self {
        Self {
            store,
            router: Router::new(),
        }
    }

    pub fn store(&self) -> &TradeStore {
        &self.store
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    pub fn navigate(&mut self, view: View) -> JournalResult<Screen> {
        self.router.navigate(view, &self.store, today())
    }

    pub fn render(&self) -> JournalResult<Screen> {
        self.router.render(&self.store, today())
    }

    /// Validates the form, then creates or updates depending on the form's
    /// mode and returns to the dashboard. On any error the form stays the
    /// current view.
    pub async fn submit(&mut self, form: &FormState) -> JournalResult<Screen> {
        let fields = form.submit().map_err(|e| {
            warn!("Form rejected: {}", e);
            JournalError::from(e)
        })?;

        match form.trade_id {
            Some(id) => self.store.update(id, fields).await?,
            None => self.store.create(fields).await?,
        };

        self.navigate(View::Dashboard)
    }

    /// Unknown ids give `None`, mirroring the store's silent delete.
    pub fn request_delete(&self, id: TradeId) -> Option<PendingDelete> {
        self.store.get(id).map(|trade| PendingDelete {
            id,
            summary: format!("{} {}", trade.fields.direction, trade.fields.instrument),
        })
    }

    pub async fn confirm_delete(
        &mut self,
        pending: PendingDelete,
        confirmed: bool,
    ) -> JournalResult<Screen> {
        if !confirmed {
            info!("Delete of trade {} cancelled.", pending.id);
            return self.render();
        }

        self.store.delete(pending.id).await?;
        self.navigate(View::Dashboard)
    }

    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let file = File::create(path)?;
        let written = trade_export::write_csv(self.store.list(), file)?;

        info!("Exported {} trades to {}.", written, path.display());

        Ok(written)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
