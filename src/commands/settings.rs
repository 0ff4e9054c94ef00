//! System toggles.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commands::Actor;
use crate::storage::{LeagueDatabase, LeagueStore, SystemSettings};
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub allow_transfers: Option<bool>,
    pub show_dashboard_stats: Option<bool>,
}

pub fn load_settings(db: &LeagueDatabase) -> Result<SystemSettings> {
    db.conn().load_settings()
}

pub fn update_settings(
    db: &mut LeagueDatabase,
    actor: &Actor,
    update: &SettingsUpdate,
) -> Result<SystemSettings> {
    actor.require_admin("change system settings")?;

    let tx = db.transaction()?;
    let mut settings = tx.load_settings()?;
    if let Some(allow) = update.allow_transfers {
        settings.allow_transfers = allow;
    }
    if let Some(show) = update.show_dashboard_stats {
        settings.show_dashboard_stats = show;
    }
    tx.save_settings(&settings)?;
    tx.commit()?;

    info!(
        "Settings updated: allow_transfers={}, show_dashboard_stats={}",
        settings.allow_transfers, settings.show_dashboard_stats
    );
    Ok(settings)
}
