//! Stream directory result handlers

use pikiosk_core::StreamEntry;
use tracing::{debug, warn};

use crate::state::{AppState, Mode};

use super::UpdateResult;

/// Replace the snapshot, keeping the highlighted stream selected by name.
pub fn handle_streams_updated(state: &mut AppState, entries: Vec<StreamEntry>) -> UpdateResult {
    debug!("Stream list refreshed: {} entries", entries.len());

    let visible = state.nav.mode == Mode::StreamList;
    let followed = state.selected_stream().map(|e| e.name.clone());
    let changed = state.streams.entries != entries || state.streams.fetch_failed;

    state.streams.entries = entries;
    state.streams.fetch_failed = false;

    if !visible {
        return UpdateResult::none();
    }

    let previous = state.nav.selected;
    state.nav.selected = followed
        .and_then(|name| state.streams.position(&name))
        .unwrap_or(0);

    UpdateResult::redraw_if(changed || previous != state.nav.selected)
}

/// Keep the snapshot and flag the failure.
pub fn handle_fetch_failed(state: &mut AppState, error: &str) -> UpdateResult {
    warn!("Stream list refresh failed: {}", error);

    let changed = !state.streams.fetch_failed;
    state.streams.fetch_failed = true;

    UpdateResult::redraw_if(changed && state.nav.mode == Mode::StreamList)
}
