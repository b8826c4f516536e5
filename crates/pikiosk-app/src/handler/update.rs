//! Main update function - handles state transitions (TEA pattern)

use pikiosk_core::InputEvent;
use tracing::{debug, error, info, warn};

use crate::message::Message;
use crate::state::{AppPhase, AppState, Mode, Notice};

use super::{input, streams, UpdateAction, UpdateResult};

/// Process a message and update state
///
/// Returns whether to redraw plus the actions for the engine to perform.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Input(InputEvent::Encoder(event)) => input::handle_encoder(state, event),

        Message::Input(InputEvent::HardwareLost { reason }) => {
            error!("Encoder lost: {}", reason);
            state.phase = AppPhase::Failed;
            state.fatal = Some(reason);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Stream Directory
        // ─────────────────────────────────────────────────────────
        Message::StreamsUpdated(entries) => streams::handle_streams_updated(state, entries),
        Message::StreamsFetchFailed { error } => streams::handle_fetch_failed(state, &error),

        // ─────────────────────────────────────────────────────────
        // Side-effect Outcomes
        // ─────────────────────────────────────────────────────────
        Message::ConfigSaved { address } => {
            debug!("Server address {} persisted", address.padded());
            UpdateResult::none()
        }

        Message::ConfigSaveFailed { error, persisted } => {
            warn!("Saving server address failed: {}", error);
            state.server = persisted;
            state.notice = Some(Notice::SaveFailed);
            UpdateResult::redraw()
        }

        Message::KioskLaunchFailed { error } => {
            warn!("Kiosk launch failed: {}", error);
            state.notice = Some(Notice::LaunchFailed);
            if state.nav.mode != Mode::Playing {
                return UpdateResult::redraw();
            }
            let played = state.nav.playing.take().map(|e| e.name);
            state.enter_stream_list(played.as_deref());
            UpdateResult::redraw().with_action(UpdateAction::StartStreamPolling)
        }

        Message::Quit => {
            if state.phase == AppPhase::Running {
                info!("Quit requested");
                state.phase = AppPhase::Quitting;
            }
            UpdateResult::none()
        }
    }
}
