//! Encoder event handlers for each navigation mode

use pikiosk_core::EncoderEvent;
use pikiosk_daemon::playback_url;
use tracing::{debug, warn};

use crate::ip_edit::{ConfirmChoice, EditStage, IpEditBuffer};
use crate::menu::MenuItem;
use crate::state::{AppState, Mode};

use super::{UpdateAction, UpdateResult};

/// Route an encoder event to the handler for the current mode.
///
/// Any input dismisses a pending notice.
pub fn handle_encoder(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    let dismissed = state.notice.take().is_some();

    let mut result = match state.nav.mode {
        Mode::MainMenu => handle_main_menu(state, event),
        Mode::StreamList => handle_stream_list(state, event),
        Mode::Settings => handle_settings(state, event),
        Mode::IpEdit => handle_ip_edit(state, event),
        Mode::Playing => handle_playing(state, event),
    };

    result.redraw |= dismissed;
    result
}

/// Move `selected` one step, clamped to the active list.
fn move_selection(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    let len = state.list_len();
    if len == 0 {
        return UpdateResult::none();
    }

    let current = state.nav.selected.min(len - 1);
    let next = match event {
        EncoderEvent::RotateCw => (current + 1).min(len - 1),
        EncoderEvent::RotateCcw => current.saturating_sub(1),
        _ => current,
    };

    let changed = next != state.nav.selected;
    state.nav.selected = next;
    UpdateResult::redraw_if(changed)
}

fn handle_main_menu(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    match event {
        EncoderEvent::RotateCw | EncoderEvent::RotateCcw => move_selection(state, event),
        EncoderEvent::PressShort => match state.selected_item() {
            Some(MenuItem::SelectStream) => {
                state.enter_stream_list(None);
                UpdateResult::redraw().with_action(UpdateAction::StartStreamPolling)
            }
            Some(MenuItem::Settings) => {
                let Some(node) = state.menu.find(MenuItem::Settings) else {
                    return UpdateResult::none();
                };
                state.enter_menu(Mode::Settings, node, None);
                UpdateResult::redraw()
            }
            _ => UpdateResult::none(),
        },
        EncoderEvent::PressLong => UpdateResult::none(),
    }
}

fn handle_settings(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    match event {
        EncoderEvent::RotateCw | EncoderEvent::RotateCcw => move_selection(state, event),
        EncoderEvent::PressShort => match state.selected_item() {
            Some(MenuItem::SetServerIp) => {
                state.nav.mode = Mode::IpEdit;
                state.nav.ip_edit = Some(IpEditBuffer::new(state.server));
                UpdateResult::redraw()
            }
            Some(MenuItem::Back) => back_to_main_menu(state, MenuItem::Settings),
            _ => UpdateResult::none(),
        },
        EncoderEvent::PressLong => back_to_main_menu(state, MenuItem::Settings),
    }
}

fn handle_ip_edit(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    let Some(buffer) = state.nav.ip_edit.as_mut() else {
        warn!("IP edit mode without an edit buffer");
        return leave_ip_edit(state);
    };

    match (buffer.stage(), event) {
        (_, EncoderEvent::PressLong) => {
            debug!("IP edit discarded");
            leave_ip_edit(state)
        }

        (EditStage::Digits, EncoderEvent::RotateCw) => UpdateResult::redraw_if(buffer.step_digit(1)),
        (EditStage::Digits, EncoderEvent::RotateCcw) => {
            UpdateResult::redraw_if(buffer.step_digit(-1))
        }
        (EditStage::Digits, EncoderEvent::PressShort) => {
            buffer.advance();
            UpdateResult::redraw()
        }

        (EditStage::Confirm(_), EncoderEvent::RotateCw | EncoderEvent::RotateCcw) => {
            UpdateResult::redraw_if(buffer.toggle_choice())
        }
        (EditStage::Confirm(ConfirmChoice::Edit), EncoderEvent::PressShort) => {
            buffer.resume_editing();
            UpdateResult::redraw()
        }
        (EditStage::Confirm(ConfirmChoice::Save), EncoderEvent::PressShort) => {
            let address = buffer.address();
            debug!("IP edit committed: {}", address.padded());
            state.server = address;
            leave_ip_edit(state).with_action(UpdateAction::SaveConfig { address })
        }
    }
}

fn leave_ip_edit(state: &mut AppState) -> UpdateResult {
    let node = state
        .menu
        .find(MenuItem::Settings)
        .unwrap_or_else(|| state.menu.root());
    state.enter_menu(Mode::Settings, node, None);
    UpdateResult::redraw()
}

fn handle_stream_list(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    match event {
        EncoderEvent::RotateCw | EncoderEvent::RotateCcw => move_selection(state, event),
        EncoderEvent::PressShort => {
            let Some(entry) = state.selected_stream().cloned() else {
                return UpdateResult::none();
            };
            let url = match playback_url(state.server, state.webrtc_port, &entry.path) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Cannot play {}: {}", entry.name, e);
                    return UpdateResult::none();
                }
            };

            state.nav.mode = Mode::Playing;
            state.nav.playing = Some(entry);
            UpdateResult::redraw()
                .with_action(UpdateAction::LaunchKiosk { url })
                .with_action(UpdateAction::StopStreamPolling)
        }
        EncoderEvent::PressLong => back_to_main_menu(state, MenuItem::SelectStream)
            .with_action(UpdateAction::StopStreamPolling),
    }
}

fn handle_playing(state: &mut AppState, event: EncoderEvent) -> UpdateResult {
    match event {
        EncoderEvent::PressLong => {
            let played = state.nav.playing.take().map(|e| e.name);
            state.enter_stream_list(played.as_deref());
            UpdateResult::redraw()
                .with_action(UpdateAction::TerminateKiosk)
                .with_action(UpdateAction::StartStreamPolling)
        }
        _ => UpdateResult::none(),
    }
}

fn back_to_main_menu(state: &mut AppState, focus: MenuItem) -> UpdateResult {
    let root = state.menu.root();
    state.enter_menu(Mode::MainMenu, root, Some(focus));
    UpdateResult::redraw()
}
