//! Message processing: update() followed by its actions

use std::collections::VecDeque;

use pikiosk_daemon::StreamDirectory;

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Follow-up messages (from update() or from failed actions) are processed
/// in the same call. Returns whether any step asked for a redraw.
pub(crate) fn process_message<D>(
    state: &mut AppState,
    message: Message,
    ctx: &mut ActionContext<'_, D>,
) -> bool
where
    D: StreamDirectory + Sync + 'static,
{
    let mut redraw = false;
    let mut pending = VecDeque::from([message]);

    while let Some(msg) = pending.pop_front() {
        let result = handler::update(state, msg);
        redraw |= result.redraw;

        if let Some(follow_up) = result.message {
            pending.push_back(follow_up);
        }

        for action in result.actions {
            if let Some(follow_up) = handle_action(action, ctx) {
                pending.push_back(follow_up);
            }
        }
    }

    redraw
}
