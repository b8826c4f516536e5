//! Action handlers: side effects requested by update()

use std::sync::Arc;

use pikiosk_daemon::{KioskControl, StreamDirectory};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::config::ConfigStore;
use crate::handler::UpdateAction;
use crate::message::Message;
use crate::poller::StreamPoller;

/// What actions act upon.
pub(crate) struct ActionContext<'a, D> {
    pub kiosk: &'a mut dyn KioskControl,
    pub config: &'a Arc<ConfigStore>,
    pub poller: &'a mut StreamPoller<D>,
    pub msg_tx: &'a mpsc::Sender<Message>,
}

/// Perform one action.
///
/// Failures come back as a follow-up message for update() to process. A
/// config save runs on the blocking pool and reports back through the
/// message channel.
pub(crate) fn handle_action<D>(action: UpdateAction, ctx: &mut ActionContext<'_, D>) -> Option<Message>
where
    D: StreamDirectory + Sync + 'static,
{
    match action {
        UpdateAction::LaunchKiosk { url } => match ctx.kiosk.launch(&url) {
            Ok(()) => None,
            Err(e) => {
                error!("Could not launch kiosk for {}: {}", url, e);
                Some(Message::KioskLaunchFailed {
                    error: e.to_string(),
                })
            }
        },

        UpdateAction::TerminateKiosk => {
            ctx.kiosk.terminate();
            None
        }

        UpdateAction::SaveConfig { address } => {
            let config = Arc::clone(ctx.config);
            let msg_tx = ctx.msg_tx.clone();
            tokio::spawn(async move {
                let message = match Arc::clone(&config).persist(address).await {
                    Ok(()) => Message::ConfigSaved { address },
                    Err(e) => {
                        warn!("Could not save {}: {}", address.padded(), e);
                        Message::ConfigSaveFailed {
                            error: e.to_string(),
                            persisted: config.current(),
                        }
                    }
                };
                let _ = msg_tx.send(message).await;
            });
            None
        }

        UpdateAction::StartStreamPolling => {
            ctx.poller.start();
            None
        }

        UpdateAction::StopStreamPolling => {
            ctx.poller.stop();
            None
        }
    }
}
