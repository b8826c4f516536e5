//! Background stream list polling

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use pikiosk_core::ServerAddress;
use pikiosk_daemon::StreamDirectory;
use tracing::{debug, warn};

use crate::message::Message;

/// Periodically fetches the stream list while the operator is browsing it.
///
/// The server address is read from the config store on every poll, so a
/// committed edit takes effect on the next refresh.
pub struct StreamPoller<D> {
    directory: Arc<D>,
    server: watch::Receiver<ServerAddress>,
    msg_tx: mpsc::Sender<Message>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl<D> StreamPoller<D>
where
    D: StreamDirectory + Sync + 'static,
{
    pub fn new(
        directory: D,
        server: watch::Receiver<ServerAddress>,
        msg_tx: mpsc::Sender<Message>,
        interval: Duration,
    ) -> Self {
        Self {
            directory: Arc::new(directory),
            server,
            msg_tx,
            interval,
            task: None,
        }
    }

    /// Fetch now and then every interval. Restarts a running poller.
    pub fn start(&mut self) {
        self.stop();

        let directory = self.directory.clone();
        let server = self.server.clone();
        let msg_tx = self.msg_tx.clone();
        let interval = self.interval;

        debug!("Stream polling started (every {:?})", interval);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let address = *server.borrow();
                let message = match directory.list_streams(address).await {
                    Ok(streams) => Message::StreamsUpdated(streams),
                    Err(e) => {
                        warn!("Stream list fetch from {} failed: {}", address, e);
                        Message::StreamsFetchFailed {
                            error: e.to_string(),
                        }
                    }
                };

                if msg_tx.send(message).await.is_err() {
                    debug!("Message channel closed, stream polling ends");
                    break;
                }
            }
        }));
    }

    /// Stop polling immediately. Does nothing when not running.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Stream polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl<D> Drop for StreamPoller<D> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
