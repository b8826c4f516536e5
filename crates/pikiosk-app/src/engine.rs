//! Engine - shared orchestration for the appliance
//!
//! Owns the application state, the message channel and the side-effect
//! handles (kiosk, config store, stream poller). The runner feeds it messages
//! one at a time and redraws when told to.

use std::sync::Arc;

use tokio::sync::mpsc;

use pikiosk_core::prelude::*;
use pikiosk_core::InputEvent;
use pikiosk_daemon::{KioskControl, StreamDirectory};

use crate::actions::ActionContext;
use crate::config::{ConfigStore, Settings};
use crate::message::Message;
use crate::poller::StreamPoller;
use crate::process;
use crate::state::{AppPhase, AppState, NavigationView};

/// Capacity of the engine's message channel.
pub const MESSAGE_CHANNEL_CAPACITY: usize = 256;

const INPUT_CHANNEL_CAPACITY: usize = 64;

pub struct Engine<D> {
    /// Application state (Model)
    pub state: AppState,

    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,

    config: Arc<ConfigStore>,
    kiosk: Box<dyn KioskControl>,
    poller: StreamPoller<D>,
}

impl<D> Engine<D>
where
    D: StreamDirectory + Sync + 'static,
{
    /// Create an engine starting on the main menu.
    pub fn new(
        settings: &Settings,
        config: ConfigStore,
        directory: D,
        kiosk: Box<dyn KioskControl>,
    ) -> Self {
        let state = AppState::new(config.current(), settings.server.webrtc_port);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let poller = StreamPoller::new(
            directory,
            config.subscribe(),
            msg_tx.clone(),
            settings.server.refresh_interval(),
        );

        Self {
            state,
            msg_tx,
            msg_rx,
            config: Arc::new(config),
            kiosk,
            poller,
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Channel for the encoder thread.
    ///
    /// Events are forwarded into the message channel in order by a small
    /// bridge task.
    pub fn input_sender(&self) -> mpsc::Sender<InputEvent> {
        let (input_tx, mut input_rx) = mpsc::channel::<InputEvent>(INPUT_CHANNEL_CAPACITY);
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = input_rx.recv().await {
                if msg_tx.send(Message::Input(event)).await.is_err() {
                    break;
                }
            }
            debug!("Input bridge closed");
        });
        input_tx
    }

    /// Wait for the next message.
    ///
    /// The engine holds a sender itself, so this only returns `None` if the
    /// channel is closed explicitly.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Returns whether the display needs to be redrawn.
    pub fn process_message(&mut self, msg: Message) -> bool {
        let mut ctx = ActionContext {
            kiosk: self.kiosk.as_mut(),
            config: &self.config,
            poller: &mut self.poller,
            msg_tx: &self.msg_tx,
        };
        process::process_message(&mut self.state, msg, &mut ctx)
    }

    /// Check if the event loop should end.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// The error that ended the loop, if it ended on a failure.
    pub fn fatal_error(&self) -> Option<Error> {
        match self.state.phase {
            AppPhase::Failed => Some(Error::HardwareLost {
                reason: self
                    .state
                    .fatal
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            }),
            _ => None,
        }
    }

    /// Snapshot for the renderer.
    pub fn view(&self) -> NavigationView {
        self.state.view()
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Stop polling and the kiosk browser.
    pub fn shutdown(&mut self) {
        info!("Engine shutting down");
        self.poller.stop();
        self.kiosk.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use pikiosk_core::{EncoderEvent, ServerAddress, StreamEntry};
    use pikiosk_daemon::test_utils::StaticDirectory;
    use tempfile::TempDir;
    use url::Url;

    use crate::state::{Mode, Notice};

    mockall::mock! {
        pub Kiosk {}

        impl KioskControl for Kiosk {
            fn launch(&mut self, url: &Url) -> Result<()>;
            fn terminate(&mut self);
            fn is_running(&self) -> bool;
        }
    }

    fn engine(
        kiosk: MockKiosk,
        directory: StaticDirectory,
    ) -> (Engine<StaticDirectory>, TempDir) {
        let temp = TempDir::new().unwrap();
        let config = ConfigStore::open(temp.path().join("config.json"));
        let engine = Engine::new(&Settings::default(), config, directory, Box::new(kiosk));
        (engine, temp)
    }

    fn press(engine: &mut Engine<StaticDirectory>, event: EncoderEvent) -> bool {
        engine.process_message(Message::from(event))
    }

    #[tokio::test]
    async fn test_select_stream_starts_polling() {
        let (mut engine, _temp) = engine(MockKiosk::new(), StaticDirectory::with_names(&["cam1"]));

        assert!(press(&mut engine, EncoderEvent::PressShort));

        assert_eq!(engine.state.mode(), Mode::StreamList);
        assert!(engine.is_polling());

        let msg = engine.next_message().await.unwrap();
        assert_eq!(msg, Message::StreamsUpdated(vec![StreamEntry::named("cam1")]));
        assert!(engine.process_message(msg));
        assert_eq!(engine.state.streams.len(), 1);
    }

    #[tokio::test]
    async fn test_play_then_back_terminates_exactly_once() {
        let mut kiosk = MockKiosk::new();
        kiosk
            .expect_launch()
            .with(eq(Url::parse("http://10.0.0.74:8889/cam1").unwrap()))
            .times(1)
            .returning(|_| Ok(()));
        kiosk.expect_terminate().times(1).return_const(());

        let (mut engine, _temp) = engine(kiosk, StaticDirectory::with_names(&["cam1"]));
        press(&mut engine, EncoderEvent::PressShort);
        engine.process_message(Message::StreamsUpdated(vec![StreamEntry::named("cam1")]));

        press(&mut engine, EncoderEvent::PressShort);
        assert_eq!(engine.state.mode(), Mode::Playing);
        assert!(!engine.is_polling());

        press(&mut engine, EncoderEvent::PressLong);
        assert_eq!(engine.state.mode(), Mode::StreamList);
        assert!(engine.is_polling());
    }

    #[tokio::test]
    async fn test_launch_failure_returns_to_stream_list() {
        let mut kiosk = MockKiosk::new();
        kiosk
            .expect_launch()
            .times(1)
            .returning(|_| Err(Error::kiosk_spawn("chromium: not found")));

        let (mut engine, _temp) = engine(kiosk, StaticDirectory::with_names(&["cam1"]));
        press(&mut engine, EncoderEvent::PressShort);
        engine.process_message(Message::StreamsUpdated(vec![StreamEntry::named("cam1")]));

        let redraw = press(&mut engine, EncoderEvent::PressShort);

        assert!(redraw);
        assert_eq!(engine.state.mode(), Mode::StreamList);
        assert_eq!(engine.state.notice, Some(Notice::LaunchFailed));
        assert!(engine.is_polling());
    }

    #[tokio::test]
    async fn test_committed_edit_is_persisted() {
        let (mut engine, temp) = engine(MockKiosk::new(), StaticDirectory::default());

        press(&mut engine, EncoderEvent::RotateCw);
        press(&mut engine, EncoderEvent::PressShort); // Settings
        press(&mut engine, EncoderEvent::PressShort); // Set Server IP
        for _ in 0..8 {
            press(&mut engine, EncoderEvent::PressShort);
        }
        press(&mut engine, EncoderEvent::RotateCw); // 010.000.001.074
        for _ in 0..4 {
            press(&mut engine, EncoderEvent::PressShort);
        }
        press(&mut engine, EncoderEvent::PressShort); // Save

        let expected = ServerAddress::new(10, 0, 1, 74);
        assert_eq!(engine.state.mode(), Mode::Settings);
        assert_eq!(engine.state.server, expected);

        let msg = engine.next_message().await.unwrap();
        assert_eq!(msg, Message::ConfigSaved { address: expected });
        assert!(!engine.process_message(msg));
        assert_eq!(engine.config().current(), expected);
        let content = std::fs::read_to_string(temp.path().join("config.json")).unwrap();
        assert!(content.contains("010.000.001.074"));
    }

    #[tokio::test]
    async fn test_failed_save_reports_back_and_reverts() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = ConfigStore::open(blocker.join("config.json"));
        let mut engine = Engine::new(
            &Settings::default(),
            config,
            StaticDirectory::default(),
            Box::new(MockKiosk::new()),
        );

        press(&mut engine, EncoderEvent::RotateCw);
        press(&mut engine, EncoderEvent::PressShort); // Settings
        press(&mut engine, EncoderEvent::PressShort); // Set Server IP
        press(&mut engine, EncoderEvent::RotateCw); // 110.000.000.074
        for _ in 0..13 {
            press(&mut engine, EncoderEvent::PressShort);
        }
        assert_eq!(engine.state.mode(), Mode::Settings);
        assert_eq!(engine.state.server, ServerAddress::new(110, 0, 0, 74));

        let msg = engine.next_message().await.unwrap();
        assert!(matches!(msg, Message::ConfigSaveFailed { .. }));
        assert!(engine.process_message(msg));

        assert_eq!(engine.state.server, ServerAddress::DEFAULT);
        assert_eq!(engine.state.notice, Some(Notice::SaveFailed));
        assert_eq!(engine.config().current(), ServerAddress::DEFAULT);
    }

    #[tokio::test]
    async fn test_hardware_lost_reports_fatal_error() {
        let (mut engine, _temp) = engine(MockKiosk::new(), StaticDirectory::default());
        let input = engine.input_sender();

        input
            .send(InputEvent::HardwareLost {
                reason: "SW line read failed".to_string(),
            })
            .await
            .unwrap();
        let msg = engine.next_message().await.unwrap();
        engine.process_message(msg);

        assert!(engine.should_quit());
        assert!(matches!(engine.fatal_error(), Some(Error::HardwareLost { .. })));
    }

    #[tokio::test]
    async fn test_input_bridge_preserves_order() {
        let (mut engine, _temp) = engine(MockKiosk::new(), StaticDirectory::default());
        let input = engine.input_sender();

        input.send(EncoderEvent::RotateCw.into()).await.unwrap();
        input.send(EncoderEvent::PressShort.into()).await.unwrap();

        assert_eq!(
            engine.next_message().await,
            Some(Message::from(EncoderEvent::RotateCw))
        );
        assert_eq!(
            engine.next_message().await,
            Some(Message::from(EncoderEvent::PressShort))
        );
    }

    #[tokio::test]
    async fn test_shutdown_terminates_kiosk_and_stops_polling() {
        let mut kiosk = MockKiosk::new();
        kiosk.expect_terminate().times(1).return_const(());
        let (mut engine, _temp) = engine(kiosk, StaticDirectory::default());
        press(&mut engine, EncoderEvent::PressShort);
        assert!(engine.is_polling());

        engine.shutdown();

        assert!(!engine.is_polling());
    }
}
