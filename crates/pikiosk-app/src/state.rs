//! Application state (Model in TEA pattern)

use pikiosk_core::{ServerAddress, StreamEntry};

use crate::ip_edit::{EditStage, IpEditBuffer, DIGIT_COUNT};
use crate::menu::{MenuItem, MenuNodeId, MenuTree};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Top-level menu ("Select Stream", "Settings")
    #[default]
    MainMenu,

    /// Live list of streams from the directory
    StreamList,

    /// Settings menu ("Set Server IP", "Back")
    Settings,

    /// Digit editor for the server address
    IpEdit,

    /// Kiosk browser is showing a stream
    Playing,
}

/// Lifecycle of the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    /// Signal received, shutting down cleanly
    Quitting,
    /// Unrecoverable hardware failure
    Failed,
}

/// Transient message shown until the next input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SaveFailed,
    LaunchFailed,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::SaveFailed => "SAVE FAILED",
            Notice::LaunchFailed => "LAUNCH FAILED",
        }
    }
}

/// Where the operator is.
///
/// `ip_edit` is only present in [`Mode::IpEdit`], `playing` only in
/// [`Mode::Playing`]. `selected` indexes the menu children in the menu modes
/// and the stream list in [`Mode::StreamList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub mode: Mode,
    pub menu: MenuNodeId,
    pub selected: usize,
    pub ip_edit: Option<IpEditBuffer>,
    pub playing: Option<StreamEntry>,
}

/// Latest stream directory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamList {
    pub entries: Vec<StreamEntry>,
    /// Set after a failed poll, cleared by the next successful one
    pub fetch_failed: bool,
}

impl StreamList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StreamEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

/// Complete application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub menu: MenuTree,
    pub nav: NavigationState,
    pub streams: StreamList,

    /// Server address currently in effect (mirrors the config store)
    pub server: ServerAddress,

    /// Port of the WebRTC player on the server
    pub webrtc_port: u16,

    pub notice: Option<Notice>,
    pub phase: AppPhase,

    /// Reason for [`AppPhase::Failed`]
    pub fatal: Option<String>,
}

impl AppState {
    pub fn new(server: ServerAddress, webrtc_port: u16) -> Self {
        let menu = MenuTree::standard();
        let root = menu.root();
        Self {
            menu,
            nav: NavigationState {
                mode: Mode::MainMenu,
                menu: root,
                selected: 0,
                ip_edit: None,
                playing: None,
            },
            streams: StreamList::default(),
            server,
            webrtc_port,
            notice: None,
            phase: AppPhase::Running,
            fatal: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.nav.mode
    }

    pub fn should_quit(&self) -> bool {
        self.phase != AppPhase::Running
    }

    /// Length of the list `selected` currently indexes.
    pub fn list_len(&self) -> usize {
        match self.nav.mode {
            Mode::MainMenu | Mode::Settings => self.menu.children(self.nav.menu).len(),
            Mode::StreamList => self.streams.len(),
            Mode::IpEdit | Mode::Playing => 0,
        }
    }

    /// Activation kind of the highlighted menu entry.
    pub fn selected_item(&self) -> Option<MenuItem> {
        match self.nav.mode {
            Mode::MainMenu | Mode::Settings => self
                .menu
                .child(self.nav.menu, self.nav.selected)
                .map(|n| n.item),
            _ => None,
        }
    }

    pub fn selected_stream(&self) -> Option<&StreamEntry> {
        match self.nav.mode {
            Mode::StreamList => self.streams.get(self.nav.selected),
            _ => None,
        }
    }

    /// Show the menu `node` with `focus` highlighted (first entry if absent).
    pub fn enter_menu(&mut self, mode: Mode, node: MenuNodeId, focus: Option<MenuItem>) {
        self.nav.mode = mode;
        self.nav.menu = node;
        self.nav.selected = focus
            .and_then(|item| self.menu.position(node, item))
            .unwrap_or(0);
        self.nav.ip_edit = None;
        self.nav.playing = None;
    }

    /// Show the stream list, highlighting `follow` if it is listed.
    pub fn enter_stream_list(&mut self, follow: Option<&str>) {
        self.nav.mode = Mode::StreamList;
        self.nav.selected = follow
            .and_then(|name| self.streams.position(name))
            .unwrap_or(0);
        self.nav.ip_edit = None;
        self.nav.playing = None;
    }

    /// Snapshot of everything the display shows.
    pub fn view(&self) -> NavigationView {
        let screen = match self.nav.mode {
            Mode::MainMenu | Mode::Settings => Screen::Menu {
                title: self.menu.node(self.nav.menu).label,
                items: self.menu.labels(self.nav.menu),
                selected: self.nav.selected,
                server: self.server,
            },
            Mode::StreamList => Screen::Streams {
                names: self.streams.entries.iter().map(|e| e.name.clone()).collect(),
                selected: self.nav.selected,
                fetch_failed: self.streams.fetch_failed,
            },
            Mode::IpEdit => {
                let buffer = self
                    .nav
                    .ip_edit
                    .clone()
                    .unwrap_or_else(|| IpEditBuffer::new(self.server));
                let mut digits = [0u8; DIGIT_COUNT];
                for (i, d) in digits.iter_mut().enumerate() {
                    *d = buffer.digit(i);
                }
                Screen::IpEdit {
                    digits,
                    cursor: buffer.cursor(),
                    stage: buffer.stage(),
                }
            }
            Mode::Playing => Screen::Playing {
                name: self
                    .nav
                    .playing
                    .as_ref()
                    .map(|e| e.name.clone())
                    .unwrap_or_default(),
                server: self.server,
            },
        };

        NavigationView {
            screen,
            notice: self.notice,
        }
    }
}

/// Screen contents, independent of how they are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu {
        title: &'static str,
        items: Vec<&'static str>,
        selected: usize,
        server: ServerAddress,
    },
    Streams {
        names: Vec<String>,
        selected: usize,
        fetch_failed: bool,
    },
    IpEdit {
        digits: [u8; DIGIT_COUNT],
        cursor: usize,
        stage: EditStage,
    },
    Playing {
        name: String,
        server: ServerAddress,
    },
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    pub screen: Screen,
    pub notice: Option<Notice>,
}
