//! Screen composition and presentation (View in TEA pattern)


use pikiosk_app::ip_edit::DIGIT_COUNT;
use pikiosk_app::{ConfirmChoice, EditStage, NavigationView, Notice, Screen};
use pikiosk_core::prelude::*;
use pikiosk_core::ServerAddress;

use crate::frame::{DisplayCapability, Frame, COLUMNS, ROWS};

const TITLE_ROW: usize = 0;
const FIRST_LIST_ROW: usize = 1;

/// Rows available for menu entries and stream names.
pub const LIST_ROWS: usize = 3;

const FOOTER_ROW: usize = ROWS - 1;
const HINT_ROW: usize = ROWS - 2;

const MARKER: &str = "> ";
const NO_MARKER: &str = "  ";

/// Shown in the title row while the last stream fetch failed.
pub const FETCH_FAILED_GLYPH: &str = "!";

pub const NO_STREAMS: &str = "<no streams>";

/// Map a navigation snapshot to the text it puts on the panel.
///
/// Pure: the same view always composes to the same frame.
pub fn compose(view: &NavigationView) -> Frame {
    let mut frame = Frame::new();

    match &view.screen {
        Screen::Menu {
            title,
            items,
            selected,
            server,
        } => {
            frame.text(0, TITLE_ROW, title);
            list_rows(&mut frame, items, *selected);
            frame.text(0, FOOTER_ROW, &format!("IP: {}", server));
        }
        Screen::Streams {
            names,
            selected,
            fetch_failed,
        } => {
            frame.text(0, TITLE_ROW, "Streams");
            if *fetch_failed {
                frame.highlighted(COLUMNS - 1, TITLE_ROW, FETCH_FAILED_GLYPH);
            }
            if names.is_empty() {
                frame.text(0, FIRST_LIST_ROW, NO_STREAMS);
            } else {
                list_rows(&mut frame, names, *selected);
            }
            frame.text(0, HINT_ROW, "Press=Play");
            frame.text(0, FOOTER_ROW, "Hold>1s=Back");
        }
        Screen::IpEdit {
            digits,
            cursor,
            stage,
        } => match stage {
            EditStage::Digits => {
                frame.text(0, TITLE_ROW, "Edit IP");
                ip_digits(&mut frame, 2, digits, *cursor);
                frame.text(0, HINT_ROW, "Press=Next");
                frame.text(0, FOOTER_ROW, "Hold>1s=Cancel");
            }
            EditStage::Confirm(choice) => {
                frame.text(0, TITLE_ROW, "Save changes?");
                frame.text(0, 1, &address_from_digits(digits).to_string());
                for (row, option) in [(3, ConfirmChoice::Save), (4, ConfirmChoice::Edit)] {
                    let marker = if option == *choice { MARKER } else { NO_MARKER };
                    frame.text(0, row, &format!("{}{}", marker, option.label()));
                }
                frame.text(0, FOOTER_ROW, "Hold>1s=Cancel");
            }
        },
        Screen::Playing { name, server } => {
            frame.text(0, TITLE_ROW, "Playing");
            frame.text(0, 1, name);
            frame.text(0, 2, &format!("IP: {}", server));
            frame.text(0, FOOTER_ROW, "Hold>1s=Back");
        }
    }

    if let Some(notice) = view.notice {
        notice_row(&mut frame, notice);
    }

    frame
}

/// First visible index of a list window that keeps `selected` in view.
pub fn scroll_offset(len: usize, selected: usize) -> usize {
    if len <= LIST_ROWS {
        return 0;
    }
    let selected = selected.min(len - 1);
    (selected + 1).saturating_sub(LIST_ROWS)
}

fn list_rows<S: AsRef<str>>(frame: &mut Frame, items: &[S], selected: usize) {
    let first = scroll_offset(items.len(), selected);
    for (offset, item) in items.iter().skip(first).take(LIST_ROWS).enumerate() {
        let index = first + offset;
        let marker = if index == selected { MARKER } else { NO_MARKER };
        frame.text(0, FIRST_LIST_ROW + offset, &format!("{}{}", marker, item.as_ref()));
    }
}

/// `DDD.DDD.DDD.DDD` with the digit under the cursor inverted.
fn ip_digits(frame: &mut Frame, row: usize, digits: &[u8; DIGIT_COUNT], cursor: usize) {
    let text: String = digits
        .chunks(3)
        .map(|octet| octet.iter().map(|d| char::from(b'0' + d % 10)).collect::<String>())
        .collect::<Vec<_>>()
        .join(".");
    let cursor = cursor.min(DIGIT_COUNT - 1);
    let col = cursor + cursor / 3;

    frame.text(0, row, &text[..col]);
    frame.highlighted(col, row, &text[col..col + 1]);
    frame.text(col + 1, row, &text[col + 1..]);
}

fn address_from_digits(digits: &[u8; DIGIT_COUNT]) -> ServerAddress {
    let mut octets = [0u8; 4];
    for (slot, chunk) in octets.iter_mut().zip(digits.chunks(3)) {
        let value = chunk.iter().fold(0u16, |acc, d| acc * 10 + u16::from(*d));
        *slot = u8::try_from(value).unwrap_or(u8::MAX);
    }
    ServerAddress::from_octets(octets)
}

fn notice_row(frame: &mut Frame, notice: Notice) {
    frame.clear_row(FOOTER_ROW);
    frame.highlighted(0, FOOTER_ROW, notice.text());
}

/// Presents frames, skipping ones identical to what is already shown.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<Frame>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose `view` and push it to `display` unless nothing changed.
    ///
    /// Returns whether the display was updated. After a failed update the
    /// next call draws again.
    pub fn render<D>(&mut self, view: &NavigationView, display: &mut D) -> Result<bool>
    where
        D: DisplayCapability + ?Sized,
    {
        let frame = compose(view);
        if self.last.as_ref() == Some(&frame) {
            trace!("Frame unchanged, not redrawing");
            return Ok(false);
        }

        self.last = None;
        present(&frame, display)?;
        self.last = Some(frame);
        Ok(true)
    }

    /// The frame currently on the panel.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

fn present<D>(frame: &Frame, display: &mut D) -> Result<()>
where
    D: DisplayCapability + ?Sized,
{
    display.clear()?;
    for op in frame.ops() {
        display.draw_text(op.col, op.row, &op.text, op.highlight)?;
    }
    display.flush()
}
