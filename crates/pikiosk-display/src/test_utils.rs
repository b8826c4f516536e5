//! In-memory display for renderer and runner tests

use pikiosk_core::prelude::*;

use crate::frame::DisplayCapability;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Clear,
    Draw {
        col: u8,
        row: u8,
        text: String,
        highlight: bool,
    },
    Flush,
}

/// Records every call; can be told to fail the next flush.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
    pub fail_next_flush: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DisplayCall::Flush))
            .count()
    }

    /// Text drawn since the last clear, joined per call.
    pub fn drawn_text(&self) -> Vec<String> {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DisplayCall::Clear))
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Draw { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DisplayCapability for RecordingDisplay {
    fn clear(&mut self) -> Result<()> {
        self.calls.push(DisplayCall::Clear);
        Ok(())
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str, highlight: bool) -> Result<()> {
        self.calls.push(DisplayCall::Draw {
            col,
            row,
            text: text.to_string(),
            highlight,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if std::mem::take(&mut self.fail_next_flush) {
            return Err(Error::display("i2c write failed"));
        }
        self.calls.push(DisplayCall::Flush);
        Ok(())
    }
}
