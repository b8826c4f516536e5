//! Full-step quadrature decoder
//!
//! Each sample of the two encoder lines forms a 2-bit code `(clk << 1) | dt`.
//! The encoder rests at `0b11` between detents. A clockwise detent walks
//! `01 -> 00 -> 10 -> 11`, a counter-clockwise one `10 -> 00 -> 01 -> 11`.
//! The table only reports a direction when a complete sequence lands back at
//! rest, so contact bounce moving back and forth between two neighbouring codes
//! can never produce a second event.

use pikiosk_core::EncoderEvent;

const R_START: u8 = 0x0;
const R_CW_FINAL: u8 = 0x1;
const R_CW_BEGIN: u8 = 0x2;
const R_CW_NEXT: u8 = 0x3;
const R_CCW_BEGIN: u8 = 0x4;
const R_CCW_FINAL: u8 = 0x5;
const R_CCW_NEXT: u8 = 0x6;

const DIR_CW: u8 = 0x10;
const DIR_CCW: u8 = 0x20;
const STATE_MASK: u8 = 0x0f;

/// `TRANSITIONS[state][code]` -> next state, with a direction flag on completion.
const TRANSITIONS: [[u8; 4]; 7] = [
    // R_START
    [R_START, R_CW_BEGIN, R_CCW_BEGIN, R_START],
    // R_CW_FINAL
    [R_CW_NEXT, R_START, R_CW_FINAL, R_START | DIR_CW],
    // R_CW_BEGIN
    [R_CW_NEXT, R_CW_BEGIN, R_START, R_START],
    // R_CW_NEXT
    [R_CW_NEXT, R_CW_BEGIN, R_CW_FINAL, R_START],
    // R_CCW_BEGIN
    [R_CCW_NEXT, R_START, R_CCW_BEGIN, R_START],
    // R_CCW_FINAL
    [R_CCW_NEXT, R_CCW_FINAL, R_START, R_START | DIR_CCW],
    // R_CCW_NEXT
    [R_CCW_NEXT, R_CCW_FINAL, R_CCW_BEGIN, R_START],
];

/// Table-driven decoder turning line levels into detent events.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    state: u8,
    reverse: bool,
}

impl QuadratureDecoder {
    /// Create a decoder. `reverse` swaps the reported direction for encoders
    /// wired with CLK and DT exchanged.
    pub fn new(reverse: bool) -> Self {
        Self {
            state: R_START,
            reverse,
        }
    }

    /// Feed the current (debounced) line levels.
    ///
    /// Returns a rotation event when this sample completes a detent.
    pub fn update(&mut self, clk: bool, dt: bool) -> Option<EncoderEvent> {
        let code = ((clk as usize) << 1) | dt as usize;
        let next = TRANSITIONS[(self.state & STATE_MASK) as usize][code];
        self.state = next & STATE_MASK;

        let cw = match next & (DIR_CW | DIR_CCW) {
            DIR_CW => true,
            DIR_CCW => false,
            _ => return None,
        };

        if cw != self.reverse {
            Some(EncoderEvent::RotateCw)
        } else {
            Some(EncoderEvent::RotateCcw)
        }
    }

    /// Whether the decoder is between detents.
    pub fn is_at_rest(&self) -> bool {
        self.state == R_START
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(false)
    }
}
