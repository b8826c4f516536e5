//! Digit-by-digit IPv4 editor state

use pikiosk_core::ServerAddress;

/// Number of editable digits in `DDD.DDD.DDD.DDD`.
pub const DIGIT_COUNT: usize = 12;

const PLACE: [u16; 3] = [100, 10, 1];

/// Choice offered once the last digit has been passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Save,
    Edit,
}

impl ConfirmChoice {
    pub fn toggled(self) -> Self {
        match self {
            ConfirmChoice::Save => ConfirmChoice::Edit,
            ConfirmChoice::Edit => ConfirmChoice::Save,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfirmChoice::Save => "Save",
            ConfirmChoice::Edit => "Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    /// Changing the digit under the cursor
    Digits,
    /// Asking whether to save
    Confirm(ConfirmChoice),
}

/// Working copy of the server address while it is being edited.
///
/// Octets can never exceed 255: a digit change that would produce a larger
/// octet is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpEditBuffer {
    octets: [u8; 4],
    cursor: usize,
    stage: EditStage,
    dirty: bool,
}

impl IpEditBuffer {
    pub fn new(address: ServerAddress) -> Self {
        Self {
            octets: address.octets(),
            cursor: 0,
            stage: EditStage::Digits,
            dirty: false,
        }
    }

    pub fn address(&self) -> ServerAddress {
        ServerAddress::from_octets(self.octets)
    }

    pub fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Digit index under the cursor (0-11).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stage(&self) -> EditStage {
        self.stage
    }

    /// Whether any digit has been changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Value (0-9) of digit `index`.
    pub fn digit(&self, index: usize) -> u8 {
        let octet = self.octets[index / 3] as u16;
        ((octet / PLACE[index % 3]) % 10) as u8
    }

    /// Zero-padded text, e.g. `010.000.000.074`.
    pub fn padded(&self) -> String {
        self.address().padded()
    }

    /// Change the digit under the cursor by `delta` (modulo 10).
    ///
    /// Returns `false` and leaves the buffer untouched when the result would
    /// exceed 255 or the buffer is not in the digit stage.
    pub fn step_digit(&mut self, delta: i8) -> bool {
        if self.stage != EditStage::Digits {
            return false;
        }

        let place = PLACE[self.cursor % 3];
        let octet = self.octets[self.cursor / 3] as u16;
        let digit = (octet / place) % 10;
        let new_digit = (digit as i16 + delta as i16).rem_euclid(10) as u16;
        let value = octet - digit * place + new_digit * place;

        match u8::try_from(value) {
            Ok(value) if value as u16 != octet => {
                self.octets[self.cursor / 3] = value;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Move to the next digit; past the last digit, ask to confirm.
    pub fn advance(&mut self) {
        if self.stage != EditStage::Digits {
            return;
        }
        if self.cursor + 1 >= DIGIT_COUNT {
            self.stage = EditStage::Confirm(ConfirmChoice::Save);
        } else {
            self.cursor += 1;
        }
    }

    /// Flip between Save and Edit. Returns `false` outside the confirm stage.
    pub fn toggle_choice(&mut self) -> bool {
        match self.stage {
            EditStage::Confirm(choice) => {
                self.stage = EditStage::Confirm(choice.toggled());
                true
            }
            EditStage::Digits => false,
        }
    }

    /// Go back to the first digit, keeping the edits.
    pub fn resume_editing(&mut self) {
        self.cursor = 0;
        self.stage = EditStage::Digits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(a: u8, b: u8, c: u8, d: u8) -> IpEditBuffer {
        IpEditBuffer::new(ServerAddress::new(a, b, c, d))
    }

    fn move_to(buf: &mut IpEditBuffer, index: usize) {
        while buf.cursor() < index {
            buf.advance();
        }
    }

    #[test]
    fn test_digits_of_padded_address() {
        let buf = buffer(10, 0, 0, 74);

        let digits: Vec<u8> = (0..DIGIT_COUNT).map(|i| buf.digit(i)).collect();

        assert_eq!(digits, vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 7, 4]);
        assert_eq!(buf.padded(), "010.000.000.074");
    }

    #[test]
    fn test_step_wraps_modulo_ten() {
        let mut buf = buffer(10, 0, 0, 74);
        move_to(&mut buf, 11);

        for _ in 0..4 {
            assert!(buf.step_digit(-1));
        }
        assert_eq!(buf.octets()[3], 70);

        assert!(buf.step_digit(-1));
        assert_eq!(buf.octets()[3], 79);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_over_range_change_is_rejected() {
        let mut buf = buffer(250, 0, 0, 0);
        move_to(&mut buf, 2);

        for _ in 0..5 {
            assert!(buf.step_digit(1));
        }
        assert_eq!(buf.octets()[0], 255);

        assert!(!buf.step_digit(1));
        assert_eq!(buf.octets()[0], 255);
    }

    #[test]
    fn test_hundreds_digit_limited() {
        let mut buf = buffer(199, 0, 0, 0);

        // 199 -> 299 is out of range.
        assert!(!buf.step_digit(1));
        assert!(buf.step_digit(-1));
        assert_eq!(buf.octets()[0], 99);
        // 99 -> 999 (wrapping 0 -> 9) is out of range as well.
        assert!(!buf.step_digit(-1));
    }

    #[test]
    fn test_every_edit_stays_in_range() {
        let mut buf = buffer(255, 255, 255, 255);
        for index in 0..DIGIT_COUNT {
            move_to(&mut buf, index);
            for step in 0..25 {
                buf.step_digit(if step % 3 == 0 { -1 } else { 1 });
            }
        }
        // Octets are u8 by construction; the digits must agree with them.
        for (i, octet) in buf.octets().iter().enumerate() {
            let from_digits = buf.digit(i * 3) as u16 * 100
                + buf.digit(i * 3 + 1) as u16 * 10
                + buf.digit(i * 3 + 2) as u16;
            assert_eq!(from_digits, *octet as u16);
        }
    }

    #[test]
    fn test_advance_past_last_digit_confirms() {
        let mut buf = buffer(10, 0, 0, 74);
        move_to(&mut buf, 11);
        assert_eq!(buf.stage(), EditStage::Digits);

        buf.advance();

        assert_eq!(buf.stage(), EditStage::Confirm(ConfirmChoice::Save));
        assert_eq!(buf.cursor(), 11);
        assert!(!buf.step_digit(1));
    }

    #[test]
    fn test_toggle_and_resume() {
        let mut buf = buffer(10, 0, 0, 74);
        assert!(!buf.toggle_choice());
        buf.step_digit(1);
        move_to(&mut buf, 11);
        buf.advance();

        assert!(buf.toggle_choice());
        assert_eq!(buf.stage(), EditStage::Confirm(ConfirmChoice::Edit));

        buf.resume_editing();

        assert_eq!(buf.stage(), EditStage::Digits);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.octets(), [110, 0, 0, 74]);
    }
}
