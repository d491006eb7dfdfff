//! Keyboard matrix: eight half-rows of up to five keys each.
//!
//! Key codes are 16-bit: the high byte selects a half-row (`0..=7`), the low
//! byte is the bit mask of keys inside it. Matrix bytes use inverted logic, a
//! cleared bit means the key is held.

/// Number of half-rows scanned by the ULA.
pub const HALF_ROW_COUNT: usize = 8;

/// Matrix byte value with every key released.
pub const ALL_RELEASED: u8 = 0xFF;

/// Inverted-logic 8x8 key matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct KeyboardMatrix {
    rows: [u8; HALF_ROW_COUNT],
}

impl Default for KeyboardMatrix {
    fn default() -> Self {
        Self {
            rows: [ALL_RELEASED; HALF_ROW_COUNT],
        }
    }
}

impl KeyboardMatrix {
    /// Marks the keys in `code` as held. Codes with a half-row of 8 or more are ignored.
    pub fn key_down(&mut self, code: u16) {
        if let Some((row, mask)) = split_code(code) {
            self.rows[row] &= !mask;
        }
    }

    /// Marks the keys in `code` as released. Codes with a half-row of 8 or more are ignored.
    pub fn key_up(&mut self, code: u16) {
        if let Some((row, mask)) = split_code(code) {
            self.rows[row] |= mask;
        }
    }

    /// Releases every key.
    pub fn release_all(&mut self) {
        self.rows = [ALL_RELEASED; HALF_ROW_COUNT];
    }

    /// Returns the raw byte for one half-row, or `None` when out of range.
    #[must_use]
    pub fn half_row(&self, row: usize) -> Option<u8> {
        self.rows.get(row).copied()
    }

    /// Returns all eight half-row bytes.
    #[must_use]
    pub const fn rows(&self) -> [u8; HALF_ROW_COUNT] {
        self.rows
    }

    /// ANDs together every half-row whose bit is clear in `select`.
    ///
    /// `select` is the high byte of the port address. With no bit clear the
    /// result is `0xFF`.
    #[must_use]
    pub fn scan(&self, select: u8) -> u8 {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(row, _)| select & (1 << row) == 0)
            .fold(ALL_RELEASED, |acc, (_, bits)| acc & bits)
    }
}

fn split_code(code: u16) -> Option<(usize, u8)> {
    let [row, mask] = code.to_be_bytes();
    let row = usize::from(row);
    (row < HALF_ROW_COUNT).then_some((row, mask))
}

/// Physical keys of the 48K keyboard, named by their legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Key {
    CapsShift,
    Z,
    X,
    C,
    V,
    A,
    S,
    D,
    F,
    G,
    Q,
    W,
    E,
    R,
    T,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num0,
    Num9,
    Num8,
    Num7,
    Num6,
    P,
    O,
    I,
    U,
    Y,
    Enter,
    L,
    K,
    J,
    H,
    Space,
    SymbolShift,
    M,
    N,
    B,
}

impl Key {
    /// Every key in matrix order: half-row 0 bit 0 first.
    pub const ALL: [Self; 40] = [
        Self::CapsShift,
        Self::Z,
        Self::X,
        Self::C,
        Self::V,
        Self::A,
        Self::S,
        Self::D,
        Self::F,
        Self::G,
        Self::Q,
        Self::W,
        Self::E,
        Self::R,
        Self::T,
        Self::Num1,
        Self::Num2,
        Self::Num3,
        Self::Num4,
        Self::Num5,
        Self::Num0,
        Self::Num9,
        Self::Num8,
        Self::Num7,
        Self::Num6,
        Self::P,
        Self::O,
        Self::I,
        Self::U,
        Self::Y,
        Self::Enter,
        Self::L,
        Self::K,
        Self::J,
        Self::H,
        Self::Space,
        Self::SymbolShift,
        Self::M,
        Self::N,
        Self::B,
    ];

    /// Returns `(half_row, bit)` for this key.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn position(self) -> (u8, u8) {
        let index = self as u8;
        (index / 5, index % 5)
    }

    /// Returns the 16-bit code accepted by [`KeyboardMatrix::key_down`].
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn code(self) -> u16 {
        let (row, bit) = self.position();
        ((row as u16) << 8) | (1 << bit)
    }
}
