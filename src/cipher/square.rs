use crate::cipher::text::{decode_plain, plain_index};
use crate::consts::{CIPHER_ALPHABET, CIPHER_SYMBOLS, PLAIN_SYMBOLS};
use crate::error::{invalid_input, AdfgvxResult};
use fastrand::Rng;
use std::fmt;

/// A 6x6 coordinate table. Cell `row * 6 + col` holds a plaintext symbol.
#[derive(Clone, PartialEq, Eq)]
pub struct PolybiusSquare {
    cells: [u8; PLAIN_SYMBOLS],
    positions: [u8; PLAIN_SYMBOLS],
}

impl PolybiusSquare {
    /// The alphabetical square (`A..Z` then `0..9`, row-major). De-fractioning
    /// with this table yields a monoalphabetic substitution of the plaintext.
    pub fn standard() -> Self {
        let mut cells = [0u8; PLAIN_SYMBOLS];
        for (i, c) in cells.iter_mut().enumerate() {
            *c = i as u8;
        }
        Self::from_cells(cells)
    }

    pub fn random(rng: &mut Rng) -> Self {
        let mut square = Self::standard();
        rng.shuffle(&mut square.cells);
        Self::from_cells(square.cells)
    }

    /// Parses a 36-character row-major layout such as `"ETAOIN..."`.
    pub fn from_layout(layout: &str) -> AdfgvxResult<Self> {
        let bytes = layout.as_bytes();
        if bytes.len() != PLAIN_SYMBOLS {
            return Err(invalid_input!(
                "square layout needs {} symbols, got {}",
                PLAIN_SYMBOLS,
                bytes.len()
            ));
        }

        let mut cells = [0u8; PLAIN_SYMBOLS];
        let mut seen = [false; PLAIN_SYMBOLS];
        for (i, &b) in bytes.iter().enumerate() {
            let sym = plain_index(b)
                .ok_or_else(|| invalid_input!("'{}' is not a plaintext symbol", b as char))?;
            if seen[sym as usize] {
                return Err(invalid_input!("symbol '{}' appears twice in square", b as char));
            }
            seen[sym as usize] = true;
            cells[i] = sym;
        }
        Ok(Self::from_cells(cells))
    }

    fn from_cells(cells: [u8; PLAIN_SYMBOLS]) -> Self {
        let mut positions = [0u8; PLAIN_SYMBOLS];
        for (cell, &sym) in cells.iter().enumerate() {
            positions[sym as usize] = cell as u8;
        }
        Self { cells, positions }
    }

    /// Plaintext symbol at (row, col).
    #[inline]
    pub fn lookup(&self, row: u8, col: u8) -> u8 {
        self.cells[row as usize * CIPHER_SYMBOLS + col as usize]
    }

    /// (row, col) coordinates of a plaintext symbol.
    #[inline]
    pub fn coordinates(&self, symbol: u8) -> (u8, u8) {
        let cell = self.positions[symbol as usize];
        (cell / CIPHER_SYMBOLS as u8, cell % CIPHER_SYMBOLS as u8)
    }

    /// Replaces every plaintext symbol with its row and column coordinates.
    pub fn fraction(&self, plain: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(plain.len() * 2);
        for &sym in plain {
            let (row, col) = self.coordinates(sym);
            out.push(row);
            out.push(col);
        }
        out
    }

    pub fn layout(&self) -> String {
        decode_plain(&self.cells)
    }
}

impl fmt::Display for PolybiusSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layout())
    }
}

impl fmt::Debug for PolybiusSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout();
        write!(f, "  ")?;
        for &c in CIPHER_ALPHABET {
            write!(f, " {}", c as char)?;
        }
        writeln!(f)?;
        for (r, row) in layout.as_bytes().chunks(CIPHER_SYMBOLS).enumerate() {
            write!(f, "{} ", CIPHER_ALPHABET[r] as char)?;
            for &c in row {
                write!(f, " {}", c as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
