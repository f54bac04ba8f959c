//! Cipher construction: the Polybius square, the transposition grid, and the
//! substitution alphabet. These build test material for the solvers and
//! back the `encrypt` command.

pub mod grid;
pub mod square;
pub mod substitution;
pub mod text;

pub use self::grid::Grid;
pub use self::square::PolybiusSquare;
pub use self::substitution::SubstitutionAlphabet;

use crate::consts::PADDING_SYMBOL;
use crate::error::{invalid_input, AdfgvxResult};

/// Fractions the plaintext through `square`, writes it into `key.len()`
/// columns, moves column `i` to `key[i]`, and reads the result row by row.
///
/// The plaintext is padded with `X` until the last row is full. A partial row
/// read back after the permutation would land in the wrong columns when the
/// ciphertext is written into the grid again.
pub fn encrypt(plain: &[u8], square: &PolybiusSquare, key: &[usize]) -> AdfgvxResult<Vec<u8>> {
    if key.is_empty() {
        return Err(invalid_input!("transposition key must not be empty"));
    }
    let mut padded = plain.to_vec();
    while (padded.len() * 2) % key.len() != 0 {
        padded.push(PADDING_SYMBOL);
    }

    let fractioned = square.fraction(&padded);
    let mut grid = Grid::from_symbols(&fractioned, key.len())?;
    grid.permute(key)?;
    Ok(grid.encode())
}
