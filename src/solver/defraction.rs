use crate::cipher::PolybiusSquare;
use crate::consts::CIPHER_SYMBOLS;
use crate::error::{invalid_input, AdfgvxResult};

/// Rebuilds the symbol stream from ordered coordinate pairs.
///
/// Row by row, pair `k` contributes `square.lookup(first[k][r], second[k][r])`.
/// A pair whose columns run out before the longest one is skipped for those
/// trailing rows.
pub fn de_fraction<C: AsRef<[u8]>>(
    first: &[C],
    second: &[C],
    square: &PolybiusSquare,
) -> AdfgvxResult<Vec<u8>> {
    if first.len() != second.len() {
        return Err(invalid_input!(
            "cannot pair {} first-coordinate columns with {} second-coordinate columns",
            first.len(),
            second.len()
        ));
    }

    let mut rows = 0;
    let mut total = 0;
    for col in first.iter().chain(second) {
        let col = col.as_ref();
        if col.iter().any(|&s| s as usize >= CIPHER_SYMBOLS) {
            return Err(invalid_input!("column holds a symbol outside the cipher alphabet"));
        }
        rows = rows.max(col.len());
        total += col.len();
    }

    let mut out = Vec::with_capacity(total / 2);
    for r in 0..rows {
        for (x, y) in first.iter().zip(second) {
            if let (Some(&row), Some(&col)) = (x.as_ref().get(r), y.as_ref().get(r)) {
                out.push(square.lookup(row, col));
            }
        }
    }
    Ok(out)
}
