use crate::cipher::text::encode_cipher;
use crate::error::{invalid_input, AdfgvxResult};
use fastrand::Rng;

/// Cipher symbols written row-major into `key_length` columns.
///
/// Column `j` holds symbols `j, j + k, j + 2k, ...`, so every column has the
/// same length except that trailing columns are one shorter when the text
/// length is not a multiple of the key length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: Vec<Vec<u8>>,
}

impl Grid {
    pub fn from_symbols(symbols: &[u8], key_length: usize) -> AdfgvxResult<Self> {
        if key_length == 0 {
            return Err(invalid_input!("key length must be at least 1"));
        }
        if symbols.is_empty() {
            return Err(invalid_input!("cannot build a grid from empty text"));
        }

        let rows = symbols.len().div_ceil(key_length);
        let mut columns = vec![Vec::with_capacity(rows); key_length];
        for (i, &s) in symbols.iter().enumerate() {
            columns[i % key_length].push(s);
        }
        Ok(Self { columns })
    }

    pub fn from_ciphertext(text: &str, key_length: usize) -> AdfgvxResult<Self> {
        Self::from_symbols(&encode_cipher(text)?, key_length)
    }

    pub fn columns(&self) -> &[Vec<u8>] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> &[u8] {
        &self.columns[idx]
    }

    pub fn key_length(&self) -> usize {
        self.columns.len()
    }

    /// Length of the longest column.
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Moves column `i` to position `key[i]`.
    pub fn permute(&mut self, key: &[usize]) -> AdfgvxResult<()> {
        validate_key(key, self.columns.len())?;

        let mut shuffled = vec![Vec::new(); self.columns.len()];
        for (i, col) in self.columns.drain(..).enumerate() {
            shuffled[key[i]] = col;
        }
        self.columns = shuffled;
        Ok(())
    }

    /// Reads the grid back row by row.
    pub fn encode(&self) -> Vec<u8> {
        let total: usize = self.columns.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        for r in 0..self.rows() {
            for col in &self.columns {
                if let Some(&s) = col.get(r) {
                    out.push(s);
                }
            }
        }
        out
    }

    pub fn random_key(rng: &mut Rng, key_length: usize) -> Vec<usize> {
        let mut key: Vec<usize> = (0..key_length).collect();
        rng.shuffle(&mut key);
        key
    }
}

pub fn validate_key(key: &[usize], key_length: usize) -> AdfgvxResult<()> {
    if key.len() != key_length {
        return Err(invalid_input!(
            "key has {} entries but the grid has {} columns",
            key.len(),
            key_length
        ));
    }
    let mut seen = vec![false; key_length];
    for &k in key {
        if k >= key_length || seen[k] {
            return Err(invalid_input!("key {:?} is not a permutation", key));
        }
        seen[k] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_strided() {
        let grid = Grid::from_symbols(&[0, 1, 2, 3, 4, 5, 0], 3).unwrap();
        assert_eq!(grid.column(0), &[0, 3, 0]);
        assert_eq!(grid.column(1), &[1, 4]);
        assert_eq!(grid.column(2), &[2, 5]);
        assert_eq!(grid.rows(), 3);
    }

    #[test]
    fn test_permute_then_regrid_recovers_columns() {
        let symbols: Vec<u8> = (0..24).map(|i| (i % 6) as u8).collect();
        let original = Grid::from_symbols(&symbols, 4).unwrap();

        let key = vec![2, 0, 3, 1];
        let mut shuffled = original.clone();
        shuffled.permute(&key).unwrap();

        let regrid = Grid::from_symbols(&shuffled.encode(), 4).unwrap();
        for (i, &k) in key.iter().enumerate() {
            assert_eq!(regrid.column(k), original.column(i));
        }
    }

    #[test]
    fn test_permute_rejects_bad_keys() {
        let mut grid = Grid::from_symbols(&[0, 1, 2, 3], 2).unwrap();
        assert!(grid.permute(&[0, 0]).is_err());
        assert!(grid.permute(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(Grid::from_symbols(&[], 4).is_err());
        assert!(Grid::from_symbols(&[1, 2], 0).is_err());
    }
}
