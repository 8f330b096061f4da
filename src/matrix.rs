//! Decision matrix: the enumeration of all corners of the variable box.
//!
//! For `n` variables there are `2^n` corners. Corner `i` is identified by the
//! binary digits of `i`: bit `j` selects the upper (1) or lower (0) bound of
//! variable `j`. The [`DecisionMatrix`] stores these bits as an `n x 2^n`
//! table, row `j` holding variable `j`'s bit across all corners:
//!
//! ```text
//!            corner: 0 1 2 3
//! variable 0 (row 0): 0 1 0 1
//! variable 1 (row 1): 0 0 1 1
//! ```
//!
//! The size of the table is exponential in `n`. A table that cannot be
//! addressed or allocated is reported as an error; otherwise callers must
//! keep `n` small.

use std::fmt::{self, Debug};

use log::warn;

use crate::error::{DecideError, Result};

/// An `n x 2^n` bit table with `matrix[j][i] == (i >> j) & 1`.
#[derive(Clone, PartialEq, Eq)]
pub struct DecisionMatrix {
    /// Number of rows (variables).
    rows: usize,
    /// Number of columns (corners), always `2^rows`.
    columns: usize,
    /// Words per row.
    stride: usize,
    /// Row-major storage, each u64 holds 64 bits.
    words: Vec<u64>,
}

impl DecisionMatrix {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Builds the matrix for `num_vars` variables.
    ///
    /// For `num_vars == 0` the matrix has no rows and a single column: the
    /// trivial corner, where nothing is substituted.
    ///
    /// Fails with [`DecideError::TooManyVariables`] if `2^num_vars` does not
    /// fit into a `usize` corner index or the table cannot be allocated.
    pub fn new(num_vars: usize) -> Result<Self> {
        let too_many = || DecideError::TooManyVariables(num_vars);
        let columns = u32::try_from(num_vars)
            .ok()
            .filter(|&n| n < usize::BITS)
            .map(|n| 1usize << n)
            .ok_or_else(too_many)?;
        let stride = columns.div_ceil(Self::BITS_PER_WORD);
        let len = num_vars.checked_mul(stride).ok_or_else(too_many)?;

        let mut words = Vec::new();
        words.try_reserve_exact(len).map_err(|e| {
            warn!("cannot allocate decision matrix for {} variables: {}", num_vars, e);
            too_many()
        })?;
        words.resize(len, 0u64);
        for j in 0..num_vars {
            let row = &mut words[j * stride..(j + 1) * stride];
            for i in 0..columns {
                if (i >> j) & 1 == 1 {
                    row[i / Self::BITS_PER_WORD] |= 1u64 << (i % Self::BITS_PER_WORD);
                }
            }
        }

        Ok(Self {
            rows: num_vars,
            columns,
            stride,
            words,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.rows
    }

    pub fn num_corners(&self) -> usize {
        self.columns
    }

    /// Returns the bit of variable `var` in corner `corner`:
    /// `true` selects the upper bound, `false` the lower one.
    ///
    /// # Panics
    ///
    /// Panics if `var >= num_vars()` or `corner >= num_corners()`.
    #[inline]
    pub fn get(&self, var: usize, corner: usize) -> bool {
        assert!(var < self.rows, "variable {} out of range 0..{}", var, self.rows);
        assert!(corner < self.columns, "corner {} out of range 0..{}", corner, self.columns);
        let word = self.words[var * self.stride + corner / Self::BITS_PER_WORD];
        (word >> (corner % Self::BITS_PER_WORD)) & 1 == 1
    }

    /// Iterates over the bits of one corner, variable by variable.
    pub fn column(&self, corner: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.rows).map(move |var| self.get(var, corner))
    }

    /// Iterates over the bits of one variable, corner by corner.
    pub fn row(&self, var: usize) -> impl Iterator<Item = bool> + '_ {
        (0..self.columns).map(move |corner| self.get(var, corner))
    }
}

impl Debug for DecisionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionMatrix")
            .field("num_vars", &self.rows)
            .field("num_corners", &self.columns)
            .finish()
    }
}
