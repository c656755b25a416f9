//! Bit-packed relation table with atomic file persistence.
//!
//! ## File format
//!
//! ```text
//! ceil(rows * cols / 8) bytes, no header.
//! bit i lives in byte i / 8 at position 7 - i % 8 (MSB first).
//! cell (self_index, other_index) is bit self_index * cols + other_index.
//! unused bits of the last byte are written as 0 and ignored on load.
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bitvec::prelude::*;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::TableError;

/// Bytes needed to hold `bits` bits.
#[inline]
pub const fn byte_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// A `rows × cols` bit matrix: one bit per (own move, opponent reply) pair.
#[derive(Clone, PartialEq, Eq)]
pub struct RelationTable {
    rows: usize,
    cols: usize,
    bits: BitVec<u8, Msb0>,
}

impl RelationTable {
    /// A table with every relation cleared.
    pub fn new_zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            bits: bitvec![u8, Msb0; 0; rows * cols],
        }
    }

    /// A table filled with uniformly random bits.
    pub fn new_random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut bytes = vec![0u8; byte_len(rows * cols)];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(rows, cols, bytes)
    }

    /// Unpack MSB-first bytes. `bytes` must cover `rows * cols` bits.
    fn from_bytes(rows: usize, cols: usize, bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= byte_len(rows * cols));
        let mut bits = BitVec::from_vec(bytes);
        bits.truncate(rows * cols);
        Self { rows, cols, bits }
    }

    /// Pack into MSB-first bytes with zeroed padding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.bits.as_raw_slice().to_vec();
        let tail = self.bits.len() % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= u8::MAX << (8 - tail);
            }
        }
        bytes
    }

    /// Load a table from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist, so the caller can
    /// start from a fresh table instead.
    pub fn load(path: &Path, rows: usize, cols: usize) -> Result<Option<Self>, TableError> {
        let mut bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let expected = byte_len(rows * cols);
        if bytes.len() < expected {
            return Err(TableError::CorruptFile {
                path: path.to_path_buf(),
                expected,
                found: bytes.len(),
            });
        }
        if bytes.len() > expected {
            warn!(
                path = %path.display(),
                expected,
                found = bytes.len(),
                "table file longer than expected, ignoring trailing bytes"
            );
            bytes.truncate(expected);
        }

        debug!(path = %path.display(), rows, cols, "loaded relation table");
        Ok(Some(Self::from_bytes(rows, cols, bytes)))
    }

    /// Write the table to `path` via a temporary sibling file and a rename,
    /// so a crash never leaves a partially written table behind.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let tmp = temp_sibling(path);
        let written = write_synced(&tmp, &self.to_bytes());
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %path.display(), rows = self.rows, cols = self.cols, "saved relation table");
        Ok(())
    }

    /// Number of rows (own move codes).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (opponent reply codes).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Return `true` if the table has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set relations.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    fn cell(&self, self_index: usize, other_index: usize) -> Result<usize, TableError> {
        if self_index >= self.rows || other_index >= self.cols {
            return Err(TableError::IndexOutOfRange {
                self_index,
                other_index,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self_index * self.cols + other_index)
    }

    /// Read one relation bit.
    #[inline]
    pub fn get(&self, self_index: usize, other_index: usize) -> Result<bool, TableError> {
        let cell = self.cell(self_index, other_index)?;
        Ok(self.bits[cell])
    }

    /// Write one relation bit, returning whether the stored value changed.
    #[inline]
    pub fn set(&mut self, self_index: usize, other_index: usize, bit: bool) -> Result<bool, TableError> {
        let cell = self.cell(self_index, other_index)?;
        Ok(self.bits.replace(cell, bit) != bit)
    }
}

impl fmt::Debug for RelationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RelationTable({}x{}, {} set)",
            self.rows,
            self.cols,
            self.count_ones()
        )
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
