//! Persisted trie images.
//!
//! An image is a fixed header followed by the raw `(base, check)` cell
//! pairs in slot order, little-endian. Loading validates the header, a
//! CRC32 of the cell payload, and then every back-pointer: a non-vacant
//! slot must be addressable as `base(parent) + label` for a label in the
//! valid range. Anything that fails comes back as
//! [`TrieError::CorruptImage`] and no partial trie is exposed.

use crate::double_array::{Cell, DoubleArray, VACANT};
use crate::TrieError;

const MAGIC: &[u8; 4] = b"LXTA";
const VERSION: u8 = 1;
/// magic + version + reserved + cell count + crc32 = 16
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4;
const CELL_SIZE: usize = 8;

impl DoubleArray {
    /// Serializes the slot array.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.cells.len() * CELL_SIZE);
        for cell in &self.cells {
            payload.extend_from_slice(&cell.base.to_le_bytes());
            payload.extend_from_slice(&cell.check.to_le_bytes());
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&payload);
        let crc = hasher.finalize();

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]);
        buf.extend_from_slice(&(self.cells.len() as u32).to_le_bytes());
        buf.extend_from_slice(&crc.to_le_bytes());
        buf.extend_from_slice(&payload);
        buf
    }

    /// Deserializes and validates an image produced by [`Self::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, TrieError> {
        if data.len() < HEADER_SIZE {
            return Err(TrieError::CorruptImage("header too short"));
        }
        if &data[..4] != MAGIC {
            return Err(TrieError::CorruptImage("bad magic bytes"));
        }
        if data[4] != VERSION {
            return Err(TrieError::CorruptImage("unsupported version"));
        }

        let cell_count = u32::from_le_bytes(data[8..12].try_into().unwrap()) as usize;
        let crc_expected = u32::from_le_bytes(data[12..16].try_into().unwrap());

        let payload = &data[HEADER_SIZE..];
        if payload.len() != cell_count * CELL_SIZE {
            return Err(TrieError::CorruptImage(
                "declared cell count disagrees with payload length",
            ));
        }
        if cell_count == 0 {
            return Err(TrieError::CorruptImage("image has no root slot"));
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(payload);
        if hasher.finalize() != crc_expected {
            return Err(TrieError::CorruptImage("checksum mismatch"));
        }

        let mut cells = Vec::with_capacity(cell_count);
        for raw in payload.chunks_exact(CELL_SIZE) {
            cells.push(Cell {
                base: i32::from_le_bytes(raw[..4].try_into().unwrap()),
                check: i32::from_le_bytes(raw[4..].try_into().unwrap()),
            });
        }

        let key_count = validate(&cells)?;
        Ok(DoubleArray::from_parts(cells, key_count))
    }
}

/// Walks every occupied slot and checks that its back-pointer resolves.
/// Returns the number of leaf slots, i.e. the stored key count.
fn validate(cells: &[Cell]) -> Result<usize, TrieError> {
    if cells[0].check != 0 {
        return Err(TrieError::CorruptImage("root slot does not own itself"));
    }

    let mut key_count = 0;
    for (slot, cell) in cells.iter().enumerate().skip(1) {
        if cell.check == VACANT {
            continue;
        }
        let parent = cell.check;
        if parent < 0 || parent as usize >= cells.len() || parent as usize == slot {
            return Err(TrieError::CorruptImage("back-pointer out of range"));
        }
        let parent_cell = &cells[parent as usize];
        if parent_cell.check == VACANT {
            return Err(TrieError::CorruptImage("back-pointer into vacant slot"));
        }
        if parent_cell.base < 1 {
            return Err(TrieError::CorruptImage("parent slot has no child base"));
        }
        let label = slot as i64 - parent_cell.base as i64;
        if !(0..=256).contains(&label) {
            return Err(TrieError::CorruptImage(
                "slot unreachable from its parent's base",
            ));
        }
        if label == 0 {
            key_count += 1;
        }
    }
    Ok(key_count)
}
