//! Persisted tournament record layout.
//!
//! A fixed 20-byte record written to the console's non-volatile memory:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | magic `"NBGJ"` |
//! | 4 | 4 | minigame blacklist bitmask (u32, little-endian) |
//! | 8 | 1 | crashed flag |
//! | 9 | 1 | player count |
//! | 10 | 1 | AI difficulty |
//! | 11 | 1 | points to win |
//! | 12 | 4 | points per player |
//! | 16 | 1 | next round policy |
//! | 17 | 1 | chooser |
//! | 18 | 1 | current game |
//! | 19 | 1 | checksum (sum of bytes 0..19, mod 256) |

use bytemuck::{Pod, Zeroable};

use crate::constants::{MAX_PLAYERS, SAVE_MAGIC};

/// Size of the encoded record in bytes.
pub const SAVE_RECORD_SIZE: usize = std::mem::size_of::<SaveRecord>();

/// Why a block of bytes was rejected as a save record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("save record truncated: {0} of {SAVE_RECORD_SIZE} bytes")]
    Truncated(usize),

    #[error("save record magic mismatch")]
    BadMagic,

    #[error("save record checksum mismatch (stored {stored:#04x}, computed {computed:#04x})")]
    BadChecksum { stored: u8, computed: u8 },
}

/// The on-device tournament record (POD, zero-copy via bytemuck).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SaveRecord {
    pub magic: [u8; 4],
    blacklist: [u8; 4],
    pub crashed: u8,
    pub player_count: u8,
    pub ai_difficulty: u8,
    pub points_to_win: u8,
    pub points: [u8; MAX_PLAYERS],
    pub next_round: u8,
    pub chooser: u8,
    pub current_game: u8,
    pub checksum: u8,
}

impl SaveRecord {
    /// A first-run record: everything zeroed except the magic, sealed.
    pub fn fresh() -> Self {
        let mut record = Self::zeroed();
        record.magic = SAVE_MAGIC;
        record.seal();
        record
    }

    /// Additive checksum over every byte that precedes the checksum field.
    pub fn compute_checksum(&self) -> u8 {
        let bytes = bytemuck::bytes_of(self);
        bytes[..SAVE_RECORD_SIZE - 1]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    /// Recompute and store the checksum. Call before every write.
    pub fn seal(&mut self) {
        self.checksum = self.compute_checksum();
    }

    pub fn blacklist(&self) -> u32 {
        u32::from_le_bytes(self.blacklist)
    }

    pub fn set_blacklist(&mut self, mask: u32) {
        self.blacklist = mask.to_le_bytes();
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed != 0
    }

    /// Encoded bytes, ready for the device.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decode and validate a record read back from the device.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < SAVE_RECORD_SIZE {
            return Err(RecordError::Truncated(bytes.len()));
        }
        let record: SaveRecord = bytemuck::pod_read_unaligned(&bytes[..SAVE_RECORD_SIZE]);
        if record.magic != SAVE_MAGIC {
            return Err(RecordError::BadMagic);
        }
        let computed = record.compute_checksum();
        if computed != record.checksum {
            return Err(RecordError::BadChecksum {
                stored: record.checksum,
                computed,
            });
        }
        Ok(record)
    }
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_twenty_bytes() {
        assert_eq!(SAVE_RECORD_SIZE, 20);
    }

    #[test]
    fn fresh_record_checksum_is_magic_sum() {
        let record = SaveRecord::fresh();
        let expected = b"NBGJ".iter().fold(0u8, |a, b| a.wrapping_add(*b));
        assert_eq!(record.checksum, expected);
        assert_eq!(SaveRecord::from_bytes(record.as_bytes()), Ok(record));
    }

    #[test]
    fn blacklist_is_little_endian_at_offset_four() {
        let mut record = SaveRecord::fresh();
        record.set_blacklist(0x0403_0201);
        record.seal();
        assert_eq!(&record.as_bytes()[4..8], &[1, 2, 3, 4]);
        assert_eq!(record.blacklist(), 0x0403_0201);
    }

    #[test]
    fn any_single_byte_corruption_is_rejected() {
        let mut record = SaveRecord::fresh();
        record.crashed = 1;
        record.player_count = 2;
        record.points_to_win = 3;
        record.points = [1, 0, 2, 0];
        record.seal();
        let good = record.as_bytes().to_vec();

        for i in 0..SAVE_RECORD_SIZE {
            let mut bad = good.clone();
            bad[i] = bad[i].wrapping_add(0x5A);
            assert!(SaveRecord::from_bytes(&bad).is_err(), "byte {i} not detected");
        }
    }

    #[test]
    fn wrong_magic_and_truncation() {
        let mut bytes = SaveRecord::fresh().as_bytes().to_vec();
        assert_eq!(
            SaveRecord::from_bytes(&bytes[..10]),
            Err(RecordError::Truncated(10))
        );
        bytes[0] = b'X';
        assert_eq!(SaveRecord::from_bytes(&bytes), Err(RecordError::BadMagic));
    }
}
