//! Logical decoding table for a single Golay code block.
//!
//! The table maps a 12-bit block syndrome (eleven stabilizer bits and one
//! logical bit) to the logical X value inferred by a minimum-weight decoder:
//! `true` when the decoder concludes that a logical error is present. The
//! counting engine only ever reads it, so a single static instance is shared
//! by every caller and thread.

use crate::CountError;
use crate::bit_utils::BitPack;
use exrec_common::syndrome::{SYNDROME_SPACE, Syndrome};

const WORDS: usize = SYNDROME_SPACE / 64;

/// Dense, bit-packed decoding table indexed by block syndrome.
///
/// Bit `s % 64` of word `s / 64` holds the decoded logical bit for syndrome
/// `s`. Every syndrome in `[0, SYNDROME_SPACE)` has an entry.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodingTable {
    words: [u64; WORDS],
}

/// Minimum-weight decoding of the Golay code, packed 64 syndromes per word.
static GOLAY: DecodingTable = DecodingTable {
    words: [
        0xFFFE7EE9FEE9E996, 0xF7DFFFFEBFFEFEE9, 0xEFF7FFFE7FFEFEE9, 0xFFBFDBFFFDFFFF7E,
        0xBFF7FFFEDFFEFEE9, 0xFEFFDFBFFF7FF7FE, 0xF779DFF7FFF7BFFE, 0xDFF76DDFFBEFDFFF,
        0xFB7FFFFEDFFEFEE9, 0xEFFFFDBFFFF77FFE, 0xFDFFBFDFFFBFF7FE, 0x7FFEFFF7FBDFEFFF,
        0xDFFFF7BF6DDFDFFE, 0xFFBDBF6BDBFFFFBF, 0xFFE7FEFFDBFFFF7F, 0xFBFFDFBFB6FBFBFD,
        0xFBDFFFFE7FFEFEE9, 0xDF6DBFDFFFDFF7FE, 0x7FFFFDBF977F7FFE, 0xFEDFFFF77FFBEFFF,
        0xFDFFEF7FFFBFF7FE, 0xFFDBF7FFE7FF79F7, 0xFFE7FBFF7EFFFFDF, 0xBFFFDFFEFFFDF7BF,
        0xB6FBDBFFFBFFFF7E, 0xFBDFFFF7FDBFEFFF, 0xFBEFFFF77FFDEFFF, 0xFFF7E779EFFF9EE7,
        0xFBEFFFFDDFF7BFFF, 0x7FFFFEBFFFFEF7DF, 0xEF9E7FEFFFEFFDFB, 0xFDEFFFF7FB7FEFFF,
        0x0001811601161669, 0x0820000140010116, 0x1008000180010116, 0x0040240002000081,
        0x4008000120010116, 0x0100204000800801, 0x0886200800084001, 0x2008922004102000,
        0x0480000120010116, 0x1000024000088001, 0x0200402000400801, 0x8001000804201000,
        0x2000084092202001, 0x0042409424000040, 0x0018010024000080, 0x0400204049040402,
        0x0420000180010116, 0x2092402000200801, 0x8000024068808001, 0x0120000880041000,
        0x0200108000400801, 0x0024080018008608, 0x0018040081000020, 0x4000200100020840,
        0x4904240004000081, 0x0420000802401000, 0x0410000880021000, 0x0008188610006118,
        0x0410000220084000, 0x8000014000010820, 0x1061801000100204, 0x0210000804801000,
    ],
};

impl DecodingTable {
    /// Returns the process-wide Golay decoding table.
    pub fn golay() -> &'static DecodingTable {
        &GOLAY
    }

    /// Builds a table from one decoded bit per syndrome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDecodingTable` unless exactly `SYNDROME_SPACE` bits
    /// are supplied.
    pub fn from_bits(bits: &[bool]) -> Result<Self, CountError> {
        if bits.len() != SYNDROME_SPACE {
            return Err(CountError::InvalidDecodingTable(
                "expected one bit per 12-bit syndrome",
            ));
        }
        let mut words = [0u64; WORDS];
        for (s, &bit) in bits.iter().enumerate() {
            BitPack::set(&mut words, s, bit);
        }
        Ok(Self { words })
    }

    /// Builds a table from `SYNDROME_SPACE / 8` packed bytes, syndrome `s` at
    /// bit `s % 8` of byte `s / 8`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDecodingTable` for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CountError> {
        if bytes.len() * 8 != SYNDROME_SPACE {
            return Err(CountError::InvalidDecodingTable(
                "expected 512 packed bytes, one bit per 12-bit syndrome",
            ));
        }
        let mut words = [0u64; WORDS];
        for s in 0..SYNDROME_SPACE {
            BitPack::set(&mut words, s, (bytes[s / 8] >> (s % 8)) & 1 == 1);
        }
        Ok(Self { words })
    }

    /// Builds a table from decoded values stored one per byte (0 or 1).
    pub fn from_values(values: &[u8]) -> Result<Self, CountError> {
        if values.len() != SYNDROME_SPACE {
            return Err(CountError::InvalidDecodingTable(
                "expected one value per 12-bit syndrome",
            ));
        }
        let mut words = [0u64; WORDS];
        for (s, &v) in values.iter().enumerate() {
            match v {
                0 => {}
                1 => BitPack::set(&mut words, s, true),
                _ => {
                    return Err(CountError::InvalidDecodingTable(
                        "decoded values must be 0 or 1",
                    ));
                }
            }
        }
        Ok(Self { words })
    }

    /// Decoded logical bit for `syndrome`.
    ///
    /// # Panics
    ///
    /// Panics if `syndrome` is outside the 12-bit syndrome space.
    #[inline(always)]
    pub fn decode(&self, syndrome: Syndrome) -> bool {
        let s = syndrome as usize;
        assert!(s < SYNDROME_SPACE, "syndrome {} outside decoding table", s);
        BitPack::get(&self.words, s)
    }

    /// Number of syndromes that decode to a logical error.
    pub fn num_logical(&self) -> usize {
        BitPack::count_ones(&self.words)
    }

    /// The packed words, lowest syndromes first.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }
}

impl core::fmt::Debug for DecodingTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodingTable")
            .field("num_logical", &self.num_logical())
            .finish()
    }
}
