//! Common definitions shared across the exRec counting workspace.
//!
//! This crate provides the syndrome geometry of a single Golay code block,
//! the packing of two block syndromes into the combined syndrome produced by
//! the transversal CNOT, and the small index enumerations used to address
//! the per-configuration and per-weight count tables.

#![no_std]

/// Syndrome geometry for one code block and for the two-block CNOT.
///
/// A block syndrome is the 12-bit classical pattern observed on a single
/// Golay code block after decoding. The transversal CNOT touches both blocks
/// at once, so its faults are described by a 24-bit combined syndrome whose
/// high half is the contribution to block A and whose low half is the
/// contribution to block B.
pub mod syndrome {
    /// Block syndrome value, always in `[0, SYNDROME_SPACE)`.
    pub type Syndrome = u32;

    /// Two block syndromes packed as `(a << SYNDROME_BITS) | b`.
    pub type CombinedSyndrome = u32;

    /// Number of bits in a single block syndrome.
    ///
    /// Eleven stabilizer bits of the Golay code plus one logical bit. The
    /// decoding table is indexed by all twelve.
    pub const SYNDROME_BITS: u32 = 12;

    /// Number of distinct block syndromes.
    pub const SYNDROME_SPACE: usize = 1 << SYNDROME_BITS;

    /// Mask selecting the low block (block B) of a combined syndrome.
    pub const SYNDROME_MASK: u32 = (1 << SYNDROME_BITS) - 1;

    /// Number of distinct combined syndromes.
    pub const COMBINED_SPACE: usize = 1 << (2 * SYNDROME_BITS);

    /// Splits a combined syndrome into its `(block A, block B)` halves.
    #[inline(always)]
    pub fn split_combined(s: CombinedSyndrome) -> (Syndrome, Syndrome) {
        (s >> SYNDROME_BITS, s & SYNDROME_MASK)
    }

    /// Packs two block syndromes into a combined syndrome.
    #[inline(always)]
    pub fn combine(a: Syndrome, b: Syndrome) -> CombinedSyndrome {
        ((a & SYNDROME_MASK) << SYNDROME_BITS) | (b & SYNDROME_MASK)
    }
}

/// Index enumerations for the exRec count tables.
///
/// The counting engine works with a handful of tiny tables: a 2x2 table per
/// block indexed by trailing-EC presence and logical outcome, and a 4x3 table
/// indexed by the joint trailing-EC presence and the joint logical error.
/// These types give those indices names while keeping the compact bit
/// encodings the tables are laid out in.
pub mod layout {
    /// Number of joint trailing-EC presence combinations.
    pub const NUM_EC: usize = 4;

    /// Number of nontrivial joint logical errors.
    pub const NUM_ERRORS: usize = 3;

    /// Number of fault locations in the exRec.
    pub const NUM_LOCATIONS: usize = 5;

    /// Whether a trailing error correction is present in the exRec.
    ///
    /// The removed case is hypothetical: it answers what the logical effect
    /// on a block would be if its trailing EC were taken out, which is needed
    /// to decide whether a fault set in the leading EC and CNOT is malignant
    /// on its own.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TecPresence {
        Removed = 0,
        Intact = 1,
    }

    impl TecPresence {
        pub const ALL: [TecPresence; 2] = [TecPresence::Removed, TecPresence::Intact];

        #[inline(always)]
        pub fn from_bit(bit: bool) -> Self {
            if bit {
                TecPresence::Intact
            } else {
                TecPresence::Removed
            }
        }

        #[inline(always)]
        pub fn index(self) -> usize {
            self as usize
        }
    }

    /// Logical outcome on a single block, relative to the expected value.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Outcome {
        Benign = 0,
        Malignant = 1,
    }

    impl Outcome {
        pub const ALL: [Outcome; 2] = [Outcome::Benign, Outcome::Malignant];

        /// Maps a "logical value flipped" bit onto an outcome.
        #[inline(always)]
        pub fn from_bit(flipped: bool) -> Self {
            if flipped {
                Outcome::Malignant
            } else {
                Outcome::Benign
            }
        }

        #[inline(always)]
        pub fn index(self) -> usize {
            self as usize
        }

        #[inline(always)]
        pub fn flip(self) -> Self {
            match self {
                Outcome::Benign => Outcome::Malignant,
                Outcome::Malignant => Outcome::Benign,
            }
        }
    }

    /// Joint trailing-EC presence for the two blocks.
    ///
    /// Encoded as a two-bit value: bit 1 is set when the trailing EC on
    /// block A is intact and bit 0 when the trailing EC on block B is intact.
    /// Value 3 is the real exRec; values 0-2 are the hypothetical variants
    /// with one or both trailing ECs removed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EcConfig(u8);

    impl EcConfig {
        pub const ALL: [EcConfig; NUM_EC] = [EcConfig(0), EcConfig(1), EcConfig(2), EcConfig(3)];

        /// Both trailing ECs present.
        pub const BOTH_INTACT: EcConfig = EcConfig(3);

        /// Builds the configuration for an index in `[0, NUM_EC)`.
        ///
        /// # Panics
        ///
        /// Panics if `index` is not a valid two-bit value.
        pub fn from_index(index: usize) -> Self {
            assert!(index < NUM_EC, "ec index {} out of range", index);
            EcConfig(index as u8)
        }

        pub fn new(block_a: TecPresence, block_b: TecPresence) -> Self {
            EcConfig(((block_a as u8) << 1) | block_b as u8)
        }

        #[inline(always)]
        pub fn index(self) -> usize {
            self.0 as usize
        }

        #[inline(always)]
        pub fn block_a(self) -> TecPresence {
            TecPresence::from_bit(self.0 >> 1 == 1)
        }

        #[inline(always)]
        pub fn block_b(self) -> TecPresence {
            TecPresence::from_bit(self.0 & 1 == 1)
        }

        /// Exchanges the roles of the two blocks.
        pub fn swapped(self) -> Self {
            EcConfig::new(self.block_b(), self.block_a())
        }

        /// Two-character label, `-` for a removed trailing EC.
        pub fn label(self) -> &'static str {
            ["--", "-B", "A-", "AB"][self.index()]
        }
    }

    /// Nontrivial joint logical X error on the two blocks.
    ///
    /// Written in tensor order (block A, block B): `IX` is an error on block
    /// B only, `XI` on block A only, `XX` on both. The discriminant plus one,
    /// read as a two-bit number, gives the per-block outcomes with block A in
    /// the high bit; the all-benign pair is never counted.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum LogicalError {
        IX = 0,
        XI = 1,
        XX = 2,
    }

    impl LogicalError {
        pub const ALL: [LogicalError; NUM_ERRORS] =
            [LogicalError::IX, LogicalError::XI, LogicalError::XX];

        /// # Panics
        ///
        /// Panics if `index` is not in `[0, NUM_ERRORS)`.
        pub fn from_index(index: usize) -> Self {
            Self::ALL[index]
        }

        #[inline(always)]
        pub fn index(self) -> usize {
            self as usize
        }

        /// Per-block outcomes `(block A, block B)` for this error.
        #[inline(always)]
        pub fn block_outcomes(self) -> (Outcome, Outcome) {
            let code = self as u8 + 1;
            (Outcome::from_bit(code >> 1 == 1), Outcome::from_bit(code & 1 == 1))
        }

        /// Exchanges the roles of the two blocks: `IX <-> XI`, `XX` fixed.
        pub fn swapped(self) -> Self {
            match self {
                LogicalError::IX => LogicalError::XI,
                LogicalError::XI => LogicalError::IX,
                LogicalError::XX => LogicalError::XX,
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                LogicalError::IX => "IX",
                LogicalError::XI => "XI",
                LogicalError::XX => "XX",
            }
        }
    }

    /// Fault locations of the CNOT exRec, in configuration order.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Location {
        /// Leading EC on block A (CNOT control).
        LecA = 0,
        /// Leading EC on block B (CNOT target).
        LecB = 1,
        /// The transversal CNOT.
        Cnot = 2,
        /// Trailing EC on block A.
        TecA = 3,
        /// Trailing EC on block B.
        TecB = 4,
    }

    impl Location {
        pub const ALL: [Location; NUM_LOCATIONS] = [
            Location::LecA,
            Location::LecB,
            Location::Cnot,
            Location::TecA,
            Location::TecB,
        ];

        #[inline(always)]
        pub fn index(self) -> usize {
            self as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::layout::*;
    use super::syndrome::*;

    #[test]
    fn combined_syndrome_halves() {
        let s = combine(0xABC, 0x123);
        assert_eq!(s, 0xABC123);
        assert_eq!(split_combined(s), (0xABC, 0x123));
        assert_eq!(split_combined(0xFFF_000), (0xFFF, 0));
    }

    #[test]
    fn error_index_skips_all_benign_pair() {
        use Outcome::*;
        assert_eq!(LogicalError::IX.block_outcomes(), (Benign, Malignant));
        assert_eq!(LogicalError::XI.block_outcomes(), (Malignant, Benign));
        assert_eq!(LogicalError::XX.block_outcomes(), (Malignant, Malignant));
    }

    #[test]
    fn ec_bits() {
        let ec = EcConfig::from_index(2);
        assert_eq!(ec.block_a(), TecPresence::Intact);
        assert_eq!(ec.block_b(), TecPresence::Removed);
        assert_eq!(ec.swapped().index(), 1);
        assert_eq!(EcConfig::BOTH_INTACT.swapped(), EcConfig::BOTH_INTACT);
        for ec in EcConfig::ALL {
            assert_eq!(EcConfig::new(ec.block_a(), ec.block_b()), ec);
        }
    }
}
