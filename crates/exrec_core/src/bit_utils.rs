pub struct BitPack;

impl BitPack {
    #[inline(always)]
    pub fn get(storage: &[u64], index: usize) -> bool {
        let word = storage[index / 64];
        let bit = index % 64;
        (word >> bit) & 1 == 1
    }

    #[inline(always)]
    pub fn set(storage: &mut [u64], index: usize, val: bool) {
        let word_idx = index / 64;
        let bit_idx = index % 64;
        if val {
            storage[word_idx] |= 1 << bit_idx;
        } else {
            storage[word_idx] &= !(1 << bit_idx);
        }
    }

    /// Number of set bits across all words.
    pub fn count_ones(storage: &[u64]) -> usize {
        storage.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::BitPack;

    #[test]
    fn set_and_get_across_words() {
        let mut words = [0u64; 2];
        BitPack::set(&mut words, 3, true);
        BitPack::set(&mut words, 64, true);
        BitPack::set(&mut words, 127, true);
        assert!(BitPack::get(&words, 3));
        assert!(BitPack::get(&words, 64));
        assert!(!BitPack::get(&words, 65));
        assert_eq!(BitPack::count_ones(&words), 3);

        BitPack::set(&mut words, 64, false);
        assert!(!BitPack::get(&words, 64));
        assert_eq!(words[1], 1 << 63);
    }
}
