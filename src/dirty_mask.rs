/// Bit-per-field mask recording which of an entity's synchronized fields
/// changed since the last send.
///
/// Bit positions follow the class schema's field order, and the byte length
/// comes from the schema's `fields_flags_size`. The mask itself is pure bit
/// storage; producing and transmitting it is the delta engine's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyMask {
    mask: Vec<u8>,
}

impl DirtyMask {
    /// Create a cleared mask of the given byte length
    pub fn with_len(bytes: usize) -> Self {
        Self {
            mask: vec![0; bytes],
        }
    }

    /// Create a cleared mask sized for the given number of fields
    pub fn for_field_count(field_count: usize) -> Self {
        let bytes = if field_count > 0 {
            (field_count - 1) / 8 + 1
        } else {
            0
        };
        Self::with_len(bytes)
    }

    /// The bit at the given field index, or `None` past the end
    pub fn bit(&self, index: usize) -> Option<bool> {
        let byte = self.mask.get(index / 8)?;
        Some(byte & (1 << (index % 8)) != 0)
    }

    /// Set or clear the bit at the given field index. Out-of-range indices
    /// are ignored
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if let Some(byte) = self.mask.get_mut(index / 8) {
            let bit = 1 << (index % 8);
            if value {
                *byte |= bit;
            } else {
                *byte &= !bit;
            }
        }
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.mask.fill(0);
    }

    /// Whether no bit is set
    pub fn is_clear(&self) -> bool {
        self.mask.iter().all(|byte| *byte == 0)
    }

    /// Byte length of the mask
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// The byte at the given index
    pub fn byte(&self, index: usize) -> u8 {
        self.mask[index]
    }

    /// OR another mask into this one. Masks of different lengths are left
    /// untouched
    pub fn or(&mut self, other: &DirtyMask) {
        if other.len() != self.len() {
            return;
        }
        for (byte, other_byte) in self.mask.iter_mut().zip(other.mask.iter()) {
            *byte |= other_byte;
        }
    }

    /// Clear every bit that is set in the other mask. Masks of different
    /// lengths are left untouched
    pub fn and_not(&mut self, other: &DirtyMask) {
        if other.len() != self.len() {
            return;
        }
        for (byte, other_byte) in self.mask.iter_mut().zip(other.mask.iter()) {
            *byte &= !other_byte;
        }
    }

    /// Overwrite this mask's contents with another's. Masks of different
    /// lengths are left untouched
    pub fn copy_from(&mut self, other: &DirtyMask) {
        if other.len() != self.len() {
            return;
        }
        self.mask.copy_from_slice(&other.mask);
    }
}

#[cfg(test)]
mod tests {
    use super::DirtyMask;

    #[test]
    fn get_set() {
        let mut mask = DirtyMask::with_len(2);

        mask.set_bit(0, true);
        mask.set_bit(4, true);
        mask.set_bit(11, true);
        mask.set_bit(4, false);

        assert_eq!(mask.bit(0), Some(true));
        assert_eq!(mask.bit(4), Some(false));
        assert_eq!(mask.bit(11), Some(true));
        assert_eq!(mask.bit(12), Some(false));
        assert_eq!(mask.bit(16), None);
    }

    #[test]
    fn clear_and_is_clear() {
        let mut mask = DirtyMask::with_len(2);
        assert!(mask.is_clear());

        mask.set_bit(9, true);
        assert!(!mask.is_clear());

        mask.clear();
        assert!(mask.is_clear());
    }

    #[test]
    fn for_field_count_sizing() {
        assert_eq!(DirtyMask::for_field_count(0).len(), 0);
        assert_eq!(DirtyMask::for_field_count(1).len(), 1);
        assert_eq!(DirtyMask::for_field_count(8).len(), 1);
        assert_eq!(DirtyMask::for_field_count(9).len(), 2);
        assert_eq!(DirtyMask::for_field_count(64).len(), 8);
        assert_eq!(DirtyMask::for_field_count(65).len(), 9);
    }

    #[test]
    fn or_merges_bits() {
        let mut a = DirtyMask::with_len(2);
        a.set_bit(1, true);
        a.set_bit(9, true);

        let mut b = DirtyMask::with_len(2);
        b.set_bit(2, true);
        b.set_bit(9, true);

        a.or(&b);

        assert_eq!(a.bit(1), Some(true));
        assert_eq!(a.bit(2), Some(true));
        assert_eq!(a.bit(9), Some(true));
        assert_eq!(a.bit(3), Some(false));
    }

    #[test]
    fn and_not_strips_sent_bits() {
        let mut pending = DirtyMask::with_len(1);
        pending.set_bit(1, true);
        pending.set_bit(2, true);

        let mut sent = DirtyMask::with_len(1);
        sent.set_bit(1, true);

        pending.and_not(&sent);

        assert_eq!(pending.bit(1), Some(false));
        assert_eq!(pending.bit(2), Some(true));
    }

    #[test]
    fn mismatched_lengths_do_nothing() {
        let mut a = DirtyMask::with_len(1);
        a.set_bit(0, true);

        let b = DirtyMask::with_len(2);
        a.or(&b);
        a.and_not(&b);
        a.copy_from(&b);

        assert_eq!(a.bit(0), Some(true));
        assert_eq!(a.len(), 1);
    }
}
