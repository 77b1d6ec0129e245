use std::fmt;

use crate::NodeKind;

const SIZE: usize = 3;

/// A constant-constructible set of node kinds.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct KindSet {
    bits: [u64; SIZE],
}

impl KindSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn from_kind(kind: NodeKind) -> Self {
        let kind = kind as u16;

        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(
            slot_index < Self::EMPTY.bits.len(),
            "Index out of bounds. Increase the size of the bitset array."
        );

        let bit_index = kind % Self::BITS_PER_SLOT;
        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = 1 << bit_index;

        Self { bits }
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn new<const N: usize>(kinds: [NodeKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(&Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn contains(&self, kind: NodeKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let bit_index = kind % Self::BITS_PER_SLOT;

        self.bits[slot_index] & (1 << bit_index) != 0
    }

    pub const fn is_empty(&self) -> bool {
        let mut i = 0;
        while i < self.bits.len() {
            if self.bits[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn iter(self) -> impl Iterator<Item = NodeKind> {
        NodeKind::ALL.iter().copied().filter(move |&kind| self.contains(kind))
    }
}

impl From<NodeKind> for KindSet {
    fn from(kind: NodeKind) -> Self {
        Self::from_kind(kind)
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_fits() {
        let all = NodeKind::ALL.iter().fold(KindSet::EMPTY, |set, &kind| set.union(&kind.into()));
        assert_eq!(all.iter().count(), NodeKind::ALL.len());
    }

    #[test]
    fn membership() {
        const ASSIGNS: KindSet =
            KindSet::new([NodeKind::Assign, NodeKind::AssignRef, NodeKind::AssignList]);

        assert!(ASSIGNS.contains(NodeKind::AssignRef));
        assert!(!ASSIGNS.contains(NodeKind::Variable));
        assert!(KindSet::EMPTY.is_empty());
        assert_eq!(format!("{ASSIGNS:?}"), "{Assign, AssignList, AssignRef}");
    }
}
