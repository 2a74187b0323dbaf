use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier for objects in a flow graph.
///
/// Stored as index+1 so that `Option<Id>` stays the size of `Id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index.
    ///
    /// Returns `None` only for `u32::MAX`, which has no room for the offset.
    pub fn try_from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Create an Id from a 0-based index.
    ///
    /// Panics on `u32::MAX`; graphs in this domain never get near that size.
    pub fn from_index(index: u32) -> Self {
        Self::try_from_index(index).expect("segment index overflow")
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

pub type SegmentId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 7, 250, 65_535] {
            assert_eq!(Id::from_index(i).index(), i);
        }
    }

    #[test]
    fn max_index_has_no_id() {
        assert!(Id::try_from_index(u32::MAX).is_none());
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn ids_order_by_index() {
        let mut ids = vec![Id::from_index(3), Id::from_index(0), Id::from_index(2)];
        ids.sort();
        let idx: Vec<u32> = ids.into_iter().map(Id::index).collect();
        assert_eq!(idx, vec![0, 2, 3]);
    }
}
