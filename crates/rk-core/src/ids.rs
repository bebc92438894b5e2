use core::fmt;
use core::num::NonZeroU32;

/// Handle of a thermal component inside a registry.
///
/// The slot is both the component's position in the registry and the index
/// of its temperature in the state vector. Stored as slot + 1 so that
/// `Option<CompId>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompId(NonZeroU32);

impl CompId {
    pub fn from_slot(slot: usize) -> Self {
        let raw = u32::try_from(slot).unwrap_or(u32::MAX);
        Self(NonZeroU32::MIN.saturating_add(raw))
    }

    pub fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompId({})", self.slot())
    }
}

impl fmt::Display for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.slot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trip() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            assert_eq!(CompId::from_slot(i).slot(), i);
        }
        assert_eq!(CompId::from_slot(3).to_string(), "#3");
    }

    #[test]
    fn option_is_free() {
        assert_eq!(
            core::mem::size_of::<CompId>(),
            core::mem::size_of::<Option<CompId>>()
        );
    }
}
