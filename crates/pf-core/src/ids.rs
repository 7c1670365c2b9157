//! Stable identifiers for registry slots.

use core::fmt;
use core::num::NonZeroU32;

/// Opaque handle to one slot of a registry.
///
/// The registry hands ids out densely from zero; the raw value is stored
/// as index + 1 so that `Option<Id>` is the same size as `Id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Handle for the 0-based slot `index`.
    pub fn from_index(index: u32) -> Self {
        // index + 1 cannot be zero for any index a registry hands out
        Self(NonZeroU32::new(index + 1).expect("registry slot index overflow"))
    }

    /// The 0-based slot index behind this handle.
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

/// Identifies one variable of a registry.
pub type VarId = Id;
