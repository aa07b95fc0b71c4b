//! Identifiers for runtime bones.

use serde::{Deserialize, Serialize};

/// Dense index of a bone inside a [`Skeleton`](crate::skeleton::Skeleton).
/// Bones are stored parent-first, so a parent's id is always lower than its children's.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
