//! Engine seam: read access to the current frame's bone hierarchy and the single
//! write this crate performs (a bone's local position).
//!
//! Adapters implement [`SkeletonView`] over whatever pose storage their engine uses.
//! [`Skeleton`](crate::skeleton::Skeleton) is the built-in implementation.

use crate::error::FollowError;
use crate::geom::{Affine2, LocalPoint};
use crate::ids::BoneId;

/// Per-frame handle to a skeleton whose world transforms are up to date.
///
/// Borrow it only for the duration of one frame hook; world transforms are
/// recomputed every frame and must not be cached.
pub trait SkeletonView {
    fn find_bone(&self, name: &str) -> Option<BoneId>;
    fn parent(&self, bone: BoneId) -> Option<BoneId>;
    /// Current world matrix of `bone`, or `None` for an id this skeleton does not know.
    fn world_transform(&self, bone: BoneId) -> Option<Affine2>;
    /// Overwrite the bone's local x/y. Rotation, scale and shear are left alone.
    fn set_local_position(&mut self, bone: BoneId, local: LocalPoint);
}

/// Look up a bone by name.
pub fn find_bone<S: SkeletonView + ?Sized>(
    skeleton: &S,
    name: &str,
) -> Result<BoneId, FollowError> {
    skeleton.find_bone(name).ok_or(FollowError::BoneNotFound)
}

/// Parent of `bone`; root bones yield [`FollowError::NoParentBone`].
pub fn find_parent<S: SkeletonView + ?Sized>(
    skeleton: &S,
    bone: BoneId,
) -> Result<BoneId, FollowError> {
    skeleton.parent(bone).ok_or(FollowError::NoParentBone { bone })
}

/// Write the target's local position. The caller has already resolved `bone`.
pub fn set_local_position<S: SkeletonView + ?Sized>(
    skeleton: &mut S,
    bone: BoneId,
    local: LocalPoint,
) {
    skeleton.set_local_position(bone, local);
}
