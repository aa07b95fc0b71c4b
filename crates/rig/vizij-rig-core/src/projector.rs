//! World ↔ local conversion against a parent bone's world matrix.

use crate::error::SingularTransform;
use crate::geom::{Affine2, LocalPoint, WorldPoint};

/// Express `point` in the local frame of the bone whose world matrix is `parent_world`.
///
/// This is the frame the parent's children store their `x`/`y` in, so the result can
/// be written straight into a child bone's local position.
pub fn world_to_local(
    parent_world: &Affine2,
    point: WorldPoint,
) -> Result<LocalPoint, SingularTransform> {
    let inverse = parent_world.inverse().ok_or(SingularTransform)?;
    let (x, y) = inverse.transform_point(point.x, point.y);
    let local = LocalPoint::new(x, y);
    // A near-singular matrix can still overflow.
    if !local.is_finite() {
        return Err(SingularTransform);
    }
    Ok(local)
}

/// Inverse of [`world_to_local`].
pub fn local_to_world(parent_world: &Affine2, local: LocalPoint) -> WorldPoint {
    let (x, y) = parent_world.transform_point(local.x, local.y);
    WorldPoint::new(x, y)
}
