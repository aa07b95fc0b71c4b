//! Vizij Rig Core (engine-agnostic)
//!
//! Pointer-driven IK target following for 2D skeletal rigs. Once per frame, after the
//! pose pass has computed world transforms, the latest pointer position (viewport
//! pixels) is mapped into skeleton world space, projected into the local frame of the
//! target bone's parent and written into the target bone's local position. The
//! engine's IK constraint consumes that position on its next solve.
//!
//! Adapters (wasm, engine integrations) implement [`SkeletonView`] and drive
//! [`FollowController::after_world_transforms`] from their frame loop; the built-in
//! [`Skeleton`] covers hosts without their own pose storage.

pub mod config;
pub mod data;
pub mod error;
pub mod follow;
pub mod geom;
pub mod ids;
pub mod pointer;
pub mod projector;
pub mod skeleton;
pub mod view;
pub mod viewport;

// Re-exports for consumers (adapters)
pub use config::FollowConfig;
pub use data::{parse_skeleton_json, BoneData, Inherit, SkeletonData};
pub use error::{FollowError, RigDataError, SingularTransform};
pub use follow::{follow_world_target, FollowController, FrameOutcome};
pub use geom::{Affine2, ContainerSize, LocalPoint, ViewportPoint, WorldPoint};
pub use ids::BoneId;
pub use pointer::{PointerCell, PointerEvent, PointerInput};
pub use projector::{local_to_world, world_to_local};
pub use skeleton::{Bone, Skeleton};
pub use view::{find_bone, find_parent, set_local_position, SkeletonView};
pub use viewport::{
    map_to_viewport, map_to_world, Alignment, ContentBounds, ContentFit, Fit, FitMode, Placement,
};
