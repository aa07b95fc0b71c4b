//! Per-frame follow hook: pointer → world → parent-local → target bone.
//!
//! Run [`FollowController::after_world_transforms`] once per frame, after the pose
//! pass has produced world transforms and before rendering. The IK constraint that
//! consumes the written position runs in the engine on its next solve.

use std::sync::Arc;

use serde::Serialize;

use crate::config::FollowConfig;
use crate::error::FollowError;
use crate::geom::{ContainerSize, LocalPoint, WorldPoint};
use crate::ids::BoneId;
use crate::pointer::{PointerCell, PointerInput};
use crate::projector::world_to_local;
use crate::view::{find_bone, find_parent, set_local_position, SkeletonView};
use crate::viewport::{map_to_world, ContentFit, FitMode};

/// Result of one frame hook.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// No pointer position available; the target keeps its previous local position.
    Idle,
    Applied { bone: BoneId, local: LocalPoint },
    /// Expected transient condition; nothing was written this frame.
    Skipped { reason: FollowError },
}

impl FrameOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FrameOutcome::Applied { .. })
    }
}

/// Resolve `bone_name`, project `world` into its parent's frame and write it.
///
/// Hosts that already have world coordinates can call this directly.
pub fn follow_world_target<S: SkeletonView + ?Sized>(
    skeleton: &mut S,
    bone_name: &str,
    world: WorldPoint,
) -> Result<(BoneId, LocalPoint), FollowError> {
    let bone = find_bone(&*skeleton, bone_name)?;
    let parent = find_parent(&*skeleton, bone)?;
    let parent_world = skeleton
        .world_transform(parent)
        .ok_or(FollowError::BoneNotFound)?;
    let local = world_to_local(&parent_world, world)
        .map_err(|_| FollowError::DegenerateTransform { bone: parent })?;
    set_local_position(skeleton, bone, local);
    Ok((bone, local))
}

/// Owns the follow configuration and the pointer cell shared with the UI side.
#[derive(Debug)]
pub struct FollowController<F: ContentFit = FitMode> {
    target_bone: String,
    hold_after_release: bool,
    fit: F,
    pointer: Arc<PointerCell>,
}

impl FollowController<FitMode> {
    pub fn new(cfg: FollowConfig) -> Self {
        Self::with_fit(cfg.target_bone, cfg.hold_after_release, cfg.fit)
    }
}

impl Default for FollowController<FitMode> {
    fn default() -> Self {
        Self::new(FollowConfig::default())
    }
}

impl<F: ContentFit> FollowController<F> {
    /// Build a controller around a custom fit strategy.
    pub fn with_fit(target_bone: impl Into<String>, hold_after_release: bool, fit: F) -> Self {
        Self {
            target_bone: target_bone.into(),
            hold_after_release,
            fit,
            pointer: Arc::new(PointerCell::new()),
        }
    }

    pub fn target_bone(&self) -> &str {
        &self.target_bone
    }

    pub fn fit(&self) -> &F {
        &self.fit
    }

    pub fn set_fit(&mut self, fit: F) {
        self.fit = fit;
    }

    /// Shared last-value cell; the hook reads it every frame.
    pub fn pointer_cell(&self) -> Arc<PointerCell> {
        Arc::clone(&self.pointer)
    }

    /// Handle for the thread that receives drag events.
    pub fn pointer_input(&self) -> PointerInput {
        PointerInput::new(self.pointer_cell(), self.hold_after_release)
    }

    /// Map the latest pointer position and write the target bone, if possible.
    ///
    /// `Ok(None)` means no pointer position is available.
    pub fn try_follow<S: SkeletonView + ?Sized>(
        &self,
        skeleton: &mut S,
        container: ContainerSize,
    ) -> Result<Option<(BoneId, LocalPoint)>, FollowError> {
        let Some(pointer) = self.pointer.load() else {
            return Ok(None);
        };
        let world = map_to_world(pointer, container, &self.fit)?;
        follow_world_target(skeleton, &self.target_bone, world).map(Some)
    }

    /// Frame hook. Never panics and never propagates: skipped frames leave the pose as is.
    pub fn after_world_transforms<S: SkeletonView + ?Sized>(
        &self,
        skeleton: &mut S,
        container: ContainerSize,
    ) -> FrameOutcome {
        match self.try_follow(skeleton, container) {
            Ok(None) => FrameOutcome::Idle,
            Ok(Some((bone, local))) => FrameOutcome::Applied { bone, local },
            Err(reason) => {
                match reason {
                    FollowError::CoordinateUnavailable => {
                        log::trace!("follow skipped: {reason}")
                    }
                    _ => log::debug!("follow '{}' skipped: {reason}", self.target_bone),
                }
                FrameOutcome::Skipped { reason }
            }
        }
    }
}
