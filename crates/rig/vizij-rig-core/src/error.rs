//! Error types for the follow pipeline and rig loading.

use serde::Serialize;
use thiserror::Error;

use crate::ids::BoneId;

/// Reasons a frame's target write was skipped.
///
/// Every variant is an expected, recoverable condition. The per-frame hook turns
/// them into [`FrameOutcome::Skipped`](crate::follow::FrameOutcome) and the pose is
/// left untouched. Variants carry no heap data so the hot path stays allocation-free.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowError {
    /// Container size is zero or unknown, or the content bounds are empty.
    #[error("viewport coordinates unavailable: container or content size not known yet")]
    CoordinateUnavailable,
    #[error("target bone not found in skeleton")]
    BoneNotFound,
    #[error("bone {bone:?} is a root bone and has no parent frame")]
    NoParentBone { bone: BoneId },
    /// The world matrix of parent `bone` cannot be inverted (a scale axis collapsed to zero).
    #[error("world transform of parent bone {bone:?} is not invertible")]
    DegenerateTransform { bone: BoneId },
}

/// A world matrix with no usable inverse: a scale axis collapsed to zero, or the
/// projected point overflowed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("transform is not invertible")]
pub struct SingularTransform;

/// Errors produced while parsing or validating a rig description.
#[derive(Debug, Error)]
pub enum RigDataError {
    #[error("rig json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bone at index {index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate bone name '{name}'")]
    DuplicateBone { name: String },
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },
    #[error("bone '{bone}' is listed before its parent '{parent}'")]
    ParentAfterChild { bone: String, parent: String },
}
