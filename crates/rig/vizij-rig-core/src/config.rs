//! Configuration for the follow controller.

use serde::{Deserialize, Serialize};

use crate::viewport::FitMode;

/// Follow configuration. Every field has a default so hosts can pass partial JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Bone whose local position tracks the pointer.
    pub target_bone: String,
    /// How the viewer places the skeleton inside its container.
    pub fit: FitMode,
    /// Keep the last target after the drag ends instead of clearing it.
    pub hold_after_release: bool,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            target_bone: "crosshair".to_string(),
            fit: FitMode::Identity,
            hold_after_release: false,
        }
    }
}
