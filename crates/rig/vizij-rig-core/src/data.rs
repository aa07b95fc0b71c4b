//! Rig description loaded from JSON: bone hierarchy plus setup-pose transforms.
//!
//! This is the crate's own compact schema (field names in snake_case, with the
//! camelCase spellings accepted as aliases). It only carries what the pose pass needs.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::RigDataError;

/// How a bone inherits its parent's world transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inherit {
    /// Full parent transform: translation, rotation, scale and shear.
    #[default]
    Normal,
    /// Parent only positions the bone; rotation and scale are the bone's own.
    OnlyTranslation,
    /// Parent scale is inherited but its rotation and reflection are not.
    NoRotationOrReflection,
}

fn one() -> f32 {
    1.0
}

/// Setup-pose data for a single bone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneData {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Degrees, counter-clockwise.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "one", alias = "scaleX")]
    pub scale_x: f32,
    #[serde(default = "one", alias = "scaleY")]
    pub scale_y: f32,
    #[serde(default, alias = "shearX")]
    pub shear_x: f32,
    #[serde(default, alias = "shearY")]
    pub shear_y: f32,
    #[serde(default)]
    pub inherit: Inherit,
}

impl BoneData {
    /// A bone at the origin with identity transform.
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            shear_x: 0.0,
            shear_y: 0.0,
            inherit: Inherit::Normal,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_inherit(mut self, inherit: Inherit) -> Self {
        self.inherit = inherit;
        self
    }
}

/// A skeleton's bone hierarchy. Bones must be listed parent-first.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SkeletonData {
    #[serde(default)]
    pub name: String,
    pub bones: Vec<BoneData>,
}

impl SkeletonData {
    /// Validate naming and ordering: unique non-empty names, and every parent
    /// present and listed before its children.
    pub fn validate_basic(&self) -> Result<(), RigDataError> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(self.bones.len());
        for (index, bone) in self.bones.iter().enumerate() {
            if bone.name.is_empty() {
                return Err(RigDataError::EmptyName { index });
            }
            if let Some(parent) = bone.parent.as_deref() {
                if !seen.contains_key(parent) {
                    let listed_later = self.bones[index..].iter().any(|b| b.name == parent);
                    return Err(if listed_later {
                        RigDataError::ParentAfterChild {
                            bone: bone.name.clone(),
                            parent: parent.to_string(),
                        }
                    } else {
                        RigDataError::UnknownParent {
                            bone: bone.name.clone(),
                            parent: parent.to_string(),
                        }
                    });
                }
            }
            if seen.insert(bone.name.as_str(), index).is_some() {
                return Err(RigDataError::DuplicateBone {
                    name: bone.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse and validate a rig description.
pub fn parse_skeleton_json(json: &str) -> Result<SkeletonData, RigDataError> {
    let data: SkeletonData = serde_json::from_str(json)?;
    data.validate_basic()?;
    log::debug!("parsed rig '{}' with {} bones", data.name, data.bones.len());
    Ok(data)
}
