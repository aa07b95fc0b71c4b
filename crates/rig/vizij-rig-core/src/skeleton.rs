//! Runtime skeleton: per-bone local transforms and the world-transform pass.

use hashbrown::HashMap;

use crate::data::{BoneData, Inherit, SkeletonData};
use crate::error::RigDataError;
use crate::geom::{Affine2, LocalPoint};
use crate::ids::BoneId;
use crate::view::SkeletonView;

/// A bone's current local transform and its derived world matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    pub parent: Option<BoneId>,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub shear_x: f32,
    pub shear_y: f32,
    pub inherit: Inherit,
    /// Written by [`Skeleton::update_world_transforms`].
    pub world: Affine2,
}

impl Bone {
    fn new(id: BoneId, parent: Option<BoneId>, data: &BoneData) -> Self {
        let mut bone = Self {
            id,
            name: data.name.clone(),
            parent,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            shear_x: 0.0,
            shear_y: 0.0,
            inherit: data.inherit,
            world: Affine2::IDENTITY,
        };
        bone.set_to_setup_pose(data);
        bone
    }

    fn set_to_setup_pose(&mut self, data: &BoneData) {
        self.x = data.x;
        self.y = data.y;
        self.rotation = data.rotation;
        self.scale_x = data.scale_x;
        self.scale_y = data.scale_y;
        self.shear_x = data.shear_x;
        self.shear_y = data.shear_y;
        self.inherit = data.inherit;
    }

    /// Local matrix relative to the parent frame.
    pub fn local_matrix(&self) -> Affine2 {
        Affine2::from_local(
            self.x,
            self.y,
            self.rotation,
            self.scale_x,
            self.scale_y,
            self.shear_x,
            self.shear_y,
        )
    }

    pub fn world_position(&self) -> (f32, f32) {
        (self.world.tx, self.world.ty)
    }
}

/// Bone hierarchy with a placement (`x`, `y`, `scale_x`, `scale_y`) in world space.
#[derive(Clone, Debug)]
pub struct Skeleton {
    data: SkeletonData,
    bones: Vec<Bone>,
    index: HashMap<String, BoneId>,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Skeleton {
    /// Build a skeleton in its setup pose. World transforms are not computed until
    /// [`update_world_transforms`](Self::update_world_transforms) runs.
    pub fn new(data: SkeletonData) -> Result<Self, RigDataError> {
        data.validate_basic()?;
        let mut index: HashMap<String, BoneId> = HashMap::with_capacity(data.bones.len());
        let mut bones = Vec::with_capacity(data.bones.len());
        for (i, bone_data) in data.bones.iter().enumerate() {
            let id = BoneId(i as u32);
            // validate_basic guarantees parents precede children.
            let parent = bone_data
                .parent
                .as_deref()
                .and_then(|p| index.get(p).copied());
            bones.push(Bone::new(id, parent, bone_data));
            index.insert(bone_data.name.clone(), id);
        }
        Ok(Self {
            data,
            bones,
            index,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        })
    }

    pub fn data(&self) -> &SkeletonData {
        &self.data
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.index.get(name).copied()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id.index())
    }

    pub fn bone_named(&self, name: &str) -> Option<&Bone> {
        self.find(name).and_then(|id| self.bone(id))
    }

    pub fn root(&self) -> Option<&Bone> {
        self.bones.first()
    }

    /// Restore every bone's local transform from the rig data.
    pub fn set_to_setup_pose(&mut self) {
        for (bone, data) in self.bones.iter_mut().zip(self.data.bones.iter()) {
            bone.set_to_setup_pose(data);
        }
    }

    /// Recompute world matrices parent-first.
    pub fn update_world_transforms(&mut self) {
        let placement = Affine2 {
            a: self.scale_x,
            b: 0.0,
            c: 0.0,
            d: self.scale_y,
            tx: self.x,
            ty: self.y,
        };
        for i in 0..self.bones.len() {
            let parent_world = self.bones[i].parent.map(|p| self.bones[p.index()].world);
            let bone = &self.bones[i];
            let world = match parent_world {
                None => placement.compose(&bone.local_matrix()),
                Some(parent) => self.inherit_world(bone, &parent),
            };
            self.bones[i].world = world;
        }
    }

    fn inherit_world(&self, bone: &Bone, parent: &Affine2) -> Affine2 {
        let (tx, ty) = parent.transform_point(bone.x, bone.y);
        let linear = match bone.inherit {
            Inherit::Normal => return parent.compose(&bone.local_matrix()),
            Inherit::OnlyTranslation => Affine2::from_local(
                0.0,
                0.0,
                bone.rotation,
                bone.scale_x,
                bone.scale_y,
                bone.shear_x,
                bone.shear_y,
            ),
            Inherit::NoRotationOrReflection => self.strip_parent_rotation(bone, parent),
        };
        Affine2 {
            a: linear.a * self.scale_x,
            b: linear.b * self.scale_x,
            c: linear.c * self.scale_y,
            d: linear.d * self.scale_y,
            tx,
            ty,
        }
    }

    /// Keep the parent's scale magnitude, drop its rotation and any reflection.
    /// Returns the linear part before the skeleton placement scale is applied.
    fn strip_parent_rotation(&self, bone: &Bone, parent: &Affine2) -> Affine2 {
        let (mut pa, mut pb, mut pc, mut pd) = (parent.a, parent.b, parent.c, parent.d);
        let len_sq = pa * pa + pc * pc;
        let parent_rotation = if len_sq > 0.0001 {
            let s = (pa * pd - pb * pc).abs() / len_sq;
            pa /= self.scale_x;
            pc /= self.scale_y;
            pb = pc * s;
            pd = pa * s;
            pc.atan2(pa).to_degrees()
        } else {
            pa = 0.0;
            pc = 0.0;
            90.0 - pd.atan2(pb).to_degrees()
        };
        let local = Affine2::from_local(
            0.0,
            0.0,
            bone.rotation - parent_rotation,
            bone.scale_x,
            bone.scale_y,
            bone.shear_x,
            bone.shear_y,
        );
        Affine2 {
            a: pa * local.a - pb * local.c,
            b: pa * local.b - pb * local.d,
            c: pc * local.a + pd * local.c,
            d: pc * local.b + pd * local.d,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl SkeletonView for Skeleton {
    fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.find(name)
    }

    fn parent(&self, bone: BoneId) -> Option<BoneId> {
        self.bone(bone).and_then(|b| b.parent)
    }

    fn world_transform(&self, bone: BoneId) -> Option<Affine2> {
        self.bone(bone).map(|b| b.world)
    }

    fn set_local_position(&mut self, bone: BoneId, local: LocalPoint) {
        if let Some(b) = self.bone_mut(bone) {
            b.x = local.x;
            b.y = local.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-3, "left={a} right={b}");
    }

    fn arm_rig() -> Skeleton {
        Skeleton::new(SkeletonData {
            name: "arm".into(),
            bones: vec![
                BoneData::new("root", None),
                BoneData::new("shoulder", Some("root"))
                    .with_position(10.0, 0.0)
                    .with_rotation(90.0),
                BoneData::new("hand", Some("shoulder")).with_position(5.0, 0.0),
            ],
        })
        .expect("valid rig")
    }

    #[test]
    fn normal_inheritance_chains_transforms() {
        let mut skel = arm_rig();
        skel.update_world_transforms();
        let hand = skel.bone_named("hand").expect("hand");
        let (x, y) = hand.world_position();
        approx(x, 10.0);
        approx(y, 5.0);
        approx(hand.world.rotation_x(), 90.0);
    }

    #[test]
    fn skeleton_placement_offsets_and_scales_root() {
        let mut skel = arm_rig();
        skel.x = 100.0;
        skel.y = -20.0;
        skel.scale_x = 2.0;
        skel.update_world_transforms();
        let (x, y) = skel.bone_named("hand").expect("hand").world_position();
        approx(x, 120.0);
        approx(y, -15.0);
    }

    #[test]
    fn only_translation_ignores_parent_rotation() {
        let mut data = arm_rig().data().clone();
        data.bones[2].inherit = Inherit::OnlyTranslation;
        let mut skel = Skeleton::new(data).expect("valid rig");
        skel.update_world_transforms();
        let hand = skel.bone_named("hand").expect("hand");
        approx(hand.world.rotation_x(), 0.0);
        let (x, y) = hand.world_position();
        approx(x, 10.0);
        approx(y, 5.0);
    }

    #[test]
    fn no_rotation_keeps_parent_scale() {
        let mut data = arm_rig().data().clone();
        data.bones[1].scale_x = 2.0;
        data.bones[1].scale_y = 2.0;
        data.bones[2].inherit = Inherit::NoRotationOrReflection;
        let mut skel = Skeleton::new(data).expect("valid rig");
        skel.update_world_transforms();
        let hand = skel.bone_named("hand").expect("hand");
        approx(hand.world.rotation_x(), 0.0);
        let (sx, sy) = hand.world.scale();
        approx(sx, 2.0);
        approx(sy, 2.0);
    }

    #[test]
    fn setup_pose_restores_locals() {
        let mut skel = arm_rig();
        let hand = skel.find("hand").expect("hand");
        skel.set_local_position(hand, LocalPoint::new(-1.0, 7.0));
        assert_eq!(skel.bone(hand).map(|b| (b.x, b.y)), Some((-1.0, 7.0)));
        skel.set_to_setup_pose();
        assert_eq!(skel.bone(hand).map(|b| (b.x, b.y)), Some((5.0, 0.0)));
    }

    #[test]
    fn view_reports_parents() {
        let skel = arm_rig();
        let hand = skel.find_bone("hand").expect("hand");
        assert_eq!(SkeletonView::parent(&skel, hand), skel.find("shoulder"));
        assert_eq!(SkeletonView::parent(&skel, BoneId(0)), None);
        assert!(skel.world_transform(BoneId(42)).is_none());
    }
}
