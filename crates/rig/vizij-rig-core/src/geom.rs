//! Point types and the 2×3 affine matrix used for bone world transforms.
//!
//! Viewport, world and local coordinates share a representation but are kept as
//! separate types so a pixel offset can never be passed where a world position is
//! expected.

use serde::{Deserialize, Serialize};

macro_rules! point_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub x: f32,
            pub y: f32,
        }

        impl $name {
            #[inline]
            pub const fn new(x: f32, y: f32) -> Self {
                Self { x, y }
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.x.is_finite() && self.y.is_finite()
            }
        }

        impl From<(f32, f32)> for $name {
            fn from((x, y): (f32, f32)) -> Self {
                Self { x, y }
            }
        }
    };
}

point_type!(
    /// Pixel offset inside the display container. Origin top-left, Y grows downward.
    ViewportPoint
);
point_type!(
    /// Position in the skeleton's world space. Y grows upward.
    WorldPoint
);
point_type!(
    /// Position in a bone's local frame (the frame its children's x/y live in).
    LocalPoint
);

/// Size of the display container in pixels. Zero until the host's first layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True once layout has produced a usable, non-empty size.
    #[inline]
    pub fn is_known(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 2×3 affine matrix `[a b tx; c d ty]`.
///
/// Columns `(a, c)` and `(b, d)` are the frame's X and Y axes expressed in world
/// space; `(tx, ty)` is the frame's origin in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn from_translation(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Counter-clockwise rotation in degrees.
    pub fn from_rotation(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self {
            a: c,
            b: -s,
            c: s,
            d: c,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Build a local bone matrix from its transform components.
    ///
    /// Shear is applied per axis: the X axis is rotated by `rotation + shear_x`,
    /// the Y axis by `rotation + 90 + shear_y`, then each axis is scaled.
    pub fn from_local(
        x: f32,
        y: f32,
        rotation: f32,
        scale_x: f32,
        scale_y: f32,
        shear_x: f32,
        shear_y: f32,
    ) -> Self {
        let (sin_x, cos_x) = (rotation + shear_x).to_radians().sin_cos();
        let (sin_y, cos_y) = (rotation + 90.0 + shear_y).to_radians().sin_cos();
        Self {
            a: cos_x * scale_x,
            b: cos_y * scale_y,
            c: sin_x * scale_x,
            d: sin_y * scale_y,
            tx: x,
            ty: y,
        }
    }

    /// `self ∘ local`: express a child frame given in `self`'s local space in world space.
    pub fn compose(&self, local: &Affine2) -> Affine2 {
        Affine2 {
            a: self.a * local.a + self.b * local.c,
            b: self.a * local.b + self.b * local.d,
            c: self.c * local.a + self.d * local.c,
            d: self.c * local.b + self.d * local.d,
            tx: self.a * local.tx + self.b * local.ty + self.tx,
            ty: self.c * local.tx + self.d * local.ty + self.ty,
        }
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Apply the matrix to a point.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }

    /// Full inverse, or `None` when an axis has collapsed (zero or non-finite determinant)
    /// or an inverse entry does not fit in `f32`.
    ///
    /// Computed in `f64` so very large or very small scales stay invertible.
    pub fn inverse(&self) -> Option<Affine2> {
        let (a, b, c, d) = (self.a as f64, self.b as f64, self.c as f64, self.d as f64);
        let (tx, ty) = (self.tx as f64, self.ty as f64);
        let det = a * d - b * c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);
        let out = Affine2 {
            a: ia as f32,
            b: ib as f32,
            c: ic as f32,
            d: id as f32,
            tx: (-(ia * tx + ib * ty)) as f32,
            ty: (-(ic * tx + id * ty)) as f32,
        };
        out.is_finite().then_some(out)
    }

    /// World rotation of the X axis in degrees.
    pub fn rotation_x(&self) -> f32 {
        self.c.atan2(self.a).to_degrees()
    }

    /// Length of the X and Y axes.
    pub fn scale(&self) -> (f32, f32) {
        (
            (self.a * self.a + self.c * self.c).sqrt(),
            (self.b * self.b + self.d * self.d).sqrt(),
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }
}
