//! Viewport → skeleton world mapping.
//!
//! Hosts report pointer positions in container pixels (origin top-left, Y down). The
//! viewer draws the skeleton by placing its content bounds inside the container with a
//! scale and an anchor; mapping back means flipping Y and undoing that placement.
//! The placement rule is a strategy ([`ContentFit`]) so hosts whose viewer uses a
//! different fit formula can plug their own.

use serde::{Deserialize, Serialize};

use crate::error::FollowError;
use crate::geom::{ContainerSize, ViewportPoint, WorldPoint};

/// Anchor shared by the content bounds and the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Alignment {
    /// Anchor as factors in `[-1, 1]`: `-1` is left/bottom, `1` is right/top (Y up).
    pub fn factors(self) -> (f32, f32) {
        match self {
            Alignment::TopLeft => (-1.0, 1.0),
            Alignment::TopCenter => (0.0, 1.0),
            Alignment::TopRight => (1.0, 1.0),
            Alignment::CenterLeft => (-1.0, 0.0),
            Alignment::Center => (0.0, 0.0),
            Alignment::CenterRight => (1.0, 0.0),
            Alignment::BottomLeft => (-1.0, -1.0),
            Alignment::BottomCenter => (0.0, -1.0),
            Alignment::BottomRight => (1.0, -1.0),
        }
    }
}

/// How content bounds are scaled into the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fit {
    /// Uniform scale so the whole content is visible.
    #[default]
    Contain,
    /// Uniform scale so the content covers the container.
    Cover,
    /// Independent X/Y scale, content stretched to the container.
    Fill,
    FitWidth,
    FitHeight,
    /// Natural size, one world unit per pixel.
    None,
    /// Like `Contain` but never enlarges.
    ScaleDown,
}

impl Fit {
    /// Per-axis scale (pixels per world unit) for content of `bounds` in `container`.
    pub fn scale(self, container: ContainerSize, bounds: &ContentBounds) -> (f32, f32) {
        let sx = container.width / bounds.width;
        let sy = container.height / bounds.height;
        match self {
            Fit::Contain => uniform(sx.min(sy)),
            Fit::Cover => uniform(sx.max(sy)),
            Fit::Fill => (sx, sy),
            Fit::FitWidth => uniform(sx),
            Fit::FitHeight => uniform(sy),
            Fit::None => uniform(1.0),
            Fit::ScaleDown => uniform(sx.min(sy).min(1.0)),
        }
    }
}

fn uniform(s: f32) -> (f32, f32) {
    (s, s)
}

/// Natural extent of the animated content in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ContentBounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    fn anchor(&self, alignment: Alignment) -> WorldPoint {
        let (fx, fy) = alignment.factors();
        WorldPoint::new(
            self.x + self.width * 0.5 * (1.0 + fx),
            self.y + self.height * 0.5 * (1.0 + fy),
        )
    }
}

/// Resolved placement for one container size: `content_anchor` lands on
/// `container_anchor` (Y-up pixels) and world units scale by `scale_x`/`scale_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub scale_x: f32,
    pub scale_y: f32,
    pub container_anchor: (f32, f32),
    pub content_anchor: WorldPoint,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        scale_x: 1.0,
        scale_y: 1.0,
        container_anchor: (0.0, 0.0),
        content_anchor: WorldPoint::new(0.0, 0.0),
    };

    fn is_usable(&self) -> bool {
        self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.scale_x != 0.0
            && self.scale_y != 0.0
            && self.container_anchor.0.is_finite()
            && self.container_anchor.1.is_finite()
            && self.content_anchor.is_finite()
    }

    /// Y-up container pixels → world.
    pub fn container_to_world(&self, x: f32, y_up: f32) -> WorldPoint {
        WorldPoint::new(
            self.content_anchor.x + (x - self.container_anchor.0) / self.scale_x,
            self.content_anchor.y + (y_up - self.container_anchor.1) / self.scale_y,
        )
    }

    /// World → Y-up container pixels.
    pub fn world_to_container(&self, world: WorldPoint) -> (f32, f32) {
        (
            self.container_anchor.0 + (world.x - self.content_anchor.x) * self.scale_x,
            self.container_anchor.1 + (world.y - self.content_anchor.y) * self.scale_y,
        )
    }
}

/// Strategy describing where the viewer draws content inside a container.
pub trait ContentFit {
    /// `None` when no placement exists yet (for example, empty content bounds).
    fn placement(&self, container: ContainerSize) -> Option<Placement>;
}

/// Built-in fit strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FitMode {
    /// One world unit per pixel, world origin at the container's bottom-left.
    #[default]
    Identity,
    /// Content `bounds` scaled by `fit` and pinned at `alignment`.
    Aligned {
        bounds: ContentBounds,
        #[serde(default)]
        fit: Fit,
        #[serde(default)]
        alignment: Alignment,
    },
}

impl ContentFit for FitMode {
    fn placement(&self, container: ContainerSize) -> Option<Placement> {
        match self {
            FitMode::Identity => Some(Placement::IDENTITY),
            FitMode::Aligned {
                bounds,
                fit,
                alignment,
            } => {
                if !bounds.is_valid() {
                    return None;
                }
                let (scale_x, scale_y) = fit.scale(container, bounds);
                let (fx, fy) = alignment.factors();
                Some(Placement {
                    scale_x,
                    scale_y,
                    container_anchor: (
                        container.width * 0.5 * (1.0 + fx),
                        container.height * 0.5 * (1.0 + fy),
                    ),
                    content_anchor: bounds.anchor(*alignment),
                })
            }
        }
    }
}

fn resolve<F: ContentFit + ?Sized>(
    container: ContainerSize,
    fit: &F,
) -> Result<Placement, FollowError> {
    if !container.is_known() {
        return Err(FollowError::CoordinateUnavailable);
    }
    fit.placement(container)
        .filter(Placement::is_usable)
        .ok_or(FollowError::CoordinateUnavailable)
}

/// Convert a viewport pixel position into skeleton world coordinates.
///
/// Fails with [`FollowError::CoordinateUnavailable`] until the container has a
/// positive size and the fit strategy can place the content.
pub fn map_to_world<F: ContentFit + ?Sized>(
    point: ViewportPoint,
    container: ContainerSize,
    fit: &F,
) -> Result<WorldPoint, FollowError> {
    let placement = resolve(container, fit)?;
    if !point.is_finite() {
        return Err(FollowError::CoordinateUnavailable);
    }
    let y_up = container.height - point.y;
    Ok(placement.container_to_world(point.x, y_up))
}

/// Forward mapping: where a world position is drawn inside the container.
pub fn map_to_viewport<F: ContentFit + ?Sized>(
    world: WorldPoint,
    container: ContainerSize,
    fit: &F,
) -> Result<ViewportPoint, FollowError> {
    let placement = resolve(container, fit)?;
    let (x, y_up) = placement.world_to_container(world);
    Ok(ViewportPoint::new(x, container.height - y_up))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-3, "left={a} right={b}");
    }

    #[test]
    fn identity_flips_y() {
        let w = map_to_world(
            ViewportPoint::new(100.0, 50.0),
            ContainerSize::new(400.0, 600.0),
            &FitMode::Identity,
        )
        .expect("container known");
        assert_eq!(w, WorldPoint::new(100.0, 550.0));
    }

    #[test]
    fn zero_height_is_unavailable() {
        assert_eq!(
            map_to_world(
                ViewportPoint::new(1.0, 1.0),
                ContainerSize::new(400.0, 0.0),
                &FitMode::Identity,
            ),
            Err(FollowError::CoordinateUnavailable)
        );
    }

    #[test]
    fn empty_bounds_are_unavailable() {
        let fit = FitMode::Aligned {
            bounds: ContentBounds::new(0.0, 0.0, 0.0, 100.0),
            fit: Fit::Contain,
            alignment: Alignment::Center,
        };
        assert_eq!(
            map_to_world(
                ViewportPoint::new(1.0, 1.0),
                ContainerSize::new(400.0, 600.0),
                &fit,
            ),
            Err(FollowError::CoordinateUnavailable)
        );
    }

    #[test]
    fn center_left_contain() {
        let fit = FitMode::Aligned {
            bounds: ContentBounds::new(-100.0, 0.0, 200.0, 400.0),
            fit: Fit::Contain,
            alignment: Alignment::CenterLeft,
        };
        let container = ContainerSize::new(400.0, 600.0);
        // Left-middle of the container is left-middle of the bounds.
        let anchor =
            map_to_world(ViewportPoint::new(0.0, 300.0), container, &fit).expect("placed");
        approx(anchor.x, -100.0);
        approx(anchor.y, 200.0);
        // Contain picks min(400/200, 600/400) = 1.5 px per unit.
        let p =
            map_to_world(ViewportPoint::new(150.0, 150.0), container, &fit).expect("placed");
        approx(p.x, 0.0);
        approx(p.y, 300.0);
    }

    #[test]
    fn fill_scales_axes_independently() {
        let bounds = ContentBounds::new(0.0, 0.0, 100.0, 50.0);
        let (sx, sy) = Fit::Fill.scale(ContainerSize::new(400.0, 100.0), &bounds);
        approx(sx, 4.0);
        approx(sy, 2.0);
        let (sx, sy) = Fit::Cover.scale(ContainerSize::new(400.0, 100.0), &bounds);
        approx(sx, 4.0);
        approx(sy, 4.0);
        let (sx, _) = Fit::ScaleDown.scale(ContainerSize::new(400.0, 100.0), &bounds);
        approx(sx, 1.0);
    }

    const ALL_FITS: [Fit; 7] = [
        Fit::Contain,
        Fit::Cover,
        Fit::Fill,
        Fit::FitWidth,
        Fit::FitHeight,
        Fit::None,
        Fit::ScaleDown,
    ];

    const ALL_ALIGNMENTS: [Alignment; 9] = [
        Alignment::TopLeft,
        Alignment::TopCenter,
        Alignment::TopRight,
        Alignment::CenterLeft,
        Alignment::Center,
        Alignment::CenterRight,
        Alignment::BottomLeft,
        Alignment::BottomCenter,
        Alignment::BottomRight,
    ];

    const CONTAINERS: [ContainerSize; 3] = [
        ContainerSize::new(400.0, 600.0),
        ContainerSize::new(1080.0, 1.0),
        ContainerSize::new(33.0, 977.5),
    ];

    fn all_fit_modes() -> Vec<FitMode> {
        let bounds = [
            ContentBounds::new(-150.0, -10.0, 300.0, 620.0),
            ContentBounds::new(20.0, 30.0, 80.0, 40.0),
        ];
        let mut modes = vec![FitMode::Identity];
        for bounds in bounds {
            for fit in ALL_FITS {
                for alignment in ALL_ALIGNMENTS {
                    modes.push(FitMode::Aligned {
                        bounds,
                        fit,
                        alignment,
                    });
                }
            }
        }
        modes
    }

    #[test]
    fn round_trip_recovers_viewport_point() {
        let points = [(0.0, 0.0), (100.0, 50.0), (-20.0, 1200.0), (399.5, 0.25)];
        for fit in &all_fit_modes() {
            for &container in &CONTAINERS {
                for &(x, y) in &points {
                    let vp = ViewportPoint::new(x, y);
                    let world = map_to_world(vp, container, fit).expect("placed");
                    let back = map_to_viewport(world, container, fit).expect("placed");
                    assert!(
                        (back.x - x).abs() <= 1e-2 && (back.y - y).abs() <= 1e-2,
                        "fit={fit:?} container={container:?} in={vp:?} out={back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn container_anchor_lands_on_bounds_anchor() {
        let bounds = ContentBounds::new(-50.0, 10.0, 200.0, 120.0);
        for fit in ALL_FITS {
            for alignment in ALL_ALIGNMENTS {
                let mode = FitMode::Aligned {
                    bounds,
                    fit,
                    alignment,
                };
                for container in CONTAINERS {
                    let (fx, fy) = alignment.factors();
                    // Anchor pixel in Y-down viewport coordinates.
                    let vp = ViewportPoint::new(
                        container.width * 0.5 * (1.0 + fx),
                        container.height * 0.5 * (1.0 - fy),
                    );
                    let world = map_to_world(vp, container, &mode).expect("placed");
                    approx(world.x, bounds.x + bounds.width * 0.5 * (1.0 + fx));
                    approx(world.y, bounds.y + bounds.height * 0.5 * (1.0 + fy));
                }
            }
        }
    }

    #[test]
    fn container_corners_map_to_bounds_corners() {
        let bounds = ContentBounds::new(-50.0, 10.0, 200.0, 120.0);
        let container = ContainerSize::new(400.0, 600.0);
        let corners = [
            (Alignment::TopLeft, (0.0, 0.0), (-50.0, 130.0)),
            (Alignment::TopCenter, (200.0, 0.0), (50.0, 130.0)),
            (Alignment::TopRight, (400.0, 0.0), (150.0, 130.0)),
            (Alignment::CenterLeft, (0.0, 300.0), (-50.0, 70.0)),
            (Alignment::Center, (200.0, 300.0), (50.0, 70.0)),
            (Alignment::CenterRight, (400.0, 300.0), (150.0, 70.0)),
            (Alignment::BottomLeft, (0.0, 600.0), (-50.0, 10.0)),
            (Alignment::BottomCenter, (200.0, 600.0), (50.0, 10.0)),
            (Alignment::BottomRight, (400.0, 600.0), (150.0, 10.0)),
        ];
        for (alignment, (vx, vy), (wx, wy)) in corners {
            let mode = FitMode::Aligned {
                bounds,
                fit: Fit::None,
                alignment,
            };
            let world =
                map_to_world(ViewportPoint::new(vx, vy), container, &mode).expect("placed");
            approx(world.x, wx);
            approx(world.y, wy);
        }
    }

    #[test]
    fn single_axis_and_natural_fits() {
        let bounds = ContentBounds::new(0.0, 0.0, 100.0, 50.0);
        let container = ContainerSize::new(400.0, 100.0);
        let (sx, sy) = Fit::FitWidth.scale(container, &bounds);
        approx(sx, 4.0);
        approx(sy, 4.0);
        let (sx, sy) = Fit::FitHeight.scale(container, &bounds);
        approx(sx, 2.0);
        approx(sy, 2.0);
        let (sx, sy) = Fit::None.scale(container, &bounds);
        approx(sx, 1.0);
        approx(sy, 1.0);
        let (sx, sy) = Fit::Contain.scale(container, &bounds);
        approx(sx, 2.0);
        approx(sy, 2.0);

        // FitWidth under TopRight: one world unit is four pixels, content top-right pinned.
        let mode = FitMode::Aligned {
            bounds,
            fit: Fit::FitWidth,
            alignment: Alignment::TopRight,
        };
        let world =
            map_to_world(ViewportPoint::new(360.0, 20.0), container, &mode).expect("placed");
        approx(world.x, 90.0);
        approx(world.y, 45.0);
    }

    #[test]
    fn fit_mode_json_shape() {
        let fit: FitMode = serde_json::from_str(
            r#"{ "mode": "aligned", "bounds": { "x": 0, "y": 0, "width": 10, "height": 20 }, "alignment": "center_left" }"#,
        )
        .expect("fit json");
        assert_eq!(
            fit,
            FitMode::Aligned {
                bounds: ContentBounds::new(0.0, 0.0, 10.0, 20.0),
                fit: Fit::Contain,
                alignment: Alignment::CenterLeft,
            }
        );
        let identity: FitMode =
            serde_json::from_str(r#"{ "mode": "identity" }"#).expect("fit json");
        assert_eq!(identity, FitMode::Identity);
    }
}
