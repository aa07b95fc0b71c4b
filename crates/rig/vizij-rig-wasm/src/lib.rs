use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_rig_core::{
    map_to_world, ContainerSize, FollowConfig, FollowController, FrameOutcome, PointerEvent,
    PointerInput, Skeleton, SkeletonData, ViewportPoint,
};

/// Browser-side follow controller: JS feeds drag events and the container size,
/// then calls `step()` once per animation frame.
#[wasm_bindgen]
pub struct VizijRigFollow {
    follow: FollowController,
    input: PointerInput,
    skeleton: Option<Skeleton>,
    placement: SkeletonPlacement,
    container: ContainerSize,
}

/// Skeleton position and scale in world space; survives rig reloads.
#[derive(Clone, Copy, Debug)]
struct SkeletonPlacement {
    x: f32,
    y: f32,
    scale_x: f32,
    scale_y: f32,
}

impl Default for SkeletonPlacement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl SkeletonPlacement {
    fn apply(&self, skel: &mut Skeleton) {
        skel.x = self.x;
        skel.y = self.y;
        skel.scale_x = self.scale_x;
        skel.scale_y = self.scale_y;
    }
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[derive(Serialize)]
struct XY {
    x: f32,
    y: f32,
}

#[wasm_bindgen]
impl VizijRigFollow {
    /// Create a controller. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijRigFollow({ target_bone: "crosshair", fit: { mode: "identity" } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijRigFollow, JsError> {
        console_error_panic_hook::set_once();

        let cfg: FollowConfig = if jsvalue_is_undefined_or_null(&config) {
            FollowConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let follow = FollowController::new(cfg);
        let input = follow.pointer_input();
        Ok(VizijRigFollow {
            follow,
            input,
            skeleton: None,
            placement: SkeletonPlacement::default(),
            container: ContainerSize::default(),
        })
    }

    /// Load a rig description (`{ name, bones: [...] }`), replacing any previous rig.
    /// Returns the bone count.
    #[wasm_bindgen(js_name = load_rig)]
    pub fn load_rig(&mut self, data_json: JsValue) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&data_json) {
            return Err(JsError::new("load_rig: data_json is null/undefined"));
        }
        let data: SkeletonData = swb::from_value(data_json)
            .map_err(|e| JsError::new(&format!("load_rig parse error: {e}")))?;
        // Skeleton::new validates the hierarchy.
        let mut skeleton =
            Skeleton::new(data).map_err(|e| JsError::new(&format!("load_rig error: {e}")))?;
        self.placement.apply(&mut skeleton);
        let count = skeleton.bones().len() as u32;
        self.skeleton = Some(skeleton);
        Ok(count)
    }

    /// Report the container size after layout. Zero sizes pause following.
    #[wasm_bindgen(js_name = set_container_size)]
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.container = ContainerSize::new(width, height);
    }

    /// Place the whole skeleton in world space. Kept across `load_rig` calls and
    /// applied on the next `step()`.
    #[wasm_bindgen(js_name = set_placement)]
    pub fn set_placement(&mut self, x: f32, y: f32, scale_x: f32, scale_y: f32) {
        self.placement = SkeletonPlacement {
            x,
            y,
            scale_x,
            scale_y,
        };
    }

    #[wasm_bindgen(js_name = drag_start)]
    pub fn drag_start(&mut self, x: f32, y: f32) {
        self.input.drag_start(x, y);
    }

    #[wasm_bindgen(js_name = drag_move)]
    pub fn drag_move(&mut self, dx: f32, dy: f32) {
        self.input.drag_move(dx, dy);
    }

    #[wasm_bindgen(js_name = drag_end)]
    pub fn drag_end(&mut self) {
        self.input.drag_end();
    }

    /// Apply a tagged event, e.g. `{ type: "drag_move", dx: 2, dy: -1 }`.
    #[wasm_bindgen(js_name = pointer_event)]
    pub fn pointer_event(&mut self, event: JsValue) -> Result<(), JsError> {
        let ev: PointerEvent = swb::from_value(event)
            .map_err(|e| JsError::new(&format!("pointer_event error: {e}")))?;
        self.input.apply(ev);
        Ok(())
    }

    /// Run one frame: world transforms, then the follow hook. Returns the frame outcome
    /// (`{ status: "idle" | "applied" | "skipped", ... }`).
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<JsValue, JsError> {
        let skel = self
            .skeleton
            .as_mut()
            .ok_or_else(|| JsError::new("step: no rig loaded"))?;
        self.placement.apply(skel);
        skel.update_world_transforms();
        let outcome: FrameOutcome = self.follow.after_world_transforms(skel, self.container);
        to_js(&outcome, "step")
    }

    /// Local `{ x, y }` of a bone, or undefined if absent.
    #[wasm_bindgen(js_name = bone_local)]
    pub fn bone_local(&self, name: &str) -> Result<JsValue, JsError> {
        match self.skeleton.as_ref().and_then(|s| s.bone_named(name)) {
            Some(bone) => to_js(&XY { x: bone.x, y: bone.y }, "bone_local"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// World `{ x, y }` of a bone as of the last `step()`, or undefined if absent.
    #[wasm_bindgen(js_name = bone_world)]
    pub fn bone_world(&self, name: &str) -> Result<JsValue, JsError> {
        match self.skeleton.as_ref().and_then(|s| s.bone_named(name)) {
            Some(bone) => {
                let (x, y) = bone.world_position();
                to_js(&XY { x, y }, "bone_world")
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Map a viewport point to world space with the configured fit; null until the
    /// container size is known.
    #[wasm_bindgen(js_name = map_to_world)]
    pub fn map_to_world(&self, x: f32, y: f32) -> Result<JsValue, JsError> {
        match map_to_world(ViewportPoint::new(x, y), self.container, self.follow.fit()) {
            Ok(world) => to_js(&world, "map_to_world"),
            Err(_) => Ok(JsValue::NULL),
        }
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
