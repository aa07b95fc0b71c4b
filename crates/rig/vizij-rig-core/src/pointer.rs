//! Pointer input: drag events from the UI side and the last-value cell that hands
//! the newest position to the frame hook.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geom::ViewportPoint;

/// Drag stream delivered by the host's gesture detector, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    DragStart { x: f32, y: f32 },
    /// Movement since the previous event.
    DragMove { dx: f32, dy: f32 },
    DragEnd,
}

const EMPTY: u64 = u64::MAX;

fn pack(p: ViewportPoint) -> u64 {
    ((p.x.to_bits() as u64) << 32) | p.y.to_bits() as u64
}

fn unpack(bits: u64) -> ViewportPoint {
    ViewportPoint::new(
        f32::from_bits((bits >> 32) as u32),
        f32::from_bits(bits as u32),
    )
}

/// Single-slot cell holding the most recent pointer position.
///
/// One writer (UI thread) and one reader (render thread); the newest value wins and
/// nothing is queued. Both coordinates travel in one `u64`, so a reader never sees
/// an x from one event paired with a y from another.
#[derive(Debug)]
pub struct PointerCell {
    bits: AtomicU64,
}

impl Default for PointerCell {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerCell {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU64::new(EMPTY),
        }
    }

    /// Publish a position. Non-finite positions are dropped and the previous value kept.
    pub fn store(&self, point: ViewportPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.bits.store(pack(point), Ordering::Release);
        true
    }

    pub fn load(&self) -> Option<ViewportPoint> {
        match self.bits.load(Ordering::Acquire) {
            EMPTY => None,
            bits => Some(unpack(bits)),
        }
    }

    pub fn clear(&self) {
        self.bits.store(EMPTY, Ordering::Release);
    }
}

/// UI-side handle: folds drag events into an absolute position and publishes it.
#[derive(Debug, Clone)]
pub struct PointerInput {
    cell: Arc<PointerCell>,
    position: Option<ViewportPoint>,
    hold_after_release: bool,
}

impl PointerInput {
    pub fn new(cell: Arc<PointerCell>, hold_after_release: bool) -> Self {
        Self {
            cell,
            position: None,
            hold_after_release,
        }
    }

    /// Current drag position, `None` outside a drag.
    pub fn position(&self) -> Option<ViewportPoint> {
        self.position
    }

    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::DragStart { x, y } => self.drag_start(x, y),
            PointerEvent::DragMove { dx, dy } => self.drag_move(dx, dy),
            PointerEvent::DragEnd => self.drag_end(),
        }
    }

    pub fn drag_start(&mut self, x: f32, y: f32) {
        let p = ViewportPoint::new(x, y);
        if self.cell.store(p) {
            self.position = Some(p);
        }
    }

    /// Ignored outside a drag: a delta needs a start position to apply to.
    pub fn drag_move(&mut self, dx: f32, dy: f32) {
        let Some(current) = self.position else {
            log::trace!("drag move ({dx}, {dy}) without drag start ignored");
            return;
        };
        let p = ViewportPoint::new(current.x + dx, current.y + dy);
        if self.cell.store(p) {
            self.position = Some(p);
        }
    }

    pub fn drag_end(&mut self) {
        self.position = None;
        if !self.hold_after_release {
            self.cell.clear();
        }
    }
}
