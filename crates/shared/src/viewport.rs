use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Size};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 4.0;
pub const BASELINE_ZOOM: f64 = 1.0;

/// Zoom delta applied by the +/- buttons.
pub const ZOOM_STEP: f64 = 0.2;

/// Wheel `deltaY` units per 1.0 of zoom.
pub const WHEEL_ZOOM_DIVISOR: f64 = 1000.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return BASELINE_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom scalar and pan vector applied to the map content box
/// (`translate(pan) scale(zoom)`, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan: Position,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: BASELINE_ZOOM,
            pan: Position::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Position) -> Self {
        Viewport {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Position {
        self.pan
    }

    /// CSS transform for the content box.
    pub fn css_transform(&self) -> String {
        format!(
            "transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
            self.pan.x, self.pan.y, self.zoom
        )
    }
}

/// Compute the pan that keeps `anchor` (container coordinates) over the same
/// content point when zooming from `old_zoom` to `new_zoom`.
pub fn zoom_pan_at_anchor(anchor: Position, old_zoom: f64, new_zoom: f64, old_pan: Position) -> Position {
    let content = (anchor - old_pan) / old_zoom;
    anchor - content * new_zoom
}

/// Owns the viewport and the pan gesture bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportController {
    viewport: Viewport,
    last_pointer: Option<Position>,
}

impl ViewportController {
    pub fn new(viewport: Viewport) -> Self {
        ViewportController {
            viewport,
            last_pointer: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn pan(&self) -> Position {
        self.viewport.pan
    }

    pub fn is_panning(&self) -> bool {
        self.last_pointer.is_some()
    }

    /// Set the zoom, pivoting around the container center. Returns `false`
    /// when the clamped zoom equals the current one (nothing changes).
    pub fn set_zoom(&mut self, new_zoom: f64, container: Size) -> bool {
        self.set_zoom_at(new_zoom, container.center())
    }

    /// Set the zoom, keeping the content point under `anchor` fixed.
    pub fn set_zoom_at(&mut self, new_zoom: f64, anchor: Position) -> bool {
        let old_zoom = self.viewport.zoom;
        let new_zoom = clamp_zoom(new_zoom);
        if (new_zoom - old_zoom).abs() < 1e-12 {
            return false;
        }
        self.viewport.pan = zoom_pan_at_anchor(anchor, old_zoom, new_zoom, self.viewport.pan);
        self.viewport.zoom = new_zoom;
        tracing::debug!(zoom = new_zoom, "viewport zoom changed");
        true
    }

    pub fn zoom_in_step(&mut self, container: Size) -> bool {
        self.set_zoom(self.viewport.zoom + ZOOM_STEP, container)
    }

    pub fn zoom_out_step(&mut self, container: Size) -> bool {
        self.set_zoom(self.viewport.zoom - ZOOM_STEP, container)
    }

    /// Wheel zoom. Scrolling up (negative `delta_y`) zooms in. Anchored at the
    /// container center, not at the cursor.
    pub fn on_wheel(&mut self, delta_y: f64, container: Size) -> bool {
        let delta = -delta_y / WHEEL_ZOOM_DIVISOR;
        self.set_zoom(self.viewport.zoom + delta, container)
    }

    pub fn begin_pan(&mut self, pointer: Position) {
        self.last_pointer = Some(pointer);
    }

    /// Pan by the pointer delta since the previous call. No-op when no pan
    /// gesture is active.
    pub fn continue_pan(&mut self, pointer: Position) -> bool {
        let Some(last) = self.last_pointer else {
            return false;
        };
        self.viewport.pan += pointer - last;
        self.last_pointer = Some(pointer);
        true
    }

    pub fn end_pan(&mut self) {
        self.last_pointer = None;
    }

    /// Reset to baseline framing: zoom 1 with the content box centered in the
    /// container, which puts the letterboxed image in the middle. Runs on
    /// container resize and on image load.
    pub fn recenter(&mut self, container: Size) {
        let zoom = BASELINE_ZOOM;
        let scaled = Size::new(container.width * zoom, container.height * zoom);
        self.viewport = Viewport {
            zoom,
            pan: Position::new(
                (container.width - scaled.width) / 2.0,
                (container.height - scaled.height) / 2.0,
            ),
        };
        self.last_pointer = None;
    }
}
