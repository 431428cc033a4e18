//! Image space <-> screen space conversion.
//!
//! The map artwork is letterboxed inside the container (`object-fit: contain`),
//! then the whole content box is transformed by `translate(pan) scale(zoom)`
//! with a top-left transform origin.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Size};
use crate::viewport::Viewport;

/// Natural image dimensions plus the container they are fitted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub natural_width: f64,
    pub natural_height: f64,
    pub container_width: f64,
    pub container_height: f64,
}

impl ImageFrame {
    pub fn new(natural: Size, container: Size) -> Self {
        ImageFrame {
            natural_width: natural.width,
            natural_height: natural.height,
            container_width: container.width,
            container_height: container.height,
        }
    }

    pub fn natural_size(&self) -> Size {
        Size::new(self.natural_width, self.natural_height)
    }

    pub fn container_size(&self) -> Size {
        Size::new(self.container_width, self.container_height)
    }

    /// True until both the image and the container have a non-zero size.
    pub fn is_degenerate(&self) -> bool {
        self.natural_size().is_empty() || self.container_size().is_empty()
    }

    /// Uniform scale fitting the whole image inside the container.
    pub fn base_scale(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(
            (self.container_width / self.natural_width)
                .min(self.container_height / self.natural_height),
        )
    }

    /// Top-left corner of the letterboxed image inside the container.
    pub fn image_origin(&self) -> Option<Position> {
        let scale = self.base_scale()?;
        Some(Position::new(
            (self.container_width - self.natural_width * scale) / 2.0,
            (self.container_height - self.natural_height * scale) / 2.0,
        ))
    }

    /// Clamp an image-space position to the artwork bounds.
    pub fn clamp_to_image(&self, pos: Position) -> Position {
        pos.clamp(
            Position::ZERO,
            Position::new(self.natural_width.max(0.0), self.natural_height.max(0.0)),
        )
    }
}

/// Convert a container-relative screen position to image pixels, undoing the
/// zoom/pan transform and the letterbox fit. Clamped to the image bounds.
///
/// Returns `None` while the frame is degenerate (image not loaded yet or
/// container collapsed).
pub fn to_image_space(screen: Position, viewport: &Viewport, frame: &ImageFrame) -> Option<Position> {
    let scale = frame.base_scale()?;
    let origin = frame.image_origin()?;
    if viewport.zoom() <= 0.0 {
        return None;
    }

    let in_content = (screen - viewport.pan()) / viewport.zoom();
    let image = (in_content - origin) / scale;
    Some(frame.clamp_to_image(image))
}

/// Inverse of [`to_image_space`] (without clamping): where an image pixel
/// lands inside the container at the current zoom/pan.
pub fn to_screen_space(image: Position, viewport: &Viewport, frame: &ImageFrame) -> Option<Position> {
    let scale = frame.base_scale()?;
    let origin = frame.image_origin()?;
    Some((image * scale + origin) * viewport.zoom() + viewport.pan())
}

/// Convert a client (page) position to container-relative coordinates.
pub fn client_to_container(client: Position, rect_left: f64, rect_top: f64) -> Position {
    Position::new(client.x - rect_left, client.y - rect_top)
}

/// SVG path (`M x y L x y ...`) through image-space points, in container
/// coordinates. `None` for fewer than two points or a degenerate frame.
pub fn road_screen_path(points: &[Position], viewport: &Viewport, frame: &ImageFrame) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let mut path = String::new();
    for (i, p) in points.iter().enumerate() {
        let s = to_screen_space(*p, viewport, frame)?;
        let cmd = if i == 0 { "M" } else { " L" };
        path.push_str(&format!("{cmd} {:.1} {:.1}", s.x, s.y));
    }
    Some(path)
}
