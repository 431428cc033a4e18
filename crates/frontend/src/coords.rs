use atlas_shared::coords::client_to_container;
use atlas_shared::geometry::{Position, Size};
use wasm_bindgen::JsCast;

/// Bounding client rect of the map container, detached from the DOM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Client (page) coordinates to container-relative coordinates.
    pub fn to_container(&self, client_x: f64, client_y: f64) -> Position {
        client_to_container(Position::new(client_x, client_y), self.left, self.top)
    }
}

pub fn container_rect(container_id: &str) -> Option<ContainerRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();
    Some(ContainerRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    })
}

/// Natural pixel size of a loaded `<img>`; zero until the image has decoded.
pub fn image_natural_size(image_id: &str) -> Option<Size> {
    let document = web_sys::window()?.document()?;
    let image = document
        .get_element_by_id(image_id)?
        .dyn_into::<web_sys::HtmlImageElement>()
        .ok()?;
    Some(Size::new(
        image.natural_width() as f64,
        image.natural_height() as f64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_container_origin() {
        let rect = ContainerRect { left: 100.0, top: 200.0, width: 800.0, height: 600.0 };
        assert_eq!(rect.to_container(100.0, 200.0), Position::ZERO);
    }

    #[test]
    fn test_to_container_offset() {
        let rect = ContainerRect { left: 320.0, top: 50.0, width: 800.0, height: 600.0 };
        let p = rect.to_container(450.0, 350.0);
        assert!((p.x - 130.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
        assert_eq!(rect.size(), Size::new(800.0, 600.0));
    }
}
