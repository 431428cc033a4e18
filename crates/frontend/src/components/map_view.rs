use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

use atlas_shared::coords::{self as geo, ImageFrame};
use atlas_shared::geometry::Position;
use atlas_shared::interaction::{
    Intent, InteractionState, InteractionStateMachine, MapContext, MapEvent, PointerButton,
};
use atlas_shared::markers::{self, TypeFilter};
use atlas_shared::models::{LocationId, Road, RoadType};
use atlas_shared::viewport::{Viewport, ViewportController};
use atlas_shared::world::WorldMap;

use crate::coords;

pub const MAP_CONTAINER_ID: &str = "atlas-map-container";
const MAP_IMAGE_ID: &str = "atlas-map-image";

// ---------------------------------------------------------------------------
// Event plumbing
// ---------------------------------------------------------------------------

/// Feed one event through the state machine against the live signals.
pub fn dispatch(
    event: MapEvent,
    mut machine: Signal<InteractionStateMachine>,
    mut viewport: Signal<ViewportController>,
    frame: Signal<ImageFrame>,
    mut world: Signal<WorldMap>,
) -> Vec<Intent> {
    let frame = *frame.peek();
    let mut viewport = viewport.write();
    let mut world = world.write();
    let mut ctx = MapContext {
        viewport: &mut *viewport,
        frame: &frame,
        world: &mut *world,
    };
    machine.write().handle(event, &mut ctx)
}

/// Re-measure the container and the loaded artwork, and reset the view when
/// either changed.
fn refresh_frame(mut frame: Signal<ImageFrame>, mut viewport: Signal<ViewportController>) {
    let Some(rect) = coords::container_rect(MAP_CONTAINER_ID) else {
        return;
    };
    let natural = coords::image_natural_size(MAP_IMAGE_ID).unwrap_or_default();
    let next = ImageFrame::new(natural, rect.size());
    if next != *frame.peek() {
        frame.set(next);
        viewport.write().recenter(rect.size());
    }
}

fn pointer_button(button: Option<MouseButton>) -> PointerButton {
    match button {
        Some(MouseButton::Primary) => PointerButton::Primary,
        Some(MouseButton::Secondary) => PointerButton::Secondary,
        _ => PointerButton::Auxiliary,
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn container_position(evt: &Event<MouseData>) -> Option<Position> {
    let rect = coords::container_rect(MAP_CONTAINER_ID)?;
    let client = evt.client_coordinates();
    Some(rect.to_container(client.x, client.y))
}

// ---------------------------------------------------------------------------
// Render helpers (pure, screen space)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub id: LocationId,
    pub name: String,
    pub icon: &'static str,
    pub size: f64,
    pub screen: Position,
    pub selected: bool,
}

/// Markers to draw, in draw order, positioned and sized in container
/// coordinates. Marker sizes are image pixels, so they follow zoom like the
/// artwork and line up with the hit boxes.
pub fn marker_views(
    world: &WorldMap,
    filter: TypeFilter,
    viewport: &Viewport,
    frame: &ImageFrame,
    selected: Option<LocationId>,
) -> Vec<MarkerView> {
    let Some(base_scale) = frame.base_scale() else {
        return Vec::new();
    };
    let screen_scale = base_scale * viewport.zoom();
    world
        .visible_locations(filter)
        .filter_map(|l| {
            let screen = geo::to_screen_space(l.coordinates, viewport, frame)?;
            let style = markers::marker_style(l.location_type);
            Some(MarkerView {
                id: l.id,
                name: l.name.clone(),
                icon: style.icon,
                size: style.size * screen_scale,
                screen,
                selected: selected == Some(l.id),
            })
        })
        .collect()
}

fn road_class(road_type: RoadType) -> &'static str {
    match road_type {
        RoadType::Major => "road road-major",
        RoadType::Minor => "road road-minor",
        RoadType::Path => "road road-path",
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// SVG overlay with every stored road plus the in-progress preview.
pub fn build_road_svg(
    roads: &[Road],
    preview: Option<&[Position]>,
    viewport: &Viewport,
    frame: &ImageFrame,
) -> String {
    let mut svg = String::with_capacity(1024);
    for road in roads {
        let Some(d) = geo::road_screen_path(&road.points, viewport, frame) else {
            continue;
        };
        let class = road_class(road.road_type);
        let title = escape_text(&road.name);
        svg.push_str(&format!(
            r#"<path class="{class}" d="{d}" fill="none"><title>{title}</title></path>"#
        ));
    }
    if let Some(d) = preview.and_then(|p| geo::road_screen_path(p, viewport, frame)) {
        svg.push_str(&format!(
            r#"<path class="road road-preview" d="{d}" fill="none" stroke-dasharray="8 6"/>"#
        ));
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:5;">{svg}</svg>"#
    )
}

fn container_class(machine: &InteractionStateMachine) -> &'static str {
    match machine.state() {
        InteractionState::Idle if machine.edit_mode() => "map-container editing",
        InteractionState::Idle => "map-container",
        InteractionState::Panning => "map-container panning",
        InteractionState::DraggingMarker(_) => "map-container dragging",
        InteractionState::CreatingRoad(_) => "map-container creating-road",
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    image_url: String,
    world: Signal<WorldMap>,
    machine: Signal<InteractionStateMachine>,
    viewport: Signal<ViewportController>,
    frame: Signal<ImageFrame>,
    selected: Signal<Option<LocationId>>,
    on_intents: EventHandler<Vec<Intent>>,
) -> Element {
    let mut viewport = viewport;

    let (transform_style, class, marker_list, svg_html) = {
        let vp = *viewport.read().viewport();
        let fr = *frame.read();
        let m = machine.read();
        let w = world.read();
        let marker_list = marker_views(&w, m.visible_types(), &vp, &fr, *selected.read());
        let preview = m.road_preview(&w);
        let svg_html = build_road_svg(w.roads(), preview.as_deref(), &vp, &fr);
        (vp.css_transform(), container_class(&m), marker_list, svg_html)
    };

    rsx! {
        div { class: "map-wrapper",
            div {
                id: MAP_CONTAINER_ID,
                class: "{class}",

                onmounted: move |_| refresh_frame(frame, viewport),
                onresize: move |_| refresh_frame(frame, viewport),

                onwheel: move |evt: Event<WheelData>| {
                    evt.prevent_default();
                    let delta_y = wheel_delta_y(evt.data().delta());
                    let intents = dispatch(MapEvent::Wheel { delta_y }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                onmousedown: move |evt: Event<MouseData>| {
                    let Some(pos) = container_position(&evt) else { return };
                    let button = pointer_button(evt.trigger_button());
                    let intents = dispatch(MapEvent::PointerDown { pos, button }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                onmousemove: move |evt: Event<MouseData>| {
                    let Some(pos) = container_position(&evt) else { return };
                    let intents = dispatch(MapEvent::PointerMove { pos }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                onmouseup: move |evt: Event<MouseData>| {
                    let Some(pos) = container_position(&evt) else { return };
                    let intents = dispatch(MapEvent::PointerUp { pos }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                // Leaving the map ends any pan or drag in progress
                onmouseleave: move |evt: Event<MouseData>| {
                    let Some(pos) = container_position(&evt) else { return };
                    let intents = dispatch(MapEvent::PointerUp { pos }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                oncontextmenu: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    let Some(pos) = container_position(&evt) else { return };
                    let intents = dispatch(MapEvent::ContextMenu { pos }, machine, viewport, frame, world);
                    on_intents.call(intents);
                },

                // Inner wrapper: the CSS transform applies zoom/pan to the artwork only
                div {
                    class: "map-inner",
                    style: "{transform_style}",

                    img {
                        id: MAP_IMAGE_ID,
                        src: "{image_url}",
                        draggable: "false",
                        onload: move |_| refresh_frame(frame, viewport),
                    }
                }

                div { dangerous_inner_html: "{svg_html}" }

                for mv in marker_list {
                    div {
                        key: "{mv.id}",
                        class: if mv.selected { "map-marker selected" } else { "map-marker" },
                        style: "left: {mv.screen.x}px; top: {mv.screen.y}px; width: {mv.size}px; height: {mv.size}px;",
                        title: "{mv.name}",
                        span { class: "marker-icon icon-{mv.icon}" }
                        span { class: "marker-label", "{mv.name}" }
                    }
                }
            }

            div { class: "zoom-controls",
                button {
                    title: "Zoom in",
                    onclick: move |_| {
                        let container = frame.peek().container_size();
                        viewport.write().zoom_in_step(container);
                    },
                    "+"
                }
                button {
                    title: "Zoom out",
                    onclick: move |_| {
                        let container = frame.peek().container_size();
                        viewport.write().zoom_out_step(container);
                    },
                    "\u{2212}"
                }
                button {
                    title: "Reset view",
                    onclick: move |_| {
                        let container = frame.peek().container_size();
                        viewport.write().recenter(container);
                    },
                    "\u{27f3}"
                }
            }
        }
    }
}
