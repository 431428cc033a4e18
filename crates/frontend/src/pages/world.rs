use dioxus::prelude::*;
use uuid::Uuid;
use wasm_bindgen::JsCast;

use atlas_shared::coords::ImageFrame;
use atlas_shared::interaction::{Intent, InteractionStateMachine, MapEvent};
use atlas_shared::models::{LocationId, MapArtwork};
use atlas_shared::viewport::ViewportController;
use atlas_shared::world::WorldMap;

use crate::api;
use crate::components::help_overlay::HelpOverlay;
use crate::components::location_panel::LocationPanel;
use crate::components::map_view::{self, MapView};
use crate::components::travel_panel::TravelPanel;
use crate::components::type_filter::TypeFilterPanel;

const NOTICE_MS: u32 = 4000;

/// Artwork served by the backend under `/static`.
fn artwork_url(map: &MapArtwork) -> String {
    format!("/static/maps/{}", map.file_name)
}

/// True while a text field or select has focus, so typed characters are not
/// taken as shortcuts.
fn typing_in_field() -> bool {
    let Some(active) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
    else {
        return false;
    };
    active.dyn_ref::<web_sys::HtmlElement>().is_some_and(|el| {
        matches!(el.tag_name().as_str(), "INPUT" | "SELECT" | "TEXTAREA")
    })
}

/// Show a transient message, cleared after a few seconds unless replaced.
fn show_notice(mut notice: Signal<Option<String>>, text: String) {
    notice.set(Some(text.clone()));
    spawn(async move {
        gloo_timers::future::TimeoutFuture::new(NOTICE_MS).await;
        if notice.peek().as_deref() == Some(text.as_str()) {
            notice.set(None);
        }
    });
}

#[component]
pub fn WorldPage(world_id: String) -> Element {
    let parsed_id = Uuid::parse_str(&world_id).ok();

    // Data resources
    let maps_resource = use_resource(|| api::fetch_maps());

    // Map state: the world snapshot, the interaction machine and the view
    let mut world = use_signal(|| WorldMap::new(parsed_id.unwrap_or_default()));
    let machine = use_signal(InteractionStateMachine::new);
    let viewport = use_signal(ViewportController::default);
    let frame = use_signal(ImageFrame::default);

    // UI state
    let mut selected = use_signal(|| None::<LocationId>);
    let mut unsaved_moves = use_signal(Vec::<LocationId>::new);
    let mut selected_map = use_signal(String::new);
    let notice = use_signal(|| None::<String>);
    let mut show_help = use_signal(|| false);

    // Load the world's locations and roads
    let _world_loader = use_resource(move || async move {
        let Some(id) = parsed_id else {
            return;
        };
        match api::fetch_world(id).await {
            Ok((locations, roads)) => {
                tracing::info!(world = %id, locations = locations.len(), roads = roads.len(), "world loaded");
                world.set(WorldMap::with_contents(id, locations, roads));
            }
            Err(e) => {
                tracing::warn!(world = %id, error = %e, "failed to load world");
                show_notice(notice, format!("Could not load world: {e}"));
            }
        }
    });

    let mut handle_intents = move |intents: Vec<Intent>| {
        for intent in &intents {
            match intent {
                Intent::LocationSelected(id) => selected.set(Some(*id)),
                Intent::MarkerDropped { id, .. } => {
                    let mut moves = unsaved_moves.write();
                    if !moves.contains(id) {
                        moves.push(*id);
                    }
                }
                Intent::Notice(n) => show_notice(notice, n.to_string()),
                _ => {}
            }
        }
        if intents.iter().any(Intent::is_persistence) {
            spawn(async move {
                if let Err(e) = api::persist_all(&intents).await {
                    show_notice(notice, format!("Could not save: {e}"));
                }
            });
        }
    };

    let maps: Vec<MapArtwork> = match &*maps_resource.read() {
        Some(Ok(m)) => m.clone(),
        _ => vec![],
    };

    // Set default map if none selected
    if selected_map.read().is_empty() && !maps.is_empty() {
        selected_map.set(maps[0].file_name.clone());
    }

    let current_map = maps
        .iter()
        .find(|m| *selected_map.read() == m.file_name)
        .cloned();

    if parsed_id.is_none() {
        return rsx! {
            div { class: "app landing",
                h1 { "Unknown world" }
                p { "\"{world_id}\" is not a valid world id." }
                Link { to: crate::Route::Home {}, "Back" }
            }
        };
    }

    rsx! {
        div {
            class: "app",
            tabindex: "0",
            onkeydown: move |evt: Event<KeyboardData>| {
                match evt.key() {
                    Key::Escape => {
                        if *show_help.peek() {
                            show_help.set(false);
                        } else {
                            let intents = map_view::dispatch(MapEvent::Cancel, machine, viewport, frame, world);
                            handle_intents(intents);
                        }
                    }
                    Key::Character(c) if (c == "h" || c == "H" || c == "?") && !typing_in_field() => {
                        let open = *show_help.peek();
                        show_help.set(!open);
                    }
                    _ => {}
                }
            },

            // Header
            div { class: "header",
                h1 { "World Atlas" }
                if let Some(text) = notice.read().clone() {
                    div { class: "notice", "{text}" }
                }
                button {
                    class: "secondary",
                    title: "Help",
                    onclick: move |_| show_help.set(true),
                    "?"
                }
            }

            // Sidebar
            div { class: "sidebar",
                div { class: "panel",
                    h3 { "Map" }
                    select {
                        value: "{selected_map}",
                        onchange: move |evt: Event<FormData>| selected_map.set(evt.value().to_string()),
                        for m in &maps {
                            option {
                                value: "{m.file_name}",
                                selected: *selected_map.read() == m.file_name,
                                "{m.display_name}"
                            }
                        }
                    }
                }

                LocationPanel {
                    world: world,
                    machine: machine,
                    viewport: viewport,
                    frame: frame,
                    selected: selected,
                    unsaved_moves: unsaved_moves,
                    on_intents: handle_intents,
                }

                TravelPanel { world: world, selected: selected }

                TypeFilterPanel { machine: machine }
            }

            // Map
            if let Some(map) = current_map {
                MapView {
                    image_url: artwork_url(&map),
                    world: world,
                    machine: machine,
                    viewport: viewport,
                    frame: frame,
                    selected: selected,
                    on_intents: handle_intents,
                }
            } else {
                div { class: "map-wrapper",
                    p { class: "hint", "No map artwork available." }
                }
            }

            HelpOverlay { show: show_help }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_url() {
        let map = MapArtwork {
            display_name: "The Continent".into(),
            file_name: "continent.webp".into(),
            width: 2048.0,
            height: 1536.0,
        };
        assert_eq!(artwork_url(&map), "/static/maps/continent.webp");
    }
}
