use dioxus::prelude::*;

use atlas_shared::coords::{self as geo, ImageFrame};
use atlas_shared::interaction::{Intent, InteractionStateMachine, MapEvent};
use atlas_shared::models::{LocationId, LocationType, RoadType};
use atlas_shared::viewport::ViewportController;
use atlas_shared::world::WorldMap;

use crate::components::map_view::dispatch;

const ROAD_DRAWING_HINT: &str = "Right-click to add a waypoint, click empty space to undo it, click a location to finish.";

/// Select option values are indexes into `LocationType::ALL`.
fn location_type_from_value(value: &str) -> Option<LocationType> {
    value.parse::<usize>().ok().and_then(|i| LocationType::ALL.get(i).copied())
}

fn road_type_from_value(value: &str) -> Option<RoadType> {
    value.parse::<usize>().ok().and_then(|i| RoadType::ALL.get(i).copied())
}

fn format_coordinates(x: f64, y: f64) -> String {
    format!("{:.0}, {:.0}", x, y)
}

#[component]
pub fn LocationPanel(
    world: Signal<WorldMap>,
    machine: Signal<InteractionStateMachine>,
    viewport: Signal<ViewportController>,
    frame: Signal<ImageFrame>,
    selected: Signal<Option<LocationId>>,
    unsaved_moves: Signal<Vec<LocationId>>,
    on_intents: EventHandler<Vec<Intent>>,
) -> Element {
    let mut world = world;
    let mut machine = machine;
    let mut selected = selected;
    let mut unsaved_moves = unsaved_moves;

    let mut new_name = use_signal(String::new);
    let mut new_type = use_signal(|| LocationType::City);
    let mut road_type = use_signal(RoadType::default);

    let edit_mode = machine.read().edit_mode();
    let road_progress = machine
        .read()
        .road_session()
        .map(|s| s.waypoints.len());
    let current = (*selected.read()).and_then(|id| world.read().location(id).cloned());

    rsx! {
        div { class: "panel",
            h3 { "Locations" }

            label { class: "toggle-row",
                input {
                    r#type: "checkbox",
                    checked: edit_mode,
                    onchange: move |evt: Event<FormData>| {
                        machine.write().set_edit_mode(evt.checked());
                    },
                }
                "Edit mode"
            }

            if edit_mode {
                div { class: "new-location",
                    input {
                        r#type: "text",
                        placeholder: "New location name",
                        value: "{new_name}",
                        oninput: move |evt: Event<FormData>| new_name.set(evt.value()),
                    }
                    select {
                        onchange: move |evt: Event<FormData>| {
                            if let Some(t) = location_type_from_value(&evt.value()) {
                                new_type.set(t);
                            }
                        },
                        for (i, t) in LocationType::ALL.into_iter().enumerate() {
                            option {
                                value: "{i}",
                                selected: *new_type.read() == t,
                                "{t}"
                            }
                        }
                    }
                    button {
                        disabled: new_name.read().trim().is_empty(),
                        onclick: move |_| {
                            let name = new_name.peek().trim().to_string();
                            if name.is_empty() {
                                return;
                            }
                            // New locations land on the image point under the view centre
                            let fr = *frame.peek();
                            let vp = *viewport.peek().viewport();
                            let Some(pos) = geo::to_image_space(fr.container_size().center(), &vp, &fr) else {
                                return;
                            };
                            let location = world.write().add_location(name, *new_type.peek(), pos);
                            selected.set(Some(location.id));
                            new_name.set(String::new());
                            on_intents.call(vec![Intent::CreateLocation(location)]);
                        },
                        "Add at view centre"
                    }
                }
            }

            if let Some(count) = road_progress {
                div { class: "road-progress",
                    p { "Drawing road: {count} waypoint(s)." }
                    p { class: "hint", "{ROAD_DRAWING_HINT}" }
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            let intents = dispatch(MapEvent::Cancel, machine, viewport, frame, world);
                            on_intents.call(intents);
                        },
                        "Cancel road"
                    }
                }
            }

            {match current {
                None => rsx! {
                    p { class: "hint", "Click a marker to select it." }
                },
                Some(location) => {
                    let id = location.id;
                    let marked = world.read().is_marked_for_deletion(id);
                    let moved = unsaved_moves.read().contains(&id);
                    let coords = format_coordinates(location.coordinates.x, location.coordinates.y);
                    rsx! {
                        div { class: "location-detail",
                            h4 { "{location.name}" }
                            div { class: "calc-row",
                                span { class: "calc-label", "Type" }
                                span { class: "calc-value", "{location.location_type}" }
                            }
                            div { class: "calc-row",
                                span { class: "calc-label", "Position" }
                                span { class: "calc-value", "{coords}" }
                            }

                            if moved {
                                button {
                                    onclick: move |_| {
                                        let Some(location) = world.peek().location(id).cloned() else {
                                            return;
                                        };
                                        unsaved_moves.write().retain(|m| *m != id);
                                        on_intents.call(vec![Intent::PersistLocation(location)]);
                                    },
                                    "Save position"
                                }
                            }

                            if road_progress.is_none() && !marked {
                                div { class: "start-road",
                                    select {
                                        onchange: move |evt: Event<FormData>| {
                                            if let Some(t) = road_type_from_value(&evt.value()) {
                                                road_type.set(t);
                                            }
                                        },
                                        for (i, t) in RoadType::ALL.into_iter().enumerate() {
                                            option {
                                                value: "{i}",
                                                selected: *road_type.read() == t,
                                                "{t}"
                                            }
                                        }
                                    }
                                    button {
                                        onclick: move |_| {
                                            let event = MapEvent::StartRoad { location_id: id, road_type: *road_type.peek() };
                                            let intents = dispatch(event, machine, viewport, frame, world);
                                            on_intents.call(intents);
                                        },
                                        "Start road"
                                    }
                                }
                            }

                            if edit_mode {
                                if marked {
                                    div { class: "delete-confirm",
                                        button {
                                            class: "danger",
                                            onclick: move |_| {
                                                let removed = world.write().take_pending_deletions();
                                                unsaved_moves.write().retain(|m| !removed.contains(m));
                                                selected.set(None);
                                                on_intents.call(removed.into_iter().map(Intent::DeleteLocation).collect());
                                            },
                                            "Confirm delete"
                                        }
                                        button {
                                            class: "secondary",
                                            onclick: move |_| {
                                                world.write().unmark_for_deletion(id);
                                            },
                                            "Restore"
                                        }
                                    }
                                } else {
                                    button {
                                        class: "danger",
                                        onclick: move |_| {
                                            world.write().mark_for_deletion(id);
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }}
        }
    }
}
