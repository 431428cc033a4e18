use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "Help" }

                // --- Map controls ---

                div { class: "shortcut-section",
                    h3 { "Navigating" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Drag" }
                        span { "Pan the map" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Wheel" }
                        span { "Zoom around the view centre (50%\u{2013}400%)" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "+ / \u{2212} / \u{27f3}" }
                        span { "Zoom buttons and reset view" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Click marker" }
                        span { "Select a location" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Editing" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Drag marker" }
                        span { "Move a location (edit mode), then save its position" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Start road" }
                        span { "Begin a road from the selected location" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Right-click" }
                        span { "Add a waypoint while drawing a road" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Click empty space" }
                        span { "Undo the last waypoint, or cancel the road when there is none" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Click a location" }
                        span { "Finish the road there (left or right click)" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } }
                        span { "Cancel the road or drag / close help" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "H" } " / " kbd { "?" } }
                        span { "Toggle this help" }
                    }
                }

                // --- Travel estimates ---

                div { class: "help-divider" }

                h2 { class: "help-section-title", "Travel Estimates" }

                div { class: "help-info-section",
                    h3 { "Distance" }
                    p { "Road length is measured along every waypoint in map pixels, at 2.38 pixels per mile." }
                }

                div { class: "help-info-section",
                    h3 { "Travel time" }
                    p { "On foot 24 miles a day, on horseback 48, by caravan 16. Times are shown in days and hours." }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}
