use dioxus::prelude::*;

use atlas_shared::interaction::InteractionStateMachine;
use atlas_shared::markers::TypeFilter;
use atlas_shared::models::LocationType;

#[component]
pub fn TypeFilterPanel(machine: Signal<InteractionStateMachine>) -> Element {
    let mut machine = machine;
    let visible = machine.read().visible_types();

    rsx! {
        div { class: "panel",
            h3 { "Show" }
            for t in LocationType::ALL {
                label { class: "filter-row",
                    input {
                        r#type: "checkbox",
                        checked: visible.contains(t),
                        onchange: move |_| {
                            let mut filter = machine.peek().visible_types();
                            filter.toggle(t);
                            machine.write().set_visible_types(filter);
                        },
                    }
                    "{t}"
                }
            }
            div { class: "filter-actions",
                button {
                    class: "secondary",
                    onclick: move |_| machine.write().set_visible_types(TypeFilter::all()),
                    "All"
                }
                button {
                    class: "secondary",
                    onclick: move |_| machine.write().set_visible_types(TypeFilter::none()),
                    "None"
                }
            }
        }
    }
}
