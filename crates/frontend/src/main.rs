mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/world/:id")]
    WorldView { id: String },
}

#[component]
fn Home() -> Element {
    // A fresh id per visit; the world exists once something is saved into it
    let new_world = use_hook(|| uuid::Uuid::new_v4().to_string());

    rsx! {
        div { class: "app landing",
            h1 { "World Atlas" }
            p { "Place cities, villages and ruins on your map artwork and connect them with roads." }
            Link {
                class: "button",
                to: Route::WorldView { id: new_world },
                "Start a new world"
            }
        }
    }
}

#[component]
fn WorldView(id: String) -> Element {
    rsx! {
        pages::world::WorldPage { world_id: id }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
