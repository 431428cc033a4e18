use dioxus::prelude::*;

use atlas_shared::calc;
use atlas_shared::models::{LocationId, RoadType};
use atlas_shared::world::WorldMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RoadSummary {
    pub name: String,
    pub road_type: RoadType,
    pub miles: String,
    /// (travel mode, duration label)
    pub estimates: Vec<(String, String)>,
}

/// Length and travel times of every road touching a location.
pub fn road_summaries(world: &WorldMap, location: LocationId) -> Vec<RoadSummary> {
    world
        .roads_for(location)
        .filter_map(|road| {
            let estimates = world.road_travel_estimates(road.id)?;
            Some(RoadSummary {
                name: road.name.clone(),
                road_type: road.road_type,
                miles: calc::format_miles(road.length_miles()),
                estimates: estimates
                    .into_iter()
                    .map(|e| (e.mode.to_string(), e.label))
                    .collect(),
            })
        })
        .collect()
}

#[component]
pub fn TravelPanel(world: Signal<WorldMap>, selected: Signal<Option<LocationId>>) -> Element {
    let Some(location) = *selected.read() else {
        return rsx! {};
    };
    let summaries = road_summaries(&world.read(), location);

    rsx! {
        div { class: "panel",
            h3 { "Roads" }
            if summaries.is_empty() {
                p { class: "hint", "No roads from here yet." }
            }
            for summary in summaries {
                div { class: "road-summary",
                    div { class: "calc-row",
                        span { class: "calc-label", "{summary.name}" }
                        span { class: "calc-value", "{summary.miles}" }
                    }
                    span { class: "road-type", "{summary.road_type}" }
                    for (mode, label) in summary.estimates {
                        div { class: "calc-row travel-row",
                            span { class: "calc-label", "{mode}" }
                            span { class: "calc-value", "{label}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_shared::geometry::Position;
    use atlas_shared::models::{LocationType, Road};
    use uuid::Uuid;

    #[test]
    fn test_road_summaries_for_location() {
        let mut w = WorldMap::new(Uuid::new_v4());
        let a = w.add_location("Ashford", LocationType::City, Position::new(0.0, 0.0));
        let b = w.add_location("Brindle", LocationType::Village, Position::new(238.0, 0.0));
        let c = w.add_location("Cairn", LocationType::Ruins, Position::new(0.0, 500.0));
        w.insert_road(Road::between(&a, &b, RoadType::Major, Vec::new()));

        let summaries = road_summaries(&w, a.id);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Ashford to Brindle");
        assert_eq!(summaries[0].road_type, RoadType::Major);
        assert_eq!(summaries[0].miles, calc::format_miles(100.0));
        assert_eq!(summaries[0].estimates.len(), 3);

        assert_eq!(road_summaries(&w, b.id).len(), 1);
        assert!(road_summaries(&w, c.id).is_empty());
    }
}
