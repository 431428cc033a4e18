use std::collections::HashSet;

use crate::calc::{self, TravelEstimate};
use crate::geometry::Position;
use crate::markers::{self, TypeFilter};
use crate::models::{Location, LocationId, LocationType, Road, RoadId, WorldId};

/// In-memory locations and roads of one world, as edited by the map view.
///
/// Location order is draw order: later entries render on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldMap {
    world_id: WorldId,
    locations: Vec<Location>,
    roads: Vec<Road>,
    pending_deletion: HashSet<LocationId>,
}

impl WorldMap {
    pub fn new(world_id: WorldId) -> Self {
        WorldMap {
            world_id,
            ..Default::default()
        }
    }

    pub fn with_contents(world_id: WorldId, locations: Vec<Location>, roads: Vec<Road>) -> Self {
        WorldMap {
            world_id,
            locations,
            roads,
            pending_deletion: HashSet::new(),
        }
    }

    pub fn world_id(&self) -> WorldId {
        self.world_id
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.iter_mut().find(|l| l.id == id)
    }

    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.iter().find(|r| r.id == id)
    }

    /// Locations that should be drawn and can be hit: visible type and not
    /// marked for deletion.
    pub fn visible_locations(&self, filter: TypeFilter) -> impl DoubleEndedIterator<Item = &Location> {
        self.locations
            .iter()
            .filter(move |l| filter.contains(l.location_type) && !self.pending_deletion.contains(&l.id))
    }

    pub fn hit_test(&self, pos: Position, filter: TypeFilter) -> Option<&Location> {
        markers::hit_test(pos, self.visible_locations(filter), TypeFilter::all())
    }

    /// Author action: create a location. The caller persists the returned copy
    /// through `LocationStore::create`.
    pub fn add_location(
        &mut self,
        name: impl Into<String>,
        location_type: LocationType,
        coordinates: Position,
    ) -> Location {
        let location = Location::new(self.world_id, name, location_type, coordinates);
        self.locations.push(location.clone());
        location
    }

    pub fn insert_road(&mut self, road: Road) {
        self.roads.push(road);
    }

    /// Flag a location for deletion. It disappears from the map immediately
    /// and is removed for good by [`WorldMap::take_pending_deletions`].
    pub fn mark_for_deletion(&mut self, id: LocationId) -> bool {
        if self.location(id).is_none() {
            return false;
        }
        self.pending_deletion.insert(id)
    }

    pub fn unmark_for_deletion(&mut self, id: LocationId) -> bool {
        self.pending_deletion.remove(&id)
    }

    pub fn is_marked_for_deletion(&self, id: LocationId) -> bool {
        self.pending_deletion.contains(&id)
    }

    /// Drop every marked location and return their ids for the store.
    /// Roads referencing them are left untouched.
    pub fn take_pending_deletions(&mut self) -> Vec<LocationId> {
        let pending = std::mem::take(&mut self.pending_deletion);
        let mut removed = Vec::with_capacity(pending.len());
        self.locations.retain(|l| {
            if pending.contains(&l.id) {
                removed.push(l.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn roads_for(&self, location_id: LocationId) -> impl Iterator<Item = &Road> {
        self.roads.iter().filter(move |r| r.connects(location_id))
    }

    pub fn road_travel_estimates(&self, road_id: RoadId) -> Option<Vec<TravelEstimate>> {
        self.road(road_id).map(|r| calc::travel_estimates(&r.points))
    }
}
