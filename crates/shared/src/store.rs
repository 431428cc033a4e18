use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::interaction::Intent;
use crate::models::{Location, LocationId, Road, RoadId, WorldId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("location {0} not found")]
    NotFound(LocationId),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Persistence collaborator for map locations and the roads between them.
pub trait LocationStore {
    fn list(&self, world_id: WorldId) -> Result<Vec<Location>, StoreError>;
    fn create(&self, location: &Location) -> Result<(), StoreError>;
    fn update(&self, location: &Location) -> Result<(), StoreError>;
    fn delete(&self, id: LocationId) -> Result<bool, StoreError>;

    fn list_roads(&self, world_id: WorldId) -> Result<Vec<Road>, StoreError>;
    fn create_road(&self, road: &Road) -> Result<(), StoreError>;
}

/// Apply the persistence side of a batch of intents, in order. Stops at the
/// first failure; in-memory state is never rolled back, the caller decides
/// how to tell the author.
pub fn persist(store: &dyn LocationStore, intents: &[Intent]) -> Result<usize, StoreError> {
    let mut applied = 0;
    for intent in intents.iter().filter(|i| i.is_persistence()) {
        match intent {
            Intent::CreateLocation(location) => store.create(location)?,
            Intent::PersistLocation(location) => store.update(location)?,
            Intent::CreateRoad(road) => store.create_road(road)?,
            Intent::DeleteLocation(id) => {
                store.delete(*id)?;
            }
            _ => {}
        }
        applied += 1;
    }
    Ok(applied)
}

/// Single-threaded in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    locations: RefCell<BTreeMap<LocationId, Location>>,
    roads: RefCell<BTreeMap<RoadId, Road>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryStore {
    fn list(&self, world_id: WorldId) -> Result<Vec<Location>, StoreError> {
        Ok(self
            .locations
            .borrow()
            .values()
            .filter(|l| l.world_id == world_id)
            .cloned()
            .collect())
    }

    fn create(&self, location: &Location) -> Result<(), StoreError> {
        self.locations.borrow_mut().insert(location.id, location.clone());
        Ok(())
    }

    fn update(&self, location: &Location) -> Result<(), StoreError> {
        let mut locations = self.locations.borrow_mut();
        match locations.get_mut(&location.id) {
            Some(existing) => {
                *existing = location.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(location.id)),
        }
    }

    fn delete(&self, id: LocationId) -> Result<bool, StoreError> {
        Ok(self.locations.borrow_mut().remove(&id).is_some())
    }

    fn list_roads(&self, world_id: WorldId) -> Result<Vec<Road>, StoreError> {
        Ok(self
            .roads
            .borrow()
            .values()
            .filter(|r| r.world_id == world_id)
            .cloned()
            .collect())
    }

    fn create_road(&self, road: &Road) -> Result<(), StoreError> {
        self.roads.borrow_mut().insert(road.id, road.clone());
        Ok(())
    }
}
