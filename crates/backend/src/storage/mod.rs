use atlas_shared::models::{Location, LocationId, Road, WorldId};
use atlas_shared::store::{LocationStore, StoreError};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

const LOCATIONS_TABLE: JsonTable = TableDefinition::new("locations");
const ROADS_TABLE: JsonTable = TableDefinition::new("roads");

fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// redb-backed location store. Values are JSON documents keyed by id.
pub struct Storage {
    db: Database,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, StoreError> {
        let db = Database::create(path).map_err(backend)?;

        // Ensure tables exist
        let write_txn = db.begin_write().map_err(backend)?;
        {
            write_txn.open_table(LOCATIONS_TABLE).map_err(backend)?;
            write_txn.open_table(ROADS_TABLE).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;

        tracing::info!(path = %path.display(), "Opened location database");
        Ok(Arc::new(Storage { db }))
    }

    fn put<T: Serialize>(&self, table: JsonTable, id: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(table).map_err(backend)?;
            table.insert(id, json.as_slice()).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, table: JsonTable) -> Result<Vec<T>, StoreError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(table).map_err(backend)?;
        let mut out = Vec::new();
        for entry in table.iter().map_err(backend)? {
            let (_, value) = entry.map_err(backend)?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }
}

impl LocationStore for Storage {
    fn list(&self, world_id: WorldId) -> Result<Vec<Location>, StoreError> {
        let all: Vec<Location> = self.scan(LOCATIONS_TABLE)?;
        Ok(all.into_iter().filter(|l| l.world_id == world_id).collect())
    }

    fn create(&self, location: &Location) -> Result<(), StoreError> {
        self.put(LOCATIONS_TABLE, &location.id.to_string(), location)
    }

    fn update(&self, location: &Location) -> Result<(), StoreError> {
        let json = serde_json::to_vec(location)?;
        let id_str = location.id.to_string();

        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(LOCATIONS_TABLE).map_err(backend)?;
            let exists = table.get(id_str.as_str()).map_err(backend)?.is_some();
            if !exists {
                return Err(StoreError::NotFound(location.id));
            }
            table
                .insert(id_str.as_str(), json.as_slice())
                .map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }

    fn delete(&self, id: LocationId) -> Result<bool, StoreError> {
        let id_str = id.to_string();
        let write_txn = self.db.begin_write().map_err(backend)?;
        let removed = {
            let mut table = write_txn.open_table(LOCATIONS_TABLE).map_err(backend)?;
            let result = table.remove(id_str.as_str()).map_err(backend)?;
            result.is_some()
        };
        write_txn.commit().map_err(backend)?;
        Ok(removed)
    }

    fn list_roads(&self, world_id: WorldId) -> Result<Vec<Road>, StoreError> {
        let all: Vec<Road> = self.scan(ROADS_TABLE)?;
        Ok(all.into_iter().filter(|r| r.world_id == world_id).collect())
    }

    fn create_road(&self, road: &Road) -> Result<(), StoreError> {
        self.put(ROADS_TABLE, &road.id.to_string(), road)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_shared::geometry::Position;
    use atlas_shared::models::{LocationType, RoadType};
    use uuid::Uuid;

    fn open_temp() -> (tempfile::TempDir, Arc<Storage>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("atlas.redb")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_create_list_filters_by_world() {
        let (_dir, storage) = open_temp();
        let world = Uuid::new_v4();
        let a = Location::new(world, "Ashford", LocationType::City, Position::new(1.0, 2.0));
        let other = Location::new(Uuid::new_v4(), "Elsewhere", LocationType::Fort, Position::ZERO);
        storage.create(&a).unwrap();
        storage.create(&other).unwrap();

        assert_eq!(storage.list(world).unwrap(), vec![a]);
    }

    #[test]
    fn test_update_and_delete() {
        let (_dir, storage) = open_temp();
        let world = Uuid::new_v4();
        let mut a = Location::new(world, "Ashford", LocationType::City, Position::new(1.0, 2.0));
        storage.create(&a).unwrap();

        a.coordinates = Position::new(50.0, 60.0);
        storage.update(&a).unwrap();
        assert_eq!(storage.list(world).unwrap()[0].coordinates, Position::new(50.0, 60.0));

        assert!(storage.delete(a.id).unwrap());
        assert!(!storage.delete(a.id).unwrap());
        assert!(storage.list(world).unwrap().is_empty());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_dir, storage) = open_temp();
        let ghost = Location::new(Uuid::new_v4(), "Ghost", LocationType::Ruins, Position::ZERO);
        assert_eq!(storage.update(&ghost), Err(StoreError::NotFound(ghost.id)));
        assert!(storage.list(ghost.world_id).unwrap().is_empty());
    }

    #[test]
    fn test_roads_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.redb");
        let world = Uuid::new_v4();
        let a = Location::new(world, "Ashford", LocationType::City, Position::new(10.0, 10.0));
        let b = Location::new(world, "Brindle", LocationType::Village, Position::new(30.0, 10.0));
        let road = Road::between(&a, &b, RoadType::Path, Vec::new());
        {
            let storage = Storage::open(&path).unwrap();
            storage.create_road(&road).unwrap();
        }
        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.list_roads(world).unwrap(), vec![road]);
        assert!(storage.list_roads(Uuid::new_v4()).unwrap().is_empty());
    }
}
