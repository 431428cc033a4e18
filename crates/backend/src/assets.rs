use atlas_shared::models::MapArtwork;
use std::path::Path;

pub struct Assets {
    pub maps: Vec<MapArtwork>,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let maps_path = assets_dir.join("maps.json");

        let maps_data = std::fs::read_to_string(&maps_path)
            .map_err(|e| format!("Failed to read {}: {}", maps_path.display(), e))?;
        let maps: Vec<MapArtwork> = serde_json::from_str(&maps_data)
            .map_err(|e| format!("Failed to parse maps.json: {}", e))?;

        tracing::info!(maps = maps.len(), "Loaded map artwork catalog");

        Ok(Assets { maps })
    }
}
