//! Persisted path finder configurations
//!
//! The host keeps a list of records in its scene metadata. Only the
//! configuration is stored; the grid and graph are rebuilt on load by
//! resolving the mesh names against the live scene.

use crate::pathfinder::GridPathfinder;
use navgrid::{RasterConfig, Scene, DEFAULT_GRID_SIZE, DEFAULT_RAY_HEIGHT, DEFAULT_RAY_LENGTH};
use navgrid_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scene metadata key holding the record list
pub const METADATA_KEY: &str = "PathFinderExtension";

/// Name given to records created with default values
pub const DEFAULT_RECORD_NAME: &str = "New path finder configuration";

/// One saved path finder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathFinderRecord {
    pub name: String,
    /// Grid resolution before truncation
    pub size: f32,
    pub ray_height: f32,
    pub ray_length: f32,
    /// Names of the scene meshes to rasterize
    pub cast_meshes: Vec<String>,
}

impl Default for PathFinderRecord {
    fn default() -> Self {
        Self {
            name: DEFAULT_RECORD_NAME.to_string(),
            size: DEFAULT_GRID_SIZE as f32,
            ray_height: DEFAULT_RAY_HEIGHT,
            ray_length: DEFAULT_RAY_LENGTH,
            cast_meshes: Vec::new(),
        }
    }
}

impl PathFinderRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_config(&self) -> RasterConfig {
        RasterConfig::new(self.size)
            .with_ray_height(Some(self.ray_height))
            .with_ray_length(Some(self.ray_length))
    }

    /// Rebuilds a pathfinder from the live scene.
    ///
    /// Names that do not resolve to a mesh are skipped. When none resolves
    /// the pathfinder is returned unfilled.
    pub fn build(&self, scene: &mut Scene) -> GridPathfinder {
        let mut pathfinder = GridPathfinder::with_config(RasterConfig::new(self.size));

        for name in &self.cast_meshes {
            let castable = scene
                .surface_by_name(name)
                .is_some_and(|s| s.as_cast_surface().is_some());
            if !castable {
                log::warn!("Path finder '{}': no mesh named '{}' in scene", self.name, name);
            }
        }

        let surfaces: Vec<_> = scene
            .surfaces_named_mut(&self.cast_meshes)
            .into_iter()
            .filter(|s| s.as_cast_surface().is_some())
            .collect();
        if surfaces.is_empty() {
            log::debug!("Path finder '{}': nothing to rasterize", self.name);
            return pathfinder;
        }

        pathfinder.fill(surfaces, Some(self.ray_height), Some(self.ray_length));
        pathfinder
    }
}

/// Reads the record list from scene metadata.
///
/// A missing or null entry yields a list holding one default record.
pub fn records_from_metadata(metadata: &Value) -> Result<Vec<PathFinderRecord>> {
    match metadata.get(METADATA_KEY) {
        None | Some(Value::Null) => Ok(vec![PathFinderRecord::default()]),
        Some(value) => Ok(Vec::<PathFinderRecord>::deserialize(value)?),
    }
}

/// Stores the record list into scene metadata, creating the metadata object if unset
pub fn write_records_to_metadata(metadata: &mut Value, records: &[PathFinderRecord]) -> Result<()> {
    if metadata.is_null() {
        *metadata = Value::Object(Map::new());
    }
    let Value::Object(map) = metadata else {
        return Err(Error::InvalidConfig(
            "scene metadata is not a JSON object".to_string(),
        ));
    };
    map.insert(METADATA_KEY.to_string(), serde_json::to_value(records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use navgrid::{MeshSurface, Surface};
    use navgrid_common::TriMesh;
    use serde_json::json;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(MeshSurface::new("ground", TriMesh::quad_xz(0.0, 0.0, 4.0, 4.0, 0.0)));
        scene.add(Surface::Other {
            name: "sun".to_string(),
        });
        scene
    }

    #[test]
    fn test_default_record() -> Result<()> {
        let json = serde_json::to_value(PathFinderRecord::default())?;
        assert_eq!(
            json,
            json!({
                "name": "New path finder configuration",
                "size": 100.0,
                "rayHeight": 10.0,
                "rayLength": 100.0,
                "castMeshes": [],
            })
        );
        Ok(())
    }

    #[test]
    fn test_from_json_fills_missing_fields() -> Result<()> {
        let record = PathFinderRecord::from_json(r#"{ "name": "level", "size": 12.9, "castMeshes": ["ground"] }"#)?;
        assert_eq!(record.name, "level");
        assert_eq!(record.ray_height, DEFAULT_RAY_HEIGHT);
        assert_eq!(record.to_config().grid_size, 12);
        assert_eq!(PathFinderRecord::from_json(&record.to_json()?)?, record);
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PathFinderRecord::from_json("{ size: }"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_build_resolves_names() {
        let mut scene = scene();
        let record = PathFinderRecord {
            size: 4.0,
            cast_meshes: vec!["ground".to_string(), "missing".to_string()],
            ..Default::default()
        };
        let pathfinder = record.build(&mut scene);
        assert_eq!(pathfinder.grid().occupied_count(), 16);
        assert!(pathfinder
            .from_to(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 3.0), false)
            .is_some());
    }

    #[test]
    fn test_build_without_meshes_is_unfilled() {
        let mut scene = scene();
        let record = PathFinderRecord {
            size: 4.0,
            cast_meshes: vec!["sun".to_string(), "missing".to_string()],
            ..Default::default()
        };
        let pathfinder = record.build(&mut scene);
        assert_eq!(pathfinder.width(), 4);
        assert_eq!(pathfinder.grid().occupied_count(), 0);
    }

    #[test]
    fn test_metadata_without_key_gives_default() -> Result<()> {
        assert_eq!(records_from_metadata(&json!({}))?, vec![PathFinderRecord::default()]);
        assert_eq!(records_from_metadata(&Value::Null)?, vec![PathFinderRecord::default()]);
        Ok(())
    }

    #[test]
    fn test_metadata_write_then_read() -> Result<()> {
        let mut metadata = json!({ "other": 1 });
        let records = vec![
            PathFinderRecord::default(),
            PathFinderRecord {
                name: "second".to_string(),
                cast_meshes: vec!["ground".to_string()],
                ..Default::default()
            },
        ];
        write_records_to_metadata(&mut metadata, &records)?;
        assert_eq!(metadata["other"], 1);
        assert_eq!(metadata[METADATA_KEY][1]["castMeshes"][0], "ground");
        assert_eq!(records_from_metadata(&metadata)?, records);

        let mut unset = Value::Null;
        write_records_to_metadata(&mut unset, &records)?;
        assert!(unset.get(METADATA_KEY).is_some());

        assert!(write_records_to_metadata(&mut json!([1, 2]), &records).is_err());
        Ok(())
    }
}
