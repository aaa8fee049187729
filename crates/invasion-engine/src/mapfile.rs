//! Reading and writing map files.
//!
//! The format follows the file extension: `.json` is the JSON document
//! form, anything else is the line grammar.

use std::path::Path;

use invasion_world::{Topology, WorldMap, parse_document, parse_json, records_to_json};
use tracing::info;

use crate::error::EngineError;

/// On-disk map format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// One city per line.
    Text,
    /// A JSON array of city records.
    Json,
}

impl MapFormat {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::Json } else { Self::Text }
    }
}

/// Load and build a world from `path`.
pub fn load_world(path: &Path, topology: Topology) -> Result<WorldMap, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let format = MapFormat::from_path(path);
    let records = match format {
        MapFormat::Json => parse_json(&contents)?,
        MapFormat::Text => parse_document(&contents).map_err(invasion_world::WorldError::from)?,
    };
    let world = WorldMap::from_records(&records, topology);
    info!(
        path = %path.display(),
        ?format,
        ?topology,
        cities = world.city_count(),
        roads = world.road_count(),
        "World loaded"
    );
    Ok(world)
}

/// Render a world in the given format.
pub fn render_world(world: &WorldMap, format: MapFormat) -> Result<String, EngineError> {
    match format {
        MapFormat::Json => Ok(records_to_json(&world.to_records())?),
        MapFormat::Text => Ok(world.to_string()),
    }
}

/// Write a world to `path`, choosing the format from the extension.
pub fn write_world(path: &Path, world: &WorldMap) -> Result<(), EngineError> {
    let rendered = render_world(world, MapFormat::from_path(path))?;
    std::fs::write(path, rendered).map_err(|source| EngineError::File {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), cities = world.city_count(), "Surviving map written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MAP: &str = "Foo north=Bar west=Baz south=Qu-ux\nBar south=Foo west=Bee\n";

    #[test]
    fn format_follows_extension() {
        assert_eq!(MapFormat::from_path(Path::new("a/b.json")), MapFormat::Json);
        assert_eq!(MapFormat::from_path(Path::new("MAP.JSON")), MapFormat::Json);
        assert_eq!(MapFormat::from_path(Path::new("map.txt")), MapFormat::Text);
        assert_eq!(MapFormat::from_path(Path::new("map")), MapFormat::Text);
    }

    #[test]
    fn text_map_survives_write_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.txt");
        std::fs::write(&input, MAP).unwrap();

        let world = load_world(&input, Topology::Undirected).unwrap();
        assert_eq!(world.city_count(), 5);

        let output = dir.path().join("out.txt");
        write_world(&output, &world).unwrap();
        let reloaded = load_world(&output, Topology::Undirected).unwrap();
        assert_eq!(reloaded, world);
    }

    #[test]
    fn json_output_loads_like_text_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.txt");
        std::fs::write(&input, MAP).unwrap();
        let world = load_world(&input, Topology::Directed).unwrap();

        let output = dir.path().join("out.json");
        write_world(&output, &world).unwrap();
        let reloaded = load_world(&output, Topology::Directed).unwrap();
        assert_eq!(reloaded, world);
    }

    #[test]
    fn parse_errors_surface_as_world_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        std::fs::write(&input, "Foo north=Bar\nBar up=Foo\n").unwrap();
        let err = load_world(&input, Topology::Undirected).unwrap_err();
        assert!(matches!(err, EngineError::World { .. }));
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_world(Path::new("/no/such/map.txt"), Topology::Undirected).unwrap_err();
        assert!(err.to_string().contains("/no/such/map.txt"), "{err}");
    }

    #[test]
    fn empty_world_renders_as_empty_text() {
        let world = WorldMap::new(Topology::Undirected);
        assert_eq!(render_world(&world, MapFormat::Text).unwrap(), "");
        assert_eq!(render_world(&world, MapFormat::Json).unwrap(), "[]");
    }
}
