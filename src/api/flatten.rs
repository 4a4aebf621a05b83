use anyhow::Result;

use crate::library::Library;
use crate::resolver::{self, LabelLayer, PathLayer, PolygonLayer};
use std::collections::HashMap;

/// Flatten `root` and return only its polygon layers.
pub fn flatten_polygons(library: &Library, root: &str) -> Result<HashMap<String, PolygonLayer>> {
    Ok(resolver::flatten(library, root)?.polygons)
}

/// Flatten `root` and return only its path layers.
pub fn flatten_paths(library: &Library, root: &str) -> Result<HashMap<String, PathLayer>> {
    Ok(resolver::flatten(library, root)?.paths)
}

/// Flatten `root` and return only its label layers.
pub fn flatten_labels(library: &Library, root: &str) -> Result<HashMap<String, LabelLayer>> {
    Ok(resolver::flatten(library, root)?.labels)
}

/// Flatten `root` into the full polygon/path/label layer bundle.
pub fn flatten_all(library: &Library, root: &str) -> Result<resolver::LayerMapBundle> {
    resolver::flatten(library, root)
}
