use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::CountyId;
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// CountyShape / BoundaryCatalog
// ---------------------------------------------------------------------------

/// A single linear ring of `[lon, lat]` points.
pub type Ring = Vec<[f64; 2]>;

/// Outline of one county: a list of polygons, each an exterior ring followed
/// by its holes. Only the map reads these; filtering never looks inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountyShape {
    pub polygons: Vec<Vec<Ring>>,
}

/// Immutable id → shape mapping.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCatalog {
    shapes: BTreeMap<CountyId, CountyShape>,
}

impl BoundaryCatalog {
    pub fn from_shapes(shapes: BTreeMap<CountyId, CountyShape>) -> Self {
        BoundaryCatalog { shapes }
    }

    pub fn contains(&self, id: &CountyId) -> bool {
        self.shapes.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountyId, &CountyShape)> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

// ---------------------------------------------------------------------------
// GeoJSON reader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<JsonValue>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, JsonValue>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: JsonValue,
}

/// Load a GeoJSON `FeatureCollection` of county outlines.
///
/// The county id is read from the feature `id`, falling back to
/// `properties.fips` and then the last five digits of `properties.GEO_ID`.
/// Features whose geometry is neither `Polygon` nor `MultiPolygon` are
/// skipped.
pub fn load_boundaries(path: &Path) -> Result<BoundaryCatalog, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataLoadError::io(path, e))?;
    parse_boundaries(path, &text)
}

fn parse_boundaries(path: &Path, text: &str) -> Result<BoundaryCatalog, DataLoadError> {
    let collection: FeatureCollection = serde_json::from_str(text)
        .map_err(|e| DataLoadError::boundaries(path, e.to_string()))?;
    if collection.kind != "FeatureCollection" {
        return Err(DataLoadError::boundaries(
            path,
            format!("expected a FeatureCollection, found '{}'", collection.kind),
        ));
    }

    let mut shapes = BTreeMap::new();
    let mut skipped = 0usize;
    for (i, feature) in collection.features.into_iter().enumerate() {
        let id = feature_id(&feature)
            .ok_or_else(|| DataLoadError::boundaries(path, format!("feature {i} has no county id")))?;

        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };
        let polygons = match geometry.kind.as_str() {
            "Polygon" => vec![polygon_rings(path, &id, geometry.coordinates)?],
            "MultiPolygon" => {
                let parts: Vec<JsonValue> = serde_json::from_value(geometry.coordinates)
                    .map_err(|e| DataLoadError::boundaries(path, format!("county {id}: {e}")))?;
                parts
                    .into_iter()
                    .map(|p| polygon_rings(path, &id, p))
                    .collect::<Result<_, _>>()?
            }
            other => {
                log::warn!("county {id}: skipping unsupported geometry type {other}");
                skipped += 1;
                continue;
            }
        };
        shapes.insert(id, CountyShape { polygons });
    }

    if skipped > 0 {
        log::warn!("{}: {skipped} features without a usable geometry", path.display());
    }
    Ok(BoundaryCatalog::from_shapes(shapes))
}

fn feature_id(feature: &Feature) -> Option<CountyId> {
    let as_text = |v: &JsonValue| match v {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    };

    if let Some(id) = feature.id.as_ref().and_then(as_text) {
        return Some(CountyId::normalise(&id));
    }
    let props = feature.properties.as_ref()?;
    if let Some(fips) = props.get("fips").and_then(as_text) {
        return Some(CountyId::normalise(&fips));
    }
    let geo_id = props.get("GEO_ID").and_then(as_text)?;
    let start = geo_id.len().checked_sub(5)?;
    geo_id.get(start..).map(CountyId::normalise)
}

fn polygon_rings(path: &Path, id: &CountyId, coords: JsonValue) -> Result<Vec<Ring>, DataLoadError> {
    let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(coords)
        .map_err(|e| DataLoadError::boundaries(path, format!("county {id}: {e}")))?;
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|pos| match pos.as_slice() {
                    [lon, lat, ..] => Ok([*lon, *lat]),
                    _ => Err(DataLoadError::boundaries(
                        path,
                        format!("county {id}: position with fewer than two coordinates"),
                    )),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<BoundaryCatalog, DataLoadError> {
        parse_boundaries(Path::new("counties.geojson"), text)
    }

    fn shape<'a>(catalog: &'a BoundaryCatalog, id: &str) -> &'a CountyShape {
        &catalog.shapes[&CountyId(id.into())]
    }

    #[test]
    fn polygons_and_multipolygons_load() {
        let catalog = parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": "01001", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type": "Feature", "id": 53033, "properties": {},
                 "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0,0],[1,0],[1,1],[0,0]]],
                    [[[2,2],[3,2],[3,3],[2,2]]]
                 ]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(shape(&catalog, "53033").polygons.len(), 2);
        assert_eq!(shape(&catalog, "01001").polygons[0][0][1], [1.0, 0.0]);
    }

    #[test]
    fn id_falls_back_to_geo_id() {
        let catalog = parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"GEO_ID": "0500000US01001"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0,5],[1,0,5],[0,0,5]]]}}
            ]}"#,
        )
        .unwrap();
        assert!(catalog.contains(&CountyId("01001".into())));
    }

    #[test]
    fn unsupported_geometry_is_skipped() {
        let catalog = parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": "01001", "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {"type": "Feature", "id": "01003", "geometry": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn corrupt_catalogs_are_rejected() {
        assert!(parse("not json").is_err());
        assert!(parse(r#"{"type": "Feature", "features": []}"#).is_err());
        assert!(parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[0,0]]]}}
            ]}"#
        )
        .is_err());
        assert!(parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": "1",
                 "geometry": {"type": "Polygon", "coordinates": [[[0],[1,0],[0,0]]]}}
            ]}"#
        )
        .is_err());
    }
}
