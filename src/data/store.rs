use std::collections::BTreeSet;
use std::path::Path;

use super::boundary::{load_boundaries, BoundaryCatalog};
use super::loader::load_records;
use super::model::{CountyId, CountyRecord};
use crate::error::DataLoadError;

/// Records plus outlines, loaded once and read-only afterwards.
///
/// Share it between sessions behind an `Arc`; nothing here is mutable.
#[derive(Debug, Clone)]
pub struct Store {
    records: Vec<CountyRecord>,
    boundaries: BoundaryCatalog,
}

impl Store {
    /// Read the county table and the boundary catalog.
    ///
    /// Ids present on only one side are logged and otherwise ignored: such
    /// counties are simply not drawn.
    pub fn load(records_path: &Path, boundaries_path: &Path) -> Result<Self, DataLoadError> {
        let records = load_records(records_path)?;
        let boundaries = load_boundaries(boundaries_path)?;
        let store = Store::from_parts(records, boundaries);

        log::info!(
            "Loaded {} counties from {} and {} outlines from {}",
            store.records.len(),
            records_path.display(),
            store.boundaries.len(),
            boundaries_path.display()
        );
        Ok(store)
    }

    pub fn from_parts(records: Vec<CountyRecord>, boundaries: BoundaryCatalog) -> Self {
        let store = Store {
            records,
            boundaries,
        };
        let (no_shape, no_record) = store.unmatched();
        if no_shape > 0 {
            log::warn!("{no_shape} counties have no outline and will not be drawn");
        }
        if no_record > 0 {
            log::warn!("{no_record} outlines have no county record");
        }
        store
    }

    /// Counts of (records without an outline, outlines without a record).
    pub fn unmatched(&self) -> (usize, usize) {
        let ids: BTreeSet<&CountyId> = self.records.iter().map(|r| &r.id).collect();
        let no_shape = self
            .records
            .iter()
            .filter(|r| !self.boundaries.contains(&r.id))
            .count();
        let no_record = self
            .boundaries
            .iter()
            .filter(|(id, _)| !ids.contains(id))
            .count();
        (no_shape, no_record)
    }

    /// Records in file order.
    pub fn records(&self) -> &[CountyRecord] {
        &self.records
    }

    pub fn boundaries(&self) -> &BoundaryCatalog {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::boundary::CountyShape;
    use std::collections::BTreeMap;

    #[test]
    fn unmatched_ids_are_counted_not_rejected() {
        let records = vec![
            CountyRecord::new("01001", "A", 1.0, (0.0, 1.0), (0.0, 1.0)),
            CountyRecord::new("01003", "B", 1.0, (0.0, 1.0), (0.0, 1.0)),
        ];
        let mut shapes = BTreeMap::new();
        shapes.insert(CountyId("01001".into()), CountyShape::default());
        shapes.insert(CountyId("99999".into()), CountyShape::default());
        shapes.insert(CountyId("99998".into()), CountyShape::default());

        let store = Store::from_parts(records, BoundaryCatalog::from_shapes(shapes));
        assert_eq!(store.unmatched(), (1, 2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[1].display_name, "B");
    }

    #[test]
    fn ids_repeated_after_padding_are_counted_once() {
        let records = vec![
            CountyRecord::new("1", "A", 1.0, (0.0, 1.0), (0.0, 1.0)),
            CountyRecord::new("00001", "A again", 1.0, (0.0, 1.0), (0.0, 1.0)),
        ];
        let mut shapes = BTreeMap::new();
        shapes.insert(CountyId("00001".into()), CountyShape::default());

        let store = Store::from_parts(records, BoundaryCatalog::from_shapes(shapes));
        assert_eq!(store.unmatched(), (0, 0));
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("counties.csv");
        let shapes = dir.path().join("counties.geojson");
        std::fs::write(
            &records,
            "fips,county,house_price,min_tmp_year,max_tmp_year,min_avg_tmp_year,max_avg_tmp_year\n\
             01001,Autauga,189000,20,95,45,82\n",
        )
        .unwrap();
        std::fs::write(
            &shapes,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": "01001",
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}]}"#,
        )
        .unwrap();

        let store = Store::load(&records, &shapes).unwrap();
        assert_eq!(store.unmatched(), (0, 0));
        assert!(store.boundaries().contains(&store.records()[0].id));
    }

    #[test]
    fn missing_boundary_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("counties.csv");
        std::fs::write(
            &records,
            "fips,county,house_price,min_tmp_year,max_tmp_year,min_avg_tmp_year,max_avg_tmp_year\n\
             01001,Autauga,189000,20,95,45,82\n",
        )
        .unwrap();

        let err = Store::load(&records, &dir.path().join("missing.geojson")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}
