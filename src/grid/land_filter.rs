//! Land/sea/country filter for grid points.
//!
//! A coordinate-to-timezone lookup stands in for a land mask: open ocean has no
//! timezone, open sea resolves to one of the fixed-offset `Etc/...` zones, and
//! excluded territories are recognised by their zone name. This is an
//! approximation, and the accept/reject rules below define which points the
//! snapshot covers.

use crate::types::grid_point::GridPoint;
use log::debug;
use tzf_rs::DefaultFinder;

/// Zone name prefix used for fixed-offset oceanic timezones.
pub const OCEANIC_ZONE_PREFIX: &str = "Etc/";

/// Timezones whose territory is excluded from the raster (the United Kingdom).
pub const DEFAULT_EXCLUDED_ZONES: [&str; 1] = ["Europe/London"];

/// Resolves a coordinate to an IANA timezone name.
pub trait TimezoneLookup {
    /// Returns the zone name at `(lat, lon)`, or `None` when the point is not
    /// covered by any zone.
    fn timezone_at(&self, lat: f64, lon: f64) -> Option<&str>;
}

/// [`TimezoneLookup`] backed by the embedded `tzf-rs` timezone polygons.
pub struct TzfLookup {
    finder: DefaultFinder,
}

impl TzfLookup {
    /// Loads the embedded timezone data. This takes a noticeable moment, so
    /// build it once and reuse it.
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for TzfLookup {
    fn timezone_at(&self, lat: f64, lon: f64) -> Option<&str> {
        // tzf takes (lng, lat) and signals "no zone" with an empty name.
        let name = self.finder.get_tz_name(lon, lat);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Why a coordinate was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandClass {
    /// Resolved to an ordinary, non-excluded zone.
    Land(String),
    /// No zone at all.
    OpenOcean,
    /// A fixed-offset `Etc/...` zone.
    OpenSea(String),
    /// One of the excluded territories.
    Excluded(String),
}

impl LandClass {
    pub fn is_land(&self) -> bool {
        matches!(self, LandClass::Land(_))
    }
}

/// Applies the accept/reject rules to a resolved zone name.
pub fn classify_timezone(zone: Option<&str>, excluded: &[String]) -> LandClass {
    match zone {
        None => LandClass::OpenOcean,
        Some(name) if name.starts_with(OCEANIC_ZONE_PREFIX) => LandClass::OpenSea(name.to_string()),
        Some(name) if excluded.iter().any(|zone| zone == name) => {
            LandClass::Excluded(name.to_string())
        }
        Some(name) => LandClass::Land(name.to_string()),
    }
}

/// Keeps grid points that fall on land in a covered country.
pub struct LandFilter {
    lookup: Box<dyn TimezoneLookup + Send + Sync>,
    excluded_zones: Vec<String>,
}

impl LandFilter {
    /// Creates a filter over `lookup` with the default excluded zones.
    pub fn new(lookup: impl TimezoneLookup + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
            excluded_zones: DEFAULT_EXCLUDED_ZONES
                .iter()
                .map(|zone| zone.to_string())
                .collect(),
        }
    }

    /// Replaces the list of excluded zone names.
    pub fn with_excluded_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluded_zones(&self) -> &[String] {
        &self.excluded_zones
    }

    pub fn classify(&self, lat: f64, lon: f64) -> LandClass {
        classify_timezone(self.lookup.timezone_at(lat, lon), &self.excluded_zones)
    }

    pub fn is_valid_point(&self, lat: f64, lon: f64) -> bool {
        self.classify(lat, lon).is_land()
    }

    /// Keeps the accepted points, preserving their order.
    pub fn filter_points(&self, points: &[GridPoint]) -> Vec<GridPoint> {
        let mut ocean = 0usize;
        let mut sea = 0usize;
        let mut excluded = 0usize;
        let kept: Vec<GridPoint> = points
            .iter()
            .copied()
            .filter(|point| match self.classify(point.latitude, point.longitude) {
                LandClass::Land(_) => true,
                LandClass::OpenOcean => {
                    ocean += 1;
                    false
                }
                LandClass::OpenSea(_) => {
                    sea += 1;
                    false
                }
                LandClass::Excluded(_) => {
                    excluded += 1;
                    false
                }
            })
            .collect();
        debug!(
            "Land filter kept {} of {} points (ocean: {}, open sea: {}, excluded: {})",
            kept.len(),
            points.len(),
            ocean,
            sea,
            excluded
        );
        kept
    }
}

impl Default for LandFilter {
    fn default() -> Self {
        Self::new(TzfLookup::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lookup that answers from a fixed table of rounded coordinates.
    struct TableLookup(Vec<((f64, f64), &'static str)>);

    impl TimezoneLookup for TableLookup {
        fn timezone_at(&self, lat: f64, lon: f64) -> Option<&str> {
            self.0
                .iter()
                .find(|((t_lat, t_lon), _)| *t_lat == lat && *t_lon == lon)
                .map(|(_, zone)| *zone)
        }
    }

    fn table_filter() -> LandFilter {
        LandFilter::new(TableLookup(vec![
            ((40.0, -3.9), "Europe/Madrid"),
            ((51.0, -0.4), "Europe/London"),
            ((45.0, -9.5), "Etc/GMT+1"),
            ((52.0, 4.8), "Europe/Amsterdam"),
        ]))
    }

    #[test]
    fn test_classify_timezone_rules() {
        let excluded = vec!["Europe/London".to_string()];
        assert_eq!(classify_timezone(None, &excluded), LandClass::OpenOcean);
        assert_eq!(
            classify_timezone(Some("Etc/GMT-1"), &excluded),
            LandClass::OpenSea("Etc/GMT-1".to_string())
        );
        assert_eq!(
            classify_timezone(Some("Europe/London"), &excluded),
            LandClass::Excluded("Europe/London".to_string())
        );
        assert!(classify_timezone(Some("Europe/Brussels"), &excluded).is_land());
    }

    #[test]
    fn test_unresolvable_point_is_rejected_regardless_of_lattice() {
        let filter = table_filter();
        // 36.0/-5.6 is the anchor, but the table has no zone for it.
        assert!(!filter.is_valid_point(36.0, -5.6));
    }

    #[test]
    fn test_filter_points_keeps_land_in_order() {
        let filter = table_filter();
        let points = vec![
            GridPoint::new(40.0, -3.9),
            GridPoint::new(45.0, -9.5),
            GridPoint::new(51.0, -0.4),
            GridPoint::new(52.0, 4.8),
            GridPoint::new(60.0, 0.0),
        ];
        assert_eq!(
            filter.filter_points(&points),
            vec![GridPoint::new(40.0, -3.9), GridPoint::new(52.0, 4.8)]
        );
    }

    #[test]
    fn test_custom_excluded_zones() {
        let filter = table_filter().with_excluded_zones(["Europe/Madrid"]);
        assert!(!filter.is_valid_point(40.0, -3.9));
        assert!(filter.is_valid_point(51.0, -0.4));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let filter = table_filter();
        let first = filter.classify(52.0, 4.8);
        for _ in 0..10 {
            assert_eq!(filter.classify(52.0, 4.8), first);
        }
    }

    #[test]
    fn test_tzf_lookup_known_locations() {
        let filter = LandFilter::default();
        // Madrid and Lyon are well inside covered countries.
        assert!(filter.is_valid_point(40.4, -3.7));
        assert!(filter.is_valid_point(45.8, 4.8));
        // London is excluded territory.
        assert_eq!(
            filter.classify(51.5, -0.1),
            LandClass::Excluded("Europe/London".to_string())
        );
        // Middle of the Bay of Biscay.
        assert!(!filter.is_valid_point(45.0, -6.0));
    }
}
