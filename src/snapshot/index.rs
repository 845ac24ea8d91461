//! Spatial lookup of grid points in a loaded snapshot.

use crate::types::snapshot::{PointResult, Snapshot};
use haversine::{distance, Location as HaversineLocation, Units};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use std::cmp::Ordering;

/// Position of one grid point inside [`Snapshot::grid_points`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    latitude: f64,
    longitude: f64,
    index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for IndexedPoint {
    /// Squared Euclidean distance in degrees. Only used to rank candidates; the
    /// reported distance is great-circle.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-neighbour index over the grid points of a snapshot.
///
/// # Examples
///
/// ```no_run
/// use migration_raster::{read_snapshot, SnapshotIndex};
/// use std::path::Path;
///
/// # async fn run() -> Result<(), migration_raster::MigrationError> {
/// let snapshot = read_snapshot(Path::new("data/migration/latest.json")).await?;
/// let index = SnapshotIndex::new(snapshot);
/// if let Some((point, km)) = index.nearest(51.05, 3.72, 100.0) {
///     println!("{km:.0} km away, today {}", point.days[0].score);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SnapshotIndex {
    snapshot: Snapshot,
    rtree: RTree<IndexedPoint>,
}

impl SnapshotIndex {
    pub fn new(snapshot: Snapshot) -> Self {
        let points = snapshot
            .grid_points
            .iter()
            .enumerate()
            .map(|(index, point)| IndexedPoint {
                latitude: point.latitude,
                longitude: point.longitude,
                index,
            })
            .collect();
        Self {
            rtree: RTree::bulk_load(points),
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// The closest grid point within `max_distance_km`, with its distance in km.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        max_distance_km: f64,
    ) -> Option<(&PointResult, f64)> {
        self.nearest_n(latitude, longitude, 1, max_distance_km)
            .into_iter()
            .next()
    }

    /// Up to `n_results` grid points within `max_distance_km`, closest first.
    pub fn nearest_n(
        &self,
        latitude: f64,
        longitude: f64,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(&PointResult, f64)> {
        // Degree distance and great-circle distance can rank neighbours
        // differently, so look at more candidates than requested.
        let candidate_limit = (n_results * 2).max(8);

        let mut found: Vec<(&PointResult, f64)> = self
            .rtree
            .nearest_neighbor_iter(&[latitude, longitude])
            .take(candidate_limit)
            .filter_map(|candidate| {
                let point = self.snapshot.grid_points.get(candidate.index)?;
                let km = distance(
                    HaversineLocation {
                        latitude,
                        longitude,
                    },
                    HaversineLocation {
                        latitude: candidate.latitude,
                        longitude: candidate.longitude,
                    },
                    Units::Kilometers,
                );
                (km <= max_distance_km).then_some((point, km))
            })
            .collect();

        found.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        found.truncate(n_results);
        found
    }
}
