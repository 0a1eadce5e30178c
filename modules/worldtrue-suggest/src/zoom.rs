//! Camera zoom selection for a highlighted event.
//!
//! The closer the nearest neighbor, the further in we zoom so both markers
//! stay distinguishable. Distances are planar degrees (see
//! `GeoPoint::planar_distance`), so results near the antimeridian or the
//! poles are only approximate.

use worldtrue_common::GeoPoint;

/// Zoom used when nothing else is on the map.
pub const SOLITARY_ZOOM: f64 = 5.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 10.0;

/// `(exclusive upper distance bound in degrees, zoom)`, nearest first.
const ZOOM_BUCKETS: [(f64, f64); 3] = [(1.0, 8.0), (5.0, 6.0), (20.0, 4.0)];
const FAR_ZOOM: f64 = 3.0;

/// Smallest planar distance from `target` to any of `others`.
pub fn nearest_distance<I>(target: GeoPoint, others: I) -> Option<f64>
where
    I: IntoIterator<Item = GeoPoint>,
{
    others
        .into_iter()
        .map(|p| target.planar_distance(&p))
        .filter(|d| !d.is_nan())
        .reduce(f64::min)
}

/// Bucket a nearest-neighbor distance into a zoom level.
pub fn zoom_for_distance(distance: f64) -> f64 {
    let zoom = ZOOM_BUCKETS
        .iter()
        .find(|(bound, _)| distance < *bound)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(FAR_ZOOM);
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom level that keeps `target` and its nearest neighbor legible.
pub fn zoom_for<I>(target: GeoPoint, others: I) -> f64
where
    I: IntoIterator<Item = GeoPoint>,
{
    match nearest_distance(target, others) {
        Some(distance) => zoom_for_distance(distance),
        None => SOLITARY_ZOOM.clamp(MIN_ZOOM, MAX_ZOOM),
    }
}
