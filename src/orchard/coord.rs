use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::{DEGREE_RAD, EARTH_R};

/// Coordinate is a surveyed or projected position in degrees
///
/// Trees and candidates are identified by their index in the slice they
/// were ingested into, never by coordinate value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Axis-aligned extent of a set of coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Returns the value on KD-tree dimension `dim` (0 = latitude, 1 = longitude)
    pub fn dim(&self, dim: usize) -> f64 {
        if dim == 0 { self.lat } else { self.lng }
    }

    pub(crate) fn set_dim(&mut self, dim: usize, value: f64) {
        if dim == 0 {
            self.lat = value;
        } else {
            self.lng = value;
        }
    }

    /// Returns squared equirectangular distance in square meters
    ///
    /// Close to the haversine distance over a few meters; only used to
    /// pre-filter spatial index hits.
    pub fn sq_dist(&self, b: &Coordinate) -> f64 {
        let v1 = (self.lat - b.lat) * DEGREE_RAD;
        let v2 = (self.lng - b.lng) * DEGREE_RAD * ((self.lat + b.lat) / 2.0 * DEGREE_RAD).cos();
        (v1 * v1 + v2 * v2) * EARTH_R * EARTH_R
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

impl BoundingBox {
    /// Checks whether `c` lies inside the box, edges included
    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lng..=self.max_lng).contains(&c.lng)
    }
}

/// Calculates the bounding box of a set of coordinates
///
/// Returns `None` for an empty set.
pub fn bounding_box<'a, I>(coords: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut iter = coords.into_iter();
    let first = iter.next()?;
    let mut bbox = BoundingBox {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lng: first.lng,
        max_lng: first.lng,
    };

    for c in iter {
        bbox.min_lat = bbox.min_lat.min(c.lat);
        bbox.max_lat = bbox.max_lat.max(c.lat);
        bbox.min_lng = bbox.min_lng.min(c.lng);
        bbox.max_lng = bbox.max_lng.max(c.lng);
    }

    Some(bbox)
}

/// Calculates the planar mean of latitudes and longitudes
///
/// Only meaningful for tight local clusters. Returns `None` for an empty set.
pub fn centroid<'a, I>(coords: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut center = Coordinate::new(0.0, 0.0);
    let mut n = 0usize;

    for c in coords {
        center.lat += c.lat;
        center.lng += c.lng;
        n += 1;
    }

    if n == 0 {
        return None;
    }

    center.lat /= n as f64;
    center.lng /= n as f64;
    Some(center)
}
