//! Synthetic orchards for tests

use std::f64::consts::FRAC_PI_2;

use super::coord::Coordinate;
use super::geo::{DEGREE_RAD, EARTH_R, destination_point};

pub const ORIGIN: Coordinate = Coordinate::new(0.001, 0.002);

/// Row direction used by most fixtures: one positive and one negative slope
pub const ROW_ANGLE: f64 = 0.6;

pub const SPACING: f64 = 6.0;

/// A Western Cape survey location
pub const SURVEY_ORIGIN: Coordinate = Coordinate::new(-33.9, 18.5);

/// Position of grid cell (i, j): `i` steps along `angle`, `j` steps along
/// the perpendicular direction
pub fn grid_cell(angle: f64, spacing: f64, i: usize, j: usize) -> Coordinate {
    let row = destination_point(&ORIGIN, angle, i as f64 * spacing);
    destination_point(&row, angle - FRAC_PI_2, j as f64 * spacing)
}

/// A `rows` x `cols` orchard without the cells listed in `skip`
pub fn grid(
    angle: f64,
    spacing: f64,
    rows: usize,
    cols: usize,
    skip: &[(usize, usize)],
) -> Vec<Coordinate> {
    let mut trees = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            if !skip.contains(&(i, j)) {
                trees.push(grid_cell(angle, spacing, i, j));
            }
        }
    }
    trees
}

/// Coordinate `north` and `east` meters away from `ORIGIN`
pub fn offset(north: f64, east: f64) -> Coordinate {
    let north_pt = destination_point(&ORIGIN, 0.0, north);
    destination_point(&north_pt, FRAC_PI_2, east)
}

/// Coordinate `north` and `east` meters away from `origin` on the local
/// tangent plane, longitude scaled by the cosine of the latitude
pub fn metric_offset(origin: &Coordinate, north: f64, east: f64) -> Coordinate {
    let lat = origin.lat + north / EARTH_R / DEGREE_RAD;
    let lng = origin.lng + east / (EARTH_R * (origin.lat * DEGREE_RAD).cos()) / DEGREE_RAD;
    Coordinate::new(lat, lng)
}

/// Like [`grid_cell`] but laid out in true meters around `origin`
pub fn metric_cell(
    origin: &Coordinate,
    angle: f64,
    spacing: f64,
    i: usize,
    j: usize,
) -> Coordinate {
    let (along, across) = (i as f64 * spacing, j as f64 * spacing);
    let north = along * angle.cos() + across * (angle - FRAC_PI_2).cos();
    let east = along * angle.sin() + across * (angle - FRAC_PI_2).sin();
    metric_offset(origin, north, east)
}

pub fn metric_grid(
    origin: &Coordinate,
    angle: f64,
    spacing: f64,
    rows: usize,
    cols: usize,
    skip: &[(usize, usize)],
) -> Vec<Coordinate> {
    let mut trees = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            if !skip.contains(&(i, j)) {
                trees.push(metric_cell(origin, angle, spacing, i, j));
            }
        }
    }
    trees
}
