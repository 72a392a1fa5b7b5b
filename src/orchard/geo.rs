use std::f64::consts::PI;

use super::coord::{Coordinate, bounding_box};
use super::error::{OrchardError, Result};

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in meters
pub const EARTH_R: f64 = 6_371_000.0;

/// Result of a successful colinearity test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMatch {
    /// Slope angle of the reference segment in radians
    pub slope: f64,
    /// Mean distance in meters from the tested point to both segment ends
    pub avg_distance: f64,
}

/// Calculates the great-circle distance between two coordinates
///
/// # Returns
///
/// Distance in meters
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat * DEGREE_RAD;
    let lat2 = b.lat * DEGREE_RAD;
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng) * DEGREE_RAD;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_R * c
}

/// Moves `distance` meters from `start` along the direction `slope`
///
/// This is a planar small-angle approximation: the latitude changes by
/// `distance * cos(slope) / R` and the longitude by `distance * sin(slope) / R`
/// radians, without any correction for the meridian convergence. Good for a
/// few tens of meters away from the poles, not for real navigation.
///
/// A negative `distance` projects backwards along the same axis.
pub fn destination_point(start: &Coordinate, slope: f64, distance: f64) -> Coordinate {
    let delta = distance / EARTH_R;
    let lat = start.lat * DEGREE_RAD + delta * slope.cos();
    let lng = start.lng * DEGREE_RAD + delta * slope.sin();

    Coordinate::new(lat / DEGREE_RAD, lng / DEGREE_RAD)
}

/// Returns the gradient `Δlng / Δlat` of the segment `a -> b`
///
/// A segment with no latitude change is vertical in the (lat, lng) plane and
/// has no finite gradient, which is reported as `None`.
pub fn gradient(a: &Coordinate, b: &Coordinate) -> Option<f64> {
    let dlat = b.lat - a.lat;
    if dlat == 0.0 {
        return None;
    }
    Some((b.lng - a.lng) / dlat)
}

/// Returns the slope angle of the segment `a -> b` in radians, in
/// `(-PI/2, PI/2)`, or `None` for a vertical segment
#[allow(dead_code)] // Part of public API, may be used by external code
pub fn slope_angle(a: &Coordinate, b: &Coordinate) -> Option<f64> {
    gradient(a, b).map(f64::atan)
}

/// Checks whether `x` lies on the segment between `a` and `b`
///
/// `x` is on the segment when the gradients of `a -> b` and `a -> x` differ
/// by less than `tolerance` and `x` is inside the bounding box of `a` and `b`
/// (edges included). The reported slope is the angle of `a -> b`.
///
/// Two vertical segments have no gradient difference to compare and are
/// never colinear, the same as one vertical and one sloped segment.
///
/// # Errors
///
/// `DegenerateGeometry` when `a` and `b` coincide, or when `x` coincides
/// with `a`, since either leaves a slope undefined.
pub fn is_point_on_line(
    a: &Coordinate,
    b: &Coordinate,
    x: &Coordinate,
    tolerance: f64,
) -> Result<Option<LineMatch>> {
    if a == b {
        return Err(OrchardError::DegenerateGeometry(*a));
    }
    if a == x {
        return Err(OrchardError::DegenerateGeometry(*x));
    }

    let (gradient_ab, gradient_ax) = match (gradient(a, b), gradient(a, x)) {
        (Some(ab), Some(ax)) => (ab, ax),
        _ => return Ok(None),
    };

    if (gradient_ab - gradient_ax).abs() >= tolerance {
        return Ok(None);
    }

    let within = bounding_box([a, b]).is_some_and(|bbox| bbox.contains(x));
    if !within {
        return Ok(None);
    }

    Ok(Some(LineMatch {
        slope: gradient_ab.atan(),
        avg_distance: (haversine_distance(a, x) + haversine_distance(b, x)) / 2.0,
    }))
}
