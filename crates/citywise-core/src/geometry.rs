//! Parcel edge labelling and a rough buildable-area estimate.
//!
//! Coordinates are `[longitude, latitude]` in degrees. "Front" is assumed to
//! face geographic north.

use crate::zoning::Setbacks;
use geo::{
    Centroid, Coord, GeodesicArea, HaversineBearing, HaversineDistance, LineString, Point, Polygon,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEET_PER_METER: f64 = 3.280_84;

// ---------------------------------------------------------------------------
// EdgeSide
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSide {
    Front,
    Right,
    Rear,
    Left,
}

impl EdgeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeSide::Front => "front",
            EdgeSide::Right => "right",
            EdgeSide::Rear => "rear",
            EdgeSide::Left => "left",
        }
    }
}

impl fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 90-degree buckets, lower bound inclusive: front [315, 45), right
/// [45, 135), rear [135, 225), left [225, 315).
pub fn side_for_bearing(bearing_deg: f64) -> EdgeSide {
    let b = bearing_deg.rem_euclid(360.0);
    if !(45.0..315.0).contains(&b) {
        EdgeSide::Front
    } else if b < 135.0 {
        EdgeSide::Right
    } else if b < 225.0 {
        EdgeSide::Rear
    } else {
        EdgeSide::Left
    }
}

// ---------------------------------------------------------------------------
// Parcel input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    /// Exterior ring; closing the ring is optional.
    pub boundary: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<[f64; 2]>,
}

impl Parcel {
    pub fn polygon(&self) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = self
            .boundary
            .iter()
            .map(|[x, y]| Coord { x: *x, y: *y })
            .collect();
        Polygon::new(LineString::from(ring), Vec::new())
    }

    pub fn centroid_point(&self) -> Option<Point<f64>> {
        self.centroid.map(|[x, y]| Point::new(x, y))
    }
}

// ---------------------------------------------------------------------------
// Edge labelling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelEdge {
    pub index: usize,
    pub start: [f64; 2],
    pub end: [f64; 2],
    /// Centroid to edge midpoint, degrees clockwise from north in [0, 360).
    pub bearing_deg: f64,
    pub side: EdgeSide,
    pub length_ft: f64,
}

/// Label every exterior edge of `boundary`. Without an explicit centroid the
/// polygon's own centroid is used; a degenerate polygon yields no edges.
pub fn label_edges(boundary: &Polygon<f64>, centroid: Option<Point<f64>>) -> Vec<ParcelEdge> {
    let Some(center) = centroid.or_else(|| boundary.centroid()) else {
        return Vec::new();
    };

    boundary
        .exterior()
        .lines()
        .filter(|line| line.start != line.end)
        .enumerate()
        .map(|(index, line)| {
            let start = Point::from(line.start);
            let end = Point::from(line.end);
            let midpoint = Point::new(
                (line.start.x + line.end.x) / 2.0,
                (line.start.y + line.end.y) / 2.0,
            );
            let bearing_deg = center.haversine_bearing(midpoint).rem_euclid(360.0);
            ParcelEdge {
                index,
                start: [start.x(), start.y()],
                end: [end.x(), end.y()],
                bearing_deg,
                side: side_for_bearing(bearing_deg),
                length_ft: start.haversine_distance(&end) * FEET_PER_METER,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Buildable area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildableArea {
    pub gross_sq_ft: f64,
    pub lot_width_ft: f64,
    pub lot_depth_ft: f64,
    pub buildable_width_ft: f64,
    pub buildable_depth_ft: f64,
    pub buildable_sq_ft: f64,
}

/// Approximates the lot as a rectangle: width is the mean of the front and
/// rear frontage, depth the mean of the left and right sides. Setbacks are
/// subtracted and each dimension clamped at zero.
pub fn estimate_buildable_area(
    boundary: &Polygon<f64>,
    centroid: Option<Point<f64>>,
    setbacks: &Setbacks,
) -> BuildableArea {
    let edges = label_edges(boundary, centroid);
    let frontage = |side: EdgeSide| -> Option<f64> {
        let mut matched = edges.iter().filter(|e| e.side == side).peekable();
        matched.peek()?;
        Some(matched.map(|e| e.length_ft).sum())
    };

    let lot_width_ft = mean_of(frontage(EdgeSide::Front), frontage(EdgeSide::Rear));
    let lot_depth_ft = mean_of(frontage(EdgeSide::Left), frontage(EdgeSide::Right));
    let buildable_width_ft = (lot_width_ft - setbacks.left - setbacks.right).max(0.0);
    let buildable_depth_ft = (lot_depth_ft - setbacks.front - setbacks.rear).max(0.0);
    // Unsigned area assumes counter-clockwise winding; a clockwise ring
    // would measure the rest of the globe.
    let gross_sq_ft = boundary.geodesic_area_signed().abs() * FEET_PER_METER * FEET_PER_METER;

    BuildableArea {
        gross_sq_ft,
        lot_width_ft,
        lot_depth_ft,
        buildable_width_ft,
        buildable_depth_ft,
        buildable_sq_ft: buildable_width_ft * buildable_depth_ft,
    }
}

fn mean_of(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: f64 = 33.45;
    const LON: f64 = -112.07;
    const EARTH_RADIUS_M: f64 = 6_371_008.8;

    fn ft_to_lat(ft: f64) -> f64 {
        (ft / FEET_PER_METER / EARTH_RADIUS_M).to_degrees()
    }

    fn ft_to_lon(ft: f64) -> f64 {
        ft_to_lat(ft) / LAT.to_radians().cos()
    }

    /// Axis-aligned lot, `width` east-west and `depth` north-south, listed
    /// north edge first.
    fn lot(width: f64, depth: f64) -> Parcel {
        let (w, d) = (ft_to_lon(width), ft_to_lat(depth));
        Parcel {
            boundary: vec![
                [LON, LAT + d],
                [LON + w, LAT + d],
                [LON + w, LAT],
                [LON, LAT],
                [LON, LAT + d],
            ],
            centroid: None,
        }
    }

    fn close(a: f64, b: f64, pct: f64) -> bool {
        (a - b).abs() <= b.abs() * pct / 100.0
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(side_for_bearing(45.0), EdgeSide::Right);
        assert_eq!(side_for_bearing(315.0), EdgeSide::Front);
        assert_eq!(side_for_bearing(0.0), EdgeSide::Front);
        assert_eq!(side_for_bearing(44.999), EdgeSide::Front);
        assert_eq!(side_for_bearing(359.9), EdgeSide::Front);
        assert_eq!(side_for_bearing(135.0), EdgeSide::Rear);
        assert_eq!(side_for_bearing(225.0), EdgeSide::Left);
        assert_eq!(side_for_bearing(314.999), EdgeSide::Left);
        assert_eq!(side_for_bearing(-90.0), EdgeSide::Left);
        assert_eq!(side_for_bearing(360.0), EdgeSide::Front);
    }

    #[test]
    fn rectangle_edges_face_compass_points() {
        let parcel = lot(60.0, 120.0);
        let edges = label_edges(&parcel.polygon(), None);
        let sides: Vec<EdgeSide> = edges.iter().map(|e| e.side).collect();
        assert_eq!(
            sides,
            [EdgeSide::Front, EdgeSide::Right, EdgeSide::Rear, EdgeSide::Left]
        );
        assert!(close(edges[0].length_ft, 60.0, 0.5));
        assert!(close(edges[1].length_ft, 120.0, 0.5));
        assert!(edges.iter().all(|e| (0.0..360.0).contains(&e.bearing_deg)));
    }

    #[test]
    fn explicit_centroid_overrides_polygon_centroid() {
        let parcel = lot(60.0, 120.0);
        // Far south of the lot: every edge midpoint lies roughly north.
        let south = Point::new(LON + ft_to_lon(30.0), LAT - ft_to_lat(5_000.0));
        let edges = label_edges(&parcel.polygon(), Some(south));
        assert!(edges.iter().all(|e| e.side == EdgeSide::Front));
    }

    #[test]
    fn degenerate_boundary_has_no_edges() {
        let parcel = Parcel {
            boundary: Vec::new(),
            centroid: None,
        };
        assert!(label_edges(&parcel.polygon(), None).is_empty());
    }

    #[test]
    fn buildable_area_subtracts_setbacks() {
        let parcel = lot(60.0, 120.0);
        let setbacks = Setbacks {
            front: 20.0,
            rear: 15.0,
            left: 10.0,
            right: 10.0,
        };
        let area = estimate_buildable_area(&parcel.polygon(), None, &setbacks);
        assert!(close(area.lot_width_ft, 60.0, 0.5));
        assert!(close(area.lot_depth_ft, 120.0, 0.5));
        assert!(close(area.buildable_width_ft, 40.0, 1.0));
        assert!(close(area.buildable_depth_ft, 85.0, 1.0));
        assert!(close(area.buildable_sq_ft, 3_400.0, 2.0));
        assert!(close(area.gross_sq_ft, 7_200.0, 2.0));
    }

    #[test]
    fn gross_area_ignores_winding_order() {
        let clockwise = lot(60.0, 120.0);
        let mut ring = clockwise.boundary.clone();
        ring.reverse();
        let counter_clockwise = Parcel {
            boundary: ring,
            centroid: None,
        };

        let cw = estimate_buildable_area(&clockwise.polygon(), None, &Setbacks::default());
        let ccw = estimate_buildable_area(&counter_clockwise.polygon(), None, &Setbacks::default());
        assert!(close(cw.gross_sq_ft, 7_200.0, 2.0), "{}", cw.gross_sq_ft);
        assert!(close(ccw.gross_sq_ft, 7_200.0, 2.0), "{}", ccw.gross_sq_ft);
        assert!(close(ccw.buildable_sq_ft, 7_200.0, 2.0));
    }

    #[test]
    fn oversized_setbacks_clamp_to_zero() {
        let parcel = lot(30.0, 40.0);
        let setbacks = Setbacks {
            front: 40.0,
            rear: 40.0,
            left: 20.0,
            right: 20.0,
        };
        let area = estimate_buildable_area(&parcel.polygon(), None, &setbacks);
        assert_eq!(area.buildable_width_ft, 0.0);
        assert_eq!(area.buildable_depth_ft, 0.0);
        assert_eq!(area.buildable_sq_ft, 0.0);
        assert!(close(area.gross_sq_ft, 1_200.0, 2.0));
    }

    #[test]
    fn parcel_json_shape() {
        let json = r#"{"boundary":[[-112.07,33.45],[-112.0698,33.45],[-112.0698,33.4503]],"centroid":[-112.0699,33.4501]}"#;
        let parcel: Parcel = serde_json::from_str(json).unwrap();
        assert_eq!(parcel.boundary.len(), 3);
        assert_eq!(parcel.centroid_point(), Some(Point::new(-112.0699, 33.4501)));
        // geo closes the ring
        assert_eq!(parcel.polygon().exterior().0.len(), 4);
    }
}
