//! `Waitline` — a parametric 1-D arc-length coordinate along a geographic
//! polyline.
//!
//! # Authoritative coordinate mapping
//!
//! Every other module that needs a car's geographic position converts its
//! `position_s` (arc length from the queue head) through `Waitline`. No
//! other module re-derives latitude/longitude from arc length — this is
//! the one place that mapping lives, per the design note that treats the
//! waitline-provided mapping as authoritative.
//!
//! # Representation
//!
//! The polyline is stored as a sequence of `GeoPoint` vertices plus a
//! cumulative arc-length table (`cum_len[i]` = distance along the path from
//! the first vertex to vertex `i`). Looking up a position by arc length is
//! a binary search over `cum_len` followed by a linear interpolation within
//! the located segment — accurate enough at the scale of a single queue
//! lane (tens to low hundreds of metres) without needing a full geodesic
//! solver per query.

use crate::error::{PathError, PathResult};
use crate::geo::GeoPoint;

/// The finite difference used to estimate curvature from two nearby
/// headings. Small relative to typical queue-lane segment lengths.
const CURVATURE_EPS_M: f64 = 0.5;

/// An immutable, arc-length parametrized path.
///
/// Construct once at load time (the geographic path loader that produces
/// the vertex list is an external collaborator, out of scope here) and
/// share by reference across the orchestrator and telemetry synthesizer.
pub struct Waitline {
    points: Vec<GeoPoint>,
    /// `cum_len[i]` is the arc length from `points[0]` to `points[i]`.
    /// Always `cum_len.len() == points.len()` and `cum_len[0] == 0.0`.
    cum_len: Vec<f64>,
}

impl Waitline {
    /// Build a waitline from an ordered polyline. Requires at least two
    /// points; a single point has no direction to derive heading from.
    pub fn new(points: Vec<GeoPoint>) -> PathResult<Self> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }

        let mut cum_len = Vec::with_capacity(points.len());
        cum_len.push(0.0);
        for window in points.windows(2) {
            let seg_len = window[0].distance_m(window[1]);
            let prev = *cum_len.last().unwrap();
            cum_len.push(prev + seg_len);
        }

        Ok(Self { points, cum_len })
    }

    /// Total arc length of the path, in metres.
    pub fn total_length(&self) -> f64 {
        *self.cum_len.last().unwrap()
    }

    /// Geographic position at arc length `s`, clamped to `[0, total_length]`.
    pub fn point_at(&self, s: f64) -> GeoPoint {
        let (i, t) = self.locate(s);
        lerp(self.points[i], self.points[i + 1], t)
    }

    /// Heading (degrees clockwise from true north) of the path at arc
    /// length `s`, taken as the bearing of the containing segment.
    pub fn heading_at(&self, s: f64) -> f64 {
        let (i, _t) = self.locate(s);
        self.points[i].bearing_deg(self.points[i + 1])
    }

    /// Signed curvature (radians of heading change per metre of arc
    /// length) at arc length `s`, estimated by a central finite difference
    /// of heading over a small arc-length step. Positive = turning right
    /// (clockwise when viewed from above).
    pub fn curvature_at(&self, s: f64) -> f64 {
        let lo = (s - CURVATURE_EPS_M).max(0.0);
        let hi = (s + CURVATURE_EPS_M).min(self.total_length());
        let span = hi - lo;
        if span <= 0.0 {
            return 0.0;
        }

        let h_lo = self.heading_at(lo);
        let h_hi = self.heading_at(hi);
        wrap_angle_diff_deg(h_hi, h_lo).to_radians() / span
    }

    /// Locate the segment index `i` and interpolation fraction `t` such
    /// that arc length `s` (clamped) falls at `points[i] + t*(points[i+1] -
    /// points[i])`.
    fn locate(&self, s: f64) -> (usize, f64) {
        let s = s.clamp(0.0, self.total_length());

        // First index whose cumulative length exceeds `s`.
        let idx = self.cum_len.partition_point(|&len| len <= s);
        let i = idx.saturating_sub(1).min(self.points.len() - 2);

        let seg_start = self.cum_len[i];
        let seg_end = self.cum_len[i + 1];
        let seg_len = seg_end - seg_start;
        let t = if seg_len > 0.0 {
            ((s - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (i, t)
    }
}

/// Linear interpolation between two geographic points. Adequate at queue-
/// lane scale; does not account for great-circle curvature within a
/// segment, which is negligible over tens of metres.
fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::new(a.lat + (b.lat - a.lat) * t, a.lon + (b.lon - a.lon) * t)
}

/// Smallest signed angular difference `a - b`, in degrees, wrapped to
/// `[-180, 180]`.
fn wrap_angle_diff_deg(a: f64, b: f64) -> f64 {
    let mut d = (a - b) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line() -> Waitline {
        Waitline::new(vec![
            GeoPoint::new(32.0, -117.0),
            GeoPoint::new(32.001, -117.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_polylines() {
        assert!(Waitline::new(vec![GeoPoint::new(0.0, 0.0)]).is_err());
        assert!(Waitline::new(vec![]).is_err());
    }

    #[test]
    fn endpoints_match_input() {
        let wl = straight_line();
        let p0 = wl.point_at(0.0);
        let pn = wl.point_at(wl.total_length());
        assert!((p0.lat - 32.0).abs() < 1e-9);
        assert!((pn.lat - 32.001).abs() < 1e-9);
    }

    #[test]
    fn clamps_out_of_range_arc_length() {
        let wl = straight_line();
        let beyond = wl.point_at(wl.total_length() + 1000.0);
        let end = wl.point_at(wl.total_length());
        assert_eq!(beyond, end);

        let before = wl.point_at(-100.0);
        let start = wl.point_at(0.0);
        assert_eq!(before, start);
    }

    #[test]
    fn heading_due_north_on_straight_segment() {
        let wl = straight_line();
        let heading = wl.heading_at(wl.total_length() / 2.0);
        assert!(heading < 1.0, "got {heading}");
    }

    #[test]
    fn curvature_is_zero_on_straight_line() {
        let wl = straight_line();
        let k = wl.curvature_at(wl.total_length() / 2.0);
        assert!(k.abs() < 1e-6, "got {k}");
    }

    #[test]
    fn curvature_is_nonzero_at_a_turn() {
        let wl = Waitline::new(vec![
            GeoPoint::new(32.0, -117.0),
            GeoPoint::new(32.001, -117.0),
            GeoPoint::new(32.001, -116.999),
        ])
        .unwrap();
        let mid = wl.total_length() / 2.0;
        let k = wl.curvature_at(mid);
        assert!(k.abs() > 1e-4, "expected a turn, got {k}");
    }

    #[test]
    fn total_length_matches_sum_of_segments() {
        let a = GeoPoint::new(32.0, -117.0);
        let b = GeoPoint::new(32.001, -117.0);
        let c = GeoPoint::new(32.002, -117.0005);
        let wl = Waitline::new(vec![a, b, c]).unwrap();
        let expected = a.distance_m(b) + b.distance_m(c);
        assert!((wl.total_length() - expected).abs() < 1e-6);
    }
}
