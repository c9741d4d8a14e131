// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed, oriented outlines and their boolean composition.
//!
//! An outline is a cyclic chain of segments whose consecutive endpoints
//! coincide. Boolean add/subtract follows the board-outline policy: the two
//! operands must intersect at exactly zero or exactly two unique points.
//! With zero intersections a fully-enclosed subtraction becomes a nested
//! hole; with two, both chains are split at the crossing points and
//! stitched. Anything else is rejected as an invalid intersection.

use crate::error::{Error, Result};
use crate::segment::{points_match, IntersectFlag, Segment, SegmentKind, EPSILON};
use nalgebra::Point3;

/// Tolerance for matching chain vertices against computed intersections
const VERTEX_TOLERANCE: f64 = 1e-6;

/// Outline lifecycle. Boolean operations require `Closed`; `Finalized`
/// outlines are read-only (usable only as the right-hand operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineState {
    Open,
    Closed,
    Finalized,
}

/// Winding of a closed outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Cw,
    Ccw,
}

/// A closed planar chain of segments with optional nested holes
#[derive(Debug, Clone)]
pub struct Outline {
    segments: Vec<Segment>,
    holes: Vec<Outline>,
    state: OutlineState,
    orientation: Orientation,
    bounds: Option<(Point3<f64>, Point3<f64>)>,
}

impl Outline {
    /// Create an empty, open outline
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            holes: Vec::new(),
            state: OutlineState::Open,
            orientation: Orientation::Ccw,
            bounds: None,
        }
    }

    /// Create a closed outline consisting of a single full circle
    pub fn from_circle(center: Point3<f64>, radius: f64) -> Result<Self> {
        let mut o = Self::new();
        o.add_segment(Segment::circle(center, radius)?)?;
        o.close()?;
        Ok(o)
    }

    /// Build and close an outline from a segment list
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        let mut o = Self::new();
        for s in segments {
            o.add_segment(s)?;
        }
        o.close()?;
        Ok(o)
    }

    // --- Construction ---

    /// Append a segment to the open end, enforcing endpoint continuity
    pub fn add_segment(&mut self, seg: Segment) -> Result<()> {
        if self.state != OutlineState::Open {
            return Err(Error::Finalized);
        }

        if let Some(last) = self.segments.last() {
            if last.kind() == SegmentKind::Circle || seg.kind() == SegmentKind::Circle {
                return Err(Error::DegenerateGeometry(
                    "a full circle closes an outline by itself".to_string(),
                ));
            }

            if !points_match(&last.end(), &seg.start(), EPSILON) {
                return Err(Error::DegenerateGeometry(format!(
                    "segment start {:?} does not continue chain end {:?}",
                    seg.start(),
                    last.end()
                )));
            }
        }

        self.segments.push(seg);
        Ok(())
    }

    /// Verify the chain is cyclic, then compute orientation and bounds
    pub fn close(&mut self) -> Result<()> {
        if self.state != OutlineState::Open {
            return Err(Error::Finalized);
        }

        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return Err(Error::NotClosed("outline has no segments".to_string()));
        };

        let cyclic = first.kind() == SegmentKind::Circle
            || points_match(&last.end(), &first.start(), EPSILON);

        if !cyclic {
            return Err(Error::NotClosed(format!(
                "chain end {:?} does not meet chain start {:?}",
                last.end(),
                first.start()
            )));
        }

        if self.segments.len() == 1 && first.kind() == SegmentKind::Line {
            return Err(Error::NotClosed(
                "a single line cannot form a closed outline".to_string(),
            ));
        }

        self.orientation = if self.signed_area() >= 0.0 {
            Orientation::Ccw
        } else {
            Orientation::Cw
        };
        self.bounds = Some(self.compute_bounds());
        self.state = OutlineState::Closed;
        Ok(())
    }

    /// Seal the outline; it may no longer be mutated
    pub fn finalize(&mut self) -> Result<()> {
        if self.state != OutlineState::Closed {
            return Err(Error::NotClosed("only a closed outline can be finalized".to_string()));
        }
        self.state = OutlineState::Finalized;
        Ok(())
    }

    // --- Accessors ---

    pub fn state(&self) -> OutlineState {
        self.state
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Nested inner holes registered by fully-enclosed subtractions
    pub fn holes(&self) -> &[Outline] {
        &self.holes
    }

    /// The chain traversed with the requested winding, reversing segment
    /// directions when the stored orientation differs.
    pub fn oriented_segments(&self, winding: Orientation) -> Vec<Segment> {
        if self.orientation == winding {
            self.segments.clone()
        } else {
            reverse_chain(self.segments.clone())
        }
    }

    /// Cached bounding rectangle as `(top_left, bottom_right)`
    pub fn bounds(&self) -> Result<(Point3<f64>, Point3<f64>)> {
        self.bounds
            .ok_or_else(|| Error::NotClosed("bounds require a closed outline".to_string()))
    }

    fn compute_bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for seg in &self.segments {
            let (tl, br) = seg.bounds();
            min_x = min_x.min(tl.x);
            max_y = max_y.max(tl.y);
            max_x = max_x.max(br.x);
            min_y = min_y.min(br.y);
        }

        (
            Point3::new(min_x, max_y, 0.0),
            Point3::new(max_x, min_y, 0.0),
        )
    }

    /// Signed enclosed area: the shoelace sum over segment endpoints plus an
    /// exact circular-segment correction for every arc, so arcs that bulge
    /// past their chord cannot mislead the winding sign.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0.0;

        for seg in &self.segments {
            let a = seg.start();
            let b = seg.end();
            area += 0.5 * (a.x * b.y - b.x * a.y);

            match seg.kind() {
                SegmentKind::Line => {}
                SegmentKind::Arc | SegmentKind::Circle => {
                    let theta = seg.end_angle() - seg.start_angle();
                    let bulge = 0.5 * seg.radius() * seg.radius() * (theta - theta.sin());
                    area += if seg.is_cw() { -bulge } else { bulge };
                }
            }
        }

        area
    }

    // --- Containment ---

    /// Point-in-outline test: a horizontal ray cast counting crossings
    /// against the chain, minus any nested hole containing the point.
    pub fn is_point_inside(&self, p: &Point3<f64>) -> bool {
        if !self.chain_contains(p) {
            return false;
        }

        !self.holes.iter().any(|h| h.chain_contains(p))
    }

    /// Ray cast against the outer chain only
    fn chain_contains(&self, p: &Point3<f64>) -> bool {
        let mut crossings = 0u32;

        for seg in &self.segments {
            crossings += ray_crossings(seg, p);
        }

        crossings % 2 == 1
    }

    /// A point strictly inside the outline (and outside its holes), found by
    /// nudging segment midpoints along their normals. Returns `None` for
    /// pathological chains.
    pub fn interior_sample(&self) -> Option<Point3<f64>> {
        let (tl, br) = self.bounds.as_ref()?;
        let diag = ((br.x - tl.x).powi(2) + (tl.y - br.y).powi(2)).sqrt();
        let step = (diag * 1e-4).max(EPSILON * 10.0);

        for seg in &self.segments {
            let m = seg.midpoint();

            let n = match seg.kind() {
                SegmentKind::Line => {
                    let d = seg.end() - seg.start();
                    let len = d.norm();
                    nalgebra::Vector3::new(-d.y / len, d.x / len, 0.0)
                }
                _ => {
                    let r = m - seg.center();
                    r / r.norm()
                }
            };

            for dir in [1.0, -1.0] {
                let cand = m + n * (step * dir);
                if self.is_point_inside(&cand) {
                    return Some(cand);
                }
            }
        }

        None
    }

    // --- Boolean operations ---

    /// Merge another outline into this one
    pub fn add(&mut self, other: &Outline) -> Result<bool> {
        self.boolean_op(other, false)
    }

    /// Remove another outline's region from this one
    pub fn subtract(&mut self, other: &Outline) -> Result<bool> {
        self.boolean_op(other, true)
    }

    /// Merge a circular region
    pub fn add_circle(&mut self, center: Point3<f64>, radius: f64) -> Result<bool> {
        let c = Outline::from_circle(center, radius)?;
        self.add(&c)
    }

    /// Cut a circular hole or notch
    pub fn subtract_circle(&mut self, center: Point3<f64>, radius: f64) -> Result<bool> {
        let c = Outline::from_circle(center, radius)?;
        self.subtract(&c)
    }

    fn boolean_op(&mut self, other: &Outline, subtract: bool) -> Result<bool> {
        if self.state != OutlineState::Closed {
            return Err(Error::NotClosed(
                "boolean operations require a closed, non-finalized outline".to_string(),
            ));
        }

        if other.state == OutlineState::Open {
            return Err(Error::NotClosed("operand outline is not closed".to_string()));
        }

        let points = self.unique_intersections(other)?;

        match points.len() {
            0 => self.boolean_disjoint(other, subtract),
            2 => self.boolean_stitch(other, subtract, &points[0], &points[1]),
            n => Err(Error::InvalidIntersection(format!(
                "outlines meet at {} unique points; exactly 0 or 2 required",
                n
            ))),
        }
    }

    /// Collect unique crossing points between the two chains. Edge overlaps
    /// and coincident segments are rejected outright.
    fn unique_intersections(&self, other: &Outline) -> Result<Vec<Point3<f64>>> {
        let mut points: Vec<Point3<f64>> = Vec::new();

        for sa in &self.segments {
            for sb in &other.segments {
                let (pts, flag) = sa.intersect(sb);

                match flag {
                    IntersectFlag::EdgeOverlap | IntersectFlag::Coincident => {
                        return Err(Error::InvalidIntersection(
                            "outlines overlap along an edge".to_string(),
                        ));
                    }
                    _ => {}
                }

                for p in pts {
                    if !points.iter().any(|q| points_match(&p, q, VERTEX_TOLERANCE)) {
                        points.push(p);
                    }
                }
            }
        }

        Ok(points)
    }

    /// Zero-intersection cases: containment decides between a nested hole,
    /// a no-op, and an invalid disjoint merge.
    fn boolean_disjoint(&mut self, other: &Outline, subtract: bool) -> Result<bool> {
        let probe = other.segments[0].midpoint();
        let other_inside = self.chain_contains(&probe);

        if subtract {
            if other_inside {
                let mut hole = other.clone();
                hole.holes.clear();
                self.holes.push(hole);
                return Ok(true);
            }
            return Ok(false);
        }

        if other_inside {
            // union with an enclosed region is the identity
            return Ok(false);
        }

        Err(Error::InvalidIntersection(
            "merging disjoint outlines would produce two bodies".to_string(),
        ))
    }

    /// Two-intersection case: split both chains at the crossing points and
    /// stitch the surviving halves.
    fn boolean_stitch(
        &mut self,
        other: &Outline,
        subtract: bool,
        pa: &Point3<f64>,
        pb: &Point3<f64>,
    ) -> Result<bool> {
        let (self_a, self_b) = split_chain(&self.segments, pa, pb)?;
        let (other_a, other_b) = split_chain(&other.segments, pa, pb)?;

        // keep the portion of self outside the other outline
        let keep = if other.chain_contains(&chain_probe(&self_a)) {
            self_b
        } else {
            self_a
        };

        // subtract keeps the other portion inside self; add keeps the
        // portion outside
        let a_inside = self.chain_contains(&chain_probe(&other_a));
        let graft = if a_inside == subtract { other_a } else { other_b };

        // orient the graft so it continues where the kept chain ends
        let tail = keep
            .last()
            .ok_or_else(|| Error::InvalidIntersection("split produced an empty chain".to_string()))?
            .end();

        let graft_head = graft
            .first()
            .ok_or_else(|| Error::InvalidIntersection("split produced an empty chain".to_string()))?
            .start();

        let graft = if points_match(&graft_head, &tail, VERTEX_TOLERANCE) {
            graft
        } else {
            reverse_chain(graft)
        };

        let head = keep[0].start();
        let graft_end = graft.last().map(|s| s.end()).unwrap_or(tail);

        if !points_match(&graft_end, &head, VERTEX_TOLERANCE) {
            return Err(Error::InvalidIntersection(
                "stitched chains do not close".to_string(),
            ));
        }

        self.segments = keep;
        self.segments.extend(graft);
        self.bounds = Some(self.compute_bounds());
        // orientation is inherited from self

        Ok(true)
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample point for inside/outside classification of a chain fragment
fn chain_probe(chain: &[Segment]) -> Point3<f64> {
    chain[chain.len() / 2].midpoint()
}

/// Reverse a chain fragment end-to-end
fn reverse_chain(chain: Vec<Segment>) -> Vec<Segment> {
    chain.into_iter().rev().map(|s| s.reversed()).collect()
}

/// Returns true if the point lies on the segment within the tolerance
fn on_segment(seg: &Segment, p: &Point3<f64>, tol: f64) -> bool {
    match seg.kind() {
        SegmentKind::Line => {
            let d = seg.end() - seg.start();
            let t = (p - seg.start()).dot(&d) / d.norm_squared();
            if !(-1e-9..=1.0 + 1e-9).contains(&t) {
                return false;
            }
            let foot = seg.start() + d * t;
            (p - foot).norm() < tol
        }
        SegmentKind::Arc => {
            ((p - seg.center()).norm() - seg.radius()).abs() < tol
                && seg.angle_in_arc(seg.angle_of(p))
        }
        SegmentKind::Circle => ((p - seg.center()).norm() - seg.radius()).abs() < tol,
    }
}

/// Split a cyclic chain at two points, returning the `pa -> pb` and
/// `pb -> pa` fragments in traversal order.
fn split_chain(
    segments: &[Segment],
    pa: &Point3<f64>,
    pb: &Point3<f64>,
) -> Result<(Vec<Segment>, Vec<Segment>)> {
    let mut chain: Vec<Segment> = Vec::with_capacity(segments.len() + 2);

    for seg in segments {
        let cuts: Vec<Point3<f64>> = [pa, pb]
            .into_iter()
            .filter(|p| on_segment(seg, p, VERTEX_TOLERANCE))
            .cloned()
            .collect();

        if cuts.is_empty() {
            chain.push(seg.clone());
        } else {
            chain.extend(seg.split(&cuts)?);
        }
    }

    let i = chain
        .iter()
        .position(|s| points_match(&s.start(), pa, VERTEX_TOLERANCE))
        .ok_or_else(|| {
            Error::InvalidIntersection("intersection point is not on the chain".to_string())
        })?;
    chain.rotate_left(i);

    let j = chain
        .iter()
        .position(|s| points_match(&s.start(), pb, VERTEX_TOLERANCE))
        .ok_or_else(|| {
            Error::InvalidIntersection("intersection point is not on the chain".to_string())
        })?;

    let tail = chain.split_off(j);
    Ok((chain, tail))
}

/// Count crossings of the horizontal ray from `p` toward +x with a segment.
/// Each segment counts one of its endpoints (half-open spans) so shared
/// vertices of a chain are not double-counted.
fn ray_crossings(seg: &Segment, p: &Point3<f64>) -> u32 {
    match seg.kind() {
        SegmentKind::Line => {
            let a = seg.start();
            let b = seg.end();

            if (a.y > p.y) == (b.y > p.y) {
                return 0;
            }

            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            (x > p.x) as u32
        }
        SegmentKind::Arc | SegmentKind::Circle => {
            let c = seg.center();
            let r = seg.radius();
            let dy = p.y - c.y;

            // tangent rays do not cross
            if r - dy.abs() < EPSILON {
                return 0;
            }

            if dy.abs() > r {
                return 0;
            }

            let dx = (r * r - dy * dy).sqrt();
            let mut n = 0u32;

            for xs in [c.x + dx, c.x - dx] {
                if xs <= p.x {
                    continue;
                }

                if seg.kind() == SegmentKind::Circle {
                    n += 1;
                    continue;
                }

                // half-open angular span: the end angle is excluded
                let ang = (p.y - c.y).atan2(xs - c.x);
                let mut a = ang;
                while a < seg.start_angle() {
                    a += 2.0 * std::f64::consts::PI;
                }
                if a >= seg.start_angle() && a < seg.end_angle() {
                    n += 1;
                }
            }

            n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point3<f64> {
        Point3::new(x, y, 0.0)
    }

    /// CCW rectangle (x0,y0)-(x1,y1)
    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Outline {
        Outline::from_segments(vec![
            Segment::line(pt(x0, y0), pt(x1, y0)).unwrap(),
            Segment::line(pt(x1, y0), pt(x1, y1)).unwrap(),
            Segment::line(pt(x1, y1), pt(x0, y1)).unwrap(),
            Segment::line(pt(x0, y1), pt(x0, y0)).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_discontinuous_chain() {
        let mut o = Outline::new();
        o.add_segment(Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap())
            .unwrap();
        let r = o.add_segment(Segment::line(pt(10.0, 1.0), pt(10.0, 5.0)).unwrap());
        assert!(r.is_err());
    }

    #[test]
    fn rejects_open_close() {
        let mut o = Outline::new();
        o.add_segment(Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap())
            .unwrap();
        o.add_segment(Segment::line(pt(10.0, 0.0), pt(10.0, 5.0)).unwrap())
            .unwrap();
        assert!(o.close().is_err());
    }

    #[test]
    fn state_machine_enforced() {
        let mut o = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(o.state(), OutlineState::Closed);

        // no mutation after close
        assert!(o
            .add_segment(Segment::line(pt(0.0, 0.0), pt(1.0, 1.0)).unwrap())
            .is_err());

        o.finalize().unwrap();
        assert_eq!(o.state(), OutlineState::Finalized);

        // finalized outlines refuse boolean mutation
        let other = rect(20.0, 20.0, 30.0, 30.0);
        assert!(o.add(&other).is_err());
    }

    #[test]
    fn ccw_rectangle_orientation_and_area() {
        let o = rect(0.0, 0.0, 100.0, 50.0);
        assert_eq!(o.orientation(), Orientation::Ccw);
        assert!((o.signed_area() - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn circle_outline_area() {
        let o = Outline::from_circle(pt(0.0, 0.0), 5.0).unwrap();
        assert_eq!(o.orientation(), Orientation::Ccw);
        assert!((o.signed_area() - 25.0 * std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn bulging_arc_orientation() {
        // arc over the top from (0,0) to (10,0), chord back along y = 0;
        // the chord-only shoelace sum is zero, the arc correction decides
        let arc = Segment::arc(pt(5.0, -1.0), pt(0.0, 0.0), pt(10.0, 0.0), true).unwrap();
        let chord = Segment::line(pt(10.0, 0.0), pt(0.0, 0.0)).unwrap();
        let o = Outline::from_segments(vec![arc, chord]).unwrap();

        assert_eq!(o.orientation(), Orientation::Cw);
        assert!(o.signed_area() < 0.0);
    }

    #[test]
    fn point_containment() {
        let o = rect(0.0, 0.0, 100.0, 50.0);

        assert!(o.is_point_inside(&pt(50.0, 25.0)));
        assert!(!o.is_point_inside(&pt(150.0, 25.0)));
        assert!(!o.is_point_inside(&pt(-1.0, 25.0)));
        assert!(!o.is_point_inside(&pt(50.0, 60.0)));
    }

    #[test]
    fn circle_containment() {
        let o = Outline::from_circle(pt(0.0, 0.0), 5.0).unwrap();
        assert!(o.is_point_inside(&pt(0.0, 0.0)));
        assert!(o.is_point_inside(&pt(4.0, 2.0)));
        assert!(!o.is_point_inside(&pt(6.0, 0.0)));
        assert!(!o.is_point_inside(&pt(-6.0, 0.1)));
    }

    #[test]
    fn interior_sample_is_inside() {
        let o = rect(0.0, 0.0, 100.0, 50.0);
        let s = o.interior_sample().unwrap();
        assert!(o.is_point_inside(&s));

        let (tl, br) = o.bounds().unwrap();
        assert!(s.x > tl.x && s.x < br.x);
        assert!(s.y > br.y && s.y < tl.y);
    }

    #[test]
    fn subtract_enclosed_circle_registers_hole() {
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        let changed = o.subtract_circle(pt(50.0, 25.0), 10.0).unwrap();

        assert!(changed);
        assert_eq!(o.holes().len(), 1);
        assert_eq!(o.segments().len(), 4);

        // a point in the hole is no longer inside
        assert!(!o.is_point_inside(&pt(50.0, 25.0)));
        assert!(o.is_point_inside(&pt(5.0, 5.0)));
    }

    #[test]
    fn add_enclosed_outline_is_noop() {
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        let inner = rect(10.0, 10.0, 20.0, 20.0);
        assert!(!o.add(&inner).unwrap());
        assert_eq!(o.segments().len(), 4);
    }

    #[test]
    fn add_disjoint_outline_is_invalid() {
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        let far = rect(200.0, 200.0, 300.0, 300.0);
        assert!(matches!(
            o.add(&far),
            Err(Error::InvalidIntersection(_))
        ));
    }

    #[test]
    fn subtract_disjoint_outline_is_noop() {
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        let far = rect(200.0, 200.0, 300.0, 300.0);
        assert!(!o.subtract(&far).unwrap());
    }

    #[test]
    fn edge_overlap_subtract_rejected() {
        // semicircle whose chord lies along the rectangle's top edge
        let mut o = rect(0.0, 0.0, 100.0, 50.0);

        let arc = Segment::arc(pt(50.0, 50.0), pt(40.0, 50.0), pt(60.0, 50.0), true).unwrap();
        let chord = Segment::line(pt(60.0, 50.0), pt(40.0, 50.0)).unwrap();
        let bump = Outline::from_segments(vec![arc, chord]).unwrap();

        assert!(matches!(
            o.subtract(&bump),
            Err(Error::InvalidIntersection(_))
        ));
    }

    #[test]
    fn two_point_subtract_notches_the_edge() {
        // the same semicircle shifted down so the arc crosses the top edge
        // at two interior points
        let mut o = rect(0.0, 0.0, 100.0, 50.0);

        let arc = Segment::arc(pt(50.0, 45.0), pt(40.0, 45.0), pt(60.0, 45.0), true).unwrap();
        let chord = Segment::line(pt(60.0, 45.0), pt(40.0, 45.0)).unwrap();
        let bump = Outline::from_segments(vec![arc, chord]).unwrap();

        let changed = o.subtract(&bump).unwrap();
        assert!(changed);

        // the notch removes the area under the arc above y = 45
        assert!(!o.is_point_inside(&pt(50.0, 49.0)));
        assert!(o.is_point_inside(&pt(50.0, 44.0)));
        assert!(o.is_point_inside(&pt(10.0, 49.0)));

        // area shrank by the circular segment above the chord y = 50
        assert!(o.signed_area() < 5000.0);
        assert_eq!(o.orientation(), Orientation::Ccw);
    }

    #[test]
    fn two_point_add_merges_the_bulge() {
        // semicircle bulging out of the right edge
        let mut o = rect(0.0, 0.0, 100.0, 50.0);

        // circle centered on the right edge crosses x = 100 twice
        let bump = Outline::from_circle(pt(100.0, 25.0), 5.0).unwrap();

        let changed = o.add(&bump).unwrap();
        assert!(changed);

        // the bulge extends past the old right edge
        assert!(o.is_point_inside(&pt(103.0, 25.0)));
        assert!(o.is_point_inside(&pt(50.0, 25.0)));
        assert!(!o.is_point_inside(&pt(103.0, 40.0)));

        // area grew by the half-disc outside x = 100
        assert!(o.signed_area() > 5000.0);
    }

    #[test]
    fn boolean_result_remains_a_closed_chain() {
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        o.add_circle(pt(100.0, 25.0), 5.0).unwrap();
        o.subtract_circle(pt(0.0, 25.0), 5.0).unwrap();

        let segs = o.segments();
        for i in 0..segs.len() {
            let next = &segs[(i + 1) % segs.len()];
            assert!(points_match(&segs[i].end(), &next.start(), VERTEX_TOLERANCE));
        }

        // adding the right bump and carving the left notch cancel out
        assert!((o.signed_area() - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn subtract_circle_through_edge() {
        // circle centered on the top edge: two crossings, bite out of the top
        let mut o = rect(0.0, 0.0, 100.0, 50.0);
        let changed = o.subtract_circle(pt(50.0, 50.0), 10.0).unwrap();

        assert!(changed);
        assert!(!o.is_point_inside(&pt(50.0, 45.0)));
        assert!(o.is_point_inside(&pt(50.0, 35.0)));
        assert!((o.signed_area() - (5000.0 - 50.0 * std::f64::consts::PI)).abs() < 1e-6);
    }
}
