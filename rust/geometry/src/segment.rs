// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar segment primitive: line, circular arc, or full circle.
//!
//! Segments live in the z = 0 plane. Arcs store their angular span in CCW
//! convention (`end_angle > start_angle`) regardless of traversal direction;
//! the `cw` flag records how the owning outline walks the arc. A full circle
//! canonicalizes its start/end point to `center + (radius, 0, 0)`.

use crate::error::{Error, Result};
use nalgebra::Point3;
use std::f64::consts::PI;

/// Tolerance for point coincidence tests
pub const EPSILON: f64 = 1e-8;

/// Coarse tolerance for radius matching and intersection classification
pub const RADIAL_TOLERANCE: f64 = 1e-3;

/// Angular slack when testing whether a computed point lies on an arc
const ANGLE_TOLERANCE: f64 = 1e-6;

/// Returns true if two points coincide within the given tolerance
#[inline]
pub fn points_match(a: &Point3<f64>, b: &Point3<f64>, tol: f64) -> bool {
    (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol && (a.z - b.z).abs() < tol
}

/// Segment variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Line,
    Arc,
    Circle,
}

/// Classification of an intersection test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectFlag {
    /// Plain result: zero or more transversal intersection points
    None,
    /// The segments touch at a single tangent point (no points reported)
    Tangent,
    /// The segments are geometrically identical
    Coincident,
    /// This segment lies entirely inside the other (circle pairs)
    SegmentInsideOther,
    /// The other segment lies entirely inside this one (circle pairs)
    OtherInsideSegment,
    /// The segments overlap along a shared edge; the two reported points
    /// bound the overlapping span
    EdgeOverlap,
}

/// A planar line, circular arc, or circle
#[derive(Debug, Clone)]
pub struct Segment {
    kind: SegmentKind,
    start: Point3<f64>,
    end: Point3<f64>,
    center: Point3<f64>,
    radius: f64,
    /// CCW-convention angular span; meaningful for arcs only
    start_angle: f64,
    end_angle: f64,
    /// True if the outline traverses the arc clockwise
    cw: bool,
}

impl Segment {
    /// Create a line segment. Fails if the endpoints coincide or leave the
    /// z = 0 plane.
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Result<Self> {
        if start.z != 0.0 || end.z != 0.0 {
            return Err(Error::NonPlanar("line endpoint with z != 0".to_string()));
        }

        if points_match(&start, &end, EPSILON) {
            return Err(Error::DegenerateGeometry("zero-length line".to_string()));
        }

        Ok(Self {
            kind: SegmentKind::Line,
            start,
            end,
            center: Point3::origin(),
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            cw: false,
        })
    }

    /// Create a circular arc from `start` to `end` about `center`, traversed
    /// clockwise when `cw` is set. If the endpoints coincide the segment
    /// becomes a full circle with a canonical start point.
    ///
    /// Fails if any point leaves z = 0, if an endpoint coincides with the
    /// center, or if the two endpoint radii differ by more than the radial
    /// tolerance.
    pub fn arc(center: Point3<f64>, start: Point3<f64>, end: Point3<f64>, cw: bool) -> Result<Self> {
        if center.z != 0.0 || start.z != 0.0 || end.z != 0.0 {
            return Err(Error::NonPlanar("arc point with z != 0".to_string()));
        }

        if points_match(&center, &start, EPSILON) || points_match(&center, &end, EPSILON) {
            return Err(Error::DegenerateGeometry(
                "arc endpoint coincides with center".to_string(),
            ));
        }

        let radius = (start - center).norm();

        if points_match(&start, &end, EPSILON) {
            return Self::circle(center, radius);
        }

        let r2 = (end - center).norm();

        if (r2 - radius).abs() > RADIAL_TOLERANCE {
            return Err(Error::DegenerateGeometry(format!(
                "arc endpoint radii differ by {}",
                (r2 - radius).abs()
            )));
        }

        let mut sa = (start.y - center.y).atan2(start.x - center.x);
        let mut ea = (end.y - center.y).atan2(end.x - center.x);

        // the stored span is always CCW
        if cw {
            std::mem::swap(&mut sa, &mut ea);
        }

        while ea <= sa {
            ea += 2.0 * PI;
        }

        Ok(Self {
            kind: SegmentKind::Arc,
            start,
            end,
            center,
            radius,
            start_angle: sa,
            end_angle: ea,
            cw,
        })
    }

    /// Create a full circle.
    pub fn circle(center: Point3<f64>, radius: f64) -> Result<Self> {
        if center.z != 0.0 {
            return Err(Error::NonPlanar("circle center with z != 0".to_string()));
        }

        if radius <= EPSILON {
            return Err(Error::DegenerateGeometry(
                "circle with non-positive radius".to_string(),
            ));
        }

        let start = Point3::new(center.x + radius, center.y, 0.0);

        Ok(Self {
            kind: SegmentKind::Circle,
            start,
            end: start,
            center,
            radius,
            start_angle: 0.0,
            end_angle: 2.0 * PI,
            cw: false,
        })
    }

    // --- Accessors ---

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Traversal start point (as supplied by the caller)
    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    /// Traversal end point
    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// CCW-convention start angle (arcs and circles)
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// CCW-convention end angle; always greater than `start_angle`
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn is_cw(&self) -> bool {
        self.cw
    }

    /// The same geometry traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        let mut s = self.clone();

        match self.kind {
            SegmentKind::Line => {
                s.start = self.end;
                s.end = self.start;
            }
            SegmentKind::Arc => {
                s.start = self.end;
                s.end = self.start;
                s.cw = !self.cw;
            }
            // endpoints coincide; only the traversal sense flips
            SegmentKind::Circle => {
                s.cw = !self.cw;
            }
        }

        s
    }

    /// Midpoint along the traversal direction. For arcs this samples the
    /// angular middle of the span, which also feeds the outline orientation
    /// sum so that arcs bulging past their chord are accounted for.
    pub fn midpoint(&self) -> Point3<f64> {
        match self.kind {
            SegmentKind::Line => nalgebra::center(&self.start, &self.end),
            SegmentKind::Arc | SegmentKind::Circle => {
                let mid = 0.5 * (self.start_angle + self.end_angle);
                Point3::new(
                    self.center.x + self.radius * mid.cos(),
                    self.center.y + self.radius * mid.sin(),
                    0.0,
                )
            }
        }
    }

    /// Returns true if the given angle falls within the arc's CCW span,
    /// normalizing by +2π as needed.
    pub fn angle_in_arc(&self, ang: f64) -> bool {
        if self.kind == SegmentKind::Circle {
            return true;
        }

        let lo = self.start_angle - ANGLE_TOLERANCE;
        let hi = self.end_angle + ANGLE_TOLERANCE;
        (ang >= lo && ang <= hi) || (ang + 2.0 * PI >= lo && ang + 2.0 * PI <= hi)
    }

    /// Angle of a point about the arc's center, in (-π, π]
    pub fn angle_of(&self, p: &Point3<f64>) -> f64 {
        (p.y - self.center.y).atan2(p.x - self.center.x)
    }

    /// Normalize an angle into the arc's CCW span
    fn span_angle(&self, ang: f64) -> f64 {
        let mut a = ang;
        while a < self.start_angle - ANGLE_TOLERANCE {
            a += 2.0 * PI;
        }
        a
    }

    // --- Intersection ---

    /// Compute the intersection of two segments.
    ///
    /// Never fails; degenerate and special configurations are reported via
    /// the flag. Points are returned in traversal order along `self` for
    /// lines and in CCW angular order for arcs; circle×circle pairs are
    /// ordered clockwise from the direction of the other circle's center.
    pub fn intersect(&self, other: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
        match (self.kind, other.kind) {
            (SegmentKind::Line, SegmentKind::Line) => self.check_lines(other),
            (SegmentKind::Circle, SegmentKind::Circle) => self.check_circles(other),
            (SegmentKind::Line, _) => check_arc_line(other, self),
            (_, SegmentKind::Line) => check_arc_line(self, other),
            _ => self.check_arcs(other),
        }
    }

    /// Line × line: solve the 2×2 parametric system; collinear overlaps
    /// report the two inner endpoints of the shared span.
    fn check_lines(&self, other: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
        let d1 = self.end - self.start;
        let d2 = other.end - other.start;
        let denom = d1.x * d2.y - d1.y * d2.x;

        // relative threshold keeps the parallel test scale-free
        let scale = d1.norm() * d2.norm();

        if denom.abs() > 1e-12 * scale.max(1.0) {
            let w = other.start - self.start;
            let ta = (w.x * d2.y - w.y * d2.x) / denom;
            let tb = (w.x * d1.y - w.y * d1.x) / denom;

            if (-1e-9..=1.0 + 1e-9).contains(&ta) && (-1e-9..=1.0 + 1e-9).contains(&tb) {
                let p = self.start + d1 * ta;
                return (vec![Point3::new(p.x, p.y, 0.0)], IntersectFlag::None);
            }

            return (Vec::new(), IntersectFlag::None);
        }

        // parallel; collinear only if other.start sits on our carrier line
        let w = other.start - self.start;
        let cross = w.x * d1.y - w.y * d1.x;

        if cross.abs() > EPSILON * d1.norm().max(1.0) {
            return (Vec::new(), IntersectFlag::None);
        }

        if (points_match(&self.start, &other.start, EPSILON)
            && points_match(&self.end, &other.end, EPSILON))
            || (points_match(&self.start, &other.end, EPSILON)
                && points_match(&self.end, &other.start, EPSILON))
        {
            return (Vec::new(), IntersectFlag::Coincident);
        }

        // project the other segment's endpoints onto our parameter
        let len2 = d1.norm_squared();
        let t0 = (other.start - self.start).dot(&d1) / len2;
        let t1 = (other.end - self.start).dot(&d1) / len2;
        let (omin, omax) = if t0 < t1 { (t0, t1) } else { (t1, t0) };

        let lo = omin.max(0.0);
        let hi = omax.min(1.0);

        if hi - lo <= 1e-9 {
            return (Vec::new(), IntersectFlag::None);
        }

        let pa = self.start + d1 * lo;
        let pb = self.start + d1 * hi;

        (
            vec![Point3::new(pa.x, pa.y, 0.0), Point3::new(pb.x, pb.y, 0.0)],
            IntersectFlag::EdgeOverlap,
        )
    }

    /// Circle × circle via the radical-line construction
    fn check_circles(&self, other: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
        let r1 = self.radius;
        let r2 = other.radius;
        let dx = other.center.x - self.center.x;
        let dy = other.center.y - self.center.y;
        let d = (dx * dx + dy * dy).sqrt();

        if points_match(&self.center, &other.center, RADIAL_TOLERANCE)
            && (r1 - r2).abs() < RADIAL_TOLERANCE
        {
            return (Vec::new(), IntersectFlag::Coincident);
        }

        if d > r1 + r2 {
            if (d - (r1 + r2)).abs() < RADIAL_TOLERANCE {
                return (Vec::new(), IntersectFlag::Tangent);
            }
            return (Vec::new(), IntersectFlag::None);
        }

        if (d - (r1 + r2)).abs() < RADIAL_TOLERANCE {
            return (Vec::new(), IntersectFlag::Tangent);
        }

        if d <= r1 - r2 {
            return (Vec::new(), IntersectFlag::OtherInsideSegment);
        }

        if d <= r2 - r1 {
            return (Vec::new(), IntersectFlag::SegmentInsideOther);
        }

        let (p0, p1) = self.circle_intercepts(&other.center, r2, d);
        (vec![p0, p1], IntersectFlag::None)
    }

    /// Two crossing points of distinct overlapping circles. The first point
    /// is the one reached first when walking this circle clockwise from the
    /// direction of the other center.
    fn circle_intercepts(
        &self,
        c2: &Point3<f64>,
        r2: f64,
        d: f64,
    ) -> (Point3<f64>, Point3<f64>) {
        // signed distance from our center to the radical line
        let rd = (d * d - r2 * r2 + self.radius * self.radius) / (2.0 * d);
        let dx = c2.x - self.center.x;
        let dy = c2.y - self.center.y;

        // foot of the radical line on the center line
        let fx = self.center.x + rd / d * dx;
        let fy = self.center.y + rd / d * dy;

        // half-chord height over d, so (dy, -dx) scaled gives the offset
        let h = (self.radius * self.radius - rd * rd).max(0.0).sqrt() / d;

        let p0 = Point3::new(fx + h * dy, fy - h * dx, 0.0);
        let p1 = Point3::new(fx - h * dy, fy + h * dx, 0.0);
        (p0, p1)
    }

    /// Arc × arc (at most one participant may be a full circle)
    fn check_arcs(&self, other: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
        let same_circle = points_match(&self.center, &other.center, RADIAL_TOLERANCE)
            && (self.radius - other.radius).abs() < RADIAL_TOLERANCE;

        if same_circle {
            return self.check_coincident_arcs(other);
        }

        // classify the underlying circles exactly as check_circles does;
        // only the two-intersection case goes on to angular filtering
        let r1 = self.radius;
        let r2 = other.radius;
        let d = ((other.center.x - self.center.x).powi(2)
            + (other.center.y - self.center.y).powi(2))
        .sqrt();

        if d > r1 + r2 {
            if (d - (r1 + r2)).abs() < RADIAL_TOLERANCE {
                return (Vec::new(), IntersectFlag::Tangent);
            }
            return (Vec::new(), IntersectFlag::None);
        }

        if (d - (r1 + r2)).abs() < RADIAL_TOLERANCE {
            return (Vec::new(), IntersectFlag::Tangent);
        }

        if d <= r1 - r2 {
            return (Vec::new(), IntersectFlag::OtherInsideSegment);
        }

        if d <= r2 - r1 {
            return (Vec::new(), IntersectFlag::SegmentInsideOther);
        }

        let (p0, p1) = self.circle_intercepts(&other.center, r2, d);

        let mut pts: Vec<Point3<f64>> = [p0, p1]
            .into_iter()
            .filter(|p| self.angle_in_arc(self.angle_of(p)) && other.angle_in_arc(other.angle_of(p)))
            .collect();

        // order along this arc's CCW direction from its start angle
        pts.sort_by(|a, b| {
            let ka = self.span_angle(self.angle_of(a));
            let kb = self.span_angle(self.angle_of(b));
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });

        (pts, IntersectFlag::None)
    }

    /// Arcs sharing one underlying circle: identity, envelopment, or a
    /// partial edge overlap.
    fn check_coincident_arcs(&self, other: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
        if self.kind == SegmentKind::Circle && other.kind == SegmentKind::Circle {
            return (Vec::new(), IntersectFlag::Coincident);
        }

        if self.kind == SegmentKind::Circle {
            return (vec![other.start, other.end], IntersectFlag::EdgeOverlap);
        }

        if other.kind == SegmentKind::Circle {
            return (vec![self.start, self.end], IntersectFlag::EdgeOverlap);
        }

        // both arcs; compare CCW spans with the other span shifted into range
        let (s1, e1) = (self.start_angle, self.end_angle);
        let mut s2 = other.start_angle;
        let mut e2 = other.end_angle;

        while e2 < s1 {
            s2 += 2.0 * PI;
            e2 += 2.0 * PI;
        }
        while s2 > e1 {
            s2 -= 2.0 * PI;
            e2 -= 2.0 * PI;
        }

        if (s1 - s2).abs() < ANGLE_TOLERANCE && (e1 - e2).abs() < ANGLE_TOLERANCE {
            return (Vec::new(), IntersectFlag::Coincident);
        }

        let lo = s1.max(s2);
        let hi = e1.min(e2);

        if hi - lo <= ANGLE_TOLERANCE {
            return (Vec::new(), IntersectFlag::None);
        }

        let at = |a: f64| {
            Point3::new(
                self.center.x + self.radius * a.cos(),
                self.center.y + self.radius * a.sin(),
                0.0,
            )
        };

        (vec![at(lo), at(hi)], IntersectFlag::EdgeOverlap)
    }

    // --- Splitting ---

    /// Cut the segment at one or two interior points, returning the pieces
    /// in traversal order. Points coinciding with an endpoint are ignored;
    /// a circle requires two distinct points (it has no endpoints to anchor
    /// a single cut).
    pub fn split(&self, points: &[Point3<f64>]) -> Result<Vec<Segment>> {
        match self.kind {
            SegmentKind::Line => self.split_line(points),
            SegmentKind::Arc => self.split_arc(points),
            SegmentKind::Circle => self.split_circle(points),
        }
    }

    fn split_line(&self, points: &[Point3<f64>]) -> Result<Vec<Segment>> {
        let d = self.end - self.start;
        let len2 = d.norm_squared();

        let mut ts: Vec<f64> = points
            .iter()
            .map(|p| (p - self.start).dot(&d) / len2)
            .filter(|t| *t > 1e-9 && *t < 1.0 - 1e-9)
            .collect();
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let mut out = Vec::with_capacity(ts.len() + 1);
        let mut prev = self.start;

        for t in ts {
            let p = self.start + d * t;
            let p = Point3::new(p.x, p.y, 0.0);
            out.push(Segment::line(prev, p)?);
            prev = p;
        }

        out.push(Segment::line(prev, self.end)?);
        Ok(out)
    }

    fn split_arc(&self, points: &[Point3<f64>]) -> Result<Vec<Segment>> {
        let mut angs: Vec<f64> = points
            .iter()
            .map(|p| self.span_angle(self.angle_of(p)))
            .filter(|a| {
                *a > self.start_angle + ANGLE_TOLERANCE && *a < self.end_angle - ANGLE_TOLERANCE
            })
            .collect();
        angs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        angs.dedup_by(|a, b| (*a - *b).abs() < ANGLE_TOLERANCE);

        // traversal order: CCW walks the span upward, CW downward
        if self.cw {
            angs.reverse();
        }

        let at = |a: f64| {
            Point3::new(
                self.center.x + self.radius * a.cos(),
                self.center.y + self.radius * a.sin(),
                0.0,
            )
        };

        let mut out = Vec::with_capacity(angs.len() + 1);
        let mut prev = self.start;

        for a in angs {
            let p = at(a);
            out.push(Segment::arc(self.center, prev, p, self.cw)?);
            prev = p;
        }

        out.push(Segment::arc(self.center, prev, self.end, self.cw)?);
        Ok(out)
    }

    fn split_circle(&self, points: &[Point3<f64>]) -> Result<Vec<Segment>> {
        let mut uniq: Vec<Point3<f64>> = Vec::new();

        for p in points {
            if !uniq.iter().any(|q| points_match(p, q, EPSILON)) {
                uniq.push(*p);
            }
        }

        if uniq.len() != 2 {
            return Err(Error::DegenerateGeometry(format!(
                "splitting a circle requires 2 distinct points, got {}",
                uniq.len()
            )));
        }

        // two CCW arcs: p0 -> p1 and p1 -> p0
        Ok(vec![
            Segment::arc(self.center, uniq[0], uniq[1], false)?,
            Segment::arc(self.center, uniq[1], uniq[0], false)?,
        ])
    }

    // --- Bounds ---

    /// Axis-aligned bounds as `(top_left, bottom_right)`: the first point
    /// carries (min x, max y), the second (max x, min y).
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        match self.kind {
            SegmentKind::Line => {
                let tl = Point3::new(self.start.x.min(self.end.x), self.start.y.max(self.end.y), 0.0);
                let br = Point3::new(self.start.x.max(self.end.x), self.start.y.min(self.end.y), 0.0);
                (tl, br)
            }
            SegmentKind::Circle => (
                Point3::new(self.center.x - self.radius, self.center.y + self.radius, 0.0),
                Point3::new(self.center.x + self.radius, self.center.y - self.radius, 0.0),
            ),
            SegmentKind::Arc => {
                let mut min_x = self.start.x.min(self.end.x);
                let mut max_x = self.start.x.max(self.end.x);
                let mut min_y = self.start.y.min(self.end.y);
                let mut max_y = self.start.y.max(self.end.y);

                // axis extrema that fall inside the angular span
                let extrema = [
                    (0.0, self.center.x + self.radius, self.center.y),
                    (0.5 * PI, self.center.x, self.center.y + self.radius),
                    (PI, self.center.x - self.radius, self.center.y),
                    (1.5 * PI, self.center.x, self.center.y - self.radius),
                ];

                for (ang, x, y) in extrema {
                    let hit = (ang >= self.start_angle && ang <= self.end_angle)
                        || (ang + 2.0 * PI >= self.start_angle
                            && ang + 2.0 * PI <= self.end_angle);
                    if hit {
                        min_x = min_x.min(x);
                        max_x = max_x.max(x);
                        min_y = min_y.min(y);
                        max_y = max_y.max(y);
                    }
                }

                (
                    Point3::new(min_x, max_y, 0.0),
                    Point3::new(max_x, min_y, 0.0),
                )
            }
        }
    }
}

/// Arc/circle × line: parameterize the line as `P(t) = t*start + (1-t)*end`,
/// substitute into `|P - c|^2 = r^2`, and solve the resulting quadratic.
/// Retained roots are filtered to the arc's angular span and ordered along
/// the arc's CCW direction.
fn check_arc_line(arc: &Segment, line: &Segment) -> (Vec<Point3<f64>>, IntersectFlag) {
    let s = line.start;
    let e = line.end;
    let c = arc.center;
    let r = arc.radius;

    let ds = s - e;
    let ec = e - c;

    let a = ds.norm_squared();
    let b = 2.0 * ds.dot(&ec);
    let q = ec.norm_squared() - r * r;

    let disc = b * b - 4.0 * a * q;

    if disc.abs() < RADIAL_TOLERANCE {
        return (Vec::new(), IntersectFlag::Tangent);
    }

    if disc < 0.0 {
        return (Vec::new(), IntersectFlag::None);
    }

    let root = disc.sqrt();
    let mut pts = Vec::with_capacity(2);

    for t in [(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)] {
        if !(-1e-9..=1.0 + 1e-9).contains(&t) {
            continue;
        }

        let p = Point3::new(t * s.x + (1.0 - t) * e.x, t * s.y + (1.0 - t) * e.y, 0.0);

        if arc.angle_in_arc(arc.angle_of(&p)) {
            pts.push(p);
        }
    }

    pts.sort_by(|p, q| {
        let ka = arc.span_angle(arc.angle_of(p));
        let kb = arc.span_angle(arc.angle_of(q));
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    (pts, IntersectFlag::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point3<f64> {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn line_rejects_degenerate_and_nonplanar() {
        assert!(Segment::line(pt(1.0, 1.0), pt(1.0, 1.0)).is_err());
        assert!(Segment::line(Point3::new(0.0, 0.0, 1.0), pt(1.0, 0.0)).is_err());
    }

    #[test]
    fn arc_radius_mismatch_rejected() {
        let r = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.01), false);
        assert!(r.is_err());
    }

    #[test]
    fn arc_with_matching_endpoints_becomes_circle() {
        let s = Segment::arc(pt(1.0, 2.0), pt(4.0, 2.0), pt(4.0, 2.0), false).unwrap();
        assert_eq!(s.kind(), SegmentKind::Circle);
        assert!((s.radius() - 3.0).abs() < 1e-12);
        assert!(points_match(&s.start(), &pt(4.0, 2.0), EPSILON));
    }

    #[test]
    fn cw_arc_normalizes_span() {
        // CW from (0,5) to (5,0): CCW span is [0, pi/2]
        let s = Segment::arc(pt(0.0, 0.0), pt(0.0, 5.0), pt(5.0, 0.0), true).unwrap();
        assert!((s.start_angle() - 0.0).abs() < 1e-12);
        assert!((s.end_angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(s.is_cw());
    }

    #[test]
    fn orthogonal_lines_cross_once() {
        let a = Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap();
        let b = Segment::line(pt(5.0, -5.0), pt(5.0, 5.0)).unwrap();

        let (pts, flag) = a.intersect(&b);
        assert_eq!(flag, IntersectFlag::None);
        assert_eq!(pts.len(), 1);
        assert!(points_match(&pts[0], &pt(5.0, 0.0), 1e-9));
    }

    #[test]
    fn collinear_lines_report_overlap() {
        let a = Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap();
        let b = Segment::line(pt(4.0, 0.0), pt(14.0, 0.0)).unwrap();

        let (pts, flag) = a.intersect(&b);
        assert_eq!(flag, IntersectFlag::EdgeOverlap);
        assert_eq!(pts.len(), 2);
        assert!(points_match(&pts[0], &pt(4.0, 0.0), 1e-9));
        assert!(points_match(&pts[1], &pt(10.0, 0.0), 1e-9));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap();
        let b = Segment::line(pt(0.0, 1.0), pt(10.0, 1.0)).unwrap();

        let (pts, flag) = a.intersect(&b);
        assert_eq!(flag, IntersectFlag::None);
        assert!(pts.is_empty());
    }

    #[test]
    fn tangent_circles() {
        let a = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let b = Segment::circle(pt(10.0, 0.0), 5.0).unwrap();

        let (pts, flag) = a.intersect(&b);
        assert_eq!(flag, IntersectFlag::Tangent);
        assert!(pts.is_empty());
    }

    #[test]
    fn concentric_circles_inner_inside_outer() {
        let inner = Segment::circle(pt(0.0, 0.0), 2.0).unwrap();
        let outer = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();

        let (_, flag) = inner.intersect(&outer);
        assert_eq!(flag, IntersectFlag::SegmentInsideOther);

        let (_, flag) = outer.intersect(&inner);
        assert_eq!(flag, IntersectFlag::OtherInsideSegment);
    }

    #[test]
    fn concentric_arc_inside_circle() {
        // a true arc nested inside a larger circle reports enclosure,
        // not disjointness
        let arc = Segment::arc(pt(0.0, 0.0), pt(2.0, 0.0), pt(0.0, 2.0), false).unwrap();
        let circle = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();

        let (pts, flag) = arc.intersect(&circle);
        assert_eq!(flag, IntersectFlag::SegmentInsideOther);
        assert!(pts.is_empty());

        let (pts, flag) = circle.intersect(&arc);
        assert_eq!(flag, IntersectFlag::OtherInsideSegment);
        assert!(pts.is_empty());
    }

    #[test]
    fn nested_arcs_report_enclosure() {
        // offset centers, small arc's circle entirely inside the big one
        let big = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(-5.0, 0.0), false).unwrap();
        let small = Segment::arc(pt(1.0, 0.0), pt(3.0, 0.0), pt(1.0, 2.0), false).unwrap();

        let (pts, flag) = big.intersect(&small);
        assert_eq!(flag, IntersectFlag::OtherInsideSegment);
        assert!(pts.is_empty());

        let (pts, flag) = small.intersect(&big);
        assert_eq!(flag, IntersectFlag::SegmentInsideOther);
        assert!(pts.is_empty());
    }

    #[test]
    fn crossing_circles_yield_two_points() {
        let a = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let b = Segment::circle(pt(6.0, 0.0), 5.0).unwrap();

        let (pts, flag) = a.intersect(&b);
        assert_eq!(flag, IntersectFlag::None);
        assert_eq!(pts.len(), 2);

        // radical line at x = 3, heights +-4
        for p in &pts {
            assert!((p.x - 3.0).abs() < 1e-9);
            assert!((p.y.abs() - 4.0).abs() < 1e-9);
        }
        assert!(pts[0].y < pts[1].y); // CW-first point comes below the center line
    }

    #[test]
    fn self_intersection_is_coincident() {
        let line = Segment::line(pt(0.0, 0.0), pt(4.0, 4.0)).unwrap();
        let circle = Segment::circle(pt(1.0, 1.0), 2.0).unwrap();
        let arc = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.0), false).unwrap();

        assert_eq!(line.intersect(&line).1, IntersectFlag::Coincident);
        assert_eq!(circle.intersect(&circle).1, IntersectFlag::Coincident);
        assert_eq!(arc.intersect(&arc).1, IntersectFlag::Coincident);
    }

    #[test]
    fn arc_enveloped_by_circle_is_edge_overlap() {
        let circle = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let arc = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.0), false).unwrap();

        let (pts, flag) = circle.intersect(&arc);
        assert_eq!(flag, IntersectFlag::EdgeOverlap);
        assert_eq!(pts.len(), 2);
        assert!(points_match(&pts[0], &arc.start(), 1e-9));
        assert!(points_match(&pts[1], &arc.end(), 1e-9));
    }

    #[test]
    fn line_through_circle() {
        let c = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let l = Segment::line(pt(-10.0, 0.0), pt(10.0, 0.0)).unwrap();

        let (pts, flag) = l.intersect(&c);
        assert_eq!(flag, IntersectFlag::None);
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().any(|p| points_match(p, &pt(5.0, 0.0), 1e-6)));
        assert!(pts.iter().any(|p| points_match(p, &pt(-5.0, 0.0), 1e-6)));
    }

    #[test]
    fn line_missing_arc_interval() {
        // upper-right quarter arc; a line crossing only the lower half misses it
        let arc = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.0), false).unwrap();
        let l = Segment::line(pt(-10.0, -3.0), pt(10.0, -3.0)).unwrap();

        let (pts, flag) = l.intersect(&arc);
        assert_eq!(flag, IntersectFlag::None);
        assert!(pts.is_empty());
    }

    #[test]
    fn line_hits_arc_within_interval() {
        let arc = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.0), false).unwrap();
        let l = Segment::line(pt(0.0, 3.0), pt(10.0, 3.0)).unwrap();

        let (pts, flag) = l.intersect(&arc);
        assert_eq!(flag, IntersectFlag::None);
        assert_eq!(pts.len(), 1);
        assert!((pts[0].y - 3.0).abs() < 1e-9);
        assert!((pts[0].x - 4.0).abs() < 1e-9); // 3-4-5 triangle
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let b = Segment::circle(pt(6.0, 0.0), 5.0).unwrap();

        let (ab, _) = a.intersect(&b);
        let (ba, _) = b.intersect(&a);

        assert_eq!(ab.len(), ba.len());
        for p in &ab {
            assert!(ba.iter().any(|q| points_match(p, q, 1e-9)));
        }
    }

    #[test]
    fn split_line_at_two_points() {
        let l = Segment::line(pt(0.0, 0.0), pt(10.0, 0.0)).unwrap();
        let parts = l.split(&[pt(7.0, 0.0), pt(3.0, 0.0)]).unwrap();

        assert_eq!(parts.len(), 3);
        assert!(points_match(&parts[0].end(), &pt(3.0, 0.0), 1e-9));
        assert!(points_match(&parts[1].end(), &pt(7.0, 0.0), 1e-9));
        assert!(points_match(&parts[2].end(), &pt(10.0, 0.0), 1e-9));
    }

    #[test]
    fn split_preserves_traversal_for_cw_arc() {
        // CW quarter arc from (0,5) to (5,0), cut at 45 degrees
        let a = Segment::arc(pt(0.0, 0.0), pt(0.0, 5.0), pt(5.0, 0.0), true).unwrap();
        let mid = a.midpoint();
        let parts = a.split(&[mid]).unwrap();

        assert_eq!(parts.len(), 2);
        assert!(points_match(&parts[0].start(), &pt(0.0, 5.0), 1e-9));
        assert!(points_match(&parts[0].end(), &mid, 1e-9));
        assert!(points_match(&parts[1].end(), &pt(5.0, 0.0), 1e-9));
        assert!(parts.iter().all(|s| s.is_cw()));
    }

    #[test]
    fn split_circle_into_two_arcs() {
        let c = Segment::circle(pt(0.0, 0.0), 5.0).unwrap();
        let parts = c.split(&[pt(5.0, 0.0), pt(-5.0, 0.0)]).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].kind(), SegmentKind::Arc);
        assert!(points_match(&parts[0].end(), &parts[1].start(), 1e-9));
        assert!(points_match(&parts[1].end(), &parts[0].start(), 1e-9));
    }

    #[test]
    fn arc_bounds_include_axis_extrema() {
        // half circle over the top: from (5,0) to (-5,0) CCW
        let a = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(-5.0, 0.0), false).unwrap();
        let (tl, br) = a.bounds();

        assert!((tl.x + 5.0).abs() < 1e-9);
        assert!((tl.y - 5.0).abs() < 1e-9); // includes the top extremum
        assert!((br.x - 5.0).abs() < 1e-9);
        assert!((br.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_swaps_traversal() {
        let a = Segment::arc(pt(0.0, 0.0), pt(5.0, 0.0), pt(0.0, 5.0), false).unwrap();
        let r = a.reversed();

        assert!(points_match(&r.start(), &a.end(), 1e-12));
        assert!(points_match(&r.end(), &a.start(), 1e-12));
        assert!(r.is_cw());
        // the CCW span is unchanged
        assert!((r.start_angle() - a.start_angle()).abs() < 1e-12);
        assert!((r.end_angle() - a.end_angle()).abs() < 1e-12);
    }
}
