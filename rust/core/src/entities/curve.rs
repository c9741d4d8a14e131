// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve entities: Circular Arc (100), Composite Curve (102), Conic Arc
//! (104), Line (110), and Rational B-Spline Curve (126).

use super::ParamData;
use crate::entity::{ChildRole, EntityKey, EntityRef, SeqIndex, SeqMap};
use crate::error::{Error, Result};
use crate::record::{PdParam, PdReader};
use nalgebra::{Point2, Point3, Vector3};

/// Entity 100: a CCW circular arc in a plane parallel to z = ZT
#[derive(Debug, Clone, Default)]
pub struct CircularArc {
    pub z: f64,
    pub center: Point2<f64>,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl ParamData for CircularArc {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.z = r.real_or(0.0)?;
        self.center = Point2::new(r.real()?, r.real()?);
        self.start = Point2::new(r.real()?, r.real()?);
        self.end = Point2::new(r.real()?, r.real()?);
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        Ok(vec![
            PdParam::Real(self.z),
            PdParam::Real(self.center.x),
            PdParam::Real(self.center.y),
            PdParam::Real(self.start.x),
            PdParam::Real(self.start.y),
            PdParam::Real(self.end.x),
            PdParam::Real(self.end.y),
        ])
    }

    fn rescale(&mut self, sf: f64) {
        self.z *= sf;
        self.center *= sf;
        self.start *= sf;
        self.end *= sf;
    }
}

/// Entity 102: an ordered chain of curve entities
#[derive(Debug, Clone, Default)]
pub struct CompositeCurve {
    pub curves: Vec<EntityRef>,
}

impl ParamData for CompositeCurve {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let n = r.int()?;
        self.curves = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            self.curves.push(EntityRef::Seq(r.pointer()?));
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        for c in &mut self.curves {
            c.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        self.curves
            .iter()
            .filter_map(|c| c.key().ok())
            .map(|k| (k, ChildRole::Member))
            .collect()
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(self.curves.len() + 1);
        out.push(PdParam::Integer(self.curves.len() as i64));
        for c in &self.curves {
            out.push(PdParam::Integer(c.out_seq(map)? as i64));
        }
        Ok(out)
    }
}

/// Entity 104: conic arc `A x^2 + B xy + C y^2 + D x + E y + F = 0`
#[derive(Debug, Clone, Default)]
pub struct ConicArc {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub z: f64,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl ParamData for ConicArc {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.a = r.real()?;
        self.b = r.real()?;
        self.c = r.real()?;
        self.d = r.real()?;
        self.e = r.real()?;
        self.f = r.real()?;
        self.z = r.real_or(0.0)?;
        self.start = Point2::new(r.real()?, r.real()?);
        self.end = Point2::new(r.real()?, r.real()?);
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        Ok(vec![
            PdParam::Real(self.a),
            PdParam::Real(self.b),
            PdParam::Real(self.c),
            PdParam::Real(self.d),
            PdParam::Real(self.e),
            PdParam::Real(self.f),
            PdParam::Real(self.z),
            PdParam::Real(self.start.x),
            PdParam::Real(self.start.y),
            PdParam::Real(self.end.x),
            PdParam::Real(self.end.y),
        ])
    }

    fn rescale(&mut self, sf: f64) {
        // substituting x -> x/sf keeps the quadratic coefficients and
        // scales the linear and constant terms
        self.d *= sf;
        self.e *= sf;
        self.f *= sf * sf;
        self.z *= sf;
        self.start *= sf;
        self.end *= sf;
    }
}

/// Entity 110: a line segment between two model-space points
#[derive(Debug, Clone)]
pub struct Line {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            start: Point3::origin(),
            end: Point3::origin(),
        }
    }
}

impl ParamData for Line {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.start = Point3::new(r.real()?, r.real()?, r.real()?);
        self.end = Point3::new(r.real()?, r.real()?, r.real()?);
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        Ok(vec![
            PdParam::Real(self.start.x),
            PdParam::Real(self.start.y),
            PdParam::Real(self.start.z),
            PdParam::Real(self.end.x),
            PdParam::Real(self.end.y),
            PdParam::Real(self.end.z),
        ])
    }

    fn rescale(&mut self, sf: f64) {
        self.start *= sf;
        self.end *= sf;
    }
}

/// Entity 126: rational B-spline curve.
///
/// `upper_index` is K (the upper index of the control-point sum) and
/// `degree` is M; the knot vector holds `K + M + 2` values and the curve
/// carries `K + 1` weights and control points.
#[derive(Debug, Clone)]
pub struct NurbsCurve {
    pub upper_index: i64,
    pub degree: i64,
    pub planar: bool,
    pub closed: bool,
    pub polynomial: bool,
    pub periodic: bool,
    pub knots: Vec<f64>,
    pub weights: Vec<f64>,
    pub control_points: Vec<Point3<f64>>,
    pub v0: f64,
    pub v1: f64,
    pub normal: Vector3<f64>,
}

impl Default for NurbsCurve {
    fn default() -> Self {
        Self {
            upper_index: 0,
            degree: 0,
            planar: true,
            closed: false,
            polynomial: true,
            periodic: false,
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            v0: 0.0,
            v1: 1.0,
            normal: Vector3::z(),
        }
    }
}

impl ParamData for NurbsCurve {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.upper_index = r.int()?;
        self.degree = r.int()?;
        self.planar = r.int_or(0)? != 0;
        self.closed = r.int_or(0)? != 0;
        self.polynomial = r.int_or(1)? != 0;
        self.periodic = r.int_or(0)? != 0;

        if self.upper_index < 0 || self.degree < 0 {
            return Err(Error::BadParameterData(
                "negative B-spline indices".to_string(),
            ));
        }

        let knot_count = (self.upper_index + self.degree + 2) as usize;
        let point_count = (self.upper_index + 1) as usize;

        self.knots = Vec::with_capacity(knot_count);
        for _ in 0..knot_count {
            self.knots.push(r.real()?);
        }

        self.weights = Vec::with_capacity(point_count);
        for _ in 0..point_count {
            self.weights.push(r.real()?);
        }

        self.control_points = Vec::with_capacity(point_count);
        for _ in 0..point_count {
            self.control_points
                .push(Point3::new(r.real()?, r.real()?, r.real()?));
        }

        self.v0 = r.real_or(0.0)?;
        self.v1 = r.real_or(1.0)?;

        let nx = r.real_or(0.0)?;
        let ny = r.real_or(0.0)?;
        let nz = r.real_or(0.0)?;
        self.normal = if nx == 0.0 && ny == 0.0 && nz == 0.0 {
            Vector3::z()
        } else {
            Vector3::new(nx, ny, nz)
        };

        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(10 + self.knots.len() + 4 * self.weights.len());
        out.push(PdParam::Integer(self.upper_index));
        out.push(PdParam::Integer(self.degree));
        out.push(PdParam::Integer(self.planar as i64));
        out.push(PdParam::Integer(self.closed as i64));
        out.push(PdParam::Integer(self.polynomial as i64));
        out.push(PdParam::Integer(self.periodic as i64));

        for k in &self.knots {
            out.push(PdParam::Real(*k));
        }
        for w in &self.weights {
            out.push(PdParam::Real(*w));
        }
        for p in &self.control_points {
            out.push(PdParam::Real(p.x));
            out.push(PdParam::Real(p.y));
            out.push(PdParam::Real(p.z));
        }

        out.push(PdParam::Real(self.v0));
        out.push(PdParam::Real(self.v1));
        out.push(PdParam::Real(self.normal.x));
        out.push(PdParam::Real(self.normal.y));
        out.push(PdParam::Real(self.normal.z));
        Ok(out)
    }

    fn rescale(&mut self, sf: f64) {
        for p in &mut self.control_points {
            *p *= sf;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_curve_reads_pointers() {
        let params = vec![
            PdParam::Integer(3),
            PdParam::Integer(1),
            PdParam::Integer(3),
            PdParam::Integer(5),
        ];
        let mut cc = CompositeCurve::default();
        cc.read_pd(&mut PdReader::new(&params)).unwrap();

        assert_eq!(
            cc.curves,
            vec![EntityRef::Seq(1), EntityRef::Seq(3), EntityRef::Seq(5)]
        );
        // unresolved refs contribute no child edges yet
        assert!(cc.children().is_empty());
    }

    #[test]
    fn nurbs_curve_counts() {
        // degree-1 line: K=1, M=1, 4 knots, 2 weights, 2 control points
        let params = vec![
            PdParam::Integer(1),
            PdParam::Integer(1),
            PdParam::Integer(1),
            PdParam::Integer(0),
            PdParam::Integer(1),
            PdParam::Integer(0),
            PdParam::Real(0.0),
            PdParam::Real(0.0),
            PdParam::Real(1.0),
            PdParam::Real(1.0),
            PdParam::Real(1.0),
            PdParam::Real(1.0),
            PdParam::Real(0.0),
            PdParam::Real(0.0),
            PdParam::Real(0.0),
            PdParam::Real(10.0),
            PdParam::Real(5.0),
            PdParam::Real(0.0),
            PdParam::Real(0.0),
            PdParam::Real(1.0),
        ];
        let mut c = NurbsCurve::default();
        c.read_pd(&mut PdReader::new(&params)).unwrap();

        assert_eq!(c.knots.len(), 4);
        assert_eq!(c.weights.len(), 2);
        assert_eq!(c.control_points.len(), 2);
        assert_eq!(c.control_points[1], Point3::new(10.0, 5.0, 0.0));
        assert_eq!(c.normal, Vector3::z());
    }

    #[test]
    fn nurbs_rescale_touches_control_points_only() {
        let mut c = NurbsCurve {
            knots: vec![0.0, 0.0, 1.0, 1.0],
            weights: vec![1.0, 1.0],
            control_points: vec![Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
            ..NurbsCurve::default()
        };
        c.rescale(10.0);

        assert_eq!(c.control_points[0].x, 10.0);
        assert_eq!(c.control_points[1].x, 20.0);
        assert_eq!(c.knots, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(c.weights, vec![1.0, 1.0]);
    }

    #[test]
    fn conic_rescale_scales_linear_terms() {
        let mut c = ConicArc {
            a: 1.0,
            c: 1.0,
            f: -25.0,
            ..ConicArc::default()
        };
        c.rescale(2.0);

        assert_eq!(c.a, 1.0);
        assert_eq!(c.f, -100.0);
    }
}
