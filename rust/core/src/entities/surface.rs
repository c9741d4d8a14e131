// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface entities: Rational B-Spline Surface (128), Curve on Parametric
//! Surface (142), and Trimmed Parametric Surface (144).

use super::ParamData;
use crate::entity::{ChildRole, EntityKey, EntityRef, SeqIndex, SeqMap};
use crate::error::{Error, Result};
use crate::record::{PdParam, PdReader};
use nalgebra::Point3;

/// Entity 128: rational B-spline surface. Control points are stored
/// u-fastest: `point(u, v) = control_points[u + v * (k1 + 1)]`.
#[derive(Debug, Clone, Default)]
pub struct NurbsSurface {
    pub upper_index_u: i64,
    pub upper_index_v: i64,
    pub degree_u: i64,
    pub degree_v: i64,
    pub closed_u: bool,
    pub closed_v: bool,
    pub polynomial: bool,
    pub periodic_u: bool,
    pub periodic_v: bool,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub weights: Vec<f64>,
    pub control_points: Vec<Point3<f64>>,
    pub u0: f64,
    pub u1: f64,
    pub v0: f64,
    pub v1: f64,
}

impl ParamData for NurbsSurface {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.upper_index_u = r.int()?;
        self.upper_index_v = r.int()?;
        self.degree_u = r.int()?;
        self.degree_v = r.int()?;
        self.closed_u = r.int_or(0)? != 0;
        self.closed_v = r.int_or(0)? != 0;
        self.polynomial = r.int_or(1)? != 0;
        self.periodic_u = r.int_or(0)? != 0;
        self.periodic_v = r.int_or(0)? != 0;

        if self.upper_index_u < 0 || self.upper_index_v < 0 || self.degree_u < 0 || self.degree_v < 0
        {
            return Err(Error::BadParameterData(
                "negative B-spline surface indices".to_string(),
            ));
        }

        let ku = (self.upper_index_u + self.degree_u + 2) as usize;
        let kv = (self.upper_index_v + self.degree_v + 2) as usize;
        let np = ((self.upper_index_u + 1) * (self.upper_index_v + 1)) as usize;

        self.knots_u = Vec::with_capacity(ku);
        for _ in 0..ku {
            self.knots_u.push(r.real()?);
        }

        self.knots_v = Vec::with_capacity(kv);
        for _ in 0..kv {
            self.knots_v.push(r.real()?);
        }

        self.weights = Vec::with_capacity(np);
        for _ in 0..np {
            self.weights.push(r.real()?);
        }

        self.control_points = Vec::with_capacity(np);
        for _ in 0..np {
            self.control_points
                .push(Point3::new(r.real()?, r.real()?, r.real()?));
        }

        self.u0 = r.real_or(0.0)?;
        self.u1 = r.real_or(1.0)?;
        self.v0 = r.real_or(0.0)?;
        self.v1 = r.real_or(1.0)?;
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out =
            Vec::with_capacity(13 + self.knots_u.len() + self.knots_v.len() + 4 * self.weights.len());
        out.push(PdParam::Integer(self.upper_index_u));
        out.push(PdParam::Integer(self.upper_index_v));
        out.push(PdParam::Integer(self.degree_u));
        out.push(PdParam::Integer(self.degree_v));
        out.push(PdParam::Integer(self.closed_u as i64));
        out.push(PdParam::Integer(self.closed_v as i64));
        out.push(PdParam::Integer(self.polynomial as i64));
        out.push(PdParam::Integer(self.periodic_u as i64));
        out.push(PdParam::Integer(self.periodic_v as i64));

        for k in &self.knots_u {
            out.push(PdParam::Real(*k));
        }
        for k in &self.knots_v {
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

        out.push(PdParam::Real(self.u0));
        out.push(PdParam::Real(self.u1));
        out.push(PdParam::Real(self.v0));
        out.push(PdParam::Real(self.v1));
        Ok(out)
    }

    fn rescale(&mut self, sf: f64) {
        for p in &mut self.control_points {
            *p *= sf;
        }
    }
}

/// How a curve on a surface was created (E142 CRTN)
pub const CURVE_CREATION_PROJECTION: i64 = 1;
pub const CURVE_CREATION_INTERSECTION: i64 = 2;
pub const CURVE_CREATION_PARAMETRIC: i64 = 3;

/// Which representation of the curve is preferred (E142 PREF)
pub const CURVE_PREF_PARAMETRIC: i64 = 1;
pub const CURVE_PREF_MODEL: i64 = 2;
pub const CURVE_PREF_EITHER: i64 = 3;

/// Entity 142: a curve lying on a parametric surface. The B-pointer is
/// the parameter-space representation, the C-pointer the model-space one.
#[derive(Debug, Clone)]
pub struct CurveOnSurface {
    pub creation: i64,
    pub surface: Option<EntityRef>,
    pub b_curve: Option<EntityRef>,
    pub model_curve: Option<EntityRef>,
    pub preference: i64,
}

impl Default for CurveOnSurface {
    fn default() -> Self {
        Self {
            creation: CURVE_CREATION_PARAMETRIC,
            surface: None,
            b_curve: None,
            model_curve: None,
            preference: CURVE_PREF_MODEL,
        }
    }
}

impl CurveOnSurface {
    /// The resolved B-pointer key, if present
    pub fn b_curve_key(&self) -> Option<EntityKey> {
        self.b_curve.as_ref().and_then(|r| r.key().ok())
    }
}

fn read_opt_pointer(r: &mut PdReader) -> Result<Option<EntityRef>> {
    let raw = r.int_or(0)?;
    if raw == 0 {
        Ok(None)
    } else if raw > 0 {
        Ok(Some(EntityRef::Seq(raw as u32)))
    } else {
        Err(Error::BadParameterData(format!("negative DE pointer {}", raw)))
    }
}

fn opt_pointer_param(r: &Option<EntityRef>, map: &SeqMap) -> Result<PdParam> {
    Ok(match r {
        None => PdParam::Integer(0),
        Some(r) => PdParam::Integer(r.out_seq(map)? as i64),
    })
}

fn resolve_opt(r: &mut Option<EntityRef>, index: &SeqIndex) -> Result<()> {
    if let Some(er) = r {
        er.resolve(index)?;
    }
    Ok(())
}

impl ParamData for CurveOnSurface {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.creation = r.int_or(0)?;
        self.surface = read_opt_pointer(r)?;
        self.b_curve = read_opt_pointer(r)?;
        self.model_curve = read_opt_pointer(r)?;
        self.preference = r.int_or(CURVE_PREF_EITHER)?;
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        resolve_opt(&mut self.surface, index)?;
        resolve_opt(&mut self.b_curve, index)?;
        resolve_opt(&mut self.model_curve, index)?;
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        if let Some(k) = self.surface.as_ref().and_then(|r| r.key().ok()) {
            out.push((k, ChildRole::Plain));
        }
        if let Some(k) = self.b_curve_key() {
            out.push((k, ChildRole::BCurve));
        }
        if let Some(k) = self.model_curve.as_ref().and_then(|r| r.key().ok()) {
            out.push((k, ChildRole::Plain));
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        Ok(vec![
            PdParam::Integer(self.creation),
            opt_pointer_param(&self.surface, map)?,
            opt_pointer_param(&self.b_curve, map)?,
            opt_pointer_param(&self.model_curve, map)?,
            PdParam::Integer(self.preference),
        ])
    }
}

/// Entity 144: a surface trimmed by an outer boundary and inner cutouts.
/// The boundary pointers reference E142 curves on the same surface.
#[derive(Debug, Clone, Default)]
pub struct TrimmedSurface {
    pub surface: Option<EntityRef>,
    /// True if the outer boundary is `outer`, false if it is the surface's
    /// natural boundary
    pub has_outer: bool,
    pub outer: Option<EntityRef>,
    pub inner: Vec<EntityRef>,
}

impl ParamData for TrimmedSurface {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.surface = read_opt_pointer(r)?;
        self.has_outer = r.int_or(0)? != 0;
        let n2 = r.int_or(0)?;
        self.outer = read_opt_pointer(r)?;
        self.inner = Vec::with_capacity(n2.max(0) as usize);
        for _ in 0..n2 {
            self.inner.push(EntityRef::Seq(r.pointer()?));
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        resolve_opt(&mut self.surface, index)?;
        resolve_opt(&mut self.outer, index)?;
        for c in &mut self.inner {
            c.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        if let Some(k) = self.surface.as_ref().and_then(|r| r.key().ok()) {
            out.push((k, ChildRole::Plain));
        }
        if let Some(k) = self.outer.as_ref().and_then(|r| r.key().ok()) {
            out.push((k, ChildRole::Plain));
        }
        for c in &self.inner {
            if let Ok(k) = c.key() {
                out.push((k, ChildRole::Plain));
            }
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(4 + self.inner.len());
        out.push(opt_pointer_param(&self.surface, map)?);
        out.push(PdParam::Integer(self.has_outer as i64));
        out.push(PdParam::Integer(self.inner.len() as i64));
        out.push(opt_pointer_param(&self.outer, map)?);
        for c in &self.inner {
            out.push(PdParam::Integer(c.out_seq(map)? as i64));
        }
        Ok(out)
    }
}
