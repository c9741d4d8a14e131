// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed parameter-data payloads for the implemented IGES entity types.
//!
//! Each payload knows how to parse its PD parameter list, resolve its
//! pointer-integers, enumerate its child references, render itself back to
//! parameters, and rescale its embedded lengths. The [`Payload`] enum is
//! the model's dispatch point; hosts can register additional factories but
//! every type the writer emits is covered here.

pub mod brep;
pub mod color;
pub mod curve;
pub mod surface;
pub mod transform;

use crate::entity::{ChildRole, EntityKey, SeqIndex, SeqMap};
use crate::error::Result;
use crate::record::{PdParam, PdReader};

pub use brep::{EdgeList, EdgeUse, Face, LoopEdge, LoopEntity, ManifoldSolid, Shell, VertexList};
pub use color::ColorDef;
pub use curve::{CircularArc, CompositeCurve, ConicArc, Line, NurbsCurve};
pub use surface::{CurveOnSurface, NurbsSurface, TrimmedSurface};
pub use transform::TransformMatrix;

/// Capability surface every payload implements
pub(crate) trait ParamData {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()>;

    fn resolve(&mut self, _index: &SeqIndex) -> Result<()> {
        Ok(())
    }

    /// Resolved child references with their graph roles
    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        Vec::new()
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>>;

    fn rescale(&mut self, _sf: f64) {}
}

/// Tagged payload over the implemented entity types
#[derive(Debug, Clone)]
pub enum Payload {
    CircularArc(CircularArc),
    CompositeCurve(CompositeCurve),
    ConicArc(ConicArc),
    Line(Line),
    TransformMatrix(TransformMatrix),
    NurbsCurve(NurbsCurve),
    NurbsSurface(NurbsSurface),
    CurveOnSurface(CurveOnSurface),
    TrimmedSurface(TrimmedSurface),
    ManifoldSolid(ManifoldSolid),
    Color(ColorDef),
    VertexList(VertexList),
    EdgeList(EdgeList),
    Loop(LoopEntity),
    Face(Face),
    Shell(Shell),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Payload::CircularArc($p) => $body,
            Payload::CompositeCurve($p) => $body,
            Payload::ConicArc($p) => $body,
            Payload::Line($p) => $body,
            Payload::TransformMatrix($p) => $body,
            Payload::NurbsCurve($p) => $body,
            Payload::NurbsSurface($p) => $body,
            Payload::CurveOnSurface($p) => $body,
            Payload::TrimmedSurface($p) => $body,
            Payload::ManifoldSolid($p) => $body,
            Payload::Color($p) => $body,
            Payload::VertexList($p) => $body,
            Payload::EdgeList($p) => $body,
            Payload::Loop($p) => $body,
            Payload::Face($p) => $body,
            Payload::Shell($p) => $body,
        }
    };
}

impl Payload {
    /// IGES type code of the payload
    pub fn entity_type(&self) -> i32 {
        match self {
            Payload::CircularArc(_) => 100,
            Payload::CompositeCurve(_) => 102,
            Payload::ConicArc(_) => 104,
            Payload::Line(_) => 110,
            Payload::TransformMatrix(_) => 124,
            Payload::NurbsCurve(_) => 126,
            Payload::NurbsSurface(_) => 128,
            Payload::CurveOnSurface(_) => 142,
            Payload::TrimmedSurface(_) => 144,
            Payload::ManifoldSolid(_) => 186,
            Payload::Color(_) => 314,
            Payload::VertexList(_) => 502,
            Payload::EdgeList(_) => 504,
            Payload::Loop(_) => 508,
            Payload::Face(_) => 510,
            Payload::Shell(_) => 514,
        }
    }

    /// Default factory: an empty payload for a registered type code
    pub fn from_type(entity_type: i32, _form: i32) -> Option<Payload> {
        Some(match entity_type {
            100 => Payload::CircularArc(CircularArc::default()),
            102 => Payload::CompositeCurve(CompositeCurve::default()),
            104 => Payload::ConicArc(ConicArc::default()),
            110 => Payload::Line(Line::default()),
            124 => Payload::TransformMatrix(TransformMatrix::default()),
            126 => Payload::NurbsCurve(NurbsCurve::default()),
            128 => Payload::NurbsSurface(NurbsSurface::default()),
            142 => Payload::CurveOnSurface(CurveOnSurface::default()),
            144 => Payload::TrimmedSurface(TrimmedSurface::default()),
            186 => Payload::ManifoldSolid(ManifoldSolid::default()),
            314 => Payload::Color(ColorDef::default()),
            502 => Payload::VertexList(VertexList::default()),
            504 => Payload::EdgeList(EdgeList::default()),
            508 => Payload::Loop(LoopEntity::default()),
            510 => Payload::Face(Face::default()),
            514 => Payload::Shell(Shell::default()),
            _ => return None,
        })
    }

    pub fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        dispatch!(self, p => p.read_pd(r))
    }

    pub fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        dispatch!(self, p => p.resolve(index))
    }

    pub fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        dispatch!(self, p => p.children())
    }

    pub fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        dispatch!(self, p => p.format(map))
    }

    pub fn rescale(&mut self, sf: f64) {
        dispatch!(self, p => p.rescale(sf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PdParam;

    #[test]
    fn factory_covers_registered_types() {
        for code in [100, 102, 104, 110, 124, 126, 128, 142, 144, 186, 314, 502, 504, 508, 510, 514]
        {
            let p = Payload::from_type(code, 0).unwrap();
            assert_eq!(p.entity_type(), code);
        }
        assert!(Payload::from_type(999, 0).is_none());
    }

    #[test]
    fn line_pd_round_trip() {
        let mut p = Payload::from_type(110, 0).unwrap();
        let params = vec![
            PdParam::Real(1.0),
            PdParam::Real(2.0),
            PdParam::Real(0.0),
            PdParam::Real(4.0),
            PdParam::Real(5.0),
            PdParam::Real(0.0),
        ];

        let mut r = PdReader::new(&params);
        p.read_pd(&mut r).unwrap();

        let out = p.format(&SeqMap::default()).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], PdParam::Real(1.0));
        assert_eq!(out[3], PdParam::Real(4.0));
    }

    #[test]
    fn color_pd_round_trip() {
        let mut p = Payload::from_type(314, 0).unwrap();
        let params = vec![
            PdParam::Real(10.0),
            PdParam::Real(50.0),
            PdParam::Real(90.0),
            PdParam::Text("SOLDER MASK".to_string()),
        ];

        let mut r = PdReader::new(&params);
        p.read_pd(&mut r).unwrap();

        let out = p.format(&SeqMap::default()).unwrap();
        assert_eq!(out[0], PdParam::Real(10.0));
        assert_eq!(out[3], PdParam::Text("SOLDER MASK".to_string()));
    }
}
