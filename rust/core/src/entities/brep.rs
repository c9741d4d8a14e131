// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! B-Rep topology entities: Manifold Solid (186), Vertex List (502),
//! Edge List (504), Loop (508), Face (510), and Shell (514).

use super::ParamData;
use crate::entity::{ChildRole, EntityKey, EntityRef, SeqIndex, SeqMap};
use crate::error::Result;
use crate::record::{PdParam, PdReader};
use nalgebra::Point3;

fn push_resolved(out: &mut Vec<(EntityKey, ChildRole)>, r: &EntityRef) {
    if let Ok(k) = r.key() {
        out.push((k, ChildRole::Plain));
    }
}

/// Entity 186: a closed solid bounded by one outer shell and optional
/// void shells, each with an orientation flag.
#[derive(Debug, Clone, Default)]
pub struct ManifoldSolid {
    pub shell: Option<EntityRef>,
    pub shell_outward: bool,
    pub voids: Vec<(EntityRef, bool)>,
}

impl ParamData for ManifoldSolid {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.shell = Some(EntityRef::Seq(r.pointer()?));
        self.shell_outward = r.int_or(1)? != 0;
        let n = r.int_or(0)?;
        self.voids = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            let v = EntityRef::Seq(r.pointer()?);
            let of = r.int_or(1)? != 0;
            self.voids.push((v, of));
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        if let Some(s) = &mut self.shell {
            s.resolve(index)?;
        }
        for (v, _) in &mut self.voids {
            v.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        if let Some(s) = &self.shell {
            push_resolved(&mut out, s);
        }
        for (v, _) in &self.voids {
            push_resolved(&mut out, v);
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(3 + 2 * self.voids.len());
        out.push(match &self.shell {
            Some(s) => PdParam::Integer(s.out_seq(map)? as i64),
            None => PdParam::Integer(0),
        });
        out.push(PdParam::Integer(self.shell_outward as i64));
        out.push(PdParam::Integer(self.voids.len() as i64));
        for (v, of) in &self.voids {
            out.push(PdParam::Integer(v.out_seq(map)? as i64));
            out.push(PdParam::Integer(*of as i64));
        }
        Ok(out)
    }
}

/// Entity 502 form 1: a list of model-space vertices referenced by index
#[derive(Debug, Clone, Default)]
pub struct VertexList {
    pub vertices: Vec<Point3<f64>>,
}

impl ParamData for VertexList {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let n = r.int()?;
        self.vertices = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            self.vertices
                .push(Point3::new(r.real()?, r.real()?, r.real()?));
        }
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(1 + 3 * self.vertices.len());
        out.push(PdParam::Integer(self.vertices.len() as i64));
        for v in &self.vertices {
            out.push(PdParam::Real(v.x));
            out.push(PdParam::Real(v.y));
            out.push(PdParam::Real(v.z));
        }
        Ok(out)
    }

    fn rescale(&mut self, sf: f64) {
        for v in &mut self.vertices {
            *v *= sf;
        }
    }
}

/// One edge of an Edge List: the space curve plus start/terminate vertices
/// addressed as (vertex-list entity, 1-based index)
#[derive(Debug, Clone)]
pub struct EdgeUse {
    pub curve: EntityRef,
    pub start_list: EntityRef,
    pub start_index: i64,
    pub end_list: EntityRef,
    pub end_index: i64,
}

/// Entity 504 form 1
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    pub edges: Vec<EdgeUse>,
}

impl ParamData for EdgeList {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let n = r.int()?;
        self.edges = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            self.edges.push(EdgeUse {
                curve: EntityRef::Seq(r.pointer()?),
                start_list: EntityRef::Seq(r.pointer()?),
                start_index: r.int()?,
                end_list: EntityRef::Seq(r.pointer()?),
                end_index: r.int()?,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        for e in &mut self.edges {
            e.curve.resolve(index)?;
            e.start_list.resolve(index)?;
            e.end_list.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        for e in &self.edges {
            push_resolved(&mut out, &e.curve);
            push_resolved(&mut out, &e.start_list);
            push_resolved(&mut out, &e.end_list);
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(1 + 5 * self.edges.len());
        out.push(PdParam::Integer(self.edges.len() as i64));
        for e in &self.edges {
            out.push(PdParam::Integer(e.curve.out_seq(map)? as i64));
            out.push(PdParam::Integer(e.start_list.out_seq(map)? as i64));
            out.push(PdParam::Integer(e.start_index));
            out.push(PdParam::Integer(e.end_list.out_seq(map)? as i64));
            out.push(PdParam::Integer(e.end_index));
        }
        Ok(out)
    }
}

/// One traversal step of a Loop: an edge (or vertex) use with orientation
/// and optional parameter-space curves
#[derive(Debug, Clone)]
pub struct LoopEdge {
    /// 0 = edge use, 1 = vertex use
    pub is_vertex: bool,
    pub element: EntityRef,
    /// 1-based index into the referenced list entity
    pub index: i64,
    pub forward: bool,
    /// (isoparametric flag, curve) pairs in parameter space
    pub pcurves: Vec<(bool, EntityRef)>,
}

/// Entity 508
#[derive(Debug, Clone, Default)]
pub struct LoopEntity {
    pub edges: Vec<LoopEdge>,
}

impl ParamData for LoopEntity {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let n = r.int()?;
        self.edges = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            let is_vertex = r.int_or(0)? != 0;
            let element = EntityRef::Seq(r.pointer()?);
            let index = r.int()?;
            let forward = r.int_or(1)? != 0;
            let k = r.int_or(0)?;
            let mut pcurves = Vec::with_capacity(k.max(0) as usize);
            for _ in 0..k {
                let isop = r.int_or(0)? != 0;
                pcurves.push((isop, EntityRef::Seq(r.pointer()?)));
            }
            self.edges.push(LoopEdge {
                is_vertex,
                element,
                index,
                forward,
                pcurves,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        for e in &mut self.edges {
            e.element.resolve(index)?;
            for (_, c) in &mut e.pcurves {
                c.resolve(index)?;
            }
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        for e in &self.edges {
            push_resolved(&mut out, &e.element);
            for (_, c) in &e.pcurves {
                push_resolved(&mut out, c);
            }
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::new();
        out.push(PdParam::Integer(self.edges.len() as i64));
        for e in &self.edges {
            out.push(PdParam::Integer(e.is_vertex as i64));
            out.push(PdParam::Integer(e.element.out_seq(map)? as i64));
            out.push(PdParam::Integer(e.index));
            out.push(PdParam::Integer(e.forward as i64));
            out.push(PdParam::Integer(e.pcurves.len() as i64));
            for (isop, c) in &e.pcurves {
                out.push(PdParam::Integer(*isop as i64));
                out.push(PdParam::Integer(c.out_seq(map)? as i64));
            }
        }
        Ok(out)
    }
}

/// Entity 510: a surface region bounded by loops; the first loop may be
/// the outer boundary
#[derive(Debug, Clone, Default)]
pub struct Face {
    pub surface: Option<EntityRef>,
    pub has_outer: bool,
    pub loops: Vec<EntityRef>,
}

impl ParamData for Face {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.surface = Some(EntityRef::Seq(r.pointer()?));
        let n = r.int()?;
        self.has_outer = r.int_or(0)? != 0;
        self.loops = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            self.loops.push(EntityRef::Seq(r.pointer()?));
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        if let Some(s) = &mut self.surface {
            s.resolve(index)?;
        }
        for l in &mut self.loops {
            l.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        if let Some(s) = &self.surface {
            push_resolved(&mut out, s);
        }
        for l in &self.loops {
            push_resolved(&mut out, l);
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(3 + self.loops.len());
        out.push(match &self.surface {
            Some(s) => PdParam::Integer(s.out_seq(map)? as i64),
            None => PdParam::Integer(0),
        });
        out.push(PdParam::Integer(self.loops.len() as i64));
        out.push(PdParam::Integer(self.has_outer as i64));
        for l in &self.loops {
            out.push(PdParam::Integer(l.out_seq(map)? as i64));
        }
        Ok(out)
    }
}

/// Entity 514 form 1: a closed shell of oriented faces
#[derive(Debug, Clone, Default)]
pub struct Shell {
    pub faces: Vec<(EntityRef, bool)>,
}

impl ParamData for Shell {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let n = r.int()?;
        self.faces = Vec::with_capacity(n.max(0) as usize);
        for _ in 0..n {
            let f = EntityRef::Seq(r.pointer()?);
            let of = r.int_or(1)? != 0;
            self.faces.push((f, of));
        }
        Ok(())
    }

    fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        for (f, _) in &mut self.faces {
            f.resolve(index)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<(EntityKey, ChildRole)> {
        let mut out = Vec::new();
        for (f, _) in &self.faces {
            push_resolved(&mut out, f);
        }
        out
    }

    fn format(&self, map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(1 + 2 * self.faces.len());
        out.push(PdParam::Integer(self.faces.len() as i64));
        for (f, of) in &self.faces {
            out.push(PdParam::Integer(f.out_seq(map)? as i64));
            out.push(PdParam::Integer(*of as i64));
        }
        Ok(out)
    }
}
