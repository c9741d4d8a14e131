// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of a closed outline into IGES trimmed-surface solids.
//!
//! Each line segment becomes a planar wall patch; arcs and circles become
//! cylindrical patches, at most a quarter turn each so a full circle is a
//! four-patch parameterization. The top and bottom are trimmed planar
//! patches whose outer boundary is the outline and whose inner boundaries
//! are its holes. Every face is an E144 over an E128 surface, bounded by
//! an E142 that carries both a parameter-space composite (E126 curves)
//! and a model-space composite (E110 lines, E100 arcs, E126 where a
//! reversed arc cannot be expressed as an E100).

use crate::error::{Error, Result};
use crate::outline::{Orientation, Outline, OutlineState};
use crate::segment::{Segment, SegmentKind};
use iges_lite_core::entities::surface::{CURVE_CREATION_PROJECTION, CURVE_PREF_EITHER};
use iges_lite_core::entities::{
    CircularArc, CompositeCurve, CurveOnSurface, Line, NurbsCurve, NurbsSurface, TrimmedSurface,
};
use iges_lite_core::{Dependency, EntityKey, EntityRef, Model, Payload};
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::PI;

/// Extrude a closed outline between two z heights, emitting the side,
/// top, and bottom trimmed surfaces into the model. Returns the keys of
/// the E144 faces.
pub fn extrude_outline(
    outline: &Outline,
    top_z: f64,
    bot_z: f64,
    model: &mut Model,
) -> Result<Vec<EntityKey>> {
    if outline.state() == OutlineState::Open {
        return Err(Error::NotClosed("extrusion requires a closed outline".to_string()));
    }

    if (top_z - bot_z).abs() < 1e-6 {
        return Err(Error::InvalidExtrusion(
            "top and bottom heights coincide".to_string(),
        ));
    }

    let (top, bot) = if top_z > bot_z {
        (top_z, bot_z)
    } else {
        (bot_z, top_z)
    };

    let mut faces = Vec::new();

    // side walls: outer boundary walks CCW, hole walls CW so the surface
    // normals face away from the material
    for seg in outline.oriented_segments(Orientation::Ccw) {
        faces.extend(emit_walls(model, &seg, top, bot)?);
    }

    for hole in outline.holes() {
        for seg in hole.oriented_segments(Orientation::Cw) {
            faces.extend(emit_walls(model, &seg, top, bot)?);
        }
    }

    faces.push(emit_cap(model, outline, top)?);
    faces.push(emit_cap(model, outline, bot)?);

    Ok(faces)
}

// ============================================================================
// Vertical walls
// ============================================================================

/// Traversal angle span of an arc or circle segment
fn traversal_span(seg: &Segment) -> (f64, f64) {
    if seg.is_cw() {
        (seg.end_angle(), seg.start_angle())
    } else {
        (seg.start_angle(), seg.end_angle())
    }
}

/// Split a traversal span into monotone pieces of at most a quarter turn
fn quarter_spans(from: f64, to: f64) -> Vec<(f64, f64)> {
    let span = to - from;
    let n = ((span.abs() / (0.5 * PI)).ceil() as usize).max(1);
    let step = span / n as f64;

    (0..n)
        .map(|i| (from + step * i as f64, from + step * (i + 1) as f64))
        .collect()
}

fn emit_walls(model: &mut Model, seg: &Segment, top: f64, bot: f64) -> Result<Vec<EntityKey>> {
    match seg.kind() {
        SegmentKind::Line => {
            let face = emit_planar_wall(model, &seg.start(), &seg.end(), top, bot)?;
            Ok(vec![face])
        }
        SegmentKind::Arc | SegmentKind::Circle => {
            let (from, to) = traversal_span(seg);
            let c = seg.center();
            let r = seg.radius();

            let mut out = Vec::new();
            for (a0, a1) in quarter_spans(from, to) {
                out.push(emit_cylinder_patch(model, &c, r, a0, a1, top, bot)?);
            }
            Ok(out)
        }
    }
}

/// A planar wall: bilinear patch with u along the edge and v bottom-to-top
fn emit_planar_wall(
    model: &mut Model,
    start: &Point3<f64>,
    end: &Point3<f64>,
    top: f64,
    bot: f64,
) -> Result<EntityKey> {
    let surface = bilinear_patch(
        model,
        [
            Point3::new(start.x, start.y, bot),
            Point3::new(end.x, end.y, bot),
            Point3::new(start.x, start.y, top),
            Point3::new(end.x, end.y, top),
        ],
    );

    // model-space boundary: bottom edge, up, top edge reversed, down
    let model_curves = vec![
        line_entity(model, Point3::new(start.x, start.y, bot), Point3::new(end.x, end.y, bot)),
        line_entity(model, Point3::new(end.x, end.y, bot), Point3::new(end.x, end.y, top)),
        line_entity(model, Point3::new(end.x, end.y, top), Point3::new(start.x, start.y, top)),
        line_entity(model, Point3::new(start.x, start.y, top), Point3::new(start.x, start.y, bot)),
    ];

    let pcurves = unit_square_pcurves(model);

    emit_face(model, surface, pcurves, model_curves, Vec::new())
}

/// A cylindrical patch over at most a quarter turn, traversed from `a0`
/// to `a1` (either direction) with v bottom-to-top.
fn emit_cylinder_patch(
    model: &mut Model,
    center: &Point3<f64>,
    radius: f64,
    a0: f64,
    a1: f64,
    top: f64,
    bot: f64,
) -> Result<EntityKey> {
    let w = ((a1 - a0) * 0.5).cos();
    let mid = 0.5 * (a0 + a1);

    let at = |a: f64, r: f64, z: f64| {
        Point3::new(center.x + r * a.cos(), center.y + r * a.sin(), z)
    };

    // exact rational quadratic arc extruded linearly in v
    let surface = NurbsSurface {
        upper_index_u: 2,
        upper_index_v: 1,
        degree_u: 2,
        degree_v: 1,
        knots_u: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        knots_v: vec![0.0, 0.0, 1.0, 1.0],
        weights: vec![1.0, w, 1.0, 1.0, w, 1.0],
        control_points: vec![
            at(a0, radius, bot),
            at(mid, radius / w, bot),
            at(a1, radius, bot),
            at(a0, radius, top),
            at(mid, radius / w, top),
            at(a1, radius, top),
        ],
        u0: 0.0,
        u1: 1.0,
        v0: 0.0,
        v1: 1.0,
        ..NurbsSurface::default()
    };
    let surface = model.add_entity(Payload::NurbsSurface(surface));

    let model_curves = vec![
        arc_curve_entity(model, center, radius, a0, a1, bot),
        line_entity(model, at(a1, radius, bot), at(a1, radius, top)),
        arc_curve_entity(model, center, radius, a1, a0, top),
        line_entity(model, at(a0, radius, top), at(a0, radius, bot)),
    ];

    let pcurves = unit_square_pcurves(model);

    emit_face(model, surface, pcurves, model_curves, Vec::new())
}

// ============================================================================
// Top and bottom caps
// ============================================================================

/// A trimmed planar face at height z bounded by the outline and its holes
fn emit_cap(model: &mut Model, outline: &Outline, z: f64) -> Result<EntityKey> {
    let (tl, br) = outline.bounds()?;

    // a square patch keeps the model-to-parameter map isotropic, so arcs
    // stay circular in parameter space
    let side = (br.x - tl.x).max(tl.y - br.y);
    let origin = Point2::new(tl.x, br.y);

    let surface = bilinear_patch(
        model,
        [
            Point3::new(origin.x, origin.y, z),
            Point3::new(origin.x + side, origin.y, z),
            Point3::new(origin.x, origin.y + side, z),
            Point3::new(origin.x + side, origin.y + side, z),
        ],
    );

    let outer_segs = outline.oriented_segments(Orientation::Ccw);
    let outer = emit_boundary(model, surface, &outer_segs, z, &origin, side)?;

    let mut inner = Vec::new();
    for hole in outline.holes() {
        let hole_segs = hole.oriented_segments(Orientation::Cw);
        inner.push(emit_boundary(model, surface, &hole_segs, z, &origin, side)?);
    }

    let ts = TrimmedSurface {
        surface: Some(EntityRef::Key(surface)),
        has_outer: true,
        outer: Some(EntityRef::Key(outer)),
        inner: inner.iter().map(|k| EntityRef::Key(*k)).collect(),
    };
    let face = model.add_entity(Payload::TrimmedSurface(ts));

    model.add_reference(face, surface, Dependency::None)?;
    model.add_reference(face, outer, Dependency::Physical)?;
    for k in inner {
        model.add_reference(face, k, Dependency::Physical)?;
    }

    Ok(face)
}

/// One boundary loop of a cap: an E142 carrying the chain in both spaces
fn emit_boundary(
    model: &mut Model,
    surface: EntityKey,
    segs: &[Segment],
    z: f64,
    origin: &Point2<f64>,
    side: f64,
) -> Result<EntityKey> {
    let mut model_curves = Vec::new();
    let mut pcurves = Vec::new();

    for seg in segs {
        chain_model_curves(model, seg, z, &mut model_curves);
        chain_pcurves(model, seg, origin, side, &mut pcurves);
    }

    let b = composite(model, pcurves)?;
    let c = composite(model, model_curves)?;

    curve_on_surface(model, surface, b, c)
}

/// Model-space curve entities for one traversed segment
fn chain_model_curves(model: &mut Model, seg: &Segment, z: f64, out: &mut Vec<EntityKey>) {
    match seg.kind() {
        SegmentKind::Line => {
            let s = seg.start();
            let e = seg.end();
            out.push(line_entity(
                model,
                Point3::new(s.x, s.y, z),
                Point3::new(e.x, e.y, z),
            ));
        }
        SegmentKind::Arc if !seg.is_cw() => {
            // a CCW arc maps directly onto an E100
            let arc = CircularArc {
                z,
                center: Point2::new(seg.center().x, seg.center().y),
                start: Point2::new(seg.start().x, seg.start().y),
                end: Point2::new(seg.end().x, seg.end().y),
            };
            out.push(model.add_entity(Payload::CircularArc(arc)));
        }
        _ => {
            // CW arcs and circles render as rational quadratic pieces
            let (from, to) = traversal_span(seg);
            for (a0, a1) in quarter_spans(from, to) {
                out.push(arc_curve_entity(model, &seg.center(), seg.radius(), a0, a1, z));
            }
        }
    }
}

/// Parameter-space E126 curves for one traversed segment under the
/// isotropic cap map `(x, y) -> ((x - ox)/side, (y - oy)/side)`.
fn chain_pcurves(
    model: &mut Model,
    seg: &Segment,
    origin: &Point2<f64>,
    side: f64,
    out: &mut Vec<EntityKey>,
) {
    let map = |p: Point3<f64>| {
        Point3::new((p.x - origin.x) / side, (p.y - origin.y) / side, 0.0)
    };

    match seg.kind() {
        SegmentKind::Line => {
            out.push(nurbs_line_entity(model, map(seg.start()), map(seg.end())));
        }
        _ => {
            let c = map(seg.center());
            let r = seg.radius() / side;
            let (from, to) = traversal_span(seg);
            for (a0, a1) in quarter_spans(from, to) {
                out.push(nurbs_arc_entity(model, &c, r, a0, a1));
            }
        }
    }
}

// ============================================================================
// Entity builders
// ============================================================================

/// A bilinear E128 patch from its four corners (u-fastest order)
fn bilinear_patch(model: &mut Model, corners: [Point3<f64>; 4]) -> EntityKey {
    let s = NurbsSurface {
        upper_index_u: 1,
        upper_index_v: 1,
        degree_u: 1,
        degree_v: 1,
        knots_u: vec![0.0, 0.0, 1.0, 1.0],
        knots_v: vec![0.0, 0.0, 1.0, 1.0],
        weights: vec![1.0; 4],
        control_points: corners.to_vec(),
        u0: 0.0,
        u1: 1.0,
        v0: 0.0,
        v1: 1.0,
        ..NurbsSurface::default()
    };
    model.add_entity(Payload::NurbsSurface(s))
}

fn line_entity(model: &mut Model, start: Point3<f64>, end: Point3<f64>) -> EntityKey {
    model.add_entity(Payload::Line(Line { start, end }))
}

/// Degree-1 E126 between two points (used for parameter-space edges)
fn nurbs_line_entity(model: &mut Model, start: Point3<f64>, end: Point3<f64>) -> EntityKey {
    let c = NurbsCurve {
        upper_index: 1,
        degree: 1,
        planar: true,
        polynomial: true,
        knots: vec![0.0, 0.0, 1.0, 1.0],
        weights: vec![1.0, 1.0],
        control_points: vec![start, end],
        v0: 0.0,
        v1: 1.0,
        normal: Vector3::z(),
        ..NurbsCurve::default()
    };
    model.add_entity(Payload::NurbsCurve(c))
}

/// Exact rational quadratic E126 over at most a quarter turn, traversed
/// from `a0` to `a1` in either direction.
fn nurbs_arc_entity(
    model: &mut Model,
    center: &Point3<f64>,
    radius: f64,
    a0: f64,
    a1: f64,
) -> EntityKey {
    let w = ((a1 - a0) * 0.5).cos();
    let mid = 0.5 * (a0 + a1);

    let at = |a: f64, r: f64| Point3::new(center.x + r * a.cos(), center.y + r * a.sin(), center.z);

    let c = NurbsCurve {
        upper_index: 2,
        degree: 2,
        planar: true,
        polynomial: false,
        knots: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        weights: vec![1.0, w, 1.0],
        control_points: vec![at(a0, radius), at(mid, radius / w), at(a1, radius)],
        v0: 0.0,
        v1: 1.0,
        normal: Vector3::z(),
        ..NurbsCurve::default()
    };
    model.add_entity(Payload::NurbsCurve(c))
}

/// An E126 arc at model height z
fn arc_curve_entity(
    model: &mut Model,
    center: &Point3<f64>,
    radius: f64,
    a0: f64,
    a1: f64,
    z: f64,
) -> EntityKey {
    let c = Point3::new(center.x, center.y, z);
    nurbs_arc_entity(model, &c, radius, a0, a1)
}

/// The CCW unit square in parameter space as four E126 lines
fn unit_square_pcurves(model: &mut Model) -> Vec<EntityKey> {
    let p = |x: f64, y: f64| Point3::new(x, y, 0.0);
    vec![
        nurbs_line_entity(model, p(0.0, 0.0), p(1.0, 0.0)),
        nurbs_line_entity(model, p(1.0, 0.0), p(1.0, 1.0)),
        nurbs_line_entity(model, p(1.0, 1.0), p(0.0, 1.0)),
        nurbs_line_entity(model, p(0.0, 1.0), p(0.0, 0.0)),
    ]
}

/// An E102 over authored members, registered as physically dependent
fn composite(model: &mut Model, members: Vec<EntityKey>) -> Result<EntityKey> {
    let cc = CompositeCurve {
        curves: members.iter().map(|k| EntityRef::Key(*k)).collect(),
    };
    let key = model.add_entity(Payload::CompositeCurve(cc));

    for m in members {
        model.add_reference(key, m, Dependency::Physical)?;
    }
    Ok(key)
}

/// An E142 tying a parameter-space and a model-space composite to a surface
fn curve_on_surface(
    model: &mut Model,
    surface: EntityKey,
    b_curve: EntityKey,
    model_curve: EntityKey,
) -> Result<EntityKey> {
    let cos = CurveOnSurface {
        creation: CURVE_CREATION_PROJECTION,
        surface: Some(EntityRef::Key(surface)),
        b_curve: Some(EntityRef::Key(b_curve)),
        model_curve: Some(EntityRef::Key(model_curve)),
        preference: CURVE_PREF_EITHER,
    };
    let key = model.add_entity(Payload::CurveOnSurface(cos));

    model.add_reference(key, surface, Dependency::None)?;
    model.add_reference(key, b_curve, Dependency::Physical)?;
    model.add_reference(key, model_curve, Dependency::Physical)?;
    Ok(key)
}

/// An E144 over a surface with one outer boundary loop
fn emit_face(
    model: &mut Model,
    surface: EntityKey,
    pcurves: Vec<EntityKey>,
    model_curves: Vec<EntityKey>,
    inner: Vec<EntityKey>,
) -> Result<EntityKey> {
    let b = composite(model, pcurves)?;
    let c = composite(model, model_curves)?;
    let boundary = curve_on_surface(model, surface, b, c)?;

    let ts = TrimmedSurface {
        surface: Some(EntityRef::Key(surface)),
        has_outer: true,
        outer: Some(EntityRef::Key(boundary)),
        inner: inner.iter().map(|k| EntityRef::Key(*k)).collect(),
    };
    let face = model.add_entity(Payload::TrimmedSurface(ts));

    model.add_reference(face, surface, Dependency::None)?;
    model.add_reference(face, boundary, Dependency::Physical)?;
    for k in inner {
        model.add_reference(face, k, Dependency::Physical)?;
    }

    Ok(face)
}
