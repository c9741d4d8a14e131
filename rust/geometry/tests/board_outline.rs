// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Board-outline scenarios: boolean composition of a rectangular board
//! with holes and notches, extruded to a full IGES model.

use iges_lite_core::Model;
use iges_lite_geometry::{
    extrude_outline, Error, Orientation, Outline, Segment,
};
use nalgebra::Point3;

fn pt(x: f64, y: f64) -> Point3<f64> {
    Point3::new(x, y, 0.0)
}

fn board(w: f64, h: f64) -> Outline {
    Outline::from_segments(vec![
        Segment::line(pt(0.0, 0.0), pt(w, 0.0)).unwrap(),
        Segment::line(pt(w, 0.0), pt(w, h)).unwrap(),
        Segment::line(pt(w, h), pt(0.0, h)).unwrap(),
        Segment::line(pt(0.0, h), pt(0.0, 0.0)).unwrap(),
    ])
    .unwrap()
}

#[test]
fn board_minus_drill_hole_extrudes() {
    let mut outline = board(100.0, 50.0);
    assert_eq!(outline.orientation(), Orientation::Ccw);

    // fully-enclosed circle becomes a nested hole
    let changed = outline.subtract_circle(pt(50.0, 25.0), 10.0).unwrap();
    assert!(changed);
    assert_eq!(outline.holes().len(), 1);
    assert!(!outline.is_point_inside(&pt(50.0, 25.0)));

    let mut model = Model::new();
    let faces = extrude_outline(&outline, 1.6, 0.0, &mut model).unwrap();

    // 4 board walls, 4 hole-wall patches, top and bottom
    assert_eq!(faces.len(), 10);

    let text = model.write().unwrap();
    assert!(text.lines().all(|l| l.len() == 80));

    // all five sections are present
    for letter in ['S', 'G', 'D', 'P', 'T'] {
        assert!(
            text.lines().any(|l| l.as_bytes()[72] as char == letter),
            "missing section {}",
            letter
        );
    }

    // the file re-reads as a consistent model
    let mut reloaded = Model::new();
    reloaded.read(&text).unwrap();
    assert_eq!(reloaded.entities_by_type(144).len(), 10);
    assert_eq!(reloaded.entities_by_type(128).len(), 10);
    // one boundary per wall, two per cap (outer plus drill hole)
    assert_eq!(reloaded.entities_by_type(142).len(), 12);

    // trimmed surfaces reference boundaries with lower DE sequences
    let rs = reloaded.write_to_records().unwrap();
    for d in &rs.directory {
        if d.entity_type == 144 {
            let pd = rs
                .parameters
                .iter()
                .find(|p| p.de_sequence == d.sequence)
                .unwrap();
            let surface = pd.params[0].as_int().unwrap() as u32;
            let outer = pd.params[3].as_int().unwrap() as u32;
            assert!(surface < d.sequence);
            assert!(outer < d.sequence);
        }
    }
}

#[test]
fn bump_on_edge_is_edge_overlap() {
    // semicircle whose chord lies exactly along the board's top edge
    let mut outline = board(100.0, 50.0);

    let arc = Segment::arc(pt(50.0, 50.0), pt(40.0, 50.0), pt(60.0, 50.0), true).unwrap();
    let chord = Segment::line(pt(60.0, 50.0), pt(40.0, 50.0)).unwrap();
    let bump = Outline::from_segments(vec![arc, chord]).unwrap();

    assert!(matches!(
        outline.subtract(&bump),
        Err(Error::InvalidIntersection(_))
    ));
}

#[test]
fn sunken_bump_subtracts_through_edge() {
    // the same semicircle five units lower crosses the top edge at two
    // interior points and carves a notch
    let mut outline = board(100.0, 50.0);
    let area_before = outline.signed_area();

    let arc = Segment::arc(pt(50.0, 45.0), pt(40.0, 45.0), pt(60.0, 45.0), true).unwrap();
    let chord = Segment::line(pt(60.0, 45.0), pt(40.0, 45.0)).unwrap();
    let bump = Outline::from_segments(vec![arc, chord]).unwrap();

    assert!(outline.subtract(&bump).unwrap());
    assert!(outline.signed_area() < area_before);
    assert_eq!(outline.orientation(), Orientation::Ccw);

    assert!(!outline.is_point_inside(&pt(50.0, 49.0)));
    assert!(outline.is_point_inside(&pt(50.0, 40.0)));

    // the notched outline still extrudes and writes
    let mut model = Model::new();
    let faces = extrude_outline(&outline, 1.6, 0.0, &mut model).unwrap();
    assert!(faces.len() > 6);

    let text = model.write().unwrap();
    assert!(text.lines().all(|l| l.len() == 80));
}

#[test]
fn interior_sample_and_outside_points() {
    let mut outline = board(80.0, 40.0);
    outline.subtract_circle(pt(40.0, 20.0), 5.0).unwrap();

    let sample = outline.interior_sample().unwrap();
    assert!(outline.is_point_inside(&sample));

    let (tl, br) = outline.bounds().unwrap();
    for p in [
        pt(tl.x - 1.0, 20.0),
        pt(br.x + 1.0, 20.0),
        pt(40.0, tl.y + 1.0),
        pt(40.0, br.y - 1.0),
    ] {
        assert!(!outline.is_point_inside(&p));
    }
}

#[test]
fn mounting_slot_composition() {
    // a slot: subtract a circle overlapping the left edge, then a second
    // circle fully inside; the outline stays well-formed throughout
    let mut outline = board(100.0, 50.0);

    assert!(outline.subtract_circle(pt(0.0, 25.0), 6.0).unwrap());
    assert!(outline.subtract_circle(pt(70.0, 25.0), 4.0).unwrap());

    assert_eq!(outline.holes().len(), 1);
    assert!(!outline.is_point_inside(&pt(3.0, 25.0)));
    assert!(!outline.is_point_inside(&pt(70.0, 25.0)));
    assert!(outline.is_point_inside(&pt(30.0, 25.0)));

    let segs = outline.segments();
    for i in 0..segs.len() {
        let next = &segs[(i + 1) % segs.len()];
        assert!(iges_lite_geometry::points_match(
            &segs[i].end(),
            &next.start(),
            1e-6
        ));
    }
}

#[test]
fn finalized_outline_is_read_only() {
    let mut outline = board(10.0, 10.0);
    outline.finalize().unwrap();

    assert!(outline.subtract_circle(pt(5.0, 5.0), 1.0).is_err());

    // but it still serves as a boolean operand and extrudes
    let mut base = board(30.0, 30.0);
    let hole = {
        let mut o = Outline::from_circle(pt(15.0, 15.0), 3.0).unwrap();
        o.finalize().unwrap();
        o
    };
    assert!(base.subtract(&hole).unwrap());

    let mut model = Model::new();
    extrude_outline(&base, 1.0, 0.0, &mut model).unwrap();
    assert!(!model.write().unwrap().is_empty());
}
