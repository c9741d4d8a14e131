// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IGES-Lite Geometry
//!
//! Planar segment/outline kernel for composing closed board outlines from
//! lines, arcs, and circles, applying boolean add/subtract between them,
//! and extruding the result into IGES trimmed-surface solids emitted
//! through [iges-lite-core](../iges_lite_core/index.html).

pub mod error;
pub mod outline;
pub mod segment;
pub mod solid;

pub use error::{Error, Result};
pub use outline::{Orientation, Outline, OutlineState};
pub use segment::{points_match, IntersectFlag, Segment, SegmentKind, EPSILON, RADIAL_TOLERANCE};
pub use solid::extrude_outline;
