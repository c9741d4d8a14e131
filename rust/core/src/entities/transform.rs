// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity 124: Transformation Matrix.
//!
//! The PD carries a 3×4 block (rotation rows R11..R33 interleaved with the
//! translation T1..T3); the implicit last row is (0, 0, 0, 1). Transforms
//! chain through the entity's own DE transform field, and the effective
//! matrix of a chain is composed parent-first by the model.

use super::ParamData;
use crate::entity::SeqMap;
use crate::error::Result;
use crate::record::{PdParam, PdReader};
use nalgebra::{Matrix4, Point3};

#[derive(Debug, Clone)]
pub struct TransformMatrix {
    pub matrix: Matrix4<f64>,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

impl TransformMatrix {
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&nalgebra::Vector3::new(tx, ty, tz)),
        }
    }

    /// Apply this matrix alone (not the chain) to a point
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(p)
    }
}

impl ParamData for TransformMatrix {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        let mut m = Matrix4::identity();
        for row in 0..3 {
            for col in 0..3 {
                m[(row, col)] = r.real()?;
            }
            m[(row, 3)] = r.real()?;
        }
        self.matrix = m;
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = Vec::with_capacity(12);
        for row in 0..3 {
            for col in 0..3 {
                out.push(PdParam::Real(self.matrix[(row, col)]));
            }
            out.push(PdParam::Real(self.matrix[(row, 3)]));
        }
        Ok(out)
    }

    fn rescale(&mut self, sf: f64) {
        // only the translation is a length
        self.matrix[(0, 3)] *= sf;
        self.matrix[(1, 3)] *= sf;
        self.matrix[(2, 3)] *= sf;
    }
}
