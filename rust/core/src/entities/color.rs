// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity 314: Color Definition.
//!
//! Components are percentages in 0..100. The standard names the three
//! values CC1..CC3 generically; the RGB fields here are canonical and the
//! CC accessors read through to them.

use super::ParamData;
use crate::entity::SeqMap;
use crate::error::Result;
use crate::record::{PdParam, PdReader};

#[derive(Debug, Clone, Default)]
pub struct ColorDef {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub name: Option<String>,
}

impl ColorDef {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            name: None,
        }
    }

    /// First color coordinate (red)
    pub fn cc1(&self) -> f64 {
        self.red
    }

    /// Second color coordinate (green)
    pub fn cc2(&self) -> f64 {
        self.green
    }

    /// Third color coordinate (blue)
    pub fn cc3(&self) -> f64 {
        self.blue
    }
}

impl ParamData for ColorDef {
    fn read_pd(&mut self, r: &mut PdReader) -> Result<()> {
        self.red = r.real_or(0.0)?.clamp(0.0, 100.0);
        self.green = r.real_or(0.0)?.clamp(0.0, 100.0);
        self.blue = r.real_or(0.0)?.clamp(0.0, 100.0);
        self.name = if r.remaining() > 0 {
            let s = r.text_or("")?;
            (!s.is_empty()).then_some(s)
        } else {
            None
        };
        Ok(())
    }

    fn format(&self, _map: &SeqMap) -> Result<Vec<PdParam>> {
        let mut out = vec![
            PdParam::Real(self.red),
            PdParam::Real(self.green),
            PdParam::Real(self.blue),
        ];
        if let Some(name) = &self.name {
            out.push(PdParam::Text(name.clone()));
        }
        Ok(out)
    }
}
