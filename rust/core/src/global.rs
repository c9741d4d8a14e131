// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global-section header: delimiters, product identification, model
//! units, resolution, and authorship fields.

use crate::error::{Error, Result};
use crate::record::{PdParam, PdReader};

/// IGES model units (global parameter 14/15)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Units {
    Inch,
    Millimeter,
    /// Unit named only by parameter 15
    Custom(String),
    Foot,
    Mile,
    Meter,
    Kilometer,
    Mil,
    Micron,
    Centimeter,
    Microinch,
}

impl Units {
    pub fn flag(&self) -> i64 {
        match self {
            Units::Inch => 1,
            Units::Millimeter => 2,
            Units::Custom(_) => 3,
            Units::Foot => 4,
            Units::Mile => 5,
            Units::Meter => 6,
            Units::Kilometer => 7,
            Units::Mil => 8,
            Units::Micron => 9,
            Units::Centimeter => 10,
            Units::Microinch => 11,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Units::Inch => "IN",
            Units::Millimeter => "MM",
            Units::Custom(s) => s,
            Units::Foot => "FT",
            Units::Mile => "MI",
            Units::Meter => "M",
            Units::Kilometer => "KM",
            Units::Mil => "MIL",
            Units::Micron => "UM",
            Units::Centimeter => "CM",
            Units::Microinch => "UIN",
        }
    }

    pub fn from_flag(flag: i64, name: &str) -> Result<Self> {
        Ok(match flag {
            1 => Units::Inch,
            2 => Units::Millimeter,
            3 => Units::Custom(name.to_string()),
            4 => Units::Foot,
            5 => Units::Mile,
            6 => Units::Meter,
            7 => Units::Kilometer,
            8 => Units::Mil,
            9 => Units::Micron,
            10 => Units::Centimeter,
            11 => Units::Microinch,
            v => return Err(Error::Parse(format!("unit flag {}", v))),
        })
    }
}

/// The 26 global parameters, with authoring defaults
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalData {
    pub param_delim: char,
    pub record_delim: char,
    pub product_id_sender: String,
    pub file_name: String,
    pub native_system_id: String,
    pub preprocessor_version: String,
    pub integer_bits: i64,
    pub single_max_power: i64,
    pub single_digits: i64,
    pub double_max_power: i64,
    pub double_digits: i64,
    pub product_id_receiver: String,
    pub model_scale: f64,
    pub units: Units,
    pub line_weight_gradations: i64,
    pub max_line_weight: f64,
    pub creation_date: String,
    pub min_resolution: f64,
    pub max_coordinate: f64,
    pub author: String,
    pub organization: String,
    pub spec_version: i64,
    pub drafting_standard: i64,
    pub modified_date: String,
    pub application_note: String,
}

impl Default for GlobalData {
    fn default() -> Self {
        Self {
            param_delim: ',',
            record_delim: ';',
            product_id_sender: String::new(),
            file_name: String::new(),
            native_system_id: "iges-lite".to_string(),
            preprocessor_version: env!("CARGO_PKG_VERSION").to_string(),
            integer_bits: 32,
            single_max_power: 38,
            single_digits: 6,
            double_max_power: 308,
            double_digits: 15,
            product_id_receiver: String::new(),
            model_scale: 1.0,
            units: Units::Millimeter,
            line_weight_gradations: 1,
            max_line_weight: 0.1,
            creation_date: String::new(),
            min_resolution: 1e-6,
            max_coordinate: 0.0,
            author: String::new(),
            organization: String::new(),
            spec_version: 11,
            drafting_standard: 0,
            modified_date: String::new(),
            application_note: String::new(),
        }
    }
}

impl GlobalData {
    /// Decode from the tokenized global-section parameter list. The two
    /// delimiter parameters must already have steered the tokenizer; they
    /// arrive here as ordinary string parameters.
    pub fn from_params(params: &[PdParam]) -> Result<Self> {
        let mut r = PdReader::new(params);
        let mut g = GlobalData::default();

        let pd = r.text_or(",")?;
        let rd = r.text_or(";")?;
        g.param_delim = pd.chars().next().unwrap_or(',');
        g.record_delim = rd.chars().next().unwrap_or(';');

        g.product_id_sender = r.text_or("")?;
        g.file_name = r.text_or("")?;
        g.native_system_id = r.text_or("")?;
        g.preprocessor_version = r.text_or("")?;
        g.integer_bits = r.int_or(32)?;
        g.single_max_power = r.int_or(38)?;
        g.single_digits = r.int_or(6)?;
        g.double_max_power = r.int_or(308)?;
        g.double_digits = r.int_or(15)?;
        g.product_id_receiver = r.text_or("")?;
        g.model_scale = r.real_or(1.0)?;

        let flag = r.int_or(2)?;
        let name = r.text_or("")?;
        g.units = Units::from_flag(flag, &name)?;

        g.line_weight_gradations = r.int_or(1)?;
        g.max_line_weight = r.real_or(0.1)?;
        g.creation_date = r.text_or("")?;
        g.min_resolution = r.real_or(1e-6)?;
        g.max_coordinate = r.real_or(0.0)?;
        g.author = r.text_or("")?;
        g.organization = r.text_or("")?;
        g.spec_version = r.int_or(11)?;
        g.drafting_standard = r.int_or(0)?;
        g.modified_date = r.text_or("")?;
        g.application_note = r.text_or("")?;

        Ok(g)
    }

    /// Encode to the global-section parameter list
    pub fn to_params(&self) -> Vec<PdParam> {
        vec![
            PdParam::Text(self.param_delim.to_string()),
            PdParam::Text(self.record_delim.to_string()),
            PdParam::Text(self.product_id_sender.clone()),
            PdParam::Text(self.file_name.clone()),
            PdParam::Text(self.native_system_id.clone()),
            PdParam::Text(self.preprocessor_version.clone()),
            PdParam::Integer(self.integer_bits),
            PdParam::Integer(self.single_max_power),
            PdParam::Integer(self.single_digits),
            PdParam::Integer(self.double_max_power),
            PdParam::Integer(self.double_digits),
            PdParam::Text(self.product_id_receiver.clone()),
            PdParam::Real(self.model_scale),
            PdParam::Integer(self.units.flag()),
            PdParam::Text(self.units.name().to_string()),
            PdParam::Integer(self.line_weight_gradations),
            PdParam::Real(self.max_line_weight),
            PdParam::Text(self.creation_date.clone()),
            PdParam::Real(self.min_resolution),
            PdParam::Real(self.max_coordinate),
            PdParam::Text(self.author.clone()),
            PdParam::Text(self.organization.clone()),
            PdParam::Integer(self.spec_version),
            PdParam::Integer(self.drafting_standard),
            PdParam::Text(self.modified_date.clone()),
            PdParam::Text(self.application_note.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let g = GlobalData::default();
        assert_eq!(g.param_delim, ',');
        assert_eq!(g.record_delim, ';');
        assert_eq!(g.units, Units::Millimeter);
        assert_eq!(g.min_resolution, 1e-6);
        assert_eq!(g.spec_version, 11);
    }

    #[test]
    fn round_trip_through_params() {
        let mut g = GlobalData::default();
        g.author = "test author".to_string();
        g.units = Units::Inch;
        g.min_resolution = 1e-5;

        let params = g.to_params();
        let back = GlobalData::from_params(&params).unwrap();

        assert_eq!(back.author, "test author");
        assert_eq!(back.units, Units::Inch);
        assert_eq!(back.min_resolution, 1e-5);
        assert_eq!(back.param_delim, ',');
    }

    #[test]
    fn unit_flags() {
        assert_eq!(Units::Millimeter.flag(), 2);
        assert_eq!(Units::from_flag(8, "").unwrap(), Units::Mil);
        assert_eq!(Units::from_flag(3, "FURLONG").unwrap(), Units::Custom("FURLONG".to_string()));
        assert!(Units::from_flag(12, "").is_err());
    }
}
