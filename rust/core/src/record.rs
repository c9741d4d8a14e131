// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured Directory Entry and Parameter Data records.
//!
//! The model consumes and produces these records; the 80-column file
//! grammar that carries them lives in [`crate::parser`] and
//! [`crate::writer`]. DE sequence numbers are the odd line numbers of the
//! directory section and double as the pointer values other entities use.

use crate::error::{Error, Result};

/// Blank status (DE field 9, digits 1-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlankStatus {
    #[default]
    Visible = 0,
    Blanked = 1,
}

/// Subordinate entity switch (DE field 9, digits 3-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subordinate {
    #[default]
    Independent = 0,
    PhysicallyDependent = 1,
    LogicallyDependent = 2,
    Both = 3,
}

impl Subordinate {
    /// True if the entity cannot exist without a parent
    pub fn is_physical(self) -> bool {
        matches!(self, Subordinate::PhysicallyDependent | Subordinate::Both)
    }

    /// Fold a new dependency relation into the current switch
    pub fn with_physical(self) -> Self {
        match self {
            Subordinate::Independent | Subordinate::PhysicallyDependent => {
                Subordinate::PhysicallyDependent
            }
            Subordinate::LogicallyDependent | Subordinate::Both => Subordinate::Both,
        }
    }

    pub fn with_logical(self) -> Self {
        match self {
            Subordinate::Independent | Subordinate::LogicallyDependent => {
                Subordinate::LogicallyDependent
            }
            Subordinate::PhysicallyDependent | Subordinate::Both => Subordinate::Both,
        }
    }
}

/// Entity use flag (DE field 9, digits 5-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityUse {
    #[default]
    Geometry = 0,
    Annotation = 1,
    Definition = 2,
    Other = 3,
    LogicalPositional = 4,
    Parametric2d = 5,
    ConstructionGeometry = 6,
}

/// Hierarchy flag (DE field 9, digits 7-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hierarchy {
    #[default]
    AllSubordinates = 0,
    NoSubordinates = 1,
    UseProperty = 2,
}

/// The packed 8-digit status field of a Directory Entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags {
    pub blank: BlankStatus,
    pub subordinate: Subordinate,
    pub entity_use: EntityUse,
    pub hierarchy: Hierarchy,
}

impl StatusFlags {
    /// Decode from the packed BBSSUUHH integer
    pub fn from_code(code: i32) -> Result<Self> {
        let digits = |n: i32| (code / n) % 100;

        let blank = match digits(1_000_000) {
            0 => BlankStatus::Visible,
            1 => BlankStatus::Blanked,
            v => return Err(Error::Parse(format!("blank status {}", v))),
        };

        let subordinate = match digits(10_000) {
            0 => Subordinate::Independent,
            1 => Subordinate::PhysicallyDependent,
            2 => Subordinate::LogicallyDependent,
            3 => Subordinate::Both,
            v => return Err(Error::Parse(format!("subordinate switch {}", v))),
        };

        let entity_use = match digits(100) {
            0 => EntityUse::Geometry,
            1 => EntityUse::Annotation,
            2 => EntityUse::Definition,
            3 => EntityUse::Other,
            4 => EntityUse::LogicalPositional,
            5 => EntityUse::Parametric2d,
            6 => EntityUse::ConstructionGeometry,
            v => return Err(Error::Parse(format!("entity use flag {}", v))),
        };

        let hierarchy = match digits(1) {
            0 => Hierarchy::AllSubordinates,
            1 => Hierarchy::NoSubordinates,
            2 => Hierarchy::UseProperty,
            v => return Err(Error::Parse(format!("hierarchy flag {}", v))),
        };

        Ok(Self {
            blank,
            subordinate,
            entity_use,
            hierarchy,
        })
    }

    /// Encode to the packed BBSSUUHH integer
    pub fn to_code(self) -> i32 {
        self.blank as i32 * 1_000_000
            + self.subordinate as i32 * 10_000
            + self.entity_use as i32 * 100
            + self.hierarchy as i32
    }
}

/// A DE field that holds either a small value code (line-font pattern,
/// level number, color index) or a pointer to another Directory Entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeField {
    #[default]
    Default,
    Value(i32),
    Pointer(u32),
}

impl DeField {
    /// Decode a field whose pointer form is negated (structure, line font,
    /// level, color)
    pub fn from_negated(raw: i32) -> Self {
        if raw == 0 {
            DeField::Default
        } else if raw < 0 {
            DeField::Pointer((-raw) as u32)
        } else {
            DeField::Value(raw)
        }
    }

    /// Decode a field that is a plain pointer or zero (view, transform,
    /// label association)
    pub fn from_pointer(raw: i32) -> Self {
        if raw == 0 {
            DeField::Default
        } else {
            DeField::Pointer(raw as u32)
        }
    }

    /// Encode with negated pointers
    pub fn to_negated(self) -> i32 {
        match self {
            DeField::Default => 0,
            DeField::Value(v) => v,
            DeField::Pointer(p) => -(p as i32),
        }
    }

    /// Encode with plain pointers
    pub fn to_pointer(self) -> i32 {
        match self {
            DeField::Default => 0,
            DeField::Value(v) => v,
            DeField::Pointer(p) => p as i32,
        }
    }
}

/// A structured Directory Entry record (one per entity, two file lines)
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryEntry {
    pub entity_type: i32,
    /// Sequence number of the entity's first PD line
    pub pd_pointer: u32,
    pub structure: DeField,
    pub line_font: DeField,
    pub level: DeField,
    pub view: DeField,
    pub transform: DeField,
    pub label_assoc: DeField,
    pub status: StatusFlags,
    pub line_weight: i32,
    pub color: DeField,
    /// Number of PD lines the entity occupies
    pub pd_count: u32,
    pub form: i32,
    pub label: String,
    pub subscript: i32,
    /// This entry's own (odd) DE sequence number
    pub sequence: u32,
}

/// A single free-format parameter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PdParam {
    Integer(i64),
    Real(f64),
    Text(String),
    /// An omitted parameter; entities substitute their default
    Default,
}

impl PdParam {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PdParam::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers coerce to reals; many writers emit whole reals as integers
    pub fn as_real(&self) -> Option<f64> {
        match self {
            PdParam::Real(v) => Some(*v),
            PdParam::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PdParam::Text(s) => Some(s),
            _ => None,
        }
    }

    /// A non-negative integer interpreted as a DE pointer
    pub fn as_pointer(&self) -> Option<u32> {
        match self {
            PdParam::Integer(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PdParam::Default)
    }
}

/// An entity's Parameter Data: its type code echo plus the parameter list
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterData {
    pub entity_type: i32,
    pub params: Vec<PdParam>,
    /// DE sequence number this PD block belongs to
    pub de_sequence: u32,
}

/// A complete file's worth of structured records: what the reader
/// produces and the writer consumes.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Free-text start-section lines
    pub start: Vec<String>,
    pub global: crate::global::GlobalData,
    pub directory: Vec<DirectoryEntry>,
    pub parameters: Vec<ParameterData>,
}

/// Cursor over a parameter list with typed, defaulting accessors
pub struct PdReader<'a> {
    params: &'a [PdParam],
    pos: usize,
}

impl<'a> PdReader<'a> {
    pub fn new(params: &'a [PdParam]) -> Self {
        Self { params, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.params.len().saturating_sub(self.pos)
    }

    fn next(&mut self) -> Option<&'a PdParam> {
        let p = self.params.get(self.pos)?;
        self.pos += 1;
        Some(p)
    }

    pub fn int(&mut self) -> Result<i64> {
        match self.next() {
            Some(p) => p
                .as_int()
                .ok_or_else(|| Error::BadParameterData(format!("expected integer, got {:?}", p))),
            None => Err(Error::BadParameterData("parameter list exhausted".to_string())),
        }
    }

    pub fn int_or(&mut self, default: i64) -> Result<i64> {
        match self.next() {
            Some(PdParam::Default) | None => Ok(default),
            Some(p) => p
                .as_int()
                .ok_or_else(|| Error::BadParameterData(format!("expected integer, got {:?}", p))),
        }
    }

    pub fn real(&mut self) -> Result<f64> {
        match self.next() {
            Some(p) => p
                .as_real()
                .ok_or_else(|| Error::BadParameterData(format!("expected real, got {:?}", p))),
            None => Err(Error::BadParameterData("parameter list exhausted".to_string())),
        }
    }

    pub fn real_or(&mut self, default: f64) -> Result<f64> {
        match self.next() {
            Some(PdParam::Default) | None => Ok(default),
            Some(p) => p
                .as_real()
                .ok_or_else(|| Error::BadParameterData(format!("expected real, got {:?}", p))),
        }
    }

    pub fn pointer(&mut self) -> Result<u32> {
        match self.next() {
            Some(p) => p.as_pointer().ok_or_else(|| {
                Error::BadParameterData(format!("expected DE pointer, got {:?}", p))
            }),
            None => Err(Error::BadParameterData("parameter list exhausted".to_string())),
        }
    }

    pub fn text_or(&mut self, default: &str) -> Result<String> {
        match self.next() {
            Some(PdParam::Default) | None => Ok(default.to_string()),
            Some(p) => p
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| Error::BadParameterData(format!("expected string, got {:?}", p))),
        }
    }
}
