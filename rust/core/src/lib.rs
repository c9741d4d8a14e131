// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IGES-Lite Core
//!
//! Entity-graph model and record grammar for IGES (ANSI/US PRO/IPO-100)
//! files.
//!
//! ## Overview
//!
//! - **Record model**: structured Directory Entry and Parameter Data
//!   records, status flags, and the pointer/value DE field split
//! - **Entity graph**: arena-owned entities with parent/child reference
//!   tracking, dependency classes, and transform chains
//! - **Two-phase load**: entities are created from DE/PD records, then an
//!   idempotent associate pass resolves pointer-integers into keys
//! - **Write-out**: children-first DE sequencing with PD line accounting
//! - **File grammar**: the 80-column five-section reader and writer,
//!   built with [nom](https://docs.rs/nom) for the free-format parameters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use iges_lite_core::Model;
//!
//! let mut model = Model::new();
//! model.read(&std::fs::read_to_string("board.igs")?)?;
//!
//! for key in model.entities_by_type(144) {
//!     println!("trimmed surface: {:?}", key);
//! }
//!
//! let text = model.write()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization support for the record types

pub mod entities;
pub mod entity;
pub mod error;
pub mod global;
pub mod model;
pub mod parser;
pub mod record;
pub mod writer;

pub use entities::Payload;
pub use entity::{AddRef, ChildRole, DeAttr, Dependency, Entity, EntityKey, EntityRef, SeqMap};
pub use error::{Error, Result};
pub use global::{GlobalData, Units};
pub use model::{EntityFactory, Model};
pub use record::{
    BlankStatus, DeField, DirectoryEntry, EntityUse, Hierarchy, ParameterData, PdParam, PdReader,
    RecordSet, StatusFlags, Subordinate,
};
pub use parser::read_string;
pub use writer::write_string;
