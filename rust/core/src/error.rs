// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the entity-graph model and record grammar.

use thiserror::Error;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, editing, or writing a model.
#[derive(Error, Debug)]
pub enum Error {
    /// A pointer-integer did not match any Directory Entry sequence number.
    #[error("unresolved reference: no entity with DE sequence {0}")]
    UnresolvedReference(u32),

    /// A reference edge or transform chain would form a cycle.
    #[error("cyclic dependency: {0}")]
    CyclicDependency(String),

    /// The load path met a type code with no registered factory.
    #[error("unsupported entity type {0}")]
    UnsupportedEntity(i32),

    /// A key did not resolve to a live entity in the model arena.
    #[error("entity not found in model")]
    EntityNotFound,

    /// A record could not be parsed.
    #[error("malformed record: {0}")]
    Parse(String),

    /// Parameter data did not match the entity's expected layout.
    #[error("bad parameter data: {0}")]
    BadParameterData(String),

    /// An operation was invoked in the wrong model state.
    #[error("invalid model state: {0}")]
    State(String),

    /// Per-entity failures collected across a load or associate pass;
    /// each item carries the entity's DE sequence number and a message.
    #[error("{} entities failed to load or associate", .0.len())]
    Compound(Vec<(u32, String)>),

    /// Underlying record stream failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
