// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The entity node: common Directory Entry attributes, the typed payload,
//! and graph linkage.
//!
//! Entities live in the model's arena under generational [`EntityKey`]s.
//! Every cross-entity reference starts life as a raw DE sequence number
//! ([`EntityRef::Seq`]) and is rewritten to a key during the associate
//! pass. Graph edges are stored twice: an ordered child list on the parent
//! and a parent set (with the edge's dependency class) on the child.

use crate::entities::Payload;
use crate::error::{Error, Result};
use crate::record::{DeField, DirectoryEntry, ParameterData, PdReader, StatusFlags};
use rustc_hash::FxHashMap;
use slotmap::new_key_type;

new_key_type! {
    /// Stable key of an entity in the model arena.
    pub struct EntityKey;
}

/// Map from entity key to assigned DE sequence number, built during
/// write-out.
pub type SeqMap = FxHashMap<EntityKey, u32>;

/// Map from DE sequence number to entity key, built during load.
pub type SeqIndex = FxHashMap<u32, EntityKey>;

/// A reference to another entity: a raw DE sequence number until the
/// associate pass rewrites it to an arena key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Seq(u32),
    Key(EntityKey),
}

impl EntityRef {
    /// The resolved key; fails if the reference was never associated
    pub fn key(&self) -> Result<EntityKey> {
        match self {
            EntityRef::Key(k) => Ok(*k),
            EntityRef::Seq(s) => Err(Error::UnresolvedReference(*s)),
        }
    }

    /// Rewrite a sequence number to its arena key
    pub fn resolve(&mut self, index: &SeqIndex) -> Result<()> {
        if let EntityRef::Seq(s) = self {
            let key = index.get(s).ok_or(Error::UnresolvedReference(*s))?;
            *self = EntityRef::Key(*key);
        }
        Ok(())
    }

    /// The DE sequence number to write, given this run's assignment
    pub fn out_seq(&self, map: &SeqMap) -> Result<u32> {
        match self {
            EntityRef::Key(k) => map
                .get(k)
                .copied()
                .ok_or_else(|| Error::State("reference to entity outside the model".to_string())),
            EntityRef::Seq(s) => Err(Error::UnresolvedReference(*s)),
        }
    }
}

/// Dependency class of a parent→child edge (IGES 2.2.4.5.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dependency {
    #[default]
    None,
    Physical,
    Logical,
}

/// What a payload's child reference means to the graph; the model maps
/// roles to [`Dependency`] values at edge-insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    /// Member of a composite curve: always physically dependent
    Member,
    /// The B-pointer of a curve-on-surface; a composite curve in this
    /// position inherits physical dependency
    BCurve,
    /// Any other reference
    Plain,
}

/// Outcome of `add_reference`: callers must treat `Duplicate` as
/// success-with-noop and must not push the child a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRef {
    Added,
    Duplicate,
}

/// A DE attribute that is either a value code or an entity reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeAttr {
    #[default]
    Default,
    Value(i32),
    Ref(EntityRef),
}

impl DeAttr {
    fn from_field(f: DeField) -> Self {
        match f {
            DeField::Default => DeAttr::Default,
            DeField::Value(v) => DeAttr::Value(v),
            DeField::Pointer(p) => DeAttr::Ref(EntityRef::Seq(p)),
        }
    }

    fn to_field(self, map: &SeqMap) -> Result<DeField> {
        Ok(match self {
            DeAttr::Default => DeField::Default,
            DeAttr::Value(v) => DeField::Value(v),
            DeAttr::Ref(r) => DeField::Pointer(r.out_seq(map)?),
        })
    }

    /// The contained reference, if any
    pub fn entity_ref(&self) -> Option<&EntityRef> {
        match self {
            DeAttr::Ref(r) => Some(r),
            _ => None,
        }
    }
}

/// A node of the entity graph
#[derive(Debug, Clone)]
pub struct Entity {
    pub entity_type: i32,
    pub form: i32,
    pub status: StatusFlags,
    pub line_weight: i32,
    pub label: String,
    pub subscript: i32,

    pub structure: DeAttr,
    pub line_font: DeAttr,
    pub level: DeAttr,
    pub view: DeAttr,
    pub transform: DeAttr,
    pub label_assoc: DeAttr,
    pub color: DeAttr,

    pub payload: Payload,

    /// DE sequence number from the load path; 0 for authored entities
    pub(crate) sequence: u32,
    /// Parent set with the dependency class of each edge
    pub(crate) parents: FxHashMap<EntityKey, Dependency>,
    /// Ordered child list; never contains duplicates
    pub(crate) children: Vec<EntityKey>,
    pub(crate) associated: bool,
}

impl Entity {
    /// A bare entity around a payload; authored entities are born
    /// associated since their references are created as keys.
    pub(crate) fn new(payload: Payload, form: i32) -> Self {
        Self {
            entity_type: payload.entity_type(),
            form,
            status: StatusFlags::default(),
            line_weight: 0,
            label: String::new(),
            subscript: 0,
            structure: DeAttr::Default,
            line_font: DeAttr::Default,
            level: DeAttr::Default,
            view: DeAttr::Default,
            transform: DeAttr::Default,
            label_assoc: DeAttr::Default,
            color: DeAttr::Default,
            payload,
            sequence: 0,
            parents: FxHashMap::default(),
            children: Vec::new(),
            associated: true,
        }
    }

    /// Populate the common attributes from a Directory Entry record.
    /// Pointer fields are retained as sequence numbers until association.
    pub fn read_de(&mut self, de: &DirectoryEntry) {
        self.entity_type = de.entity_type;
        self.form = de.form;
        self.status = de.status;
        self.line_weight = de.line_weight;
        self.label = de.label.clone();
        self.subscript = de.subscript;
        self.structure = DeAttr::from_field(de.structure);
        self.line_font = DeAttr::from_field(de.line_font);
        self.level = DeAttr::from_field(de.level);
        self.view = DeAttr::from_field(de.view);
        self.transform = DeAttr::from_field(de.transform);
        self.label_assoc = DeAttr::from_field(de.label_assoc);
        self.color = DeAttr::from_field(de.color);
        self.sequence = de.sequence;
        self.associated = false;
    }

    /// Parse the type-specific parameter data
    pub fn read_pd(&mut self, pd: &ParameterData) -> Result<()> {
        if pd.entity_type != self.entity_type {
            return Err(Error::BadParameterData(format!(
                "PD type {} does not match DE type {}",
                pd.entity_type, self.entity_type
            )));
        }

        let mut reader = PdReader::new(&pd.params);
        self.payload.read_pd(&mut reader)
    }

    /// Render the common attributes into a Directory Entry record.
    /// `sequence` and the PD pointer/count are filled by the writer pass.
    pub fn format_de(&self, map: &SeqMap) -> Result<DirectoryEntry> {
        Ok(DirectoryEntry {
            entity_type: self.entity_type,
            pd_pointer: 0,
            structure: self.structure.to_field(map)?,
            line_font: self.line_font.to_field(map)?,
            level: self.level.to_field(map)?,
            view: self.view.to_field(map)?,
            transform: self.transform.to_field(map)?,
            label_assoc: self.label_assoc.to_field(map)?,
            status: self.status,
            line_weight: self.line_weight,
            color: self.color.to_field(map)?,
            pd_count: 0,
            form: self.form,
            label: self.label.clone(),
            subscript: self.subscript,
            sequence: 0,
        })
    }

    /// Mutable references held in the common DE attributes
    pub(crate) fn de_refs_mut(&mut self) -> Vec<&mut EntityRef> {
        [
            &mut self.structure,
            &mut self.line_font,
            &mut self.level,
            &mut self.view,
            &mut self.transform,
            &mut self.label_assoc,
            &mut self.color,
        ]
        .into_iter()
        .filter_map(|a| match a {
            DeAttr::Ref(r) => Some(r),
            _ => None,
        })
        .collect()
    }

    /// Resolved child keys referenced from the common DE attributes
    pub(crate) fn de_children(&self) -> Vec<EntityKey> {
        [
            &self.structure,
            &self.line_font,
            &self.level,
            &self.view,
            &self.transform,
            &self.label_assoc,
            &self.color,
        ]
        .into_iter()
        .filter_map(|a| a.entity_ref().and_then(|r| r.key().ok()))
        .collect()
    }

    // --- Graph inspection ---

    pub fn is_associated(&self) -> bool {
        self.associated
    }

    /// The DE sequence number the entity was loaded with (0 if authored)
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }

    pub fn parents(&self) -> impl Iterator<Item = (EntityKey, Dependency)> + '_ {
        self.parents.iter().map(|(k, d)| (*k, *d))
    }

    pub fn has_parent(&self, key: EntityKey) -> bool {
        self.parents.contains_key(&key)
    }

    /// True if no parent references the entity
    pub fn is_orphaned(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::curve::Line;
    use nalgebra::Point3;

    #[test]
    fn authored_entity_is_associated() {
        let line = Line {
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(1.0, 0.0, 0.0),
        };
        let e = Entity::new(Payload::Line(line), 0);

        assert!(e.is_associated());
        assert_eq!(e.entity_type, 110);
        assert_eq!(e.sequence(), 0);
        assert!(e.is_orphaned());
    }

    #[test]
    fn read_de_retains_pointers() {
        let line = Line {
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(1.0, 0.0, 0.0),
        };
        let mut e = Entity::new(Payload::Line(line), 0);

        let de = DirectoryEntry {
            entity_type: 110,
            transform: DeField::Pointer(7),
            color: DeField::Value(3),
            sequence: 11,
            ..DirectoryEntry::default()
        };
        e.read_de(&de);

        assert!(!e.is_associated());
        assert_eq!(e.sequence(), 11);
        assert_eq!(e.transform, DeAttr::Ref(EntityRef::Seq(7)));
        assert_eq!(e.color, DeAttr::Value(3));
    }

    #[test]
    fn unresolved_ref_reports_sequence() {
        let r = EntityRef::Seq(23);
        match r.key() {
            Err(Error::UnresolvedReference(23)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }
}
