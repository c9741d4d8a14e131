// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The model container: arena ownership of all entities, the type-code
//! factory registry, the two-phase load, reference tracking, transform
//! composition, rescaling, and write-out sequencing.
//!
//! All cross-entity references are arena keys; the model is the only
//! owner. Deleting an entity unlinks it from every parent and child, and
//! physically dependent children left without a parent are deleted with
//! it. The entity graph is kept acyclic by checking every prospective
//! edge at insertion time.

use crate::entities::Payload;
use crate::entity::{
    AddRef, ChildRole, Dependency, Entity, EntityKey, EntityRef, SeqIndex, SeqMap,
};
use crate::error::{Error, Result};
use crate::global::{GlobalData, Units};
use crate::record::{DirectoryEntry, ParameterData, RecordSet};
use nalgebra::{Matrix4, Point3};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

/// Constructor registered per entity type code
pub type EntityFactory = fn(entity_type: i32, form: i32) -> Option<Payload>;

/// The IGES model: root container owning every entity
pub struct Model {
    entities: SlotMap<EntityKey, Entity>,
    factories: FxHashMap<i32, EntityFactory>,
    seq_index: SeqIndex,
    pub global: GlobalData,
    /// Free-text start-section lines carried through load/write
    pub start_text: Vec<String>,
}

/// Type codes the default factory covers
const DEFAULT_TYPES: [i32; 16] = [
    100, 102, 104, 110, 124, 126, 128, 142, 144, 186, 314, 502, 504, 508, 510, 514,
];

impl Model {
    /// An empty model with the default factories registered
    pub fn new() -> Self {
        let mut factories: FxHashMap<i32, EntityFactory> = FxHashMap::default();
        for code in DEFAULT_TYPES {
            factories.insert(code, Payload::from_type);
        }

        Self {
            entities: SlotMap::with_key(),
            factories,
            seq_index: SeqIndex::default(),
            global: GlobalData::default(),
            start_text: Vec::new(),
        }
    }

    /// Register (or replace) the constructor for a type code
    pub fn register_factory(&mut self, entity_type: i32, factory: EntityFactory) {
        self.factories.insert(entity_type, factory);
    }

    /// Set the commonly-edited global header fields
    pub fn set_globals(&mut self, units: Units, min_resolution: f64, author: &str) {
        self.global.units = units;
        self.global.min_resolution = min_resolution;
        self.global.author = author.to_string();
    }

    // --- Entity lifecycle ---

    /// Create a bare entity through the factory registry
    pub fn create_entity(&mut self, entity_type: i32, form: i32) -> Result<EntityKey> {
        let payload = self
            .factories
            .get(&entity_type)
            .and_then(|f| f(entity_type, form))
            .ok_or(Error::UnsupportedEntity(entity_type))?;

        Ok(self.entities.insert(Entity::new(payload, form)))
    }

    /// Insert an authored payload directly
    pub fn add_entity(&mut self, payload: Payload) -> EntityKey {
        self.entities.insert(Entity::new(payload, 0))
    }

    pub fn entity(&self, key: EntityKey) -> Result<&Entity> {
        self.entities.get(key).ok_or(Error::EntityNotFound)
    }

    pub fn entity_mut(&mut self, key: EntityKey) -> Result<&mut Entity> {
        self.entities.get_mut(key).ok_or(Error::EntityNotFound)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Keys of all entities with the given type code
    pub fn entities_by_type(&self, entity_type: i32) -> Vec<EntityKey> {
        self.entities
            .iter()
            .filter(|(_, e)| e.entity_type == entity_type)
            .map(|(k, _)| k)
            .collect()
    }

    /// Destroy an entity. It is unlinked from every parent's child list and
    /// every child's parent set; physically dependent children that lose
    /// their last parent are destroyed with it.
    pub fn delete_entity(&mut self, key: EntityKey) -> Result<()> {
        if !self.entities.contains_key(key) {
            return Err(Error::EntityNotFound);
        }

        let mut stack = vec![key];

        while let Some(k) = stack.pop() {
            let Some(ent) = self.entities.remove(k) else {
                continue;
            };

            if ent.sequence != 0 {
                self.seq_index.remove(&ent.sequence);
            }

            // a dying child unlinks itself from each parent
            for (p, _) in ent.parents.iter() {
                if let Some(pe) = self.entities.get_mut(*p) {
                    pe.children.retain(|c| *c != k);
                }
            }

            for c in ent.children {
                if let Some(ce) = self.entities.get_mut(c) {
                    ce.parents.remove(&k);
                    if ce.parents.is_empty() && ce.status.subordinate.is_physical() {
                        stack.push(c);
                    }
                }
            }
        }

        Ok(())
    }

    // --- Reference tracking ---

    /// Register a parent→child edge. Returns [`AddRef::Duplicate`] without
    /// touching the child list when the edge already exists; the edge's
    /// dependency class upgrades the child's subordinate status.
    pub fn add_reference(
        &mut self,
        parent: EntityKey,
        child: EntityKey,
        dep: Dependency,
    ) -> Result<AddRef> {
        if parent == child {
            return Err(Error::CyclicDependency(
                "entity cannot reference itself".to_string(),
            ));
        }

        if !self.entities.contains_key(parent) || !self.entities.contains_key(child) {
            return Err(Error::EntityNotFound);
        }

        // the graph is a DAG: walking up from the prospective parent must
        // never reach the child
        let mut stack = vec![parent];
        let mut seen = FxHashSet::default();

        while let Some(k) = stack.pop() {
            if k == child {
                return Err(Error::CyclicDependency(
                    "reference would close a cycle".to_string(),
                ));
            }
            if !seen.insert(k) {
                continue;
            }
            if let Some(e) = self.entities.get(k) {
                stack.extend(e.parents.keys().copied());
            }
        }

        let child_ent = self.entities.get_mut(child).ok_or(Error::EntityNotFound)?;

        if child_ent.parents.contains_key(&parent) {
            return Ok(AddRef::Duplicate);
        }
        child_ent.parents.insert(parent, dep);

        match dep {
            Dependency::Physical => {
                child_ent.status.subordinate = child_ent.status.subordinate.with_physical();
            }
            Dependency::Logical => {
                child_ent.status.subordinate = child_ent.status.subordinate.with_logical();
            }
            Dependency::None => {}
        }

        let parent_ent = self.entities.get_mut(parent).ok_or(Error::EntityNotFound)?;
        parent_ent.children.push(child);

        Ok(AddRef::Added)
    }

    /// Remove a parent→child edge. A physically dependent child left
    /// without parents is destroyed.
    pub fn del_reference(&mut self, parent: EntityKey, child: EntityKey) -> Result<()> {
        let parent_ent = self.entities.get_mut(parent).ok_or(Error::EntityNotFound)?;
        parent_ent.children.retain(|c| *c != child);

        let child_ent = self.entities.get_mut(child).ok_or(Error::EntityNotFound)?;
        child_ent.parents.remove(&parent);

        if child_ent.parents.is_empty() && child_ent.status.subordinate.is_physical() {
            self.delete_entity(child)?;
        }

        Ok(())
    }

    // --- Transforms ---

    /// Attach a transformation-matrix entity, rejecting chains that would
    /// cycle back through this entity.
    pub fn set_transform(&mut self, entity: EntityKey, transform: EntityKey) -> Result<()> {
        {
            let t = self.entity(transform)?;
            if !matches!(t.payload, Payload::TransformMatrix(_)) {
                return Err(Error::State(format!(
                    "entity type {} is not a transformation matrix",
                    t.entity_type
                )));
            }
        }

        // walk the prospective chain to its root
        let mut cur = Some(transform);
        let mut seen = FxHashSet::default();

        while let Some(k) = cur {
            if k == entity {
                return Err(Error::CyclicDependency(
                    "transform chain would cycle".to_string(),
                ));
            }
            if !seen.insert(k) {
                return Err(Error::CyclicDependency(
                    "transform chain already cycles".to_string(),
                ));
            }
            cur = self
                .entity(k)?
                .transform
                .entity_ref()
                .and_then(|r| r.key().ok());
        }

        self.entity_mut(entity)?.transform = crate::entity::DeAttr::Ref(EntityRef::Key(transform));
        self.add_reference(entity, transform, Dependency::None)?;
        Ok(())
    }

    /// The composed transform of an entity: the root of its transform
    /// chain applied first, its own matrix last.
    pub fn effective_transform(&self, entity: EntityKey) -> Result<Matrix4<f64>> {
        let e = self.entity(entity)?;

        let mut chain = Vec::new();
        let mut cur = match &e.payload {
            // a transform entity's own matrix participates in its chain
            Payload::TransformMatrix(_) => Some(entity),
            _ => e.transform.entity_ref().and_then(|r| r.key().ok()),
        };

        let mut seen = FxHashSet::default();
        while let Some(k) = cur {
            if !seen.insert(k) {
                return Err(Error::CyclicDependency("transform chain cycles".to_string()));
            }
            let te = self.entity(k)?;
            match &te.payload {
                Payload::TransformMatrix(t) => chain.push(t.matrix),
                _ => {
                    return Err(Error::State(
                        "transform chain references a non-transform entity".to_string(),
                    ))
                }
            }
            cur = te.transform.entity_ref().and_then(|r| r.key().ok());
        }

        let mut acc = Matrix4::identity();
        for m in chain.iter().rev() {
            acc = acc * m;
        }
        Ok(acc)
    }

    /// Apply the entity's effective transform to a point
    pub fn transform_point(&self, entity: EntityKey, p: &Point3<f64>) -> Result<Point3<f64>> {
        Ok(self.effective_transform(entity)?.transform_point(p))
    }

    // --- Two-phase load ---

    /// Phase 1 and 2 of the load path: create an entity per DE record,
    /// populate it from its PD block, then associate. Per-entity failures
    /// are collected into one compound error instead of aborting.
    pub fn load_from_records(
        &mut self,
        directory: &[DirectoryEntry],
        parameters: &[ParameterData],
    ) -> Result<()> {
        let mut failures: Vec<(u32, String)> = Vec::new();

        let pd_map: FxHashMap<u32, &ParameterData> =
            parameters.iter().map(|p| (p.de_sequence, p)).collect();

        for de in directory {
            let payload = match self
                .factories
                .get(&de.entity_type)
                .and_then(|f| f(de.entity_type, de.form))
            {
                Some(p) => p,
                None => {
                    failures.push((
                        de.sequence,
                        Error::UnsupportedEntity(de.entity_type).to_string(),
                    ));
                    continue;
                }
            };

            let mut ent = Entity::new(payload, de.form);
            ent.read_de(de);

            match pd_map.get(&de.sequence) {
                Some(pd) => {
                    if let Err(e) = ent.read_pd(pd) {
                        failures.push((de.sequence, e.to_string()));
                        continue;
                    }
                }
                None => {
                    failures.push((de.sequence, "missing parameter data".to_string()));
                    continue;
                }
            }

            let key = self.entities.insert(ent);
            self.seq_index.insert(de.sequence, key);
        }

        failures.extend(self.run_associate());

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Compound(failures))
        }
    }

    /// Run (or re-run) the associate pass; idempotent.
    pub fn associate_all(&mut self) -> Result<()> {
        let failures = self.run_associate();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Compound(failures))
        }
    }

    fn run_associate(&mut self) -> Vec<(u32, String)> {
        let keys: Vec<EntityKey> = self.entities.keys().collect();
        let mut failures = Vec::new();

        for k in keys {
            let mut in_progress = FxHashSet::default();
            if let Err(e) = self.associate_entity(k, &mut in_progress) {
                let seq = self.entities.get(k).map(|e| e.sequence).unwrap_or(0);
                failures.push((seq, e.to_string()));
            }
        }

        failures
    }

    /// Resolve one entity's pointer-integers into keys and register its
    /// reference edges. Children are associated first, recursively, so an
    /// entity may safely be reached before its dependencies.
    fn associate_entity(
        &mut self,
        key: EntityKey,
        in_progress: &mut FxHashSet<EntityKey>,
    ) -> Result<()> {
        if self.entity(key)?.associated {
            return Ok(());
        }

        if !in_progress.insert(key) {
            return Err(Error::CyclicDependency(
                "entity references form a cycle".to_string(),
            ));
        }

        {
            let Model {
                entities,
                seq_index,
                ..
            } = self;
            let e = entities.get_mut(key).ok_or(Error::EntityNotFound)?;

            for r in e.de_refs_mut() {
                r.resolve(seq_index)?;
            }
            e.payload.resolve(seq_index)?;
        }

        let payload_links = self.entity(key)?.payload.children();
        let de_children = self.entity(key)?.de_children();

        for (child, _) in &payload_links {
            self.associate_entity(*child, in_progress)?;
        }
        for child in &de_children {
            self.associate_entity(*child, in_progress)?;
        }

        for (child, role) in payload_links {
            let dep = self.dependency_for(role, child);
            self.add_reference(key, child, dep)?;
        }
        for child in de_children {
            self.add_reference(key, child, Dependency::None)?;
        }

        self.entity_mut(key)?.associated = true;
        in_progress.remove(&key);
        Ok(())
    }

    /// Map a payload child role to the edge's dependency class
    /// (IGES 2.2.4.5.2): composite-curve members are physically dependent,
    /// and a composite curve in the B-pointer slot of a curve-on-surface
    /// inherits that dependency.
    fn dependency_for(&self, role: ChildRole, child: EntityKey) -> Dependency {
        match role {
            ChildRole::Member => Dependency::Physical,
            ChildRole::BCurve => match self.entities.get(child) {
                Some(e) if e.entity_type == 102 => Dependency::Physical,
                _ => Dependency::None,
            },
            ChildRole::Plain => Dependency::None,
        }
    }

    // --- Rescaling ---

    /// Apply a model-wide scale factor to every entity's embedded lengths.
    /// Must run after association: the parameter-space curve under a
    /// curve-on-surface B-pointer is suppressed, which requires parent
    /// sets to be populated.
    pub fn rescale(&mut self, sf: f64) -> Result<()> {
        if self.entities.values().any(|e| !e.associated) {
            return Err(Error::State(
                "rescale requires the associate pass to have completed".to_string(),
            ));
        }

        let keys: Vec<EntityKey> = self.entities.keys().collect();

        for k in keys {
            let mut seen = FxHashSet::default();
            if self.rescale_suppressed(k, &mut seen) {
                continue;
            }
            if let Some(e) = self.entities.get_mut(k) {
                e.payload.rescale(sf);
            }
        }

        Ok(())
    }

    /// True if the entity is parameter-space data under an E142 B-pointer,
    /// directly or through a composite curve in that position.
    fn rescale_suppressed(&self, key: EntityKey, seen: &mut FxHashSet<EntityKey>) -> bool {
        if !seen.insert(key) {
            return false;
        }

        let Some(e) = self.entities.get(key) else {
            return false;
        };

        for (p, _) in e.parents.iter() {
            let Some(pe) = self.entities.get(*p) else {
                continue;
            };

            match &pe.payload {
                Payload::CurveOnSurface(c) if c.b_curve_key() == Some(key) => return true,
                Payload::CompositeCurve(_) if self.rescale_suppressed(*p, seen) => return true,
                _ => {}
            }
        }

        false
    }

    // --- Write-out ---

    /// Topological order with every child before any parent
    fn topological_order(&self) -> Result<Vec<EntityKey>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            model: &Model,
            key: EntityKey,
            marks: &mut FxHashMap<EntityKey, Mark>,
            order: &mut Vec<EntityKey>,
        ) -> Result<()> {
            match marks.get(&key) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(Error::CyclicDependency(
                        "entity graph cycles during write".to_string(),
                    ))
                }
                None => {}
            }

            marks.insert(key, Mark::InProgress);

            let children: Vec<EntityKey> = model.entity(key)?.children.clone();
            for c in children {
                visit(model, c, marks, order)?;
            }

            marks.insert(key, Mark::Done);
            order.push(key);
            Ok(())
        }

        let mut marks = FxHashMap::default();
        let mut order = Vec::with_capacity(self.entities.len());

        for key in self.entities.keys() {
            visit(self, key, &mut marks, &mut order)?;
        }

        Ok(order)
    }

    /// Produce the structured records for the whole model: DE sequence
    /// numbers assigned children-first, each entity's PD formatted and
    /// its line count advancing the PD sequence cursor.
    pub fn write_to_records(&self) -> Result<RecordSet> {
        let order = self.topological_order()?;

        let mut map = SeqMap::default();
        for (i, k) in order.iter().enumerate() {
            map.insert(*k, (2 * i + 1) as u32);
        }

        let mut directory = Vec::with_capacity(order.len());
        let mut parameters = Vec::with_capacity(order.len());
        let mut pd_line = 1u32;

        for k in order {
            let e = self.entity(k)?;

            let params = e.payload.format(&map)?;
            let pd = ParameterData {
                entity_type: e.entity_type,
                params,
                de_sequence: map[&k],
            };

            let mut de = e.format_de(&map)?;
            de.sequence = map[&k];
            de.pd_pointer = pd_line;
            de.pd_count =
                crate::writer::pd_line_count(&pd, self.global.param_delim, self.global.record_delim)
                    as u32;
            pd_line += de.pd_count;

            directory.push(de);
            parameters.push(pd);
        }

        Ok(RecordSet {
            start: self.start_text.clone(),
            global: self.global.clone(),
            directory,
            parameters,
        })
    }

    /// Parse an IGES file and load it into this model
    pub fn read(&mut self, text: &str) -> Result<()> {
        let rs = crate::parser::read_string(text)?;
        self.global = rs.global;
        self.start_text = rs.start;
        self.load_from_records(&rs.directory, &rs.parameters)
    }

    /// Render the whole model as IGES file text
    pub fn write(&self) -> Result<String> {
        let rs = self.write_to_records()?;
        Ok(crate::writer::write_string(&rs))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::curve::Line;
    use crate::entities::transform::TransformMatrix;
    use crate::entities::CompositeCurve;
    use nalgebra::Vector3;

    fn line_payload(x0: f64, x1: f64) -> Payload {
        Payload::Line(Line {
            start: Point3::new(x0, 0.0, 0.0),
            end: Point3::new(x1, 0.0, 0.0),
        })
    }

    #[test]
    fn create_and_delete() {
        let mut m = Model::new();
        let k = m.create_entity(110, 0).unwrap();

        assert!(m.contains(k));
        assert_eq!(m.entities_by_type(110), vec![k]);

        m.delete_entity(k).unwrap();
        assert!(!m.contains(k));
        assert!(matches!(m.entity(k), Err(Error::EntityNotFound)));
    }

    #[test]
    fn unregistered_type_is_unsupported() {
        let mut m = Model::new();
        assert!(matches!(
            m.create_entity(999, 0),
            Err(Error::UnsupportedEntity(999))
        ));
    }

    #[test]
    fn reference_edges_are_symmetric() {
        let mut m = Model::new();
        let parent = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));
        let child = m.add_entity(line_payload(0.0, 1.0));

        assert_eq!(
            m.add_reference(parent, child, Dependency::None).unwrap(),
            AddRef::Added
        );
        assert!(m.entity(parent).unwrap().children().contains(&child));
        assert!(m.entity(child).unwrap().has_parent(parent));

        // the duplicate edge is reported and the child list stays clean
        assert_eq!(
            m.add_reference(parent, child, Dependency::None).unwrap(),
            AddRef::Duplicate
        );
        assert_eq!(m.entity(parent).unwrap().children().len(), 1);

        m.del_reference(parent, child).unwrap();
        assert!(m.entity(parent).unwrap().children().is_empty());
        assert!(!m.entity(child).unwrap().has_parent(parent));
    }

    #[test]
    fn cyclic_reference_rejected() {
        let mut m = Model::new();
        let a = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));
        let b = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));
        let c = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));

        m.add_reference(a, b, Dependency::None).unwrap();
        m.add_reference(b, c, Dependency::None).unwrap();

        assert!(matches!(
            m.add_reference(c, a, Dependency::None),
            Err(Error::CyclicDependency(_))
        ));
        assert!(matches!(
            m.add_reference(a, a, Dependency::None),
            Err(Error::CyclicDependency(_))
        ));
    }

    #[test]
    fn physical_orphan_is_deleted() {
        let mut m = Model::new();
        let parent = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));
        let child = m.add_entity(line_payload(0.0, 1.0));

        m.add_reference(parent, child, Dependency::Physical).unwrap();
        assert!(m
            .entity(child)
            .unwrap()
            .status
            .subordinate
            .is_physical());

        m.del_reference(parent, child).unwrap();
        assert!(!m.contains(child));
    }

    #[test]
    fn delete_cascades_to_dependents() {
        let mut m = Model::new();
        let parent = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));
        let shared = m.add_entity(line_payload(0.0, 1.0));
        let second = m.add_entity(Payload::CompositeCurve(CompositeCurve::default()));

        m.add_reference(parent, shared, Dependency::Physical).unwrap();
        m.add_reference(second, shared, Dependency::Physical).unwrap();

        // the shared child survives the first parent's destruction
        m.delete_entity(parent).unwrap();
        assert!(m.contains(shared));
        assert!(!m.entity(shared).unwrap().has_parent(parent));

        // losing the last parent destroys it
        m.delete_entity(second).unwrap();
        assert!(!m.contains(shared));
    }

    #[test]
    fn transform_composition_is_parent_first() {
        let mut m = Model::new();

        let t_parent = m.add_entity(Payload::TransformMatrix(TransformMatrix::translation(
            10.0, 0.0, 0.0,
        )));
        let t_child = m.add_entity(Payload::TransformMatrix(TransformMatrix::from_matrix(
            Matrix4::new_rotation(Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2)),
        )));
        let line = m.add_entity(line_payload(0.0, 1.0));

        m.set_transform(t_child, t_parent).unwrap();
        m.set_transform(line, t_child).unwrap();

        // rotate first, then translate
        let p = m.transform_point(line, &Point3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn transform_cycle_rejected() {
        let mut m = Model::new();
        let t1 = m.add_entity(Payload::TransformMatrix(TransformMatrix::default()));
        let t2 = m.add_entity(Payload::TransformMatrix(TransformMatrix::default()));

        m.set_transform(t1, t2).unwrap();
        assert!(matches!(
            m.set_transform(t2, t1),
            Err(Error::CyclicDependency(_))
        ));
    }

    #[test]
    fn set_transform_requires_matrix_entity() {
        let mut m = Model::new();
        let line = m.add_entity(line_payload(0.0, 1.0));
        let other = m.add_entity(line_payload(1.0, 2.0));

        assert!(matches!(m.set_transform(line, other), Err(Error::State(_))));
    }

    #[test]
    fn write_orders_children_first() {
        let mut m = Model::new();
        let parent = m.add_entity(Payload::CompositeCurve(CompositeCurve {
            curves: Vec::new(),
        }));
        let child = m.add_entity(line_payload(0.0, 1.0));

        m.add_reference(parent, child, Dependency::Physical).unwrap();
        if let Payload::CompositeCurve(cc) = &mut m.entity_mut(parent).unwrap().payload {
            cc.curves.push(EntityRef::Key(child));
        }

        let rs = m.write_to_records().unwrap();
        assert_eq!(rs.directory.len(), 2);

        let seq_of = |ty: i32| {
            rs.directory
                .iter()
                .find(|d| d.entity_type == ty)
                .map(|d| d.sequence)
                .unwrap()
        };
        assert!(seq_of(110) < seq_of(102));

        // the composite's PD points at the child's new sequence number
        let cc_pd = rs.parameters.iter().find(|p| p.entity_type == 102).unwrap();
        assert_eq!(cc_pd.params[1].as_int().unwrap() as u32, seq_of(110));
    }
}
