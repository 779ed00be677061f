use scenejson_common::{BodyId, EntityKind, EntityRef, FixtureId, ImageId, JointId};
use std::collections::BTreeMap;

/// Editor display names and hierarchical paths per entity.
///
/// Pure bookkeeping that round-trips editor metadata. Reverse lookups scan
/// in entity-id order.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: BTreeMap<EntityRef, String>,
    paths: BTreeMap<EntityRef, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, entity: impl Into<EntityRef>, name: impl Into<String>) {
        let entity: EntityRef = entity.into();
        let name = name.into();
        if let Some(old) = self.names.insert(entity, name) {
            tracing::trace!(?entity, %old, "name replaced");
        }
    }

    pub fn set_path(&mut self, entity: impl Into<EntityRef>, path: impl Into<String>) {
        let entity: EntityRef = entity.into();
        let path = path.into();
        if let Some(old) = self.paths.insert(entity, path) {
            tracing::trace!(?entity, %old, "path replaced");
        }
    }

    pub fn name(&self, entity: impl Into<EntityRef>) -> Option<&str> {
        let entity: EntityRef = entity.into();
        self.names.get(&entity).map(String::as_str)
    }

    pub fn path(&self, entity: impl Into<EntityRef>) -> Option<&str> {
        let entity: EntityRef = entity.into();
        self.paths.get(&entity).map(String::as_str)
    }

    /// All entities of `kind` named `name`.
    pub fn by_name(&self, kind: EntityKind, name: &str) -> Vec<EntityRef> {
        matching(&self.names, kind, name).collect()
    }

    pub fn first_by_name(&self, kind: EntityKind, name: &str) -> Option<EntityRef> {
        matching(&self.names, kind, name).next()
    }

    /// All entities of `kind` whose path is `path`.
    pub fn by_path(&self, kind: EntityKind, path: &str) -> Vec<EntityRef> {
        matching(&self.paths, kind, path).collect()
    }

    /// The first entity of `kind` with both the given path and name.
    pub fn by_path_and_name(&self, kind: EntityKind, path: &str, name: &str) -> Option<EntityRef> {
        matching(&self.paths, kind, path).find(|e| self.name(*e) == Some(name))
    }

    pub fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.first_by_name(EntityKind::Body, name)
            .and_then(|e| e.as_body())
    }

    pub fn fixture_by_name(&self, name: &str) -> Option<FixtureId> {
        self.first_by_name(EntityKind::Fixture, name)
            .and_then(|e| e.as_fixture())
    }

    pub fn joint_by_name(&self, name: &str) -> Option<JointId> {
        self.first_by_name(EntityKind::Joint, name)
            .and_then(|e| e.as_joint())
    }

    pub fn image_by_name(&self, name: &str) -> Option<ImageId> {
        self.first_by_name(EntityKind::Image, name)
            .and_then(|e| e.as_image())
    }

    /// Every named entity of `kind`.
    pub fn named(&self, kind: EntityKind) -> impl Iterator<Item = (EntityRef, &str)> {
        self.names
            .iter()
            .filter(move |(e, _)| e.kind() == kind)
            .map(|(e, n)| (*e, n.as_str()))
    }

    pub fn remove_entity(&mut self, entity: impl Into<EntityRef>) {
        let entity: EntityRef = entity.into();
        self.names.remove(&entity);
        self.paths.remove(&entity);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.paths.clear();
    }
}

fn matching<'a>(
    table: &'a BTreeMap<EntityRef, String>,
    kind: EntityKind,
    value: &'a str,
) -> impl Iterator<Item = EntityRef> + 'a {
    table
        .iter()
        .filter(move |(e, v)| e.kind() == kind && v.as_str() == value)
        .map(|(e, _)| *e)
}
