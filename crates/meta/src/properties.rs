use glam::Vec2;
use scenejson_common::{Color4, EntityKind, EntityRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Value type of a custom property. Declaration order is the order
/// properties of one entity are iterated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyType {
    Int,
    Float,
    String,
    Vec2,
    Bool,
    Color,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        Self::Int,
        Self::Float,
        Self::String,
        Self::Vec2,
        Self::Bool,
        Self::Color,
    ];

    /// Key naming this type inside a document property entry.
    pub fn key(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Vec2 => "vec2",
            Self::Bool => "bool",
            Self::Color => "color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Int(i32),
    Float(f32),
    String(String),
    Vec2(Vec2),
    Bool(bool),
    Color(Color4),
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Int(_) => PropertyType::Int,
            Self::Float(_) => PropertyType::Float,
            Self::String(_) => PropertyType::String,
            Self::Vec2(_) => PropertyType::Vec2,
            Self::Bool(_) => PropertyType::Bool,
            Self::Color(_) => PropertyType::Color,
        }
    }
}

/// A Rust type that can be stored as a custom property.
pub trait CustomValue: Clone + PartialEq {
    const TYPE: PropertyType;

    fn into_value(self) -> PropertyValue;

    fn from_value(value: &PropertyValue) -> Option<&Self>;
}

macro_rules! custom_value {
    ($ty:ty, $variant:ident) => {
        impl CustomValue for $ty {
            const TYPE: PropertyType = PropertyType::$variant;

            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: &PropertyValue) -> Option<&Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

custom_value!(i32, Int);
custom_value!(f32, Float);
custom_value!(String, String);
custom_value!(Vec2, Vec2);
custom_value!(bool, Bool);
custom_value!(Color4, Color);

/// Properties of one entity, segregated by type then name.
type PropertyBag = BTreeMap<PropertyType, BTreeMap<String, PropertyValue>>;

/// Typed key-value properties attachable to any entity of a scene.
///
/// Each entity kind keeps its own set of entities that have properties, so
/// reverse queries only scan entities of the requested kind.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    bags: BTreeMap<EntityRef, PropertyBag>,
    with_properties: BTreeMap<EntityKind, BTreeSet<EntityRef>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a typed property.
    pub fn set<T: CustomValue>(
        &mut self,
        entity: impl Into<EntityRef>,
        name: impl Into<String>,
        value: T,
    ) {
        self.insert(entity, name, value.into_value());
    }

    /// Upsert a property whose type is carried by the value.
    pub fn insert(
        &mut self,
        entity: impl Into<EntityRef>,
        name: impl Into<String>,
        value: PropertyValue,
    ) {
        let entity: EntityRef = entity.into();
        self.with_properties
            .entry(entity.kind())
            .or_default()
            .insert(entity);
        self.bags
            .entry(entity)
            .or_default()
            .entry(value.property_type())
            .or_default()
            .insert(name.into(), value);
    }

    pub fn has<T: CustomValue>(&self, entity: impl Into<EntityRef>, name: &str) -> bool {
        self.get_ref::<T>(entity, name).is_some()
    }

    /// The property's value, or `default` when it is not set.
    pub fn get<T: CustomValue>(&self, entity: impl Into<EntityRef>, name: &str, default: T) -> T {
        self.get_ref::<T>(entity, name).cloned().unwrap_or(default)
    }

    pub fn get_ref<T: CustomValue>(&self, entity: impl Into<EntityRef>, name: &str) -> Option<&T> {
        self.value(entity, name, T::TYPE).and_then(T::from_value)
    }

    pub fn value(
        &self,
        entity: impl Into<EntityRef>,
        name: &str,
        ty: PropertyType,
    ) -> Option<&PropertyValue> {
        let entity: EntityRef = entity.into();
        self.bags.get(&entity)?.get(&ty)?.get(name)
    }

    /// Remove one typed property. Other types under the same name are kept.
    pub fn remove(
        &mut self,
        entity: impl Into<EntityRef>,
        name: &str,
        ty: PropertyType,
    ) -> Option<PropertyValue> {
        let entity: EntityRef = entity.into();
        let bag = self.bags.get_mut(&entity)?;
        let by_name = bag.get_mut(&ty)?;
        let removed = by_name.remove(name);
        if by_name.is_empty() {
            bag.remove(&ty);
        }
        if bag.is_empty() {
            self.forget(entity);
        }
        removed
    }

    /// Remove every property of an entity.
    pub fn remove_entity(&mut self, entity: impl Into<EntityRef>) {
        self.forget(entity.into());
    }

    fn forget(&mut self, entity: EntityRef) {
        self.bags.remove(&entity);
        if let Some(set) = self.with_properties.get_mut(&entity.kind()) {
            set.remove(&entity);
        }
    }

    /// Every property of an entity as `(name, value)`, grouped by type in
    /// [`PropertyType`] order and sorted by name within a type.
    pub fn properties_of(
        &self,
        entity: impl Into<EntityRef>,
    ) -> impl Iterator<Item = (&str, &PropertyValue)> {
        let entity: EntityRef = entity.into();
        self.bags
            .get(&entity)
            .into_iter()
            .flat_map(|bag| bag.values())
            .flat_map(|by_name| by_name.iter().map(|(n, v)| (n.as_str(), v)))
    }

    /// Entities of `kind` that carry at least one property.
    pub fn entities_with_properties(&self, kind: EntityKind) -> impl Iterator<Item = EntityRef> {
        self.with_properties
            .get(&kind)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// All entities of `kind` whose `T`-typed property `name` equals `value`.
    pub fn query_by_value<T: CustomValue>(
        &self,
        kind: EntityKind,
        name: &str,
        value: &T,
    ) -> Vec<EntityRef> {
        self.entities_with_properties(kind)
            .filter(|e| self.get_ref::<T>(*e, name) == Some(value))
            .collect()
    }

    /// The first entity of `kind` (in id order) matching `query_by_value`.
    pub fn first_by_value<T: CustomValue>(
        &self,
        kind: EntityKind,
        name: &str,
        value: &T,
    ) -> Option<EntityRef> {
        self.entities_with_properties(kind)
            .find(|e| self.get_ref::<T>(*e, name) == Some(value))
    }

    /// Number of entities carrying properties.
    pub fn entity_count(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    pub fn clear(&mut self) {
        self.bags.clear();
        self.with_properties.clear();
    }
}
