use glam::Vec2;
use scenejson_common::{BodyId, FixtureId};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::fixture::Fixture;

/// Simulation class of a body. The integer values are the ones documents carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Static,
    Kinematic,
    Dynamic,
}

impl BodyType {
    pub fn index(self) -> i64 {
        match self {
            Self::Static => 0,
            Self::Kinematic => 1,
            Self::Dynamic => 2,
        }
    }

    pub fn from_index(index: i64) -> Result<Self, ModelError> {
        match index {
            0 => Ok(Self::Static),
            1 => Ok(Self::Kinematic),
            2 => Ok(Self::Dynamic),
            other => Err(ModelError::UnknownBodyType(other)),
        }
    }
}

/// Explicit mass properties. All zero means "derive from fixtures".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MassData {
    pub mass: f32,
    pub center: Vec2,
    pub inertia: f32,
}

/// A rigid body and the fixtures attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub body_type: BodyType,
    pub position: Vec2,
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub bullet: bool,
    pub allow_sleep: bool,
    pub awake: bool,
    pub active: bool,
    pub fixed_rotation: bool,
    pub mass_data: MassData,
    pub fixtures: Vec<Fixture>,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            id: BodyId::new(),
            body_type: BodyType::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            bullet: false,
            allow_sleep: true,
            awake: false,
            active: true,
            fixed_rotation: false,
            mass_data: MassData::default(),
            fixtures: Vec::new(),
        }
    }
}

impl Body {
    /// Create a body of the given type at `position` with every other field at its default.
    pub fn new(body_type: BodyType, position: Vec2) -> Self {
        Self {
            body_type,
            position,
            ..Default::default()
        }
    }

    /// Attach a fixture. Returns its id.
    pub fn add_fixture(&mut self, fixture: Fixture) -> FixtureId {
        let id = fixture.id;
        self.fixtures.push(fixture);
        id
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    /// Transform a point from body-local to world coordinates.
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(local)
    }

    /// Transform a point from world to body-local coordinates.
    pub fn local_point(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle).rotate(world - self.position)
    }
}
