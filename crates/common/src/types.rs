use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

entity_id!(
    /// Identity of a rigid body. Stable for the lifetime of the body, never written to documents.
    BodyId
);
entity_id!(
    /// Identity of a fixture attached to a body.
    FixtureId
);
entity_id!(
    /// Identity of a joint.
    JointId
);
entity_id!(
    /// Identity of an image overlay.
    ImageId
);

/// The kinds of entity metadata can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    World,
    Body,
    Fixture,
    Joint,
    Image,
}

/// A reference to any entity of a scene.
///
/// There is exactly one world per scene, so the world carries no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRef {
    World,
    Body(BodyId),
    Fixture(FixtureId),
    Joint(JointId),
    Image(ImageId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::World => EntityKind::World,
            Self::Body(_) => EntityKind::Body,
            Self::Fixture(_) => EntityKind::Fixture,
            Self::Joint(_) => EntityKind::Joint,
            Self::Image(_) => EntityKind::Image,
        }
    }

    pub fn as_body(&self) -> Option<BodyId> {
        match self {
            Self::Body(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_fixture(&self) -> Option<FixtureId> {
        match self {
            Self::Fixture(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_joint(&self) -> Option<JointId> {
        match self {
            Self::Joint(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<ImageId> {
        match self {
            Self::Image(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<BodyId> for EntityRef {
    fn from(id: BodyId) -> Self {
        Self::Body(id)
    }
}

impl From<FixtureId> for EntityRef {
    fn from(id: FixtureId) -> Self {
        Self::Fixture(id)
    }
}

impl From<JointId> for EntityRef {
    fn from(id: JointId) -> Self {
        Self::Joint(id)
    }
}

impl From<ImageId> for EntityRef {
    fn from(id: ImageId) -> Self {
        Self::Image(id)
    }
}

/// An 8-bit-per-channel RGBA color, stored as integers the way documents carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color4 {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Color4 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [i32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(c: [i32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}
