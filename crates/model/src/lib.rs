//! Scene model: the state a 2D rigid-body simulator would operate on.
//!
//! This crate only describes state. There is no integration step and no
//! collision resolution; the codec restores and captures this graph.
//!
//! # Invariants
//! - A world owns its bodies, joints and images in insertion order.
//! - Fixtures are owned by exactly one body.
//! - Joints reference bodies (and gear joints reference joints) by id, and
//!   every referenced id exists in the same world.
//! - Polygons hold 3 to 8 vertices; prismatic and wheel axes are unit length.

pub mod body;
pub mod error;
pub mod fixture;
pub mod image;
pub mod inspector;
pub mod joint;
pub mod world;

pub use body::{Body, BodyType, MassData};
pub use error::ModelError;
pub use fixture::{
    ChainShape, CircleShape, EdgeShape, Filter, Fixture, MAX_POLYGON_VERTICES, PolygonShape,
    Shape,
};
pub use image::{Aabb, Image, ImageFilter};
pub use inspector::WorldSummary;
pub use joint::{
    DistanceJoint, FrictionJoint, GearJoint, Joint, JointKind, JointType, MotorJoint, MouseJoint,
    PrismaticJoint, PulleyJoint, RevoluteJoint, RopeJoint, WeldJoint, WheelJoint, unit_axis,
};
pub use world::PhysicsWorld;
