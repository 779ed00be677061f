use std::collections::BTreeMap;

use crate::body::BodyType;
use crate::world::PhysicsWorld;

/// Read-only overview of a world, for developer tooling and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub static_bodies: usize,
    pub kinematic_bodies: usize,
    pub dynamic_bodies: usize,
    pub fixtures: usize,
    pub joints_by_type: BTreeMap<&'static str, usize>,
    pub images: usize,
    pub bound_images: usize,
    pub fingerprint: u64,
}

impl WorldSummary {
    pub fn of(world: &PhysicsWorld) -> Self {
        let count = |t: BodyType| world.bodies().iter().filter(|b| b.body_type == t).count();
        let mut joints_by_type = BTreeMap::new();
        for joint in world.joints() {
            *joints_by_type.entry(joint.joint_type().name()).or_insert(0) += 1;
        }
        Self {
            static_bodies: count(BodyType::Static),
            kinematic_bodies: count(BodyType::Kinematic),
            dynamic_bodies: count(BodyType::Dynamic),
            fixtures: world.fixture_count(),
            joints_by_type,
            images: world.image_count(),
            bound_images: world.images().iter().filter(|i| i.body.is_some()).count(),
            fingerprint: world.fingerprint(),
        }
    }

    pub fn bodies(&self) -> usize {
        self.static_bodies + self.kinematic_bodies + self.dynamic_bodies
    }

    pub fn joints(&self) -> usize {
        self.joints_by_type.values().sum()
    }
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bodies={} (static={} kinematic={} dynamic={}) fixtures={} joints={} images={} (bound={}) fingerprint={:#018x}",
            self.bodies(),
            self.static_bodies,
            self.kinematic_bodies,
            self.dynamic_bodies,
            self.fixtures,
            self.joints(),
            self.images,
            self.bound_images,
            self.fingerprint,
        )?;
        for (name, n) in &self.joints_by_type {
            write!(f, "\n  {name}: {n}")?;
        }
        Ok(())
    }
}
