use scenejson_common::{BodyId, EntityRef, ImageId, JointId};
use scenejson_meta::{NameRegistry, PropertyStore};
use scenejson_model::{Body, Image, Joint, PhysicsWorld, WorldSummary};

/// Everything one document describes: the physics world plus the editor
/// metadata attached to its entities.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub world: PhysicsWorld,
    pub properties: PropertyStore,
    pub names: NameRegistry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene around an existing world, with no metadata.
    pub fn from_world(world: PhysicsWorld) -> Self {
        Self {
            world,
            ..Default::default()
        }
    }

    /// Back to an empty scene with default world settings.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary::of(&self.world)
    }

    /// Remove a body with its fixtures and every joint the world cascades
    /// to, dropping their names and properties too.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let joints = self.joint_ids();
        let body = self.world.remove_body(id)?;
        for fixture in &body.fixtures {
            self.forget(fixture.id);
        }
        self.forget(id);
        self.forget_removed_joints(joints);
        Some(body)
    }

    /// Remove a joint and any gears coupling it, with their metadata.
    pub fn remove_joint(&mut self, id: JointId) -> Option<Joint> {
        let joints = self.joint_ids();
        let joint = self.world.remove_joint(id)?;
        self.forget_removed_joints(joints);
        Some(joint)
    }

    pub fn remove_image(&mut self, id: ImageId) -> Option<Image> {
        let image = self.world.remove_image(id)?;
        self.forget(id);
        Some(image)
    }

    fn joint_ids(&self) -> Vec<JointId> {
        self.world.joints().iter().map(|j| j.id).collect()
    }

    fn forget_removed_joints(&mut self, before: Vec<JointId>) {
        for joint in before {
            if self.world.joint(joint).is_none() {
                self.forget(joint);
            }
        }
    }

    fn forget(&mut self, entity: impl Into<EntityRef>) {
        let entity = entity.into();
        self.names.remove_entity(entity);
        self.properties.remove_entity(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use scenejson_model::{Fixture, GearJoint, JointKind, RevoluteJoint, Shape};

    #[test]
    fn reset_drops_entities_metadata_and_settings() {
        let mut scene = Scene::from_world(PhysicsWorld::with_gravity(Vec2::ZERO));
        let body = scene.world.add_body(Body::default());
        scene.names.set_name(body, "box");
        scene.properties.set(body, "hp", 1i32);

        scene.reset();
        assert_eq!(scene.world.body_count(), 0);
        assert_eq!(scene.world.gravity, Vec2::new(0.0, -10.0));
        assert!(scene.names.is_empty());
        assert!(scene.properties.is_empty());
        assert_eq!(scene.summary().bodies(), 0);
    }

    #[test]
    fn removing_a_body_drops_cascaded_metadata() {
        let mut scene = Scene::new();
        let a = scene.world.add_body(Body::default());
        let mut wheel = Body::default();
        let rim = wheel.add_fixture(Fixture::new(Shape::circle(Vec2::ZERO, 0.5)));
        let b = scene.world.add_body(wheel);
        let c = scene.world.add_body(Body::default());
        let hinge = |x, y| Joint::new(x, y, JointKind::Revolute(RevoluteJoint::default()));
        let axle = scene.world.add_joint(hinge(a, b)).unwrap();
        let other = scene.world.add_joint(hinge(a, c)).unwrap();
        let gear = scene
            .world
            .add_joint(Joint::new(b, c, JointKind::Gear(GearJoint::new(axle, other, 2.0))))
            .unwrap();

        scene.names.set_name(b, "wheel");
        scene.names.set_name(rim, "rim");
        scene.names.set_name(axle, "axle");
        scene.names.set_name(other, "hinge");
        scene.properties.set(gear, "teeth", 12i32);
        scene.properties.set(rim, "grip", 0.9f32);

        assert!(scene.remove_body(b).is_some());
        assert_eq!(scene.world.joint_count(), 1);
        assert!(scene.names.body_by_name("wheel").is_none());
        assert!(scene.names.name(rim).is_none());
        assert!(scene.names.name(axle).is_none());
        assert!(!scene.properties.has::<i32>(gear, "teeth"));
        assert!(!scene.properties.has::<f32>(rim, "grip"));
        assert_eq!(scene.names.name(other), Some("hinge"));

        assert!(scene.remove_joint(other).is_some());
        assert!(scene.names.is_empty());
        assert!(scene.properties.is_empty());
        assert!(scene.remove_body(b).is_none());
    }
}
