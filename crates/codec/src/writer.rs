//! Scene to document encoding.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use scenejson_common::{BodyId, Color4, EntityRef, JointId};
use scenejson_meta::PropertyValue;
use scenejson_model::{Body, Fixture, Image, Joint, JointKind, Shape};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::float::{
    FloatMode, encode_float, encode_float_array, encode_vec2, encode_vec2_array, is_zero,
};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    pub float_mode: FloatMode,
    /// Indent text output.
    pub pretty: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            float_mode: FloatMode::Compact,
            pretty: true,
        }
    }
}

/// Encodes a [`Scene`] into a document.
///
/// Bodies are referenced by their position in the world's body list.
/// Joints are emitted in two passes, non-gear joints first and gear joints
/// after them, so every index a gear joint carries points backwards.
#[derive(Debug, Clone, Default)]
pub struct WorldWriter {
    options: WriterOptions,
}

impl WorldWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    pub fn human_readable() -> Self {
        Self::new(WriterOptions {
            float_mode: FloatMode::HumanReadable,
            ..Default::default()
        })
    }

    pub fn options(&self) -> WriterOptions {
        self.options
    }

    pub fn write_value(&self, scene: &Scene) -> Value {
        let _span = tracing::info_span!(
            "write_world",
            bodies = scene.world.body_count(),
            joints = scene.world.joint_count(),
            images = scene.world.image_count(),
        )
        .entered();
        Encoder::new(self.options.float_mode, scene).world()
    }

    pub fn write_string(&self, scene: &Scene) -> Result<String, CodecError> {
        let value = self.write_value(scene);
        let text = if self.options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write_file(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CodecError::EmptyPath);
        }
        let text = self.write_string(scene)?;
        std::fs::write(path, text).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "scene written");
        Ok(())
    }
}

/// Per-call encoding state. The index tables live only as long as one
/// `write_value` call.
struct Encoder<'a> {
    mode: FloatMode,
    scene: &'a Scene,
    body_index: HashMap<BodyId, i64>,
    joint_index: HashMap<JointId, i64>,
}

impl<'a> Encoder<'a> {
    fn new(mode: FloatMode, scene: &'a Scene) -> Self {
        let body_index = scene
            .world
            .bodies()
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i as i64))
            .collect();
        Self {
            mode,
            scene,
            body_index,
            joint_index: HashMap::new(),
        }
    }

    fn float(&self, f: f32) -> Value {
        encode_float(f, self.mode)
    }

    fn vec2(&self, v: Vec2) -> Value {
        encode_vec2(v, self.mode)
    }

    fn world(mut self) -> Value {
        let scene = self.scene;
        let world = &scene.world;
        let mut obj = Map::new();
        obj.insert("gravity".into(), self.vec2(world.gravity));
        obj.insert("allowSleep".into(), world.allow_sleep.into());
        obj.insert("autoClearForces".into(), world.auto_clear_forces.into());
        obj.insert("warmStarting".into(), world.warm_starting.into());
        obj.insert("continuousPhysics".into(), world.continuous_physics.into());
        obj.insert("subStepping".into(), world.sub_stepping.into());

        let bodies: Vec<Value> = world.bodies().iter().map(|b| self.body(b)).collect();
        obj.insert("body".into(), Value::Array(bodies));

        let mut joints = Vec::with_capacity(world.joint_count());
        for joint in world.joints().iter().filter(|j| !j.is_gear()) {
            joints.push(self.joint(joint));
        }
        for joint in world.joints().iter().filter(|j| j.is_gear()) {
            joints.push(self.joint(joint));
        }
        obj.insert("joint".into(), Value::Array(joints));

        let images: Vec<Value> = world.images().iter().map(|i| self.image(i)).collect();
        obj.insert("image".into(), Value::Array(images));

        self.custom_properties(&mut obj, EntityRef::World);
        tracing::debug!(
            bodies = world.body_count(),
            joints = world.joint_count(),
            images = world.image_count(),
            "world encoded"
        );
        Value::Object(obj)
    }

    fn name_and_path(&self, obj: &mut Map<String, Value>, entity: EntityRef) {
        if let Some(name) = self.scene.names.name(entity).filter(|n| !n.is_empty()) {
            obj.insert("name".into(), name.into());
        }
        if let Some(path) = self.scene.names.path(entity).filter(|p| !p.is_empty()) {
            obj.insert("path".into(), path.into());
        }
    }

    fn custom_properties(&self, obj: &mut Map<String, Value>, entity: EntityRef) {
        let entries: Vec<Value> = self
            .scene
            .properties
            .properties_of(entity)
            .map(|(name, value)| {
                let mut entry = Map::new();
                entry.insert("name".into(), name.into());
                let encoded = match value {
                    PropertyValue::Int(i) => Value::from(*i),
                    PropertyValue::Float(f) => self.float(*f),
                    PropertyValue::String(s) => Value::from(s.as_str()),
                    PropertyValue::Vec2(v) => self.vec2(*v),
                    PropertyValue::Bool(b) => Value::from(*b),
                    PropertyValue::Color(c) => Value::from(c.to_array().to_vec()),
                };
                entry.insert(value.property_type().key().into(), encoded);
                Value::Object(entry)
            })
            .collect();
        if !entries.is_empty() {
            obj.insert("customProperties".into(), Value::Array(entries));
        }
    }

    fn body(&self, body: &Body) -> Value {
        let mut obj = Map::new();
        self.name_and_path(&mut obj, body.id.into());
        obj.insert("type".into(), body.body_type.index().into());
        obj.insert("position".into(), self.vec2(body.position));
        obj.insert("angle".into(), self.float(body.angle));
        obj.insert("linearVelocity".into(), self.vec2(body.linear_velocity));
        obj.insert("angularVelocity".into(), self.float(body.angular_velocity));
        if !is_zero(body.linear_damping) {
            obj.insert("linearDamping".into(), self.float(body.linear_damping));
        }
        if !is_zero(body.angular_damping) {
            obj.insert("angularDamping".into(), self.float(body.angular_damping));
        }
        if body.gravity_scale.to_bits() != 1.0f32.to_bits() {
            obj.insert("gravityScale".into(), self.float(body.gravity_scale));
        }
        if body.bullet {
            obj.insert("bullet".into(), true.into());
        }
        if !body.allow_sleep {
            obj.insert("allowSleep".into(), false.into());
        }
        if body.awake {
            obj.insert("awake".into(), true.into());
        }
        if !body.active {
            obj.insert("active".into(), false.into());
        }
        if body.fixed_rotation {
            obj.insert("fixedRotation".into(), true.into());
        }
        let mass = &body.mass_data;
        if !is_zero(mass.mass) {
            obj.insert("massData-mass".into(), self.float(mass.mass));
        }
        if !is_zero(mass.center.x) || !is_zero(mass.center.y) {
            obj.insert("massData-center".into(), self.vec2(mass.center));
        }
        if !is_zero(mass.inertia) {
            obj.insert("massData-I".into(), self.float(mass.inertia));
        }

        let fixtures: Vec<Value> = body.fixtures.iter().map(|f| self.fixture(f)).collect();
        obj.insert("fixture".into(), Value::Array(fixtures));
        self.custom_properties(&mut obj, body.id.into());
        Value::Object(obj)
    }

    fn fixture(&self, fixture: &Fixture) -> Value {
        let mut obj = Map::new();
        self.name_and_path(&mut obj, fixture.id.into());
        if !is_zero(fixture.restitution) {
            obj.insert("restitution".into(), self.float(fixture.restitution));
        }
        if !is_zero(fixture.friction) {
            obj.insert("friction".into(), self.float(fixture.friction));
        }
        if !is_zero(fixture.density) {
            obj.insert("density".into(), self.float(fixture.density));
        }
        if fixture.sensor {
            obj.insert("sensor".into(), true.into());
        }
        let filter = &fixture.filter;
        if filter.category_bits != 0x0001 {
            obj.insert("filter-categoryBits".into(), filter.category_bits.into());
        }
        if filter.mask_bits != 0xffff {
            obj.insert("filter-maskBits".into(), filter.mask_bits.into());
        }
        if filter.group_index != 0 {
            obj.insert("filter-groupIndex".into(), filter.group_index.into());
        }

        let (key, shape) = self.shape(&fixture.shape);
        obj.insert(key.into(), shape);
        self.custom_properties(&mut obj, fixture.id.into());
        Value::Object(obj)
    }

    fn shape(&self, shape: &Shape) -> (&'static str, Value) {
        let mut obj = Map::new();
        match shape {
            Shape::Circle(c) => {
                obj.insert("radius".into(), self.float(c.radius));
                if !is_zero(c.center.x) || !is_zero(c.center.y) {
                    obj.insert("center".into(), self.vec2(c.center));
                }
            }
            Shape::Edge(e) => {
                obj.insert("vertex1".into(), self.vec2(e.vertex1));
                obj.insert("vertex2".into(), self.vec2(e.vertex2));
                if let Some(v0) = e.vertex0 {
                    obj.insert("hasVertex0".into(), true.into());
                    obj.insert("vertex0".into(), self.vec2(v0));
                }
                if let Some(v3) = e.vertex3 {
                    obj.insert("hasVertex3".into(), true.into());
                    obj.insert("vertex3".into(), self.vec2(v3));
                }
            }
            Shape::Chain(c) => {
                obj.insert("vertices".into(), encode_vec2_array(&c.vertices, self.mode));
                if let Some(prev) = c.prev_vertex {
                    obj.insert("hasPrevVertex".into(), true.into());
                    obj.insert("prevVertex".into(), self.vec2(prev));
                }
                if let Some(next) = c.next_vertex {
                    obj.insert("hasNextVertex".into(), true.into());
                    obj.insert("nextVertex".into(), self.vec2(next));
                }
            }
            Shape::Polygon(p) => {
                obj.insert("vertices".into(), encode_vec2_array(p.vertices(), self.mode));
            }
        }
        (shape.kind_name(), Value::Object(obj))
    }

    fn joint(&mut self, joint: &Joint) -> Value {
        let mut obj = Map::new();
        self.name_and_path(&mut obj, joint.id.into());
        obj.insert("type".into(), joint.joint_type().name().into());
        obj.insert("bodyA".into(), self.body_ref(joint.body_a).into());
        obj.insert("bodyB".into(), self.body_ref(joint.body_b).into());
        if joint.collide_connected {
            obj.insert("collideConnected".into(), true.into());
        }

        let mut put = |key: &str, value: Value| {
            obj.insert(key.into(), value);
        };
        match &joint.kind {
            JointKind::Revolute(r) => {
                put("anchorA", self.vec2(r.local_anchor_a));
                put("anchorB", self.vec2(r.local_anchor_b));
                put("refAngle", self.float(r.reference_angle));
                put("enableLimit", r.enable_limit.into());
                put("lowerLimit", self.float(r.lower_angle));
                put("upperLimit", self.float(r.upper_angle));
                put("enableMotor", r.enable_motor.into());
                put("motorSpeed", self.float(r.motor_speed));
                put("maxMotorTorque", self.float(r.max_motor_torque));
            }
            JointKind::Prismatic(p) => {
                put("anchorA", self.vec2(p.local_anchor_a));
                put("anchorB", self.vec2(p.local_anchor_b));
                put("localAxisA", self.vec2(p.axis()));
                put("refAngle", self.float(p.reference_angle));
                put("enableLimit", p.enable_limit.into());
                put("lowerLimit", self.float(p.lower_translation));
                put("upperLimit", self.float(p.upper_translation));
                put("enableMotor", p.enable_motor.into());
                put("maxMotorForce", self.float(p.max_motor_force));
                put("motorSpeed", self.float(p.motor_speed));
            }
            JointKind::Distance(d) => {
                put("anchorA", self.vec2(d.local_anchor_a));
                put("anchorB", self.vec2(d.local_anchor_b));
                put("length", self.float(d.length));
                put("frequency", self.float(d.frequency));
                put("dampingRatio", self.float(d.damping_ratio));
            }
            JointKind::Pulley(p) => {
                put("groundAnchorA", self.vec2(p.ground_anchor_a));
                put("groundAnchorB", self.vec2(p.ground_anchor_b));
                put("anchorA", self.vec2(p.local_anchor_a));
                put("anchorB", self.vec2(p.local_anchor_b));
                put("lengthA", self.float(p.length_a));
                put("lengthB", self.float(p.length_b));
                put("ratio", self.float(p.ratio));
            }
            JointKind::Mouse(m) => {
                put("target", self.vec2(m.target));
                put("anchorB", self.vec2(m.anchor_b));
                put("maxForce", self.float(m.max_force));
                put("frequency", self.float(m.frequency));
                put("dampingRatio", self.float(m.damping_ratio));
            }
            JointKind::Gear(g) => {
                put("joint1", self.joint_ref(g.joint1).into());
                put("joint2", self.joint_ref(g.joint2).into());
                put("ratio", self.float(g.ratio));
            }
            JointKind::Wheel(w) => {
                put("anchorA", self.vec2(w.local_anchor_a));
                put("anchorB", self.vec2(w.local_anchor_b));
                put("localAxisA", self.vec2(w.axis()));
                put("enableMotor", w.enable_motor.into());
                put("motorSpeed", self.float(w.motor_speed));
                put("maxMotorTorque", self.float(w.max_motor_torque));
                put("springFrequency", self.float(w.spring_frequency));
                put("springDampingRatio", self.float(w.spring_damping_ratio));
            }
            JointKind::Motor(m) => {
                put("linearOffset", self.vec2(m.linear_offset));
                put("refAngle", self.float(m.angular_offset));
                put("maxForce", self.float(m.max_force));
                put("maxTorque", self.float(m.max_torque));
                put("correctionFactor", self.float(m.correction_factor));
            }
            JointKind::Weld(w) => {
                put("anchorA", self.vec2(w.local_anchor_a));
                put("anchorB", self.vec2(w.local_anchor_b));
                put("refAngle", self.float(w.reference_angle));
                put("frequency", self.float(w.frequency));
                put("dampingRatio", self.float(w.damping_ratio));
            }
            JointKind::Friction(f) => {
                put("anchorA", self.vec2(f.local_anchor_a));
                put("anchorB", self.vec2(f.local_anchor_b));
                put("maxForce", self.float(f.max_force));
                put("maxTorque", self.float(f.max_torque));
            }
            JointKind::Rope(r) => {
                put("anchorA", self.vec2(r.local_anchor_a));
                put("anchorB", self.vec2(r.local_anchor_b));
                put("maxLength", self.float(r.max_length));
            }
        }

        self.custom_properties(&mut obj, joint.id.into());
        let index = self.joint_index.len() as i64;
        self.joint_index.insert(joint.id, index);
        Value::Object(obj)
    }

    fn body_ref(&self, id: BodyId) -> i64 {
        self.body_index.get(&id).copied().unwrap_or_else(|| {
            tracing::warn!(?id, "joint references a body outside the world, writing -1");
            -1
        })
    }

    /// Index of an already emitted joint, or -1.
    fn joint_ref(&self, id: JointId) -> i64 {
        self.joint_index.get(&id).copied().unwrap_or_else(|| {
            tracing::warn!(?id, "gear references a joint not yet written, writing -1");
            -1
        })
    }

    fn image(&self, image: &Image) -> Value {
        let mut obj = Map::new();
        self.name_and_path(&mut obj, image.id.into());
        obj.insert("file".into(), image.file.as_str().into());
        let body = image.body.map_or(-1, |b| self.body_ref(b));
        obj.insert("body".into(), body.into());
        obj.insert("center".into(), self.vec2(image.center));
        obj.insert("angle".into(), self.float(image.angle));
        obj.insert("scale".into(), self.float(image.scale));
        obj.insert("aspectScale".into(), self.float(image.aspect_scale));
        if image.flip {
            obj.insert("flip".into(), true.into());
        }
        obj.insert("opacity".into(), self.float(image.opacity));
        obj.insert("filter".into(), image.filter.index().into());
        obj.insert("renderOrder".into(), self.float(image.render_order));
        if image.color_tint != Color4::WHITE {
            obj.insert(
                "colorTint".into(),
                Value::from(image.color_tint.to_array().to_vec()),
            );
        }
        obj.insert("corners".into(), encode_vec2_array(&image.corners, self.mode));
        if !image.points.is_empty() {
            obj.insert(
                "glVertexPointer".into(),
                encode_float_array(&image.points, self.mode),
            );
        }
        if !image.uv_coords.is_empty() {
            obj.insert(
                "glTexCoordPointer".into(),
                encode_float_array(&image.uv_coords, self.mode),
            );
        }
        if !image.indices.is_empty() {
            obj.insert("glVertexCount".into(), image.point_count().into());
            obj.insert("glDrawElements".into(), Value::from(image.indices.clone()));
        }
        self.custom_properties(&mut obj, image.id.into());
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenejson_model::{
        BodyType, Fixture, GearJoint, JointType, PhysicsWorld, RevoluteJoint, WeldJoint,
    };
    use serde_json::json;

    fn two_bodies(world: &mut PhysicsWorld) -> (BodyId, BodyId) {
        let a = world.add_body(Body::new(BodyType::Dynamic, Vec2::new(1.0, 2.0)));
        let b = world.add_body(Body::default());
        (a, b)
    }

    #[test]
    fn circle_fixture_matches_document_shape() {
        let mut scene = Scene::new();
        let body = scene.world.add_body(Body::default());
        scene
            .world
            .add_fixture(body, Fixture::new(Shape::circle(Vec2::ZERO, 0.5)))
            .unwrap();
        let doc = WorldWriter::default().write_value(&scene);

        let fixture = &doc["body"][0]["fixture"][0];
        assert_eq!(fixture["circle"], json!({"radius": "3F000000"}));
        assert!(fixture.get("density").is_none());
        assert!(fixture.get("filter-maskBits").is_none());
        assert_eq!(doc["body"][0]["type"], json!(0));
        assert_eq!(doc["body"][0]["position"], json!(0));
    }

    #[test]
    fn defaults_are_elided() {
        let mut scene = Scene::new();
        scene.world.add_body(Body::default());
        let doc = WorldWriter::default().write_value(&scene);
        let body = doc["body"][0].as_object().unwrap();
        for key in [
            "linearDamping",
            "angularDamping",
            "gravityScale",
            "bullet",
            "allowSleep",
            "awake",
            "active",
            "fixedRotation",
            "massData-mass",
            "massData-center",
            "massData-I",
            "name",
            "path",
            "customProperties",
        ] {
            assert!(!body.contains_key(key), "{key} should be elided");
        }
        assert_eq!(body["fixture"], json!([]));
    }

    #[test]
    fn empty_world_writes_empty_arrays() {
        let doc = WorldWriter::default().write_value(&Scene::new());
        for key in ["body", "joint", "image"] {
            assert_eq!(doc[key], json!([]), "{key}");
        }
        assert_eq!(doc["gravity"], json!({"x": 0, "y": "C1200000"}));
        assert!(doc.get("customProperties").is_none());
    }

    #[test]
    fn non_default_body_flags_are_written() {
        let mut scene = Scene::new();
        scene.world.add_body(Body {
            gravity_scale: 0.0,
            allow_sleep: false,
            active: false,
            bullet: true,
            ..Default::default()
        });
        let doc = WorldWriter::default().write_value(&scene);
        let body = &doc["body"][0];
        assert_eq!(body["gravityScale"], json!(0));
        assert_eq!(body["allowSleep"], json!(false));
        assert_eq!(body["active"], json!(false));
        assert_eq!(body["bullet"], json!(true));
    }

    #[test]
    fn gear_joints_follow_all_others() {
        let mut scene = Scene::new();
        let (a, b) = two_bodies(&mut scene.world);
        let rev = |w: &mut PhysicsWorld| {
            w.add_joint(Joint::new(a, b, JointKind::Revolute(RevoluteJoint::default())))
                .unwrap()
        };
        let j1 = rev(&mut scene.world);
        let j2 = rev(&mut scene.world);
        scene
            .world
            .add_joint(Joint::new(a, b, JointKind::Gear(GearJoint::new(j1, j2, 2.0))))
            .unwrap();
        scene
            .world
            .add_joint(Joint::new(a, b, JointKind::Weld(WeldJoint::default())))
            .unwrap();

        let doc = WorldWriter::default().write_value(&scene);
        let joints = doc["joint"].as_array().unwrap();
        let types: Vec<&str> = joints.iter().map(|j| j["type"].as_str().unwrap()).collect();
        assert_eq!(types, ["revolute", "revolute", "weld", "gear"]);
        assert_eq!(joints[3]["joint1"], json!(0));
        assert_eq!(joints[3]["joint2"], json!(1));
        assert_eq!(joints[3]["ratio"], json!("40000000"));
        assert_eq!(joints[2]["bodyA"], json!(0));
        assert_eq!(joints[2]["bodyB"], json!(1));
    }

    #[test]
    fn every_joint_type_is_writable() {
        let mut scene = Scene::new();
        let (a, b) = two_bodies(&mut scene.world);
        let kinds = [
            JointKind::Revolute(Default::default()),
            JointKind::Prismatic(Default::default()),
            JointKind::Distance(Default::default()),
            JointKind::Pulley(Default::default()),
            JointKind::Mouse(Default::default()),
            JointKind::Wheel(Default::default()),
            JointKind::Motor(Default::default()),
            JointKind::Weld(Default::default()),
            JointKind::Friction(Default::default()),
            JointKind::Rope(Default::default()),
        ];
        for kind in kinds {
            scene.world.add_joint(Joint::new(a, b, kind)).unwrap();
        }
        let doc = WorldWriter::default().write_value(&scene);
        let joints = doc["joint"].as_array().unwrap();
        assert_eq!(joints.len(), JointType::ALL.len() - 1);
        assert!(
            joints
                .iter()
                .all(|j| JointType::from_name(j["type"].as_str().unwrap()).is_some())
        );
    }

    #[test]
    fn names_paths_and_properties_are_written() {
        let mut scene = Scene::new();
        let (a, _) = two_bodies(&mut scene.world);
        scene.names.set_name(a, "hero");
        scene.names.set_path(a, "/actors");
        scene.properties.set(a, "hp", 10i32);
        scene.properties.set(a, "hp", 0.5f32);
        scene.properties.set(EntityRef::World, "level", String::from("one"));

        let doc = WorldWriter::default().write_value(&scene);
        assert_eq!(doc["body"][0]["name"], json!("hero"));
        assert_eq!(doc["body"][0]["path"], json!("/actors"));
        assert_eq!(
            doc["body"][0]["customProperties"],
            json!([{"name": "hp", "int": 10}, {"name": "hp", "float": "3F000000"}])
        );
        assert_eq!(
            doc["customProperties"],
            json!([{"name": "level", "string": "one"}])
        );
        assert!(doc["body"][1].get("name").is_none());
    }

    #[test]
    fn empty_name_is_not_written() {
        let mut scene = Scene::new();
        let a = scene.world.add_body(Body::default());
        scene.names.set_name(a, "");
        let doc = WorldWriter::default().write_value(&scene);
        assert!(doc["body"][0].get("name").is_none());
    }

    #[test]
    fn image_carries_body_index() {
        let mut scene = Scene::new();
        let (_, b) = two_bodies(&mut scene.world);
        let mut bound = Image::new("ship.png");
        bound.body = Some(b);
        bound.update_uvs(1.0);
        scene.world.add_image(bound).unwrap();
        scene.world.add_image(Image::new("sky.png")).unwrap();

        let doc = WorldWriter::default().write_value(&scene);
        let images = doc["image"].as_array().unwrap();
        assert_eq!(images[0]["body"], json!(1));
        assert_eq!(images[0]["glDrawElements"], json!([0, 1, 2, 2, 3, 0]));
        assert_eq!(images[0]["glVertexCount"], json!(4));
        assert_eq!(images[1]["body"], json!(-1));
        assert_eq!(images[1]["file"], json!("sky.png"));
        assert!(images[1].get("colorTint").is_none());
    }

    #[test]
    fn human_readable_uses_decimals() {
        let mut scene = Scene::new();
        scene
            .world
            .add_body(Body::new(BodyType::Dynamic, Vec2::new(0.5, 1.0)));
        let doc = WorldWriter::human_readable().write_value(&scene);
        assert_eq!(doc["body"][0]["position"], json!({"x": 0.5, "y": 1}));
    }

    #[test]
    fn write_file_rejects_empty_path() {
        let err = WorldWriter::default()
            .write_file(&Scene::new(), "")
            .unwrap_err();
        assert!(matches!(err, CodecError::EmptyPath));
    }

    #[test]
    fn write_file_creates_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        WorldWriter::default()
            .write_file(&Scene::new(), &path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["gravity"], json!({"x": 0, "y": "C1200000"}));
    }

    #[test]
    fn write_file_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scene.json");
        let err = WorldWriter::default()
            .write_file(&Scene::new(), &path)
            .unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
        assert!(err.to_string().contains("scene.json"));
    }
}
