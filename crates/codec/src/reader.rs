//! Document to scene decoding.

use std::path::Path;

use glam::Vec2;
use scenejson_common::{BodyId, Color4, EntityRef, JointId};
use scenejson_meta::{PropertyType, PropertyValue};
use scenejson_model::{
    Body, BodyType, ChainShape, DistanceJoint, EdgeShape, Filter, Fixture, FrictionJoint,
    GearJoint, Image, ImageFilter, Joint, JointKind, JointType, MassData, ModelError, MotorJoint,
    MouseJoint, PrismaticJoint, PulleyJoint, RevoluteJoint, RopeJoint, Shape, WeldJoint,
    WheelJoint, unit_axis,
};
use serde_json::Value;

use crate::error::{CodecError, Diagnostic};
use crate::float::{decode_float, decode_float_array, decode_vec2, decode_vec2_array};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderOptions {
    /// Fail on the first [`Diagnostic`] instead of skipping the offending
    /// entity.
    pub strict: bool,
}

/// The result of a successful decode.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub scene: Scene,
    /// Everything that was skipped or defaulted, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Decodes documents into fresh [`Scene`]s.
///
/// Bodies are resolved by position in the document's body array. Non-gear
/// joints are decoded first and gear joints after them, and a gear joint's
/// indices address the list of joints decoded so far.
#[derive(Debug, Clone, Default)]
pub struct WorldReader {
    options: ReaderOptions,
}

impl WorldReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    pub fn strict() -> Self {
        Self::new(ReaderOptions { strict: true })
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    pub fn read_value(&self, document: &Value) -> Result<Decoded, CodecError> {
        let _span = tracing::info_span!("read_world", strict = self.options.strict).entered();
        let mut decoder = Decoder::new(self.options.strict);
        match document {
            Value::Object(_) => decoder.world(document)?,
            Value::Null => decoder.report(Diagnostic::NullDocument)?,
            other => {
                return Err(CodecError::InvalidDocument(format!(
                    "expected an object at the top level, found {}",
                    json_kind(other)
                )));
            }
        }
        Ok(decoder.finish())
    }

    pub fn read_str(&self, text: &str) -> Result<Decoded, CodecError> {
        let document: Value = serde_json::from_str(text)?;
        self.read_value(&document)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Decoded, CodecError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CodecError::EmptyPath);
        }
        let text = std::fs::read_to_string(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = text.len(), "scene file loaded");
        self.read_str(&text)
    }

    /// Decode into an existing scene, replacing everything it held. On error
    /// the scene is left as it was.
    pub fn read_into(&self, document: &Value, scene: &mut Scene) -> Result<Vec<Diagnostic>, CodecError> {
        let decoded = self.read_value(document)?;
        *scene = decoded.scene;
        Ok(decoded.diagnostics)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn float_or(value: &Value, key: &str, default: f32) -> f32 {
    value.get(key).and_then(decode_float).unwrap_or(default)
}

fn vec2_or(value: &Value, key: &str, default: Vec2) -> Vec2 {
    value.get(key).and_then(decode_vec2).unwrap_or(default)
}

fn bool_or(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn int_or(value: &Value, key: &str, default: i64) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        _ => default,
    }
}

fn entries<'v>(value: &'v Value, key: &str) -> &'v [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn vertices(value: &Value) -> Vec<Vec2> {
    value
        .get("vertices")
        .map(decode_vec2_array)
        .unwrap_or_default()
}

fn color_of(value: &Value) -> Option<Color4> {
    let channels = value.as_array()?;
    if channels.len() != 4 {
        return None;
    }
    let mut c = [255i32; 4];
    for (slot, channel) in c.iter_mut().zip(channels) {
        *slot = channel.as_i64().and_then(|v| i32::try_from(v).ok()).unwrap_or(255);
    }
    Some(Color4::from_array(c))
}

fn property_value(ty: PropertyType, raw: &Value) -> Option<PropertyValue> {
    match ty {
        PropertyType::Int => raw
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(PropertyValue::Int),
        PropertyType::Float => decode_float(raw).map(PropertyValue::Float),
        PropertyType::String => raw.as_str().map(|s| PropertyValue::String(s.to_owned())),
        PropertyType::Vec2 => decode_vec2(raw).map(PropertyValue::Vec2),
        PropertyType::Bool => raw.as_bool().map(PropertyValue::Bool),
        PropertyType::Color => color_of(raw).map(PropertyValue::Color),
    }
}

fn is_gear(joint: &Value) -> bool {
    joint.get("type").and_then(Value::as_str) == Some(JointType::Gear.name())
}

/// Per-call decoding state: the scene under construction plus the
/// index-addressable lists documents cross-reference into.
struct Decoder {
    strict: bool,
    scene: Scene,
    bodies: Vec<BodyId>,
    joints: Vec<JointId>,
    diagnostics: Vec<Diagnostic>,
}

impl Decoder {
    fn new(strict: bool) -> Self {
        Self {
            strict,
            scene: Scene::new(),
            bodies: Vec::new(),
            joints: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), CodecError> {
        tracing::warn!(%diagnostic, "document inconsistency");
        if self.strict {
            return Err(CodecError::InvalidDocument(diagnostic.to_string()));
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn finish(self) -> Decoded {
        tracing::debug!(
            bodies = self.scene.world.body_count(),
            fixtures = self.scene.world.fixture_count(),
            joints = self.scene.world.joint_count(),
            images = self.scene.world.image_count(),
            diagnostics = self.diagnostics.len(),
            "world decoded"
        );
        Decoded {
            scene: self.scene,
            diagnostics: self.diagnostics,
        }
    }

    fn world(&mut self, doc: &Value) -> Result<(), CodecError> {
        let world = &mut self.scene.world;
        world.gravity = vec2_or(doc, "gravity", world.gravity);
        world.allow_sleep = bool_or(doc, "allowSleep", world.allow_sleep);
        world.auto_clear_forces = bool_or(doc, "autoClearForces", world.auto_clear_forces);
        world.warm_starting = bool_or(doc, "warmStarting", world.warm_starting);
        world.continuous_physics = bool_or(doc, "continuousPhysics", world.continuous_physics);
        world.sub_stepping = bool_or(doc, "subStepping", world.sub_stepping);

        for (index, body) in entries(doc, "body").iter().enumerate() {
            self.check_object("body", index, body)?;
            self.body(index, body)?;
        }

        let joints = entries(doc, "joint");
        for (index, joint) in joints.iter().enumerate() {
            if !is_gear(joint) {
                self.check_object("joint", index, joint)?;
                self.joint(index, joint)?;
            }
        }
        for (index, joint) in joints.iter().enumerate() {
            if is_gear(joint) {
                self.joint(index, joint)?;
            }
        }

        for (index, image) in entries(doc, "image").iter().enumerate() {
            self.check_object("image", index, image)?;
            self.image(index, image)?;
        }

        self.custom_properties(doc, EntityRef::World);
        Ok(())
    }

    fn check_object(&mut self, section: &'static str, index: usize, value: &Value) -> Result<(), CodecError> {
        if value.is_object() {
            Ok(())
        } else {
            self.report(Diagnostic::MalformedEntry { section, index })
        }
    }

    fn metadata(&mut self, value: &Value, entity: EntityRef) {
        if let Some(name) = value.get("name").and_then(Value::as_str) {
            self.scene.names.set_name(entity, name);
        }
        if let Some(path) = value.get("path").and_then(Value::as_str) {
            self.scene.names.set_path(entity, path);
        }
        self.custom_properties(value, entity);
    }

    fn custom_properties(&mut self, value: &Value, entity: EntityRef) {
        for entry in entries(value, "customProperties") {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                tracing::debug!(?entity, "custom property without a name skipped");
                continue;
            };
            for ty in PropertyType::ALL {
                if let Some(v) = entry.get(ty.key()).and_then(|raw| property_value(ty, raw)) {
                    self.scene.properties.insert(entity, name, v);
                }
            }
        }
    }

    fn body(&mut self, index: usize, value: &Value) -> Result<(), CodecError> {
        let raw_type = int_or(value, "type", 0);
        let body_type = match BodyType::from_index(raw_type) {
            Ok(t) => t,
            Err(_) => {
                self.report(Diagnostic::UnknownBodyType {
                    body: index,
                    value: raw_type,
                })?;
                BodyType::Static
            }
        };

        let d = Body::default();
        let mut body = Body {
            body_type,
            position: vec2_or(value, "position", d.position),
            angle: float_or(value, "angle", d.angle),
            linear_velocity: vec2_or(value, "linearVelocity", d.linear_velocity),
            angular_velocity: float_or(value, "angularVelocity", d.angular_velocity),
            linear_damping: float_or(value, "linearDamping", d.linear_damping),
            angular_damping: float_or(value, "angularDamping", d.angular_damping),
            gravity_scale: float_or(value, "gravityScale", d.gravity_scale),
            bullet: bool_or(value, "bullet", d.bullet),
            allow_sleep: bool_or(value, "allowSleep", d.allow_sleep),
            awake: bool_or(value, "awake", d.awake),
            active: bool_or(value, "active", d.active),
            fixed_rotation: bool_or(value, "fixedRotation", d.fixed_rotation),
            mass_data: MassData {
                mass: float_or(value, "massData-mass", 0.0),
                center: vec2_or(value, "massData-center", Vec2::ZERO),
                inertia: float_or(value, "massData-I", 0.0),
            },
            ..d
        };

        for (fixture_index, fixture_value) in entries(value, "fixture").iter().enumerate() {
            if let Some(fixture) = self.fixture(index, fixture_index, fixture_value)? {
                self.metadata(fixture_value, fixture.id.into());
                body.add_fixture(fixture);
            }
        }

        let id = self.scene.world.add_body(body);
        self.bodies.push(id);
        self.metadata(value, id.into());
        Ok(())
    }

    fn fixture(&mut self, body: usize, fixture: usize, value: &Value) -> Result<Option<Fixture>, CodecError> {
        let Some(shape) = self.shape(body, fixture, value)? else {
            return Ok(None);
        };
        let mut f = Fixture::new(shape);
        f.restitution = float_or(value, "restitution", 0.0);
        f.friction = float_or(value, "friction", 0.0);
        f.density = float_or(value, "density", 0.0);
        f.sensor = bool_or(value, "sensor", false);
        let d = Filter::default();
        f.filter = Filter {
            category_bits: self.filter_field(body, fixture, value, "filter-categoryBits", d.category_bits)?,
            mask_bits: self.filter_field(body, fixture, value, "filter-maskBits", d.mask_bits)?,
            group_index: self.filter_field(body, fixture, value, "filter-groupIndex", d.group_index)?,
        };
        Ok(Some(f))
    }

    fn filter_field<T>(
        &mut self,
        body: usize,
        fixture: usize,
        value: &Value,
        field: &'static str,
        default: T,
    ) -> Result<T, CodecError>
    where
        T: Copy + Into<i64> + TryFrom<i64>,
    {
        let raw = int_or(value, field, default.into());
        match T::try_from(raw) {
            Ok(bits) => Ok(bits),
            Err(_) => {
                self.report(Diagnostic::FilterOutOfRange {
                    body,
                    fixture,
                    field,
                    value: raw,
                })?;
                Ok(default)
            }
        }
    }

    fn shape(&mut self, body: usize, fixture: usize, value: &Value) -> Result<Option<Shape>, CodecError> {
        if let Some(circle) = value.get("circle") {
            return Ok(Some(Shape::circle(
                vec2_or(circle, "center", Vec2::ZERO),
                float_or(circle, "radius", 0.0),
            )));
        }

        if let Some(edge) = value.get("edge") {
            let ghost = |has: &str, key: &str| {
                bool_or(edge, has, false).then(|| vec2_or(edge, key, Vec2::ZERO))
            };
            return Ok(Some(Shape::Edge(EdgeShape {
                vertex1: vec2_or(edge, "vertex1", Vec2::ZERO),
                vertex2: vec2_or(edge, "vertex2", Vec2::ZERO),
                vertex0: ghost("hasVertex0", "vertex0"),
                vertex3: ghost("hasVertex3", "vertex3"),
            })));
        }

        if let Some(chain) = value.get("chain") {
            let vertices = vertices(chain);
            if vertices.len() < 2 {
                self.report(Diagnostic::DegenerateChain {
                    body,
                    fixture,
                    vertices: vertices.len(),
                })?;
                return Ok(None);
            }
            let ghost = |has: &str, key: &str| {
                bool_or(chain, has, false).then(|| vec2_or(chain, key, Vec2::ZERO))
            };
            return Ok(Some(Shape::Chain(ChainShape {
                vertices,
                prev_vertex: ghost("hasPrevVertex", "prevVertex"),
                next_vertex: ghost("hasNextVertex", "nextVertex"),
            })));
        }

        // Older documents store closed chains as "loop" without the
        // repeated closing vertex.
        if let Some(closed) = value.get("loop") {
            let vertices = vertices(closed);
            if vertices.len() < 3 {
                self.report(Diagnostic::DegenerateChain {
                    body,
                    fixture,
                    vertices: vertices.len(),
                })?;
                return Ok(None);
            }
            return Ok(Some(Shape::chain_loop(vertices)));
        }

        if let Some(polygon) = value.get("polygon") {
            let vertices = vertices(polygon);
            let n = vertices.len();
            return match Shape::polygon(vertices) {
                Ok(shape) => Ok(Some(shape)),
                Err(ModelError::TooManyPolygonVertices(_)) => {
                    self.report(Diagnostic::OversizedPolygon {
                        body,
                        fixture,
                        vertices: n,
                    })?;
                    Ok(None)
                }
                Err(_) => {
                    self.report(Diagnostic::DegeneratePolygon {
                        body,
                        fixture,
                        vertices: n,
                    })?;
                    Ok(None)
                }
            };
        }

        self.report(Diagnostic::MissingShape { body, fixture })?;
        Ok(None)
    }

    fn body_ref(&mut self, joint: usize, value: &Value, field: &'static str) -> Result<Option<BodyId>, CodecError> {
        let index = int_or(value, field, -1);
        let found = usize::try_from(index)
            .ok()
            .and_then(|i| self.bodies.get(i))
            .copied();
        if found.is_none() {
            self.report(Diagnostic::BodyIndexOutOfRange {
                joint,
                field,
                index,
                count: self.bodies.len(),
            })?;
        }
        Ok(found)
    }

    fn joint_ref(&mut self, joint: usize, value: &Value, field: &'static str) -> Result<Option<JointId>, CodecError> {
        let index = int_or(value, field, -1);
        let found = usize::try_from(index)
            .ok()
            .and_then(|i| self.joints.get(i))
            .copied();
        if found.is_none() {
            self.report(Diagnostic::JointIndexOutOfRange {
                joint,
                field,
                index,
                count: self.joints.len(),
            })?;
        }
        Ok(found)
    }

    fn joint(&mut self, index: usize, value: &Value) -> Result<(), CodecError> {
        let Some(type_name) = value.get("type").and_then(Value::as_str) else {
            return self.report(Diagnostic::MissingJointType { joint: index });
        };
        let Some(joint_type) = JointType::from_name(type_name) else {
            return self.report(Diagnostic::UnknownJointType {
                joint: index,
                name: type_name.to_owned(),
            });
        };
        let Some(body_a) = self.body_ref(index, value, "bodyA")? else {
            return Ok(());
        };
        let Some(body_b) = self.body_ref(index, value, "bodyB")? else {
            return Ok(());
        };
        let Some(kind) = self.joint_kind(index, joint_type, value, body_b)? else {
            return Ok(());
        };

        let mut joint = Joint::new(body_a, body_b, kind);
        joint.collide_connected = bool_or(value, "collideConnected", false);
        // References come from the lists decoded above, so this cannot miss.
        let id = self
            .scene
            .world
            .add_joint(joint)
            .map_err(|e| CodecError::InvalidDocument(e.to_string()))?;
        self.joints.push(id);
        self.metadata(value, id.into());
        Ok(())
    }

    fn joint_kind(
        &mut self,
        index: usize,
        joint_type: JointType,
        v: &Value,
        body_b: BodyId,
    ) -> Result<Option<JointKind>, CodecError> {
        let kind = match joint_type {
            JointType::Revolute => {
                let d = RevoluteJoint::default();
                JointKind::Revolute(RevoluteJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    reference_angle: float_or(v, "refAngle", d.reference_angle),
                    enable_limit: bool_or(v, "enableLimit", d.enable_limit),
                    lower_angle: float_or(v, "lowerLimit", d.lower_angle),
                    upper_angle: float_or(v, "upperLimit", d.upper_angle),
                    enable_motor: bool_or(v, "enableMotor", d.enable_motor),
                    motor_speed: float_or(v, "motorSpeed", d.motor_speed),
                    max_motor_torque: float_or(v, "maxMotorTorque", d.max_motor_torque),
                })
            }
            JointType::Prismatic => {
                let d = PrismaticJoint::default();
                let axis = v
                    .get("localAxisA")
                    .or_else(|| v.get("localAxis1"))
                    .and_then(decode_vec2)
                    .unwrap_or(d.local_axis_a);
                JointKind::Prismatic(PrismaticJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    local_axis_a: unit_axis(axis),
                    reference_angle: float_or(v, "refAngle", d.reference_angle),
                    enable_limit: bool_or(v, "enableLimit", d.enable_limit),
                    lower_translation: float_or(v, "lowerLimit", d.lower_translation),
                    upper_translation: float_or(v, "upperLimit", d.upper_translation),
                    enable_motor: bool_or(v, "enableMotor", d.enable_motor),
                    max_motor_force: float_or(v, "maxMotorForce", d.max_motor_force),
                    motor_speed: float_or(v, "motorSpeed", d.motor_speed),
                })
            }
            JointType::Distance => {
                let d = DistanceJoint::default();
                JointKind::Distance(DistanceJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    length: float_or(v, "length", d.length),
                    frequency: float_or(v, "frequency", d.frequency),
                    damping_ratio: float_or(v, "dampingRatio", d.damping_ratio),
                })
            }
            JointType::Pulley => {
                let d = PulleyJoint::default();
                JointKind::Pulley(PulleyJoint {
                    ground_anchor_a: vec2_or(v, "groundAnchorA", d.ground_anchor_a),
                    ground_anchor_b: vec2_or(v, "groundAnchorB", d.ground_anchor_b),
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    length_a: float_or(v, "lengthA", d.length_a),
                    length_b: float_or(v, "lengthB", d.length_b),
                    ratio: float_or(v, "ratio", d.ratio),
                })
            }
            JointType::Mouse => {
                let mut mouse = self
                    .scene
                    .world
                    .body(body_b)
                    .map(MouseJoint::grabbing)
                    .unwrap_or_default();
                mouse.anchor_b = vec2_or(v, "anchorB", mouse.anchor_b);
                mouse.max_force = float_or(v, "maxForce", mouse.max_force);
                mouse.frequency = float_or(v, "frequency", mouse.frequency);
                mouse.damping_ratio = float_or(v, "dampingRatio", mouse.damping_ratio);
                // Grabbing moves the target onto the body; restore the saved one.
                mouse.set_target(vec2_or(v, "target", mouse.target));
                JointKind::Mouse(mouse)
            }
            JointType::Gear => {
                let Some(joint1) = self.joint_ref(index, v, "joint1")? else {
                    return Ok(None);
                };
                let Some(joint2) = self.joint_ref(index, v, "joint2")? else {
                    return Ok(None);
                };
                JointKind::Gear(GearJoint::new(joint1, joint2, float_or(v, "ratio", 1.0)))
            }
            JointType::Wheel => {
                let d = WheelJoint::default();
                JointKind::Wheel(WheelJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    local_axis_a: unit_axis(vec2_or(v, "localAxisA", d.local_axis_a)),
                    enable_motor: bool_or(v, "enableMotor", d.enable_motor),
                    motor_speed: float_or(v, "motorSpeed", d.motor_speed),
                    max_motor_torque: float_or(v, "maxMotorTorque", d.max_motor_torque),
                    spring_frequency: float_or(v, "springFrequency", d.spring_frequency),
                    spring_damping_ratio: float_or(v, "springDampingRatio", d.spring_damping_ratio),
                })
            }
            JointType::Motor => {
                let d = MotorJoint::default();
                let linear_offset = v
                    .get("linearOffset")
                    .or_else(|| v.get("anchorA"))
                    .and_then(decode_vec2)
                    .unwrap_or(d.linear_offset);
                JointKind::Motor(MotorJoint {
                    linear_offset,
                    angular_offset: float_or(v, "refAngle", d.angular_offset),
                    max_force: float_or(v, "maxForce", d.max_force),
                    max_torque: float_or(v, "maxTorque", d.max_torque),
                    correction_factor: float_or(v, "correctionFactor", d.correction_factor),
                })
            }
            JointType::Weld => {
                let d = WeldJoint::default();
                JointKind::Weld(WeldJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    reference_angle: float_or(v, "refAngle", d.reference_angle),
                    frequency: float_or(v, "frequency", d.frequency),
                    damping_ratio: float_or(v, "dampingRatio", d.damping_ratio),
                })
            }
            JointType::Friction => {
                let d = FrictionJoint::default();
                JointKind::Friction(FrictionJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    max_force: float_or(v, "maxForce", d.max_force),
                    max_torque: float_or(v, "maxTorque", d.max_torque),
                })
            }
            JointType::Rope => {
                let d = RopeJoint::default();
                JointKind::Rope(RopeJoint {
                    local_anchor_a: vec2_or(v, "anchorA", d.local_anchor_a),
                    local_anchor_b: vec2_or(v, "anchorB", d.local_anchor_b),
                    max_length: float_or(v, "maxLength", d.max_length),
                })
            }
        };
        Ok(Some(kind))
    }

    fn image(&mut self, index: usize, value: &Value) -> Result<(), CodecError> {
        let raw_body = int_or(value, "body", -1);
        let body = if raw_body == -1 {
            None
        } else {
            let found = usize::try_from(raw_body)
                .ok()
                .and_then(|i| self.bodies.get(i))
                .copied();
            if found.is_none() {
                self.report(Diagnostic::ImageBodyOutOfRange {
                    image: index,
                    index: raw_body,
                    count: self.bodies.len(),
                })?;
            }
            found
        };

        let d = Image::default();
        let corners = value
            .get("corners")
            .map(decode_vec2_array)
            .and_then(|c| <[Vec2; 4]>::try_from(c).ok())
            .unwrap_or(d.corners);
        let indices = entries(value, "glDrawElements")
            .iter()
            .filter_map(|i| i.as_u64().and_then(|i| u16::try_from(i).ok()))
            .collect();
        let image = Image {
            file: value
                .get("file")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            body,
            center: vec2_or(value, "center", d.center),
            angle: float_or(value, "angle", d.angle),
            scale: float_or(value, "scale", d.scale),
            aspect_scale: float_or(value, "aspectScale", d.aspect_scale),
            corners,
            color_tint: value
                .get("colorTint")
                .and_then(color_of)
                .unwrap_or(d.color_tint),
            opacity: float_or(value, "opacity", d.opacity),
            render_order: float_or(value, "renderOrder", d.render_order),
            flip: bool_or(value, "flip", d.flip),
            filter: ImageFilter::from_index(int_or(value, "filter", d.filter.index())),
            points: value
                .get("glVertexPointer")
                .map(decode_float_array)
                .unwrap_or_default(),
            uv_coords: value
                .get("glTexCoordPointer")
                .map(decode_float_array)
                .unwrap_or_default(),
            indices,
            ..d
        };

        match self.scene.world.add_image(image) {
            Ok(id) => {
                self.metadata(value, id.into());
                Ok(())
            }
            // Bodies come from the list decoded above, so this cannot miss.
            Err(e) => Err(CodecError::InvalidDocument(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenejson_common::EntityKind;
    use serde_json::json;

    fn read(doc: Value) -> Decoded {
        WorldReader::default().read_value(&doc).unwrap()
    }

    fn two_bodies() -> Value {
        json!([{"type": 2}, {"type": 0, "position": {"x": 1, "y": "40000000"}}])
    }

    #[test]
    fn circle_document_decodes() {
        let decoded = read(json!({
            "body": [{"type": 0, "fixture": [{"circle": {"radius": "3F000000"}}]}]
        }));
        assert!(decoded.is_clean());
        let world = &decoded.scene.world;
        assert_eq!(world.body_count(), 1);
        let body = &world.bodies()[0];
        assert_eq!(body.body_type, BodyType::Static);
        assert_eq!(body.position, Vec2::ZERO);
        match &body.fixtures[0].shape {
            Shape::Circle(c) => {
                assert_eq!(c.radius, 0.5);
                assert_eq!(c.center, Vec2::ZERO);
            }
            other => panic!("expected a circle, got {other:?}"),
        }
        assert_eq!(body.fixtures[0].filter, Filter::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let decoded = read(json!({"body": [{}]}));
        let body = &decoded.scene.world.bodies()[0];
        assert_eq!(body.gravity_scale, 1.0);
        assert!(body.allow_sleep);
        assert!(body.active);
        assert!(!body.awake);
        assert_eq!(decoded.scene.world.gravity, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn polygon_with_two_vertices_becomes_edge() {
        let decoded = read(json!({
            "body": [{"fixture": [
                {"polygon": {"vertices": {"x": [0, 1], "y": [0, 0]}}},
                {"polygon": {"vertices": {"x": [0], "y": [0]}}},
                {"polygon": {"vertices": {"x": [0, 1, 2, 3, 4, 5, 6, 7, 8], "y": [0, 0, 1, 2, 3, 4, 5, 6, 7]}}}
            ]}]
        }));
        let body = &decoded.scene.world.bodies()[0];
        assert_eq!(body.fixtures.len(), 1);
        assert!(matches!(body.fixtures[0].shape, Shape::Edge(_)));
        assert_eq!(
            decoded.diagnostics,
            vec![
                Diagnostic::DegeneratePolygon { body: 0, fixture: 1, vertices: 1 },
                Diagnostic::OversizedPolygon { body: 0, fixture: 2, vertices: 9 },
            ]
        );
    }

    #[test]
    fn fixture_without_shape_is_dropped() {
        let decoded = read(json!({"body": [{"fixture": [{"density": 1}]}]}));
        assert_eq!(decoded.scene.world.fixture_count(), 0);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::MissingShape { body: 0, fixture: 0 }]
        );
    }

    #[test]
    fn legacy_loop_becomes_closed_chain() {
        let decoded = read(json!({
            "body": [{"fixture": [{"loop": {"vertices": {"x": [0, 1, 1], "y": [0, 0, 1]}}}]}]
        }));
        match &decoded.scene.world.bodies()[0].fixtures[0].shape {
            Shape::Chain(c) => {
                assert!(c.is_loop());
                assert_eq!(c.vertices.len(), 4);
            }
            other => panic!("expected a chain, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_body_reference_skips_joint() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [
                {"type": "revolute", "bodyA": 0, "bodyB": 7},
                {"type": "weld", "bodyA": 0, "bodyB": 1}
            ]
        }));
        assert_eq!(decoded.scene.world.joint_count(), 1);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::BodyIndexOutOfRange {
                joint: 0,
                field: "bodyB",
                index: 7,
                count: 2
            }]
        );
    }

    #[test]
    fn out_of_range_body_a_skips_only_that_joint() {
        let entries = json!([
            {"type": "revolute", "bodyA": 2, "bodyB": 0},
            {"type": "weld", "bodyA": -3, "bodyB": 1},
            {"type": "rope", "bodyA": 1, "bodyB": 0},
            {"type": "distance", "bodyA": 0, "bodyB": 1}
        ]);
        let decoded = read(json!({"body": two_bodies(), "joint": entries.clone()}));
        let skipped = decoded
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::BodyIndexOutOfRange { field: "bodyA", .. }))
            .count();
        assert_eq!(skipped, 2);
        assert_eq!(decoded.diagnostics.len(), skipped);
        let total = entries.as_array().unwrap().len();
        assert_eq!(decoded.scene.world.joint_count(), total - skipped);
        assert_eq!(
            decoded.diagnostics[0],
            Diagnostic::BodyIndexOutOfRange {
                joint: 0,
                field: "bodyA",
                index: 2,
                count: 2
            }
        );
        let kinds: Vec<JointType> = decoded.scene.world.joints().iter().map(Joint::joint_type).collect();
        assert_eq!(kinds, vec![JointType::Rope, JointType::Distance]);
    }

    #[test]
    fn filter_bits_out_of_range_fall_back_to_defaults() {
        let doc = json!({"body": [{"fixture": [{
            "circle": {"radius": 1},
            "filter-categoryBits": -1,
            "filter-maskBits": 65537,
            "filter-groupIndex": -32768
        }]}]});
        let decoded = read(doc.clone());
        let filter = decoded.scene.world.bodies()[0].fixtures[0].filter;
        assert_eq!(filter.category_bits, Filter::default().category_bits);
        assert_eq!(filter.mask_bits, Filter::default().mask_bits);
        assert_eq!(filter.group_index, i16::MIN);
        assert_eq!(
            decoded.diagnostics,
            vec![
                Diagnostic::FilterOutOfRange {
                    body: 0,
                    fixture: 0,
                    field: "filter-categoryBits",
                    value: -1
                },
                Diagnostic::FilterOutOfRange {
                    body: 0,
                    fixture: 0,
                    field: "filter-maskBits",
                    value: 65537
                },
            ]
        );
        assert!(matches!(
            WorldReader::strict().read_value(&doc),
            Err(CodecError::InvalidDocument(_))
        ));
    }

    #[test]
    fn unknown_and_missing_joint_types_are_skipped() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [
                {"type": "spring", "bodyA": 0, "bodyB": 1},
                {"bodyA": 0, "bodyB": 1},
                {"type": "rope", "bodyA": 0, "bodyB": 1, "maxLength": "40400000"}
            ]
        }));
        let joints = decoded.scene.world.joints();
        assert_eq!(joints.len(), 1);
        assert!(matches!(joints[0].kind, JointKind::Rope(r) if r.max_length == 3.0));
        assert_eq!(decoded.diagnostics.len(), 2);
        assert!(matches!(
            &decoded.diagnostics[0],
            Diagnostic::UnknownJointType { joint: 0, name } if name == "spring"
        ));
        assert_eq!(decoded.diagnostics[1], Diagnostic::MissingJointType { joint: 1 });
    }

    #[test]
    fn gear_resolves_after_other_joints_regardless_of_position() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [
                {"type": "gear", "bodyA": 0, "bodyB": 1, "joint1": 0, "joint2": 1, "ratio": "40000000"},
                {"type": "revolute", "bodyA": 0, "bodyB": 1},
                {"type": "prismatic", "bodyA": 0, "bodyB": 1}
            ]
        }));
        assert!(decoded.is_clean());
        let world = &decoded.scene.world;
        let gear = &world.joints()[2];
        let (j1, j2) = gear.geared_joints().unwrap();
        assert_eq!(world.joint(j1).unwrap().joint_type(), JointType::Revolute);
        assert_eq!(world.joint(j2).unwrap().joint_type(), JointType::Prismatic);
        assert!(matches!(gear.kind, JointKind::Gear(g) if g.ratio == 2.0));
    }

    #[test]
    fn gear_with_bad_joint_index_is_skipped() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [
                {"type": "revolute", "bodyA": 0, "bodyB": 1},
                {"type": "gear", "bodyA": 0, "bodyB": 1, "joint1": 0, "joint2": 5}
            ]
        }));
        assert_eq!(decoded.scene.world.joint_count(), 1);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::JointIndexOutOfRange {
                joint: 1,
                field: "joint2",
                index: 5,
                count: 1
            }]
        );
    }

    #[test]
    fn mouse_target_survives_grab() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [{"type": "mouse", "bodyA": 0, "bodyB": 1,
                       "target": {"x": "40A00000", "y": 1}, "maxForce": "42C80000"}]
        }));
        let JointKind::Mouse(mouse) = decoded.scene.world.joints()[0].kind else {
            panic!("expected a mouse joint");
        };
        assert_eq!(mouse.target, Vec2::new(5.0, 1.0));
        assert_eq!(mouse.anchor_b, Vec2::new(1.0, 2.0));
        assert_eq!(mouse.max_force, 100.0);
    }

    #[test]
    fn legacy_axis_and_offset_keys() {
        let decoded = read(json!({
            "body": two_bodies(),
            "joint": [
                {"type": "prismatic", "bodyA": 0, "bodyB": 1, "localAxis1": {"x": 0, "y": "40000000"}},
                {"type": "motor", "bodyA": 0, "bodyB": 1, "anchorA": {"x": 1, "y": 1}, "refAngle": "3F000000"}
            ]
        }));
        let joints = decoded.scene.world.joints();
        assert!(matches!(joints[0].kind, JointKind::Prismatic(p) if p.local_axis_a == Vec2::Y));
        let JointKind::Motor(motor) = joints[1].kind else {
            panic!("expected a motor joint");
        };
        assert_eq!(motor.linear_offset, Vec2::ONE);
        assert_eq!(motor.angular_offset, 0.5);
    }

    #[test]
    fn image_with_bad_body_is_unbound() {
        let decoded = read(json!({
            "body": two_bodies(),
            "image": [
                {"file": "a.png", "body": 1, "colorTint": [10, 20, 30, 40]},
                {"file": "b.png", "body": 9}
            ]
        }));
        let world = &decoded.scene.world;
        let images = world.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].body, Some(world.bodies()[1].id));
        assert_eq!(images[0].color_tint, Color4::new(10, 20, 30, 40));
        assert_eq!(images[1].body, None);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::ImageBodyOutOfRange {
                image: 1,
                index: 9,
                count: 2
            }]
        );
    }

    #[test]
    fn custom_properties_keep_types_apart() {
        let decoded = read(json!({
            "body": [{"name": "crate", "path": "/props", "customProperties": [
                {"name": "weight", "int": 3},
                {"name": "weight", "float": "3F000000"},
                {"name": "tint", "color": [1, 2, 3, 4]},
                {"int": 9}
            ]}],
            "customProperties": [{"name": "gravityOn", "bool": true}]
        }));
        let scene = &decoded.scene;
        let body = scene.names.body_by_name("crate").unwrap();
        assert_eq!(scene.names.path(body), Some("/props"));
        assert_eq!(scene.properties.get(body, "weight", 0i32), 3);
        assert_eq!(scene.properties.get(body, "weight", 0.0f32), 0.5);
        assert_eq!(
            scene.properties.get(body, "tint", Color4::WHITE),
            Color4::new(1, 2, 3, 4)
        );
        assert_eq!(scene.properties.properties_of(body).count(), 3);
        assert!(scene.properties.get(EntityRef::World, "gravityOn", false));
        assert_eq!(
            scene.properties.query_by_value(EntityKind::Body, "weight", &3i32),
            vec![EntityRef::Body(body)]
        );
    }

    #[test]
    fn unknown_body_type_decodes_as_static() {
        let decoded = read(json!({"body": [{"type": 5}, {"type": 1}]}));
        let bodies = decoded.scene.world.bodies();
        assert_eq!(bodies[0].body_type, BodyType::Static);
        assert_eq!(bodies[1].body_type, BodyType::Kinematic);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::UnknownBodyType { body: 0, value: 5 }]
        );
    }

    #[test]
    fn malformed_body_keeps_indices_aligned() {
        let decoded = read(json!({
            "body": ["junk", {"type": 2}],
            "joint": [{"type": "weld", "bodyA": 0, "bodyB": 1}]
        }));
        let world = &decoded.scene.world;
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.bodies()[1].body_type, BodyType::Dynamic);
        assert_eq!(world.joints()[0].body_b, world.bodies()[1].id);
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::MalformedEntry { section: "body", index: 0 }]
        );
    }

    #[test]
    fn null_document_is_an_empty_scene() {
        let decoded = read(Value::Null);
        assert_eq!(decoded.scene.world.body_count(), 0);
        assert_eq!(decoded.diagnostics, vec![Diagnostic::NullDocument]);
    }

    #[test]
    fn non_object_document_is_an_error() {
        let err = WorldReader::default().read_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDocument(msg) if msg.contains("array")));
        assert!(matches!(
            WorldReader::default().read_str("{ not json"),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn strict_mode_fails_on_first_diagnostic() {
        let doc = json!({"body": two_bodies(), "joint": [{"type": "spring", "bodyA": 0, "bodyB": 1}]});
        let err = WorldReader::strict().read_value(&doc).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDocument(msg) if msg.contains("spring")));
    }

    #[test]
    fn read_into_replaces_scene_only_on_success() {
        let reader = WorldReader::default();
        let mut scene = Scene::new();
        scene.world.add_body(Body::default());
        scene.names.set_name(EntityRef::World, "old");

        let diagnostics = reader
            .read_into(&json!({"body": [{}, {}, {}]}), &mut scene)
            .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(scene.world.body_count(), 3);
        assert!(scene.names.is_empty());

        let bad = json!({"body": [{"type": 9}]});
        assert!(WorldReader::strict().read_into(&bad, &mut scene).is_err());
        assert_eq!(scene.world.body_count(), 3);
    }

    #[test]
    fn read_file_errors() {
        let reader = WorldReader::default();
        assert!(matches!(reader.read_file(""), Err(CodecError::EmptyPath)));
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(reader.read_file(&missing), Err(CodecError::Io { .. })));
    }
}
