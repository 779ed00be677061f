use glam::Vec2;
use scenejson_common::{BodyId, FixtureId, ImageId, JointId};
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::error::ModelError;
use crate::fixture::{Fixture, Shape};
use crate::image::Image;
use crate::joint::{Joint, JointKind};

/// The scene's physics world: global settings plus the ordered entity lists.
///
/// Order matters: the position of a body or joint in its list is the index
/// documents use to cross-reference it. Bodies, joints and images are kept
/// in insertion order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsWorld {
    pub gravity: Vec2,
    pub allow_sleep: bool,
    pub auto_clear_forces: bool,
    pub warm_starting: bool,
    pub continuous_physics: bool,
    pub sub_stepping: bool,
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    images: Vec<Image>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -10.0),
            allow_sleep: true,
            auto_clear_forces: true,
            warm_starting: true,
            continuous_physics: true,
            sub_stepping: false,
            bodies: Vec::new(),
            joints: Vec::new(),
            images: Vec::new(),
        }
    }
}

impl PhysicsWorld {
    /// Create an empty world with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn fixture_count(&self) -> usize {
        self.bodies.iter().map(|b| b.fixtures.len()).sum()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Iterate every fixture together with its owning body, in body order.
    pub fn fixtures(&self) -> impl Iterator<Item = (&Body, &Fixture)> {
        self.bodies
            .iter()
            .flat_map(|b| b.fixtures.iter().map(move |f| (b, f)))
    }

    /// Append a body. Returns its id.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = body.id;
        self.bodies.push(body);
        id
    }

    /// Append a joint after checking that everything it references exists.
    /// Translation axes are stored normalised.
    pub fn add_joint(&mut self, mut joint: Joint) -> Result<JointId, ModelError> {
        for body in [joint.body_a, joint.body_b] {
            if self.body(body).is_none() {
                return Err(ModelError::BodyNotFound(body));
            }
        }
        if let Some((j1, j2)) = joint.geared_joints() {
            for other in [j1, j2] {
                if self.joint(other).is_none() {
                    return Err(ModelError::JointNotFound(other));
                }
            }
        }
        joint.kind.normalize_axes();
        let id = joint.id;
        self.joints.push(joint);
        Ok(id)
    }

    /// Append an image. A bound body must exist.
    pub fn add_image(&mut self, image: Image) -> Result<ImageId, ModelError> {
        if let Some(body) = image.body {
            if self.body(body).is_none() {
                return Err(ModelError::BodyNotFound(body));
            }
        }
        let id = image.id;
        self.images.push(image);
        Ok(id)
    }

    /// Convenience: attach a fixture to an existing body.
    pub fn add_fixture(&mut self, body: BodyId, fixture: Fixture) -> Result<FixtureId, ModelError> {
        let b = self.body_mut(body).ok_or(ModelError::BodyNotFound(body))?;
        Ok(b.add_fixture(fixture))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.iter().find(|j| j.id == id)
    }

    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.iter_mut().find(|j| j.id == id)
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.images.iter_mut().find(|i| i.id == id)
    }

    /// Find a fixture and the body owning it.
    pub fn fixture(&self, id: FixtureId) -> Option<(&Body, &Fixture)> {
        self.fixtures().find(|(_, f)| f.id == id)
    }

    /// Position of a body in the body list.
    pub fn body_index(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// Position of a joint in the joint list.
    pub fn joint_index(&self, id: JointId) -> Option<usize> {
        self.joints.iter().position(|j| j.id == id)
    }

    /// Remove a body. Joints attached to it are removed as well (and gear
    /// joints coupling those joints), and images bound to it become unbound.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.body_index(id)?;
        let body = self.bodies.remove(index);
        let attached: Vec<JointId> = self
            .joints
            .iter()
            .filter(|j| j.connects(id))
            .map(|j| j.id)
            .collect();
        for joint in attached {
            self.remove_joint(joint);
        }
        for image in self.images.iter_mut().filter(|i| i.body == Some(id)) {
            image.body = None;
        }
        tracing::debug!(?id, joints = self.joints.len(), "body removed");
        Some(body)
    }

    /// Remove a joint and, transitively, every gear joint coupling it.
    pub fn remove_joint(&mut self, id: JointId) -> Option<Joint> {
        let index = self.joint_index(id)?;
        let joint = self.joints.remove(index);
        let gears: Vec<JointId> = self
            .joints
            .iter()
            .filter(|j| matches!(j.geared_joints(), Some((a, b)) if a == id || b == id))
            .map(|j| j.id)
            .collect();
        for gear in gears {
            self.remove_joint(gear);
        }
        Some(joint)
    }

    pub fn remove_image(&mut self, id: ImageId) -> Option<Image> {
        let index = self.images.iter().position(|i| i.id == id)?;
        Some(self.images.remove(index))
    }

    /// Drop every body, joint and image. Settings are kept.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.joints.clear();
        self.images.clear();
    }

    /// Deterministic hash of the world state, independent of entity ids.
    ///
    /// Floats contribute their exact bit patterns and references contribute
    /// list positions, so two worlds fingerprint equal iff they describe the
    /// same state in the same order.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv::new();
        h.vec2(self.gravity);
        h.flags(&[
            self.allow_sleep,
            self.auto_clear_forces,
            self.warm_starting,
            self.continuous_physics,
            self.sub_stepping,
        ]);

        h.usize(self.bodies.len());
        for b in &self.bodies {
            h.i64(b.body_type.index());
            h.vec2(b.position);
            h.f32(b.angle);
            h.vec2(b.linear_velocity);
            h.f32(b.angular_velocity);
            h.f32(b.linear_damping);
            h.f32(b.angular_damping);
            h.f32(b.gravity_scale);
            h.flags(&[b.bullet, b.allow_sleep, b.awake, b.active, b.fixed_rotation]);
            h.f32(b.mass_data.mass);
            h.vec2(b.mass_data.center);
            h.f32(b.mass_data.inertia);
            h.usize(b.fixtures.len());
            for f in &b.fixtures {
                h.f32(f.restitution);
                h.f32(f.friction);
                h.f32(f.density);
                h.flags(&[f.sensor]);
                h.i64(f.filter.category_bits as i64);
                h.i64(f.filter.mask_bits as i64);
                h.i64(f.filter.group_index as i64);
                h.str(f.shape.kind_name());
                match &f.shape {
                    Shape::Circle(c) => {
                        h.vec2(c.center);
                        h.f32(c.radius);
                    }
                    Shape::Edge(e) => {
                        h.vec2(e.vertex1);
                        h.vec2(e.vertex2);
                        h.opt_vec2(e.vertex0);
                        h.opt_vec2(e.vertex3);
                    }
                    Shape::Chain(c) => {
                        h.vec2s(&c.vertices);
                        h.opt_vec2(c.prev_vertex);
                        h.opt_vec2(c.next_vertex);
                    }
                    Shape::Polygon(p) => h.vec2s(p.vertices()),
                }
            }
        }

        h.usize(self.joints.len());
        for j in &self.joints {
            h.str(j.joint_type().name());
            h.index(self.body_index(j.body_a));
            h.index(self.body_index(j.body_b));
            h.flags(&[j.collide_connected]);
            self.fingerprint_joint_kind(&mut h, &j.kind);
        }

        h.usize(self.images.len());
        for i in &self.images {
            h.str(&i.file);
            h.index(i.body.and_then(|b| self.body_index(b)));
            h.vec2(i.center);
            h.f32(i.angle);
            h.f32(i.scale);
            h.f32(i.aspect_scale);
            h.vec2s(&i.corners);
            for c in i.color_tint.to_array() {
                h.i64(c as i64);
            }
            h.f32(i.opacity);
            h.f32(i.render_order);
            h.flags(&[i.flip]);
            h.i64(i.filter.index());
            h.f32s(&i.points);
            h.f32s(&i.uv_coords);
            h.usize(i.indices.len());
            for &ix in &i.indices {
                h.i64(ix as i64);
            }
        }
        h.finish()
    }

    fn fingerprint_joint_kind(&self, h: &mut Fnv, kind: &JointKind) {
        match kind {
            JointKind::Revolute(r) => {
                h.vec2(r.local_anchor_a);
                h.vec2(r.local_anchor_b);
                h.f32(r.reference_angle);
                h.flags(&[r.enable_limit, r.enable_motor]);
                h.f32(r.lower_angle);
                h.f32(r.upper_angle);
                h.f32(r.motor_speed);
                h.f32(r.max_motor_torque);
            }
            JointKind::Prismatic(p) => {
                h.vec2(p.local_anchor_a);
                h.vec2(p.local_anchor_b);
                h.vec2(p.axis());
                h.f32(p.reference_angle);
                h.flags(&[p.enable_limit, p.enable_motor]);
                h.f32(p.lower_translation);
                h.f32(p.upper_translation);
                h.f32(p.max_motor_force);
                h.f32(p.motor_speed);
            }
            JointKind::Distance(d) => {
                h.vec2(d.local_anchor_a);
                h.vec2(d.local_anchor_b);
                h.f32(d.length);
                h.f32(d.frequency);
                h.f32(d.damping_ratio);
            }
            JointKind::Pulley(p) => {
                h.vec2(p.ground_anchor_a);
                h.vec2(p.ground_anchor_b);
                h.vec2(p.local_anchor_a);
                h.vec2(p.local_anchor_b);
                h.f32(p.length_a);
                h.f32(p.length_b);
                h.f32(p.ratio);
            }
            JointKind::Mouse(m) => {
                h.vec2(m.target);
                h.vec2(m.anchor_b);
                h.f32(m.max_force);
                h.f32(m.frequency);
                h.f32(m.damping_ratio);
            }
            JointKind::Gear(g) => {
                h.index(self.joint_index(g.joint1));
                h.index(self.joint_index(g.joint2));
                h.f32(g.ratio);
            }
            JointKind::Wheel(w) => {
                h.vec2(w.local_anchor_a);
                h.vec2(w.local_anchor_b);
                h.vec2(w.axis());
                h.flags(&[w.enable_motor]);
                h.f32(w.motor_speed);
                h.f32(w.max_motor_torque);
                h.f32(w.spring_frequency);
                h.f32(w.spring_damping_ratio);
            }
            JointKind::Motor(m) => {
                h.vec2(m.linear_offset);
                h.f32(m.angular_offset);
                h.f32(m.max_force);
                h.f32(m.max_torque);
                h.f32(m.correction_factor);
            }
            JointKind::Weld(w) => {
                h.vec2(w.local_anchor_a);
                h.vec2(w.local_anchor_b);
                h.f32(w.reference_angle);
                h.f32(w.frequency);
                h.f32(w.damping_ratio);
            }
            JointKind::Friction(f) => {
                h.vec2(f.local_anchor_a);
                h.vec2(f.local_anchor_b);
                h.f32(f.max_force);
                h.f32(f.max_torque);
            }
            JointKind::Rope(r) => {
                h.vec2(r.local_anchor_a);
                h.vec2(r.local_anchor_b);
                h.f32(r.max_length);
            }
        }
    }
}

/// FNV-1a accumulator used by [`PhysicsWorld::fingerprint`].
struct Fnv(u64);

impl Fnv {
    fn new() -> Self {
        Self(0xcbf2_9ce4_8422_2325) // FNV offset basis
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x0100_0000_01b3);
        }
    }

    fn f32(&mut self, v: f32) {
        self.bytes(&v.to_bits().to_le_bytes());
    }

    fn f32s(&mut self, vs: &[f32]) {
        self.usize(vs.len());
        for &v in vs {
            self.f32(v);
        }
    }

    fn vec2(&mut self, v: Vec2) {
        self.f32(v.x);
        self.f32(v.y);
    }

    fn vec2s(&mut self, vs: &[Vec2]) {
        self.usize(vs.len());
        for &v in vs {
            self.vec2(v);
        }
    }

    fn opt_vec2(&mut self, v: Option<Vec2>) {
        match v {
            Some(v) => {
                self.bytes(&[1]);
                self.vec2(v);
            }
            None => self.bytes(&[0]),
        }
    }

    fn i64(&mut self, v: i64) {
        self.bytes(&v.to_le_bytes());
    }

    fn usize(&mut self, v: usize) {
        self.i64(v as i64);
    }

    fn index(&mut self, v: Option<usize>) {
        self.i64(v.map_or(-1, |i| i as i64));
    }

    fn flags(&mut self, flags: &[bool]) {
        for &f in flags {
            self.bytes(&[f as u8]);
        }
    }

    fn str(&mut self, s: &str) {
        self.usize(s.len());
        self.bytes(s.as_bytes());
    }

    fn finish(self) -> u64 {
        self.0
    }
}
