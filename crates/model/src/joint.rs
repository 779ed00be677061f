use glam::Vec2;
use scenejson_common::{BodyId, JointId};
use serde::{Deserialize, Serialize};

use crate::body::Body;

/// Joint discriminator as carried by the document's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointType {
    Revolute,
    Prismatic,
    Distance,
    Pulley,
    Mouse,
    Gear,
    Wheel,
    Motor,
    Weld,
    Friction,
    Rope,
}

impl JointType {
    pub const ALL: [JointType; 11] = [
        Self::Revolute,
        Self::Prismatic,
        Self::Distance,
        Self::Pulley,
        Self::Mouse,
        Self::Gear,
        Self::Wheel,
        Self::Motor,
        Self::Weld,
        Self::Friction,
        Self::Rope,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Prismatic => "prismatic",
            Self::Distance => "distance",
            Self::Pulley => "pulley",
            Self::Mouse => "mouse",
            Self::Gear => "gear",
            Self::Wheel => "wheel",
            Self::Motor => "motor",
            Self::Weld => "weld",
            Self::Friction => "friction",
            Self::Rope => "rope",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Translation axes are unit length. Axes already within glam's
/// normalisation tolerance are returned bit for bit, a zero axis becomes x.
pub fn unit_axis(axis: Vec2) -> Vec2 {
    if axis.is_normalized() {
        axis
    } else {
        axis.try_normalize().unwrap_or(Vec2::X)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RevoluteJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub reference_angle: f32,
    pub enable_limit: bool,
    pub lower_angle: f32,
    pub upper_angle: f32,
    pub enable_motor: bool,
    pub motor_speed: f32,
    pub max_motor_torque: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrismaticJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub local_axis_a: Vec2,
    pub reference_angle: f32,
    pub enable_limit: bool,
    pub lower_translation: f32,
    pub upper_translation: f32,
    pub enable_motor: bool,
    pub max_motor_force: f32,
    pub motor_speed: f32,
}

impl Default for PrismaticJoint {
    fn default() -> Self {
        Self {
            local_anchor_a: Vec2::ZERO,
            local_anchor_b: Vec2::ZERO,
            local_axis_a: Vec2::X,
            reference_angle: 0.0,
            enable_limit: false,
            lower_translation: 0.0,
            upper_translation: 0.0,
            enable_motor: false,
            max_motor_force: 0.0,
            motor_speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub length: f32,
    pub frequency: f32,
    pub damping_ratio: f32,
}

impl PrismaticJoint {
    /// The translation axis as the joint uses it, see [`unit_axis`].
    pub fn axis(&self) -> Vec2 {
        unit_axis(self.local_axis_a)
    }
}

impl Default for DistanceJoint {
    fn default() -> Self {
        Self {
            local_anchor_a: Vec2::ZERO,
            local_anchor_b: Vec2::ZERO,
            length: 1.0,
            frequency: 0.0,
            damping_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulleyJoint {
    pub ground_anchor_a: Vec2,
    pub ground_anchor_b: Vec2,
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub length_a: f32,
    pub length_b: f32,
    pub ratio: f32,
}

impl Default for PulleyJoint {
    fn default() -> Self {
        Self {
            ground_anchor_a: Vec2::new(-1.0, 1.0),
            ground_anchor_b: Vec2::new(1.0, 1.0),
            local_anchor_a: Vec2::new(-1.0, 0.0),
            local_anchor_b: Vec2::new(1.0, 0.0),
            length_a: 0.0,
            length_b: 0.0,
            ratio: 1.0,
        }
    }
}

/// Drags body B towards a world-space target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseJoint {
    pub target: Vec2,
    pub anchor_b: Vec2,
    pub max_force: f32,
    pub frequency: f32,
    pub damping_ratio: f32,
}

impl Default for MouseJoint {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            anchor_b: Vec2::ZERO,
            max_force: 0.0,
            frequency: 5.0,
            damping_ratio: 0.7,
        }
    }
}

impl MouseJoint {
    /// A mouse joint grabbing `body` at its origin. The target starts on the
    /// body, so callers restoring a saved target must apply it afterwards.
    pub fn grabbing(body: &Body) -> Self {
        Self {
            target: body.position,
            anchor_b: body.position,
            ..Default::default()
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }
}

/// Couples two other joints through a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearJoint {
    pub joint1: JointId,
    pub joint2: JointId,
    pub ratio: f32,
}

impl GearJoint {
    pub fn new(joint1: JointId, joint2: JointId, ratio: f32) -> Self {
        Self {
            joint1,
            joint2,
            ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub local_axis_a: Vec2,
    pub enable_motor: bool,
    pub motor_speed: f32,
    pub max_motor_torque: f32,
    pub spring_frequency: f32,
    pub spring_damping_ratio: f32,
}

impl Default for WheelJoint {
    fn default() -> Self {
        Self {
            local_anchor_a: Vec2::ZERO,
            local_anchor_b: Vec2::ZERO,
            local_axis_a: Vec2::X,
            enable_motor: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
            spring_frequency: 2.0,
            spring_damping_ratio: 0.7,
        }
    }
}

impl WheelJoint {
    /// The suspension axis as the joint uses it, see [`unit_axis`].
    pub fn axis(&self) -> Vec2 {
        unit_axis(self.local_axis_a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorJoint {
    pub linear_offset: Vec2,
    pub angular_offset: f32,
    pub max_force: f32,
    pub max_torque: f32,
    pub correction_factor: f32,
}

impl Default for MotorJoint {
    fn default() -> Self {
        Self {
            linear_offset: Vec2::ZERO,
            angular_offset: 0.0,
            max_force: 1.0,
            max_torque: 1.0,
            correction_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeldJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub reference_angle: f32,
    pub frequency: f32,
    pub damping_ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrictionJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub max_force: f32,
    pub max_torque: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RopeJoint {
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    pub max_length: f32,
}

/// Type-specific joint parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JointKind {
    Revolute(RevoluteJoint),
    Prismatic(PrismaticJoint),
    Distance(DistanceJoint),
    Pulley(PulleyJoint),
    Mouse(MouseJoint),
    Gear(GearJoint),
    Wheel(WheelJoint),
    Motor(MotorJoint),
    Weld(WeldJoint),
    Friction(FrictionJoint),
    Rope(RopeJoint),
}

impl JointKind {
    pub fn joint_type(&self) -> JointType {
        match self {
            Self::Revolute(_) => JointType::Revolute,
            Self::Prismatic(_) => JointType::Prismatic,
            Self::Distance(_) => JointType::Distance,
            Self::Pulley(_) => JointType::Pulley,
            Self::Mouse(_) => JointType::Mouse,
            Self::Gear(_) => JointType::Gear,
            Self::Wheel(_) => JointType::Wheel,
            Self::Motor(_) => JointType::Motor,
            Self::Weld(_) => JointType::Weld,
            Self::Friction(_) => JointType::Friction,
            Self::Rope(_) => JointType::Rope,
        }
    }

    /// Replace translation axes with their unit form.
    pub fn normalize_axes(&mut self) {
        match self {
            Self::Prismatic(p) => p.local_axis_a = p.axis(),
            Self::Wheel(w) => w.local_axis_a = w.axis(),
            _ => {}
        }
    }
}

/// A constraint between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub id: JointId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub collide_connected: bool,
    pub kind: JointKind,
}

impl Joint {
    pub fn new(body_a: BodyId, body_b: BodyId, kind: JointKind) -> Self {
        Self {
            id: JointId::new(),
            body_a,
            body_b,
            collide_connected: false,
            kind,
        }
    }

    pub fn joint_type(&self) -> JointType {
        self.kind.joint_type()
    }

    pub fn is_gear(&self) -> bool {
        matches!(self.kind, JointKind::Gear(_))
    }

    /// The two joints a gear couples, if this is a gear joint.
    pub fn geared_joints(&self) -> Option<(JointId, JointId)> {
        match self.kind {
            JointKind::Gear(g) => Some((g.joint1, g.joint2)),
            _ => None,
        }
    }

    pub fn connects(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_normalized_once() {
        assert_eq!(unit_axis(Vec2::new(0.0, 2.0)), Vec2::Y);
        assert_eq!(unit_axis(Vec2::ZERO), Vec2::X);
        let tilted = unit_axis(Vec2::new(3.0, 4.0));
        assert_eq!(unit_axis(tilted).to_array().map(f32::to_bits), tilted.to_array().map(f32::to_bits));

        let mut kind = JointKind::Wheel(WheelJoint {
            local_axis_a: Vec2::new(-5.0, 0.0),
            ..Default::default()
        });
        kind.normalize_axes();
        assert!(matches!(kind, JointKind::Wheel(w) if w.local_axis_a == Vec2::NEG_X));
    }

    #[test]
    fn joint_type_names_roundtrip() {
        for t in JointType::ALL {
            assert_eq!(JointType::from_name(t.name()), Some(t));
        }
        assert_eq!(JointType::from_name("spring"), None);
    }

    #[test]
    fn gear_exposes_coupled_joints() {
        let (j1, j2) = (JointId::new(), JointId::new());
        let gear = Joint::new(
            BodyId::new(),
            BodyId::new(),
            JointKind::Gear(GearJoint::new(j1, j2, 2.0)),
        );
        assert!(gear.is_gear());
        assert_eq!(gear.geared_joints(), Some((j1, j2)));
        assert_eq!(gear.joint_type(), JointType::Gear);
    }

    #[test]
    fn mouse_target_starts_on_body() {
        let body = Body {
            position: Vec2::new(4.0, 5.0),
            ..Default::default()
        };
        let mut mouse = MouseJoint::grabbing(&body);
        assert_eq!(mouse.target, Vec2::new(4.0, 5.0));
        mouse.set_target(Vec2::new(-1.0, 0.5));
        assert_eq!(mouse.target, Vec2::new(-1.0, 0.5));
    }

    #[test]
    fn connects_either_body() {
        let (a, b) = (BodyId::new(), BodyId::new());
        let j = Joint::new(a, b, JointKind::Rope(RopeJoint::default()));
        assert!(j.connects(a));
        assert!(j.connects(b));
        assert!(!j.connects(BodyId::new()));
    }
}
