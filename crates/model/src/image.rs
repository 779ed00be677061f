use glam::Vec2;
use scenejson_common::{BodyId, Color4, ImageId};
use serde::{Deserialize, Serialize};

use crate::body::Body;

/// Texture sampling filter. The integer values are the ones documents carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageFilter {
    Nearest,
    #[default]
    Linear,
}

impl ImageFilter {
    pub fn index(self) -> i64 {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
        }
    }

    /// Unrecognised values fall back to linear filtering.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Self::Nearest,
            _ => Self::Linear,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub lower: Vec2,
    pub upper: Vec2,
}

impl Aabb {
    pub fn center(&self) -> Vec2 {
        0.5 * (self.lower + self.upper)
    }

    pub fn extents(&self) -> Vec2 {
        0.5 * (self.upper - self.lower)
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.lower.cmple(other.lower).all() && other.upper.cmple(self.upper).all()
    }
}

/// A textured quad overlaid on the scene, optionally following a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub file: String,
    pub body: Option<BodyId>,
    pub center: Vec2,
    pub angle: f32,
    pub scale: f32,
    pub aspect_scale: f32,
    pub corners: [Vec2; 4],
    pub color_tint: Color4,
    pub opacity: f32,
    pub render_order: f32,
    pub flip: bool,
    pub filter: ImageFilter,
    /// Interleaved x,y render positions.
    pub points: Vec<f32>,
    /// Interleaved u,v texture coordinates, one pair per point.
    pub uv_coords: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            id: ImageId::new(),
            file: String::new(),
            body: None,
            center: Vec2::ZERO,
            angle: 0.0,
            scale: 1.0,
            aspect_scale: 1.0,
            corners: [Vec2::ZERO; 4],
            color_tint: Color4::WHITE,
            opacity: 1.0,
            render_order: 0.0,
            flip: false,
            filter: ImageFilter::Linear,
            points: Vec::new(),
            uv_coords: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl Image {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Number of mesh points (pairs in `points`).
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    fn quad(&self, aspect: f32) -> [Vec2; 4] {
        let hx = 0.5 * aspect;
        let hy = 0.5;
        let rot = Vec2::from_angle(self.angle);
        [
            Vec2::new(-hx, -hy),
            Vec2::new(hx, -hy),
            Vec2::new(hx, hy),
            Vec2::new(-hx, hy),
        ]
        .map(|v| rot.rotate(v * self.scale) + self.center)
    }

    /// Recompute the four corners from center, angle and scale.
    pub fn update_corners(&mut self, aspect: f32) {
        self.corners = self.quad(aspect);
    }

    /// Rebuild the render mesh as a two-triangle quad.
    pub fn update_uvs(&mut self, aspect: f32) {
        let verts = self.quad(aspect);
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        self.points = verts.iter().flat_map(|v| [v.x, v.y]).collect();
        self.uv_coords = uvs.iter().flat_map(|v| [v.x, v.y]).collect();
        self.indices = vec![0, 1, 2, 2, 3, 0];
    }

    /// World-space bounds of the corners. `body` must be the body this image
    /// is bound to, or `None` for an unbound image.
    pub fn aabb(&self, body: Option<&Body>) -> Aabb {
        let mut lower = Vec2::splat(f32::MAX);
        let mut upper = Vec2::splat(-f32::MAX);
        for corner in self.corners {
            let p = match body {
                Some(b) => b.world_point(corner),
                None => corner,
            };
            lower = lower.min(p);
            upper = upper.max(p);
        }
        Aabb { lower, upper }
    }
}
