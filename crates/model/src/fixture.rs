use glam::Vec2;
use scenejson_common::FixtureId;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Largest vertex count a polygon shape may have.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Collision filtering data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub category_bits: u16,
    pub mask_bits: u16,
    pub group_index: i16,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            mask_bits: 0xffff,
            group_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
}

/// A line segment with optional ghost neighbours for smooth collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeShape {
    pub vertex1: Vec2,
    pub vertex2: Vec2,
    pub vertex0: Option<Vec2>,
    pub vertex3: Option<Vec2>,
}

/// A polyline. A closed loop repeats its first vertex at the end and has
/// both ghost vertices set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainShape {
    pub vertices: Vec<Vec2>,
    pub prev_vertex: Option<Vec2>,
    pub next_vertex: Option<Vec2>,
}

impl ChainShape {
    pub fn is_loop(&self) -> bool {
        let n = self.vertices.len();
        n >= 3
            && self.vertices[0] == self.vertices[n - 1]
            && self.prev_vertex.is_some()
            && self.next_vertex.is_some()
    }
}

/// A convex polygon with 3 to [`MAX_POLYGON_VERTICES`] vertices. The vertex
/// count is checked on construction and the vertices are read-only after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct PolygonShape {
    vertices: Vec<Vec2>,
}

impl PolygonShape {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, ModelError> {
        match vertices.len() {
            n if n > MAX_POLYGON_VERTICES => Err(ModelError::TooManyPolygonVertices(n)),
            n if n < 3 => Err(ModelError::TooFewPolygonVertices(n)),
            _ => Ok(Self { vertices }),
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }
}

impl TryFrom<Vec<Vec2>> for PolygonShape {
    type Error = ModelError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<PolygonShape> for Vec<Vec2> {
    fn from(polygon: PolygonShape) -> Self {
        polygon.vertices
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(CircleShape),
    Edge(EdgeShape),
    Chain(ChainShape),
    Polygon(PolygonShape),
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle(CircleShape { center, radius })
    }

    pub fn edge(vertex1: Vec2, vertex2: Vec2) -> Self {
        Self::Edge(EdgeShape {
            vertex1,
            vertex2,
            vertex0: None,
            vertex3: None,
        })
    }

    /// Open chain through `vertices`, no ghost vertices.
    pub fn chain(vertices: Vec<Vec2>) -> Self {
        Self::Chain(ChainShape {
            vertices,
            prev_vertex: None,
            next_vertex: None,
        })
    }

    /// Closed loop through `vertices`. The first vertex is repeated at the
    /// end and the ghost vertices wrap around.
    pub fn chain_loop(mut vertices: Vec<Vec2>) -> Self {
        let Some(&first) = vertices.first() else {
            return Self::chain(vertices);
        };
        vertices.push(first);
        let n = vertices.len();
        let prev_vertex = (n >= 2).then(|| vertices[n - 2]);
        let next_vertex = vertices.get(1).copied();
        Self::Chain(ChainShape {
            vertices,
            prev_vertex,
            next_vertex,
        })
    }

    /// Build a polygon. Exactly two vertices degrade to an edge; fewer than
    /// two or more than [`MAX_POLYGON_VERTICES`] are rejected.
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, ModelError> {
        if let [v1, v2] = vertices[..] {
            return Ok(Self::edge(v1, v2));
        }
        PolygonShape::new(vertices).map(Self::Polygon)
    }

    /// Axis-aligned box centred on the origin.
    pub fn rect(half_width: f32, half_height: f32) -> Self {
        Self::Polygon(PolygonShape {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
        })
    }

    /// Document key of this shape variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Edge(_) => "edge",
            Self::Chain(_) => "chain",
            Self::Polygon(_) => "polygon",
        }
    }
}

/// One collision shape plus material and filter data, owned by a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub shape: Shape,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    pub sensor: bool,
    pub filter: Filter,
}

impl Fixture {
    pub fn new(shape: Shape) -> Self {
        Self {
            id: FixtureId::new(),
            shape,
            restitution: 0.0,
            friction: 0.0,
            density: 0.0,
            sensor: false,
            filter: Filter::default(),
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn polygon_accepts_three_to_eight() {
        assert!(matches!(Shape::polygon(square()), Ok(Shape::Polygon(_))));
        let eight: Vec<Vec2> = (0..8).map(|i| Vec2::new(i as f32, 0.0)).collect();
        assert!(matches!(Shape::polygon(eight), Ok(Shape::Polygon(_))));
    }

    #[test]
    fn polygon_with_two_vertices_is_edge() {
        let shape = Shape::polygon(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]).unwrap();
        match shape {
            Shape::Edge(e) => {
                assert_eq!(e.vertex1, Vec2::new(1.0, 2.0));
                assert_eq!(e.vertex2, Vec2::new(3.0, 4.0));
            }
            other => panic!("expected edge, got {other:?}"),
        }
    }

    #[test]
    fn polygon_rejects_degenerate_and_oversized() {
        assert!(matches!(
            Shape::polygon(vec![Vec2::ZERO]),
            Err(ModelError::TooFewPolygonVertices(1))
        ));
        let nine: Vec<Vec2> = (0..9).map(|i| Vec2::new(i as f32, 0.0)).collect();
        assert!(matches!(
            Shape::polygon(nine),
            Err(ModelError::TooManyPolygonVertices(9))
        ));
    }

    #[test]
    fn polygon_shape_checks_vertex_count() {
        assert!(matches!(
            PolygonShape::new(vec![Vec2::ZERO, Vec2::X]),
            Err(ModelError::TooFewPolygonVertices(2))
        ));
        let nine: Vec<Vec2> = (0..9).map(|i| Vec2::new(i as f32, 0.0)).collect();
        assert!(PolygonShape::new(nine.clone()).is_err());
        assert_eq!(PolygonShape::new(square()).unwrap().vertices(), &square()[..]);

        let text = serde_json::to_string(&nine).unwrap();
        assert!(serde_json::from_str::<PolygonShape>(&text).is_err());
    }

    #[test]
    fn chain_loop_closes_and_sets_ghosts() {
        let Shape::Chain(chain) = Shape::chain_loop(square()) else {
            panic!("expected chain");
        };
        assert_eq!(chain.vertices.len(), 5);
        assert_eq!(chain.vertices[0], chain.vertices[4]);
        assert_eq!(chain.prev_vertex, Some(Vec2::new(0.0, 1.0)));
        assert_eq!(chain.next_vertex, Some(Vec2::new(1.0, 0.0)));
        assert!(chain.is_loop());
    }

    #[test]
    fn open_chain_is_not_loop() {
        let Shape::Chain(chain) = Shape::chain(square()) else {
            panic!("expected chain");
        };
        assert!(!chain.is_loop());
    }

    #[test]
    fn fixture_defaults() {
        let f = Fixture::new(Shape::rect(1.0, 1.0));
        assert_eq!(f.filter, Filter::default());
        assert_eq!(f.density, 0.0);
        assert!(!f.sensor);
        assert_eq!(f.shape.kind_name(), "polygon");
    }
}
