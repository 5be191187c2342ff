//! Scene surfaces that rays can be cast against
//!
//! The scene graph distinguishes plain meshes, instances sharing a source
//! mesh's geometry, and everything else (lights, cameras, empty transform
//! nodes). That distinction is a closed [`Surface`] variant; only the mesh
//! kinds expose [`CastSurface`].

use glam::{Mat4, Quat, Vec3};
use navgrid_common::{ray_triangle_intersection, Aabb, Ray, TriMesh};
use std::sync::Arc;

/// Local-to-world placement of a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// The world matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A surface that can be refreshed, bounded and hit by rays
pub trait CastSurface {
    /// Surface name used for lookups and persistence
    fn name(&self) -> &str;

    /// Recomputes the cached world matrix, world bounds and world-space geometry
    fn refresh_world_matrix(&mut self);

    /// Cached world-space bounding box. `None` when the surface has no vertices.
    fn world_bounds(&self) -> Option<Aabb>;

    /// Distance along `ray` to the nearest hit within the ray length
    fn intersect_ray(&self, ray: &Ray) -> Option<f32>;
}

/// Cached world-space state derived from geometry and transform
#[derive(Debug, Clone, PartialEq)]
struct WorldCache {
    matrix: Mat4,
    bounds: Option<Aabb>,
    vertices: Vec<Vec3>,
}

impl WorldCache {
    fn compute(geometry: &TriMesh, transform: &Transform) -> Self {
        let matrix = transform.matrix();
        Self {
            matrix,
            bounds: geometry.local_bounds().map(|b| b.transformed(&matrix)),
            vertices: geometry
                .positions
                .iter()
                .map(|p| matrix.transform_point3(*p))
                .collect(),
        }
    }

    fn intersect(&self, indices: &[u32], ray: &Ray) -> Option<f32> {
        let bounds = self.bounds?;
        if !ray.intersects_aabb(&bounds) {
            return None;
        }

        indices
            .chunks_exact(3)
            .filter_map(|tri| {
                ray_triangle_intersection(
                    &ray.origin,
                    &ray.direction,
                    &self.vertices[tri[0] as usize],
                    &self.vertices[tri[1] as usize],
                    &self.vertices[tri[2] as usize],
                )
            })
            .filter(|t| *t <= ray.length)
            .min_by(f32::total_cmp)
    }
}

/// A mesh with its own geometry
#[derive(Debug, Clone)]
pub struct MeshSurface {
    name: String,
    geometry: Arc<TriMesh>,
    transform: Transform,
    world: WorldCache,
}

impl MeshSurface {
    /// Creates a mesh at the identity transform
    pub fn new(name: impl Into<String>, geometry: TriMesh) -> Self {
        let geometry = Arc::new(geometry);
        let world = WorldCache::compute(&geometry, &Transform::IDENTITY);
        Self {
            name: name.into(),
            geometry,
            transform: Transform::IDENTITY,
            world,
        }
    }

    /// Places the mesh; the world cache is refreshed immediately
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.refresh_world_matrix();
        self
    }

    /// Moves the mesh. Cached world bounds stay stale until
    /// [`CastSurface::refresh_world_matrix`] is called.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World matrix as of the last refresh
    pub fn world_matrix(&self) -> Mat4 {
        self.world.matrix
    }

    pub fn geometry(&self) -> &TriMesh {
        &self.geometry
    }

    /// Creates an instance that shares this mesh's geometry
    pub fn create_instance(
        &self,
        name: impl Into<String>,
        transform: Transform,
    ) -> InstancedMeshSurface {
        let world = WorldCache::compute(&self.geometry, &transform);
        InstancedMeshSurface {
            name: name.into(),
            source_name: self.name.clone(),
            geometry: Arc::clone(&self.geometry),
            transform,
            world,
        }
    }
}

impl CastSurface for MeshSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh_world_matrix(&mut self) {
        self.world = WorldCache::compute(&self.geometry, &self.transform);
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.world.bounds
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.world.intersect(&self.geometry.indices, ray)
    }
}

/// An instance of another mesh: shared geometry, own transform
#[derive(Debug, Clone)]
pub struct InstancedMeshSurface {
    name: String,
    source_name: String,
    geometry: Arc<TriMesh>,
    transform: Transform,
    world: WorldCache,
}

impl InstancedMeshSurface {
    /// Name of the mesh whose geometry this instance shares
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Moves the instance. Cached world bounds stay stale until refreshed.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world.matrix
    }
}

impl CastSurface for InstancedMeshSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh_world_matrix(&mut self) {
        self.world = WorldCache::compute(&self.geometry, &self.transform);
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.world.bounds
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.world.intersect(&self.geometry.indices, ray)
    }
}

/// A node of the host scene
#[derive(Debug, Clone)]
pub enum Surface {
    Mesh(MeshSurface),
    InstancedMesh(InstancedMeshSurface),
    /// Lights, cameras, transform nodes and other non-geometry nodes
    Other { name: String },
}

impl Surface {
    pub fn name(&self) -> &str {
        match self {
            Surface::Mesh(mesh) => mesh.name(),
            Surface::InstancedMesh(instance) => instance.name(),
            Surface::Other { name } => name,
        }
    }

    /// The ray-castable view of this node, if it has geometry
    pub fn as_cast_surface(&self) -> Option<&dyn CastSurface> {
        match self {
            Surface::Mesh(mesh) => Some(mesh),
            Surface::InstancedMesh(instance) => Some(instance),
            Surface::Other { .. } => None,
        }
    }

    /// Mutable ray-castable view of this node, if it has geometry
    pub fn as_cast_surface_mut(&mut self) -> Option<&mut dyn CastSurface> {
        match self {
            Surface::Mesh(mesh) => Some(mesh),
            Surface::InstancedMesh(instance) => Some(instance),
            Surface::Other { .. } => None,
        }
    }
}

impl From<MeshSurface> for Surface {
    fn from(mesh: MeshSurface) -> Self {
        Surface::Mesh(mesh)
    }
}

impl From<InstancedMeshSurface> for Surface {
    fn from(instance: InstancedMeshSurface) -> Self {
        Surface::InstancedMesh(instance)
    }
}

/// The live scene: a flat list of named nodes
#[derive(Debug, Clone, Default)]
pub struct Scene {
    surfaces: Vec<Surface>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, surface: impl Into<Surface>) {
        self.surfaces.push(surface.into());
    }

    pub fn surface_by_name(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.name() == name)
    }

    /// All nodes whose name is in `names`, in scene order
    pub fn surfaces_named_mut<'a>(&'a mut self, names: &[String]) -> Vec<&'a mut Surface> {
        self.surfaces
            .iter_mut()
            .filter(|s| names.iter().any(|n| n == s.name()))
            .collect()
    }
}
