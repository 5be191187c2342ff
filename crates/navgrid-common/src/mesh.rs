//! Triangle mesh geometry for cast surfaces

use crate::{Aabb, Error, Result};
use glam::Vec3;

#[cfg(feature = "std")]
use std::fs::File;
#[cfg(feature = "std")]
use std::io::{BufRead, BufReader};
#[cfg(feature = "std")]
use std::path::Path;

/// An indexed triangle mesh in local (object) space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex indices, 3 per triangle
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Creates a new empty triangle mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from positions and indices, validating the index buffer
    pub fn from_parts(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(
                "Index array length must be a multiple of 3".to_string(),
            ));
        }

        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(Error::InvalidMesh(format!(
                "Triangle index out of bounds: {} (vertex count: {})",
                bad,
                positions.len()
            )));
        }

        Ok(Self { positions, indices })
    }

    /// A horizontal rectangle at height `y` spanning `min`..`max` on the XZ plane, as two triangles
    pub fn quad_xz(min_x: f32, min_z: f32, max_x: f32, max_z: f32, y: f32) -> Self {
        Self {
            positions: vec![
                Vec3::new(min_x, y, min_z),
                Vec3::new(max_x, y, min_z),
                Vec3::new(max_x, y, max_z),
                Vec3::new(min_x, y, max_z),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Number of vertices
    pub fn vert_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Local-space bounding box, or `None` for a mesh without vertices
    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter())
    }

    /// Loads a mesh from an OBJ file
    ///
    /// This method is only available when the `std` feature is enabled.
    #[cfg(feature = "std")]
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut mesh = Self::new();
        for line in reader.lines() {
            let line = line?;
            mesh.parse_obj_line(&line)?;
        }

        Ok(mesh)
    }

    /// Parses OBJ content from a string
    ///
    /// # Example
    ///
    /// ```
    /// use navgrid_common::TriMesh;
    ///
    /// let obj_content = r#"
    /// v 0.0 0.0 0.0
    /// v 1.0 0.0 0.0
    /// v 0.5 0.0 1.0
    /// f 1 2 3
    /// "#;
    ///
    /// let mesh = TriMesh::from_obj_str(obj_content).unwrap();
    /// assert_eq!(mesh.vert_count(), 3);
    /// assert_eq!(mesh.tri_count(), 1);
    /// ```
    pub fn from_obj_str(content: &str) -> Result<Self> {
        let mut mesh = Self::new();
        for line in content.lines() {
            mesh.parse_obj_line(line)?;
        }
        Ok(mesh)
    }

    fn parse_obj_line(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let x = parse_coord(tokens.next(), "x")?;
                let y = parse_coord(tokens.next(), "y")?;
                let z = parse_coord(tokens.next(), "z")?;
                self.positions.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in tokens {
                    face.push(self.resolve_face_index(token)?);
                }

                if face.len() < 3 {
                    return Err(Error::InvalidMesh(
                        "Invalid face: less than 3 vertices".to_string(),
                    ));
                }

                // Fan triangulation for polygons
                for i in 1..(face.len() - 1) {
                    self.indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            // normals, texture coordinates, groups, comments
            _ => {}
        }

        Ok(())
    }

    /// Resolves a `v`, `v/vt` or `v/vt/vn` face token to a zero-based index.
    /// Negative indices are relative to the vertices read so far.
    fn resolve_face_index(&self, token: &str) -> Result<u32> {
        let index_str = token.split('/').next().unwrap_or_default();
        let index = index_str.parse::<i64>().map_err(|_| {
            Error::InvalidMesh(format!("Invalid face: vertex index '{}' is not a number", token))
        })?;

        let count = self.positions.len() as i64;
        let resolved = match index {
            i if i > 0 => i - 1,
            i if i < 0 => count + i,
            _ => -1,
        };

        if resolved < 0 || resolved >= count {
            return Err(Error::InvalidMesh(format!(
                "Invalid face: vertex index {} out of range",
                index
            )));
        }

        Ok(resolved as u32)
    }
}

fn parse_coord(token: Option<&str>, axis: &str) -> Result<f32> {
    token
        .ok_or_else(|| Error::InvalidMesh(format!("Invalid vertex: missing {} coordinate", axis)))?
        .parse::<f32>()
        .map_err(|_| Error::InvalidMesh(format!("Invalid vertex: {} coordinate is not a number", axis)))
}
