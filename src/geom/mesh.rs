//! Polygon mesh data.
//!
//! Faces are triangles or quads. A triangle repeats its last vertex index,
//! so every face is stored as four indices.

use crate::archive::{
    uses_long_chunk_lengths, Archivable, BufferReader, BufferWriter, ClassId, MESH_CLASS_ID,
};
use crate::util::{BoundingBox, DVec3, Error, Result, Vec3};

/// Mesh face as four vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshFace(pub [u32; 4]);

impl MeshFace {
    pub const fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c, c])
    }

    pub const fn quad(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self([a, b, c, d])
    }

    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.0[2] == self.0[3]
    }

    #[inline]
    pub fn is_quad(&self) -> bool {
        !self.is_triangle()
    }
}

/// Polygon mesh with optional per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<MeshFace>,
    normals: Vec<Vec3>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: DVec3) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    /// Append a triangle. Returns None when an index is out of range.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> Option<usize> {
        self.add_face(MeshFace::triangle(a, b, c))
    }

    /// Append a quad. Returns None when an index is out of range.
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) -> Option<usize> {
        self.add_face(MeshFace::quad(a, b, c, d))
    }

    fn add_face(&mut self, face: MeshFace) -> Option<usize> {
        if !self.face_in_range(&face) {
            return None;
        }
        self.faces.push(face);
        Some(self.faces.len() - 1)
    }

    fn face_in_range(&self, face: &MeshFace) -> bool {
        face.0.iter().all(|&i| (i as usize) < self.vertices.len())
    }

    /// Replace the vertex normals. Returns false unless there is one
    /// normal per vertex.
    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> bool {
        if normals.len() != self.vertices.len() {
            return false;
        }
        self.normals = normals;
        true
    }

    pub fn clear_normals(&mut self) {
        self.normals.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_triangle()).count()
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_quad()).count()
    }

    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.faces.is_empty()
            && self.faces.iter().all(|f| self.face_in_range(f))
            && (self.normals.is_empty() || self.normals.len() == self.vertices.len())
            && self.vertices.iter().all(|v| v.is_finite())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }
}

impl Archivable for Mesh {
    const CLASS_ID: ClassId = MESH_CLASS_ID;
    const CLASS_NAME: &'static str = "Mesh";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.vertices.len() * std::mem::size_of::<DVec3>()
            + self.faces.len() * std::mem::size_of::<MeshFace>()
            + self.normals.len() * std::mem::size_of::<Vec3>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        // the reader rejects both, so never write them
        if !self.normals.is_empty() && self.normals.len() != self.vertices.len() {
            return Err(Error::write_failed(format!(
                "mesh has {} normals for {} vertices",
                self.normals.len(),
                self.vertices.len()
            )));
        }
        if let Some(face) = self.faces.iter().find(|f| !self.face_in_range(f)) {
            return Err(Error::write_failed(format!(
                "mesh face {:?} references a vertex beyond {}",
                face.0,
                self.vertices.len()
            )));
        }

        // legacy dialects store single precision vertices
        let double = uses_long_chunk_lengths(w.archive_3dm_version());
        w.write_count(self.vertices.len())?;
        for v in &self.vertices {
            if double {
                w.write_point3(*v)?;
            } else {
                w.write_point3_f32(*v)?;
            }
        }

        w.write_count(self.faces.len())?;
        for f in &self.faces {
            for i in f.0 {
                w.write_u32(i)?;
            }
        }

        w.write_count(self.normals.len())?;
        for n in &self.normals {
            w.write_vec3f(*n)?;
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let double = uses_long_chunk_lengths(r.archive_3dm_version());
        let count = r.read_count(if double { 24 } else { 12 })?;
        let mut vertices = Vec::with_capacity(count);
        for _ in 0..count {
            vertices.push(if double { r.read_point3()? } else { r.read_point3_f32()? });
        }

        let count = r.read_count(16)?;
        let mut faces = Vec::with_capacity(count);
        for _ in 0..count {
            let face = MeshFace([r.read_u32()?, r.read_u32()?, r.read_u32()?, r.read_u32()?]);
            if face.0.iter().any(|&i| i as usize >= vertices.len()) {
                return Err(Error::invalid(format!(
                    "mesh face {:?} references a vertex beyond {}",
                    face.0,
                    vertices.len()
                )));
            }
            faces.push(face);
        }

        let count = r.read_count(12)?;
        if count != 0 && count != vertices.len() {
            return Err(Error::invalid(format!(
                "mesh has {} normals for {} vertices",
                count,
                vertices.len()
            )));
        }
        let mut normals = Vec::with_capacity(count);
        for _ in 0..count {
            normals.push(r.read_vec3f()?);
        }

        Ok(Self {
            vertices,
            faces,
            normals,
        })
    }
}
