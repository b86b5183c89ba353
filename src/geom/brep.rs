//! Boundary representation topology.
//!
//! Only the topology records and the edge curves are stored. Faces are
//! described by a loop of oriented edges; surfaces are not modeled.

use crate::archive::{
    read_class_data, write_class_data, Archivable, BufferReader, BufferWriter, ClassId,
    BREP_CLASS_ID,
};
use crate::util::{BoundingBox, DVec3, Error, Result};

use super::NurbsCurve;

/// Edge joining two vertices along an edge curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrepEdge {
    pub curve: u32,
    pub vertices: [u32; 2],
    pub tolerance: f64,
}

/// Edge use inside a face loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrepLoopEdge {
    pub edge: u32,
    pub reversed: bool,
}

/// Face bounded by a single loop of edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrepFace {
    pub edges: Vec<BrepLoopEdge>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Brep {
    vertices: Vec<DVec3>,
    curves: Vec<NurbsCurve>,
    edges: Vec<BrepEdge>,
    faces: Vec<BrepFace>,
}

impl Brep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn curves(&self) -> &[NurbsCurve] {
        &self.curves
    }

    pub fn edges(&self) -> &[BrepEdge] {
        &self.edges
    }

    pub fn faces(&self) -> &[BrepFace] {
        &self.faces
    }

    pub fn add_vertex(&mut self, p: DVec3) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    pub fn add_curve(&mut self, curve: NurbsCurve) -> usize {
        self.curves.push(curve);
        self.curves.len() - 1
    }

    /// Append an edge. Returns None when an index is out of range.
    pub fn add_edge(&mut self, curve: u32, v0: u32, v1: u32, tolerance: f64) -> Option<usize> {
        let edge = BrepEdge {
            curve,
            vertices: [v0, v1],
            tolerance,
        };
        if !self.edge_in_range(&edge) {
            return None;
        }
        self.edges.push(edge);
        Some(self.edges.len() - 1)
    }

    /// Append a face. Returns None when the loop is empty or an edge
    /// index is out of range.
    pub fn add_face(&mut self, edges: Vec<BrepLoopEdge>) -> Option<usize> {
        let face = BrepFace { edges };
        if !self.face_in_range(&face) {
            return None;
        }
        self.faces.push(face);
        Some(self.faces.len() - 1)
    }

    fn edge_in_range(&self, e: &BrepEdge) -> bool {
        (e.curve as usize) < self.curves.len()
            && e.vertices.iter().all(|&v| (v as usize) < self.vertices.len())
    }

    fn face_in_range(&self, f: &BrepFace) -> bool {
        !f.edges.is_empty() && f.edges.iter().all(|e| (e.edge as usize) < self.edges.len())
    }

    pub fn is_valid(&self) -> bool {
        !self.faces.is_empty()
            && self.curves.iter().all(NurbsCurve::is_valid)
            && self.edges.iter().all(|e| self.edge_in_range(e) && e.tolerance >= 0.0)
            && self.faces.iter().all(|f| self.face_in_range(f))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_points(&self.vertices);
        for c in &self.curves {
            bbox.expand_by_box(&c.bounding_box());
        }
        bbox
    }
}

impl Archivable for Brep {
    const CLASS_ID: ClassId = BREP_CLASS_ID;
    const CLASS_NAME: &'static str = "Brep";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.vertices.len() * std::mem::size_of::<DVec3>()
            + self.curves.iter().map(Archivable::size_of).sum::<usize>()
            + self.edges.len() * std::mem::size_of::<BrepEdge>()
            + self
                .faces
                .iter()
                .map(|f| std::mem::size_of::<BrepFace>() + f.edges.len() * 8)
                .sum::<usize>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3_array(&self.vertices)?;

        w.write_count(self.curves.len())?;
        for c in &self.curves {
            write_class_data(w, c)?;
        }

        w.write_count(self.edges.len())?;
        for e in &self.edges {
            w.write_u32(e.curve)?;
            w.write_u32(e.vertices[0])?;
            w.write_u32(e.vertices[1])?;
            w.write_f64(e.tolerance)?;
        }

        w.write_count(self.faces.len())?;
        for f in &self.faces {
            w.write_count(f.edges.len())?;
            for e in &f.edges {
                w.write_u32(e.edge)?;
                w.write_bool(e.reversed)?;
            }
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let mut brep = Brep {
            vertices: r.read_point3_array()?,
            ..Default::default()
        };

        let count = r.read_count(8)?;
        for _ in 0..count {
            brep.curves.push(read_class_data(r)?);
        }

        let count = r.read_count(20)?;
        for _ in 0..count {
            let curve = r.read_u32()?;
            let v0 = r.read_u32()?;
            let v1 = r.read_u32()?;
            let tolerance = r.read_f64()?;
            brep.add_edge(curve, v0, v1, tolerance).ok_or_else(|| {
                Error::invalid(format!("brep edge references curve {} / vertices {} {}", curve, v0, v1))
            })?;
        }

        let count = r.read_count(4)?;
        for _ in 0..count {
            let n = r.read_count(5)?;
            let mut edges = Vec::with_capacity(n);
            for _ in 0..n {
                edges.push(BrepLoopEdge {
                    edge: r.read_u32()?,
                    reversed: r.read_bool()?,
                });
            }
            if edges.iter().any(|e| e.edge as usize >= brep.edges.len()) {
                return Err(Error::invalid("brep face references a missing edge"));
            }
            brep.faces.push(BrepFace { edges });
        }
        Ok(brep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single triangular face with straight edges.
    fn triangle_brep() -> Brep {
        let corners = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let mut b = Brep::new();
        for p in corners {
            b.add_vertex(p);
        }
        let mut loop_edges = Vec::new();
        for i in 0..3u32 {
            let (p, q) = (corners[i as usize], corners[((i + 1) % 3) as usize]);
            let curve = b.add_curve(NurbsCurve::create_clamped_uniform(3, 2, &[p, q]).unwrap());
            let edge = b.add_edge(curve as u32, i, (i + 1) % 3, 1e-6).unwrap();
            loop_edges.push(BrepLoopEdge {
                edge: edge as u32,
                reversed: false,
            });
        }
        b.add_face(loop_edges).unwrap();
        b
    }

    #[test]
    fn test_topology() {
        let b = triangle_brep();
        assert!(b.is_valid());
        assert_eq!(b.edges().len(), 3);
        assert_eq!(b.bounding_box().max, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut b = triangle_brep();
        assert!(b.add_edge(7, 0, 1, 0.0).is_none());
        assert!(b.add_edge(0, 0, 9, 0.0).is_none());
        assert!(b.add_face(vec![]).is_none());
        assert!(b
            .add_face(vec![BrepLoopEdge {
                edge: 3,
                reversed: true
            }])
            .is_none());
    }

    #[test]
    fn test_archive() {
        let b = triangle_brep();
        for version in [5, 70] {
            let mut w = BufferWriter::new(0, version, 0).unwrap();
            write_class_data(&mut w, &b).unwrap();
            let buf = w.into_buffer().unwrap();
            let mut r = BufferReader::new(&buf, version, 0);
            assert_eq!(read_class_data::<Brep>(&mut r).unwrap(), b);
        }
    }

    #[test]
    fn test_degenerate_edge_curve_fails_to_write() {
        let mut b = triangle_brep();
        let curve = b.add_curve(NurbsCurve::new(3, false, 1, 2));
        b.add_edge(curve as u32, 0, 1, 0.0).unwrap();
        assert!(!b.is_valid());

        let mut w = BufferWriter::new(0, 70, 0).unwrap();
        assert!(matches!(write_class_data(&mut w, &b), Err(Error::WriteFailed(_))));
    }
}
