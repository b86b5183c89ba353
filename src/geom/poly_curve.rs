//! Poly curve: a chain of curve segments.

use crate::archive::{
    read_curve, write_curve, Archivable, BufferReader, BufferWriter, ClassId, POLY_CURVE_CLASS_ID,
};
use crate::util::{BoundingBox, Error, Interval, Result};

use super::Curve;

/// Curve made of segments joined end to end.
///
/// `params` holds `segment_count + 1` increasing values; segment `i` maps
/// to `params[i]..params[i + 1]` of the poly curve domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyCurve {
    segments: Vec<Curve>,
    params: Vec<f64>,
}

impl PolyCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Its span is the length of its own domain.
    pub fn append(&mut self, segment: impl Into<Curve>) {
        let segment = segment.into();
        let span = segment.domain().length();
        match self.params.last().copied() {
            Some(last) => self.params.push(last + span),
            None => self.params.extend([0.0, span]),
        }
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Curve] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Curve> {
        self.segments.get(index)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    pub fn domain(&self) -> Interval {
        match (self.params.first(), self.params.last()) {
            (Some(&t0), Some(&t1)) => Interval::new(t0, t1),
            _ => Interval::default(),
        }
    }

    pub fn dimension(&self) -> u32 {
        self.segments.first().map_or(3, Curve::dimension)
    }

    pub fn is_valid(&self) -> bool {
        !self.segments.is_empty()
            && self.params.len() == self.segments.len() + 1
            && self.params.windows(2).all(|t| t[0] < t[1])
            && self.segments.iter().all(Curve::is_valid)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::EMPTY;
        for s in &self.segments {
            bbox.expand_by_box(&s.bounding_box());
        }
        bbox
    }

    pub(crate) fn segments_size_of(&self) -> usize {
        self.segments.iter().map(Curve::size_of).sum()
    }
}

impl Archivable for PolyCurve {
    const CLASS_ID: ClassId = POLY_CURVE_CLASS_ID;
    const CLASS_NAME: &'static str = "PolyCurve";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.params.len() * std::mem::size_of::<f64>()
            + self.segments_size_of()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_f64_array(&self.params)?;
        w.write_count(self.segments.len())?;
        for s in &self.segments {
            write_curve(w, s)?;
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let params = r.read_f64_array()?;
        // a nested class is at least one chunk header
        let count = r.read_count(8)?;
        let expected = if count == 0 { 0 } else { count + 1 };
        if params.len() != expected {
            return Err(Error::invalid(format!(
                "PolyCurve has {} segments and {} parameters",
                count,
                params.len()
            )));
        }
        let mut segments = Vec::with_capacity(count);
        for _ in 0..count {
            segments.push(read_curve(r)?);
        }
        Ok(Self { segments, params })
    }
}
