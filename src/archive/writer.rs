//! Buffer-backed archive writer.
//!
//! The writer appends little-endian values to an in-memory buffer and
//! frames them in nested chunks. Chunk lengths are back-patched when a
//! chunk is closed, and chunks whose typecode carries [`TCODE_CRC`] get a
//! CRC-32 trailer.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use flate2::Crc;

use super::format::*;
use crate::util::{DVec2, DVec3, DVec4, Error, Interval, Result, Vec3};

/// A chunk that has been opened but not yet closed.
#[derive(Debug)]
struct OpenChunk {
    typecode: u32,
    length_pos: usize,
    body_start: usize,
}

/// Output archive writing into a growable byte buffer.
pub struct BufferWriter {
    buf: Vec<u8>,
    archive_3dm_version: i32,
    opennurbs_version: u32,
    chunks: Vec<OpenChunk>,
}

impl BufferWriter {
    /// Create a writer with a pre-allocated capacity.
    ///
    /// The capacity is a hint: the buffer grows past it when needed.
    pub fn new(capacity: usize, archive_3dm_version: i32, opennurbs_version: u32) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve(capacity)
            .map_err(|e| Error::write_failed(format!("cannot allocate {} bytes: {}", capacity, e)))?;
        Ok(Self {
            buf,
            archive_3dm_version,
            opennurbs_version,
            chunks: Vec::new(),
        })
    }

    /// 3dm version this archive is written for.
    #[inline]
    pub fn archive_3dm_version(&self) -> i32 {
        self.archive_3dm_version
    }

    /// Resolved opennurbs version this archive is written for.
    #[inline]
    pub fn opennurbs_version(&self) -> u32 {
        self.opennurbs_version
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn size_of_archive(&self) -> usize {
        self.buf.len()
    }

    /// Allocated capacity of the underlying buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Current chunk nesting depth.
    #[inline]
    pub fn chunk_depth(&self) -> usize {
        self.chunks.len()
    }

    /// Written bytes.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the written bytes.
    ///
    /// Fails when a chunk is still open.
    pub fn into_buffer(self) -> Result<Vec<u8>> {
        if let Some(open) = self.chunks.last() {
            return Err(Error::write_failed(format!(
                "chunk {:#010x} was never closed",
                open.typecode
            )));
        }
        Ok(self.buf)
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buf
            .try_reserve(additional)
            .map_err(|e| Error::write_failed(format!("buffer growth failed: {}", e)))
    }

    // ------------------------------------------------------------------
    // Chunks
    // ------------------------------------------------------------------

    /// Open a chunk. Its length is written by [`end_chunk`](Self::end_chunk).
    pub fn begin_chunk(&mut self, typecode: u32) -> Result<()> {
        let len_size = chunk_length_size(self.archive_3dm_version);
        self.reserve(TYPECODE_SIZE + len_size)?;
        self.buf.write_u32::<LittleEndian>(typecode)?;
        let length_pos = self.buf.len();
        self.buf.resize(length_pos + len_size, 0);
        self.chunks.push(OpenChunk {
            typecode,
            length_pos,
            body_start: self.buf.len(),
        });
        Ok(())
    }

    /// Close the innermost chunk, appending its CRC and patching its length.
    pub fn end_chunk(&mut self) -> Result<()> {
        let open = self
            .chunks
            .pop()
            .ok_or_else(|| Error::write_failed("end_chunk without an open chunk"))?;

        if has_crc(open.typecode) {
            let mut crc = Crc::new();
            crc.update(&self.buf[open.body_start..]);
            let sum = crc.sum();
            self.reserve(CRC_SIZE)?;
            self.buf.write_u32::<LittleEndian>(sum)?;
        }

        let length = self.buf.len() - open.body_start;
        let version = self.archive_3dm_version;
        let field = &mut self.buf[open.length_pos..open.body_start];
        if uses_long_chunk_lengths(version) {
            LittleEndian::write_u64(field, length as u64);
        } else {
            let length = u32::try_from(length).map_err(|_| {
                Error::write_failed(format!(
                    "chunk {:#010x} of {} bytes exceeds the 3dm {} length limit",
                    open.typecode, length, version
                ))
            })?;
            LittleEndian::write_u32(field, length);
        }
        Ok(())
    }

    /// Write a chunk with an empty body.
    pub fn write_empty_chunk(&mut self, typecode: u32) -> Result<()> {
        self.begin_chunk(typecode)?;
        self.end_chunk()
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.write_u8(value)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?;
        self.buf.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.reserve(4)?;
        self.buf.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.reserve(8)?;
        self.buf.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u128(&mut self, value: u128) -> Result<()> {
        self.reserve(16)?;
        self.buf.write_u128::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.reserve(4)?;
        self.buf.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.reserve(8)?;
        self.buf.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write raw bytes without a length prefix.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Write a collection count as u32.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count)
            .map_err(|_| Error::write_failed(format!("count {} does not fit in u32", count)))?;
        self.write_u32(count)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_count(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    pub fn write_interval(&mut self, value: Interval) -> Result<()> {
        self.write_f64(value.t0)?;
        self.write_f64(value.t1)
    }

    pub fn write_point2(&mut self, value: DVec2) -> Result<()> {
        self.write_f64(value.x)?;
        self.write_f64(value.y)
    }

    pub fn write_point3(&mut self, value: DVec3) -> Result<()> {
        self.write_f64(value.x)?;
        self.write_f64(value.y)?;
        self.write_f64(value.z)
    }

    pub fn write_point4(&mut self, value: DVec4) -> Result<()> {
        self.write_f64(value.x)?;
        self.write_f64(value.y)?;
        self.write_f64(value.z)?;
        self.write_f64(value.w)
    }

    /// Write a double precision point as three f32 values.
    pub fn write_point3_f32(&mut self, value: DVec3) -> Result<()> {
        self.write_f32(value.x as f32)?;
        self.write_f32(value.y as f32)?;
        self.write_f32(value.z as f32)
    }

    pub fn write_vec3f(&mut self, value: Vec3) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Write a counted array of doubles.
    pub fn write_f64_array(&mut self, values: &[f64]) -> Result<()> {
        self.write_count(values.len())?;
        self.reserve(values.len() * 8)?;
        for v in values {
            self.buf.write_f64::<LittleEndian>(*v)?;
        }
        Ok(())
    }

    /// Write a counted array of double precision points.
    pub fn write_point3_array(&mut self, values: &[DVec3]) -> Result<()> {
        self.write_count(values.len())?;
        self.reserve(values.len() * 24)?;
        for p in values {
            self.write_point3(*p)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BufferWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferWriter")
            .field("len", &self.buf.len())
            .field("archive_3dm_version", &self.archive_3dm_version)
            .field("opennurbs_version", &self.opennurbs_version)
            .field("open_chunks", &self.chunks.len())
            .finish()
    }
}
