//! Buffer-backed archive reader.
//!
//! Reads are bounded by the innermost open chunk: a value that would run
//! past the end of its chunk is reported as [`Error::UnexpectedEof`]
//! instead of being read from the following chunk.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::Crc;

use super::format::*;
use crate::util::{DVec2, DVec3, DVec4, Error, Interval, Result, Vec3};

/// Bounds of an open chunk.
#[derive(Debug)]
struct ChunkFrame {
    typecode: u32,
    /// End of readable body (excludes the CRC trailer).
    body_end: u64,
    /// End of the chunk including the CRC trailer.
    chunk_end: u64,
}

/// Input archive over a borrowed byte slice.
pub struct BufferReader<'a> {
    cursor: Cursor<&'a [u8]>,
    archive_3dm_version: i32,
    opennurbs_version: u32,
    chunks: Vec<ChunkFrame>,
}

impl<'a> BufferReader<'a> {
    /// Create a reader for a payload written with the given version pair.
    pub fn new(data: &'a [u8], archive_3dm_version: i32, opennurbs_version: u32) -> Self {
        Self {
            cursor: Cursor::new(data),
            archive_3dm_version,
            opennurbs_version,
            chunks: Vec::new(),
        }
    }

    /// 3dm version declared by the envelope.
    #[inline]
    pub fn archive_3dm_version(&self) -> i32 {
        self.archive_3dm_version
    }

    /// opennurbs version declared by the envelope.
    #[inline]
    pub fn opennurbs_version(&self) -> u32 {
        self.opennurbs_version
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.cursor.position()
    }

    /// Total payload size.
    #[inline]
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    /// Check if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Current chunk nesting depth.
    #[inline]
    pub fn chunk_depth(&self) -> usize {
        self.chunks.len()
    }

    fn limit(&self) -> u64 {
        self.chunks.last().map(|c| c.body_end).unwrap_or_else(|| self.len())
    }

    /// Bytes left in the current scope.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.limit().saturating_sub(self.pos())
    }

    /// True when the current scope has been fully read.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless `needed` bytes are left in the current scope.
    pub fn require(&self, needed: u64) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::UnexpectedEof(self.pos()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Chunks
    // ------------------------------------------------------------------

    /// Typecode of the next chunk, without consuming it.
    pub fn peek_chunk_typecode(&self) -> Result<u32> {
        self.require(TYPECODE_SIZE as u64)?;
        let pos = self.pos() as usize;
        let mut bytes = &self.cursor.get_ref()[pos..pos + TYPECODE_SIZE];
        Ok(bytes.read_u32::<LittleEndian>()?)
    }

    /// Open the next chunk and return its typecode.
    ///
    /// The declared length must fit inside the enclosing scope, and a CRC
    /// trailer, when present, must match the body.
    pub fn begin_chunk(&mut self) -> Result<u32> {
        if self.chunks.len() >= MAX_CHUNK_DEPTH {
            return Err(Error::invalid(format!(
                "chunks nested deeper than {}",
                MAX_CHUNK_DEPTH
            )));
        }
        let len_size = chunk_length_size(self.archive_3dm_version) as u64;
        self.require(TYPECODE_SIZE as u64 + len_size)?;

        let typecode = self.cursor.read_u32::<LittleEndian>()?;
        let length = if uses_long_chunk_lengths(self.archive_3dm_version) {
            self.cursor.read_u64::<LittleEndian>()?
        } else {
            self.cursor.read_u32::<LittleEndian>()? as u64
        };

        let start = self.pos();
        if length > self.remaining() {
            return Err(Error::invalid(format!(
                "chunk {:#010x} at {} declares {} bytes, only {} remain",
                typecode,
                start,
                length,
                self.remaining()
            )));
        }
        let chunk_end = start + length;

        let body_end = if has_crc(typecode) {
            if length < CRC_SIZE as u64 {
                return Err(Error::invalid(format!(
                    "chunk {:#010x} is too short for its CRC",
                    typecode
                )));
            }
            let body_end = chunk_end - CRC_SIZE as u64;
            let data = *self.cursor.get_ref();
            let mut trailer = &data[body_end as usize..chunk_end as usize];
            let stored = trailer.read_u32::<LittleEndian>()?;
            let mut crc = Crc::new();
            crc.update(&data[start as usize..body_end as usize]);
            if crc.sum() != stored {
                return Err(Error::CrcMismatch {
                    typecode,
                    stored,
                    computed: crc.sum(),
                });
            }
            body_end
        } else {
            chunk_end
        };

        self.chunks.push(ChunkFrame {
            typecode,
            body_end,
            chunk_end,
        });
        Ok(typecode)
    }

    /// Open the next chunk, failing unless it has the expected typecode.
    pub fn expect_chunk(&mut self, expected: u32) -> Result<()> {
        let actual = self.begin_chunk()?;
        if actual != expected {
            return Err(Error::UnexpectedChunk { expected, actual });
        }
        Ok(())
    }

    /// Close the innermost chunk.
    ///
    /// Unread bytes at the end of the chunk are skipped; they hold fields
    /// added by newer minor versions of the writer.
    pub fn end_chunk(&mut self) -> Result<()> {
        let frame = self
            .chunks
            .pop()
            .ok_or_else(|| Error::invalid("end_chunk without an open chunk"))?;
        let pos = self.pos();
        if pos > frame.body_end {
            return Err(Error::invalid(format!(
                "read past the end of chunk {:#010x}",
                frame.typecode
            )));
        }
        if pos < frame.body_end {
            tracing::trace!(
                "skipping {} unread bytes in chunk {:#010x}",
                frame.body_end - pos,
                frame.typecode
            );
        }
        self.cursor.set_position(frame.chunk_end);
        Ok(())
    }

    /// Read every remaining byte of the current scope.
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let n = self.remaining() as usize;
        self.read_bytes(n)
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::invalid(format!("invalid bool value {}", v))),
        }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.require(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        self.require(16)?;
        Ok(self.cursor.read_u128::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.require(4)?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.require(8)?;
        Ok(self.cursor.read_f64::<LittleEndian>()?)
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.require(n as u64)?;
        let pos = self.pos() as usize;
        let bytes = self.cursor.get_ref()[pos..pos + n].to_vec();
        self.cursor.set_position((pos + n) as u64);
        Ok(bytes)
    }

    /// Read a u32 element count and check that `count * element_size`
    /// bytes are available before anything is allocated.
    pub fn read_count(&mut self, element_size: usize) -> Result<usize> {
        let count = self.read_u32()? as u64;
        let needed = count
            .checked_mul(element_size as u64)
            .ok_or_else(|| Error::invalid(format!("element count {} overflows", count)))?;
        self.require(needed)?;
        Ok(count as usize)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_count(1)?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn read_interval(&mut self) -> Result<Interval> {
        Ok(Interval::new(self.read_f64()?, self.read_f64()?))
    }

    pub fn read_point2(&mut self) -> Result<DVec2> {
        Ok(DVec2::new(self.read_f64()?, self.read_f64()?))
    }

    pub fn read_point3(&mut self) -> Result<DVec3> {
        Ok(DVec3::new(self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    pub fn read_point4(&mut self) -> Result<DVec4> {
        Ok(DVec4::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        ))
    }

    /// Read three f32 values into a double precision point.
    pub fn read_point3_f32(&mut self) -> Result<DVec3> {
        Ok(DVec3::new(
            self.read_f32()? as f64,
            self.read_f32()? as f64,
            self.read_f32()? as f64,
        ))
    }

    pub fn read_vec3f(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read a counted array of doubles.
    pub fn read_f64_array(&mut self) -> Result<Vec<f64>> {
        let count = self.read_count(8)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_f64()?);
        }
        Ok(values)
    }

    /// Read a counted array of double precision points.
    pub fn read_point3_array(&mut self) -> Result<Vec<DVec3>> {
        let count = self.read_count(24)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_point3()?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::BufferWriter;

    fn written(version: i32, f: impl FnOnce(&mut BufferWriter)) -> Vec<u8> {
        let mut w = BufferWriter::new(0, version, 0).unwrap();
        f(&mut w);
        w.into_buffer().unwrap()
    }

    #[test]
    fn test_primitives() {
        let buf = written(60, |w| {
            w.write_u32(42).unwrap();
            w.write_f64(1.5).unwrap();
            w.write_string("héllo").unwrap();
            w.write_point3(DVec3::new(1.0, 2.0, 3.0)).unwrap();
            w.write_bool(true).unwrap();
        });
        let mut r = BufferReader::new(&buf, 60, 0);
        assert_eq!(r.read_u32().unwrap(), 42);
        assert_eq!(r.read_f64().unwrap(), 1.5);
        assert_eq!(r.read_string().unwrap(), "héllo");
        assert_eq!(r.read_point3().unwrap(), DVec3::new(1.0, 2.0, 3.0));
        assert!(r.read_bool().unwrap());
        assert!(r.at_end());
    }

    #[test]
    fn test_reads_are_bounded_by_chunk() {
        let buf = written(60, |w| {
            w.begin_chunk(1).unwrap();
            w.write_u8(1).unwrap();
            w.end_chunk().unwrap();
            w.write_u32(99).unwrap();
        });
        let mut r = BufferReader::new(&buf, 60, 0);
        assert_eq!(r.begin_chunk().unwrap(), 1);
        assert!(matches!(r.read_u32(), Err(Error::UnexpectedEof(_))));
    }

    #[test]
    fn test_end_chunk_skips_unread_tail() {
        let buf = written(50, |w| {
            w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA).unwrap();
            w.write_u32(1).unwrap();
            w.write_u32(2).unwrap();
            w.end_chunk().unwrap();
            w.write_u32(3).unwrap();
        });
        let mut r = BufferReader::new(&buf, 50, 0);
        r.expect_chunk(TCODE_OPENNURBS_CLASS_DATA).unwrap();
        assert_eq!(r.read_u32().unwrap(), 1);
        r.end_chunk().unwrap();
        assert_eq!(r.read_u32().unwrap(), 3);
    }

    #[test]
    fn test_length_beyond_payload_is_rejected() {
        let mut buf = written(60, |w| {
            w.begin_chunk(1).unwrap();
            w.write_u32(5).unwrap();
            w.end_chunk().unwrap();
        });
        buf.truncate(buf.len() - 1);
        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(matches!(r.begin_chunk(), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut buf = written(60, |w| {
            w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA).unwrap();
            w.write_u32(12345).unwrap();
            w.end_chunk().unwrap();
        });
        buf[12] ^= 0xFF;
        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(matches!(r.begin_chunk(), Err(Error::CrcMismatch { .. })));
    }

    #[test]
    fn test_legacy_length_width() {
        let buf = written(4, |w| {
            w.begin_chunk(7).unwrap();
            w.write_u32(11).unwrap();
            w.end_chunk().unwrap();
        });
        assert_eq!(buf.len(), 12);

        let mut r = BufferReader::new(&buf, 4, 0);
        assert_eq!(r.begin_chunk().unwrap(), 7);
        assert_eq!(r.read_u32().unwrap(), 11);
        r.end_chunk().unwrap();

        // Read with the wrong dialect the length field swallows the body.
        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(r.begin_chunk().is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let buf = written(60, |w| {
            for _ in 0..=MAX_CHUNK_DEPTH {
                w.begin_chunk(1).unwrap();
            }
            for _ in 0..=MAX_CHUNK_DEPTH {
                w.end_chunk().unwrap();
            }
        });
        let mut r = BufferReader::new(&buf, 60, 0);
        for _ in 0..MAX_CHUNK_DEPTH {
            r.begin_chunk().unwrap();
        }
        assert!(matches!(r.begin_chunk(), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_huge_count_rejected_before_allocation() {
        let buf = written(60, |w| w.write_u32(u32::MAX).unwrap());
        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(matches!(r.read_f64_array(), Err(Error::UnexpectedEof(_))));
    }
}
