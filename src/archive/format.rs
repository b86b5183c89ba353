//! Archive format constants and structures.

/// Container schema version written into every envelope.
pub const CONTAINER_FORMAT_VERSION: i32 = 10000;

/// 3dm version used when the caller does not ask for one.
pub const DEFAULT_ARCHIVE_3DM_VERSION: i32 = 60;

/// Highest legacy 3dm version (V1 to V5 file dialects).
pub const LEGACY_VERSION_MAX: i32 = 5;

/// Lowest modern 3dm version. Versions strictly between
/// [`LEGACY_VERSION_MAX`] and this value were never released.
pub const MIN_MODERN_VERSION: i32 = 50;

/// Bytes added to an object's self-reported size when pre-allocating
/// the write buffer. Covers user data and chunk framing.
pub const SIZE_ESTIMATE_MARGIN: usize = 512;

/// Typecode flag: the chunk body is followed by a CRC-32 of the body.
pub const TCODE_CRC: u32 = 0x8000;

/// Outer chunk of a serialized class instance.
pub const TCODE_OPENNURBS_CLASS: u32 = 0x0002_7FFA;

/// Class identifier chunk (16 byte id).
pub const TCODE_OPENNURBS_CLASS_UUID: u32 = 0x0002_7FFB;

/// Class data chunk. Carries [`TCODE_CRC`].
pub const TCODE_OPENNURBS_CLASS_DATA: u32 = 0x0002_FFFC;

/// User string chunk attached to a class instance. Carries [`TCODE_CRC`].
pub const TCODE_OPENNURBS_CLASS_USERDATA: u32 = 0x0002_FFFD;

/// Empty terminator chunk of a class instance.
pub const TCODE_OPENNURBS_CLASS_END: u32 = 0x0002_7FFF;

/// Dictionary header chunk.
pub const TCODE_DICTIONARY: u32 = 0x0010_0040;

/// Dictionary entry chunk.
pub const TCODE_DICTIONARY_ENTRY: u32 = 0x0010_0041;

/// Dictionary terminator chunk.
pub const TCODE_DICTIONARY_END: u32 = 0x0010_0042;

/// Size of a chunk typecode.
pub const TYPECODE_SIZE: usize = 4;

/// Size of a CRC-32 trailer.
pub const CRC_SIZE: usize = 4;

/// Deepest chunk nesting a reader accepts.
pub const MAX_CHUNK_DEPTH: usize = 64;

/// 128-bit class identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub u128);

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.0;
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xFFFF_FFFF_FFFF
        )
    }
}

pub const NURBS_CURVE_CLASS_ID: ClassId = ClassId(0x4ED7D4DD_E947_11D3_BFE5_0010830122F0);
pub const LINE_CURVE_CLASS_ID: ClassId = ClassId(0x4ED7D4DB_E947_11D3_BFE5_0010830122F0);
pub const POLYLINE_CURVE_CLASS_ID: ClassId = ClassId(0x4ED7D4E6_E947_11D3_BFE5_0010830122F0);
pub const POLY_CURVE_CLASS_ID: ClassId = ClassId(0x4ED7D4E0_E947_11D3_BFE5_0010830122F0);
pub const ARC_CURVE_CLASS_ID: ClassId = ClassId(0xCF33BE2A_09B4_11D4_BFFB_0010830122F0);
pub const MESH_CLASS_ID: ClassId = ClassId(0x4ED7D4E4_E947_11D3_BFE5_0010830122F0);
pub const BREP_CLASS_ID: ClassId = ClassId(0x60B5DBC5_E660_11D3_BFE4_0010830122F0);
pub const VIEWPORT_CLASS_ID: ClassId = ClassId(0xD66E5CCF_EA39_11D3_BFE5_0010830122F0);
pub const POINT_CLASS_ID: ClassId = ClassId(0xC3101A1D_F157_11D3_BFE7_0010830122F0);
pub const TEXT_DOT_CLASS_ID: ClassId = ClassId(0x74198302_CDF4_4F95_9609_6D684F22AB37);
pub const LAYER_CLASS_ID: ClassId = ClassId(0x95809813_E985_11D3_BFE5_0010830122F0);

/// Identifier written at the head of archivable dictionaries.
pub const DICTIONARY_ID: ClassId = ClassId(0x21EE7933_1E2D_4047_869E_6BDBF986EA11);

/// Check whether a chunk typecode carries a CRC trailer.
#[inline]
pub const fn has_crc(typecode: u32) -> bool {
    (typecode & TCODE_CRC) != 0
}

/// Check whether a 3dm version uses 8-byte chunk lengths.
#[inline]
pub const fn uses_long_chunk_lengths(archive_3dm_version: i32) -> bool {
    archive_3dm_version >= MIN_MODERN_VERSION
}

/// Size of a chunk length field for a 3dm version.
#[inline]
pub const fn chunk_length_size(archive_3dm_version: i32) -> usize {
    if uses_long_chunk_lengths(archive_3dm_version) {
        8
    } else {
        4
    }
}

/// Check whether a declared 3dm version may be read.
///
/// Versions 6 to 49 were written by experimental builds and are rejected.
#[inline]
pub const fn is_readable_archive_version(archive_3dm_version: i32) -> bool {
    !(archive_3dm_version > LEGACY_VERSION_MAX && archive_3dm_version < MIN_MODERN_VERSION)
}
