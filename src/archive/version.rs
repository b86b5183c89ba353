//! Engine version numbers and on-disk dialect resolution.
//!
//! Two numbers describe how a payload was written: the requested 3dm
//! version (`archive3dm`, e.g. 60) and the resolved opennurbs version
//! (`opennurbs`). Legacy dialects use `YYYYMMDDn` date stamps; modern
//! dialects use a packed [`EngineVersion`] with bit 30 set so the two
//! forms never collide.

use super::format::{LEGACY_VERSION_MAX, MIN_MODERN_VERSION};

/// Marker bit of a packed engine version.
const PACKED_VERSION_FLAG: u32 = 1 << 30;

/// Date stamps of the legacy 3dm dialects, indexed by 3dm version.
const LEGACY_OPENNURBS_VERSIONS: [u32; LEGACY_VERSION_MAX as usize] = [
    200_012_210, // V1
    200_012_210, // V2
    200_611_280, // V3
    200_712_190, // V4
    201_010_150, // V5
];

/// Version of the engine that writes an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EngineVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u16,
}

/// Version of this library's writer.
pub const CURRENT_ENGINE_VERSION: EngineVersion = EngineVersion {
    major: 8,
    minor: 1,
    build: 25_070,
};

impl EngineVersion {
    /// Create an engine version.
    pub const fn new(major: u8, minor: u8, build: u16) -> Self {
        Self { major, minor, build }
    }

    /// Pack into the u32 stored in an envelope's `opennurbs` field.
    pub const fn packed(&self) -> u32 {
        PACKED_VERSION_FLAG
            | ((self.major as u32 & 0xFF) << 22)
            | ((self.minor as u32 & 0x3F) << 16)
            | self.build as u32
    }

    /// Unpack a modern opennurbs version. Returns None for legacy date stamps.
    pub const fn unpack(value: u32) -> Option<Self> {
        if value & PACKED_VERSION_FLAG == 0 || value >> 31 != 0 {
            return None;
        }
        Some(Self {
            major: ((value >> 22) & 0xFF) as u8,
            minor: ((value >> 16) & 0x3F) as u8,
            build: (value & 0xFFFF) as u16,
        })
    }

    /// The 3dm version this engine writes natively (major * 10).
    pub const fn archive_3dm_version(&self) -> i32 {
        self.major as i32 * 10
    }
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Resolve the opennurbs version to record for a requested 3dm version.
///
/// - 1 to 5: the fixed date stamp of that legacy dialect.
/// - multiples of 10 from 50 up to the current major: the current engine
///   version for the current major, `major.0.0` for older ones.
/// - anything else: None.
pub fn opennurbs_version_to_write(archive_3dm_version: i32, current: EngineVersion) -> Option<u32> {
    if (1..=LEGACY_VERSION_MAX).contains(&archive_3dm_version) {
        return Some(LEGACY_OPENNURBS_VERSIONS[(archive_3dm_version - 1) as usize]);
    }
    if archive_3dm_version < MIN_MODERN_VERSION || archive_3dm_version % 10 != 0 {
        return None;
    }
    let major = archive_3dm_version / 10;
    if major > current.major as i32 {
        return None;
    }
    if major == current.major as i32 {
        return Some(current.packed());
    }
    Some(EngineVersion::new(major as u8, 0, 0).packed())
}

/// Human readable description of this library's engine version.
pub fn version_string() -> String {
    let date = option_env!("RHINO3DM_BUILD_DATE").unwrap_or("unknown");
    format!("rhino3dm {} (built {})", CURRENT_ENGINE_VERSION, date)
}
