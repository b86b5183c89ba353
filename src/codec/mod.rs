//! Object encode / decode.
//!
//! An encoded object is a four-field envelope:
//!
//! ```json
//! { "version": 10000, "archive3dm": 60, "opennurbs": 1075970000, "data": "<base64>" }
//! ```
//!
//! `version` is the container schema, `archive3dm` the requested 3dm
//! dialect, `opennurbs` the resolved engine version for that dialect, and
//! `data` the chunked payload holding exactly one object.
//!
//! [`encode`] and [`decode`] never fail loudly: every failure becomes
//! `None` and is logged at debug level. [`try_encode`] and [`try_decode`]
//! expose the underlying error.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::archive::{
    is_readable_archive_version, opennurbs_version_to_write, read_dictionary, read_object,
    write_dictionary, write_object, ArchivableDictionary, BufferReader, BufferWriter,
    CONTAINER_FORMAT_VERSION, CURRENT_ENGINE_VERSION, DEFAULT_ARCHIVE_3DM_VERSION,
    SIZE_ESTIMATE_MARGIN,
};
use crate::binding::{create_wrapper, ObjectHandle, Wrapper};
use crate::core::{Object, UserDataHolder};
use crate::util::{Error, Result};

/// Serialized object envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedObject {
    /// Container schema version, always [`CONTAINER_FORMAT_VERSION`] when written.
    pub version: i32,
    /// 3dm dialect of the payload.
    pub archive3dm: i32,
    /// Engine version resolved for the dialect.
    pub opennurbs: u32,
    /// Payload bytes, base64 in JSON.
    #[serde(with = "base64_data")]
    pub data: Vec<u8>,
}

mod base64_data {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

impl EncodedObject {
    /// Payload encoded as standard base64.
    pub fn data_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Build an envelope from a base64 payload.
    pub fn from_base64(archive3dm: i32, opennurbs: u32, data: &str) -> Result<Self> {
        Ok(Self {
            version: CONTAINER_FORMAT_VERSION,
            archive3dm,
            opennurbs,
            data: STANDARD.decode(data.as_bytes())?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the JSON form to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Read the JSON form from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Options for [`encode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// 3dm dialect to write.
    pub archive_3dm_version: i32,
    /// Include user strings in the payload.
    pub write_user_data: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            archive_3dm_version: DEFAULT_ARCHIVE_3DM_VERSION,
            write_user_data: true,
        }
    }
}

impl EncodeOptions {
    pub fn with_archive_3dm_version(mut self, version: i32) -> Self {
        self.archive_3dm_version = version;
        self
    }

    pub fn with_user_data(mut self, write: bool) -> Self {
        self.write_user_data = write;
        self
    }
}

fn resolve_versions(archive_3dm_version: i32) -> Result<u32> {
    if !is_readable_archive_version(archive_3dm_version) {
        return Err(Error::UnsupportedVersion(archive_3dm_version));
    }
    opennurbs_version_to_write(archive_3dm_version, CURRENT_ENGINE_VERSION)
        .ok_or(Error::UnresolvedVersion(archive_3dm_version))
}

/// Encode an object, reporting why it failed.
///
/// When `write_user_data` is false the object's user strings are detached
/// for the duration of the call and reattached before it returns, on every
/// path.
pub fn try_encode(object: &mut Object, options: &EncodeOptions) -> Result<EncodedObject> {
    let version = options.archive_3dm_version;
    let holder = UserDataHolder::new(object, !options.write_user_data);
    let opennurbs = resolve_versions(version)?;

    let capacity = holder.size_of() + SIZE_ESTIMATE_MARGIN;
    let mut writer = BufferWriter::new(capacity, version, opennurbs)?;
    write_object(&mut writer, &holder)?;
    tracing::trace!(
        "encoded {} into {} bytes (estimate {})",
        holder.class_name(),
        writer.size_of_archive(),
        capacity
    );

    Ok(EncodedObject {
        version: CONTAINER_FORMAT_VERSION,
        archive3dm: version,
        opennurbs,
        data: writer.into_buffer()?,
    })
}

/// Encode an object. Returns None for a missing object or any failure.
pub fn encode(object: Option<&mut Object>, options: &EncodeOptions) -> Option<EncodedObject> {
    let object = object?;
    match try_encode(object, options) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::debug!("encode failed: {}", e);
            None
        }
    }
}

fn check_envelope(encoded: &EncodedObject) -> Result<()> {
    if !is_readable_archive_version(encoded.archive3dm) {
        return Err(Error::UnsupportedVersion(encoded.archive3dm));
    }
    if encoded.data.is_empty() {
        return Err(Error::invalid("empty payload"));
    }
    if encoded.version != CONTAINER_FORMAT_VERSION {
        tracing::debug!("envelope declares container version {}", encoded.version);
    }
    Ok(())
}

/// Decode an envelope, reporting why it failed.
pub fn try_decode(encoded: &EncodedObject) -> Result<Object> {
    check_envelope(encoded)?;
    let mut reader = BufferReader::new(&encoded.data, encoded.archive3dm, encoded.opennurbs);
    let object = read_object(&mut reader)?;
    if !reader.at_end() {
        return Err(Error::invalid(format!(
            "{} trailing bytes after the object",
            reader.remaining()
        )));
    }
    Ok(object)
}

/// Decode an envelope. Returns None for a rejected version, an empty or
/// malformed payload, or a payload that is not exactly one object.
pub fn decode(encoded: &EncodedObject) -> Option<Object> {
    match try_decode(encoded) {
        Ok(object) => Some(object),
        Err(e) => {
            tracing::debug!("decode failed: {}", e);
            None
        }
    }
}

/// Decode an envelope and wrap the object in its most specific wrapper.
pub fn decode_wrapper(encoded: &EncodedObject) -> Option<Wrapper> {
    create_wrapper(decode(encoded).map(ObjectHandle::Owned))
}

/// Encode a dictionary with the default 3dm dialect.
pub fn encode_dictionary(dict: &ArchivableDictionary) -> Result<EncodedObject> {
    let version = DEFAULT_ARCHIVE_3DM_VERSION;
    let opennurbs = resolve_versions(version)?;
    let mut writer = BufferWriter::new(dict.size_of() + SIZE_ESTIMATE_MARGIN, version, opennurbs)?;
    write_dictionary(&mut writer, dict)?;
    Ok(EncodedObject {
        version: CONTAINER_FORMAT_VERSION,
        archive3dm: version,
        opennurbs,
        data: writer.into_buffer()?,
    })
}

/// Decode a dictionary envelope.
pub fn decode_dictionary(encoded: &EncodedObject) -> Result<ArchivableDictionary> {
    check_envelope(encoded)?;
    let mut reader = BufferReader::new(&encoded.data, encoded.archive3dm, encoded.opennurbs);
    read_dictionary(&mut reader)
}
