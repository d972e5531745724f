// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary glTF (`.glb`) container validation.
//!
//! A cheap structural check run on fetched bytes before any mesh decoding,
//! so that an HTML error page or a cut-off download is reported as such.
//! Layout (all little-endian `u32`):
//!
//! ```text
//! header: magic "glTF" | version | total length
//! chunk:  length | type "JSON" | payload (padded to 4)
//! chunk:  length | type "BIN\0" | payload            (optional)
//! ```

use crate::error::AssetError;

const MAGIC: [u8; 4] = *b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// What the GLB header says about a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetInfo {
    /// Container version (always 2 once parsed).
    pub version: u32,
    /// Total length in bytes.
    pub total_len: u32,
    /// Length of the JSON chunk payload.
    pub json_len: u32,
    /// Length of the binary chunk payload, if present.
    pub bin_len: Option<u32>,
}

impl AssetInfo {
    /// Parses and validates a GLB container.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] describing the first structural problem found.
    pub fn parse_glb(bytes: &[u8]) -> Result<Self, AssetError> {
        if bytes.len() < HEADER_LEN + CHUNK_HEADER_LEN {
            return Err(AssetError::Truncated { len: bytes.len() });
        }
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(AssetError::BadMagic(magic));
        }
        let version = read_u32(bytes, 4);
        if version != 2 {
            return Err(AssetError::UnsupportedVersion(version));
        }
        let total_len = read_u32(bytes, 8);
        if total_len as usize != bytes.len() {
            return Err(AssetError::LengthMismatch {
                declared: total_len,
                actual: bytes.len(),
            });
        }

        let json_len = read_u32(bytes, HEADER_LEN);
        if read_u32(bytes, HEADER_LEN + 4) != CHUNK_JSON {
            return Err(AssetError::MissingJsonChunk);
        }
        let json_end =
            chunk_end(HEADER_LEN, json_len, bytes.len()).ok_or(AssetError::MissingJsonChunk)?;

        // A trailing chunk that is not BIN is an extension chunk; ignore it.
        let rest = bytes.len() - json_end;
        let bin_len = if rest >= CHUNK_HEADER_LEN && read_u32(bytes, json_end + 4) == CHUNK_BIN {
            let len = read_u32(bytes, json_end);
            if chunk_end(json_end, len, bytes.len()).is_none() {
                return Err(AssetError::BinChunkOverrun {
                    declared: len,
                    available: rest - CHUNK_HEADER_LEN,
                });
            }
            Some(len)
        } else {
            None
        };

        Ok(Self {
            version,
            total_len,
            json_len,
            bin_len,
        })
    }
}

/// End offset of the chunk whose header starts at `start`, if the whole
/// chunk fits in `limit` bytes. Lengths come from the file, so every step is
/// checked: `usize` is 32 bits on wasm.
fn chunk_end(start: usize, payload_len: u32, limit: usize) -> Option<usize> {
    let payload_len = usize::try_from(payload_len).ok()?;
    start
        .checked_add(CHUNK_HEADER_LEN)?
        .checked_add(payload_len)
        .filter(|&end| end <= limit)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2_u32.to_le_bytes());
        out.extend_from_slice(&0_u32.to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(json);
        if let Some(bin) = bin {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(bin);
        }
        let total = out.len() as u32;
        out[8..12].copy_from_slice(&total.to_le_bytes());
        out
    }

    #[test]
    fn parses_json_and_bin_chunks() {
        let bytes = glb(br#"{"asset":{}}"#, Some(&[0; 16]));
        let info = AssetInfo::parse_glb(&bytes).expect("valid glb");
        assert_eq!(info.version, 2);
        assert_eq!(info.json_len, 12);
        assert_eq!(info.bin_len, Some(16));
        assert_eq!(info.total_len as usize, bytes.len());
    }

    #[test]
    fn json_only_model_has_no_bin() {
        let bytes = glb(br#"{"asset":{ }}"#, None);
        let info = AssetInfo::parse_glb(&bytes).expect("valid glb");
        assert_eq!(info.bin_len, None);
    }

    #[test]
    fn rejects_html_error_page() {
        let bytes = b"<!DOCTYPE html><html></html>";
        assert_eq!(
            AssetInfo::parse_glb(bytes),
            Err(AssetError::BadMagic(*b"<!DO"))
        );
    }

    #[test]
    fn rejects_truncated_download() {
        let mut bytes = glb(br#"{"asset":{}}"#, Some(&[0; 16]));
        bytes.truncate(30);
        assert_eq!(
            AssetInfo::parse_glb(&bytes),
            Err(AssetError::LengthMismatch {
                declared: 56,
                actual: 30,
            })
        );
        assert_eq!(
            AssetInfo::parse_glb(&bytes[..10]),
            Err(AssetError::Truncated { len: 10 })
        );
    }

    #[test]
    fn rejects_version_one() {
        let mut bytes = glb(br#"{"asset":{}}"#, None);
        bytes[4] = 1;
        assert_eq!(
            AssetInfo::parse_glb(&bytes),
            Err(AssetError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn rejects_missing_json_chunk() {
        let mut bytes = glb(br#"{"asset":{}}"#, None);
        bytes[16..20].copy_from_slice(&CHUNK_BIN.to_le_bytes());
        assert_eq!(
            AssetInfo::parse_glb(&bytes),
            Err(AssetError::MissingJsonChunk)
        );
    }

    #[test]
    fn rejects_json_chunk_longer_than_file() {
        let mut bytes = glb(br#"{"asset":{}}"#, Some(&[0; 16]));
        bytes[12..16].copy_from_slice(&0xFFFF_FFF0_u32.to_le_bytes());
        assert_eq!(
            AssetInfo::parse_glb(&bytes),
            Err(AssetError::MissingJsonChunk)
        );
    }

    #[test]
    fn rejects_bin_chunk_overrunning_container() {
        let mut bytes = glb(br#"{"asset":{}}"#, Some(&[0; 16]));
        assert_eq!(bytes.len(), 56);
        bytes[32..36].copy_from_slice(&1_000_000_u32.to_le_bytes());
        assert_eq!(
            AssetInfo::parse_glb(&bytes),
            Err(AssetError::BinChunkOverrun {
                declared: 1_000_000,
                available: 16,
            })
        );
    }

    #[test]
    fn chunk_end_never_overflows() {
        assert_eq!(chunk_end(usize::MAX - 4, 0, usize::MAX), None);
        assert_eq!(chunk_end(usize::MAX - 16, u32::MAX, usize::MAX), None);
        assert_eq!(chunk_end(12, 12, 32), Some(32));
        assert_eq!(chunk_end(12, 13, 32), None);
    }
}
