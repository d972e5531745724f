// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Nothing in the placement loop is fatal. These errors exist so that the
//! reason a feature went unavailable for a session can be traced, not so
//! that callers can recover from them.

use alloc::string::String;
use core::fmt;

/// Why a hit-test source could not be acquired for a session.
///
/// Any of these leaves the source unset for the rest of the session; no
/// retry is attempted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AcquireError {
    /// The session does not support hit-testing.
    Unsupported,
    /// The session ended while the request was in flight.
    SessionEnded,
    /// The request was dropped by the host without ever completing.
    Abandoned,
    /// The host rejected the request with a message.
    Rejected(String),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "hit-testing is not supported by this session"),
            Self::SessionEnded => write!(f, "session ended before the hit-test source resolved"),
            Self::Abandoned => write!(f, "hit-test source request was abandoned"),
            Self::Rejected(msg) => write!(f, "hit-test source request rejected: {msg}"),
        }
    }
}

impl core::error::Error for AcquireError {}

/// Why a model asset could not become a placement target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetError {
    /// The resource could not be fetched.
    Fetch(String),
    /// Fewer bytes than a binary glTF header plus one chunk header.
    Truncated {
        /// Number of bytes available.
        len: usize,
    },
    /// The first four bytes are not `glTF`.
    BadMagic([u8; 4]),
    /// Container version other than 2.
    UnsupportedVersion(u32),
    /// Header length disagrees with the number of bytes received.
    LengthMismatch {
        /// Length recorded in the header.
        declared: u32,
        /// Bytes actually received.
        actual: usize,
    },
    /// The first chunk is not the JSON chunk, or runs past the end.
    MissingJsonChunk,
    /// The BIN chunk declares more bytes than the container holds.
    BinChunkOverrun {
        /// Payload length recorded in the chunk header.
        declared: u32,
        /// Bytes left after the chunk header.
        available: usize,
    },
    /// The container is sound but its glTF content could not be decoded.
    Decode(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(msg) => write!(f, "asset fetch failed: {msg}"),
            Self::Truncated { len } => write!(f, "asset truncated: only {len} bytes"),
            Self::BadMagic(m) => write!(f, "not a binary glTF file (magic {m:02x?})"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported glTF container version {v}"),
            Self::LengthMismatch { declared, actual } => write!(
                f,
                "glTF header declares {declared} bytes but {actual} were received"
            ),
            Self::MissingJsonChunk => write!(f, "glTF JSON chunk missing or malformed"),
            Self::BinChunkOverrun {
                declared,
                available,
            } => write!(
                f,
                "glTF BIN chunk declares {declared} bytes but only {available} follow"
            ),
            Self::Decode(msg) => write!(f, "glTF content not decodable: {msg}"),
        }
    }
}

impl core::error::Error for AssetError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_includes_host_message() {
        let err = AcquireError::Rejected("NotSupportedError".into());
        assert_eq!(
            err.to_string(),
            "hit-test source request rejected: NotSupportedError"
        );
    }

    #[test]
    fn asset_length_mismatch_message() {
        let err = AssetError::LengthMismatch {
            declared: 100,
            actual: 20,
        };
        assert_eq!(
            err.to_string(),
            "glTF header declares 100 bytes but 20 were received"
        );
    }
}
