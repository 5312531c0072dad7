//! Snapshot codec for persisted history states.
//!
//! `ImportState` adopts a [`HistoryState`] verbatim, so a persisted snapshot
//! must round-trip every field losslessly. Two encodings are provided: a
//! framed, checksummed MessagePack format for compact storage and plain JSON
//! for human inspection. Embedding applications are free to use their own
//! format instead.

use crate::error::{InstrumentError, Result};
use crate::history::HistoryState;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Magic bytes for a binary snapshot.
const SNAPSHOT_MAGIC: &[u8; 4] = b"HST\0";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u8 = 1;

/// Header length: magic + version + CRC32 of the body.
const HEADER_LEN: usize = 4 + 1 + 4;

/// Encode a history state as a framed MessagePack snapshot.
pub fn encode<S, A>(state: &HistoryState<S, A>) -> Result<Vec<u8>>
where
    S: Serialize,
    A: Serialize,
{
    let body = rmp_serde::to_vec(state)?;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&body);
    let crc = hasher.finalize();

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a framed MessagePack snapshot, verifying magic, version and
/// checksum.
pub fn decode<S, A>(bytes: &[u8]) -> Result<HistoryState<S, A>>
where
    S: DeserializeOwned,
    A: DeserializeOwned,
{
    if bytes.len() < HEADER_LEN {
        return Err(InstrumentError::InvalidFormat(
            "snapshot shorter than header".into(),
        ));
    }
    if &bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(InstrumentError::InvalidFormat("bad snapshot magic".into()));
    }
    if bytes[4] != SNAPSHOT_VERSION {
        return Err(InstrumentError::InvalidFormat(format!(
            "unsupported snapshot version: {}",
            bytes[4]
        )));
    }

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[5..HEADER_LEN]);
    let expected = u32::from_le_bytes(crc_bytes);

    let body = &bytes[HEADER_LEN..];
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(body);
    let got = hasher.finalize();
    if got != expected {
        return Err(InstrumentError::ChecksumMismatch { expected, got });
    }

    Ok(rmp_serde::from_slice(body)?)
}

/// Encode a history state as JSON.
pub fn to_json<S, A>(state: &HistoryState<S, A>) -> Result<String>
where
    S: Serialize,
    A: Serialize,
{
    Ok(serde_json::to_string(state)?)
}

/// Decode a history state from JSON.
pub fn from_json<S, A>(json: &str) -> Result<HistoryState<S, A>>
where
    S: DeserializeOwned,
    A: DeserializeOwned,
{
    serde_json::from_str(json).map_err(|e| InstrumentError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LiftingEngine;
    use crate::store::SharedReducer;
    use crate::LiftedAction;
    use std::sync::Arc;

    fn sample_history() -> HistoryState<i64, String> {
        let reducer: SharedReducer<i64, String> =
            Arc::new(|state: &i64, action: &String| match action.as_str() {
                "INCREMENT" => state + 1,
                _ => *state,
            });
        let engine = LiftingEngine::new(reducer, 0, None).unwrap();
        let mut state = engine.initial_history();
        for _ in 0..3 {
            state = engine.transition(&state, &LiftedAction::perform("INCREMENT".to_string()));
        }
        state
    }

    #[test]
    fn test_binary_roundtrip() {
        let state = sample_history();
        let bytes = encode(&state).unwrap();
        let decoded: HistoryState<i64, String> = decode(&bytes).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_json_roundtrip() {
        let state = sample_history();
        let json = to_json(&state).unwrap();
        let decoded: HistoryState<i64, String> = from_json(&json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = encode(&sample_history()).unwrap();
        bytes[0] = b'X';
        let err = decode::<i64, String>(&bytes).unwrap_err();
        assert!(matches!(err, InstrumentError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_bad_version() {
        let mut bytes = encode(&sample_history()).unwrap();
        bytes[4] = 9;
        let err = decode::<i64, String>(&bytes).unwrap_err();
        assert!(matches!(err, InstrumentError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_corrupt_body() {
        let mut bytes = encode(&sample_history()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = decode::<i64, String>(&bytes).unwrap_err();
        assert!(matches!(err, InstrumentError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_rejects_truncated_snapshot() {
        let err = decode::<i64, String>(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, InstrumentError::InvalidFormat(_)));
    }
}
