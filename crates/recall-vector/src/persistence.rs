//! Versioned JSON snapshot format.
//!
//! Current layout (format version 2):
//!
//! ```json
//! {
//!   "format_version": 2,
//!   "dimension": 384,
//!   "ids": ["a", "b"],
//!   "metadata": [{}, {}],
//!   "vectors": "<base64 of f32 LE, row-major>",
//!   "norms": "<base64 of f32 LE>",
//!   "options": { "built_at": "2026-01-01T00:00:00Z" }
//! }
//! ```
//!
//! Legacy snapshots carry `vectors` as an array of float arrays and no
//! norms; norms are recomputed on load. Both are accepted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use recall_core::config::LegacyDimensionPolicy;
use recall_core::constants::SNAPSHOT_FORMAT_VERSION;
use recall_core::errors::{RecallResult, SnapshotError, ValidationError};
use recall_core::models::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::snapshot::VectorSnapshot;

const F32_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    format_version: u32,
    dimension: usize,
    ids: Vec<String>,
    #[serde(default)]
    metadata: Vec<Metadata>,
    vectors: String,
    norms: String,
    #[serde(default)]
    options: SnapshotOptions,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotOptions {
    #[serde(default)]
    built_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LegacySnapshot {
    #[serde(default)]
    format_version: Option<u32>,
    #[serde(default)]
    dimension: Option<usize>,
    ids: Vec<String>,
    #[serde(default)]
    metadata: Vec<Metadata>,
    vectors: Vec<Vec<f32>>,
}

/// Serialize a snapshot to the current JSON format.
pub fn encode(snapshot: &VectorSnapshot) -> RecallResult<String> {
    let document = SnapshotDocument {
        format_version: SNAPSHOT_FORMAT_VERSION,
        dimension: snapshot.dimension(),
        ids: snapshot.ids().to_vec(),
        metadata: snapshot.metadata().to_vec(),
        vectors: STANDARD.encode(floats_to_bytes(snapshot.matrix())),
        norms: STANDARD.encode(floats_to_bytes(snapshot.norms())),
        options: SnapshotOptions {
            built_at: snapshot.built_at(),
        },
    };
    serde_json::to_string(&document).map_err(|e| {
        SnapshotError::Serialize {
            reason: e.to_string(),
        }
        .into()
    })
}

/// Parse a snapshot in either the current or the legacy format.
///
/// `expected_dimension` is the store's current dimension. When the data
/// disagrees, `policy` decides whether the store adopts the data's
/// dimension or the load fails.
pub fn decode(
    json: &str,
    expected_dimension: usize,
    policy: LegacyDimensionPolicy,
) -> RecallResult<VectorSnapshot> {
    let value: Value = serde_json::from_str(json).map_err(deserialize_error)?;
    let is_legacy = value.get("vectors").is_some_and(Value::is_array);

    if is_legacy {
        let legacy: LegacySnapshot = serde_json::from_value(value).map_err(deserialize_error)?;
        decode_legacy(legacy, expected_dimension, policy)
    } else {
        let document: SnapshotDocument =
            serde_json::from_value(value).map_err(deserialize_error)?;
        decode_current(document, expected_dimension, policy)
    }
}

fn decode_current(
    document: SnapshotDocument,
    expected_dimension: usize,
    policy: LegacyDimensionPolicy,
) -> RecallResult<VectorSnapshot> {
    check_version(document.format_version)?;
    let dimension = resolve_dimension(document.dimension, expected_dimension, policy)?;
    let n = document.ids.len();

    let matrix_len = n
        .checked_mul(dimension)
        .and_then(|floats| floats.checked_mul(F32_BYTES))
        .ok_or_else(|| SnapshotError::CorruptSnapshot {
            details: format!("{n} rows x {dimension} overflows the matrix size"),
        })?;
    let norms_len = n.checked_mul(F32_BYTES).ok_or_else(|| SnapshotError::CorruptSnapshot {
        details: format!("{n} rows overflow the norms size"),
    })?;

    let matrix_bytes = decode_buffer("vectors", &document.vectors, matrix_len)?;
    let norm_bytes = decode_buffer("norms", &document.norms, norms_len)?;

    debug!(rows = n, dimension, "decoded snapshot buffers");
    VectorSnapshot::from_parts(
        dimension,
        bytes_to_floats(&matrix_bytes),
        Some(bytes_to_floats(&norm_bytes)),
        document.ids,
        document.metadata,
        document.options.built_at,
    )
}

fn decode_legacy(
    legacy: LegacySnapshot,
    expected_dimension: usize,
    policy: LegacyDimensionPolicy,
) -> RecallResult<VectorSnapshot> {
    if let Some(version) = legacy.format_version {
        check_version(version)?;
    }
    warn!(rows = legacy.vectors.len(), "loading legacy snapshot format");

    let data_dimension = legacy
        .vectors
        .first()
        .map(Vec::len)
        .or(legacy.dimension)
        .unwrap_or(expected_dimension);
    if let Some((row, bad)) = legacy
        .vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != data_dimension)
    {
        return Err(SnapshotError::CorruptSnapshot {
            details: format!(
                "row {row} has {} values, expected {data_dimension}",
                bad.len()
            ),
        }
        .into());
    }
    if legacy.ids.len() != legacy.vectors.len() {
        return Err(SnapshotError::CorruptSnapshot {
            details: format!(
                "{} ids for {} vectors",
                legacy.ids.len(),
                legacy.vectors.len()
            ),
        }
        .into());
    }

    let dimension = resolve_dimension(data_dimension, expected_dimension, policy)?;
    let metadata = if legacy.metadata.is_empty() {
        vec![Metadata::new(); legacy.ids.len()]
    } else {
        legacy.metadata
    };
    let matrix: Vec<f32> = legacy.vectors.into_iter().flatten().collect();

    VectorSnapshot::from_parts(dimension, matrix, None, legacy.ids, metadata, None)
}

fn check_version(found: u32) -> RecallResult<()> {
    if found == 0 || found > SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found,
            supported: SNAPSHOT_FORMAT_VERSION,
        }
        .into());
    }
    Ok(())
}

fn resolve_dimension(
    data_dimension: usize,
    expected_dimension: usize,
    policy: LegacyDimensionPolicy,
) -> RecallResult<usize> {
    if data_dimension == expected_dimension {
        return Ok(data_dimension);
    }
    match policy {
        LegacyDimensionPolicy::Adopt => {
            warn!(
                configured = expected_dimension,
                snapshot = data_dimension,
                "snapshot dimension differs from configuration, adopting snapshot"
            );
            Ok(data_dimension)
        }
        LegacyDimensionPolicy::Strict => Err(ValidationError::DimensionMismatch {
            expected: expected_dimension,
            actual: data_dimension,
        }
        .into()),
    }
}

fn decode_buffer(field: &str, encoded: &str, expected_len: usize) -> RecallResult<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| SnapshotError::CorruptSnapshot {
            details: format!("{field}: invalid base64: {e}"),
        })?;
    if bytes.len() != expected_len {
        return Err(SnapshotError::CorruptSnapshot {
            details: format!("{field}: {} bytes, expected {expected_len}", bytes.len()),
        }
        .into());
    }
    Ok(bytes)
}

fn deserialize_error(e: serde_json::Error) -> recall_core::errors::RecallError {
    SnapshotError::Deserialize {
        reason: e.to_string(),
    }
    .into()
}

fn floats_to_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(F32_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
