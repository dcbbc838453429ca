/// Vector snapshot (de)serialization errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {reason}")]
    Serialize { reason: String },

    #[error("snapshot deserialization failed: {reason}")]
    Deserialize { reason: String },

    #[error("unsupported snapshot format version {found} (max supported {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("corrupt snapshot: {details}")]
    CorruptSnapshot { details: String },
}
