//! Error types for volplan

use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum VolplanError {
    #[error("Invalid size format: '{0}' (expected <integer> followed by MiB, GiB or %)")]
    InvalidFormat(String),

    #[error("Unsupported unit '{unit}' in '{input}': no base quantity to resolve against")]
    UnsupportedUnit { input: String, unit: String },

    #[error("Insufficient disk size for {context}: {required_mib}MiB required, {available_mib}MiB available")]
    InsufficientDiskSize {
        context: String,
        required_mib: u64,
        available_mib: u64,
    },

    #[error("Volume '{volume}' size {size_mib}MiB is not a multiple of {extent_mib}MiB")]
    MisalignedSize {
        volume: String,
        size_mib: u64,
        extent_mib: u64,
    },

    #[error("More than one volume requests remaining space: '{first}' and '{second}'")]
    MultipleBlankVolumes { first: String, second: String },

    #[error("Volumes total {requested_mib}MiB but the thin pool holds {pool_mib}MiB")]
    OverAllocatedPool { requested_mib: u64, pool_mib: u64 },

    #[error("Volume '{0}' has a filesystem but no mount point")]
    MissingMountPoint(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, VolplanError>;
