use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolo2coco operations.
///
/// Item-level problems (an unreadable image, a malformed label line) never
/// surface here; they are collected in a
/// [`ConversionReport`](crate::conversion::ConversionReport) instead.
#[derive(Debug, Error)]
pub enum Yolo2CocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse class names from {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid classes file {path}: {message}")]
    ClassesTxtInvalid { path: PathBuf, message: String },

    #[error("Failed to list images in {path}: {message}")]
    ImagesDirScan { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid image dimensions for {path}: {message}")]
    ImageDimensionInvalid { path: PathBuf, message: String },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize conversion summary: {source}")]
    SummarySerialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("{failed} of {total} partition(s) failed to convert")]
    PartitionsFailed { failed: usize, total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn summary_serialize_keeps_json_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Yolo2CocoError::SummarySerialize { source };

        assert!(err
            .to_string()
            .starts_with("Failed to serialize conversion summary: "));
        let inner = err.source().expect("source is kept");
        assert!(inner.downcast_ref::<serde_json::Error>().is_some());
    }
}
