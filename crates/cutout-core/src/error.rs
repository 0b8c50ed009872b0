use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CutoutError {
    #[error("failed to decode asset: {0}")]
    AssetDecode(String),
    #[error("segmentation failed: {0}")]
    Segmentation(String),
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("confidence cutoff {0} is outside 0.0..=1.0")]
    InvalidCutoff(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    AssetDecodeFailure,
    SegmentationFailure,
    DimensionMismatch,
    InvalidCutoff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl CutoutError {
    pub fn as_error_info(&self) -> ErrorInfo {
        let code = match self {
            Self::AssetDecode(_) => ErrorCode::AssetDecodeFailure,
            Self::Segmentation(_) => ErrorCode::SegmentationFailure,
            Self::DimensionMismatch(_) => ErrorCode::DimensionMismatch,
            Self::InvalidCutoff(_) => ErrorCode::InvalidCutoff,
        };
        ErrorInfo {
            code,
            message: self.to_string(),
        }
    }
}
