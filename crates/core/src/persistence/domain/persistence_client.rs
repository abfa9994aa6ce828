use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::domain::captured_frame::CapturedFrame;

/// Wire request for the file-write endpoint: the snapshot as a data URI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveRequest {
    pub image: String,
}

/// Wire response. Failures are in-band: `success: false` with an error
/// message, not an HTTP error status.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn ok(file_name: String) -> Self {
        Self {
            success: true,
            file_name: Some(file_name),
            error: None,
        }
    }

    pub fn rejected(error: String) -> Self {
        Self {
            success: false,
            file_name: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<SavedFile, PersistenceError> {
        if self.success {
            match self.file_name {
                Some(file_name) => Ok(SavedFile { file_name }),
                None => Err(PersistenceError::InvalidResponse(
                    "success without a fileName".to_string(),
                )),
            }
        } else {
            Err(PersistenceError::Rejected(
                self.error.unwrap_or_else(|| "unspecified error".to_string()),
            ))
        }
    }
}

/// A successfully persisted snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("persistence request failed: {0}")]
    Transport(String),
    #[error("server rejected the snapshot: {0}")]
    Rejected(String),
    #[error("malformed server response: {0}")]
    InvalidResponse(String),
}

/// Sends captured frames to the file-write endpoint.
pub trait PersistenceClient: Send {
    fn save(&self, frame: &CapturedFrame) -> Result<SavedFile, PersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_field_names_on_the_wire() {
        let json = serde_json::to_string(&SaveResponse::ok("a1b2.png".to_string())).unwrap();
        assert_eq!(json, r#"{"success":true,"fileName":"a1b2.png"}"#);

        let json = serde_json::to_string(&SaveResponse::rejected("disk full".to_string())).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"disk full"}"#);
    }

    #[test]
    fn test_response_parses_with_missing_optionals() {
        let parsed: SaveResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.file_name, None);
        assert_eq!(parsed.error, None);
    }

    #[test]
    fn test_into_result_success() {
        let saved = SaveResponse::ok("a1b2c3d4e5f6a7b8.png".to_string())
            .into_result()
            .unwrap();
        assert_eq!(saved.file_name, "a1b2c3d4e5f6a7b8.png");
    }

    #[test]
    fn test_into_result_rejection_carries_message() {
        let err = SaveResponse::rejected("bad payload".to_string())
            .into_result()
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected(msg) if msg == "bad payload"));
    }

    #[test]
    fn test_into_result_success_without_name_is_malformed() {
        let response = SaveResponse {
            success: true,
            file_name: None,
            error: None,
        };
        assert!(matches!(
            response.into_result(),
            Err(PersistenceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_serializes_image_field() {
        let json = serde_json::to_string(&SaveRequest {
            image: "data:image/png;base64,AAAA".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"image":"data:image/png;base64,AAAA"}"#);
    }
}
