use crate::capture::domain::captured_frame::CapturedFrame;
use crate::persistence::domain::persistence_client::{
    PersistenceClient, PersistenceError, SaveRequest, SaveResponse, SavedFile,
};

/// Blocking HTTP client for the file-write endpoint.
pub struct HttpPersistenceClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpPersistenceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PersistenceClient for HttpPersistenceClient {
    fn save(&self, frame: &CapturedFrame) -> Result<SavedFile, PersistenceError> {
        let request = SaveRequest {
            image: frame.data_uri(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;
        let body: SaveResponse = response
            .json()
            .map_err(|e| PersistenceError::InvalidResponse(e.to_string()))?;
        body.into_result()
    }
}
