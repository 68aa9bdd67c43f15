use serde::de::DeserializeOwned;

use crate::error::HarnessError;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub duration_ms: u128,
    pub size_bytes: usize,
    pub body: String,
}

impl HttpResponse {
    pub fn is_status(&self, status: u16) -> bool {
        self.status == status
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HarnessError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// First `max_chars` characters of the body, for reports.
    pub fn body_excerpt(&self, max_chars: usize) -> String {
        let mut excerpt: String = self.body.chars().take(max_chars).collect();
        if self.body.chars().count() > max_chars {
            excerpt.push('…');
        }
        excerpt
    }
}
