//! Request DTOs for the front-end API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string of `GET /api?key=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The key to look up in the configured group
    #[serde(default)]
    pub key: Option<String>,
}

impl ApiQuery {
    /// Returns the key, or an error message if it is missing or empty.
    pub fn key(&self) -> Result<&str, String> {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err("query parameter `key` is required".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_query_deserialize() {
        let query: ApiQuery = serde_json::from_str(r#"{"key": "Tom"}"#).unwrap();
        assert_eq!(query.key(), Ok("Tom"));
    }

    #[test]
    fn test_api_query_missing_key() {
        let query: ApiQuery = serde_json::from_str("{}").unwrap();
        assert!(query.key().is_err());
    }

    #[test]
    fn test_api_query_empty_key() {
        let query = ApiQuery {
            key: Some(String::new()),
        };
        assert!(query.key().is_err());
    }
}
