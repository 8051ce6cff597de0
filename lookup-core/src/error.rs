use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which provider endpoint a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Geocoding,
    Weather,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Geocoding => "geocoding",
            Endpoint::Weather => "current weather",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two failure classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Transport failure, non-2xx status or timeout.
    Network,
    /// Response body did not have the expected JSON shape.
    Decode,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => f.write_str("network"),
            ErrorKind::Decode => f.write_str("decode"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("OpenWeather {endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("OpenWeather {endpoint} response is missing `{field}`")]
    MissingField {
        endpoint: Endpoint,
        field: &'static str,
    },
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Transport { .. } | LookupError::Status { .. } => ErrorKind::Network,
            LookupError::Decode { .. } | LookupError::MissingField { .. } => ErrorKind::Decode,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            LookupError::Transport { endpoint, .. }
            | LookupError::Status { endpoint, .. }
            | LookupError::Decode { endpoint, .. }
            | LookupError::MissingField { endpoint, .. } => *endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_missing_field_map_to_taxonomy() {
        let status = LookupError::Status {
            endpoint: Endpoint::Geocoding,
            status: 401,
            body: "Invalid API key".into(),
        };
        assert_eq!(status.kind(), ErrorKind::Network);
        assert!(status.to_string().contains("status 401"));

        let missing = LookupError::MissingField {
            endpoint: Endpoint::Weather,
            field: "weather[0]",
        };
        assert_eq!(missing.kind(), ErrorKind::Decode);
        assert_eq!(missing.endpoint(), Endpoint::Weather);
    }

    #[test]
    fn decode_error_is_decode_kind() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = LookupError::Decode {
            endpoint: Endpoint::Geocoding,
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("Failed to parse OpenWeather geocoding JSON"));
    }
}
