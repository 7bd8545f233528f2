//! Error types for the geocoding and POI clients.

/// Errors that can occur while talking to the geocoder or the POI service.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The request could not be sent or the connection failed.
    #[error("{service} request failed: {message}")]
    Http {
        /// Which upstream service.
        service: &'static str,
        /// Transport error text.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Status {
        /// Which upstream service.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("{service} response could not be read: {message}")]
    Decode {
        /// Which upstream service.
        service: &'static str,
        /// What was wrong.
        message: String,
    },

    /// The geocoder had no match for the requested name.
    #[error("no location found for {0:?}")]
    PlaceNotFound(String),

    /// Client configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}
