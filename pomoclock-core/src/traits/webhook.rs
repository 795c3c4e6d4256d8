//! Outgoing webhook requests

/// HTTP method for a webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Request-line token
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A single webhook call
///
/// A present `json_body` is sent with `Content-Type: application/json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WebhookRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub json_body: Option<&'a str>,
}

/// Errors that can occur delivering a webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryError {
    /// Endpoint URL could not be parsed
    InvalidUrl,
    /// Connection could not be opened or broke mid-exchange
    Transport,
    /// Redirect chain exceeded the client's limit
    TooManyRedirects,
}

/// Trait for the HTTP client used by the dispatcher
///
/// Implementations follow redirects and skip TLS certificate verification.
/// One call is one bounded exchange (including redirects).
pub trait WebhookClient {
    /// Perform the request
    ///
    /// # Returns
    /// The final HTTP status code.
    fn send(&mut self, request: &WebhookRequest<'_>) -> Result<u16, DeliveryError>;
}
