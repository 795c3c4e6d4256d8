//! Webhook client over an `embedded-svc` HTTP connection

use core::fmt::Write as _;

use embedded_svc::http::client::{Client, Connection};
use embedded_svc::http::{Headers, Method as HttpMethod, Status};
use embedded_svc::io::Write;
use heapless::String;
use pomoclock_core::traits::{DeliveryError, Method, WebhookClient, WebhookRequest};

use super::url::{Url, UrlError, MAX_LOCATION_LEN};

/// Redirect hops followed before giving up
pub const MAX_REDIRECTS: u8 = 5;

/// HTTP client errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// Target or redirect URL unusable
    Url(UrlError),
    /// The connection failed to open, send or read
    Connection,
    /// Redirect chain longer than [`MAX_REDIRECTS`]
    TooManyRedirects,
}

impl From<UrlError> for HttpError {
    fn from(e: UrlError) -> Self {
        HttpError::Url(e)
    }
}

impl From<HttpError> for DeliveryError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Url(_) => DeliveryError::InvalidUrl,
            HttpError::Connection => DeliveryError::Transport,
            HttpError::TooManyRedirects => DeliveryError::TooManyRedirects,
        }
    }
}

/// Webhook client on top of an HTTP connection
///
/// The connection owns transport and TLS policy. Boards hand in one set up
/// without certificate verification (an `EspHttpConnection` without a
/// certificate bundle, for instance), with its own automatic redirect
/// handling turned off so the policy below applies.
pub struct HttpWebhookClient<C> {
    client: Client<C>,
}

impl<C: Connection> HttpWebhookClient<C> {
    pub fn new(connection: C) -> Self {
        Self {
            client: Client::wrap(connection),
        }
    }

    /// Access the underlying connection
    pub fn connection_mut(&mut self) -> &mut C {
        self.client.connection()
    }

    /// Perform a request, following redirects
    ///
    /// A 303, or a 301/302 answering a POST, continues as a body-less GET
    /// (what browsers do, and what script hosts that answer a POST with a
    /// redirect to the result page expect). 307 and 308 repeat the request
    /// unchanged.
    ///
    /// # Returns
    /// The status of the final response.
    pub fn request(
        &mut self,
        method: Method,
        url: &str,
        json_body: Option<&str>,
    ) -> Result<u16, HttpError> {
        let mut target: String<MAX_LOCATION_LEN> =
            String::try_from(url).map_err(|_| HttpError::Url(UrlError::TooLong))?;
        let mut method = method;
        let mut body = json_body;

        for _ in 0..=MAX_REDIRECTS {
            let base = Url::parse(&target)?;
            let (status, location) = self.exchange(method, &target, &base, body)?;
            let Some(next) = location else {
                return Ok(status);
            };

            if status == 303 || (matches!(status, 301 | 302) && method == Method::Post) {
                method = Method::Get;
                body = None;
            }
            target = next;
        }

        Err(HttpError::TooManyRedirects)
    }

    /// One request/response
    ///
    /// Returns the resolved `Location` for redirects that carry one. The
    /// response body is never read.
    fn exchange(
        &mut self,
        method: Method,
        target: &str,
        base: &Url<'_>,
        body: Option<&str>,
    ) -> Result<(u16, Option<String<MAX_LOCATION_LEN>>), HttpError> {
        let mut content_length: String<20> = String::new();
        if let Some(body) = body {
            write!(content_length, "{}", body.len()).map_err(|_| HttpError::Connection)?;
        }
        let json_headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
        ];
        let headers: &[(&str, &str)] = match body {
            Some(_) => &json_headers,
            None => &[],
        };

        let mut request = self
            .client
            .request(http_method(method), target, headers)
            .map_err(|_| HttpError::Connection)?;
        if let Some(body) = body {
            request
                .write_all(body.as_bytes())
                .map_err(|_| HttpError::Connection)?;
            request.flush().map_err(|_| HttpError::Connection)?;
        }
        let response = request.submit().map_err(|_| HttpError::Connection)?;

        let status = response.status();
        if !is_redirect(status) {
            return Ok((status, None));
        }
        let location = response
            .header("Location")
            .or_else(|| response.header("location"));
        match location {
            Some(location) => Ok((status, Some(base.resolve(location)?))),
            None => Ok((status, None)),
        }
    }
}

impl<C: Connection> WebhookClient for HttpWebhookClient<C> {
    fn send(&mut self, request: &WebhookRequest<'_>) -> Result<u16, DeliveryError> {
        self.request(request.method, request.url, request.json_body)
            .map_err(DeliveryError::from)
    }
}

fn http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::Get,
        Method::Post => HttpMethod::Post,
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}
