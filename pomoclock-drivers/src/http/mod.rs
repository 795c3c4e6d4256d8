//! HTTP webhook client
//!
//! Built on `embedded_svc::http::client`: the board supplies the connection,
//! this module adds URL checks and the redirect policy webhook hosts need.
//! Redirects are followed up to [`MAX_REDIRECTS`] hops.

pub mod client;
pub mod url;

pub use client::{HttpError, HttpWebhookClient, MAX_REDIRECTS};
pub use url::{Scheme, Url, UrlError, MAX_LOCATION_LEN};
