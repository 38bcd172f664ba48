//! Shared application state injected into every handler.

use std::sync::Arc;
use url::Url;

use crate::application::services::{Throttler, UrlService};

/// Public origin used to build short links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSite {
    pub scheme: String,
    pub domain: String,
    /// Port the server listens on, reported to clients.
    pub port: u16,
}

impl PublicSite {
    pub fn new(scheme: impl Into<String>, domain: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            domain: domain.into(),
            port,
        }
    }

    /// Full short link for a raw slug, e.g. `http://localhost:3000/%F0%9F%8E%89%F0%9F%8E%88`.
    ///
    /// The slug is percent-encoded as a single path segment.
    pub fn short_url(&self, raw_slug: &str) -> String {
        let origin = format!("{}://{}/", self.scheme, self.domain);
        let Ok(mut url) = Url::parse(&origin) else {
            tracing::warn!(%origin, "Public origin is not a valid base URL");
            return format!("{origin}{raw_slug}");
        };

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push(raw_slug);
        }
        url.into()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub throttler: Arc<Throttler>,
    pub site: Arc<PublicSite>,
}

impl AppState {
    pub fn new(url_service: Arc<UrlService>, throttler: Arc<Throttler>, site: PublicSite) -> Self {
        Self {
            url_service,
            throttler,
            site: Arc::new(site),
        }
    }
}
