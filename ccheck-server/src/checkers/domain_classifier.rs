//! Image source classifier
//!
//! Tests the host of an image URL against a list of royalty-free stock
//! providers. No network access.
//!
//! Default matching is substring containment, so a crafted host such as
//! `notunsplash.com.evil.example` is accepted. `strict_match` restricts
//! matches to the listed domain and its subdomains.

use ccheck_common::config::ImageConfig;
use ccheck_common::CheckOutcome;
use tracing::debug;
use url::Url;

/// Allow-list based image source classifier
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    free_domains: Vec<String>,
    strict_match: bool,
}

impl DomainClassifier {
    pub fn new(free_domains: Vec<String>, strict_match: bool) -> Self {
        Self {
            free_domains: free_domains
                .into_iter()
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            strict_match,
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(config.free_domains.clone(), config.strict_match)
    }

    /// Classify an image URL by its host
    ///
    /// Unparseable URLs and URLs without a host are `Inconclusive`.
    pub fn classify_image_source(&self, url: &str) -> CheckOutcome {
        let host = match Url::parse(url.trim()) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.to_ascii_lowercase(),
                None => {
                    return CheckOutcome::Inconclusive(format!(
                        "image URL has no host: {}",
                        url
                    ))
                }
            },
            Err(e) => {
                debug!(error = %e, "Image URL did not parse");
                return CheckOutcome::Inconclusive(format!("could not parse image URL: {}", url));
            }
        };

        match self.matching_domain(&host) {
            Some(domain) => {
                debug!(host = %host, domain = %domain, "Image host on free-provider list");
                CheckOutcome::Cleared(format!(
                    "image is from {}, typically copyright-free",
                    host
                ))
            }
            None => CheckOutcome::Inconclusive(format!(
                "image source ({}) is not a known free provider",
                host
            )),
        }
    }

    fn matching_domain(&self, host: &str) -> Option<&str> {
        self.free_domains
            .iter()
            .find(|domain| {
                if self.strict_match {
                    host == domain.as_str() || host.ends_with(&format!(".{}", domain))
                } else {
                    host.contains(domain.as_str())
                }
            })
            .map(String::as_str)
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}
