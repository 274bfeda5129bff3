//! Distracting sites a focus view asks the browser side to block

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BLOCKED_SITES: [&str; 5] = [
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "reddit.com",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlocklistError {
    #[error("A site is required")]
    EmptySite,

    #[error("{0} is already in your blocked list")]
    AlreadyBlocked(String),

    #[error("{0} is not in your blocked list")]
    NotBlocked(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBlocklist {
    /// Whether blocking applies during focus periods
    pub enabled: bool,
    pub sites: Vec<String>,
}

impl Default for SiteBlocklist {
    fn default() -> Self {
        Self {
            enabled: false,
            sites: DEFAULT_BLOCKED_SITES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Reduce user input to a bare host: no scheme, no leading `www.`
pub fn normalize_site(input: &str) -> Option<String> {
    let site = input.trim();
    let site = site
        .strip_prefix("http://")
        .or_else(|| site.strip_prefix("https://"))
        .unwrap_or(site);
    let site = site.strip_prefix("www.").unwrap_or(site);
    let site = site.trim_end_matches('/').to_ascii_lowercase();
    (!site.is_empty()).then_some(site)
}

impl SiteBlocklist {
    /// Add a site, returning the normalized form that was stored
    pub fn add(&mut self, input: &str) -> Result<String, BlocklistError> {
        let site = normalize_site(input).ok_or(BlocklistError::EmptySite)?;
        if self.sites.contains(&site) {
            return Err(BlocklistError::AlreadyBlocked(site));
        }
        self.sites.push(site.clone());
        Ok(site)
    }

    pub fn remove(&mut self, input: &str) -> Result<(), BlocklistError> {
        let site = normalize_site(input).ok_or(BlocklistError::EmptySite)?;
        let before = self.sites.len();
        self.sites.retain(|s| *s != site);
        if self.sites.len() == before {
            return Err(BlocklistError::NotBlocked(site));
        }
        Ok(())
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}
