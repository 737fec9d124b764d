//! Pipeline configuration.

/// Tunables for a discovery run.
///
/// Owned by the pipeline entry point and passed down by parameter;
/// there is no ambient global configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Role vocabulary the search query is built from.
    pub roles: Vec<String>,

    /// Host the search is restricted to (`site:` operator).
    pub site: String,

    /// Origin tag stamped on discovered postings.
    pub source: String,

    /// Maximum concurrent outbound extractions / probes.
    pub fan_out: usize,

    /// Trailing window for the digest query, in days.
    pub digest_window_days: i64,

    /// Public base URL announcements link postings under
    /// (`<jobs_base_url>/<slug>`).
    pub jobs_base_url: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            roles: [
                "software engineer",
                "web developer",
                "frontend developer",
                "backend developer",
                "full stack developer",
                "mobile developer",
                "devops engineer",
                "data engineer",
                "data scientist",
                "qa engineer",
                "ui ux designer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            site: "my.jobstreet.com".to_string(),
            source: "organic".to_string(),
            fan_out: 8,
            digest_window_days: 7,
            jobs_base_url: "https://kerja-radar.example/jobs".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Restrict the search to a different host.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Replace the role vocabulary.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Set the outbound fan-out bound.
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }
}
