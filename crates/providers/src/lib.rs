//! Profile statistics providers for coding platforms.
//!
//! Each provider turns a profile URL found in a resume into a small,
//! display-only statistics payload. Failures never propagate past the
//! [`ProviderRegistry`]: they are folded into an error payload so that one
//! platform cannot prevent stats retrieval for the others.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub mod codechef;
pub mod github;
pub mod leetcode;
pub mod noop;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("{0}")]
    NotFound(String),
    #[error("parse failed: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid profile url: {0}")]
    InvalidUrl(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    /// Some figures were read before the failure; they are still reported.
    #[error("{message}")]
    Partial {
        stats: Box<StatsPayload>,
        message: String,
    },
}

/// Coding platforms whose profile links are recognised in resumes.
///
/// Declaration order is the classification order used when a URL could
/// belong to more than one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Leetcode,
    Codechef,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Github, Platform::Leetcode, Platform::Codechef];

    /// Domain substring that identifies a URL as belonging to this platform.
    pub fn domain(self) -> &'static str {
        match self {
            Platform::Github => "github.com",
            Platform::Leetcode => "leetcode.com",
            Platform::Codechef => "codechef.com",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Leetcode => "leetcode",
            Platform::Codechef => "codechef",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Github => "GitHub",
            Platform::Leetcode => "LeetCode",
            Platform::Codechef => "CodeChef",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubStats {
    pub total_contributions: usize,
    pub active_days: usize,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub public_gists: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeetcodeStats {
    pub total_problems_solved: Option<u64>,
    pub ranking: Option<u64>,
    pub acceptance_rate: String,
    pub contest_rating: Option<f64>,
    pub contribution_points: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodechefStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_rank: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_solved: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsPayload {
    Github(GithubStats),
    Leetcode(LeetcodeStats),
    Codechef(CodechefStats),
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "None".to_string())
}

impl StatsPayload {
    /// Field name / rendered value pairs in display order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            StatsPayload::Github(s) => vec![
                ("total_contributions", s.total_contributions.to_string()),
                ("active_days", s.active_days.to_string()),
                ("public_repos", opt(&s.public_repos)),
                ("followers", opt(&s.followers)),
                ("following", opt(&s.following)),
                ("public_gists", opt(&s.public_gists)),
            ],
            StatsPayload::Leetcode(s) => vec![
                ("total_problems_solved", opt(&s.total_problems_solved)),
                ("ranking", opt(&s.ranking)),
                ("acceptance_rate", s.acceptance_rate.clone()),
                ("contest_rating", opt(&s.contest_rating)),
                ("contribution_points", opt(&s.contribution_points)),
            ],
            StatsPayload::Codechef(s) => {
                let mut out = Vec::new();
                if let Some(v) = s.rating {
                    out.push(("rating", v.to_string()));
                }
                if let Some(v) = s.stars {
                    out.push(("stars", v.to_string()));
                }
                if let Some(v) = s.global_rank {
                    out.push(("global_rank", v.to_string()));
                }
                if let Some(v) = s.country_rank {
                    out.push(("country_rank", v.to_string()));
                }
                if let Some(v) = s.fully_solved {
                    out.push(("fully_solved", v.to_string()));
                }
                out
            }
        }
    }
}

/// Outcome of one provider call: either stats or an error message, always
/// tagged with the URL it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub platform: Platform,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileStats {
    pub fn ok(platform: Platform, url: &str, stats: StatsPayload) -> Self {
        Self {
            platform,
            url: url.to_string(),
            stats: Some(stats),
            error: None,
        }
    }

    pub fn partial(
        platform: Platform,
        url: &str,
        stats: StatsPayload,
        error: impl ToString,
    ) -> Self {
        Self {
            platform,
            url: url.to_string(),
            stats: Some(stats),
            error: Some(error.to_string()),
        }
    }

    pub fn failed(platform: Platform, url: &str, error: impl ToString) -> Self {
        Self {
            platform,
            url: url.to_string(),
            stats: None,
            error: Some(error.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait ProfileStatsProvider: Send + Sync {
    fn platform(&self) -> Platform;
    async fn fetch(&self, url: &str) -> Result<StatsPayload, ProviderError>;
}

/// Shared HTTP settings for the concrete providers.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("resume-screener/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

pub(crate) fn build_client(cfg: &HttpConfig) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(cfg.timeout)
        .build()
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))
}

/// Last path segment of a profile URL, ignoring trailing slashes, query and
/// fragment.
pub fn username_from_url(url: &str) -> Result<&str, ProviderError> {
    let without_query = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .ok_or_else(|| ProviderError::InvalidUrl(url.to_string()))
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<Platform, Arc<dyn ProfileStatsProvider>>,
    timeout: Option<Duration>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn ProfileStatsProvider>) -> Self {
        self.providers.insert(provider.platform(), provider);
        self
    }

    /// Upper bound for a single provider call, on top of the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider(
        &self,
        platform: Platform,
    ) -> Result<Arc<dyn ProfileStatsProvider>, ProviderError> {
        self.providers
            .get(&platform)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(platform.to_string()))
    }

    /// Fetch stats for one profile. Never fails; errors become an error payload.
    pub async fn fetch_stats(&self, platform: Platform, url: &str) -> ProfileStats {
        let provider = match self.provider(platform) {
            Ok(p) => p,
            Err(e) => return ProfileStats::failed(platform, url, e),
        };
        let call = provider.fetch(url);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(r) => r,
                Err(_) => Err(ProviderError::Timeout(limit)),
            },
            None => call.await,
        };
        match result {
            Ok(stats) => {
                debug!(%platform, url, "fetched profile stats");
                ProfileStats::ok(platform, url, stats)
            }
            Err(ProviderError::Partial { stats, message }) => {
                warn!(%platform, url, error = %message, "profile stats incomplete");
                ProfileStats::partial(platform, url, *stats, message)
            }
            Err(e) => {
                warn!(%platform, url, error = %e, "profile stats unavailable");
                ProfileStats::failed(platform, url, e)
            }
        }
    }

    /// Fetch stats for every given profile, one isolated call per platform.
    pub async fn fetch_all<'a, I>(&self, profiles: I) -> Vec<ProfileStats>
    where
        I: IntoIterator<Item = (Platform, &'a str)>,
    {
        let mut out = Vec::new();
        for (platform, url) in profiles {
            out.push(self.fetch_stats(platform, url).await);
        }
        out
    }
}

/// Registry with the GitHub, LeetCode and CodeChef clients.
pub struct Endpoints {
    pub github_api_base: String,
    pub leetcode_api_base: String,
    pub codechef_base: String,
}

pub fn default_registry(
    endpoints: &Endpoints,
    http: &HttpConfig,
) -> Result<ProviderRegistry, ProviderError> {
    let github = github::GithubProvider::new(&endpoints.github_api_base, http)?;
    let leetcode = leetcode::LeetcodeProvider::new(&endpoints.leetcode_api_base, http)?;
    let codechef = codechef::CodechefProvider::new(&endpoints.codechef_base, http)?;
    Ok(ProviderRegistry::new()
        .with_provider(Arc::new(github))
        .with_provider(Arc::new(leetcode))
        .with_provider(Arc::new(codechef))
        .with_timeout(http.timeout + Duration::from_secs(5)))
}
