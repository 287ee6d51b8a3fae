use crate::{
    build_client, username_from_url, HttpConfig, LeetcodeStats, Platform, ProfileStatsProvider,
    ProviderError, StatsPayload,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const NOT_FOUND: &str = "LeetCode profile not found or unavailable.";

#[derive(Clone)]
pub struct LeetcodeProvider {
    client: Client,
    base_url: String,
}

impl LeetcodeProvider {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(http)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Response of the public LeetCode stats API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeApiResponse {
    pub total_solved: Option<u64>,
    pub ranking: Option<u64>,
    pub acceptance_rate: Option<f64>,
    pub contest_rating: Option<f64>,
    pub contribution_points: Option<u64>,
}

impl From<LeetcodeApiResponse> for LeetcodeStats {
    fn from(r: LeetcodeApiResponse) -> Self {
        LeetcodeStats {
            total_problems_solved: r.total_solved,
            ranking: r.ranking,
            acceptance_rate: format!("{}%", r.acceptance_rate.unwrap_or(0.0)),
            contest_rating: r.contest_rating,
            contribution_points: r.contribution_points,
        }
    }
}

#[async_trait::async_trait]
impl ProfileStatsProvider for LeetcodeProvider {
    fn platform(&self) -> Platform {
        Platform::Leetcode
    }

    async fn fetch(&self, url: &str) -> Result<StatsPayload, ProviderError> {
        let username = username_from_url(url)?;
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, username))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if resp.status() != StatusCode::OK {
            return Err(ProviderError::NotFound(NOT_FOUND.to_string()));
        }
        let parsed: LeetcodeApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(StatsPayload::Leetcode(parsed.into()))
    }
}
