use crate::{
    build_client, username_from_url, GithubStats, HttpConfig, Platform, ProfileStatsProvider,
    ProviderError, StatsPayload,
};
use chrono::DateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Clone)]
pub struct GithubProvider {
    client: Client,
    base_url: String,
}

impl GithubProvider {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(http)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ProviderError> {
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GithubUser {
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub public_gists: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GithubEvent {
    pub created_at: Option<String>,
}

/// Contributions are the number of recent public events; active days are the
/// distinct calendar dates those events fall on.
pub fn summarize(user: &GithubUser, events: &[GithubEvent]) -> GithubStats {
    let days: HashSet<String> = events
        .iter()
        .filter_map(|e| e.created_at.as_deref())
        .map(|ts| match DateTime::parse_from_rfc3339(ts) {
            Ok(dt) => dt.date_naive().to_string(),
            Err(_) => ts.chars().take(10).collect(),
        })
        .collect();
    GithubStats {
        total_contributions: events.len(),
        active_days: days.len(),
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        public_gists: user.public_gists,
    }
}

#[async_trait::async_trait]
impl ProfileStatsProvider for GithubProvider {
    fn platform(&self) -> Platform {
        Platform::Github
    }

    async fn fetch(&self, url: &str) -> Result<StatsPayload, ProviderError> {
        let username = username_from_url(url)?;
        let user: GithubUser = self
            .get_json(format!("{}/users/{}", self.base_url, username))
            .await?;
        let events: Vec<GithubEvent> = self
            .get_json(format!("{}/users/{}/events/public", self.base_url, username))
            .await?;
        Ok(StatsPayload::Github(summarize(&user, &events)))
    }
}
