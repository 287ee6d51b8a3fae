use crate::{
    CodechefStats, GithubStats, LeetcodeStats, Platform, ProfileStatsProvider, ProviderError,
    StatsPayload,
};

/// Offline provider returning empty stats for its platform.
#[derive(Debug)]
pub struct NoopProvider {
    platform: Platform,
}

impl NoopProvider {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait::async_trait]
impl ProfileStatsProvider for NoopProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self, _url: &str) -> Result<StatsPayload, ProviderError> {
        Ok(match self.platform {
            Platform::Github => StatsPayload::Github(GithubStats::default()),
            Platform::Leetcode => StatsPayload::Leetcode(LeetcodeStats::default()),
            Platform::Codechef => StatsPayload::Codechef(CodechefStats::default()),
        })
    }
}
