use crate::{
    build_client, username_from_url, CodechefStats, HttpConfig, Platform, ProfileStatsProvider,
    ProviderError, StatsPayload,
};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref RATING: Selector = Selector::parse("div.rating-number").expect("valid selector");
    static ref STARS: Selector = Selector::parse("span.rating").expect("valid selector");
    static ref RANKS: Selector = Selector::parse("a.inline-list").expect("valid selector");
    static ref SOLVED: Selector =
        Selector::parse("section.rating-data-section.problems-solved h5").expect("valid selector");
}

/// Scrapes the public CodeChef profile page; there is no JSON API.
#[derive(Clone)]
pub struct CodechefProvider {
    client: Client,
    base_url: String,
}

impl CodechefProvider {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(http)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_integer(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    INTEGER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract the profile figures. Ranks are optional; when the rating, stars or
/// solved count cannot be read, the figures found so far come back inside
/// [`ProviderError::Partial`].
pub fn parse_profile(html: &str) -> Result<CodechefStats, ProviderError> {
    let doc = Html::parse_document(html);
    let mut stats = CodechefStats {
        rating: doc.select(&RATING).next().and_then(|e| first_integer(&text_of(e))),
        stars: doc.select(&STARS).next().map(|e| {
            text_of(e)
                .chars()
                .filter(|c| *c == '*' || *c == '★')
                .count()
        }),
        ..CodechefStats::default()
    };

    for rank in doc.select(&RANKS) {
        let text = text_of(rank);
        let value = text.rsplit(':').next().and_then(first_integer);
        if text.contains("Global Rank") {
            stats.global_rank = value;
        } else if text.contains("Country Rank") {
            stats.country_rank = value;
        }
    }

    stats.fully_solved = doc
        .select(&SOLVED)
        .next()
        .and_then(|e| first_integer(&text_of(e)));

    let missing: Vec<&str> = [
        ("rating", stats.rating.is_none()),
        ("stars", stats.stars.is_none()),
        ("fully_solved", stats.fully_solved.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(ProviderError::Partial {
            message: format!("CodeChef page is missing {}", missing.join(", ")),
            stats: Box::new(StatsPayload::Codechef(stats)),
        });
    }
    Ok(stats)
}

#[async_trait::async_trait]
impl ProfileStatsProvider for CodechefProvider {
    fn platform(&self) -> Platform {
        Platform::Codechef
    }

    async fn fetch(&self, url: &str) -> Result<StatsPayload, ProviderError> {
        let username = username_from_url(url)?;
        let profile_url = format!("{}/users/{}", self.base_url, username);
        let resp = self
            .client
            .get(&profile_url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            // An unknown handle is not an error on CodeChef, just an empty profile.
            debug!(status = %resp.status(), %profile_url, "codechef profile unavailable");
            return Ok(StatsPayload::Codechef(CodechefStats::default()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(StatsPayload::Codechef(parse_profile(&body)?))
    }
}
