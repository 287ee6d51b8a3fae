//! Console and JSON rendering of a screening report.

use providers::{Platform, ProfileStats};
use screener_core::models::{CandidateReport, ScreeningReport};
use std::fmt::Write;

const RULE: usize = 60;

/// `total_contributions` -> `Total contributions`.
pub fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render_json(report: &ScreeningReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn render_text(report: &ScreeningReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Top {} Matching Resumes (job description: {}, {} screened):",
        report.results.len(),
        report.reference,
        report.candidates
    );
    out.push_str(&"=".repeat(RULE));
    out.push('\n');
    if report.results.is_empty() {
        out.push_str("\nNo resumes found.\n");
    }
    for candidate in &report.results {
        render_candidate(&mut out, candidate);
    }
    out
}

fn render_candidate(out: &mut String, c: &CandidateReport) {
    let _ = writeln!(out, "\n{}. {}", c.rank, c.id);
    let _ = writeln!(out, "   Similarity Score : {:.2}", c.score);
    let _ = writeln!(out, "   Resume Length    : {} characters", c.text_length);
    let _ = writeln!(out, "   Coding Profiles  :");
    if c.links.is_empty() {
        let _ = writeln!(out, "     No valid coding profile links found.");
    } else {
        for (platform, url) in c.links.iter() {
            let _ = writeln!(out, "     {} : {}", humanize(platform.key()), url);
        }
    }
    for platform in Platform::ALL {
        if let Some(profile) = c.profiles.iter().find(|p| p.platform == platform) {
            render_stats(out, profile);
        }
    }
    out.push_str(&"-".repeat(RULE));
    out.push('\n');
}

fn render_stats(out: &mut String, profile: &ProfileStats) {
    let title = format!("{} Stats", profile.platform.display_name());
    let _ = writeln!(out, "   {title:<17}:");
    if let Some(error) = &profile.error {
        let _ = writeln!(out, "     - Error: {error}");
    }
    if let Some(stats) = &profile.stats {
        for (key, value) in stats.fields() {
            let _ = writeln!(out, "     - {}: {}", humanize(key), value);
        }
    }
}
