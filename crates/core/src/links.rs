//! Profile link discovery.
//!
//! Links are collected in two phases: URLs visible in the extracted text
//! first, then hyperlink annotations embedded in the PDF. A platform slot is
//! filled once and never overwritten, so a visible link always beats an
//! annotation for the same platform.

use crate::models::{DocFormat, RawDocument};
use lazy_static::lazy_static;
use lopdf::{Dictionary, Document, Object};
use providers::Platform;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

lazy_static! {
    static ref URL: Regex = Regex::new(r"https?://[^\s,;)\]]+").expect("valid regex");
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSet {
    pub github: Option<String>,
    pub leetcode: Option<String>,
    pub codechef: Option<String>,
}

impl LinkSet {
    fn slot_mut(&mut self, platform: Platform) -> &mut Option<String> {
        match platform {
            Platform::Github => &mut self.github,
            Platform::Leetcode => &mut self.leetcode,
            Platform::Codechef => &mut self.codechef,
        }
    }

    pub fn get(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Github => self.github.as_deref(),
            Platform::Leetcode => self.leetcode.as_deref(),
            Platform::Codechef => self.codechef.as_deref(),
        }
    }

    /// Store `url` for `platform` unless the slot is already taken.
    pub fn offer(&mut self, platform: Platform, url: &str) -> bool {
        let slot = self.slot_mut(platform);
        if slot.is_some() {
            return false;
        }
        *slot = Some(url.to_string());
        true
    }

    /// Assign `url` to the first platform whose domain it contains and whose
    /// slot is still free.
    pub fn classify(&mut self, url: &str) -> Option<Platform> {
        let platform = Platform::ALL
            .into_iter()
            .find(|p| url.contains(p.domain()) && self.get(*p).is_none())?;
        self.offer(platform, url);
        Some(platform)
    }

    /// Set slots in platform order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &str)> + '_ {
        Platform::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|url| (p, url)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

pub fn visible_urls(text: &str) -> impl Iterator<Item = &str> {
    URL.find_iter(text).map(|m| m.as_str())
}

pub fn extract_links(doc: &RawDocument, text: &str) -> LinkSet {
    let mut links = LinkSet::default();
    for url in visible_urls(text) {
        links.classify(url);
    }

    if doc.format == DocFormat::Pdf {
        match annotation_uris(&doc.bytes) {
            Ok(uris) => {
                for uri in &uris {
                    links.classify(uri);
                }
            }
            Err(e) => {
                warn!(id = %doc.id, error = %e, "cannot read link annotations");
            }
        }
    }
    debug!(id = %doc.id, ?links, "links extracted");
    links
}

fn resolve<'a>(pdf: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => pdf.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(pdf: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(pdf, obj)? {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn is_name(pdf: &Document, dict: &Dictionary, key: &[u8], expected: &[u8]) -> bool {
    matches!(
        dict.get(key).ok().and_then(|o| resolve(pdf, o)),
        Some(Object::Name(name)) if name.as_slice() == expected
    )
}

/// Target of a `/Link` annotation whose action is `/S /URI`.
fn link_uri(pdf: &Document, annot: &Dictionary) -> Option<String> {
    if !is_name(pdf, annot, b"Subtype", b"Link") {
        return None;
    }
    let action = resolve_dict(pdf, annot.get(b"A").ok()?)?;
    if !is_name(pdf, action, b"S", b"URI") {
        return None;
    }
    match resolve(pdf, action.get(b"URI").ok()?)? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).trim().to_string()),
        _ => None,
    }
}

/// URI targets of link annotations, in page order then annotation order.
pub fn annotation_uris(bytes: &[u8]) -> Result<Vec<String>, lopdf::Error> {
    let pdf = Document::load_mem(bytes)?;
    let mut uris = Vec::new();
    for page_id in pdf.get_pages().into_values() {
        let page = pdf.get_dictionary(page_id)?;
        let Some(annots) = page.get(b"Annots").ok().and_then(|a| resolve(&pdf, a)) else {
            continue;
        };
        let Object::Array(annots) = annots else {
            continue;
        };
        for annot in annots {
            let Some(annot) = resolve_dict(&pdf, annot) else {
                continue;
            };
            if let Some(uri) = link_uri(&pdf, annot) {
                uris.push(uri);
            }
        }
    }
    Ok(uris)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_pattern_stops_at_delimiters() {
        let urls: Vec<&str> = visible_urls(
            "See (https://github.com/alice), https://leetcode.com/bob; [http://x.io/a] end",
        )
        .collect();
        assert_eq!(
            urls,
            vec!["https://github.com/alice", "https://leetcode.com/bob", "http://x.io/a"]
        );
    }

    #[test]
    fn first_url_per_platform_wins() {
        let mut links = LinkSet::default();
        links.classify("https://github.com/first");
        links.classify("https://github.com/second");
        assert_eq!(links.github.as_deref(), Some("https://github.com/first"));
    }

    #[test]
    fn unknown_domains_are_ignored() {
        let mut links = LinkSet::default();
        assert_eq!(links.classify("https://example.com/me"), None);
        assert!(links.is_empty());
    }

    #[test]
    fn taken_slot_falls_through_to_next_platform() {
        let mut links = LinkSet::default();
        links.offer(Platform::Github, "https://github.com/a");
        let p = links.classify("https://github.com/redirect?to=leetcode.com/u");
        assert_eq!(p, Some(Platform::Leetcode));
    }

    #[test]
    fn serializes_all_platforms() {
        let mut links = LinkSet::default();
        links.offer(Platform::Codechef, "https://www.codechef.com/users/c");
        let v = serde_json::to_value(&links).unwrap();
        assert!(v["github"].is_null());
        assert!(v["leetcode"].is_null());
        assert_eq!(v["codechef"], "https://www.codechef.com/users/c");
    }
}
