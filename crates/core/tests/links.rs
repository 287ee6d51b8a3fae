mod common;

use common::{docx, pdf, Page};
use screener_core::links::{annotation_uris, extract_links, LinkSet};
use screener_core::models::{DocFormat, RawDocument};
use std::path::PathBuf;

fn raw(id: &str, format: DocFormat, bytes: Vec<u8>) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        path: PathBuf::from(id),
        format,
        bytes,
    }
}

#[test]
fn annotations_are_read_in_page_order() {
    let bytes = pdf(&[
        Page::text("one").with_link("https://github.com/first"),
        Page::text("two")
            .with_link("https://leetcode.com/u/second")
            .with_link("https://example.org"),
    ]);
    let uris = annotation_uris(&bytes).unwrap();
    assert_eq!(
        uris,
        vec![
            "https://github.com/first",
            "https://leetcode.com/u/second",
            "https://example.org"
        ]
    );
}

#[test]
fn only_uri_link_annotations_count() {
    let bytes = pdf(&[Page::text("form")
        .with_annotation("Widget", "URI", "https://github.com/widget")
        .with_annotation("Link", "Launch", "https://github.com/launch")
        .with_annotation("Link", "URI", "https://github.com/real")]);
    assert_eq!(annotation_uris(&bytes).unwrap(), vec!["https://github.com/real"]);

    let doc = raw("form.pdf", DocFormat::Pdf, bytes);
    let links = extract_links(&doc, "form");
    assert_eq!(links.github.as_deref(), Some("https://github.com/real"));
}

#[test]
fn visible_link_beats_annotation() {
    let bytes = pdf(&[Page::text("profile")
        .with_link("https://github.com/annotated")
        .with_link("https://www.codechef.com/users/chef")]);
    let doc = raw("cv.pdf", DocFormat::Pdf, bytes);
    let text = "Code: https://github.com/visible, more at https://leetcode.com/u/lee";

    let links = extract_links(&doc, text);
    assert_eq!(links.github.as_deref(), Some("https://github.com/visible"));
    assert_eq!(links.leetcode.as_deref(), Some("https://leetcode.com/u/lee"));
    assert_eq!(
        links.codechef.as_deref(),
        Some("https://www.codechef.com/users/chef")
    );
}

#[test]
fn annotation_only_links_are_found() {
    let bytes = pdf(&[Page::text("see my profile").with_link("https://github.com/hidden")]);
    let doc = raw("cv.pdf", DocFormat::Pdf, bytes);
    let links = extract_links(&doc, "see my profile");
    assert_eq!(links.github.as_deref(), Some("https://github.com/hidden"));
    assert!(links.leetcode.is_none());
}

#[test]
fn no_profile_links_leaves_every_slot_empty() {
    let doc = raw("cv.pdf", DocFormat::Pdf, pdf(&[Page::text("plain")]));
    let links = extract_links(&doc, "contact: https://example.com/me");
    assert_eq!(links, LinkSet::default());
    assert!(links.is_empty());
}

#[test]
fn docx_uses_visible_text_only() {
    let doc = raw("cv.docx", DocFormat::Docx, docx(&["https://leetcode.com/u/dx"]));
    let links = extract_links(&doc, "https://leetcode.com/u/dx\n");
    assert_eq!(links.leetcode.as_deref(), Some("https://leetcode.com/u/dx"));
    assert_eq!(links.iter().count(), 1);
}

#[test]
fn unreadable_pdf_keeps_visible_links() {
    let doc = raw("broken.pdf", DocFormat::Pdf, b"not a pdf".to_vec());
    let links = extract_links(&doc, "https://github.com/still-here");
    assert_eq!(links.github.as_deref(), Some("https://github.com/still-here"));
}
