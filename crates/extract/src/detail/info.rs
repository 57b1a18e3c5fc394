//! The `#info` block of a subject page.
//!
//! The block is a flat run of `span.pl` labels, each followed by its value
//! as loose sibling text and anchor nodes, terminated by a `<br>` or the
//! next label. This collects the run into a label → value map once, so the
//! field accessors stay cheap.

use crate::consts;
use crate::models::{Isbn, PublishDate, Series};
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct InfoValue {
    /// Concatenated text of the value run (anchors included).
    text: String,
    /// Text of anchor elements within the run, in order.
    links: Vec<String>,
}

#[derive(Debug)]
pub struct InfoList {
    list: HashMap<String, InfoValue>,
}

/// InfoList Internals
impl InfoList {
    pub(crate) fn new(document: &Html) -> Self {
        let Some(info) = document.select(&consts::INFO_SELECTOR).next() else {
            return Self { list: HashMap::new() };
        };
        let mut list = HashMap::new();
        for label_element in info.select(&consts::INFO_LABEL_SELECTOR) {
            let label = label_element
                .text()
                .collect::<String>()
                .trim()
                .trim_end_matches([':', '：'])
                .trim()
                .to_string();
            if label.is_empty() {
                continue;
            }
            list.insert(label, Self::collect_value(&label_element));
        }
        Self { list }
    }

    fn collect_value(label_element: &ElementRef<'_>) -> InfoValue {
        let mut value = InfoValue::default();
        for sibling in label_element.next_siblings() {
            if let Some(text) = sibling.value().as_text() {
                value.text.push_str(text);
                continue;
            }
            let Some(element) = ElementRef::wrap(sibling) else {
                continue;
            };
            let name = element.value().name();
            // The value run ends at a line break or the next label.
            if name == "br" || (name == "span" && element.value().classes().any(|class| class == "pl")) {
                break;
            }
            let text: String = element.text().collect();
            value.text.push_str(&text);
            if name == "a" {
                push_link(&mut value.links, &text);
            } else {
                for anchor in element.select(&consts::ANCHOR_SELECTOR) {
                    push_link(&mut value.links, &anchor.text().collect::<String>());
                }
            }
        }
        value.text = clean_value_text(&value.text);
        value
    }

    fn find_by_label(&self, labels: &[&str]) -> Option<&InfoValue> {
        labels.iter().find_map(|label| self.list.get(*label))
    }
}

/// InfoList Public
impl InfoList {
    /// Plain text value of the first matching label.
    pub fn text_value(&self, labels: &[&str]) -> Option<String> {
        self.find_by_label(labels).map(|v| v.text.clone()).filter(|t| !t.is_empty())
    }

    /// Authors in display order, translators appended after, as the
    /// original site groups them.
    pub fn authors(&self) -> Vec<String> {
        let mut authors = Vec::new();
        for labels in [&["作者"][..], &["译者"][..]] {
            let Some(value) = self.find_by_label(labels) else {
                continue;
            };
            if value.links.is_empty() {
                // Older pages list authors as plain slash-separated text.
                authors.extend(value.text.split('/').map(|a| a.trim().to_string()).filter(|a| !a.is_empty()));
            } else {
                authors.extend(value.links.iter().cloned());
            }
        }
        authors.dedup();
        authors
    }

    pub fn publisher(&self) -> Option<String> {
        let value = self.find_by_label(&["出版社"])?;
        value.links.first().cloned().or_else(|| Some(value.text.clone())).filter(|p| !p.is_empty())
    }

    pub fn published(&self) -> Option<PublishDate> {
        let text = self.text_value(&["出版年"])?;
        match text.parse::<PublishDate>() {
            Ok(date) => Some(date),
            Err(_) => {
                debug!(value = %text, "unparseable publication date, leaving unset");
                None
            }
        }
    }

    /// Checksum-validated identifier; a failing checksum is discarded
    /// rather than propagated.
    pub fn isbn(&self) -> Option<Isbn> {
        let text = self.text_value(&["ISBN"])?;
        match text.parse::<Isbn>() {
            Ok(isbn) => Some(isbn),
            Err(_) => {
                debug!(value = %text, "discarding ISBN with invalid checksum");
                None
            }
        }
    }

    pub fn series(&self) -> Option<Series> {
        let value = self.find_by_label(&["丛书"])?;
        value.links.first().cloned().or_else(|| Some(value.text.clone())).filter(|n| !n.is_empty()).map(Series::new)
    }
}

fn push_link(links: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        links.push(text.to_string());
    }
}

/// Strip the label's stray colon and collapse the whitespace the markup
/// scatters through the value run.
fn clean_value_text(raw: &str) -> String {
    let stripped = raw.trim().trim_start_matches([':', '：']).trim();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
