//! Subject (detail) page extraction.
//!
//! The subject id doubles as a validity check: a page without one is not a
//! Douban subject page at all. Title is the only field whose absence is
//! fatal; everything else is optional and left unset when the section is
//! missing.

mod info;

use std::convert::Infallible;
use std::str::FromStr;

pub use self::info::InfoList;
use crate::consts;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{MetadataRecord, Rating};
use exn::{OptionExt, ResultExt};
use scraper::Html;
use tracing::instrument;

#[derive(Debug)]
pub struct DetailExtractor {
    document: Html,
}
impl DetailExtractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self::from_document(document)
    }

    /// Extraction of the metadata automatically performs a validity check,
    /// so [`is_valid`](Self::is_valid) is only useful if you don't plan on
    /// extracting metadata.
    pub fn is_valid(&self) -> bool {
        self.subject_id().is_ok()
    }

    /// Extracts book metadata from a subject page.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTML is not a Douban subject page (no subject id anywhere)
    /// - The title element is absent
    #[instrument(skip(self))]
    pub fn metadata(self) -> Result<MetadataRecord> {
        // Always attempt extraction of the subject id first, it's
        // equivalent to quickly checking the HTML document validity.
        let id = self.subject_id().or_raise(|| ErrorKind::InvalidDocument)?;
        let mut record = MetadataRecord {
            id,
            title: self.title().or_raise(|| ErrorKind::MissingField("title"))?,
            ..Default::default()
        };
        let info = self.info();
        record.authors = info.authors();
        record.subtitle = info.text_value(&["副标题"]);
        record.publisher = info.publisher();
        record.published = info.published();
        if let Some(isbn) = info.isbn() {
            record.set_isbn(&isbn);
        }
        record.series = info.series();
        record.rating = self.rating();
        record.tags = self.tags();
        record.description = self.description();
        record.cover_url = self.cover();
        Ok(record)
    }

    fn subject_id(&self) -> Result<String> {
        let canonical = self
            .document
            .select(&consts::CANONICAL_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .chain(self.document.select(&consts::SHARE_SELECTOR).filter_map(|el| el.value().attr("data-url")));
        for href in canonical {
            if let Some(captures) = consts::SUBJECT_URL_REGEX.captures(href) {
                return Ok(captures[1].to_string());
            }
        }
        exn::bail!(ErrorKind::MissingField("subject id"));
    }

    fn title(&self) -> Result<String> {
        self.document
            .select(&consts::TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_raise(|| ErrorKind::MissingField("title"))
    }

    fn rating(&self) -> Option<Rating> {
        self.document
            .select(&consts::AVERAGE_RATING_SELECTOR)
            .next()
            .and_then(|el| el.text().collect::<String>().parse::<Rating>().ok())
    }

    fn cover(&self) -> Option<String> {
        self.document
            .select(&consts::COVER_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("href"))
            // The site links a placeholder when no cover has been uploaded.
            .filter(|href| !href.is_empty() && !href.ends_with("update_image"))
            .map(str::to_string)
    }

    fn description(&self) -> Option<String> {
        // The intro block appears twice when the text is long (collapsed
        // preview + full text); the last occurrence is the complete one.
        let intro = self.document.select(&consts::DESCRIPTION_SELECTOR).last()?;
        let paragraphs: Vec<String> = intro
            .select(&consts::PARAGRAPH_SELECTOR)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let text = if paragraphs.is_empty() {
            intro.text().collect::<String>().trim().to_string()
        } else {
            paragraphs.join("\n\n")
        };
        Some(text).filter(|t| !t.is_empty())
    }

    fn tags(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut tags = Vec::new();
        for element in self.document.select(&consts::TAG_SELECTOR) {
            let tag = element.text().collect::<String>().trim().to_string();
            if !tag.is_empty() && seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
        tags
    }

    fn info(&self) -> InfoList {
        InfoList::new(&self.document)
    }
}
impl FromStr for DetailExtractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<Html> for DetailExtractor {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

impl TryFrom<DetailExtractor> for MetadataRecord {
    type Error = Error;
    fn try_from(extractor: DetailExtractor) -> Result<Self> {
        extractor.metadata()
    }
}

/// Returns `true` if the HTML content appears to be a Douban subject page.
///
/// # Validation criteria
/// > Contains a subject URL in the canonical link or the share widget
///
/// This function is designed to be fast and only examines the necessary
/// parts of the document.
///
/// # Examples
///
/// ```rust
/// use douban_extract::is_valid;
/// let valid_html = r#"
///     <head>
///         <link rel="canonical" href="https://book.douban.com/subject/1858513/">
///     </head>
/// "#;
///
/// assert!(is_valid(valid_html));
/// ```
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn is_valid(html: &str) -> bool {
    DetailExtractor::from_html(html).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublishDate;
    use time::Month;

    const DUNE_ZH: &str = r#"
        <html>
        <head>
            <link rel="canonical" href="https://book.douban.com/subject/26952485/">
        </head>
        <body>
        <h1><span property="v:itemreviewed">沙丘</span></h1>
        <div id="mainpic">
            <a class="nbg" href="https://img1.doubanio.com/view/subject/l/public/s29145085.jpg">
                <img src="https://img1.doubanio.com/view/subject/s/public/s29145085.jpg">
            </a>
        </div>
        <div id="info">
            <span class="pl"> 作者</span>:
                <a href="https://book.douban.com/author/4521337/">[美] 弗兰克·赫伯特</a><br/>
            <span class="pl">出版社:</span> 江苏凤凰文艺出版社<br/>
            <span class="pl">副标题:</span> 沙丘六部曲第一部<br/>
            <span class="pl">译者</span>: <a href="/search/潘振华">潘振华</a><br/>
            <span class="pl">出版年:</span> 2017-2-1<br/>
            <span class="pl">丛书:</span>&nbsp;<a href="https://book.douban.com/series/38608">读客全球顶级畅销小说文库</a><br/>
            <span class="pl">ISBN:</span> 9787539993256<br/>
        </div>
        <strong class="ll rating_num" property="v:average"> 8.2 </strong>
        <div id="link-report">
            <div class="intro">
                <p>预览段落。</p>
            </div>
            <div class="intro">
                <p>哥白尼打破了地球的宇宙中心论。</p>
                <p>《沙丘》打破了人类的宇宙中心论。</p>
            </div>
        </div>
        <a class="tag" href="/tag/科幻">科幻</a>
        <a class="tag" href="/tag/科幻小说">科幻小说</a>
        <a class="tag" href="/tag/科幻">科幻</a>
        </body></html>
    "#;

    #[test]
    fn extracts_full_record() {
        let record = DetailExtractor::from_html(DUNE_ZH).metadata().unwrap();
        assert_eq!(record.id, "26952485");
        assert_eq!(record.title, "沙丘");
        assert_eq!(record.subtitle.as_deref(), Some("沙丘六部曲第一部"));
        assert_eq!(record.authors, vec!["[美] 弗兰克·赫伯特", "潘振华"]);
        assert_eq!(record.publisher.as_deref(), Some("江苏凤凰文艺出版社"));
        assert_eq!(record.isbn13.as_deref(), Some("9787539993256"));
        assert_eq!(record.isbn10, None);
        assert_eq!(record.series.as_ref().unwrap().name, "读客全球顶级畅销小说文库");
        assert_eq!(record.series.as_ref().unwrap().index, 1.0);
        assert_eq!(record.rating.unwrap().value(), 8.2);
        assert_eq!(record.url(), "https://book.douban.com/subject/26952485/");
    }

    #[test]
    fn extracts_full_publish_date() {
        let record = DetailExtractor::from_html(DUNE_ZH).metadata().unwrap();
        match record.published.unwrap() {
            PublishDate::Full(date) => {
                assert_eq!(date.year(), 2017);
                assert_eq!(date.month(), Month::February);
                assert_eq!(date.day(), 1);
            }
            other => panic!("expected full date, got {other:?}"),
        }
    }

    #[test]
    fn description_takes_last_intro_block() {
        let record = DetailExtractor::from_html(DUNE_ZH).metadata().unwrap();
        let description = record.description.unwrap();
        assert!(description.starts_with("哥白尼"));
        assert!(description.contains("\n\n"));
        assert!(!description.contains("预览段落"));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let record = DetailExtractor::from_html(DUNE_ZH).metadata().unwrap();
        assert_eq!(record.tags, vec!["科幻", "科幻小说"]);
    }

    #[test]
    fn cover_comes_from_main_picture() {
        let record = DetailExtractor::from_html(DUNE_ZH).metadata().unwrap();
        assert!(record.cover_url.as_deref().unwrap().contains("s29145085"));
    }

    #[test]
    fn missing_title_is_the_only_fatal_field() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/123/"></head>
            <body><div id="info"><span class="pl">出版社:</span> 某出版社<br/></div></body>
        "#;
        let err = DetailExtractor::from_html(html).metadata().unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingField("title")));
    }

    #[test]
    fn page_without_subject_id_is_invalid() {
        let html = r#"<html><body><h1><span property="v:itemreviewed">孤本</span></h1></body></html>"#;
        let err = DetailExtractor::from_html(html).metadata().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidDocument));
        assert!(!is_valid(html));
    }

    #[test]
    fn subject_id_falls_back_to_share_widget() {
        let html = r#"
            <body>
            <a data-url="https://book.douban.com/subject/1858513/" class="bn-sharing">分享到</a>
            <h1><span property="v:itemreviewed">Dune</span></h1>
            </body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert_eq!(record.id, "1858513");
    }

    #[test]
    fn optional_sections_may_all_be_absent() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/42/"></head>
            <body><h1><span property="v:itemreviewed">Bare</span></h1></body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert_eq!(record.title, "Bare");
        assert!(record.authors.is_empty());
        assert!(record.publisher.is_none());
        assert!(record.published.is_none());
        assert!(record.isbn13.is_none());
        assert!(record.series.is_none());
        assert!(record.rating.is_none());
        assert!(record.tags.is_empty());
        assert!(record.description.is_none());
        assert!(record.cover_url.is_none());
    }

    #[test]
    fn bad_isbn_checksum_is_discarded() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/42/"></head>
            <body>
            <h1><span property="v:itemreviewed">Bad ISBN</span></h1>
            <div id="info"><span class="pl">ISBN:</span> 9787539993257<br/></div>
            </body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert!(record.isbn13.is_none());
        assert!(record.isbn10.is_none());
    }

    #[test]
    fn isbn10_records_both_forms() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/1858513/"></head>
            <body>
            <h1><span property="v:itemreviewed">Dune</span></h1>
            <div id="info"><span class="pl">ISBN:</span> 0441013597<br/></div>
            </body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert_eq!(record.isbn10.as_deref(), Some("0441013597"));
        assert_eq!(record.isbn13.as_deref(), Some("9780441013593"));
    }

    #[test]
    fn year_only_publish_date() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/42/"></head>
            <body>
            <h1><span property="v:itemreviewed">Old Book</span></h1>
            <div id="info"><span class="pl">出版年:</span> 1965<br/></div>
            </body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert_eq!(record.published.unwrap(), PublishDate::Year(1965));
    }

    #[test]
    fn placeholder_cover_is_skipped() {
        let html = r#"
            <head><link rel="canonical" href="https://book.douban.com/subject/42/"></head>
            <body>
            <h1><span property="v:itemreviewed">No Cover</span></h1>
            <div id="mainpic"><a class="nbg" href="https://book.douban.com/subject/42/update_image"></a></div>
            </body>
        "#;
        let record = DetailExtractor::from_html(html).metadata().unwrap();
        assert!(record.cover_url.is_none());
    }
}
