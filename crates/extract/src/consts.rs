use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

const SAFE_END: &str = "(?:$|\\?|#|/)";
const SCHEME_HOST: &str = "^https?://book\\.douban\\.com";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Subject URLs identify a book page; the numeric segment is the subject id.
regex!(SUBJECT_URL_REGEX, format!(r"{}/subject/(\d+){}", SCHEME_HOST, SAFE_END).as_str());

// Search results page (server-rendered list layout).
selector!(SEARCH_ITEM_SELECTOR, "ul.subject-list li.subject-item");
selector!(SEARCH_TITLE_SELECTOR, "div.info h2 a");
selector!(SEARCH_PUB_SELECTOR, "div.info div.pub");
selector!(SEARCH_RATING_SELECTOR, "span.rating_nums");
selector!(SEARCH_THUMB_SELECTOR, "div.pic img[src]");

// Subject (detail) page.
selector!(CANONICAL_SELECTOR, "link[rel='canonical'][href]");
// Share widget carries the subject URL too; the original site keeps it even
// when the canonical link is absent.
selector!(SHARE_SELECTOR, "a[data-url]");
selector!(TITLE_SELECTOR, "span[property='v:itemreviewed']");
selector!(INFO_SELECTOR, "div#info");
selector!(INFO_LABEL_SELECTOR, "span.pl");
selector!(AVERAGE_RATING_SELECTOR, "strong[property='v:average']");
selector!(COVER_SELECTOR, "div#mainpic a.nbg[href]");
selector!(DESCRIPTION_SELECTOR, "div#link-report div.intro");
selector!(TAG_SELECTOR, "a.tag");
selector!(ANCHOR_SELECTOR, "a");
selector!(PARAGRAPH_SELECTOR, "p");

regex!(YEAR_MONTH_DAY_REGEX, r"^(\d{4})-(\d{1,2})-(\d{1,2})");
regex!(YEAR_MONTH_REGEX, r"^(\d{4})-(\d{1,2})$");
regex!(YEAR_REGEX, r"(\d{4})");
