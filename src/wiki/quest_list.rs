/*!
 * Parsing of the quest transcript category page.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::app_config::WikiConfig;

static CATEGORY_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.mw-category-group li").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A transcript page listed on the category page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestListing {
    /// Position in the listing, starting at 1
    pub index: usize,
    /// Page title, e.g. "Transcript:Cook's Assistant"
    pub title: String,
    /// Absolute URL of the transcript page
    pub link: String,
}

impl QuestListing {
    /// Title without the "Transcript:" namespace
    pub fn quest_name(&self) -> &str {
        self.title
            .strip_prefix("Transcript:")
            .unwrap_or(&self.title)
            .trim()
    }
}

/// Collect the category entries whose item directly holds a link
pub fn parse_quest_listing(html: &str, config: &WikiConfig) -> Vec<QuestListing> {
    let page = Html::parse_document(html);

    page.select(&CATEGORY_ITEM_SELECTOR)
        .filter_map(|item| {
            let anchor = item
                .children()
                .filter_map(ElementRef::wrap)
                .find(|child| child.value().name() == "a")?;
            let href = anchor.value().attr("href")?;

            let text = anchor.text().collect::<Vec<_>>().join(" ");
            let title = WHITESPACE_REGEX.replace_all(text.trim(), " ").to_string();

            Some((title, config.absolute_url(href)))
        })
        .enumerate()
        .map(|(position, (title, link))| QuestListing {
            index: position + 1,
            title,
            link,
        })
        .collect()
}
