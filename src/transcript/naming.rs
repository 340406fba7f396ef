/*!
 * Quest naming: resolving a quest's display name from a transcript page and
 * deriving the file slug and branch name from it.
 */

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Name used when neither the page title nor the URL identify the quest
pub const UNKNOWN_QUEST: &str = "Unknown Quest";

/// Prefix of transcript page names on the wiki
const TRANSCRIPT_PREFIX: &str = "Transcript:";

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static APOSTROPHE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"['\u{2018}\u{2019}]").unwrap());
static NON_ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Resolves quest names for one wiki site
#[derive(Debug, Clone)]
pub struct QuestNameResolver {
    title_regex: Regex,
}

impl QuestNameResolver {
    /// Create a resolver for page titles of the form "Transcript of X - <site> Wiki"
    pub fn new(site_name: &str) -> Self {
        let pattern = format!(
            r"Transcript of (.+?)\s*-\s*{}\s+Wiki",
            regex::escape(site_name.trim())
        );
        Self {
            // The site name is escaped, so the pattern is always valid
            title_regex: Regex::new(&pattern).unwrap(),
        }
    }

    /// Resolve the quest name from the page title, then the URL
    pub fn resolve(&self, html: &str, url: &str) -> String {
        self.from_title(html)
            .or_else(|| quest_name_from_url(url))
            .unwrap_or_else(|| UNKNOWN_QUEST.to_string())
    }

    /// Quest name embedded in the page's <title>
    pub fn from_title(&self, html: &str) -> Option<String> {
        let page = Html::parse_document(html);
        let title = page.select(&TITLE_SELECTOR).next()?.text().collect::<String>();

        self.title_regex
            .captures(&title)
            .and_then(|captures| captures.get(1))
            .map(|name| name.as_str().trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

impl Default for QuestNameResolver {
    fn default() -> Self {
        Self::new("OSRS")
    }
}

/// Quest name from the trailing "Transcript:" segment of a page URL
pub fn quest_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();

    let (_, quest_part) = path.rsplit_once(TRANSCRIPT_PREFIX)?;
    let name = percent_decode_str(quest_part).decode_utf8_lossy().replace('_', " ");
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// File-system and branch friendly form of a quest name
pub fn create_slug(quest_name: &str) -> String {
    let slug = quest_name.to_lowercase();
    let slug = APOSTROPHE_REGEX.replace_all(&slug, "");
    let slug = NON_ALPHANUMERIC_REGEX.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Branch the voiceover of a quest is prepared on
pub fn generate_branch_name(quest_name: &str) -> String {
    format!("quest/{}", create_slug(quest_name))
}
