/*!
 * Wiki access.
 *
 * - `client`: Page fetching with a descriptive User-Agent and a timeout
 * - `quest_list`: Parsing of the quest transcript category page
 */

pub mod client;
pub mod quest_list;

pub use client::WikiClient;
pub use quest_list::{parse_quest_listing, QuestListing};
