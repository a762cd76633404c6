use autosite_common::Network;
use chrono::DateTime;

use crate::linkedin::types::NetworkUpdates;
use crate::{CrossPost, Harvest, StatusUpdate, non_empty};

const DEFAULT_HEADING: &str = "shared a link";

/// Map shares to status updates; with `repost`, each share is also a repost candidate.
///
/// Nothing is extracted unless the feed reports a positive `_total`.
pub fn extract_updates(feed: NetworkUpdates, repost: bool) -> Harvest {
    let mut harvest = Harvest::default();
    if feed.total <= 0 {
        return harvest;
    }

    for update in feed.values {
        let Some(created) = DateTime::from_timestamp(update.timestamp.div_euclid(1000), 0) else {
            tracing::debug!(timestamp = update.timestamp, "linkedin.update.bad_timestamp");
            continue;
        };
        let person = update.update_content.person;
        let share = person.current_share.unwrap_or_default();

        let comment = non_empty(share.comment);
        let heading = comment
            .clone()
            .unwrap_or_else(|| DEFAULT_HEADING.to_string());
        let shared_url = share.content.and_then(|c| non_empty(c.submitted_url));
        let profile_url = person
            .site_standard_profile_request
            .map(|p| p.url)
            .unwrap_or_default();

        if repost {
            let message = match &comment {
                Some(text) => text.clone(),
                None => format!("I {DEFAULT_HEADING}"),
            };
            let link = shared_url
                .clone()
                .or_else(|| non_empty(Some(profile_url.clone())));
            harvest.crossposts.push(CrossPost::new(message, link));
        }

        harvest.updates.push(StatusUpdate {
            network: Network::Linkedin,
            origin_id: update.timestamp,
            heading,
            content: shared_url.clone(),
            link: shared_url,
            created,
            author: format!("{} {}", person.first_name, person.last_name)
                .trim()
                .to_string(),
            author_url: profile_url,
        });
    }
    harvest
}
