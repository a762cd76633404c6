use autosite_common::Network;
use chrono::{DateTime, Utc};

use crate::xing::types::{Feed, FeedObject};
use crate::{CrossPost, Harvest, StatusUpdate, non_empty};

/// Heading for a status object that arrives without text.
const UNTITLED_STATUS: &str = "posted a status update";

struct Rendered {
    heading: String,
    content: Option<String>,
    link: Option<String>,
    crosspost: Option<String>,
}

fn render(object: Option<FeedObject>) -> Rendered {
    let titled = |heading: String,
                  content: Option<String>,
                  link: Option<String>,
                  crosspost: Option<String>| Rendered {
        heading,
        content: non_empty(content),
        link: non_empty(link),
        crosspost,
    };
    match object {
        Some(FeedObject::Status { content }) => Rendered {
            heading: if content.trim().is_empty() {
                UNTITLED_STATUS.to_string()
            } else {
                content.clone()
            },
            content: None,
            link: None,
            crosspost: Some(content),
        },
        Some(FeedObject::Event { title, description, url }) => titled(
            format!("posted an event: {title}"),
            description,
            url,
            Some(format!("I posted an event on XING: {title}")),
        ),
        Some(FeedObject::JobPosting { title, description, url }) => titled(
            format!("posted a job: {title}"),
            description,
            url,
            Some(format!("I posted a job on XING: {title}")),
        ),
        Some(FeedObject::Thread { title, content, url }) => {
            titled(format!("started a discussion: {title}"), content, url, None)
        }
        Some(FeedObject::Bookmark { title, description, url }) => titled(
            format!("shared a link: {title}"),
            description,
            url,
            Some(format!("I shared a link on XING: {title}")),
        ),
        None => Rendered {
            heading: String::new(),
            content: None,
            link: None,
            crosspost: None,
        },
    }
}

/// Map `post` activities to status updates.
///
/// Activities not after `since` are skipped. Unknown object kinds are kept with an
/// empty heading. With `repost`, statuses, events, jobs and bookmarks become candidates.
pub fn extract_feed(feed: Feed, since: Option<DateTime<Utc>>, repost: bool) -> Harvest {
    let mut harvest = Harvest::default();
    let activities = feed
        .network_activities
        .into_iter()
        .flat_map(|group| group.activities());

    for activity in activities {
        if activity.verb != "post" {
            continue;
        }
        if since.is_some_and(|mark| activity.created_at <= mark) {
            continue;
        }

        let rendered = render(activity.object());
        if repost {
            if let Some(message) = rendered.crosspost.filter(|m| !m.trim().is_empty()) {
                harvest
                    .crossposts
                    .push(CrossPost::new(message, rendered.link.clone()));
            }
        }

        harvest.updates.push(StatusUpdate {
            network: Network::Xing,
            origin_id: activity.created_at.timestamp(),
            heading: rendered.heading,
            content: rendered.content,
            link: rendered.link,
            created: activity.created_at,
            author: activity.creator.display_name,
            author_url: activity.creator.permalink,
        });
    }
    harvest
}
