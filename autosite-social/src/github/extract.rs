//! Rendering of GitHub events into status updates and repost candidates.
use autosite_common::Network;
use chrono::{DateTime, Utc};

use crate::github::types::{EventPayload, RawEvent};
use crate::{CrossPost, Harvest, StatusUpdate, non_empty};

struct Rendered {
    heading: String,
    content: Option<String>,
    link: Option<String>,
}

fn repo_url(name: &str) -> String {
    format!("https://github.com/{}", name.to_lowercase())
}

/// `"user/my-app"` -> `"myapp"`.
pub fn short_repo_name(full: &str) -> String {
    full.rsplit('/').next().unwrap_or(full).replace('-', "")
}

fn render(event: &RawEvent, payload: &EventPayload) -> Rendered {
    let repo = event.repo.name.as_str();
    let at_repo = |heading: String| Rendered {
        heading,
        content: None,
        link: Some(repo_url(repo)),
    };

    match payload {
        EventPayload::Comment(p) => Rendered {
            heading: "commented".into(),
            content: Some(p.comment.body.clone()),
            link: Some(p.comment.html_url.clone()),
        },
        EventPayload::Create(p) => {
            let target = match (p.ref_type.as_str(), p.ref_name.as_deref()) {
                ("repository", _) | (_, None) => repo,
                (_, Some(r)) => r,
            };
            at_repo(format!("created {} {}", p.ref_type, target))
        }
        EventPayload::Delete(p) => at_repo(format!("deleted {}", p.ref_type)),
        EventPayload::Download(p) => Rendered {
            heading: format!("uploaded {}", p.download.name),
            content: None,
            link: Some(p.download.html_url.clone()),
        },
        EventPayload::Follow(p) => Rendered {
            heading: format!("is now following {}", p.target.login),
            content: None,
            link: Some(p.target.html_url.clone()),
        },
        EventPayload::Fork => at_repo(format!("forked {repo}")),
        EventPayload::ForkApply(p) => at_repo(format!("applied fork to {}", p.head)),
        EventPayload::Gist(p) => Rendered {
            heading: format!(
                "{}d {}",
                p.action,
                p.gist.description.as_deref().unwrap_or_default()
            )
            .trim_end()
            .to_string(),
            content: None,
            link: Some(p.gist.html_url.clone()),
        },
        EventPayload::Gollum(p) => Rendered {
            heading: "updated pages".into(),
            content: Some(
                p.pages
                    .iter()
                    .map(|page| page.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            link: Some(repo_url(repo)),
        },
        EventPayload::IssueComment(p) => Rendered {
            heading: format!("{} on issue #{}", p.action, p.issue.number),
            content: Some(p.comment.body.clone()),
            link: Some(p.issue.html_url.clone()),
        },
        EventPayload::Issues(p) => Rendered {
            heading: format!("{} issue #{}", p.action, p.issue.number),
            content: p.issue.body.clone(),
            link: Some(p.issue.html_url.clone()),
        },
        EventPayload::Member(p) => Rendered {
            heading: format!("{} {} to {}", p.action, p.member.login, repo),
            content: None,
            link: Some(p.member.html_url.clone()),
        },
        EventPayload::Public => at_repo(format!("Open sourced {repo}")),
        EventPayload::PullRequest(p) => Rendered {
            heading: format!("{} pull request", p.action),
            content: Some(p.pull_request.title.clone()),
            link: Some(p.pull_request.html_url.clone()),
        },
        EventPayload::Push(p) => Rendered {
            heading: format!("pushed to {repo}"),
            content: p.commits.first().map(|c| c.message.clone()),
            link: Some(repo_url(repo)),
        },
        EventPayload::TeamAdd(p) => Rendered {
            heading: format!("added {} to {}", p.user.login, p.team.name),
            content: None,
            link: Some(p.user.html_url.clone()),
        },
        EventPayload::Watch(p) => at_repo(format!("{} watching {repo}", p.action)),
    }
}

/// Turn the event stream of `login` into status updates.
///
/// Only events strictly after `since` are kept. Unknown event types and payloads that
/// fail to decode are dropped. With `repost`, every push carrying at least one commit
/// also yields a cross-post candidate.
pub fn extract_events(
    events: Vec<RawEvent>,
    login: &str,
    since: Option<DateTime<Utc>>,
    repost: bool,
) -> Harvest {
    let mut harvest = Harvest::default();
    for event in events {
        if since.is_some_and(|mark| event.created_at <= mark) {
            continue;
        }
        let payload = match event.typed_payload() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(kind = %event.kind, id = %event.id, "github.event.unknown_type");
                continue;
            }
            Err(e) => {
                tracing::debug!(kind = %event.kind, id = %event.id, error = %e, "github.event.bad_payload");
                continue;
            }
        };

        let rendered = render(&event, &payload);
        if rendered.heading.is_empty() {
            continue;
        }

        if repost {
            if let EventPayload::Push(push) = &payload {
                if let Some(commit) = push.commits.first() {
                    harvest.crossposts.push(CrossPost::new(
                        format!(
                            "I updated my app #{} on @github: {}",
                            short_repo_name(&event.repo.name),
                            commit.message
                        ),
                        Some(repo_url(&event.repo.name)),
                    ));
                }
            }
        }

        harvest.updates.push(StatusUpdate {
            network: Network::Github,
            origin_id: event
                .id
                .parse()
                .unwrap_or_else(|_| event.created_at.timestamp()),
            heading: rendered.heading,
            content: non_empty(rendered.content),
            link: rendered.link,
            created: event.created_at,
            author: login.to_string(),
            author_url: format!("https://github.com/{login}"),
        });
    }
    harvest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn event(kind: &str, at: &str, payload: Value) -> RawEvent {
        serde_json::from_value(json!({
            "id": "2489651045",
            "type": kind,
            "created_at": at,
            "repo": { "name": "User/my-app" },
            "payload": payload,
        }))
        .unwrap()
    }

    fn headings(h: &Harvest) -> Vec<&str> {
        h.updates.iter().map(|u| u.heading.as_str()).collect()
    }

    #[test]
    fn push_with_repost_yields_candidate() {
        let events = vec![event(
            "PushEvent",
            "2024-01-02T03:04:05Z",
            json!({ "commits": [ { "message": "fix bug" }, { "message": "later" } ] }),
        )];
        let h = extract_events(events, "user", None, true);

        assert_eq!(headings(&h), ["pushed to User/my-app"]);
        let u = &h.updates[0];
        assert_eq!(u.content.as_deref(), Some("fix bug"));
        assert_eq!(u.link.as_deref(), Some("https://github.com/user/my-app"));
        assert_eq!(u.author_url, "https://github.com/user");
        assert_eq!(u.origin_id, 2489651045);

        assert_eq!(h.crossposts.len(), 1);
        assert!(h.crossposts[0].message.contains("#myapp"));
        assert!(h.crossposts[0].message.contains("fix bug"));
        assert_eq!(
            h.crossposts[0].message,
            "I updated my app #myapp on @github: fix bug"
        );
    }

    #[test]
    fn push_without_repost_or_commits_has_no_candidate() {
        let events = vec![
            event("PushEvent", "2024-01-02T03:04:05Z", json!({ "commits": [ { "message": "m" } ] })),
            event("PushEvent", "2024-01-02T03:04:06Z", json!({ "commits": [] })),
        ];
        assert!(extract_events(events.clone(), "user", None, false).crossposts.is_empty());
        let h = extract_events(events, "user", None, true);
        assert_eq!(h.crossposts.len(), 1);
        assert_eq!(h.updates.len(), 2);
        assert!(h.updates[1].content.is_none());
    }

    #[test]
    fn renders_each_known_type() {
        let at = "2024-01-02T03:04:05Z";
        let events = vec![
            event("CommitCommentEvent", at, json!({ "comment": { "body": "nice", "html_url": "https://c" } })),
            event("CreateEvent", at, json!({ "ref_type": "repository", "ref": null })),
            event("CreateEvent", at, json!({ "ref_type": "branch", "ref": "dev" })),
            event("DeleteEvent", at, json!({ "ref_type": "tag", "ref": "v1" })),
            event("DownloadEvent", at, json!({ "download": { "name": "app.zip", "html_url": "https://d" } })),
            event("FollowEvent", at, json!({ "target": { "login": "bob", "html_url": "https://github.com/bob" } })),
            event("ForkEvent", at, json!({})),
            event("ForkApplyEvent", at, json!({ "head": "master" })),
            event("GistEvent", at, json!({ "action": "create", "gist": { "description": "notes", "html_url": "https://g" } })),
            event("GollumEvent", at, json!({ "pages": [ { "title": "Home" }, { "title": "FAQ" } ] })),
            event("IssueCommentEvent", at, json!({ "action": "created", "issue": { "number": 7, "html_url": "https://i/7" }, "comment": { "body": "+1", "html_url": "https://i/7#c" } })),
            event("IssuesEvent", at, json!({ "action": "opened", "issue": { "number": 8, "html_url": "https://i/8", "body": "broken" } })),
            event("MemberEvent", at, json!({ "action": "added", "member": { "login": "carol", "html_url": "https://github.com/carol" } })),
            event("PublicEvent", at, Value::Null),
            event("PullRequestEvent", at, json!({ "action": "opened", "pull_request": { "title": "Add x", "html_url": "https://p/1" } })),
            event("TeamAddEvent", at, json!({ "user": { "login": "dave", "html_url": "https://github.com/dave" }, "team": { "name": "core" } })),
            event("WatchEvent", at, json!({ "action": "started" })),
        ];
        let h = extract_events(events, "user", None, true);
        assert_eq!(
            headings(&h),
            [
                "commented",
                "created repository User/my-app",
                "created branch dev",
                "deleted tag",
                "uploaded app.zip",
                "is now following bob",
                "forked User/my-app",
                "applied fork to master",
                "created notes",
                "updated pages",
                "created on issue #7",
                "opened issue #8",
                "added carol to User/my-app",
                "Open sourced User/my-app",
                "opened pull request",
                "added dave to core",
                "started watching User/my-app",
            ]
        );
        assert_eq!(h.updates[9].content.as_deref(), Some("Home, FAQ"));
        assert_eq!(h.updates[11].content.as_deref(), Some("broken"));
        assert_eq!(h.updates[14].content.as_deref(), Some("Add x"));
        assert!(h.crossposts.is_empty());
    }

    #[test]
    fn unknown_and_malformed_events_are_dropped() {
        let at = "2024-01-02T03:04:05Z";
        let events = vec![
            event("SponsorshipEvent", at, json!({})),
            event("IssuesEvent", at, json!({ "action": "opened" })),
            event("WatchEvent", at, json!({ "action": "started" })),
        ];
        let h = extract_events(events, "user", None, false);
        assert_eq!(headings(&h), ["started watching User/my-app"]);
    }

    #[test]
    fn only_events_after_the_mark_are_kept() {
        let mark = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let events = vec![
            event("ForkEvent", "2024-01-02T03:04:06Z", json!({})),
            event("ForkEvent", "2024-01-02T03:04:05Z", json!({})),
            event("ForkEvent", "2024-01-01T00:00:00Z", json!({})),
        ];
        let h = extract_events(events, "user", Some(mark), false);
        assert_eq!(h.updates.len(), 1);
        assert_eq!(h.updates[0].created, mark + chrono::Duration::seconds(1));
    }

    #[test]
    fn short_names_drop_owner_and_hyphens() {
        assert_eq!(short_repo_name("user/my-app"), "myapp");
        assert_eq!(short_repo_name("solo-repo"), "solorepo");
    }
}
