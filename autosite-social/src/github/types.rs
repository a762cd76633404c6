//! Event envelope plus the payload shapes of every event type we render.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Raw entry of `users/<login>/events`; the payload stays untyped until dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub repo: Repo,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub comment: Comment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayload {
    pub ref_type: String,
    #[serde(rename = "ref", default)]
    pub ref_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletePayload {
    pub ref_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Download {
    pub name: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadPayload {
    pub download: Download,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowPayload {
    pub target: Account,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForkApplyPayload {
    pub head: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gist {
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GistPayload {
    pub action: String,
    pub gist: Gist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikiPage {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GollumPayload {
    #[serde(default)]
    pub pages: Vec<WikiPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentPayload {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub issue: Issue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    pub action: String,
    pub member: Account,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub title: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub action: String,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamAddPayload {
    pub user: Account,
    pub team: Team,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchPayload {
    pub action: String,
}

/// Typed payload, selected by the envelope's `type` tag.
#[derive(Debug, Clone)]
pub enum EventPayload {
    Comment(CommentPayload),
    Create(CreatePayload),
    Delete(DeletePayload),
    Download(DownloadPayload),
    Follow(FollowPayload),
    Fork,
    ForkApply(ForkApplyPayload),
    Gist(GistPayload),
    Gollum(GollumPayload),
    IssueComment(IssueCommentPayload),
    Issues(IssuesPayload),
    Member(MemberPayload),
    Public,
    PullRequest(PullRequestPayload),
    Push(PushPayload),
    TeamAdd(TeamAddPayload),
    Watch(WatchPayload),
}

impl RawEvent {
    /// Decode each entry of an events listing on its own; malformed entries are
    /// logged and dropped.
    pub fn decode_all(raw: Vec<Value>) -> Vec<RawEvent> {
        raw.into_iter()
            .filter_map(|entry| match RawEvent::deserialize(&entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    let id = entry.get("id").and_then(Value::as_str).unwrap_or("-");
                    tracing::debug!(id, error = %e, "github.event.malformed");
                    None
                }
            })
            .collect()
    }

    /// Decode the payload for a known event type.
    ///
    /// `Ok(None)` means the type is not one we render.
    pub fn typed_payload(&self) -> Result<Option<EventPayload>, serde_json::Error> {
        let payload = match self.kind.as_str() {
            "CommitCommentEvent" | "PullRequestReviewCommentEvent" => {
                EventPayload::Comment(self.decode()?)
            }
            "CreateEvent" => EventPayload::Create(self.decode()?),
            "DeleteEvent" => EventPayload::Delete(self.decode()?),
            "DownloadEvent" => EventPayload::Download(self.decode()?),
            "FollowEvent" => EventPayload::Follow(self.decode()?),
            "ForkEvent" => EventPayload::Fork,
            "ForkApplyEvent" => EventPayload::ForkApply(self.decode()?),
            "GistEvent" => EventPayload::Gist(self.decode()?),
            "GollumEvent" => EventPayload::Gollum(self.decode()?),
            "IssueCommentEvent" => EventPayload::IssueComment(self.decode()?),
            "IssuesEvent" => EventPayload::Issues(self.decode()?),
            "MemberEvent" => EventPayload::Member(self.decode()?),
            "PublicEvent" => EventPayload::Public,
            "PullRequestEvent" => EventPayload::PullRequest(self.decode()?),
            "PushEvent" => EventPayload::Push(self.decode()?),
            "TeamAddEvent" => EventPayload::TeamAdd(self.decode()?),
            "WatchEvent" => EventPayload::Watch(self.decode()?),
            _ => return Ok(None),
        };
        Ok(Some(payload))
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}
