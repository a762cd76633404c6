//! Feed envelope and the object kinds a `post` activity can carry.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub network_activities: Vec<ActivityGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityGroup {
    #[serde(default)]
    pub ids: Vec<String>,
    /// Decoded one at a time by [`ActivityGroup::activities`].
    #[serde(default)]
    pub objects: Vec<Value>,
}

impl ActivityGroup {
    /// Activities of this group that decode; malformed ones are logged and dropped.
    pub fn activities(self) -> impl Iterator<Item = Activity> {
        self.objects
            .into_iter()
            .filter_map(|raw| match Activity::deserialize(&raw) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    let verb = raw.get("verb").and_then(Value::as_str).unwrap_or("-");
                    tracing::debug!(verb, error = %e, "xing.activity.malformed");
                    None
                }
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub verb: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub creator: Creator,
    /// Kept untyped so an unknown kind does not reject the whole feed.
    #[serde(default)]
    pub objects: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub permalink: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedObject {
    Status {
        #[serde(default)]
        content: String,
    },
    Event {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    JobPosting {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    Thread {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    Bookmark {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Activity {
    /// The first attached object, if it is of a known kind.
    pub fn object(&self) -> Option<FeedObject> {
        let raw = self.objects.first()?;
        match FeedObject::deserialize(raw) {
            Ok(obj) => Some(obj),
            Err(e) => {
                let kind = raw.get("type").and_then(Value::as_str).unwrap_or("-");
                tracing::debug!(kind, error = %e, "xing.object.unrecognized");
                None
            }
        }
    }
}
