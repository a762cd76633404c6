use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub text: String,
    /// `Mon Jan 02 15:04:05 -0700 2006`
    pub created_at: String,
    /// HTML anchor naming the posting client.
    #[serde(default)]
    pub source: Option<String>,
    pub user: TweetUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TweetUser {
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Reply to `statuses/update.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostedTweet {
    pub id_str: String,
    #[serde(default)]
    pub text: String,
}
