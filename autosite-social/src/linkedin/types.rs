use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkUpdates {
    #[serde(rename = "_total", default)]
    pub total: i64,
    #[serde(default)]
    pub values: Vec<NetworkUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUpdate {
    /// Milliseconds since the epoch; doubles as the update's id.
    pub timestamp: i64,
    pub update_content: UpdateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContent {
    pub person: Person,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub site_standard_profile_request: Option<ProfileRequest>,
    #[serde(default)]
    pub current_share: Option<Share>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Share {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub content: Option<ShareContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareContent {
    #[serde(default)]
    pub submitted_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
