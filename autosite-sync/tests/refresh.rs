use autosite_common::Network;
use autosite_social::StatusUpdate;
use autosite_sync::{Credential, CrossPostOutcome, RefreshSettings, Store, refresh, refresh_at};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential(network: &str, base: &str, repost: bool) -> Credential {
    Credential {
        network: network.into(),
        consumer_key: "ck".into(),
        consumer_secret: "cs".into(),
        token: format!("{network}-token"),
        secret: "ts".into(),
        repost,
        api_base: Some(base.to_string()),
        ..Default::default()
    }
}

fn stored(network: Network, origin_id: i64, secs: i64, author: &str) -> StatusUpdate {
    StatusUpdate {
        network,
        origin_id,
        heading: "seen".into(),
        content: None,
        link: None,
        created: Utc.timestamp_opt(secs, 0).unwrap(),
        author: author.into(),
        author_url: String::new(),
    }
}

fn tweet(id: &str) -> serde_json::Value {
    json!({
        "id_str": id,
        "text": format!("tweet {id} http://t.co/{id}"),
        "created_at": "Thu Jan 04 10:00:00 +0000 2024",
        "source": "web",
        "user": { "screen_name": "alice" }
    })
}

#[tokio::test]
async fn twitter_skips_the_high_water_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .and(query_param("since_id", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([tweet("501"), tweet("500")])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Store::in_memory().await.unwrap();
    store
        .upsert_credential(&credential("twitter", &server.uri(), false))
        .await
        .unwrap();
    store
        .insert_status(&stored(Network::Twitter, 500, 1_700_000_000, "alice"))
        .await
        .unwrap();

    let report = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.stored, [(Network::Twitter, 1)]);

    let latest = store.latest(Network::Twitter).await.unwrap().unwrap();
    assert_eq!(latest.origin_id, 501);
    assert_eq!(latest.heading, "tweet 501");
    assert_eq!(latest.link.as_deref(), Some("http://t.co/501"));
    assert_eq!(store.count().await.unwrap(), 2);
}

fn push_event() -> serde_json::Value {
    json!([{
        "id": "3001",
        "type": "PushEvent",
        "created_at": "2024-02-01T12:00:00Z",
        "repo": { "name": "user/my-app" },
        "payload": { "commits": [ { "message": "fix bug" } ] }
    }])
}

async fn mount_github(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "user" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/user/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_event()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn github_push_is_cross_posted_to_twitter() {
    let server = MockServer::start().await;
    mount_github(&server).await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .and(body_string_contains("%23myapp"))
        .and(body_string_contains("fix%20bug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id_str": "42" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = Store::in_memory().await.unwrap();
    store
        .upsert_credential(&credential("github", &server.uri(), true))
        .await
        .unwrap();
    store
        .upsert_credential(&credential("twitter", &server.uri(), false))
        .await
        .unwrap();

    let report = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.stored, [(Network::Github, 1), (Network::Twitter, 0)]);
    assert_eq!(
        report.crossposts,
        [CrossPostOutcome::Posted {
            status: "I updated my app #myapp on @github: fix bug https://github.com/user/my-app"
                .into(),
            id: "42".into(),
        }]
    );

    let latest = store.latest(Network::Github).await.unwrap().unwrap();
    assert_eq!(latest.heading, "pushed to user/my-app");
    assert_eq!(latest.author, "user");
}

#[tokio::test]
async fn unchanged_feed_stores_nothing_the_second_time() {
    let server = MockServer::start().await;
    mount_github(&server).await;

    let store = Store::in_memory().await.unwrap();
    store
        .upsert_credential(&credential("github", &server.uri(), false))
        .await
        .unwrap();

    let first = refresh(&store, &RefreshSettings::default()).await.unwrap();
    let second = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert_eq!(first.total_stored(), 1);
    assert_eq!(second.total_stored(), 0);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn github_not_modified_uses_stored_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let store = Store::in_memory().await.unwrap();
    store
        .upsert_credential(&credential("github", &server.uri(), false))
        .await
        .unwrap();
    store
        .insert_status(&stored(Network::Github, 1, 1_700_000_000, "octo"))
        .await
        .unwrap();

    let report = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.stored, [(Network::Github, 0)]);
}

#[tokio::test]
async fn xing_keeps_untitled_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network_activities": [{
                "ids": ["a1"],
                "objects": [{
                    "verb": "post",
                    "created_at": "2024-03-01T08:00:00Z",
                    "creator": { "display_name": "Max", "permalink": "https://xing/max" },
                    "objects": [ { "type": "company_profile_update", "title": "New logo" } ]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let store = Store::in_memory().await.unwrap();
    store
        .upsert_credential(&credential("xing", &server.uri(), true))
        .await
        .unwrap();

    let report = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert_eq!(report.stored, [(Network::Xing, 1)]);
    assert!(report.crossposts.is_empty());
    let latest = store.latest(Network::Xing).await.unwrap().unwrap();
    assert_eq!(latest.heading, "");
    assert_eq!(latest.author, "Max");
}

#[tokio::test]
async fn problems_become_warnings_and_the_pass_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/~/network/updates"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network_activities": [{
                "objects": [{
                    "verb": "post",
                    "created_at": "2024-03-01T08:00:00Z",
                    "creator": { "display_name": "Max", "permalink": "https://xing/max" },
                    "objects": [ { "type": "status", "content": "Hello" } ]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let store = Store::in_memory().await.unwrap();
    let mut expired = credential("github", &server.uri(), false);
    expired.token_expiry = Some(now - Duration::days(1));
    store.upsert_credential(&expired).await.unwrap();
    store
        .upsert_credential(&credential("myspace", &server.uri(), false))
        .await
        .unwrap();
    store
        .upsert_credential(&credential("linkedin", &server.uri(), false))
        .await
        .unwrap();
    store
        .upsert_credential(&credential("xing", &server.uri(), true))
        .await
        .unwrap();

    let report = refresh_at(&store, &RefreshSettings::default(), now).await.unwrap();
    assert_eq!(report.warnings.len(), 4, "{:?}", report.warnings);
    assert!(report.warnings[0].starts_with("github: credential unusable"));
    assert!(report.warnings[1].contains("myspace"));
    assert!(report.warnings[2].starts_with("linkedin: "));
    assert!(report.warnings[2].contains("boom"));
    assert!(report.warnings[3].starts_with("twitter: no credential stored"));
    assert_eq!(report.stored, [(Network::Xing, 1)]);
}

#[tokio::test]
async fn timeline_is_trimmed_to_retention() {
    let store = Store::in_memory().await.unwrap();
    for i in 0..105 {
        store
            .insert_status(&stored(Network::Twitter, i, 1_700_000_000 + i, "alice"))
            .await
            .unwrap();
    }

    let report = refresh(&store, &RefreshSettings::default()).await.unwrap();
    assert_eq!(report.trimmed, 5);
    assert_eq!(store.count().await.unwrap(), 100);
    let oldest_kept = store.timeline(12, 9).await.unwrap();
    assert_eq!(oldest_kept.last().map(|u| u.origin_id), Some(5));
}
