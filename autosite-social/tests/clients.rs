use autosite_http::{HttpError, OAuth1Credentials};
use autosite_social::github::GithubApi;
use autosite_social::linkedin::LinkedinApi;
use autosite_social::twitter::TwitterApi;
use autosite_social::xing::XingApi;
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn creds() -> OAuth1Credentials {
    OAuth1Credentials {
        consumer_key: "ck".into(),
        consumer_secret: "cs".into(),
        token: "tok".into(),
        token_secret: "ts".into(),
    }
}

#[tokio::test]
async fn twitter_timeline_passes_since_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .and(query_param("since_id", "500"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id_str": "501",
            "text": "hi",
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "source": "web",
            "user": { "screen_name": "alice" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = TwitterApi::new(&server.uri(), creds()).unwrap();
    let tweets = api.user_timeline(Some(500)).await.unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].id_str, "501");
}

#[tokio::test]
async fn twitter_update_posts_status_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .and(body_string_contains("status=I%20shared%20a%20link"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id_str": "9", "text": "I shared a link" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = TwitterApi::new(&server.uri(), creds()).unwrap();
    let posted = api.update_status("I shared a link").await.unwrap();
    assert_eq!(posted.id_str, "9");
}

#[tokio::test]
async fn github_sends_if_modified_since_and_maps_304() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .and(|req: &Request| {
            req.headers
                .get("if-modified-since")
                .is_some_and(|v| v.as_bytes() == b"Tue, 05 Mar 2024 07:08:09 GMT")
        })
        .and(header("authorization", "Bearer gh-token"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let api = GithubApi::new(&server.uri(), "gh-token".into()).unwrap();
    let since = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
    let err = api.user_events("octo", Some(since)).await.unwrap_err();
    assert!(matches!(err, HttpError::NotModified));
}

#[tokio::test]
async fn github_keeps_valid_events_beside_malformed_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "7",
                "type": "WatchEvent",
                "created_at": "2024-05-01T10:00:00Z",
                "repo": { "name": "rust-lang/rust" },
                "payload": { "action": "started" }
            },
            { "id": "8", "type": "WatchEvent", "created_at": null, "repo": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = GithubApi::new(&server.uri(), "gh-token".into()).unwrap();
    let events = api.user_events("octo", None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "7");
}

#[tokio::test]
async fn github_resolves_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octo" })))
        .mount(&server)
        .await;

    let api = GithubApi::new(&server.uri(), "gh-token".into()).unwrap();
    assert_eq!(api.authenticated_user(None).await.unwrap().login, "octo");
}

#[tokio::test]
async fn linkedin_uses_query_token_and_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/~/network/updates"))
        .and(query_param("type", "SHAR"))
        .and(query_param("scope", "self"))
        .and(query_param("format", "json"))
        .and(query_param("after", "1001"))
        .and(query_param("oauth2_access_token", "li-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_total": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let api = LinkedinApi::new(&server.uri(), "li-token".into()).unwrap();
    let updates = api.own_shares(Some(1001)).await.unwrap();
    assert_eq!(updates.total, 0);
    assert!(updates.values.is_empty());
}

#[tokio::test]
async fn xing_feed_survives_a_malformed_activity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network_activities": [{
                "ids": ["a", "b"],
                "objects": [
                    {
                        "verb": "post",
                        "created_at": "2024-05-01T10:00:00Z",
                        "creator": { "display_name": "Max", "permalink": "https://www.xing.com/profile/Max" },
                        "objects": [{ "type": "status", "content": "Hallo" }]
                    },
                    { "verb": "comment", "creator": null }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = XingApi::new(&server.uri(), "x-token".into()).unwrap();
    let feed = api.feed(None).await.unwrap();
    let activities: Vec<_> = feed
        .network_activities
        .into_iter()
        .flat_map(|group| group.activities())
        .collect();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].creator.display_name, "Max");
}

#[tokio::test]
async fn xing_passes_since_as_iso_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/feed"))
        .and(query_param("since", "2024-05-01T10:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "network_activities": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let api = XingApi::new(&server.uri(), "x-token".into()).unwrap();
    let since = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let feed = api.feed(Some(since)).await.unwrap();
    assert!(feed.network_activities.is_empty());
}
