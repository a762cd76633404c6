use autosite_social::CrossPost;
use autosite_sync::{Credential, CrossPostOutcome, CrossPoster};
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn twitter(base: &str) -> Credential {
    Credential {
        network: "twitter".into(),
        consumer_key: "ck".into(),
        consumer_secret: "cs".into(),
        token: "twitter-token".into(),
        secret: "ts".into(),
        api_base: Some(base.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn posts_oldest_first_and_continues_past_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .and(body_string_contains("status=second"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "errors": [{ "code": 131, "message": "Internal error" }] })),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id_str": "77", "text": "ok" })))
        .expect(2)
        .mount(&server)
        .await;

    let poster = CrossPoster::new(&twitter(&server.uri()), Utc::now()).unwrap();
    // Newest first, as the fetchers hand them over.
    let candidates = [
        CrossPost::new("third", None),
        CrossPost::new("second", None),
        CrossPost::new("first", Some("https://example.org/1".into())),
    ];
    let outcomes = poster.post_all(&candidates).await;

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        &outcomes[0],
        CrossPostOutcome::Posted { status, id } if status == "first https://example.org/1" && id == "77"
    ));
    assert!(matches!(
        &outcomes[1],
        CrossPostOutcome::Failed { status, error } if status == "second" && error.contains("Internal error")
    ));
    assert!(matches!(&outcomes[2], CrossPostOutcome::Posted { status, .. } if status == "third"));

    let bodies: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect();
    assert_eq!(bodies.len(), 3);
    assert!(bodies[0].starts_with("status=first"));
    assert!(bodies[1].starts_with("status=second"));
    assert!(bodies[2].starts_with("status=third"));
}
