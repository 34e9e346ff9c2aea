use fbgraph_http::{
    GraphError, HttpDefaults, Params, RequestDispatcher, RequestOptions, UploadableParameter, Verb,
};
use httpmock::prelude::*;

fn dispatcher_for(server: &MockServer) -> RequestDispatcher {
    RequestDispatcher::new(
        HttpDefaults::default()
            .with_graph_server("127.0.0.1")
            .with_port(server.port()),
    )
}

#[tokio::test]
async fn get_sends_parameters_as_query_string() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/me")
                .query_param("fields", "id,name")
                .query_param("limit", "5");
            then.status(200)
                .header("x-fb-debug", "abc")
                .body(r#"{"id":"4","name":"Mark"}"#);
        })
        .await;

    let params = Params::new().with("fields", "id,name").with("limit", 5);
    let response = dispatcher_for(&server)
        .execute("me", params, Verb::Get, &RequestOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), r#"{"id":"4","name":"Mark"}"#);
    assert_eq!(response.header("x-fb-debug"), Some("abc"));
}

#[tokio::test]
async fn post_sends_form_encoded_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/me/feed")
                .body("message=hello+world&privacy=%7B%22value%22%3A%22SELF%22%7D");
            then.status(200).body(r#"{"id":"4_1"}"#);
        })
        .await;

    let params = Params::new()
        .with("message", "hello world")
        .with("privacy", serde_json::json!({"value": "SELF"}));
    let response = dispatcher_for(&server)
        .execute("/me/feed", params, Verb::Post, &RequestOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.body(), r#"{"id":"4_1"}"#);
}

#[tokio::test]
async fn custom_verb_is_tunnelled_through_post() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/4_1").body("method=delete");
            then.status(200).body("true");
        })
        .await;

    let response = dispatcher_for(&server)
        .execute_str("4_1", Params::new(), "delete", &RequestOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.body(), "true");
}

#[tokio::test]
async fn uploads_switch_to_multipart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/me/photos")
                .body_contains("name=\"message\"")
                .body_contains("name=\"source\"; filename=\"pixel.png\"")
                .body_contains("image/png")
                .body_contains("PNGDATA");
            then.status(200).body(r#"{"id":"99"}"#);
        })
        .await;

    let upload = UploadableParameter::from_bytes(b"PNGDATA".to_vec(), "image/png")
        .with_filename("pixel.png");
    let params = Params::new().with("message", "caption").with("source", upload);
    let response = dispatcher_for(&server)
        .execute("/me/photos", params, Verb::Post, &RequestOptions::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn error_statuses_are_returned_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(500)
                .body(r#"{"error":{"type":"OAuthException","message":"nope"}}"#);
        })
        .await;

    let response = dispatcher_for(&server)
        .execute("/missing", Params::new(), Verb::Get, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    assert!(response.body().contains("OAuthException"));
}

#[tokio::test]
async fn body_bytes_are_returned_as_received() {
    let server = MockServer::start_async().await;
    let raw: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0xff, 0x00];
    let payload = raw.clone();
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/picture");
            then.status(200).body(payload.clone());
        })
        .await;

    let response = dispatcher_for(&server)
        .execute("/picture", Params::new(), Verb::Get, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.body_bytes(), raw.as_slice());
}

#[tokio::test]
async fn rest_api_option_selects_rest_host() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/method/fql.query");
            then.status(200).body("[]");
        })
        .await;

    let dispatcher = RequestDispatcher::new(
        HttpDefaults::default()
            .with_graph_server("graph.invalid")
            .with_rest_server("127.0.0.1")
            .with_port(server.port()),
    );
    let response = dispatcher
        .execute(
            "/method/fql.query",
            Params::new().with("query", "select uid from user"),
            Verb::Post,
            &RequestOptions::new().rest_api(true),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.body(), "[]");
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dispatcher = RequestDispatcher::new(
        HttpDefaults::default()
            .with_graph_server("127.0.0.1")
            .with_port(port),
    );

    let err = dispatcher
        .execute("/me", Params::new(), Verb::Get, &RequestOptions::new().timeout(5))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Transport(_)));
}

#[tokio::test]
async fn dispatcher_is_shareable_across_tasks() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/me");
            then.status(200).body("{}");
        })
        .await;

    let dispatcher = dispatcher_for(&server);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .execute("/me", Params::new(), Verb::Get, &RequestOptions::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().status(), 200);
    }
    mock.assert_hits_async(4).await;
}
