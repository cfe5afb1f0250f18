use super::common::{
    client, closed_addr, inject_mode, start_proxy, start_raw_upstream, CannedResponse,
    MockUpstream, CLIENT_ID, PROXY_KEY, SLOW_DELAY,
};
use hf_api_proxy::config::AuthMode;
use reqwest::{Method, StatusCode};
use std::time::{Duration, Instant};

#[test_log::test(tokio::test)]
async fn test_get_is_forwarded_to_base_plus_path_without_body() {
    let upstream = MockUpstream::start(CannedResponse::new(200, r#"{"tid":123}"#)).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    let response = client()
        .get(format!("{}/threads/123", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), r#"{"tid":123}"#);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].uri, "/api/v2/threads/123");
    assert!(requests[0].body.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_query_string_is_passed_through_unchanged() {
    let upstream = MockUpstream::start(CannedResponse::new(200, "[]")).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    client()
        .get(format!("{}/search?q=a%20b&page=2&sort=", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    let requests = upstream.requests();
    assert_eq!(requests[0].uri, "/api/v2/search?q=a%20b&page=2&sort=");
}

#[test_log::test(tokio::test)]
async fn test_post_body_is_forwarded_verbatim() {
    let upstream = MockUpstream::start(CannedResponse::new(201, r#"{"id":1}"#)).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    let response = client()
        .post(format!("{}/threads", proxy))
        .header("X-API-Key", PROXY_KEY)
        .body(r#"{"title":"x"}"#)
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), StatusCode::CREATED);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].uri, "/api/v2/threads");
    assert_eq!(&requests[0].body[..], br#"{"title":"x"}"#);
}

#[test_log::test(tokio::test)]
async fn test_inject_mode_replaces_caller_headers() {
    let upstream = MockUpstream::start(CannedResponse::new(200, "{}")).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    client()
        .post(format!("{}/threads", proxy))
        .header("X-API-Key", PROXY_KEY)
        .header("Authorization", "Bearer caller-token")
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body("hello")
        .send()
        .await
        .expect("Proxy unreachable");

    let headers = &upstream.requests()[0].headers;
    assert_eq!(headers["authorization"], format!("Bearer {}", CLIENT_ID).as_str());
    assert_eq!(headers["content-type"], "application/json");
    assert!(headers.get("x-custom").is_none());
    assert!(headers.get("x-api-key").is_none());
}

#[test_log::test(tokio::test)]
async fn test_passthrough_mode_forwards_caller_credentials() {
    let upstream = MockUpstream::start(CannedResponse::new(200, "{}")).await;
    let proxy = start_proxy(&upstream.base_url(), AuthMode::Passthrough).await;
    let client = client();

    client
        .post(format!("{}/threads", proxy))
        .header("X-API-Key", PROXY_KEY)
        .header("Authorization", "Bearer caller-token")
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body("hello")
        .send()
        .await
        .expect("Proxy unreachable");

    client
        .get(format!("{}/me", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0].headers;
    assert_eq!(first["authorization"], "Bearer caller-token");
    assert_eq!(first["content-type"], "text/plain");
    assert!(first.get("x-custom").is_none());
    assert!(first.get("x-api-key").is_none());

    let second = &requests[1].headers;
    assert!(second.get("authorization").is_none());
    assert_eq!(second["content-type"], "application/json");
}

#[test_log::test(tokio::test)]
async fn test_response_is_relayed_without_hop_by_hop_headers() {
    let upstream = start_raw_upstream(
        "HTTP/1.1 201 Created\r\n\
         X-Foo: bar\r\n\
         Content-Type: application/json\r\n\
         Transfer-Encoding: chunked\r\n\
         Connection: close\r\n\
         \r\n\
         8\r\n{\"id\":1}\r\n0\r\n\r\n",
    )
    .await;
    let proxy = start_proxy(&format!("http://{}", upstream), inject_mode()).await;

    let response = client()
        .get(format!("{}/threads/1", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-foo"], "bar");
    assert!(response.headers().get("transfer-encoding").is_none());
    assert_eq!(response.text().await.unwrap(), r#"{"id":1}"#);
}

#[test_log::test(tokio::test)]
async fn test_repeated_upstream_headers_are_all_relayed() {
    let upstream = MockUpstream::start(
        CannedResponse::new(200, "{}")
            .with_header("set-cookie", "a=1")
            .with_header("set-cookie", "b=2"),
    )
    .await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    let response = client()
        .get(format!("{}/me", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    let cookies: Vec<_> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, vec!["a=1", "b=2"]);
}

#[test_log::test(tokio::test)]
async fn test_upstream_error_status_is_relayed_verbatim() {
    let upstream = MockUpstream::start(CannedResponse::new(404, r#"{"error":"not found"}"#)).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;

    let response = client()
        .get(format!("{}/threads/999", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), r#"{"error":"not found"}"#);
}

#[test_log::test(tokio::test)]
async fn test_connection_refused_becomes_bad_gateway() {
    let dead = closed_addr().await;
    let proxy = start_proxy(&format!("http://{}", dead), inject_mode()).await;

    let response = client()
        .get(format!("{}/threads/123", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.text().await.unwrap(), r#"{"error": "Bad Gateway"}"#);
}

#[test_log::test(tokio::test)]
async fn test_repeated_get_yields_identical_responses() {
    let upstream = MockUpstream::start(
        CannedResponse::new(200, r#"{"uid":1}"#).with_header("x-foo", "bar"),
    )
    .await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;
    let client = client();

    let mut seen = Vec::new();
    for _ in 0..2 {
        let response = client
            .get(format!("{}/me", proxy))
            .header("X-API-Key", PROXY_KEY)
            .send()
            .await
            .expect("Proxy unreachable");
        let status = response.status();
        let content_type = response.headers()["content-type"].clone();
        let foo = response.headers()["x-foo"].clone();
        let body = response.text().await.unwrap();
        seen.push((status, content_type, foo, body));
    }

    assert_eq!(seen[0], seen[1]);
    assert_eq!(upstream.requests().len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_slow_upstream_does_not_block_other_requests() {
    let upstream = MockUpstream::start(CannedResponse::new(200, "{}")).await;
    let proxy = start_proxy(&upstream.base_url(), inject_mode()).await;
    let client = client();

    let slow = {
        let client = client.clone();
        let url = format!("{}/threads/slow", proxy);
        tokio::spawn(async move {
            client
                .get(url)
                .header("X-API-Key", PROXY_KEY)
                .send()
                .await
                .map(|r| r.status())
        })
    };

    // Let the slow request reach the upstream first.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    let fast = client
        .get(format!("{}/threads/fast", proxy))
        .header("X-API-Key", PROXY_KEY)
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(fast.status(), StatusCode::OK);
    assert!(started.elapsed() < SLOW_DELAY);

    assert_eq!(slow.await.unwrap().unwrap(), StatusCode::OK);
}
