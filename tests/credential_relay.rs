//! Credential relay endpoints against a mocked upstream auth API.

mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        Request, StatusCode,
    },
};
use common::{app, body_bytes, body_json, can_bind_localhost, cipher, send, token_with_roles};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json as match_body, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNUSED_FRONTEND: &str = "http://127.0.0.1:9";

fn post_json(uri: &str, body: &Value, cookie: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

fn set_cookie(response: &axum::http::Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn login_result() -> Value {
    json!({
        "result": {
            "token": "header.payload.sig",
            "user": {"id": 1, "email": "ana@hrms.tld", "roles": ["Employee"]},
            "employee": {"id": 7, "name": "Ana"}
        }
    })
}

#[tokio::test]
async fn login_relays_plaintext_and_sets_session_cookie() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(match_body(json!({"email": "ana@hrms.tld", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_result()))
        .expect(1)
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("hunter2")?;
    let app = app(&format!("{}/v1", upstream.uri()), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/login",
        &json!({"email": "ana@hrms.tld", "password": encrypted}),
        None,
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookie(&response).as_deref(),
        Some("access_token=header.payload.sig; Path=/; Max-Age=604800; SameSite=Lax")
    );
    let body = body_json(response).await?;
    assert_eq!(body["token"], "header.payload.sig");
    assert_eq!(body["user"]["roles"], json!(["Employee"]));
    assert_eq!(body["employee"]["id"], 7);
    Ok(())
}

#[tokio::test]
async fn login_cookie_is_secure_in_production() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_result()))
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("hunter2")?;
    let app = app(&upstream.uri(), UNUSED_FRONTEND, true)?;
    let request = post_json(
        "/api/auth/login",
        &json!({"email": "ana@hrms.tld", "password": encrypted}),
        None,
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_some_and(|cookie| cookie.ends_with("; Secure")));
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_input_without_calling_upstream() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(login_result()))
        .expect(0)
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("hunter2")?;
    let cases = [
        (json!({"email": "ana@hrms.tld", "password": "plaintext"}), "Invalid payload"),
        (json!({"email": "ana@hrms.tld", "password": ""}), "Invalid payload"),
        (json!({"email": "not-an-email", "password": encrypted}), "Invalid email"),
    ];

    for (payload, message) in cases {
        let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
        let response = send(app, post_json("/api/auth/login", &payload, None)?).await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(set_cookie(&response).is_none());
        assert_eq!(body_json(response).await?, json!({"message": message}));
    }

    let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::empty())?;
    let response = send(app, request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_passes_upstream_rejection_through() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(match_body(json!({"email": "ana@hrms.tld", "password": "wrong"})))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(match_body(json!({"email": "ana@hrms.tld", "password": "locked"})))
        .respond_with(ResponseTemplate::new(423).set_body_string("<html>locked</html>"))
        .mount(&upstream)
        .await;

    for (password, status, message) in [
        ("wrong", StatusCode::UNAUTHORIZED, "Invalid credentials"),
        ("locked", StatusCode::LOCKED, "Login failed"),
    ] {
        let encrypted = cipher()?.encrypt(password)?;
        let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
        let request = post_json(
            "/api/auth/login",
            &json!({"email": "ana@hrms.tld", "password": encrypted}),
            None,
        )?;

        let response = send(app, request).await?;

        assert_eq!(response.status(), status);
        assert!(set_cookie(&response).is_none());
        assert_eq!(body_json(response).await?, json!({"message": message}));
    }
    Ok(())
}

#[tokio::test]
async fn login_refuses_incomplete_upstream_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let incomplete = [
        json!({"result": {"user": {"roles": ["Employee"]}}}),
        json!({"result": {"token": "a.b.c", "user": {"roles": []}}}),
        json!({"result": {"token": "a.b.c"}}),
        json!({"token": "a.b.c"}),
    ];

    for reply in incomplete {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .mount(&upstream)
            .await;

        let encrypted = cipher()?.encrypt("hunter2")?;
        let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
        let request = post_json(
            "/api/auth/login",
            &json!({"email": "ana@hrms.tld", "password": encrypted}),
            None,
        )?;

        let response = send(app, request).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
        assert_eq!(
            body_json(response).await?,
            json!({"message": "Authentication failed"})
        );
    }
    Ok(())
}

#[tokio::test]
async fn login_transport_failure_is_internal_error() -> Result<()> {
    let encrypted = cipher()?.encrypt("hunter2")?;
    let app = app("http://127.0.0.1:9", UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/login",
        &json!({"email": "ana@hrms.tld", "password": encrypted}),
        None,
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await?, json!({"message": "Login failed"}));
    Ok(())
}

#[tokio::test]
async fn register_forwards_session_and_relays_reply_verbatim() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;
    let token = token_with_roles(&["Admin"]);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(header(AUTHORIZATION.as_str(), format!("Bearer {token}").as_str()))
        .and(match_body(
            json!({"name": "Bo", "email": "bo@hrms.tld", "password": "s3cret!"}),
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_raw(r#"{"result":{"id":99}}"#, "application/json"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("s3cret!")?;
    let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/register",
        &json!({"name": "Bo", "email": "bo@hrms.tld", "password": encrypted}),
        Some(&format!("access_token={token}")),
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(body_bytes(response).await?, br#"{"result":{"id":99}}"#);
    Ok(())
}

#[tokio::test]
async fn register_relays_upstream_errors_verbatim() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_raw(r#"{"message":"Email already registered"}"#, "application/json"),
        )
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("s3cret!")?;
    let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/register",
        &json!({"name": "Bo", "email": "bo@hrms.tld", "password": encrypted}),
        Some("access_token=a.b.c"),
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_bytes(response).await?,
        br#"{"message":"Email already registered"}"#
    );
    Ok(())
}

#[tokio::test]
async fn register_requires_session_and_decryptable_password() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("s3cret!")?;

    let app_no_session = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/register",
        &json!({"name": "Bo", "email": "bo@hrms.tld", "password": encrypted}),
        None,
    )?;
    let response = send(app_no_session, request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await?, json!({"message": "Unauthorized"}));

    let app_bad_password = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/register",
        &json!({"name": "Bo", "email": "bo@hrms.tld", "password": "plaintext"}),
        Some("access_token=a.b.c"),
    )?;
    let response = send(app_bad_password, request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await?,
        json!({"message": "Invalid payload"})
    );
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_cookie() -> Result<()> {
    let app = app("http://127.0.0.1:9", UNUSED_FRONTEND, false)?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(COOKIE, "access_token=a.b.c")
        .body(Body::empty())?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        set_cookie(&response).as_deref(),
        Some("access_token=; Path=/; Max-Age=0; SameSite=Lax")
    );
    Ok(())
}

#[tokio::test]
async fn session_reports_roles_from_cookie() -> Result<()> {
    let session = |cookie: Option<String>| -> Result<Request<Body>> {
        let mut builder = Request::builder().method("GET").uri("/api/auth/session");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        Ok(builder.body(Body::empty())?)
    };

    let app_anonymous = app("http://127.0.0.1:9", UNUSED_FRONTEND, false)?;
    let response = send(app_anonymous, session(None)?).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let token = token_with_roles(&["Employee", "Admin"]);
    let app_admin = app("http://127.0.0.1:9", UNUSED_FRONTEND, false)?;
    let response = send(app_admin, session(Some(format!("access_token={token}")))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await?,
        json!({"roles": ["Employee", "Admin"]})
    );
    Ok(())
}

#[tokio::test]
async fn login_refuses_token_that_is_not_a_cookie_value() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "token": "abc; Domain=evil.example; Max-Age=99999999",
                "user": {"id": 1, "roles": ["Employee"]},
                "employee": null
            }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let encrypted = cipher()?.encrypt("hunter2")?;
    let app = app(&upstream.uri(), UNUSED_FRONTEND, false)?;
    let request = post_json(
        "/api/auth/login",
        &json!({"email": "ana@hrms.tld", "password": encrypted}),
        None,
    )?;

    let response = send(app, request).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());
    assert_eq!(
        body_json(response).await?,
        json!({"message": "Authentication failed"})
    );
    Ok(())
}
