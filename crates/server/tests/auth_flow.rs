use axum::body::Body;
use axum::http::{Request, StatusCode};
use models::users::UserType;
use serde_json::json;
use tower::ServiceExt;

mod support;
use support::test_app;

#[tokio::test]
async fn health_and_catalog_are_public() -> anyhow::Result<()> {
    let t = test_app();
    let (status, body) = t.call("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = t.call("GET", "/catalog", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clothes"].as_array().map(|a| a.len()), Some(20));
    assert_eq!(body["banks"][0]["name"], "농협");
    Ok(())
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let t = test_app();
    let register = json!({"login_id": "kim_01", "name": "Kim", "phone": "01012345678", "password": "S3curePass!"});

    let (status, user) = t.call("POST", "/auth/register", None, Some(register.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["user_type"], "customer");
    let user_id = user["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = t.call("POST", "/auth/register", None, Some(register)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1002);

    // Login must set the cookie and return the token
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"login_id": "kim_01", "password": "S3curePass!"}))?))?;
    let resp = t.app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(cookie.starts_with("auth_token="));
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let session: serde_json::Value = serde_json::from_slice(&bytes)?;
    let token = session["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let (status, me) = t.call("GET", &format!("/users/{user_id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["login_id"], "kim_01");

    // Cookie works as a fallback for the Authorization header
    let cookie_pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().uri(format!("/users/{user_id}")).header("cookie", cookie_pair).body(Body::empty())?;
    assert_eq!(t.app.clone().oneshot(req).await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_and_tokens_are_rejected() -> anyhow::Result<()> {
    let t = test_app();
    let register = json!({"login_id": "owner_01", "name": "Lee", "phone": "01099998888", "password": "Passw0rd!", "user_type": "owner"});
    let (status, user) = t.call("POST", "/auth/register", None, Some(register)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/users/{}", user["id"].as_str().unwrap_or_default());

    let (status, _) = t.call("POST", "/auth/login", None, Some(json!({"login_id": "owner_01", "password": "nope-nope"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t.call("GET", &uri, None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2001);

    let (status, _) = t.call("GET", &uri, Some("not.a.jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder().uri(&uri).header("authorization", "Basic abc").body(Body::empty())?;
    assert_eq!(t.app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);

    let admin = json!({"login_id": "wannabe", "name": "X", "phone": "01011112222", "password": "Passw0rd!", "user_type": "admin"});
    let (status, _) = t.call("POST", "/auth/register", None, Some(admin)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn user_listing_is_admin_only() -> anyhow::Result<()> {
    let t = test_app();
    let (_, customer) = t.user("cust_list", UserType::Customer);
    t.user("owner_list", UserType::Owner);
    let admin = t.state.auth.ensure_admin("root_admin", "AdminPass1").await?;
    let admin_token = t.state.auth.issue_token(&admin)?;

    let (status, _) = t.call("GET", "/users", Some(&customer), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, owners) = t.call("GET", "/users?user_type=owner", Some(&admin_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owners.as_array().map(|a| a.len()), Some(1));
    assert_eq!(owners[0]["login_id"], "owner_list");
    Ok(())
}

#[tokio::test]
async fn profile_update_goes_through_validation() -> anyhow::Result<()> {
    let t = test_app();
    let (user, token) = t.user("cust_prof", UserType::Customer);
    let uri = format!("/users/{}", user.id);

    let (status, body) = t.call("PUT", &uri, Some(&token), Some(json!({"phone": "01055554444"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "01055554444");

    let (status, _) = t.call("PUT", &uri, Some(&token), Some(json!({"phone": "555"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, other) = t.user("cust_other", UserType::Customer);
    let (status, _) = t.call("PUT", &uri, Some(&other), Some(json!({"name": "Hijack"}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
