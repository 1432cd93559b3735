use axum::http::StatusCode;
use models::users::UserType;
use serde_json::{json, Value};

mod support;
use support::{test_app, TestApp};

struct Actors {
    customer_id: String,
    customer: String,
    owner: String,
    admin: String,
    shop_id: String,
}

async fn setup(t: &TestApp) -> anyhow::Result<Actors> {
    let (customer, customer_token) = t.user("cust_book", UserType::Customer);
    let (_, owner_token) = t.user("owner_book", UserType::Owner);
    let (_, admin_token) = t.user("admin_book", UserType::Admin);

    let shop = json!({"name": "Bubble Wash", "address": "Seoul Gangnam-gu 1", "tel": "0212345678"});
    let (status, shop) = t.call("POST", "/laundries", Some(&owner_token), Some(shop)).await?;
    assert_eq!(status, StatusCode::CREATED);

    Ok(Actors {
        customer_id: customer.id.to_string(),
        customer: customer_token,
        owner: owner_token,
        admin: admin_token,
        shop_id: shop["id"].as_str().unwrap_or_default().to_string(),
    })
}

/// Open a wallet for the customer and charge it from a linked account.
async fn fund(t: &TestApp, a: &Actors, amount: i64) -> anyhow::Result<()> {
    let (status, _) = t.call("POST", "/metapay", Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, account) = t
        .call("POST", "/metapay/accounts", Some(&a.customer), Some(json!({"bank_id": 1, "account_number": "3020000012345"})))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["bank_name"], "농협");
    let charge = json!({"pay_account_id": account["id"], "amount": amount});
    let (status, wallet) = t.call("POST", "/metapay/charge", Some(&a.customer), Some(charge)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet["balance"], amount);
    Ok(())
}

fn booking(a: &Actors, method: &str, fee: i64) -> Value {
    json!({
        "user_id": a.customer_id,
        "laundry_id": a.shop_id,
        "memo": "handle with care",
        "method": method,
        "lines": [
            {"clothes_id": 1, "fabric_id": 1, "fee": fee},
            {"clothes_id": 7, "fabric_id": 5, "fee": fee}
        ]
    })
}

async fn balance(t: &TestApp, a: &Actors) -> anyhow::Result<i64> {
    let (_, wallet) = t.call("GET", "/metapay", Some(&a.customer), None).await?;
    Ok(wallet["balance"].as_i64().unwrap_or(-1))
}

#[tokio::test]
async fn metapay_booking_through_completion() -> anyhow::Result<()> {
    let t = test_app();
    let a = setup(&t).await?;
    fund(&t, &a, 30_000).await?;

    let (status, book) = t.call("POST", "/books", Some(&a.customer), Some(booking(&a, "metapay", 10_000))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["book_count"], 2);
    assert_eq!(book["total_fee"], 20_000);
    assert_eq!(book["state"], "pending");
    assert_eq!(book["lines"][1]["clothes_name"], "원피스");
    assert_eq!(balance(&t, &a).await?, 10_000);

    let (status, body) = t.call("POST", "/books", Some(&a.customer), Some(booking(&a, "metapay", 10_000))).await?;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], 2005);
    assert_eq!(balance(&t, &a).await?, 10_000);

    let id = book["id"].as_str().unwrap_or_default().to_string();
    let state_uri = format!("/books/{id}/state");

    let (status, _) = t.call("PUT", &state_uri, Some(&a.customer), Some(json!({"state": "in_progress"}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, moved) = t.call("PUT", &state_uri, Some(&a.owner), Some(json!({"state": "in_progress"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["state"], "in_progress");

    let (status, _) = t.call("PUT", &state_uri, Some(&a.owner), Some(json!({"state": "pending"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, done) = t.call("POST", &format!("/books/{id}/complete"), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["state"], "complete");

    let (status, settlements) = t.call("GET", &format!("/laundries/{}/settlements", a.shop_id), Some(&a.owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlements.as_array().map(|s| s.len()), Some(1));
    assert_eq!(settlements[0]["amount"], 20_000);

    let (status, _) = t.call("GET", &format!("/laundries/{}/settlements", a.shop_id), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn canceling_refunds_metapay() -> anyhow::Result<()> {
    let t = test_app();
    let a = setup(&t).await?;
    fund(&t, &a, 8_000).await?;

    let (status, book) = t.call("POST", "/books", Some(&a.customer), Some(booking(&a, "metapay", 4_000))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(balance(&t, &a).await?, 0);

    let id = book["id"].as_str().unwrap_or_default().to_string();
    let (status, canceled) = t.call("POST", &format!("/books/{id}/cancel"), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["state"], "canceled");
    assert_eq!(balance(&t, &a).await?, 8_000);

    let (status, logs) = t.call("GET", "/metapay/logs", Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = logs.as_array().into_iter().flatten().filter_map(|l| l["kind"].as_str()).collect();
    assert_eq!(kinds, vec!["refund", "payment", "charge"]);

    let (status, _) = t.call("POST", &format!("/books/{id}/cancel"), Some(&a.owner), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn booking_requests_are_checked() -> anyhow::Result<()> {
    let t = test_app();
    let a = setup(&t).await?;

    let (status, _) = t.call("POST", "/books", None, Some(booking(&a, "on_site", 5_000))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut missing = booking(&a, "on_site", 5_000);
    missing["laundry_id"] = Value::Null;
    let (status, body) = t.call("POST", "/books", Some(&a.customer), Some(missing)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2004);

    let mut ghost = booking(&a, "on_site", 5_000);
    ghost["laundry_id"] = json!(uuid::Uuid::new_v4());
    let (status, _) = t.call("POST", "/books", Some(&a.customer), Some(ghost)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t.call("POST", "/books", Some(&a.owner), Some(booking(&a, "on_site", 5_000))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.call("POST", "/books", Some(&a.customer), Some(booking(&a, "metapay", 5_000))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "no wallet opened");
    Ok(())
}

#[tokio::test]
async fn searches_respect_visibility() -> anyhow::Result<()> {
    let t = test_app();
    let a = setup(&t).await?;
    let (status, book) = t.call("POST", "/books", Some(&a.customer), Some(booking(&a, "on_site", 6_000))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = book["id"].as_str().unwrap_or_default().to_string();
    let (_, stranger) = t.user("cust_stranger", UserType::Customer);

    let (status, found) = t.call("GET", &format!("/books/{id}?state=pending"), Some(&a.owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], id.as_str());
    let (status, _) = t.call("GET", &format!("/books/{id}?state=complete"), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = t.call("GET", &format!("/books/{id}?state=pending"), Some(&stranger), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = t.call("GET", &format!("/books/{id}"), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, mine) = t.call("GET", &format!("/users/{}/books?state=pending", a.customer_id), Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(|b| b.len()), Some(1));
    let (status, _) = t.call("GET", &format!("/users/{}/books", a.customer_id), Some(&stranger), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, shop_books) = t.call("GET", &format!("/laundries/{}/books", a.shop_id), Some(&a.owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shop_books.as_array().map(|b| b.len()), Some(1));

    let (status, _) = t.call("GET", "/books", Some(&a.customer), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, all) = t.call("GET", "/books?page=1&per_page=10", Some(&a.admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(|b| b.len()), Some(1));

    let day = book["created_at"].as_str().unwrap_or_default().get(..10).unwrap_or_default().to_string();
    let (status, on_day) = t.call("GET", &format!("/books/date/{day}"), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(on_day.as_array().into_iter().flatten().any(|b| b["id"] == id.as_str()));
    let (status, _) = t.call("GET", "/books/date/yesterday", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, mine) = t.call("GET", "/laundries/mine", Some(&a.owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["id"], a.shop_id.as_str());
    Ok(())
}
