use crate::e2e::{EOA, Environment, GWEI, MockChain, WALLET, usdc};
use alloy::primitives::Bytes;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use route_finder::types::Action;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn environment() -> Environment {
    Environment::setup(vec![
        MockChain::legacy(10, 2 * GWEI).with_balance(50),
        MockChain::legacy(137, GWEI).with_balance(60),
        MockChain::legacy(42161, GWEI),
    ])
}

#[tokio::test]
async fn health() {
    let env = environment();
    let response = env.router(None).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(to_bytes(response.into_body(), usize::MAX).await.unwrap().as_ref(), b"OK");
}

#[tokio::test]
async fn sourcing_routes() {
    let env = environment();
    let (status, body) = send(
        env.router(None),
        get(&format!("/estimate-sourcing-routes/42161/USDC?eoaAddress={EOA}&amount=100")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["chainId"], 137);
    assert_eq!(entries[0]["chainName"], "Chain 137");
    assert_eq!(entries[0]["amountSourced"], "50");
    assert_eq!(entries[1]["chainId"], 10);
    assert!(entries[0]["feeAmount"].is_string());
}

#[tokio::test]
async fn route_prefix() {
    let env = environment();
    let uri =
        format!("/route-finder/estimate-sourcing-routes/42161/USDC?eoaAddress={EOA}&amount=1");
    let (status, _) = send(env.router(Some("/route-finder/")), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(env.router(Some("/route-finder/")), get("/health")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_query() {
    let env = environment();
    let (status, body) = send(
        env.router(None),
        get("/estimate-sourcing-routes/56/DAI?eoaAddress=0x12&amount=-1&index=x"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["errors"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn insufficient_balance() {
    let env = environment();
    let (status, body) = send(
        env.router(None),
        get(&format!("/estimate-sourcing-routes/42161/USDC?eoaAddress={EOA}&amount=1000")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
    assert!(body["message"].as_str().unwrap().contains("insufficient"));
}

#[tokio::test]
async fn fees_with_actions() {
    let env = environment();
    let actions = Action::sourcing_transfer(usdc(137), EOA);
    let (status, body) = send(
        env.router(None),
        post(
            "/estimate-fees-with-actions",
            json!({
                "actions": actions,
                "chainId": 137,
                "eoaAddress": EOA,
                "avocadoAddress": WALLET,
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chainId"], 137);
    assert_eq!(body["feeMultiplierBps"], 15_750);
    assert!(body["feeAmount"].as_str().unwrap().parse::<u128>().unwrap() > 0);
}

#[tokio::test]
async fn fees_with_actions_soft_failure() {
    let env = Environment::setup(vec![MockChain {
        simulation: None,
        ..MockChain::legacy(137, GWEI)
    }]);
    let (status, body) = send(
        env.router(None),
        post(
            "/estimate-fees-with-actions",
            json!({ "actions": [], "chainId": 137, "eoaAddress": EOA, "avocadoWalletIndex": "0" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn fees_with_actions_hard_failure() {
    let env = Environment::setup(vec![MockChain {
        required_signers: None,
        code: Bytes::from_static(&[0x60, 0x80]),
        ..MockChain::legacy(137, GWEI)
    }]);
    let body =
        json!({ "actions": [], "chainId": 137, "eoaAddress": EOA, "avocadoAddress": WALLET });

    // repeated requests keep failing instead of pricing a single signer
    for _ in 0..2 {
        let (status, response) =
            send(env.router(None), post("/estimate-fees-with-actions", body.clone())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["status"], "failure");
    }
}

#[tokio::test]
async fn fees_with_actions_validation() {
    let env = environment();
    let (status, body) = send(
        env.router(None),
        post(
            "/estimate-fees-with-actions",
            json!({ "actions": [], "chainId": 56, "eoaAddress": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let (status, body) =
        send(env.router(None), post("/estimate-fees-with-actions", json!({ "chainId": 137 })))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
}
