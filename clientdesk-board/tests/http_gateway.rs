//! HttpGateway against a mock REST server

use clientdesk_board::{
    GatewayError, HttpGateway, HttpGatewayConfig, Lane, MoveCommit, PersistenceGateway, TaskSource,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn gateway(server: &Server) -> HttpGateway {
    let config = HttpGatewayConfig::new(server.url()).with_timeout(Duration::from_secs(2));
    HttpGateway::new(&config).unwrap()
}

#[tokio::test]
async fn test_commit_posts_triple() {
    let mut server = Server::new_async().await;
    let body = json!({"taskId": "T1", "lane": "todo", "rank": 0});
    let mock = server
        .mock("POST", "/tasks/T1/move")
        .match_body(Matcher::Json(body))
        .with_status(204)
        .create_async()
        .await;

    gateway(&server)
        .commit_move(&MoveCommit::new("T1", Lane::Todo, 0))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_conflict() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/T1/move")
        .with_status(409)
        .with_body("rank is stale")
        .create_async()
        .await;

    let err = gateway(&server)
        .commit_move(&MoveCommit::new("T1", Lane::Todo, 0))
        .await
        .unwrap_err();

    match err {
        GatewayError::Conflict { task_id, message } => {
            assert_eq!(task_id.as_str(), "T1");
            assert!(message.contains("rank is stale"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_network() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tasks/T1/move")
        .with_status(503)
        .create_async()
        .await;

    let err = gateway(&server)
        .commit_move(&MoveCommit::new("T1", Lane::Todo, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Network { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network() {
    let gateway = HttpGateway::new(
        &HttpGatewayConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = gateway
        .commit_move(&MoveCommit::new("T1", Lane::Todo, 0))
        .await
        .unwrap_err();
    assert!(!err.is_conflict());
}

#[tokio::test]
async fn test_fetch_tasks_accepts_host_field_names() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "T1", "title": "Draft contract", "status": "backlog", "order": 0},
                {"id": "T2", "title": "Send invoice", "status": "in_review", "order": 3}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let tasks = gateway(&server).fetch_tasks().await.unwrap();
    mock.assert_async().await;

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].lane, Lane::InReview);
    assert_eq!(tasks[1].rank, 3);
}

#[tokio::test]
async fn test_fetch_failure_is_network() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tasks")
        .with_status(500)
        .create_async()
        .await;

    let err = gateway(&server).fetch_tasks().await.unwrap_err();
    assert!(matches!(err, GatewayError::Network { .. }));
}
