//! Full user lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP. Validates that request building, the transport
//! and response parsing work end-to-end with the actual server.

use tokio::net::TcpListener;
use user_client::{generator, Config, UserClient, UserError, UserFormData, UserPatch};

async fn start_mock_server() -> UserClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    UserClient::from_config(&Config::default().with_base_url(&format!("http://{addr}"))).unwrap()
}

#[tokio::test]
async fn crud_lifecycle() {
    let client = start_mock_server().await;

    // Step 1: list: should be empty; no random user yet.
    let users = client.get_users().await.unwrap();
    assert!(users.is_empty(), "expected empty list");
    let err = client.get_random_user().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch user");
    assert_eq!(err.status(), Some(404));

    // Step 2: create a user.
    let form = UserFormData {
        name: "A".to_string(),
        biography: "B".to_string(),
    };
    let created = client.create_user(&form.into()).await.unwrap();
    assert_eq!(created.name, "A");
    assert_eq!(created.biography, "B");
    let id = created.id.clone();

    // Step 3: the only stored user is the random one.
    let random = client.get_random_user().await.unwrap();
    assert_eq!(random, created);

    // Step 4: partial update of the name.
    let updated = client.update_user(&id, &UserPatch::name("C")).await.unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "C");
    assert_eq!(updated.biography, "B");
    assert_eq!(updated.created_at, created.created_at);

    // Step 5: list: one user, reflecting the update.
    let users = client.get_users().await.unwrap();
    assert_eq!(users, vec![updated]);

    // Step 6: delete.
    client.delete_user(&id).await.unwrap();

    // Step 7: delete again and update after delete: both 404.
    let err = client.delete_user(&id).await.unwrap_err();
    assert!(matches!(err, UserError::DeleteFailed(_)));
    assert_eq!(err.status(), Some(404));
    let err = client.update_user(&id, &UserPatch::name("D")).await.unwrap_err();
    assert!(matches!(err, UserError::UpdateFailed(_)));
    assert_eq!(err.transport().unwrap().message, "user not found");

    // Step 8: list: should be empty again.
    let users = client.get_users().await.unwrap();
    assert!(users.is_empty(), "expected empty list after delete");
}

#[tokio::test]
async fn create_rejected_by_backend_validation() {
    let client = start_mock_server().await;

    let err = client.create_user(&UserPatch::biography("no name")).await.unwrap_err();
    assert!(matches!(err, UserError::CreateFailed(_)));
    let cause = err.transport().unwrap();
    assert_eq!(cause.status, Some(400));
    assert_eq!(cause.message, "name is required");
    assert_eq!(cause.data, Some(serde_json::json!({"error": "name is required"})));
}

#[tokio::test]
async fn id_with_query_or_slash_does_not_reach_another_resource() {
    let client = start_mock_server().await;
    let created = client.create_user(&UserPatch::name("Kept")).await.unwrap();

    let err = client.delete_user(&format!("{}?force=1", created.id)).await.unwrap_err();
    assert!(matches!(err, UserError::DeleteFailed(_)));
    assert_eq!(err.status(), Some(404));

    let err = client
        .update_user(&format!("team/{}", created.id), &UserPatch::name("Moved"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::UpdateFailed(_)));
    assert_eq!(err.status(), Some(404));

    assert_eq!(client.get_users().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn get_id_returns_fresh_ids() {
    let client = start_mock_server().await;

    let first = client.get_id().await.unwrap();
    let second = client.get_id().await.unwrap();
    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn generated_users_round_trip() {
    let client = start_mock_server().await;

    for _ in 0..5 {
        let form = generator::generate();
        let created = client.create_user(&UserPatch::from(&form)).await.unwrap();
        assert_eq!(created.name, form.name);
        assert_eq!(created.biography, form.biography);
    }
    assert_eq!(client.get_users().await.unwrap().len(), 5);
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let client = start_mock_server().await;

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.create_user(&UserPatch::name(format!("user-{i}"))).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(client.get_users().await.unwrap().len(), 8);
}
