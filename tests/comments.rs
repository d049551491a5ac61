mod common;

use actix_web::http::{Method, StatusCode};
use boardforge::models::CommentResponse;
use common::{call, cleanup_users, create_board, create_task, init_app, register, test_pool};
use serde_json::json;

#[actix_rt::test]
async fn test_comment_flow() {
    let Some(pool) = test_pool().await else { return };
    let app = init_app(&pool).await;

    let owner = register(&app, "comment-owner", "Cora Owner").await;
    let member = register(&app, "comment-member", "Mina Member").await;
    let outsider = register(&app, "comment-outsider", "Oz Outsider").await;
    let board_id = create_board(&app, &owner, "Discussion", &[member.id]).await;
    let task = create_task(&app, &owner, json!({ "board": board_id, "title": "Pick a name" })).await;
    let comments_uri = format!("/api/tasks/{}/comments/", task["id"]);

    let (status, first) = call(
        &app,
        Method::POST,
        &comments_uri,
        Some(member.token.as_str()),
        Some(json!({ "content": "How about Atlas?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    let first: CommentResponse = serde_json::from_value(first).unwrap();
    assert_eq!(first.author, "Mina Member");
    assert_eq!(first.content, "How about Atlas?");

    let (status, second) = call(
        &app,
        Method::POST,
        &comments_uri,
        Some(owner.token.as_str()),
        Some(json!({ "content": "Taken, sadly." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let second: CommentResponse = serde_json::from_value(second).unwrap();

    // Oldest first
    let (status, listed) = call(&app, Method::GET, &comments_uri, Some(owner.token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<CommentResponse> = serde_json::from_value(listed).unwrap();
    pretty_assertions::assert_eq!(listed, vec![first.clone(), second.clone()]);

    // The task reports its comment count.
    let (_, task_now) = call(
        &app,
        Method::GET,
        &format!("/api/tasks/{}/", task["id"]),
        Some(owner.token.as_str()),
        None,
    )
    .await;
    assert_eq!(task_now["comments_count"], 2);

    // Empty content is rejected.
    let (status, _) = call(
        &app,
        Method::POST,
        &comments_uri,
        Some(member.token.as_str()),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Outsiders can neither read nor write.
    let (status, _) = call(&app, Method::GET, &comments_uri, Some(outsider.token.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(
        &app,
        Method::POST,
        &comments_uri,
        Some(outsider.token.as_str()),
        Some(json!({ "content": "Drive-by" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the author deletes; the board owner is not enough.
    let first_uri = format!("{}{}/", comments_uri, first.id);
    let (status, _) = call(&app, Method::DELETE, &first_uri, Some(owner.token.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::DELETE, &first_uri, Some(member.token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::DELETE, &first_uri, Some(member.token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = call(&app, Method::GET, &comments_uri, Some(owner.token.as_str()), None).await;
    let listed: Vec<CommentResponse> = serde_json::from_value(listed).unwrap();
    assert_eq!(listed, vec![second]);

    cleanup_users(&pool, &[&owner, &member, &outsider]).await;
}

#[actix_rt::test]
async fn test_comment_must_belong_to_task_in_path() {
    let Some(pool) = test_pool().await else { return };
    let app = init_app(&pool).await;

    let owner = register(&app, "path-owner", "Pat Owner").await;
    let board_id = create_board(&app, &owner, "Paths", &[]).await;
    let task_a = create_task(&app, &owner, json!({ "board": board_id, "title": "A" })).await;
    let task_b = create_task(&app, &owner, json!({ "board": board_id, "title": "B" })).await;

    let (status, comment) = call(
        &app,
        Method::POST,
        &format!("/api/tasks/{}/comments/", task_a["id"]),
        Some(owner.token.as_str()),
        Some(json!({ "content": "On A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let wrong_uri = format!("/api/tasks/{}/comments/{}/", task_b["id"], comment["id"]);
    let (status, _) = call(&app, Method::DELETE, &wrong_uri, Some(owner.token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::GET,
        "/api/tasks/999999999/comments/",
        Some(owner.token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting the task removes its comments with it.
    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{}/", task_a["id"]),
        Some(owner.token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE id = $1")
        .bind(comment["id"].as_i64().unwrap() as i32)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    cleanup_users(&pool, &[&owner]).await;
}
