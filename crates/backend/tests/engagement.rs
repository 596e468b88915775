use std::sync::Arc;

use backend::domain::{category, content, engagement, follow};
use backend::shared::data::db::create_schema;
use backend::system::users;
use contracts::domain::category::CategoryDto;
use contracts::domain::content::{ContentDto, PublishAction, PublishState};
use contracts::error::EngagementError;
use contracts::system::auth::{Principal, Role};
use contracts::system::users::CreateUserDto;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

async fn test_db() -> DatabaseConnection {
    // Single connection so every statement sees the same in-memory database.
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);
    let conn = Database::connect(opts).await.expect("connect sqlite");
    create_schema(&conn).await.expect("schema bootstrap");
    conn
}

async fn make_principal(db: &DatabaseConnection, username: &str, role: Role) -> Principal {
    let id = users::service::create(
        db,
        CreateUserDto {
            username: username.to_string(),
            password: "password123".to_string(),
            name: username.to_string(),
            email: None,
            image: None,
            role,
        },
    )
    .await
    .expect("create user");
    let user = users::repository::get_by_id(db, &id)
        .await
        .expect("load user")
        .expect("user exists");
    users::service::to_principal(&user)
}

async fn make_content(db: &DatabaseConnection, author: &Principal) -> String {
    let admin = make_principal(db, &format!("admin-{}", uuid::Uuid::new_v4()), Role::Admin).await;
    let cat = category::service::create(
        db,
        Some(&admin),
        CategoryDto {
            name: format!("cat-{}", uuid::Uuid::new_v4()),
        },
    )
    .await
    .expect("create category");

    let item = content::service::create(
        db,
        Some(author),
        ContentDto {
            id: None,
            title: format!("Post {}", uuid::Uuid::new_v4()),
            category_id: cat.id,
            body: "body".to_string(),
            publish_now: true,
        },
    )
    .await
    .expect("create content");
    item.id.as_string()
}

async fn like_set_size(db: &DatabaseConnection, content_id: &str) -> i64 {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM content_like WHERE content_id = ?",
            [content_id.into()],
        ))
        .await
        .expect("count query")
        .expect("count row");
    row.try_get("", "cnt").expect("cnt column")
}

#[tokio::test]
async fn like_count_always_matches_like_set() {
    let db = Arc::new(test_db().await);
    let author = make_principal(&db, "author", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    let mut principals = Vec::new();
    for i in 0..5 {
        principals.push(make_principal(&db, &format!("viewer{i}"), Role::Author).await);
    }

    // Odd number of toggles per principal: everyone ends up in the like set.
    let mut handles = Vec::new();
    for p in &principals {
        let db = Arc::clone(&db);
        let p = p.clone();
        let content_id = content_id.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..3 {
                engagement::service::toggle_like(&db, &content_id, Some(&p))
                    .await
                    .expect("toggle");
            }
        }));
    }
    for h in handles {
        h.await.expect("task");
    }

    let item = content::service::get_by_id(&db, &content_id)
        .await
        .expect("content");
    assert_eq!(item.like_count, 5);
    assert_eq!(item.like_count, like_set_size(&db, &content_id).await);
}

#[tokio::test]
async fn toggle_pair_returns_to_original_state() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let viewer = make_principal(&db, "viewer", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    let first = engagement::service::toggle_like(&db, &content_id, Some(&viewer))
        .await
        .expect("first toggle");
    assert!(first.liked);
    assert_eq!(first.like_count, 1);

    let second = engagement::service::toggle_like(&db, &content_id, Some(&viewer))
        .await
        .expect("second toggle");
    assert!(!second.liked);
    assert_eq!(second.like_count, 0);
    assert_eq!(like_set_size(&db, &content_id).await, 0);
}

#[tokio::test]
async fn anonymous_like_is_rejected_and_count_unchanged() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    let result = engagement::service::toggle_like(&db, &content_id, None).await;
    assert!(matches!(result, Err(EngagementError::Unauthorized)));

    let item = content::service::get_by_id(&db, &content_id)
        .await
        .expect("content");
    assert_eq!(item.like_count, 0);
    assert_eq!(like_set_size(&db, &content_id).await, 0);
}

#[tokio::test]
async fn like_missing_content_is_not_found() {
    let db = test_db().await;
    let viewer = make_principal(&db, "viewer", Role::Author).await;

    let result =
        engagement::service::toggle_like(&db, &uuid::Uuid::new_v4().to_string(), Some(&viewer))
            .await;
    assert!(matches!(result, Err(EngagementError::NotFound("content"))));
}

#[tokio::test]
async fn two_principals_like_then_one_unlikes() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let a = make_principal(&db, "alice", Role::Author).await;
    let b = make_principal(&db, "bob", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    let outcome = engagement::service::toggle_like(&db, &content_id, Some(&a))
        .await
        .expect("a likes");
    assert!(outcome.liked);
    assert_eq!(outcome.like_count, 1);

    let outcome = engagement::service::toggle_like(&db, &content_id, Some(&b))
        .await
        .expect("b likes");
    assert!(outcome.liked);
    assert_eq!(outcome.like_count, 2);

    let outcome = engagement::service::toggle_like(&db, &content_id, Some(&a))
        .await
        .expect("a unlikes");
    assert!(!outcome.liked);
    assert_eq!(outcome.like_count, 1);
    assert_eq!(like_set_size(&db, &content_id).await, 1);
}

#[tokio::test]
async fn whitespace_comment_rejected_without_a_write() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    let result =
        engagement::service::create_comment(&db, &content_id, Some(&author), "   ").await;
    assert!(matches!(result, Err(EngagementError::Validation(_))));

    let comments = engagement::service::list_comments(&db, &content_id)
        .await
        .expect("list");
    assert!(comments.is_empty());
}

#[tokio::test]
async fn comments_list_reverse_chronological() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    for text in ["first", "second", "third"] {
        engagement::service::create_comment(&db, &content_id, Some(&author), text)
            .await
            .expect("comment");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let comments = engagement::service::list_comments(&db, &content_id)
        .await
        .expect("list");
    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(comments[0].created_at >= comments[2].created_at);
    assert_eq!(comments[0].author_name, "author");
}

#[tokio::test]
async fn comment_on_missing_content_is_not_found() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;

    let result = engagement::service::create_comment(
        &db,
        &uuid::Uuid::new_v4().to_string(),
        Some(&author),
        "hello",
    )
    .await;
    assert!(matches!(result, Err(EngagementError::NotFound("content"))));
}

#[tokio::test]
async fn self_follow_always_rejected_and_never_mutates() {
    let db = test_db().await;
    let a = make_principal(&db, "alice", Role::Author).await;

    for _ in 0..3 {
        let result = follow::service::toggle_follow(&db, &a.id, Some(&a)).await;
        assert!(matches!(result, Err(EngagementError::InvalidOperation(_))));
    }

    let counts = follow::service::counts(&db, &a.id).await.expect("counts");
    assert_eq!(counts.followers, 0);
    assert_eq!(counts.following, 0);
}

#[tokio::test]
async fn repeated_follow_toggles_alternate_membership() {
    let db = test_db().await;
    let a = make_principal(&db, "alice", Role::Author).await;
    let b = make_principal(&db, "bob", Role::Author).await;

    for round in 0..4 {
        let outcome = follow::service::toggle_follow(&db, &b.id, Some(&a))
            .await
            .expect("toggle");
        let expect_following = round % 2 == 0;
        assert_eq!(outcome.following, expect_following);

        let counts = follow::service::counts(&db, &b.id).await.expect("counts");
        assert_eq!(counts.followers, if expect_following { 1 } else { 0 });
    }
}

#[tokio::test]
async fn follow_status_reflects_viewer() {
    let db = test_db().await;
    let a = make_principal(&db, "alice", Role::Author).await;
    let b = make_principal(&db, "bob", Role::Author).await;

    // Anonymous viewer: no edge, no button.
    let status = follow::service::status(&db, &b.id, None).await.expect("status");
    assert!(!status.is_following && !status.can_follow);

    // Own profile: button disabled.
    let status = follow::service::status(&db, &b.id, Some(&b)).await.expect("status");
    assert!(!status.is_following && !status.can_follow);

    follow::service::toggle_follow(&db, &b.id, Some(&a))
        .await
        .expect("follow");
    let status = follow::service::status(&db, &b.id, Some(&a)).await.expect("status");
    assert!(status.is_following && status.can_follow);

    let followers = follow::service::list_followers(&db, &b.id)
        .await
        .expect("followers");
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, a.id);
}

#[tokio::test]
async fn follow_missing_target_is_not_found() {
    let db = test_db().await;
    let a = make_principal(&db, "alice", Role::Author).await;

    let result =
        follow::service::toggle_follow(&db, &uuid::Uuid::new_v4().to_string(), Some(&a)).await;
    assert!(matches!(result, Err(EngagementError::NotFound("principal"))));
}

#[tokio::test]
async fn publish_lifecycle_and_ownership() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let stranger = make_principal(&db, "stranger", Role::Author).await;
    let admin = make_principal(&db, "root", Role::Admin).await;

    let cat = category::service::create(&db, Some(&admin), CategoryDto {
        name: "essays".to_string(),
    })
    .await
    .expect("category");

    let item = content::service::create(
        &db,
        Some(&author),
        ContentDto {
            id: None,
            title: "Draft piece".to_string(),
            category_id: cat.id,
            body: "text".to_string(),
            publish_now: false,
        },
    )
    .await
    .expect("create");
    let id = item.id.as_string();
    assert_eq!(item.publish_state, PublishState::Draft);

    // A non-owner cannot transition it.
    let result =
        content::service::transition(&db, Some(&stranger), &id, PublishAction::Publish).await;
    assert!(matches!(result, Err(EngagementError::Unauthorized)));

    // Owner publishes, unpublishes back to draft, trashes, restores.
    let item = content::service::transition(&db, Some(&author), &id, PublishAction::Publish)
        .await
        .expect("publish");
    assert_eq!(item.publish_state, PublishState::Published);

    let item = content::service::transition(&db, Some(&author), &id, PublishAction::Unpublish)
        .await
        .expect("unpublish");
    assert_eq!(item.publish_state, PublishState::Draft);

    // Purge before trashing is illegal.
    let result = content::service::purge(&db, Some(&author), &id).await;
    assert!(matches!(result, Err(EngagementError::InvalidOperation(_))));

    let item = content::service::transition(&db, Some(&author), &id, PublishAction::Trash)
        .await
        .expect("trash");
    assert_eq!(item.publish_state, PublishState::Trashed);

    // Admin may act on someone else's content.
    let item = content::service::transition(
        &db,
        Some(&admin),
        &id,
        PublishAction::Restore(PublishState::Published),
    )
    .await
    .expect("restore");
    assert_eq!(item.publish_state, PublishState::Published);

    // Trash again and purge for good.
    content::service::transition(&db, Some(&author), &id, PublishAction::Trash)
        .await
        .expect("trash again");
    content::service::purge(&db, Some(&author), &id)
        .await
        .expect("purge");
    let result = content::service::get_by_id(&db, &id).await;
    assert!(matches!(result, Err(EngagementError::NotFound("content"))));
}

#[tokio::test]
async fn slug_conflicts_are_scoped_to_category() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let admin = make_principal(&db, "root", Role::Admin).await;

    let cat_a = category::service::create(&db, Some(&admin), CategoryDto {
        name: "rust".to_string(),
    })
    .await
    .expect("category a");
    let cat_b = category::service::create(&db, Some(&admin), CategoryDto {
        name: "golang".to_string(),
    })
    .await
    .expect("category b");

    let dto = |category_id: &str| ContentDto {
        id: None,
        title: "Hello World".to_string(),
        category_id: category_id.to_string(),
        body: "text".to_string(),
        publish_now: false,
    };

    content::service::create(&db, Some(&author), dto(&cat_a.id))
        .await
        .expect("first in category a");

    // Same title in the same category collides on slug.
    let result = content::service::create(&db, Some(&author), dto(&cat_a.id)).await;
    assert!(matches!(result, Err(EngagementError::Validation(_))));

    // Same title in another category is fine.
    content::service::create(&db, Some(&author), dto(&cat_b.id))
        .await
        .expect("same slug, other category");
}

#[tokio::test]
async fn views_append_without_dedup_and_count_surfaces() {
    let db = test_db().await;
    let author = make_principal(&db, "author", Role::Author).await;
    let content_id = make_content(&db, &author).await;

    // Same viewer, same address, three refreshes: three records.
    for _ in 0..3 {
        engagement::service::record_view(&db, &content_id, Some(&author), "10.0.0.1")
            .await
            .expect("view");
    }
    engagement::service::record_view(&db, &content_id, None, "10.0.0.2")
        .await
        .expect("anonymous view");

    let item = content::service::get_by_id(&db, &content_id)
        .await
        .expect("content");
    assert_eq!(item.view_count, 4);
}
