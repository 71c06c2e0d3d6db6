use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus, PostType};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, CommentRepository, PostRepository};

use super::entity::{category, comment, post};
use super::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
};

fn post_model(id: Uuid, status: post::Status) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: "Attention Is All You Need".to_owned(),
        excerpt: Some("A walkthrough".to_owned()),
        content: "<p>Body</p>".to_owned(),
        category_id: None,
        tags: vec!["ml".to_owned(), "papers".to_owned()],
        featured_image: None,
        status,
        post_type: post::Kind::Article,
        featured: false,
        author_id: Uuid::new_v4(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn comment_model(id: Uuid, approved: bool) -> comment::Model {
    comment::Model {
        id,
        post_id: Uuid::new_v4(),
        parent_id: None,
        author_name: "Ada".to_owned(),
        author_email: None,
        content: "Great read".to_owned(),
        approved,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.post_type, PostType::Article);
    assert_eq!(post.tags, vec!["ml", "papers"]);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post: Post = post_model(Uuid::new_v4(), post::Status::Draft).into();

    let result = repo.update(post).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_with_category_embeds_summary() {
    let post_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let mut model = post_model(post_id, post::Status::Published);
    model.category_id = Some(category_id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(
            model,
            Some(category::Model {
                id: category_id,
                name: "Research".to_owned(),
                slug: "research".to_owned(),
                description: None,
                created_at: Utc::now().into(),
            }),
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let found = repo.find_with_category(post_id).await.unwrap().unwrap();

    let category = found.category.unwrap();
    assert_eq!(category.id, category_id);
    assert_eq!(category.slug, "research");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_set_approved_missing_comment_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result = repo.set_approved(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_set_approved_many_returns_touched_ids() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment_model(a, true)]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let updated = repo.set_approved_many(&[a, b]).await.unwrap();
    assert_eq!(updated, vec![a]);
}

#[tokio::test]
async fn test_list_categories() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            category::Model {
                id: Uuid::new_v4(),
                name: "Articles".to_owned(),
                slug: "articles".to_owned(),
                description: None,
                created_at: Utc::now().into(),
            },
            category::Model {
                id: Uuid::new_v4(),
                name: "News".to_owned(),
                slug: "news".to_owned(),
                description: Some("Announcements".to_owned()),
                created_at: Utc::now().into(),
            },
        ]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let categories = repo.list_all().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].description.as_deref(), Some("Announcements"));
}
