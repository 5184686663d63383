#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use scribe_core::error::RepoError;
    use scribe_core::ports::{PostRepository, UserRepository};

    use crate::database::entity::post::{self, ImageRefs};
    use crate::database::entity::user::{self, RoleSet};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                author_id,
                title: "Test Post".to_owned(),
                content: "Content".to_owned(),
                images: ImageRefs(vec!["/images/abc_photo.png".to_owned()]),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.images, vec!["/images/abc_photo.png".to_owned()]);
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                roles: RoleSet(vec!["user".to_owned()]),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));

        let result = repo.find_by_username("alice").await.unwrap();

        let user = result.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.roles, vec!["user".to_owned()]);
    }

    #[tokio::test]
    async fn test_delete_missing_post_returns_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result = repo.delete(uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_repositories_share_one_connection() {
        let user_id = uuid::Uuid::new_v4();
        let post_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                roles: RoleSet(vec!["user".to_owned()]),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                author_id: user_id,
                title: "Shared Pool".to_owned(),
                content: "Content".to_owned(),
                images: ImageRefs(vec![]),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        // One connection serves both repositories.
        let db = Arc::new(db);
        let users = PostgresUserRepository::new(Arc::clone(&db));
        let posts = PostgresPostRepository::new(db);

        let user = users.find_by_id(user_id).await.unwrap().unwrap();
        let post = posts.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(post.author_id, user_id);
    }
}
