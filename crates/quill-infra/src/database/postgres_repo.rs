//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{
    Category, Comment, CommentWithPost, Post, PostRef, PostStatus, PostType, PostWithCategory,
    User,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    CategoryRepository, CommentRepository, PostQuery, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Mask the local part of an email so it can be logged.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn with_category(row: (post::Model, Option<category::Model>)) -> PostWithCategory {
    let (post, category) = row;
    PostWithCategory {
        post: post.into(),
        category: category.map(Into::into),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_with_category(&self, id: Uuid) -> Result<Option<PostWithCategory>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(with_category))
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<PostWithCategory>, RepoError> {
        let mut select = PostEntity::find().find_also_related(CategoryEntity);

        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(post::Status::from(status)));
        }
        if let Some(post_type) = query.post_type {
            select = select.filter(post::Column::PostType.eq(post::Kind::from(post_type)));
        }
        if let Some(featured) = query.featured {
            select = select.filter(post::Column::Featured.eq(featured));
        }
        if let Some(slug) = &query.category_slug {
            select = select.filter(category::Column::Slug.eq(slug.as_str()));
        }
        if let Some(needle) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(needle);
            select = select.filter(
                Condition::any()
                    .add(Expr::col((PostEntity, post::Column::Title)).ilike(pattern.clone()))
                    .add(Expr::col((PostEntity, post::Column::Excerpt)).ilike(pattern)),
            );
        }

        select = select.order_by_desc(post::Column::CreatedAt);
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let rows = select.all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(with_category).collect())
    }

    async fn status_projection(&self) -> Result<Vec<(PostStatus, PostType)>, RepoError> {
        let rows: Vec<(post::Status, post::Kind)> = PostEntity::find()
            .select_only()
            .column(post::Column::Status)
            .column(post::Column::PostType)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(status, kind)| (status.into(), kind.into()))
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let rows = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let row = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Approved.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_with_post(
        &self,
        approved: Option<bool>,
    ) -> Result<Vec<CommentWithPost>, RepoError> {
        let mut select = CommentEntity::find().find_also_related(PostEntity);
        if let Some(approved) = approved {
            select = select.filter(comment::Column::Approved.eq(approved));
        }

        let rows = select
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(comment, post)| CommentWithPost {
                comment: comment.into(),
                post: post.map(|p| PostRef {
                    id: p.id,
                    title: p.title,
                }),
            })
            .collect())
    }

    async fn set_approved(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Approved, Expr::value(true))
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn set_approved_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let updated = CommentEntity::update_many()
            .col_expr(comment::Column::Approved, Expr::value(true))
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(updated.into_iter().map(|c| c.id).collect())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: Vec<Uuid> = CommentEntity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        CommentEntity::delete_many()
            .filter(comment::Column::Id.is_in(existing.iter().copied()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(existing)
    }

    async fn approval_projection(&self) -> Result<Vec<bool>, RepoError> {
        CommentEntity::find()
            .select_only()
            .column(comment::Column::Approved)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("editor@quill.dev"), "e***@quill.dev");
        assert_eq!(mask_email("a@quill.dev"), "***@quill.dev");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
