use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::OnConflict;

use quill_core::domain::DEFAULT_CATEGORIES;

use crate::m20240101_000001_create_content_tables::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Categories::Table)
            .columns([Categories::Id, Categories::Name, Categories::Slug])
            .on_conflict(OnConflict::column(Categories::Slug).do_nothing().to_owned());

        for (name, slug) in DEFAULT_CATEGORIES {
            insert
                .values([Expr::cust("gen_random_uuid()"), name.into(), slug.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = DEFAULT_CATEGORIES.map(|(_, slug)| slug);
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Categories::Table)
                    .and_where(Expr::col(Categories::Slug).is_in(slugs))
                    .to_owned(),
            )
            .await
    }
}
