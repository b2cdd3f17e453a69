use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchCache::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchCache::Query).string().not_null())
                    .col(ColumnDef::new(SearchCache::ResultsJson).text().not_null())
                    .col(
                        ColumnDef::new(SearchCache::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // The cache key must be unique so concurrent writers can rely on
        // ON CONFLICT semantics instead of racing duplicate rows.
        manager
            .create_index(
                Index::create()
                    .name("idx_search_cache_query")
                    .table(SearchCache::Table)
                    .col(SearchCache::Query)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieReviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MovieReviews::MovieId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MovieReviews::UserName).string().not_null())
                    .col(ColumnDef::new(MovieReviews::Rating).integer().not_null())
                    .col(ColumnDef::new(MovieReviews::ReviewText).text().not_null())
                    .col(
                        ColumnDef::new(MovieReviews::HelpfulCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MovieReviews::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_reviews_movie_id")
                    .table(MovieReviews::Table)
                    .col(MovieReviews::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SearchCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchCache {
    Table,
    Id,
    Query,
    ResultsJson,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MovieReviews {
    Table,
    Id,
    MovieId,
    UserName,
    Rating,
    ReviewText,
    HelpfulCount,
    CreatedAt,
}
