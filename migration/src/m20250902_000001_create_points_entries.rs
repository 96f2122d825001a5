use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PointsEntries {
    Table,
    Id,
    UserId,
    UserName,
    Date,
    Description,
    Points,
    Category,
    ProjectName,
    EventId,
    AddedBy,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("points_category"))
                    .values(vec![
                        Alias::new("chair_sec_tre"),
                        Alias::new("oc"),
                        Alias::new("meeting"),
                        Alias::new("club_project"),
                        Alias::new("district_project"),
                        Alias::new("multiple_project"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PointsEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointsEntries::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PointsEntries::UserName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(PointsEntries::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PointsEntries::Description).text().not_null())
                    .col(ColumnDef::new(PointsEntries::Points).big_integer().not_null())
                    .col(
                        ColumnDef::new(PointsEntries::Category)
                            .custom(Alias::new("points_category"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(PointsEntries::ProjectName).string_len(255).null())
                    .col(ColumnDef::new(PointsEntries::EventId).big_integer().null())
                    .col(ColumnDef::new(PointsEntries::AddedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(PointsEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_entries_date")
                    .table(PointsEntries::Table)
                    .col(PointsEntries::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_entries_user")
                    .table(PointsEntries::Table)
                    .col(PointsEntries::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PointsEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("points_category")).to_owned())
            .await?;
        Ok(())
    }
}
