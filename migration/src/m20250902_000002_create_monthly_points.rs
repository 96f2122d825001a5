use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum MonthlyPoints {
    Table,
    Id,
    UserId,
    UserName,
    PhotoUrl,
    Month,
    Year,
    ChairSecTrePoints,
    OcPoints,
    MeetingPoints,
    ClubProjectPoints,
    DistrictProjectPoints,
    MultipleProjectPoints,
    TotalPoints,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // id is "{year}-{month}-{user_id}", never generated by the database
        manager
            .create_table(
                Table::create()
                    .table(MonthlyPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyPoints::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyPoints::UserId).big_integer().not_null())
                    .col(ColumnDef::new(MonthlyPoints::UserName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(MonthlyPoints::PhotoUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::Month)
                            .integer()
                            .not_null()
                            .check(
                                Expr::col(MonthlyPoints::Month)
                                    .gte(0)
                                    .and(Expr::col(MonthlyPoints::Month).lte(11)),
                            ),
                    )
                    .col(ColumnDef::new(MonthlyPoints::Year).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyPoints::ChairSecTrePoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::OcPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::MeetingPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::ClubProjectPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::DistrictProjectPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::MultipleProjectPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::TotalPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPoints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_monthly_points_period")
                    .table(MonthlyPoints::Table)
                    .col(MonthlyPoints::Year)
                    .col(MonthlyPoints::Month)
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
                    .table(MonthlyPoints::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
