use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum AttendanceRecords {
    Table,
    Id,
    EventId,
    UserId,
    Timestamp,
    Status,
    DistanceMeters,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("attendance_status"))
                    .values(vec![Alias::new("present"), Alias::new("absent")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::EventId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::Timestamp)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::Status)
                            .custom(Alias::new("attendance_status"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::DistanceMeters)
                            .double()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_event_user")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::EventId)
                    .col(AttendanceRecords::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_timestamp")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::Timestamp)
                    .to_owned(),
            )
            .await?;
        // one present record per member and event, absent retries stay allowed
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_records_present_once \
                 ON attendance_records (event_id, user_id) WHERE status = 'present'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(AttendanceRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("attendance_status")).to_owned())
            .await?;
        Ok(())
    }
}
