pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_events;
mod m20250901_000003_create_attendance_records;
mod m20250902_000001_create_points_entries;
mod m20250902_000002_create_monthly_points;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_events::Migration),
            Box::new(m20250901_000003_create_attendance_records::Migration),
            Box::new(m20250902_000001_create_points_entries::Migration),
            Box::new(m20250902_000002_create_monthly_points::Migration),
        ]
    }
}
