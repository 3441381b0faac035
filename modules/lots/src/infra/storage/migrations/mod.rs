use sea_orm_migration::prelude::*;

mod m20250101_000001_create_lots;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_lots::Migration)]
    }

    // Per-module history table: a shared one would report the other
    // module's migrations as missing.
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_lots").into_iden()
    }
}
