use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Rows are append-only; `timestamp` is set by the store with sub-second precision.
        // The column default uses the same RFC 3339 text shape so manual inserts sort correctly.
        manager
            .create_table(
                Table::create()
                    .table(CryptoPrices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CryptoPrices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CryptoPrices::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CryptoPrices::Crypto).text().not_null())
                    .col(ColumnDef::new(CryptoPrices::Currency).text().not_null())
                    .col(ColumnDef::new(CryptoPrices::Price).double().not_null())
                    .col(
                        ColumnDef::new(CryptoPrices::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust(
                                "(strftime('%Y-%m-%dT%H:%M:%f+00:00', 'now'))",
                            )),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crypto_prices_user_timestamp")
                    .table(CryptoPrices::Table)
                    .col(CryptoPrices::UserId)
                    .col(CryptoPrices::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CryptoPrices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CryptoPrices {
    Table,
    Id,
    UserId,
    Crypto,
    Currency,
    Price,
    Timestamp,
}
