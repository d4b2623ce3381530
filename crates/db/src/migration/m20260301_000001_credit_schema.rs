//! Initial credit schema.
//!
//! Creates consumers, credit limits and transactions. The named unique
//! constraints are the ones reported back as duplicate errors.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS credit_limits CASCADE;
DROP TABLE IF EXISTS consumers CASCADE;
DROP TYPE IF EXISTS transaction_status;
",
        )
        .await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
CREATE TYPE transaction_status AS ENUM ('ACTIVE', 'COMPLETED', 'DEFAULTED');

CREATE TABLE consumers (
    id BIGSERIAL PRIMARY KEY,
    nik VARCHAR(16) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255) NOT NULL,
    place_of_birth VARCHAR(100),
    date_of_birth DATE,
    salary NUMERIC(15, 2) NOT NULL,
    ktp_photo TEXT,
    selfie_photo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,
    -- Soft-deleted rows keep their NIK
    CONSTRAINT uq_consumers_nik UNIQUE (nik),
    CONSTRAINT chk_consumers_nik_format CHECK (nik ~ '^[0-9]{16}$'),
    CONSTRAINT chk_consumers_salary CHECK (salary >= 0)
);

CREATE TABLE credit_limits (
    id BIGSERIAL PRIMARY KEY,
    consumer_id BIGINT NOT NULL REFERENCES consumers(id),
    tenor SMALLINT NOT NULL,
    limit_amount NUMERIC(15, 2) NOT NULL,
    used_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_credit_limits_consumer_tenor UNIQUE (consumer_id, tenor),
    CONSTRAINT chk_credit_limits_tenor CHECK (tenor IN (1, 2, 3, 6)),
    CONSTRAINT chk_credit_limits_amount CHECK (limit_amount > 0),
    CONSTRAINT chk_credit_limits_used CHECK (used_amount >= 0 AND used_amount <= limit_amount)
);

CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    consumer_id BIGINT NOT NULL REFERENCES consumers(id),
    contract_number VARCHAR(255) NOT NULL,
    tenor SMALLINT NOT NULL,
    otr NUMERIC(15, 2) NOT NULL,
    admin_fee NUMERIC(15, 2) NOT NULL DEFAULT 0,
    installment_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    interest_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    asset_name VARCHAR(255),
    status transaction_status NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_transactions_contract_number UNIQUE (contract_number),
    CONSTRAINT chk_transactions_tenor CHECK (tenor IN (1, 2, 3, 6)),
    CONSTRAINT chk_transactions_otr CHECK (otr > 0),
    CONSTRAINT chk_transactions_terms CHECK (
        admin_fee >= 0 AND installment_amount >= 0 AND interest_amount >= 0
    )
);

CREATE INDEX idx_credit_limits_consumer ON credit_limits(consumer_id);
CREATE INDEX idx_transactions_consumer ON transactions(consumer_id, id);
CREATE INDEX idx_transactions_status ON transactions(status);
";
