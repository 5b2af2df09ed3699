//! Entity schema applied at startup
//!
//! Tables are listed explicitly and created in order; later entries may
//! reference earlier ones.

/// A persisted entity and the DDL that creates its table
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Table name
    pub name: &'static str,
    /// Idempotent `CREATE TABLE IF NOT EXISTS` statement
    pub ddl: &'static str,
}

pub const USERS: EntitySchema = EntitySchema {
    name: "users",
    ddl: r#"
        CREATE TABLE IF NOT EXISTS users (
            id CHAR(36) NOT NULL PRIMARY KEY,
            email VARCHAR(255) NOT NULL,
            name VARCHAR(255) NULL,
            display_name VARCHAR(255) NULL,
            full_name VARCHAR(255) NULL,
            image_url VARCHAR(2048) NULL,
            bio TEXT NULL,
            email_verified_at TIMESTAMP(6) NULL,
            last_login_at TIMESTAMP(6) NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP(6) NOT NULL,
            updated_at TIMESTAMP(6) NOT NULL,
            UNIQUE KEY uq_users_email (email)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    "#,
};

pub const LINKED_ACCOUNTS: EntitySchema = EntitySchema {
    name: "linked_accounts",
    ddl: r#"
        CREATE TABLE IF NOT EXISTS linked_accounts (
            id CHAR(36) NOT NULL PRIMARY KEY,
            user_id CHAR(36) NOT NULL,
            provider VARCHAR(64) NOT NULL,
            provider_user_id VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            name VARCHAR(255) NULL,
            image_url VARCHAR(2048) NULL,
            access_token TEXT NULL,
            refresh_token TEXT NULL,
            expires_at TIMESTAMP(6) NULL,
            scope VARCHAR(1024) NULL,
            created_at TIMESTAMP(6) NOT NULL,
            updated_at TIMESTAMP(6) NOT NULL,
            UNIQUE KEY uq_linked_accounts_user_provider (user_id, provider),
            UNIQUE KEY uq_linked_accounts_provider_subject (provider, provider_user_id),
            CONSTRAINT fk_linked_accounts_user FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    "#,
};

pub const VERIFICATION_TOKENS: EntitySchema = EntitySchema {
    name: "verification_tokens",
    ddl: r#"
        CREATE TABLE IF NOT EXISTS verification_tokens (
            id CHAR(36) NOT NULL PRIMARY KEY,
            identifier VARCHAR(255) NOT NULL,
            token VARCHAR(255) NOT NULL,
            expires_at TIMESTAMP(6) NOT NULL,
            created_at TIMESTAMP(6) NOT NULL,
            UNIQUE KEY uq_verification_tokens_token (token),
            KEY idx_verification_tokens_identifier (identifier)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    "#,
};

/// Refresh credentials reference identities by value only; the identity
/// may live in another store, so there is no foreign key to `users`.
pub const REFRESH_CREDENTIALS: EntitySchema = EntitySchema {
    name: "refresh_credentials",
    ddl: r#"
        CREATE TABLE IF NOT EXISTS refresh_credentials (
            id CHAR(36) NOT NULL PRIMARY KEY,
            identity VARCHAR(255) NOT NULL,
            token_hash CHAR(64) NOT NULL,
            created_at TIMESTAMP(6) NOT NULL,
            updated_at TIMESTAMP(6) NOT NULL,
            expires_at TIMESTAMP(6) NOT NULL,
            revoked_at TIMESTAMP(6) NULL,
            created_from_ip VARCHAR(45) NULL,
            user_agent VARCHAR(512) NULL,
            UNIQUE KEY uq_refresh_credentials_token_hash (token_hash),
            KEY idx_refresh_credentials_identity (identity, revoked_at)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    "#,
};

/// Every persisted entity, in creation order
pub const ENTITIES: &[EntitySchema] = &[USERS, LINKED_ACCOUNTS, VERIFICATION_TOKENS, REFRESH_CREDENTIALS];
