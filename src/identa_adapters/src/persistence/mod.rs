pub mod hashmap_account_store;
pub mod hashmap_audit_store;
pub mod postgres_account_store;
pub mod postgres_audit_store;

pub use hashmap_account_store::HashMapAccountStore;
pub use hashmap_audit_store::HashMapAuditStore;
pub use postgres_account_store::PostgresAccountStore;
pub use postgres_audit_store::PostgresAuditStore;
