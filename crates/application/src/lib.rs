//! Application services and ports.

#![forbid(unsafe_code)]

mod password_policy;
mod seed_ports;
mod seed_service;

#[cfg(test)]
mod test_support;

pub use password_policy::{
    CompareError, HashError, PasswordGenerationError, PasswordHasher, PasswordHasherError,
    PasswordPolicy, RehashError, RehashOutcome,
};
pub use seed_ports::{InsertOutcome, SeedStore, SeedTransaction, StoreError};
pub use seed_service::{
    AdminAccountSpec, EntityKind, PersistenceError, SeedBootstrapper, SeedEntry, SeedPlan,
    SeedReport, StoreOperation, TransactionError,
};
