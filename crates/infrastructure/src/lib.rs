//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod bcrypt_password_hasher;
mod postgres_seed_store;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
pub use postgres_seed_store::{PostgresSeedStore, PostgresSeedTransaction};
