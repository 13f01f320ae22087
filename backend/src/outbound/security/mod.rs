//! Credential hashing adapters.

mod bcrypt_hasher;

pub use bcrypt_hasher::{BCRYPT_COST, BcryptPasswordHasher};
