pub mod error;
pub mod generator;
pub mod hasher;
pub mod manager;

pub use error::TokenError;
pub use generator::{AccessClaims, Generator, TokenGenerator};
pub use hasher::{BcryptHasher, Hasher};
pub use manager::TokenManager;
