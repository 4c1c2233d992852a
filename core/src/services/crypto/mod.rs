//! Cryptographic primitives for at-rest token protection.

pub mod cipher;
pub mod digest;

pub use cipher::AesCipher;
pub use digest::KeyedDigest;
