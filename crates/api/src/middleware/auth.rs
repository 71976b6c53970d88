//! # Access Codes
//!
//! Private games are protected by an access code chosen by the host. Only an
//! Argon2 hash of the code is stored. Every game also gets a short public
//! game code that gamers use to find it.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use eyre::{Result, eyre};
use rand::{Rng, distributions::Alphanumeric};

/// Length of the public code gamers type in to join a game.
pub const GAME_CODE_LENGTH: usize = 6;

/// Hashes an access code using Argon2 with a fresh random salt.
///
/// Returns the hash in PHC string format.
pub fn hash_access_code(access_code: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(access_code.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing access code: {}", e))?
        .to_string();

    Ok(hash)
}

/// Checks `access_code` against a stored hash.
///
/// A game without a stored hash is public and accepts any code.
pub fn verify_access_code(stored_hash: Option<&str>, access_code: Option<&str>) -> Result<bool> {
    let Some(hash) = stored_hash else {
        return Ok(true);
    };
    let Some(access_code) = access_code else {
        return Ok(false);
    };

    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| eyre!("Invalid access code hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(access_code.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generates a random upper-case alphanumeric game code.
pub fn generate_game_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GAME_CODE_LENGTH)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect()
}
