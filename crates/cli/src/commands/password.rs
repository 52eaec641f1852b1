//! Admin password hashing.
//!
//! # Usage
//!
//! ```bash
//! echo 'una-clave-larga' | herreria hash-password
//! ```
//!
//! The output is the value for `ADMIN_PASSWORD_HASH`.

use std::io::{self, BufRead, Write};

use secrecy::{ExposeSecret, SecretString};

use herreria_site::services::hash_password;

use crate::error::CliError;

/// Read one line from stdin and print its Argon2id hash.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the password is too short.
pub fn hash_from_stdin() -> Result<(), CliError> {
    let password = read_password(io::stdin().lock())?;
    let hash = hash_password(password.expose_secret())?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{hash}")?;
    Ok(())
}

/// Read the first line, without its line ending.
fn read_password(mut input: impl BufRead) -> Result<SecretString, CliError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(password))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_password_strips_newline() {
        let password = read_password("hierro forjado\r\nsegunda".as_bytes()).unwrap();
        assert_eq!(password.expose_secret(), "hierro forjado");
    }

    #[test]
    fn test_read_password_empty_input() {
        let password = read_password("".as_bytes()).unwrap();
        assert_eq!(password.expose_secret(), "");
    }
}
