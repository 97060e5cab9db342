//! Static token authentication.
//!
//! The accepted tokens are loaded once at startup and never change. Lookups
//! compare against every stored token in constant time.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Immutable set of accepted `Authorization` tokens.
#[derive(Clone, Default)]
pub struct CredentialStore {
    tokens: Vec<String>,
}

impl CredentialStore {
    /// Build the store, dropping blank and duplicate entries.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            if token.is_empty() || unique.contains(&token) {
                continue;
            }
            unique.push(token);
        }
        Self { tokens: unique }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, candidate: &str) -> bool {
        let candidate = candidate.as_bytes();
        // No short-circuit on the first hit.
        self.tokens.iter().fold(false, |found, token| {
            let matches: bool = token.as_bytes().ct_eq(candidate).into();
            found | matches
        })
    }

    /// Check the raw `Authorization` header value.
    ///
    /// The whole value is the credential; `Bearer <token>` is also accepted.
    pub fn authenticate(&self, header_value: Option<&str>) -> bool {
        let Some(value) = header_value else {
            return false;
        };
        if self.contains(value) {
            return true;
        }
        value
            .strip_prefix("Bearer ")
            .is_some_and(|token| self.contains(token))
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("tokens", &format_args!("[{} redacted]", self.tokens.len()))
            .finish()
    }
}

impl Drop for CredentialStore {
    fn drop(&mut self) {
        for token in &mut self.tokens {
            token.zeroize();
        }
    }
}
