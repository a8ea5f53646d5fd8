use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

// Errors returned by bearer-token verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty token")]
    EmptyToken,
    #[error("empty 'userID' claim")]
    EmptySubject,
}

/// Decoded claims of a verified identity token.
///
/// NOTE:
/// - `userID` is the trusted identity every downstream operation keys on.
/// - `exp` presence/expiry is enforced by `jsonwebtoken::Validation`.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// HS256 bearer-token verifier.
///
/// - Key material is intentionally not printable via Debug.
/// - Never panics across the boundary: every outcome is a tagged `Result`.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(signing_key: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(signing_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Strip a recognized scheme prefix from a raw header value.
    pub fn strip_scheme(raw: &str) -> &str {
        raw.strip_prefix("Bearer ").unwrap_or(raw).trim()
    }

    /// Verify a raw token as taken from the request header.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature
    /// - `exp` (with the configured leeway)
    ///
    /// This method additionally checks that `userID` is present and not
    /// empty, because downstream record lookups key on it.
    pub fn verify(&self, raw: &str) -> Result<Claims, VerifyError> {
        let token = Self::strip_scheme(raw);
        if token.is_empty() {
            return Err(VerifyError::EmptyToken);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.user_id.trim().is_empty() {
            return Err(VerifyError::EmptySubject);
        }

        Ok(data.claims)
    }
}
