//! Token creation and verification with per-class signing secrets.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use tokenvault_core::config::AuthConfig;
use tokenvault_core::error::{AppError, ErrorKind};
use tokenvault_core::result::AppResult;

use super::claims::{TokenClaims, TokenKind, WireClaims};
use super::secret::SigningSecret;
use super::token::{AccessToken, RefreshToken, TokenPair};

/// Source of the current instant. Replaceable so expiry can be tested.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Keys and validation rules for one token class.
#[derive(Clone)]
struct SigningKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SigningKeys {
    fn new(secret: &SigningSecret) -> Self {
        let algorithm = secret.algorithm();

        // Expiry is checked against our own clock with an exclusive bound
        // and no leeway, after the signature has been verified.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

/// Issues and verifies access and refresh tokens.
///
/// Holds one secret per token class for the lifetime of the process and no
/// other state, so a single instance can be shared across tasks. No method
/// performs I/O.
#[derive(Clone)]
pub struct Tokenizer {
    access: SigningKeys,
    refresh: SigningKeys,
    clock: Clock,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("access_algorithm", &self.access.algorithm)
            .field("refresh_algorithm", &self.refresh.algorithm)
            .finish()
    }
}

impl Tokenizer {
    /// Creates a tokenizer from two distinct secrets.
    pub fn new(access_secret: SigningSecret, refresh_secret: SigningSecret) -> AppResult<Self> {
        if access_secret == refresh_secret {
            return Err(AppError::configuration(
                "Access and refresh signing secrets must differ",
            ));
        }

        Ok(Self {
            access: SigningKeys::new(&access_secret),
            refresh: SigningKeys::new(&refresh_secret),
            clock: Arc::new(Utc::now),
        })
    }

    /// Creates a tokenizer from auth configuration.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;
        Self::new(
            SigningSecret::new(config.access_secret.as_bytes())?,
            SigningSecret::new(config.refresh_secret.as_bytes())?,
        )
    }

    /// Replaces the clock used for issuance and expiry checks.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Creates an access token valid for 30 minutes.
    pub fn create_access_token(
        &self,
        user_id: i64,
        subject: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> AppResult<AccessToken> {
        let roles = roles.into_iter().map(Into::into).collect();
        let (token, _) = self.issue(TokenKind::Access, user_id, subject, roles, self.now())?;
        Ok(AccessToken::new(token))
    }

    /// Creates a refresh token valid for 7 days.
    pub fn create_refresh_token(
        &self,
        user_id: i64,
        subject: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> AppResult<RefreshToken> {
        let roles = roles.into_iter().map(Into::into).collect();
        let (token, _) = self.issue(TokenKind::Refresh, user_id, subject, roles, self.now())?;
        Ok(RefreshToken::new(token))
    }

    /// Creates an access and a refresh token issued at the same instant.
    pub fn create_token_pair(
        &self,
        user_id: i64,
        subject: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> AppResult<TokenPair> {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        let now = self.now();

        let (access, access_claims) =
            self.issue(TokenKind::Access, user_id, subject, roles.clone(), now)?;
        let (refresh, refresh_claims) =
            self.issue(TokenKind::Refresh, user_id, subject, roles, now)?;

        Ok(TokenPair {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new(refresh),
            access_expires_at: access_claims.expires_at,
            refresh_expires_at: refresh_claims.expires_at,
        })
    }

    /// Verifies an access token and returns its claims.
    pub fn parse_access_token(&self, token: &str) -> AppResult<TokenClaims> {
        self.parse(TokenKind::Access, token)
    }

    /// Verifies a refresh token and returns its claims.
    pub fn parse_refresh_token(&self, token: &str) -> AppResult<TokenClaims> {
        self.parse(TokenKind::Refresh, token)
    }

    /// Verifies the access token in an authorization header value such as
    /// `"Bearer <token>"` and returns its claims.
    ///
    /// The scheme itself is not checked; only the segment after the first
    /// space is parsed. Refresh tokens never verify here.
    pub fn parse_authorization_header(&self, header_value: &str) -> AppResult<TokenClaims> {
        let token = token_segment(header_value)?;
        self.parse_access_token(token)
    }

    /// Returns the user id embedded in the access token of an
    /// authorization header value.
    pub fn extract_user_id(&self, header_value: &str) -> AppResult<i64> {
        Ok(self.parse_authorization_header(header_value)?.user_id)
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: i64,
        subject: &str,
        roles: Vec<String>,
        now: DateTime<Utc>,
    ) -> AppResult<(String, TokenClaims)> {
        // The wire format carries whole seconds; truncate up front so the
        // typed claims match what a verifier will decode.
        let issued_at = now.trunc_subsecs(0);
        let claims = TokenClaims {
            subject: subject.to_string(),
            user_id,
            roles,
            issued_at,
            expires_at: issued_at + kind.lifetime(),
            token_id: Some(Uuid::new_v4()),
        };

        let keys = self.keys(kind);
        let token = encode(
            &Header::new(keys.algorithm),
            &WireClaims::from(&claims),
            &keys.encoding,
        )
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to encode {kind} token"),
                e,
            )
        })?;

        debug!(user_id, kind = %kind, expires_at = %claims.expires_at, "Issued token");
        Ok((token, claims))
    }

    fn parse(&self, kind: TokenKind, token: &str) -> AppResult<TokenClaims> {
        let result = self.verify(kind, token);
        if let Err(e) = &result {
            debug!(kind = %kind, error = %e, "Rejected token");
        }
        result
    }

    fn verify(&self, kind: TokenKind, token: &str) -> AppResult<TokenClaims> {
        let keys = self.keys(kind);
        let data = decode::<WireClaims>(token, &keys.decoding, &keys.validation)
            .map_err(map_jwt_error)?;

        let claims = TokenClaims::try_from(data.claims)?;
        if claims.is_expired_at(self.now()) {
            return Err(AppError::token_expired(format!("The {kind} token has expired")));
        }
        Ok(claims)
    }
}

/// Returns the segment after the first space of a header value.
fn token_segment(header_value: &str) -> AppResult<&str> {
    header_value
        .split(' ')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| {
            AppError::malformed_header("Authorization header must have the form '<scheme> <token>'")
        })
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    let (kind, message) = match e.kind() {
        JwtErrorKind::ExpiredSignature => (ErrorKind::TokenExpired, "Token has expired"),
        JwtErrorKind::InvalidSignature => (ErrorKind::TokenInvalid, "Invalid token signature"),
        JwtErrorKind::InvalidAlgorithm => (
            ErrorKind::TokenInvalid,
            "Token signed with an unexpected algorithm",
        ),
        JwtErrorKind::Json(_) | JwtErrorKind::MissingRequiredClaim(_) => (
            ErrorKind::TokenInvalid,
            "Token claims are missing or mistyped",
        ),
        JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) | JwtErrorKind::Utf8(_) => {
            (ErrorKind::TokenInvalid, "Invalid token format")
        }
        _ => (ErrorKind::TokenInvalid, "Token validation failed"),
    };
    AppError::with_source(kind, message, e)
}
