//! JWT issuing and validation (HS256, symmetric key).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::domain::AuthUser;
use super::errors::AuthError;
use super::permissions::PERMISSION_CLAIM;

/// Issuer, audience and key must match between issuing and validation.
#[derive(Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub key: String,
    pub lifetime: Duration,
}

impl TryFrom<&configs::JwtConfig> for TokenSettings {
    type Error = AuthError;

    fn try_from(cfg: &configs::JwtConfig) -> Result<Self, Self::Error> {
        let lifetime = Duration::try_minutes(cfg.expiry_minutes)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| AuthError::TokenError(format!("token lifetime out of range: {} minutes", cfg.expiry_minutes)))?;
        Ok(Self {
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            key: cfg.key.clone(),
            lifetime,
        })
    }
}

/// Claims carried by an access token. `Permission` may arrive as a single
/// string or an array; both decode to a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "Permission", default, deserialize_with = "one_or_many")]
    pub permissions: Vec<String>,
}

impl AuthClaims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    /// Values of the claim type `claim`; only `Permission` is multi-valued here.
    pub fn values(&self, claim: &str) -> &[String] {
        if claim == PERMISSION_CLAIM {
            &self.permissions
        } else {
            &[]
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(d)? {
        OneOrMany::One(p) => vec![p],
        OneOrMany::Many(ps) => ps,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    settings: TokenSettings,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(settings: TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(settings.key.as_bytes()),
            decoding: DecodingKey::from_secret(settings.key.as_bytes()),
            validation,
            settings,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.settings.lifetime
    }

    pub fn issue(&self, user: &AuthUser, permissions: &[String]) -> Result<IssuedToken, AuthError> {
        self.issue_at(user, permissions, Utc::now())
    }

    /// Issue as if the current time were `now`.
    pub fn issue_at(&self, user: &AuthUser, permissions: &[String], now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.settings.lifetime)
            .ok_or_else(|| AuthError::TokenError("token expiry out of range".into()))?;
        let claims = AuthClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            permissions: permissions.to_vec(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        // Report the truncated second actually encoded in `exp`.
        let expires_at = Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(expires_at);
        Ok(IssuedToken { token, expires_at })
    }

    pub fn validate(&self, token: &str) -> Result<AuthClaims, AuthError> {
        decode::<AuthClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TokenSettings {
        TokenSettings {
            issuer: "pms".into(),
            audience: "pms-clients".into(),
            key: "0123456789abcdef0123456789abcdef".into(),
            lifetime: Duration::minutes(60),
        }
    }

    fn user() -> AuthUser {
        AuthUser { id: 12, email: "admin@example.com".into(), name: "Admin".into() }
    }

    #[test]
    fn issued_tokens_validate() {
        let svc = TokenService::new(settings());
        let issued = svc.issue(&user(), &["Permissions.Users.View".into()]).unwrap();
        let claims = svc.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(12));
        assert_eq!(claims.email, "admin@example.com");
        assert!(claims.has_permission("Permissions.Users.View"));
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let svc = TokenService::new(settings());
        let issued = svc.issue_at(&user(), &[], Utc::now() - Duration::hours(2)).unwrap();
        assert!(matches!(svc.validate(&issued.token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn wrong_audience_issuer_or_key_is_rejected() {
        let issuer = TokenService::new(settings());
        let token = issuer.issue(&user(), &[]).unwrap().token;

        let other_aud = TokenService::new(TokenSettings { audience: "elsewhere".into(), ..settings() });
        let other_iss = TokenService::new(TokenSettings { issuer: "someone".into(), ..settings() });
        let other_key = TokenService::new(TokenSettings { key: "ffffffffffffffffffffffffffffffff".into(), ..settings() });
        for svc in [other_aud, other_iss, other_key] {
            assert!(matches!(svc.validate(&token), Err(AuthError::InvalidToken(_))));
        }
        assert!(issuer.validate("not.a.jwt").is_err());
    }

    #[test]
    fn settings_from_config_reject_unrepresentable_lifetimes() {
        let cfg = |expiry_minutes| configs::JwtConfig {
            issuer: "pms".into(),
            audience: "pms-clients".into(),
            key: "0123456789abcdef0123456789abcdef".into(),
            expiry_minutes,
        };
        let ok = TokenSettings::try_from(&cfg(30)).unwrap();
        assert_eq!(ok.lifetime, Duration::minutes(30));
        assert!(matches!(TokenSettings::try_from(&cfg(i64::MAX)), Err(AuthError::TokenError(_))));
        assert!(matches!(TokenSettings::try_from(&cfg(0)), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn overflowing_expiry_is_an_error() {
        let svc = TokenService::new(TokenSettings { lifetime: Duration::minutes(1_000_000_000_000), ..settings() });
        assert!(matches!(svc.issue(&user(), &[]), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn single_permission_string_decodes_as_list() {
        let json = r#"{"sub":"1","email":"a@b.co","iss":"i","aud":"a","iat":0,"exp":1,"Permission":"Permissions.Courts.View"}"#;
        let claims: AuthClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.permissions, vec!["Permissions.Courts.View".to_string()]);
        assert_eq!(claims.values(PERMISSION_CLAIM).len(), 1);
        assert!(claims.values("role").is_empty());

        let bare = r#"{"sub":"1","email":"a@b.co","iss":"i","aud":"a","iat":0,"exp":1}"#;
        let claims: AuthClaims = serde_json::from_str(bare).unwrap();
        assert!(claims.permissions.is_empty());
    }
}
