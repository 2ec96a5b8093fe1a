//! Named authorization policies over token claims.

use std::collections::HashMap;

use tracing::debug;

use super::errors::AuthError;
use super::permissions::{self, PERMISSION_CLAIM};
use super::token::AuthClaims;

/// Satisfied when the claims carry `claim` with one of `allowed`.
#[derive(Debug, Clone)]
pub struct Policy {
    pub claim: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Policy>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One policy per catalog permission, named after it and requiring a
    /// `Permission` claim with the same value.
    pub fn with_permission_policies() -> Self {
        let mut registry = Self::new();
        for p in permissions::all() {
            registry.add_claim_policy(p.clone(), PERMISSION_CLAIM, [p]);
        }
        registry
    }

    pub fn add_claim_policy(
        &mut self,
        name: impl Into<String>,
        claim: &str,
        allowed: impl IntoIterator<Item = String>,
    ) {
        let policy = Policy { claim: claim.to_string(), allowed: allowed.into_iter().collect() };
        self.policies.insert(name.into(), policy);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Unknown policies fail closed.
    pub fn authorize(&self, claims: &AuthClaims, policy: &str) -> Result<(), AuthError> {
        let rule = self
            .policies
            .get(policy)
            .ok_or_else(|| AuthError::UnknownPolicy(policy.to_string()))?;
        let granted = claims.values(&rule.claim).iter().any(|v| rule.allowed.contains(v));
        if granted {
            Ok(())
        } else {
            debug!(policy, sub = %claims.sub, "policy denied");
            Err(AuthError::Forbidden(policy.to_string()))
        }
    }
}
