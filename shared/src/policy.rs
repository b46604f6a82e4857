/// Credential policy for the mock login flow.
///
/// Any non-empty email/password pair authenticates. A small override table
/// maps reserved addresses to tiers; everyone else gets the default tier.
/// This is a demo policy, not a security boundary.
use std::collections::HashMap;

use crate::errors::AuthError;
use crate::models::Tier;

/// Reserved address that gets premium access out of the box.
pub const DEFAULT_PREMIUM_EMAIL: &str = "premium@example.com";

/// Tier assignment table, keyed by lowercased email.
#[derive(Debug, Clone)]
pub struct TierPolicy {
    overrides: HashMap<String, Tier>,
    default_tier: Tier,
}

impl TierPolicy {
    /// Policy with the given premium addresses; everyone else is standard.
    pub fn with_premium<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let overrides = emails
            .into_iter()
            .map(|e| (e.as_ref().trim().to_lowercase(), Tier::Premium))
            .filter(|(e, _)| !e.is_empty())
            .collect();
        Self {
            overrides,
            default_tier: Tier::Standard,
        }
    }

    /// Build from the PREMIUM_EMAILS env var (comma-separated), falling
    /// back to the reserved demo address.
    pub fn from_env() -> Self {
        match std::env::var("PREMIUM_EMAILS") {
            Ok(raw) => Self::with_premium(raw.split(',')),
            Err(_) => Self::with_premium([DEFAULT_PREMIUM_EMAIL]),
        }
    }

    /// Check credentials. Fails closed when either field is empty; any
    /// other pair authenticates and is assigned a tier.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Tier, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }
        Ok(self.tier_for(email))
    }

    /// Tier for an address; the override table matches case-insensitively.
    pub fn tier_for(&self, email: &str) -> Tier {
        self.overrides
            .get(&email.to_lowercase())
            .copied()
            .unwrap_or(self.default_tier)
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::with_premium([DEFAULT_PREMIUM_EMAIL])
    }
}
