//! Identity claims from the external provider and the user profile derived
//! from them on first login.

use serde::{Deserialize, Serialize};

/// Claims describing an authenticated identity.
///
/// Populated from the OAuth provider's user-info response and carried in the
/// access token for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Stable provider-side account id.
    pub provider_id: String,
    /// Display name ("Ada Lovelace").
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

impl IdentityClaims {
    /// The email used as username, if present and not blank.
    pub fn username(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Profile for a user about to be provisioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub auth_provider_id: String,
}

impl UserProfile {
    /// Build a profile from claims. Returns `None` when the claims carry no
    /// usable email.
    pub fn from_claims(claims: &IdentityClaims) -> Option<Self> {
        let username = claims.username()?.to_string();
        let (first_name, last_name) = split_display_name(claims.name.as_deref().unwrap_or(""));
        Some(Self {
            email: username.clone(),
            username,
            first_name,
            last_name,
            auth_provider_id: claims.provider_id.clone(),
        })
    }
}

/// Split a display name on whitespace into `(first, last)`.
///
/// The first token becomes the first name and the last token the last name,
/// so a single-word name fills both and middle names are dropped.
pub fn split_display_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default();
    let last = parts.last().unwrap_or(first);
    (first.to_string(), last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_word_name() {
        assert_eq!(
            split_display_name("Ada Lovelace"),
            ("Ada".to_string(), "Lovelace".to_string())
        );
    }

    #[test]
    fn single_word_fills_both_parts() {
        assert_eq!(
            split_display_name("Cher"),
            ("Cher".to_string(), "Cher".to_string())
        );
    }

    #[test]
    fn middle_names_are_dropped_and_whitespace_collapsed() {
        assert_eq!(
            split_display_name("  Grace   Brewster  Hopper "),
            ("Grace".to_string(), "Hopper".to_string())
        );
    }

    #[test]
    fn empty_name_yields_empty_parts() {
        assert_eq!(split_display_name(""), (String::new(), String::new()));
    }

    #[test]
    fn profile_requires_email() {
        let claims = IdentityClaims {
            provider_id: "42".into(),
            name: Some("Ada Lovelace".into()),
            email: Some("   ".into()),
            location: None,
        };
        assert_eq!(UserProfile::from_claims(&claims), None);
    }

    #[test]
    fn profile_uses_email_as_username() {
        let claims = IdentityClaims {
            provider_id: "42".into(),
            name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
            location: Some("London".into()),
        };
        let profile = UserProfile::from_claims(&claims).unwrap();
        assert_eq!(profile.username, "ada@example.com");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
        assert_eq!(profile.auth_provider_id, "42");
    }
}
