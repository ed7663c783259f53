//! Registered player profile
//!
//! Persisted to LocalStorage once at registration, read once at startup.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Registration input problems, shown to the player as a prompt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("please fill in your name")]
    MissingName,
    #[error("please fill in your position")]
    MissingRole,
}

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    /// Job title / position in the office
    #[serde(rename = "position")]
    pub role: String,
    pub registered: bool,
}

impl PlayerProfile {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "officeRunnerPlayer";

    /// Validate registration input. Both fields are trimmed and must be non-empty.
    pub fn register(name: &str, role: &str) -> Result<Self, RegistrationError> {
        let name = name.trim();
        let role = role.trim();
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }
        if role.is_empty() {
            return Err(RegistrationError::MissingRole);
        }
        Ok(Self {
            name: name.to_string(),
            role: role.to_string(),
            registered: true,
        })
    }

    /// Decode a stored profile. Anything malformed or incomplete is treated
    /// as no profile at all.
    pub fn from_stored(raw: Option<&str>) -> Option<Self> {
        let profile: Self = match platform::decode(Self::STORAGE_KEY, raw) {
            Ok(profile) => profile,
            Err(platform::StorageError::Missing(_)) => return None,
            Err(e) => {
                log::warn!("Ignoring stored profile: {}", e);
                return None;
            }
        };
        if !profile.registered || profile.name.trim().is_empty() || profile.role.trim().is_empty() {
            log::warn!("Ignoring incomplete stored profile");
            return None;
        }
        Some(profile)
    }

    /// Load the profile saved by a previous session
    pub fn load() -> Option<Self> {
        let profile = Self::from_stored(platform::read_raw(Self::STORAGE_KEY).as_deref());
        match &profile {
            Some(p) => log::info!("Welcome back, {} ({})", p.name, p.role),
            None => log::info!("No registered player, showing registration"),
        }
        profile
    }

    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, self);
        log::info!("Registered {} ({})", self.name, self.role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_trims_and_validates() {
        let p = PlayerProfile::register("  Anna ", " accountant ").unwrap();
        assert_eq!(p.name, "Anna");
        assert_eq!(p.role, "accountant");
        assert!(p.registered);

        assert_eq!(
            PlayerProfile::register("   ", "dev"),
            Err(RegistrationError::MissingName)
        );
        assert_eq!(
            PlayerProfile::register("Bo", ""),
            Err(RegistrationError::MissingRole)
        );
    }

    #[test]
    fn test_stored_profile_round_trips_wire_names() {
        let p = PlayerProfile::register("Anna", "CFO").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""position":"CFO""#));
        assert_eq!(PlayerProfile::from_stored(Some(&json)), Some(p));
    }

    #[test]
    fn test_malformed_profile_treated_as_absent() {
        assert_eq!(PlayerProfile::from_stored(None), None);
        assert_eq!(PlayerProfile::from_stored(Some("not json")), None);
        assert_eq!(PlayerProfile::from_stored(Some(r#"{"name":"A"}"#)), None);
        assert_eq!(
            PlayerProfile::from_stored(Some(r#"{"name":"","position":"x","registered":true}"#)),
            None
        );
        assert_eq!(
            PlayerProfile::from_stored(Some(r#"{"name":"A","position":"x","registered":false}"#)),
            None
        );
    }
}
