// Authentication options.

use carhub_core::CarHubConfigSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOptions {
    /// bcrypt cost used when hashing new passwords.
    pub hash_cost: u32,
    pub min_password_len: usize,
    /// Message returned for any failed sign-in, so callers cannot probe
    /// which of email/password was wrong.
    pub error_message: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            hash_cost: 10,
            min_password_len: 6,
            error_message: "Invalid login".to_string(),
        }
    }
}

impl AuthOptions {
    /// Reads `auth.hash_cost` and `auth.min_password_len`.
    pub fn from_config(config: &CarHubConfigSnapshot) -> Self {
        let mut options = Self::default();
        match config.get_usize("auth.hash_cost").map(u32::try_from) {
            Some(Ok(cost)) => options.hash_cost = cost,
            Some(Err(_)) => tracing::warn!("auth.hash_cost out of range, keeping the default"),
            None => {}
        }
        if let Some(len) = config.get_usize("auth.min_password_len") {
            options.min_password_len = len;
        }
        options
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        // bcrypt accepts costs in 4..=31.
        if !(4..=31).contains(&self.hash_cost) {
            return Err(format!("auth.hash_cost must be between 4 and 31, got {}", self.hash_cost));
        }
        if self.min_password_len == 0 {
            return Err("auth.min_password_len must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carhub_core::CarHubConfig;

    #[test]
    fn config_overrides_defaults() {
        let mut config = CarHubConfig::new();
        config.set("auth.hash_cost", "4");

        let options = AuthOptions::from_config(&config.snapshot());
        assert_eq!(options.hash_cost, 4);
        assert_eq!(options.min_password_len, 6);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn oversized_cost_keeps_the_default() {
        let mut config = CarHubConfig::new();
        config.set("auth.hash_cost", "4294967300");

        let options = AuthOptions::from_config(&config.snapshot());
        assert_eq!(options.hash_cost, 10);
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        assert!(AuthOptions::default().with_hash_cost(3).validate().is_err());
        assert!(AuthOptions::default().with_hash_cost(32).validate().is_err());
    }
}
