//! Redaction policy toggles

use serde::{Deserialize, Serialize};

/// One boolean toggle per sensitive-field category. Constructed once per
/// generation run from configuration and read-only thereafter. Everything
/// defaults to off: redaction is explicitly opt-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionPolicy {
    #[serde(default)]
    pub redact_mac_addresses: bool,

    #[serde(default)]
    pub redact_hardware_serials: bool,

    #[serde(default)]
    pub redact_api_tokens: bool,

    #[serde(default)]
    pub redact_cpu_flags: bool,

    #[serde(default)]
    pub redact_usernames: bool,

    #[serde(default)]
    pub redact_email_addresses: bool,
}

impl RedactionPolicy {
    /// Policy with every rule enabled, for fully public output.
    pub fn redact_all() -> Self {
        Self {
            redact_mac_addresses: true,
            redact_hardware_serials: true,
            redact_api_tokens: true,
            redact_cpu_flags: true,
            redact_usernames: true,
            redact_email_addresses: true,
        }
    }

    /// True iff at least one rule is enabled.
    pub fn any_enabled(&self) -> bool {
        self.redact_mac_addresses
            || self.redact_hardware_serials
            || self.redact_api_tokens
            || self.redact_cpu_flags
            || self.redact_usernames
            || self.redact_email_addresses
    }

    /// Human-readable names of the enabled rules, in fixed display order.
    /// Used for the disclosure note in generated documents.
    pub fn summary(&self) -> Vec<&'static str> {
        let mut summary = Vec::new();
        if self.redact_mac_addresses {
            summary.push("MAC addresses");
        }
        if self.redact_hardware_serials {
            summary.push("Hardware serial numbers and WWN");
        }
        if self.redact_api_tokens {
            summary.push("API token IDs");
        }
        if self.redact_cpu_flags {
            summary.push("CPU flags and capabilities");
        }
        if self.redact_usernames {
            summary.push("Usernames (except root)");
        }
        if self.redact_email_addresses {
            summary.push("Email addresses");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_inert() {
        let policy = RedactionPolicy::default();
        assert!(!policy.any_enabled());
        assert!(policy.summary().is_empty());
    }

    #[test]
    fn summary_order_is_fixed() {
        let policy = RedactionPolicy::redact_all();
        assert_eq!(
            policy.summary(),
            vec![
                "MAC addresses",
                "Hardware serial numbers and WWN",
                "API token IDs",
                "CPU flags and capabilities",
                "Usernames (except root)",
                "Email addresses",
            ]
        );
    }

    #[test]
    fn deserializes_with_partial_toggles() {
        let policy: RedactionPolicy =
            serde_json::from_str(r#"{"redact_mac_addresses": true}"#).unwrap();
        assert!(policy.redact_mac_addresses);
        assert!(!policy.redact_usernames);
        assert!(policy.any_enabled());
    }
}
