//! Field and record redaction

use std::collections::HashMap;
use std::sync::Mutex;

use pmx_core::Record;
use serde_json::Value;

use crate::policy::RedactionPolicy;

/// Sentinel for redacted MAC addresses.
pub const MAC_SENTINEL: &str = "XX:XX:XX:XX:XX:XX";

/// Sentinel for redacted serials, WWNs, token IDs and email addresses.
pub const REDACTED: &str = "REDACTED";

/// Replacement message for redacted CPU flag lists. Discloses existence
/// only, never the flags themselves.
pub const CPU_FLAGS_NOTICE: &str = "Available (details redacted for public documentation)";

/// Record alias keys that may carry a MAC address.
const MAC_KEYS: [&str; 4] = ["hwaddr", "mac", "macaddr", "hardware-address"];

#[derive(Debug, Default)]
struct PseudonymMap {
    assigned: HashMap<String, String>,
    counter: u64,
}

/// Applies the configured redaction rules to fields and records.
///
/// One instance is scoped to a single generation run. The pseudonym map is
/// the only mutable state; it sits behind a mutex so the redactor can be
/// shared via `Arc` across generators while keeping the same-username ->
/// same-pseudonym guarantee.
pub struct Redactor {
    policy: RedactionPolicy,
    pseudonyms: Mutex<PseudonymMap>,
}

impl Redactor {
    pub fn new(policy: RedactionPolicy) -> Self {
        Self {
            policy,
            pseudonyms: Mutex::new(PseudonymMap::default()),
        }
    }

    /// True iff at least one policy flag is enabled.
    pub fn should_redact_anything(&self) -> bool {
        self.policy.any_enabled()
    }

    /// Human-readable names of the enabled rules, for disclosure notes.
    pub fn redaction_summary(&self) -> Vec<&'static str> {
        self.policy.summary()
    }

    /// Redact a MAC address ("aa:bb:cc:dd:ee:ff").
    pub fn redact_mac(&self, mac: &str) -> String {
        if mac.is_empty() || !self.policy.redact_mac_addresses {
            return mac.to_string();
        }
        MAC_SENTINEL.to_string()
    }

    /// Redact a hardware serial number.
    pub fn redact_serial(&self, serial: &str) -> String {
        if serial.is_empty() || !self.policy.redact_hardware_serials {
            return serial.to_string();
        }
        REDACTED.to_string()
    }

    /// Redact a WWN identifier. Governed by the same flag as serials.
    pub fn redact_wwn(&self, wwn: &str) -> String {
        if wwn.is_empty() || !self.policy.redact_hardware_serials {
            return wwn.to_string();
        }
        REDACTED.to_string()
    }

    /// Redact a CPU flags string. The flags list is discarded entirely.
    pub fn redact_cpu_flags(&self, flags: &str) -> String {
        if flags.is_empty() || !self.policy.redact_cpu_flags {
            return flags.to_string();
        }
        CPU_FLAGS_NOTICE.to_string()
    }

    /// Redact an email address.
    pub fn redact_email(&self, email: &str) -> String {
        if email.is_empty() || !self.policy.redact_email_addresses {
            return email.to_string();
        }
        REDACTED.to_string()
    }

    /// Redact an API token ID.
    pub fn redact_token_id(&self, token_id: &str) -> String {
        if token_id.is_empty() || !self.policy.redact_api_tokens {
            return token_id.to_string();
        }
        REDACTED.to_string()
    }

    /// Redact a username ("john@pam") to a stable pseudonym.
    ///
    /// The same username always yields the same `user{N}@{realm}` pseudonym
    /// within one run; the counter only advances for genuinely new names.
    /// System accounts under `root@` are never pseudonymized, regardless of
    /// policy.
    pub fn redact_username(&self, username: &str) -> String {
        if username.is_empty() || !self.policy.redact_usernames {
            return username.to_string();
        }
        if username.starts_with("root@") {
            return username.to_string();
        }

        let mut map = self.pseudonyms.lock().expect("pseudonym map poisoned");
        if let Some(existing) = map.assigned.get(username) {
            return existing.clone();
        }

        let realm = match username.split_once('@') {
            Some((_, realm)) => realm,
            None => "pam",
        };
        map.counter += 1;
        let pseudonym = format!("user{}@{}", map.counter, realm);
        map.assigned
            .insert(username.to_string(), pseudonym.clone());
        // A pseudonym maps to itself, so re-redacting already-redacted
        // output never mints a fresh name.
        map.assigned.insert(pseudonym.clone(), pseudonym.clone());
        pseudonym
    }

    /// Redact MAC addresses in a network interface record, under every
    /// known alias key. Returns a shallow copy; the input is not mutated.
    pub fn redact_network_interface(&self, iface: &Record) -> Record {
        let mut redacted = iface.clone();
        for key in MAC_KEYS {
            self.replace_str(&mut redacted, key, |v| self.redact_mac(v));
        }
        redacted
    }

    /// Redact `serial` and `wwn` in a disk record.
    pub fn redact_disk_info(&self, disk: &Record) -> Record {
        let mut redacted = disk.clone();
        self.replace_str(&mut redacted, "serial", |v| self.redact_serial(v));
        self.replace_str(&mut redacted, "wwn", |v| self.redact_wwn(v));
        redacted
    }

    /// Redact `email` and `userid` in a user record.
    pub fn redact_user_info(&self, user: &Record) -> Record {
        let mut redacted = user.clone();
        self.replace_str(&mut redacted, "email", |v| self.redact_email(v));
        self.replace_str(&mut redacted, "userid", |v| self.redact_username(v));
        redacted
    }

    /// Redact `tokenid` and the owning `user` in an API token record.
    pub fn redact_token_info(&self, token: &Record) -> Record {
        let mut redacted = token.clone();
        self.replace_str(&mut redacted, "tokenid", |v| self.redact_token_id(v));
        self.replace_str(&mut redacted, "user", |v| self.redact_username(v));
        redacted
    }

    /// Apply `rule` to `record[key]` when present and a string. Non-string
    /// values pass through untouched (best-effort contract).
    fn replace_str(&self, record: &mut Record, key: &str, rule: impl Fn(&str) -> String) {
        if let Some(Value::String(value)) = record.get(key) {
            let replaced = rule(value);
            record.insert(key.to_string(), Value::String(replaced));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn all_on() -> Redactor {
        Redactor::new(RedactionPolicy::redact_all())
    }

    #[test]
    fn disabled_policy_passes_everything_through() {
        let redactor = Redactor::new(RedactionPolicy::default());
        assert_eq!(redactor.redact_mac("aa:bb:cc:dd:ee:ff"), "aa:bb:cc:dd:ee:ff");
        assert_eq!(redactor.redact_serial("S3RIAL"), "S3RIAL");
        assert_eq!(redactor.redact_wwn("0x5000c500a1b2c3d4"), "0x5000c500a1b2c3d4");
        assert_eq!(redactor.redact_cpu_flags("sse4_2 avx2"), "sse4_2 avx2");
        assert_eq!(redactor.redact_email("ops@example.com"), "ops@example.com");
        assert_eq!(redactor.redact_token_id("automation"), "automation");
        assert_eq!(redactor.redact_username("john@pve"), "john@pve");
        assert!(!redactor.should_redact_anything());
    }

    #[test]
    fn enabled_rules_emit_sentinels() {
        let redactor = all_on();
        assert_eq!(redactor.redact_mac("aa:bb:cc:dd:ee:ff"), MAC_SENTINEL);
        assert_eq!(redactor.redact_serial("S3RIAL"), REDACTED);
        assert_eq!(redactor.redact_wwn("0x5000c500a1b2c3d4"), REDACTED);
        assert_eq!(redactor.redact_cpu_flags("sse4_2 avx2"), CPU_FLAGS_NOTICE);
        assert_eq!(redactor.redact_email("ops@example.com"), REDACTED);
        assert_eq!(redactor.redact_token_id("automation"), REDACTED);
        assert!(redactor.should_redact_anything());
    }

    #[test]
    fn empty_values_pass_through() {
        let redactor = all_on();
        assert_eq!(redactor.redact_mac(""), "");
        assert_eq!(redactor.redact_username(""), "");
    }

    #[test]
    fn rules_are_idempotent() {
        let redactor = all_on();
        let once = redactor.redact_mac("aa:bb:cc:dd:ee:ff");
        assert_eq!(redactor.redact_mac(&once), once);

        let once = redactor.redact_serial("S3RIAL");
        assert_eq!(redactor.redact_serial(&once), once);

        let once = redactor.redact_username("john@pve");
        assert_eq!(redactor.redact_username(&once), once);
    }

    #[test]
    fn root_is_never_pseudonymized() {
        let redactor = all_on();
        assert_eq!(redactor.redact_username("root@pam"), "root@pam");
        assert_eq!(redactor.redact_username("root@pve"), "root@pve");
    }

    #[test]
    fn pseudonyms_are_stable_and_distinct() {
        let redactor = all_on();
        let john = redactor.redact_username("john@pve");
        let alice = redactor.redact_username("alice@pam");
        assert_eq!(redactor.redact_username("john@pve"), john);
        assert_eq!(redactor.redact_username("alice@pam"), alice);
        assert_ne!(john, alice);
    }

    #[test]
    fn issued_pseudonyms_survive_a_second_pass() {
        let redactor = all_on();
        let once = redactor.redact_username("john@pve");
        assert_eq!(redactor.redact_username(&once), once);
        // Re-redaction must not advance the counter
        assert_eq!(redactor.redact_username("alice@pve"), "user2@pve");
    }

    #[test]
    fn counter_advances_only_for_new_usernames() {
        let redactor = all_on();
        assert_eq!(redactor.redact_username("john@pve"), "user1@pve");
        assert_eq!(redactor.redact_username("john@pve"), "user1@pve");
        assert_eq!(redactor.redact_username("alice@pam"), "user2@pam");
        assert_eq!(redactor.redact_username("bob@ldap"), "user3@ldap");
    }

    #[test]
    fn realm_defaults_to_pam() {
        let redactor = all_on();
        assert_eq!(redactor.redact_username("legacyuser"), "user1@pam");
    }

    #[test]
    fn network_interface_macs_replaced_under_all_aliases() {
        let redactor = Redactor::new(RedactionPolicy {
            redact_mac_addresses: true,
            ..Default::default()
        });
        let iface = record(json!({
            "hwaddr": "AA:BB:CC:DD:EE:FF",
            "bridge": "vmbr0",
        }));
        let redacted = redactor.redact_network_interface(&iface);
        assert_eq!(redacted["hwaddr"], MAC_SENTINEL);
        assert_eq!(redacted["bridge"], "vmbr0");
        // input untouched
        assert_eq!(iface["hwaddr"], "AA:BB:CC:DD:EE:FF");

        let iface = record(json!({"macaddr": "BC:24:11:2E:F4:A0", "mac": "BC:24:11:2E:F4:A1"}));
        let redacted = redactor.redact_network_interface(&iface);
        assert_eq!(redacted["macaddr"], MAC_SENTINEL);
        assert_eq!(redacted["mac"], MAC_SENTINEL);
    }

    #[test]
    fn disk_serial_and_wwn_replaced() {
        let redactor = all_on();
        let disk = record(json!({
            "devpath": "/dev/nvme0n1",
            "serial": "PHAB1234",
            "wwn": "0x5000c500a1b2c3d4",
            "size": 1024,
        }));
        let redacted = redactor.redact_disk_info(&disk);
        assert_eq!(redacted["serial"], REDACTED);
        assert_eq!(redacted["wwn"], REDACTED);
        assert_eq!(redacted["devpath"], "/dev/nvme0n1");
        assert_eq!(redacted["size"], 1024);
    }

    #[test]
    fn user_and_token_records() {
        let redactor = all_on();
        let user = record(json!({"userid": "john@pve", "email": "john@example.com"}));
        let redacted = redactor.redact_user_info(&user);
        assert_eq!(redacted["userid"], "user1@pve");
        assert_eq!(redacted["email"], REDACTED);

        let token = record(json!({"tokenid": "automation", "user": "john@pve"}));
        let redacted = redactor.redact_token_info(&token);
        assert_eq!(redacted["tokenid"], REDACTED);
        // Same run, same user: pseudonym is consistent across record types
        assert_eq!(redacted["user"], "user1@pve");
    }

    #[test]
    fn absent_keys_and_non_strings_pass_through() {
        let redactor = all_on();
        let iface = record(json!({"bridge": "vmbr0", "mtu": 1500}));
        let redacted = redactor.redact_network_interface(&iface);
        assert_eq!(redacted, iface);

        let disk = record(json!({"serial": 12345}));
        let redacted = redactor.redact_disk_info(&disk);
        assert_eq!(redacted["serial"], 12345);
    }
}
