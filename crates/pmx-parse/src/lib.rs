//! Parsers for the compact config-string encodings used by the PVE API
//!
//! Compound attributes (disks, NICs, container mount points) arrive as a
//! single comma-delimited string: one positional primary segment followed by
//! `key=value` options, e.g. `local-lvm:vm-100-disk-0,size=32G` or
//! `virtio=BC:24:11:2E:F4:A0,bridge=vmbr0`.
//!
//! Decoding is best-effort by design: malformed segments are silently
//! dropped and a partial mapping is returned, because document generation
//! must never hard-fail on one odd field. Values are kept verbatim as
//! strings; callers interpret types downstream.

use pmx_core::Record;
use serde_json::Value;

/// Decode a disk or mount-point string (`storage:volume,key=value,...`).
///
/// The first segment splits once on the first `:` into `storage` and
/// `volume`; with no `:` the whole segment becomes `volume` and `storage` is
/// absent. Remaining segments contribute `key=value` pairs; when a key
/// repeats, the last value wins.
pub fn decode_disk(disk: &str) -> Record {
    let mut result = Record::new();
    let mut segments = disk.split(',');

    // First segment is storage:volume
    if let Some(primary) = segments.next() {
        match primary.split_once(':') {
            Some((storage, volume)) => {
                result.insert("storage".to_string(), Value::String(storage.to_string()));
                result.insert("volume".to_string(), Value::String(volume.to_string()));
            }
            None => {
                result.insert("volume".to_string(), Value::String(primary.to_string()));
            }
        }
    }

    decode_options(segments, &mut result);
    result
}

/// Decode a network interface string (`model=macaddr,key=value,...`).
///
/// Same grammar as [`decode_disk`] except the primary segment splits on the
/// first `=` into `model` and `macaddr`; a primary segment without `=`
/// produces neither key. The MAC itself legitimately contains `:` and is not
/// parsed further.
pub fn decode_network(net: &str) -> Record {
    let mut result = Record::new();
    let mut segments = net.split(',');

    // First segment is model=macaddr
    if let Some(primary) = segments.next() {
        if let Some((model, macaddr)) = primary.split_once('=') {
            result.insert("model".to_string(), Value::String(model.to_string()));
            result.insert("macaddr".to_string(), Value::String(macaddr.to_string()));
        }
    }

    decode_options(segments, &mut result);
    result
}

/// Decode an LXC network interface string.
///
/// Container NIC strings have no positional primary: every segment is
/// `key=value` (`name=eth0,bridge=vmbr0,hwaddr=AA:...,ip=dhcp`). Keys and
/// values are trimmed; segments without `=` are dropped.
pub fn decode_ct_network(net: &str) -> Record {
    let mut result = Record::new();
    for segment in net.split(',') {
        if let Some((key, value)) = segment.split_once('=') {
            result.insert(
                key.trim().to_string(),
                Value::String(value.trim().to_string()),
            );
        }
    }
    result
}

/// Parse a semicolon-separated tag string into individual tags.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trailing `key=value` segments. Segments without `=` are dropped; only the
/// first `=` splits, so values may contain `=` or `:`.
fn decode_options<'a>(segments: impl Iterator<Item = &'a str>, result: &mut Record) {
    for segment in segments {
        if let Some((key, value)) = segment.split_once('=') {
            result.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
        record.get(key).and_then(Value::as_str)
    }

    #[test]
    fn disk_with_storage_and_options() {
        let parsed = decode_disk("local-lvm:vm-100-disk-0,size=32G");
        assert_eq!(get(&parsed, "storage"), Some("local-lvm"));
        assert_eq!(get(&parsed, "volume"), Some("vm-100-disk-0"));
        assert_eq!(get(&parsed, "size"), Some("32G"));
    }

    #[test]
    fn iso_volume_keeps_inner_path() {
        let parsed = decode_disk("local:iso/debian.iso,media=cdrom");
        assert_eq!(get(&parsed, "storage"), Some("local"));
        assert_eq!(get(&parsed, "volume"), Some("iso/debian.iso"));
        assert_eq!(get(&parsed, "media"), Some("cdrom"));
    }

    #[test]
    fn disk_without_storage_prefix() {
        let parsed = decode_disk("novolume");
        assert_eq!(get(&parsed, "volume"), Some("novolume"));
        assert!(!parsed.contains_key("storage"));
    }

    #[test]
    fn empty_disk_string_keeps_empty_volume() {
        let parsed = decode_disk("");
        assert_eq!(get(&parsed, "volume"), Some(""));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn malformed_segments_are_dropped() {
        let parsed = decode_disk("local-lvm:vm-1-disk-0,garbage,size=8G");
        assert_eq!(get(&parsed, "size"), Some("8G"));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let parsed = decode_disk("local:vm-1-disk-0,size=8G,size=16G");
        assert_eq!(get(&parsed, "size"), Some("16G"));
        // Position of the key is where it was first seen
        let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["storage", "volume", "size"]);
    }

    #[test]
    fn network_with_mac_and_options() {
        let parsed = decode_network("virtio=BC:24:11:2E:F4:A0,bridge=vmbr0,firewall=1");
        assert_eq!(get(&parsed, "model"), Some("virtio"));
        assert_eq!(get(&parsed, "macaddr"), Some("BC:24:11:2E:F4:A0"));
        assert_eq!(get(&parsed, "bridge"), Some("vmbr0"));
        assert_eq!(get(&parsed, "firewall"), Some("1"));
    }

    #[test]
    fn network_primary_without_equals_yields_nothing() {
        let parsed = decode_network("virtio");
        assert!(parsed.is_empty());

        let parsed = decode_network("");
        assert!(parsed.is_empty());
    }

    #[test]
    fn values_are_not_coerced() {
        let parsed = decode_network("virtio=AA:BB:CC:DD:EE:FF,firewall=1,mtu=1500");
        assert_eq!(get(&parsed, "firewall"), Some("1"));
        assert_eq!(get(&parsed, "mtu"), Some("1500"));
    }

    #[test]
    fn value_may_contain_equals() {
        let parsed = decode_disk("local:vm-1-disk-0,serial=ab=cd");
        assert_eq!(get(&parsed, "serial"), Some("ab=cd"));
    }

    #[test]
    fn mount_point_uses_disk_grammar() {
        let parsed = decode_disk("local-lvm:vm-101-disk-1,mp=/mnt/data,size=8G");
        assert_eq!(get(&parsed, "storage"), Some("local-lvm"));
        assert_eq!(get(&parsed, "mp"), Some("/mnt/data"));
        assert_eq!(get(&parsed, "size"), Some("8G"));
    }

    #[test]
    fn ct_network_has_no_primary_segment() {
        let parsed = decode_ct_network("name=eth0, bridge=vmbr0 ,hwaddr=AA:BB:CC:DD:EE:FF,ip=dhcp");
        assert_eq!(get(&parsed, "name"), Some("eth0"));
        assert_eq!(get(&parsed, "bridge"), Some("vmbr0"));
        assert_eq!(get(&parsed, "hwaddr"), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(get(&parsed, "ip"), Some("dhcp"));
        assert!(decode_ct_network("").is_empty());
    }

    #[test]
    fn tags_split_and_trim() {
        assert_eq!(parse_tags("web; prod ;db"), vec!["web", "prod", "db"]);
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags(";;"), Vec::<String>::new());
    }
}
