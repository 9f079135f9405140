//! Phase 2: Decode per-device neighbor dumps into normalized records.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::{NeighborRecord, SkippedEntry};
use crate::error::{GraphError, Result};

/// A key layout for the remote end of an LLDP neighbor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteSchema {
    pub name: &'static str,
    pub system_key: &'static str,
    pub port_key: &'static str,
}

impl RemoteSchema {
    /// Pull `(remote_device, remote_interface)` out of a descriptor, if both keys hold strings.
    pub fn extract(&self, descriptor: &Map<String, Value>) -> Option<(String, String)> {
        let system = descriptor.get(self.system_key)?.as_str()?;
        let port = descriptor.get(self.port_key)?.as_str()?;
        Some((system.to_string(), port.to_string()))
    }
}

/// Known descriptor layouts, tried in order.
pub const REMOTE_SCHEMAS: &[RemoteSchema] = &[
    RemoteSchema {
        name: "lldp_detail",
        system_key: "remote_system_name",
        port_key: "remote_port_description",
    },
    RemoteSchema {
        name: "lldp_brief",
        system_key: "hostname",
        port_key: "port",
    },
];

/// Find the first schema that matches a remote descriptor, with the extracted endpoint.
pub fn match_remote(descriptor: &Value) -> Option<(&'static RemoteSchema, (String, String))> {
    let obj = descriptor.as_object()?;
    REMOTE_SCHEMAS
        .iter()
        .find_map(|schema| schema.extract(obj).map(|endpoint| (schema, endpoint)))
}

/// Normalize one remote descriptor with the first schema that matches.
pub fn normalize_remote(descriptor: &Value) -> Option<(String, String)> {
    match_remote(descriptor).map(|(_, endpoint)| endpoint)
}

/// Records decoded from one device file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub device: String,
    pub records: Vec<NeighborRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Read and decode one device file. The device name is the file stem.
pub fn parse_neighbor_file(path: &Path) -> Result<ParsedFile> {
    let device = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GraphError::schema(path, "file name has no stem to use as device name"))?;

    let content = std::fs::read_to_string(path).map_err(|source| GraphError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_neighbor_str(path, &device, &content)
}

/// Decode file content already in memory.
///
/// The top level must be an object whose values are all arrays, otherwise the
/// whole file is rejected. Inside that shape, each interface whose first
/// descriptor matches no known schema is skipped and reported.
pub fn parse_neighbor_str(path: &Path, device: &str, content: &str) -> Result<ParsedFile> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| GraphError::schema(path, format!("invalid JSON: {e}")))?;

    let Value::Object(interfaces) = value else {
        return Err(GraphError::schema(path, "top level is not an object"));
    };

    if let Some((interface, _)) = interfaces.iter().find(|(_, v)| !v.is_array()) {
        return Err(GraphError::schema(
            path,
            format!("neighbors of interface '{interface}' are not a list"),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (interface, neighbors) in &interfaces {
        // Only the first neighbor counts; entries seen through a hub collapse to one link.
        let first = neighbors.as_array().and_then(|list| list.first());

        let reason = match first.map(match_remote) {
            Some(Some((schema, (target_device, target_interface)))) => {
                debug!(
                    "{} {}: {} schema -> {}_{}",
                    path.display(),
                    interface,
                    schema.name,
                    target_device,
                    target_interface
                );
                records.push(NeighborRecord {
                    source_device: device.to_string(),
                    source_interface: interface.clone(),
                    target_device,
                    target_interface,
                });
                continue;
            }
            Some(None) => "remote descriptor matches no known schema",
            None => "neighbor list is empty",
        };

        warn!(
            "Skipping interface '{}' in {}: {}",
            interface,
            path.display(),
            reason
        );
        skipped.push(SkippedEntry {
            path: path.to_string_lossy().to_string(),
            interface: interface.clone(),
            reason: reason.to_string(),
        });
    }

    Ok(ParsedFile {
        path: path.to_path_buf(),
        device: device.to_string(),
        records,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(content: &str) -> Result<ParsedFile> {
        parse_neighbor_str(Path::new("r1.json"), "r1", content)
    }

    #[test]
    fn detail_schema_is_normalized() {
        let d = json!({"remote_system_name": "r2", "remote_port_description": "eth1"});
        assert_eq!(
            normalize_remote(&d),
            Some(("r2".to_string(), "eth1".to_string()))
        );
    }

    #[test]
    fn brief_schema_is_the_fallback() {
        let d = json!({"hostname": "r2", "port": "eth1", "extra": 3});
        assert_eq!(
            normalize_remote(&d),
            Some(("r2".to_string(), "eth1".to_string()))
        );
    }

    #[test]
    fn half_detail_falls_back_to_brief() {
        let d = json!({"remote_system_name": "ignored", "hostname": "r2", "port": "eth1"});
        assert_eq!(
            normalize_remote(&d),
            Some(("r2".to_string(), "eth1".to_string()))
        );
    }

    #[test]
    fn detail_wins_over_brief() {
        let d = json!({
            "remote_system_name": "a", "remote_port_description": "p1",
            "hostname": "b", "port": "p2"
        });
        assert_eq!(normalize_remote(&d), Some(("a".to_string(), "p1".to_string())));
    }

    #[test]
    fn matched_schema_is_reported() {
        let (schema, _) = match_remote(&json!({"hostname": "r2", "port": "eth1"})).unwrap();
        assert_eq!(schema.name, "lldp_brief");
        let (schema, _) = match_remote(
            &json!({"remote_system_name": "r2", "remote_port_description": "eth1"}),
        )
        .unwrap();
        assert_eq!(schema.name, "lldp_detail");
    }

    #[test]
    fn unknown_or_non_string_descriptors_do_not_match() {
        assert_eq!(normalize_remote(&json!({"chassis_id": "x"})), None);
        assert_eq!(normalize_remote(&json!({"hostname": 7, "port": "x"})), None);
        assert_eq!(normalize_remote(&json!("r2")), None);
    }

    #[test]
    fn only_first_neighbor_is_used() {
        let parsed = parse(
            r#"{"eth0": [
                {"hostname": "r2", "port": "eth1"},
                {"hostname": "r3", "port": "eth9"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].target_device, "r2");
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let parsed = parse(
            r#"{
                "eth0": [{"remote_system_name": "r2", "remote_port_description": "eth1"}],
                "eth1": [],
                "eth2": [{"mac": "00:11:22:33:44:55"}],
                "eth3": [{"hostname": "r3", "port": "ge-0/0/0"}]
            }"#,
        )
        .unwrap();
        let sources: Vec<_> = parsed
            .records
            .iter()
            .map(|r| r.source_interface.as_str())
            .collect();
        assert_eq!(sources, vec!["eth0", "eth3"]);
        let skipped: Vec<_> = parsed.skipped.iter().map(|s| s.interface.as_str()).collect();
        assert_eq!(skipped, vec!["eth1", "eth2"]);
        assert_eq!(parsed.skipped[0].reason, "neighbor list is empty");
    }

    #[test]
    fn interface_order_follows_the_file() {
        let parsed = parse(
            r#"{
                "xe-9": [{"hostname": "a", "port": "1"}],
                "ae-1": [{"hostname": "b", "port": "2"}]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.records[0].source_interface, "xe-9");
        assert_eq!(parsed.records[1].source_interface, "ae-1");
    }

    #[test]
    fn wrong_top_level_shapes_reject_the_file() {
        assert!(matches!(parse("[1, 2]"), Err(GraphError::Schema { .. })));
        assert!(matches!(parse("{not json"), Err(GraphError::Schema { .. })));
        assert!(matches!(
            parse(r#"{"eth0": {"hostname": "r2"}}"#),
            Err(GraphError::Schema { .. })
        ));
    }

    #[test]
    fn empty_object_yields_no_records() {
        let parsed = parse("{}").unwrap();
        assert_eq!(parsed.device, "r1");
        assert_eq!(parsed.path, Path::new("r1.json"));
        assert!(parsed.records.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = parse_neighbor_file(Path::new("/no/such/r9.json")).unwrap_err();
        assert!(matches!(err, GraphError::FileRead { .. }));
    }
}
