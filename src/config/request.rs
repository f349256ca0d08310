//! Plan request configuration
//!
//! A [`PlanRequest`] carries the raw, colon-separated input lists exactly
//! as they arrive from the command line or a TOML file. Splitting them
//! into structured form happens here, on the way into the core; the core
//! itself never sees delimited strings.

use crate::disk::volumes::VolumeSpec;
use crate::utils::error::{Result, VolplanError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_disk_size() -> String {
    "10GiB".to_string()
}

fn default_volumes() -> String {
    "lv_root=:lv_swap=952:lv_home=300:lv_tmp=300:lv_var=300:lv_log=300".to_string()
}

fn default_filesystems() -> String {
    "lv_root=ext4:lv_swap=swap:lv_home=ext4:lv_tmp=ext4:lv_var=ext4:lv_log=ext4".to_string()
}

fn default_mounts() -> String {
    "lv_root=/:lv_swap=none:lv_home=/home:lv_tmp=/tmp:lv_var=/var:lv_log=/var/log".to_string()
}

fn default_mount_options() -> String {
    "lv_tmp=rw,nosuid,nodev".to_string()
}

fn default_volume_group() -> String {
    "vg_main".to_string()
}

fn default_thin_pool() -> String {
    "pool00".to_string()
}

/// One layout planning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Total disk size, e.g. "10GiB"
    #[serde(default = "default_disk_size")]
    pub disk_size: String,

    /// Colon-separated `name=size_mib` pairs; an empty size marks the
    /// volume that fills the remaining pool space
    #[serde(default = "default_volumes")]
    pub volumes: String,

    /// Colon-separated `name=filesystem` pairs
    #[serde(default = "default_filesystems")]
    pub filesystems: String,

    /// Colon-separated `name=mount_point` pairs
    #[serde(default = "default_mounts")]
    pub mounts: String,

    /// Colon-separated `name=options` pairs; unlisted volumes get the
    /// default options
    #[serde(default = "default_mount_options")]
    pub mount_options: String,

    /// LVM volume group name
    #[serde(default = "default_volume_group")]
    pub volume_group: String,

    /// Thin pool name inside the volume group
    #[serde(default = "default_thin_pool")]
    pub thin_pool: String,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            disk_size: default_disk_size(),
            volumes: default_volumes(),
            filesystems: default_filesystems(),
            mounts: default_mounts(),
            mount_options: default_mount_options(),
            volume_group: default_volume_group(),
            thin_pool: default_thin_pool(),
        }
    }
}

impl PlanRequest {
    /// Load a request from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Sample request for `generate-config`.
    pub fn sample() -> Self {
        Self::default()
    }

    /// Parse the volume list into an ordered [`VolumeSpec`].
    pub fn volume_spec(&self) -> Result<VolumeSpec> {
        let mut spec = VolumeSpec::new();
        for (name, value) in split_pairs(&self.volumes)? {
            let size_mib = if value.is_empty() {
                None
            } else {
                Some(value.parse::<u64>().map_err(|_| {
                    VolplanError::InvalidFormat(format!("{}={}", name, value))
                })?)
            };
            spec.push(name, size_mib)?;
        }
        Ok(spec)
    }

    pub fn filesystem_map(&self) -> Result<HashMap<String, String>> {
        lookup_map(&self.filesystems)
    }

    pub fn mount_map(&self) -> Result<HashMap<String, String>> {
        lookup_map(&self.mounts)
    }

    pub fn mount_option_map(&self) -> Result<HashMap<String, String>> {
        lookup_map(&self.mount_options)
    }

    /// Parse every list once, surfacing input errors before any layout
    /// computation runs.
    pub fn validate(&self) -> Result<()> {
        let spec = self.volume_spec()?;
        if spec.is_empty() {
            return Err(VolplanError::ConfigError(
                "At least one volume must be specified".to_string(),
            ));
        }
        self.filesystem_map()?;
        self.mount_map()?;
        self.mount_option_map()?;
        Ok(())
    }
}

/// Split a colon-separated `name=value` list into pairs.
///
/// An empty input yields no pairs. The value may be empty; the name may
/// not.
fn split_pairs(input: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    if input.is_empty() {
        return Ok(pairs);
    }
    for item in input.split(':') {
        let (name, value) = item
            .split_once('=')
            .ok_or_else(|| VolplanError::InvalidFormat(item.to_string()))?;
        if name.is_empty() {
            return Err(VolplanError::InvalidFormat(item.to_string()));
        }
        pairs.push((name.to_string(), value.to_string()));
    }
    Ok(pairs)
}

/// Build a name → value lookup from a colon-separated list.
fn lookup_map(input: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for (name, value) in split_pairs(input)? {
        if map.insert(name.clone(), value).is_some() {
            return Err(VolplanError::ConfigError(format!(
                "Duplicate entry '{}'",
                name
            )));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_parses_cleanly() {
        let request = PlanRequest::default();
        request.validate().unwrap();

        let spec = request.volume_spec().unwrap();
        assert_eq!(spec.len(), 6);
        let entries: Vec<_> = spec.iter().collect();
        assert_eq!(entries[0], ("lv_root", None));
        assert_eq!(entries[1], ("lv_swap", Some(952)));
        assert_eq!(entries[5], ("lv_log", Some(300)));
    }

    #[test]
    fn volume_spec_preserves_order() {
        let request = PlanRequest {
            volumes: "c=8:a=4:b=".to_string(),
            ..Default::default()
        };
        let names: Vec<_> = request
            .volume_spec()
            .unwrap()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn malformed_pair_is_invalid_format() {
        let request = PlanRequest {
            volumes: "lv_root=:noequals".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            request.volume_spec(),
            Err(VolplanError::InvalidFormat(_))
        ));
    }

    #[test]
    fn non_numeric_volume_size_is_invalid_format() {
        let request = PlanRequest {
            volumes: "lv_root=big".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            request.volume_spec(),
            Err(VolplanError::InvalidFormat(_))
        ));
    }

    #[test]
    fn duplicate_map_entries_are_rejected() {
        let request = PlanRequest {
            mounts: "lv_root=/:lv_root=/var".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            request.mount_map(),
            Err(VolplanError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_list_yields_empty_map() {
        let request = PlanRequest {
            mount_options: String::new(),
            ..Default::default()
        };
        assert!(request.mount_option_map().unwrap().is_empty());
    }

    #[test]
    fn toml_round_trip_keeps_fields() {
        let request = PlanRequest::sample();
        let rendered = toml::to_string_pretty(&request).unwrap();
        let reparsed: PlanRequest = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.disk_size, request.disk_size);
        assert_eq!(reparsed.volumes, request.volumes);
        assert_eq!(reparsed.volume_group, request.volume_group);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let reparsed: PlanRequest = toml::from_str("disk_size = \"20GiB\"").unwrap();
        assert_eq!(reparsed.disk_size, "20GiB");
        assert_eq!(reparsed.volumes, default_volumes());
        assert_eq!(reparsed.thin_pool, "pool00");
    }
}
