//! Ordered volume specifications and filesystem binding resolution.
//!
//! A [`VolumeSpec`] is the structured form of the `name=size` volume list:
//! an ordered mapping whose insertion order fixes both the output order and
//! which entry absorbs the remaining pool space. Filesystem, mount point,
//! and mount options are carried per volume as a [`VolumeBinding`],
//! independent of sizing.

use crate::utils::error::{Result, VolplanError};
use crate::utils::report::Reporter;
use std::collections::HashMap;

/// Mount options applied when a volume has no explicit entry.
pub const DEFAULT_MOUNT_OPTIONS: &str = "rw,relatime";

/// Filesystem label given to the volume mounted at `/`.
pub const ROOT_FS_LABEL: &str = "root";

/// Ordered mapping from volume name to an optional size in MiB.
///
/// At most one entry may omit its size; that entry receives all pool space
/// left over once every sized volume is accounted for.
#[derive(Debug, Clone, Default)]
pub struct VolumeSpec {
    entries: Vec<(String, Option<u64>)>,
}

impl VolumeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a volume. Names must be unique.
    pub fn push(&mut self, name: impl Into<String>, size_mib: Option<u64>) -> Result<()> {
        let name = name.into();
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(VolplanError::ConfigError(format!(
                "Duplicate volume name '{}'",
                name
            )));
        }
        self.entries.push((name, size_mib));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<u64>)> {
        self.entries.iter().map(|(name, size)| (name.as_str(), *size))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }
}

/// Resolved filesystem/mount metadata for one volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeBinding {
    pub volume: String,
    pub filesystem: String,
    pub mount_point: String,
    pub mount_options: String,
    /// Filesystem label. Only the root volume carries one.
    pub label: Option<String>,
    /// fsck pass ordinal: 1 for the root volume, 2 for everything else.
    pub fsck_pass: u8,
}

/// Resolve filesystem bindings for every volume that has one.
///
/// A volume listed in `filesystems` without a matching mount point is a
/// hard error. A volume with no filesystem mapping at all is permitted
/// (allocated but left unformatted); the reporter is told and resolution
/// continues. This asymmetry is intentional.
pub fn resolve_bindings(
    volumes: &VolumeSpec,
    filesystems: &HashMap<String, String>,
    mounts: &HashMap<String, String>,
    mount_options: &HashMap<String, String>,
    reporter: &dyn Reporter,
) -> Result<Vec<VolumeBinding>> {
    let mut bindings = Vec::new();

    for (name, _) in volumes.iter() {
        let filesystem = match filesystems.get(name) {
            Some(filesystem) => filesystem,
            None => {
                reporter.warn(&format!(
                    "Volume '{}' has no filesystem mapping; it will be allocated but not formatted",
                    name
                ));
                continue;
            }
        };

        let mount_point = mounts
            .get(name)
            .ok_or_else(|| VolplanError::MissingMountPoint(name.to_string()))?;

        let options = mount_options
            .get(name)
            .cloned()
            .unwrap_or_else(|| DEFAULT_MOUNT_OPTIONS.to_string());

        let is_root = mount_point == "/";
        bindings.push(VolumeBinding {
            volume: name.to_string(),
            filesystem: filesystem.clone(),
            mount_point: mount_point.clone(),
            mount_options: options,
            label: is_root.then(|| ROOT_FS_LABEL.to_string()),
            fsck_pass: if is_root { 1 } else { 2 },
        });
    }

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::report::BufferReporter;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_spec() -> VolumeSpec {
        let mut spec = VolumeSpec::new();
        spec.push("lv_root", None).unwrap();
        spec.push("lv_home", Some(300)).unwrap();
        spec.push("lv_scratch", Some(400)).unwrap();
        spec
    }

    #[test]
    fn push_rejects_duplicate_names() {
        let mut spec = VolumeSpec::new();
        spec.push("lv_root", None).unwrap();
        assert!(matches!(
            spec.push("lv_root", Some(100)),
            Err(VolplanError::ConfigError(_))
        ));
    }

    #[test]
    fn root_volume_gets_label_and_pass_one() {
        let reporter = BufferReporter::new();
        let bindings = resolve_bindings(
            &sample_spec(),
            &map(&[("lv_root", "ext4"), ("lv_home", "ext4")]),
            &map(&[("lv_root", "/"), ("lv_home", "/home")]),
            &map(&[]),
            &reporter,
        )
        .unwrap();

        assert_eq!(bindings[0].volume, "lv_root");
        assert_eq!(bindings[0].label.as_deref(), Some(ROOT_FS_LABEL));
        assert_eq!(bindings[0].fsck_pass, 1);
        assert_eq!(bindings[1].volume, "lv_home");
        assert_eq!(bindings[1].label, None);
        assert_eq!(bindings[1].fsck_pass, 2);
    }

    #[test]
    fn missing_mount_point_is_fatal() {
        let reporter = BufferReporter::new();
        let result = resolve_bindings(
            &sample_spec(),
            &map(&[("lv_home", "ext4")]),
            &map(&[]),
            &map(&[]),
            &reporter,
        );
        match result {
            Err(VolplanError::MissingMountPoint(volume)) => assert_eq!(volume, "lv_home"),
            other => panic!("expected MissingMountPoint, got {:?}", other),
        }
    }

    #[test]
    fn missing_filesystem_only_warns() {
        let reporter = BufferReporter::new();
        let bindings = resolve_bindings(
            &sample_spec(),
            &map(&[("lv_root", "ext4")]),
            &map(&[("lv_root", "/")]),
            &map(&[]),
            &reporter,
        )
        .unwrap();

        // lv_home and lv_scratch are skipped, not errors
        assert_eq!(bindings.len(), 1);
        let warnings = reporter.messages();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("lv_home"));
        assert!(warnings[1].contains("lv_scratch"));
    }

    #[test]
    fn mount_options_default_when_absent() {
        let reporter = BufferReporter::new();
        let bindings = resolve_bindings(
            &sample_spec(),
            &map(&[("lv_root", "ext4"), ("lv_home", "ext4")]),
            &map(&[("lv_root", "/"), ("lv_home", "/home")]),
            &map(&[("lv_home", "rw,noatime")]),
            &reporter,
        )
        .unwrap();

        assert_eq!(bindings[0].mount_options, DEFAULT_MOUNT_OPTIONS);
        assert_eq!(bindings[1].mount_options, "rw,noatime");
    }
}
