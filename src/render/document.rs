//! Declarative layout document for the downstream image assembler.
//!
//! Field names and nesting are fixed by the consuming tool. Renaming or
//! restructuring anything here breaks compatibility.

use crate::disk::layout::{ComputedLayout, POOL_METADATA_MIB};
use crate::disk::volumes::VolumeBinding;
use crate::utils::error::Result;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LayoutDocument {
    pub disk: DiskSection,
    pub lvm: LvmSection,
    pub filesystems: Vec<FilesystemEntry>,
}

#[derive(Debug, Serialize)]
pub struct DiskSection {
    pub size_mib: u64,
    pub table: String,
    /// GPT disk label identifier
    pub label_id: String,
    pub partitions: Vec<PartitionEntry>,
}

#[derive(Debug, Serialize)]
pub struct PartitionEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_guid: String,
    pub size_mib: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LvmSection {
    /// Name of the partition acting as the physical volume
    pub physical_volume: String,
    pub volume_group: String,
    pub thin_pool: ThinPoolEntry,
    pub logical_volumes: Vec<LogicalVolumeEntry>,
}

#[derive(Debug, Serialize)]
pub struct ThinPoolEntry {
    pub name: String,
    pub size_mib: u64,
    pub metadata_mib: u64,
}

#[derive(Debug, Serialize)]
pub struct LogicalVolumeEntry {
    pub name: String,
    pub size_mib: u64,
}

#[derive(Debug, Serialize)]
pub struct FilesystemEntry {
    pub volume: String,
    pub filesystem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub mount: String,
    pub options: String,
    pub fsck_pass: u8,
}

impl LayoutDocument {
    /// Assemble the document from a computed layout and its bindings.
    pub fn new(
        layout: &ComputedLayout,
        bindings: &[VolumeBinding],
        volume_group: &str,
        thin_pool: &str,
    ) -> Self {
        let partitions = layout
            .partitions
            .iter()
            .map(|partition| PartitionEntry {
                name: partition.name.clone(),
                type_guid: partition.type_guid.clone(),
                size_mib: partition.size_mib,
                filesystem: partition.filesystem.clone(),
                mount: partition.mount_point.clone(),
            })
            .collect();

        let logical_volumes = layout
            .logical_volumes
            .iter()
            .map(|volume| LogicalVolumeEntry {
                name: volume.name.clone(),
                size_mib: volume.size_mib,
            })
            .collect();

        let filesystems = bindings
            .iter()
            .map(|binding| FilesystemEntry {
                volume: binding.volume.clone(),
                filesystem: binding.filesystem.clone(),
                label: binding.label.clone(),
                mount: binding.mount_point.clone(),
                options: binding.mount_options.clone(),
                fsck_pass: binding.fsck_pass,
            })
            .collect();

        LayoutDocument {
            disk: DiskSection {
                size_mib: layout.total_mib,
                table: "gpt".to_string(),
                label_id: Uuid::new_v4().to_string(),
                partitions,
            },
            lvm: LvmSection {
                physical_volume: "root".to_string(),
                volume_group: volume_group.to_string(),
                thin_pool: ThinPoolEntry {
                    name: thin_pool.to_string(),
                    size_mib: layout.pool_mib,
                    metadata_mib: POOL_METADATA_MIB,
                },
                logical_volumes,
            },
            filesystems,
        }
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
