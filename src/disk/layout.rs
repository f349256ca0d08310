//! Partition and thin-pool layout sizing.
//!
//! Turns a disk size and a [`VolumeSpec`] into concrete MiB sizes for the
//! fixed partitions, the LVM root partition, the thin pool carved out of
//! it, and every logical volume. Single pass, pure, first error aborts.

use crate::disk::volumes::VolumeSpec;
use crate::utils::error::{Result, VolplanError};

/// GPT partition type GUIDs
pub mod partition_types {
    pub const EFI: &str = "C12A7328-F81F-11D2-BA4B-00A0C93EC93B";
    pub const BIOS_BOOT: &str = "21686148-6449-6E6F-744E-656564454649";
    pub const LINUX_FILESYSTEM: &str = "0FC63DAF-8483-4772-8E79-3D69D8477DE4";
    pub const LINUX_LVM: &str = "E6D6D379-F507-44C2-A23C-238F2A3DF928";
}

/// Fixed partition sizes (policy constants, not computed)
pub const EFI_MIB: u64 = 200;
pub const BIOS_BOOT_MIB: u64 = 8;
pub const BOOT_MIB: u64 = 500;

/// Reserved for GPT metadata and partition alignment slack.
pub const TABLE_OVERHEAD_MIB: u64 = 2;

/// Reserved inside the root partition for thin-pool metadata.
pub const POOL_METADATA_MIB: u64 = 20;

/// Allocation granularity: one LVM extent.
pub const EXTENT_MIB: u64 = 4;

/// Align value down to alignment boundary
pub fn floor_align(value: u64, align: u64) -> u64 {
    (value / align) * align
}

/// A single partition in the computed layout.
#[derive(Debug, Clone)]
pub struct PartitionDef {
    /// Partition number (1-based)
    pub number: u32,
    pub name: String,
    pub size_mib: u64,
    /// GPT type GUID
    pub type_guid: String,
    /// Filesystem created directly on the partition, if any
    pub filesystem: Option<String>,
    pub mount_point: Option<String>,
}

/// One logical volume with its resolved size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalVolume {
    pub name: String,
    pub size_mib: u64,
}

/// Fully resolved layout for one disk image.
#[derive(Debug, Clone)]
pub struct ComputedLayout {
    pub total_mib: u64,
    /// EFI, BIOS boot, /boot, and the LVM root partition, in disk order.
    pub partitions: Vec<PartitionDef>,
    /// Size of the LVM physical-volume (root) partition.
    pub root_mib: u64,
    /// Thin-pool data size: root minus pool metadata.
    pub pool_mib: u64,
    /// One entry per requested volume, in request order.
    pub logical_volumes: Vec<LogicalVolume>,
}

/// Compute the full layout for `disk_mib` and the requested volumes.
///
/// The root partition is the disk minus the fixed partitions and the
/// partition-table overhead; the thin pool is the root minus its metadata
/// reserve. Sized volumes must be whole extents. At most one volume may
/// omit its size; it receives the leftover pool space floored to the
/// extent boundary, with the sub-extent remainder discarded as slack.
pub fn compute_layout(disk_mib: u64, volumes: &VolumeSpec) -> Result<ComputedLayout> {
    let fixed_mib = EFI_MIB + BIOS_BOOT_MIB + BOOT_MIB;

    let root_mib = disk_mib
        .checked_sub(fixed_mib + TABLE_OVERHEAD_MIB)
        .ok_or_else(|| VolplanError::InsufficientDiskSize {
            context: "root partition".to_string(),
            required_mib: fixed_mib + TABLE_OVERHEAD_MIB,
            available_mib: disk_mib,
        })?;

    let pool_mib = root_mib
        .checked_sub(POOL_METADATA_MIB)
        .ok_or_else(|| VolplanError::InsufficientDiskSize {
            context: "thin pool".to_string(),
            required_mib: POOL_METADATA_MIB,
            available_mib: root_mib,
        })?;

    let mut total_specified = 0u64;
    let mut blank: Option<(usize, String)> = None;

    for (index, (name, size)) in volumes.iter().enumerate() {
        match size {
            Some(size_mib) => {
                if size_mib % EXTENT_MIB != 0 {
                    return Err(VolplanError::MisalignedSize {
                        volume: name.to_string(),
                        size_mib,
                        extent_mib: EXTENT_MIB,
                    });
                }
                total_specified += size_mib;
            }
            None => {
                if let Some((_, ref first)) = blank {
                    return Err(VolplanError::MultipleBlankVolumes {
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
                blank = Some((index, name.to_string()));
            }
        }
    }

    let mut logical_volumes: Vec<LogicalVolume> = volumes
        .iter()
        .map(|(name, size)| LogicalVolume {
            name: name.to_string(),
            size_mib: size.unwrap_or(0),
        })
        .collect();

    match blank {
        Some((index, name)) => {
            let remaining =
                pool_mib
                    .checked_sub(total_specified)
                    .ok_or_else(|| VolplanError::InsufficientDiskSize {
                        context: format!("volume '{}'", name),
                        required_mib: total_specified,
                        available_mib: pool_mib,
                    })?;
            logical_volumes[index].size_mib = floor_align(remaining, EXTENT_MIB);
        }
        None => {
            if total_specified > pool_mib {
                return Err(VolplanError::OverAllocatedPool {
                    requested_mib: total_specified,
                    pool_mib,
                });
            }
        }
    }

    let partitions = vec![
        PartitionDef {
            number: 1,
            name: "efi".to_string(),
            size_mib: EFI_MIB,
            type_guid: partition_types::EFI.to_string(),
            filesystem: Some("vfat".to_string()),
            mount_point: Some("/boot/efi".to_string()),
        },
        PartitionDef {
            number: 2,
            name: "bios_boot".to_string(),
            size_mib: BIOS_BOOT_MIB,
            type_guid: partition_types::BIOS_BOOT.to_string(),
            filesystem: None,
            mount_point: None,
        },
        PartitionDef {
            number: 3,
            name: "boot".to_string(),
            size_mib: BOOT_MIB,
            type_guid: partition_types::LINUX_FILESYSTEM.to_string(),
            filesystem: Some("ext4".to_string()),
            mount_point: Some("/boot".to_string()),
        },
        PartitionDef {
            number: 4,
            name: "root".to_string(),
            size_mib: root_mib,
            type_guid: partition_types::LINUX_LVM.to_string(),
            filesystem: None,
            mount_point: None,
        },
    ];

    Ok(ComputedLayout {
        total_mib: disk_mib,
        partitions,
        root_mib,
        pool_mib,
        logical_volumes,
    })
}
