//! Disk Management style rules for partition operations
//!
//! Every check returns the [`DiskError`] whose message the user sees. None of
//! these functions mutate the layout; [`super::Disk`] calls them before
//! applying an operation.

use super::{Edge, Partition, PartitionKind};
use crate::error::DiskError;

/// Maximum characters in a volume label (FAT32 limit)
pub const MAX_LABEL_LENGTH: usize = 11;

/// Numeric limits the rules are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskLimits {
    pub min_partition_size_mb: u64,
    pub min_shrink_size_mb: u64,
    pub max_primary_partitions: usize,
}

impl Default for DiskLimits {
    fn default() -> Self {
        Self {
            min_partition_size_mb: super::size::MIN_PARTITION_SIZE_MB,
            min_shrink_size_mb: super::size::MIN_SHRINK_SIZE_MB,
            max_primary_partitions: super::size::MAX_PRIMARY_PARTITIONS,
        }
    }
}

pub fn validate_partition_size(size_mb: u64, limits: &DiskLimits) -> Result<(), DiskError> {
    if size_mb < limits.min_partition_size_mb {
        return Err(DiskError::SizeTooSmall {
            min_mb: limits.min_partition_size_mb,
        });
    }
    Ok(())
}

/// Check that `partition` can give up `shrink_mb`.
///
/// Only 80% of the free space is reclaimable; the rest is treated as
/// unmovable files.
pub fn validate_shrink(
    partition: &Partition,
    shrink_mb: u64,
    limits: &DiskLimits,
) -> Result<(), DiskError> {
    if partition.kind == PartitionKind::Unallocated {
        return Err(DiskError::NotAVolume);
    }

    let current_mb = partition.size_mb;

    if shrink_mb == 0 {
        return Err(DiskError::ShrinkZero);
    }

    if shrink_mb < limits.min_shrink_size_mb {
        return Err(DiskError::ShrinkTooSmall {
            min_mb: limits.min_shrink_size_mb,
        });
    }

    if shrink_mb >= current_mb {
        return Err(DiskError::ShrinkExceedsVolume);
    }

    if current_mb - shrink_mb < limits.min_partition_size_mb {
        return Err(DiskError::ShrinkBelowMinimum {
            max_shrink_mb: current_mb.saturating_sub(limits.min_partition_size_mb),
        });
    }

    let reclaimable_mb = partition.free_space_mb() * 8 / 10;
    if shrink_mb > reclaimable_mb {
        return Err(DiskError::UnmovableFiles {
            max_shrink_mb: reclaimable_mb,
        });
    }

    Ok(())
}

/// Check that the partition at `index` can grow by `extend_mb` into the
/// unallocated slot immediately after it.
///
/// Returns the space available in that slot. Passing `extend_mb == 0` only
/// checks adjacency, which is how the host decides whether to offer the
/// extend dialog at all.
pub fn validate_extend(
    partitions: &[Partition],
    index: usize,
    extend_mb: u64,
) -> Result<u64, DiskError> {
    validate_extend_from(partitions, index, extend_mb, Edge::End)
}

/// [`validate_extend`] for either side; `Edge::Start` grows into the
/// unallocated slot immediately before the volume.
pub fn validate_extend_from(
    partitions: &[Partition],
    index: usize,
    extend_mb: u64,
    edge: Edge,
) -> Result<u64, DiskError> {
    let partition = partitions.get(index).ok_or(DiskError::PartitionNotFound)?;
    if partition.kind == PartitionKind::Unallocated {
        return Err(DiskError::NotAVolume);
    }

    let neighbour = match edge {
        Edge::End => partitions.get(index + 1),
        Edge::Start => index.checked_sub(1).and_then(|i| partitions.get(i)),
    };
    let available_mb = match (neighbour, edge) {
        (Some(slot), _) if slot.kind == PartitionKind::Unallocated => slot.size_mb,
        (_, Edge::End) => return Err(DiskError::NoAdjacentSpace),
        (_, Edge::Start) => return Err(DiskError::NoAdjacentSpaceBefore),
    };

    if extend_mb > available_mb {
        return Err(DiskError::ExtendExceedsSpace {
            requested_mb: extend_mb,
            available_mb,
        });
    }

    Ok(available_mb)
}

/// Like [`validate_extend_from`] but also rejects a zero-sized request.
pub fn validate_extend_request(
    partitions: &[Partition],
    index: usize,
    extend_mb: u64,
    edge: Edge,
) -> Result<u64, DiskError> {
    let available_mb = validate_extend_from(partitions, index, extend_mb, edge)?;
    if extend_mb == 0 {
        return Err(DiskError::ExtendZero);
    }
    Ok(available_mb)
}

/// Check that a new partition of `size_mb` and `kind` fits on the disk.
///
/// Returns the total unallocated space.
pub fn validate_create(
    partitions: &[Partition],
    size_mb: u64,
    kind: PartitionKind,
    limits: &DiskLimits,
) -> Result<u64, DiskError> {
    validate_partition_size(size_mb, limits)?;

    if kind == PartitionKind::Unallocated {
        return Err(DiskError::NotAVolume);
    }

    let primary_count = partitions
        .iter()
        .filter(|p| p.kind == PartitionKind::Primary)
        .count();
    if kind == PartitionKind::Primary && primary_count >= limits.max_primary_partitions {
        return Err(DiskError::TooManyPrimary {
            max: limits.max_primary_partitions,
        });
    }

    let available_mb: u64 = partitions
        .iter()
        .filter(|p| p.kind == PartitionKind::Unallocated)
        .map(|p| p.size_mb)
        .sum();

    if size_mb > available_mb {
        return Err(DiskError::InsufficientSpace {
            requested_mb: size_mb,
            available_mb,
        });
    }

    Ok(available_mb)
}

pub fn validate_delete(partition: &Partition) -> Result<(), DiskError> {
    if partition.kind == PartitionKind::Unallocated {
        return Err(DiskError::DeleteUnallocated);
    }
    Ok(())
}

/// Check a volume label against length, character and uniqueness rules.
///
/// Drive letters such as `D:` are accepted alongside plain labels.
pub fn validate_partition_name(name: &str, partitions: &[Partition]) -> Result<(), DiskError> {
    if name.trim().is_empty() {
        return Err(DiskError::EmptyName);
    }

    if name.chars().count() > MAX_LABEL_LENGTH {
        return Err(DiskError::NameTooLong);
    }

    let taken = partitions
        .iter()
        .filter(|p| p.kind != PartitionKind::Unallocated)
        .any(|p| p.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(DiskError::DuplicateName(name.to_string()));
    }

    let label_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '));
    if !label_chars && !is_drive_letter(name) {
        return Err(DiskError::InvalidNameCharacters);
    }

    Ok(())
}

/// `true` for names of the form `C:`
pub fn is_drive_letter(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic()
    )
}
