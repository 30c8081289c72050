//! Simulated disk
//!
//! Holds the ordered partition layout of a single disk and applies the
//! create/shrink/extend/delete/format operations the simulator offers. Every
//! operation is checked against [`validation`] first, so a refused operation
//! leaves the layout untouched.

pub mod size;
pub mod validation;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DiskError;
use size::format_size;
use validation::DiskLimits;

const DEFAULT_STATUS: &str = "Healthy";
const DEFAULT_FILE_SYSTEM: &str = "NTFS";

/// Side of a volume a resize works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Towards the start of the disk
    Start,
    End,
}

/// Kind of space a disk slot represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Primary,
    Logical,
    Unallocated,
}

impl PartitionKind {
    pub fn label(&self) -> &'static str {
        match self {
            PartitionKind::Primary => "Primary Partition",
            PartitionKind::Logical => "Logical Partition",
            PartitionKind::Unallocated => "Unallocated",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            PartitionKind::Primary => "Primary",
            PartitionKind::Logical => "Logical",
            PartitionKind::Unallocated => "Unallocated",
        }
    }

    /// Parse the `value` of the create dialog's type select
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(PartitionKind::Primary),
            "logical" => Some(PartitionKind::Logical),
            _ => None,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            PartitionKind::Primary => "primary",
            PartitionKind::Logical => "logical",
            PartitionKind::Unallocated => "unallocated",
        }
    }
}

/// One slot on the disk: a volume or a run of unallocated space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub id: Uuid,
    pub name: String,
    pub size_mb: u64,
    pub kind: PartitionKind,
    pub status: Option<String>,
    pub file_system: Option<String>,
    pub used_mb: Option<u64>,
    pub free_mb: Option<u64>,
}

impl Partition {
    /// A fresh, empty NTFS volume
    pub fn volume(name: &str, size_mb: u64, kind: PartitionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size_mb,
            kind,
            status: Some(DEFAULT_STATUS.to_string()),
            file_system: Some(DEFAULT_FILE_SYSTEM.to_string()),
            used_mb: None,
            free_mb: None,
        }
    }

    pub fn unallocated(size_mb: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Unallocated".to_string(),
            size_mb,
            kind: PartitionKind::Unallocated,
            status: None,
            file_system: None,
            used_mb: None,
            free_mb: None,
        }
    }

    /// Set used space and derive free space from it
    pub fn with_usage(mut self, used_mb: u64) -> Self {
        let used_mb = used_mb.min(self.size_mb);
        self.used_mb = Some(used_mb);
        self.free_mb = Some(self.size_mb - used_mb);
        self
    }

    pub fn is_unallocated(&self) -> bool {
        self.kind == PartitionKind::Unallocated
    }

    /// Free space, falling back to size minus used when not recorded
    pub fn free_space_mb(&self) -> u64 {
        match self.free_mb {
            Some(free) if free > 0 => free,
            _ => self.size_mb.saturating_sub(self.used_mb.unwrap_or(0)),
        }
    }

    pub fn used_percentage(&self) -> u64 {
        match self.used_mb {
            Some(used) if self.size_mb > 0 => (used * 100 + self.size_mb / 2) / self.size_mb,
            _ => 0,
        }
    }

    fn recompute_free(&mut self) {
        let used_mb = self.used_mb.unwrap_or(0).min(self.size_mb);
        self.free_mb = Some(self.size_mb - used_mb);
    }
}

/// Values the create dialog hands back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartition {
    pub name: String,
    pub size_mb: u64,
    pub kind: PartitionKind,
}

/// The simulated disk and its partition layout
#[derive(Debug, Clone)]
pub struct Disk {
    total_size_mb: u64,
    limits: DiskLimits,
    partitions: Vec<Partition>,
}

impl Disk {
    /// Create a disk with the default teaching layout
    pub fn new(total_size_mb: u64, limits: DiskLimits) -> Self {
        let mut disk = Self {
            total_size_mb,
            limits,
            partitions: Vec::new(),
        };
        disk.reset();
        disk
    }

    /// Restore the default layout: a system primary, a data logical drive
    /// and the remainder unallocated.
    ///
    /// On the default 500 GB disk that is C: 120 GB, D: 200 GB and 180 GB
    /// free; other disk sizes keep the same proportions.
    pub fn reset(&mut self) {
        let system_mb = self.total_size_mb * 24 / 100;
        let data_mb = self.total_size_mb * 40 / 100;
        let free_mb = self.total_size_mb - system_mb - data_mb;

        self.partitions = vec![
            Partition::volume("C:", system_mb, PartitionKind::Primary).with_usage(system_mb / 2),
            Partition::volume("D:", data_mb, PartitionKind::Logical).with_usage(data_mb / 2),
            Partition::unallocated(free_mb),
        ];

        info!("Disk reset to default layout ({})", format_size(self.total_size_mb));
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn total_size_mb(&self) -> u64 {
        self.total_size_mb
    }

    pub fn limits(&self) -> &DiskLimits {
        &self.limits
    }

    pub fn get(&self, id: Uuid) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.partitions.iter().position(|p| p.id == id)
    }

    pub fn total_unallocated(&self) -> u64 {
        self.partitions
            .iter()
            .filter(|p| p.is_unallocated())
            .map(|p| p.size_mb)
            .sum()
    }

    /// Unallocated space directly after `id`, if the volume can be extended
    pub fn available_after(&self, id: Uuid) -> Result<u64, DiskError> {
        let index = self.index_of(id).ok_or(DiskError::PartitionNotFound)?;
        validation::validate_extend(&self.partitions, index, 0)
    }

    /// Create a volume in the largest unallocated slot.
    ///
    /// The new volume is placed at the start of the slot; whatever is left
    /// stays unallocated after it.
    pub fn create(&mut self, request: NewPartition) -> Result<&Partition, DiskError> {
        validation::validate_partition_name(&request.name, &self.partitions)?;
        validation::validate_create(&self.partitions, request.size_mb, request.kind, &self.limits)?;

        let (target_index, slot_mb) = self
            .partitions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_unallocated())
            .max_by_key(|(index, p)| (p.size_mb, std::cmp::Reverse(*index)))
            .map(|(index, p)| (index, p.size_mb))
            .ok_or(DiskError::NoUnallocatedSpace)?;

        if request.size_mb > slot_mb {
            return Err(DiskError::InsufficientSpace {
                requested_mb: request.size_mb,
                available_mb: slot_mb,
            });
        }

        let used_mb = simulated_used_space(request.size_mb);
        let partition =
            Partition::volume(&request.name, request.size_mb, request.kind).with_usage(used_mb);

        let remaining_mb = slot_mb - request.size_mb;
        if remaining_mb > 0 {
            self.partitions[target_index].size_mb = remaining_mb;
            self.partitions.insert(target_index, partition);
        } else {
            self.partitions[target_index] = partition;
        }

        info!(
            "Created {} \"{}\" ({})",
            request.kind.short_label(),
            request.name,
            format_size(request.size_mb)
        );
        Ok(&self.partitions[target_index])
    }

    /// Shrink a volume, handing the space to the slot after it.
    pub fn shrink(&mut self, id: Uuid, shrink_mb: u64) -> Result<&Partition, DiskError> {
        self.shrink_from(id, shrink_mb, Edge::End)
    }

    /// Shrink a volume from one edge. The freed space joins the unallocated
    /// slot on that side, or becomes a new one.
    pub fn shrink_from(
        &mut self,
        id: Uuid,
        shrink_mb: u64,
        edge: Edge,
    ) -> Result<&Partition, DiskError> {
        let mut index = self.index_of(id).ok_or(DiskError::PartitionNotFound)?;
        validation::validate_shrink(&self.partitions[index], shrink_mb, &self.limits)?;

        let partition = &mut self.partitions[index];
        partition.size_mb -= shrink_mb;
        partition.recompute_free();

        let neighbour = match edge {
            Edge::End => index + 1,
            Edge::Start => index.wrapping_sub(1),
        };
        let neighbour_is_free = self
            .partitions
            .get(neighbour)
            .map_or(false, Partition::is_unallocated);

        if neighbour_is_free {
            self.partitions[neighbour].size_mb += shrink_mb;
        } else if edge == Edge::End {
            self.partitions
                .insert(index + 1, Partition::unallocated(shrink_mb));
        } else {
            self.partitions.insert(index, Partition::unallocated(shrink_mb));
            index += 1;
        }

        debug!("Shrunk partition {} by {} MB at {:?}", id, shrink_mb, edge);
        Ok(&self.partitions[index])
    }

    /// Grow a volume into the unallocated slot immediately after it.
    pub fn extend(&mut self, id: Uuid, extend_mb: u64) -> Result<&Partition, DiskError> {
        self.extend_from(id, extend_mb, Edge::End)
    }

    /// Grow a volume into the unallocated slot on `edge`.
    pub fn extend_from(
        &mut self,
        id: Uuid,
        extend_mb: u64,
        edge: Edge,
    ) -> Result<&Partition, DiskError> {
        let mut index = self.index_of(id).ok_or(DiskError::PartitionNotFound)?;
        let available_mb =
            validation::validate_extend_request(&self.partitions, index, extend_mb, edge)?;
        let extend_mb = extend_mb.min(available_mb);

        let partition = &mut self.partitions[index];
        partition.size_mb += extend_mb;
        partition.recompute_free();

        // Validation guarantees the slot exists on that side
        let slot_index = match edge {
            Edge::End => index + 1,
            Edge::Start => index - 1,
        };
        let slot = &mut self.partitions[slot_index];
        slot.size_mb -= extend_mb;
        if slot.size_mb == 0 {
            self.partitions.remove(slot_index);
            if edge == Edge::Start {
                index -= 1;
            }
        }

        debug!("Extended partition {} by {} MB at {:?}", id, extend_mb, edge);
        Ok(&self.partitions[index])
    }

    /// Delete a volume, returning its space to unallocated.
    pub fn delete(&mut self, id: Uuid) -> Result<Partition, DiskError> {
        let index = self.index_of(id).ok_or(DiskError::PartitionNotFound)?;
        validation::validate_delete(&self.partitions[index])?;

        let freed = Partition::unallocated(self.partitions[index].size_mb);
        let removed = std::mem::replace(&mut self.partitions[index], freed);
        self.merge_unallocated();

        info!("Deleted partition \"{}\"", removed.name);
        Ok(removed)
    }

    /// Wipe a volume's contents.
    pub fn format(&mut self, id: Uuid) -> Result<&Partition, DiskError> {
        let partition = self
            .partitions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DiskError::PartitionNotFound)?;
        if partition.is_unallocated() {
            return Err(DiskError::FormatUnallocated);
        }

        partition.used_mb = Some(0);
        partition.free_mb = Some(partition.size_mb);
        partition.file_system = Some(DEFAULT_FILE_SYSTEM.to_string());

        info!("Formatted partition \"{}\"", partition.name);
        Ok(partition)
    }

    /// Rows for the details pane
    pub fn details(&self, id: Uuid) -> Option<Vec<(&'static str, String)>> {
        let partition = self.get(id)?;
        if partition.is_unallocated() {
            return Some(vec![
                ("Type", partition.kind.label().to_string()),
                ("Total Size", format_size(partition.size_mb)),
            ]);
        }

        let used_mb = partition.used_mb.unwrap_or(0);
        let drive_letter = if validation::is_drive_letter(&partition.name) {
            partition.name.to_uppercase()
        } else {
            "N/A".to_string()
        };

        Some(vec![
            ("Volume Label", partition.name.clone()),
            ("Type", partition.kind.label().to_string()),
            (
                "File System",
                partition
                    .file_system
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FILE_SYSTEM.to_string()),
            ),
            (
                "Status",
                partition
                    .status
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            ),
            (
                "Partition Style",
                match partition.kind {
                    PartitionKind::Logical => "Logical Drive",
                    _ => "Primary Partition",
                }
                .to_string(),
            ),
            ("Total Size", format_size(partition.size_mb)),
            (
                "Used Space",
                format!("{} ({}%)", format_size(used_mb), partition.used_percentage()),
            ),
            ("Free Space", format_size(partition.size_mb.saturating_sub(used_mb))),
            ("Partition ID", partition.id.simple().to_string()[..8].to_string()),
            ("Drive Letter", drive_letter),
        ])
    }

    fn merge_unallocated(&mut self) {
        let mut merged: Vec<Partition> = Vec::with_capacity(self.partitions.len());
        for partition in self.partitions.drain(..) {
            match merged.last_mut() {
                Some(previous) if previous.is_unallocated() && partition.is_unallocated() => {
                    previous.size_mb += partition.size_mb;
                }
                _ => merged.push(partition),
            }
        }
        self.partitions = merged;
    }
}

/// Pretend a new volume arrives 20-80% full
fn simulated_used_space(size_mb: u64) -> u64 {
    let percentage = rand::thread_rng().gen_range(20..=80);
    size_mb * percentage / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024;

    fn default_disk() -> Disk {
        Disk::new(500 * GB, DiskLimits::default())
    }

    fn layout_total(disk: &Disk) -> u64 {
        disk.partitions().iter().map(|p| p.size_mb).sum()
    }

    #[test]
    fn default_layout_matches_teaching_disk() {
        let disk = default_disk();
        let partitions = disk.partitions();

        assert_eq!(partitions.len(), 3);
        assert_eq!(partitions[0].name, "C:");
        assert_eq!(partitions[0].size_mb, 120 * GB);
        assert_eq!(partitions[1].kind, PartitionKind::Logical);
        assert_eq!(partitions[1].size_mb, 200 * GB);
        assert_eq!(disk.total_unallocated(), 180 * GB);
    }

    #[test]
    fn create_carves_from_unallocated() {
        let mut disk = default_disk();
        let created = disk
            .create(NewPartition {
                name: "E:".to_string(),
                size_mb: 50 * GB,
                kind: PartitionKind::Primary,
            })
            .unwrap()
            .clone();

        assert_eq!(disk.partitions()[2].id, created.id);
        assert_eq!(disk.total_unallocated(), 130 * GB);
        assert_eq!(layout_total(&disk), 500 * GB);
        let used = created.used_mb.unwrap();
        assert!(used >= 10 * GB && used <= 40 * GB);
        assert_eq!(created.free_mb, Some(50 * GB - used));
    }

    #[test]
    fn create_consuming_whole_slot_replaces_it() {
        let mut disk = default_disk();
        disk.create(NewPartition {
            name: "E:".to_string(),
            size_mb: 180 * GB,
            kind: PartitionKind::Logical,
        })
        .unwrap();

        assert_eq!(disk.partitions().len(), 3);
        assert_eq!(disk.total_unallocated(), 0);
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let mut disk = default_disk();
        let result = disk.create(NewPartition {
            name: "c:".to_string(),
            size_mb: GB,
            kind: PartitionKind::Primary,
        });
        assert_eq!(result.unwrap_err(), DiskError::DuplicateName("c:".to_string()));
    }

    #[test]
    fn shrink_grows_following_unallocated_slot() {
        let mut disk = default_disk();
        let data = disk.partitions()[1].id;

        disk.shrink(data, 10 * GB).unwrap();

        assert_eq!(disk.get(data).unwrap().size_mb, 190 * GB);
        assert_eq!(disk.total_unallocated(), 190 * GB);
        assert_eq!(disk.partitions().len(), 3);
    }

    #[test]
    fn shrink_inserts_unallocated_when_neighbour_is_a_volume() {
        let mut disk = default_disk();
        let system = disk.partitions()[0].id;

        disk.shrink(system, 10 * GB).unwrap();

        assert_eq!(disk.partitions().len(), 4);
        assert!(disk.partitions()[1].is_unallocated());
        assert_eq!(disk.partitions()[1].size_mb, 10 * GB);
        assert_eq!(disk.get(system).unwrap().free_mb, Some(50 * GB));
    }

    #[test]
    fn extend_consumes_adjacent_space() {
        let mut disk = default_disk();
        let system = disk.partitions()[0].id;
        let data = disk.partitions()[1].id;

        assert_eq!(disk.available_after(system), Err(DiskError::NoAdjacentSpace));
        assert_eq!(disk.available_after(data), Ok(180 * GB));

        disk.extend(data, 180 * GB).unwrap();
        assert_eq!(disk.partitions().len(), 2);
        assert_eq!(disk.get(data).unwrap().size_mb, 380 * GB);
    }

    #[test]
    fn shrink_from_start_frees_space_before_the_volume() {
        let mut disk = default_disk();
        let data = disk.partitions()[1].id;

        let shrunk = disk.shrink_from(data, 20 * GB, Edge::Start).unwrap();
        assert_eq!(shrunk.size_mb, 180 * GB);

        let sizes: Vec<u64> = disk.partitions().iter().map(|p| p.size_mb).collect();
        assert_eq!(sizes, vec![120 * GB, 20 * GB, 180 * GB, 180 * GB]);
        assert!(disk.partitions()[1].is_unallocated());
        assert_eq!(disk.index_of(data), Some(2));

        // A second shrink grows the slot that is now in front
        disk.shrink_from(data, 10 * GB, Edge::Start).unwrap();
        assert_eq!(disk.partitions()[1].size_mb, 30 * GB);
        assert_eq!(disk.partitions().len(), 4);
    }

    #[test]
    fn extend_from_start_consumes_the_previous_slot() {
        let mut disk = default_disk();
        let data = disk.partitions()[1].id;
        disk.shrink_from(data, 20 * GB, Edge::Start).unwrap();

        disk.extend_from(data, 5 * GB, Edge::Start).unwrap();
        assert_eq!(disk.partitions()[1].size_mb, 15 * GB);

        let grown = disk.extend_from(data, 15 * GB, Edge::Start).unwrap();
        assert_eq!(grown.size_mb, 200 * GB);
        assert_eq!(disk.index_of(data), Some(1));
        assert_eq!(layout_total(&disk), 500 * GB);

        assert_eq!(
            disk.extend_from(data, GB, Edge::Start).unwrap_err(),
            DiskError::NoAdjacentSpaceBefore
        );
    }

    #[test]
    fn delete_coalesces_unallocated_neighbours() {
        let mut disk = default_disk();
        let data = disk.partitions()[1].id;

        let removed = disk.delete(data).unwrap();

        assert_eq!(removed.name, "D:");
        assert_eq!(disk.partitions().len(), 2);
        assert_eq!(disk.total_unallocated(), 380 * GB);
        assert_eq!(layout_total(&disk), 500 * GB);
    }

    #[test]
    fn format_clears_usage() {
        let mut disk = default_disk();
        let system = disk.partitions()[0].id;
        let free = disk.partitions()[2].id;

        let formatted = disk.format(system).unwrap();
        assert_eq!(formatted.used_mb, Some(0));
        assert_eq!(formatted.free_mb, Some(120 * GB));
        assert_eq!(disk.format(free).unwrap_err(), DiskError::FormatUnallocated);
    }

    #[test]
    fn details_report_usage_and_drive_letter() {
        let disk = default_disk();
        let system = disk.partitions()[0].id;
        let rows = disk.details(system).unwrap();

        assert!(rows.contains(&("Used Space", "60 GB (50%)".to_string())));
        assert!(rows.contains(&("Drive Letter", "C:".to_string())));

        let data = disk.partitions()[1].id;
        let rows = disk.details(data).unwrap();
        assert!(rows.contains(&("Partition Style", "Logical Drive".to_string())));
    }
}
