//! Partition dialogs
//!
//! Thin builders over [`ModalController::show`]. The only rule they add is
//! turning the typed size into megabytes; a size that does not parse is
//! reported through the notifier and the dialog stays up for another try.
//! Range checks against the disk are left to the caller.

use super::{
    controller::ModalController,
    request::{
        CancelHandler, ConfirmResult, DialogCallbacks, DialogRequest, FieldSpec, FormData,
        PropertyEntry, SelectOption,
    },
};
use crate::disk::{
    size::{format_size, parse_size},
    validation::MAX_LABEL_LENGTH,
    NewPartition, Partition, PartitionKind,
};

pub const INVALID_SIZE_MESSAGE: &str = "Invalid size format. Use 'GB' or 'MB' (e.g., '50 GB')";

/// Placeholder cap for the extend dialog
const EXTEND_EXAMPLE_MAX_MB: u64 = 10240;

impl ModalController {
    pub fn show_shrink_popup<F>(
        &mut self,
        partition: &Partition,
        on_confirm: F,
        on_cancel: Option<CancelHandler>,
    ) where
        F: FnOnce(u64) + Send + 'static,
    {
        let max_shrink_mb = partition
            .size_mb
            .saturating_sub(self.config().min_partition_size_mb);

        let request = DialogRequest::form(
            "Shrink Partition",
            vec![FieldSpec::text("size", "Shrink Size")
                .with_placeholder("e.g., 50 GB or 10240 MB")
                .required()
                .with_hint(&format!("Maximum shrink: {}", format_size(max_shrink_mb)))],
        )
        .with_description(format!(
            "Shrink \"{}\" partition. Current size: {}",
            partition.name,
            format_size(partition.size_mb)
        ));

        self.show(
            request,
            DialogCallbacks::new()
                .on_confirm(size_confirm(on_confirm))
                .with_cancel_handler(on_cancel),
        );
    }

    pub fn show_extend_popup<F>(
        &mut self,
        partition: &Partition,
        available_mb: u64,
        on_confirm: F,
        on_cancel: Option<CancelHandler>,
    ) where
        F: FnOnce(u64) + Send + 'static,
    {
        let example = format_size(available_mb.min(EXTEND_EXAMPLE_MAX_MB));

        let request = DialogRequest::form(
            "Extend Partition",
            vec![FieldSpec::text("size", "Extend Size")
                .with_placeholder(&format!("e.g., {}", example))
                .required()
                .with_hint(&format!("Maximum extend: {}", format_size(available_mb)))],
        )
        .with_description(format!(
            "Extend \"{}\" partition. Available space: {}",
            partition.name,
            format_size(available_mb)
        ));

        self.show(
            request,
            DialogCallbacks::new()
                .on_confirm(size_confirm(on_confirm))
                .with_cancel_handler(on_cancel),
        );
    }

    pub fn show_create_popup<F>(
        &mut self,
        available_mb: u64,
        on_confirm: F,
        on_cancel: Option<CancelHandler>,
    ) where
        F: FnOnce(NewPartition) + Send + 'static,
    {
        let min_size = format_size(self.config().min_partition_size_mb);

        let request = DialogRequest::form(
            "Create New Partition",
            vec![
                FieldSpec::text("name", "Partition Name")
                    .with_placeholder("e.g., D:, E:, DATA")
                    .required()
                    .with_max_length(MAX_LABEL_LENGTH)
                    .with_hint(&format!("Maximum {} characters", MAX_LABEL_LENGTH)),
                FieldSpec::text("size", "Size")
                    .with_placeholder("e.g., 100 GB or 51200 MB")
                    .required()
                    .with_hint(&format!("Minimum: {}", min_size)),
                FieldSpec::select(
                    "type",
                    "Type",
                    vec![
                        SelectOption::new(
                            PartitionKind::Primary.value(),
                            PartitionKind::Primary.label(),
                        )
                        .selected(),
                        SelectOption::new(
                            PartitionKind::Logical.value(),
                            PartitionKind::Logical.label(),
                        ),
                    ],
                ),
            ],
        )
        .with_description(format!(
            "Create a new partition. Available unallocated space: {}",
            format_size(available_mb)
        ));

        let mut on_confirm = Some(on_confirm);
        let handler = move |data: &FormData| {
            let size_mb = field(data, "size").map(parse_size).unwrap_or(0);
            if size_mb == 0 {
                return ConfirmResult::Rejected(INVALID_SIZE_MESSAGE.to_string());
            }

            let kind = field(data, "type")
                .and_then(PartitionKind::from_value)
                .unwrap_or(PartitionKind::Primary);
            let partition = NewPartition {
                name: field(data, "name").unwrap_or_default().trim().to_string(),
                size_mb,
                kind,
            };

            if let Some(on_confirm) = on_confirm.take() {
                on_confirm(partition);
            }
            ConfirmResult::Accepted
        };

        self.show(
            request,
            DialogCallbacks::new()
                .on_confirm(handler)
                .with_cancel_handler(on_cancel),
        );
    }

    pub fn show_delete_popup<F>(
        &mut self,
        partition: &Partition,
        on_confirm: F,
        on_cancel: Option<CancelHandler>,
    ) where
        F: FnOnce() + Send + 'static,
    {
        self.show_confirm_popup(
            "Delete Partition",
            &format!(
                "Are you sure you want to delete partition \"{}\"? This action cannot be undone.",
                partition.name
            ),
            on_confirm,
            on_cancel,
        );
    }

    /// Yes/no dialog with no inputs
    pub fn show_confirm_popup<F>(
        &mut self,
        title: &str,
        description: &str,
        on_confirm: F,
        on_cancel: Option<CancelHandler>,
    ) where
        F: FnOnce() + Send + 'static,
    {
        let mut on_confirm = Some(on_confirm);
        let handler = move |_: &FormData| {
            if let Some(on_confirm) = on_confirm.take() {
                on_confirm();
            }
            ConfirmResult::Accepted
        };

        self.show(
            DialogRequest::form(title, Vec::new()).with_description(description),
            DialogCallbacks::new()
                .on_confirm(handler)
                .with_cancel_handler(on_cancel),
        );
    }

    /// Read-only view of a partition; Close is the only way out
    pub fn show_properties_popup(&mut self, partition: &Partition) {
        let used = partition
            .used_mb
            .filter(|used| *used > 0)
            .map(format_size)
            .unwrap_or_else(|| "N/A".to_string());
        let free = format_size(
            partition
                .free_mb
                .filter(|free| *free > 0)
                .unwrap_or(partition.size_mb),
        );

        let entries = vec![
            PropertyEntry::new("Name", partition.name.clone()),
            PropertyEntry::new("Size", format_size(partition.size_mb)),
            PropertyEntry::new("Type", partition.kind.label()),
            PropertyEntry::new(
                "Status",
                partition.status.as_deref().unwrap_or("Healthy"),
            ),
            PropertyEntry::new(
                "File System",
                partition.file_system.as_deref().unwrap_or("NTFS"),
            ),
            PropertyEntry::new("Used Space", used),
            PropertyEntry::new("Free Space", free),
        ];

        let request = DialogRequest::properties("Partition Properties", entries)
            .with_description(format!("Properties of \"{}\"", partition.name));

        self.show(request, DialogCallbacks::new());
    }
}

fn field<'a>(data: &'a FormData, name: &str) -> Option<&'a str> {
    data.get(name).map(String::as_str)
}

/// Confirm handler for the single-size dialogs
fn size_confirm<F>(on_confirm: F) -> impl FnMut(&FormData) -> ConfirmResult + Send + 'static
where
    F: FnOnce(u64) + Send + 'static,
{
    let mut on_confirm = Some(on_confirm);
    move |data: &FormData| {
        let size_mb = field(data, "size").map(parse_size).unwrap_or(0);
        if size_mb == 0 {
            return ConfirmResult::Rejected(INVALID_SIZE_MESSAGE.to_string());
        }

        if let Some(on_confirm) = on_confirm.take() {
            on_confirm(size_mb);
        }
        ConfirmResult::Accepted
    }
}
