//! Partition actions
//!
//! `dispatch` opens the right dialog for a menu action; the dialog's
//! callback posts an [`AppEvent`], and `apply_event` carries it out on the
//! disk and reports the result as a toast.

use tracing::{debug, warn};

use crate::{
    disk::{size::format_size, validation, Edge, Partition},
    error::DiskError,
    ui::components::context_menu::MenuAction,
};

use super::{
    events::{post, AppEvent},
    state::{AppState, NotificationLevel},
};

impl AppState {
    /// Open the dialog for `action` against the current selection
    pub fn dispatch(&mut self, action: MenuAction) {
        debug!("Dispatching {:?}", action);
        let sender = self.event_sender();

        match action {
            MenuAction::CreatePartition => {
                let available_mb = self.disk.total_unallocated();
                if available_mb == 0 {
                    self.report(DiskError::NoUnallocatedSpace);
                    return;
                }
                self.modal.show_create_popup(
                    available_mb,
                    move |partition| post(&sender, AppEvent::CreatePartition(partition)),
                    None,
                );
            }
            MenuAction::ShrinkVolume => {
                let Some(partition) = self.selected_volume() else {
                    return;
                };
                let id = partition.id;
                self.modal.show_shrink_popup(
                    &partition,
                    move |size_mb| {
                        post(
                            &sender,
                            AppEvent::ShrinkPartition {
                                id,
                                size_mb,
                                edge: Edge::End,
                            },
                        )
                    },
                    None,
                );
            }
            MenuAction::ExtendVolume => {
                let Some(partition) = self.selected_volume() else {
                    return;
                };
                let id = partition.id;
                match self.disk.available_after(id) {
                    Ok(available_mb) => self.modal.show_extend_popup(
                        &partition,
                        available_mb,
                        move |size_mb| {
                            post(
                                &sender,
                                AppEvent::ExtendPartition {
                                    id,
                                    size_mb,
                                    edge: Edge::End,
                                },
                            )
                        },
                        None,
                    ),
                    Err(e) => self.report(e),
                }
            }
            MenuAction::DeleteVolume => {
                let Some(partition) = self.selected_volume() else {
                    return;
                };
                if let Err(e) = validation::validate_delete(&partition) {
                    self.report(e);
                    return;
                }
                let id = partition.id;
                self.modal.show_delete_popup(
                    &partition,
                    move || post(&sender, AppEvent::DeletePartition { id }),
                    None,
                );
            }
            MenuAction::FormatVolume => {
                let Some(partition) = self.selected_volume() else {
                    return;
                };
                let id = partition.id;
                self.modal.show_confirm_popup(
                    "Format Partition",
                    &format!("Format partition \"{}\"? All data will be lost.", partition.name),
                    move || post(&sender, AppEvent::FormatPartition { id }),
                    None,
                );
            }
            MenuAction::Properties => {
                if let Some(partition) = self.selected_partition().cloned() {
                    self.modal.show_properties_popup(&partition);
                }
            }
            MenuAction::ResetDisk => {
                self.modal.show_confirm_popup(
                    "Reset Disk",
                    "Are you sure you want to reset the disk to default state?",
                    move || post(&sender, AppEvent::ResetDisk),
                    None,
                );
            }
            MenuAction::Separator => {}
        }
    }

    /// Apply an event from the channel
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Notify { message, level } => self.notify(message, level),
            AppEvent::CreatePartition(request) => match self.disk.create(request) {
                Ok(partition) => {
                    let id = partition.id;
                    let message = format!("Partition \"{}\" created successfully", partition.name);
                    self.select_partition(id);
                    self.notify(message, NotificationLevel::Success);
                }
                Err(e) => self.report(e),
            },
            AppEvent::ShrinkPartition { id, size_mb, edge } => {
                let selected = self.selected_partition().map(|p| p.id);
                match self.disk.shrink_from(id, size_mb, edge) {
                    Ok(partition) => {
                        let message = format!(
                            "Partition \"{}\" shrunk by {}",
                            partition.name,
                            format_size(size_mb)
                        );
                        self.keep_selection(selected);
                        self.notify(message, NotificationLevel::Success);
                    }
                    Err(e) => self.report(e),
                }
            }
            AppEvent::ExtendPartition { id, size_mb, edge } => {
                let selected = self.selected_partition().map(|p| p.id);
                let before_mb = self.disk.get(id).map_or(0, |p| p.size_mb);
                match self.disk.extend_from(id, size_mb, edge) {
                    Ok(partition) => {
                        let message = format!(
                            "Partition \"{}\" extended by {}",
                            partition.name,
                            format_size(partition.size_mb.saturating_sub(before_mb))
                        );
                        self.keep_selection(selected);
                        self.notify(message, NotificationLevel::Success);
                    }
                    Err(e) => self.report(e),
                }
            }
            AppEvent::DeletePartition { id } => match self.disk.delete(id) {
                Ok(removed) => {
                    self.clamp_selection();
                    self.notify(
                        format!("Partition \"{}\" deleted", removed.name),
                        NotificationLevel::Success,
                    );
                }
                Err(e) => self.report(e),
            },
            AppEvent::FormatPartition { id } => match self.disk.format(id) {
                Ok(partition) => {
                    let message = format!("Partition \"{}\" formatted", partition.name);
                    self.notify(message, NotificationLevel::Success);
                }
                Err(e) => self.report(e),
            },
            AppEvent::ResetDisk => {
                self.disk.reset();
                self.ui_state.selected_index = 0;
                self.notify("Disk reset to default state", NotificationLevel::Info);
            }
            AppEvent::Shutdown => {
                debug!("Shutdown requested");
                self.set_should_quit(true);
            }
        }
    }

    /// Selected slot if it is a volume; toasts otherwise
    fn selected_volume(&mut self) -> Option<Partition> {
        let volume = self
            .selected_partition()
            .filter(|p| !p.is_unallocated())
            .cloned();
        if volume.is_none() {
            self.report(DiskError::NotAVolume);
        }
        volume
    }

    fn report(&mut self, error: DiskError) {
        warn!("Operation refused: {}", error);
        self.notify(error.to_string(), NotificationLevel::Error);
    }
}
