//! End-to-end flows through the host: key routing, dialogs, the event
//! channel and the disk.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use diskpart_tui::{
    app::{
        events::{AppEvent, EventHandler},
        state::{AppState, NotificationLevel},
    },
    config::Config,
    disk::{Edge, PartitionKind},
    ui::{
        components::{modals::INVALID_SIZE_MESSAGE, MenuAction},
        UI,
    },
};
use ratatui::{backend::TestBackend, Terminal};

const GB: u64 = 1024;

/// A row inside the disk bar on a 100x36 screen
const BAR_ROW: u16 = 5;

async fn setup() -> (AppState, EventHandler, UI) {
    let mut config = Config::default();
    config.ui.transition_ms = 0;

    let events = EventHandler::new().await.expect("event handler");
    let mut state = AppState::new(&config, events.get_sender());
    state.set_running();
    let ui = UI::new(&config.ui).expect("ui");
    (state, events, ui)
}

fn key(ui: &mut UI, state: &mut AppState, code: KeyCode) {
    ui.handle_key_event(KeyEvent::from(code), state).expect("key");
}

fn type_text(ui: &mut UI, state: &mut AppState, text: &str) {
    text.chars().for_each(|c| key(ui, state, KeyCode::Char(c)));
}

async fn drain(events: &mut EventHandler, state: &mut AppState) -> usize {
    let mut applied = 0;
    while let Some(event) = events.try_receive_event().await {
        state.apply_event(event);
        applied += 1;
    }
    applied
}

/// Draw once so the disk bar knows where its slots are
fn draw(ui: &mut UI, state: &mut AppState) {
    let mut terminal = Terminal::new(TestBackend::new(100, 36)).expect("test terminal");
    terminal.draw(|frame| ui.render(frame, state)).expect("draw");
}

fn mouse(ui: &mut UI, state: &mut AppState, kind: MouseEventKind, column: u16) {
    let event = MouseEvent {
        kind,
        column,
        row: BAR_ROW,
        modifiers: KeyModifiers::NONE,
    };
    ui.handle_mouse_event(event, state).expect("mouse");
}

/// Press on `from`, drag through the columns to `to` and release
fn drag(ui: &mut UI, state: &mut AppState, from: u16, to: u16) {
    draw(ui, state);
    mouse(ui, state, MouseEventKind::Down(MouseButton::Left), from);
    mouse(ui, state, MouseEventKind::Drag(MouseButton::Left), to);
    mouse(ui, state, MouseEventKind::Up(MouseButton::Left), to);
}

fn sizes(state: &AppState) -> Vec<(String, u64)> {
    state
        .disk
        .partitions()
        .iter()
        .map(|p| (p.name.clone(), p.size_mb))
        .collect()
}

fn latest_toast(state: &AppState) -> Option<(String, NotificationLevel)> {
    state
        .notification_state
        .latest()
        .map(|n| (n.message.clone(), n.level))
}

#[tokio::test]
async fn test_create_through_keyboard() {
    let (mut state, mut events, mut ui) = setup().await;

    key(&mut ui, &mut state, KeyCode::Char('c'));
    assert!(state.modal.is_visible());

    // Letters now go to the dialog, not the shortcut map
    type_text(&mut ui, &mut state, "qE");
    key(&mut ui, &mut state, KeyCode::Tab);
    type_text(&mut ui, &mut state, "40 GB");
    key(&mut ui, &mut state, KeyCode::Enter);

    assert!(!state.should_quit());
    assert!(!state.modal.is_visible());
    assert_eq!(drain(&mut events, &mut state).await, 1);

    let created = state.selected_partition().expect("new partition selected");
    assert_eq!(created.name, "qE");
    assert_eq!(created.size_mb, 40 * GB);
    assert_eq!(created.kind, PartitionKind::Primary);
    assert_eq!(
        latest_toast(&state),
        Some((
            "Partition \"qE\" created successfully".to_string(),
            NotificationLevel::Success
        ))
    );

    println!("✓ Create dialog flows through the event channel onto the disk");
}

#[tokio::test]
async fn test_invalid_size_toast_comes_back_through_channel() {
    let (mut state, mut events, mut ui) = setup().await;

    key(&mut ui, &mut state, KeyCode::Char('s'));
    type_text(&mut ui, &mut state, "big");
    key(&mut ui, &mut state, KeyCode::Enter);

    assert!(state.modal.is_visible());
    drain(&mut events, &mut state).await;
    assert_eq!(
        latest_toast(&state),
        Some((INVALID_SIZE_MESSAGE.to_string(), NotificationLevel::Error))
    );

    key(&mut ui, &mut state, KeyCode::Esc);
    assert!(!state.modal.is_visible());
    assert_eq!(drain(&mut events, &mut state).await, 0);

    println!("✓ Parse failures toast through the notifier");
}

#[tokio::test]
async fn test_rule_violations_toast_after_confirm() {
    let (mut state, mut events, _) = setup().await;
    let c = state.disk.partitions()[0].clone();

    state.apply_event(AppEvent::ShrinkPartition {
        id: c.id,
        size_mb: 119 * GB + 950,
        edge: Edge::End,
    });
    let (message, level) = latest_toast(&state).expect("toast");
    assert_eq!(level, NotificationLevel::Error);
    assert!(message.starts_with("The volume cannot be shrunk"));
    assert_eq!(state.disk.partitions()[0].size_mb, c.size_mb);

    assert_eq!(drain(&mut events, &mut state).await, 0);

    println!("✓ Disk rules refuse out-of-range values from the dialog");
}

#[tokio::test]
async fn test_extend_and_delete_prechecks() {
    let (mut state, _events, _) = setup().await;

    // C: has D: after it, so extend is refused without a dialog
    state.ui_state.selected_index = 0;
    state.dispatch(MenuAction::ExtendVolume);
    assert!(!state.modal.is_visible());
    assert_eq!(latest_toast(&state).map(|t| t.1), Some(NotificationLevel::Error));

    // Unallocated space is not a volume
    state.ui_state.selected_index = 2;
    state.dispatch(MenuAction::DeleteVolume);
    assert!(!state.modal.is_visible());
    assert_eq!(
        latest_toast(&state).map(|t| t.0),
        Some("The selected space is not a volume.".to_string())
    );

    // D: can grow into the free space
    state.ui_state.selected_index = 1;
    state.dispatch(MenuAction::ExtendVolume);
    assert_eq!(
        state.modal.dialog().map(|d| d.title().to_string()),
        Some("Extend Partition".to_string())
    );

    println!("✓ Extend and delete are checked before any dialog opens");
}

#[tokio::test]
async fn test_delete_then_reset() {
    let (mut state, mut events, mut ui) = setup().await;

    state.ui_state.selected_index = 1;
    key(&mut ui, &mut state, KeyCode::Char('d'));
    // Bare confirmations focus Cancel; move to Confirm first
    key(&mut ui, &mut state, KeyCode::Right);
    key(&mut ui, &mut state, KeyCode::Enter);
    drain(&mut events, &mut state).await;

    assert_eq!(state.disk.partitions().len(), 2);
    assert_eq!(state.disk.total_unallocated(), 380 * GB);
    assert_eq!(
        latest_toast(&state).map(|t| t.0),
        Some("Partition \"D:\" deleted".to_string())
    );
    assert_eq!(state.ui_state.selected_index, 1);

    key(&mut ui, &mut state, KeyCode::Char('R'));
    key(&mut ui, &mut state, KeyCode::Right);
    key(&mut ui, &mut state, KeyCode::Enter);
    drain(&mut events, &mut state).await;

    assert_eq!(state.disk.partitions().len(), 3);
    assert_eq!(
        latest_toast(&state),
        Some(("Disk reset to default state".to_string(), NotificationLevel::Info))
    );

    println!("✓ Delete and reset confirmations update the disk");
}

#[tokio::test]
async fn test_context_menu_and_quit() {
    let (mut state, mut events, mut ui) = setup().await;

    state.ui_state.selected_index = 2;
    key(&mut ui, &mut state, KeyCode::Enter);
    assert!(ui.context_menu().is_open());
    let labels: Vec<&str> = ui
        .context_menu()
        .items()
        .iter()
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Create New Partition"]);

    key(&mut ui, &mut state, KeyCode::Esc);
    assert!(!ui.context_menu().is_open());
    assert!(!state.modal.is_visible());

    key(&mut ui, &mut state, KeyCode::Char('q'));
    assert!(state.should_quit());
    assert_eq!(drain(&mut events, &mut state).await, 0);

    println!("✓ Context menu offers Create on free space; q quits");
}

#[tokio::test]
async fn test_shutdown_event_quits() {
    let (mut state, mut events, _) = setup().await;

    events.send_event(AppEvent::Shutdown).expect("send");
    drain(&mut events, &mut state).await;
    assert!(state.should_quit());

    println!("✓ Shutdown events stop the loop");
}

// Default layout on a 100 column screen: C: spans columns 1-23, D: 24-63
// and the free slot 64-98.

#[tokio::test]
async fn test_dragging_end_edge_extends() {
    let (mut state, mut events, mut ui) = setup().await;

    drag(&mut ui, &mut state, 63, 73);
    assert_eq!(state.selected_partition().map(|p| p.name.as_str()), Some("D:"));
    assert_eq!(drain(&mut events, &mut state).await, 1);

    assert_eq!(
        sizes(&state),
        vec![
            ("C:".to_string(), 120 * GB),
            ("D:".to_string(), 250 * GB),
            ("Unallocated".to_string(), 130 * GB),
        ]
    );
    assert_eq!(
        latest_toast(&state),
        Some((
            "Partition \"D:\" extended by 50 GB".to_string(),
            NotificationLevel::Success
        ))
    );

    println!("✓ Dragging a right edge into free space extends the volume");
}

#[tokio::test]
async fn test_dragging_start_edge_shrinks_from_the_left() {
    let (mut state, mut events, mut ui) = setup().await;

    drag(&mut ui, &mut state, 24, 28);
    assert_eq!(drain(&mut events, &mut state).await, 1);

    assert_eq!(
        sizes(&state),
        vec![
            ("C:".to_string(), 120 * GB),
            ("Unallocated".to_string(), 20 * GB),
            ("D:".to_string(), 180 * GB),
            ("Unallocated".to_string(), 180 * GB),
        ]
    );
    // The selection follows D: past the inserted slot
    assert_eq!(state.selected_partition().map(|p| p.name.as_str()), Some("D:"));
    let (message, level) = latest_toast(&state).expect("toast");
    assert_eq!(message, "Partition \"D:\" shrunk by 20 GB");
    assert_eq!(level, NotificationLevel::Success);

    println!("✓ Dragging a left edge inwards frees space in front of the volume");
}

#[tokio::test]
async fn test_refused_drags_toast_and_keep_layout() {
    let (mut state, mut events, mut ui) = setup().await;
    let before = sizes(&state);

    // 10 columns of C: is more than its reclaimable free space
    drag(&mut ui, &mut state, 23, 13);
    assert_eq!(drain(&mut events, &mut state).await, 1);
    let (message, level) = latest_toast(&state).expect("toast");
    assert_eq!(level, NotificationLevel::Error);
    assert!(message.starts_with("The volume cannot be shrunk"), "{}", message);
    assert_eq!(sizes(&state), before);

    // D: has a volume in front of it
    drag(&mut ui, &mut state, 24, 20);
    assert_eq!(drain(&mut events, &mut state).await, 1);
    assert_eq!(
        latest_toast(&state),
        Some((
            "Cannot extend from left. No adjacent unallocated space.".to_string(),
            NotificationLevel::Error
        ))
    );
    assert_eq!(sizes(&state), before);

    println!("✓ Drags go through the same rules as the dialogs");
}

#[tokio::test]
async fn test_click_inside_a_slot_does_not_resize() {
    let (mut state, mut events, mut ui) = setup().await;
    let before = sizes(&state);

    drag(&mut ui, &mut state, 40, 50);
    assert_eq!(state.selected_partition().map(|p| p.name.as_str()), Some("D:"));
    assert_eq!(drain(&mut events, &mut state).await, 0);
    assert_eq!(sizes(&state), before);

    println!("✓ Only border columns start a resize");
}
