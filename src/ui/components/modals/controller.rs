//! Modal lifecycle controller
//!
//! Owns the single dialog surface. A dialog moves through
//! `Closed -> Showing -> Open -> Hiding -> Closed`; the two transition phases
//! last [`ModalConfig::transition`] and are advanced by [`ModalController::tick`].
//!
//! At most one callback pair is armed at a time. `show` replaces the armed
//! pair without invoking it, and the pair is disarmed before the hide
//! transition starts, so nothing can fire for a dialog that is going away.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use parking_lot::Mutex;
use ratatui::{layout::Rect, Frame};
use tracing::{debug, warn};

use super::{
    form::{FieldState, FormState},
    render,
    request::{
        ConfirmResult, DialogBody, DialogCallbacks, DialogMode, DialogOutcome, DialogRequest,
        PropertyEntry,
    },
    Modal, ModalResult, Notifier,
};
use crate::{app::state::NotificationLevel, disk::size::MIN_PARTITION_SIZE_MB, ui::theme::Theme};

/// Controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalConfig {
    /// Length of the show and hide transitions; zero makes them immediate
    pub transition: Duration,
    /// Smallest partition size, used for the shrink/create hints
    pub min_partition_size_mb: u64,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(150),
            min_partition_size_mb: MIN_PARTITION_SIZE_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    Showing,
    Open,
    Hiding,
}

/// Focusable element of the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Cancel,
    Confirm,
    Close,
}

/// Content currently on the surface
#[derive(Debug, Clone)]
pub struct ActiveDialog {
    title: String,
    description: Option<String>,
    mode: DialogMode,
    form: FormState,
    properties: Vec<PropertyEntry>,
    focus: Option<Focus>,
}

impl ActiveDialog {
    fn new(request: DialogRequest) -> Self {
        let mode = request.mode();
        let (form, properties) = match request.body {
            DialogBody::Form(fields) => (FormState::new(fields), Vec::new()),
            DialogBody::Properties(entries) => (FormState::default(), entries),
        };

        Self {
            title: request.title,
            description: request.description,
            mode,
            form,
            properties,
            focus: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.form.field(name)
    }

    /// First input, or Cancel for a bare confirmation, or Close
    fn initial_focus(&self) -> Focus {
        match self.mode {
            DialogMode::Properties => Focus::Close,
            DialogMode::Form if self.form.is_empty() => Focus::Cancel,
            DialogMode::Form => Focus::Field(0),
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        match self.mode {
            DialogMode::Properties => vec![Focus::Close],
            DialogMode::Form => (0..self.form.len())
                .map(Focus::Field)
                .chain([Focus::Cancel, Focus::Confirm])
                .collect(),
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = self
            .focus
            .and_then(|focus| order.iter().position(|f| *f == focus));
        let next = match current {
            Some(index) if forward => (index + 1) % order.len(),
            Some(index) => (index + order.len() - 1) % order.len(),
            None => 0,
        };
        self.focus = order.get(next).copied();
    }

    fn focused_field(&mut self) -> Option<&mut FieldState> {
        match self.focus {
            Some(Focus::Field(index)) => self.form.field_mut(index),
            _ => None,
        }
    }
}

/// Owner of the shared dialog surface
pub struct ModalController {
    config: ModalConfig,
    notifier: Box<dyn Notifier>,
    phase: DialogPhase,
    phase_started: Instant,
    dialog: Option<ActiveDialog>,
    armed: Option<DialogCallbacks>,
    panel_area: Option<Rect>,
    button_areas: Vec<(Rect, Focus)>,
}

impl ModalController {
    pub fn new(config: ModalConfig, notifier: Box<dyn Notifier>) -> Self {
        Self {
            config,
            notifier,
            phase: DialogPhase::Closed,
            phase_started: Instant::now(),
            dialog: None,
            armed: None,
            panel_area: None,
            button_areas: Vec::new(),
        }
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Put a dialog on the surface and arm its callbacks.
    ///
    /// An unfinished hide transition is completed first. A previously armed
    /// pair is dropped without being invoked.
    pub fn show(&mut self, request: DialogRequest, callbacks: DialogCallbacks) {
        if self.phase == DialogPhase::Hiding {
            self.finish_hide();
        }
        if self.armed.take().is_some() {
            debug!("Replacing open dialog without resolving it");
        }

        debug!("Showing {:?} dialog \"{}\"", request.mode(), request.title);

        self.dialog = Some(ActiveDialog::new(request));
        self.armed = Some(callbacks);
        self.phase = DialogPhase::Showing;
        self.phase_started = Instant::now();
        self.panel_area = None;
        self.button_areas.clear();

        if self.config.transition.is_zero() {
            self.settle_open();
        }
    }

    /// Like [`show`](Self::show) but resolves through a single outcome handler
    pub fn show_with_outcome<F>(&mut self, request: DialogRequest, resolve: F)
    where
        F: FnOnce(DialogOutcome) + Send + 'static,
    {
        let resolver: Arc<Mutex<Option<Box<dyn FnOnce(DialogOutcome) + Send>>>> =
            Arc::new(Mutex::new(Some(Box::new(resolve))));
        let cancel_resolver = Arc::clone(&resolver);

        let callbacks = DialogCallbacks::new()
            .on_confirm(move |data| {
                if let Some(resolve) = resolver.lock().take() {
                    resolve(DialogOutcome::Confirmed(data.clone()));
                }
                ConfirmResult::Accepted
            })
            .on_cancel(move || {
                if let Some(resolve) = cancel_resolver.lock().take() {
                    resolve(DialogOutcome::Cancelled);
                }
            });

        self.show(request, callbacks);
    }

    /// Submit the form.
    ///
    /// Native validation runs first; an invalid field takes focus and no
    /// callback fires. Properties dialogs have nothing to submit and close as
    /// a cancel.
    pub fn confirm(&mut self) -> ModalResult {
        if self.armed.is_none() {
            return ModalResult::Ignored;
        }
        let Some(dialog) = self.dialog.as_mut() else {
            return ModalResult::Ignored;
        };

        if dialog.mode == DialogMode::Properties {
            return self.cancel();
        }

        if let Some(index) = dialog.form.validate() {
            debug!("Dialog \"{}\" failed validation at field {}", dialog.title, index);
            dialog.focus = Some(Focus::Field(index));
            return ModalResult::Invalid;
        }

        let data = dialog.form.collect();
        let result = match self.armed.as_mut().and_then(|armed| armed.on_confirm.as_mut()) {
            Some(on_confirm) => on_confirm(&data),
            None => ConfirmResult::Accepted,
        };

        match result {
            ConfirmResult::Accepted => {
                debug!("Dialog confirmed");
                self.armed = None;
                self.hide();
                ModalResult::Confirmed
            }
            ConfirmResult::Rejected(message) => {
                warn!("Dialog submission rejected: {}", message);
                self.notifier.notify(&message, NotificationLevel::Error);
                ModalResult::Rejected
            }
        }
    }

    /// Dismiss the dialog, invoking the cancel handler if one is armed
    pub fn cancel(&mut self) -> ModalResult {
        let Some(callbacks) = self.armed.take() else {
            return ModalResult::Ignored;
        };

        debug!("Dialog cancelled");
        if let Some(on_cancel) = callbacks.on_cancel {
            on_cancel();
        }
        self.hide();
        ModalResult::Cancelled
    }

    /// Start the hide transition. Safe to call at any time.
    pub fn hide(&mut self) {
        if matches!(self.phase, DialogPhase::Closed | DialogPhase::Hiding) {
            return;
        }

        self.armed = None;
        self.phase = DialogPhase::Hiding;
        self.phase_started = Instant::now();

        if self.config.transition.is_zero() {
            self.finish_hide();
        }
    }

    /// Advance the show/hide transitions
    pub fn tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.phase_started);
        if elapsed < self.config.transition {
            return;
        }

        match self.phase {
            DialogPhase::Showing => self.settle_open(),
            DialogPhase::Hiding => self.finish_hide(),
            DialogPhase::Open | DialogPhase::Closed => {}
        }
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    /// A dialog is on screen, including during transitions
    pub fn is_visible(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn dialog(&self) -> Option<&ActiveDialog> {
        self.dialog.as_ref()
    }

    /// 0.0 (hidden) to 1.0 (fully shown)
    pub fn transition_progress(&self, now: Instant) -> f64 {
        let fraction = if self.config.transition.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(self.phase_started);
            (elapsed.as_secs_f64() / self.config.transition.as_secs_f64()).min(1.0)
        };

        match self.phase {
            DialogPhase::Closed => 0.0,
            DialogPhase::Showing => fraction,
            DialogPhase::Open => 1.0,
            DialogPhase::Hiding => 1.0 - fraction,
        }
    }

    fn settle_open(&mut self) {
        self.phase = DialogPhase::Open;
        if let Some(dialog) = self.dialog.as_mut() {
            if dialog.focus.is_none() {
                dialog.focus = Some(dialog.initial_focus());
            }
        }
    }

    fn finish_hide(&mut self) {
        self.phase = DialogPhase::Closed;
        self.dialog = None;
        self.armed = None;
        self.panel_area = None;
        self.button_areas.clear();
    }

    fn activate(&mut self, focus: Focus) -> ModalResult {
        match focus {
            Focus::Cancel | Focus::Close => self.cancel(),
            Focus::Confirm | Focus::Field(_) => self.confirm(),
        }
    }

    fn handle_open_key(&mut self, key: KeyEvent) -> ModalResult {
        let Some(dialog) = self.dialog.as_mut() else {
            return ModalResult::Ignored;
        };

        match key.code {
            KeyCode::Tab | KeyCode::Down => dialog.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => dialog.move_focus(false),
            KeyCode::Enter => {
                let focus = dialog.focus.unwrap_or(Focus::Confirm);
                return self.activate(focus);
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match dialog.focus {
                    Some(Focus::Cancel) | Some(Focus::Confirm) => {
                        dialog.focus = Some(if forward { Focus::Confirm } else { Focus::Cancel });
                    }
                    _ => {
                        if let Some(field) = dialog.focused_field() {
                            if field.spec.is_select() {
                                field.cycle_option(forward);
                            } else if forward {
                                field.move_right();
                            } else {
                                field.move_left();
                            }
                        }
                    }
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = dialog.focused_field() {
                    field.clear();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = dialog.focused_field() {
                    if field.spec.is_select() && c == ' ' {
                        field.cycle_option(true);
                    } else {
                        field.insert_char(c);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = dialog.focused_field() {
                    field.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(field) = dialog.focused_field() {
                    field.delete();
                }
            }
            KeyCode::Home => {
                if let Some(field) = dialog.focused_field() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = dialog.focused_field() {
                    field.move_end();
                }
            }
            _ => return ModalResult::Ignored,
        }

        ModalResult::Consumed
    }
}

impl Modal for ModalController {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let progress = self.transition_progress(Instant::now());
        let Some(dialog) = self.dialog.as_ref() else {
            return;
        };
        if self.phase == DialogPhase::Closed {
            return;
        }

        let layout = render::render_dialog(frame, area, dialog, progress, theme);
        // Clicks land against the settled panel, not the transition frame
        self.panel_area = Some(layout.full);
        self.button_areas = layout.buttons;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ModalResult {
        if self.armed.is_none() || key.kind == KeyEventKind::Release {
            return ModalResult::Ignored;
        }

        if key.code == KeyCode::Esc {
            return self.cancel();
        }

        match self.phase {
            DialogPhase::Open => self.handle_open_key(key),
            // Input waits for the show transition to settle
            _ => ModalResult::Consumed,
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> ModalResult {
        if self.armed.is_none() {
            return ModalResult::Ignored;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return ModalResult::Consumed;
        }

        let (column, row) = (mouse.column, mouse.row);
        let Some(panel) = self.panel_area else {
            return ModalResult::Consumed;
        };

        if !contains(panel, column, row) {
            debug!("Backdrop clicked");
            return self.cancel();
        }

        let hit = self
            .button_areas
            .iter()
            .find(|(area, _)| contains(*area, column, row))
            .map(|(_, focus)| *focus);

        match hit {
            Some(focus) if self.phase == DialogPhase::Open => self.activate(focus),
            _ => ModalResult::Consumed,
        }
    }

    fn is_open(&self) -> bool {
        self.armed.is_some()
    }

    fn close(&mut self) {
        self.hide();
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::modals::{request::FieldSpec, MockNotifier};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn quiet_notifier() -> Box<dyn Notifier> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        Box::new(notifier)
    }

    fn size_request() -> DialogRequest {
        DialogRequest::form("Size", vec![FieldSpec::text("size", "Size").required()])
    }

    #[test]
    fn focus_waits_for_show_transition() {
        let config = ModalConfig {
            transition: Duration::from_millis(100),
            ..ModalConfig::default()
        };
        let mut controller = ModalController::new(config, quiet_notifier());

        controller.show(size_request(), DialogCallbacks::new());
        assert_eq!(controller.phase(), DialogPhase::Showing);
        assert_eq!(controller.dialog().unwrap().focus(), None);

        // Typing before the dialog settles goes nowhere
        controller.handle_key_event(key(KeyCode::Char('x')));

        controller.tick(Instant::now() + Duration::from_millis(150));
        assert_eq!(controller.phase(), DialogPhase::Open);
        assert_eq!(controller.dialog().unwrap().focus(), Some(Focus::Field(0)));
        assert_eq!(controller.dialog().unwrap().field("size").unwrap().text(), "");
    }

    #[test]
    fn hide_keeps_surface_until_transition_ends() {
        let config = ModalConfig {
            transition: Duration::from_millis(100),
            ..ModalConfig::default()
        };
        let mut controller = ModalController::new(config, quiet_notifier());

        controller.show(size_request(), DialogCallbacks::new());
        controller.hide();

        assert_eq!(controller.phase(), DialogPhase::Hiding);
        assert!(controller.is_visible());
        assert!(!controller.is_open());

        controller.tick(Instant::now() + Duration::from_millis(150));
        assert_eq!(controller.phase(), DialogPhase::Closed);
        assert!(controller.dialog().is_none());
    }

    #[test]
    fn show_during_hide_finishes_the_hide_first() {
        let config = ModalConfig {
            transition: Duration::from_millis(100),
            ..ModalConfig::default()
        };
        let mut controller = ModalController::new(config, quiet_notifier());

        controller.show(size_request(), DialogCallbacks::new());
        controller.hide();
        controller.show(
            DialogRequest::properties("Props", vec![PropertyEntry::new("Name", "C:")]),
            DialogCallbacks::new(),
        );

        assert_eq!(controller.phase(), DialogPhase::Showing);
        assert!(controller.is_open());
        assert_eq!(controller.dialog().unwrap().title(), "Props");

        // The old hide deadline must not close the new dialog
        controller.tick(Instant::now() + Duration::from_millis(150));
        assert_eq!(controller.phase(), DialogPhase::Open);
    }

    #[test]
    fn clicks_inside_the_settling_panel_do_not_cancel() {
        use crate::ui::theme::Theme;
        use ratatui::{backend::TestBackend, Terminal};

        let config = ModalConfig {
            transition: Duration::from_secs(10),
            ..ModalConfig::default()
        };
        let mut controller = ModalController::new(config, quiet_notifier());
        controller.show(size_request(), DialogCallbacks::new());

        let theme = Theme::default_theme();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                controller.render(frame, area, &theme);
            })
            .unwrap();

        // Label and input only: the settled panel is 6 rows at y = 17 while
        // the first frames draw it half height
        let full = controller.panel_area.unwrap();
        assert_eq!((full.y, full.height), (17, 6));

        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(controller.handle_mouse_event(click(50, 17)), ModalResult::Consumed);
        assert!(controller.is_open());

        assert_eq!(controller.handle_mouse_event(click(50, 2)), ModalResult::Cancelled);
    }

    #[test]
    fn rejected_submission_notifies_and_stays_open() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|message, level| message == "bad size" && *level == NotificationLevel::Error)
            .times(1)
            .return_const(());

        let mut controller = ModalController::new(
            ModalConfig {
                transition: Duration::ZERO,
                ..ModalConfig::default()
            },
            Box::new(notifier),
        );
        controller.show(
            size_request(),
            DialogCallbacks::new().on_confirm(|_| ConfirmResult::Rejected("bad size".to_string())),
        );

        controller.handle_key_event(key(KeyCode::Char('1')));
        assert_eq!(controller.handle_key_event(key(KeyCode::Enter)), ModalResult::Rejected);
        assert!(controller.is_open());
        assert_eq!(controller.phase(), DialogPhase::Open);
    }
}
