//! Dialog descriptions
//!
//! A [`DialogRequest`] is plain data: what to show and which inputs to
//! collect. The controller turns it into a view; callers never touch the
//! surface directly.

use indexmap::IndexMap;

/// Submitted values keyed by field name, in field order
pub type FormData = IndexMap<String, String>;

/// Handler invoked with the collected form values.
///
/// Returning [`ConfirmResult::Rejected`] keeps the dialog open.
pub type ConfirmHandler = Box<dyn FnMut(&FormData) -> ConfirmResult + Send>;

/// Handler invoked when the dialog is dismissed without confirming
pub type CancelHandler = Box<dyn FnOnce() + Send>;

/// What the confirm handler decided about a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Values were taken; close the dialog
    Accepted,
    /// Values were refused; report the message and keep the dialog open
    Rejected(String),
}

/// How a dialog ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed(FormData),
    Cancelled,
}

/// Input widget kind for a form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Select(Vec<SelectOption>),
}

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Declarative description of one form input
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub initial_value: Option<String>,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub hint: Option<String>,
    pub max_length: Option<usize>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            placeholder: None,
            initial_value: None,
            required: false,
            min: None,
            max: None,
            step: None,
            hint: None,
            max_length: None,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.initial_value = Some(value.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select(_))
    }
}

/// Read-only label/value row of a properties dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub label: String,
    pub value: String,
}

impl PropertyEntry {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Form,
    Properties,
}

/// Dialog content, one variant per mode
#[derive(Debug, Clone, PartialEq)]
pub enum DialogBody {
    Form(Vec<FieldSpec>),
    Properties(Vec<PropertyEntry>),
}

/// Everything needed to put a dialog on screen
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRequest {
    pub title: String,
    pub description: Option<String>,
    pub body: DialogBody,
}

impl DialogRequest {
    pub fn form(title: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            body: DialogBody::Form(fields),
        }
    }

    pub fn properties(title: &str, entries: Vec<PropertyEntry>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            body: DialogBody::Properties(entries),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn mode(&self) -> DialogMode {
        match self.body {
            DialogBody::Form(_) => DialogMode::Form,
            DialogBody::Properties(_) => DialogMode::Properties,
        }
    }
}

/// The callback pair armed alongside a request
///
/// Either side may be omitted: a missing confirm handler accepts every valid
/// submission, a missing cancel handler makes cancelling a plain close.
#[derive(Default)]
pub struct DialogCallbacks {
    pub(crate) on_confirm: Option<ConfirmHandler>,
    pub(crate) on_cancel: Option<CancelHandler>,
}

impl DialogCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_confirm<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&FormData) -> ConfirmResult + Send + 'static,
    {
        self.on_confirm = Some(Box::new(handler));
        self
    }

    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    /// Attach an optional, already boxed cancel handler
    pub fn with_cancel_handler(mut self, handler: Option<CancelHandler>) -> Self {
        self.on_cancel = handler;
        self
    }
}

impl std::fmt::Debug for DialogCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogCallbacks")
            .field("on_confirm", &self.on_confirm.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}
