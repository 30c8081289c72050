//! Editable state behind a form dialog
//!
//! Each [`FieldSpec`] gets a [`FieldState`] holding the text being typed or
//! the option currently chosen, plus the last validation message. Validation
//! mirrors what a browser does for `required`, `type=number`, `min`, `max`
//! and `step` before a form may be submitted.

use super::request::{FieldKind, FieldSpec, FormData};

const REQUIRED_MESSAGE: &str = "Please fill out this field.";
const REQUIRED_SELECT_MESSAGE: &str = "Please select an item in the list.";
const NUMBER_MESSAGE: &str = "Please enter a number.";
const STEP_MESSAGE: &str = "Please enter a valid value.";

/// Live state of one field
#[derive(Debug, Clone)]
pub struct FieldState {
    pub spec: FieldSpec,
    value: String,
    cursor: usize,
    selected_option: usize,
    error: Option<String>,
}

impl FieldState {
    pub fn new(spec: FieldSpec) -> Self {
        let value = spec.initial_value.clone().unwrap_or_default();
        let cursor = value.chars().count();

        // First flagged option wins; none flagged means the first option.
        let selected_option = match &spec.kind {
            FieldKind::Select(options) => options.iter().position(|o| o.selected).unwrap_or(0),
            _ => 0,
        };

        Self {
            spec,
            value,
            cursor,
            selected_option,
            error: None,
        }
    }

    /// Text as typed, ignoring select fields
    pub fn text(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_option
    }

    /// Value submitted for this field
    pub fn value(&self) -> String {
        match &self.spec.kind {
            FieldKind::Select(options) => options
                .get(self.selected_option)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            _ => self.value.clone(),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        match self.spec.kind {
            FieldKind::Select(_) => return,
            FieldKind::Number if !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) => {
                return
            }
            _ => {}
        }

        if let Some(max_length) = self.spec.max_length {
            if self.value.chars().count() >= max_length {
                return;
            }
        }

        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.spec.is_select() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        self.error = None;
    }

    pub fn delete(&mut self) {
        if self.spec.is_select() || self.cursor >= self.value.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        self.error = None;
    }

    pub fn clear(&mut self) {
        if self.spec.is_select() {
            return;
        }
        self.value.clear();
        self.cursor = 0;
        self.error = None;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Step through select options, wrapping at either end
    pub fn cycle_option(&mut self, forward: bool) {
        let FieldKind::Select(options) = &self.spec.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let len = options.len();
        self.selected_option = if forward {
            (self.selected_option + 1) % len
        } else {
            (self.selected_option + len - 1) % len
        };
        self.error = None;
    }

    /// Run the native checks, recording the message on failure
    pub fn validate(&mut self) -> bool {
        self.error = self.check();
        self.error.is_none()
    }

    fn check(&self) -> Option<String> {
        match &self.spec.kind {
            FieldKind::Select(options) => {
                if self.spec.required && options.get(self.selected_option).is_none() {
                    return Some(REQUIRED_SELECT_MESSAGE.to_string());
                }
                None
            }
            FieldKind::Text => {
                if self.spec.required && self.value.trim().is_empty() {
                    return Some(REQUIRED_MESSAGE.to_string());
                }
                None
            }
            FieldKind::Number => {
                let raw = self.value.trim();
                if raw.is_empty() {
                    return self.spec.required.then(|| REQUIRED_MESSAGE.to_string());
                }

                let Ok(number) = raw.parse::<f64>() else {
                    return Some(NUMBER_MESSAGE.to_string());
                };
                if !number.is_finite() {
                    return Some(NUMBER_MESSAGE.to_string());
                }

                if let Some(min) = self.spec.min {
                    if number < min {
                        return Some(format!("Value must be greater than or equal to {}.", min));
                    }
                }
                if let Some(max) = self.spec.max {
                    if number > max {
                        return Some(format!("Value must be less than or equal to {}.", max));
                    }
                }
                if let Some(step) = self.spec.step.filter(|step| *step > 0.0) {
                    let steps = (number - self.spec.min.unwrap_or(0.0)) / step;
                    if (steps - steps.round()).abs() > 1e-9 {
                        return Some(STEP_MESSAGE.to_string());
                    }
                }
                None
            }
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.value.len())
    }
}

/// All fields of a form dialog
#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: Vec<FieldState>,
}

impl FormState {
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        Self {
            fields: specs.into_iter().map(FieldState::new).collect(),
        }
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut FieldState> {
        self.fields.get_mut(index)
    }

    /// Validate every field; returns the index of the first invalid one
    pub fn validate(&mut self) -> Option<usize> {
        let mut first_invalid = None;
        for (index, field) in self.fields.iter_mut().enumerate() {
            if !field.validate() && first_invalid.is_none() {
                first_invalid = Some(index);
            }
        }
        first_invalid
    }

    /// Collect `name -> value` in field order
    pub fn collect(&self) -> FormData {
        self.fields
            .iter()
            .map(|f| (f.spec.name.clone(), f.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::modals::request::SelectOption;

    fn type_into(field: &mut FieldState, text: &str) {
        text.chars().for_each(|c| field.insert_char(c));
    }

    #[test]
    fn required_text_must_not_be_blank() {
        let mut field = FieldState::new(FieldSpec::text("name", "Name").required());
        type_into(&mut field, "   ");
        assert!(!field.validate());
        assert_eq!(field.error(), Some(REQUIRED_MESSAGE));

        field.clear();
        type_into(&mut field, "D:");
        assert!(field.validate());
        assert_eq!(field.error(), None);
    }

    #[test]
    fn max_length_stops_input() {
        let mut field = FieldState::new(FieldSpec::text("name", "Name").with_max_length(3));
        type_into(&mut field, "ABCDE");
        assert_eq!(field.text(), "ABC");
    }

    #[test]
    fn editing_respects_cursor_position() {
        let mut field = FieldState::new(FieldSpec::text("size", "Size").with_value("50GB"));
        field.move_left();
        field.move_left();
        field.insert_char(' ');
        assert_eq!(field.text(), "50 GB");

        field.move_home();
        field.delete();
        assert_eq!(field.text(), "0 GB");

        field.move_end();
        field.backspace();
        assert_eq!(field.text(), "0 G");
    }

    #[test]
    fn number_fields_check_range_and_step() {
        let spec = FieldSpec::number("count", "Count")
            .with_min(1.0)
            .with_max(10.0)
            .with_step(0.5);
        let mut field = FieldState::new(spec);

        type_into(&mut field, "abc");
        assert_eq!(field.text(), "");
        assert!(field.validate());

        type_into(&mut field, "12");
        assert!(!field.validate());
        assert_eq!(field.error(), Some("Value must be less than or equal to 10."));

        field.clear();
        type_into(&mut field, "2.25");
        assert!(!field.validate());
        assert_eq!(field.error(), Some(STEP_MESSAGE));

        field.clear();
        type_into(&mut field, "2.5");
        assert!(field.validate());
    }

    #[test]
    fn select_defaults_to_flagged_then_first_option() {
        let flagged = FieldState::new(FieldSpec::select(
            "type",
            "Type",
            vec![
                SelectOption::new("primary", "Primary"),
                SelectOption::new("logical", "Logical").selected(),
            ],
        ));
        assert_eq!(flagged.value(), "logical");

        let mut unflagged = FieldState::new(FieldSpec::select(
            "type",
            "Type",
            vec![
                SelectOption::new("primary", "Primary"),
                SelectOption::new("logical", "Logical"),
            ],
        ));
        assert_eq!(unflagged.value(), "primary");

        unflagged.cycle_option(false);
        assert_eq!(unflagged.value(), "logical");
        unflagged.cycle_option(true);
        assert_eq!(unflagged.value(), "primary");
    }

    #[test]
    fn collect_keeps_field_order() {
        let mut form = FormState::new(vec![
            FieldSpec::text("name", "Name").with_value("DATA"),
            FieldSpec::text("size", "Size").required(),
        ]);

        assert_eq!(form.validate(), Some(1));

        let data = form.collect();
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "size"]);
        assert_eq!(data["name"], "DATA");
        assert_eq!(data["size"], "");
    }
}
