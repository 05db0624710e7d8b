use std::str::FromStr;

use super::buffer::FieldBuffer;
use crate::form::FormValues;
use crate::model::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FormField {
    #[default]
    Title,
    Description,
    DueDate,
    Priority,
}

impl FormField {
    pub(crate) const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::DueDate,
        FormField::Priority,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::DueDate => "Due date",
            FormField::Priority => "Priority",
        }
    }

    fn index(&self) -> usize {
        match self {
            FormField::Title => 0,
            FormField::Description => 1,
            FormField::DueDate => 2,
            FormField::Priority => 3,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable mirror of the controller's form values.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormState {
    pub(crate) title: FieldBuffer,
    pub(crate) description: FieldBuffer,
    pub(crate) due_date: FieldBuffer,
    pub(crate) priority: Priority,
    pub(crate) focus: FormField,
}

impl FormState {
    pub(crate) fn load(&mut self, values: &FormValues) {
        self.title.set(values.title.as_str());
        self.description.set(values.description.as_str());
        self.due_date.set(values.due_date.as_str());
        self.priority = Priority::from_str(&values.priority).unwrap_or_default();
        self.focus = FormField::Title;
    }

    pub(crate) fn values(&self) -> FormValues {
        FormValues {
            title: self.title.as_str().to_string(),
            description: self.description.as_str().to_string(),
            due_date: self.due_date.as_str().to_string(),
            priority: self.priority.as_str().to_string(),
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// The focused text buffer; `None` while the priority selector has focus.
    pub(crate) fn focused_buffer(&mut self) -> Option<&mut FieldBuffer> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }

    pub(crate) fn buffer(&self, field: FormField) -> Option<&FieldBuffer> {
        match field {
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::DueDate => Some(&self.due_date),
            FormField::Priority => None,
        }
    }

    pub(crate) fn raise_priority(&mut self) {
        self.priority = self.priority.next();
    }

    pub(crate) fn lower_priority(&mut self) {
        self.priority = self.priority.prev();
    }

    /// Shortcut letters on the priority selector.
    pub(crate) fn pick_priority(&mut self, ch: char) -> bool {
        let priority = match ch.to_ascii_lowercase() {
            'l' => Priority::Low,
            'm' => Priority::Medium,
            'h' => Priority::High,
            _ => return false,
        };
        self.priority = priority;
        true
    }
}
