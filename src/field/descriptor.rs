use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{extract_group_question, extract_label};
use crate::dom::{Document, NodeId};
use crate::options::extract::is_select_like;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Textbox,
    Email,
    Tel,
    Radio,
    Checkbox,
    Number,
    Date,
    Password,
    Url,
    File,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Select => "select",
            FieldType::Textbox => "textbox",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Password => "password",
            FieldType::Url => "url",
            FieldType::File => "file",
        }
    }

    /// Map an `<input type>` value onto the closed set. Unlisted types are `None`.
    pub fn from_input_type(input_type: &str) -> Option<Self> {
        match input_type.to_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "email" => Some(FieldType::Email),
            "tel" => Some(FieldType::Tel),
            "radio" => Some(FieldType::Radio),
            "checkbox" => Some(FieldType::Checkbox),
            "number" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            "password" => Some(FieldType::Password),
            "url" => Some(FieldType::Url),
            "file" => Some(FieldType::File),
            _ => None,
        }
    }

    /// Derive the field type of a control from its tag and `type` attribute.
    pub fn of(doc: &Document, node: NodeId) -> Self {
        match doc.tag(node) {
            "select" => FieldType::Select,
            "textarea" => FieldType::Textbox,
            "input" => doc
                .attr(node, "type")
                .and_then(FieldType::from_input_type)
                .unwrap_or(FieldType::Text),
            _ => FieldType::Text,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Radio | FieldType::Checkbox)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, serializable view of one form control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub label: Option<String>,
    #[serde(default)]
    pub whole_question_label: Option<String>,
    pub field_type: FieldType,
    pub name: String,
    pub declared_type: String,
    pub placeholder: String,
    pub autocomplete: String,
    pub html_id: String,
    pub class_name: String,
    pub current_value: String,
    pub required: bool,
    pub reference_id: String,
}

/// Reduced field sent to the external resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifiedField {
    pub label: Option<String>,
    pub name: String,
    pub field_type: FieldType,
    pub whole_question_label: Option<String>,
    pub value: String,
    pub id: String,
}

impl FieldDescriptor {
    pub fn new(reference_id: &str, field_type: FieldType) -> Self {
        Self {
            label: None,
            whole_question_label: None,
            field_type,
            name: String::new(),
            declared_type: field_type.as_str().to_string(),
            placeholder: String::new(),
            autocomplete: String::new(),
            html_id: String::new(),
            class_name: String::new(),
            current_value: String::new(),
            required: false,
            reference_id: reference_id.to_string(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_question(mut self, question: &str) -> Self {
        self.whole_question_label = Some(question.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_declared_type(mut self, declared_type: &str) -> Self {
        self.declared_type = declared_type.to_string();
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: &str) -> Self {
        self.autocomplete = autocomplete.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.current_value = value.to_string();
        self
    }

    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    pub fn minified(&self) -> MinifiedField {
        MinifiedField {
            label: self.label.clone(),
            name: self.name.clone(),
            field_type: self.field_type,
            whole_question_label: self.whole_question_label.clone(),
            value: self.current_value.clone(),
            id: self.reference_id.clone(),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field(referenceId: {}, label: {:?}, fieldType: {}",
            self.reference_id, self.label, self.field_type
        )?;
        if let Some(q) = &self.whole_question_label {
            write!(f, ", wholeQuestionLabel: {:?}", q)?;
        }
        write!(f, ")")
    }
}

/// Build the descriptor for `node`. `reference_id` must already be attached.
pub fn build_descriptor(doc: &Document, node: NodeId, reference_id: &str) -> FieldDescriptor {
    let field_type = FieldType::of(doc, node);
    let declared_type = match doc.tag(node) {
        "select" => {
            if doc.has_attr(node, "multiple") {
                "select-multiple".to_string()
            } else {
                "select-one".to_string()
            }
        }
        "textarea" => "textarea".to_string(),
        _ => doc.attr(node, "type").unwrap_or("text").to_lowercase(),
    };

    let label = extract_label(doc, node);
    let whole_question_label = extract_group_question(doc, node, label.as_deref());
    let placeholder = doc.attr(node, "placeholder").unwrap_or("").to_string();

    let current_value = if field_type.is_choice() {
        doc.checked(node).to_string()
    } else {
        let raw = strip_value_prefix(doc.value(node));
        if raw.is_empty() && is_select_like(doc, node) && doc.tag(node) != "select" {
            displayed_value(doc, node, &placeholder, label.as_deref().unwrap_or(""))
        } else {
            raw.to_string()
        }
    };

    FieldDescriptor {
        label,
        whole_question_label,
        field_type,
        name: doc.attr(node, "name").unwrap_or("").to_string(),
        declared_type,
        placeholder,
        autocomplete: doc.attr(node, "autocomplete").unwrap_or("").to_string(),
        html_id: doc.attr(node, "id").unwrap_or("").to_string(),
        class_name: doc.class_name(node).to_string(),
        current_value,
        required: doc.has_attr(node, "required"),
        reference_id: reference_id.to_string(),
    }
}

/// Drop framework value prefixes such as `string:` or `number:`.
pub fn strip_value_prefix(value: &str) -> &str {
    value
        .strip_prefix("string:")
        .or_else(|| value.strip_prefix("number:"))
        .unwrap_or(value)
}

const VALUE_CLASS_FRAGMENTS: &[&str] = &[
    "single-value",
    "selected-value",
    "value-container",
    "current-value",
    "display-value",
    "option-selected",
];

const PLACEHOLDER_VARIANTS: &[&str] = &[
    "select...",
    "choose...",
    "please select",
    "please choose",
    "select an option",
    "choose an option",
    "select a value",
    "choose a value",
    "select",
    "choose",
];

fn is_placeholder_like(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    PLACEHOLDER_VARIANTS.iter().any(|v| lower.starts_with(v))
}

/// Value shown by a custom select widget next to its empty input.
fn displayed_value(doc: &Document, node: NodeId, placeholder: &str, label: &str) -> String {
    let acceptable = |text: &str| {
        !text.is_empty()
            && !text.eq_ignore_ascii_case(placeholder)
            && !text.eq_ignore_ascii_case(label)
            && !is_placeholder_like(text)
    };

    let scopes = std::iter::once(node).chain(doc.ancestors(node)).take(5);
    for scope in scopes {
        for fragment in VALUE_CLASS_FRAGMENTS {
            let hit = doc
                .find_descendants(scope, |d, n| d.class_name(n).contains(fragment))
                .into_iter()
                .find(|n| !doc.text_content(*n).trim().is_empty());
            if let Some(hit) = hit {
                let text = doc.text_content(hit).trim().to_string();
                if acceptable(&text) && doc.is_visible(hit) {
                    return text;
                }
            }
        }
    }

    if let Some(parent) = doc.parent(node) {
        for sibling in doc.element_children(parent) {
            if sibling == node || !doc.is_visible(sibling) {
                continue;
            }
            let text = doc.text_content(sibling).trim().to_string();
            if acceptable(&text) {
                return text;
            }
        }
    }
    String::new()
}
