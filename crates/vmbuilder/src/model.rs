use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
        }
    }

    /// Public member name, e.g. `userName` -> `UserName`.
    pub fn property_name(&self) -> String {
        first_letter_to_upper(self.name.trim())
    }

    /// Backing field name, e.g. `UserName` -> `userName`.
    pub fn field_name(&self) -> String {
        first_letter_to_lower(self.name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandShape {
    PlainExecute,
    PlainCanExecute,
    GenericExecute { type_parameter: String },
    GenericCanExecute { type_parameter: String },
}

impl CommandShape {
    pub fn type_parameter(&self) -> Option<&str> {
        match self {
            CommandShape::PlainExecute | CommandShape::PlainCanExecute => None,
            CommandShape::GenericExecute { type_parameter }
            | CommandShape::GenericCanExecute { type_parameter } => Some(type_parameter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar { type_text: String },
    Command(CommandShape),
}

pub fn first_letter_to_upper(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn first_letter_to_lower(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Invariant:
// - `CommandShape::Generic*::type_parameter` is the text captured by that
//   shape's own pattern, never another shape's.

#[cfg(test)]
mod tests {
    use super::{first_letter_to_lower, first_letter_to_upper, CommandShape, PropertyDescriptor};

    #[test]
    fn first_letter_helpers() {
        assert_eq!(first_letter_to_upper("userName"), "UserName");
        assert_eq!(first_letter_to_lower("UserName"), "userName");
        assert_eq!(first_letter_to_upper("x"), "X");
        assert_eq!(first_letter_to_upper(""), "");
        assert_eq!(first_letter_to_lower(""), "");
        assert_eq!(first_letter_to_upper("élan"), "Élan");
    }

    #[test]
    fn derived_names_ignore_surrounding_whitespace() {
        let property = PropertyDescriptor::new("  count ", "int");
        assert_eq!(property.property_name(), "Count");
        assert_eq!(property.field_name(), "count");
    }

    #[test]
    fn descriptor_uses_type_key_in_json() {
        let parsed: Vec<PropertyDescriptor> =
            serde_json::from_str(r#"[{"name": "Title", "type": "string"}]"#)
                .expect("invalid test json");
        assert_eq!(parsed, vec![PropertyDescriptor::new("Title", "string")]);
    }

    #[test]
    fn command_shape_accessors() {
        assert_eq!(CommandShape::PlainExecute.type_parameter(), None);
        assert_eq!(CommandShape::PlainCanExecute.type_parameter(), None);

        let generic = CommandShape::GenericCanExecute {
            type_parameter: "Item".to_string(),
        };
        assert_eq!(generic.type_parameter(), Some("Item"));
    }
}
