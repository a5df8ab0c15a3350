use anyhow::Result;
use regex::Regex;

use crate::error::GenerateError;
use crate::model::{CommandShape, PropertyDescriptor, PropertyKind};

/// Sorts declared property types into scalars and the four command shapes.
#[derive(Debug, Clone)]
pub struct Classifier {
    command_type: String,
    plain_execute: String,
    plain_can_execute: String,
    generic_execute: Regex,
    generic_can_execute: Regex,
}

impl Classifier {
    pub fn new(command_type: &str) -> Result<Self> {
        let escaped = regex::escape(command_type);
        Ok(Self {
            command_type: command_type.to_string(),
            plain_execute: format!("{command_type}(Action)"),
            plain_can_execute: format!("{command_type}(Action, Func<bool>)"),
            generic_execute: Regex::new(&format!(r"^{escaped}<(.+)>\(Action<(.+)>\)$"))?,
            generic_can_execute: Regex::new(&format!(
                r"^{escaped}<(.+)>\(Action<.+>,\s*Func<.+,\s*bool>\)$"
            ))?,
        })
    }

    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    pub fn classify(&self, property: &PropertyDescriptor) -> Result<PropertyKind, GenerateError> {
        let type_text = property.type_text.trim();
        if !type_text.starts_with(&self.command_type) {
            return Ok(PropertyKind::Scalar {
                type_text: type_text.to_string(),
            });
        }

        if type_text == self.plain_execute {
            return Ok(PropertyKind::Command(CommandShape::PlainExecute));
        }
        if type_text == self.plain_can_execute {
            return Ok(PropertyKind::Command(CommandShape::PlainCanExecute));
        }

        // Can-execute first: the execute-only pattern would also accept it.
        if let Some(caps) = self.generic_can_execute.captures(type_text) {
            return Ok(PropertyKind::Command(CommandShape::GenericCanExecute {
                type_parameter: caps[1].to_string(),
            }));
        }
        if let Some(caps) = self.generic_execute.captures(type_text) {
            // `(.+)` also spans `Action<T>, Func<...`; the payload must close
            // every bracket it opens.
            if brackets_balanced(&caps[1]) && brackets_balanced(&caps[2]) {
                return Ok(PropertyKind::Command(CommandShape::GenericExecute {
                    type_parameter: caps[1].to_string(),
                }));
            }
        }

        Err(GenerateError::UnrecognizedCommandShape {
            name: property.name.clone(),
            type_text: type_text.to_string(),
        })
    }
}

fn brackets_balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use crate::error::GenerateError;
    use crate::model::{CommandShape, PropertyDescriptor, PropertyKind};

    use super::Classifier;

    fn classify(type_text: &str) -> Result<PropertyKind, GenerateError> {
        Classifier::new("RelayCommand")
            .expect("valid classifier")
            .classify(&PropertyDescriptor::new("Prop", type_text))
    }

    #[test]
    fn scalar_types_are_carried_verbatim() {
        assert_eq!(
            classify("ObservableCollection<string>"),
            Ok(PropertyKind::Scalar {
                type_text: "ObservableCollection<string>".to_string()
            })
        );
        assert_eq!(
            classify("unknown"),
            Ok(PropertyKind::Scalar {
                type_text: "unknown".to_string()
            })
        );
    }

    #[test]
    fn plain_shapes() {
        assert_eq!(
            classify("RelayCommand(Action)"),
            Ok(PropertyKind::Command(CommandShape::PlainExecute))
        );
        assert_eq!(
            classify("RelayCommand(Action, Func<bool>)"),
            Ok(PropertyKind::Command(CommandShape::PlainCanExecute))
        );
    }

    #[test]
    fn generic_execute_captures_type_parameter() {
        assert_eq!(
            classify("RelayCommand<Item>(Action<Item>)"),
            Ok(PropertyKind::Command(CommandShape::GenericExecute {
                type_parameter: "Item".to_string()
            }))
        );
        assert_eq!(
            classify("RelayCommand<List<int>>(Action<List<int>>)"),
            Ok(PropertyKind::Command(CommandShape::GenericExecute {
                type_parameter: "List<int>".to_string()
            }))
        );
    }

    #[test]
    fn generic_execute_accepts_delegate_type_parameters() {
        assert_eq!(
            classify("RelayCommand<Func<int>>(Action<Func<int>>)"),
            Ok(PropertyKind::Command(CommandShape::GenericExecute {
                type_parameter: "Func<int>".to_string()
            }))
        );
        assert_eq!(
            classify("RelayCommand<Func<int, bool>>(Action<Func<int, bool>>)"),
            Ok(PropertyKind::Command(CommandShape::GenericExecute {
                type_parameter: "Func<int, bool>".to_string()
            }))
        );
    }

    #[test]
    fn brackets_balanced_tracks_nesting() {
        assert!(super::brackets_balanced("Dictionary<string, List<int>>"));
        assert!(super::brackets_balanced("Func<int, bool>"));
        assert!(!super::brackets_balanced("int>, Func<bool"));
        assert!(!super::brackets_balanced("List<int"));
    }

    #[test]
    fn generic_can_execute_uses_its_own_capture() {
        assert_eq!(
            classify("RelayCommand<Item>(Action<Item>, Func<Item, bool>)"),
            Ok(PropertyKind::Command(CommandShape::GenericCanExecute {
                type_parameter: "Item".to_string()
            }))
        );
        assert_eq!(
            classify("RelayCommand<Dictionary<string, int>>(Action<Dictionary<string, int>>, Func<Dictionary<string, int>, bool>)"),
            Ok(PropertyKind::Command(CommandShape::GenericCanExecute {
                type_parameter: "Dictionary<string, int>".to_string()
            }))
        );
    }

    #[test]
    fn unrecognized_command_shapes_are_errors() {
        for type_text in [
            "RelayCommand",
            "RelayCommand(Action<int>)",
            "RelayCommand<int>(Action<int>, Func<bool>)",
            "RelayCommandFactory",
        ] {
            assert_eq!(
                classify(type_text),
                Err(GenerateError::UnrecognizedCommandShape {
                    name: "Prop".to_string(),
                    type_text: type_text.to_string(),
                }),
                "{type_text}"
            );
        }
    }

    #[test]
    fn command_type_is_matched_literally() {
        let classifier = Classifier::new("Cmd.Relay").expect("valid classifier");
        let kind = classifier
            .classify(&PropertyDescriptor::new("Go", "Cmd.Relay(Action)"))
            .expect("recognized");
        assert_eq!(kind, PropertyKind::Command(CommandShape::PlainExecute));
        assert_eq!(classifier.command_type(), "Cmd.Relay");
    }
}
