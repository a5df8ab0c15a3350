use thiserror::Error;

/// Recoverable failures while turning property descriptors into source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("property `{name}` has an unrecognized command shape: {type_text}")]
    UnrecognizedCommandShape { name: String, type_text: String },

    #[error("property at index {index} has an empty name")]
    EmptyPropertyName { index: usize },

    #[error("a namespace was given without a ViewModel name")]
    NamespaceWithoutClassName,

    #[error("invalid property `{0}`, expected Name:Type")]
    InvalidPropertySpec(String),
}
