use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MergeField {
    ClassConstructor,
    ClassFields,
    ClassCommandDeclarations,
    ClassCommandMethods,
    ClassPropertyChanged,
    ClassProperties,
    FieldName,
    CommandInitializations,
    CommandImplementationType,
    CommandName,
    PropertyName,
    PropertyType,
    TypeParameter,
    ViewModelName,
    NamespaceName,
    NamespaceBody,
}

impl MergeField {
    pub const ALL: [MergeField; 16] = [
        MergeField::ClassConstructor,
        MergeField::ClassFields,
        MergeField::ClassCommandDeclarations,
        MergeField::ClassCommandMethods,
        MergeField::ClassPropertyChanged,
        MergeField::ClassProperties,
        MergeField::FieldName,
        MergeField::CommandInitializations,
        MergeField::CommandImplementationType,
        MergeField::CommandName,
        MergeField::PropertyName,
        MergeField::PropertyType,
        MergeField::TypeParameter,
        MergeField::ViewModelName,
        MergeField::NamespaceName,
        MergeField::NamespaceBody,
    ];

    /// Key of the field in the `merge_fields` config section.
    pub fn key(self) -> &'static str {
        match self {
            MergeField::ClassConstructor => "class_constructor",
            MergeField::ClassFields => "class_fields",
            MergeField::ClassCommandDeclarations => "class_command_declarations",
            MergeField::ClassCommandMethods => "class_command_methods",
            MergeField::ClassPropertyChanged => "class_property_changed",
            MergeField::ClassProperties => "class_properties",
            MergeField::FieldName => "field_name",
            MergeField::CommandInitializations => "command_initializations",
            MergeField::CommandImplementationType => "command_implementation_type",
            MergeField::CommandName => "command_name",
            MergeField::PropertyName => "property_name",
            MergeField::PropertyType => "property_type",
            MergeField::TypeParameter => "type_parameter",
            MergeField::ViewModelName => "view_model_name",
            MergeField::NamespaceName => "namespace_name",
            MergeField::NamespaceBody => "namespace_body",
        }
    }
}

/// Token text for every merge field, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeFieldCatalog {
    pub class_constructor: String,
    pub class_fields: String,
    pub class_command_declarations: String,
    pub class_command_methods: String,
    pub class_property_changed: String,
    pub class_properties: String,
    pub field_name: String,
    pub command_initializations: String,
    pub command_implementation_type: String,
    pub command_name: String,
    pub property_name: String,
    pub property_type: String,
    pub type_parameter: String,
    pub view_model_name: String,
    pub namespace_name: String,
    pub namespace_body: String,
}

impl MergeFieldCatalog {
    pub fn token(&self, field: MergeField) -> &str {
        match field {
            MergeField::ClassConstructor => &self.class_constructor,
            MergeField::ClassFields => &self.class_fields,
            MergeField::ClassCommandDeclarations => &self.class_command_declarations,
            MergeField::ClassCommandMethods => &self.class_command_methods,
            MergeField::ClassPropertyChanged => &self.class_property_changed,
            MergeField::ClassProperties => &self.class_properties,
            MergeField::FieldName => &self.field_name,
            MergeField::CommandInitializations => &self.command_initializations,
            MergeField::CommandImplementationType => &self.command_implementation_type,
            MergeField::CommandName => &self.command_name,
            MergeField::PropertyName => &self.property_name,
            MergeField::PropertyType => &self.property_type,
            MergeField::TypeParameter => &self.type_parameter,
            MergeField::ViewModelName => &self.view_model_name,
            MergeField::NamespaceName => &self.namespace_name,
            MergeField::NamespaceBody => &self.namespace_body,
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = (MergeField, &str)> + '_ {
        MergeField::ALL
            .into_iter()
            .map(move |field| (field, self.token(field)))
    }

    /// Builds a fresh token -> value mapping for one rendering step.
    pub fn bind(&self, values: &[(MergeField, &str)]) -> BTreeMap<String, String> {
        values
            .iter()
            .map(|(field, value)| (self.token(*field).to_string(), (*value).to_string()))
            .collect()
    }
}

impl Default for MergeFieldCatalog {
    fn default() -> Self {
        MergeFieldCatalog {
            class_constructor: "{ViewModel constructor}".to_string(),
            class_fields: "{ViewModel fields}".to_string(),
            class_command_declarations: "{ICommand declarations}".to_string(),
            class_command_methods: "{ICommand methods}".to_string(),
            class_property_changed: "{OnChanged EventHandler}".to_string(),
            class_properties: "{ViewModel properties}".to_string(),
            field_name: "{Field name}".to_string(),
            command_initializations: "{ICommand initializations}".to_string(),
            command_implementation_type: "{ICommand implementation type}".to_string(),
            command_name: "{ICommand name}".to_string(),
            property_name: "{Property name}".to_string(),
            property_type: "{Property type}".to_string(),
            type_parameter: "{Type parameter}".to_string(),
            view_model_name: "{ViewModel name}".to_string(),
            namespace_name: "{Namespace name}".to_string(),
            namespace_body: "{Namespace body}".to_string(),
        }
    }
}

/// Replaces every token of `mapping` found in `template` with its value.
///
/// The scan is a single left-to-right pass: inserted values are never
/// rescanned, so a value that itself contains a token stays literal. Where
/// two tokens start at the same offset the longer one wins. Tokens with no
/// mapping entry are left untouched.
pub fn substitute(template: &str, mapping: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((at, token, value)) = next_token(rest, mapping) {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + token.len()..];
    }

    out.push_str(rest);
    out
}

fn next_token<'m>(
    text: &str,
    mapping: &'m BTreeMap<String, String>,
) -> Option<(usize, &'m str, &'m str)> {
    mapping
        .iter()
        .filter(|(token, _)| !token.is_empty())
        .filter_map(|(token, value)| {
            text.find(token.as_str())
                .map(|at| (at, token.as_str(), value.as_str()))
        })
        .min_by(|lhs, rhs| lhs.0.cmp(&rhs.0).then(rhs.1.len().cmp(&lhs.1.len())))
}

/// Catalog tokens still present in `text`.
pub fn unresolved_tokens<'c>(text: &str, catalog: &'c MergeFieldCatalog) -> Vec<&'c str> {
    catalog
        .tokens()
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty() && text.contains(token))
        .collect()
}
