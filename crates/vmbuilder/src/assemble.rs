use anyhow::Result;
use log::debug;

use crate::classify::Classifier;
use crate::config::{Config, Naming};
use crate::error::GenerateError;
use crate::model::{first_letter_to_upper, CommandShape, PropertyDescriptor, PropertyKind};
use crate::template::{
    merge::{substitute, unresolved_tokens, MergeField},
    trim_fragment, TemplateKind, TemplateSet,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub class_name: String,
    pub source: String,
    pub skipped: Vec<SkippedProperty>,
    /// Catalog tokens that survived substitution.
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProperty {
    pub property: PropertyDescriptor,
    pub error: GenerateError,
}

#[derive(Debug, Default)]
struct Sections {
    fields: String,
    properties: String,
    command_declarations: String,
    command_initializations: String,
    command_methods: String,
}

pub struct ViewModelBuilder<'a> {
    config: &'a Config,
    templates: &'a TemplateSet,
    classifier: Classifier,
    strict: bool,
}

impl<'a> ViewModelBuilder<'a> {
    pub fn new(config: &'a Config, templates: &'a TemplateSet) -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new(&config.type_data.command_implementation_type)?,
            config,
            templates,
            strict: false,
        })
    }

    /// In strict mode the first unusable property fails the whole build
    /// instead of being skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn assemble(
        &self,
        properties: &[PropertyDescriptor],
        class_name: &str,
        namespace: Option<&str>,
    ) -> Result<Assembly, GenerateError> {
        let namespace = namespace.map(str::trim).filter(|ns| !ns.is_empty());
        if namespace.is_some() && class_name.trim().is_empty() {
            return Err(GenerateError::NamespaceWithoutClassName);
        }

        let class_name = normalize_class_name(class_name, &self.config.naming);
        let mut sections = Sections::default();
        let mut skipped = Vec::new();

        for (index, property) in properties.iter().enumerate() {
            match self.kind_of(index, property) {
                Ok(kind) => {
                    debug!("`{}` classified as {:?}", property.name, kind);
                    self.push_property(&mut sections, property, &kind);
                }
                Err(error) if self.strict => return Err(error),
                Err(error) => {
                    debug!("skipping `{}`: {error}", property.name);
                    skipped.push(SkippedProperty {
                        property: property.clone(),
                        error,
                    });
                }
            }
        }

        let mut source = self.render_class(&class_name, &sections);
        if let Some(namespace) = namespace {
            let body = std::mem::take(&mut source);
            source = self.render_skeleton(
                TemplateKind::Namespace,
                &[
                    (MergeField::NamespaceName, namespace),
                    (MergeField::NamespaceBody, body.as_str()),
                ],
            );
        }
        source.push('\n');

        let unresolved = unresolved_tokens(&source, &self.config.merge_fields)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Assembly {
            class_name,
            source,
            skipped,
            unresolved,
        })
    }

    fn kind_of(
        &self,
        index: usize,
        property: &PropertyDescriptor,
    ) -> Result<PropertyKind, GenerateError> {
        if property.name.trim().is_empty() {
            return Err(GenerateError::EmptyPropertyName { index });
        }
        self.classifier.classify(property)
    }

    fn push_property(
        &self,
        sections: &mut Sections,
        property: &PropertyDescriptor,
        kind: &PropertyKind,
    ) {
        let property_name = property.property_name();
        match kind {
            PropertyKind::Scalar { type_text } => {
                let field_name = property.field_name();
                let values = [
                    (MergeField::PropertyName, property_name.as_str()),
                    (MergeField::PropertyType, type_text.as_str()),
                    (MergeField::FieldName, field_name.as_str()),
                ];
                push_line(
                    &mut sections.fields,
                    &self.render(TemplateKind::FieldDeclaration, &values),
                );
                push_line(
                    &mut sections.properties,
                    &self.render(TemplateKind::PropertyDeclaration, &values),
                );
                sections.properties.push('\n');
            }
            PropertyKind::Command(shape) => {
                self.push_command(sections, &property_name, shape);
            }
        }
    }

    fn push_command(&self, sections: &mut Sections, name: &str, shape: &CommandShape) {
        let command_type = self.classifier.command_type();
        let type_parameter = shape.type_parameter().unwrap_or_default();
        let values = [
            (MergeField::CommandName, name),
            (MergeField::CommandImplementationType, command_type),
            (MergeField::TypeParameter, type_parameter),
        ];

        let (declaration, initialization, execute, can_execute) = match shape {
            CommandShape::PlainExecute => (
                TemplateKind::CommandProperty,
                TemplateKind::ExecuteInitialization,
                TemplateKind::ExecuteMethod,
                None,
            ),
            CommandShape::PlainCanExecute => (
                TemplateKind::CommandProperty,
                TemplateKind::CanExecuteInitialization,
                TemplateKind::ExecuteMethod,
                Some(TemplateKind::CanExecuteMethod),
            ),
            CommandShape::GenericExecute { .. } => (
                TemplateKind::GenericCommandProperty,
                TemplateKind::GenericExecuteInitialization,
                TemplateKind::GenericExecuteMethod,
                None,
            ),
            CommandShape::GenericCanExecute { .. } => (
                TemplateKind::GenericCommandProperty,
                TemplateKind::GenericCanExecuteInitialization,
                TemplateKind::GenericExecuteMethod,
                Some(TemplateKind::GenericCanExecuteMethod),
            ),
        };

        push_line(
            &mut sections.command_declarations,
            &self.render(declaration, &values),
        );
        push_line(
            &mut sections.command_initializations,
            &self.render(initialization, &values),
        );
        for method in std::iter::once(execute).chain(can_execute) {
            push_line(&mut sections.command_methods, &self.render(method, &values));
            sections.command_methods.push('\n');
        }
    }

    fn render_class(&self, class_name: &str, sections: &Sections) -> String {
        let command_type = self.classifier.command_type();
        let property_changed = self.render(
            TemplateKind::PropertyChanged,
            &[(MergeField::ViewModelName, class_name)],
        );
        let constructor = self.render_skeleton(
            TemplateKind::Constructor,
            &[
                (MergeField::ViewModelName, class_name),
                (MergeField::CommandImplementationType, command_type),
                (
                    MergeField::CommandInitializations,
                    trim_section(&sections.command_initializations),
                ),
            ],
        );

        self.render_skeleton(
            TemplateKind::Class,
            &[
                (MergeField::ViewModelName, class_name),
                (MergeField::CommandImplementationType, command_type),
                (MergeField::ClassFields, trim_section(&sections.fields)),
                (MergeField::ClassProperties, trim_section(&sections.properties)),
                (MergeField::ClassPropertyChanged, property_changed.as_str()),
                (
                    MergeField::ClassCommandDeclarations,
                    trim_section(&sections.command_declarations),
                ),
                (MergeField::ClassConstructor, constructor.as_str()),
                (
                    MergeField::ClassCommandMethods,
                    trim_section(&sections.command_methods),
                ),
            ],
        )
    }

    fn render(&self, kind: TemplateKind, values: &[(MergeField, &str)]) -> String {
        let mapping = self.config.merge_fields.bind(values);
        substitute(self.templates.get(kind), &mapping)
    }

    /// Renders a template that holds whole sections, leaving out the lines of
    /// sections that came out empty.
    fn render_skeleton(&self, kind: TemplateKind, values: &[(MergeField, &str)]) -> String {
        let empty: Vec<&str> = values
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| self.config.merge_fields.token(*field))
            .filter(|token| !token.is_empty())
            .collect();
        let skeleton = drop_empty_sections(self.templates.get(kind), &empty);
        let mapping = self.config.merge_fields.bind(values);
        trim_fragment(&substitute(&skeleton, &mapping))
    }
}

/// Applies the MVVM naming convention: `Foo` -> `FooViewModel`,
/// `FooView` -> `FooViewModel`, `fooViewModel` -> `FooViewModel`.
pub fn normalize_class_name(name: &str, naming: &Naming) -> String {
    let mut name = name.trim().to_string();
    if !name.ends_with(&naming.view_model_suffix) {
        match naming.view_model_suffix.strip_prefix(&naming.view_suffix) {
            Some(rest) if name.ends_with(&naming.view_suffix) => name.push_str(rest),
            _ => name.push_str(&naming.view_model_suffix),
        }
    }
    first_letter_to_upper(&name)
}

fn push_line(buffer: &mut String, text: &str) {
    buffer.push_str(text);
    buffer.push('\n');
}

fn trim_section(section: &str) -> &str {
    section.trim_end_matches(['\r', '\n'])
}

/// Drops each line that holds only one of `empty_tokens`, together with one
/// blank separator line next to it (the following one if present, otherwise
/// the preceding one). Every other line is kept byte for byte.
fn drop_empty_sections(skeleton: &str, empty_tokens: &[&str]) -> String {
    let lines: Vec<&str> = skeleton.split_inclusive('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut skip_blank = false;

    for (index, line) in lines.iter().enumerate() {
        if std::mem::take(&mut skip_blank) {
            continue;
        }
        if !empty_tokens.contains(&line.trim()) {
            kept.push(*line);
            continue;
        }

        let next_is_blank = lines
            .get(index + 1)
            .is_some_and(|next| next.trim().is_empty());
        if next_is_blank {
            skip_blank = true;
        } else if kept.last().is_some_and(|prev| prev.trim().is_empty()) {
            kept.pop();
        }
    }

    kept.concat()
}
