use log::{debug, warn};

use crate::config::Config;
use crate::model::PropertyDescriptor;

pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub class_name: String,
    pub properties: Vec<PropertyDescriptor>,
}

/// Scrapes a XAML view for its `x:Class` and its `{Binding ...}` targets.
///
/// This is a token scraper, not a XAML parser: the text is cut at every `<`
/// and each piece is inspected on its own. Closing tags are ignored, controls
/// without a known type mapping yield the `unknown` type.
pub fn extract_bindings(markup: &str, config: &Config) -> Extraction {
    let command_type = &config.type_data.command_implementation_type;
    let mut extraction = Extraction::default();
    let mut found_class = false;

    for piece in markup.split('<').filter(|piece| !piece.is_empty()) {
        if !found_class {
            if let Some(class_name) = class_name_from(piece, &config.naming.view_suffix) {
                extraction.class_name = format!("{class_name}{}", config.naming.view_model_suffix);
                found_class = true;
            }
        }

        if piece.starts_with('/') || !piece.contains("Binding") {
            continue;
        }

        let Some(name) = binding_name(piece) else {
            warn!("no property name in binding: <{}", piece.trim());
            continue;
        };

        let control = piece.split_whitespace().next().unwrap_or_default();
        let type_text = property_type_for(control, command_type);
        debug!("binding `{name}` on {control} -> {type_text}");
        extraction
            .properties
            .push(PropertyDescriptor::new(name, type_text));
    }

    extraction
}

fn class_name_from<'a>(piece: &'a str, view_suffix: &str) -> Option<&'a str> {
    let qualified = between(piece, "Class=\"", "\"")?;
    let short = qualified
        .rsplit_once('.')
        .map(|(_, name)| name)
        .unwrap_or(qualified);
    Some(short.strip_suffix(view_suffix).unwrap_or(short))
}

fn binding_name(piece: &str) -> Option<&str> {
    let inner = between(piece, "Binding ", "}")?;
    let first = inner.split(',').next().unwrap_or_default().trim();
    let name = first.strip_prefix("Path=").unwrap_or(first).trim();
    (!name.is_empty()).then_some(name)
}

fn property_type_for(control: &str, command_type: &str) -> String {
    match control {
        "TextBox" | "TextBlock" => "string".to_string(),
        "Button" => format!("{command_type}(Action, Func<bool>)"),
        "ItemsControl" => "IEnumerable<T>".to_string(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let rest = &text[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::model::PropertyDescriptor;

    use super::{extract_bindings, Extraction};

    fn extract(markup: &str) -> Extraction {
        extract_bindings(markup, &Config::default())
    }

    #[test]
    fn class_name_and_text_box_binding() {
        let markup = r#"<UserControl x:Class="App.Views.MainView"
    xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation">
    <TextBox Text="{Binding UserName}" />
</UserControl>"#;

        let extraction = extract(markup);
        assert_eq!(extraction.class_name, "MainViewModel");
        assert_eq!(
            extraction.properties,
            vec![PropertyDescriptor::new("UserName", "string")]
        );
    }

    #[test]
    fn control_types_map_to_property_types() {
        let markup = r#"<Window x:Class="Shop.CartView">
  <StackPanel>
    <TextBlock Text="{Binding Total, Mode=OneWay}"/>
    <Button Command="{Binding Checkout}">Pay</Button>
    <ItemsControl ItemsSource="{Binding Path=Items}"/>
    <Slider Value="{Binding Volume}"/>
  </StackPanel>
</Window>"#;

        let extraction = extract(markup);
        assert_eq!(extraction.class_name, "CartViewModel");
        assert_eq!(
            extraction.properties,
            vec![
                PropertyDescriptor::new("Total", "string"),
                PropertyDescriptor::new("Checkout", "RelayCommand(Action, Func<bool>)"),
                PropertyDescriptor::new("Items", "IEnumerable<T>"),
                PropertyDescriptor::new("Volume", "unknown"),
            ]
        );
    }

    #[test]
    fn class_without_namespace_or_view_suffix() {
        assert_eq!(extract(r#"<Page x:Class="Settings">"#).class_name, "SettingsViewModel");
    }

    #[test]
    fn only_first_class_attribute_counts() {
        let markup = r#"<Window x:Class="A.FirstView"><Grid x:Class="B.SecondView"/></Window>"#;
        assert_eq!(extract(markup).class_name, "FirstViewModel");
    }

    #[test]
    fn missing_class_attribute_gives_empty_name() {
        let extraction = extract(r#"<TextBox Text="{Binding Name}"/>"#);
        assert_eq!(extraction.class_name, "");
        assert_eq!(extraction.properties.len(), 1);
    }

    #[test]
    fn bindings_without_a_name_are_skipped() {
        let extraction = extract(r#"<Grid DataContext="{Binding}"><TextBox Text="{Binding  }"/></Grid>"#);
        assert!(extraction.properties.is_empty());
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let extraction = extract("<<<Binding <TextBox Binding x:Class=\"");
        assert_eq!(extraction.class_name, "");
        assert!(extraction.properties.is_empty());
        assert_eq!(extract(""), Extraction::default());
    }
}
