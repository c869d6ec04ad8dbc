//! Column name to struct field resolution.

use std::sync::LazyLock;

use log::{trace, warn};
use regex::Regex;

use crate::config::ResolverConfig;
use crate::tags::{StructTag, TagOptions, parse_tag};
use crate::types::{FieldDescriptor, RecordDescriptor};

/// Root-first field indices locating a (possibly nested) field.
pub type FieldPath = Vec<usize>;

/// Primary tag name that removes a field from matching.
pub const SKIP_NAME: &str = "-";

/// Option that makes the resolver descend into a record-typed field.
pub const INLINE_OPTION: &str = "inline";

static COLUMN_COMPARE_EXCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").expect("static pattern compiles"));

static DEFAULT_RESOLVER: LazyLock<Resolver> = LazyLock::new(Resolver::default);

/// Adjusts a field's parsed name and options from additional tags.
///
/// Rules run in order after the primary tag has been parsed and before matching.
pub trait TagRule: Send + Sync {
    fn apply(&self, tag: &StructTag, name: &mut String, options: &mut TagOptions);
}

/// Deprecated `field:"name"` tag; overrides the primary name when non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyFieldName;

impl TagRule for LegacyFieldName {
    fn apply(&self, tag: &StructTag, name: &mut String, _options: &mut TagOptions) {
        let legacy = tag.get("field");
        if !legacy.is_empty() {
            *name = legacy.to_string();
        }
    }
}

/// Deprecated `inline:"..."` tag; any non-empty value enables the inline option.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyInline;

impl TagRule for LegacyInline {
    fn apply(&self, tag: &StructTag, _name: &mut String, options: &mut TagOptions) {
        if !tag.get("inline").is_empty() {
            options.insert(INLINE_OPTION);
        }
    }
}

/// Finds the field a column maps to.
pub struct Resolver {
    config: ResolverConfig,
    rules: Vec<Box<dyn TagRule>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        let mut rules: Vec<Box<dyn TagRule>> = Vec::new();
        if config.legacy_tags {
            rules.push(Box::new(LegacyFieldName));
            rules.push(Box::new(LegacyInline));
        }
        Self { config, rules }
    }

    /// Appends an override rule; it runs after the existing ones.
    pub fn with_rule(mut self, rule: impl TagRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Effective column name and options of a field after all rules.
    pub fn field_tag(&self, field: &FieldDescriptor) -> (String, TagOptions) {
        let (name, mut options) = parse_tag(field.tag.get(&self.config.tag_key));
        let mut name = name.to_string();
        for rule in &self.rules {
            rule.apply(&field.tag, &mut name, &mut options);
        }
        (name, options)
    }

    /// Returns the path of the field `column` maps to, or `None` when nothing matches.
    ///
    /// Fields are scanned in declaration order and the first match wins: an explicit
    /// name equal to the column, then (for untagged fields) a normalized comparison of
    /// the declared name, then a recursive search of inline record fields.
    pub fn field_index(&self, record: &RecordDescriptor, column: &str) -> Option<FieldPath> {
        self.field_index_at(record, column, 0)
    }

    fn field_index_at(&self, record: &RecordDescriptor, column: &str, depth: usize) -> Option<FieldPath> {
        for (index, field) in record.fields.iter().enumerate() {
            if !field.exported {
                continue;
            }

            let (name, options) = self.field_tag(field);
            if name == SKIP_NAME {
                continue;
            }

            if name == column {
                trace!("{}: column {column:?} matched tag of field {}", record.name, field.name);
                return Some(vec![index]);
            }

            if name.is_empty() && compare_column_to_field(&field.name, column) {
                trace!("{}: column {column:?} matched field {}", record.name, field.name);
                return Some(vec![index]);
            }

            if options.contains(INLINE_OPTION)
                && let Some(inner) = field.ty.as_record()
            {
                if depth >= self.config.max_depth {
                    warn!(
                        "{}: not descending into inline field {} past depth {}",
                        record.name, field.name, self.config.max_depth
                    );
                    continue;
                }
                if let Some(mut path) = self.field_index_at(inner, column, depth + 1) {
                    path.insert(0, index);
                    return Some(path);
                }
            }
        }

        None
    }
}

/// The resolver used by the free functions: `db` tags with legacy rules enabled.
pub fn default_resolver() -> &'static Resolver {
    &DEFAULT_RESOLVER
}

/// Resolves `column` against `record` with the default resolver.
pub fn get_struct_field_index(record: &RecordDescriptor, column: &str) -> Option<FieldPath> {
    DEFAULT_RESOLVER.field_index(record, column)
}

/// Lower-cases a name and removes everything that is not an ASCII letter or digit.
pub fn normalize_column(name: &str) -> String {
    COLUMN_COMPARE_EXCLUDE.replace_all(name, "").to_lowercase()
}

/// Returns true if a column looks like a struct field by normalized comparison alone.
pub fn compare_column_to_field(field: &str, column: &str) -> bool {
    normalize_column(field) == normalize_column(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Described, TypeDescriptor};

    fn string_field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, String::type_descriptor())
    }

    fn address() -> RecordDescriptor {
        RecordDescriptor::new("Address")
            .field(string_field("Street"))
            .field(string_field("City").tagged(r#"db:"city_name""#))
    }

    fn person() -> RecordDescriptor {
        RecordDescriptor::new("Person")
            .field(string_field("ID").tagged(r#"db:"-""#))
            .field(string_field("FirstName"))
            .field(string_field("secret").private())
            .field(FieldDescriptor::new("Home", address().into_type()).tagged(r#"db:",inline""#))
            .field(string_field("Nickname").tagged(r#"db:"first_name""#))
    }

    #[test]
    fn normalization_ignores_case_and_punctuation() {
        for column in ["firstname", "FIRST-NAME", "first_name", "First Name"] {
            assert!(compare_column_to_field("First_Name", column), "{column}");
            assert!(compare_column_to_field(column, "First_Name"), "{column}");
        }
        assert!(!compare_column_to_field("FirstName", "last_name"));
    }

    #[test]
    fn skipped_fields_never_match() {
        assert_eq!(get_struct_field_index(&person(), "ID"), None);
        assert_eq!(get_struct_field_index(&person(), "id"), None);
    }

    #[test]
    fn unexported_fields_never_match() {
        assert_eq!(get_struct_field_index(&person(), "secret"), None);
    }

    #[test]
    fn normalized_name_matches_untagged_field() {
        assert_eq!(get_struct_field_index(&person(), "FIRST-NAME"), Some(vec![1]));
    }

    #[test]
    fn explicit_tag_beats_later_inference_and_vice_versa() {
        // The untagged FirstName field comes first and matches by inference.
        assert_eq!(get_struct_field_index(&person(), "first_name"), Some(vec![1]));

        let record = RecordDescriptor::new("Swapped")
            .field(string_field("Nickname").tagged(r#"db:"first_name""#))
            .field(string_field("FirstName"));
        assert_eq!(get_struct_field_index(&record, "first_name"), Some(vec![0]));
    }

    #[test]
    fn tagged_field_ignores_its_declared_name() {
        let record = RecordDescriptor::new("Tagged")
            .field(string_field("Nickname").tagged(r#"db:"nick""#))
            .field(string_field("Other"));
        assert_eq!(get_struct_field_index(&record, "nickname"), None);
        assert_eq!(get_struct_field_index(&record, "nick"), Some(vec![0]));
        assert_eq!(get_struct_field_index(&record, "NICK"), None);
    }

    #[test]
    fn inline_fields_are_searched() {
        assert_eq!(get_struct_field_index(&person(), "street"), Some(vec![3, 0]));
        assert_eq!(get_struct_field_index(&person(), "city_name"), Some(vec![3, 1]));
    }

    #[test]
    fn record_fields_without_inline_are_opaque() {
        let record =
            RecordDescriptor::new("Outer").field(FieldDescriptor::new("Home", address().into_type()));
        assert_eq!(get_struct_field_index(&record, "street"), None);
        assert_eq!(get_struct_field_index(&record, "home"), Some(vec![0]));
    }

    #[test]
    fn inline_on_non_record_is_ignored() {
        let record = RecordDescriptor::new("Outer")
            .field(string_field("Label").tagged(r#"db:"tag_label,inline""#))
            .field(string_field("Street"));
        assert_eq!(get_struct_field_index(&record, "street"), Some(vec![1]));
    }

    #[test]
    fn unknown_column_is_no_match() {
        assert_eq!(get_struct_field_index(&person(), "does_not_exist"), None);
    }

    #[test]
    fn legacy_tags_override() {
        let record = RecordDescriptor::new("Legacy")
            .field(string_field("Name").tagged(r#"db:"name" field:"full_name""#))
            .field(FieldDescriptor::new("Home", address().into_type()).tagged(r#"inline:"true""#));

        assert_eq!(get_struct_field_index(&record, "full_name"), Some(vec![0]));
        assert_eq!(get_struct_field_index(&record, "name"), None);
        assert_eq!(get_struct_field_index(&record, "street"), Some(vec![1, 0]));

        let strict = Resolver::new(ResolverConfig {
            legacy_tags: false,
            ..ResolverConfig::default()
        });
        assert_eq!(strict.field_index(&record, "name"), Some(vec![0]));
        assert_eq!(strict.field_index(&record, "street"), None);
    }

    #[test]
    fn custom_tag_key() {
        let record = RecordDescriptor::new("Custom").field(string_field("Name").tagged(r#"sql:"label""#));
        let resolver = Resolver::new(ResolverConfig {
            tag_key: "sql".into(),
            ..ResolverConfig::default()
        });
        assert_eq!(resolver.field_index(&record, "label"), Some(vec![0]));
    }

    #[test]
    fn custom_rules_run_after_builtin_ones() {
        struct Upper;
        impl TagRule for Upper {
            fn apply(&self, _tag: &StructTag, name: &mut String, _options: &mut TagOptions) {
                *name = name.to_uppercase();
            }
        }

        let record = RecordDescriptor::new("Custom").field(string_field("Name").tagged(r#"field:"label""#));
        let resolver = Resolver::default().with_rule(Upper);
        assert_eq!(resolver.field_index(&record, "LABEL"), Some(vec![0]));
    }

    #[test]
    fn depth_limit_stops_descent() {
        let inner = RecordDescriptor::new("Inner").field(string_field("Deep"));
        let middle = RecordDescriptor::new("Middle")
            .field(FieldDescriptor::new("Inner", inner.into_type()).tagged(r#"db:",inline""#));
        let outer = RecordDescriptor::new("Outer")
            .field(FieldDescriptor::new("Middle", middle.into_type()).tagged(r#"db:",inline""#));

        assert_eq!(get_struct_field_index(&outer, "deep"), Some(vec![0, 0, 0]));

        let shallow = Resolver::new(ResolverConfig {
            max_depth: 1,
            ..ResolverConfig::default()
        });
        assert_eq!(shallow.field_index(&outer, "deep"), None);
    }

    #[test]
    fn self_embedding_terminates() {
        static CYCLIC: LazyLock<RecordDescriptor> = LazyLock::new(|| {
            RecordDescriptor::new("Cyclic").field(
                FieldDescriptor::new("Again", TypeDescriptor::Record(crate::types::RecordRef::Static(cyclic)))
                    .tagged(r#"db:",inline""#),
            )
        });
        fn cyclic() -> &'static RecordDescriptor {
            &CYCLIC
        }

        assert_eq!(get_struct_field_index(cyclic(), "missing"), None);
    }
}
