use serde_json::{Map, Value};

use super::{FieldFilter, type_check};
use crate::diagnostics::{Expected, Reason};
use crate::schema::{FieldDescriptor, Schema};
use crate::tree::{DataPath, is_empty_data};

fn descriptor<'s>(schema: Option<&'s Schema>, name: &str) -> Option<&'s FieldDescriptor> {
    schema.and_then(|schema| schema.field(name))
}

impl FieldFilter<'_> {
    /// Filters the fields of an object against `schema`.
    ///
    /// Fields go through three passes:
    ///
    /// 1. fields declared `invalid` are dropped
    /// 2. fields whose value does not have the declared shape are dropped
    /// 3. the remaining fields are rebuilt one by one: redacted fields are
    ///    dropped while the redaction flag is active, plain objects and typed
    ///    arrays are filtered recursively, and anything left empty is dropped
    ///
    /// Fields without a descriptor are copied as they are. A value that is not
    /// an object yields an empty object.
    pub fn filter_object(
        &mut self,
        value: &Value,
        schema: Option<&Schema>,
        path: &DataPath,
        depth: usize,
    ) -> Map<String, Value> {
        let Some(fields) = value.as_object() else {
            return Map::new();
        };

        let valid: Vec<(&String, &Value, Option<&FieldDescriptor>)> = fields
            .iter()
            .map(|(name, value)| (name, value, descriptor(schema, name)))
            .filter(|(name, _, descriptor)| {
                let invalid = descriptor.is_some_and(|descriptor| descriptor.invalid);
                if invalid {
                    self.report(path.key(name.as_str()), Reason::InvalidProperty);
                }
                !invalid
            })
            .collect();

        let typed: Vec<(&String, &Value, Option<&FieldDescriptor>)> = valid
            .into_iter()
            .filter(|(name, value, descriptor)| {
                let Some(descriptor) = descriptor else {
                    return true;
                };
                if type_check(value, descriptor.shape()) {
                    return true;
                }
                self.report(
                    path.key(name.as_str()),
                    Reason::ExpectedType(Expected::of_field(descriptor)),
                );
                false
            })
            .collect();

        let mut result = Map::new();
        for (name, value, descriptor) in typed {
            let Some(descriptor) = descriptor else {
                result.insert(name.clone(), value.clone());
                continue;
            };
            let field_path = path.key(name.as_str());

            if descriptor.redact_on_opt_out && self.redact {
                self.report(field_path, Reason::OptOut);
                continue;
            }

            let Some(filtered) = self.filter_field(value, descriptor, &field_path, depth) else {
                continue;
            };
            if is_empty_data(&filtered) {
                self.report(field_path, Reason::EmptyData);
                continue;
            }
            result.insert(name.clone(), filtered);
        }
        result
    }

    /// The filtered value of a field that passed its type check, `None` when
    /// the field must go (already reported).
    fn filter_field(
        &mut self,
        value: &Value,
        descriptor: &FieldDescriptor,
        path: &DataPath,
        depth: usize,
    ) -> Option<Value> {
        if descriptor.is_plain_object() {
            if self.too_deep(depth + 1, path) {
                return None;
            }
            let nested = self.filter_object(value, descriptor.children.as_ref(), path, depth + 1);
            if !self.check_required(Some(&nested), &descriptor.required, path) {
                return None;
            }
            return Some(Value::Object(nested));
        }

        if let Some(element) = descriptor.element_shape() {
            if self.too_deep(depth + 1, path) {
                return None;
            }
            let items = self.filter_array(value, element, descriptor, path, depth + 1);
            return Some(Value::Array(items));
        }

        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::schema::ShapeKind;

    fn run(value: &Value, schema: &Schema, redact: bool) -> (Value, Vec<String>) {
        run_with_depth(value, schema, redact, 16)
    }

    fn run_with_depth(
        value: &Value,
        schema: &Schema,
        redact: bool,
        max_depth: usize,
    ) -> (Value, Vec<String>) {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let result = FieldFilter::new(redact, max_depth, &mut seen).filter_object(
            value,
            Some(schema),
            &DataPath::root(),
            0,
        );
        (
            Value::Object(result),
            seen.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn should_pass_through_undeclared_fields() {
        let schema = Schema::new().with_field("age", FieldDescriptor::number());
        let input = json!({"free": {"form": ["x", 1]}, "age": 0, "empty": ""});

        let (result, diagnostics) = run(&input, &schema, false);

        assert_eq!(result, input);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_drop_invalid_before_type_check() {
        let schema = Schema::new()
            .with_field("imp", FieldDescriptor::array_of(ShapeKind::Object).with_invalid(true))
            .with_field("age", FieldDescriptor::number());

        let (result, diagnostics) = run(&json!({"age": "30", "imp": "x"}), &schema, false);

        assert_eq!(result, json!({}));
        insta::assert_snapshot!(diagnostics.join("\n"), @r"
        Filtered imp: invalid property
        Filtered age: expected type number
        ");
    }

    #[test]
    fn should_announce_array_on_array_type_failure() {
        let schema = Schema::new().with_field("cat", FieldDescriptor::array_of(ShapeKind::String));

        let (result, diagnostics) = run(&json!({"cat": "news"}), &schema, false);

        assert_eq!(result, json!({}));
        assert_eq!(diagnostics, vec!["Filtered cat: expected type array"]);
    }

    #[test]
    fn should_redact_only_when_flag_is_set() {
        let schema = Schema::new()
            .with_field("yob", FieldDescriptor::number().with_redact_on_opt_out(true))
            .with_field("keywords", FieldDescriptor::string());
        let input = json!({"yob": 1985, "keywords": "rust"});

        let (kept, diagnostics) = run(&input, &schema, false);
        assert_eq!(kept, input);
        assert!(diagnostics.is_empty());

        let (redacted, diagnostics) = run(&input, &schema, true);
        assert_eq!(redacted, json!({"keywords": "rust"}));
        assert_eq!(diagnostics, vec!["Filtered yob: pubcid optout found"]);
    }

    #[test]
    fn should_drop_field_left_empty() {
        let schema = Schema::new()
            .with_field(
                "device",
                FieldDescriptor::object()
                    .with_children(Schema::new().with_field("w", FieldDescriptor::number())),
            )
            .with_field("name", FieldDescriptor::string());

        let input = json!({"device": {"w": "wide"}, "name": ""});
        let (result, diagnostics) = run(&input, &schema, false);

        assert_eq!(result, json!({}));
        insta::assert_snapshot!(diagnostics.join("\n"), @r"
        Filtered device.w: expected type number
        Filtered device: empty data found
        Filtered name: empty data found
        ");
    }

    #[test]
    fn should_enforce_required_on_plain_object() {
        let schema = Schema::new().with_field(
            "user",
            FieldDescriptor::object().with_required(["id"]),
        );

        let (result, diagnostics) = run(&json!({"user": {"id": "", "name": "x"}}), &schema, false);

        assert_eq!(result, json!({}));
        assert_eq!(diagnostics, vec!["Filtered user: missing required property id"]);
    }

    #[test]
    fn should_recurse_into_typed_arrays() {
        let schema = Schema::new().with_field(
            "segments",
            FieldDescriptor::array_of(ShapeKind::String),
        );

        let (result, diagnostics) = run(&json!({"segments": ["a", 5, "b"]}), &schema, false);

        assert_eq!(result, json!({"segments": ["a", "b"]}));
        assert_eq!(diagnostics, vec!["Filtered segments[1]: expected type string"]);
    }

    #[test]
    fn should_drop_array_emptied_by_filtering() {
        let schema = Schema::new().with_field(
            "segments",
            FieldDescriptor::array_of(ShapeKind::String),
        );

        let (result, diagnostics) = run(&json!({"segments": [1]}), &schema, false);

        assert_eq!(result, json!({}));
        insta::assert_snapshot!(diagnostics.join("\n"), @r"
        Filtered segments[0]: expected type string
        Filtered segments: empty data found
        ");
    }

    #[test]
    fn should_keep_untyped_array_verbatim() {
        let untyped = FieldDescriptor {
            is_array: true,
            ..FieldDescriptor::object()
        };
        let schema = Schema::new().with_field("list", untyped);

        let (result, diagnostics) = run(&json!({"list": [1, "a", {}]}), &schema, false);

        assert_eq!(result, json!({"list": [1, "a", {}]}));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_stop_at_max_depth() {
        let leaf = Schema::new().with_field("c", FieldDescriptor::string());
        let middle = Schema::new().with_field("b", FieldDescriptor::object().with_children(leaf));
        let schema = Schema::new().with_field("a", FieldDescriptor::object().with_children(middle));
        let input = json!({"a": {"b": {"c": "deep"}}, "z": 1});

        let (full, _) = run_with_depth(&input, &schema, false, 2);
        assert_eq!(full, input);

        let (result, diagnostics) = run_with_depth(&input, &schema, false, 1);
        assert_eq!(result, json!({"z": 1}));
        insta::assert_snapshot!(diagnostics.join("\n"), @r"
        Filtered a.b: maximum depth 1 exceeded
        Filtered a: empty data found
        ");
    }

    #[test]
    fn should_return_empty_for_non_object() {
        let schema = Schema::new();

        for input in [Value::Null, json!("text"), json!([1])] {
            let (result, diagnostics) = run(&input, &schema, false);
            assert_eq!(result, json!({}));
            assert!(diagnostics.is_empty());
        }
    }

    #[test]
    fn should_not_mutate_input() {
        let schema = Schema::new().with_field("age", FieldDescriptor::number());
        let input = json!({"age": "old", "other": true});
        let before = input.clone();

        let (result, _) = run(&input, &schema, false);

        assert_eq!(input, before);
        assert_eq!(result, json!({"other": true}));
    }
}
