use serde_json::{Map, Value};

use super::FieldFilter;
use crate::diagnostics::Reason;
use crate::tree::{DataPath, is_empty_data};

impl FieldFilter<'_> {
    /// Checks that every name in `required` is present and non-empty in `fields`.
    ///
    /// Every name is checked, one diagnostic is reported per missing or empty
    /// field. A value that is not an object (`None`) misses all of them.
    pub fn check_required(
        &mut self,
        fields: Option<&Map<String, Value>>,
        required: &[String],
        path: &DataPath,
    ) -> bool {
        let mut complete = true;
        for name in required {
            let present = fields
                .and_then(|fields| fields.get(name))
                .is_some_and(|value| !is_empty_data(value));
            if !present {
                complete = false;
                self.report(path.clone(), Reason::MissingRequired { name: name.clone() });
            }
        }
        complete
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::Diagnostic;

    fn required(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn should_pass_when_all_present() {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let mut filter = FieldFilter::new(false, 8, &mut seen);
        let value = json!({"name": "x", "segment": [{"id": "1"}], "extra": ""});

        let path = DataPath::root().key("data").index(0);
        assert!(filter.check_required(value.as_object(), &required(&["name", "segment"]), &path));
        drop(filter);

        assert!(seen.is_empty());
    }

    #[test]
    fn should_report_every_missing_name() {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let mut filter = FieldFilter::new(false, 8, &mut seen);
        let value = json!({"name": "", "other": 1});
        let path = DataPath::root().key("data").index(4);

        let complete =
            filter.check_required(value.as_object(), &required(&["name", "segment"]), &path);
        drop(filter);

        assert!(!complete);
        let lines: Vec<_> = seen.iter().map(ToString::to_string).collect();
        insta::assert_snapshot!(lines.join("\n"), @r"
        Filtered data[4]: missing required property name
        Filtered data[4]: missing required property segment
        ");
        assert!(seen.iter().all(|diagnostic| diagnostic.index() == Some(4)));
    }

    #[test]
    fn should_accept_numeric_zero() {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let mut filter = FieldFilter::new(false, 8, &mut seen);
        let value = json!({"id": 0});

        assert!(filter.check_required(value.as_object(), &required(&["id"]), &DataPath::root()));
    }

    #[test]
    fn should_fail_non_object_value() {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let mut filter = FieldFilter::new(false, 8, &mut seen);
        let path = DataPath::root().key("segment").index(0);

        assert!(!filter.check_required(None, &required(&["id"]), &path));
        drop(filter);

        assert_eq!(
            seen,
            vec![Diagnostic::new(
                path,
                Reason::MissingRequired {
                    name: "id".to_string()
                }
            )]
        );
    }
}
