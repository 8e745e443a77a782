use serde_json::Value;

use super::{FieldFilter, type_check};
use crate::diagnostics::{Expected, Reason};
use crate::schema::{FieldDescriptor, Shape, ShapeKind};
use crate::tree::DataPath;

impl FieldFilter<'_> {
    /// Filters the elements of an array field.
    ///
    /// `element` is the shape of each element and `field` the descriptor of
    /// the array field itself (its `required` names and `children` apply to
    /// each element). Elements go through three stages, each one working on
    /// the survivors of the previous one:
    ///
    /// 1. type: the element must match `element`, array-ness included
    /// 2. required: the element must carry every required field
    /// 3. shape: string elements are kept as they are; object elements are
    ///    filtered against `children` (if any) and must still be non-empty and
    ///    carry every required field afterwards; other kinds are dropped
    ///
    /// Diagnostics use the index the element had in the input array.
    /// A value that is not an array yields an empty array.
    pub fn filter_array(
        &mut self,
        value: &Value,
        element: Shape,
        field: &FieldDescriptor,
        path: &DataPath,
        depth: usize,
    ) -> Vec<Value> {
        let Some(items) = value.as_array() else {
            return Vec::new();
        };
        let expected = Reason::ExpectedType(Expected::Kind(element.kind));

        let typed: Vec<(usize, &Value)> = items
            .iter()
            .enumerate()
            .filter(|(index, item)| {
                let kept = type_check(item, element) && item.is_array() == element.is_array;
                if !kept {
                    self.report(path.index(*index), expected.clone());
                }
                kept
            })
            .collect();

        let complete: Vec<(usize, &Value)> = typed
            .into_iter()
            .filter(|(index, item)| {
                self.check_required(item.as_object(), &field.required, &path.index(*index))
            })
            .collect();

        let mut result = Vec::with_capacity(complete.len());
        for (index, item) in complete {
            let item_path = path.index(index);
            let kept = match (element.kind, field.children.as_ref()) {
                (ShapeKind::String, _) | (ShapeKind::Object, None) => Some(item.clone()),
                (ShapeKind::Object, Some(children)) => {
                    if self.too_deep(depth + 1, &item_path) {
                        continue;
                    }
                    let nested = self.filter_object(item, Some(children), &item_path, depth + 1);
                    if !nested.is_empty()
                        && self.check_required(Some(&nested), &field.required, &item_path)
                    {
                        Some(Value::Object(nested))
                    } else {
                        None
                    }
                }
                (ShapeKind::Number | ShapeKind::Unknown, _) => None,
            };

            match kept {
                Some(item) => result.push(item),
                None => self.report(item_path, expected.clone()),
            }
        }
        result
    }
}
