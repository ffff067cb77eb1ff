//! Macros for declaring tracked types.

/// Declare a struct and implement [`Trackable`](crate::core::Trackable) for it.
///
/// Every field type must implement [`AttributeValue`](crate::core::AttributeValue).
/// Attributes are reported in declaration order. Assigning a name the struct
/// does not have, or a value that does not convert to the field's type, is an
/// [`AssignError`](crate::core::AssignError).
///
/// # Example
///
/// ```
/// use statesight::core::{Trackable, Value};
/// use statesight::trackable;
///
/// trackable! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Point {
///         pub x: i64,
///         pub y: i64,
///     }
/// }
///
/// let mut point = Point { x: 0, y: 0 };
/// point.assign("x", Value::Int(5)).unwrap();
/// assert_eq!(point.x, 5);
/// assert!(point.assign("z", Value::Int(1)).is_err());
/// ```
#[macro_export]
macro_rules! trackable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty
            ),*
        }

        impl $crate::core::Trackable for $name {
            fn type_name(&self) -> &str {
                stringify!($name)
            }

            fn attributes(&self) -> ::std::vec::Vec<(::std::string::String, $crate::core::Value)> {
                ::std::vec![
                    $(
                        (
                            ::std::string::String::from(stringify!($field)),
                            $crate::core::AttributeValue::to_value(&self.$field),
                        )
                    ),*
                ]
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                name: &str,
                value: $crate::core::Value,
            ) -> ::std::result::Result<(), $crate::core::AssignError> {
                match name {
                    $(
                        stringify!($field) => {
                            let found = value.kind();
                            self.$field = <$ty as $crate::core::AttributeValue>::from_value(value)
                                .ok_or_else(|| $crate::core::AssignError::TypeMismatch {
                                    attribute: name.to_string(),
                                    expected: ::std::any::type_name::<$ty>(),
                                    found,
                                })?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::core::AssignError::UnknownAttribute {
                        type_name: stringify!($name).to_string(),
                        attribute: name.to_string(),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{AssignError, Trackable, Value, ValueKind};

    trackable! {
        #[derive(Clone, Debug, PartialEq)]
        struct Sample {
            x: i64,
            label: String,
            tags: Vec<String>,
            ratio: Option<f64>,
        }
    }

    fn sample() -> Sample {
        Sample {
            x: 1,
            label: "a".to_string(),
            tags: vec!["t".to_string()],
            ratio: None,
        }
    }

    #[test]
    fn trackable_macro_reports_fields_in_order() {
        let names: Vec<String> = sample().attributes().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "label", "tags", "ratio"]);
        assert_eq!(sample().type_name(), "Sample");
    }

    #[test]
    fn trackable_macro_converts_values() {
        let attrs = sample().attributes();
        assert_eq!(attrs[0].1, Value::Int(1));
        assert_eq!(attrs[1].1, Value::from("a"));
        assert_eq!(attrs[2].1, Value::List(vec![Value::from("t")]));
        assert_eq!(attrs[3].1, Value::Unset);
    }

    #[test]
    fn trackable_macro_assigns_matching_values() {
        let mut obj = sample();
        obj.assign("ratio", Value::Float(0.5)).unwrap();
        obj.assign("tags", Value::from(vec!["u".to_string(), "v".to_string()]))
            .unwrap();

        assert_eq!(obj.ratio, Some(0.5));
        assert_eq!(obj.tags, vec!["u".to_string(), "v".to_string()]);
    }

    #[test]
    fn trackable_macro_rejects_mismatched_values() {
        let mut obj = sample();
        let err = obj.assign("x", Value::from("nope")).unwrap_err();

        assert_eq!(
            err,
            AssignError::TypeMismatch {
                attribute: "x".to_string(),
                expected: "i64",
                found: ValueKind::Str,
            }
        );
        assert_eq!(obj.x, 1);
    }

    #[test]
    fn trackable_macro_rejects_unknown_names() {
        let mut obj = sample();
        assert!(matches!(
            obj.assign("missing", Value::Int(0)),
            Err(AssignError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn trackable_macro_supports_visibility() {
        trackable! {
            pub struct Public {
                pub value: bool,
            }
        }

        let public = Public { value: true };
        assert_eq!(public.attribute("value"), Some(Value::Bool(true)));
    }
}
