//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all runtime values
//! of the evaluator. Values are tagged and type-safe rather than raw bytes.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer, wrapping arithmetic
//! - [`Value::Char`]: 8-bit signed character
//! - [`Value::Struct`]: Struct with one value per field of its layout
//! - [`Value::Void`]: Result of calling a `void` function; never stored
//!
//! # Struct invariant
//!
//! A [`StructValue`] built through [`zero_value`] or [`build_composite`] holds
//! exactly the fields of its struct layout. Fields a designated initializer
//! leaves out are zero, recursively for nested structs.

use super::registry::TypeDescriptor;
use super::MemoryError;
use rustc_hash::FxHashMap;

/// Runtime values in the evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Char(i8),
    Struct(StructValue),
    Void,
}

/// A struct-typed value: field name -> field value
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub type_name: String,
    pub fields: FxHashMap<String, Value>,
}

impl Value {
    /// Integer value after promotion (`char` sign-extends to `int`)
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Char(c) => Some(i32::from(*c)),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable type of this value, for diagnostics
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Struct(s) => format!("struct {}", s.type_name),
            Value::Void => "void".to_string(),
        }
    }

    /// Whether this value's variant is exactly the given type
    pub fn matches_type(&self, ty: &TypeDescriptor) -> bool {
        match (self, ty) {
            (Value::Int(_), TypeDescriptor::Int) => true,
            (Value::Char(_), TypeDescriptor::Char) => true,
            (Value::Struct(s), TypeDescriptor::Struct(layout)) => {
                s.type_name == layout.name
            }
            _ => false,
        }
    }

    /// Implicit conversion used wherever a value is bound to a declared type
    ///
    /// `int` and `char` convert into each other (truncating to 8 bits or
    /// sign-extending); structs only bind to the same struct type.
    pub fn coerce_to(self, ty: &TypeDescriptor) -> Result<Value, MemoryError> {
        match (self, ty) {
            (Value::Char(c), TypeDescriptor::Int) => {
                Ok(Value::Int(i32::from(c)))
            }
            (Value::Int(n), TypeDescriptor::Char) => Ok(Value::Char(n as i8)),
            (value, ty) if value.matches_type(ty) => Ok(value),
            (value, ty) => Err(MemoryError::TypeMismatch {
                expected: ty.to_string(),
                got: value.type_name(),
            }),
        }
    }
}

/// Zero value of a type, recursively zeroing nested structs
pub fn zero_value(ty: &TypeDescriptor) -> Value {
    match ty {
        TypeDescriptor::Int => Value::Int(0),
        TypeDescriptor::Char => Value::Char(0),
        TypeDescriptor::Struct(layout) => {
            let fields = layout
                .fields
                .iter()
                .map(|field| (field.name.clone(), zero_value(&field.ty)))
                .collect();
            Value::Struct(StructValue {
                type_name: layout.name.clone(),
                fields,
            })
        }
    }
}

/// Build a struct value from the supplied fields, zeroing every other field
///
/// Every supplied entry is validated before anything is built. When a field
/// is supplied more than once the last entry wins.
pub fn build_composite(
    ty: &TypeDescriptor,
    supplied: Vec<(String, Value)>,
) -> Result<Value, MemoryError> {
    let layout = ty.layout().ok_or_else(|| MemoryError::NotAStruct {
        field: supplied
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default(),
        found: ty.to_string(),
    })?;

    for (name, value) in &supplied {
        let field =
            layout.field(name).ok_or_else(|| MemoryError::UnknownField {
                struct_name: layout.name.clone(),
                field: name.clone(),
            })?;
        if !value.matches_type(&field.ty) {
            return Err(MemoryError::TypeMismatch {
                expected: field.ty.to_string(),
                got: value.type_name(),
            });
        }
    }

    let mut result = zero_value(ty);
    if let Value::Struct(s) = &mut result {
        for (name, value) in supplied {
            s.fields.insert(name, value);
        }
    }
    Ok(result)
}

/// Read a nested field by path (`["nested", "c"]` for `value.nested.c`)
pub fn get_field<'a, S: AsRef<str>>(
    value: &'a Value,
    path: &[S],
) -> Result<&'a Value, MemoryError> {
    let mut current = value;
    for name in path {
        let name = name.as_ref();
        current = match current {
            Value::Struct(s) => {
                s.fields
                    .get(name)
                    .ok_or_else(|| MemoryError::UnknownField {
                        struct_name: s.type_name.clone(),
                        field: name.to_string(),
                    })?
            }
            scalar => {
                return Err(MemoryError::NotAStruct {
                    field: name.to_string(),
                    found: scalar.type_name(),
                });
            }
        };
    }
    Ok(current)
}

/// Mutable counterpart of [`get_field`]
pub fn get_field_mut<'a, S: AsRef<str>>(
    value: &'a mut Value,
    path: &[S],
) -> Result<&'a mut Value, MemoryError> {
    let mut current = value;
    for name in path {
        let name = name.as_ref();
        current = match current {
            Value::Struct(s) => {
                let struct_name = &s.type_name;
                match s.fields.get_mut(name) {
                    Some(field) => field,
                    None => {
                        return Err(MemoryError::UnknownField {
                            struct_name: struct_name.clone(),
                            field: name.to_string(),
                        });
                    }
                }
            }
            scalar => {
                return Err(MemoryError::NotAStruct {
                    field: name.to_string(),
                    found: scalar.type_name(),
                });
            }
        };
    }
    Ok(current)
}

/// Replace a nested field; the new value must have the slot's exact type
pub fn set_field<S: AsRef<str>>(
    value: &mut Value,
    path: &[S],
    new_value: Value,
) -> Result<(), MemoryError> {
    let slot = get_field_mut(value, path)?;
    let same_type = match (&*slot, &new_value) {
        (Value::Int(_), Value::Int(_)) => true,
        (Value::Char(_), Value::Char(_)) => true,
        (Value::Struct(a), Value::Struct(b)) => a.type_name == b.type_name,
        _ => false,
    };
    if !same_type {
        return Err(MemoryError::TypeMismatch {
            expected: slot.type_name(),
            got: new_value.type_name(),
        });
    }
    *slot = new_value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::registry::TypeRegistry;
    use crate::parser::ast::Type;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .define_struct(
                "Nested",
                &[
                    ("a".into(), Type::Char),
                    ("b".into(), Type::Char),
                    ("c".into(), Type::Int),
                ],
            )
            .unwrap();
        registry
            .define_struct(
                "A",
                &[
                    ("a".into(), Type::Int),
                    ("nested".into(), Type::Struct("Nested".into())),
                    ("c".into(), Type::Int),
                ],
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_zero_value_recurses() {
        let registry = registry();
        let zero = zero_value(&registry.resolve("A").unwrap());

        let field = |path: &[&str]| get_field(&zero, path).unwrap().clone();
        assert_eq!(field(&["a"]), Value::Int(0));
        assert_eq!(field(&["nested", "a"]), Value::Char(0));
        assert_eq!(field(&["nested", "c"]), Value::Int(0));
        assert_eq!(zero.as_struct().unwrap().fields.len(), 3);
    }

    #[test]
    fn test_build_composite_fills_missing_fields_with_zero() {
        let registry = registry();
        let nested_ty = registry.resolve("Nested").unwrap();
        let nested =
            build_composite(&nested_ty, vec![("c".into(), Value::Int(5))])
                .unwrap();

        assert_eq!(get_field(&nested, &["a"]).unwrap(), &Value::Char(0));
        assert_eq!(get_field(&nested, &["b"]).unwrap(), &Value::Char(0));
        assert_eq!(get_field(&nested, &["c"]).unwrap(), &Value::Int(5));
    }

    #[test]
    fn test_nested_access_through_composites() {
        let registry = registry();
        let nested = build_composite(
            &registry.resolve("Nested").unwrap(),
            vec![
                ("a".into(), Value::Char(b'a' as i8)),
                ("b".into(), Value::Char(b'b' as i8)),
                ("c".into(), Value::Int(5)),
            ],
        )
        .unwrap();
        let a = build_composite(
            &registry.resolve("A").unwrap(),
            vec![
                ("a".into(), Value::Int(1)),
                ("nested".into(), nested.clone()),
                ("c".into(), Value::Int(2)),
            ],
        )
        .unwrap();

        assert_eq!(get_field(&a, &["nested"]).unwrap(), &nested);
        assert_eq!(get_field(&a, &["nested", "c"]).unwrap(), &Value::Int(5));
    }

    #[test]
    fn test_build_composite_rejects_unknown_field() {
        let registry = registry();
        let err = build_composite(
            &registry.resolve("Nested").unwrap(),
            vec![("a".into(), Value::Char(1)), ("zz".into(), Value::Int(1))],
        )
        .unwrap_err();

        assert_eq!(
            err,
            MemoryError::UnknownField {
                struct_name: "Nested".into(),
                field: "zz".into()
            }
        );
    }

    #[test]
    fn test_build_composite_is_strict_about_types() {
        let registry = registry();
        let err = build_composite(
            &registry.resolve("Nested").unwrap(),
            vec![("a".into(), Value::Int(90))],
        )
        .unwrap_err();

        assert!(matches!(err, MemoryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_build_composite_on_scalar_type() {
        let err = build_composite(&TypeDescriptor::Int, vec![]).unwrap_err();
        assert!(matches!(err, MemoryError::NotAStruct { .. }));
    }

    #[test]
    fn test_later_initializer_wins() {
        let registry = registry();
        let value = build_composite(
            &registry.resolve("Nested").unwrap(),
            vec![("c".into(), Value::Int(1)), ("c".into(), Value::Int(2))],
        )
        .unwrap();

        assert_eq!(get_field(&value, &["c"]).unwrap(), &Value::Int(2));
    }

    #[test]
    fn test_get_field_errors() {
        let registry = registry();
        let zero = zero_value(&registry.resolve("A").unwrap());

        assert!(matches!(
            get_field(&zero, &["a", "b"]),
            Err(MemoryError::NotAStruct { .. })
        ));
        assert!(matches!(
            get_field(&zero, &["nested", "missing"]),
            Err(MemoryError::UnknownField { ref struct_name, .. })
                if struct_name == "Nested"
        ));
    }

    #[test]
    fn test_set_field_checks_slot_type() {
        let registry = registry();
        let mut value = zero_value(&registry.resolve("A").unwrap());

        set_field(&mut value, &["nested", "c"], Value::Int(9)).unwrap();
        assert_eq!(
            get_field(&value, &["nested", "c"]).unwrap(),
            &Value::Int(9)
        );

        let err = set_field(&mut value, &["nested", "c"], Value::Char(1))
            .unwrap_err();
        assert!(matches!(err, MemoryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_coerce_between_scalars() {
        let to_char = |n: i32| Value::Int(n).coerce_to(&TypeDescriptor::Char);
        assert_eq!(to_char(90), Ok(Value::Char(90)));
        assert_eq!(to_char(300), Ok(Value::Char(44)));
        assert_eq!(
            Value::Char(-1).coerce_to(&TypeDescriptor::Int),
            Ok(Value::Int(-1))
        );
        assert!(Value::Void.coerce_to(&TypeDescriptor::Int).is_err());
    }

    #[test]
    fn test_coerce_struct_to_other_struct_fails() {
        let registry = registry();
        let nested = zero_value(&registry.resolve("Nested").unwrap());

        let err =
            nested.coerce_to(&registry.resolve("A").unwrap()).unwrap_err();
        assert_eq!(
            err,
            MemoryError::TypeMismatch {
                expected: "struct A".into(),
                got: "struct Nested".into()
            }
        );
    }
}
