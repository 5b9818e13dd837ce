//! Struct layouts and the type registry
//!
//! A [`TypeRegistry`] lives for exactly one program. Structs are registered
//! in source order and may only use scalars or structs registered before
//! them, which rules out forward references and (direct or transitive) self
//! containment without a separate cycle check.
//!
//! `struct Name;` only declares the name. A declared struct may appear in
//! prototypes but has no layout until its definition.
//!
//! Layouts are computed once at definition time: each field records its
//! byte offset and size, fields are packed sequentially with no padding.

use super::{MemoryError, CHAR_SIZE, INT_SIZE};
use crate::parser::ast::Type;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::rc::Rc;

/// A resolved, value-carrying type
///
/// Struct descriptors share their layout; two struct descriptors are equal
/// when they name the same struct, since a registry never holds two
/// definitions under one name.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Int,
    Char,
    Struct(Rc<StructLayout>),
}

impl TypeDescriptor {
    /// Size in bytes
    pub fn size(&self) -> usize {
        match self {
            TypeDescriptor::Int => INT_SIZE,
            TypeDescriptor::Char => CHAR_SIZE,
            TypeDescriptor::Struct(layout) => layout.size,
        }
    }

    /// The struct layout, or `None` for scalars
    pub fn layout(&self) -> Option<&StructLayout> {
        match self {
            TypeDescriptor::Struct(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, TypeDescriptor::Struct(_))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDescriptor::Int, TypeDescriptor::Int) => true,
            (TypeDescriptor::Char, TypeDescriptor::Char) => true,
            (TypeDescriptor::Struct(a), TypeDescriptor::Struct(b)) => {
                a.name == b.name
            }
            _ => false,
        }
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Int => write!(f, "int"),
            TypeDescriptor::Char => write!(f, "char"),
            TypeDescriptor::Struct(layout) => {
                write!(f, "struct {}", layout.name)
            }
        }
    }
}

/// One field of a struct layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Byte offset from the start of the enclosing struct
    pub offset: usize,
    pub size: usize,
}

/// Ordered field list of a struct
#[derive(Debug)]
pub struct StructLayout {
    pub name: String,
    pub fields: Vec<FieldLayout>,
    pub size: usize,
}

impl StructLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Resolve a field path (`nested.c`) to its absolute byte offset and type
    pub fn offset_of(
        &self,
        path: &[&str],
    ) -> Result<(usize, TypeDescriptor), MemoryError> {
        let unknown = |layout: &StructLayout, name: &str| {
            MemoryError::UnknownField {
                struct_name: layout.name.clone(),
                field: name.to_string(),
            }
        };

        let (first, rest) =
            path.split_first().ok_or_else(|| unknown(self, ""))?;
        let field =
            self.field(first).ok_or_else(|| unknown(self, *first))?;
        let mut offset = field.offset;
        let mut ty = field.ty.clone();

        for name in rest {
            let layout = match &ty {
                TypeDescriptor::Struct(layout) => Rc::clone(layout),
                scalar => {
                    return Err(MemoryError::NotAStruct {
                        field: name.to_string(),
                        found: scalar.to_string(),
                    });
                }
            };
            let field =
                layout.field(name).ok_or_else(|| unknown(&layout, *name))?;
            offset += field.offset;
            ty = field.ty.clone();
        }

        Ok((offset, ty))
    }
}

/// Struct definitions of one program, in definition order
#[derive(Debug, Default)]
pub struct TypeRegistry {
    structs: FxHashMap<String, Rc<StructLayout>>,
    order: Vec<String>,
    /// Names seen in `struct Name;` that are not defined yet
    declared: FxHashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Record a forward declaration; a no-op once the struct is defined
    pub fn declare_struct(&mut self, name: &str) {
        if !self.structs.contains_key(name) {
            self.declared.insert(name.to_string());
        }
    }

    /// Whether `name` has been declared or defined
    pub fn is_known(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.declared.contains(name)
    }

    /// Register a struct, computing its layout
    ///
    /// Nothing is registered when validation fails.
    pub fn define_struct(
        &mut self,
        name: &str,
        fields: &[(String, Type)],
    ) -> Result<TypeDescriptor, MemoryError> {
        if self.structs.contains_key(name) {
            return Err(MemoryError::DuplicateType {
                name: name.to_string(),
            });
        }

        let mut layouts: Vec<FieldLayout> = Vec::with_capacity(fields.len());
        let mut offset = 0;

        for (field_name, field_type) in fields {
            if layouts.iter().any(|f| &f.name == field_name) {
                return Err(MemoryError::DuplicateField {
                    struct_name: name.to_string(),
                    field: field_name.clone(),
                });
            }

            let ty = match self.resolve_type(field_type) {
                Ok(Some(ty)) => ty,
                Ok(None) | Err(_) => {
                    return Err(MemoryError::UnknownFieldType {
                        struct_name: name.to_string(),
                        field: field_name.clone(),
                        type_name: field_type.to_string(),
                    });
                }
            };

            let size = ty.size();
            layouts.push(FieldLayout {
                name: field_name.clone(),
                ty,
                offset,
                size,
            });
            offset += size;
        }

        let layout = Rc::new(StructLayout {
            name: name.to_string(),
            fields: layouts,
            size: offset,
        });
        self.structs.insert(name.to_string(), Rc::clone(&layout));
        self.order.push(name.to_string());
        self.declared.remove(name);

        Ok(TypeDescriptor::Struct(layout))
    }

    /// Look up a registered struct by name
    pub fn resolve(&self, name: &str) -> Result<TypeDescriptor, MemoryError> {
        self.structs
            .get(name)
            .map(|layout| TypeDescriptor::Struct(Rc::clone(layout)))
            .ok_or_else(|| MemoryError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Resolve a source type name; `void` resolves to `None`
    pub fn resolve_type(
        &self,
        ty: &Type,
    ) -> Result<Option<TypeDescriptor>, MemoryError> {
        match ty {
            Type::Int => Ok(Some(TypeDescriptor::Int)),
            Type::Char => Ok(Some(TypeDescriptor::Char)),
            Type::Void => Ok(None),
            Type::Struct(name) => self.resolve(name).map(Some),
        }
    }

    /// Ordered fields of a type; scalars have none
    pub fn layout_of<'a>(
        &self,
        ty: &'a TypeDescriptor,
    ) -> &'a [FieldLayout] {
        ty.layout().map(|l| l.fields.as_slice()).unwrap_or(&[])
    }

    /// Struct names in definition order
    pub fn struct_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[(&str, Type)]) -> Vec<(String, Type)> {
        list.iter()
            .map(|(name, ty)| (name.to_string(), ty.clone()))
            .collect()
    }

    fn registry_with_nested() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .define_struct(
                "Nested",
                &fields(&[
                    ("a", Type::Char),
                    ("b", Type::Char),
                    ("c", Type::Int),
                ]),
            )
            .unwrap();
        registry
            .define_struct(
                "A",
                &fields(&[
                    ("a", Type::Int),
                    ("nested", Type::Struct("Nested".into())),
                    ("c", Type::Int),
                ]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_layout_offsets_and_sizes() {
        let registry = registry_with_nested();
        let a = registry.resolve("A").unwrap();
        let layout = registry.layout_of(&a);

        let summary: Vec<(&str, usize, usize)> = layout
            .iter()
            .map(|f| (f.name.as_str(), f.offset, f.size))
            .collect();
        assert_eq!(
            summary,
            vec![("a", 0, 4), ("nested", 4, 6), ("c", 10, 4)]
        );
        assert_eq!(a.size(), 14);
    }

    #[test]
    fn test_nested_offset_of() {
        let registry = registry_with_nested();
        let a = registry.resolve("A").unwrap();
        let (offset, ty) =
            a.layout().unwrap().offset_of(&["nested", "c"]).unwrap();

        assert_eq!(offset, 4 + 2);
        assert_eq!(ty, TypeDescriptor::Int);
    }

    #[test]
    fn test_offset_of_through_scalar_fails() {
        let registry = registry_with_nested();
        let a = registry.resolve("A").unwrap();
        let err = a.layout().unwrap().offset_of(&["a", "x"]).unwrap_err();

        assert!(matches!(
            err,
            MemoryError::NotAStruct { ref field, .. } if field == "x"
        ));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut registry = registry_with_nested();
        let err = registry
            .define_struct("Nested", &fields(&[("x", Type::Int)]))
            .unwrap_err();

        assert_eq!(
            err,
            MemoryError::DuplicateType {
                name: "Nested".into()
            }
        );
        // The first layout is untouched
        assert_eq!(registry.resolve("Nested").unwrap().size(), 6);
    }

    #[test]
    fn test_forward_and_self_reference_rejected() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .define_struct(
                "Node",
                &fields(&[("next", Type::Struct("Node".into()))]),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            MemoryError::UnknownFieldType { ref type_name, .. }
                if type_name == "struct Node"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_void_field_rejected() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .define_struct("S", &fields(&[("v", Type::Void)]))
            .unwrap_err();

        assert!(matches!(err, MemoryError::UnknownFieldType { .. }));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .define_struct("S", &fields(&[("x", Type::Int), ("x", Type::Char)]))
            .unwrap_err();

        assert!(matches!(err, MemoryError::DuplicateField { .. }));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.resolve("Missing"),
            Err(MemoryError::UnknownType { .. })
        ));
        assert_eq!(registry.resolve_type(&Type::Void).unwrap(), None);
    }

    #[test]
    fn test_struct_names_keep_definition_order() {
        let registry = registry_with_nested();
        assert_eq!(
            registry.struct_names().collect::<Vec<_>>(),
            vec!["Nested", "A"]
        );
    }

    #[test]
    fn test_forward_declaration() {
        let mut registry = TypeRegistry::new();
        registry.declare_struct("Later");

        assert!(registry.is_known("Later"));
        assert!(!registry.is_known("Other"));
        // Declared but not defined: no layout to resolve or embed yet
        assert!(registry.resolve("Later").is_err());
        assert!(matches!(
            registry.define_struct(
                "Outer",
                &fields(&[("l", Type::Struct("Later".into()))])
            ),
            Err(MemoryError::UnknownFieldType { .. })
        ));

        registry
            .define_struct("Later", &fields(&[("x", Type::Int)]))
            .unwrap();
        registry.declare_struct("Later");
        assert_eq!(registry.resolve("Later").unwrap().size(), 4);
        assert_eq!(registry.len(), 1);
    }
}
