//! Program construction: the type registry plus resolved function signatures
//!
//! Items are processed in source order. A struct may only use structs
//! defined above it, and a function definition may only name structs
//! defined above it. Prototypes may also name structs that are only
//! declared (`struct Name;`). Function bodies are resolved lazily at
//! execution time, so any function may call any other regardless of
//! definition order.
//!
//! A prototype and the definition of the same function must agree on the
//! parameter types and the return type; parameter names may differ.

use crate::interpreter::errors::RuntimeError;
use crate::memory::registry::{TypeDescriptor, TypeRegistry};
use crate::parser::ast::{
    Item, Param, SourceLocation, Stmt, TranslationUnit, Type,
};
use rustc_hash::FxHashMap;
use tracing::debug;

/// A function ready to be called
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub params: Vec<(String, TypeDescriptor)>,
    /// `None` for `void` functions
    pub return_type: Option<TypeDescriptor>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Source-level signature of the first declaration of a function
#[derive(Debug)]
struct Signature {
    params: Vec<Type>,
    return_type: Type,
    location: SourceLocation,
}

impl Signature {
    fn new(
        params: &[Param],
        return_type: &Type,
        location: SourceLocation,
    ) -> Self {
        Signature {
            params: params.iter().map(|p| p.param_type.clone()).collect(),
            return_type: return_type.clone(),
            location,
        }
    }

    fn matches(&self, params: &[Param], return_type: &Type) -> bool {
        self.return_type == *return_type
            && self.params.len() == params.len()
            && self
                .params
                .iter()
                .zip(params)
                .all(|(ty, param)| *ty == param.param_type)
    }
}

/// Immutable program: struct layouts and functions
#[derive(Debug)]
pub struct Program {
    types: TypeRegistry,
    functions: FxHashMap<String, FunctionDescriptor>,
}

impl Program {
    pub fn from_ast(unit: &TranslationUnit) -> Result<Self, RuntimeError> {
        let mut types = TypeRegistry::new();
        let mut functions: FxHashMap<String, FunctionDescriptor> =
            FxHashMap::default();
        let mut signatures: FxHashMap<String, Signature> =
            FxHashMap::default();

        for item in &unit.items {
            match item {
                Item::StructDecl { name, .. } => {
                    types.declare_struct(name);
                    debug!(name = %name, "declared struct");
                }
                Item::StructDef {
                    name,
                    fields,
                    location,
                } => {
                    let fields: Vec<(String, Type)> = fields
                        .iter()
                        .map(|f| (f.name.clone(), f.field_type.clone()))
                        .collect();
                    types
                        .define_struct(name, &fields)
                        .map_err(|e| e.at(*location))?;
                    debug!(
                        name = %name,
                        fields = fields.len(),
                        "registered struct"
                    );
                }
                Item::FunctionDecl {
                    name,
                    params,
                    return_type,
                    location,
                } => {
                    check_prototype(
                        &types,
                        params,
                        return_type,
                        *location,
                    )?;
                    check_signature(
                        &signatures,
                        name,
                        params,
                        return_type,
                        *location,
                    )?;
                    signatures.entry(name.clone()).or_insert_with(|| {
                        Signature::new(params, return_type, *location)
                    });
                    debug!(
                        name = %name,
                        params = params.len(),
                        "declared function"
                    );
                }
                Item::FunctionDef {
                    name,
                    params,
                    body,
                    return_type,
                    location,
                } => {
                    if functions.contains_key(name) {
                        return Err(RuntimeError::DuplicateFunction {
                            name: name.clone(),
                            location: *location,
                        });
                    }
                    check_signature(
                        &signatures,
                        name,
                        params,
                        return_type,
                        *location,
                    )?;

                    let resolved = resolve_params(&types, params)?;
                    let resolved_return = types
                        .resolve_type(return_type)
                        .map_err(|e| e.at(*location))?;

                    signatures.entry(name.clone()).or_insert_with(|| {
                        Signature::new(params, return_type, *location)
                    });
                    debug!(
                        name = %name,
                        params = resolved.len(),
                        "registered function"
                    );
                    functions.insert(
                        name.clone(),
                        FunctionDescriptor {
                            name: name.clone(),
                            params: resolved,
                            return_type: resolved_return,
                            body: body.clone(),
                            location: *location,
                        },
                    );
                }
            }
        }

        debug!(
            structs = types.len(),
            functions = functions.len(),
            "program built"
        );
        Ok(Program { types, functions })
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// Compare against an earlier prototype or definition of `name`
fn check_signature(
    signatures: &FxHashMap<String, Signature>,
    name: &str,
    params: &[Param],
    return_type: &Type,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    match signatures.get(name) {
        Some(earlier) if !earlier.matches(params, return_type) => {
            Err(RuntimeError::SignatureMismatch {
                name: name.to_string(),
                declared_at: earlier.location,
                location,
            })
        }
        _ => Ok(()),
    }
}

/// Prototypes may name declared structs, but no unknown ones
fn check_prototype(
    types: &TypeRegistry,
    params: &[Param],
    return_type: &Type,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    let unknown = |ty: &Type| match ty {
        Type::Struct(name) if !types.is_known(name) => Some(name.clone()),
        _ => None,
    };

    if let Some(name) = unknown(return_type) {
        return Err(RuntimeError::UnknownType { name, location });
    }

    for (i, param) in params.iter().enumerate() {
        if let Some(name) = unknown(&param.param_type) {
            return Err(RuntimeError::UnknownType {
                name,
                location: param.location,
            });
        }
        if param.param_type == Type::Void {
            return Err(void_parameter(param));
        }
        let repeated = params[..i]
            .iter()
            .any(|p| !p.name.is_empty() && p.name == param.name);
        if repeated {
            return Err(RuntimeError::DuplicateVariable {
                name: param.name.clone(),
                location: param.location,
            });
        }
    }

    Ok(())
}

fn resolve_params(
    types: &TypeRegistry,
    params: &[Param],
) -> Result<Vec<(String, TypeDescriptor)>, RuntimeError> {
    let mut resolved: Vec<(String, TypeDescriptor)> =
        Vec::with_capacity(params.len());

    for param in params {
        if resolved.iter().any(|(name, _)| name == &param.name) {
            return Err(RuntimeError::DuplicateVariable {
                name: param.name.clone(),
                location: param.location,
            });
        }

        let ty = types
            .resolve_type(&param.param_type)
            .map_err(|e| e.at(param.location))?
            .ok_or_else(|| void_parameter(param))?;
        resolved.push((param.name.clone(), ty));
    }

    Ok(resolved)
}

fn void_parameter(param: &Param) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        message: format!("parameter '{}' cannot have type void", param.name),
        location: param.location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn build(source: &str) -> Result<Program, RuntimeError> {
        let unit = Parser::new(source).unwrap().parse_program().unwrap();
        Program::from_ast(&unit)
    }

    #[test]
    fn test_signatures_are_resolved() {
        let program = build(
            "struct P { int x; char c; };\n\
             struct P make(int x, char c) { return (struct P){ x, c }; }\n\
             void nothing() { }\n",
        )
        .unwrap();

        let make = program.function("make").unwrap();
        assert_eq!(make.params.len(), 2);
        assert_eq!(make.params[1].1, TypeDescriptor::Char);
        assert_eq!(make.return_type.as_ref().unwrap().size(), 5);
        assert_eq!(program.function("nothing").unwrap().return_type, None);
        assert_eq!(program.function_count(), 2);
    }

    #[test]
    fn test_struct_redefinition_is_duplicate_type() {
        let err =
            build("struct S { int a; };\nstruct S { char b; };\n").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::DuplicateType { ref name, location }
                if name == "S" && location.line == 2
        ));
    }

    #[test]
    fn test_duplicate_function() {
        let err = build("int f() { return 1; }\nint f() { return 2; }\n")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateFunction { .. }));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = build("int f(int a, char a) { return 1; }").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::DuplicateVariable { ref name, .. } if name == "a"
        ));
    }

    #[test]
    fn test_signature_with_unknown_struct() {
        let err = build(
            "int f(struct Later l) { return 0; }\nstruct Later { int x; };",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UnknownType { ref name, .. } if name == "Later"
        ));
    }

    #[test]
    fn test_forward_struct_field_reference() {
        let err = build("struct A { struct B b; };\nstruct B { int x; };")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownFieldType { .. }));
    }

    #[test]
    fn test_prototype_then_definition() {
        let program = build(
            "int add(int, int b);\n\
             int add(int x, int y) { return x + y; }\n\
             int add(int a, int b);\n",
        )
        .unwrap();

        let add = program.function("add").unwrap();
        assert_eq!(add.params[0].0, "x");
        assert_eq!(add.location.line, 2);
        assert_eq!(program.function_count(), 1);
    }

    #[test]
    fn test_prototype_without_definition_is_not_callable() {
        let program = build("int later(int n);").unwrap();
        assert!(program.function("later").is_none());
    }

    #[test]
    fn test_definition_must_match_prototype() {
        let err = build("int f(int n);\nint f(int n, int m) { return n; }")
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::SignatureMismatch { ref name, declared_at, location }
                if name == "f" && declared_at.line == 1 && location.line == 2
        ));

        let err =
            build("int f(int n);\nchar f(int n) { return n; }").unwrap_err();
        assert!(matches!(err, RuntimeError::SignatureMismatch { .. }));

        let err = build("int f(int n);\nint f(char n);").unwrap_err();
        assert!(matches!(err, RuntimeError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_forward_declared_struct_in_prototype() {
        let program = build(
            "struct P;\n\
             int get(struct P p);\n\
             struct P { int x; };\n\
             int get(struct P p) { return p.x; }\n",
        )
        .unwrap();
        assert_eq!(program.types().resolve("P").unwrap().size(), 4);

        let err = build("int get(struct Q q);").unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UnknownType { ref name, .. } if name == "Q"
        ));
    }

    #[test]
    fn test_declared_struct_has_no_layout_until_defined() {
        let err = build("struct P;\nint get(struct P p) { return 0; }")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownType { .. }));
    }
}
