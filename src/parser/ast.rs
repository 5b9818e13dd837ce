// AST (Abstract Syntax Tree) definitions for the C subset

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Type names as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Void,
    Struct(String), // Struct name
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Void => write!(f, "void"),
            Type::Struct(name) => write!(f, "struct {}", name),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(symbol)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    /// Empty for an unnamed prototype parameter
    pub name: String,
    pub param_type: Type,
    pub location: SourceLocation,
}

/// Struct field
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: Type,
    pub location: SourceLocation,
}

/// One entry of an initializer list: `.field = value` or a positional
/// `value`
#[derive(Debug, Clone)]
pub struct Initializer {
    pub designator: Option<String>,
    pub value: Expr,
    pub location: SourceLocation,
}

/// Top-level declarations
#[derive(Debug, Clone)]
pub enum Item {
    /// `struct Name;`
    StructDecl {
        name: String,
        location: SourceLocation,
    },
    StructDef {
        name: String,
        fields: Vec<Field>,
        location: SourceLocation,
    },
    /// Prototype: `type name(params);`
    FunctionDecl {
        name: String,
        params: Vec<Param>,
        return_type: Type,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
        return_type: Type,
        location: SourceLocation,
    },
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        name: String,
        var_type: Type,
        init: Option<Expr>,
        location: SourceLocation,
    },
    Assignment {
        target: Expr,
        value: Expr,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i32, SourceLocation),
    CharLiteral(i8, SourceLocation),
    Variable(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    MemberAccess {
        object: Box<Expr>,
        member: String,
        location: SourceLocation,
    },
    /// `(struct Name){ ... }`
    CompoundLiteral {
        struct_name: String,
        initializers: Vec<Initializer>,
        location: SourceLocation,
    },
    /// Bare `{ ... }`, only meaningful where the target type is known
    InitList {
        initializers: Vec<Initializer>,
        location: SourceLocation,
    },
    SizeofType {
        target_type: Type,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::VarDecl { location, .. }
            | Stmt::Assignment { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Expression { location, .. } => *location,
        }
    }
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::CharLiteral(_, loc)
            | Expr::Variable(_, loc) => *loc,
            Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::FunctionCall { location, .. }
            | Expr::MemberAccess { location, .. }
            | Expr::CompoundLiteral { location, .. }
            | Expr::InitList { location, .. }
            | Expr::SizeofType { location, .. } => *location,
        }
    }

    /// Flatten `root.a.b.c` into the root expression and the path
    /// `[a, b, c]`
    pub fn member_path(&self) -> (&Expr, Vec<&str>) {
        let mut path = Vec::new();
        let mut current = self;
        while let Expr::MemberAccess { object, member, .. } = current {
            path.push(member.as_str());
            current = object;
        }
        path.reverse();
        (current, path)
    }
}

/// Top-level program structure: every declaration in source order
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_path_flattens_nested_access() {
        let loc = SourceLocation::new(1, 1);
        let expr = Expr::MemberAccess {
            object: Box::new(Expr::MemberAccess {
                object: Box::new(Expr::Variable("a".to_string(), loc)),
                member: "nested".to_string(),
                location: loc,
            }),
            member: "c".to_string(),
            location: loc,
        };

        let (root, path) = expr.member_path();
        assert!(matches!(root, Expr::Variable(name, _) if name == "a"));
        assert_eq!(path, vec!["nested", "c"]);
    }
}
