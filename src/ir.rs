// Typed IR for codegen. No serde_json::Value here.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Any,                     // null and anything we can't classify
    Boolean,
    Number,
    String,
    Date,                    // only produced with `DateStrings::Date`
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    Array(Box<TypeExpr>),
    Named(String),           // points at a `DeclaredType` of the same invocation
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    pub fields: Vec<Field>,  // source key order
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,        // already sanitized
    pub ty: TypeExpr,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Date => "Date",
        }
    }
}

impl TypeExpr {
    pub fn any() -> Self { Self::Primitive(Primitive::Any) }
    pub fn array_of(item: TypeExpr) -> Self { Self::Array(Box::new(item)) }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.keyword()),
            Self::Array(item) => write!(f, "{item}[]"),
            Self::Named(name) => f.write_str(name),
        }
    }
}
