//! Single-sample shape inference.
//!
//! Walk one JSON value, classify every position into a [`TypeExpr`], and turn
//! each distinct object shape into a named [`DeclaredType`]. Shapes are keyed
//! by their sorted key set only: two objects with the same keys share one
//! declaration even when their values disagree, and the first one discovered
//! decides the field types.
//!
//! All bookkeeping lives in a [`Registry`] owned by one [`Inference`]; nothing
//! is shared between invocations.
pub mod arr;
pub mod obj;
pub mod str;

use std::collections::BTreeSet;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::ir::{DeclaredType, Primitive, TypeExpr};
use crate::naming;

pub use str::DateStrings;

// ------------------------------- Policy ---------------------------------- //

/// Knobs for a single inference run.
#[derive(Clone, Debug, Default)]
pub struct Options {
    pub date_strings: DateStrings,
}

// ------------------------------ Registry --------------------------------- //

#[derive(Debug, Default)]
pub struct Registry {
    type_map: IndexMap<String, String>,   // shape signature -> type name (first writer wins)
    processed_names: BTreeSet<String>,    // every name handed out so far
    declarations: Vec<DeclaredType>,      // completion order == emission order
}

impl Registry {
    pub fn lookup(&self, signature: &str) -> Option<&str> {
        self.type_map.get(signature).map(String::as_str)
    }

    /// Claim `candidate`, or the first free `candidate{N}` (N ≥ 2) when a
    /// different shape already owns it.
    pub fn reserve_name(&mut self, candidate: &str) -> String {
        if self.processed_names.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let mut n = 2usize;
        loop {
            let name = format!("{candidate}{n}");
            if self.processed_names.insert(name.clone()) {
                debug!(candidate, name = %name, "type name taken by another shape, disambiguated");
                return name;
            }
            n += 1;
        }
    }

    pub fn register(&mut self, signature: String, decl: DeclaredType) {
        self.type_map.entry(signature).or_insert_with(|| decl.name.clone());
        self.declarations.push(decl);
    }

    pub fn declarations(&self) -> &[DeclaredType] {
        &self.declarations
    }

    pub fn into_declarations(self) -> Vec<DeclaredType> {
        self.declarations
    }
}

// ------------------------------ Classify --------------------------------- //

pub struct Inference {
    registry: Registry,
    options: Options,
}

impl Inference {
    pub fn new() -> Self { Self::with_options(Options::default()) }

    pub fn with_options(options: Options) -> Self {
        Self { registry: Registry::default(), options }
    }

    /// Infer `v` using a caller-facing name hint (PascalCased if needed).
    pub fn infer(&mut self, v: &Value, suggested_name: &str) -> TypeExpr {
        let hint = naming::root_type_name(suggested_name);
        self.infer_hinted(v, &hint)
    }

    /// Recursive step; `hint` is already a usable type name.
    pub(crate) fn infer_hinted(&mut self, v: &Value, hint: &str) -> TypeExpr {
        match v {
            Value::Null => TypeExpr::any(),
            Value::Bool(_) => TypeExpr::Primitive(Primitive::Boolean),
            Value::Number(_) => TypeExpr::Primitive(Primitive::Number),
            Value::String(s) => TypeExpr::Primitive(str::classify(s, self.options.date_strings)),
            Value::Array(xs) => arr::infer_array(self, xs, hint),
            Value::Object(m) => obj::infer_object(self, m, hint),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_declarations(self) -> Vec<DeclaredType> {
        self.registry.into_declarations()
    }
}

impl Default for Inference {
    fn default() -> Self { Self::new() }
}

/// Result of inferring one root value.
#[derive(Debug, Clone)]
pub struct Inferred {
    pub declarations: Vec<DeclaredType>,
    pub root: TypeExpr,
}

pub fn infer_root(v: &Value, root_name: &str, options: &Options) -> Inferred {
    let mut inf = Inference::with_options(options.clone());
    let root = inf.infer(v, root_name);
    let declarations = inf.into_declarations();
    debug!(declarations = declarations.len(), root = %root, "inference finished");
    Inferred { declarations, root }
}

// ------------------------------- Tests ------------------------------------ //
