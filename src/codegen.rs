//! TypeScript emission: header, one `interface` block per declared shape (in
//! discovery order), then the root alias.
use std::fmt::{self, Write};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::ir::{DeclaredType, TypeExpr};
use crate::naming;

const TITLE: &str = "Auto-generated TypeScript type definitions";

pub struct Codegen {
    out: String,
    blocks: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new(), blocks: 0 }
    }

    pub fn header(&mut self, generated_at: DateTime<Utc>) -> fmt::Result {
        writeln!(self.out, "/**")?;
        writeln!(self.out, " * {TITLE}")?;
        writeln!(self.out, " * Generated by {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        writeln!(
            self.out,
            " * Generated at: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
        writeln!(self.out, " */")?;
        writeln!(self.out)
    }

    // blocks are separated by one blank line
    fn begin_block(&mut self) {
        if self.blocks > 0 {
            self.out.push_str("\n\n");
        }
        self.blocks += 1;
    }

    pub fn emit_declaration(&mut self, decl: &DeclaredType) -> fmt::Result {
        self.begin_block();
        writeln!(self.out, "interface {} {{", decl.name)?;
        for field in &decl.fields {
            writeln!(self.out, "  {}: {};", property_key(&field.name)?, field.ty)?;
        }
        self.out.push('}');
        Ok(())
    }

    pub fn emit_root_alias(&mut self, root_name: &str, root: &TypeExpr) -> fmt::Result {
        self.begin_block();
        write!(self.out, "export type {root_name} = {root};")
    }

    pub fn emit(&mut self, declarations: &[DeclaredType], root_name: &str, root: &TypeExpr) -> fmt::Result {
        for decl in declarations {
            self.emit_declaration(decl)?;
        }
        self.emit_root_alias(root_name, root)
    }

    pub fn into_string(mut self) -> String {
        self.out.push('\n');
        self.out
    }
}

impl Default for Codegen {
    fn default() -> Self { Self::new() }
}

/// Keys that still aren't identifiers after sanitization (`content-type`,
/// `a.b`, ...) are emitted as string-literal property names.
fn property_key(name: &str) -> std::result::Result<String, fmt::Error> {
    if naming::is_identifier(name) {
        Ok(name.to_string())
    } else {
        serde_json::to_string(name).map_err(|_| fmt::Error)
    }
}

pub fn render(declarations: &[DeclaredType], root_name: &str, root: &TypeExpr) -> Result<String> {
    render_at(declarations, root_name, root, Utc::now())
}

pub fn render_at(
    declarations: &[DeclaredType],
    root_name: &str,
    root: &TypeExpr,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let mut cg = Codegen::new();
    cg.header(generated_at)
        .and_then(|()| cg.emit(declarations, root_name, root))
        .map_err(|e| Error::InternalInferenceFailure(format!("failed to render declarations: {e}")))?;
    Ok(cg.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use crate::ir::{Field, Primitive};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn field(name: &str, ty: TypeExpr) -> Field {
        Field { name: name.into(), ty }
    }

    #[test]
    fn renders_header_blocks_and_alias() {
        let decls = vec![
            DeclaredType {
                name: "ItemMeta".into(),
                fields: vec![field("ok", TypeExpr::Primitive(Primitive::Boolean))],
            },
            DeclaredType {
                name: "Item".into(),
                fields: vec![
                    field("id", TypeExpr::Primitive(Primitive::Number)),
                    field("tags", TypeExpr::array_of(TypeExpr::Primitive(Primitive::String))),
                    field("meta", TypeExpr::Named("ItemMeta".into())),
                ],
            },
        ];
        let out = render_at(&decls, "Item", &TypeExpr::Named("Item".into()), at()).unwrap();
        let expected = format!(
            "/**
 * Auto-generated TypeScript type definitions
 * Generated by json-tsgen v{}
 * Generated at: 2024-01-02T03:04:05.000Z
 */

interface ItemMeta {{
  ok: boolean;
}}

interface Item {{
  id: number;
  tags: string[];
  meta: ItemMeta;
}}

export type Item = Item;
",
            env!("CARGO_PKG_VERSION")
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn scalar_root_is_alias_only() {
        let out = render_at(&[], "Count", &TypeExpr::Primitive(Primitive::Number), at()).unwrap();
        assert!(out.ends_with(" */\n\nexport type Count = number;\n"));
        assert!(!out.contains("interface"));
    }

    #[test]
    fn non_identifier_keys_are_quoted() {
        let decls = vec![DeclaredType {
            name: "Headers".into(),
            fields: vec![
                field("content-type", TypeExpr::Primitive(Primitive::String)),
                field("_123abc", TypeExpr::any()),
                field("$ref", TypeExpr::any()),
            ],
        }];
        let mut cg = Codegen::new();
        cg.emit(&decls, "Headers", &TypeExpr::Named("Headers".into())).unwrap();
        assert_eq!(
            cg.into_string(),
            "interface Headers {\n  \"content-type\": string;\n  _123abc: any;\n  $ref: any;\n}\n\nexport type Headers = Headers;\n"
        );
    }

    #[test]
    fn empty_shape_renders_empty_block() {
        let decls = vec![DeclaredType { name: "Empty".into(), fields: vec![] }];
        let mut cg = Codegen::new();
        cg.emit(&decls, "Empty", &TypeExpr::Named("Empty".into())).unwrap();
        assert_eq!(cg.into_string(), "interface Empty {\n}\n\nexport type Empty = Empty;\n");
    }
}
