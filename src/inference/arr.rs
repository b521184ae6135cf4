use serde_json::Value;

use super::Inference;
use crate::ir::TypeExpr;

const ITEM_SUFFIX: &str = "Item";

/// Arrays are typed from their first element only; the rest are not looked
/// at, so heterogeneous arrays are not unified.
pub(super) fn infer_array(inf: &mut Inference, xs: &[Value], hint: &str) -> TypeExpr {
    match xs.first() {
        None => TypeExpr::array_of(TypeExpr::any()),
        Some(first) => {
            let item = inf.infer_hinted(first, &format!("{hint}{ITEM_SUFFIX}"));
            TypeExpr::array_of(item)
        }
    }
}
