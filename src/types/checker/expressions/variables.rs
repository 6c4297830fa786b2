//! Variable path resolution for reads and assignment targets.

use crate::ast::*;
use crate::error::StaticError;

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    /// Resolve `a[i].b.c[j]`: the root against the symbol table, later
    /// segments as fields of the previous segment's struct type.
    pub(crate) fn resolve_path(&mut self, path: &mut [VarRef]) -> TypeResult<DataType> {
        let Some((root, fields)) = path.split_first_mut() else {
            return Err(StaticError::Program("empty variable path".to_string()));
        };

        let ty = self
            .env
            .get(root.name())
            .cloned()
            .ok_or_else(|| StaticError::UndefinedVariable(root.name().to_string(), root.var_name.span))?;
        let mut ty = self.apply_index(root, ty)?;

        for segment in fields {
            let field_type = match self.env.get_struct(&ty.type_name) {
                Some(def) if !ty.is_array => def
                    .field(segment.name())
                    .map(|f| f.data_type.clone())
                    .ok_or_else(|| StaticError::NoSuchField {
                        type_name: ty.type_name.clone(),
                        field: segment.name().to_string(),
                        span: segment.var_name.span,
                    })?,
                _ => {
                    return Err(StaticError::general(
                        format!(
                            "cannot access field '{}' of non-struct type '{}'",
                            segment.name(),
                            ty
                        ),
                        segment.var_name.span,
                    ))
                }
            };
            ty = self.apply_index(segment, field_type)?;
        }

        Ok(ty)
    }

    /// Indexing strips array-ness and requires an int index.
    fn apply_index(&mut self, segment: &mut VarRef, ty: DataType) -> TypeResult<DataType> {
        let span = segment.var_name.span;
        let Some(index) = segment.array_expr.as_mut() else {
            return Ok(ty);
        };
        if !ty.is_array {
            return Err(StaticError::general(
                format!("'{}' is not an array", segment.var_name.lexeme),
                span,
            ));
        }
        let index_type = self.check_expr(index)?;
        if !index_type.is_scalar("int") {
            return Err(StaticError::mismatch(
                "int",
                index_type.to_string(),
                index.span(),
            ));
        }
        Ok(ty.element())
    }
}
