//! Identity keys for vertices.
//!
//! Single-key tables use the natural key as-is. Associative tables
//! (`partsupp`, `lineitem`) join their key components with [`KEY_SEPARATOR`].
//! The same row always yields the same key, which is what makes upserts
//! idempotent and lets edges reference vertices loaded in earlier steps.

use crate::table::{Table, VertexSpec};
use thiserror::Error;

/// Separator between the components of a composite key. Components are
/// rendered `i64` values, which never contain it.
pub const KEY_SEPARATOR: char = '_';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Table '{table}' has {expected} key field(s) but {found} value(s) were given")]
    Arity {
        table: Table,
        expected: usize,
        found: usize,
    },
}

/// Stable, collision-free vertex identity within one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    rendered: String,
    parts: Vec<i64>,
}

impl IdentityKey {
    /// Derive the identity key of a vertex of `spec` from its key values,
    /// given in the order of `spec.key_fields`.
    pub fn derive(spec: &VertexSpec, values: &[i64]) -> Result<Self, KeyError> {
        if values.len() != spec.key_fields.len() {
            return Err(KeyError::Arity {
                table: spec.table,
                expected: spec.key_fields.len(),
                found: values.len(),
            });
        }

        let mut rendered = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                rendered.push(KEY_SEPARATOR);
            }
            rendered.push_str(&value.to_string());
        }

        Ok(Self {
            rendered,
            parts: values.to_vec(),
        })
    }

    /// Key of a vertex of `table`.
    pub fn for_table(table: Table, values: &[i64]) -> Result<Self, KeyError> {
        Self::derive(&table.vertex_spec(), values)
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Natural key components in key-field order.
    pub fn parts(&self) -> &[i64] {
        &self.parts
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}
