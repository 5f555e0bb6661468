//! Referential guard.
//!
//! Tracks the identity keys of every loaded table that later edges point
//! into, and rejects an edge whose foreign endpoint was never loaded. The
//! outcome does not depend on how a backend resolves missing endpoints.
//!
//! Against an upserting backend a repeated source key would silently merge
//! into one vertex, so there every table is tracked. Insert-only backends
//! reject repeats themselves.

use crate::error::{InputError, LoadError};
use graph_sink::WriteMode;
use std::collections::{HashMap, HashSet};
use tpch_schema::{EdgeRecord, IdentityKey, Table, VertexRecord};
use tracing::trace;

#[derive(Debug)]
pub struct ReferentialGuard {
    loaded: HashMap<Table, HashSet<IdentityKey>>,
}

impl ReferentialGuard {
    pub fn for_mode(mode: WriteMode) -> Self {
        let loaded = Table::LOAD_ORDER
            .into_iter()
            .filter(|table| mode == WriteMode::Upsert || table.is_referenced())
            .map(|table| (table, HashSet::new()))
            .collect();
        Self { loaded }
    }

    pub fn is_guarded(&self, table: Table) -> bool {
        self.loaded.contains_key(&table)
    }

    pub fn loaded_count(&self, table: Table) -> usize {
        self.loaded.get(&table).map_or(0, HashSet::len)
    }

    /// Remember the keys of a vertex batch. A repeated key within a guarded
    /// table is an input error.
    pub fn record_vertices(&mut self, table: Table, batch: &[VertexRecord]) -> Result<(), LoadError> {
        let Some(keys) = self.loaded.get_mut(&table) else {
            return Ok(());
        };
        for vertex in batch {
            if !keys.insert(vertex.key.clone()) {
                return Err(InputError::DuplicateKey {
                    table,
                    key: vertex.key.to_string(),
                }
                .into());
            }
        }
        trace!("{table}: {} keys tracked", keys.len());
        Ok(())
    }

    /// Check the endpoints of edges produced by rows of `producer`. The
    /// endpoint that is the producing row itself is not checked.
    pub fn check_edges(&self, producer: Table, batch: &[EdgeRecord]) -> Result<(), LoadError> {
        for edge in batch {
            let spec = edge.kind.spec();
            for (target, key) in [(spec.from, &edge.from), (spec.to, &edge.to)] {
                if target == producer {
                    continue;
                }
                let Some(keys) = self.loaded.get(&target) else {
                    continue;
                };
                if !keys.contains(key) {
                    return Err(LoadError::Referential {
                        table: producer,
                        kind: edge.kind,
                        target,
                        key: key.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
