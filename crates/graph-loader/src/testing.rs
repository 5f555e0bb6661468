//! Test support: an in-memory [`GraphSink`] and a deterministic `.tbl`
//! fixture writer.
//!
//! `MemorySink` models both write modes. Insert-only rejects a batch that
//! repeats a stored vertex key, upsert replaces in place and merges edges on
//! their endpoints. Every write call is recorded so batching can be asserted.

use anyhow::{anyhow, Result};
use graph_sink::{GraphSink, WriteMode};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tpch_schema::{EdgeKind, EdgeRecord, IdentityKey, PropertyNaming, Table, VertexRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Vertices(Table),
    Edges(EdgeKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCall {
    pub target: WriteTarget,
    pub records: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    vertices: BTreeMap<Table, BTreeMap<IdentityKey, VertexRecord>>,
    edges: BTreeMap<EdgeKind, Vec<EdgeRecord>>,
    writes: Vec<WriteCall>,
    clears: usize,
    setups: usize,
    declared: bool,
    closed: bool,
}

pub struct MemorySink {
    mode: WriteMode,
    naming: PropertyNaming,
    fail_after: Option<usize>,
    fail_clear: bool,
    state: Mutex<MemoryState>,
}

impl MemorySink {
    /// Document-style semantics: prefixed names, duplicate keys fail.
    pub fn insert_only() -> Self {
        Self::new(WriteMode::InsertOnly, PropertyNaming::Prefixed)
    }

    /// Relationship-style semantics: bare names, upserts and merges.
    pub fn upsert() -> Self {
        Self::new(WriteMode::Upsert, PropertyNaming::Bare)
    }

    pub fn new(mode: WriteMode, naming: PropertyNaming) -> Self {
        Self {
            mode,
            naming,
            fail_after: None,
            fail_clear: false,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Fail every write call after `writes` successful ones.
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    /// Fail every clear call.
    pub fn fail_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_write(&self, state: &MemoryState, target: WriteTarget) -> Result<()> {
        if state.closed {
            return Err(anyhow!("Write to closed sink: {target:?}"));
        }
        match self.fail_after {
            Some(limit) if state.writes.len() >= limit => {
                Err(anyhow!("Injected failure on write {}", state.writes.len() + 1))
            }
            _ => Ok(()),
        }
    }

    pub fn write_calls(&self) -> Vec<WriteCall> {
        self.state().writes.clone()
    }

    /// Record counts of every write call to `target`, in call order.
    pub fn write_sizes(&self, target: WriteTarget) -> Vec<usize> {
        self.state()
            .writes
            .iter()
            .filter(|call| call.target == target)
            .map(|call| call.records)
            .collect()
    }

    pub fn vertex_count(&self, table: Table) -> usize {
        self.state().vertices.get(&table).map_or(0, BTreeMap::len)
    }

    pub fn edges(&self, kind: EdgeKind) -> Vec<EdgeRecord> {
        self.state().edges.get(&kind).cloned().unwrap_or_default()
    }

    pub fn clear_calls(&self) -> usize {
        self.state().clears
    }

    pub fn setup_calls(&self) -> usize {
        self.state().setups
    }

    pub fn is_declared(&self) -> bool {
        self.state().declared
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

#[async_trait::async_trait]
impl GraphSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn naming(&self) -> PropertyNaming {
        self.naming
    }

    fn write_mode(&self) -> WriteMode {
        self.mode
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state();
        state.clears += 1;
        if self.fail_clear {
            return Err(anyhow!("Injected failure on clear"));
        }
        state.vertices.clear();
        state.edges.clear();
        state.declared = false;
        Ok(())
    }

    async fn setup(&self) -> Result<()> {
        self.state().setups += 1;
        Ok(())
    }

    async fn write_vertices(&self, table: Table, batch: &[VertexRecord]) -> Result<()> {
        let mut state = self.state();
        let target = WriteTarget::Vertices(table);
        self.begin_write(&state, target)?;

        let stored = state.vertices.entry(table).or_default();
        if self.mode == WriteMode::InsertOnly {
            let mut seen = HashSet::new();
            for vertex in batch {
                if stored.contains_key(&vertex.key) || !seen.insert(&vertex.key) {
                    return Err(anyhow!(
                        "Database record `{}:{}` already exists",
                        table.name(),
                        vertex.key
                    ));
                }
            }
        }
        for vertex in batch {
            stored.insert(vertex.key.clone(), vertex.clone());
        }

        state.writes.push(WriteCall {
            target,
            records: batch.len(),
        });
        Ok(())
    }

    async fn write_edges(&self, kind: EdgeKind, batch: &[EdgeRecord]) -> Result<()> {
        let mut state = self.state();
        let target = WriteTarget::Edges(kind);
        self.begin_write(&state, target)?;

        let spec = kind.spec();
        for edge in batch {
            let from_exists = state
                .vertices
                .get(&spec.from)
                .is_some_and(|v| v.contains_key(&edge.from));
            let to_exists = state
                .vertices
                .get(&spec.to)
                .is_some_and(|v| v.contains_key(&edge.to));
            if !from_exists || !to_exists {
                return Err(anyhow!(
                    "Edge {kind} {} -> {} has no stored endpoint",
                    edge.from,
                    edge.to
                ));
            }
        }

        let mode = self.mode;
        let stored = state.edges.entry(kind).or_default();
        for edge in batch {
            let existing = match mode {
                WriteMode::Upsert => stored
                    .iter_mut()
                    .find(|e| e.from == edge.from && e.to == edge.to),
                WriteMode::InsertOnly => None,
            };
            match existing {
                Some(existing) => existing.properties = edge.properties.clone(),
                None => stored.push(edge.clone()),
            }
        }

        state.writes.push(WriteCall {
            target,
            records: batch.len(),
        });
        Ok(())
    }

    async fn declare_graph(&self) -> Result<()> {
        self.state().declared = true;
        Ok(())
    }

    async fn count_vertices(&self, table: Table) -> Result<u64> {
        Ok(self.vertex_count(table) as u64)
    }

    async fn count_edges(&self, kind: EdgeKind) -> Result<u64> {
        Ok(self.state().edges.get(&kind).map_or(0, Vec::len) as u64)
    }

    async fn close(&self) -> Result<()> {
        self.state().closed = true;
        Ok(())
    }
}

/// Row counts of a generated fixture. Every foreign key resolves.
#[derive(Debug, Clone, Copy)]
pub struct FixtureScale {
    pub regions: usize,
    pub nations: usize,
    pub suppliers: usize,
    pub customers: usize,
    pub parts: usize,
    /// Suppliers per part, at most `suppliers`.
    pub suppliers_per_part: usize,
    pub orders: usize,
    pub lines_per_order: usize,
}

impl Default for FixtureScale {
    fn default() -> Self {
        Self {
            regions: 5,
            nations: 25,
            suppliers: 10,
            customers: 30,
            parts: 40,
            suppliers_per_part: 4,
            orders: 60,
            lines_per_order: 3,
        }
    }
}

impl FixtureScale {
    pub fn rows(&self, table: Table) -> usize {
        match table {
            Table::Region => self.regions,
            Table::Nation => self.nations,
            Table::Supplier => self.suppliers,
            Table::Customer => self.customers,
            Table::Part => self.parts,
            Table::PartSupp => self.parts * self.suppliers_per_part.min(self.suppliers),
            Table::Orders => self.orders,
            Table::LineItem => self.orders * self.lines_per_order,
        }
    }
}

/// Write one generator-style `.tbl` file per table into `dir`.
pub fn write_tbl_fixture(dir: &Path, scale: &FixtureScale) -> io::Result<()> {
    for table in Table::LOAD_ORDER {
        fs::write(dir.join(table.file_name()), fixture_lines(table, scale))?;
    }
    Ok(())
}

fn f(value: impl std::fmt::Display) -> String {
    value.to_string()
}

/// Generator-style lines of one table, each ending in the trailing `|`.
pub fn fixture_lines(table: Table, scale: &FixtureScale) -> String {
    let mut out = String::new();
    let mut line = |fields: Vec<String>| {
        out.push_str(&fields.join("|"));
        out.push_str("|\n");
    };

    match table {
        Table::Region => {
            for r in 0..scale.regions {
                line(vec![f(r), format!("REGION{r}"), f("region comment")]);
            }
        }
        Table::Nation => {
            for n in 0..scale.nations {
                line(vec![
                    f(n),
                    format!("NATION{n}"),
                    f(n % scale.regions),
                    f("nation comment"),
                ]);
            }
        }
        Table::Supplier => {
            for k in 1..=scale.suppliers {
                line(vec![
                    f(k),
                    format!("Supplier#{k:09}"),
                    f("addr"),
                    f(k % scale.nations),
                    f("10-000-000-0000"),
                    f("1234.5"),
                    f("supplier comment"),
                ]);
            }
        }
        Table::Customer => {
            for k in 1..=scale.customers {
                line(vec![
                    f(k),
                    format!("Customer#{k:09}"),
                    f("addr"),
                    f(k % scale.nations),
                    f("10-000-000-0000"),
                    f("711.56"),
                    f("BUILDING"),
                    f("customer comment"),
                ]);
            }
        }
        Table::Part => {
            for k in 1..=scale.parts {
                line(vec![
                    f(k),
                    format!("part {k}"),
                    f("Manufacturer#1"),
                    f("Brand#13"),
                    f("PROMO BURNISHED COPPER"),
                    f(k % 50 + 1),
                    f("JUMBO PKG"),
                    f("901.0"),
                    f("part comment"),
                ]);
            }
        }
        Table::PartSupp => {
            for p in 1..=scale.parts {
                for i in 0..scale.suppliers_per_part.min(scale.suppliers) {
                    line(vec![
                        f(p),
                        f((p + i) % scale.suppliers + 1),
                        f(100 + i),
                        f("771.64"),
                        f("partsupp comment"),
                    ]);
                }
            }
        }
        Table::Orders => {
            for o in 1..=scale.orders {
                line(vec![
                    f(o),
                    f((o - 1) % scale.customers + 1),
                    f("O"),
                    f("172799.49"),
                    f("1996-01-02"),
                    f("5-LOW"),
                    f("Clerk#000000951"),
                    f(0),
                    f("order comment"),
                ]);
            }
        }
        Table::LineItem => {
            for o in 1..=scale.orders {
                for l in 1..=scale.lines_per_order {
                    line(vec![
                        f(o),
                        f((o * 7 + l) % scale.parts + 1),
                        f((o + l) % scale.suppliers + 1),
                        f(l),
                        f("17"),
                        f("21168.23"),
                        f("0.04"),
                        f("0.02"),
                        f("N"),
                        f("O"),
                        f("1996-03-13"),
                        f("1996-02-12"),
                        f("1996-03-22"),
                        f("DELIVER IN PERSON"),
                        f("TRUCK"),
                        f("lineitem comment"),
                    ]);
                }
            }
        }
    }
    out
}
