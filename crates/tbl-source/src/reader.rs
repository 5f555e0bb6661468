use crate::SourceError;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tpch_schema::{Table, TableRow};
use tracing::debug;

const DELIMITER: u8 = b'|';

/// Reader over one `.tbl` source.
pub struct TblReader<Rd: Read> {
    table: Table,
    inner: csv::Reader<Rd>,
}

impl TblReader<File> {
    pub fn open(path: impl AsRef<Path>, table: Table) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened {} source: {}", table, path.display());
        Ok(Self::from_reader(file, table))
    }
}

impl<Rd: Read> TblReader<Rd> {
    pub fn from_reader(reader: Rd, table: Table) -> Self {
        let inner = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(DELIMITER)
            .quoting(false)
            .flexible(true)
            .from_reader(reader);
        Self { table, inner }
    }

    /// Typed rows of this source. `R` must be the row type of the table the
    /// reader was opened for.
    pub fn rows<R: TableRow>(self) -> Result<TblRows<Rd, R>, SourceError> {
        if R::TABLE != self.table {
            return Err(SourceError::TableMismatch {
                expected: self.table,
                requested: R::TABLE,
            });
        }
        Ok(TblRows {
            table: self.table,
            inner: self.inner,
            record: StringRecord::new(),
            _row: PhantomData,
        })
    }
}

/// Iterator of typed rows. Stops at the end of input; every error is an
/// input error for the table.
pub struct TblRows<Rd: Read, R> {
    table: Table,
    inner: csv::Reader<Rd>,
    record: StringRecord,
    _row: PhantomData<fn() -> R>,
}

impl<Rd: Read, R: TableRow> Iterator for TblRows<Rd, R> {
    type Item = Result<R, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.record) {
            Ok(false) => return None,
            Ok(true) => {}
            Err(source) => {
                let line = source.position().map(|p| p.line()).unwrap_or(0);
                return Some(Err(SourceError::Read {
                    table: self.table,
                    line,
                    source,
                }));
            }
        }

        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        let expected = self.table.column_count();
        if self.record.len() < expected {
            return Some(Err(SourceError::MissingColumns {
                table: self.table,
                line,
                expected,
                found: self.record.len(),
            }));
        }
        self.record.truncate(expected);

        Some(
            self.record
                .deserialize::<R>(None)
                .map_err(|source| SourceError::Malformed {
                    table: self.table,
                    line,
                    source,
                }),
        )
    }
}

/// Count the data lines of a source file (non-blank lines).
pub fn count_records(path: impl AsRef<Path>) -> Result<usize, SourceError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| SourceError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;

    let mut count = 0;
    for line in BufReader::new(file).lines() {
        if !line.map_err(io_err)?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// A directory holding one `<table>.tbl` file per table.
#[derive(Debug, Clone)]
pub struct TblDirectory {
    root: PathBuf,
}

impl TblDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }

    pub fn open(&self, table: Table) -> Result<TblReader<File>, SourceError> {
        TblReader::open(self.path(table), table)
    }

    pub fn rows<R: TableRow>(&self) -> Result<TblRows<File, R>, SourceError> {
        self.open(R::TABLE)?.rows()
    }

    pub fn record_count(&self, table: Table) -> Result<usize, SourceError> {
        count_records(self.path(table))
    }
}
