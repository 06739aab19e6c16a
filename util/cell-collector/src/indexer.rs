use crate::CellCollectorError;
use ckb_assembler_types::{LiveCell, ScriptGroupType};
use ckb_types::{bytes::Bytes, packed::Script};
use std::sync::Arc;

/// Which cells to collect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellQuery {
    /// The script the cells must carry.
    pub script: Script,
    /// Whether `script` is matched against the lock or the type script.
    pub script_type: ScriptGroupType,
    /// Only accept cells without type script and without data.
    pub plain_only: bool,
    /// Only accept cells whose capacity is in `[start, end)`.
    pub capacity_range: Option<(u64, u64)>,
}

impl CellQuery {
    /// Cells locked by `lock`.
    pub fn by_lock(lock: Script) -> Self {
        CellQuery {
            script: lock,
            script_type: ScriptGroupType::Lock,
            plain_only: false,
            capacity_range: None,
        }
    }

    /// Cells typed by `type_script`.
    pub fn by_type(type_script: Script) -> Self {
        CellQuery {
            script: type_script,
            script_type: ScriptGroupType::Type,
            plain_only: false,
            capacity_range: None,
        }
    }

    /// Restricts the query to cells only carrying capacity.
    pub fn plain(mut self) -> Self {
        self.plain_only = true;
        self
    }

    /// Restricts the query to cells whose capacity is in `[start, end)`.
    pub fn capacity_range(mut self, start: u64, end: u64) -> Self {
        self.capacity_range = Some((start, end));
        self
    }

    /// Whether the cell satisfies the query.
    pub fn matches(&self, cell: &LiveCell) -> bool {
        let script_matched = match self.script_type {
            ScriptGroupType::Lock => cell.lock() == self.script,
            ScriptGroupType::Type => cell.type_script().as_ref() == Some(&self.script),
        };
        if !script_matched || (self.plain_only && !cell.is_plain()) {
            return false;
        }
        match self.capacity_range {
            Some((start, end)) => (start..end).contains(&cell.capacity()),
            None => true,
        }
    }
}

/// One page of cells returned by the indexer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexerPage {
    pub cells: Vec<LiveCell>,
    /// Pass it as `after_cursor` to request the next page.
    pub last_cursor: Bytes,
}

/// The `get_cells` RPC of the indexer.
pub trait IndexerRpc {
    /// Returns at most `limit` cells matching `query`, in ascending order, after `after_cursor`.
    fn get_cells(
        &self,
        query: &CellQuery,
        limit: u32,
        after_cursor: Option<Bytes>,
    ) -> Result<IndexerPage, CellCollectorError>;
}

impl<T: IndexerRpc + ?Sized> IndexerRpc for &T {
    fn get_cells(
        &self,
        query: &CellQuery,
        limit: u32,
        after_cursor: Option<Bytes>,
    ) -> Result<IndexerPage, CellCollectorError> {
        (**self).get_cells(query, limit, after_cursor)
    }
}

impl<T: IndexerRpc + ?Sized> IndexerRpc for Arc<T> {
    fn get_cells(
        &self,
        query: &CellQuery,
        limit: u32,
        after_cursor: Option<Bytes>,
    ) -> Result<IndexerPage, CellCollectorError> {
        (**self).get_cells(query, limit, after_cursor)
    }
}
