use crate::{CellCollectorConfig, CellCollectorError, CellQuery, IndexerRpc};
use ckb_assembler_types::{LiveCell, TransactionInput};
use ckb_logger::{debug, trace};
use ckb_types::{bytes::Bytes, packed::OutPoint};
use std::collections::{HashSet, VecDeque};

/// Iterates the live cells matching a query, requesting pages from the indexer on demand.
///
/// A page is only requested when the previous one is drained, so a consumer which stops early
/// never pays for the remaining pages. Out points already yielded are skipped when a later page
/// repeats them. The iteration ends on an empty page or a page shorter than the page size, and
/// after the first error.
///
/// Cells failing the query are dropped on the client side, so a query matching nothing may page
/// through the whole chain. Set `max_pages` to bound the number of requests.
pub struct LiveCellIterator<I> {
    indexer: I,
    query: CellQuery,
    page_size: u32,
    max_pages: Option<u32>,
    pages: u32,
    cursor: Option<Bytes>,
    buffer: VecDeque<LiveCell>,
    seen: HashSet<OutPoint>,
    finished: bool,
}

impl<I: IndexerRpc> LiveCellIterator<I> {
    /// Creates an iterator with the default page size.
    pub fn new(indexer: I, query: CellQuery) -> Self {
        Self::with_config(indexer, query, &CellCollectorConfig::default())
    }

    pub fn with_config(indexer: I, query: CellQuery, config: &CellCollectorConfig) -> Self {
        LiveCellIterator {
            indexer,
            query,
            page_size: config.page_size,
            max_pages: config.max_pages,
            pages: 0,
            cursor: None,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            finished: false,
        }
    }

    pub fn query(&self) -> &CellQuery {
        &self.query
    }

    /// The number of pages requested so far.
    pub fn pages(&self) -> u32 {
        self.pages
    }

    fn fetch_page(&mut self) -> Result<(), CellCollectorError> {
        if self.page_size == 0 {
            return Err(CellCollectorError::ZeroPageSize);
        }
        if let Some(max_pages) = self.max_pages {
            if self.pages >= max_pages {
                return Err(CellCollectorError::PageLimitReached(self.pages));
            }
        }
        self.pages += 1;
        let page = self
            .indexer
            .get_cells(&self.query, self.page_size, self.cursor.take())?;
        debug!(
            "fetched {} cells from indexer, page size {}",
            page.cells.len(),
            self.page_size
        );
        if page.cells.len() < self.page_size as usize {
            self.finished = true;
        }
        self.cursor = Some(page.last_cursor);
        for cell in page.cells {
            if !self.query.matches(&cell) {
                trace!("skip cell {} not matching the query", cell.out_point);
                continue;
            }
            if !self.seen.insert(cell.out_point.clone()) {
                trace!("skip duplicated cell {}", cell.out_point);
                continue;
            }
            self.buffer.push_back(cell);
        }
        Ok(())
    }
}

impl<I: IndexerRpc> Iterator for LiveCellIterator<I> {
    type Item = Result<TransactionInput, CellCollectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cell) = self.buffer.pop_front() {
                return Some(Ok(cell.into()));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}
