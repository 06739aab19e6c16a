use ckb_assembler_types::{LiveCell, ScriptId};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
    H256,
};
use std::cell::{Cell, RefCell};

use crate::{
    CellCollectorConfig, CellCollectorError, CellQuery, IndexerPage, IndexerRpc,
    LiveCellIterator,
};

/// Serves `cells` by pages; the cursor is the position of the next cell.
struct MockIndexer {
    cells: Vec<LiveCell>,
    // cells repeated at the start of every page after the first one
    overlap: usize,
    calls: Cell<usize>,
    fail_at_call: Option<usize>,
    limits: RefCell<Vec<u32>>,
}

impl MockIndexer {
    fn new(cells: Vec<LiveCell>) -> Self {
        MockIndexer {
            cells,
            overlap: 0,
            calls: Cell::new(0),
            fail_at_call: None,
            limits: RefCell::new(Vec::new()),
        }
    }
}

impl IndexerRpc for MockIndexer {
    fn get_cells(
        &self,
        _query: &CellQuery,
        limit: u32,
        after_cursor: Option<Bytes>,
    ) -> Result<IndexerPage, CellCollectorError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        self.limits.borrow_mut().push(limit);
        if self.fail_at_call == Some(call) {
            return Err(CellCollectorError::Indexer("connection refused".to_owned()));
        }
        let start = match after_cursor {
            Some(cursor) => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&cursor);
                (u64::from_le_bytes(buf) as usize).saturating_sub(self.overlap)
            }
            None => 0,
        };
        let end = (start + limit as usize).min(self.cells.len());
        Ok(IndexerPage {
            cells: self.cells[start.min(end)..end].to_vec(),
            last_cursor: Bytes::from((end as u64).to_le_bytes().to_vec()),
        })
    }
}

fn lock(args: &[u8]) -> Script {
    ScriptId::new_type(H256([1; 32])).script(args)
}

fn live_cell(lock: &Script, index: u32, shannons: u64) -> LiveCell {
    let output = CellOutput::new_builder()
        .capacity(Capacity::shannons(shannons).pack())
        .lock(lock.clone())
        .build();
    LiveCell::new(
        OutPoint::new(H256([2; 32]).pack(), index),
        output,
        Bytes::new(),
    )
}

fn config(page_size: u32) -> CellCollectorConfig {
    CellCollectorConfig {
        page_size,
        ..Default::default()
    }
}

#[test]
fn test_pages_are_fetched_lazily() {
    let alice = lock(b"alice");
    let cells = (0..10).map(|i| live_cell(&alice, i, 100)).collect();
    let indexer = MockIndexer::new(cells);

    let mut iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config(3));
    assert_eq!(indexer.calls.get(), 0);

    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.since, 0);
    assert_eq!(indexer.calls.get(), 1);

    let taken: Vec<_> = iter.by_ref().take(3).collect();
    assert_eq!(taken.len(), 3);
    assert_eq!(indexer.calls.get(), 2);
    assert!(indexer.limits.borrow().iter().all(|limit| *limit == 3));
}

#[test]
fn test_ends_on_short_page() {
    let alice = lock(b"alice");
    let cells = (0..7).map(|i| live_cell(&alice, i, 100)).collect();
    let indexer = MockIndexer::new(cells);

    let iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config(3));
    let collected: Result<Vec<_>, _> = iter.collect();
    assert_eq!(collected.unwrap().len(), 7);
    assert_eq!(indexer.calls.get(), 3);
}

#[test]
fn test_ends_on_empty_page() {
    let alice = lock(b"alice");
    let cells = (0..6).map(|i| live_cell(&alice, i, 100)).collect();
    let indexer = MockIndexer::new(cells);

    let iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config(3));
    assert_eq!(iter.count(), 6);
    assert_eq!(indexer.calls.get(), 3);
}

#[test]
fn test_duplicated_out_points_are_skipped() {
    let alice = lock(b"alice");
    let cells = (0..8).map(|i| live_cell(&alice, i, 100)).collect();
    let mut indexer = MockIndexer::new(cells);
    indexer.overlap = 1;

    let iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config(4));
    let indices: Vec<u32> = iter
        .map(|input| Unpack::<u32>::unpack(&input.unwrap().live_cell.out_point.index()))
        .collect();
    assert_eq!(indices, (0..8).collect::<Vec<u32>>());
}

#[test]
fn test_query_filters_cells() {
    let alice = lock(b"alice");
    let bob = lock(b"bob");
    let mut with_data = live_cell(&alice, 1, 100);
    with_data.output_data = Bytes::from_static(b"data");
    let cells = vec![
        live_cell(&alice, 0, 100),
        with_data,
        live_cell(&bob, 2, 100),
        live_cell(&alice, 3, 5_000),
    ];
    let indexer = MockIndexer::new(cells);

    let query = CellQuery::by_lock(alice).plain().capacity_range(0, 1_000);
    let iter = LiveCellIterator::new(&indexer, query);
    let indices: Vec<u32> = iter
        .map(|input| Unpack::<u32>::unpack(&input.unwrap().live_cell.out_point.index()))
        .collect();
    assert_eq!(indices, vec![0]);
}

#[test]
fn test_stops_after_error() {
    let alice = lock(b"alice");
    let cells = (0..6).map(|i| live_cell(&alice, i, 100)).collect();
    let mut indexer = MockIndexer::new(cells);
    indexer.fail_at_call = Some(1);

    let mut iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config(2));
    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().unwrap().is_ok());
    assert_eq!(
        iter.next(),
        Some(Err(CellCollectorError::Indexer(
            "connection refused".to_owned()
        )))
    );
    assert_eq!(iter.next(), None);
}

#[test]
fn test_zero_page_size() {
    let indexer = MockIndexer::new(vec![]);
    let mut iter =
        LiveCellIterator::with_config(&indexer, CellQuery::by_lock(lock(b"")), &config(0));
    assert_eq!(iter.next(), Some(Err(CellCollectorError::ZeroPageSize)));
    assert_eq!(indexer.calls.get(), 0);
}

#[test]
fn test_config_default_page_size() {
    let config: CellCollectorConfig = toml::from_str("").unwrap();
    assert_eq!(config, CellCollectorConfig::default());
    assert_eq!(config.page_size, 100);

    let config: CellCollectorConfig = toml::from_str("page_size = 20").unwrap();
    assert_eq!(config.page_size, 20);
    assert_eq!(config.max_pages, None);

    let config: CellCollectorConfig = toml::from_str("max_pages = 50").unwrap();
    assert_eq!(config.max_pages, Some(50));
}

/// Serves full pages of cells under another lock, forever.
struct EndlessIndexer {
    lock: Script,
    calls: Cell<usize>,
}

impl IndexerRpc for EndlessIndexer {
    fn get_cells(
        &self,
        _query: &CellQuery,
        limit: u32,
        _after_cursor: Option<Bytes>,
    ) -> Result<IndexerPage, CellCollectorError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        assert!(call < 1_000, "page budget is not enforced");
        let cells = (0..limit)
            .map(|i| live_cell(&self.lock, call as u32 * limit + i, 100))
            .collect();
        Ok(IndexerPage {
            cells,
            last_cursor: Bytes::from((call as u64).to_le_bytes().to_vec()),
        })
    }
}

#[test]
fn test_page_limit_bounds_unmatched_pages() {
    let indexer = EndlessIndexer {
        lock: lock(b"bob"),
        calls: Cell::new(0),
    };
    let config = CellCollectorConfig {
        page_size: 10,
        max_pages: Some(3),
    };
    let query = CellQuery::by_lock(lock(b"alice"));
    let mut iter = LiveCellIterator::with_config(&indexer, query, &config);
    assert_eq!(iter.next(), Some(Err(CellCollectorError::PageLimitReached(3))));
    assert_eq!(iter.next(), None);
    assert_eq!(indexer.calls.get(), 3);
    assert_eq!(iter.pages(), 3);
}

#[test]
fn test_page_limit_keeps_matched_cells() {
    let alice = lock(b"alice");
    let cells = (0..10).map(|i| live_cell(&alice, i, 100)).collect();
    let indexer = MockIndexer::new(cells);
    let config = CellCollectorConfig {
        page_size: 3,
        max_pages: Some(2),
    };

    let mut iter = LiveCellIterator::with_config(&indexer, CellQuery::by_lock(alice), &config);
    let taken: Vec<_> = iter.by_ref().take(6).collect();
    assert!(taken.iter().all(Result::is_ok));
    assert_eq!(iter.next(), Some(Err(CellCollectorError::PageLimitReached(2))));
    assert_eq!(indexer.calls.get(), 2);
}
