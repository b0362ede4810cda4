//! Watermark-bounded walk over the paginated listing
//!
//! The source lists test takers newest first. The walk keeps every record
//! that finished strictly after the previous watermark and stops at the first
//! one that did not, since everything behind it was handled by an earlier
//! pass. With no watermark the walk covers every page the reported total
//! implies.

use thanksync_domain::{TestTaker, TestTakerPage};
use tracing::{debug, warn};

use super::ports::TestTakerSource;

/// Whether a record with `finished_at` lies beyond the watermark.
///
/// A record finishing exactly at the watermark is not new.
pub fn is_new(watermark: Option<i64>, finished_at: i64) -> bool {
    watermark.map_or(true, |mark| mark < finished_at)
}

/// Outcome of one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWalk {
    /// New records in page order
    pub candidates: Vec<TestTaker>,
    /// Offsets requested from the source, page 0 included
    pub offsets: Vec<usize>,
    /// Pages after the first that could not be fetched
    pub page_errors: usize,
    /// The walk ended on a record at or below the watermark
    pub reached_watermark: bool,
}

impl PageWalk {
    /// Append new records, returning `true` once the watermark is reached.
    fn absorb(&mut self, test_takers: Vec<TestTaker>, watermark: Option<i64>) -> bool {
        for test_taker in test_takers {
            if !is_new(watermark, test_taker.finished_at) {
                debug!(
                    test_taker_id = test_taker.id,
                    finished_at = test_taker.finished_at,
                    "reached previously processed test taker"
                );
                self.reached_watermark = true;
                return true;
            }
            self.candidates.push(test_taker);
        }
        false
    }
}

/// Collect the new test takers, starting from an already fetched first page.
///
/// Page fetch failures after the first page are logged and skipped; the walk
/// carries on with the next offset.
pub async fn collect_new_test_takers(
    source: &dyn TestTakerSource,
    token: &str,
    page_size: usize,
    watermark: Option<i64>,
    first_page: TestTakerPage,
) -> PageWalk {
    let page_size = page_size.max(1);
    let mut walk = PageWalk { offsets: vec![0], ..PageWalk::default() };
    let mut total = first_page.total;

    if walk.absorb(first_page.test_takers, watermark) {
        return walk;
    }

    let mut page_index = 1_usize;
    while page_index < total.div_ceil(page_size) {
        let offset = page_index * page_size;
        walk.offsets.push(offset);

        match source.list_page(token, page_size, offset).await {
            Ok(page) => {
                total = page.total;
                if page.is_empty() {
                    debug!(offset, "source returned an empty page; ending walk");
                    break;
                }
                if walk.absorb(page.test_takers, watermark) {
                    break;
                }
            }
            Err(err) => {
                warn!(offset, error = %err, "failed to fetch test taker page; skipping");
                walk.page_errors += 1;
            }
        }

        page_index += 1;
    }

    walk
}
