//! Offset paging for fetch-all
//!
//! The first request asks for `start=0` with the total count. Follow-up
//! requests walk `start = batch, 2·batch, …` while `start < total`.

use crate::error::Result;
use crate::query::DocumentQuery;
use crate::types::ResponseMeta;

/// Tracks the offset walk over a collection
#[derive(Debug, Clone)]
pub struct OffsetPager {
    /// Entries per request
    batch_size: u32,
    /// Offset of the next request
    next_start: u64,
    /// Total reported by the first response
    total: Option<u64>,
    /// Whether to keep asking for the count after the first page
    with_count: bool,
    done: bool,
}

impl OffsetPager {
    /// Create a pager; `with_count` applies to follow-up requests
    pub fn new(batch_size: u32, with_count: bool) -> Self {
        Self {
            batch_size: batch_size.max(1),
            next_start: 0,
            total: None,
            with_count,
            done: false,
        }
    }

    /// Query for the next page, or `None` when all pages were requested
    pub fn next_query(&self, base: &DocumentQuery) -> Option<DocumentQuery> {
        if self.done {
            return None;
        }

        let with_count = self.total.is_none() || self.with_count;
        Some(
            base.clone()
                .offset(self.next_start, self.batch_size)
                .with_count(with_count),
        )
    }

    /// Record a page's metadata and advance the offset
    pub fn advance(&mut self, meta: &ResponseMeta) -> Result<()> {
        let total = match self.total {
            Some(total) => total,
            None => {
                let total = meta.total_count()?;
                self.total = Some(total);
                total
            }
        };

        self.next_start += u64::from(self.batch_size);
        if self.next_start >= total {
            self.done = true;
        }
        Ok(())
    }

    /// Total reported by the first page
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Check if paging is complete
    pub fn is_done(&self) -> bool {
        self.done
    }
}
