//! Issuing of test case identifiers.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::domain::{TestCaseId, TestLevel};

/// Issues unique, monotonically increasing [`TestCaseId`]s, one sequence per
/// [`TestLevel`].
///
/// Each level has its own atomic counter, so the allocator can be shared
/// between threads by reference. Numbers are never handed out twice, even if
/// the test case they were issued for is later discarded.
#[derive(Debug, Default)]
pub struct IdAllocator {
    /// The last sequence number issued for each level (`0` if none).
    issued: [AtomicUsize; 3],
    /// The number of issued identifiers given back for each level.
    retired: [AtomicUsize; 3],
}

impl IdAllocator {
    /// Creates an allocator whose sequences all start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that continues after the given identifiers.
    ///
    /// Each level resumes one past the highest sequence number present for
    /// it. Gaps are not filled.
    #[must_use]
    pub fn resume_after<'a>(ids: impl IntoIterator<Item = &'a TestCaseId>) -> Self {
        let allocator = Self::new();
        for id in ids {
            allocator.issued[id.level().slot()].fetch_max(id.seq().get(), Ordering::AcqRel);
        }
        allocator
    }

    /// Issues the next identifier for a level.
    ///
    /// # Panics
    ///
    /// Panics if the sequence for `level` overflows `usize`.
    pub fn next(&self, level: TestLevel) -> TestCaseId {
        let previous = self.issued[level.slot()].fetch_add(1, Ordering::AcqRel);
        let seq = previous
            .checked_add(1)
            .and_then(NonZeroUsize::new)
            .expect("test case sequence overflowed");
        TestCaseId::new(level, seq)
    }

    /// Gives back an identifier whose test case was discarded.
    ///
    /// The number is not recycled; later calls to [`next`](Self::next) keep
    /// counting from the highest issued number. The gap stays visible.
    pub fn retire(&self, id: TestCaseId) {
        self.retired[id.level().slot()].fetch_add(1, Ordering::AcqRel);
        tracing::debug!("Retired {id}; sequence {} is not reissued", id.seq());
    }

    /// The number of identifiers retired so far for a level.
    #[must_use]
    pub fn retired(&self, level: TestLevel) -> usize {
        self.retired[level.slot()].load(Ordering::Acquire)
    }

    /// The highest sequence number issued so far for a level.
    #[must_use]
    pub fn issued(&self, level: TestLevel) -> usize {
        self.issued[level.slot()].load(Ordering::Acquire)
    }
}
