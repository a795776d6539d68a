use std::collections::VecDeque;

use crate::mapping::MappingId;
use crate::meta::TypeRef;

// -----------------------------------------------------------------------------
// WorkItem

// Member resolution deferred by the recursion limiter: the target node
// exists (and is registered) but its members are still pending.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorkItem {
    pub mapping: MappingId,
    pub ty: TypeRef,
    pub namespace: Option<String>,
}

// -----------------------------------------------------------------------------
// RecursionLimiter

/// Bounds the resolver's descent.
///
/// Within the configured bound, resolution proceeds by ordinary recursive
/// descent. Past it, the member-resolution step is queued as a
/// [`WorkItem`] instead; the session drains the queue iteratively at the
/// surface depth, so pathologically deep or mutually recursive member
/// graphs never grow the call stack. The mechanism cannot fail, only
/// defer.
#[derive(Debug)]
pub(crate) struct RecursionLimiter {
    depth: usize,
    max_depth: usize,
    deferred: VecDeque<WorkItem>,
}

impl RecursionLimiter {
    // The normal operating mode is effectively unbounded; the diagnostic
    // stress mode reduces the bound to 1.
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth: max_depth.max(1),
            deferred: VecDeque::new(),
        }
    }

    /// Tries to account one more level of descent. On `false` the caller
    /// must defer instead of recursing.
    pub(crate) fn try_descend(&mut self) -> bool {
        if self.depth < self.max_depth {
            self.depth += 1;
            true
        } else {
            false
        }
    }

    /// Unwinds one level accounted by [`try_descend`](Self::try_descend).
    pub(crate) fn ascend(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    /// Queues deferred member resolution.
    pub(crate) fn defer(&mut self, item: WorkItem) {
        log::debug!(
            "deferring member resolution for {} (depth bound {} reached)",
            item.mapping,
            self.max_depth
        );
        self.deferred.push_back(item);
    }

    /// Pops the oldest deferred item.
    pub(crate) fn pop(&mut self) -> Option<WorkItem> {
        self.deferred.pop_front()
    }

    /// Whether deferred work remains.
    pub(crate) fn has_pending(&self) -> bool {
        !self.deferred.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::builtin;

    #[test]
    fn descent_is_bounded_and_unwinds() {
        let mut limiter = RecursionLimiter::new(2);
        assert!(limiter.try_descend());
        assert!(limiter.try_descend());
        assert!(!limiter.try_descend());
        limiter.ascend();
        assert!(limiter.try_descend());
    }

    #[test]
    fn deferred_items_drain_in_fifo_order() {
        let mut limiter = RecursionLimiter::new(1);
        limiter.defer(WorkItem {
            mapping: MappingId(0),
            ty: builtin::ANY_TYPE,
            namespace: None,
        });
        limiter.defer(WorkItem {
            mapping: MappingId(1),
            ty: builtin::ANY_TYPE,
            namespace: None,
        });
        assert!(limiter.has_pending());
        assert_eq!(limiter.pop().unwrap().mapping, MappingId(0));
        assert_eq!(limiter.pop().unwrap().mapping, MappingId(1));
        assert!(!limiter.has_pending());
    }
}
