/// Hands out placeholder names (`0`, `1`, …) for expressions that have no
/// natural name, within one top-level message.
///
/// The allocator is reset before every top-level match. A nested parse that
/// may fail takes a [`mark`](Self::mark) first and
/// [`rollback`](Self::rollback)s on failure, so a failed attempt never leaves
/// a gap in the numbering of later placeholders.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    next: usize,
}

/// Allocator state captured by [`IdentifierAllocator::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorMark(usize);

impl IdentifierAllocator {
    pub fn next(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    pub fn mark(&self) -> AllocatorMark {
        AllocatorMark(self.next)
    }

    pub fn rollback(&mut self, mark: AllocatorMark) {
        self.next = mark.0;
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
