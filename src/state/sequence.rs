/// Run-wide record numbering
///
/// One counter is owned by a run and lent to every crawl in it, so ids keep
/// increasing across accounts. Ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    issued: u64,
}

/// A saved counter position, used to undo the ids of a discarded attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCheckpoint(u64);

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id
    pub fn next_id(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Number of ids issued so far (equals the last issued id)
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn checkpoint(&self) -> SequenceCheckpoint {
        SequenceCheckpoint(self.issued)
    }

    /// Returns the counter to `checkpoint`
    ///
    /// Only valid while nothing numbered after the checkpoint has been kept.
    pub fn rollback(&mut self, checkpoint: SequenceCheckpoint) {
        debug_assert!(checkpoint.0 <= self.issued);
        self.issued = checkpoint.0;
    }
}
