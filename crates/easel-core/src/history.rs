//! Snapshot-based undo/redo.
//!
//! Every committed operation records a full scene snapshot. The cursor points
//! at the snapshot that matches the live scene; undo and redo move the cursor
//! and the editor reloads the snapshot it lands on.

/// Linear snapshot history with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<String>,
    index: usize,
    /// Maximum retained snapshots; 0 keeps everything.
    limit: usize,
    replaying: bool,
}

impl History {
    /// Empty history keeping at most `limit` snapshots (0 for unbounded).
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            limit,
            replaying: false,
        }
    }

    /// Forget everything and start from `initial`.
    pub fn reset(&mut self, initial: String) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.index = 0;
    }

    /// Record a snapshot after the cursor, discarding any redo branch.
    ///
    /// Ignored while a snapshot is being replayed, so reloading a past state
    /// never records itself. Returns true if the snapshot was stored.
    pub fn record(&mut self, snapshot: String) -> bool {
        if self.replaying {
            return false;
        }
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        if self.limit > 0 && self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
        true
    }

    /// True if a snapshot exists before the cursor.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// True if a snapshot exists after the cursor.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Snapshot matching the live scene.
    pub fn current(&self) -> Option<&str> {
        self.snapshots.get(self.index).map(String::as_str)
    }

    /// Snapshot undo would restore.
    pub fn undo_target(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.snapshots.get(self.index - 1).map(String::as_str)
    }

    /// Snapshot redo would restore.
    pub fn redo_target(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.snapshots.get(self.index + 1).map(String::as_str)
    }

    /// Move the cursor back one snapshot, if possible.
    pub fn step_back(&mut self) {
        if self.can_undo() {
            self.index -= 1;
        }
    }

    /// Move the cursor forward one snapshot, if possible.
    pub fn step_forward(&mut self) {
        if self.can_redo() {
            self.index += 1;
        }
    }

    /// True while a past snapshot is being loaded.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub(crate) fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position within the retained snapshots.
    pub fn position(&self) -> usize {
        self.index
    }
}
