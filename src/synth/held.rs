//! Physically held keys, oldest first.

use smallvec::SmallVec;

/// Ordered set of held MIDI notes.
///
/// At most 128 distinct notes can be down at once, so the inline buffer
/// never spills to the heap.
#[derive(Debug, Clone, Default)]
pub struct HeldNotes {
    notes: SmallVec<[u8; 128]>,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self {
            notes: SmallVec::new(),
        }
    }

    /// Move `note` to the most-recent position.
    pub fn press(&mut self, note: u8) {
        self.release(note);
        self.notes.push(note);
    }

    pub fn release(&mut self, note: u8) {
        if let Some(pos) = self.notes.iter().position(|&n| n == note) {
            self.notes.remove(pos);
        }
    }

    pub fn contains(&self, note: u8) -> bool {
        self.notes.contains(&note)
    }

    /// Most recently pressed note still held.
    pub fn last(&self) -> Option<u8> {
        self.notes.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes.iter().copied()
    }
}
