//! Partitions a document's registry by [`SlotState`] so the writer can
//! decide, in one pass, what an incremental save actually needs to touch.

use crate::document::SlotState;
use crate::{Document, ObjectId};

#[derive(Debug, Default)]
pub struct ChangeSet {
    pub original: Vec<ObjectId>,
    pub dirty: Vec<ObjectId>,
    pub new: Vec<ObjectId>,
    pub free: Vec<ObjectId>,
}

impl ChangeSet {
    pub fn collect(document: &Document) -> Self {
        let mut set = ChangeSet::default();
        for id in document.objects.keys().copied() {
            match document.slot_state(id) {
                SlotState::Original => set.original.push(id),
                SlotState::Dirty => set.dirty.push(id),
                SlotState::New => set.new.push(id),
                SlotState::Free => {}
            }
        }
        for (id, state) in document.slot_state.iter() {
            if *state == SlotState::Free {
                set.free.push(*id);
            }
        }
        set
    }

    /// Objects an incremental save must write: everything dirty or new.
    pub fn pending_writes(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.dirty.iter().chain(self.new.iter()).copied()
    }
}
