use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::encryption::{self, EncryptionState};
use crate::error::{BlockerReason, Error, Result};
use crate::xref::Xref;
use crate::{Dictionary, Object, ObjectId};

/// Per-slot bookkeeping the registry needs beyond the object's own bytes:
/// whether it came from the original file untouched, was mutated, is
/// brand new, or has been deleted. The writer reads this table to decide
/// what an incremental save actually needs to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Original,
    Dirty,
    New,
    Free,
}

/// The in-memory object graph plus everything needed to write it back
/// out, either as a full rewrite or as an incremental append.
pub struct Document {
    pub version: String,
    pub trailer: Dictionary,
    pub reference_table: Xref,
    pub objects: BTreeMap<ObjectId, Object>,
    pub max_id: u32,
    pub xref_start: usize,
    pub binary_mark: Vec<u8>,
    pub encryption_state: Option<EncryptionState>,
    pub(crate) slot_state: BTreeMap<ObjectId, SlotState>,
    pub(crate) loaded_via_brute_force: bool,
    pub(crate) is_linearized: bool,
    pub(crate) encryption_changed: bool,
    original_had_encrypt: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            version: String::from("1.5"),
            trailer: Dictionary::new(),
            reference_table: Xref::new(0, crate::xref::XrefType::CrossReferenceTable),
            objects: BTreeMap::new(),
            max_id: 0,
            xref_start: 0,
            binary_mark: vec![0xe2, 0xe3, 0xcf, 0xd3],
            encryption_state: None,
            slot_state: BTreeMap::new(),
            loaded_via_brute_force: false,
            is_linearized: false,
            encryption_changed: false,
            original_had_encrypt: false,
        }
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.original_had_encrypt = self.encryption_state.is_some();
        self.is_linearized = self.objects.values().any(|o| o.as_dict().map(|d| d.has(b"Linearized")).unwrap_or(false));
        for id in self.objects.keys() {
            self.slot_state.entry(*id).or_insert(SlotState::Original);
        }
    }

    pub(crate) fn mark_brute_forced(&mut self) {
        self.loaded_via_brute_force = true;
    }

    pub fn get_object(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(&id).ok_or(Error::ObjectNotFound(id))
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        if !self.objects.contains_key(&id) {
            return Err(Error::ObjectNotFound(id));
        }
        self.slot_state.entry(id).and_modify(|s| {
            if *s == SlotState::Original {
                *s = SlotState::Dirty;
            }
        });
        Ok(self.objects.get_mut(&id).unwrap())
    }

    /// Resolve `object` one level: if it's a `Reference`, look it up;
    /// otherwise hand back the value as-is. Does not chase chains of
    /// references (PDF references are never indirect-to-indirect).
    pub fn dereference<'a>(&'a self, object: &'a Object) -> Result<(Option<ObjectId>, &'a Object)> {
        match object {
            Object::Reference(id) => self.get_object(*id).map(|o| (Some(*id), o)),
            other => Ok((None, other)),
        }
    }

    /// Allocate a fresh object number and insert `object` under it.
    pub fn add_object<O: Into<Object>>(&mut self, object: O) -> ObjectId {
        self.max_id += 1;
        let id = (self.max_id, 0);
        self.objects.insert(id, object.into());
        self.slot_state.insert(id, SlotState::New);
        id
    }

    /// Replace the object at `id` (or insert it fresh if unoccupied).
    pub fn set_object<O: Into<Object>>(&mut self, id: ObjectId, object: O) {
        self.objects.insert(id, object.into());
        self.max_id = self.max_id.max(id.0);
        self.slot_state.entry(id).and_modify(|s| *s = SlotState::Dirty).or_insert(SlotState::New);
    }

    /// Remove an object and mark its slot free for the writer's xref.
    pub fn delete_object(&mut self, id: ObjectId) -> Option<Object> {
        self.slot_state.insert(id, SlotState::Free);
        self.objects.remove(&id)
    }

    pub(crate) fn slot_state(&self, id: ObjectId) -> SlotState {
        self.slot_state.get(&id).copied().unwrap_or(SlotState::New)
    }

    /// BFS over Dict/Array/Stream/Reference edges starting at `/Root`,
    /// `/Info`, and `/Encrypt`. Anything not reached is garbage.
    pub fn reachable_objects(&self) -> std::collections::HashSet<ObjectId> {
        let mut seen = std::collections::HashSet::new();
        let mut stack: Vec<ObjectId> = Vec::new();

        for key in [&b"Root"[..], b"Info", b"Encrypt"] {
            if let Ok(id) = self.trailer.get(key).and_then(Object::as_reference) {
                stack.push(id);
            }
        }

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Ok(object) = self.get_object(id) {
                collect_references(object, &mut stack);
            }
        }

        seen
    }

    pub fn authenticate_password(&self, password: &str) -> Result<()> {
        encryption::check_password(self, password)
    }

    /// `None` if an incremental save is safe; otherwise the reason it's
    /// refused per the writer's blocker policy.
    pub fn can_save_incrementally(&self) -> Option<BlockerReason> {
        if self.is_linearized {
            return Some(BlockerReason::Linearized);
        }
        if self.loaded_via_brute_force {
            return Some(BlockerReason::BruteForceRecovery);
        }
        let has_encrypt_now = self.trailer.has(b"Encrypt") || self.encryption_state.is_some();
        match (self.original_had_encrypt, has_encrypt_now) {
            (false, true) => Some(BlockerReason::EncryptionAdded),
            (true, false) => Some(BlockerReason::EncryptionRemoved),
            (true, true) if self.encryption_changed => Some(BlockerReason::EncryptionChanged),
            _ => None,
        }
    }

    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.save_to(file)
    }

    pub fn save_to<W: Write>(&mut self, target: W) -> Result<()> {
        crate::writer::write_full(self, target)
    }

    /// Append an incremental update to the original bytes the document
    /// was loaded from. `original` must be the exact buffer `Document::load*`
    /// consumed; the writer trusts its length as the new `/Prev` offset.
    pub fn save_incremental<W: Write>(&mut self, original: &[u8], target: W) -> Result<()> {
        if let Some(reason) = self.can_save_incrementally() {
            return Err(Error::IncrementalBlocked(reason));
        }
        crate::writer::write_incremental(self, original, target)
    }
}

fn collect_references(object: &Object, stack: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => stack.push(*id),
        Object::Array(arr) => arr.iter().for_each(|o| collect_references(o, stack)),
        Object::Dictionary(dict) => dict.iter().for_each(|(_, o)| collect_references(o, stack)),
        Object::Stream(stream) => stream.dict.iter().for_each(|(_, o)| collect_references(o, stack)),
        _ => {}
    }
}
