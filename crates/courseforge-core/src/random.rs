//! Injectable randomness for tools that make random selections.
//!
//! Instructor fallback and thumbnail assignment are deliberately
//! non-deterministic in production; tests inject a deterministic picker
//! to pin the selection.

use rand::Rng;
use std::sync::Mutex;

/// Source of uniform index picks over a slice of known length.
pub trait IndexPicker: Send + Sync {
    /// Pick an index in `0..len`, or `None` when `len == 0`.
    fn pick_index(&self, len: usize) -> Option<usize>;
}

/// Production picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(rand::rng().random_range(0..len))
        }
    }
}

/// Deterministic picker for tests: returns a fixed sequence of indices,
/// clamped into range, repeating the last entry once exhausted.
#[derive(Debug)]
pub struct SequencePicker {
    indices: Mutex<Vec<usize>>,
    cursor: Mutex<usize>,
}

impl SequencePicker {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices: Mutex::new(indices),
            cursor: Mutex::new(0),
        }
    }

    /// Picker that always selects the first element.
    pub fn zeros() -> Self {
        Self::new(vec![0])
    }
}

impl IndexPicker for SequencePicker {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let indices = self.indices.lock().unwrap();
        if indices.is_empty() {
            return Some(0);
        }
        let mut cursor = self.cursor.lock().unwrap();
        let idx = indices[(*cursor).min(indices.len() - 1)];
        *cursor += 1;
        Some(idx.min(len - 1))
    }
}
