use thiserror::Error;

/// Raised when a caller addresses a checklist position that does not exist.
/// Front ends only toggle positions they enumerated, so this indicates a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection index {index} out of range for checklist of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Checked/unchecked flags, one per checklist entry, in checklist order.
///
/// The length is fixed at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    flags: Vec<bool>,
}

impl SelectionState {
    /// All-false selection for a checklist of `len` entries
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Selection with exactly the given zero-based positions checked
    pub fn from_indices(len: usize, indices: &[usize]) -> Result<Self, SelectionError> {
        let mut state = Self::new(len);
        for &index in indices {
            state.set(index, true)?;
        }
        Ok(state)
    }

    /// Flip the flag at `index`, returning its new value
    pub fn toggle(&mut self, index: usize) -> Result<bool, SelectionError> {
        let len = self.flags.len();
        let flag = self
            .flags
            .get_mut(index)
            .ok_or(SelectionError::IndexOutOfRange { index, len })?;
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), SelectionError> {
        let len = self.flags.len();
        let flag = self
            .flags
            .get_mut(index)
            .ok_or(SelectionError::IndexOutOfRange { index, len })?;
        *flag = value;
        Ok(())
    }

    /// Clear every flag in place
    pub fn reset(&mut self) {
        self.flags.iter_mut().for_each(|flag| *flag = false);
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().filter(|flag| **flag).count()
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, flag)| flag.then_some(i))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}
