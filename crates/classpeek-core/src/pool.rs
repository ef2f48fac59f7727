//! The string-bearing subset of a class file's constant pool.
//!
//! Only entries that hold text or point at text are kept. A `Utf8` entry
//! becomes a [`PoolEntry::Literal`]; `Class`, `String`, `NameAndType` and the
//! other reference-shaped entries become a [`PoolEntry::Indirection`] listing
//! the indices they name. Numeric and handle entries leave their slot empty.
//!
//! ## Resolution
//!
//! [`ConstantPool::resolve`] follows indirections until it reaches a literal.
//! When an indirection has more than one candidate, the selector at the
//! current hop picks which one to follow:
//!
//! ```
//! use classpeek_core::pool::{ConstantPool, PoolEntry};
//!
//! let mut pool = ConstantPool::with_count(4);
//! pool.set(1, PoolEntry::literal("name"))?;
//! pool.set(2, PoolEntry::literal("descriptor"))?;
//! pool.set(3, PoolEntry::pair(1, 2))?;
//!
//! assert_eq!(pool.resolve(3, &[0])?.as_str_lossy(), "name");
//! assert_eq!(pool.resolve(3, &[1])?.as_str_lossy(), "descriptor");
//! # Ok::<(), classpeek_core::error::PoolError>(())
//! ```

use crate::error::PoolError;
use java_string::{JavaStr, JavaString};

/// A string-bearing constant pool slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEntry {
    /// Decoded text of a `Utf8` entry, unpaired surrogates included
    Literal(JavaString),
    /// Candidate target indices, never empty
    Indirection(Box<[u16]>),
}

impl PoolEntry {
    /// Creates a literal entry
    pub fn literal(value: impl Into<JavaString>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates an indirection with a single target
    pub fn single(target: u16) -> Self {
        Self::Indirection(Box::new([target]))
    }

    /// Creates an indirection with two candidate targets
    pub fn pair(first: u16, second: u16) -> Self {
        Self::Indirection(Box::new([first, second]))
    }

    /// Creates an indirection from a list of targets, `None` if it is empty
    pub fn indirection(targets: impl Into<Vec<u16>>) -> Option<Self> {
        let targets = targets.into();
        if targets.is_empty() {
            return None;
        }
        Some(Self::Indirection(targets.into_boxed_slice()))
    }
}

/// Fixed-size table of optional entries, addressed from 1
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Option<PoolEntry>>,
}

impl ConstantPool {
    /// Creates an empty pool for a declared `constant_pool_count`.
    ///
    /// The usable indices are `1..count`; a count of 0 or 1 yields a pool
    /// with no slots.
    pub fn with_count(count: u16) -> Self {
        Self {
            entries: vec![None; count.saturating_sub(1) as usize],
        }
    }

    /// Number of usable slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the pool has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores an entry at `index`
    pub fn set(&mut self, index: u16, entry: PoolEntry) -> Result<(), PoolError> {
        let slot = self.slot_mut(index)?;
        *slot = Some(entry);
        Ok(())
    }

    /// Resolves `index` to a string, using `selectors` to choose between
    /// candidates at each indirection hop.
    ///
    /// Selector `n` picks `candidates[min(n, len - 1)]`. When the selectors
    /// run out, the last candidate is followed.
    ///
    /// The self-reference check only compares each hop against the index
    /// originally requested. A loop made up entirely of other entries is
    /// not detected.
    pub fn resolve(&self, index: u16, selectors: &[usize]) -> Result<&JavaStr, PoolError> {
        let origin = index;
        let mut current = index;
        let mut depth = 0;

        loop {
            let entry = self
                .slot(current)?
                .as_ref()
                .ok_or(PoolError::NotAString {
                    index: current,
                    origin,
                })?;

            let targets = match entry {
                PoolEntry::Literal(value) => return Ok(value),
                PoolEntry::Indirection(targets) => targets,
            };

            let last = targets.len() - 1;
            let pick = selectors.get(depth).map_or(last, |&n| n.min(last));
            depth += 1;

            let target = targets[pick];
            if target == origin {
                return Err(PoolError::SelfReference { index: origin });
            }
            current = target;
        }
    }

    /// Shorthand for [`resolve`](Self::resolve) with no selectors
    pub fn resolve_str(&self, index: u16) -> Result<&JavaStr, PoolError> {
        self.resolve(index, &[])
    }

    fn slot(&self, index: u16) -> Result<&Option<PoolEntry>, PoolError> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i as usize))
            .ok_or(PoolError::InvalidEntry { index })
    }

    fn slot_mut(&mut self, index: u16) -> Result<&mut Option<PoolEntry>, PoolError> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get_mut(i as usize))
            .ok_or(PoolError::InvalidEntry { index })
    }
}
