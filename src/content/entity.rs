// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cell::Cell;

/// Core trait for any cacheable content
pub trait Content: 'static {
    /// Type tag used by the loader registry and in log messages
    const TYPE_NAME: &'static str;

    /// Reference bookkeeping owned by the loader that created this content
    fn content_state(&self) -> &ContentState;

    /// Check if any holder still references this content
    fn is_referenced(&self) -> bool {
        self.content_state().is_referenced()
    }
}

/// Reference bookkeeping embedded in every [`Content`] value.
///
/// Everything that mutates the state is visible to the `content` module
/// only, so the cache engine is the sole writer. Callers can read it.
#[derive(Debug)]
pub struct ContentState {
    was_loaded_by_loader: Cell<bool>,
    is_reference_counted: Cell<bool>,
    reference_count: Cell<u32>,
}

impl ContentState {
    pub fn new() -> Self {
        Self {
            was_loaded_by_loader: Cell::new(false),
            is_reference_counted: Cell::new(true),
            reference_count: Cell::new(0),
        }
    }

    pub fn was_loaded_by_loader(&self) -> bool {
        self.was_loaded_by_loader.get()
    }

    /// False for preloaded content, which ignores ordinary get/free pairs
    pub fn is_reference_counted(&self) -> bool {
        self.is_reference_counted.get()
    }

    pub fn reference_count(&self) -> u32 {
        self.reference_count.get()
    }

    pub fn is_referenced(&self) -> bool {
        self.reference_count.get() > 0
    }

    pub(in crate::content) fn mark_loaded_by_loader(&self, reference_counted: bool) {
        debug_assert!(
            !self.was_loaded_by_loader.get(),
            "content was already claimed by a loader"
        );
        self.was_loaded_by_loader.set(true);
        self.is_reference_counted.set(reference_counted);
    }

    pub(in crate::content) fn reference(&self) {
        self.reference_count.set(self.reference_count.get() + 1);
    }

    pub(in crate::content) fn release_reference(&self) {
        let count = self.reference_count.get();
        debug_assert!(count > 0, "release_reference without matching reference");
        self.reference_count.set(count.saturating_sub(1));
    }

    /// Drop every outstanding reference at once and return how many there were.
    ///
    /// Only the forced teardown path may call this; ordinary frees must stay
    /// balanced against gets.
    pub(in crate::content) fn force_reset_references(&self) -> u32 {
        self.reference_count.replace(0)
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}
