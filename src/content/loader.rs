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

use crate::content::{Content, ContentParam, ContentStats};
use crate::error::Result;
use ahash::AHashMap;
use std::any::{Any, TypeId};
use std::rc::Rc;

/// A cache slot: the shared content plus its preload flag
#[derive(Debug)]
pub struct ContentContainer<T> {
    pub(in crate::content) content: Rc<T>,
    pub(in crate::content) is_preloaded: bool,
}

impl<T> ContentContainer<T> {
    pub fn content(&self) -> &Rc<T> {
        &self.content
    }

    pub fn is_preloaded(&self) -> bool {
        self.is_preloaded
    }
}

/// Canonical key -> cache slot
pub type ContentStore<T> = AHashMap<String, ContentContainer<T>>;

/// Type-specific hooks plugged into the map-backed cache engine.
///
/// Only `load_content` is required. Types whose identity depends on a param
/// override `process_filename` (and, rarely, `find_content`); GPU-backed types
/// override the context hooks.
pub trait ContentLoader: 'static {
    type Content: Content;

    /// Type tag for the content this loader produces
    fn type_name(&self) -> &'static str {
        <Self::Content as Content>::TYPE_NAME
    }

    /// Build a new instance for a canonical key
    fn load_content(
        &mut self,
        key: &str,
        params: Option<&dyn ContentParam>,
    ) -> Result<Self::Content>;

    /// Destroy an instance that the cache is evicting
    fn free_content(&mut self, content: Rc<Self::Content>) {
        drop(content);
    }

    /// Fold params into an already path-normalized key
    fn process_filename(&self, path: String, _params: Option<&dyn ContentParam>) -> String {
        path
    }

    /// Find the cache key matching a processed key, if any
    fn find_content(
        &self,
        store: &ContentStore<Self::Content>,
        key: &str,
        _params: Option<&dyn ContentParam>,
    ) -> Option<String> {
        store.contains_key(key).then(|| key.to_string())
    }

    fn on_load_game(&mut self, _store: &ContentStore<Self::Content>) {}

    fn on_lost_context(&mut self, _store: &ContentStore<Self::Content>) {}

    fn on_new_context(&mut self, _store: &ContentStore<Self::Content>) {}
}

/// Type-independent capability set stored in the manager's registry
pub trait ContentLoaderBase: Any {
    /// Type tag of the cached content
    fn type_name(&self) -> &'static str;

    /// `TypeId` of the cached content
    fn content_type_id(&self) -> TypeId;

    fn on_load_game(&mut self);

    fn on_lost_context(&mut self);

    fn on_new_context(&mut self);

    /// Force-free every entry, reporting each one as a leak
    fn remove_all_content(&mut self);

    /// Number of cached entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> ContentStats;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
