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

//! Map-backed cache engine
//!
//! One [`ContentLoaderMapStore`] exists per content type. It owns every cached
//! instance and decides when an instance is destroyed:
//!
//! - ordinary entries live while their reference count is non-zero; each
//!   `get` adds one reference and each `free` removes one
//! - preloaded entries ignore reference counting and are removed only by an
//!   unload (a free with `preload = true`) or by [`remove_all_content`]
//! - failed loads are never cached
//!
//! [`remove_all_content`]: ContentLoaderMapStore::remove_all_content

use crate::content::key::{add_default_path_if_needed, normalize_default_path};
use crate::content::{
    Content, ContentContainer, ContentLoader, ContentLoaderBase, ContentParam, ContentStore,
};
use crate::logging::ContentLogger;
use ahash::AHashMap;
use std::any::{Any, TypeId};
use std::rc::Rc;

const LOG_CATEGORY: &str = "Content";

/// Cache statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub hits: u64,
    pub misses: u64,
    pub failed_loads: u64,
    pub frees: u64,
    pub forced_frees: u64,
    pub leaks: u64,
    pub redundant_preloads: u64,
}

impl ContentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_ratio(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// Cache engine for one content type
pub struct ContentLoaderMapStore<T: Content> {
    loader: Box<dyn ContentLoader<Content = T>>,
    store: ContentStore<T>,
    default_path: String,
    warn_on_redundant_preload: bool,
    logger: Rc<dyn ContentLogger>,
    stats: ContentStats,
}

impl<T: Content> ContentLoaderMapStore<T> {
    pub fn new<L>(loader: L, logger: Rc<dyn ContentLogger>) -> Self
    where
        L: ContentLoader<Content = T>,
    {
        Self {
            loader: Box::new(loader),
            store: AHashMap::new(),
            default_path: String::new(),
            warn_on_redundant_preload: true,
            logger,
            stats: ContentStats::new(),
        }
    }

    pub fn with_default_path(mut self, path: &str) -> Self {
        self.set_default_path(path);
        self
    }

    pub fn set_default_path(&mut self, path: &str) {
        self.default_path = normalize_default_path(path);
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    pub fn set_warn_on_redundant_preload(&mut self, warn: bool) {
        self.warn_on_redundant_preload = warn;
    }

    pub fn loader(&self) -> &dyn ContentLoader<Content = T> {
        self.loader.as_ref()
    }

    pub fn loader_mut(&mut self) -> &mut dyn ContentLoader<Content = T> {
        self.loader.as_mut()
    }

    /// Canonical key for a caller-supplied name and params
    pub fn canonical_key(&self, name: &str, params: Option<&dyn ContentParam>) -> String {
        let path = add_default_path_if_needed(name, &self.default_path);
        self.loader.process_filename(path, params)
    }

    /// Get content by name, loading it on first use.
    ///
    /// Every call that resolves to a non-preloaded entry adds one reference.
    /// Returns `None` when the load fails; the failure is not cached.
    pub fn get(
        &mut self,
        name: &str,
        params: Option<&dyn ContentParam>,
        preload: bool,
    ) -> Option<Rc<T>> {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("content_get", content_type = T::TYPE_NAME, name).entered();

        let key = self.canonical_key(name, params);

        let key = match self.loader.find_content(&self.store, &key, params) {
            Some(found) => {
                self.stats.hits += 1;
                if preload {
                    self.stats.redundant_preloads += 1;
                    if self.warn_on_redundant_preload {
                        self.logger.warn(
                            LOG_CATEGORY,
                            &format!(
                                "{} '{found}' is already loaded; preload request ignored",
                                T::TYPE_NAME
                            ),
                        );
                    }
                }
                found
            }
            None => {
                self.stats.misses += 1;
                let content = match self.loader.load_content(&key, params) {
                    Ok(content) => content,
                    Err(err) => {
                        self.stats.failed_loads += 1;
                        self.logger.error(
                            LOG_CATEGORY,
                            &format!("Failed to load {} '{key}': {err}", T::TYPE_NAME),
                        );
                        return None;
                    }
                };

                content.content_state().mark_loaded_by_loader(!preload);
                self.logger.info(
                    LOG_CATEGORY,
                    &format!(
                        "Loaded {} '{key}'{}",
                        T::TYPE_NAME,
                        if preload { " (preloaded)" } else { "" }
                    ),
                );
                self.store.insert(
                    key.clone(),
                    ContentContainer {
                        content: Rc::new(content),
                        is_preloaded: preload,
                    },
                );
                key
            }
        };

        let container = self.store.get(&key)?;
        if !container.is_preloaded {
            container.content.content_state().reference();
        }
        Some(Rc::clone(&container.content))
    }

    /// Release content by identity. Unknown content is ignored.
    pub fn free(&mut self, content: &Rc<T>, preload: bool) {
        if let Some(key) = self.key_of(content) {
            self.free_entry(&key, false, preload);
        }
    }

    /// Release content by name. Unknown names are ignored.
    pub fn free_by_name(&mut self, name: &str, params: Option<&dyn ContentParam>, preload: bool) {
        let key = self.canonical_key(name, params);
        if let Some(found) = self.loader.find_content(&self.store, &key, params) {
            self.free_entry(&found, false, preload);
        }
    }

    fn free_entry(&mut self, key: &str, force: bool, preload: bool) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("content_free", content_type = T::TYPE_NAME, key, force)
            .entered();

        let Some(container) = self.store.get(key) else {
            return;
        };
        let was_preloaded = container.is_preloaded;
        let state = container.content.content_state();

        if !was_preloaded {
            state.release_reference();
        }

        // Preloaded content survives ordinary frees.
        if was_preloaded && !preload && !force {
            return;
        }

        let mut drained = 0;
        if state.is_referenced() {
            if !force {
                return;
            }
            drained = state.force_reset_references();
        }

        let Some(container) = self.store.remove(key) else {
            return;
        };
        self.loader.free_content(container.content);

        let kind = if was_preloaded { "preloaded " } else { "" };
        if force {
            self.stats.forced_frees += 1;
            self.logger.info(
                LOG_CATEGORY,
                &format!(
                    "Force freed {kind}{} '{key}' ({drained} outstanding references dropped)",
                    T::TYPE_NAME
                ),
            );
        } else {
            self.stats.frees += 1;
            self.logger.info(
                LOG_CATEGORY,
                &format!("Freed {kind}{} '{key}'", T::TYPE_NAME),
            );
        }
    }

    /// Force-free every remaining entry, reporting each as a leak
    pub fn remove_all_content(&mut self) {
        #[cfg(feature = "profiling")]
        let _span =
            tracing::info_span!("content_remove_all", content_type = T::TYPE_NAME).entered();

        while let Some(key) = self.store.keys().min().cloned() {
            if let Some(container) = self.store.get(&key) {
                self.stats.leaks += 1;
                self.logger.warn(
                    LOG_CATEGORY,
                    &format!(
                        "Leaked {} '{key}' was never freed (references: {}, preloaded: {})",
                        T::TYPE_NAME,
                        container.content.content_state().reference_count(),
                        container.is_preloaded
                    ),
                );
            }
            self.free_entry(&key, true, false);
        }
    }

    /// Cache key of a live instance, or an empty string
    pub fn get_name_of(&self, content: &Rc<T>) -> String {
        self.key_of(content).unwrap_or_default()
    }

    fn key_of(&self, content: &Rc<T>) -> Option<String> {
        self.store
            .iter()
            .find(|(_, container)| Rc::ptr_eq(&container.content, content))
            .map(|(key, _)| key.clone())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Cache keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.store.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_preloaded(&self, key: &str) -> Option<bool> {
        self.store.get(key).map(|c| c.is_preloaded)
    }

    pub fn reference_count(&self, key: &str) -> Option<u32> {
        self.store
            .get(key)
            .map(|c| c.content.content_state().reference_count())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentContainer<T>)> {
        self.store.iter().map(|(key, c)| (key.as_str(), c))
    }

    pub fn stats(&self) -> &ContentStats {
        &self.stats
    }
}

impl<T: Content> ContentLoaderBase for ContentLoaderMapStore<T> {
    fn type_name(&self) -> &'static str {
        self.loader.type_name()
    }

    fn content_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn on_load_game(&mut self) {
        self.loader.on_load_game(&self.store);
    }

    fn on_lost_context(&mut self) {
        self.loader.on_lost_context(&self.store);
    }

    fn on_new_context(&mut self) {
        self.loader.on_new_context(&self.store);
    }

    fn remove_all_content(&mut self) {
        ContentLoaderMapStore::remove_all_content(self);
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn stats(&self) -> ContentStats {
        self.stats.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
