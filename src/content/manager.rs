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

use crate::config::ContentConfig;
use crate::content::{
    Content, ContentLoader, ContentLoaderBase, ContentLoaderMapStore, ContentParam, ContentStats,
};
use crate::error::{ContentError, Result};
use crate::graphics::ContextListener;
use crate::logging::ContentLogger;
use ahash::AHashMap;
use std::any::TypeId;
use std::rc::Rc;

const LOG_CATEGORY: &str = "ContentManager";

/// Typed entry point to every registered content loader.
///
/// Every content type must have its loader registered before first use;
/// asking for an unregistered type panics.
pub struct ContentManager {
    loaders: Vec<Box<dyn ContentLoaderBase>>,
    by_type: AHashMap<TypeId, usize>,
    by_name: AHashMap<&'static str, usize>,
    config: ContentConfig,
    logger: Rc<dyn ContentLogger>,
}

impl ContentManager {
    pub fn new(logger: Rc<dyn ContentLogger>) -> Self {
        Self::with_config(ContentConfig::default(), logger)
    }

    /// Manager whose config supplies default paths to stores registered later
    pub fn with_config(config: ContentConfig, logger: Rc<dyn ContentLogger>) -> Self {
        Self {
            loaders: Vec::new(),
            by_type: AHashMap::new(),
            by_name: AHashMap::new(),
            config,
            logger,
        }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    pub fn logger(&self) -> Rc<dyn ContentLogger> {
        Rc::clone(&self.logger)
    }

    /// Wrap a loader in a cache store sharing this manager's logger and register it
    pub fn add_loader<L: ContentLoader>(&mut self, loader: L) {
        let store = ContentLoaderMapStore::new(loader, Rc::clone(&self.logger));
        self.register_loader(store);
    }

    /// Register a store.
    ///
    /// # Panics
    /// If a loader for the same content type is already registered.
    pub fn register_loader<T: Content>(&mut self, store: ContentLoaderMapStore<T>) {
        if let Err(err) = self.try_register_loader(store) {
            panic!("{err}");
        }
    }

    pub fn try_register_loader<T: Content>(
        &mut self,
        mut store: ContentLoaderMapStore<T>,
    ) -> Result<()> {
        let type_name = ContentLoaderBase::type_name(&store);
        if self.by_type.contains_key(&TypeId::of::<T>()) || self.by_name.contains_key(type_name) {
            return Err(ContentError::LoaderAlreadyRegistered(type_name));
        }

        if store.default_path().is_empty() {
            if let Some(path) = self.config.default_path_for(type_name) {
                store.set_default_path(path);
            }
        }
        if !self.config.warn_on_redundant_preload {
            store.set_warn_on_redundant_preload(false);
        }

        let index = self.loaders.len();
        self.loaders.push(Box::new(store));
        self.by_type.insert(TypeId::of::<T>(), index);
        self.by_name.insert(type_name, index);
        self.logger.info(
            LOG_CATEGORY,
            &format!("Registered loader for {type_name}"),
        );
        Ok(())
    }

    /// # Panics
    /// If no loader is registered under `type_name`.
    pub fn loader_for(&self, type_name: &str) -> &dyn ContentLoaderBase {
        match self.try_loader_for(type_name) {
            Ok(loader) => loader,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_loader_for(&self, type_name: &str) -> Result<&dyn ContentLoaderBase> {
        self.by_name
            .get(type_name)
            .map(|&index| self.loaders[index].as_ref())
            .ok_or_else(|| ContentError::LoaderNotRegistered(type_name.to_string()))
    }

    /// # Panics
    /// If no loader is registered for `T`.
    pub fn loader<T: Content>(&self) -> &ContentLoaderMapStore<T> {
        let index = self.index_of::<T>();
        self.loaders[index]
            .as_any()
            .downcast_ref::<ContentLoaderMapStore<T>>()
            .unwrap_or_else(|| panic!("Loader registered for {} has the wrong type", T::TYPE_NAME))
    }

    /// # Panics
    /// If no loader is registered for `T`.
    pub fn loader_mut<T: Content>(&mut self) -> &mut ContentLoaderMapStore<T> {
        let index = self.index_of::<T>();
        self.loaders[index]
            .as_any_mut()
            .downcast_mut::<ContentLoaderMapStore<T>>()
            .unwrap_or_else(|| panic!("Loader registered for {} has the wrong type", T::TYPE_NAME))
    }

    fn index_of<T: Content>(&self) -> usize {
        match self.by_type.get(&TypeId::of::<T>()) {
            Some(&index) => index,
            None => panic!("{}", ContentError::LoaderNotRegistered(T::TYPE_NAME.to_string())),
        }
    }

    pub fn has_loader<T: Content>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Registered type names in registration order
    pub fn type_names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.type_name()).collect()
    }

    pub fn stats_for(&self, type_name: &str) -> Option<ContentStats> {
        self.try_loader_for(type_name).ok().map(|l| l.stats())
    }

    /// Get shared content, adding one reference
    pub fn get<T: Content>(
        &mut self,
        name: &str,
        params: Option<&dyn ContentParam>,
    ) -> Option<Rc<T>> {
        self.loader_mut::<T>().get(name, params, false)
    }

    /// Preload content; it stays cached until [`unload`](Self::unload)
    pub fn load<T: Content>(
        &mut self,
        name: &str,
        params: Option<&dyn ContentParam>,
    ) -> Option<Rc<T>> {
        self.loader_mut::<T>().get(name, params, true)
    }

    pub fn free<T: Content>(&mut self, content: &Rc<T>) {
        self.loader_mut::<T>().free(content, false);
    }

    pub fn free_by_name<T: Content>(&mut self, name: &str, params: Option<&dyn ContentParam>) {
        self.loader_mut::<T>().free_by_name(name, params, false);
    }

    pub fn unload<T: Content>(&mut self, content: &Rc<T>) {
        self.loader_mut::<T>().free(content, true);
    }

    pub fn unload_by_name<T: Content>(&mut self, name: &str, params: Option<&dyn ContentParam>) {
        self.loader_mut::<T>().free_by_name(name, params, true);
    }

    /// Cache key of a live instance, or an empty string
    pub fn get_name_of<T: Content>(&self, content: &Rc<T>) -> String {
        self.loader::<T>().get_name_of(content)
    }

    pub fn on_load_game(&mut self) {
        for loader in &mut self.loaders {
            loader.on_load_game();
        }
    }

    pub fn on_lost_context(&mut self) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("content_lost_context").entered();

        for loader in &mut self.loaders {
            loader.on_lost_context();
        }
    }

    pub fn on_new_context(&mut self) {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("content_new_context").entered();

        for loader in &mut self.loaders {
            loader.on_new_context();
        }
    }
}

impl ContextListener for ContentManager {
    fn on_lost_context(&mut self) {
        ContentManager::on_lost_context(self);
    }

    fn on_new_context(&mut self) {
        ContentManager::on_new_context(self);
    }
}

impl Drop for ContentManager {
    fn drop(&mut self) {
        for loader in &mut self.loaders {
            loader.remove_all_content();
        }
        self.logger
            .info(LOG_CATEGORY, "All content loaders shut down");
    }
}
