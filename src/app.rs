use crate::config::ContentConfig;
use crate::content::ContentManager;
use crate::graphics::GraphicsDevice;
use crate::logging::{ContentLogger, TracingLogger};
use crate::plugin::Plugin;
use crate::vfs::{DiskFileSystem, FileSystem};
use std::rc::Rc;

/// Application shell routing platform events to the content subsystem.
///
/// Content is dropped before the device so loaders can still release their
/// GPU objects during teardown.
pub struct App {
    content: ContentManager,
    device: Rc<GraphicsDevice>,
    fs: Rc<dyn FileSystem>,
}

impl App {
    /// Create new application
    pub fn new(
        config: ContentConfig,
        device: Rc<GraphicsDevice>,
        fs: Rc<dyn FileSystem>,
        logger: Rc<dyn ContentLogger>,
    ) -> Self {
        Self {
            content: ContentManager::with_config(config, logger),
            device,
            fs,
        }
    }

    /// Headless device, disk files under `config.asset_root`, tracing logger
    pub fn headless(config: ContentConfig) -> Self {
        let fs = Rc::new(DiskFileSystem::new(config.asset_root.clone()));
        Self::new(config, GraphicsDevice::headless(), fs, Rc::new(TracingLogger))
    }

    /// Add a plugin
    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        tracing::info!(plugin = plugin.plugin_name(), "Registering plugin");
        plugin.build(self);
        self
    }

    pub fn content(&self) -> &ContentManager {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentManager {
        &mut self.content
    }

    pub fn device(&self) -> Rc<GraphicsDevice> {
        Rc::clone(&self.device)
    }

    pub fn file_system(&self) -> Rc<dyn FileSystem> {
        Rc::clone(&self.fs)
    }

    /// Game data is about to be (re)loaded
    pub fn load_game(&mut self) {
        self.content.on_load_game();
    }

    /// Platform is suspending and takes the graphics context with it
    pub fn suspend(&mut self) {
        if !self.device.has_context() {
            tracing::warn!("Suspend without a graphics context; ignored");
            return;
        }
        self.device.lose_context(&mut self.content);
    }

    /// Platform resumed with a fresh graphics context
    pub fn resume(&mut self) {
        if self.device.has_context() {
            tracing::warn!("Resume while the graphics context is live; ignored");
            return;
        }
        self.device.restore_context(&mut self.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::DefaultContentPlugin;
    use crate::vfs::MemoryFileSystem;

    struct TestPlugin;

    impl Plugin for TestPlugin {
        fn build(&self, app: &mut App) {
            let fs = app.file_system();
            app.content_mut().add_loader(crate::loaders::TextLoader::new(fs));
        }
    }

    fn app() -> App {
        App::new(
            ContentConfig::default(),
            GraphicsDevice::headless(),
            Rc::new(MemoryFileSystem::new()),
            Rc::new(TracingLogger),
        )
    }

    #[test]
    fn test_app_creation() {
        let mut app = app();
        app.add_plugin(TestPlugin);
        assert_eq!(app.content().type_names(), vec!["Text"]);
    }

    #[test]
    fn test_default_plugin() {
        let mut app = app();
        app.add_plugin(DefaultContentPlugin);
        assert_eq!(
            app.content().type_names(),
            vec!["Texture", "SpriteFont", "Text", "Blob"]
        );
    }

    #[test]
    fn test_suspend_resume_are_idempotent() {
        let mut app = app();
        let device = app.device();
        let generation = device.context_generation();

        app.resume();
        assert_eq!(device.context_generation(), generation);

        app.suspend();
        app.suspend();
        assert!(!device.has_context());

        app.resume();
        assert!(device.has_context());
        assert_eq!(device.context_generation(), generation + 1);
    }
}
