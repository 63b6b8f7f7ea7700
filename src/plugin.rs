use crate::app::App;
use crate::loaders::{BlobLoader, SpriteFontLoader, TextLoader, TextureLoader};

/// Plugin trait for modular application architecture
pub trait Plugin {
    fn plugin_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Build the plugin into the app
    fn build(&self, app: &mut App);
}

/// Registers the built-in loaders: textures, sprite fonts, text and blobs
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultContentPlugin;

impl Plugin for DefaultContentPlugin {
    fn plugin_name(&self) -> &'static str {
        "DefaultContentPlugin"
    }

    fn build(&self, app: &mut App) {
        let fs = app.file_system();
        let device = app.device();
        let content = app.content_mut();
        content.add_loader(TextureLoader::new(fs.clone(), device.clone()));
        content.add_loader(SpriteFontLoader::new(fs.clone(), device));
        content.add_loader(TextLoader::new(fs.clone()));
        content.add_loader(BlobLoader::new(fs));
    }
}
