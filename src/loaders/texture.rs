use crate::content::{ContentLoader, ContentParam, ContentStore};
use crate::error::{ContentError, Result};
use crate::graphics::{GraphicsDevice, Texture, TextureDescriptor, TextureFormat};
use crate::vfs::FileSystem;
use glam::UVec2;
use std::rc::Rc;

/// Decoded pixels ready for upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub size: UVec2,
    pub format: TextureFormat,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn descriptor(&self) -> TextureDescriptor {
        TextureDescriptor {
            size: self.size,
            format: self.format,
        }
    }
}

/// Turns encoded image bytes into pixels
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage>;
}

/// PNG decoder; output is always RGBA8
#[derive(Clone, Copy, Debug, Default)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            size: UVec2::new(width, height),
            format: TextureFormat::Rgba8,
            pixels: image.into_raw(),
        })
    }
}

/// Loads textures from image files.
///
/// Pixels are not kept after upload. When a new context arrives every cached
/// texture is rebuilt by reading and decoding its cache key again.
pub struct TextureLoader {
    fs: Rc<dyn FileSystem>,
    device: Rc<GraphicsDevice>,
    decoder: Box<dyn ImageDecoder>,
}

impl TextureLoader {
    pub fn new(fs: Rc<dyn FileSystem>, device: Rc<GraphicsDevice>) -> Self {
        Self::with_decoder(fs, device, PngDecoder)
    }

    pub fn with_decoder(
        fs: Rc<dyn FileSystem>,
        device: Rc<GraphicsDevice>,
        decoder: impl ImageDecoder + 'static,
    ) -> Self {
        Self {
            fs,
            device,
            decoder: Box::new(decoder),
        }
    }

    fn decode(&self, key: &str) -> Result<DecodedImage> {
        let bytes = self.fs.read(key)?;
        self.decoder
            .decode(&bytes)
            .map_err(|err| ContentError::Decode(format!("{key}: {err}")))
    }

    fn rebuild(&self, key: &str, texture: &Texture) -> Result<()> {
        let image = self.decode(key)?;
        if image.descriptor() != *texture.descriptor() {
            return Err(ContentError::Decode(format!(
                "{key} changed from {}x{} to {}x{} while the context was lost",
                texture.width(),
                texture.height(),
                image.size.x,
                image.size.y
            )));
        }
        texture.recreate(Some(&image.pixels))
    }
}

impl ContentLoader for TextureLoader {
    type Content = Texture;

    fn load_content(&mut self, key: &str, _params: Option<&dyn ContentParam>) -> Result<Texture> {
        let image = self.decode(key)?;
        Texture::new(&self.device, image.descriptor(), Some(&image.pixels))
    }

    fn free_content(&mut self, content: Rc<Texture>) {
        content.release();
    }

    fn on_lost_context(&mut self, store: &ContentStore<Texture>) {
        for container in store.values() {
            container.content().invalidate();
        }
    }

    fn on_new_context(&mut self, store: &ContentStore<Texture>) {
        let mut rebuilt = 0;
        for (key, container) in store.iter() {
            match self.rebuild(key, container.content()) {
                Ok(()) => rebuilt += 1,
                Err(err) => tracing::error!("Failed to rebuild texture '{key}': {err}"),
            }
        }
        tracing::debug!(rebuilt, total = store.len(), "Textures rebuilt for new context");
    }
}
