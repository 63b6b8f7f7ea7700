//! Bitmap fonts rasterized into a glyph atlas
//!
//! The same font file loaded at two pixel sizes is two cache entries; the
//! size is folded into the key as `"<path>:<pixel_size>"`.

use crate::content::{require_param, Content, ContentLoader, ContentParam, ContentState, ContentStore};
use crate::error::{ContentError, Result};
use crate::graphics::{GraphicsDevice, Texture, TextureDescriptor, TextureFormat};
use crate::vfs::FileSystem;
use ahash::AHashMap;
use glam::UVec2;
use std::any::Any;
use std::rc::Rc;

/// Pixel size a font is rasterized at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteFontParam {
    pub pixel_size: u32,
}

impl SpriteFontParam {
    pub fn new(pixel_size: u32) -> Self {
        Self { pixel_size }
    }
}

impl ContentParam for SpriteFontParam {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Glyph location inside the atlas, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphRect {
    pub origin: UVec2,
    pub size: UVec2,
}

/// Rasterized atlas pixels plus glyph layout
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    pub descriptor: TextureDescriptor,
    pub pixels: Vec<u8>,
    pub glyphs: AHashMap<char, GlyphRect>,
    pub line_height: u32,
}

/// Turns font source bytes into an atlas
pub trait GlyphRasterizer {
    fn rasterize(&self, source: &[u8], pixel_size: u32) -> Result<GlyphAtlas>;
}

/// Printable ASCII laid out in uniform square cells, 16 per row.
///
/// Cell coverage is derived from the source bytes so distinct sources give
/// distinct atlases; the space glyph is left blank.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedCellRasterizer;

impl FixedCellRasterizer {
    pub const COLUMNS: u32 = 16;
    pub const FIRST: char = ' ';
    pub const LAST: char = '~';
    /// Largest atlas edge, in pixels
    pub const MAX_ATLAS_SIZE: u32 = 8192;

    fn glyph_count() -> u32 {
        Self::LAST as u32 - Self::FIRST as u32 + 1
    }

    fn rows() -> u32 {
        Self::glyph_count().div_ceil(Self::COLUMNS)
    }
}

impl GlyphRasterizer for FixedCellRasterizer {
    fn rasterize(&self, source: &[u8], pixel_size: u32) -> Result<GlyphAtlas> {
        if source.is_empty() {
            return Err(ContentError::Decode("Font source is empty".to_string()));
        }
        if pixel_size == 0 {
            return Err(ContentError::InvalidParam(
                "Font pixel size must be non-zero".to_string(),
            ));
        }

        let edge = |cells: u32| {
            cells
                .checked_mul(pixel_size)
                .filter(|&len| len <= Self::MAX_ATLAS_SIZE)
                .ok_or_else(|| {
                    ContentError::InvalidParam(format!(
                        "Font pixel size {pixel_size} exceeds the {} pixel atlas limit",
                        Self::MAX_ATLAS_SIZE
                    ))
                })
        };
        let descriptor =
            TextureDescriptor::new(edge(Self::COLUMNS)?, edge(Self::rows())?, TextureFormat::Alpha8);
        let stride = descriptor.size.x as usize;
        let mut pixels = vec![0u8; descriptor.byte_len()];
        let mut glyphs = AHashMap::with_capacity(Self::glyph_count() as usize);

        for (index, ch) in (Self::FIRST..=Self::LAST).enumerate() {
            let cell = index as u32;
            let origin = UVec2::new(cell % Self::COLUMNS, cell / Self::COLUMNS) * pixel_size;
            glyphs.insert(
                ch,
                GlyphRect {
                    origin,
                    size: UVec2::splat(pixel_size),
                },
            );
            if ch == ' ' {
                continue;
            }

            for y in 0..pixel_size {
                for x in 0..pixel_size {
                    let seed = index * 31 + (y * pixel_size + x) as usize;
                    let row = (origin.y + y) as usize;
                    let column = (origin.x + x) as usize;
                    pixels[row * stride + column] = source[seed % source.len()];
                }
            }
        }

        Ok(GlyphAtlas {
            descriptor,
            pixels,
            glyphs,
            line_height: pixel_size,
        })
    }
}

/// Font rasterized at one pixel size
#[derive(Debug)]
pub struct SpriteFont {
    state: ContentState,
    pixel_size: u32,
    source: Vec<u8>,
    glyphs: AHashMap<char, GlyphRect>,
    line_height: u32,
    atlas: Texture,
}

impl SpriteFont {
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphRect> {
        self.glyphs.get(&ch)
    }

    pub fn atlas(&self) -> &Texture {
        &self.atlas
    }

    /// Size of `text` when drawn; characters without a glyph take no space
    pub fn measure(&self, text: &str) -> UVec2 {
        let mut width = 0;
        let mut lines = 0;
        for line in text.lines() {
            lines += 1;
            let line_width: u32 = line
                .chars()
                .filter_map(|ch| self.glyphs.get(&ch))
                .map(|glyph| glyph.size.x)
                .sum();
            width = width.max(line_width);
        }
        UVec2::new(width, lines * self.line_height)
    }

    fn rebuild(&self, rasterizer: &dyn GlyphRasterizer) -> Result<()> {
        let atlas = rasterizer.rasterize(&self.source, self.pixel_size)?;
        if atlas.descriptor != *self.atlas.descriptor() {
            return Err(ContentError::Decode(
                "Rasterizer produced a different atlas layout".to_string(),
            ));
        }
        self.atlas.recreate(Some(&atlas.pixels))
    }
}

impl Content for SpriteFont {
    const TYPE_NAME: &'static str = "SpriteFont";

    fn content_state(&self) -> &ContentState {
        &self.state
    }
}

/// Loads sprite fonts keyed by path and [`SpriteFontParam`].
///
/// Font sources are kept in memory so atlases can be rebuilt on a new
/// context without touching the file system.
pub struct SpriteFontLoader {
    fs: Rc<dyn FileSystem>,
    device: Rc<GraphicsDevice>,
    rasterizer: Box<dyn GlyphRasterizer>,
}

impl SpriteFontLoader {
    pub fn new(fs: Rc<dyn FileSystem>, device: Rc<GraphicsDevice>) -> Self {
        Self::with_rasterizer(fs, device, FixedCellRasterizer)
    }

    pub fn with_rasterizer(
        fs: Rc<dyn FileSystem>,
        device: Rc<GraphicsDevice>,
        rasterizer: impl GlyphRasterizer + 'static,
    ) -> Self {
        Self {
            fs,
            device,
            rasterizer: Box::new(rasterizer),
        }
    }
}

impl ContentLoader for SpriteFontLoader {
    type Content = SpriteFont;

    fn load_content(
        &mut self,
        key: &str,
        params: Option<&dyn ContentParam>,
    ) -> Result<SpriteFont> {
        let param = require_param::<SpriteFontParam>(params)?;
        if param.pixel_size == 0 {
            return Err(ContentError::InvalidParam(format!(
                "{key}: font pixel size must be non-zero"
            )));
        }

        let suffix = format!(":{}", param.pixel_size);
        let path = key.strip_suffix(suffix.as_str()).unwrap_or(key);
        let source = self.fs.read(path)?;
        let atlas = self.rasterizer.rasterize(&source, param.pixel_size)?;
        let texture = Texture::new(&self.device, atlas.descriptor, Some(&atlas.pixels))?;

        Ok(SpriteFont {
            state: ContentState::new(),
            pixel_size: param.pixel_size,
            source,
            glyphs: atlas.glyphs,
            line_height: atlas.line_height,
            atlas: texture,
        })
    }

    fn free_content(&mut self, content: Rc<SpriteFont>) {
        content.atlas.release();
    }

    fn process_filename(&self, path: String, params: Option<&dyn ContentParam>) -> String {
        match params.and_then(|p| p.downcast_ref::<SpriteFontParam>()) {
            Some(param) => format!("{path}:{}", param.pixel_size),
            None => path,
        }
    }

    fn on_lost_context(&mut self, store: &ContentStore<SpriteFont>) {
        for container in store.values() {
            container.content().atlas.invalidate();
        }
    }

    fn on_new_context(&mut self, store: &ContentStore<SpriteFont>) {
        for (key, container) in store.iter() {
            if let Err(err) = container.content().rebuild(self.rasterizer.as_ref()) {
                tracing::error!("Failed to rebuild font atlas '{key}': {err}");
            }
        }
    }
}
