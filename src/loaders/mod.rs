// Built-in content loaders

pub mod blob;
pub mod sprite_font;
pub mod text;
pub mod texture;

pub use blob::{BlobContent, BlobLoader};
pub use sprite_font::{
    FixedCellRasterizer, GlyphAtlas, GlyphRasterizer, GlyphRect, SpriteFont, SpriteFontLoader,
    SpriteFontParam,
};
pub use text::{TextContent, TextLoader};
pub use texture::{DecodedImage, ImageDecoder, PngDecoder, TextureLoader};
