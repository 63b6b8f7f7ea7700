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

//! Archetype Content - reference-counted content cache
//!
//! Named content (textures, fonts, text, binary blobs) is loaded once per
//! canonical key and shared until every holder frees it. GPU-backed objects
//! survive platform context loss by rebuilding themselves when a new context
//! arrives.

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod graphics;
pub mod loaders;
pub mod logging;
pub mod plugin;
pub mod prelude;
pub mod vfs;

pub use app::*;
pub use config::*;
pub use content::*;
pub use error::*;
pub use graphics::*;
pub use loaders::{
    BlobContent, BlobLoader, DecodedImage, FixedCellRasterizer, GlyphAtlas, GlyphRasterizer,
    GlyphRect, ImageDecoder, PngDecoder, SpriteFont, SpriteFontLoader, SpriteFontParam,
    TextContent, TextLoader, TextureLoader,
};
pub use logging::*;
pub use plugin::*;
pub use vfs::*;
