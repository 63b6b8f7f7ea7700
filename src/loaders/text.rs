use crate::content::{Content, ContentLoader, ContentParam, ContentState};
use crate::error::Result;
use crate::vfs::FileSystem;
use std::rc::Rc;

/// UTF-8 text file
#[derive(Debug)]
pub struct TextContent {
    state: ContentState,
    text: String,
}

impl TextContent {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Content for TextContent {
    const TYPE_NAME: &'static str = "Text";

    fn content_state(&self) -> &ContentState {
        &self.state
    }
}

pub struct TextLoader {
    fs: Rc<dyn FileSystem>,
}

impl TextLoader {
    pub fn new(fs: Rc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ContentLoader for TextLoader {
    type Content = TextContent;

    fn load_content(&mut self, key: &str, _params: Option<&dyn ContentParam>) -> Result<TextContent> {
        Ok(TextContent {
            state: ContentState::new(),
            text: self.fs.read_to_string(key)?,
        })
    }
}
