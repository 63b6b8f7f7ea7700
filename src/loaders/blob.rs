use crate::content::{Content, ContentLoader, ContentParam, ContentState};
use crate::error::Result;
use crate::vfs::FileSystem;
use std::rc::Rc;

/// Raw file bytes (generic binary data)
#[derive(Debug)]
pub struct BlobContent {
    state: ContentState,
    bytes: Vec<u8>,
}

impl BlobContent {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Content for BlobContent {
    const TYPE_NAME: &'static str = "Blob";

    fn content_state(&self) -> &ContentState {
        &self.state
    }
}

pub struct BlobLoader {
    fs: Rc<dyn FileSystem>,
}

impl BlobLoader {
    pub fn new(fs: Rc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ContentLoader for BlobLoader {
    type Content = BlobContent;

    fn load_content(&mut self, key: &str, _params: Option<&dyn ContentParam>) -> Result<BlobContent> {
        Ok(BlobContent {
            state: ContentState::new(),
            bytes: self.fs.read(key)?,
        })
    }
}
