use crate::error::{ContentError, Result};
use std::any::Any;
use std::fmt::Debug;

/// Per-type key extension passed alongside a content name (e.g. a font size).
///
/// Loaders that accept parameters encode them into the cache key in
/// `ContentLoader::process_filename`.
pub trait ContentParam: Any + Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn ContentParam + 'a {
    pub fn downcast_ref<P: ContentParam>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }
}

/// Resolve a required param of a concrete type
pub fn require_param<'a, P: ContentParam>(params: Option<&'a dyn ContentParam>) -> Result<&'a P> {
    let param = params.ok_or_else(|| {
        ContentError::InvalidParam(format!("missing {}", std::any::type_name::<P>()))
    })?;
    param.as_any().downcast_ref::<P>().ok_or_else(|| {
        ContentError::InvalidParam(format!(
            "expected {}, got {param:?}",
            std::any::type_name::<P>()
        ))
    })
}
