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

//! Error types

use std::fmt;

/// Content error type
#[derive(Debug, Clone)]
pub enum ContentError {
    /// IO error (file operations, etc.)
    Io(String),

    /// Path did not resolve to a readable file
    NotFound(String),

    /// Source bytes could not be decoded into content
    Decode(String),

    /// Content parameter missing or of the wrong type
    InvalidParam(String),

    /// Graphics backend rejected an operation
    Gpu(String),

    /// No graphics context is currently available
    ContextUnavailable,

    /// A loader for this content type is already registered
    LoaderAlreadyRegistered(&'static str),

    /// No loader registered for this content type
    LoaderNotRegistered(String),

    /// Managed graphics resource registered twice
    ResourceAlreadyRegistered(u64),

    /// Configuration could not be read or parsed
    Config(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io(msg) => write!(f, "IO error: {msg}"),
            ContentError::NotFound(path) => write!(f, "Content not found: {path}"),
            ContentError::Decode(msg) => write!(f, "Decode error: {msg}"),
            ContentError::InvalidParam(msg) => write!(f, "Invalid content param: {msg}"),
            ContentError::Gpu(msg) => write!(f, "GPU error: {msg}"),
            ContentError::ContextUnavailable => write!(f, "No graphics context available"),
            ContentError::LoaderAlreadyRegistered(type_name) => {
                write!(f, "Loader already registered for content type {type_name}")
            }
            ContentError::LoaderNotRegistered(type_name) => {
                write!(f, "No loader registered for content type {type_name}")
            }
            ContentError::ResourceAlreadyRegistered(id) => {
                write!(f, "Managed resource {id} is already registered")
            }
            ContentError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ContentError {
    fn from(err: image::ImageError) -> Self {
        ContentError::Decode(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContentError>;
