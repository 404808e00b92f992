//! `multipart/form-data` bodies for photo uploads.
//!
//! # Design
//! The body is encoded with ureq's multipart `Form` and read into memory so
//! the resulting `HttpRequest` stays plain data. The photo file is opened,
//! read and closed inside `PhotoFile::load`; no handle outlives the builder
//! call, whatever the outcome of the request.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use ureq::unversioned::multipart::{Form, Part};

use crate::error::{ApiError, Result};

/// Form field carrying the photo in both upload endpoints.
pub const PHOTO_FIELD: &str = "pet_photo";

/// Photo content read from disk, ready to be attached as a file part.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub file_name: String,
    /// Guessed from the extension; `application/octet-stream` when unknown.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PhotoFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = {
            let mut file = File::open(path).map_err(|source| photo_err(path, source))?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|source| photo_err(path, source))?;
            data
        };
        debug!(path = %path.display(), bytes = data.len(), "loaded pet photo");

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| PHOTO_FIELD.to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }
}

/// An encoded body together with its `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Encode `fields` as text parts followed by the photo at `photo_path`.
pub fn encode_with_photo(fields: &[(&str, &str)], photo_path: &Path) -> Result<MultipartBody> {
    let photo = PhotoFile::load(photo_path)?;
    let part = Part::bytes(&photo.data)
        .file_name(&photo.file_name)
        .mime_str(&photo.content_type)?;

    let mut form = fields
        .iter()
        .fold(Form::new(), |form, &(name, value)| form.text(name, value))
        .part(PHOTO_FIELD, part);
    let content_type = format!("multipart/form-data; boundary={}", form.boundary());

    let mut data = Vec::new();
    form.read_to_end(&mut data)
        .map_err(|source| photo_err(photo_path, source))?;

    Ok(MultipartBody { content_type, data })
}

fn photo_err(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Photo {
        path: PathBuf::from(path),
        source,
    }
}
