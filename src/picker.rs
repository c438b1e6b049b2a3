//! OneDrive file-picker results.
//!
//! The picker hands back loosely-shaped JSON. This module checks it once, at
//! the boundary, and turns each selected file into a [`PickedFile`].
//!
//! ```json
//! {
//!   "value": [
//!     {
//!       "name": "IMG_0412.jpg",
//!       "@microsoft.graph.downloadUrl": "https://...",
//!       "thumbnails": [{ "large": { "url": "https://..." } }]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("picker response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("picked file #{index} has no {field}")]
    MissingField { index: usize, field: &'static str },
}

/// One file chosen in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    /// Direct download link; this is what gets stored.
    pub url: String,
    /// Large thumbnail if the picker sent one, else `url`.
    pub thumbnail_url: String,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    value: Vec<RawFile>,
}

#[derive(Deserialize)]
struct RawFile {
    name: Option<String>,
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    download_url: Option<String>,
    #[serde(default)]
    thumbnails: Vec<RawThumbnailSet>,
}

#[derive(Deserialize)]
struct RawThumbnailSet {
    large: Option<RawThumbnail>,
}

#[derive(Deserialize)]
struct RawThumbnail {
    url: Option<String>,
}

/// Validate a picker response. Any file missing a name or download link
/// rejects the whole response.
pub fn parse_picker_response(json: &str) -> Result<Vec<PickedFile>, PickerError> {
    let raw: RawResponse = serde_json::from_str(json)?;
    raw.value
        .into_iter()
        .enumerate()
        .map(|(index, file)| {
            let name = non_empty(file.name).ok_or(PickerError::MissingField {
                index,
                field: "name",
            })?;
            let url = non_empty(file.download_url).ok_or(PickerError::MissingField {
                index,
                field: "download URL",
            })?;
            let thumbnail_url = file
                .thumbnails
                .into_iter()
                .next()
                .and_then(|set| set.large)
                .and_then(|thumb| non_empty(thumb.url))
                .unwrap_or_else(|| url.clone());
            Ok(PickedFile {
                name,
                url,
                thumbnail_url,
            })
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
