//! The asset-store capability the converter uploads embedded images to.
//!
//! The converter only ever asks for "store these bytes, give me a URL". Any
//! error coming back is logged by the caller and the image is dropped.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload timed out")]
    TimedOut,

    #[error("upload cancelled")]
    Cancelled,
}

/// A binary part pulled out of the package, ready to be uploaded.
#[derive(Debug, Clone, Copy)]
pub struct Asset<'a> {
    /// File name of the part inside the package, e.g. `image1.png`.
    pub name: &'a str,
    pub media_type: &'a str,
    pub data: &'a [u8],
}

pub trait AssetStore {
    /// Store `asset` and return a stable URL for it.
    fn upload(&self, asset: &Asset<'_>) -> Result<String, UploadError>;
}

impl<F> AssetStore for F
where
    F: Fn(&Asset<'_>) -> Result<String, UploadError>,
{
    fn upload(&self, asset: &Asset<'_>) -> Result<String, UploadError> {
        self(asset)
    }
}

/// Writes every asset into a local directory.
///
/// The returned URL is `base_url` joined with the stored file name, or a
/// `file://` URL of the written path when no base URL is configured.
pub struct DirectoryStore {
    root: PathBuf,
    base_url: Option<String>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Pick a file name that does not clobber an earlier upload with the
    /// same part name (two documents converted into one directory).
    fn unique_name(&self, name: &str) -> String {
        let name = sanitize_file_name(name);
        if !self.root.join(&name).exists() {
            return name;
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((s, e)) => (s.to_string(), format!(".{e}")),
            None => (name.clone(), String::new()),
        };
        (1u32..)
            .map(|i| format!("{stem}-{i}{ext}"))
            .find(|candidate| !self.root.join(candidate).exists())
            .unwrap_or(name)
    }
}

impl AssetStore for DirectoryStore {
    fn upload(&self, asset: &Asset<'_>) -> Result<String, UploadError> {
        std::fs::create_dir_all(&self.root)?;
        let file_name = self.unique_name(asset.name);
        let path = self.root.join(&file_name);
        std::fs::write(&path, asset.data)?;
        log::debug!(
            "Stored asset {} ({}, {} bytes) at {}",
            asset.name,
            asset.media_type,
            asset.data.len(),
            path.display()
        );
        Ok(match &self.base_url {
            Some(base) => format!("{base}/{file_name}"),
            None => {
                let abs = std::fs::canonicalize(&path).unwrap_or(path);
                format!("file://{}", abs.display())
            }
        })
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "asset".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Media type from magic bytes, falling back to the file extension.
pub fn sniff_media_type(data: &[u8], name: &str) -> &'static str {
    if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
        return "image/jpeg";
    }
    if data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
    {
        return "image/png";
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if data.starts_with(b"BM") {
        return "image/bmp";
    }

    let ext = name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        _ => "application/octet-stream",
    }
}
