#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Cursor, Write};

use docx_sections::{Asset, AssetStore, UploadError};
use zip::write::SimpleFileOptions;

pub const NS: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" "#,
    r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006""#,
);

pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0, 0,
    1, 0, 0, 0, 1, 8, 6, 0, 0, 0,
];

pub fn document_xml(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:document {NS}><w:body>{body}</w:body></w:document>"#)
}

pub fn styles_xml(styles: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:styles {NS}>{styles}</w:styles>"#)
}

pub fn numbering_xml(numbering: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:numbering {NS}>{numbering}</w:numbering>"#)
}

pub fn rels_xml(rels: &[(&str, &str)]) -> String {
    let entries: String = rels
        .iter()
        .map(|(id, target)| {
            format!(
                r#"<Relationship Id="{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{target}"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
    )
}

pub fn para(style: Option<&str>, text: &str) -> String {
    let ppr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p>{ppr}<w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

/// An inline `w:drawing` whose picture embeds `rel_id`.
pub fn drawing(rel_id: &str) -> String {
    format!(
        r#"<w:drawing><wp:inline><wp:extent cx="952500" cy="476250"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{rel_id}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
    )
}

/// A paragraph holding one inline picture that embeds `rel_id`.
pub fn image_para(rel_id: &str) -> String {
    format!("<w:p><w:r>{}</w:r></w:p>", drawing(rel_id))
}

/// In-memory DOCX package.
pub struct DocxBuilder {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    /// Package with empty styles and numbering parts.
    pub fn new(body: &str) -> Self {
        Self {
            parts: vec![
                ("word/document.xml".into(), document_xml(body).into_bytes()),
                ("word/styles.xml".into(), styles_xml("").into_bytes()),
                ("word/numbering.xml".into(), numbering_xml("").into_bytes()),
            ],
        }
    }

    pub fn part(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.parts.retain(|(n, _)| n != name);
        self.parts.push((name.to_string(), data.into()));
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.parts.retain(|(n, _)| n != name);
        self
    }

    pub fn styles(self, styles: &str) -> Self {
        self.part("word/styles.xml", styles_xml(styles))
    }

    pub fn numbering(self, numbering: &str) -> Self {
        self.part("word/numbering.xml", numbering_xml(numbering))
    }

    pub fn rels(self, rels: &[(&str, &str)]) -> Self {
        self.part("word/_rels/document.xml.rels", rels_xml(rels))
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options).expect("start zip entry");
            zip.write_all(data).expect("write zip entry");
        }
        zip.finish().expect("finish zip").into_inner()
    }
}

/// Records every upload and answers with `https://assets.test/<name>`.
/// Names listed in `fail` are rejected.
#[derive(Default)]
pub struct RecordingStore {
    pub uploads: RefCell<Vec<(String, String, usize)>>,
    pub fail: Vec<String>,
}

impl RecordingStore {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            uploads: RefCell::new(Vec::new()),
            fail: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.uploads.borrow().len()
    }
}

impl AssetStore for RecordingStore {
    fn upload(&self, asset: &Asset<'_>) -> Result<String, UploadError> {
        self.uploads.borrow_mut().push((
            asset.name.to_string(),
            asset.media_type.to_string(),
            asset.data.len(),
        ));
        if self.fail.iter().any(|f| f == asset.name) {
            return Err(UploadError::Rejected(format!("{} refused", asset.name)));
        }
        Ok(format!("https://assets.test/{}", asset.name))
    }
}
