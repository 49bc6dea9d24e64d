use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::Error;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// A relationship target inside `word/_rels/document.xml.rels`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub target: String,
    pub external: bool,
}

/// Read access to the parts of one DOCX package.
pub struct Package<R: Read + Seek> {
    zip: zip::ZipArchive<R>,
    relationships: Option<HashMap<String, Relationship>>,
}

impl Package<std::fs::File> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        Self::new(file)
    }
}

impl<'a> Package<Cursor<&'a [u8]>> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, Error> {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Package<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        let zip = zip::ZipArchive::new(reader)
            .map_err(|_| Error::InvalidPackage("file is not a ZIP archive".into()))?;
        Ok(Self {
            zip,
            relationships: None,
        })
    }

    /// UTF-8 text of a required part.
    pub fn read_text(&mut self, name: &str) -> Result<String, Error> {
        self.read_optional_text(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))
    }

    pub fn read_optional_text(&mut self, name: &str) -> Option<String> {
        let mut content = String::new();
        self.zip
            .by_name(name)
            .ok()?
            .read_to_string(&mut content)
            .ok()?;
        Some(content)
    }

    pub fn read_bytes(&mut self, name: &str) -> Option<Vec<u8>> {
        let mut entry = self.zip.by_name(name).ok()?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data).ok()?;
        Some(data)
    }

    pub fn document_xml(&mut self) -> Result<String, Error> {
        self.read_text(DOCUMENT_PART)
    }

    pub fn styles_xml(&mut self) -> Result<String, Error> {
        self.read_text(STYLES_PART)
    }

    pub fn numbering_xml(&mut self) -> Result<String, Error> {
        self.read_text(NUMBERING_PART)
    }

    /// Relationship id → target for the document part. Parsed on first use;
    /// a missing or unparsable rels part yields an empty table.
    pub fn relationships(&mut self) -> &HashMap<String, Relationship> {
        if self.relationships.is_none() {
            let rels = self
                .read_optional_text(DOCUMENT_RELS_PART)
                .map(|xml| parse_rels_xml(&xml))
                .unwrap_or_default();
            log::debug!("Loaded {} document relationships", rels.len());
            self.relationships = Some(rels);
        }
        self.relationships.get_or_insert_with(HashMap::new)
    }

    /// Package path of an internal relationship target, `None` for unknown
    /// ids and external targets.
    pub fn relationship_part(&mut self, rel_id: &str) -> Option<String> {
        let rel = self.relationships().get(rel_id)?;
        if rel.external {
            return None;
        }
        Some(resolve_target(&rel.target))
    }
}

/// Targets are relative to `word/` unless they start at the package root.
pub fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(abs) => abs.to_string(),
        None => {
            let mut parts: Vec<&str> = vec!["word"];
            for seg in target.split('/') {
                match seg {
                    "" | "." => {}
                    ".." => {
                        parts.pop();
                    }
                    s => parts.push(s),
                }
            }
            parts.join("/")
        }
    }
}

pub fn parse_rels_xml(xml_content: &str) -> HashMap<String, Relationship> {
    let mut rels = HashMap::new();
    let Ok(xml) = roxmltree::Document::parse(xml_content) else {
        log::warn!("Ignoring unparsable relationships part");
        return rels;
    };
    for node in xml.root_element().children() {
        if node.tag_name().name() == "Relationship"
            && let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target"))
        {
            rels.insert(
                id.to_string(),
                Relationship {
                    target: target.to_string(),
                    external: node.attribute("TargetMode") == Some("External"),
                },
            );
        }
    }
    rels
}
