use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid DOCX package: {0}")]
    InvalidPackage(String),

    #[error("missing required part {0}")]
    MissingPart(String),

    #[error("malformed XML in {part}: {source}")]
    MalformedXml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("word/document.xml has no w:body element")]
    MissingBody,
}
