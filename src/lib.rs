pub mod assets;
pub mod docx;
mod error;
pub mod model;
pub mod sections;

pub use assets::{Asset, AssetStore, DirectoryStore, UploadError};
pub use error::Error;
pub use model::{ContentNode, LeafItem, Section, SectionItem, Subsection};
pub use sections::{SectionBuilder, SectionRules, build_sections};

use std::io::{Read, Seek};
use std::path::Path;
use std::time::Instant;

use docx::Package;

/// Parse a package into the flat content-node sequence.
pub fn parse_content<R: Read + Seek>(
    package: &mut Package<R>,
    store: &dyn AssetStore,
) -> Result<Vec<ContentNode>, Error> {
    docx::parse_package(package, store)
}

fn convert_package<R: Read + Seek>(
    mut package: Package<R>,
    store: &dyn AssetStore,
    rules: &SectionRules,
) -> Result<Vec<Section>, Error> {
    let t0 = Instant::now();

    let nodes = parse_content(&mut package, store)?;
    let t_parse = t0.elapsed();

    let sections = build_sections(nodes, rules);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, sections={:.1}ms, total={:.1}ms ({} sections)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        sections.len(),
    );

    Ok(sections)
}

pub fn convert_docx(
    input: &Path,
    store: &dyn AssetStore,
    rules: &SectionRules,
) -> Result<Vec<Section>, Error> {
    convert_package(Package::open(input)?, store, rules)
}

pub fn convert_docx_bytes(
    input: &[u8],
    store: &dyn AssetStore,
    rules: &SectionRules,
) -> Result<Vec<Section>, Error> {
    convert_package(Package::from_bytes(input)?, store, rules)
}
