mod image;
mod numbering;
mod package;
mod styles;

use std::io::{Read, Seek};

use crate::assets::AssetStore;
use crate::error::Error;
use crate::model::{
    ContentNode, PageMargins, PageSize, Paragraph, SectionProperties, Table, TableCell, TextRun,
};

pub use image::ImageResolver;
pub use numbering::NumberingResolver;
pub use package::{
    DOCUMENT_PART, DOCUMENT_RELS_PART, NUMBERING_PART, Package, Relationship, STYLES_PART,
    parse_rels_xml, resolve_target,
};
pub use styles::StyleResolver;

use styles::{parse_paragraph_properties, parse_run_properties};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const WPD_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

pub(crate) fn twips_to_pts(twips: f32) -> f32 {
    twips / 20.0
}

pub(crate) fn parse_hex_color(val: &str) -> Option<[u8; 3]> {
    if val == "auto" || val.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&val[0..2], 16).ok()?;
    let g = u8::from_str_radix(&val[2..4], 16).ok()?;
    let b = u8::from_str_radix(&val[4..6], 16).ok()?;
    Some([r, g, b])
}

pub(crate) fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

/// Parse a WML boolean toggle element (e.g., w:b, w:i, w:strike).
/// Present with no val or val != "0"/"false" means true.
pub(crate) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

pub(crate) fn wml<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

pub(crate) fn twips_attr(node: roxmltree::Node, attr: &str) -> Option<f32> {
    node.attribute((WML_NS, attr))
        .and_then(|v| v.parse::<f32>().ok())
        .map(twips_to_pts)
}

/// Flatten SDT wrappers: descend into w:sdtContent and collect effective children.
fn collect_block_nodes<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content));
            }
        } else if child.is_element() {
            nodes.push(child);
        }
    }
    nodes
}

enum Inline<'a> {
    Run(roxmltree::Node<'a, 'a>),
    Drawing(roxmltree::Node<'a, 'a>),
}

/// Branch of an `mc:AlternateContent` to read: the first `mc:Choice` that
/// carries WML content, else `mc:Fallback`.
fn alternate_content_branch<'a>(
    alt: roxmltree::Node<'a, 'a>,
) -> Option<roxmltree::Node<'a, 'a>> {
    let mc = |n: &roxmltree::Node, name: &str| {
        n.tag_name().name() == name && n.tag_name().namespace() == Some(MC_NS)
    };
    alt.children()
        .filter(|n| mc(n, "Choice"))
        .find(|c| c.children().any(|n| n.tag_name().namespace() == Some(WML_NS)))
        .or_else(|| alt.children().find(|n| mc(n, "Fallback")))
}

fn is_alternate_content(node: roxmltree::Node) -> bool {
    node.tag_name().name() == "AlternateContent" && node.tag_name().namespace() == Some(MC_NS)
}

/// Runs and drawings of a paragraph in document order, looking through
/// every inline wrapper (hyperlinks, content controls, custom XML,
/// bidi overrides, tracked insertions and moves).
fn collect_inline_nodes<'a>(parent: roxmltree::Node<'a, 'a>, out: &mut Vec<Inline<'a>>) {
    for child in parent.children() {
        if is_alternate_content(child) {
            if let Some(branch) = alternate_content_branch(child) {
                collect_inline_nodes(branch, out);
            }
            continue;
        }
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "r" => out.push(Inline::Run(child)),
            "drawing" => out.push(Inline::Drawing(child)),
            "hyperlink" | "smartTag" | "fldSimple" | "ins" | "moveTo" | "customXml" | "dir"
            | "bdo" => collect_inline_nodes(child, out),
            "sdt" => {
                if let Some(content) = wml(child, "sdtContent") {
                    collect_inline_nodes(content, out);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn parse_section_properties(sect_node: roxmltree::Node) -> SectionProperties {
    let pg_sz = wml(sect_node, "pgSz");
    let pg_mar = wml(sect_node, "pgMar");
    SectionProperties {
        page_size: PageSize {
            width: pg_sz.and_then(|n| twips_attr(n, "w")),
            height: pg_sz.and_then(|n| twips_attr(n, "h")),
        },
        margins: PageMargins {
            top: pg_mar.and_then(|n| twips_attr(n, "top")),
            bottom: pg_mar.and_then(|n| twips_attr(n, "bottom")),
            left: pg_mar.and_then(|n| twips_attr(n, "left")),
            right: pg_mar.and_then(|n| twips_attr(n, "right")),
        },
    }
}

/// Walks `w:body` (or a table cell) and produces the flat content sequence.
pub struct BodyParser<'a, 's, R: Read + Seek> {
    styles: &'a StyleResolver,
    numbering: &'a NumberingResolver,
    package: &'a mut Package<R>,
    images: ImageResolver<'s>,
    dropped_paragraphs: usize,
}

impl<'a, 's, R: Read + Seek> BodyParser<'a, 's, R> {
    pub fn new(
        styles: &'a StyleResolver,
        numbering: &'a NumberingResolver,
        package: &'a mut Package<R>,
        store: &'s dyn AssetStore,
    ) -> Self {
        Self {
            styles,
            numbering,
            package,
            images: ImageResolver::new(store),
            dropped_paragraphs: 0,
        }
    }

    pub fn images(&self) -> &ImageResolver<'s> {
        &self.images
    }

    pub fn dropped_paragraphs(&self) -> usize {
        self.dropped_paragraphs
    }

    /// Parse the block children of `parent` in document order.
    pub fn parse(&mut self, parent: roxmltree::Node) -> Vec<ContentNode> {
        let mut out = Vec::new();
        for node in collect_block_nodes(parent) {
            if node.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            match node.tag_name().name() {
                "p" => self.parse_paragraph(node, &mut out),
                "tbl" => out.push(ContentNode::Table(self.parse_table(node))),
                "sectPr" => out.push(ContentNode::SectionProperties(parse_section_properties(
                    node,
                ))),
                _ => {}
            }
        }
        out
    }

    fn parse_table(&mut self, tbl: roxmltree::Node) -> Table {
        let mut rows = Vec::new();
        for tr in collect_block_nodes(tbl).into_iter().filter(|n| is_wml(*n, "tr")) {
            let cells = collect_block_nodes(tr)
                .into_iter()
                .filter(|n| is_wml(*n, "tc"))
                .map(|tc| TableCell {
                    content: self.parse(tc),
                })
                .collect();
            rows.push(cells);
        }
        Table { rows }
    }

    fn parse_paragraph(&mut self, node: roxmltree::Node, out: &mut Vec<ContentNode>) {
        let ppr = wml(node, "pPr");
        let style_name = ppr
            .and_then(|ppr| wml_attr(ppr, "pStyle"))
            .map(String::from);

        let mut styles = style_name
            .as_deref()
            .and_then(|id| self.styles.resolve(id))
            .cloned()
            .unwrap_or_default();
        if let Some(ppr) = ppr {
            styles.paragraph.overlay(&parse_paragraph_properties(ppr));
        }

        let list_info = ppr
            .and_then(|ppr| wml(ppr, "numPr"))
            .and_then(|num_pr| {
                let num_id = wml_attr(num_pr, "numId")?;
                let ilvl = match wml_attr(num_pr, "ilvl") {
                    Some(v) => v.parse::<u8>().ok()?,
                    None => 0,
                };
                self.numbering.list_info(num_id, ilvl)
            });

        let mut inline = Vec::new();
        collect_inline_nodes(node, &mut inline);

        let mut text = String::new();
        let mut runs = Vec::new();
        for item in inline {
            match item {
                Inline::Drawing(drawing) => self.push_image(drawing, out),
                Inline::Run(run) => {
                    let run_text = self.parse_run_content(run, out);
                    if run_text.is_empty() {
                        continue;
                    }
                    let rpr = wml(run, "rPr");
                    let mut run_styles = rpr
                        .and_then(|rpr| wml_attr(rpr, "rStyle"))
                        .and_then(|id| self.styles.resolve(id))
                        .map(|s| s.run.clone())
                        .unwrap_or_default();
                    if let Some(rpr) = rpr {
                        run_styles.overlay(&parse_run_properties(rpr));
                    }
                    text.push_str(&run_text);
                    runs.push(TextRun {
                        text: run_text,
                        styles: run_styles,
                    });
                }
            }
        }

        if text.trim().is_empty() {
            log::debug!(
                "Dropping empty paragraph (style {})",
                style_name.as_deref().unwrap_or("-")
            );
            self.dropped_paragraphs += 1;
        } else {
            out.push(ContentNode::Paragraph(Paragraph {
                text,
                style_name,
                styles,
                list_info,
                runs,
            }));
        }

        // Mid-document section break: sectPr inside pPr ends the current section
        if let Some(sect_node) = ppr.and_then(|ppr| wml(ppr, "sectPr")) {
            out.push(ContentNode::SectionProperties(parse_section_properties(
                sect_node,
            )));
        }
    }

    /// Text of one run. Drawings met inside the run are resolved and pushed
    /// to `out` as they are encountered.
    fn parse_run_content(&mut self, run: roxmltree::Node, out: &mut Vec<ContentNode>) -> String {
        let mut text = String::new();
        self.collect_run_content(run, &mut text, out);
        text
    }

    fn collect_run_content(
        &mut self,
        parent: roxmltree::Node,
        text: &mut String,
        out: &mut Vec<ContentNode>,
    ) {
        for child in parent.children() {
            if is_alternate_content(child) {
                if let Some(branch) = alternate_content_branch(child) {
                    self.collect_run_content(branch, text, out);
                }
                continue;
            }
            if child.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            match child.tag_name().name() {
                "t" => text.push_str(child.text().unwrap_or("")),
                "tab" => text.push('\t'),
                "br" | "cr" => text.push('\n'),
                "drawing" => self.push_image(child, out),
                _ => {}
            }
        }
    }

    fn push_image(&mut self, drawing: roxmltree::Node, out: &mut Vec<ContentNode>) {
        if let Some(image) = self.images.resolve(drawing, self.package) {
            out.push(ContentNode::Image(image));
        }
    }
}

/// Run the parsing stages over a package: styles and numbering first, then
/// the document body.
pub fn parse_package<R: Read + Seek>(
    package: &mut Package<R>,
    store: &dyn AssetStore,
) -> Result<Vec<ContentNode>, Error> {
    let xml_content = package.document_xml()?;
    let styles = StyleResolver::from_xml(&package.styles_xml()?)?;
    let numbering = NumberingResolver::from_xml(&package.numbering_xml()?)?;

    let xml = roxmltree::Document::parse(&xml_content).map_err(|source| Error::MalformedXml {
        part: DOCUMENT_PART.to_string(),
        source,
    })?;
    let body = wml(xml.root_element(), "body").ok_or(Error::MissingBody)?;

    let mut parser = BodyParser::new(&styles, &numbering, package, store);
    let nodes = parser.parse(body);

    log::info!(
        "Parsed {} content nodes ({} styles, {} numbering instances, {} images uploaded, {} images dropped, {} empty paragraphs skipped)",
        nodes.len(),
        styles.len(),
        numbering.len(),
        parser.images().uploaded(),
        parser.images().dropped(),
        parser.dropped_paragraphs(),
    );
    Ok(nodes)
}
