use std::collections::HashMap;

use crate::error::Error;
use crate::model::{
    Alignment, ParagraphProperties, ResolvedStyle, RunProperties, StyleDefinition, StyleKind,
};

use super::package::STYLES_PART;
use super::{WML_NS, is_wml, parse_hex_color, twips_attr, wml, wml_attr, wml_bool};

pub(super) fn parse_alignment(val: &str) -> Option<Alignment> {
    match val {
        "left" | "start" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        "both" | "distribute" => Some(Alignment::Justify),
        _ => None,
    }
}

fn highlight_color(name: &str) -> Option<[u8; 3]> {
    match name {
        "yellow" => Some([255, 255, 0]),
        "green" => Some([0, 255, 0]),
        "cyan" => Some([0, 255, 255]),
        "magenta" => Some([255, 0, 255]),
        "red" => Some([255, 0, 0]),
        "blue" => Some([0, 0, 255]),
        "darkYellow" => Some([128, 128, 0]),
        "darkGreen" => Some([0, 128, 0]),
        "darkCyan" => Some([0, 128, 128]),
        "darkMagenta" => Some([128, 0, 128]),
        "darkRed" => Some([128, 0, 0]),
        "darkBlue" => Some([0, 0, 128]),
        "lightGray" => Some([192, 192, 192]),
        "darkGray" => Some([128, 128, 128]),
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        _ => None,
    }
}

/// Direct run formatting from a `w:rPr` element.
pub(super) fn parse_run_properties(rpr: roxmltree::Node) -> RunProperties {
    let font = wml(rpr, "rFonts").and_then(|rfonts| {
        rfonts
            .attribute((WML_NS, "ascii"))
            .or_else(|| rfonts.attribute((WML_NS, "hAnsi")))
            .filter(|f| !f.is_empty())
            .map(String::from)
    });

    RunProperties {
        bold: wml_bool(rpr, "b"),
        italic: wml_bool(rpr, "i"),
        underline: wml(rpr, "u").map(|u| {
            u.attribute((WML_NS, "val"))
                .is_none_or(|v| v != "none" && v != "0")
        }),
        strike_through: wml_bool(rpr, "strike"),
        color: wml_attr(rpr, "color").and_then(parse_hex_color),
        font,
        font_size: wml_attr(rpr, "sz")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0),
        background_color: wml(rpr, "shd")
            .and_then(|shd| shd.attribute((WML_NS, "fill")))
            .and_then(parse_hex_color),
        highlight: wml_attr(rpr, "highlight").and_then(highlight_color),
    }
}

/// Direct paragraph formatting from a `w:pPr` element.
pub(super) fn parse_paragraph_properties(ppr: roxmltree::Node) -> ParagraphProperties {
    let spacing = wml(ppr, "spacing");
    let ind = wml(ppr, "ind");
    ParagraphProperties {
        alignment: wml_attr(ppr, "jc").and_then(parse_alignment),
        spacing_before: spacing.and_then(|n| twips_attr(n, "before")),
        spacing_after: spacing.and_then(|n| twips_attr(n, "after")),
        indent_left: ind.and_then(|n| twips_attr(n, "left").or_else(|| twips_attr(n, "start"))),
        indent_right: ind.and_then(|n| twips_attr(n, "right").or_else(|| twips_attr(n, "end"))),
    }
}

/// Style table for one document, with every `basedOn` chain already merged.
pub struct StyleResolver {
    definitions: HashMap<String, StyleDefinition>,
    resolved: HashMap<String, ResolvedStyle>,
}

impl StyleResolver {
    pub fn from_xml(xml_content: &str) -> Result<Self, Error> {
        let xml = roxmltree::Document::parse(xml_content).map_err(|source| {
            Error::MalformedXml {
                part: STYLES_PART.to_string(),
                source,
            }
        })?;
        Ok(Self::from_document(&xml))
    }

    pub fn from_document(xml: &roxmltree::Document) -> Self {
        let mut definitions = HashMap::new();

        for style_node in xml.root_element().children() {
            if !is_wml(style_node, "style") {
                continue;
            }
            let Some(style_id) = style_node.attribute((WML_NS, "styleId")) else {
                continue;
            };
            let Some(kind) = style_node
                .attribute((WML_NS, "type"))
                .and_then(StyleKind::from_wml)
            else {
                continue;
            };

            let name = wml_attr(style_node, "name").map(String::from);
            let based_on = wml_attr(style_node, "basedOn")
                .filter(|v| !v.is_empty())
                .map(String::from);
            let run = wml(style_node, "rPr")
                .map(parse_run_properties)
                .unwrap_or_default();
            let paragraph = wml(style_node, "pPr")
                .map(parse_paragraph_properties)
                .unwrap_or_default();

            definitions.insert(
                style_id.to_string(),
                StyleDefinition {
                    id: style_id.to_string(),
                    kind,
                    name,
                    based_on,
                    run,
                    paragraph,
                },
            );
        }

        let resolved = definitions
            .keys()
            .map(|id| (id.clone(), resolve_chain(&definitions, id)))
            .collect();

        log::debug!("Resolved {} style definitions", definitions.len());
        Self {
            definitions,
            resolved,
        }
    }

    /// Effective properties of `style_id`, `None` when the id is not defined.
    pub fn resolve(&self, style_id: &str) -> Option<&ResolvedStyle> {
        self.resolved.get(style_id)
    }

    pub fn definition(&self, style_id: &str) -> Option<&StyleDefinition> {
        self.definitions.get(style_id)
    }

    /// Style id whose display name is `name` (e.g. "heading 1" → "Heading1").
    pub fn style_id_for_name(&self, name: &str) -> Option<&str> {
        self.definitions
            .values()
            .find(|d| d.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn resolve_chain(definitions: &HashMap<String, StyleDefinition>, id: &str) -> ResolvedStyle {
    let mut chain: Vec<&StyleDefinition> = Vec::new();
    let mut current = definitions.get(id);
    while let Some(def) = current {
        if chain.iter().any(|d| d.id == def.id) {
            log::debug!("basedOn cycle at style {} while resolving {}", def.id, id);
            break;
        }
        chain.push(def);
        current = def.based_on.as_deref().and_then(|parent| definitions.get(parent));
    }

    // Furthest ancestor first, so each closer link overrides it.
    let mut resolved = ResolvedStyle::default();
    for def in chain.iter().rev() {
        resolved.run.overlay(&def.run);
        resolved.paragraph.overlay(&def.paragraph);
    }
    resolved
}
