use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Error;
use crate::model::{ListIndent, ListInfo, NumberFormat, NumberingLevel};

use super::package::NUMBERING_PART;
use super::{WML_NS, is_wml, twips_attr, wml, wml_attr};

type Levels = BTreeMap<u8, NumberingLevel>;

struct AbstractNumbering {
    levels: Levels,
    /// Abstract numbering this one takes its missing levels from.
    base: Option<String>,
}

/// Flat `(numId, ilvl) → level` table for one document.
pub struct NumberingResolver {
    instances: HashMap<String, Levels>,
}

fn parse_level(lvl: roxmltree::Node) -> Option<NumberingLevel> {
    let level = lvl
        .attribute((WML_NS, "ilvl"))
        .and_then(|v| v.parse::<u8>().ok())?;
    let format = wml_attr(lvl, "numFmt")
        .map(NumberFormat::from_wml)
        .unwrap_or(NumberFormat::Decimal);
    let level_text = wml_attr(lvl, "lvlText").unwrap_or("").to_string();
    let indent = wml(lvl, "pPr")
        .and_then(|ppr| wml(ppr, "ind"))
        .map(|ind| ListIndent {
            left: twips_attr(ind, "left").or_else(|| twips_attr(ind, "start")),
            hanging: twips_attr(ind, "hanging"),
            first_line: twips_attr(ind, "firstLine"),
        })
        .unwrap_or_default();
    Some(NumberingLevel {
        level,
        format,
        level_text,
        indent,
    })
}

fn collect_levels<'a>(parent: roxmltree::Node<'a, 'a>) -> Levels {
    parent
        .children()
        .filter(|n| is_wml(*n, "lvl"))
        .filter_map(parse_level)
        .map(|l| (l.level, l))
        .collect()
}

struct Resolution<'a> {
    abstracts: &'a HashMap<String, AbstractNumbering>,
    resolved: HashMap<String, Levels>,
    in_progress: HashSet<String>,
}

impl Resolution<'_> {
    /// Merge `id` with the chain of abstract numberings it references. Each
    /// id is materialized once; re-entering an id that is still being
    /// resolved stops at its local levels.
    fn resolve(&mut self, id: &str) -> Levels {
        if let Some(levels) = self.resolved.get(id) {
            return levels.clone();
        }
        let abstracts = self.abstracts;
        let Some(def) = abstracts.get(id) else {
            return Levels::new();
        };
        let mut levels = def.levels.clone();
        if !self.in_progress.insert(id.to_string()) {
            log::debug!("Numbering reference cycle at abstractNum {id}");
            return levels;
        }
        if let Some(base) = def.base.as_deref() {
            for (ilvl, inherited) in self.resolve(base) {
                levels.entry(ilvl).or_insert(inherited);
            }
        }
        self.in_progress.remove(id);
        self.resolved.insert(id.to_string(), levels.clone());
        levels
    }
}

impl NumberingResolver {
    pub fn from_xml(xml_content: &str) -> Result<Self, Error> {
        let xml = roxmltree::Document::parse(xml_content).map_err(|source| {
            Error::MalformedXml {
                part: NUMBERING_PART.to_string(),
                source,
            }
        })?;
        Ok(Self::from_document(&xml))
    }

    pub fn from_document(xml: &roxmltree::Document) -> Self {
        let root = xml.root_element();

        // Build pass: abstract definitions in document order, plus the
        // styleLink owners that numStyleLink references point at.
        let mut order: Vec<String> = Vec::new();
        let mut abstracts: HashMap<String, AbstractNumbering> = HashMap::new();
        let mut style_links: HashMap<String, String> = HashMap::new();
        let mut num_style_links: Vec<(String, String)> = Vec::new();

        for node in root.children().filter(|n| is_wml(*n, "abstractNum")) {
            let Some(abs_id) = node.attribute((WML_NS, "abstractNumId")) else {
                continue;
            };
            if let Some(link) = wml_attr(node, "styleLink") {
                style_links.insert(link.to_string(), abs_id.to_string());
            }
            if let Some(link) = wml_attr(node, "numStyleLink") {
                num_style_links.push((abs_id.to_string(), link.to_string()));
            }
            if !abstracts.contains_key(abs_id) {
                order.push(abs_id.to_string());
            }
            abstracts.insert(
                abs_id.to_string(),
                AbstractNumbering {
                    levels: collect_levels(node),
                    base: None,
                },
            );
        }

        for (abs_id, link) in num_style_links {
            let target = style_links.get(&link).cloned();
            if target.is_none() {
                log::debug!("abstractNum {abs_id} links to unknown numbering style {link}");
            }
            if let Some(def) = abstracts.get_mut(&abs_id) {
                def.base = target;
            }
        }

        // Resolve pass.
        let mut resolution = Resolution {
            abstracts: &abstracts,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        };
        for id in &order {
            resolution.resolve(id);
        }
        let resolved = resolution.resolved;

        let mut instances = HashMap::new();
        for node in root.children().filter(|n| is_wml(*n, "num")) {
            let Some(num_id) = node.attribute((WML_NS, "numId")) else {
                continue;
            };
            let Some(abs_id) = wml_attr(node, "abstractNumId") else {
                continue;
            };
            let mut levels = resolved.get(abs_id).cloned().unwrap_or_else(|| {
                log::debug!("numId {num_id} references unknown abstractNum {abs_id}");
                Levels::new()
            });
            for lvl in node
                .children()
                .filter(|n| is_wml(*n, "lvlOverride"))
                .filter_map(|o| wml(o, "lvl"))
                .filter_map(parse_level)
            {
                levels.insert(lvl.level, lvl);
            }
            instances.insert(num_id.to_string(), levels);
        }

        log::debug!(
            "Resolved {} abstract numberings into {} numbering instances",
            abstracts.len(),
            instances.len()
        );
        Self { instances }
    }

    /// Level formatting for a list reference; `None` means "not a list".
    pub fn level_for(&self, num_id: &str, ilvl: u8) -> Option<&NumberingLevel> {
        if num_id == "0" {
            return None;
        }
        self.instances.get(num_id)?.get(&ilvl)
    }

    pub fn list_info(&self, num_id: &str, ilvl: u8) -> Option<ListInfo> {
        let level = self.level_for(num_id, ilvl)?;
        Some(ListInfo {
            is_bullet: level.format == NumberFormat::Bullet,
            bullet_text: level.level_text.clone(),
            level: ilvl,
            indent: level.indent.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
