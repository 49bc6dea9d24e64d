//! Re-segments the flat content sequence into sections and subsections.

use serde::Deserialize;

use crate::model::{ContentNode, LeafItem, Section, SectionItem, Subsection, TextItem};

/// Style-name tokens that drive section segmentation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionRules {
    pub heading1: Vec<String>,
    pub heading2: Vec<String>,
    pub caption: Vec<String>,
    /// `{n}` is replaced by the figure number.
    pub caption_template: String,
    pub cover_title: String,
}

impl Default for SectionRules {
    fn default() -> Self {
        let tokens = |t: &[&str]| t.iter().map(|s| s.to_string()).collect();
        Self {
            heading1: tokens(&["Heading1", "TGTHEADING1", "a7", "1"]),
            heading2: tokens(&["TGTHEADING2", "Heading2", "21"]),
            caption: tokens(&["Caption", "tgtcaption"]),
            caption_template: "Figure {n}: Custom caption for image".to_string(),
            cover_title: "Cover Page".to_string(),
        }
    }
}

impl SectionRules {
    fn matches(tokens: &[String], style: Option<&str>) -> bool {
        style.is_some_and(|s| tokens.iter().any(|t| t == s))
    }

    pub fn is_heading1(&self, style: Option<&str>) -> bool {
        Self::matches(&self.heading1, style)
    }

    pub fn is_heading2(&self, style: Option<&str>) -> bool {
        Self::matches(&self.heading2, style)
    }

    pub fn is_caption(&self, style: Option<&str>) -> bool {
        Self::matches(&self.caption, style)
    }

    fn caption_text(&self, n: usize) -> String {
        self.caption_template.replace("{n}", &n.to_string())
    }
}

struct OpenSection {
    title: String,
    body: Vec<SectionItem>,
}

#[derive(Default)]
struct State {
    sections: Vec<Section>,
    section: Option<OpenSection>,
    subsection: Option<Subsection>,
    preamble: Vec<LeafItem>,
}

impl State {
    fn push(&mut self, item: LeafItem) {
        if let Some(sub) = &mut self.subsection {
            sub.body.push(item);
        } else if let Some(sec) = &mut self.section {
            sec.body.push(SectionItem::Leaf(item));
        } else {
            self.preamble.push(item);
        }
    }

    fn close_subsection(&mut self) {
        let Some(sub) = self.subsection.take() else {
            return;
        };
        if sub.body.is_empty() {
            log::debug!("Skipping empty subsection {:?}", sub.title);
            return;
        }
        if let Some(sec) = &mut self.section {
            sec.body.push(SectionItem::Subsection(sub));
        }
    }

    fn close_section(&mut self) {
        self.close_subsection();
        let Some(sec) = self.section.take() else {
            return;
        };
        if sec.body.is_empty() {
            log::debug!("Skipping empty section {:?}", sec.title);
            return;
        }
        self.sections.push(Section {
            title: sec.title,
            body: sec.body,
        });
    }
}

pub struct SectionBuilder<'r> {
    rules: &'r SectionRules,
}

impl<'r> SectionBuilder<'r> {
    pub fn new(rules: &'r SectionRules) -> Self {
        Self { rules }
    }

    /// Classify nodes by their paragraph style name.
    pub fn build(&self, nodes: Vec<ContentNode>) -> Vec<Section> {
        self.build_with(nodes, ContentNode::style_name)
    }

    /// Like [`build`](Self::build) with a caller-supplied style-name lookup.
    pub fn build_with<F>(&self, nodes: Vec<ContentNode>, style_name_of: F) -> Vec<Section>
    where
        F: for<'n> Fn(&'n ContentNode) -> Option<&'n str>,
    {
        let rules = self.rules;
        let mut state = State::default();
        let mut figure = 1usize;
        let mut previous_style: Option<String> = None;

        for node in nodes {
            let style = style_name_of(&node).map(String::from);
            let preceding = std::mem::replace(&mut previous_style, style.clone());
            let style = style.as_deref();

            if let ContentNode::Paragraph(p) = &node {
                if rules.is_heading1(style) {
                    state.close_section();
                    state.section = Some(OpenSection {
                        title: p.text.clone(),
                        body: Vec::new(),
                    });
                    continue;
                }
                if rules.is_heading2(style) && state.section.is_some() {
                    state.close_subsection();
                    state.subsection = Some(Subsection {
                        title: p.text.clone(),
                        body: Vec::new(),
                    });
                    continue;
                }
            }

            if matches!(node, ContentNode::Image(_)) && !rules.is_caption(preceding.as_deref()) {
                state.push(LeafItem::Text(TextItem {
                    value: rules.caption_text(figure),
                    ..TextItem::default()
                }));
                figure += 1;
            }

            state.push(node.into());
        }

        state.close_section();

        let mut sections = state.sections;
        if !state.preamble.is_empty() {
            sections.insert(
                0,
                Section {
                    title: rules.cover_title.clone(),
                    body: state.preamble.into_iter().map(SectionItem::Leaf).collect(),
                },
            );
        }
        log::debug!("Built {} sections", sections.len());
        sections
    }
}

pub fn build_sections(nodes: Vec<ContentNode>, rules: &SectionRules) -> Vec<Section> {
    SectionBuilder::new(rules).build(nodes)
}
