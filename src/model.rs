use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    pub fn from_wml(val: &str) -> Option<Self> {
        match val {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::Numbering),
            _ => None,
        }
    }
}

fn hex_color<S: Serializer>(color: &Option<[u8; 3]>, s: S) -> Result<S::Ok, S::Error> {
    match color {
        Some([r, g, b]) => s.serialize_str(&format!("{r:02X}{g:02X}{b:02X}")),
        None => s.serialize_none(),
    }
}

/// Character-level formatting. Every field is optional so that a merge can
/// tell "not set here" apart from an explicit value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_through: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_color")]
    pub color: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>, // points
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_color")]
    pub background_color: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_color")]
    pub highlight: Option<[u8; 3]>,
}

/// Paragraph-level formatting; lengths are in points.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_right: Option<f32>,
}

macro_rules! overlay {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl RunProperties {
    /// Overwrite every field that `other` sets.
    pub fn overlay(&mut self, other: &RunProperties) {
        overlay!(
            self,
            other,
            bold,
            italic,
            underline,
            strike_through,
            color,
            font,
            font_size,
            background_color,
            highlight,
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ParagraphProperties {
    pub fn overlay(&mut self, other: &ParagraphProperties) {
        overlay!(
            self,
            other,
            alignment,
            spacing_before,
            spacing_after,
            indent_left,
            indent_right,
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleDefinition {
    pub id: String,
    pub kind: StyleKind,
    pub name: Option<String>,
    pub based_on: Option<String>,
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

/// Effective properties of a style after walking its `basedOn` chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    #[serde(skip_serializing_if = "ParagraphProperties::is_empty")]
    pub paragraph: ParagraphProperties,
    #[serde(skip_serializing_if = "RunProperties::is_empty")]
    pub run: RunProperties,
}

impl ResolvedStyle {
    pub fn is_empty(&self) -> bool {
        self.paragraph.is_empty() && self.run.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberFormat {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    None,
    Other(String),
}

impl NumberFormat {
    pub fn from_wml(val: &str) -> Self {
        match val {
            "bullet" => Self::Bullet,
            "decimal" => Self::Decimal,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            "none" => Self::None,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Bullet => "bullet",
            Self::Decimal => "decimal",
            Self::LowerLetter => "lowerLetter",
            Self::UpperLetter => "upperLetter",
            Self::LowerRoman => "lowerRoman",
            Self::UpperRoman => "upperRoman",
            Self::None => "none",
            Self::Other(s) => s,
        }
    }
}

impl Serialize for NumberFormat {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIndent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hanging: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingLevel {
    pub level: u8,
    pub format: NumberFormat,
    pub level_text: String,
    pub indent: ListIndent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInfo {
    pub is_bullet: bool,
    pub bullet_text: String,
    pub level: u8,
    pub indent: ListIndent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "RunProperties::is_empty")]
    pub styles: RunProperties,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    #[serde(skip_serializing_if = "ResolvedStyle::is_empty")]
    pub styles: ResolvedStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_info: Option<ListInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<TextRun>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub content: Vec<ContentNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePosition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
}

/// Extent in EMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    pub width: u64,
    pub height: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub asset_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<ImagePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
}

/// Page geometry in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProperties {
    pub page_size: PageSize,
    pub margins: PageMargins,
}

/// One block-level item produced by the body parser.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Paragraph(Paragraph),
    Table(Table),
    Image(Image),
    #[serde(rename = "sectionBreak")]
    SectionProperties(SectionProperties),
}

impl ContentNode {
    pub fn style_name(&self) -> Option<&str> {
        match self {
            ContentNode::Paragraph(p) => p.style_name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    #[serde(skip_serializing_if = "ResolvedStyle::is_empty")]
    pub styles: ResolvedStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_data: Option<ListInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<TextRun>,
}

impl From<Paragraph> for TextItem {
    fn from(p: Paragraph) -> Self {
        TextItem {
            value: p.text,
            style_name: p.style_name,
            styles: p.styles,
            list_data: p.list_info,
            runs: p.runs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LeafItem {
    Text(TextItem),
    Table(Table),
    Image(Image),
    SectionBreak(SectionProperties),
}

impl From<ContentNode> for LeafItem {
    fn from(node: ContentNode) -> Self {
        match node {
            ContentNode::Paragraph(p) => LeafItem::Text(p.into()),
            ContentNode::Table(t) => LeafItem::Table(t),
            ContentNode::Image(i) => LeafItem::Image(i),
            ContentNode::SectionProperties(s) => LeafItem::SectionBreak(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "subsection")]
pub struct Subsection {
    pub title: String,
    pub body: Vec<LeafItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionItem {
    Subsection(Subsection),
    Leaf(LeafItem),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: Vec<SectionItem>,
}
