mod common;

use docx_sections::docx::StyleResolver;
use docx_sections::model::{Alignment, StyleKind};

use common::styles_xml;

fn resolver(styles: &str) -> StyleResolver {
    StyleResolver::from_xml(&styles_xml(styles)).expect("styles parse")
}

#[test]
fn style_without_parent_resolves_to_its_own_properties() {
    let styles = resolver(
        r#"<w:style w:type="paragraph" w:styleId="Body">
             <w:name w:val="Body Text"/>
             <w:pPr><w:jc w:val="center"/><w:spacing w:before="240" w:after="120"/></w:pPr>
             <w:rPr><w:b/><w:color w:val="FF0000"/><w:sz w:val="28"/></w:rPr>
           </w:style>"#,
    );
    let resolved = styles.resolve("Body").expect("Body resolves");
    assert_eq!(resolved.paragraph.alignment, Some(Alignment::Center));
    assert_eq!(resolved.paragraph.spacing_before, Some(12.0));
    assert_eq!(resolved.paragraph.spacing_after, Some(6.0));
    assert_eq!(resolved.paragraph.indent_left, None);
    assert_eq!(resolved.run.bold, Some(true));
    assert_eq!(resolved.run.italic, None);
    assert_eq!(resolved.run.color, Some([255, 0, 0]));
    assert_eq!(resolved.run.font_size, Some(14.0));

    let def = styles.definition("Body").expect("definition kept");
    assert_eq!(def.kind, StyleKind::Paragraph);
    assert_eq!(def.name.as_deref(), Some("Body Text"));
    assert_eq!(styles.style_id_for_name("body text"), Some("Body"));
}

#[test]
fn three_link_chain_merges_from_root_to_leaf() {
    let styles = resolver(
        r#"<w:style w:type="paragraph" w:styleId="C">
             <w:rPr><w:rFonts w:ascii="Georgia"/><w:color w:val="0000FF"/></w:rPr>
             <w:pPr><w:jc w:val="right"/></w:pPr>
           </w:style>
           <w:style w:type="paragraph" w:styleId="B">
             <w:basedOn w:val="C"/>
             <w:rPr><w:color w:val="00FF00"/></w:rPr>
             <w:pPr><w:jc w:val="center"/></w:pPr>
           </w:style>
           <w:style w:type="paragraph" w:styleId="A">
             <w:basedOn w:val="B"/>
             <w:pPr><w:jc w:val="both"/></w:pPr>
           </w:style>"#,
    );
    let a = styles.resolve("A").expect("A resolves");
    // Only C sets the font.
    assert_eq!(a.run.font.as_deref(), Some("Georgia"));
    // B overrides C's color and A inherits B's.
    assert_eq!(a.run.color, Some([0, 255, 0]));
    // Every link sets alignment; the most specific wins.
    assert_eq!(a.paragraph.alignment, Some(Alignment::Justify));

    let b = styles.resolve("B").expect("B resolves");
    assert_eq!(b.paragraph.alignment, Some(Alignment::Center));
}

#[test]
fn based_on_cycle_terminates() {
    let styles = resolver(
        r#"<w:style w:type="paragraph" w:styleId="A">
             <w:basedOn w:val="B"/>
             <w:rPr><w:i/></w:rPr>
           </w:style>
           <w:style w:type="paragraph" w:styleId="B">
             <w:basedOn w:val="A"/>
             <w:rPr><w:b/><w:i w:val="0"/></w:rPr>
           </w:style>
           <w:style w:type="paragraph" w:styleId="Self">
             <w:basedOn w:val="Self"/>
             <w:rPr><w:u w:val="single"/></w:rPr>
           </w:style>"#,
    );
    let a = styles.resolve("A").expect("A resolves");
    assert_eq!(a.run.bold, Some(true));
    assert_eq!(a.run.italic, Some(true));

    let b = styles.resolve("B").expect("B resolves");
    assert_eq!(b.run.italic, Some(false));

    let own = styles.resolve("Self").expect("Self resolves");
    assert_eq!(own.run.underline, Some(true));
}

#[test]
fn missing_parent_stops_the_chain() {
    let styles = resolver(
        r#"<w:style w:type="character" w:styleId="Emph">
             <w:basedOn w:val="DoesNotExist"/>
             <w:rPr><w:i/><w:highlight w:val="yellow"/></w:rPr>
           </w:style>"#,
    );
    let emph = styles.resolve("Emph").expect("Emph resolves");
    assert_eq!(emph.run.italic, Some(true));
    assert_eq!(emph.run.highlight, Some([255, 255, 0]));
    assert!(emph.paragraph.is_empty());
    assert!(styles.resolve("DoesNotExist").is_none());
}

#[test]
fn explicit_false_overrides_inherited_toggle() {
    let styles = resolver(
        r#"<w:style w:type="paragraph" w:styleId="Strong"><w:rPr><w:b/><w:strike/></w:rPr></w:style>
           <w:style w:type="paragraph" w:styleId="Plain">
             <w:basedOn w:val="Strong"/>
             <w:rPr><w:b w:val="0"/><w:color w:val="auto"/></w:rPr>
           </w:style>"#,
    );
    let plain = styles.resolve("Plain").expect("Plain resolves");
    assert_eq!(plain.run.bold, Some(false));
    assert_eq!(plain.run.strike_through, Some(true));
    assert_eq!(plain.run.color, None);
}

#[test]
fn resolving_twice_is_identical() {
    let styles = resolver(
        r#"<w:style w:type="paragraph" w:styleId="Base"><w:pPr><w:ind w:left="720"/></w:pPr></w:style>
           <w:style w:type="paragraph" w:styleId="Leaf"><w:basedOn w:val="Base"/></w:style>"#,
    );
    let first = styles.resolve("Leaf").cloned();
    let second = styles.resolve("Leaf").cloned();
    assert_eq!(first, second);
    assert_eq!(first.and_then(|s| s.paragraph.indent_left), Some(36.0));
}

#[test]
fn malformed_styles_part_is_an_error() {
    let err = StyleResolver::from_xml("<w:styles><w:style>").err();
    assert!(matches!(
        err,
        Some(docx_sections::Error::MalformedXml { ref part, .. }) if part == "word/styles.xml"
    ));
}

#[test]
fn underline_none_overrides_inherited_underline() {
    let styles = resolver(
        r#"<w:style w:type="character" w:styleId="Link"><w:rPr><w:u w:val="single"/></w:rPr></w:style>
           <w:style w:type="character" w:styleId="QuietLink">
             <w:basedOn w:val="Link"/>
             <w:rPr><w:u w:val="none"/></w:rPr>
           </w:style>"#,
    );
    assert_eq!(styles.resolve("Link").and_then(|s| s.run.underline), Some(true));
    assert_eq!(styles.resolve("QuietLink").and_then(|s| s.run.underline), Some(false));
}
