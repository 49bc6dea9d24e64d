mod common;

use docx_sections::docx::NumberingResolver;
use docx_sections::model::NumberFormat;

use common::numbering_xml;

fn resolver(numbering: &str) -> NumberingResolver {
    NumberingResolver::from_xml(&numbering_xml(numbering)).expect("numbering parse")
}

const SPARSE: &str = r#"
    <w:abstractNum w:abstractNumId="0">
      <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>
        <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
      <w:lvl w:ilvl="2"><w:numFmt w:val="bullet"/><w:lvlText w:val="o"/></w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#;

#[test]
fn sparse_levels_stay_sparse() {
    let numbering = resolver(SPARSE);

    assert!(numbering.level_for("1", 1).is_none());

    let level2 = numbering.level_for("1", 2).expect("level 2 defined");
    assert_eq!(level2.format, NumberFormat::Bullet);
    assert_eq!(level2.level_text, "o");

    let level0 = numbering.level_for("1", 0).expect("level 0 defined");
    assert_eq!(level0.format, NumberFormat::Decimal);
    assert_eq!(level0.indent.left, Some(36.0));
    assert_eq!(level0.indent.hanging, Some(18.0));
    assert_eq!(level0.indent.first_line, None);
}

#[test]
fn unknown_references_are_absent() {
    let numbering = resolver(SPARSE);
    assert!(numbering.level_for("7", 0).is_none());
    assert!(numbering.level_for("0", 0).is_none());
    assert!(numbering.list_info("7", 0).is_none());
}

#[test]
fn list_info_joins_level_formatting() {
    let numbering = resolver(SPARSE);

    let info = numbering.list_info("1", 2).expect("bullet level");
    assert!(info.is_bullet);
    assert_eq!(info.bullet_text, "o");
    assert_eq!(info.level, 2);

    let info = numbering.list_info("1", 0).expect("decimal level");
    assert!(!info.is_bullet);
    assert_eq!(info.bullet_text, "%1.");
}

#[test]
fn referenced_abstract_supplies_missing_levels() {
    let numbering = resolver(
        r#"
        <w:abstractNum w:abstractNumId="10">
          <w:styleLink w:val="OutlineList"/>
          <w:lvl w:ilvl="0"><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1."/></w:lvl>
          <w:lvl w:ilvl="1"><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/></w:lvl>
        </w:abstractNum>
        <w:abstractNum w:abstractNumId="11">
          <w:numStyleLink w:val="OutlineList"/>
          <w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/><w:lvlText w:val="-"/></w:lvl>
        </w:abstractNum>
        <w:num w:numId="3"><w:abstractNumId w:val="11"/></w:num>"#,
    );

    let inherited = numbering.level_for("3", 0).expect("level 0 inherited");
    assert_eq!(inherited.format, NumberFormat::UpperRoman);

    let local = numbering.level_for("3", 1).expect("level 1 local");
    assert_eq!(local.format, NumberFormat::Bullet);
    assert_eq!(local.level_text, "-");
}

#[test]
fn cyclic_references_terminate() {
    let numbering = resolver(
        r#"
        <w:abstractNum w:abstractNumId="1">
          <w:styleLink w:val="StyleA"/>
          <w:numStyleLink w:val="StyleB"/>
          <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
        </w:abstractNum>
        <w:abstractNum w:abstractNumId="2">
          <w:styleLink w:val="StyleB"/>
          <w:numStyleLink w:val="StyleA"/>
          <w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/><w:lvlText w:val="*"/></w:lvl>
        </w:abstractNum>
        <w:num w:numId="1"><w:abstractNumId w:val="1"/></w:num>
        <w:num w:numId="2"><w:abstractNumId w:val="2"/></w:num>"#,
    );

    // 1 is resolved first: it pulls in 2, which sees 1 mid-resolution and
    // takes 1's local levels.
    assert_eq!(
        numbering.level_for("1", 1).map(|l| l.format.clone()),
        Some(NumberFormat::Bullet)
    );
    assert_eq!(
        numbering.level_for("2", 0).map(|l| l.format.clone()),
        Some(NumberFormat::Decimal)
    );
}

#[test]
fn level_override_replaces_one_level_for_one_instance() {
    let numbering = resolver(&format!(
        r#"{SPARSE}
        <w:num w:numId="2">
          <w:abstractNumId w:val="0"/>
          <w:lvlOverride w:ilvl="0">
            <w:lvl w:ilvl="0"><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="(%1)"/></w:lvl>
          </w:lvlOverride>
        </w:num>"#
    ));

    assert_eq!(
        numbering.level_for("2", 0).map(|l| l.level_text.as_str()),
        Some("(%1)")
    );
    assert_eq!(
        numbering.level_for("1", 0).map(|l| l.level_text.as_str()),
        Some("%1.")
    );
    assert_eq!(numbering.len(), 2);
}

#[test]
fn repeated_lookups_are_identical() {
    let numbering = resolver(SPARSE);
    assert_eq!(numbering.level_for("1", 2), numbering.level_for("1", 2));
    assert_eq!(numbering.list_info("1", 0), numbering.list_info("1", 0));
}
