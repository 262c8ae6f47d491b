use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use excel_ngrams::{
    EnglishLexicon, NgramError, NgramOptions, SheetSelector, analyze_file, read_column,
};

const WORKBOOK_XML: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
  xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Summary" sheetId="1" r:id="rId1"/>
    <sheet name="Keywords" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"##;

const RELS_XML: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
</Relationships>"##;

const SHARED_STRINGS_XML: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="7" uniqueCount="7">
  <si><t>Keyword</t></si>
  <si><t>Volume</t></si>
  <si><t>diet snacks</t></si>
  <si><t>keto snacks</t></si>
  <si><r><t>low carb </t></r><r><t>snacks</t></r></si>
  <si><t>low calorie snacks</t></si>
  <si><t>Note</t></si>
</sst>"##;

// Summary sheet: a different header, so the Keyword column only exists on sheet 2.
const SHEET1_XML: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>6</v></c></row>
    <row r="2"><c r="A2" t="inlineStr"><is><t>nothing to see</t></is></c></row>
  </sheetData>
</worksheet>"##;

const SHEET2_XML: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>1</v></c><c r="B1" t="s"><v>0</v></c></row>
    <row r="2"><c r="A2"><v>900</v></c><c r="B2" t="s"><v>2</v></c></row>
    <row r="3"><c r="A3"><v>700</v></c><c r="B3" t="s"><v>3</v></c></row>
    <row r="4"><c r="A4"><v>10</v></c></row>
    <row r="5"><c r="A5"><v>500</v></c><c r="B5" t="s"><v>4</v></c></row>
    <row r="6"><c r="A6"><v>300</v></c><c r="B6" t="inlineStr"><is><t>low calorie snacks</t></is></c></row>
  </sheetData>
</worksheet>"##;

fn write_workbook(target: &Path, parts: &[(&str, &str)]) {
    let file = File::create(target).expect("create xlsx file");
    let mut zip = ZipWriter::new(file);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, xml) in parts {
        zip.start_file(*name, deflated).expect("start part");
        zip.write_all(xml.as_bytes()).expect("write part");
    }
    zip.finish().expect("finish xlsx zip");
}

fn write_keyword_workbook(target: &Path) {
    write_workbook(
        target,
        &[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", RELS_XML),
            ("xl/sharedStrings.xml", SHARED_STRINGS_XML),
            ("xl/worksheets/sheet1.xml", SHEET1_XML),
            ("xl/worksheets/sheet2.xml", SHEET2_XML),
        ],
    );
}

#[test]
fn xlsx_reads_named_sheet_column() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.xlsx");
    write_keyword_workbook(&path);

    let terms = read_column(&path, &SheetSelector::Name("Keywords".into()), "Keyword")
        .expect("read Keyword column");
    assert_eq!(
        terms,
        vec![
            "diet snacks",
            "keto snacks",
            "low carb snacks",
            "low calorie snacks"
        ]
    );
}

#[test]
fn xlsx_reads_sheet_by_index() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.xlsx");
    write_keyword_workbook(&path);

    let volumes = read_column(&path, &SheetSelector::Index(1), "Volume").expect("read Volume");
    assert_eq!(volumes, vec!["900", "700", "10", "500", "300"]);
}

#[test]
fn xlsx_first_sheet_is_the_default() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.xlsx");
    write_keyword_workbook(&path);

    let notes = read_column(&path, &SheetSelector::default(), "Note").expect("read Note");
    assert_eq!(notes, vec!["nothing to see"]);

    let err = read_column(&path, &SheetSelector::default(), "Keyword").unwrap_err();
    assert!(matches!(err, NgramError::MissingColumn { .. }), "{err}");
}

#[test]
fn xlsx_unknown_sheet_is_an_error() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.xlsx");
    write_keyword_workbook(&path);

    for selector in [SheetSelector::Index(5), SheetSelector::Name("Ads".into())] {
        let err = read_column(&path, &selector, "Keyword").unwrap_err();
        assert!(
            err.to_string().contains("Summary, Keywords"),
            "Unexpected error: {err}"
        );
    }
}

#[test]
fn xlsx_without_relationships_falls_back_to_sheet_numbering() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("bare.xlsx");
    write_workbook(
        &path,
        &[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/sharedStrings.xml", SHARED_STRINGS_XML),
            ("xl/worksheets/sheet1.xml", SHEET1_XML),
            ("xl/worksheets/sheet2.xml", SHEET2_XML),
        ],
    );

    let terms = read_column(&path, &SheetSelector::Index(1), "Keyword").expect("read column");
    assert_eq!(terms.len(), 4);
}

#[test]
fn xlsx_end_to_end_ngrams() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.xlsx");
    write_keyword_workbook(&path);

    let options = NgramOptions {
        max_n: 2,
        top_n: 1,
        ..Default::default()
    };
    let table = analyze_file(
        &EnglishLexicon::new(),
        &path,
        &SheetSelector::Name("Keywords".into()),
        "Keyword",
        &options,
    )
    .expect("analyze workbook");
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.tables()[0].rows[0].term, "snacks");
    assert_eq!(table.tables()[1].rows[0].term, "snacks low");
}

#[test]
fn tsv_reads_column() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("keywords.tsv");
    std::fs::write(&path, "Volume\tKeyword\n10\tdiet snacks\n20\t\n30\tketo snacks\n")
        .expect("write tsv");

    let terms = read_column(&path, &SheetSelector::default(), "Keyword").expect("read tsv");
    assert_eq!(terms, vec!["diet snacks", "keto snacks"]);
}

#[test]
fn xlsx_missing_file_returns_error() {
    let dir = tempdir().expect("create tempdir");
    let missing = dir.path().join("nope.xlsx");
    let err = read_column(&missing, &SheetSelector::default(), "Keyword").unwrap_err();
    assert!(matches!(err, NgramError::Io(_)), "Unexpected error: {err}");
}

#[test]
fn xlsx_corrupt_archive_returns_error() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"this is not a zip archive").expect("write junk");
    let err = read_column(&path, &SheetSelector::default(), "Keyword").unwrap_err();
    assert!(matches!(err, NgramError::Zip(_)), "Unexpected error: {err}");
}
