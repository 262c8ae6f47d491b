//! Reads a single named column of text out of a spreadsheet.
//!
//! `.xlsx`/`.xlsm` workbooks are opened as ZIP archives and their XML parts
//! parsed with `quick-xml`; `.csv`/`.tsv` files go through the `csv` crate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::error::{NgramError, Result};

/// Which sheet of a workbook to read: a name, or a zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(i) => SheetSelector::Index(i),
            Err(_) => SheetSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "{i}"),
            SheetSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Returns the values of `column` (matched against the header row) in row order.
///
/// Blank and missing cells are skipped.
pub fn read_column<P: AsRef<Path>>(
    path: P,
    sheet: &SheetSelector,
    column: &str,
) -> Result<Vec<String>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let rows = match ext.as_str() {
        "xlsx" | "xlsm" => read_xlsx_rows(path, sheet)?,
        "csv" => read_delimited_rows(path, b',')?,
        "tsv" => read_delimited_rows(path, b'\t')?,
        _ => return Err(NgramError::UnsupportedFormat(path.to_path_buf())),
    };
    let values = column_values(rows, column)?;
    debug!(
        "Read {} values from column {:?} of {}",
        values.len(),
        column,
        path.display()
    );
    Ok(values)
}

/// Picks `column` out of rows whose first non-empty row is the header.
fn column_values(rows: Vec<Vec<String>>, column: &str) -> Result<Vec<String>> {
    let mut rows = rows
        .into_iter()
        .skip_while(|row| row.iter().all(|cell| cell.trim().is_empty()));
    let header = rows.next().unwrap_or_default();
    let idx = header
        .iter()
        .position(|cell| cell.trim() == column)
        .ok_or_else(|| NgramError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut skipped = 0usize;
    let mut values = Vec::new();
    for row in rows {
        match row.into_iter().nth(idx) {
            Some(cell) if !cell.trim().is_empty() => values.push(cell),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("Skipped {skipped} blank cells in column {column:?}");
    }
    Ok(values)
}

// ---- Delimited text ----

fn read_delimited_rows(p: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(p)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

// ---- Office Open XML workbooks ----

struct SheetEntry {
    name: String,
    rel_id: Option<String>,
}

fn read_xlsx_rows(p: &Path, sheet: &SheetSelector) -> Result<Vec<Vec<String>>> {
    let file = File::open(p)?;
    let mut zip = ZipArchive::new(file)?;

    let workbook = read_part(&mut zip, "xl/workbook.xml")?
        .ok_or_else(|| NgramError::Xml("missing xl/workbook.xml".to_string()))?;
    let sheets = parse_workbook_xml(&workbook)?;
    let position = resolve_sheet(&sheets, sheet)?;
    let entry = &sheets[position];

    let rels = match read_part(&mut zip, "xl/_rels/workbook.xml.rels")? {
        Some(xml) => parse_relationships_xml(&xml)?,
        None => HashMap::new(),
    };
    let sheet_part = entry
        .rel_id
        .as_ref()
        .and_then(|id| rels.get(id))
        .map(|target| resolve_target(target))
        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", position + 1));
    debug!("Reading sheet {:?} from {}", entry.name, sheet_part);

    let shared = match read_part(&mut zip, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings_xml(&xml)?,
        None => Vec::new(),
    };
    let sheet_xml = read_part(&mut zip, &sheet_part)?
        .ok_or_else(|| NgramError::MissingSheet(format!("{} ({})", entry.name, sheet_part)))?;
    parse_sheet_xml(&sheet_xml, &shared)
}

fn read_part(zip: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut part = match zip.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn resolve_sheet(sheets: &[SheetEntry], selector: &SheetSelector) -> Result<usize> {
    let by_name = |name: &str| sheets.iter().position(|s| s.name == name);
    let found = match selector {
        SheetSelector::Name(name) => by_name(name.as_str()),
        // a sheet literally named "2" wins over the third sheet
        SheetSelector::Index(i) => {
            by_name(i.to_string().as_str()).or(Some(*i).filter(|i| *i < sheets.len()))
        }
    };
    found.ok_or_else(|| {
        let available: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        NgramError::MissingSheet(format!("{selector} (available: {})", available.join(", ")))
    })
}

/// Relationship targets are relative to `xl/` unless they start with `/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

fn parse_workbook_xml(xml: &str) -> Result<Vec<SheetEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if local_name(e.name().as_ref()) == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                    match (attr.key.prefix().is_some(), local_name(attr.key.as_ref())) {
                        (false, b"name") => name = Some(value),
                        (true, b"id") => rel_id = Some(value),
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    sheets.push(SheetEntry { name, rel_id });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

fn parse_relationships_xml(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e)
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let id = attribute(&e, b"Id")?;
                let target = attribute(&e, b"Target")?;
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

fn parse_shared_strings_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    // phonetic runs (<rPh>) repeat the reading of the string, not its content
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"si" => current.clear(),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if local_name(e.name().as_ref()) == b"si" => {
                strings.push(String::new());
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Text(t) if in_text && !in_phonetic => {
                current.push_str(&t.unescape().map_err(xml_error)?);
            }
            Event::CData(t) if in_text && !in_phonetic => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

struct CellState {
    column: usize,
    kind: Option<String>,
    value: String,
}

/// Cells of a worksheet as dense rows (missing cells are empty strings).
fn parse_sheet_xml(xml: &str, shared: &[String]) -> Result<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();

    let mut row_number = 0usize;
    let mut next_column = 0usize;
    let mut cell: Option<CellState> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"row" => {
                    row_number = row_attribute(&e)?.unwrap_or(row_number + 1);
                    next_column = 0;
                }
                b"c" => cell = Some(start_cell(&e, &mut next_column)?),
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"row" => {
                    row_number = row_attribute(&e)?.unwrap_or(row_number + 1);
                    next_column = 0;
                }
                b"c" => {
                    start_cell(&e, &mut next_column)?;
                }
                _ => {}
            },
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(done) = cell.take() {
                        let text = cell_text(&done, shared);
                        if !text.is_empty() {
                            rows.entry(row_number)
                                .or_default()
                                .insert(done.column, text);
                        }
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_value => {
                if let Some(c) = cell.as_mut() {
                    c.value.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(t) if in_value => {
                if let Some(c) = cell.as_mut() {
                    c.value.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rows
        .into_values()
        .map(|cells| {
            let width = cells.keys().next_back().map_or(0, |last| last + 1);
            let mut dense = vec![String::new(); width];
            for (col, text) in cells {
                dense[col] = text;
            }
            dense
        })
        .collect())
}

fn start_cell(e: &BytesStart<'_>, next_column: &mut usize) -> Result<CellState> {
    let column = attribute(e, b"r")?
        .and_then(|r| column_index(&r))
        .unwrap_or(*next_column);
    *next_column = column + 1;
    Ok(CellState {
        column,
        kind: attribute(e, b"t")?,
        value: String::new(),
    })
}

fn cell_text(cell: &CellState, shared: &[String]) -> String {
    match cell.kind.as_deref() {
        Some("s") => cell
            .value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i))
            .cloned()
            .unwrap_or_default(),
        Some("b") => match cell.value.trim() {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            other => other.to_string(),
        },
        _ => cell.value.clone(),
    }
}

fn row_attribute(e: &BytesStart<'_>) -> Result<Option<usize>> {
    Ok(attribute(e, b"r")?.and_then(|r| r.trim().parse().ok()))
}

/// Last column of a worksheet (`XFD`).
const MAX_COLUMNS: usize = 16_384;

/// Zero-based column of an `A1`-style reference. `None` past `XFD`.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut number = 0usize;
    for b in letters {
        number = number
            .checked_mul(26)?
            .checked_add((b.to_ascii_uppercase() - b'A') as usize + 1)?;
        if number > MAX_COLUMNS {
            return None;
        }
    }
    Some(number - 1)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned()));
        }
    }
    Ok(None)
}

fn xml_error<E: fmt::Display>(e: E) -> NgramError {
    NgramError::Xml(e.to_string())
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}
