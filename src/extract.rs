//! Multi-format text extraction (plain text, PDF, DOCX, XLSX, XLS).
//!
//! [`FormatExtractor`] turns stored bytes into one normalized text string,
//! dispatching on the [`DocumentFormat`] derived from the file extension.
//! Content is never sniffed, so a mislabeled file yields wrong or empty text.
//!
//! Every failure is returned as an [`ExtractError`]; callers that scan the
//! whole corpus collapse it to empty text.

use calamine::{Data, Range, Reader, Xls};
use doc_harness_core::extract::{DocumentFormat, ExtractError, Extractor};
use encoding_rs::{Encoding, KOI8_R, WINDOWS_1251, WINDOWS_1252};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::debug;

use crate::config::Config;

/// Maximum sheets to process in a workbook.
const MAX_SHEETS: usize = 100;
/// Maximum cells to process per sheet (avoids unbounded memory).
const MAX_CELLS_PER_SHEET: usize = 100_000;
/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// Extractor for every format the corpus accepts.
#[derive(Debug, Clone, Copy)]
pub struct FormatExtractor {
    pdf_max_pages: usize,
}

impl FormatExtractor {
    pub fn new(pdf_max_pages: usize) -> Self {
        Self { pdf_max_pages }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extract.pdf_max_pages)
    }
}

impl Default for FormatExtractor {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Extractor for FormatExtractor {
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        if bytes.is_empty() {
            return Ok(String::new());
        }
        match format {
            DocumentFormat::Text => Ok(decode_text(bytes)),
            DocumentFormat::Pdf => extract_pdf(bytes, self.pdf_max_pages),
            DocumentFormat::Docx => extract_docx(bytes),
            DocumentFormat::Xlsx => extract_xlsx(bytes),
            DocumentFormat::Xls => extract_xls(bytes),
        }
    }
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Decode text trying UTF-8 first, then the single-byte fallbacks; lossy
/// UTF-8 if none decodes cleanly.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    let fallbacks: [&'static Encoding; 3] = [WINDOWS_1251, KOI8_R, WINDOWS_1252];
    for encoding in fallbacks {
        if let Some(s) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!(encoding = encoding.name(), "decoded text with fallback encoding");
            return s.into_owned();
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

/// Text of the first `max_pages` pages joined with newlines. Pages past
/// the cap are never decoded; a page that fails contributes empty text.
fn extract_pdf(bytes: &[u8], max_pages: usize) -> Result<String, ExtractError> {
    std::panic::catch_unwind(|| extract_pdf_pages(bytes, max_pages))
        .unwrap_or_else(|_| Err(ExtractError::Pdf("PDF parser panicked".to_string())))
}

fn extract_pdf_pages(bytes: &[u8], max_pages: usize) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .take(max_pages)
        .map(|page| match doc.extract_text(&[page]) {
            Ok(text) => text,
            Err(e) => {
                debug!(page, error = %e, "page yielded no text");
                String::new()
            }
        })
        .collect();
    Ok(pages.join("\n"))
}

// ---------------------------------------------------------------------------
// OOXML shared helpers
// ---------------------------------------------------------------------------

fn open_archive(bytes: &[u8]) -> Result<Archive<'_>, ExtractError> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Ooxml(e.to_string()))
}

fn has_entry(archive: &Archive<'_>, name: &str) -> bool {
    archive.file_names().any(|n| n == name)
}

fn read_zip_entry_bounded(
    archive: &mut Archive<'_>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ExtractError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractError::Ooxml(format!("{}: {}", name, e)))?;
    let mut out = Vec::new();
    entry
        .take(max_bytes)
        .read_to_end(&mut out)
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;
    if out.len() as u64 >= max_bytes {
        return Err(ExtractError::Ooxml(format!(
            "ZIP entry {} exceeds size limit ({} bytes)",
            name, max_bytes
        )));
    }
    Ok(out)
}

fn xml_reader(xml: &[u8]) -> quick_xml::Reader<&[u8]> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    reader
}

/// Value of the attribute whose local name is `key`.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

// ---------------------------------------------------------------------------
// DOCX
// ---------------------------------------------------------------------------

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = open_archive(bytes)?;
    if !has_entry(&archive, "word/document.xml") {
        return Err(ExtractError::Ooxml(
            "word/document.xml not found".to_string(),
        ));
    }
    let xml = read_zip_entry_bounded(&mut archive, "word/document.xml", MAX_XML_ENTRY_BYTES)?;
    docx_paragraphs(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Text of each body paragraph in document order. Table content is skipped;
/// paragraphs nested inside another (text boxes) merge into the outer one.
fn docx_paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                _ if table_depth > 0 => {}
                b"p" => {
                    if paragraph_depth == 0 {
                        current.clear();
                    }
                    paragraph_depth += 1;
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                _ if table_depth > 0 => {}
                b"p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if table_depth == 0 => match e.local_name().as_ref() {
                b"p" if paragraph_depth == 0 => paragraphs.push(String::new()),
                b"tab" if paragraph_depth > 0 => current.push('\t'),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text && table_depth == 0 => {
                current.push_str(te.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

// ---------------------------------------------------------------------------
// Spreadsheets
// ---------------------------------------------------------------------------

/// One sheet as a `--- Sheet: name ---` banner followed by tab-separated rows.
fn render_sheet(name: &str, rows: Vec<Vec<String>>) -> String {
    let mut block = format!("--- Sheet: {} ---", name);
    for row in rows {
        block.push('\n');
        block.push_str(&row.join("\t"));
    }
    block
}

/// Legacy BIFF workbook, sheets in workbook order.
fn extract_xls(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut workbook: Xls<_> =
        Xls::new(Cursor::new(bytes)).map_err(|e| ExtractError::Spreadsheet(e.to_string()))?;
    let mut rendered = Vec::new();
    for name in workbook.sheet_names().into_iter().take(MAX_SHEETS) {
        match workbook.worksheet_range(&name) {
            Ok(range) => rendered.push(render_sheet(&name, range_rows(&range))),
            Err(e) => debug!(sheet = %name, error = %e, "worksheet unreadable"),
        }
    }
    Ok(rendered.join("\n\n"))
}

/// Rows of a decoded range, positioned from column A like the XLSX reader.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let first_column = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = Vec::new();
    let mut cell_count = 0usize;
    for cells in range.rows() {
        if cell_count >= MAX_CELLS_PER_SHEET {
            break;
        }
        let mut row = vec![String::new(); first_column];
        row.extend(cells.iter().map(workbook_cell_text));
        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }
        if !row.is_empty() {
            cell_count += row.iter().filter(|c| !c.is_empty()).count();
            rows.push(row);
        }
    }
    rows
}

fn workbook_cell_text(cell: &Data) -> String {
    match cell {
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// A worksheet part and the name shown in its banner.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetRef {
    name: String,
    path: String,
}

fn extract_xlsx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = open_archive(bytes)?;
    let shared_strings = if has_entry(&archive, "xl/sharedStrings.xml") {
        let xml = read_zip_entry_bounded(&mut archive, "xl/sharedStrings.xml", MAX_XML_ENTRY_BYTES)?;
        read_shared_strings(&xml)?
    } else {
        Vec::new()
    };

    let sheets = workbook_sheets(&mut archive)?;
    let mut rendered = Vec::new();
    for sheet in sheets.into_iter().take(MAX_SHEETS) {
        if !has_entry(&archive, &sheet.path) {
            debug!(sheet = %sheet.name, path = %sheet.path, "worksheet part missing");
            continue;
        }
        let xml = read_zip_entry_bounded(&mut archive, &sheet.path, MAX_XML_ENTRY_BYTES)?;
        let rows = sheet_rows(&xml, &shared_strings)?;
        rendered.push(render_sheet(&sheet.name, rows));
    }
    Ok(rendered.join("\n\n"))
}

fn read_shared_strings(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(te)) if in_text => {
                current.push_str(te.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Sheets in workbook order, resolved through the workbook relationships.
/// Falls back to `xl/worksheets/sheetN.xml` numeric order.
fn workbook_sheets(archive: &mut Archive<'_>) -> Result<Vec<SheetRef>, ExtractError> {
    let rels_path = "xl/_rels/workbook.xml.rels";
    if has_entry(archive, "xl/workbook.xml") && has_entry(archive, rels_path) {
        let workbook = read_zip_entry_bounded(archive, "xl/workbook.xml", MAX_XML_ENTRY_BYTES)?;
        let rels = read_zip_entry_bounded(archive, rels_path, MAX_XML_ENTRY_BYTES)?;
        let targets = relationship_targets(&rels)?;
        let sheets: Vec<SheetRef> = declared_sheets(&workbook)?
            .into_iter()
            .filter_map(|(name, rel_id)| {
                targets.get(&rel_id).map(|target| SheetRef {
                    name,
                    path: resolve_target(target),
                })
            })
            .collect();
        if !sheets.is_empty() {
            return Ok(sheets);
        }
    }
    Ok(list_worksheet_parts(archive))
}

/// `(name, r:id)` of each `<sheet>` in `xl/workbook.xml`.
fn declared_sheets(xml: &[u8]) -> Result<Vec<(String, String)>, ExtractError> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(id)) = (attr(&e, b"name"), attr(&e, b"id")) {
                    sheets.push((name, id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Relationship id → target from a `.rels` part.
fn relationship_targets(xml: &[u8]) -> Result<HashMap<String, String>, ExtractError> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

fn list_worksheet_parts(archive: &Archive<'_>) -> Vec<SheetRef> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/sheet") && n.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    names.sort_by_key(|name| {
        name.trim_start_matches("xl/worksheets/sheet")
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });
    names
        .into_iter()
        .map(|path| SheetRef {
            name: path
                .trim_start_matches("xl/worksheets/")
                .trim_end_matches(".xml")
                .to_string(),
            path,
        })
        .collect()
}

/// Zero-based column index from a cell reference such as `AB12`.
fn column_index(reference: &str) -> Option<usize> {
    let mut index = 0usize;
    let mut seen = false;
    for c in reference.chars().take_while(|c| c.is_ascii_alphabetic()) {
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        seen = true;
    }
    seen.then(|| index - 1)
}

/// Cell value kinds that need decoding beyond their raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Shared,
    Boolean,
    Other,
}

/// Rows of non-empty cells, positioned by column so gaps stay empty.
fn sheet_rows(xml: &[u8], shared_strings: &[String]) -> Result<Vec<Vec<String>>, ExtractError> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut value = String::new();
    let mut column = None;
    let mut kind = CellKind::Other;
    let mut in_value = false;
    let mut cell_count = 0usize;

    loop {
        if cell_count >= MAX_CELLS_PER_SHEET {
            break;
        }
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    value.clear();
                    column = attr(&e, b"r").as_deref().and_then(column_index);
                    kind = match attr(&e, b"t").as_deref() {
                        Some("s") => CellKind::Shared,
                        Some("b") => CellKind::Boolean,
                        _ => CellKind::Other,
                    };
                }
                b"v" | b"t" => in_value = true,
                _ => {}
            },
            Ok(Event::Text(te)) if in_value => {
                value.push_str(te.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    let text = cell_text(kind, value.trim(), shared_strings);
                    if !text.is_empty() {
                        let at = column.unwrap_or(row.len());
                        if row.len() <= at {
                            row.resize(at + 1, String::new());
                        }
                        row[at] = text;
                        cell_count += 1;
                    }
                }
                b"row" => {
                    if row.iter().any(|c| !c.is_empty()) {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

fn cell_text(kind: CellKind, raw: &str, shared_strings: &[String]) -> String {
    match kind {
        CellKind::Shared => raw
            .parse::<usize>()
            .ok()
            .and_then(|i| shared_strings.get(i))
            .cloned()
            .unwrap_or_default(),
        CellKind::Boolean => match raw {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            other => other.to_string(),
        },
        CellKind::Other => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            for (name, body) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    fn docx(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        zip_with(&[("word/document.xml", &xml)])
    }

    fn extract(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        FormatExtractor::default().extract(format, bytes)
    }

    #[test]
    fn utf8_text_passes_through() {
        assert_eq!(decode_text("Выручка выросла".as_bytes()), "Выручка выросла");
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello"), "hello");
    }

    #[test]
    fn windows_1251_text_is_decoded() {
        // "Привет" in windows-1251
        let bytes = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(decode_text(&bytes), "Привет");
    }

    #[test]
    fn empty_bytes_yield_empty_text_for_every_format() {
        for format in [
            DocumentFormat::Text,
            DocumentFormat::Pdf,
            DocumentFormat::Docx,
            DocumentFormat::Xlsx,
            DocumentFormat::Xls,
        ] {
            assert_eq!(extract(format, b"").unwrap(), "");
        }
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract(DocumentFormat::Pdf, b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    /// PDF with one page per entry; a `None` page points at a content
    /// stream that does not exist.
    fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding"
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id }
        });
        let mut kids = Vec::new();
        for page in pages {
            let contents_id = match page {
                Some(text) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 12.into()]),
                            Operation::new("Td", vec![72.into(), 700.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                }
                None => (9999, 0),
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()]
            });
            kids.push(Object::from(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id
        });
        doc.trailer.set("Root", catalog_id);
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn pdf_text_stops_at_page_cap() {
        let bytes = pdf_with_pages(&[
            Some("first page phrase"),
            Some("second page phrase"),
            Some("third page phrase"),
        ]);
        let text = FormatExtractor::new(2)
            .extract(DocumentFormat::Pdf, &bytes)
            .unwrap();
        assert!(text.contains("first page phrase"), "got: {:?}", text);
        assert!(text.contains("second page phrase"), "got: {:?}", text);
        assert!(!text.contains("third page phrase"));
    }

    #[test]
    fn failing_pdf_page_contributes_nothing() {
        let bytes = pdf_with_pages(&[Some("before the gap"), None, Some("after the gap")]);
        let text = extract(DocumentFormat::Pdf, &bytes).unwrap();
        assert!(text.contains("before the gap"), "got: {:?}", text);
        assert!(text.contains("after the gap"), "got: {:?}", text);
    }

    #[test]
    fn invalid_containers_return_format_errors() {
        assert!(matches!(
            extract(DocumentFormat::Docx, b"not a zip").unwrap_err(),
            ExtractError::Ooxml(_)
        ));
        assert!(matches!(
            extract(DocumentFormat::Xlsx, b"\xD0\xCF\x11\xE0 legacy xls").unwrap_err(),
            ExtractError::Ooxml(_)
        ));
        assert!(matches!(
            extract(DocumentFormat::Xls, b"\xD0\xCF\x11\xE0 truncated").unwrap_err(),
            ExtractError::Spreadsheet(_)
        ));
    }

    #[test]
    fn workbook_range_rows_start_at_column_a() {
        use calamine::Cell;
        let range = Range::from_sparse(vec![
            Cell::new((0, 1), Data::String("Region".to_string())),
            Cell::new((0, 3), Data::Float(42.5)),
            Cell::new((2, 2), Data::Bool(true)),
        ]);
        assert_eq!(
            range_rows(&range),
            vec![
                vec![
                    String::new(),
                    "Region".to_string(),
                    String::new(),
                    "42.5".to_string()
                ],
                vec![String::new(), String::new(), "TRUE".to_string()],
            ]
        );
        assert_eq!(
            render_sheet("Q1", range_rows(&range)),
            "--- Sheet: Q1 ---\n\tRegion\t\t42.5\n\t\tTRUE"
        );
    }

    #[test]
    fn docx_without_document_part_is_error() {
        let bytes = zip_with(&[("word/styles.xml", "<styles/>")]);
        assert!(matches!(
            extract(DocumentFormat::Docx, &bytes).unwrap_err(),
            ExtractError::Ooxml(_)
        ));
    }

    #[test]
    fn docx_paragraphs_are_joined_with_newlines() {
        let bytes = docx(
            r#"<w:p><w:r><w:t>Quarterly</w:t></w:r><w:r><w:t xml:space="preserve"> report</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Revenue</w:t><w:tab/><w:t>12%</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            extract(DocumentFormat::Docx, &bytes).unwrap(),
            "Quarterly report\n\nRevenue\t12%"
        );
    }

    #[test]
    fn docx_tables_are_skipped() {
        let bytes = docx(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract(DocumentFormat::Docx, &bytes).unwrap(), "Before\nAfter");
    }

    #[test]
    fn docx_entities_are_unescaped() {
        let bytes = docx(r#"<w:p><w:r><w:t>R&amp;D &lt;budget&gt;</w:t></w:r></w:p>"#);
        assert_eq!(extract(DocumentFormat::Docx, &bytes).unwrap(), "R&D <budget>");
    }

    const WORKBOOK: &str = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Summary" sheetId="1" r:id="rId2"/><sheet name="Data" sheetId="2" r:id="rId1"/></sheets></workbook>"#;
    const RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#;
    const SHARED: &str = r#"<sst><si><t>Region</t></si><si><r><t>Reve</t></r><r><t>nue</t></r></si></sst>"#;
    const DATA_SHEET: &str = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>North</t></is></c><c r="C2"><v>42.5</v></c></row><row r="3"><c r="A3"/></row></sheetData></worksheet>"#;
    const SUMMARY_SHEET: &str = r#"<worksheet><sheetData><row r="1"><c r="A1" t="b"><v>1</v></c></row></sheetData></worksheet>"#;

    #[test]
    fn spreadsheet_follows_workbook_order_with_banners() {
        let bytes = zip_with(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", DATA_SHEET),
            ("xl/worksheets/sheet2.xml", SUMMARY_SHEET),
        ]);
        let text = extract(DocumentFormat::Xlsx, &bytes).unwrap();
        assert_eq!(
            text,
            "--- Sheet: Summary ---\nTRUE\n\n--- Sheet: Data ---\nRegion\tRevenue\nNorth\t\t42.5"
        );
    }

    #[test]
    fn spreadsheet_without_workbook_uses_sheet_numbers() {
        let bytes = zip_with(&[
            ("xl/worksheets/sheet10.xml", SUMMARY_SHEET),
            ("xl/worksheets/sheet2.xml", DATA_SHEET),
        ]);
        let text = extract(DocumentFormat::Xlsx, &bytes).unwrap();
        let sheet2 = text.find("--- Sheet: sheet2 ---").unwrap();
        let sheet10 = text.find("--- Sheet: sheet10 ---").unwrap();
        assert!(sheet2 < sheet10);
        // No shared strings part: shared cells render empty, inline strings survive.
        assert!(text.contains("North"));
    }

    #[test]
    fn column_references_map_to_indices() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("C7"), Some(2));
        assert_eq!(column_index("AA3"), Some(26));
        assert_eq!(column_index("12"), None);
    }

    #[test]
    fn relationship_targets_resolve_under_xl() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
    }
}
