use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::infrastructure::ProtocolError;

/// docx 包内正文部件
const DOCX_BODY_PART: &str = "word/document.xml";

/// 文档文本提取接口
///
/// 返回按原顺序排列、去除首尾空白的非空段落。
pub trait TextExtractor: Send + Sync {
    /// 支持的扩展名（小写，不含点）
    fn extensions(&self) -> &[&'static str];

    fn extract(&self, path: &Path) -> Result<Vec<String>, ProtocolError>;
}

/// UTF-8 纯文本提取器，每一行视为一个段落
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn extract(&self, path: &Path) -> Result<Vec<String>, ProtocolError> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ProtocolError::extraction(format!("{} is not valid UTF-8 text", path.display())))?;

        Ok(paragraphs(content.trim_start_matches('\u{feff}')))
    }
}

pub(crate) fn paragraphs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word（.docx）提取器
///
/// 读取 `word/document.xml` 中正文的段落（`w:p`），表格内的段落不计入。
/// `w:tab` 转为制表符，`w:br` 转为空格。
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["docx"]
    }

    fn extract(&self, path: &Path) -> Result<Vec<String>, ProtocolError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| ProtocolError::extraction(format!("{} is not a docx package: {}", path.display(), e)))?;

        let mut xml = String::new();
        archive
            .by_name(DOCX_BODY_PART)
            .map_err(|e| ProtocolError::extraction(format!("{}: {}", DOCX_BODY_PART, e)))?
            .read_to_string(&mut xml)?;

        body_paragraphs(&xml)
    }
}

/// 从 document.xml 中取出正文段落文本
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ProtocolError> {
    let mut reader = Reader::from_str(xml);
    let mut result = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ProtocolError::extraction(format!("malformed document.xml at {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if table_depth == 0 => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if table_depth == 0 => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push(' '),
                _ => {}
            },
            Event::Text(text) if in_text && table_depth == 0 => {
                let text = text
                    .unescape()
                    .map_err(|e| ProtocolError::extraction(format!("bad text in document.xml: {}", e)))?;
                current.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" if table_depth == 0 => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        result.push(paragraph.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(result)
}

/// 按扩展名分派到具体提取器
pub struct DocumentExtractor {
    extractors: Vec<Box<dyn TextExtractor>>,
    extensions: Vec<&'static str>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(vec![Box::new(DocxExtractor), Box::new(PlainTextExtractor)])
    }
}

impl DocumentExtractor {
    pub fn new(extractors: Vec<Box<dyn TextExtractor>>) -> Self {
        let extensions = extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect();
        Self { extractors, extensions }
    }
}

impl TextExtractor for DocumentExtractor {
    fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    fn extract(&self, path: &Path) -> Result<Vec<String>, ProtocolError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let extractor = self
            .extractors
            .iter()
            .find(|e| e.extensions().iter().any(|x| *x == ext))
            .ok_or_else(|| ProtocolError::UnsupportedFileType {
                path: path.display().to_string(),
                allowed: self
                    .extensions
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        extractor.extract(path)
    }
}


#[cfg(test)]
mod tests {
    use super::docx_fixture::{paragraph, write_docx};
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_text_paragraphs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}  Договор поставки  \n\n1. Предмет договора\r\n   \n").unwrap();

        let paragraphs = PlainTextExtractor.extract(file.path()).unwrap();
        assert_eq!(paragraphs, vec!["Договор поставки", "1. Предмет договора"]);
    }

    #[test]
    fn test_invalid_utf8_is_extraction_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = PlainTextExtractor.extract(file.path()).unwrap_err();
        assert!(matches!(err, ProtocolError::Extraction { .. }));
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.docx");
        let body = [
            paragraph(&["  ДОГОВОР ", "ПОСТАВКИ  "]),
            "<w:p/>".to_string(),
            paragraph(&["   "]),
            paragraph(&["1. Поставщик уплачивает штраф &amp; пени"]),
            r#"<w:p><w:r><w:t>Срок</w:t><w:tab/><w:t>5 дней</w:t><w:br/><w:t>далее</w:t></w:r></w:p>"#.to_string(),
        ]
        .concat();
        write_docx(&path, &body);

        let paragraphs = DocxExtractor.extract(&path).unwrap();
        assert_eq!(
            paragraphs,
            vec![
                "ДОГОВОР ПОСТАВКИ",
                "1. Поставщик уплачивает штраф & пени",
                "Срок\t5 дней далее",
            ]
        );
    }

    #[test]
    fn test_docx_skips_table_paragraphs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.docx");
        let body = format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            paragraph(&["до таблицы"]),
            paragraph(&["в ячейке"]),
            paragraph(&["после таблицы"]),
        );
        write_docx(&path, &body);

        let paragraphs = DocxExtractor.extract(&path).unwrap();
        assert_eq!(paragraphs, vec!["до таблицы", "после таблицы"]);
    }

    #[test]
    fn test_not_a_docx_package() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        write!(file, "это не zip").unwrap();

        let err = DocxExtractor.extract(file.path()).unwrap_err();
        assert!(matches!(err, ProtocolError::Extraction { .. }));
    }

    #[test]
    fn test_document_extractor_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("a.DOCX");
        write_docx(&docx, &paragraph(&["из docx"]));
        let txt = dir.path().join("b.txt");
        std::fs::write(&txt, "из txt\n").unwrap();

        let extractor = DocumentExtractor::default();
        assert_eq!(extractor.extensions(), &["docx", "txt"]);
        assert_eq!(extractor.extract(&docx).unwrap(), vec!["из docx"]);
        assert_eq!(extractor.extract(&txt).unwrap(), vec!["из txt"]);

        let err = extractor.extract(&dir.path().join("c.pdf")).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedFileType { .. }));
    }
}
