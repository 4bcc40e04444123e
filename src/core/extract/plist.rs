use crate::utils::error::{AtlasError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

// dict/array 最大巢狀層數
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    /// 依文件順序保存的 key/value
    Dict(Vec<(String, PlistValue)>),
    Array(Vec<PlistValue>),
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(String),
    /// Base64 內容，已去除空白
    Data(String),
}

impl PlistValue {
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn as_dict(&self) -> Option<&[(String, PlistValue)]> {
        match self {
            PlistValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlistValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// 純量值轉成文字，打包工具有時寫成字串、有時寫成數字
    pub fn to_text(&self) -> Option<String> {
        match self {
            PlistValue::String(s) => Some(s.clone()),
            PlistValue::Integer(i) => Some(i.to_string()),
            PlistValue::Real(r) => Some(r.to_string()),
            _ => None,
        }
    }
}

/// 以 quick-xml 解析 XML plist，任何格式錯誤都回傳 ParseFailure
pub fn parse_plist(text: &str) -> Result<PlistValue> {
    Decoder::new(text).document()
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

struct Decoder<'a> {
    reader: Reader<&'a [u8]>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        Self { reader, depth: 0 }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting too deep (limit {})", MAX_DEPTH)));
        }
        Ok(())
    }

    fn error(&self, message: impl std::fmt::Display) -> AtlasError {
        AtlasError::parse(format!(
            "{} (at byte {})",
            message,
            self.reader.buffer_position()
        ))
    }

    fn unexpected(&self, event: &Event<'_>, expected: &str) -> AtlasError {
        let found = match event {
            Event::Start(e) => format!("<{}>", tag_name(e)),
            Event::Empty(e) => format!("<{}/>", tag_name(e)),
            Event::End(e) => format!("</{}>", String::from_utf8_lossy(e.name().as_ref())),
            Event::Text(_) | Event::CData(_) => "text".to_string(),
            Event::Eof => "end of document".to_string(),
            _ => "markup".to_string(),
        };
        self.error(format!("expected {}, found {}", expected, found))
    }

    /// 下一個有內容的事件，略過宣告、DOCTYPE 與註解
    fn next(&mut self) -> Result<Event<'a>> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.error(e))?;
            match event {
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => continue,
                other => return Ok(other),
            }
        }
    }

    fn document(&mut self) -> Result<PlistValue> {
        let value = match self.next()? {
            Event::Start(start) if start.name().as_ref() == b"plist" => {
                let value = match self.next()? {
                    Event::End(end) if end.name().as_ref() == b"plist" => {
                        return Err(self.error("empty <plist> element"));
                    }
                    event => self.value(event)?,
                };
                match self.next()? {
                    Event::End(end) if end.name().as_ref() == b"plist" => value,
                    other => return Err(self.unexpected(&other, "</plist>")),
                }
            }
            Event::Eof => return Err(self.error("document has no root element")),
            // 沒有 <plist> 外層時直接當成值解析
            event => self.value(event)?,
        };

        match self.next()? {
            Event::Eof => Ok(value),
            other => Err(self.unexpected(&other, "end of document")),
        }
    }

    fn value(&mut self, event: Event<'a>) -> Result<PlistValue> {
        match event {
            Event::Start(start) => {
                let tag = tag_name(&start);
                match tag.as_str() {
                    "dict" => self.dict(),
                    "array" => self.array(),
                    "string" => Ok(PlistValue::String(self.text("string")?)),
                    "integer" => {
                        let raw = self.text("integer")?;
                        raw.trim()
                            .parse()
                            .map(PlistValue::Integer)
                            .map_err(|_| self.error(format!("invalid integer '{}'", raw)))
                    }
                    "real" => {
                        let raw = self.text("real")?;
                        raw.trim()
                            .parse()
                            .map(PlistValue::Real)
                            .map_err(|_| self.error(format!("invalid real '{}'", raw)))
                    }
                    "date" => Ok(PlistValue::Date(self.text("date")?)),
                    "data" => {
                        let raw = self.text("data")?;
                        Ok(PlistValue::Data(
                            raw.chars().filter(|c| !c.is_whitespace()).collect(),
                        ))
                    }
                    "true" | "false" => {
                        self.text(&tag)?;
                        Ok(PlistValue::Boolean(tag == "true"))
                    }
                    other => Err(self.error(format!("unsupported element <{}>", other))),
                }
            }
            Event::Empty(empty) => match tag_name(&empty).as_str() {
                "true" => Ok(PlistValue::Boolean(true)),
                "false" => Ok(PlistValue::Boolean(false)),
                "string" => Ok(PlistValue::String(String::new())),
                "data" => Ok(PlistValue::Data(String::new())),
                "dict" => Ok(PlistValue::Dict(Vec::new())),
                "array" => Ok(PlistValue::Array(Vec::new())),
                other => Err(self.error(format!("unsupported element <{}/>", other))),
            },
            other => Err(self.unexpected(&other, "a value element")),
        }
    }

    fn dict(&mut self) -> Result<PlistValue> {
        self.enter()?;
        let mut entries = Vec::new();
        loop {
            match self.next()? {
                Event::End(end) if end.name().as_ref() == b"dict" => {
                    self.depth -= 1;
                    return Ok(PlistValue::Dict(entries));
                }
                Event::Start(start) if start.name().as_ref() == b"key" => {
                    let key = self.text("key")?;
                    let event = self.next()?;
                    let value = self.value(event)?;
                    entries.push((key, value));
                }
                other => return Err(self.unexpected(&other, "<key> or </dict>")),
            }
        }
    }

    fn array(&mut self) -> Result<PlistValue> {
        self.enter()?;
        let mut items = Vec::new();
        loop {
            match self.next()? {
                Event::End(end) if end.name().as_ref() == b"array" => {
                    self.depth -= 1;
                    return Ok(PlistValue::Array(items));
                }
                event => items.push(self.value(event)?),
            }
        }
    }

    /// 讀取文字內容直到 `tag` 的結束標籤
    fn text(&mut self, tag: &str) -> Result<String> {
        let mut content = String::new();
        loop {
            match self.next()? {
                Event::Text(text) => {
                    let unescaped = text.unescape().map_err(|e| self.error(e))?;
                    content.push_str(&unescaped);
                }
                Event::CData(data) => content.push_str(&String::from_utf8_lossy(&data)),
                Event::End(end) if end.name().as_ref() == tag.as_bytes() => return Ok(content),
                other => return Err(self.unexpected(&other, &format!("</{}>", tag))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
    <dict>
        <key>name</key>
        <string>Fish &amp; Chips</string>
        <key>count</key>
        <integer>3</integer>
        <key>scale</key>
        <real>0.5</real>
        <key>flags</key>
        <array>
            <true/>
            <false/>
        </array>
        <key>aliases</key>
        <array/>
        <!-- comment -->
        <key>nested</key>
        <dict>
            <key>empty</key>
            <string></string>
        </dict>
    </dict>
</plist>"#;

    #[test]
    fn test_parse_nested_document() {
        let root = parse_plist(DOC).unwrap();

        assert_eq!(root.get("name").and_then(PlistValue::as_str), Some("Fish & Chips"));
        assert_eq!(root.get("count"), Some(&PlistValue::Integer(3)));
        assert_eq!(root.get("scale").and_then(PlistValue::to_text).as_deref(), Some("0.5"));
        assert_eq!(
            root.get("flags"),
            Some(&PlistValue::Array(vec![
                PlistValue::Boolean(true),
                PlistValue::Boolean(false)
            ]))
        );
        assert_eq!(root.get("aliases"), Some(&PlistValue::Array(vec![])));
        assert_eq!(
            root.get("nested")
                .and_then(|n| n.get("empty"))
                .and_then(PlistValue::as_str),
            Some("")
        );
    }

    const UNORDERED: &str = "<plist><dict>\
        <key>b</key><string>1</string>\
        <key>a</key><string>2</string>\
        </dict></plist>";

    #[test]
    fn test_dict_keeps_document_order() {
        let root = parse_plist(UNORDERED).unwrap();
        let keys: Vec<&str> = root
            .as_dict()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_malformed_markup_is_parse_failure() {
        let broken = "<plist><dict><key>frames</key><dict></plist>";
        assert!(matches!(
            parse_plist(broken),
            Err(AtlasError::ParseFailure { .. })
        ));

        let value_without_key = "<plist><dict><string>x</string></dict></plist>";
        assert!(matches!(
            parse_plist(value_without_key),
            Err(AtlasError::ParseFailure { .. })
        ));

        assert!(parse_plist("").is_err());
        assert!(parse_plist("<plist><integer>abc</integer></plist>").is_err());
    }

    fn nested_arrays(depth: usize, closed: bool) -> String {
        let mut doc = String::from("<plist><dict><key>frames</key>");
        doc.push_str(&"<array>".repeat(depth));
        if closed {
            doc.push_str(&"</array>".repeat(depth));
            doc.push_str("</dict></plist>");
        }
        doc
    }

    #[test]
    fn test_deep_nesting_is_parse_failure() {
        let result = parse_plist(&nested_arrays(5000, false));
        match result {
            Err(AtlasError::ParseFailure { message }) => {
                assert!(message.contains("nesting too deep"), "{}", message)
            }
            other => panic!("expected ParseFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_below_limit_parses() {
        let root = parse_plist(&nested_arrays(100, true)).unwrap();
        assert!(matches!(root.get("frames"), Some(PlistValue::Array(_))));
    }
}
