//! XML event source backed by quick-xml
//!
//! Adapts `quick_xml::Reader` to the five events the assembler consumes. End-tag names are
//! checked by the reader, so a mismatched close surfaces as a tokenizer error. Line endings in
//! text are normalized to `\n`.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::io::BufRead;

use super::ExtractError;

/// Event delivered to the record assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    StartDocument,
    /// Element open, carrying the qualified name
    StartElement(String),
    /// Character data, already entity-unescaped and never trimmed
    Characters(String),
    /// Element close, carrying the qualified name
    EndElement(String),
    EndDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Finished,
}

/// Pull tokenizer over one logical input
pub struct XmlTokenizer<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    input: String,
    phase: Phase,
    pending_end: Option<String>,
}

impl<R: BufRead> XmlTokenizer<R> {
    /// Create a tokenizer; `input` names the source in error messages
    pub fn new(source: R, input: impl Into<String>) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::with_capacity(8 * 1024),
            input: input.into(),
            phase: Phase::NotStarted,
            pending_end: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Read the next event, or `None` after `EndDocument` has been returned
    ///
    /// Empty-element tags yield an open followed by a close. Comments, processing
    /// instructions, declarations, and doctypes are skipped. Attributes are not carried.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ExtractError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(XmlEvent::EndElement(name)));
        }

        match self.phase {
            Phase::NotStarted => {
                self.phase = Phase::Running;
                return Ok(Some(XmlEvent::StartDocument));
            }
            Phase::Finished => return Ok(None),
            Phase::Running => {}
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(tokenizer_error(
                        &self.input,
                        self.reader.buffer_position() as u64,
                        e.to_string(),
                    ));
                }
            };
            let decoder = self.reader.decoder();
            let position = self.reader.buffer_position() as u64;
            let fail = |message: String| tokenizer_error(&self.input, position, message);

            match event {
                Event::Start(e) => {
                    let qname = e.name();
                    let name = decoder
                        .decode(qname.as_ref())
                        .map_err(|e| fail(e.to_string()))?
                        .into_owned();
                    return Ok(Some(XmlEvent::StartElement(name)));
                }
                Event::Empty(e) => {
                    let qname = e.name();
                    let name = decoder
                        .decode(qname.as_ref())
                        .map_err(|e| fail(e.to_string()))?
                        .into_owned();
                    self.pending_end = Some(name.clone());
                    return Ok(Some(XmlEvent::StartElement(name)));
                }
                Event::End(e) => {
                    let qname = e.name();
                    let name = decoder
                        .decode(qname.as_ref())
                        .map_err(|e| fail(e.to_string()))?
                        .into_owned();
                    return Ok(Some(XmlEvent::EndElement(name)));
                }
                Event::Text(e) => {
                    let raw = decoder.decode(&e).map_err(|e| fail(e.to_string()))?;
                    let normalized = normalize_line_endings(&raw);
                    let text = unescape(&normalized).map_err(|e| fail(e.to_string()))?;
                    return Ok(Some(XmlEvent::Characters(text.into_owned())));
                }
                Event::CData(e) => {
                    let raw = decoder.decode(&e).map_err(|e| fail(e.to_string()))?;
                    let text = normalize_line_endings(&raw).into_owned();
                    return Ok(Some(XmlEvent::Characters(text)));
                }
                Event::Eof => {
                    self.phase = Phase::Finished;
                    return Ok(Some(XmlEvent::EndDocument));
                }
                _ => continue,
            }
        }
    }
}

/// XML end-of-line handling: `\r\n` and a lone `\r` both become `\n`
///
/// Applied to raw text before entity expansion, so a `&#13;` reference still yields `\r`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

fn tokenizer_error(input: &str, position: u64, message: String) -> ExtractError {
    ExtractError::Tokenizer {
        input: input.to_string(),
        position,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(xml: &str) -> Vec<XmlEvent> {
        let mut tokenizer = XmlTokenizer::new(xml.as_bytes(), "test.xml");
        let mut events = Vec::new();
        while let Some(event) = tokenizer.next_event().unwrap() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_basic_event_sequence() {
        let events = events("<?xml version=\"1.0\"?><a><b>hi</b></a>");
        assert_eq!(
            events,
            vec![
                XmlEvent::StartDocument,
                XmlEvent::StartElement("a".to_string()),
                XmlEvent::StartElement("b".to_string()),
                XmlEvent::Characters("hi".to_string()),
                XmlEvent::EndElement("b".to_string()),
                XmlEvent::EndElement("a".to_string()),
                XmlEvent::EndDocument,
            ]
        );
    }

    #[test]
    fn test_empty_element_yields_open_and_close() {
        let events = events("<a><b attr=\"1\"/></a>");
        assert_eq!(
            events[2..4],
            [
                XmlEvent::StartElement("b".to_string()),
                XmlEvent::EndElement("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_is_unescaped_and_not_trimmed() {
        let events = events("<a>  x &amp; y\n</a>");
        assert_eq!(events[2], XmlEvent::Characters("  x & y\n".to_string()));
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let events = events("<a>line1\r\nline2\rline3</a>");
        assert_eq!(
            events[2],
            XmlEvent::Characters("line1\nline2\nline3".to_string())
        );

        let events = self::events("<a><![CDATA[x\r\ny]]></a>");
        assert_eq!(events[2], XmlEvent::Characters("x\ny".to_string()));
    }

    #[test]
    fn test_character_reference_carriage_return_is_kept() {
        let events = events("<a>x&#13;y</a>");
        assert_eq!(events[2], XmlEvent::Characters("x\ry".to_string()));
    }

    #[test]
    fn test_cdata_is_character_data() {
        let events = events("<a><![CDATA[<raw> & text]]></a>");
        assert_eq!(events[2], XmlEvent::Characters("<raw> & text".to_string()));
    }

    #[test]
    fn test_comments_and_instructions_are_skipped() {
        let events = events("<a><!-- note --><?pi data?></a>");
        assert_eq!(
            events,
            vec![
                XmlEvent::StartDocument,
                XmlEvent::StartElement("a".to_string()),
                XmlEvent::EndElement("a".to_string()),
                XmlEvent::EndDocument,
            ]
        );
    }

    #[test]
    fn test_qualified_names_are_kept() {
        let events = events("<ns:a xmlns:ns=\"urn:x\"></ns:a>");
        assert_eq!(events[1], XmlEvent::StartElement("ns:a".to_string()));
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let mut tokenizer = XmlTokenizer::new("<a><b></a>".as_bytes(), "broken.xml");
        let result = loop {
            match tokenizer.next_event() {
                Ok(Some(_)) => continue,
                other => break other,
            }
        };
        match result {
            Err(ExtractError::Tokenizer { input, .. }) => assert_eq!(input, "broken.xml"),
            other => panic!("expected tokenizer error, got {:?}", other),
        }
    }

    #[test]
    fn test_none_after_end_document() {
        let mut tokenizer = XmlTokenizer::new("<a/>".as_bytes(), "t");
        while tokenizer.next_event().unwrap().is_some() {}
        assert_eq!(tokenizer.next_event().unwrap(), None);
    }
}
