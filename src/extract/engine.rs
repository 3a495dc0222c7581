//! Record assembler
//!
//! Single-pass state machine over tokenizer events. It keeps the open element path, captures
//! text for at most one matched element at a time, and hands back a finished record each time
//! the root element closes.
//!
//! Text is captured only while the matched element is the innermost open element. Closing a
//! descendant leaves the match active; only the matched element's own close writes the value.
//! If a descendant matches another column, that descendant's match replaces the outer one.

use tracing::{debug, warn};

use crate::models::Record;

use super::coerce::{CoercionError, coerce};
use super::path::PathStack;
use super::resolver::{MatchResolver, Resolution};
use super::timestamp::TimestampParser;
use super::tokenizer::XmlEvent;

/// Text capture for the single currently matched element
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMatch {
    /// Schema position of the matched column
    pub column: usize,
    /// Nesting depth of the element that activated the match
    pub depth: usize,
    pub buffer: String,
}

impl ActiveMatch {
    fn new(column: usize, depth: usize) -> Self {
        Self {
            column,
            depth,
            buffer: String::new(),
        }
    }
}

#[derive(Debug)]
enum AssemblerState {
    /// Outside the root element
    Idle,
    /// Between a root open and its close
    InRecord {
        record: Record,
        active: Option<ActiveMatch>,
    },
}

/// Event-driven record assembler for one document
pub struct RecordAssembler<'a> {
    resolver: &'a MatchResolver,
    timestamp_parsers: &'a [Option<TimestampParser>],
    path: PathStack,
    state: AssemblerState,
    emitted: usize,
    discarded: usize,
}

impl<'a> RecordAssembler<'a> {
    /// Create an assembler; `timestamp_parsers` is indexed by column position
    pub fn new(
        resolver: &'a MatchResolver,
        timestamp_parsers: &'a [Option<TimestampParser>],
    ) -> Self {
        Self {
            resolver,
            timestamp_parsers,
            path: PathStack::new(),
            state: AssemblerState::Idle,
            emitted: 0,
            discarded: 0,
        }
    }

    /// Records emitted so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Partial records dropped at document end
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn is_in_record(&self) -> bool {
        matches!(self.state, AssemblerState::InRecord { .. })
    }

    /// The current capture, if any
    pub fn active_match(&self) -> Option<&ActiveMatch> {
        match &self.state {
            AssemblerState::InRecord { active, .. } => active.as_ref(),
            AssemblerState::Idle => None,
        }
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Feed one event, returning a record when the root element closes
    pub fn handle(&mut self, event: XmlEvent) -> Result<Option<Record>, CoercionError> {
        match event {
            XmlEvent::StartDocument => {
                self.start_document();
                Ok(None)
            }
            XmlEvent::StartElement(name) => {
                self.start_element(name);
                Ok(None)
            }
            XmlEvent::Characters(text) => {
                self.characters(&text);
                Ok(None)
            }
            XmlEvent::EndElement(_) => self.end_element(),
            XmlEvent::EndDocument => {
                self.end_document();
                Ok(None)
            }
        }
    }

    fn start_document(&mut self) {
        debug!("start parsing document.");
        self.path = PathStack::new();
        self.state = AssemblerState::Idle;
    }

    fn start_element(&mut self, name: String) {
        self.path.push(name);
        let current_path = self.path.current_path();

        if self.resolver.is_root(&current_path) {
            self.state = AssemblerState::InRecord {
                record: Record::new(self.resolver.schema().len()),
                active: None,
            };
        }

        if let Resolution::Column(column) = self.resolver.resolve(&current_path)
            && let AssemblerState::InRecord { active, .. } = &mut self.state
        {
            let replaced = active.replace(ActiveMatch::new(column.index, self.path.depth()));
            if let Some(outer) = replaced {
                debug!(
                    "Element '{}' matches a column inside matched column #{}; the outer value is dropped",
                    current_path, outer.column
                );
            }
        }
    }

    fn characters(&mut self, text: &str) {
        if let AssemblerState::InRecord {
            active: Some(active),
            ..
        } = &mut self.state
            && active.depth == self.path.depth()
        {
            active.buffer.push_str(text);
        }
    }

    fn end_element(&mut self) -> Result<Option<Record>, CoercionError> {
        let depth = self.path.depth();

        if let AssemblerState::InRecord { record, active } = &mut self.state
            && active.as_ref().is_some_and(|m| m.depth == depth)
            && let Some(finished) = active.take()
        {
            let schema = self.resolver.schema();
            if let Some(column) = schema.column(finished.column) {
                let parser = self
                    .timestamp_parsers
                    .get(finished.column)
                    .and_then(Option::as_ref);
                let value = coerce(finished.buffer, column, parser)?;
                record.set(finished.column, value);
            }
        }

        let mut emitted = None;
        if self.resolver.is_root(&self.path.current_path())
            && let AssemblerState::InRecord { record, .. } =
                std::mem::replace(&mut self.state, AssemblerState::Idle)
        {
            self.emitted += 1;
            emitted = Some(record);
        }

        self.path.pop();
        Ok(emitted)
    }

    fn end_document(&mut self) {
        if let AssemblerState::InRecord { .. } =
            std::mem::replace(&mut self.state, AssemblerState::Idle)
        {
            self.discarded += 1;
            warn!("Document ended inside a root element; the partial record is discarded");
        }
        debug!(
            "end parsing document. total extracted record count is: {}",
            self.emitted
        );
    }
}
