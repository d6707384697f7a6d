//! Text extraction from content parts.
//!
//! Extraction is lazy: [`ContentExtractor::fragments`] returns a fresh
//! iterator over the text nodes of one part each time it is called, so memory
//! stays proportional to a single part.

use crate::error::{Error, Result};
use crate::model::ContentLocation;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Local element names that end a line of text (`w:p`, `a:p`).
const PARAGRAPH_ELEMENTS: &[&[u8]] = &[b"p"];

/// Local element names of explicit breaks (`w:br`, `w:cr`).
const BREAK_ELEMENTS: &[&[u8]] = &[b"br", b"cr"];

/// A piece of text taken from one text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Zone the text came from
    pub location: ContentLocation,
    /// Unescaped text
    pub text: String,
    /// Zero-based line the fragment belongs to; advances at paragraph ends and breaks
    pub line: usize,
}

/// Extracts text from one XML content part.
#[derive(Debug, Clone, Copy)]
pub struct ContentExtractor<'a> {
    entry: &'a str,
    xml: &'a str,
    location: ContentLocation,
}

impl<'a> ContentExtractor<'a> {
    /// Create an extractor for a decoded part.
    pub fn new(entry: &'a str, xml: &'a str, location: ContentLocation) -> Self {
        Self {
            entry,
            xml,
            location,
        }
    }

    /// Location every fragment will be tagged with.
    pub fn location(&self) -> ContentLocation {
        self.location
    }

    /// Iterate over text fragments in document order.
    ///
    /// Each call starts over from the beginning of the part.
    pub fn fragments(&self) -> TextFragments<'a> {
        let mut reader = Reader::from_str(self.xml);
        reader.config_mut().trim_text(false);
        TextFragments {
            entry: self.entry,
            location: self.location,
            reader,
            open: Vec::new(),
            line: 0,
            done: false,
        }
    }

    /// Collect the part's text into lines.
    ///
    /// Whitespace-only fragments containing a newline are formatting between
    /// tags and are dropped.
    pub fn plain_text(&self) -> Result<String> {
        let mut output = String::new();
        let mut current_line = 0;

        for fragment in self.fragments() {
            let fragment = fragment?;
            if fragment.text.trim().is_empty() && fragment.text.contains('\n') {
                continue;
            }
            if !output.is_empty() {
                for _ in current_line..fragment.line {
                    output.push('\n');
                }
            }
            current_line = fragment.line;
            output.push_str(&fragment.text);
        }

        Ok(output)
    }
}

/// Lazy iterator over the text nodes of a part.
///
/// After the first error the iterator is exhausted.
pub struct TextFragments<'a> {
    entry: &'a str,
    location: ContentLocation,
    reader: Reader<&'a [u8]>,
    open: Vec<String>,
    line: usize,
    done: bool,
}

impl TextFragments<'_> {
    fn fail(&mut self, reason: String) -> Option<Result<TextFragment>> {
        self.done = true;
        Some(Err(Error::MalformedContent {
            entry: self.entry.to_string(),
            reason,
        }))
    }

    fn fragment(&self, text: String) -> Option<Result<TextFragment>> {
        Some(Ok(TextFragment {
            location: self.location,
            text,
            line: self.line,
        }))
    }
}

impl Iterator for TextFragments<'_> {
    type Item = Result<TextFragment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.open
                        .push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                Ok(Event::End(e)) => {
                    self.open.pop();
                    if PARAGRAPH_ELEMENTS.contains(&e.local_name().as_ref()) {
                        self.line += 1;
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = e.local_name();
                    if BREAK_ELEMENTS.contains(&name.as_ref())
                        || PARAGRAPH_ELEMENTS.contains(&name.as_ref())
                    {
                        self.line += 1;
                    }
                }
                Ok(Event::Text(e)) => match e.unescape() {
                    Ok(text) if text.is_empty() => {}
                    Ok(text) => return self.fragment(text.into_owned()),
                    Err(err) => {
                        let position = self.reader.buffer_position();
                        return self.fail(format!("{} at byte {}", err, position));
                    }
                },
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    if !text.is_empty() {
                        return self.fragment(text);
                    }
                }
                Ok(Event::Eof) => {
                    if let Some(name) = self.open.last() {
                        let reason = format!("unclosed element <{}> at end of input", name);
                        return self.fail(reason);
                    }
                    self.done = true;
                    return None;
                }
                Err(err) => {
                    let position = self.reader.buffer_position();
                    return self.fail(format!("{} at byte {}", err, position));
                }
                _ => {}
            }
        }
    }
}
