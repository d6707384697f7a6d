//! ZIP container abstraction for OOXML documents.

use crate::error::{Error, Result};
use crate::model::ArchiveEntry;
use std::io::{Cursor, Read};

/// Package part that every well-formed OOXML archive carries.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// When we decode UTF-16 XML to a Rust String (UTF-8), the XML declaration
/// still says encoding="UTF-16". This causes quick-xml to fail when it tries
/// to re-interpret the already-decoded UTF-8 string as UTF-16.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are typically UTF-8 encoded, but some (especially older
/// or non-standard documents) use UTF-16. Invalid UTF-8 without a BOM
/// falls back to a lossy conversion so the XML parser gets a chance to
/// report the real problem.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16_le(rest)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16_be(rest)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM: ASCII markup leaves NULs in alternating positions
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Decode bytes as text for pattern matching.
///
/// Stricter than [`decode_xml_bytes`]: anything that is not cleanly UTF-8 or
/// BOM-marked UTF-16, or that contains NUL characters, is treated as binary
/// and yields `None`.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    let text = if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8(rest.to_vec()).ok()?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16_le(rest).ok()?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16_be(rest).ok()?
    } else {
        String::from_utf8(bytes.to_vec()).ok()?
    };

    (!text.contains('\0')).then_some(text)
}

/// Decode UTF-16 Little Endian bytes to String.
fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Decode UTF-16 Big Endian bytes to String.
fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// Borrows the document bytes; entries are read on demand, one at a time,
/// in central-directory order.
pub struct OoxmlContainer<'a> {
    archive: zip::ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> OoxmlContainer<'a> {
    /// Open an OOXML container over document bytes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use itemizer::container::OoxmlContainer;
    ///
    /// let data = std::fs::read("document.docx")?;
    /// let container = OoxmlContainer::from_bytes(&data)?;
    /// println!("{} parts", container.len());
    /// # Ok::<(), itemizer::Error>(())
    /// ```
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Number of records in the central directory, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the archive has no records at all.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|n| n == path)
    }

    /// List all record names in the archive, as stored.
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Read the record at `index`.
    ///
    /// Returns `Ok(None)` for directory records. Any failure is reported as
    /// [`Error::EntryRead`] naming the entry.
    pub fn read_entry(&mut self, index: usize) -> Result<Option<ArchiveEntry>> {
        let name = self
            .archive
            .name_for_index(index)
            .map(String::from)
            .unwrap_or_else(|| format!("#{}", index));
        let entry_error = |entry: String, reason: String| Error::EntryRead { entry, reason };

        let mut file = self
            .archive
            .by_index(index)
            .map_err(|e| entry_error(name.clone(), e.to_string()))?;

        if file.is_dir() {
            return Ok(None);
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| entry_error(name.clone(), e.to_string()))?;

        ArchiveEntry::new(&name, data)
            .map(Some)
            .ok_or_else(|| entry_error(name, "path has no safe segments".to_string()))
    }

    /// Iterate over every file entry in archive order.
    pub fn entries(&mut self) -> Entries<'_, 'a> {
        Entries {
            container: self,
            index: 0,
        }
    }
}

/// Iterator over the file entries of a container.
///
/// Each item is read when requested, so only one entry's bytes are held at
/// a time by the iterator itself.
pub struct Entries<'c, 'a> {
    container: &'c mut OoxmlContainer<'a>,
    index: usize,
}

impl Iterator for Entries<'_, '_> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.container.len() {
            let index = self.index;
            self.index += 1;
            match self.container.read_entry(index) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

impl std::fmt::Debug for OoxmlContainer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.len())
            .finish()
    }
}
