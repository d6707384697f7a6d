//! Media type detection from binary signatures.
//!
//! Two fixed tables drive everything here: leading-byte signatures and
//! file-extension mappings. Adding a format means adding rows to both.
//! Content the signature table misses is handed to `infer`.

use crate::model::{ArchiveEntry, SignatureMismatch};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Concrete media formats known to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Ico,
    Webp,
    Wmf,
    Emf,
    /// Text-based; has no binary signature and is never detected
    Svg,
    Mp3,
    Wav,
    Ogg,
    /// Advanced Systems Format container (WMA/WMV)
    Asf,
    /// ISO base media file (MP4/M4A/MOV)
    Mp4,
    Avi,
}

impl MediaType {
    /// Map a file extension (without dot, any case) to its declared type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let media = match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" | "jfif" => MediaType::Jpeg,
            "png" => MediaType::Png,
            "gif" => MediaType::Gif,
            "bmp" | "dib" => MediaType::Bmp,
            "tif" | "tiff" => MediaType::Tiff,
            "ico" => MediaType::Ico,
            "webp" => MediaType::Webp,
            "wmf" => MediaType::Wmf,
            "emf" => MediaType::Emf,
            "svg" => MediaType::Svg,
            "mp3" => MediaType::Mp3,
            "wav" => MediaType::Wav,
            "ogg" | "oga" | "ogv" => MediaType::Ogg,
            "wma" | "wmv" | "asf" => MediaType::Asf,
            "mp4" | "m4a" | "m4v" | "mov" => MediaType::Mp4,
            "avi" => MediaType::Avi,
            _ => return None,
        };
        Some(media)
    }

    /// Canonical file extension for this type.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Gif => "gif",
            MediaType::Bmp => "bmp",
            MediaType::Tiff => "tiff",
            MediaType::Ico => "ico",
            MediaType::Webp => "webp",
            MediaType::Wmf => "wmf",
            MediaType::Emf => "emf",
            MediaType::Svg => "svg",
            MediaType::Mp3 => "mp3",
            MediaType::Wav => "wav",
            MediaType::Ogg => "ogg",
            MediaType::Asf => "asf",
            MediaType::Mp4 => "mp4",
            MediaType::Avi => "avi",
        }
    }

    /// Upper-case display name.
    pub fn name(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "JPEG",
            MediaType::Png => "PNG",
            MediaType::Gif => "GIF",
            MediaType::Bmp => "BMP",
            MediaType::Tiff => "TIFF",
            MediaType::Ico => "ICO",
            MediaType::Webp => "WEBP",
            MediaType::Wmf => "WMF",
            MediaType::Emf => "EMF",
            MediaType::Svg => "SVG",
            MediaType::Mp3 => "MP3",
            MediaType::Wav => "WAV",
            MediaType::Ogg => "OGG",
            MediaType::Asf => "ASF",
            MediaType::Mp4 => "MP4",
            MediaType::Avi => "AVI",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One row of the signature table: every `(offset, bytes)` part must match.
struct Signature {
    media_type: MediaType,
    parts: &'static [(usize, &'static [u8])],
}

/// Signature table. Rows are mutually exclusive, so lookup order is irrelevant.
const SIGNATURES: &[Signature] = &[
    Signature {
        media_type: MediaType::Jpeg,
        parts: &[(0, &[0xFF, 0xD8, 0xFF])],
    },
    Signature {
        media_type: MediaType::Png,
        parts: &[(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])],
    },
    Signature {
        media_type: MediaType::Gif,
        parts: &[(0, b"GIF87a")],
    },
    Signature {
        media_type: MediaType::Gif,
        parts: &[(0, b"GIF89a")],
    },
    Signature {
        media_type: MediaType::Bmp,
        parts: &[(0, b"BM")],
    },
    Signature {
        media_type: MediaType::Tiff,
        parts: &[(0, &[0x49, 0x49, 0x2A, 0x00])],
    },
    Signature {
        media_type: MediaType::Tiff,
        parts: &[(0, &[0x4D, 0x4D, 0x00, 0x2A])],
    },
    Signature {
        media_type: MediaType::Ico,
        parts: &[(0, &[0x00, 0x00, 0x01, 0x00])],
    },
    Signature {
        media_type: MediaType::Webp,
        parts: &[(0, b"RIFF"), (8, b"WEBP")],
    },
    // Placeable metafile header
    Signature {
        media_type: MediaType::Wmf,
        parts: &[(0, &[0xD7, 0xCD, 0xC6, 0x9A])],
    },
    // Standard metafile header, memory and disk variants
    Signature {
        media_type: MediaType::Wmf,
        parts: &[(0, &[0x01, 0x00, 0x09, 0x00, 0x00, 0x03])],
    },
    Signature {
        media_type: MediaType::Wmf,
        parts: &[(0, &[0x02, 0x00, 0x09, 0x00, 0x00, 0x03])],
    },
    Signature {
        media_type: MediaType::Emf,
        parts: &[(0, &[0x01, 0x00, 0x00, 0x00]), (40, b" EMF")],
    },
    Signature {
        media_type: MediaType::Mp3,
        parts: &[(0, b"ID3")],
    },
    Signature {
        media_type: MediaType::Mp3,
        parts: &[(0, &[0xFF, 0xFB])],
    },
    Signature {
        media_type: MediaType::Mp3,
        parts: &[(0, &[0xFF, 0xF3])],
    },
    Signature {
        media_type: MediaType::Mp3,
        parts: &[(0, &[0xFF, 0xF2])],
    },
    Signature {
        media_type: MediaType::Wav,
        parts: &[(0, b"RIFF"), (8, b"WAVE")],
    },
    Signature {
        media_type: MediaType::Avi,
        parts: &[(0, b"RIFF"), (8, b"AVI ")],
    },
    Signature {
        media_type: MediaType::Ogg,
        parts: &[(0, b"OggS")],
    },
    Signature {
        media_type: MediaType::Asf,
        parts: &[(0, &[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11])],
    },
    Signature {
        media_type: MediaType::Mp4,
        parts: &[(4, b"ftyp")],
    },
];

/// Number of leading bytes the signature table looks at.
pub const SIGNATURE_PREFIX_LEN: usize = 44;

/// Number of leading bytes handed to `infer`.
const INFER_PREFIX_LEN: usize = 262;

impl Signature {
    fn matches(&self, prefix: &[u8]) -> bool {
        self.parts.iter().all(|(offset, bytes)| {
            prefix
                .get(*offset..*offset + bytes.len())
                .is_some_and(|window| window == *bytes)
        })
    }
}

/// Identify the media type from the leading bytes of a buffer.
///
/// The signature table is consulted first; content it does not cover falls
/// back to `infer` (QuickTime `moov`/`mdat` atoms, for example). Returns
/// `None` for unsupported or unrecognized content.
pub fn detect_media_type(data: &[u8]) -> Option<MediaType> {
    let prefix = &data[..data.len().min(SIGNATURE_PREFIX_LEN)];
    SIGNATURES
        .iter()
        .find(|sig| sig.matches(prefix))
        .map(|sig| sig.media_type)
        .or_else(|| infer_media_type(data))
}

fn infer_media_type(data: &[u8]) -> Option<MediaType> {
    let kind = infer::get(&data[..data.len().min(INFER_PREFIX_LEN)])?;
    // SVG is text and stays undetectable
    let media = MediaType::from_extension(kind.extension()).filter(|m| *m != MediaType::Svg)?;
    trace!(mime = kind.mime_type(), "detected {} through infer", media);
    Some(media)
}

/// Type declared by an entry's extension.
pub fn declared_media_type(entry: &ArchiveEntry) -> Option<MediaType> {
    entry
        .extension()
        .and_then(|ext| MediaType::from_extension(&ext))
}

/// Compare an entry's declared and detected types.
///
/// A mismatch requires a recognized extension and a recognized signature
/// that disagree. Unknown content never produces a mismatch.
pub fn check_signature(entry: &ArchiveEntry) -> Option<SignatureMismatch> {
    let declared = declared_media_type(entry)?;
    let detected = detect_media_type(entry.data())?;
    (declared != detected).then(|| SignatureMismatch {
        entry: entry.path().to_string(),
        declared,
        detected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    /// A buffer satisfying every part of a signature.
    fn sample(sig: &Signature) -> Vec<u8> {
        let mut buf = vec![0xAAu8; SIGNATURE_PREFIX_LEN];
        for (offset, bytes) in sig.parts {
            buf[*offset..*offset + bytes.len()].copy_from_slice(bytes);
        }
        buf
    }

    #[test]
    fn test_signatures_are_unambiguous() {
        for sig in SIGNATURES {
            let buf = sample(sig);
            let hits: Vec<_> = SIGNATURES
                .iter()
                .filter(|other| other.matches(&buf))
                .map(|other| other.media_type)
                .collect();
            assert!(
                hits.iter().all(|t| *t == sig.media_type),
                "{} sample also matched {:?}",
                sig.media_type,
                hits
            );
        }
    }

    #[test]
    fn test_signatures_fit_prefix() {
        for sig in SIGNATURES {
            for (offset, bytes) in sig.parts {
                assert!(offset + bytes.len() <= SIGNATURE_PREFIX_LEN);
            }
        }
    }

    #[test]
    fn test_detect_every_table_row() {
        for sig in SIGNATURES {
            assert_eq!(detect_media_type(&sample(sig)), Some(sig.media_type));
        }
    }

    #[test]
    fn test_detect_common_formats() {
        assert_eq!(detect_media_type(PNG), Some(MediaType::Png));
        assert_eq!(detect_media_type(JPEG), Some(MediaType::Jpeg));
        assert_eq!(detect_media_type(b"GIF89a\x01\x00"), Some(MediaType::Gif));
        assert_eq!(detect_media_type(b"BM\x36\x00"), Some(MediaType::Bmp));
    }

    #[test]
    fn test_detect_falls_back_to_infer() {
        // QuickTime movie starting with a `moov` atom; no `ftyp` box
        let mut movie = vec![0x00, 0x00, 0x00, 0x20];
        movie.extend_from_slice(b"moov");
        movie.resize(32, 0);
        assert_eq!(detect_media_type(&movie), Some(MediaType::Mp4));

        let entry = ArchiveEntry::new("word/media/media1.wmv", movie).unwrap();
        let mismatch = check_signature(&entry).unwrap();
        assert_eq!(mismatch.declared, MediaType::Asf);
        assert_eq!(mismatch.detected, MediaType::Mp4);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_media_type(b""), None);
        assert_eq!(detect_media_type(b"<svg xmlns="), None);
        assert_eq!(detect_media_type(&[0x89, 0x50]), None); // truncated PNG
        // RIFF without a known form type
        assert_eq!(detect_media_type(b"RIFF\0\0\0\0CDXA"), None);
        // EMF record type without the signature at offset 40
        assert_eq!(detect_media_type(&[0x01, 0x00, 0x00, 0x00, 0x6C]), None);
    }

    #[test]
    fn test_extension_table() {
        let cases = [
            ("jpg", Some(MediaType::Jpeg)),
            ("JPEG", Some(MediaType::Jpeg)),
            ("png", Some(MediaType::Png)),
            ("tif", Some(MediaType::Tiff)),
            ("emf", Some(MediaType::Emf)),
            ("svg", Some(MediaType::Svg)),
            ("m4a", Some(MediaType::Mp4)),
            ("wmv", Some(MediaType::Asf)),
            ("xml", None),
            ("bin", None),
        ];
        for (ext, expected) in cases {
            assert_eq!(MediaType::from_extension(ext), expected, "extension {}", ext);
        }
    }

    #[test]
    fn test_canonical_extension_round_trips() {
        let all = [
            MediaType::Jpeg,
            MediaType::Png,
            MediaType::Gif,
            MediaType::Bmp,
            MediaType::Tiff,
            MediaType::Ico,
            MediaType::Webp,
            MediaType::Wmf,
            MediaType::Emf,
            MediaType::Svg,
            MediaType::Mp3,
            MediaType::Wav,
            MediaType::Ogg,
            MediaType::Asf,
            MediaType::Mp4,
            MediaType::Avi,
        ];
        for media in all {
            assert_eq!(MediaType::from_extension(media.extension()), Some(media));
        }
    }

    #[test]
    fn test_check_signature_mismatch() {
        let entry = ArchiveEntry::new("word/media/image1.jpg", PNG.to_vec()).unwrap();
        let mismatch = check_signature(&entry).unwrap();
        assert_eq!(mismatch.entry, "word/media/image1.jpg");
        assert_eq!(mismatch.declared, MediaType::Jpeg);
        assert_eq!(mismatch.detected, MediaType::Png);
    }

    #[test]
    fn test_check_signature_agreement() {
        let entry = ArchiveEntry::new("word/media/image1.png", PNG.to_vec()).unwrap();
        assert!(check_signature(&entry).is_none());

        let entry = ArchiveEntry::new("word/media/photo.JPEG", JPEG.to_vec()).unwrap();
        assert!(check_signature(&entry).is_none());
    }

    #[test]
    fn test_check_signature_unknown_content() {
        let entry = ArchiveEntry::new("word/media/image1.png", b"not an image".to_vec()).unwrap();
        assert!(check_signature(&entry).is_none());
    }

    #[test]
    fn test_check_signature_unknown_extension() {
        let entry = ArchiveEntry::new("word/media/blob.bin", PNG.to_vec()).unwrap();
        assert!(check_signature(&entry).is_none());
    }

    #[test]
    fn test_svg_hiding_png() {
        let entry = ArchiveEntry::new("word/media/image2.svg", PNG.to_vec()).unwrap();
        let mismatch = check_signature(&entry).unwrap();
        assert_eq!(mismatch.declared, MediaType::Svg);
        assert_eq!(mismatch.detected, MediaType::Png);
    }

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Jpeg.to_string(), "JPEG");
        assert_eq!(MediaType::Mp4.to_string(), "MP4");
    }
}
