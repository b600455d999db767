//! Text decoding with encoding fallback.
//!
//! KakaoTalk on Windows historically saved exports in CP949 while mobile
//! exports are UTF-8 (sometimes with a BOM). [`EncodingResolver`] decodes a
//! file with the preferred encoding and, when allowed, falls back to a
//! ranked list of candidates from an [`EncodingDetector`].
//!
//! Decoding is strict: malformed input is an error, never replaced with
//! U+FFFD, so a wrong guess can't silently corrupt user names.
//!
//! # Example
//!
//! ```rust,no_run
//! use kakaopack::encoding::EncodingResolver;
//!
//! let resolver = EncodingResolver::new("utf-8")?.with_autodetect(true);
//! let decoded = resolver.open_text("KakaoTalk_Chat.txt".as_ref())?;
//! println!("decoded as {}", decoded.encoding_name());
//! # Ok::<(), kakaopack::KakaopackError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use encoding_rs::{EUC_KR, Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use tracing::{debug, warn};

use crate::error::{EncodingError, KakaopackError, Result};

/// A detected encoding and how confident the detector is (0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingCandidate {
    pub encoding: &'static Encoding,
    pub confidence: f32,
}

/// Produces encoding candidates for raw bytes, most likely first.
pub trait EncodingDetector: Send + Sync {
    /// Returns candidates ranked by descending confidence.
    fn detect(&self, bytes: &[u8]) -> Vec<EncodingCandidate>;
}

/// Detector tuned for Korean chat exports.
///
/// A byte-order mark wins outright. Otherwise every candidate that strictly
/// decodes the input is scored by the share of characters that plausibly
/// occur in a chat log (ASCII, Hangul, CJK punctuation score highest).
#[derive(Debug, Clone)]
pub struct HeuristicDetector {
    candidates: Vec<&'static Encoding>,
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self {
            candidates: vec![UTF_8, EUC_KR, UTF_16LE, UTF_16BE, WINDOWS_1252],
        }
    }
}

impl HeuristicDetector {
    /// Creates a detector with the default candidate list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector that only considers `candidates`, in tie-break order.
    pub fn with_candidates(candidates: Vec<&'static Encoding>) -> Self {
        Self { candidates }
    }
}

impl EncodingDetector for HeuristicDetector {
    fn detect(&self, bytes: &[u8]) -> Vec<EncodingCandidate> {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return vec![EncodingCandidate {
                encoding,
                confidence: 1.0,
            }];
        }

        let mut ranked: Vec<EncodingCandidate> = self
            .candidates
            .iter()
            .filter_map(|&encoding| {
                let text = decode_strict(encoding, bytes).ok()?;
                Some(EncodingCandidate {
                    encoding,
                    confidence: plausibility(&text),
                })
            })
            .collect();

        // Stable sort keeps the candidate list order for ties.
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }
}

/// Share of characters that look like chat text, weighted.
fn plausibility(text: &str) -> f32 {
    let mut total = 0usize;
    let mut score = 0.0f32;

    for c in text.chars() {
        total += 1;
        score += match c {
            '\n' | '\r' | '\t' => 1.0,
            c if c.is_ascii_graphic() || c == ' ' => 1.0,
            // Hangul syllables, jamo and compatibility jamo
            '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => 1.0,
            // CJK punctuation, full-width forms, general punctuation
            '\u{3000}'..='\u{303F}' | '\u{FF00}'..='\u{FFEF}' | '\u{2000}'..='\u{206F}' => 0.9,
            c if c.is_control() => 0.0,
            '\u{E000}'..='\u{F8FF}' | '\u{FFFD}' => 0.0,
            c if c.is_alphanumeric() => 0.5,
            _ => 0.3,
        };
    }

    if total == 0 {
        return 0.0;
    }
    score / total as f32
}

/// Resolves an encoding label, accepting a few common non-WHATWG aliases.
pub fn encoding_for_label(label: &str) -> std::result::Result<&'static Encoding, EncodingError> {
    let normalized = label.trim().to_ascii_lowercase();
    let alias = match normalized.as_str() {
        "utf8" => "utf-8",
        "cp949" | "ms949" | "uhc" => "euc-kr",
        "utf-16" | "utf16" => "utf-16le",
        other => other,
    };
    Encoding::for_label(alias.as_bytes())
        .ok_or_else(|| EncodingError::UnknownLabel(label.to_string()))
}

/// Decodes `bytes` strictly, stripping a BOM that matches `encoding`.
pub fn decode_strict(
    encoding: &'static Encoding,
    bytes: &[u8],
) -> std::result::Result<String, EncodingError> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or(EncodingError::Malformed {
            encoding: encoding.name(),
        })
}

/// Text decoded from a file, with the encoding that worked.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    pub path: PathBuf,
    /// Size of the raw file in bytes.
    pub byte_len: u64,
}

impl DecodedText {
    /// Canonical name of the encoding used.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Opens files as text with a preferred encoding and optional detection.
pub struct EncodingResolver {
    preferred: &'static Encoding,
    autodetect: bool,
    detector: Box<dyn EncodingDetector>,
}

impl std::fmt::Debug for EncodingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodingResolver")
            .field("preferred", &self.preferred.name())
            .field("autodetect", &self.autodetect)
            .finish_non_exhaustive()
    }
}

impl EncodingResolver {
    /// Creates a resolver for the given encoding label, with detection off.
    pub fn new(preferred_label: &str) -> Result<Self> {
        Ok(Self::with_encoding(encoding_for_label(preferred_label)?))
    }

    /// Creates a resolver for an already resolved encoding.
    pub fn with_encoding(preferred: &'static Encoding) -> Self {
        Self {
            preferred,
            autodetect: false,
            detector: Box::new(HeuristicDetector::default()),
        }
    }

    /// Enables or disables fallback to detected encodings.
    #[must_use]
    pub fn with_autodetect(mut self, enabled: bool) -> Self {
        self.autodetect = enabled;
        self
    }

    /// Replaces the detector used for fallback.
    #[must_use]
    pub fn with_detector(mut self, detector: impl EncodingDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// The preferred encoding.
    pub fn preferred(&self) -> &'static Encoding {
        self.preferred
    }

    /// Whether detection is enabled.
    pub fn autodetect(&self) -> bool {
        self.autodetect
    }

    /// Reads `path` and decodes it.
    ///
    /// The file handle is closed before decoding starts, on every path.
    ///
    /// # Errors
    ///
    /// - [`KakaopackError::Io`] if the file can't be read
    /// - [`KakaopackError::Encoding`] if the preferred encoding fails and
    ///   detection is off
    /// - [`KakaopackError::Load`] wrapping [`EncodingError::Exhausted`] if
    ///   every detected candidate fails as well
    pub fn open_text(&self, path: &Path) -> Result<DecodedText> {
        let bytes = read_all(path)?;
        let byte_len = bytes.len() as u64;

        let err = match decode_strict(self.preferred, &bytes) {
            Ok(text) => {
                return Ok(DecodedText {
                    text,
                    encoding: self.preferred,
                    path: path.to_path_buf(),
                    byte_len,
                });
            }
            Err(err) => err,
        };

        if !self.autodetect {
            return Err(err.into());
        }

        warn!(
            path = %path.display(),
            preferred = self.preferred.name(),
            "preferred encoding failed, trying detected encodings"
        );

        let (encoding, text) = self.decode_detected(&bytes).map_err(|e| {
            KakaopackError::load(path, e)
        })?;

        Ok(DecodedText {
            text,
            encoding,
            path: path.to_path_buf(),
            byte_len,
        })
    }

    /// Decodes in-memory bytes with the same fallback rules as
    /// [`open_text`](Self::open_text).
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<(&'static Encoding, String)> {
        match decode_strict(self.preferred, bytes) {
            Ok(text) => Ok((self.preferred, text)),
            Err(err) if !self.autodetect => Err(err.into()),
            Err(_) => Ok(self.decode_detected(bytes)?),
        }
    }

    fn decode_detected(
        &self,
        bytes: &[u8],
    ) -> std::result::Result<(&'static Encoding, String), EncodingError> {
        let mut tried = Vec::new();

        for candidate in self.detector.detect(bytes) {
            if candidate.encoding == self.preferred {
                continue;
            }
            debug!(
                encoding = candidate.encoding.name(),
                confidence = candidate.confidence,
                "trying detected encoding"
            );
            tried.push(candidate.encoding.name());
            if let Ok(text) = decode_strict(candidate.encoding, bytes) {
                return Ok((candidate.encoding, text));
            }
        }

        Err(EncodingError::Exhausted { tried })
    }
}

fn read_all(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::with_capacity(
        file.metadata()
            .map(|m| usize::try_from(m.len()).unwrap_or(0))
            .unwrap_or(0),
    );
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
