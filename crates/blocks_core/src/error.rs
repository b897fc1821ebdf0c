use std::fmt;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("cannot resolve {reference:?} against {base}: {message}")]
    Resolution {
        reference: String,
        base: String,
        message: String,
    },
    #[error("invalid base url {base:?}: {message}")]
    BaseUrl { base: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An `img` whose source was an inline `data:` payload.
    DataUriImage,
    /// An `img` whose resolved source is not an http(s) URL.
    UnsupportedImageScheme { scheme: String },
    /// An element dropped because its conversion failed.
    SkippedElement { tag: String },
}

/// Non-fatal note produced while converting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    pub(crate) fn data_uri_image(src: &str) -> Self {
        // Keep the payload itself out of logs and reports.
        let preview: String = src.chars().take(32).collect();
        Self {
            kind: DiagnosticKind::DataUriImage,
            detail: format!("{preview}..."),
        }
    }

    pub(crate) fn unsupported_image(scheme: &str, url: &str) -> Self {
        let preview: String = url.chars().take(32).collect();
        Self {
            kind: DiagnosticKind::UnsupportedImageScheme {
                scheme: scheme.to_string(),
            },
            detail: preview,
        }
    }

    pub(crate) fn skipped(tag: &str, err: &ConvertError) -> Self {
        Self {
            kind: DiagnosticKind::SkippedElement {
                tag: tag.to_string(),
            },
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::DataUriImage => write!(f, "suppressed data-uri image {}", self.detail),
            DiagnosticKind::UnsupportedImageScheme { scheme } => {
                write!(f, "dropped {scheme}: image {}", self.detail)
            }
            DiagnosticKind::SkippedElement { tag } => {
                write!(f, "skipped <{tag}>: {}", self.detail)
            }
        }
    }
}
