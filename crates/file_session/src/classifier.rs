//! Pure mapping from MIME type and filename to preview category, icon, color, and language.
//!
//! Every lookup is an ordered list of predicates where the first match wins. MIME matching is
//! case-sensitive; extension matching is case-insensitive. Empty or malformed inputs fall through
//! to the defaults and never fail.

use serde::{Deserialize, Serialize};

/// Extensions previewed as a document conversion.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["doc", "docx"];

/// Extensions previewed as syntax-highlighted source.
pub const CODE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "rs", "java", "c", "cpp", "h", "hpp", "cs", "go", "rb", "php",
    "swift", "kt", "html", "css", "scss", "json", "xml", "yaml", "yml", "toml", "sh", "sql",
];

/// Extensions previewed as plain text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "readme"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Renderer family used for a file preview.
pub enum PreviewKind {
    /// `<img>` element.
    Image,
    /// `<video>` element.
    Video,
    /// `<audio>` element.
    Audio,
    /// Paged PDF viewer.
    Pdf,
    /// Word document converted to markup.
    Document,
    /// Source code with syntax highlighting.
    Code,
    /// Plain text.
    Text,
    /// Metadata-only fallback with a download action.
    Unsupported,
}

impl PreviewKind {
    /// Returns a stable token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Document => "document",
            Self::Code => "code",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }

    /// Returns `true` for kinds whose load completes on a media element event.
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Icon tag shown next to a file.
pub enum FileIcon {
    /// Picture glyph.
    Image,
    /// Film glyph.
    Video,
    /// Note glyph.
    Music,
    /// Page-with-lines glyph (PDFs and word processing).
    FileText,
    /// Chart glyph (spreadsheets).
    BarChart3,
    /// Box glyph (archives).
    Archive,
    /// Generic page glyph.
    File,
}

impl FileIcon {
    /// Returns the icon set name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Music => "Music",
            Self::FileText => "FileText",
            Self::BarChart3 => "BarChart3",
            Self::Archive => "Archive",
            Self::File => "File",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Accent color tag for a file.
pub enum FileColor {
    /// Images.
    Green,
    /// Video.
    Purple,
    /// Audio.
    Orange,
    /// PDF.
    Red,
    /// Word processing.
    Blue,
    /// Spreadsheets.
    Emerald,
    /// Archives.
    Yellow,
    /// Everything else.
    Surface,
}

impl FileColor {
    /// Returns the utility class used by the stylesheet.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Green => "text-green-500",
            Self::Purple => "text-purple-500",
            Self::Orange => "text-orange-500",
            Self::Red => "text-red-500",
            Self::Blue => "text-blue-500",
            Self::Emerald => "text-emerald-500",
            Self::Yellow => "text-yellow-600",
            Self::Surface => "text-surface-500",
        }
    }
}

/// Returns the lowercase extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn has_extension(filename: &str, table: &[&str]) -> bool {
    extension_of(filename).is_some_and(|ext| table.contains(&ext.as_str()))
}

fn is_code_mime(mime_type: &str) -> bool {
    mime_type.contains("javascript")
        || mime_type.contains("json")
        || mime_type == "text/html"
        || mime_type == "text/css"
}

/// Picks the preview renderer for a file.
pub fn classify(mime_type: &str, filename: &str) -> PreviewKind {
    if mime_type.starts_with("image/") {
        PreviewKind::Image
    } else if mime_type.starts_with("video/") {
        PreviewKind::Video
    } else if mime_type.starts_with("audio/") {
        PreviewKind::Audio
    } else if mime_type.contains("pdf") || has_extension(filename, &["pdf"]) {
        PreviewKind::Pdf
    } else if mime_type.contains("word")
        || mime_type.contains("document")
        || has_extension(filename, DOCUMENT_EXTENSIONS)
    {
        PreviewKind::Document
    } else if is_code_mime(mime_type) || has_extension(filename, CODE_EXTENSIONS) {
        PreviewKind::Code
    } else if mime_type.starts_with("text/") || has_extension(filename, TEXT_EXTENSIONS) {
        PreviewKind::Text
    } else {
        PreviewKind::Unsupported
    }
}

/// Picks the icon tag for a MIME type.
pub fn icon_for(mime_type: &str) -> FileIcon {
    if mime_type.starts_with("image/") {
        FileIcon::Image
    } else if mime_type.starts_with("video/") {
        FileIcon::Video
    } else if mime_type.starts_with("audio/") {
        FileIcon::Music
    } else if mime_type.contains("pdf")
        || mime_type.contains("word")
        || mime_type.contains("document")
    {
        FileIcon::FileText
    } else if mime_type.contains("excel") || mime_type.contains("spreadsheet") {
        FileIcon::BarChart3
    } else if mime_type.contains("zip") || mime_type.contains("rar") {
        FileIcon::Archive
    } else {
        FileIcon::File
    }
}

/// Picks the accent color tag for a MIME type.
pub fn color_for(mime_type: &str) -> FileColor {
    if mime_type.starts_with("image/") {
        FileColor::Green
    } else if mime_type.starts_with("video/") {
        FileColor::Purple
    } else if mime_type.starts_with("audio/") {
        FileColor::Orange
    } else if mime_type.contains("pdf") {
        FileColor::Red
    } else if mime_type.contains("word") || mime_type.contains("document") {
        FileColor::Blue
    } else if mime_type.contains("excel") || mime_type.contains("spreadsheet") {
        FileColor::Emerald
    } else if mime_type.contains("zip") || mime_type.contains("rar") {
        FileColor::Yellow
    } else {
        FileColor::Surface
    }
}

/// Returns the syntax-highlighting language for a filename; `"text"` when unknown.
pub fn language_for(filename: &str) -> &'static str {
    let Some(ext) = extension_of(filename) else {
        return "text";
    };
    match ext.as_str() {
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "rs" => "rust",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "sh" => "bash",
        "sql" => "sql",
        "md" => "markdown",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_wins_over_any_filename() {
        for name in ["report.docx", "script.py", "notes.txt", "", "archive.pdf"] {
            assert_eq!(classify("image/png", name), PreviewKind::Image, "name={name:?}");
        }
    }

    #[test]
    fn extension_fallbacks_cover_unreliable_mime_types() {
        assert_eq!(
            classify("application/octet-stream", "report.docx"),
            PreviewKind::Document
        );
        assert_eq!(classify("", "notes.txt"), PreviewKind::Text);
        assert_eq!(classify("", "script.py"), PreviewKind::Code);
        assert_eq!(classify("", "manual.pdf"), PreviewKind::Pdf);
        assert_eq!(classify("", ""), PreviewKind::Unsupported);
        assert_eq!(classify("application/zip", "bundle.zip"), PreviewKind::Unsupported);
    }

    #[test]
    fn mime_order_is_respected() {
        assert_eq!(classify("video/mp4", "clip.mp4"), PreviewKind::Video);
        assert_eq!(classify("audio/mpeg", "song.mp3"), PreviewKind::Audio);
        assert_eq!(classify("application/pdf", "x"), PreviewKind::Pdf);
        assert_eq!(classify("application/msword", "x"), PreviewKind::Document);
        assert_eq!(classify("application/json", "data"), PreviewKind::Code);
        assert_eq!(classify("text/html", "index"), PreviewKind::Code);
        assert_eq!(classify("text/plain", "x"), PreviewKind::Text);
        assert_eq!(classify("text/plain", "main.rs"), PreviewKind::Code);
    }

    #[test]
    fn extension_matching_ignores_case_but_mime_does_not() {
        assert_eq!(classify("", "SCRIPT.PY"), PreviewKind::Code);
        assert_eq!(classify("", "Notes.MD"), PreviewKind::Text);
        assert_eq!(classify("IMAGE/PNG", "photo"), PreviewKind::Unsupported);
    }

    #[test]
    fn malformed_input_falls_back_quietly() {
        assert_eq!(classify("/////", "..."), PreviewKind::Unsupported);
        assert_eq!(icon_for(""), FileIcon::File);
        assert_eq!(color_for(""), FileColor::Surface);
        assert_eq!(language_for("Makefile"), "text");
        assert_eq!(language_for("trailing."), "text");
    }

    #[test]
    fn extension_of_handles_dotfiles_and_multiple_dots() {
        assert_eq!(extension_of("archive.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(extension_of(".env").as_deref(), Some("env"));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn icon_and_color_tables_follow_predicate_order() {
        assert_eq!(icon_for("image/jpeg"), FileIcon::Image);
        assert_eq!(color_for("image/jpeg"), FileColor::Green);
        assert_eq!(icon_for("audio/ogg"), FileIcon::Music);
        assert_eq!(color_for("application/pdf"), FileColor::Red);
        assert_eq!(icon_for("application/vnd.ms-excel"), FileIcon::BarChart3);
        assert_eq!(color_for("application/vnd.ms-excel"), FileColor::Emerald);
        assert_eq!(icon_for("application/x-rar-compressed"), FileIcon::Archive);
        assert_eq!(color_for("application/zip").css_class(), "text-yellow-600");
        assert_eq!(
            icon_for("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
                .as_str(),
            "FileText"
        );
    }

    #[test]
    fn language_table_maps_common_extensions() {
        assert_eq!(language_for("script.py"), "python");
        assert_eq!(language_for("lib.RS"), "rust");
        assert_eq!(language_for("config.yml"), "yaml");
        assert_eq!(language_for("deploy.sh"), "bash");
        assert_eq!(language_for("notes.txt"), "text");
    }
}
