//! File extensions Box can extract text from

use std::collections::HashSet;
use std::sync::LazyLock;

/// Extensions search results are filtered on
pub static DOCUMENT_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Office and word processing
        "doc", "docx", "gdoc", "gsheet", "numbers", "ods", "odt", "pages", "pdf", "rtf", "wpd",
        "xls", "xlsm", "xlsx", "xlsb",
        // Code, markup and plain text
        "as", "as3", "asm", "bat", "c", "cc", "cmake", "cpp", "cs", "css", "csv", "cxx", "diff",
        "erb", "groovy", "h", "haml", "hh", "htm", "html", "java", "js", "json", "less", "log",
        "m", "make", "md", "ml", "mm", "msg", "php", "pl", "properties", "py", "rb", "rst",
        "sass", "scala", "scm", "script", "sh", "sml", "sql", "txt", "vi", "vim", "webdoc",
        "xhtml", "xml", "xsd", "xsl", "yaml",
        // Presentations
        "gslide", "gslides", "key", "odp", "ppt", "pptx",
    ]
    .into_iter()
    .collect()
});

/// Whether a search hit with this extension can become a document
pub fn is_document_extension(extension: &str) -> bool {
    DOCUMENT_EXTENSIONS.contains(extension.to_ascii_lowercase().as_str())
}
