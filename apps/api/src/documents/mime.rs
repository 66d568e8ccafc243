//! MIME resolution for uploaded files.

pub const PDF: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Types the extraction model accepts as inline data.
pub const SUPPORTED_TYPES: &[&str] = &[
    PDF,
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "text/plain",
];

const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("pdf", PDF),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("txt", "text/plain"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// Declared type when it says something, else a guess from the file extension,
/// else `application/octet-stream`. Parameters such as `; charset=utf-8` are dropped.
pub fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    let declared = declared
        .and_then(|d| d.split(';').next())
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty() && d != OCTET_STREAM);

    if let Some(mime) = declared {
        return mime;
    }

    guess_from_extension(file_name)
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

fn guess_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

pub fn is_supported(mime: &str) -> bool {
    SUPPORTED_TYPES.contains(&mime)
}
