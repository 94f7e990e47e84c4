use crate::types::SizeLabel;

pub const GEOJSON_MEDIA_TYPE: &str = "application/geo+json";
pub const TIFF_MEDIA_TYPE: &str = "image/tiff";

const FALLBACK_NAME: &str = "aoi";

/// Makes a place name safe to embed in a file name
///
/// Path separators, reserved Windows characters and control characters become
/// `_`; surrounding whitespace is trimmed. Non-ASCII text is kept.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// `{name}_{label}_WGS84.geojson`
pub fn geojson_file_name(name: &str, label: &SizeLabel) -> String {
    format!("{}_{}_WGS84.geojson", sanitize_name(name), label)
}

/// `{name}_{label}_DEM.tif`
pub fn dem_file_name(name: &str, label: &SizeLabel) -> String {
    format!("{}_{}_DEM.tif", sanitize_name(name), label)
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987 UTF-8 name
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
}
