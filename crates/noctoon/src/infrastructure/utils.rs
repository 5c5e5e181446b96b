use sha1::{Digest, Sha1};

use crate::domain::entities::upload::UploadSignature;

use super::config::UploadConfig;

pub const MAX_COMMENT_LENGTH: usize = 2000;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Escapes characters that are meaningful in HTML attributes and markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Trim, cap at [`MAX_COMMENT_LENGTH`] characters, drop NUL then escape.
/// The cap counts characters, not bytes.
pub fn sanitize_comment(text: &str) -> String {
    let capped: String = text
        .trim()
        .chars()
        .take(MAX_COMMENT_LENGTH)
        .filter(|c| *c != '\0')
        .collect();
    escape_html(&capped)
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Signature for a direct browser upload, following the image host's
/// convention: sha1 over the sorted params joined with `&`, then the secret.
pub fn sign_upload(config: &UploadConfig, timestamp: i64) -> UploadSignature {
    let to_sign = format!("folder={}&timestamp={}", config.folder, timestamp);

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(config.api_secret.as_bytes());

    UploadSignature {
        signature: hex::encode(hasher.finalize()),
        timestamp,
        cloud_name: config.cloud_name.clone(),
        api_key: config.api_key.clone(),
        folder: config.folder.clone(),
    }
}
