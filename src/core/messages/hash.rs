use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Length of a generated message identifier.
pub const ID_LENGTH: usize = 6;

/// Separates the message text from its context in the digest input.
const UNIT_SEPARATOR: u8 = 0x1F;

/// Generate the stable identifier of a message from its canonical ICU text
/// and optional context.
///
/// An absent context and an empty context produce the same identifier. The
/// result is a truncated digest, so distinct messages can collide; the
/// catalogue merge detects that case.
pub fn generate_hash(text: &str, context: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([UNIT_SEPARATOR]);
    hasher.update(context.unwrap_or_default().as_bytes());

    let digest = hasher.finalize();
    let mut encoded = STANDARD.encode(digest);
    encoded.truncate(ID_LENGTH);
    encoded
}
