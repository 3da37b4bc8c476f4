//! Object key planning.
//!
//! Video keys look like `{orientation}/{token}.mp4`, thumbnail keys like
//! `thumbnails/{token}.{ext}`. The token is 32 bytes from the thread-local CSPRNG,
//! encoded as URL-safe base64 without padding (43 characters).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use vidstage_core::constants::OBJECT_KEY_TOKEN_BYTES;
use vidstage_core::OrientationClass;

/// Prefix under which thumbnails are stored.
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Fresh random token for an object key.
pub fn random_token() -> [u8; OBJECT_KEY_TOKEN_BYTES] {
    let mut token = [0u8; OBJECT_KEY_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut token);
    token
}

fn encode_token(token: &[u8; OBJECT_KEY_TOKEN_BYTES]) -> String {
    URL_SAFE_NO_PAD.encode(token)
}

/// Build the key for a video from its orientation class and an explicit token.
pub fn video_key_from_token(
    class: OrientationClass,
    token: &[u8; OBJECT_KEY_TOKEN_BYTES],
) -> String {
    format!("{}/{}.mp4", class.as_str(), encode_token(token))
}

/// Plan a new, collision-resistant key for a processed video.
pub fn plan_video_key(class: OrientationClass) -> String {
    video_key_from_token(class, &random_token())
}

/// Plan a new key for a thumbnail with the given file extension (without the dot).
pub fn plan_thumbnail_key(extension: &str) -> String {
    format!(
        "{}/{}.{}",
        THUMBNAIL_PREFIX,
        encode_token(&random_token()),
        extension
    )
}
