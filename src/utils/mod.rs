use base64::{Engine, engine::general_purpose::STANDARD};

/// Embeds raw bytes in a data URL carrying the declared MIME type.
pub fn to_data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_embeds_mime_and_base64() {
        assert_eq!(
            to_data_url("image/png", b"abc"),
            "data:image/png;base64,YWJj"
        );
    }

    #[test]
    fn data_url_with_empty_body() {
        assert_eq!(to_data_url("image/jpeg", b""), "data:image/jpeg;base64,");
    }
}
