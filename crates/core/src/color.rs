/// Convert `#RRGGBB` (the `#` is optional) into the `&H00BBGGRR` colour form
/// used by ffmpeg's `force_style`.
///
/// Anything that is not exactly six hex digits is returned unchanged, leaving
/// ffmpeg to accept or reject it.
pub fn hex_to_ffmpeg_color(hex_color: &str) -> String {
    let hex = hex_color.strip_prefix('#').unwrap_or(hex_color);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return hex_color.to_string();
    }

    let (r, g, b) = (&hex[0..2], &hex[2..4], &hex[4..6]);
    format!("&H00{b}{g}{r}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_to_bgr_order() {
        assert_eq!(hex_to_ffmpeg_color("#FF0000"), "&H000000FF");
        assert_eq!(hex_to_ffmpeg_color("#112233"), "&H00332211");
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(hex_to_ffmpeg_color("00FF00"), "&H0000FF00");
    }

    #[test]
    fn keeps_digit_case() {
        assert_eq!(hex_to_ffmpeg_color("#ffcc00"), "&H0000ccff");
    }

    #[test]
    fn invalid_input_passes_through() {
        assert_eq!(hex_to_ffmpeg_color("bad"), "bad");
        assert_eq!(hex_to_ffmpeg_color("#12345"), "#12345");
        assert_eq!(hex_to_ffmpeg_color("&H00FFFFFF"), "&H00FFFFFF");
        assert_eq!(hex_to_ffmpeg_color("#GGHHII"), "#GGHHII");
        assert_eq!(hex_to_ffmpeg_color(""), "");
    }
}
