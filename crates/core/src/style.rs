use std::path::Path;

use crate::{
    color::hex_to_ffmpeg_color,
    error::{Result, SubburnError},
};

/// Appearance of burned-in subtitles, colours as `#RRGGBB`
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStyle {
    pub font_name: String,
    pub font_size: u32,
    pub primary_color: String,
    pub outline: u32,
    pub outline_color: String,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 24,
            primary_color: "#FFFFFF".to_string(),
            outline: 1,
            outline_color: "#000000".to_string(),
        }
    }
}

impl SubtitleStyle {
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(SubburnError::InvalidStyle {
                reason: "font size must be positive".to_string(),
            });
        }
        if self.font_name.trim().is_empty() {
            return Err(SubburnError::InvalidStyle {
                reason: "font name is empty".to_string(),
            });
        }
        Ok(())
    }

    /// The `force_style` override list understood by libass
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},Fontsize={},PrimaryColour={},Outline={},OutlineColour={}",
            // libass splits the override list on commas
            self.font_name.replace(',', " "),
            self.font_size,
            hex_to_ffmpeg_color(&self.primary_color),
            self.outline,
            hex_to_ffmpeg_color(&self.outline_color),
        )
    }

    /// Full `-vf` expression burning `srt_path` with this style.
    ///
    /// ffmpeg unescapes a `-vf` value twice: once when parsing the filtergraph
    /// and once when splitting the filter's `key=value` options. Each option
    /// value is escaped for the option level, then the whole argument list is
    /// escaped again for the filtergraph level.
    pub fn subtitles_filter(&self, srt_path: &Path) -> String {
        let args = format!(
            "filename={}:force_style={}",
            escape_option_value(&srt_path.to_string_lossy()),
            escape_option_value(&self.force_style())
        );
        format!("subtitles={}", escape_filtergraph(&args))
    }
}

/// Escape a value for ffmpeg's `key=value:key=value` option parser
fn escape_option_value(value: &str) -> String {
    escape_chars(value, &['\\', '\'', ':'])
}

/// Escape filter arguments for ffmpeg's filtergraph parser
fn escape_filtergraph(args: &str) -> String {
    escape_chars(args, &['\\', '\'', ',', ';', '[', ']'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_force_style() {
        assert_eq!(
            SubtitleStyle::default().force_style(),
            "FontName=Arial,Fontsize=24,PrimaryColour=&H00FFFFFF,Outline=1,OutlineColour=&H00000000"
        );
    }

    #[test]
    fn colours_go_through_converter() {
        let style = SubtitleStyle {
            primary_color: "#FF8800".into(),
            outline_color: "red".into(),
            ..Default::default()
        };
        let forced = style.force_style();
        assert!(forced.contains("PrimaryColour=&H000088FF"));
        assert!(forced.contains("OutlineColour=red"));
    }

    #[test]
    fn style_commas_are_escaped_for_filtergraph() {
        let filter = SubtitleStyle::default().subtitles_filter(Path::new("/tmp/subs.srt"));
        assert_eq!(
            filter,
            r"subtitles=filename=/tmp/subs.srt:force_style=FontName=Arial\,Fontsize=24\,PrimaryColour=&H00FFFFFF\,Outline=1\,OutlineColour=&H00000000"
        );
    }

    #[test]
    fn comma_in_path_does_not_split_the_filter() {
        let filter = SubtitleStyle::default().subtitles_filter(Path::new("/tmp/a,b.srt"));
        assert!(filter.starts_with(r"subtitles=filename=/tmp/a\,b.srt:force_style="));
    }

    #[test]
    fn drive_colon_is_escaped_at_both_levels() {
        let filter = SubtitleStyle::default().subtitles_filter(Path::new(r"C:\Temp\s.srt"));
        assert!(filter.starts_with(r"subtitles=filename=C\\:\\\\Temp\\\\s.srt:force_style="));
    }

    #[test]
    fn quotes_and_brackets_in_path_are_escaped() {
        let filter = SubtitleStyle::default().subtitles_filter(Path::new("/tmp/it's [1];x.srt"));
        assert!(filter.starts_with(r"subtitles=filename=/tmp/it\\\'s \[1\]\;x.srt:force_style="));
    }

    #[test]
    fn colon_in_font_name_stays_inside_force_style() {
        let style = SubtitleStyle {
            font_name: "Evil:Font,Bold=1".into(),
            ..Default::default()
        };
        assert_eq!(style.force_style().split(',').count(), 5);

        let filter = style.subtitles_filter(Path::new("/s.srt"));
        assert!(filter.contains(r"force_style=FontName=Evil\\:Font Bold=1\,Fontsize=24"));
    }

    #[test]
    fn rejects_zero_font_size_and_blank_font() {
        let zero = SubtitleStyle {
            font_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(SubburnError::InvalidStyle { .. })));

        let blank = SubtitleStyle {
            font_name: "  ".into(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
        assert!(SubtitleStyle::default().validate().is_ok());
    }
}
