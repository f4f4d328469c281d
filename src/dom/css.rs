//! Lightweight CSS property extraction.
//!
//! Parses inline `style=""` attributes and extracts the small set of
//! box properties the focus engine reads: positioning, offsets, size and
//! the display/visibility pair toggled by show/hide.

/// `position` values that make an element an offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn is_positioned(self) -> bool {
        self != Position::Static
    }
}

/// Extracted CSS box properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProps {
    pub position: Position,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub display: Option<String>,
    pub visibility: Option<String>,
}

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> StyleProps {
    let mut props = StyleProps::default();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_lowercase();
        let val = parts[1].trim();
        match prop.as_str() {
            "position" => props.position = parse_position(val),
            "left" => props.left = parse_css_size(val),
            "top" => props.top = parse_css_size(val),
            "width" => props.width = parse_css_size(val),
            "height" => props.height = parse_css_size(val),
            "display" => props.display = Some(val.to_lowercase()),
            "visibility" => props.visibility = Some(val.to_lowercase()),
            _ => {}
        }
    }
    props
}

fn parse_position(val: &str) -> Position {
    match val.trim().to_lowercase().as_str() {
        "relative" => Position::Relative,
        "absolute" => Position::Absolute,
        "fixed" => Position::Fixed,
        _ => Position::Static,
    }
}

/// Parse a CSS size value (px or plain number).
pub fn parse_css_size(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    let num_str = v.trim_end_matches("px").trim();
    num_str.parse::<f32>().ok()
}
