use ratatui::style::Color;
use serde::Deserialize;

/// All semantic color slots for the linepick UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,

    // Diff
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_context_fg: Color,
    pub diff_hunk_header_fg: Color,
    pub cursor_bg: Color,

    // Gutter
    pub gutter_fg: Color,
    /// Marker for a row included in the commit.
    pub gutter_included: Color,
    /// Marker for a change row left out of the commit.
    pub gutter_excluded: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

pub const THEME_NAMES: &[&str] = &["one-dark", "github-dark", "solarized-dark"];

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "github-dark" => github_dark(),
            "solarized-dark" => solarized_dark(),
            _ => one_dark(),
        }
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Serde-compatible override struct ──────────────────────────────

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub selection_bg: Option<String>,
    pub diff_add_bg: Option<String>,
    pub diff_del_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_context_fg: Option<String>,
    pub diff_hunk_header_fg: Option<String>,
    pub cursor_bg: Option<String>,
    pub gutter_fg: Option<String>,
    pub gutter_included: Option<String>,
    pub gutter_excluded: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
}

/// Apply hex color overrides. Invalid values are skipped and described in
/// the returned list.
pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) -> Vec<String> {
    let mut rejected = Vec::new();
    macro_rules! apply {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(ref hex) = overrides.$field {
                    match parse_hex_color(hex) {
                        Some(c) => theme.$field = c,
                        None => rejected.push(format!(
                            "ignoring invalid color {:?} for {}",
                            hex,
                            stringify!($field)
                        )),
                    }
                }
            )*
        };
    }
    apply!(
        accent,
        text,
        text_muted,
        surface,
        selection_bg,
        diff_add_bg,
        diff_del_bg,
        diff_add_fg,
        diff_del_fg,
        diff_context_fg,
        diff_hunk_header_fg,
        cursor_bg,
        gutter_fg,
        gutter_included,
        gutter_excluded,
        success,
        error,
        warning,
    );
    rejected
}

// ── Built-in themes ──────────────────────────────────────────────

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: Color::Cyan,
        text: Color::White,
        text_muted: Color::DarkGray,
        surface: Color::Rgb(30, 30, 30),
        selection_bg: Color::Rgb(40, 40, 50),
        diff_add_bg: Color::Rgb(0, 30, 0),
        diff_del_bg: Color::Rgb(40, 0, 0),
        diff_add_fg: Color::Green,
        diff_del_fg: Color::Red,
        diff_context_fg: Color::Rgb(171, 178, 191),
        diff_hunk_header_fg: Color::Magenta,
        cursor_bg: Color::Rgb(50, 50, 65),
        gutter_fg: Color::Rgb(92, 99, 112),
        gutter_included: Color::Rgb(97, 175, 239),
        gutter_excluded: Color::Rgb(62, 68, 81),
        success: Color::Green,
        error: Color::Red,
        warning: Color::Yellow,
    }
}

fn github_dark() -> Theme {
    Theme {
        name: "github-dark".to_string(),
        accent: Color::Rgb(88, 166, 255),
        text: Color::Rgb(201, 209, 217),
        text_muted: Color::Rgb(110, 118, 129),
        surface: Color::Rgb(22, 27, 34),
        selection_bg: Color::Rgb(33, 38, 45),
        diff_add_bg: Color::Rgb(4, 38, 15),
        diff_del_bg: Color::Rgb(52, 10, 14),
        diff_add_fg: Color::Rgb(63, 185, 80),
        diff_del_fg: Color::Rgb(248, 81, 73),
        diff_context_fg: Color::Rgb(201, 209, 217),
        diff_hunk_header_fg: Color::Rgb(188, 140, 255),
        cursor_bg: Color::Rgb(38, 44, 54),
        gutter_fg: Color::Rgb(110, 118, 129),
        gutter_included: Color::Rgb(31, 111, 235),
        gutter_excluded: Color::Rgb(48, 54, 61),
        success: Color::Rgb(63, 185, 80),
        error: Color::Rgb(248, 81, 73),
        warning: Color::Rgb(210, 153, 34),
    }
}

fn solarized_dark() -> Theme {
    Theme {
        name: "solarized-dark".to_string(),
        accent: Color::Rgb(38, 139, 210),
        text: Color::Rgb(147, 161, 161),
        text_muted: Color::Rgb(88, 110, 117),
        surface: Color::Rgb(0, 34, 43),
        selection_bg: Color::Rgb(7, 54, 66),
        diff_add_bg: Color::Rgb(0, 30, 10),
        diff_del_bg: Color::Rgb(40, 5, 5),
        diff_add_fg: Color::Rgb(133, 153, 0),
        diff_del_fg: Color::Rgb(220, 50, 47),
        diff_context_fg: Color::Rgb(147, 161, 161),
        diff_hunk_header_fg: Color::Rgb(211, 54, 130),
        cursor_bg: Color::Rgb(7, 54, 66),
        gutter_fg: Color::Rgb(88, 110, 117),
        gutter_included: Color::Rgb(42, 161, 152),
        gutter_excluded: Color::Rgb(7, 54, 66),
        success: Color::Rgb(133, 153, 0),
        error: Color::Rgb(220, 50, 47),
        warning: Color::Rgb(181, 137, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        // six bytes, but not six hex digits
        assert_eq!(parse_hex_color("#a\u{20ac}bc"), None);
        assert_eq!(parse_hex_color("\u{e9}\u{e9}\u{e9}"), None);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(Theme::from_name("nope").name, "one-dark");
        for name in THEME_NAMES {
            assert_eq!(Theme::from_name(name).name, *name);
        }
    }

    #[test]
    fn test_apply_overrides() {
        let mut theme = Theme::from_name("one-dark");
        let overrides = ThemeOverrides {
            gutter_included: Some("#010203".to_string()),
            accent: Some("bogus".to_string()),
            ..Default::default()
        };
        let rejected = apply_overrides(&mut theme, &overrides);
        assert_eq!(theme.gutter_included, Color::Rgb(1, 2, 3));
        assert_eq!(theme.accent, Color::Cyan);
        assert_eq!(rejected, vec!["ignoring invalid color \"bogus\" for accent".to_string()]);
    }
}
