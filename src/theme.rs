//! Palettes and the style adapter for the dashboard screens.
//!
//! A [`Palette`] is a set of anchor colors; [`Styles`] derives every
//! element style the screens use from whichever palette is active. The
//! adapter itself knows no colors, so swapping palettes restyles the
//! whole application.

use ratatui::style::{Color, Modifier, Style};

/// Anchor colors a theme supplies.
///
/// The five base anchors (primary, secondary, background, surface,
/// foreground) position the theme; the accent colors carry status
/// semantics and belong to the palette, not the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub surface: Color,
    pub foreground: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

/// Look up a named palette in its dark or light variant.
///
/// Unknown names fall back to the default palette.
pub fn palette(name: &str, is_dark: bool) -> Palette {
    match name.to_lowercase().as_str() {
        "ocean" => {
            if is_dark {
                Palette {
                    primary: Color::Rgb(0x5f, 0xb3, 0xb3),
                    secondary: Color::Rgb(0x66, 0x99, 0xcc),
                    background: Color::Rgb(0x1b, 0x2b, 0x34),
                    surface: Color::Rgb(0x4f, 0x5b, 0x66),
                    foreground: Color::Rgb(0xcd, 0xd3, 0xde),
                    success: Color::Rgb(0x99, 0xc7, 0x94),
                    warning: Color::Rgb(0xfa, 0xc8, 0x63),
                    error: Color::Rgb(0xec, 0x5f, 0x67),
                    info: Color::Rgb(0x66, 0x99, 0xcc),
                }
            } else {
                Palette {
                    primary: Color::Rgb(0x20, 0x7d, 0x8c),
                    secondary: Color::Rgb(0x34, 0x65, 0xa4),
                    background: Color::Rgb(0xf4, 0xf7, 0xf9),
                    surface: Color::Rgb(0xa7, 0xad, 0xba),
                    foreground: Color::Rgb(0x2b, 0x33, 0x3e),
                    success: Color::Rgb(0x44, 0x83, 0x3e),
                    warning: Color::Rgb(0xa5, 0x71, 0x06),
                    error: Color::Rgb(0xc2, 0x30, 0x3a),
                    info: Color::Rgb(0x2a, 0x64, 0x9e),
                }
            }
        }
        "mono" | "monochrome" => {
            let (fg, dim) = if is_dark {
                (Color::Rgb(0xd8, 0xd8, 0xd8), Color::Rgb(0x70, 0x70, 0x70))
            } else {
                (Color::Rgb(0x20, 0x20, 0x20), Color::Rgb(0x90, 0x90, 0x90))
            };
            Palette {
                primary: fg,
                secondary: fg,
                background: if is_dark {
                    Color::Rgb(0x10, 0x10, 0x10)
                } else {
                    Color::Rgb(0xfa, 0xfa, 0xfa)
                },
                surface: dim,
                foreground: fg,
                success: fg,
                warning: fg,
                error: fg,
                info: fg,
            }
        }
        _ => {
            if is_dark {
                Palette {
                    primary: Color::Rgb(0x7a, 0xa2, 0xf7),
                    secondary: Color::Rgb(0xbb, 0x9a, 0xf7),
                    background: Color::Rgb(0x1a, 0x1b, 0x26),
                    surface: Color::Rgb(0x56, 0x5f, 0x89),
                    foreground: Color::Rgb(0xc0, 0xca, 0xf5),
                    success: Color::Rgb(0x9e, 0xce, 0x6a),
                    warning: Color::Rgb(0xe0, 0xaf, 0x68),
                    error: Color::Rgb(0xf7, 0x76, 0x8e),
                    info: Color::Rgb(0x7d, 0xcf, 0xff),
                }
            } else {
                Palette {
                    primary: Color::Rgb(0x2e, 0x7d, 0xe9),
                    secondary: Color::Rgb(0x98, 0x54, 0xf1),
                    background: Color::Rgb(0xe1, 0xe2, 0xe7),
                    surface: Color::Rgb(0x84, 0x8c, 0xb5),
                    foreground: Color::Rgb(0x37, 0x60, 0xbf),
                    success: Color::Rgb(0x58, 0x75, 0x39),
                    warning: Color::Rgb(0x8c, 0x6c, 0x3e),
                    error: Color::Rgb(0xf5, 0x2a, 0x65),
                    info: Color::Rgb(0x00, 0x71, 0x97),
                }
            }
        }
    }
}

/// Per-element styles the screens render with, derived from a palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Styles {
    pub title: Style,
    pub subtle: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub status: Style,
    pub frame: Style,
}

impl Styles {
    /// Derive element styles from palette anchors. Pure: no palette is
    /// baked in here.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            title: Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
            subtle: Style::default().fg(palette.surface),
            success: Style::default().fg(palette.success),
            warning: Style::default().fg(palette.warning),
            error: Style::default().fg(palette.error),
            info: Style::default().fg(palette.info),
            status: Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
            frame: Style::default()
                .fg(palette.foreground)
                .bg(palette.background),
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::from_palette(&palette("default", false))
    }
}

/// One-shot guess at the terminal background darkness.
///
/// Terminals that advertise their colors set `COLORFGBG`; without it
/// there is no answer and the caller keeps its configured assumption.
pub fn detect_dark_background() -> Option<bool> {
    darkness_from_colorfgbg(&std::env::var("COLORFGBG").ok()?)
}

/// Interpret a `COLORFGBG` value such as `"15;0"`.
///
/// The last field is the background color index; 0-6 and 8 are the
/// dark half of the classic 16-color cube.
fn darkness_from_colorfgbg(value: &str) -> Option<bool> {
    let bg = value.rsplit(';').next()?.trim();
    let code: u8 = bg.parse().ok()?;
    Some(code <= 6 || code == 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_palettes_differ() {
        assert_ne!(palette("default", true), palette("ocean", true));
        assert_ne!(palette("default", true), palette("default", false));
    }

    #[test]
    fn test_unknown_palette_falls_back_to_default() {
        assert_eq!(palette("no-such-theme", true), palette("default", true));
        assert_eq!(palette("DEFAULT", false), palette("default", false));
    }

    #[test]
    fn test_styles_track_palette_anchors() {
        let dark = palette("default", true);
        let styles = Styles::from_palette(&dark);
        assert_eq!(styles.title.fg, Some(dark.primary));
        assert_eq!(styles.subtle.fg, Some(dark.surface));
        assert_eq!(styles.success.fg, Some(dark.success));
        assert_eq!(styles.warning.fg, Some(dark.warning));
        assert_eq!(styles.error.fg, Some(dark.error));
        assert_eq!(styles.info.fg, Some(dark.info));
        assert_eq!(styles.frame.fg, Some(dark.foreground));
        assert_eq!(styles.frame.bg, Some(dark.background));
    }

    #[test]
    fn test_restyling_follows_darkness_change() {
        let light = Styles::from_palette(&palette("default", false));
        let dark = Styles::from_palette(&palette("default", true));
        assert_ne!(light, dark);
    }

    #[test]
    fn test_darkness_from_colorfgbg() {
        assert_eq!(darkness_from_colorfgbg("15;0"), Some(true));
        assert_eq!(darkness_from_colorfgbg("0;15"), Some(false));
        assert_eq!(darkness_from_colorfgbg("15;default;0"), Some(true));
        assert_eq!(darkness_from_colorfgbg("8"), Some(true));
        assert_eq!(darkness_from_colorfgbg(""), None);
        assert_eq!(darkness_from_colorfgbg("garbage"), None);
    }
}
