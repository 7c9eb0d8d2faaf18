//! Theme-derived default style sheets.

use serde::{Deserialize, Serialize};

use super::{BoxStyle, Color, EdgeInsets, FontStyle, FontWeight, Role, RoleStyle, StyleConfig, TextDecoration, TextStyle};

/// Which default style family to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKind {
    /// The primary design system.
    #[default]
    Primary,
    /// The alternate design system.
    Alternate,
    /// Alternate on Apple platforms, primary elsewhere.
    #[serde(rename = "platform")]
    PlatformAppropriate,
}

/// Target platform, used to resolve [`ThemeKind::PlatformAppropriate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPlatform {
    Android,
    Ios,
    MacOs,
    Linux,
    Windows,
    Fuchsia,
    Web,
}

impl TargetPlatform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "fuchsia") {
            Self::Fuchsia
        } else if cfg!(target_family = "wasm") {
            Self::Web
        } else {
            Self::Linux
        }
    }

    const fn is_apple(self) -> bool {
        matches!(self, Self::Ios | Self::MacOs)
    }
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self::current()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brightness {
    #[default]
    Light,
    Dark,
}

/// The host's ambient visual theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientTheme {
    pub brightness: Brightness,
    /// Body text color.
    pub foreground: Color,
    /// Page background color.
    pub background: Color,
    /// Accent color used for links and checkboxes.
    pub accent: Color,
    /// Base body font size.
    pub font_size: f32,
}

impl AmbientTheme {
    pub fn light() -> Self {
        Self {
            brightness: Brightness::Light,
            foreground: Color::rgb(0x1f, 0x23, 0x28),
            background: Color::rgb(0xff, 0xff, 0xff),
            accent: Color::rgb(0x09, 0x69, 0xda),
            font_size: 14.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            brightness: Brightness::Dark,
            foreground: Color::rgb(0xe6, 0xed, 0xf3),
            background: Color::rgb(0x0d, 0x11, 0x17),
            accent: Color::rgb(0x44, 0x93, 0xf8),
            font_size: 14.0,
        }
    }

    /// Subtle tint over the background, used for code and quotes.
    fn surface(&self) -> Color {
        match self.brightness {
            Brightness::Light => Color::rgb(0xf6, 0xf8, 0xfa),
            Brightness::Dark => Color::rgb(0x16, 0x1b, 0x22),
        }
    }

    fn divider(&self) -> Color {
        self.foreground.with_alpha(0x33)
    }

    fn muted(&self) -> Color {
        self.foreground.with_alpha(0xaa)
    }
}

impl Default for AmbientTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Derives a fully populated default style sheet.
///
/// `PlatformAppropriate` resolves to `Alternate` on iOS and macOS and to
/// `Primary` everywhere else. The result sets a style for every [`Role`].
pub fn resolve_theme(kind: ThemeKind, ambient: &AmbientTheme, platform: TargetPlatform) -> StyleConfig {
    let kind = match kind {
        ThemeKind::PlatformAppropriate if platform.is_apple() => ThemeKind::Alternate,
        ThemeKind::PlatformAppropriate => ThemeKind::Primary,
        other => other,
    };

    let metrics = match kind {
        ThemeKind::Alternate => Metrics::ALTERNATE,
        _ => Metrics::PRIMARY,
    };

    let base = ambient.font_size;
    let mut sheet = StyleConfig {
        block_spacing: Some(metrics.block_spacing),
        list_indent: Some(metrics.list_indent),
        text_scale: Some(1.0),
        ..StyleConfig::default()
    };

    let text = |style: TextStyle| RoleStyle {
        text: style,
        block: BoxStyle::default(),
    };

    sheet.roles.insert(
        Role::Paragraph,
        text(TextStyle {
            font_size: Some(base),
            font_weight: Some(FontWeight::Normal),
            font_style: Some(FontStyle::Normal),
            font_family: Some(metrics.body_font.to_string()),
            color: Some(ambient.foreground),
            background: None,
            decoration: Some(TextDecoration::None),
            line_height: Some(metrics.line_height),
        }),
    );

    for (level, scale) in (1u8..=6).zip(metrics.heading_scale) {
        let Some(role) = Role::heading(level) else {
            continue;
        };
        sheet.roles.insert(
            role,
            text(TextStyle {
                font_size: Some(base * scale),
                font_weight: Some(metrics.heading_weight),
                color: Some(ambient.foreground),
                ..TextStyle::default()
            }),
        );
    }

    sheet.roles.insert(
        Role::Emphasis,
        text(TextStyle {
            font_style: Some(FontStyle::Italic),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(
        Role::Strong,
        text(TextStyle {
            font_weight: Some(FontWeight::Bold),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(
        Role::Strikethrough,
        text(TextStyle {
            decoration: Some(TextDecoration::LineThrough),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(
        Role::CodeSpan,
        text(TextStyle {
            font_family: Some(metrics.mono_font.to_string()),
            font_size: Some(base * 0.9),
            background: Some(ambient.surface()),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(
        Role::CodeBlock,
        RoleStyle {
            text: TextStyle {
                font_family: Some(metrics.mono_font.to_string()),
                font_size: Some(base * 0.9),
                ..TextStyle::default()
            },
            block: BoxStyle {
                padding: Some(EdgeInsets::all(metrics.code_padding)),
                background: Some(ambient.surface()),
                border_color: None,
                border_width: None,
                align: None,
            },
        },
    );
    sheet.roles.insert(
        Role::BlockQuote,
        RoleStyle {
            text: TextStyle {
                color: Some(ambient.muted()),
                ..TextStyle::default()
            },
            block: BoxStyle {
                padding: Some(EdgeInsets {
                    left: metrics.quote_indent,
                    ..EdgeInsets::symmetric(4.0, 0.0)
                }),
                background: None,
                border_color: Some(ambient.divider()),
                border_width: Some(metrics.quote_border),
                align: None,
            },
        },
    );
    sheet.roles.insert(
        Role::Link,
        text(TextStyle {
            color: Some(ambient.accent),
            decoration: Some(metrics.link_decoration),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(Role::ListItem, text(TextStyle::default()));
    sheet.roles.insert(
        Role::ListBullet,
        text(TextStyle {
            color: Some(ambient.muted()),
            ..TextStyle::default()
        }),
    );
    sheet.roles.insert(
        Role::TableHead,
        RoleStyle {
            text: TextStyle {
                font_weight: Some(FontWeight::Bold),
                ..TextStyle::default()
            },
            block: BoxStyle {
                padding: Some(EdgeInsets::symmetric(4.0, 8.0)),
                border_color: Some(ambient.divider()),
                border_width: Some(1.0),
                ..BoxStyle::default()
            },
        },
    );
    sheet.roles.insert(
        Role::TableCell,
        RoleStyle {
            text: TextStyle::default(),
            block: BoxStyle {
                padding: Some(EdgeInsets::symmetric(4.0, 8.0)),
                border_color: Some(ambient.divider()),
                border_width: Some(1.0),
                ..BoxStyle::default()
            },
        },
    );
    sheet.roles.insert(
        Role::HorizontalRule,
        RoleStyle {
            text: TextStyle::default(),
            block: BoxStyle {
                border_color: Some(ambient.divider()),
                border_width: Some(metrics.rule_width),
                ..BoxStyle::default()
            },
        },
    );
    sheet.roles.insert(
        Role::Checkbox,
        text(TextStyle {
            color: Some(ambient.accent),
            ..TextStyle::default()
        }),
    );

    sheet
}

/// Numbers that differ between the two design families.
struct Metrics {
    body_font: &'static str,
    mono_font: &'static str,
    heading_scale: [f32; 6],
    heading_weight: FontWeight,
    line_height: f32,
    block_spacing: f32,
    list_indent: f32,
    code_padding: f32,
    quote_indent: f32,
    quote_border: f32,
    rule_width: f32,
    link_decoration: TextDecoration,
}

impl Metrics {
    const PRIMARY: Self = Self {
        body_font: "Roboto",
        mono_font: "monospace",
        heading_scale: [2.0, 1.5, 1.25, 1.0, 0.875, 0.85],
        heading_weight: FontWeight::Bold,
        line_height: 1.5,
        block_spacing: 8.0,
        list_indent: 24.0,
        code_padding: 8.0,
        quote_indent: 16.0,
        quote_border: 4.0,
        rule_width: 1.0,
        link_decoration: TextDecoration::Underline,
    };

    const ALTERNATE: Self = Self {
        body_font: ".SF UI Text",
        mono_font: "Menlo",
        heading_scale: [2.125, 1.625, 1.375, 1.125, 1.0, 0.9],
        heading_weight: FontWeight::Medium,
        line_height: 1.4,
        block_spacing: 8.0,
        list_indent: 24.0,
        code_padding: 12.0,
        quote_indent: 12.0,
        quote_border: 3.0,
        rule_width: 0.5,
        link_decoration: TextDecoration::None,
    };
}
