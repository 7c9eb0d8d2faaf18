//! Style sheet types and the field-by-field merge.
//!
//! A [`StyleConfig`] maps semantic [`Role`]s to text and box styles. Every
//! field is optional so that a theme-derived base and a caller override can
//! be combined with [`merge`] without either side losing unset fields.

mod theme;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use theme::{AmbientTheme, Brightness, TargetPlatform, ThemeKind, resolve_theme};

/// Field-by-field combination of two partial styles.
pub trait Merge {
    /// Returns a style taking every field set in `over`, and `self`'s value
    /// for every field `over` leaves unset.
    fn merge(&self, over: &Self) -> Self;
}

macro_rules! merge_fields {
    ($base:expr, $over:expr, { $($field:ident),+ $(,)? }) => {
        Self {
            $($field: $over.$field.clone().or_else(|| $base.$field.clone()),)+
        }
    };
}

/// An RGBA color, written as `#rrggbb` or `#rrggbbaa` in configuration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Creates a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color '{value}', expected #rrggbb or #rrggbbaa"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Light,
    Normal,
    Medium,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// Parses an HTML `align` attribute value.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

/// Padding around a box, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "EdgeInsetsRepr")]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::all(0.0);

    /// Same inset on every side.
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// `vertical` on top and bottom, `horizontal` on left and right.
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// Accepts either a single number or per-side values.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeInsetsRepr {
    All(f32),
    Sides {
        #[serde(default)]
        top: f32,
        #[serde(default)]
        right: f32,
        #[serde(default)]
        bottom: f32,
        #[serde(default)]
        left: f32,
    },
}

impl From<EdgeInsetsRepr> for EdgeInsets {
    fn from(repr: EdgeInsetsRepr) -> Self {
        match repr {
            EdgeInsetsRepr::All(value) => Self::all(value),
            EdgeInsetsRepr::Sides {
                top,
                right,
                bottom,
                left,
            } => Self {
                top,
                right,
                bottom,
                left,
            },
        }
    }
}

/// Character-level style. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
}

impl TextStyle {
    pub const EMPTY: Self = Self {
        font_size: None,
        font_weight: None,
        font_style: None,
        font_family: None,
        color: None,
        background: None,
        decoration: None,
        line_height: None,
    };

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Multiplies the font size by `factor`, if one is set.
    pub fn scaled(mut self, factor: f32) -> Self {
        if let Some(size) = self.font_size.as_mut() {
            *size *= factor;
        }
        self
    }
}

impl Merge for TextStyle {
    fn merge(&self, over: &Self) -> Self {
        merge_fields!(self, over, {
            font_size,
            font_weight,
            font_style,
            font_family,
            color,
            background,
            decoration,
            line_height,
        })
    }
}

/// Block-level (box) style. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<EdgeInsets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl BoxStyle {
    pub const EMPTY: Self = Self {
        padding: None,
        background: None,
        border_color: None,
        border_width: None,
        align: None,
    };
}

impl Merge for BoxStyle {
    fn merge(&self, over: &Self) -> Self {
        merge_fields!(self, over, {
            padding,
            background,
            border_color,
            border_width,
            align,
        })
    }
}

/// Text and box style for one semantic role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleStyle {
    pub text: TextStyle,
    pub block: BoxStyle,
}

impl RoleStyle {
    pub const EMPTY: Self = Self {
        text: TextStyle::EMPTY,
        block: BoxStyle::EMPTY,
    };
}

impl Merge for RoleStyle {
    fn merge(&self, over: &Self) -> Self {
        Self {
            text: self.text.merge(&over.text),
            block: self.block.merge(&over.block),
        }
    }
}

/// The fixed set of semantic roles a style sheet can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Paragraph,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Emphasis,
    Strong,
    Strikethrough,
    CodeSpan,
    CodeBlock,
    BlockQuote,
    Link,
    ListItem,
    ListBullet,
    TableHead,
    TableCell,
    HorizontalRule,
    Checkbox,
}

impl Role {
    pub const ALL: [Role; 20] = [
        Role::Paragraph,
        Role::H1,
        Role::H2,
        Role::H3,
        Role::H4,
        Role::H5,
        Role::H6,
        Role::Emphasis,
        Role::Strong,
        Role::Strikethrough,
        Role::CodeSpan,
        Role::CodeBlock,
        Role::BlockQuote,
        Role::Link,
        Role::ListItem,
        Role::ListBullet,
        Role::TableHead,
        Role::TableCell,
        Role::HorizontalRule,
        Role::Checkbox,
    ];

    /// Heading role for a level between 1 and 6.
    pub const fn heading(level: u8) -> Option<Role> {
        match level {
            1 => Some(Role::H1),
            2 => Some(Role::H2),
            3 => Some(Role::H3),
            4 => Some(Role::H4),
            5 => Some(Role::H5),
            6 => Some(Role::H6),
            _ => None,
        }
    }

    /// Role a tag is styled with, if any.
    pub fn for_tag(tag: &str) -> Option<Role> {
        let role = match tag {
            "p" => Role::Paragraph,
            "h1" => Role::H1,
            "h2" => Role::H2,
            "h3" => Role::H3,
            "h4" => Role::H4,
            "h5" => Role::H5,
            "h6" => Role::H6,
            "em" | "i" => Role::Emphasis,
            "strong" | "b" => Role::Strong,
            "del" | "s" => Role::Strikethrough,
            "code" => Role::CodeSpan,
            "pre" => Role::CodeBlock,
            "blockquote" => Role::BlockQuote,
            "a" => Role::Link,
            "li" => Role::ListItem,
            "th" => Role::TableHead,
            "td" => Role::TableCell,
            "hr" => Role::HorizontalRule,
            "input" => Role::Checkbox,
            _ => return None,
        };
        Some(role)
    }
}

static EMPTY_ROLE: RoleStyle = RoleStyle::EMPTY;

/// Per-role style sheet plus a few document-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Styles by role. Missing roles are unset, not empty-but-present.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<Role, RoleStyle>,

    /// Vertical space between top-level blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_spacing: Option<f32>,

    /// Horizontal indent per list nesting level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_indent: Option<f32>,

    /// Factor applied to every font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_scale: Option<f32>,
}

impl StyleConfig {
    /// Creates an empty style sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the style for `role`, or an empty style if unset.
    pub fn role(&self, role: Role) -> &RoleStyle {
        self.roles.get(&role).unwrap_or(&EMPTY_ROLE)
    }

    /// Sets the style for `role`, returning the sheet for chaining.
    pub fn with_role(mut self, role: Role, style: RoleStyle) -> Self {
        self.roles.insert(role, style);
        self
    }

    /// Sets only the text style for `role`.
    pub fn with_text(self, role: Role, text: TextStyle) -> Self {
        self.with_role(
            role,
            RoleStyle {
                text,
                block: BoxStyle::default(),
            },
        )
    }

    /// Returns the effective text scale (1.0 when unset).
    pub fn text_scale(&self) -> f32 {
        self.text_scale.unwrap_or(1.0)
    }
}

impl Merge for StyleConfig {
    fn merge(&self, over: &Self) -> Self {
        let mut roles = self.roles.clone();
        for (role, style) in &over.roles {
            let merged = self.role(*role).merge(style);
            roles.insert(*role, merged);
        }
        Self {
            roles,
            block_spacing: over.block_spacing.or(self.block_spacing),
            list_indent: over.list_indent.or(self.list_indent),
            text_scale: over.text_scale.or(self.text_scale),
        }
    }
}

/// Merges a caller override onto a base style sheet.
///
/// For every role and field, the override's value wins when set; otherwise
/// the base value is kept. An absent override returns the base unchanged.
pub fn merge(base: &StyleConfig, over: Option<&StyleConfig>) -> StyleConfig {
    match over {
        Some(over) => base.merge(over),
        None => base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(size: Option<f32>, color: Option<Color>) -> TextStyle {
        TextStyle {
            font_size: size,
            color,
            ..TextStyle::default()
        }
    }

    #[rstest]
    #[case::rgb("#ff8000", Some(Color::rgb(0xff, 0x80, 0x00)))]
    #[case::rgba("#11223344", Some(Color::rgba(0x11, 0x22, 0x33, 0x44)))]
    #[case::upper("#ABCDEF", Some(Color::rgb(0xab, 0xcd, 0xef)))]
    #[case::no_hash("ff8000", None)]
    #[case::short("#fff", None)]
    #[case::garbage("#gggggg", None)]
    #[case::multibyte("#ééé", None)]
    fn test_color_parse(#[case] input: &str, #[case] expected: Option<Color>) {
        assert_eq!(Color::parse(input), expected);
    }

    #[test]
    fn test_color_display_roundtrip() {
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_text_style_merge_override_wins() {
        let base = text(Some(14.0), Some(Color::rgb(0, 0, 0)));
        let over = text(Some(20.0), None);

        let merged = base.merge(&over);

        assert_eq!(merged.font_size, Some(20.0));
        assert_eq!(merged.color, Some(Color::rgb(0, 0, 0)));
    }

    #[test]
    fn test_merge_absent_override_returns_base() {
        let base = StyleConfig::new().with_text(Role::H1, text(Some(32.0), None));
        assert_eq!(merge(&base, None), base);
    }

    #[test]
    fn test_merge_keeps_roles_from_both_sides() {
        let base = StyleConfig::new()
            .with_text(Role::Paragraph, text(Some(14.0), Some(Color::rgb(0, 0, 0))))
            .with_text(Role::H1, text(Some(28.0), None));
        let over = StyleConfig {
            block_spacing: Some(12.0),
            ..StyleConfig::new().with_text(Role::Paragraph, text(None, Some(Color::rgb(255, 0, 0))))
        };

        let merged = merge(&base, Some(&over));

        let paragraph = &merged.role(Role::Paragraph).text;
        assert_eq!(paragraph.font_size, Some(14.0));
        assert_eq!(paragraph.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(merged.role(Role::H1).text.font_size, Some(28.0));
        assert_eq!(merged.block_spacing, Some(12.0));
        assert_eq!(merged.list_indent, None);
    }

    #[test]
    fn test_merge_never_drops_override_fields() {
        let over = StyleConfig {
            text_scale: Some(1.5),
            ..StyleConfig::new().with_role(
                Role::CodeBlock,
                RoleStyle {
                    text: text(Some(12.0), None),
                    block: BoxStyle {
                        padding: Some(EdgeInsets::all(4.0)),
                        ..BoxStyle::default()
                    },
                },
            )
        };

        for base in [StyleConfig::new(), resolve_theme(ThemeKind::Primary, &AmbientTheme::default(), TargetPlatform::Linux)] {
            let merged = merge(&base, Some(&over));
            let code = merged.role(Role::CodeBlock);
            assert_eq!(code.text.font_size, Some(12.0));
            assert_eq!(code.block.padding, Some(EdgeInsets::all(4.0)));
            assert_eq!(merged.text_scale, Some(1.5));
        }
    }

    #[test]
    fn test_unset_role_is_empty() {
        let sheet = StyleConfig::new();
        assert_eq!(sheet.role(Role::Checkbox), &RoleStyle::EMPTY);
        assert_eq!(sheet.text_scale(), 1.0);
    }

    #[test]
    fn test_role_for_tag() {
        assert_eq!(Role::for_tag("h3"), Some(Role::H3));
        assert_eq!(Role::for_tag("strong"), Some(Role::Strong));
        assert_eq!(Role::for_tag("foo"), None);
        assert_eq!(Role::heading(7), None);
    }

    #[test]
    fn test_style_config_from_json() {
        let json = r##"{
            "roles": {
                "h1": { "text": { "font_size": 30, "color": "#336699" } },
                "code_block": { "block": { "padding": 6, "background": "#eeeeee" } },
                "block_quote": { "block": { "padding": { "left": 12 } } }
            },
            "block_spacing": 10
        }"##;

        let sheet: StyleConfig = serde_json::from_str(json).unwrap();

        assert_eq!(sheet.role(Role::H1).text.font_size, Some(30.0));
        assert_eq!(sheet.role(Role::H1).text.color, Color::parse("#336699"));
        assert_eq!(sheet.role(Role::CodeBlock).block.padding, Some(EdgeInsets::all(6.0)));
        assert_eq!(
            sheet.role(Role::BlockQuote).block.padding,
            Some(EdgeInsets {
                left: 12.0,
                ..EdgeInsets::ZERO
            })
        );
        assert_eq!(sheet.block_spacing, Some(10.0));
    }

    #[test]
    fn test_style_config_rejects_unknown_fields() {
        let json = r#"{ "roles": { "h1": { "text": { "font_sise": 30 } } } }"#;
        assert!(serde_json::from_str::<StyleConfig>(json).is_err());
    }

    #[test]
    fn test_scaled() {
        assert_eq!(text(Some(10.0), None).scaled(1.5).font_size, Some(15.0));
        assert_eq!(text(None, None).scaled(2.0).font_size, None);
    }
}
