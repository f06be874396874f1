//! CSS color descriptors.
//!
//! Colors are carried as the host paint API expects them: plain CSS strings
//! such as `"white"`, `"#0FA"`, `"hsl(200, 50%, 40%)"` or
//! `"rgba(100,100,100,0.5)"`. Nothing here validates a color before it reaches
//! the paint context. [`CssColor::form`] is a best-effort classifier used for
//! diagnostics only.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use winnow::ascii::{alpha1, float, multispace0, multispace1};
use winnow::combinator::{alt, eof, opt, separated, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// A CSS color descriptor (keyword, hex triplet, or functional form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssColor(Cow<'static, str>);

/// The syntactic family a color descriptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorForm {
    /// `white`, `black`, `rebeccapurple`, ...
    Keyword,
    /// `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
}

impl CssColor {
    pub const WHITE: CssColor = CssColor(Cow::Borrowed("white"));
    pub const BLACK: CssColor = CssColor(Cow::Borrowed("black"));
    pub const RED: CssColor = CssColor(Cow::Borrowed("red"));
    pub const YELLOW: CssColor = CssColor(Cow::Borrowed("yellow"));
    pub const BLUE: CssColor = CssColor(Cow::Borrowed("blue"));

    pub fn new(value: impl Into<String>) -> Self {
        CssColor(Cow::Owned(value.into()))
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(format!("rgb({r},{g},{b})"))
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::new(format!("rgba({r},{g},{b},{a})"))
    }

    /// `h` in degrees, `s` and `l` in percent.
    pub fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self::new(format!("hsl({h}, {s}%, {l}%)"))
    }

    pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self::new(format!("hsla({h}, {s}%, {l}%, {a})"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the descriptor. Returns `None` when it matches none of the
    /// supported forms; such values are still handed to the host unchanged.
    pub fn form(&self) -> Option<ColorForm> {
        let mut input = self.0.trim();
        parse_color_form.parse_next(&mut input).ok()
    }
}

impl Default for CssColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CssColor {
    fn from(value: &'static str) -> Self {
        CssColor(Cow::Borrowed(value))
    }
}

impl From<String> for CssColor {
    fn from(value: String) -> Self {
        CssColor(Cow::Owned(value))
    }
}

impl AsRef<str> for CssColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─── Classifier ─────────────────────────────────────────────────────────

fn parse_color_form(input: &mut &str) -> ModalResult<ColorForm> {
    terminated(alt((parse_hex, parse_functional, parse_keyword)), eof).parse_next(input)
}

fn parse_hex(input: &mut &str) -> ModalResult<ColorForm> {
    let _ = '#'.parse_next(input)?;
    let digits: &str = take_while(1.., |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    match digits.len() {
        3 | 4 | 6 | 8 => Ok(ColorForm::Hex),
        _ => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

fn parse_keyword(input: &mut &str) -> ModalResult<ColorForm> {
    alpha1.map(|_| ColorForm::Keyword).parse_next(input)
}

fn parse_functional(input: &mut &str) -> ModalResult<ColorForm> {
    let name: &str = alpha1.parse_next(input)?;
    let _ = (multispace0, '(', multispace0).parse_next(input)?;
    let args: Vec<f64> = separated(1.., parse_argument, parse_separator).parse_next(input)?;
    let _ = (multispace0, ')').parse_next(input)?;

    match (name.to_ascii_lowercase().as_str(), args.len()) {
        ("rgb", 3) => Ok(ColorForm::Rgb),
        ("rgba", 4) => Ok(ColorForm::Rgba),
        ("hsl", 3) => Ok(ColorForm::Hsl),
        ("hsla", 4) => Ok(ColorForm::Hsla),
        _ => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

fn parse_argument(input: &mut &str) -> ModalResult<f64> {
    let value: f64 = float.parse_next(input)?;
    let _ = opt('%').parse_next(input)?;
    Ok(value)
}

fn parse_separator(input: &mut &str) -> ModalResult<()> {
    alt(((multispace0, ',', multispace0).void(), multispace1.void())).parse_next(input)
}
