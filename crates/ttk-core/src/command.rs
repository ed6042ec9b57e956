//! Reified renderer operations and their wire form.
//!
//! Every [`Renderer`] operation has a [`Command`] variant carrying exactly
//! its parameters. A command serializes to a flat JSON object with a
//! `command_type` discriminator:
//!
//! ```text
//! {"command_type": "draw_text", "row": 5, "col": 10, "text": "Hello",
//!  "color_pair": 1, "attributes": 3}
//! ```
//!
//! [`Command::parse`] is the inverse and reports each malformation with a
//! distinct [`CommandError`]. Color triples arrive as JSON arrays and are
//! materialized as [`Rgb`] at this boundary, so the rest of the toolkit
//! never sees a variable-length color.
//!
//! For every command `c`: `Command::parse(&c.to_map()) == Ok(c)`.

use crate::color::Rgb;
use crate::error::{CommandError, Result};
use crate::renderer::Renderer;
use crate::style::TextAttribute;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// A serialized command.
pub type CommandMap = Map<String, Value>;

/// Every discriminator value, in declaration order.
pub const COMMAND_TYPES: [&str; 11] = [
    "draw_text",
    "draw_hline",
    "draw_vline",
    "draw_rect",
    "clear",
    "clear_region",
    "refresh",
    "refresh_region",
    "init_color_pair",
    "set_cursor_visibility",
    "move_cursor",
];

/// One renderer operation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// [`Renderer::draw_text`].
    DrawText {
        row: i32,
        col: i32,
        text: String,
        color_pair: i32,
        attributes: TextAttribute,
    },
    /// [`Renderer::draw_hline`].
    DrawHLine {
        row: i32,
        col: i32,
        ch: char,
        length: i32,
        color_pair: i32,
    },
    /// [`Renderer::draw_vline`].
    DrawVLine {
        row: i32,
        col: i32,
        ch: char,
        length: i32,
        color_pair: i32,
    },
    /// [`Renderer::draw_rect`].
    DrawRect {
        row: i32,
        col: i32,
        height: i32,
        width: i32,
        color_pair: i32,
        filled: bool,
    },
    /// [`Renderer::clear`].
    Clear,
    /// [`Renderer::clear_region`].
    ClearRegion {
        row: i32,
        col: i32,
        height: i32,
        width: i32,
    },
    /// [`Renderer::refresh`].
    Refresh,
    /// [`Renderer::refresh_region`].
    RefreshRegion {
        row: i32,
        col: i32,
        height: i32,
        width: i32,
    },
    /// [`Renderer::init_color_pair`].
    InitColorPair {
        pair_id: i32,
        fg_color: Rgb,
        bg_color: Rgb,
    },
    /// [`Renderer::set_cursor_visibility`].
    SetCursorVisibility { visible: bool },
    /// [`Renderer::move_cursor`].
    MoveCursor { row: i32, col: i32 },
}

impl Command {
    /// `draw_text` with pair 0 and no attributes.
    pub fn draw_text(row: i32, col: i32, text: impl Into<String>) -> Self {
        Self::DrawText {
            row,
            col,
            text: text.into(),
            color_pair: 0,
            attributes: TextAttribute::NORMAL,
        }
    }

    /// `draw_hline` with pair 0.
    #[must_use]
    pub const fn draw_hline(row: i32, col: i32, ch: char, length: i32) -> Self {
        Self::DrawHLine {
            row,
            col,
            ch,
            length,
            color_pair: 0,
        }
    }

    /// `draw_vline` with pair 0.
    #[must_use]
    pub const fn draw_vline(row: i32, col: i32, ch: char, length: i32) -> Self {
        Self::DrawVLine {
            row,
            col,
            ch,
            length,
            color_pair: 0,
        }
    }

    /// Unfilled `draw_rect` with pair 0.
    #[must_use]
    pub const fn draw_rect(row: i32, col: i32, height: i32, width: i32) -> Self {
        Self::DrawRect {
            row,
            col,
            height,
            width,
            color_pair: 0,
            filled: false,
        }
    }

    /// `clear_region`.
    #[must_use]
    pub const fn clear_region(row: i32, col: i32, height: i32, width: i32) -> Self {
        Self::ClearRegion {
            row,
            col,
            height,
            width,
        }
    }

    /// `refresh_region`.
    #[must_use]
    pub const fn refresh_region(row: i32, col: i32, height: i32, width: i32) -> Self {
        Self::RefreshRegion {
            row,
            col,
            height,
            width,
        }
    }

    /// `init_color_pair`.
    #[must_use]
    pub const fn init_color_pair(pair_id: i32, fg_color: Rgb, bg_color: Rgb) -> Self {
        Self::InitColorPair {
            pair_id,
            fg_color,
            bg_color,
        }
    }

    /// `move_cursor`.
    #[must_use]
    pub const fn move_cursor(row: i32, col: i32) -> Self {
        Self::MoveCursor { row, col }
    }

    /// `set_cursor_visibility`.
    #[must_use]
    pub const fn set_cursor_visibility(visible: bool) -> Self {
        Self::SetCursorVisibility { visible }
    }

    /// Builder: set `color_pair` on the variants that take one.
    #[must_use]
    pub fn with_color_pair(mut self, pair: i32) -> Self {
        match &mut self {
            Self::DrawText { color_pair, .. }
            | Self::DrawHLine { color_pair, .. }
            | Self::DrawVLine { color_pair, .. }
            | Self::DrawRect { color_pair, .. } => *color_pair = pair,
            _ => {}
        }
        self
    }

    /// Builder: set `attributes` on `draw_text`.
    #[must_use]
    pub fn with_attributes(mut self, attrs: TextAttribute) -> Self {
        if let Self::DrawText { attributes, .. } = &mut self {
            *attributes = attrs;
        }
        self
    }

    /// Builder: set `filled` on `draw_rect`.
    #[must_use]
    pub fn with_filled(mut self, fill: bool) -> Self {
        if let Self::DrawRect { filled, .. } = &mut self {
            *filled = fill;
        }
        self
    }

    /// The wire discriminator.
    #[must_use]
    pub const fn command_type(&self) -> &'static str {
        match self {
            Self::DrawText { .. } => "draw_text",
            Self::DrawHLine { .. } => "draw_hline",
            Self::DrawVLine { .. } => "draw_vline",
            Self::DrawRect { .. } => "draw_rect",
            Self::Clear => "clear",
            Self::ClearRegion { .. } => "clear_region",
            Self::Refresh => "refresh",
            Self::RefreshRegion { .. } => "refresh_region",
            Self::InitColorPair { .. } => "init_color_pair",
            Self::SetCursorVisibility { .. } => "set_cursor_visibility",
            Self::MoveCursor { .. } => "move_cursor",
        }
    }

    /// Serialize to a flat mapping with every parameter present.
    #[must_use]
    pub fn to_map(&self) -> CommandMap {
        let mut map = Map::new();
        map.insert("command_type".into(), self.command_type().into());
        let mut put = |key: &str, value: Value| {
            map.insert(key.into(), value);
        };
        match self {
            Self::DrawText {
                row,
                col,
                text,
                color_pair,
                attributes,
            } => {
                put("row", (*row).into());
                put("col", (*col).into());
                put("text", text.as_str().into());
                put("color_pair", (*color_pair).into());
                put("attributes", attributes.bits().into());
            }
            Self::DrawHLine {
                row,
                col,
                ch,
                length,
                color_pair,
            }
            | Self::DrawVLine {
                row,
                col,
                ch,
                length,
                color_pair,
            } => {
                put("row", (*row).into());
                put("col", (*col).into());
                put("char", ch.to_string().into());
                put("length", (*length).into());
                put("color_pair", (*color_pair).into());
            }
            Self::DrawRect {
                row,
                col,
                height,
                width,
                color_pair,
                filled,
            } => {
                put("row", (*row).into());
                put("col", (*col).into());
                put("height", (*height).into());
                put("width", (*width).into());
                put("color_pair", (*color_pair).into());
                put("filled", (*filled).into());
            }
            Self::Clear | Self::Refresh => {}
            Self::ClearRegion {
                row,
                col,
                height,
                width,
            }
            | Self::RefreshRegion {
                row,
                col,
                height,
                width,
            } => {
                put("row", (*row).into());
                put("col", (*col).into());
                put("height", (*height).into());
                put("width", (*width).into());
            }
            Self::InitColorPair {
                pair_id,
                fg_color,
                bg_color,
            } => {
                put("pair_id", (*pair_id).into());
                put("fg_color", rgb_value(*fg_color));
                put("bg_color", rgb_value(*bg_color));
            }
            Self::SetCursorVisibility { visible } => put("visible", (*visible).into()),
            Self::MoveCursor { row, col } => {
                put("row", (*row).into());
                put("col", (*col).into());
            }
        }
        map
    }

    /// Parse a serialized mapping.
    ///
    /// Optional parameters (`color_pair`, `attributes`, `filled`) take their
    /// defaults when absent. Unknown keys are ignored.
    pub fn parse(map: &CommandMap) -> Result<Self, CommandError> {
        let command_type = match map.get("command_type") {
            None => return Err(CommandError::MissingCommandType),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(CommandError::WrongType {
                    field: "command_type",
                    expected: "string",
                    found: json_type_name(other),
                })
            }
        };
        let f = Fields(map);

        let cmd = match command_type {
            "draw_text" => {
                f.require(&["row", "col", "text"])?;
                Self::DrawText {
                    row: f.int("row")?,
                    col: f.int("col")?,
                    text: f.string("text")?,
                    color_pair: f.int_or("color_pair", 0)?,
                    attributes: f.attributes("attributes")?,
                }
            }
            "draw_hline" | "draw_vline" => {
                f.require(&["row", "col", "char", "length"])?;
                let (row, col, ch, length, color_pair) = (
                    f.int("row")?,
                    f.int("col")?,
                    f.ch("char")?,
                    f.int("length")?,
                    f.int_or("color_pair", 0)?,
                );
                if command_type == "draw_hline" {
                    Self::DrawHLine {
                        row,
                        col,
                        ch,
                        length,
                        color_pair,
                    }
                } else {
                    Self::DrawVLine {
                        row,
                        col,
                        ch,
                        length,
                        color_pair,
                    }
                }
            }
            "draw_rect" => {
                f.require(&["row", "col", "height", "width"])?;
                Self::DrawRect {
                    row: f.int("row")?,
                    col: f.int("col")?,
                    height: f.int("height")?,
                    width: f.int("width")?,
                    color_pair: f.int_or("color_pair", 0)?,
                    filled: f.bool_or("filled", false)?,
                }
            }
            "clear" => Self::Clear,
            "refresh" => Self::Refresh,
            "clear_region" | "refresh_region" => {
                f.require(&["row", "col", "height", "width"])?;
                let (row, col, height, width) = (
                    f.int("row")?,
                    f.int("col")?,
                    f.int("height")?,
                    f.int("width")?,
                );
                if command_type == "clear_region" {
                    Self::clear_region(row, col, height, width)
                } else {
                    Self::refresh_region(row, col, height, width)
                }
            }
            "init_color_pair" => {
                f.require(&["pair_id", "fg_color", "bg_color"])?;
                Self::InitColorPair {
                    pair_id: f.int("pair_id")?,
                    fg_color: f.rgb("fg_color")?,
                    bg_color: f.rgb("bg_color")?,
                }
            }
            "set_cursor_visibility" => {
                f.require(&["visible"])?;
                Self::SetCursorVisibility {
                    visible: f.boolean("visible")?,
                }
            }
            "move_cursor" => {
                f.require(&["row", "col"])?;
                Self::MoveCursor {
                    row: f.int("row")?,
                    col: f.int("col")?,
                }
            }
            other => return Err(CommandError::UnknownCommandType(other.to_string())),
        };
        Ok(cmd)
    }

    /// Parse any JSON value; non-objects are rejected.
    pub fn from_value(value: &Value) -> Result<Self, CommandError> {
        match value {
            Value::Object(map) => Self::parse(map),
            other => Err(CommandError::NotAnObject {
                found: json_type_name(other),
            }),
        }
    }

    /// Parse a JSON document holding one command.
    pub fn from_json_str(json: &str) -> Result<Self, CommandError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Compact JSON text of [`Command::to_map`].
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.to_map()).to_string()
    }

    /// Human-readable multi-line form; see [`pretty_print`].
    #[must_use]
    pub fn pretty(&self, indent: usize) -> String {
        pretty_print_map(&self.to_map(), indent)
    }

    /// Execute against a renderer.
    pub fn apply(&self, renderer: &mut dyn Renderer) -> Result<()> {
        match self {
            Self::DrawText {
                row,
                col,
                text,
                color_pair,
                attributes,
            } => renderer.draw_text(*row, *col, text, *color_pair, *attributes),
            Self::DrawHLine {
                row,
                col,
                ch,
                length,
                color_pair,
            } => renderer.draw_hline(*row, *col, *ch, *length, *color_pair),
            Self::DrawVLine {
                row,
                col,
                ch,
                length,
                color_pair,
            } => renderer.draw_vline(*row, *col, *ch, *length, *color_pair),
            Self::DrawRect {
                row,
                col,
                height,
                width,
                color_pair,
                filled,
            } => renderer.draw_rect(*row, *col, *height, *width, *color_pair, *filled),
            Self::Clear => {
                renderer.clear();
                Ok(())
            }
            Self::ClearRegion {
                row,
                col,
                height,
                width,
            } => renderer.clear_region(*row, *col, *height, *width),
            Self::Refresh => renderer.refresh(),
            Self::RefreshRegion {
                row,
                col,
                height,
                width,
            } => renderer.refresh_region(*row, *col, *height, *width),
            Self::InitColorPair {
                pair_id,
                fg_color,
                bg_color,
            } => renderer.init_color_pair(*pair_id, *fg_color, *bg_color),
            Self::SetCursorVisibility { visible } => {
                renderer.set_cursor_visibility(*visible);
                Ok(())
            }
            Self::MoveCursor { row, col } => {
                renderer.move_cursor(*row, *col);
                Ok(())
            }
        }
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn rgb_value(rgb: Rgb) -> Value {
    Value::Array(rgb.to_array().iter().map(|&c| Value::from(c)).collect())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed access to the parameters of one serialized command.
struct Fields<'a>(&'a CommandMap);

impl Fields<'_> {
    fn require(&self, names: &[&'static str]) -> Result<(), CommandError> {
        let missing: Vec<&'static str> = names
            .iter()
            .copied()
            .filter(|name| !self.0.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommandError::MissingFields(missing))
        }
    }

    fn get(&self, field: &'static str) -> Result<&Value, CommandError> {
        self.0
            .get(field)
            .ok_or_else(|| CommandError::MissingFields(vec![field]))
    }

    fn int(&self, field: &'static str) -> Result<i32, CommandError> {
        let value = self.get(field)?;
        let wrong = |found| CommandError::WrongType {
            field,
            expected: "int",
            found,
        };
        let n = match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| wrong(json_type_name(value)))?,
            other => return Err(wrong(json_type_name(other))),
        };
        i32::try_from(n).map_err(|_| wrong("int outside the 32-bit range"))
    }

    fn int_or(&self, field: &'static str, default: i32) -> Result<i32, CommandError> {
        if self.0.contains_key(field) {
            self.int(field)
        } else {
            Ok(default)
        }
    }

    fn attributes(&self, field: &'static str) -> Result<TextAttribute, CommandError> {
        let bits = self.int_or(field, 0)?;
        u32::try_from(bits)
            .map(TextAttribute::from_bits)
            .map_err(|_| CommandError::WrongType {
                field,
                expected: "non-negative int",
                found: "negative int",
            })
    }

    fn string(&self, field: &'static str) -> Result<String, CommandError> {
        match self.get(field)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(CommandError::WrongType {
                field,
                expected: "string",
                found: json_type_name(other),
            }),
        }
    }

    /// First code point of a string field.
    fn ch(&self, field: &'static str) -> Result<char, CommandError> {
        self.string(field)?
            .chars()
            .next()
            .ok_or(CommandError::WrongType {
                field,
                expected: "string of length 1",
                found: "empty string",
            })
    }

    fn boolean(&self, field: &'static str) -> Result<bool, CommandError> {
        match self.get(field)? {
            Value::Bool(b) => Ok(*b),
            other => Err(CommandError::WrongType {
                field,
                expected: "bool",
                found: json_type_name(other),
            }),
        }
    }

    fn bool_or(&self, field: &'static str, default: bool) -> Result<bool, CommandError> {
        if self.0.contains_key(field) {
            self.boolean(field)
        } else {
            Ok(default)
        }
    }

    fn rgb(&self, field: &'static str) -> Result<Rgb, CommandError> {
        let items = match self.get(field)? {
            Value::Array(items) => items,
            other => {
                return Err(CommandError::WrongType {
                    field,
                    expected: "3-element array",
                    found: json_type_name(other),
                })
            }
        };
        if items.len() != 3 {
            return Err(CommandError::RgbLength {
                field,
                len: items.len(),
            });
        }
        let mut components = [0i64; 3];
        for (index, (item, slot)) in items.iter().zip(components.iter_mut()).enumerate() {
            *slot = item
                .as_i64()
                .ok_or(CommandError::RgbElement { field, index })?;
        }
        Ok(Rgb::from_components(field, components)?)
    }
}

/// Either form accepted by [`pretty_print`].
#[derive(Debug, Clone, Copy)]
pub enum CommandRef<'a> {
    /// A command value.
    Command(&'a Command),
    /// A serialized command.
    Map(&'a CommandMap),
}

impl<'a> From<&'a Command> for CommandRef<'a> {
    fn from(cmd: &'a Command) -> Self {
        Self::Command(cmd)
    }
}

impl<'a> From<&'a CommandMap> for CommandRef<'a> {
    fn from(map: &'a CommandMap) -> Self {
        Self::Map(map)
    }
}

/// Render a command for logs and test failure output.
///
/// ```text
/// draw_rect:
///   col: 0
///   color_pair: 2
///   filled: true
///   height: 10
///   row: 0
///   width: 20
/// ```
///
/// Parameters are sorted by name and indented two spaces past `indent`.
/// A command and its serialized mapping print identically.
pub fn pretty_print<'a>(command: impl Into<CommandRef<'a>>, indent: usize) -> String {
    match command.into() {
        CommandRef::Command(cmd) => cmd.pretty(indent),
        CommandRef::Map(map) => pretty_print_map(map, indent),
    }
}

/// [`pretty_print`] for a serialized command. A mapping without a
/// `command_type` prints as `unknown:`.
#[must_use]
pub fn pretty_print_map(map: &CommandMap, indent: usize) -> String {
    let command_type = match map.get("command_type") {
        Some(Value::String(s)) => s.as_str(),
        _ => "unknown",
    };
    let pad = " ".repeat(indent);
    let param_pad = " ".repeat(indent + 2);

    let mut out = format!("{pad}{command_type}:");
    let mut params: Vec<(&String, &Value)> =
        map.iter().filter(|(k, _)| k.as_str() != "command_type").collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in params {
        let _ = write!(out, "\n{param_pad}{key}: {}", format_value(value));
    }
    out
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("({})", parts.join(", "))
        }
        other => other.to_string(),
    }
}
