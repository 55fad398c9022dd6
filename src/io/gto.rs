// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GTO text format (`GTOa`) reading and writing.
//!
//! RV session files are GTO documents: a list of objects, each with a
//! protocol and version, holding components of typed properties. Only the
//! text flavour is supported. Property values are stored flat; `width` is
//! the number of scalars per element (`float[2]` points have width 2).

use crate::error::GtoError;
use std::fmt::Write as _;

/// GTO text format version written in the header.
pub const GTO_TEXT_VERSION: u32 = 4;

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtoType {
    Int,
    Float,
    Double,
    String,
    Byte,
    Short,
    Half,
    Bool,
}

impl GtoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GtoType::Int => "int",
            GtoType::Float => "float",
            GtoType::Double => "double",
            GtoType::String => "string",
            GtoType::Byte => "byte",
            GtoType::Short => "short",
            GtoType::Half => "half",
            GtoType::Bool => "bool",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(GtoType::Int),
            "float" => Some(GtoType::Float),
            "double" => Some(GtoType::Double),
            "string" => Some(GtoType::String),
            "byte" => Some(GtoType::Byte),
            "short" => Some(GtoType::Short),
            "half" => Some(GtoType::Half),
            "bool" => Some(GtoType::Bool),
            _ => None,
        }
    }
}

/// Flat property values.
#[derive(Debug, Clone, PartialEq)]
pub enum GtoValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
}

impl GtoValues {
    pub fn len(&self) -> usize {
        match self {
            GtoValues::Int(v) => v.len(),
            GtoValues::Float(v) => v.len(),
            GtoValues::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GtoProperty {
    pub name: String,
    pub ty: GtoType,
    pub width: usize,
    pub values: GtoValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GtoComponent {
    pub name: String,
    pub properties: Vec<GtoProperty>,
}

impl GtoComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    fn with(mut self, name: &str, ty: GtoType, width: usize, values: GtoValues) -> Self {
        self.properties.push(GtoProperty {
            name: name.to_string(),
            ty,
            width,
            values,
        });
        self
    }

    pub fn with_int(self, name: &str, value: i64) -> Self {
        self.with(name, GtoType::Int, 1, GtoValues::Int(vec![value]))
    }

    pub fn with_ints(self, name: &str, width: usize, values: Vec<i64>) -> Self {
        self.with(name, GtoType::Int, width, GtoValues::Int(values))
    }

    pub fn with_float(self, name: &str, value: f64) -> Self {
        self.with(name, GtoType::Float, 1, GtoValues::Float(vec![value]))
    }

    pub fn with_floats(self, name: &str, width: usize, values: Vec<f64>) -> Self {
        self.with(name, GtoType::Float, width, GtoValues::Float(values))
    }

    pub fn with_string(self, name: &str, value: impl Into<String>) -> Self {
        self.with(name, GtoType::String, 1, GtoValues::String(vec![value.into()]))
    }

    pub fn with_strings(self, name: &str, values: Vec<String>) -> Self {
        self.with(name, GtoType::String, 1, GtoValues::String(values))
    }

    pub fn property(&self, name: &str) -> Option<&GtoProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn ints(&self, name: &str) -> Option<&[i64]> {
        match &self.property(name)?.values {
            GtoValues::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric values as floats, accepting int properties too.
    pub fn floats(&self, name: &str) -> Option<Vec<f64>> {
        match &self.property(name)?.values {
            GtoValues::Float(v) => Some(v.clone()),
            GtoValues::Int(v) => Some(v.iter().map(|i| *i as f64).collect()),
            GtoValues::String(_) => None,
        }
    }

    pub fn strings(&self, name: &str) -> Option<&[String]> {
        match &self.property(name)?.values {
            GtoValues::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.ints(name)?.first().copied()
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.floats(name)?.first().copied()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings(name)?.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GtoObject {
    pub name: String,
    pub protocol: String,
    pub protocol_version: u32,
    pub components: Vec<GtoComponent>,
}

impl GtoObject {
    pub fn new(name: impl Into<String>, protocol: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            protocol_version: version,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: GtoComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn component(&self, name: &str) -> Option<&GtoComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// A whole GTO document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GtoDocument {
    pub objects: Vec<GtoObject>,
}

impl GtoDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: GtoObject) {
        self.objects.push(object);
    }

    /// First object with the given protocol.
    pub fn find_protocol(&self, protocol: &str) -> Option<&GtoObject> {
        self.objects.iter().find(|o| o.protocol == protocol)
    }

    /// Render as GTO text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "GTOa ({})", GTO_TEXT_VERSION);
        for object in &self.objects {
            out.push('\n');
            let _ = writeln!(
                out,
                "{} : {} ({})",
                quote_name(&object.name),
                object.protocol,
                object.protocol_version
            );
            out.push_str("{\n");
            for (i, component) in object.components.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "    {}", quote_name(&component.name));
                out.push_str("    {\n");
                for property in &component.properties {
                    write_property(&mut out, property);
                }
                out.push_str("    }\n");
            }
            out.push_str("}\n");
        }
        out
    }

    /// Parse GTO text.
    pub fn parse(text: &str) -> Result<Self, GtoError> {
        Parser::new(tokenize(text)?).document()
    }
}

fn write_property(out: &mut String, property: &GtoProperty) {
    let ty = property.ty.as_str();
    let width = property.width.max(1);
    let _ = if width > 1 {
        write!(out, "        {}[{}] {} = ", ty, width, quote_name(&property.name))
    } else {
        write!(out, "        {} {} = ", ty, quote_name(&property.name))
    };

    let items: Vec<String> = match &property.values {
        GtoValues::Int(v) => v.iter().map(|i| i.to_string()).collect(),
        GtoValues::Float(v) => v.iter().map(|f| format_float(*f)).collect(),
        GtoValues::String(v) => v.iter().map(|s| quote_string(s)).collect(),
    };

    if width == 1 && items.len() == 1 {
        out.push_str(&items[0]);
    } else if width == 1 {
        out.push('[');
        for item in &items {
            out.push(' ');
            out.push_str(item);
        }
        out.push_str(" ]");
    } else {
        out.push('[');
        for chunk in items.chunks(width) {
            out.push_str(" [ ");
            out.push_str(&chunk.join(" "));
            out.push_str(" ]");
        }
        out.push_str(" ]");
    }
    out.push('\n');
}

/// GTO floats are single precision; format through `f32` so values such
/// as `0.1` print without binary noise.
fn format_float(value: f64) -> String {
    let single = value as f32;
    if single == 0.0 {
        "0".to_string()
    } else {
        single.to_string()
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn quote_name(name: &str) -> String {
    if is_plain_name(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// -------------------------------------------------------------------------
// Tokenizer
// -------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Number(String),
    Symbol(char),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Str(s) => format!("\"{}\"", s),
            Token::Number(n) => n.clone(),
            Token::Symbol(c) => c.to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, GtoError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '{' | '}' | '[' | ']' | '(' | ')' | ':' | '=' => {
                tokens.push((Token::Symbol(c), line));
                chars.next();
            }
            '"' => {
                let start = line;
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(GtoError::UnterminatedString { line: start }),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some('r') => value.push('\r'),
                            Some(other) => value.push(other),
                            None => return Err(GtoError::UnterminatedString { line: start }),
                        },
                        Some('\n') => {
                            line += 1;
                            value.push('\n');
                        }
                        Some(other) => value.push(other),
                    }
                }
                tokens.push((Token::Str(value), start));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut value = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.') {
                        value.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Number(value), line));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut value = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        value.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Word(value), line));
            }
            other => {
                return Err(GtoError::UnexpectedToken {
                    line,
                    expected: "a GTO token",
                    found: other.to_string(),
                })
            }
        }
    }
    Ok(tokens)
}

// -------------------------------------------------------------------------
// Parser
// -------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |(_, l)| *l)
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, GtoError> {
        match self.tokens.get(self.pos) {
            Some((token, _)) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(GtoError::UnexpectedEof {
                line: self.line(),
                expected,
            }),
        }
    }

    fn unexpected(&self, token: &Token, expected: &'static str) -> GtoError {
        GtoError::UnexpectedToken {
            line: self.line_before(),
            expected,
            found: token.describe(),
        }
    }

    /// Line of the most recently consumed token.
    fn line_before(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map_or(1, |(_, l)| *l)
    }

    fn expect_symbol(&mut self, symbol: char, expected: &'static str) -> Result<(), GtoError> {
        match self.next(expected)? {
            Token::Symbol(c) if c == symbol => Ok(()),
            other => Err(self.unexpected(&other, expected)),
        }
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if self.peek() == Some(&Token::Symbol(symbol)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn name(&mut self, expected: &'static str) -> Result<String, GtoError> {
        match self.next(expected)? {
            Token::Word(w) => Ok(w),
            Token::Str(s) => Ok(s),
            other => Err(self.unexpected(&other, expected)),
        }
    }

    fn integer(&mut self, expected: &'static str) -> Result<i64, GtoError> {
        match self.next(expected)? {
            Token::Number(n) => n.parse().map_err(|_| GtoError::InvalidValue {
                line: self.line_before(),
                ty: "int",
                value: n,
            }),
            other => Err(self.unexpected(&other, expected)),
        }
    }

    fn document(&mut self) -> Result<GtoDocument, GtoError> {
        match self.next("GTOa header") {
            Ok(Token::Word(w)) if w == "GTOa" => {}
            _ => return Err(GtoError::MissingHeader),
        }
        if self.eat_symbol('(') {
            self.integer("format version")?;
            self.expect_symbol(')', "')'")?;
        }

        let mut document = GtoDocument::new();
        while self.peek().is_some() {
            document.push(self.object()?);
        }
        Ok(document)
    }

    fn object(&mut self) -> Result<GtoObject, GtoError> {
        let name = self.name("object name")?;
        let mut protocol = String::new();
        let mut version = 1;
        if self.eat_symbol(':') {
            protocol = self.name("protocol name")?;
            if self.eat_symbol('(') {
                version = u32::try_from(self.integer("protocol version")?).unwrap_or(1);
                self.expect_symbol(')', "')'")?;
            }
        }
        self.expect_symbol('{', "'{'")?;

        let mut object = GtoObject::new(name, protocol, version);
        while !self.eat_symbol('}') {
            object.components.push(self.component()?);
        }
        Ok(object)
    }

    fn component(&mut self) -> Result<GtoComponent, GtoError> {
        let name = self.name("component name")?;
        // Optional interpretation string: `name : interp`.
        if self.eat_symbol(':') {
            self.name("component interpretation")?;
        }
        self.expect_symbol('{', "'{'")?;

        let mut component = GtoComponent::new(name);
        while !self.eat_symbol('}') {
            component.properties.push(self.property()?);
        }
        Ok(component)
    }

    fn property(&mut self) -> Result<GtoProperty, GtoError> {
        let type_line = self.line();
        let type_name = self.name("property type")?;
        let ty = GtoType::parse(&type_name).ok_or_else(|| GtoError::UnknownType {
            line: type_line,
            name: type_name.clone(),
        })?;

        // Width and optional extra dimensions, e.g. `float[4]` or `float[2][3]`.
        let mut width = 1;
        let mut dims = 0;
        while self.eat_symbol('[') {
            let size = self.integer("property width")?;
            self.expect_symbol(']', "']'")?;
            if dims == 0 {
                width = usize::try_from(size).unwrap_or(1).max(1);
            }
            dims += 1;
        }

        let name = self.name("property name")?;
        if self.eat_symbol(':') {
            self.name("property interpretation")?;
        }

        let mut raw = Vec::new();
        if self.eat_symbol('=') {
            self.value(&mut raw)?;
        }

        let values = convert_values(ty, raw)?;
        if width > 1 && values.len() % width != 0 {
            return Err(GtoError::WidthMismatch {
                line: type_line,
                name,
                count: values.len(),
                width,
            });
        }
        Ok(GtoProperty {
            name,
            ty,
            width,
            values,
        })
    }

    /// Collect scalars of a value, flattening nested lists.
    fn value(&mut self, out: &mut Vec<(Token, usize)>) -> Result<(), GtoError> {
        if self.eat_symbol('[') {
            while !self.eat_symbol(']') {
                if self.peek().is_none() {
                    return Err(GtoError::UnexpectedEof {
                        line: self.line(),
                        expected: "']'",
                    });
                }
                self.value(out)?;
            }
            return Ok(());
        }
        let line = self.line();
        match self.next("property value")? {
            token @ (Token::Number(_) | Token::Str(_) | Token::Word(_)) => {
                out.push((token, line));
                Ok(())
            }
            other => Err(self.unexpected(&other, "property value")),
        }
    }
}

fn convert_values(ty: GtoType, raw: Vec<(Token, usize)>) -> Result<GtoValues, GtoError> {
    match ty {
        GtoType::String => Ok(GtoValues::String(
            raw.into_iter()
                .map(|(token, _)| match token {
                    Token::Str(s) | Token::Word(s) | Token::Number(s) => s,
                    Token::Symbol(c) => c.to_string(),
                })
                .collect(),
        )),
        GtoType::Float | GtoType::Double | GtoType::Half => raw
            .into_iter()
            .map(|(token, line)| match token {
                Token::Number(n) => n.parse::<f64>().map_err(|_| GtoError::InvalidValue {
                    line,
                    ty: "float",
                    value: n,
                }),
                other => Err(GtoError::InvalidValue {
                    line,
                    ty: "float",
                    value: other.describe(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(GtoValues::Float),
        GtoType::Int | GtoType::Byte | GtoType::Short | GtoType::Bool => raw
            .into_iter()
            .map(|(token, line)| match token {
                Token::Number(n) => n.parse::<i64>().map_err(|_| GtoError::InvalidValue {
                    line,
                    ty: "int",
                    value: n,
                }),
                Token::Word(w) if w == "true" => Ok(1),
                Token::Word(w) if w == "false" => Ok(0),
                other => Err(GtoError::InvalidValue {
                    line,
                    ty: "int",
                    value: other.describe(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(GtoValues::Int),
    }
}
