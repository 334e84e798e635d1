/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. The expansion task document uses three titles:
/// ```text
/// domains
///  i: 0, 1, 2
///  t: 0..24
/// fixed
///  k: 3
/// settings
///  loglevel: warn
///  max_passes: 500
/// ```
/// `domains` keys become `IndexBinding::Domain` (a `start..end` value is a range, end excluded),
/// `fixed` keys become `IndexBinding::Fixed`, `settings` fill [`ExpansionSettings`].
use crate::symbolic::expander::ExpansionSettings;
use crate::symbolic::expansion_error::ExpansionError;
use crate::symbolic::indexed_expression::{IndexBinding, IndexBindings};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::fmt;
use std::fs;
use std::path::Path;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(val) => write!(f, "{}", val),
            Value::Float(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// titled group of `key: values` lines, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub entries: Vec<(String, Vec<Value>)>,
}

/// Parses a title or a key (word characters without spaces)
pub fn parse_word(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Parses one value, typed in the order integer, float, boolean, text
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    let raw = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    map(raw, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::Text(s.to_string())
        }
    })
    .parse(input)
}

/// Parses comma separated values on one line
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator = delimited(space0, tag(","), space0);
    separated_list1(separator, parse_value).parse(input)
}

/// Parses `key: value, value`
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let (input, result) = separated_pair(parse_word, colon, parse_value_list).parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a title followed by at least one key-value pair
pub fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, title) = terminated(parse_word, multispace0).parse(input)?;
    let (input, entries) = many1(terminated(parse_key_value_pair, space0)).parse(input)?;
    Ok((input, Section { title, entries }))
}

/// Filters out comment lines (starting with //, #, %, or ;) and empty lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document; anything left unparsed is an error
pub fn parse_document(input: &str) -> Result<Vec<Section>, ExpansionError> {
    let filtered = filter_comments(input);
    let mut parser = many0(delimited(multispace0, parse_section, multispace0));
    let (remaining, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| ExpansionError::Parse(format!("{:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(ExpansionError::Parse(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining
        )));
    }
    Ok(sections)
}

fn integer_of(key: &str, value: &Value) -> Result<i64, ExpansionError> {
    value
        .as_integer()
        .ok_or_else(|| ExpansionError::Parse(format!("'{}' of '{}' is not an integer", value, key)))
}

// `a..b` written as a single value, end excluded
fn text_range(text: &str) -> Option<Vec<i64>> {
    let (start, end) = text.split_once("..")?;
    let start = start.parse::<i64>().ok()?;
    let end = end.parse::<i64>().ok()?;
    Some((start..end).collect())
}

fn domain_values(key: &str, values: &[Value]) -> Result<Vec<i64>, ExpansionError> {
    let mut domain = Vec::new();
    for value in values {
        match value.as_text().and_then(text_range) {
            Some(range) => domain.extend(range),
            None => domain.push(integer_of(key, value)?),
        }
    }
    Ok(domain)
}

fn single_value<'a>(key: &str, values: &'a [Value]) -> Result<&'a Value, ExpansionError> {
    match values {
        [value] => Ok(value),
        _ => Err(ExpansionError::Parse(format!(
            "'{}' takes exactly one value, got {}",
            key,
            values.len()
        ))),
    }
}

fn apply_setting(
    settings: &mut ExpansionSettings,
    key: &str,
    values: &[Value],
) -> Result<(), ExpansionError> {
    let value = single_value(key, values)?;
    match key {
        "loglevel" => settings.loglevel = Some(value.to_string()),
        "log_file" => settings.log_file = Some(value.to_string()),
        "max_passes" => {
            let passes = integer_of(key, value)?;
            let passes = usize::try_from(passes).map_err(|_| {
                ExpansionError::Config(format!("max_passes must not be negative, got {}", passes))
            })?;
            settings.max_passes = Some(passes);
        }
        _ => {
            return Err(ExpansionError::Parse(format!("unknown setting '{}'", key)));
        }
    }
    Ok(())
}

/// bindings and settings of an expansion task document
pub fn parse_expansion_task(
    input: &str,
) -> Result<(IndexBindings, ExpansionSettings), ExpansionError> {
    let mut bindings = IndexBindings::new();
    let mut settings = ExpansionSettings::default();
    for section in parse_document(input)? {
        for (key, values) in &section.entries {
            match section.title.as_str() {
                "domains" => {
                    bindings.insert(key, IndexBinding::Domain(domain_values(key, values)?))?
                }
                "fixed" => {
                    let value = integer_of(key, single_value(key, values)?)?;
                    bindings.insert(key, IndexBinding::Fixed(value))?
                }
                "settings" => apply_setting(&mut settings, key, values)?,
                other => {
                    return Err(ExpansionError::Parse(format!(
                        "unknown section '{}', expected domains, fixed or settings",
                        other
                    )));
                }
            }
        }
    }
    Ok((bindings, settings))
}

/// reads a task document from a file and parses it
pub fn read_expansion_task<P: AsRef<Path>>(
    path: P,
) -> Result<(IndexBindings, ExpansionSettings), ExpansionError> {
    let content = fs::read_to_string(path)?;
    parse_expansion_task(&content)
}
