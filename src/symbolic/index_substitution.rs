//! Replaces index names inside `[...]` index lists with integer values.
//!
//! An index slot is the text between `[` or `,` and the next `,` or `]`. A slot that is the
//! index name itself, optionally followed by an integer offset, becomes one integer. In any other
//! slot every standalone occurrence of the name is replaced by the value and the arithmetic
//! around it is kept.
//! ```
//! use RustedSums::symbolic::index_substitution::substitute;
//! assert_eq!(substitute("A+B[j-1]+C[i,j]", "j", 3), "A+B[2]+C[i,3]");
//! assert_eq!(substitute("x[2*j+1]", "j", 3), "x[2*3+1]");
//! // a longer name sharing the prefix is a different index
//! assert_eq!(substitute("x[i2]+x[i]", "i", 5), "x[i2]+x[5]");
//! ```
use crate::symbolic::utils::{find_pair_to_this_bracket, is_identifier_char, split_outside_brackets};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, digit1, one_of, space0},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
};

/// Parses an index name (letter or '_' first)
fn parse_index_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Parses `+k` or `-k` with optional spaces around the sign
fn parse_offset(input: &str) -> IResult<&str, i64> {
    let sign = delimited(space0, one_of("+-"), space0);
    let magnitude = map_res(digit1, |digits: &str| digits.parse::<i64>());
    let mut parser = map(pair(sign, magnitude), |(sign, value)| {
        if sign == '-' { -value } else { value }
    });
    parser.parse(input)
}

/// Parses a whole index slot: `name` or `name+k` / `name-k`, surrounding spaces allowed.
/// Returns the name and the offset (0 for the bare form).
pub fn parse_index_slot(input: &str) -> IResult<&str, (&str, i64)> {
    let mut parser = all_consuming(delimited(
        space0,
        pair(parse_index_name, opt(parse_offset)),
        space0,
    ));
    let (input, (name, offset)) = parser.parse(input)?;
    Ok((input, (name, offset.unwrap_or(0))))
}

/// substitutes `index_name` (and its offset forms) with `value` in every index list of `text`.
/// The text is returned unchanged when the index does not occur.
pub fn substitute(text: &str, index_name: &str, value: i64) -> String {
    if index_name.is_empty() {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find('[') {
        let open = pos + found;
        result.push_str(&text[pos..=open]);
        match find_pair_to_this_bracket(text, open, '[', ']') {
            Some(close) => {
                let slots: Vec<String> = split_outside_brackets(&text[open + 1..close], ',')
                    .into_iter()
                    .map(|slot| substitute_slot(slot, index_name, value))
                    .collect();
                result.push_str(&slots.join(","));
                result.push(']');
                pos = close + 1;
            }
            // unclosed bracket, keep scanning after it
            None => pos = open + 1,
        }
    }
    result.push_str(&text[pos..]);
    result
}

fn substitute_slot(slot: &str, index_name: &str, value: i64) -> String {
    match parse_index_slot(slot) {
        Ok((_, (name, offset))) if name == index_name => match value.checked_add(offset) {
            Some(shifted) => {
                let leading = slot.len() - slot.trim_start().len();
                let trailing = slot.len() - slot.trim_end().len();
                format!(
                    "{}{}{}",
                    &slot[..leading],
                    shifted,
                    &slot[slot.len() - trailing..]
                )
            }
            None => slot.to_string(),
        },
        // i*2, i+j, q[i]+1 and the like
        _ => substitute_tokens(&substitute(slot, index_name, value), index_name, value),
    }
}

// replaces every occurrence of `index_name` not glued to other identifier characters
fn substitute_tokens(slot: &str, index_name: &str, value: i64) -> String {
    let literal = if value < 0 {
        format!("({})", value)
    } else {
        value.to_string()
    };
    let mut result = String::with_capacity(slot.len());
    let mut pos = 0;
    while let Some(found) = slot[pos..].find(index_name) {
        let start = pos + found;
        let end = start + index_name.len();
        let glued = slot[..start]
            .chars()
            .next_back()
            .is_some_and(is_identifier_char)
            || slot[end..].chars().next().is_some_and(is_identifier_char);
        result.push_str(&slot[pos..start]);
        result.push_str(if glued { index_name } else { literal.as_str() });
        pos = end;
    }
    result.push_str(&slot[pos..]);
    result
}
