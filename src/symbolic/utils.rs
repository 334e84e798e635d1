// the collection of utility functions mainly for bracket parsing and proceeding
use crate::symbolic::expansion_error::ExpansionError;

/// finds all pairs of matching delimiters in a string, nested pairs included.
/// Pairs are ordered by the position of the opening delimiter, positions are byte offsets.
///
///# Example
/// ```
/// use RustedSums::symbolic::utils::matching_pairs;
/// let pairs = matching_pairs("x[i,j] = sum(a+b for a in range(i))", '(', ')');
/// assert_eq!(pairs, vec![(12, 34), (31, 33)]);
/// ```
/// An opening delimiter without a partner produces no pair, so for unbalanced text
/// there are fewer pairs than openers. Use [`check_balanced`] to turn that into an error.
pub fn matching_pairs(input: &str, open: char, close: char) -> Vec<(usize, usize)> {
    let mut stack = Vec::new();
    let mut pairs = Vec::new();
    for (i, c) in input.char_indices() {
        if c == open {
            stack.push(i);
        } else if c == close {
            if let Some(start) = stack.pop() {
                pairs.push((start, i));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// returns the first unbalanced delimiter as an error carrying the text from that position on
pub fn check_balanced(input: &str, open: char, close: char) -> Result<(), ExpansionError> {
    let mut stack = Vec::new();
    for (i, c) in input.char_indices() {
        if c == open {
            stack.push(i);
        } else if c == close && stack.pop().is_none() {
            return Err(ExpansionError::UnbalancedDelimiters {
                fragment: input[i..].to_string(),
                position: i,
            });
        }
    }
    match stack.first() {
        Some(&position) => Err(ExpansionError::UnbalancedDelimiters {
            fragment: input[position..].to_string(),
            position,
        }),
        None => Ok(()),
    }
}

// code finds the position of the delimiter closing the one at bracket_start
pub fn find_pair_to_this_bracket(
    input: &str,
    bracket_start: usize,
    open: char,
    close: char,
) -> Option<usize> {
    if !input[bracket_start..].starts_with(open) {
        return None;
    }
    let mut counter = 0usize;
    for (i, c) in input[bracket_start..].char_indices() {
        if c == open {
            counter += 1;
        } else if c == close {
            counter -= 1;
            if counter == 0 {
                return Some(bracket_start + i);
            }
        }
    }
    None
}

// round and square brackets both count as nesting
fn nesting_step(c: char) -> isize {
    match c {
        '(' | '[' => 1,
        ')' | ']' => -1,
        _ => 0,
    }
}

/// position of the last occurrence of `target` that is outside any () or [] pair
pub fn find_last_char_outside_brackets(input: &str, target: char) -> Option<usize> {
    let mut depth = 0isize;
    let mut last = None;
    for (i, c) in input.char_indices() {
        if c == target && depth == 0 {
            last = Some(i);
        }
        depth += nesting_step(c);
    }
    last
}

/// splits at every `separator` that is outside () and [] pairs
pub fn split_outside_brackets(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c == separator && depth == 0 {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
        depth += nesting_step(c);
    }
    parts.push(&input[start..]);
    parts
}

/// true when the char may be a part of a variable or index name
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// true when the string is a valid index name: a letter or '_' followed by letters, digits or '_'
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}
