//! Locates the outermost `sum(body, index)` constructs of an expression string.

//                  search diagram for "A + sum(p[i,0],i) + sum(sum(q[i,j],i),j)"
//                |  text before    |  sum(...)          |  rest                 |
//                |_________________|____________________|_______________________|
//                |   "A + "        | "sum(p[i,0],i)"    | " + sum(sum(..),j)"   |
//                |                 |  body | index      |         |             |
//                |                 | p[i,0]|  i         |        \|/            |
//                |_________________|_______|____________|_______________________|
//                |                          sibling search on the rest          |
//                |                 "sum(sum(q[i,j],i),j)"  body "sum(q[i,j],i)" |
//                |     nested sum stays inside the body, it is found only when  |
//                |     the expander rescans the text after splicing the body    |
use crate::symbolic::expansion_error::ExpansionError;
use crate::symbolic::utils::{find_last_char_outside_brackets, find_pair_to_this_bracket, is_identifier_char};

const SUM_TOKEN: &str = "sum(";

/// One outermost sum found in a text. `start..end` is the byte range of `full_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumOccurrence {
    /// from `sum(` up to and including the matching `)`
    pub full_text: String,
    /// everything between `sum(` and the last top level comma
    pub body_text: String,
    /// the trimmed name after that comma
    pub bound_index: String,
    pub start: usize,
    pub end: usize,
}

// start of the next `sum(` that is not the tail of a longer identifier like `cumsum(`
fn find_sum_token(input: &str, from: usize) -> Option<usize> {
    let mut search_from = from;
    while let Some(pos) = input[search_from..].find(SUM_TOKEN) {
        let start = search_from + pos;
        let glued = input[..start]
            .chars()
            .next_back()
            .is_some_and(is_identifier_char);
        if !glued {
            return Some(start);
        }
        search_from = start + SUM_TOKEN.len();
    }
    None
}

/// returns the outermost sums of `input` in source order; sums nested inside a body are not reported
pub fn find_sums(input: &str) -> Result<Vec<SumOccurrence>, ExpansionError> {
    let mut occurrences = Vec::new();
    let mut from = 0;
    // siblings later in the same string
    while let Some(occurrence) = locate_sum(input, from)? {
        from = occurrence.end;
        occurrences.push(occurrence);
    }
    Ok(occurrences)
}

/// the first sum starting at or after byte `from`
pub fn locate_sum(input: &str, from: usize) -> Result<Option<SumOccurrence>, ExpansionError> {
    let Some(start) = find_sum_token(input, from) else {
        return Ok(None);
    };
    let open = start + SUM_TOKEN.len() - 1;
    let close = find_pair_to_this_bracket(input, open, '(', ')').ok_or_else(|| {
        ExpansionError::UnbalancedDelimiters {
            fragment: input[start..].to_string(),
            position: start,
        }
    })?;
    let full_text = &input[start..=close];
    let inside = &input[open + 1..close];
    let comma = find_last_char_outside_brackets(inside, ',').ok_or_else(|| {
        ExpansionError::MissingSumIndex {
            sum: full_text.to_string(),
        }
    })?;
    let bound_index = inside[comma + 1..].trim();
    if bound_index.is_empty() {
        return Err(ExpansionError::MissingSumIndex {
            sum: full_text.to_string(),
        });
    }
    Ok(Some(SumOccurrence {
        full_text: full_text.to_string(),
        body_text: inside[..comma].to_string(),
        bound_index: bound_index.to_string(),
        start,
        end: close + 1,
    }))
}
