//! Compact one-line chunk notation, the hand-off format between a
//! tagger/chunker and the reducer:
//!
//! ```text
//! NP[DT NN](the cat) VP[VBZ](sits) .[.](.)
//! ```
//!
//! Each chunk is `KIND[TAG ...](token ...)`. Spans are assigned from token
//! positions, starting at 0.

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, multispace0, multispace1},
    combinator::map_opt,
    multi::separated_list1,
    sequence::{delimited, pair, tuple},
    IResult,
};
use stemma_protocol::{Category, Chunk, Span};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("malformed chunk at byte {offset}: expected `KIND[TAG ...](token ...)` near {snippet:?}")]
    Malformed { offset: usize, snippet: String },
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')')
}

fn category(input: &str) -> IResult<&str, Category> {
    map_opt(take_till1(is_delimiter), Category::from_penn)(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || matches!(c, '(' | ')'))(input)
}

fn tags(input: &str) -> IResult<&str, Vec<Category>> {
    delimited(
        pair(char('['), multispace0),
        separated_list1(multispace1, category),
        pair(multispace0, char(']')),
    )(input)
}

fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        pair(char('('), multispace0),
        separated_list1(multispace1, token),
        pair(multispace0, char(')')),
    )(input)
}

fn chunk(input: &str) -> IResult<&str, (Category, Vec<Category>, Vec<&str>)> {
    tuple((category, tags, tokens))(input)
}

/// Reads one sentence. An empty or all-whitespace line is an empty sentence.
pub fn parse_notation(original_input: &str) -> Result<Vec<Chunk>, NotationError> {
    let mut input = original_input;
    let mut chunks = Vec::new();
    let mut position = 0;

    loop {
        // 1. Skip whitespace between chunks
        let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(input).map_err(|_| malformed(original_input, input))?;
        input = rest;

        if input.is_empty() {
            break;
        }

        // 2. Read one chunk
        let (rest, (kind, tags, tokens)) = chunk(input).map_err(|_| malformed(original_input, input))?;

        let span = Span::new(position, position + tokens.len() - 1);
        position += tokens.len();

        chunks.push(Chunk {
            kind,
            tags,
            tokens: tokens.into_iter().map(str::to_string).collect(),
            span,
        });
        input = rest;
    }

    Ok(chunks)
}

fn malformed(original_input: &str, at: &str) -> NotationError {
    NotationError::Malformed {
        offset: original_input.len() - at.len(),
        snippet: at.chars().take(24).collect(),
    }
}

/// Writes chunks back in the notation [`parse_notation`] reads.
pub fn to_notation(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let tags: Vec<&str> = chunk.tags.iter().map(|tag| tag.as_str()).collect();
            format!("{}[{}]({})", chunk.kind, tags.join(" "), chunk.tokens.join(" "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
