use winnow::{
    ModalResult, Parser,
    combinator::{alt, eof, opt, preceded},
    error::{ContextError, ErrMode, StrContext},
    token::{rest, take_till, take_while},
};

use crate::Flag;

/// Characters that count as whitespace when trimming a line. Tabs are measured for indentation
/// before the line gets here.
fn is_trimmed(c: char) -> bool {
    c == ' ' || c.is_ascii_control()
}

/// A token delimited by `quote`. The token runs to the matching quote or, if there is none, to the end
/// of the line. An unterminated quote with nothing after it yields no token.
fn quoted<'a>(quote: char) -> impl Parser<&'a str, Option<&'a str>, ErrMode<ContextError>> {
    (preceded(quote, take_till(0.., quote)), opt(quote))
        .map(|(content, closing): (&'a str, Option<char>)| {
            if closing.is_none() && content.is_empty() {
                None
            } else {
                Some(content)
            }
        })
        .context(StrContext::Label("quoted_token"))
}

/// A space-delimited token. A `#` ends the token and starts a comment.
fn bare<'a>(input: &mut &'a str) -> ModalResult<Option<&'a str>> {
    take_till(1.., [' ', '#'])
        .map(Some)
        .context(StrContext::Label("bare_token"))
        .parse_next(input)
}

/// A trailing comment; consumes the rest of the line.
fn comment<'a>(input: &mut &'a str) -> ModalResult<()> {
    preceded('#', rest)
        .void()
        .context(StrContext::Label("comment"))
        .parse_next(input)
}

#[derive(Clone)]
enum Step<'a> {
    Token(Option<&'a str>),
    End,
}

fn step<'a>(input: &mut &'a str) -> ModalResult<Step<'a>> {
    preceded(
        take_while(0.., ' '),
        alt((
            eof.value(Step::End),
            comment.value(Step::End),
            quoted('"').map(Step::Token),
            quoted('`').map(Step::Token),
            bare.map(Step::Token),
        )),
    )
    .parse_next(input)
}

/// Splits one line into its tokens, honouring quotes and `#` comments.
///
/// Returns an empty list for blank or comment-only lines. A token can only be empty when it comes
/// from an explicit empty quoted pair such as `""`.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut input = line.trim_matches(is_trimmed);
    let mut tokens = Vec::new();

    loop {
        match step.parse_next(&mut input) {
            Ok(Step::Token(Some(token))) => tokens.push(token.to_string()),
            Ok(Step::Token(None)) => {}
            Ok(Step::End) | Err(_) => break,
        }
    }

    tokens
}

/// The flag, name and arguments of a single line, before it is placed in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHead {
    pub flag: Flag,
    pub name: String,
    pub args: Vec<String>,
}

/// A line that has tokens but cannot form a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadError {
    /// The line consists of a bare `add` or `remove` keyword.
    MissingName(Flag),
}

impl std::fmt::Display for HeadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName(flag) => write!(f, "Unnamed node after {} flag", flag),
        }
    }
}

impl std::error::Error for HeadError {}

/// Tokenizes a line and splits off the flag keyword and the node name.
///
/// `Ok(None)` means the line is blank or only a comment.
pub fn parse_head(line: &str) -> Result<Option<NodeHead>, HeadError> {
    let mut tokens = tokenize(line).into_iter();

    let Some(first) = tokens.next() else {
        return Ok(None);
    };

    let (flag, name) = match Flag::from_keyword(&first) {
        Some(flag) => match tokens.next() {
            Some(name) => (flag, name),
            None => return Err(HeadError::MissingName(flag)),
        },
        None => (Flag::Normal, first),
    };

    Ok(Some(NodeHead {
        flag,
        name,
        args: tokens.collect(),
    }))
}
