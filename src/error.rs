use std::error::Error;
use std::fmt;

use crate::parser::ParseError;

/// `kind` argument of the `describe`/`show` commands, or of a `KnowledgeBase`
/// accessor: either the axiom list or the theorem list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Axiom,
    Theorem,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Axiom => write!(f, "axiom"),
            Kind::Theorem => write!(f, "theorem"),
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Kind, CommandError> {
        match s {
            "axiom" => Ok(Kind::Axiom),
            "theorem" => Ok(Kind::Theorem),
            other => Err(CommandError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors raised by the `KnowledgeBase` façade. Clausification itself is
/// total in this implementation (it always returns a, possibly empty, clause
/// set), so the `ClausificationError` named in the error taxonomy has no
/// constructor here; `IndexOutOfRange` is the only way `describe`/`get` fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KbError {
    IndexOutOfRange { kind: Kind, index: usize, len: usize },
}

impl fmt::Display for KbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KbError::IndexOutOfRange { kind, index, len } => {
                write!(f, "{} index {} out of range (have {})", kind, index, len)
            }
        }
    }
}

impl Error for KbError {}

/// Errors at the interactive-shell boundary. Every command either succeeds
/// or produces one of these and returns to the prompt; none of them ever
/// mutate the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    BadCommand(String),
    UnknownKind(String),
    Parse(ParseError),
    Kb(KbError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::BadCommand(msg) => write!(f, "bad command: {}", msg),
            CommandError::UnknownKind(kind) => {
                write!(f, "unknown kind '{}' (expected 'axiom' or 'theorem')", kind)
            }
            CommandError::Parse(err) => write!(f, "{}", err),
            CommandError::Kb(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CommandError {}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> CommandError {
        CommandError::Parse(err)
    }
}

impl From<KbError> for CommandError {
    fn from(err: KbError) -> CommandError {
        CommandError::Kb(err)
    }
}
