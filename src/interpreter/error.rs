use crate::diagnostic::{Diagnostic, Label, Span};
use crate::value::ValueTag;

/// The one error kind raised by the lexer, parser and evaluator. Every
/// variant carries the half-open source range it refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnrecognizedCharacter { found: char, span: Span },
    UnterminatedString { span: Span },
    UnexpectedToken { expected: String, found: String, span: Span },
    ExpectedExpression { found: String, span: Span },
    InvalidStatement { found: String, span: Span },
    UnterminatedBlock { span: Span },
    NestingTooDeep { limit: usize, span: Span },
    ArityMismatch { name: String, expected: usize, found: usize, span: Span },
    TypeMismatch { operator: String, left: ValueTag, right: ValueTag, span: Span },
    UnsupportedOperator { operator: String, operand: ValueTag, span: Span },
    UndefinedName { name: String, span: Span },
    TypeError { message: String, span: Span },
    NotCallable { name: String, span: Span },
    ProcedureAsValue { name: String, span: Span },
    InvalidArgument { message: String, span: Span },
    RecursionLimit { limit: usize, span: Span },
}

impl Error {
    pub fn unexpected_token(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn invalid_argument(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            span,
        }
    }

    pub fn undefined_name(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedName {
            name: name.into(),
            span,
        }
    }

    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnrecognizedCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnexpectedToken { span, .. }
            | Self::ExpectedExpression { span, .. }
            | Self::InvalidStatement { span, .. }
            | Self::UnterminatedBlock { span }
            | Self::NestingTooDeep { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::UnsupportedOperator { span, .. }
            | Self::UndefinedName { span, .. }
            | Self::TypeError { span, .. }
            | Self::NotCallable { span, .. }
            | Self::ProcedureAsValue { span, .. }
            | Self::InvalidArgument { span, .. }
            | Self::RecursionLimit { span, .. } => *span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognizedCharacter { .. } => "E0001",
            Self::UnterminatedString { .. } => "E0002",
            Self::UnexpectedToken { .. } => "E0101",
            Self::ExpectedExpression { .. } => "E0102",
            Self::InvalidStatement { .. } => "E0103",
            Self::UnterminatedBlock { .. } => "E0104",
            Self::NestingTooDeep { .. } => "E0105",
            Self::ArityMismatch { .. } => "E0201",
            Self::TypeMismatch { .. } => "E0202",
            Self::UnsupportedOperator { .. } => "E0203",
            Self::UndefinedName { .. } => "E0204",
            Self::TypeError { .. } => "E0205",
            Self::NotCallable { .. } => "E0206",
            Self::ProcedureAsValue { .. } => "E0207",
            Self::InvalidArgument { .. } => "E0208",
            Self::RecursionLimit { .. } => "E0209",
        }
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            Self::UnrecognizedCharacter { span, .. } => diagnostic
                .with_label(Label::primary(*span, "not part of any token"))
                .with_help("type `<--` for `←`, `!=` for `≠`, `<=` for `≤` and `>=` for `≥`"),
            Self::UnterminatedString { span } => {
                diagnostic.with_label(Label::primary(*span, "string starts here"))
            }
            Self::UnexpectedToken { expected, span, .. } => diagnostic
                .with_label(Label::primary(*span, format!("expected {} here", expected))),
            Self::ExpectedExpression { span, .. } => {
                diagnostic.with_label(Label::primary(*span, "expected an expression"))
            }
            Self::InvalidStatement { span, .. } => diagnostic
                .with_label(Label::primary(*span, ""))
                .with_note("a statement starts with an identifier, PROCEDURE, IF, REPEAT, FOR or RETURN"),
            Self::UnterminatedBlock { span } => diagnostic
                .with_label(Label::primary(*span, "input ends here"))
                .with_help("close the block with `}`"),
            Self::NestingTooDeep { span, .. } => diagnostic
                .with_label(Label::primary(*span, "nested too deeply"))
                .with_help("split the expression or block into smaller pieces"),
            Self::ArityMismatch { span, .. } => diagnostic.with_label(Label::primary(*span, "")),
            Self::TypeMismatch { left, right, span, .. } => diagnostic
                .with_label(Label::primary(*span, format!("{} and {}", left, right))),
            Self::UndefinedName { span, .. } => {
                diagnostic.with_label(Label::primary(*span, "not found in this scope"))
            }
            Self::NotCallable { span, .. } => diagnostic.with_label(Label::primary(*span, "not a procedure")),
            Self::RecursionLimit { span, .. } => diagnostic
                .with_label(Label::primary(*span, "this call"))
                .with_note("the procedure probably never reaches a RETURN that stops the recursion"),
            Self::UnsupportedOperator { span, .. }
            | Self::TypeError { span, .. }
            | Self::ProcedureAsValue { span, .. }
            | Self::InvalidArgument { span, .. } => diagnostic.with_label(Label::primary(*span, "")),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnrecognizedCharacter { found, .. } => {
                write!(f, "unrecognized character `{}`", found)
            }
            Error::UnterminatedString { .. } => write!(f, "unterminated string literal"),
            Error::UnexpectedToken { expected, found, .. } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Error::ExpectedExpression { found, .. } => {
                write!(f, "expected an expression, found {}", found)
            }
            Error::InvalidStatement { found, .. } => {
                write!(f, "{} cannot start a statement", found)
            }
            Error::UnterminatedBlock { .. } => write!(f, "unterminated block: expected `}}`"),
            Error::NestingTooDeep { limit, .. } => {
                write!(f, "program is nested more than {} levels deep", limit)
            }
            Error::ArityMismatch { name, expected, found, .. } => write!(
                f,
                "`{}` expects {} argument{} but was given {}",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                found
            ),
            Error::TypeMismatch { operator, left, right, .. } => write!(
                f,
                "left and right hand sides of {} are of different types: left is {}, right is {}",
                operator, left, right
            ),
            Error::UnsupportedOperator { operator, operand, .. } => {
                write!(f, "{} is not supported for {} values", operator, operand)
            }
            Error::UndefinedName { name, .. } => write!(f, "unresolved name `{}`", name),
            Error::TypeError { message, .. } => write!(f, "type error: {}", message),
            Error::NotCallable { name, .. } => {
                write!(f, "`{}` is a value, not a procedure, and cannot be called", name)
            }
            Error::ProcedureAsValue { name, .. } => {
                write!(f, "`{}` is a procedure; it can only be called", name)
            }
            Error::InvalidArgument { message, .. } => write!(f, "{}", message),
            Error::RecursionLimit { limit, .. } => {
                write!(f, "procedure calls nested more than {} deep", limit)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_names_counts() {
        let error = Error::ArityMismatch {
            name: "f".to_string(),
            expected: 0,
            found: 1,
            span: Span::new(0, 1),
        };
        assert_eq!(error.to_string(), "`f` expects 0 arguments but was given 1");
        assert_eq!(error.code(), "E0201");
    }

    #[test]
    fn test_diagnostic_keeps_span() {
        let error = Error::undefined_name("y", Span::new(4, 5));
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.primary_span(), Some(Span::new(4, 5)));
        assert_eq!(diagnostic.code.as_deref(), Some("E0204"));
    }
}
