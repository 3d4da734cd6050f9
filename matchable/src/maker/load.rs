use std::{fs, io, path::Path, str::Chars};

use super::{MatchableMaker, SetSpreadError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct SyntaxError {
    /// 1-based line where the statement starts
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("expected '(' after '{0}'")]
    ExpectedParen(String),
    #[error("statement is never closed")]
    Unterminated,
    #[error("unknown statement '{0}'")]
    UnknownStatement(String),
    #[error("{statement} takes {expected} arguments, found {found}")]
    ArgumentCount {
        statement: String,
        expected: String,
        found: usize,
    },
    #[error("argument {0} is empty")]
    EmptyArgument(usize),
    #[error(transparent)]
    SetSpread(#[from] SetSpreadError),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The statements without errors were still applied, giving `partial`.
    #[error("{} syntax errors", errors.len())]
    Syntax {
        errors: Vec<SyntaxError>,
        partial: MatchableMaker,
    },
}

/// The result of [MatchableMaker::parse]. Statements with errors are skipped.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub maker: MatchableMaker,
    pub errors: Vec<SyntaxError>,
}

impl MatchableMaker {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path.as_ref())?;
        let Parsed { maker, errors } = Self::parse(&text);
        log::debug!(
            "loaded {} matchables from {}",
            maker.len(),
            path.as_ref().display()
        );
        if errors.is_empty() {
            Ok(maker)
        } else {
            Err(LoadError::Syntax {
                errors,
                partial: maker,
            })
        }
    }

    pub fn parse(text: &str) -> Parsed {
        let mut parsed = Parsed::default();
        for statement in Statements::new(text) {
            let result = statement.and_then(|statement| {
                let line = statement.line;
                parsed
                    .maker
                    .apply(statement)
                    .map_err(|kind| SyntaxError { line, kind })
            });
            if let Err(error) = result {
                log::warn!("{error}");
                parsed.errors.push(error);
            }
        }

        parsed
    }

    fn apply(&mut self, statement: Statement) -> Result<(), SyntaxErrorKind> {
        let Statement { head, args, .. } = statement;
        if let Some(index) = args.iter().position(String::is_empty) {
            // `NAME()` has one empty argument and is reported as a count error below
            if args.len() > 1 {
                return Err(SyntaxErrorKind::EmptyArgument(index + 1));
            }
        }
        let args: Vec<&str> = args
            .iter()
            .map(String::as_str)
            .filter(|arg| !arg.is_empty())
            .collect();

        let count = |expected: &str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(SyntaxErrorKind::ArgumentCount {
                    statement: head.clone(),
                    expected: expected.to_owned(),
                    found: args.len(),
                })
            }
        };

        match head.as_str() {
            "MATCHABLE_FWD" => {
                count("1", args.len() == 1)?;
                self.grab(args[0]);
            }
            "MATCHABLE" | "MATCHABLE_GROW" => {
                count("at least 1", !args.is_empty())?;
                let decl = self.grab(args[0]);
                for variant in &args[1..] {
                    decl.add_variant(variant);
                }
            }
            "SET_SPREAD" => {
                count("4", args.len() == 4)?;
                self.grab(args[0]).set_spread(args[1], args[2], args[3])?;
            }
            "SET_SPREAD_VECT" => {
                count("at least 3", args.len() >= 3)?;
                self.grab(args[0])
                    .set_spread_vect(args[1], args[2], args[3..].iter().copied())?;
            }
            _ => {
                let spreads = spread_count(&head)
                    .ok_or_else(|| SyntaxErrorKind::UnknownStatement(head.clone()))?;
                count(&format!("at least {}", spreads * 2 + 1), args.len() > spreads * 2)?;

                let (pairs, rest) = args.split_at(spreads * 2);
                let decl = self.grab(rest[0]);
                for pair in pairs.chunks(2) {
                    decl.add_spread(pair[0], pair[1]);
                }
                for variant in &rest[1..] {
                    decl.add_variant(variant);
                }
            }
        }
        Ok(())
    }
}

/// `N` for `SPREADxN_MATCHABLE` and `SPREADxN_MATCHABLE_GROW`.
fn spread_count(head: &str) -> Option<usize> {
    let rest = head.strip_prefix("SPREADx")?;
    let digits = rest.find(|c: char| !c.is_ascii_digit())?;
    match &rest[digits..] {
        "_MATCHABLE" | "_MATCHABLE_GROW" => rest[..digits].parse().ok(),
        _ => None,
    }
}

struct Statement {
    line: usize,
    head: String,
    args: Vec<String>,
}

/// Splits text into `HEAD(arg, ..)` statements, one character at a time.
struct Statements<'t> {
    chars: Chars<'t>,
    line: usize,
    line_start: Chars<'t>,
}

impl<'t> Statements<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            chars: text.chars(),
            line: 1,
            line_start: text.chars(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
            self.line_start = self.chars.clone();
        }
        c
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Skips whitespace, comments and stray `;` between statements.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ';' {
                self.bump();
            } else if self.chars.as_str().starts_with("//") {
                self.skip_line();
            } else {
                return;
            }
        }
    }

    fn statement(&mut self) -> Option<Result<Statement, SyntaxError>> {
        self.skip_trivia();
        self.peek()?;
        let line = self.line;

        let mut head = String::new();
        loop {
            match self.peek() {
                Some('(') => {
                    self.bump();
                    break;
                }
                Some(c) if c == '\n' || c == ',' || c == ')' => {
                    self.skip_line();
                    let kind = SyntaxErrorKind::ExpectedParen(head);
                    return Some(Err(SyntaxError { line, kind }));
                }
                None => {
                    let kind = SyntaxErrorKind::ExpectedParen(head);
                    return Some(Err(SyntaxError { line, kind }));
                }
                Some(c) => {
                    self.bump();
                    if !c.is_whitespace() {
                        head.push(c);
                    }
                }
            }
        }

        let mut args = vec![String::new()];
        loop {
            match self.bump() {
                Some(')') => break,
                Some(',') => args.push(String::new()),
                Some('(') => {
                    // A `(` on a later line opens the next statement, so resume from that line.
                    if self.line > line {
                        self.chars = self.line_start.clone();
                    } else {
                        self.skip_line();
                    }
                    let kind = SyntaxErrorKind::Unterminated;
                    return Some(Err(SyntaxError { line, kind }));
                }
                Some(c) if c.is_whitespace() => {}
                Some(c) => {
                    if let Some(arg) = args.last_mut() {
                        arg.push(c);
                    }
                }
                None => {
                    let kind = SyntaxErrorKind::Unterminated;
                    return Some(Err(SyntaxError { line, kind }));
                }
            }
        }

        Some(Ok(Statement { line, head, args }))
    }
}

impl Iterator for Statements<'_> {
    type Item = Result<Statement, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.statement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_counts() {
        assert_eq!(spread_count("SPREADx2_MATCHABLE"), Some(2));
        assert_eq!(spread_count("SPREADx12_MATCHABLE_GROW"), Some(12));
        assert_eq!(spread_count("SPREADx_MATCHABLE"), None);
        assert_eq!(spread_count("SPREADx2_MATCHABLE_FWD"), None);
        assert_eq!(spread_count("MATCHABLE"), None);
    }

    #[test]
    fn whitespace_and_comments() {
        let parsed = MatchableMaker::parse(
            "// header\n\n  MATCHABLE( T ,a ,\n b c );\nMATCHABLE_GROW(T, d) // trailing\n",
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let names: Vec<_> = parsed
            .maker
            .get("T")
            .unwrap()
            .variants()
            .iter()
            .map(|v| v.name().to_owned())
            .collect();
        assert_eq!(names, ["a", "bc", "d"]);
    }

    #[test]
    fn errors_keep_parsing() {
        let parsed = MatchableMaker::parse(
            "MATCHABLE_FWD(A, B)\n\
             NOT_A_STATEMENT(A)\n\
             MATCHABLE(A, x)\n\
             SET_SPREAD(A, x, s)\n\
             SET_SPREAD(A, x, s, v)\n\
             MATCHABLE(A, , y)\n\
             MATCHABLE_FWD B\n\
             MATCHABLE(B, z",
        );

        let errors: Vec<_> = parsed
            .errors
            .iter()
            .map(|e| (e.line, e.kind.clone()))
            .collect();
        assert_eq!(
            errors,
            [
                (
                    1,
                    SyntaxErrorKind::ArgumentCount {
                        statement: "MATCHABLE_FWD".into(),
                        expected: "1".into(),
                        found: 2,
                    }
                ),
                (2, SyntaxErrorKind::UnknownStatement("NOT_A_STATEMENT".into())),
                (
                    4,
                    SyntaxErrorKind::ArgumentCount {
                        statement: "SET_SPREAD".into(),
                        expected: "4".into(),
                        found: 3,
                    }
                ),
                (5, SyntaxErrorKind::SetSpread(SetSpreadError::SpreadLookupFailed)),
                (6, SyntaxErrorKind::EmptyArgument(2)),
                (7, SyntaxErrorKind::ExpectedParen("MATCHABLE_FWDB".into())),
                (8, SyntaxErrorKind::Unterminated),
            ]
        );
        assert_eq!(parsed.maker.get("A").unwrap().variants().len(), 1);
        assert!(parsed.maker.get("B").is_none());
    }

    #[test]
    fn unterminated_statement_keeps_the_next_line() {
        let parsed = MatchableMaker::parse("MATCHABLE(A, x\nMATCHABLE_FWD(B)\nMATCHABLE(C, y)\n");

        let errors: Vec<_> = parsed
            .errors
            .iter()
            .map(|e| (e.line, e.kind.clone()))
            .collect();
        assert_eq!(errors, [(1, SyntaxErrorKind::Unterminated)]);
        assert!(parsed.maker.get("A").is_none());
        assert!(parsed.maker.get("B").is_some());
        assert_eq!(parsed.maker.get("C").unwrap().variants().len(), 1);
    }

    #[test]
    fn spread_statements() {
        let parsed = MatchableMaker::parse(
            "SPREADx2_MATCHABLE(U, u, V::Type, v, T, a, b)\n\
             SET_SPREAD(T, a, u, U::x)\n\
             SET_SPREAD_VECT(T, b, v, V::p, V::q)\n",
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

        let t = parsed.maker.get("T").unwrap();
        assert_eq!(t.spreads().len(), 2);
        assert_eq!(t.spreads()[1].ty, "V::Type");
        assert_eq!(t.variant("a").unwrap().spread("u"), Some("U::x"));
        assert_eq!(t.variant("b").unwrap().spread_vect("v"), ["V::p", "V::q"]);
    }
}
