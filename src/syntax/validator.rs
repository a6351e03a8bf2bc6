//! Whole-program driver: orchestrates the top grammar productions and
//! settles the final diagnostic list for one unit.

use crate::diagnostics::{Diagnostic, Verdict};

use super::grammar::{ParseFailure, Parser};

/// Validates one program unit and returns its diagnostics. An empty list is
/// the definition of a valid program.
///
/// Each call owns an independent cursor and diagnostic list, so repeated or
/// concurrent calls cannot observe each other.
pub fn parse(text: &str) -> Vec<Diagnostic> {
    let mut parser = Parser::new(text);
    match program(&mut parser) {
        Ok(()) => parser.into_diagnostics(),
        Err(ParseFailure::NoMatch(diagnostic)) => {
            let mut diagnostics = parser.into_diagnostics();
            diagnostics.push(diagnostic);
            diagnostics
        }
        // Nothing past the point of exhaustion could be read, so a fatal
        // outcome is the unit's sole diagnostic.
        Err(ParseFailure::Fatal(diagnostic)) => vec![diagnostic],
    }
}

/// [`parse`] folded into a per-unit verdict for the report sinks.
pub fn verify(text: &str) -> Verdict {
    Verdict::from_diagnostics(parse(text))
}

/// program = clause-list? query trailing-check
fn program(parser: &mut Parser<'_>) -> Result<(), ParseFailure> {
    if parser.lookahead().is_none() {
        return Err(ParseFailure::NoMatch(Diagnostic::new(
            parser.line(),
            "program was empty",
        )));
    }

    // A missing clause-list is simply absent, never an error.
    if let Err(ParseFailure::Fatal(diagnostic)) = parser.attempt(Parser::clause_list) {
        return Err(ParseFailure::Fatal(diagnostic));
    }

    parser.query()?;

    // Leftover non-blank text after the query is reported, not fatal.
    if parser.lookahead().is_some() {
        parser.note("unexpected text after the query");
    }
    Ok(())
}
