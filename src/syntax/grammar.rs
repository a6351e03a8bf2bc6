//! Grammar-symbol procedures of the recognizer.
//!
//! One method per grammar symbol, all honoring the same contract: on
//! success the cursor sits exactly past the symbol's text; on `NoMatch` the
//! cursor is back at the caller's position; `Fatal` propagates with the
//! cursor untouched, because the input cannot be read past the point of
//! exhaustion. Checkpoint and rewind live in one place, the [`Parser::attempt`]
//! combinator, rather than being repeated in every procedure.

use crate::diagnostics::Diagnostic;

use super::cursor::{Cursor, TokenClass};

/// A failed grammar rule: either the symbol is absent at the current
/// position and another alternative may still apply, or the input ran out
/// mid-symbol and the whole unit must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    NoMatch(Diagnostic),
    Fatal(Diagnostic),
}

pub(crate) type RuleResult = Result<(), ParseFailure>;

/// Recognizer state for one program unit: the cursor plus the diagnostics
/// accumulated so far. Constructed fresh per parse; nothing survives a call.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    diagnostics: Vec<Diagnostic>,
    /// High-water offset of reported unrecognized characters, so a
    /// character skipped during a speculative attempt is not reported again
    /// after a rewind.
    reported_to: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            cursor: Cursor::new(text),
            diagnostics: Vec::new(),
            reported_to: 0,
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn line(&self) -> usize {
        self.cursor.line()
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> &'a str {
        self.cursor.remaining()
    }

    // ------------------------------------------------------------------
    // Failure constructors and the diagnostic log
    // ------------------------------------------------------------------

    fn no_match(&self, message: impl Into<String>) -> ParseFailure {
        ParseFailure::NoMatch(Diagnostic::new(self.cursor.line(), message))
    }

    fn fatal(&self, message: impl Into<String>) -> ParseFailure {
        ParseFailure::Fatal(Diagnostic::new(self.cursor.line(), message))
    }

    /// Records a non-fatal diagnostic without aborting the parse. A rule
    /// retried on a different alternative would otherwise log the same
    /// finding twice, so exact duplicates are dropped.
    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.note_at(self.cursor.line(), message);
    }

    /// [`Parser::note`] against an explicit line, for findings that belong
    /// to a construct the cursor has already moved past.
    fn note_at(&mut self, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(line, message);
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    // ------------------------------------------------------------------
    // Backtracking combinators
    // ------------------------------------------------------------------

    /// Runs one rule speculatively: checkpoint on entry, rewind on
    /// `NoMatch`, `Fatal` propagated without rewinding.
    pub(crate) fn attempt(&mut self, rule: fn(&mut Self) -> RuleResult) -> RuleResult {
        let entry = self.cursor.checkpoint();
        let result = rule(self);
        if let Err(ParseFailure::NoMatch(_)) = result {
            self.cursor.rewind(entry);
        }
        result
    }

    /// Ordered alternation: the first rule to match wins. When every
    /// alternative misses, the combined message names the symbol.
    fn first_of(&mut self, symbol: &str, alternatives: &[fn(&mut Self) -> RuleResult]) -> RuleResult {
        for rule in alternatives {
            match self.attempt(*rule) {
                Err(ParseFailure::NoMatch(_)) => continue,
                other => return other,
            }
        }
        Err(self.no_match(format!("could not resolve to a <{symbol}>")))
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    /// Skips layout, then classifies the next character, logging and
    /// stepping over anything unrecognized until a recognized class turns
    /// up. `None` means the input is exhausted; the caller decides whether
    /// that is the end of a list, a missing symbol, or fatal.
    pub(crate) fn lookahead(&mut self) -> Option<(char, TokenClass)> {
        loop {
            if !self.cursor.skip_blanks() {
                return None;
            }
            let c = self.cursor.peek()?;
            match TokenClass::of(c) {
                TokenClass::Unrecognized => {
                    if self.cursor.offset() >= self.reported_to {
                        self.note(format!("unrecognized token '{c}'"));
                        self.reported_to = self.cursor.offset() + c.len_utf8();
                    }
                    self.cursor.advance();
                }
                class => return Some((c, class)),
            }
        }
    }

    /// Consumes one character, treating exhaustion as fatal; `context`
    /// names the symbol being read.
    fn take(&mut self, context: &str) -> Result<char, ParseFailure> {
        match self.cursor.advance() {
            Some(c) => Ok(c),
            None => Err(self.fatal(format!("unexpected end of input {context}"))),
        }
    }

    // ------------------------------------------------------------------
    // Grammar symbols
    // ------------------------------------------------------------------

    /// clause-list = clause clause-list?
    ///
    /// Greedy: keeps taking clauses until an attempt misses, which is the
    /// list's normal end rather than an error of the caller's parse.
    pub(crate) fn clause_list(&mut self) -> RuleResult {
        self.clause()?;
        loop {
            match self.attempt(Self::clause) {
                Ok(()) => continue,
                Err(ParseFailure::NoMatch(_)) => return Ok(()),
                fatal => return fatal,
            }
        }
    }

    /// clause = predicate "." | predicate ":-" predicate-list "."
    pub(crate) fn clause(&mut self) -> RuleResult {
        self.predicate()?;
        let head_line = self.cursor.line();
        match self.lookahead() {
            Some(('.', _)) => {
                self.cursor.advance();
                Ok(())
            }
            Some((':', _)) => {
                self.cursor.advance();
                let next = self.take("inside \":-\"")?;
                if next != '-' {
                    return Err(self.no_match("expected \":-\" between a rule head and its body"));
                }
                self.predicate_list()?;
                self.clause_terminator()
            }
            Some(_) => {
                // Head without a terminator: report it and treat the clause
                // as present so the rest of the unit still gets checked.
                self.note_at(head_line, "expected '.' to terminate the clause");
                Ok(())
            }
            None => Err(self.fatal("unexpected end of input before the '.' terminating the clause")),
        }
    }

    fn clause_terminator(&mut self) -> RuleResult {
        let body_line = self.cursor.line();
        match self.lookahead() {
            Some(('.', _)) => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => {
                self.note_at(body_line, "expected '.' to terminate the clause");
                Ok(())
            }
            None => Err(self.fatal("unexpected end of input before the '.' terminating the clause")),
        }
    }

    /// query = "?-" predicate-list "."
    ///
    /// The `?-` is matched one character at a time; `?` alone is an
    /// ordinary special character, so a single check cannot tell the two
    /// apart.
    pub(crate) fn query(&mut self) -> RuleResult {
        match self.lookahead() {
            Some(('?', _)) => {
                self.cursor.advance();
                let next = self.take("inside \"?-\"")?;
                if next != '-' {
                    return Err(self.no_match("expected \"?-\" to introduce the query"));
                }
                self.predicate_list()?;
                match self.lookahead() {
                    Some(('.', _)) => {
                        self.cursor.advance();
                        Ok(())
                    }
                    Some(_) => Err(self.no_match("expected '.' to terminate the query")),
                    None => {
                        Err(self.fatal("unexpected end of input before the '.' terminating the query"))
                    }
                }
            }
            _ => Err(self.no_match("a <query> was required to end the program")),
        }
    }

    /// predicate-list = predicate ("," predicate-list)?
    pub(crate) fn predicate_list(&mut self) -> RuleResult {
        self.predicate()?;
        self.comma_tail(Self::predicate, "expected a <predicate> after ','")
    }

    /// term-list = term ("," term-list)?
    pub(crate) fn term_list(&mut self) -> RuleResult {
        self.term()?;
        self.comma_tail(Self::term, "expected a <term> after ','")
    }

    /// Comma-separated continuation shared by the two list symbols. A
    /// trailing comma is fatal at end of input and a plain miss otherwise.
    /// Never consumes past the last item when no comma follows.
    fn comma_tail(&mut self, item: fn(&mut Self) -> RuleResult, missing: &str) -> RuleResult {
        loop {
            let entry = self.cursor.checkpoint();
            match self.lookahead() {
                Some((',', _)) => {
                    self.cursor.advance();
                    if self.lookahead().is_none() {
                        return Err(self.fatal("unexpected end of input after ','"));
                    }
                    match self.attempt(item) {
                        Ok(()) => continue,
                        Err(ParseFailure::NoMatch(_)) => return Err(self.no_match(missing)),
                        fatal => return fatal,
                    }
                }
                _ => {
                    self.cursor.rewind(entry);
                    return Ok(());
                }
            }
        }
    }

    /// predicate = structure | atom
    ///
    /// `structure` first: it is a strict extension of `atom`, and matching
    /// the atom alone would strand the parenthesized argument list.
    pub(crate) fn predicate(&mut self) -> RuleResult {
        self.first_of("predicate", &[Self::structure, Self::atom])
    }

    /// term = structure | numeral | variable | atom
    pub(crate) fn term(&mut self) -> RuleResult {
        self.first_of(
            "term",
            &[Self::structure, Self::numeral, Self::variable, Self::atom],
        )
    }

    /// structure = atom "(" term-list ")"
    pub(crate) fn structure(&mut self) -> RuleResult {
        self.atom()?;
        match self.lookahead() {
            Some(('(', _)) => {
                self.cursor.advance();
                self.term_list()?;
                match self.lookahead() {
                    Some((')', _)) => {
                        self.cursor.advance();
                        Ok(())
                    }
                    Some(_) => Err(self.no_match("expected ')' to close the argument list")),
                    None => {
                        Err(self.fatal("unexpected end of input before ')' closing the argument list"))
                    }
                }
            }
            _ => Err(self.no_match("could not resolve to a <structure>")),
        }
    }

    /// atom = small-atom | "'" string "'"
    pub(crate) fn atom(&mut self) -> RuleResult {
        self.first_of("atom", &[Self::small_atom, Self::quoted_atom])
    }

    /// small-atom = lowercase-char character-list?
    fn small_atom(&mut self) -> RuleResult {
        match self.lookahead() {
            Some((_, TokenClass::LowercaseChar)) => {
                self.cursor.advance();
                self.character_list();
                Ok(())
            }
            _ => Err(self.no_match("could not resolve to a <small-atom>")),
        }
    }

    fn quoted_atom(&mut self) -> RuleResult {
        match self.lookahead() {
            Some((_, TokenClass::Quote)) => {
                self.cursor.advance();
                self.quoted_body()
            }
            _ => Err(self.no_match("could not resolve to a quoted <atom>")),
        }
    }

    /// string = character character?* (one or more)
    ///
    /// Layout is significant here; nothing is skipped. Exhaustion before
    /// the closing quote is fatal, an embedded newline is a recoverable
    /// diagnostic.
    fn quoted_body(&mut self) -> RuleResult {
        let mut consumed = 0usize;
        loop {
            match self.cursor.peek() {
                None => return Err(self.fatal("unexpected end of input before the closing quote")),
                Some('\'') => {
                    if consumed == 0 {
                        return Err(self.no_match("quoted atom must contain at least one character"));
                    }
                    self.cursor.advance();
                    return Ok(());
                }
                Some('\n') => {
                    self.note("newline inside a quoted atom");
                    return Err(self.no_match("newline inside a quoted atom"));
                }
                Some(c) => {
                    let class = TokenClass::of(c);
                    if class.is_alphanumeric() || class == TokenClass::Special {
                        self.cursor.advance();
                        consumed += 1;
                    } else {
                        return Err(self.no_match(format!("'{c}' is not allowed inside a quoted atom")));
                    }
                }
            }
        }
    }

    /// variable = uppercase-char character-list?
    pub(crate) fn variable(&mut self) -> RuleResult {
        match self.lookahead() {
            Some((_, TokenClass::UppercaseChar)) => {
                self.cursor.advance();
                self.character_list();
                Ok(())
            }
            _ => Err(self.no_match("could not resolve to a <variable>")),
        }
    }

    /// numeral = digit numeral?
    pub(crate) fn numeral(&mut self) -> RuleResult {
        match self.lookahead() {
            Some((_, TokenClass::Digit)) => {
                self.cursor.advance();
                while matches!(
                    self.cursor.peek().map(TokenClass::of),
                    Some(TokenClass::Digit)
                ) {
                    self.cursor.advance();
                }
                Ok(())
            }
            _ => Err(self.no_match("could not resolve to a <numeral>")),
        }
    }

    /// character-list = alphanumeric character-list?
    ///
    /// Greedy and infallible: zero repetitions is a valid list, and the
    /// character that ends the run is left unconsumed.
    fn character_list(&mut self) {
        while let Some(c) = self.cursor.peek() {
            if TokenClass::of(c).is_alphanumeric() {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(result: RuleResult) -> ParseFailure {
        result.expect_err("rule should have failed")
    }

    #[test]
    fn term_backtracks_cleanly_before_matching_variable() {
        // structure and numeral both fail first; only the variable's own
        // characters may be consumed once it matches.
        let mut parser = Parser::new("Xyz rest");
        parser.term().unwrap();
        assert_eq!(parser.remaining(), " rest");
        assert_eq!(parser.line(), 1);
    }

    #[test]
    fn structure_miss_leaves_no_residue_across_lines() {
        let mut parser = Parser::new("'ab\ncd' x");
        let failure = failed(parser.atom());
        assert!(matches!(failure, ParseFailure::NoMatch(_)));
        assert_eq!(parser.line(), 1);
    }

    #[test]
    fn structure_is_preferred_over_bare_atom() {
        let mut parser = Parser::new("f(a, B, 12) tail");
        parser.predicate().unwrap();
        assert_eq!(parser.remaining(), " tail");
    }

    #[test]
    fn atom_alone_matches_when_no_arguments_follow() {
        let mut parser = Parser::new("foo.");
        parser.predicate().unwrap();
        assert_eq!(parser.remaining(), ".");
    }

    #[test]
    fn character_list_never_consumes_the_terminator() {
        let mut parser = Parser::new("abc1De(");
        parser.atom().unwrap();
        assert_eq!(parser.remaining(), "(");
    }

    #[test]
    fn trailing_comma_at_end_of_input_is_fatal() {
        let mut parser = Parser::new("a,");
        let failure = failed(parser.term_list());
        assert!(matches!(failure, ParseFailure::Fatal(_)));
    }

    #[test]
    fn trailing_comma_with_input_remaining_is_a_miss() {
        let mut parser = Parser::new("a, )");
        match failed(parser.term_list()) {
            ParseFailure::NoMatch(diagnostic) => {
                assert!(diagnostic.message.contains("after ','"));
            }
            other => panic!("expected NoMatch, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_quote_is_fatal() {
        let mut parser = Parser::new("'abc");
        let failure = failed(parser.atom());
        assert!(matches!(failure, ParseFailure::Fatal(_)));
    }

    #[test]
    fn newline_in_quoted_atom_is_recoverable_and_logged() {
        let mut parser = Parser::new("'ab\ncd'");
        let failure = failed(parser.atom());
        assert!(matches!(failure, ParseFailure::NoMatch(_)));
        let diagnostics = parser.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("newline"));
    }

    #[test]
    fn unrecognized_characters_are_logged_once_across_backtracks() {
        // Every term alternative runs the same lookahead over '@'; the
        // high-water mark keeps the log to one entry.
        let mut parser = Parser::new("@X");
        parser.term().unwrap();
        let diagnostics = parser.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unrecognized token"));
    }

    #[test]
    fn rule_clause_with_multi_predicate_body() {
        let mut parser = Parser::new("grandparent(X, Z) :- parent(X, Y), parent(Y, Z).");
        parser.clause().unwrap();
        assert_eq!(parser.remaining(), "");
        assert!(parser.into_diagnostics().is_empty());
    }

    #[test]
    fn clause_head_without_terminator_is_noted_not_fatal() {
        let mut parser = Parser::new("foo ?- foo.");
        parser.clause().unwrap();
        let diagnostics = parser.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 1);
        assert!(diagnostics[0].message.contains("'.'"));
    }
}
