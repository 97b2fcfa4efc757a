//! Hand-written Turtle reader.
//!
//! Covers the subset of Turtle that CALMA documents use: prefix/base
//! directives, predicate and object lists, blank node property lists,
//! collections, and the literal shorthands. Errors carry line/column.

use std::fmt;

use thiserror::Error;
use url::Url;

use crate::rdf::graph::Graph;
use crate::rdf::term::{Literal, Term};
use crate::rdf::vocab;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

type PResult<T> = std::result::Result<T, ParseError>;

/// Parse a Turtle document. Relative IRIs are resolved against `base`
/// (normally the URL the document was fetched from) unless the document
/// declares its own `@base`.
pub fn parse(input: &str, base: Option<&str>) -> PResult<Graph> {
    let mut parser = Parser::new(input, base);
    parser.run()?;
    Ok(parser.graph)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    base: Option<Url>,
    graph: Graph,
    bnode_counter: usize,
}

impl Parser {
    fn new(input: &str, base: Option<&str>) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            base: base.and_then(|b| Url::parse(b).ok()),
            graph: Graph::new(),
            bnode_counter: 0,
        }
    }

    fn err(&self, message: impl fmt::Display) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> PResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.err(format!(
                "expected '{}', found {}",
                expected,
                self.describe_here()
            )))
        }
    }

    fn describe_here(&self) -> String {
        match self.peek() {
            Some(c) => format!("'{}'", c),
            None => "end of input".to_string(),
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan the bare word at the cursor without consuming it.
    fn peek_word(&self) -> String {
        let mut word = String::new();
        let mut offset = 0;
        while let Some(c) = self.peek_at(offset) {
            if c.is_alphabetic() || c == '_' {
                word.push(c);
                offset += 1;
            } else {
                break;
            }
        }
        word
    }

    fn fresh_bnode(&mut self) -> Term {
        let term = Term::bnode(format!("genid{}", self.bnode_counter));
        self.bnode_counter += 1;
        term
    }

    fn run(&mut self) -> PResult<()> {
        self.skip_ws();
        while !self.at_eof() {
            self.statement()?;
            self.skip_ws();
        }
        Ok(())
    }

    fn statement(&mut self) -> PResult<()> {
        if self.peek() == Some('@') {
            return self.at_directive();
        }
        let word = self.peek_word();
        let after = self.peek_at(word.chars().count());
        // SPARQL-style directives have no terminating dot. A word followed
        // by ':' is a prefixed name, not a directive.
        if after != Some(':') {
            if word.eq_ignore_ascii_case("prefix") {
                self.advance_by(word.chars().count());
                self.prefix_directive()?;
                return Ok(());
            }
            if word.eq_ignore_ascii_case("base") {
                self.advance_by(word.chars().count());
                self.base_directive()?;
                return Ok(());
            }
        }
        self.triples()?;
        self.skip_ws();
        self.expect('.')
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    fn at_directive(&mut self) -> PResult<()> {
        self.expect('@')?;
        let word = self.peek_word();
        self.advance_by(word.chars().count());
        match word.as_str() {
            "prefix" => {
                self.prefix_directive()?;
                self.skip_ws();
                self.expect('.')
            }
            "base" => {
                self.base_directive()?;
                self.skip_ws();
                self.expect('.')
            }
            other => Err(self.err(format!("unknown directive '@{}'", other))),
        }
    }

    fn prefix_directive(&mut self) -> PResult<()> {
        self.skip_ws();
        let prefix = self.pname_prefix()?;
        self.expect(':')?;
        self.skip_ws();
        let namespace = self.iriref()?;
        self.graph.bind(prefix, namespace);
        Ok(())
    }

    fn base_directive(&mut self) -> PResult<()> {
        self.skip_ws();
        let iri = self.iriref()?;
        let url = Url::parse(&iri)
            .map_err(|e| self.err(format!("invalid base IRI <{}>: {}", iri, e)))?;
        self.base = Some(url);
        Ok(())
    }

    fn pname_prefix(&mut self) -> PResult<String> {
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                prefix.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if prefix.ends_with('.') {
            return Err(self.err("prefix name may not end with '.'"));
        }
        Ok(prefix)
    }

    fn triples(&mut self) -> PResult<()> {
        let (subject, bare_ok) = self.subject()?;
        self.skip_ws();
        // A blank node property list may stand alone as a statement.
        if bare_ok && self.peek() == Some('.') {
            return Ok(());
        }
        self.predicate_object_list(&subject)
    }

    fn subject(&mut self) -> PResult<(Term, bool)> {
        match self.peek() {
            Some('<') => Ok((Term::iri(self.iriref()?), false)),
            Some('_') => Ok((self.bnode_label()?, false)),
            Some('[') => Ok((self.bnode_property_list()?, true)),
            Some('(') => Ok((self.collection()?, false)),
            Some(_) => Ok((self.prefixed_name()?, false)),
            None => Err(self.err("expected subject, found end of input")),
        }
    }

    fn predicate_object_list(&mut self, subject: &Term) -> PResult<()> {
        loop {
            self.skip_ws();
            let verb = self.verb()?;
            self.object_list(subject, &verb)?;
            self.skip_ws();
            if !self.eat(';') {
                break;
            }
            self.skip_ws();
            while self.eat(';') {
                self.skip_ws();
            }
            // trailing ';' before the statement or property-list terminator
            if matches!(self.peek(), Some('.') | Some(']')) || self.at_eof() {
                break;
            }
        }
        Ok(())
    }

    fn verb(&mut self) -> PResult<Term> {
        if self.peek() == Some('a') {
            let next = self.peek_at(1);
            let is_keyword = match next {
                Some(c) => !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')),
                None => true,
            };
            if is_keyword {
                self.bump();
                return Ok(Term::iri(vocab::RDF_TYPE));
            }
        }
        match self.peek() {
            Some('<') => Ok(Term::iri(self.iriref()?)),
            Some(_) => self.prefixed_name(),
            None => Err(self.err("expected predicate, found end of input")),
        }
    }

    fn object_list(&mut self, subject: &Term, verb: &Term) -> PResult<()> {
        loop {
            self.skip_ws();
            let object = self.object()?;
            self.graph.add(subject.clone(), verb.clone(), object);
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
        }
        Ok(())
    }

    fn object(&mut self) -> PResult<Term> {
        match self.peek() {
            Some('<') => Ok(Term::iri(self.iriref()?)),
            Some('_') => self.bnode_label(),
            Some('[') => self.bnode_property_list(),
            Some('(') => self.collection(),
            Some('"') | Some('\'') => self.rdf_literal(),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.numeric_literal(),
            Some('.') if self.peek_at(1).map_or(false, |c| c.is_ascii_digit()) => {
                self.numeric_literal()
            }
            Some(_) => {
                let word = self.peek_word();
                let after = self.peek_at(word.chars().count());
                if (word == "true" || word == "false") && after != Some(':') {
                    self.advance_by(word.chars().count());
                    return Ok(Term::Literal(Literal::typed(word, vocab::XSD_BOOLEAN)));
                }
                self.prefixed_name()
            }
            None => Err(self.err("expected object, found end of input")),
        }
    }

    fn bnode_label(&mut self) -> PResult<Term> {
        self.expect('_')?;
        self.expect(':')?;
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                label.push(c);
                self.bump();
            } else if c == '.' && self.peek_at(1).map_or(false, |n| n.is_alphanumeric()) {
                label.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if label.is_empty() {
            return Err(self.err("empty blank node label"));
        }
        Ok(Term::bnode(label))
    }

    fn bnode_property_list(&mut self) -> PResult<Term> {
        self.expect('[')?;
        let node = self.fresh_bnode();
        self.skip_ws();
        if self.eat(']') {
            return Ok(node);
        }
        self.predicate_object_list(&node)?;
        self.skip_ws();
        self.expect(']')?;
        Ok(node)
    }

    fn collection(&mut self) -> PResult<Term> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(')') {
                break;
            }
            if self.at_eof() {
                return Err(self.err("unterminated collection"));
            }
            items.push(self.object()?);
        }
        if items.is_empty() {
            return Ok(Term::iri(vocab::RDF_NIL));
        }
        let head = self.fresh_bnode();
        let mut cursor = head.clone();
        let last = items.len() - 1;
        for (i, item) in items.into_iter().enumerate() {
            self.graph
                .add(cursor.clone(), Term::iri(vocab::RDF_FIRST), item);
            let rest = if i == last {
                Term::iri(vocab::RDF_NIL)
            } else {
                self.fresh_bnode()
            };
            self.graph
                .add(cursor, Term::iri(vocab::RDF_REST), rest.clone());
            cursor = rest;
        }
        Ok(head)
    }

    fn prefixed_name(&mut self) -> PResult<Term> {
        let prefix = self.pname_prefix()?;
        if !self.eat(':') {
            return Err(self.err(format!(
                "expected ':' in prefixed name after '{}'",
                prefix
            )));
        }
        let mut local = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                local.push(c);
                self.bump();
            } else if c == ':' {
                local.push(c);
                self.bump();
            } else if c == '%' {
                self.bump();
                let hi = self.hex_digit()?;
                let lo = self.hex_digit()?;
                local.push('%');
                local.push(hi);
                local.push(lo);
            } else if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => local.push(escaped),
                    None => return Err(self.err("unterminated escape in local name")),
                }
            } else if c == '.' {
                // a dot only continues the local name when followed by more of it
                match self.peek_at(1) {
                    Some(n) if n.is_alphanumeric() || matches!(n, '_' | '-' | ':' | '%') => {
                        local.push(c);
                        self.bump();
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }
        let namespace = self
            .graph
            .prefixes()
            .get(&prefix)
            .cloned()
            .ok_or_else(|| self.err(format!("undefined prefix '{}:'", prefix)))?;
        Ok(Term::iri(format!("{}{}", namespace, local)))
    }

    fn hex_digit(&mut self) -> PResult<char> {
        match self.bump() {
            Some(c) if c.is_ascii_hexdigit() => Ok(c),
            _ => Err(self.err("expected hex digit")),
        }
    }

    fn iriref(&mut self) -> PResult<String> {
        self.expect('<')?;
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some('>') => break,
                Some('\\') => match self.bump() {
                    Some('u') => iri.push(self.unicode_escape(4)?),
                    Some('U') => iri.push(self.unicode_escape(8)?),
                    _ => return Err(self.err("invalid escape in IRI")),
                },
                Some(c) if c == '\n' || c == '<' || c == '"' => {
                    return Err(self.err(format!("invalid character '{}' in IRI", c)))
                }
                Some(c) => iri.push(c),
                None => return Err(self.err("unterminated IRI")),
            }
        }
        self.resolve_iri(&iri)
    }

    fn resolve_iri(&self, iri: &str) -> PResult<String> {
        if is_absolute_iri(iri) {
            return Ok(iri.to_string());
        }
        match &self.base {
            Some(base) => base
                .join(iri)
                .map(String::from)
                .map_err(|e| self.err(format!("cannot resolve <{}> against base: {}", iri, e))),
            // no base known: keep the relative form rather than failing
            None => Ok(iri.to_string()),
        }
    }

    fn unicode_escape(&mut self, digits: usize) -> PResult<char> {
        let mut value = 0u32;
        for _ in 0..digits {
            let c = self.hex_digit()?;
            value = value * 16 + c.to_digit(16).unwrap_or(0);
        }
        char::from_u32(value).ok_or_else(|| self.err(format!("invalid code point U+{:X}", value)))
    }

    fn rdf_literal(&mut self) -> PResult<Term> {
        let value = self.string_body()?;
        // language tag or datatype must follow the closing quote directly
        if self.peek() == Some('@') {
            self.bump();
            let mut lang = String::new();
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == '-' {
                    lang.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            if lang.is_empty() {
                return Err(self.err("empty language tag"));
            }
            return Ok(Term::Literal(Literal::lang_tagged(value, lang)));
        }
        if self.peek() == Some('^') {
            self.expect('^')?;
            self.expect('^')?;
            let datatype = match self.peek() {
                Some('<') => self.iriref()?,
                _ => match self.prefixed_name()? {
                    Term::Iri(iri) => iri,
                    _ => return Err(self.err("datatype must be an IRI")),
                },
            };
            return Ok(Term::Literal(Literal::typed(value, datatype)));
        }
        Ok(Term::Literal(Literal::plain(value)))
    }

    fn string_body(&mut self) -> PResult<String> {
        let quote = self
            .bump()
            .ok_or_else(|| self.err("expected string literal"))?;
        if self.peek() == Some(quote) {
            self.bump();
            if self.peek() == Some(quote) {
                self.bump();
                return self.long_string(quote);
            }
            return Ok(String::new());
        }
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some('\\') => value.push(self.string_escape()?),
                Some('\n') => return Err(self.err("newline in string literal")),
                Some(c) => value.push(c),
                None => return Err(self.err("unterminated string literal")),
            }
        }
        Ok(value)
    }

    fn long_string(&mut self, quote: char) -> PResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    // quotes run until the last three, which terminate
                    let mut run = 1;
                    while self.peek() == Some(quote) {
                        self.bump();
                        run += 1;
                    }
                    if run >= 3 {
                        for _ in 0..run - 3 {
                            value.push(quote);
                        }
                        return Ok(value);
                    }
                    for _ in 0..run {
                        value.push(quote);
                    }
                }
                Some('\\') => value.push(self.string_escape()?),
                Some(c) => value.push(c),
                None => return Err(self.err("unterminated long string literal")),
            }
        }
    }

    fn string_escape(&mut self) -> PResult<char> {
        match self.bump() {
            Some('t') => Ok('\t'),
            Some('b') => Ok('\u{8}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('f') => Ok('\u{c}'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('\\') => Ok('\\'),
            Some('u') => self.unicode_escape(4),
            Some('U') => self.unicode_escape(8),
            Some(c) => Err(self.err(format!("unknown string escape '\\{}'", c))),
            None => Err(self.err("unterminated escape")),
        }
    }

    fn numeric_literal(&mut self) -> PResult<Term> {
        let mut text = String::new();
        if matches!(self.peek(), Some('+') | Some('-')) {
            text.push(self.bump().unwrap());
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let mut is_decimal = false;
        if self.peek() == Some('.') && self.peek_at(1).map_or(false, |c| c.is_ascii_digit()) {
            is_decimal = true;
            text.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }
        let mut is_double = false;
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_double = true;
            text.push(self.bump().unwrap());
            if matches!(self.peek(), Some('+') | Some('-')) {
                text.push(self.bump().unwrap());
            }
            let mut digits = 0;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                    digits += 1;
                } else {
                    break;
                }
            }
            if digits == 0 {
                return Err(self.err("exponent with no digits"));
            }
        }
        if text.is_empty() || text == "+" || text == "-" {
            return Err(self.err("expected numeric literal"));
        }
        let datatype = if is_double {
            vocab::XSD_DOUBLE
        } else if is_decimal {
            vocab::XSD_DECIMAL
        } else {
            vocab::XSD_INTEGER
        };
        Ok(Term::Literal(Literal::typed(text, datatype)))
    }
}

fn is_absolute_iri(iri: &str) -> bool {
    let mut chars = iri.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}
