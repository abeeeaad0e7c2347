//! XPath-style path queries.
//!
//! The query language is a small XPath subset evaluated over the element
//! view of the generic tree: every node is an element named by its tag and
//! every slot is an element named by its field.
//!
//! ```text
//! //function_definition                      all function definitions
//! /module/children/class_definition[1]       first top-level class
//! //call[function/identifier/value='print']  calls to print
//! //function_definition[@start_line='3']     attribute comparison
//! //value[@type='int'] | //value[@type='float']
//! ```
//!
//! Supported: `/`, `//`, `.`, `..`, `*`, name tests, predicates `[N]`,
//! `[last()]`, `[@attr]`, `[@attr='v']`, `[path]`, `[path='v']`,
//! `[path/@attr='v']` (each also with `!=`), and `|` unions.

use crate::query::errors::QueryError;
use crate::query::eval::{Document, Item};
use crate::query::QueryEngine;
use crate::tree::{GenericNode, NodeRef};

/// A compiled path query.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    text: String,
    paths: Vec<LocationPath>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocationPath {
    pub absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub test: NameTest,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    /// `//`: children of the context or of any of its descendants.
    Descendant,
    SelfNode,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameTest {
    Any,
    Name(String),
}

impl NameTest {
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Name(name) => name == tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    Position(usize),
    Last,
    Exists(Operand),
    Compare {
        operand: Operand,
        negate: bool,
        literal: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Attribute(String),
    Path {
        path: LocationPath,
        attribute: Option<String>,
    },
}

impl PathQuery {
    /// Parse a query string.
    pub fn compile(text: &str) -> Result<Self, QueryError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(QueryError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: text.len(),
        };
        let paths = parser.parse_union()?;
        Ok(Self {
            text: text.to_string(),
            paths,
        })
    }

    /// The query as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl QueryEngine for PathQuery {
    fn select<'t>(&self, root: &'t GenericNode) -> Result<Vec<NodeRef<'t>>, QueryError> {
        let document = Document::new(root);
        let context = Item::Element(NodeRef::Node(root));

        let mut items = Vec::new();
        for path in &self.paths {
            items.extend(document.eval_path(path, context));
        }
        document.sort_unique(&mut items);

        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Item::Element(element) => Some(element),
                Item::Document => None,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Slash,
    DoubleSlash,
    Dot,
    DotDot,
    Star,
    At,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Eq,
    NotEq,
    Pipe,
    Name(String),
    Literal(String),
    Number(usize),
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '/' => {
                if chars.next_if(|(_, c)| *c == '/').is_some() {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '.' => {
                if chars.next_if(|(_, c)| *c == '.').is_some() {
                    Token::DotDot
                } else {
                    Token::Dot
                }
            }
            '*' => Token::Star,
            '@' => Token::At,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '=' => Token::Eq,
            '|' => Token::Pipe,
            '!' => {
                if chars.next_if(|(_, c)| *c == '=').is_none() {
                    return Err(syntax(offset, "expected '=' after '!'"));
                }
                Token::NotEq
            }
            quote @ ('\'' | '"') => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => literal.push(c),
                        None => return Err(syntax(offset, "unterminated string literal")),
                    }
                }
                Token::Literal(literal)
            }
            c if c.is_ascii_digit() => {
                let mut digits = c.to_string();
                while let Some((_, d)) = chars.next_if(|(_, d)| d.is_ascii_digit()) {
                    digits.push(d);
                }
                let n = digits
                    .parse()
                    .map_err(|_| syntax(offset, "number out of range"))?;
                Token::Number(n)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = c.to_string();
                while let Some((_, d)) =
                    chars.next_if(|(_, d)| d.is_alphanumeric() || *d == '_' || *d == '-')
                {
                    name.push(d);
                }
                Token::Name(name)
            }
            other => return Err(syntax(offset, &format!("unexpected character '{other}'"))),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

fn syntax(offset: usize, message: &str) -> QueryError {
    QueryError::Syntax {
        offset,
        message: message.to_string(),
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(_, token)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end, |(offset, _)| *offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), QueryError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(syntax(self.offset(), &format!("expected {what}")))
        }
    }

    fn expect_name(&mut self) -> Result<String, QueryError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Name(name)) => Ok(name),
            _ => Err(syntax(offset, "expected a name")),
        }
    }

    fn parse_union(&mut self) -> Result<Vec<LocationPath>, QueryError> {
        let mut paths = vec![self.parse_path(false)?.0];
        while self.eat(&Token::Pipe) {
            paths.push(self.parse_path(false)?.0);
        }
        if self.peek().is_some() {
            return Err(syntax(self.offset(), "unexpected trailing input"));
        }
        Ok(paths)
    }

    // Inside predicates a path may end in `/@name`; that attribute is
    // returned separately.
    fn parse_path(
        &mut self,
        attribute_tail: bool,
    ) -> Result<(LocationPath, Option<String>), QueryError> {
        let mut absolute = false;
        let mut first_axis = Axis::Child;
        if self.eat(&Token::Slash) {
            absolute = true;
        } else if self.eat(&Token::DoubleSlash) {
            absolute = true;
            first_axis = Axis::Descendant;
        }

        let mut steps = vec![self.parse_step(first_axis)?];
        loop {
            match self.peek() {
                Some(Token::Slash) => {
                    if attribute_tail && self.peek_at(1) == Some(&Token::At) {
                        self.pos += 2;
                        let name = self.expect_name()?;
                        return Ok((LocationPath { absolute, steps }, Some(name)));
                    }
                    self.pos += 1;
                    steps.push(self.parse_step(Axis::Child)?);
                }
                Some(Token::DoubleSlash) => {
                    self.pos += 1;
                    steps.push(self.parse_step(Axis::Descendant)?);
                }
                _ => break,
            }
        }

        Ok((LocationPath { absolute, steps }, None))
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, QueryError> {
        let offset = self.offset();
        let test = match self.advance() {
            Some(Token::Dot) if axis == Axis::Child => {
                return Ok(Step {
                    axis: Axis::SelfNode,
                    test: NameTest::Any,
                    predicates: Vec::new(),
                })
            }
            Some(Token::DotDot) if axis == Axis::Child => {
                return Ok(Step {
                    axis: Axis::Parent,
                    test: NameTest::Any,
                    predicates: Vec::new(),
                })
            }
            Some(Token::Star) => NameTest::Any,
            Some(Token::Name(name)) => NameTest::Name(name),
            _ => return Err(syntax(offset, "expected a step")),
        };

        let mut predicates = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            predicates.push(self.parse_predicate()?);
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate, QueryError> {
        self.expect(Token::LBracket, "'['")?;

        let predicate = match (self.peek().cloned(), self.peek_at(1)) {
            (Some(Token::Number(n)), _) => {
                if n == 0 {
                    return Err(syntax(self.offset(), "positions start at 1"));
                }
                self.pos += 1;
                Predicate::Position(n)
            }
            (Some(Token::Name(name)), Some(Token::LParen)) if name == "last" => {
                self.pos += 2;
                self.expect(Token::RParen, "')'")?;
                Predicate::Last
            }
            _ => {
                let operand = if self.eat(&Token::At) {
                    Operand::Attribute(self.expect_name()?)
                } else {
                    let (path, attribute) = self.parse_path(true)?;
                    Operand::Path { path, attribute }
                };

                let negate = match self.peek() {
                    Some(Token::Eq) => false,
                    Some(Token::NotEq) => true,
                    _ => {
                        self.expect(Token::RBracket, "']'")?;
                        return Ok(Predicate::Exists(operand));
                    }
                };
                self.pos += 1;

                let offset = self.offset();
                let literal = match self.advance() {
                    Some(Token::Literal(text)) => text,
                    Some(Token::Number(n)) => n.to_string(),
                    _ => return Err(syntax(offset, "expected a literal")),
                };
                Predicate::Compare {
                    operand,
                    negate,
                    literal,
                }
            }
        };

        self.expect(Token::RBracket, "']'")?;
        Ok(predicate)
    }
}
