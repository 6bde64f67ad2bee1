//! Full-text search expressions and an in-memory searcher.
//!
//! Expression grammar:
//!
//! ```text
//! expression  := conjunction ( "OR" conjunction )*
//! conjunction := term ( term )*
//! term        := [ "-" ] ( word | '"' phrase '"' )
//! ```
//!
//! Terms are separated by whitespace. A leading `-` excludes the term.
//! `OR` must be upper-case to act as an operator.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, verify},
    multi::separated_list1,
    sequence::{delimited, pair},
};
use sylvan_traits::{FullTextError, FullTextSearcher, TreeNavigator};
use sylvan_types::{Name, SelectorName, Value};

/// One term of a full-text expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextTerm {
    /// Lower-cased words of the term; more than one for phrases.
    pub words: Vec<String>,
    pub excluded: bool,
}

/// A parsed full-text expression: alternatives of term conjunctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextQuery {
    pub alternatives: Vec<Vec<FullTextTerm>>,
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn phrase(input: &str) -> IResult<&str, &str> {
    verify(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |p: &str| !tokenize(p).is_empty(),
    )
    .parse(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    verify(
        take_while1(|c: char| !c.is_whitespace() && c != '"'),
        |w: &str| w != "OR" && !tokenize(w).is_empty(),
    )
    .parse(input)
}

fn term(input: &str) -> IResult<&str, FullTextTerm> {
    map(pair(opt(char('-')), alt((phrase, word))), |(minus, text)| FullTextTerm {
        words: tokenize(text),
        excluded: minus.is_some(),
    })
    .parse(input)
}

fn conjunction(input: &str) -> IResult<&str, Vec<FullTextTerm>> {
    separated_list1(multispace1, term).parse(input)
}

fn disjunction(input: &str) -> IResult<&str, Vec<Vec<FullTextTerm>>> {
    separated_list1(delimited(multispace1, tag("OR"), multispace1), conjunction).parse(input)
}

/// Parses a full-text search expression.
pub fn parse_full_text(expression: &str) -> Result<FullTextQuery, FullTextError> {
    match all_consuming(delimited(multispace0, disjunction, multispace0)).parse(expression) {
        Ok((_, alternatives)) => Ok(FullTextQuery { alternatives }),
        Err(e) => Err(FullTextError::InvalidExpression {
            expression: expression.to_string(),
            message: e.to_string(),
        }),
    }
}

impl FullTextTerm {
    /// Number of places where the term's words occur contiguously.
    fn occurrences(&self, tokens: &[String]) -> usize {
        if self.words.is_empty() || tokens.len() < self.words.len() {
            return 0;
        }
        tokens
            .windows(self.words.len())
            .filter(|window| *window == self.words.as_slice())
            .count()
    }
}

impl FullTextQuery {
    /// Occurrence count of the positive terms of the first matching
    /// alternative, or `None` when no alternative matches.
    fn hits(&self, tokens: &[String]) -> Option<usize> {
        self.alternatives.iter().find_map(|terms| {
            let mut hits = 0;
            for term in terms {
                let found = term.occurrences(tokens);
                match (term.excluded, found) {
                    (true, 0) => {}
                    (true, _) | (false, 0) => return None,
                    (false, n) => hits += n,
                }
            }
            Some(hits)
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.hits(&tokenize(text)).is_some()
    }

    /// Term-frequency score: hits divided by the number of words.
    pub fn score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        match self.hits(&tokens) {
            Some(hits) if !tokens.is_empty() => hits as f64 / tokens.len() as f64,
            _ => 0.0,
        }
    }
}

/// A searcher that scans the string values of a node.
///
/// Matching is case-insensitive on words; no index is kept. Useful for tests
/// and small in-memory trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermMatchSearcher;

impl TermMatchSearcher {
    fn text<T: TreeNavigator + ?Sized>(
        navigator: &T,
        node: &T::Node,
        property: Option<&Name>,
    ) -> Result<String, FullTextError> {
        let names = match property {
            Some(name) => vec![name.clone()],
            None => navigator
                .property_names(node)
                .map_err(|e| FullTextError::Index(e.to_string()))?,
        };
        let mut text = String::new();
        for name in &names {
            let values = navigator
                .property_values(node, name)
                .map_err(|e| FullTextError::Index(e.to_string()))?;
            for value in values {
                if let Value::String(s) = value {
                    text.push_str(&s);
                    text.push(' ');
                }
            }
        }
        Ok(text)
    }
}

impl<T: TreeNavigator + ?Sized> FullTextSearcher<T> for TermMatchSearcher {
    fn search(
        &self,
        navigator: &T,
        _selector: &SelectorName,
        node: &T::Node,
        property: Option<&Name>,
        expression: &str,
    ) -> Result<bool, FullTextError> {
        let query = parse_full_text(expression)?;
        Ok(query.matches(&Self::text(navigator, node, property)?))
    }

    fn score(
        &self,
        navigator: &T,
        _selector: &SelectorName,
        node: &T::Node,
        property: Option<&Name>,
        expression: &str,
    ) -> Result<f64, FullTextError> {
        let query = parse_full_text(expression)?;
        Ok(query.score(&Self::text(navigator, node, property)?))
    }

    fn name(&self) -> &'static str {
        "TermMatchSearcher"
    }
}
