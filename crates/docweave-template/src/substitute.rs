/*
 * substitute.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Paragraph text substitution.
//!
//! A paragraph's visible text is parsed into literal runs and `{{ ... }}`
//! expressions, each expression is evaluated against the data context, and
//! the paragraph is rewritten with the combined result. Expressions come in
//! two forms: a path (`{{ .user.name }}`) and a function call
//! (`{{ upper .name }}`, `{{ inject .photo }}`). The built-in `inject`
//! stands an injector placeholder token into the text; once the whole
//! paragraph is rendered, each registered injector whose token survived is
//! invoked to splice content into the document.

use std::sync::Arc;

use docweave_dom::{Document, Element, Paragraph};

use crate::engine::RenderPass;
use crate::error::{RenderError, RenderResult};
use crate::eval::evaluate_path;
use crate::injector::Injector;
use crate::value::Value;

/// One parsed piece of a paragraph's text.
#[derive(Debug, PartialEq)]
enum Segment {
    /// Text outside any `{{ ... }}` pair, emitted verbatim.
    Literal(String),
    /// A `.`-prefixed lookup path.
    Path(String),
    /// A named call with pre-parsed arguments.
    Call { name: String, args: Vec<Arg> },
}

/// An argument in a call expression.
#[derive(Debug, PartialEq)]
enum Arg {
    Path(String),
    Str(String),
    Int(i64),
    Float(f64),
}

/// A word or quoted string inside `{{ ... }}`.
#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Str(String),
}

fn tokenize(inner: &str) -> RenderResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = inner.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut literal = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some('n') => literal.push('\n'),
                        Some('t') => literal.push('\t'),
                        Some(escaped) => literal.push(escaped),
                        None => break,
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => literal.push(other),
                }
            }
            if !closed {
                return Err(RenderError::TemplateSyntaxError {
                    message: format!("unterminated string literal in '{{{{{inner}}}}}'"),
                });
            }
            tokens.push(Token::Str(literal));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }
    Ok(tokens)
}

fn parse_arg(token: &Token, inner: &str) -> RenderResult<Arg> {
    match token {
        Token::Str(literal) => Ok(Arg::Str(literal.clone())),
        Token::Word(word) if word.starts_with('.') => Ok(Arg::Path(word.clone())),
        Token::Word(word) => {
            if let Ok(int) = word.parse::<i64>() {
                Ok(Arg::Int(int))
            } else if let Ok(float) = word.parse::<f64>() {
                Ok(Arg::Float(float))
            } else {
                Err(RenderError::TemplateSyntaxError {
                    message: format!("unexpected argument '{word}' in '{{{{{inner}}}}}'"),
                })
            }
        }
    }
}

/// Parses the text between one `{{` / `}}` pair.
fn parse_expression(inner: &str) -> RenderResult<Segment> {
    let tokens = tokenize(inner)?;
    let Some(first) = tokens.first() else {
        return Err(RenderError::TemplateSyntaxError {
            message: format!("empty expression in '{{{{{inner}}}}}'"),
        });
    };
    match first {
        Token::Str(literal) if tokens.len() == 1 => Ok(Segment::Literal(literal.clone())),
        Token::Str(_) => Err(RenderError::TemplateSyntaxError {
            message: format!("expression cannot start with a string literal: '{{{{{inner}}}}}'"),
        }),
        Token::Word(word) if word.starts_with('.') => {
            if tokens.len() > 1 {
                return Err(RenderError::TemplateSyntaxError {
                    message: format!("unexpected tokens after path expression in '{{{{{inner}}}}}'"),
                });
            }
            Ok(Segment::Path(word.clone()))
        }
        Token::Word(name) => {
            let mut args = Vec::with_capacity(tokens.len() - 1);
            for token in &tokens[1..] {
                args.push(parse_arg(token, inner)?);
            }
            Ok(Segment::Call { name: name.clone(), args })
        }
    }
}

/// Splits paragraph text into literal runs and parsed expressions. A `{{`
/// without a closing `}}` is a syntax error.
fn parse_segments(text: &str) -> RenderResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            return Err(RenderError::TemplateSyntaxError {
                message: format!("unterminated '{{{{' in \"{text}\""),
            });
        };
        segments.push(parse_expression(&after[..close])?);
        rest = &after[close + 2..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(segments)
}

impl RenderPass<'_> {
    /// Substitutes every expression in the paragraph's text, then fires any
    /// injector whose placeholder token appears in the result.
    ///
    /// Returns `Ok(None)` when the (possibly rewritten) paragraph should be
    /// kept, or `Ok(Some(elements))` when an injector replaced it outright.
    pub(crate) fn substitute_paragraph(
        &mut self,
        doc: &mut Document,
        paragraph: &mut Paragraph,
        data: &Value,
    ) -> RenderResult<Option<Vec<Element>>> {
        let text = paragraph.text();
        if !text.contains("{{") {
            return Ok(None);
        }
        let segments = parse_segments(&text)?;
        let mut rendered = String::new();
        for segment in &segments {
            match segment {
                Segment::Literal(literal) => rendered.push_str(literal),
                Segment::Path(path) => {
                    rendered.push_str(&evaluate_path(path, data)?.render());
                }
                Segment::Call { name, args } => {
                    rendered.push_str(&self.call_function(name, args, data)?.render());
                }
            }
        }
        for (token, injector) in &self.injectors {
            if !rendered.contains(token.as_str()) {
                continue;
            }
            tracing::debug!(injector = injector.name(), token = %token, "invoking injector");
            let items = injector.inject(doc, paragraph).map_err(|source| {
                RenderError::InjectorFailure { name: injector.name().to_string(), source }
            })?;
            if !items.is_empty() {
                return Ok(Some(items));
            }
            rendered = rendered.replace(token.as_str(), "");
        }
        paragraph.set_text(rendered);
        Ok(None)
    }

    /// Resolves a call expression. A mapping key of the current context
    /// shadows functions of the same name; the built-in `inject` shadows
    /// registered functions.
    fn call_function(&mut self, name: &str, args: &[Arg], data: &Value) -> RenderResult<Value> {
        if let Some(value) = data.dereference().get(name) {
            if !args.is_empty() {
                return Err(RenderError::EvaluationError {
                    message: format!("'{name}' names a context field and takes no arguments"),
                });
            }
            return Ok(value.clone());
        }
        if name == "inject" {
            let [arg] = args else {
                return Err(RenderError::EvaluationError {
                    message: "inject takes exactly one argument".to_string(),
                });
            };
            let value = self.arg_value(arg, data)?;
            let Value::Injector(injector) = value else {
                return Err(RenderError::EvaluationError {
                    message: "inject argument is not an injector".to_string(),
                });
            };
            let token = self.register_injector(injector);
            return Ok(Value::Str(token));
        }
        if let Some(function) = self.funcs.get(name) {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(self.arg_value(arg, data)?);
            }
            return function(&values)
                .map_err(|message| RenderError::EvaluationError { message });
        }
        Err(RenderError::EvaluationError { message: format!("unknown function '{name}'") })
    }

    fn arg_value(&self, arg: &Arg, data: &Value) -> RenderResult<Value> {
        match arg {
            Arg::Path(path) => Ok(evaluate_path(path, data)?.clone()),
            Arg::Str(literal) => Ok(Value::Str(literal.clone())),
            Arg::Int(int) => Ok(Value::Int(*int)),
            Arg::Float(float) => Ok(Value::Float(*float)),
        }
    }

    /// Registers an injector for this pass and returns its unique
    /// placeholder token.
    fn register_injector(&mut self, injector: Arc<dyn Injector>) -> String {
        self.next_token += 1;
        let token = format!("__INJECT_{}__", self.next_token);
        self.injectors.push((token.clone(), injector));
        token
    }
}
