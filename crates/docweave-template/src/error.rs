/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template rendering.

use thiserror::Error;

/// Error type injectors may return; preserved as the source of
/// [`RenderError::InjectorFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while rendering a document template.
///
/// Every error aborts the render that raised it; there is no partial-result
/// mode.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A path segment could not be resolved on the current context value.
    #[error("Field not found: {segment} (while resolving '{path}')")]
    FieldNotFound { path: String, segment: String },

    /// Malformed interpolation syntax in a paragraph's text.
    #[error("Template syntax error: {message}")]
    TemplateSyntaxError { message: String },

    /// Failure while executing a template, e.g. calling an unknown function.
    #[error("Evaluation error: {message}")]
    EvaluationError { message: String },

    /// An opening block directive has no matching end directive.
    #[error("Unterminated block: no matching {{{{{tag}}}}} found")]
    UnterminatedBlock { tag: String },

    /// A caller-supplied injector returned an error.
    #[error("Injector '{name}' failed: {source}")]
    InjectorFailure {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Directive nesting exceeded the configured depth limit.
    #[error("Maximum directive nesting depth exceeded (limit {max_depth})")]
    NestingTooDeep { max_depth: usize },

    /// Caller data could not be converted into a template value.
    #[error("Cannot convert data to a template value: {0}")]
    DataConversion(#[from] serde_json::Error),
}

/// Result type for template operations.
pub type RenderResult<T> = Result<T, RenderError>;
