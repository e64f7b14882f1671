/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template engine for docweave document trees.
//!
//! This crate renders a [`docweave_dom::Document`] against a dynamic data
//! context: directives embedded in paragraph text drive substitution, block
//! expansion, and content injection. It supports:
//!
//! - Path interpolation: `{{ .user.name }}`
//! - Function calls: `{{ upper .name }}` (registered via [`Renderer::register_function`])
//! - Bare context keys: `{{ item }}`
//! - Loops: `{{for <var> in <expr>}}` ... `{{endfor}}`, each occupying a whole paragraph
//! - Conditionals: `{{if <expr>}}` ... `{{endif}}`
//! - Table row repetition: `{{ range <expr>}}` in a row's first cell
//! - Content injection: `{{ inject .photo }}` with a caller-supplied [`Injector`]
//!
//! # Architecture
//!
//! The engine is **independent of any file format**. It operates on the
//! owned element trees of `docweave-dom` and on its own [`Value`] data
//! model; anything serde can serialize converts into a [`Value`] via
//! [`Value::from_serialize`]. Rendering never mutates its input context,
//! and a failed render leaves the document exactly as it was.
//!
//! # Example
//!
//! ```ignore
//! use docweave_dom::Document;
//! use docweave_template::{Renderer, Value};
//!
//! let mut doc = Document::new();
//! doc.add_paragraph().add_text("Hello, {{ .name }}!");
//!
//! let data = Value::from_serialize(&serde_json::json!({ "name": "World" }))?;
//! Renderer::new().render(&mut doc, &data)?;
//! assert_eq!(doc.plain_text(), "Hello, World!\n");
//! ```

pub mod directive;
pub mod engine;
pub mod error;
pub mod eval;
pub mod injector;
pub mod matcher;
pub mod value;

mod rows;
mod substitute;

// Re-export main types at crate root
pub use engine::{Renderer, TemplateFunction, DEFAULT_MAX_DEPTH, PARENT_KEY};
pub use error::{BoxError, RenderError, RenderResult};
pub use eval::evaluate_path;
pub use injector::{ImageInjector, Injector};
pub use value::Value;
