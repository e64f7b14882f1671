/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The renderer: block execution and tree traversal.
//!
//! [`Renderer`] holds the per-engine configuration (registered functions,
//! nesting limit) and is cheap to reuse across documents. Each render call
//! builds a private [`RenderPass`] that carries the injector registry and
//! depth counter for that invocation only, so nothing leaks between
//! renders.
//!
//! Traversal walks an element sequence left to right. A paragraph whose
//! entire trimmed text is a block directive consumes everything up to its
//! matching end tag and splices in the block executor's output; any other
//! paragraph goes through text substitution; tables are processed row by
//! row; raw fragments pass through untouched.

use std::collections::HashMap;
use std::sync::Arc;

use docweave_dom::{Document, Element};

use crate::directive::{self, ForDirective, IfDirective};
use crate::error::{RenderError, RenderResult};
use crate::eval::evaluate_path;
use crate::injector::Injector;
use crate::matcher::{find_block_end, EndTag};
use crate::value::Value;

/// Reserved context key under which a loop iteration exposes its parent
/// context, e.g. `{{ .__parent__.title }}` from inside a `{{for}}` block.
pub const PARENT_KEY: &str = "__parent__";

/// Default directive nesting limit; see [`Renderer::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// A function callable from template text as `{{ name arg... }}`.
pub type TemplateFunction = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Renders document element trees against dynamic data contexts.
pub struct Renderer {
    funcs: HashMap<String, TemplateFunction>,
    max_depth: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            funcs: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Caps how deeply directives may nest before rendering fails with
    /// [`RenderError::NestingTooDeep`] instead of overflowing the stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Registers a function callable from template text. Mapping keys of
    /// the active context shadow registered functions of the same name.
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(function));
    }

    /// Renders the whole document body against `data`. On failure the
    /// document is restored to its pre-render state.
    pub fn render(&self, doc: &mut Document, data: &Value) -> RenderResult<()> {
        let body = std::mem::take(&mut doc.body);
        let media_mark = doc.media.len();
        let mut pass = RenderPass::new(self);
        match pass.render_elements(doc, &body, data) {
            Ok(rendered) => {
                doc.body = rendered;
                Ok(())
            }
            Err(error) => {
                doc.body = body;
                doc.media.truncate(media_mark);
                Err(error)
            }
        }
    }

    /// Renders an element sequence against `data` and returns the new
    /// sequence; the input is never mutated. `doc` receives media
    /// registered by injectors along the way.
    pub fn render_elements(
        &self,
        doc: &mut Document,
        elements: &[Element],
        data: &Value,
    ) -> RenderResult<Vec<Element>> {
        RenderPass::new(self).render_elements(doc, elements, data)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

/// State for one render invocation: the injector token registry, the token
/// counter, and the directive nesting depth.
pub(crate) struct RenderPass<'a> {
    pub(crate) funcs: &'a HashMap<String, TemplateFunction>,
    pub(crate) injectors: Vec<(String, Arc<dyn Injector>)>,
    pub(crate) next_token: usize,
    pub(crate) depth: usize,
    pub(crate) max_depth: usize,
}

impl<'a> RenderPass<'a> {
    fn new(renderer: &'a Renderer) -> Self {
        RenderPass {
            funcs: &renderer.funcs,
            injectors: Vec::new(),
            next_token: 0,
            depth: 0,
            max_depth: renderer.max_depth,
        }
    }

    pub(crate) fn render_elements(
        &mut self,
        doc: &mut Document,
        elements: &[Element],
        data: &Value,
    ) -> RenderResult<Vec<Element>> {
        if self.depth >= self.max_depth {
            return Err(RenderError::NestingTooDeep { max_depth: self.max_depth });
        }
        self.depth += 1;
        tracing::debug!(elements = elements.len(), depth = self.depth, "rendering element sequence");
        let result = self.render_sequence(doc, elements, data);
        self.depth -= 1;
        result
    }

    fn render_sequence(
        &mut self,
        doc: &mut Document,
        elements: &[Element],
        data: &Value,
    ) -> RenderResult<Vec<Element>> {
        let mut output = Vec::with_capacity(elements.len());
        let mut index = 0;
        while index < elements.len() {
            if let Element::Paragraph(paragraph) = &elements[index] {
                let text = paragraph.text();
                if let Some(for_directive) = directive::parse_for(&text) {
                    let end = find_block_end(elements, index + 1, EndTag::Endfor)?;
                    let block = &elements[index + 1..end];
                    output.extend(self.execute_for(doc, block, &for_directive, data)?);
                    index = end + 1;
                    continue;
                }
                if let Some(if_directive) = directive::parse_if(&text) {
                    let end = find_block_end(elements, index + 1, EndTag::Endif)?;
                    let block = &elements[index + 1..end];
                    output.extend(self.execute_if(doc, block, &if_directive, data)?);
                    index = end + 1;
                    continue;
                }
                if !text.contains("{{") {
                    output.push(elements[index].clone());
                    index += 1;
                    continue;
                }
                let mut paragraph = paragraph.clone();
                match self.substitute_paragraph(doc, &mut paragraph, data)? {
                    Some(replacement) => output.extend(replacement),
                    None => output.push(Element::Paragraph(paragraph)),
                }
                index += 1;
                continue;
            }
            match &elements[index] {
                Element::Table(table) => {
                    let mut table = table.clone();
                    self.process_table(doc, &mut table, data)?;
                    output.push(Element::Table(table));
                }
                other => output.push(other.clone()),
            }
            index += 1;
        }
        Ok(output)
    }

    /// Expands a `{{for}}` block: one deep-cloned, independently rendered
    /// copy of the governed elements per source item, in source order. A
    /// source that is not a sequence, including an optional wrapping one,
    /// expands to nothing.
    fn execute_for(
        &mut self,
        doc: &mut Document,
        block: &[Element],
        for_directive: &ForDirective,
        data: &Value,
    ) -> RenderResult<Vec<Element>> {
        let source = evaluate_path(&for_directive.source, data)?;
        let Some(items) = source.as_list() else {
            tracing::debug!(
                source = %for_directive.source,
                "for source is not a sequence, expanding to nothing"
            );
            return Ok(Vec::new());
        };
        tracing::debug!(
            var = %for_directive.var,
            source = %for_directive.source,
            iterations = items.len(),
            "expanding for block"
        );
        let mut output = Vec::new();
        for item in items {
            let mut scope = HashMap::new();
            scope.insert(for_directive.var.clone(), item.clone());
            scope.insert(PARENT_KEY.to_string(), data.clone());
            let scope = Value::Map(scope);
            let cloned = clone_block(block);
            output.extend(self.render_elements(doc, &cloned, &scope)?);
        }
        Ok(output)
    }

    /// Expands an `{{if}}` block to one rendered copy of the governed
    /// elements when the condition is truthy, otherwise to nothing. The
    /// data context passes through unchanged.
    fn execute_if(
        &mut self,
        doc: &mut Document,
        block: &[Element],
        if_directive: &IfDirective,
        data: &Value,
    ) -> RenderResult<Vec<Element>> {
        let condition = evaluate_path(&if_directive.condition, data)?;
        let truthy = condition.is_truthy();
        tracing::debug!(condition = %if_directive.condition, truthy, "evaluating if block");
        if !truthy {
            return Ok(Vec::new());
        }
        let cloned = clone_block(block);
        self.render_elements(doc, &cloned, data)
    }
}

/// Deep, independent copy of a governed block. Each loop iteration renders
/// its own copy, so no iteration observes another's mutations and the
/// source block stays pristine for re-rendering.
pub(crate) fn clone_block(block: &[Element]) -> Vec<Element> {
    block.to_vec()
}
