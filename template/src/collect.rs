//! The walk over a reporting call's arguments.
//!
//! The same walk runs twice: at compile time over the macro input, to decide
//! which sub-expressions need a captured value, and at run time over the
//! source file, to lay out the template. Sharing it keeps the two in step.

use std::collections::HashSet;

use proc_macro2::Span;
use syn::{
    Expr, ExprAssign, ExprCall, ExprIndex, ExprMethodCall, Ident, Token,
    punctuated::Punctuated,
    spanned::Spanned,
    visit::{self, Visit},
};

use crate::canonical::expr_key;

/// Receives the layout decisions of the walk, in source order.
pub trait SlotSink<'ast> {
    /// Copy source text up to the start of `span`.
    fn copy_to_start(&mut self, _span: Span) {}

    /// Copy source text up to the end of `span`.
    fn copy_to_end(&mut self, _span: Span) {}

    /// A sub-expression to evaluate again at render time.
    fn evaluate(&mut self, expr: &'ast Expr, key: String);

    /// The `index`-th positional argument of the reporting call.
    fn positional(&mut self, index: usize, expr: &'ast Expr);

    /// A top-level `name = value` argument.
    fn keyword(&mut self, name: &'ast Ident, value: &'ast Expr);
}

/// Walk the arguments of the reporting call itself.
///
/// Positional arguments are annotated by index, never re-evaluated, since
/// their value already exists when the call runs. Keyword arguments show only
/// their name.
pub fn collect_arguments<'ast, S>(args: &'ast Punctuated<Expr, Token![,]>, sink: &mut S)
where
    S: SlotSink<'ast>,
{
    let mut collector = Collector {
        sink,
        seen: HashSet::new(),
    };
    let mut index = 0;
    for arg in args {
        collector.sink.copy_to_start(arg.span());
        if let Some((name, value)) = keyword_argument(arg) {
            collector.sink.keyword(name, value);
            continue;
        }
        collector.visit_expr(arg);
        collector.sink.copy_to_end(arg.span());
        collector.sink.positional(index, arg);
        index += 1;
    }
}

/// Split a top-level `name = value` argument.
pub fn keyword_argument(arg: &Expr) -> Option<(&Ident, &Expr)> {
    let Expr::Assign(ExprAssign { attrs, left, right, .. }) = arg else {
        return None;
    };
    match &**left {
        Expr::Path(path) if attrs.is_empty() && path.qself.is_none() => {
            path.path.get_ident().map(|name| (name, &**right))
        }
        _ => None,
    }
}

struct Collector<'s, S> {
    sink: &'s mut S,
    /// Canonical text of every expression already evaluated.
    seen: HashSet<String>,
}

impl<'ast, S: SlotSink<'ast>> Collector<'_, S> {
    fn evaluate(&mut self, expr: &'ast Expr) {
        self.sink.copy_to_end(expr.span());
        if !is_capturable(expr) {
            return;
        }
        let key = expr_key(expr);
        if self.seen.insert(key.clone()) {
            self.sink.evaluate(expr, key);
        }
    }

    fn arguments(&mut self, args: &'ast Punctuated<Expr, Token![,]>) {
        for arg in args {
            self.sink.copy_to_start(arg.span());
            self.visit_expr(arg);
            self.evaluate(arg);
        }
    }
}

impl<'ast, S: SlotSink<'ast>> Visit<'ast> for Collector<'_, S> {
    fn visit_expr(&mut self, node: &'ast Expr) {
        // Names bound inside these are out of scope at the call site.
        if opens_scope(node) {
            return;
        }
        visit::visit_expr(self, node);
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        self.sink.copy_to_start(node.span());
        self.arguments(&node.args);
        self.sink.copy_to_end(node.span());
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        self.sink.copy_to_start(node.span());
        self.arguments(&node.args);
        self.sink.copy_to_end(node.span());
    }

    fn visit_expr_index(&mut self, node: &'ast ExprIndex) {
        match &*node.index {
            Expr::Range(range) => {
                if let Some(start) = &range.start {
                    self.evaluate(start);
                }
                if let Some(end) = &range.end {
                    self.evaluate(end);
                }
            }
            index => self.evaluate(index),
        }
    }
}

fn opens_scope(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Closure(_)
            | Expr::Block(_)
            | Expr::Match(_)
            | Expr::If(_)
            | Expr::ForLoop(_)
            | Expr::While(_)
            | Expr::Loop(_)
            | Expr::Async(_)
            | Expr::Unsafe(_)
            | Expr::TryBlock(_)
            | Expr::Const(_)
    )
}

/// Whether an expression can be captured and shown.
///
/// Literals already show their value. Closures have no printable value. The
/// rest is evaluated a second time at the call site, so it must not use
/// control flow that would leave the caller, assign, or take a mutable
/// reference that outlives the argument.
pub fn is_capturable(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(_) | Expr::Closure(_) | Expr::Assign(_) => false,
        Expr::Reference(reference) if reference.mutability.is_some() => false,
        _ => {
            let mut finder = EscapeFinder { found: false };
            finder.visit_expr(expr);
            !finder.found
        }
    }
}

struct EscapeFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for EscapeFinder {
    fn visit_expr(&mut self, node: &'ast Expr) {
        match node {
            Expr::Try(_)
            | Expr::Await(_)
            | Expr::Return(_)
            | Expr::Break(_)
            | Expr::Continue(_)
            | Expr::Yield(_) => self.found = true,
            // Their bodies run on their own terms.
            Expr::Closure(_) | Expr::Async(_) => {}
            _ => visit::visit_expr(self, node),
        }
    }
}
