//! Code generator: turns a matched [`CompositeMessage`] back into a runtime
//! lookup.
//!
//! - call form: `say.call({ id: "vQhkQx", name: name, 0: price * 2 })`
//! - markup form: `<Say id="vQhkQx" name={name} _0={<b />} />`
//!
//! Every argument, element and choice in the tree contributes one binding,
//! keyed by its identifier, in tree order.

pub mod js;
pub mod jsx;

use swc_common::DUMMY_SP;
use swc_ecma_ast::{Expr, Lit, Str};

use crate::core::messages::Message;

pub use js::generate_call_expression;
pub use jsx::generate_markup_element;

/// Key of the identifier binding in generated code.
pub const ID_BINDING: &str = "id";

/// A runtime value passed to the lookup under `name`.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub value: Box<Expr>,
}

/// Collect the bindings of a message tree.
///
/// The first occurrence of a name wins, so an identifier used twice
/// (``say`${name} and ${name}` ``) is passed once.
pub fn collect_bindings(children: &[Message]) -> Vec<Binding> {
    let mut bindings = Vec::new();
    collect_into(children, &mut bindings);
    bindings
}

fn collect_into(children: &[Message], bindings: &mut Vec<Binding>) {
    for message in children {
        match message {
            Message::Literal(_) => {}
            Message::Argument(argument) => {
                push_binding(bindings, &argument.identifier, &argument.expression);
            }
            Message::Element(element) => {
                push_binding(bindings, &element.identifier, &element.expression);
                collect_into(&element.children, bindings);
            }
            Message::Choice(choice) => {
                push_binding(bindings, &choice.identifier, &choice.expression);
                for branch in &choice.branches {
                    collect_into(std::slice::from_ref(&branch.value), bindings);
                }
            }
            Message::Composite(composite) => collect_into(&composite.children, bindings),
        }
    }
}

fn push_binding(bindings: &mut Vec<Binding>, name: &str, value: &Expr) {
    if bindings.iter().any(|binding| binding.name == name) {
        return;
    }
    bindings.push(Binding {
        name: name.to_string(),
        value: Box::new(value.clone()),
    });
}

pub(crate) fn string_literal(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

pub(crate) fn string_expr(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(string_literal(value))))
}
