//! Matchers for the markup forms: `<Say>…</Say>` and `<Say.Select … />`.

use std::sync::LazyLock;

use regex::Regex;
use swc_common::Spanned;
use swc_ecma_ast::{
    Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild,
    JSXElementName, JSXExpr, JSXExprContainer, JSXFragment, JSXObject, Lit,
};

use super::MatchContext;
use super::accessor::{Descriptor, MARKUP_ACCESSOR_NAME};
use super::js::parse_expression;
use crate::core::messages::{
    ChoiceBranch, ChoiceKind, ChoiceMessage, CompositeMessage, ElementMessage, Message, OTHER_BRANCH,
};

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Attribute holding the value of a markup choice.
const VALUE_ATTRIBUTE: &str = "_";
const ID_ATTRIBUTE: &str = "id";
const CONTEXT_ATTRIBUTE: &str = "context";

fn descriptor(attrs: &[JSXAttrOrSpread]) -> Descriptor {
    Descriptor {
        context: string_attribute(attrs, CONTEXT_ATTRIBUTE),
        id: string_attribute(attrs, ID_ATTRIBUTE),
    }
}

/// Match a JSX element against the markup message forms.
pub fn match_jsx_element(element: &JSXElement, ctx: &mut MatchContext) -> Option<CompositeMessage> {
    let (accessor, method) = markup_accessor(&element.opening.name)?;
    match method {
        None if !element.opening.self_closing => parse_markup_container(element, accessor, ctx),
        None => None,
        Some(method) => {
            let kind = ChoiceKind::from_method(&method.to_ascii_lowercase())?;
            parse_markup_choice(element, accessor, kind, ctx)
        }
    }
}

/// `Say` → (accessor, None); `Say.Plural` → (accessor, Some("Plural")).
fn markup_accessor(name: &JSXElementName) -> Option<(Box<Expr>, Option<String>)> {
    match name {
        JSXElementName::Ident(ident) if ident.sym == MARKUP_ACCESSOR_NAME => {
            Some((Box::new(Expr::Ident(ident.clone())), None))
        }
        JSXElementName::JSXMemberExpr(member) => match &member.obj {
            JSXObject::Ident(ident) if ident.sym == MARKUP_ACCESSOR_NAME => Some((
                Box::new(Expr::Ident(ident.clone())),
                Some(member.prop.sym.to_string()),
            )),
            _ => None,
        },
        _ => None,
    }
}

fn parse_markup_container(
    element: &JSXElement,
    accessor: Box<Expr>,
    ctx: &mut MatchContext,
) -> Option<CompositeMessage> {
    let children = parse_markup_children(&element.children, ctx);
    Some(ctx.composite(
        children,
        descriptor(&element.opening.attrs),
        accessor,
        element.span_lo(),
    ))
}

fn parse_markup_choice(
    element: &JSXElement,
    accessor: Box<Expr>,
    kind: ChoiceKind,
    ctx: &mut MatchContext,
) -> Option<CompositeMessage> {
    let pos = element.span_lo();
    let keyword = kind.icu_keyword();

    if !element.opening.self_closing {
        ctx.report_malformed(pos, format!("{keyword} markup takes its branches as attributes, not children"));
        return None;
    }

    let mark = ctx.allocator.mark();
    let mut value_attr = None;
    let mut branches = Vec::new();
    for attr in &element.opening.attrs {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            ctx.allocator.rollback(mark);
            ctx.report_malformed(pos, format!("{keyword} markup cannot spread attributes"));
            return None;
        };
        let name = attribute_name(&attr.name);
        match name.as_str() {
            VALUE_ATTRIBUTE => {
                value_attr = Some(attr);
                continue;
            }
            ID_ATTRIBUTE | CONTEXT_ATTRIBUTE => continue,
            _ => {}
        }
        let Some(value) = &attr.value else {
            continue;
        };
        let Some(message) = parse_attribute_value(value, ctx) else {
            continue;
        };
        branches.push(ChoiceBranch {
            key: branch_key(&name),
            value: message,
        });
    }

    let Some(expression) = value_attr.and_then(attribute_expression) else {
        ctx.allocator.rollback(mark);
        ctx.report_malformed(pos, format!("{keyword} markup needs a `{VALUE_ATTRIBUTE}` attribute holding the value"));
        return None;
    };

    let identifier = match &*expression {
        Expr::Ident(ident) => ident.sym.to_string(),
        _ => ctx.allocator.next(),
    };
    let choice = ChoiceMessage {
        kind,
        identifier,
        branches,
        expression,
    };

    if choice.other_branch_count() != 1 {
        ctx.allocator.rollback(mark);
        ctx.report_malformed(pos, format!("{keyword} must have exactly one `{OTHER_BRANCH}` branch"));
        return None;
    }

    Some(ctx.composite(
        vec![choice.into()],
        descriptor(&element.opening.attrs),
        accessor,
        pos,
    ))
}

fn parse_markup_children(children: &[JSXElementChild], ctx: &mut MatchContext) -> Vec<Message> {
    let mut messages = Vec::new();
    for child in children {
        match child {
            JSXElementChild::JSXText(text) => {
                let text = WHITESPACE_REGEX.replace_all(&text.value, " ");
                if !text.is_empty() {
                    messages.push(Message::literal(text));
                }
            }
            JSXElementChild::JSXElement(nested) => messages.push(parse_nested_element(nested, ctx)),
            JSXElementChild::JSXFragment(fragment) => messages.push(fragment_element(fragment, ctx)),
            JSXElementChild::JSXExprContainer(JSXExprContainer {
                expr: JSXExpr::Expr(expr),
                ..
            }) => messages.push(parse_expression(expr, ctx)),
            JSXElementChild::JSXExprContainer(_) | JSXElementChild::JSXSpreadChild(_) => {}
        }
    }
    messages
}

/// A nested `<Say…>` construct, or an element wrapping the parsed children.
fn parse_nested_element(element: &JSXElement, ctx: &mut MatchContext) -> Message {
    let mark = ctx.allocator.mark();
    if let Some(nested) = match_jsx_element(element, ctx) {
        return nested.into();
    }
    ctx.allocator.rollback(mark);

    // Allocated before the children so numbering follows source order.
    let identifier = ctx.allocator.next();
    let children = if element.opening.self_closing {
        Vec::new()
    } else {
        parse_markup_children(&element.children, ctx)
    };
    ElementMessage {
        identifier,
        children,
        expression: Box::new(Expr::JSXElement(Box::new(element.clone()))),
    }
    .into()
}

fn fragment_element(fragment: &JSXFragment, ctx: &mut MatchContext) -> Message {
    ElementMessage {
        identifier: ctx.allocator.next(),
        children: Vec::new(),
        expression: Box::new(Expr::JSXFragment(fragment.clone())),
    }
    .into()
}

fn parse_attribute_value(value: &JSXAttrValue, ctx: &mut MatchContext) -> Option<Message> {
    let message = match value {
        JSXAttrValue::Str(s) => Message::literal(s.value.to_string_lossy()),
        JSXAttrValue::JSXExprContainer(JSXExprContainer {
            expr: JSXExpr::Expr(expr),
            ..
        }) => match &**expr {
            Expr::Lit(Lit::Str(s)) => Message::literal(s.value.to_string_lossy()),
            Expr::JSXElement(nested) => parse_nested_element(nested, ctx),
            Expr::JSXFragment(fragment) => fragment_element(fragment, ctx),
            _ => parse_expression(expr, ctx),
        },
        JSXAttrValue::JSXExprContainer(_) => return None,
        JSXAttrValue::JSXElement(nested) => parse_nested_element(nested, ctx),
        JSXAttrValue::JSXFragment(fragment) => fragment_element(fragment, ctx),
    };
    Some(message)
}

/// Expression carried by the value attribute (`_={count}`, `_="x"`).
fn attribute_expression(attr: &JSXAttr) -> Option<Box<Expr>> {
    match attr.value.as_ref()? {
        JSXAttrValue::Str(s) => Some(Box::new(Expr::Lit(Lit::Str(s.clone())))),
        JSXAttrValue::JSXExprContainer(JSXExprContainer {
            expr: JSXExpr::Expr(expr),
            ..
        }) => Some(expr.clone()),
        JSXAttrValue::JSXExprContainer(_) => None,
        JSXAttrValue::JSXElement(element) => Some(Box::new(Expr::JSXElement(element.clone()))),
        JSXAttrValue::JSXFragment(fragment) => Some(Box::new(Expr::JSXFragment(fragment.clone()))),
    }
}

fn attribute_name(name: &JSXAttrName) -> String {
    match name {
        JSXAttrName::Ident(ident) => ident.sym.to_string(),
        JSXAttrName::JSXNamespacedName(ns) => ns.name.sym.to_string(),
    }
}

/// `_1` denotes the numeric key `1`; other names are used as-is.
fn branch_key(name: &str) -> String {
    match name.strip_prefix('_') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest.to_string(),
        _ => name.to_string(),
    }
}

fn string_attribute(attrs: &[JSXAttrOrSpread], name: &str) -> Option<String> {
    attrs.iter().find_map(|attr| {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            return None;
        };
        if attribute_name(&attr.name) != name {
            return None;
        }
        match attr.value.as_ref()? {
            JSXAttrValue::Str(s) => Some(s.value.to_string_lossy().to_string()),
            JSXAttrValue::JSXExprContainer(JSXExprContainer {
                expr: JSXExpr::Expr(expr),
                ..
            }) => match &**expr {
                Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().to_string()),
                _ => None,
            },
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_key() {
        assert_eq!(branch_key("_1"), "1");
        assert_eq!(branch_key("_42"), "42");
        assert_eq!(branch_key("_one"), "_one");
        assert_eq!(branch_key("other"), "other");
    }
}
