//! Matchers for the JavaScript forms: tagged templates and choice calls.

use swc_common::Spanned;
use swc_ecma_ast::{CallExpr, Callee, Expr, Lit, Number, Prop, PropName, PropOrSpread, TaggedTpl};

use super::MatchContext;
use super::accessor::{choice_method, classify};
use crate::core::messages::{ArgumentMessage, ChoiceBranch, ChoiceMessage, CompositeMessage, Message, OTHER_BRANCH};

/// Match an expression against the JavaScript message forms.
pub fn match_expr(expr: &Expr, ctx: &mut MatchContext) -> Option<CompositeMessage> {
    match expr {
        Expr::TaggedTpl(tagged) => parse_tagged_template(tagged, ctx),
        Expr::Call(call) => parse_choice_call(call, ctx),
        _ => None,
    }
}

/// ``say`Hello ${name}` `` and ``say({ context: "…" })`…` ``.
pub fn parse_tagged_template(tagged: &TaggedTpl, ctx: &mut MatchContext) -> Option<CompositeMessage> {
    let (accessor, descriptor, method) = classify(&tagged.tag).into_parts()?;
    if method.is_some() {
        return None;
    }

    let mut children = Vec::new();
    for (index, quasi) in tagged.tpl.quasis.iter().enumerate() {
        if !quasi.raw.is_empty() {
            children.push(Message::literal(quasi.raw.to_string()));
        }
        if let Some(expr) = tagged.tpl.exprs.get(index) {
            children.push(parse_expression(expr, ctx));
        }
    }

    Some(ctx.composite(children, descriptor, accessor, tagged.tag.span_lo()))
}

/// `say.select(value, { … })`, `say.plural(…)` and `say.ordinal(…)`.
pub fn parse_choice_call(call: &CallExpr, ctx: &mut MatchContext) -> Option<CompositeMessage> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let (accessor, descriptor, method) = classify(callee).into_parts()?;
    let kind = choice_method(method.as_deref())?;
    let pos = callee.span_lo();
    let keyword = kind.icu_keyword();

    if call.args.len() != 2 || call.args.iter().any(|arg| arg.spread.is_some()) {
        ctx.report_malformed(
            pos,
            format!("{keyword} expects a value and an options object, found {} arguments", call.args.len()),
        );
        return None;
    }
    let Expr::Object(options) = &*call.args[1].expr else {
        ctx.report_malformed(pos, format!("{keyword} options must be an object literal"));
        return None;
    };

    let mark = ctx.allocator.mark();
    let mut branches = Vec::new();
    for prop in &options.props {
        let PropOrSpread::Prop(prop) = prop else {
            ctx.allocator.rollback(mark);
            ctx.report_malformed(pos, format!("{keyword} options cannot be spread"));
            return None;
        };
        match &**prop {
            Prop::KeyValue(kv) => {
                let key = property_key(&kv.key, ctx);
                let value = parse_branch_value(&kv.value, ctx);
                branches.push(ChoiceBranch { key, value });
            }
            Prop::Shorthand(ident) => branches.push(ChoiceBranch {
                key: ident.sym.to_string(),
                value: ArgumentMessage {
                    identifier: ident.sym.to_string(),
                    expression: Box::new(Expr::Ident(ident.clone())),
                }
                .into(),
            }),
            _ => {}
        }
    }

    let value = &call.args[0].expr;
    let choice = ChoiceMessage {
        kind,
        identifier: expression_key(value, ctx),
        branches,
        expression: value.clone(),
    };

    if choice.other_branch_count() != 1 {
        ctx.allocator.rollback(mark);
        ctx.report_malformed(
            pos,
            format!("{keyword} must have exactly one `{OTHER_BRANCH}` branch"),
        );
        return None;
    }

    Some(ctx.composite(vec![choice.into()], descriptor, accessor, pos))
}

/// A nested construct, or an argument named after the expression.
pub(super) fn parse_expression(expr: &Expr, ctx: &mut MatchContext) -> Message {
    let mark = ctx.allocator.mark();
    if let Some(nested) = match_expr(expr, ctx) {
        return nested.into();
    }
    ctx.allocator.rollback(mark);

    ArgumentMessage {
        identifier: expression_key(expr, ctx),
        expression: Box::new(expr.clone()),
    }
    .into()
}

fn parse_branch_value(value: &Expr, ctx: &mut MatchContext) -> Message {
    match value {
        Expr::Lit(Lit::Str(s)) => Message::literal(s.value.to_string_lossy()),
        Expr::Lit(Lit::Num(num)) => Message::literal(number_text(num)),
        _ => parse_expression(value, ctx),
    }
}

/// Identifiers name themselves; everything else gets an allocated key.
pub(super) fn expression_key(expr: &Expr, ctx: &mut MatchContext) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        _ => ctx.allocator.next(),
    }
}

fn property_key(key: &PropName, ctx: &mut MatchContext) -> String {
    match key {
        PropName::Ident(ident) => ident.sym.to_string(),
        PropName::Str(s) => s.value.to_string_lossy().to_string(),
        PropName::Num(num) => number_text(num),
        PropName::BigInt(big) => big.value.to_string(),
        PropName::Computed(_) => ctx.allocator.next(),
    }
}

fn number_text(num: &Number) -> String {
    match &num.raw {
        Some(raw) => raw.to_string(),
        None => num.value.to_string(),
    }
}
