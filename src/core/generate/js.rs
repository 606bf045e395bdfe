use swc_common::{DUMMY_SP, SyntaxContext};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ExprOrSpread, IdentName, KeyValueProp, MemberExpr, MemberProp,
    ObjectLit, Prop, PropName, PropOrSpread,
};

use super::{ID_BINDING, collect_bindings, string_expr, string_literal};
use crate::core::messages::CompositeMessage;

/// Method invoked on the accessor by generated code.
pub const CALL_METHOD: &str = "call";

/// `accessor.call({ id: "<id>", ...bindings })`
pub fn generate_call_expression(message: &CompositeMessage) -> Expr {
    let mut props = vec![key_value(ID_BINDING, string_expr(&message.message_id()))];
    props.extend(
        collect_bindings(&message.children)
            .into_iter()
            .map(|binding| key_value(&binding.name, binding.value)),
    );

    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj: message.accessor.clone(),
            prop: MemberProp::Ident(IdentName::new(CALL_METHOD.into(), DUMMY_SP)),
        }))),
        args: vec![ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Object(ObjectLit {
                span: DUMMY_SP,
                props,
            })),
        }],
        type_args: None,
    })
}

fn key_value(name: &str, value: Box<Expr>) -> PropOrSpread {
    let key = if is_identifier_name(name) {
        PropName::Ident(IdentName::new(name.into(), DUMMY_SP))
    } else {
        PropName::Str(string_literal(name))
    };
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp { key, value })))
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
