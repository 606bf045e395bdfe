use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    Expr, Ident, IdentName, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement,
    JSXElementName, JSXExpr, JSXExprContainer, JSXOpeningElement,
};

use super::{Binding, ID_BINDING, collect_bindings, string_literal};
use crate::core::extract::accessor::MARKUP_ACCESSOR_NAME;
use crate::core::messages::CompositeMessage;

/// `<Say id="<id>" {...bindings} />`
///
/// Numeric binding names are not valid attribute names and get a `_`
/// prefix (`_0`). Element bindings are passed without their children; the
/// translation supplies the content.
pub fn generate_markup_element(message: &CompositeMessage) -> JSXElement {
    let mut attrs = vec![JSXAttrOrSpread::JSXAttr(JSXAttr {
        span: DUMMY_SP,
        name: JSXAttrName::Ident(IdentName::new(ID_BINDING.into(), DUMMY_SP)),
        value: Some(JSXAttrValue::Str(string_literal(&message.message_id()))),
    })];
    attrs.extend(collect_bindings(&message.children).into_iter().map(binding_attr));

    let name = match &*message.accessor {
        Expr::Ident(ident) => ident.clone(),
        _ => Ident::new_no_ctxt(MARKUP_ACCESSOR_NAME.into(), DUMMY_SP),
    };

    JSXElement {
        span: DUMMY_SP,
        opening: JSXOpeningElement {
            name: JSXElementName::Ident(name),
            span: DUMMY_SP,
            attrs,
            self_closing: true,
            type_args: None,
        },
        children: vec![],
        closing: None,
    }
}

fn binding_attr(binding: Binding) -> JSXAttrOrSpread {
    let name = if binding.name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", binding.name)
    } else {
        binding.name
    };
    let value = match *binding.value {
        Expr::JSXElement(mut element) => {
            element.children.clear();
            Box::new(Expr::JSXElement(element))
        }
        other => Box::new(other),
    };

    JSXAttrOrSpread::JSXAttr(JSXAttr {
        span: DUMMY_SP,
        name: JSXAttrName::Ident(IdentName::new(name.into(), DUMMY_SP)),
        value: Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
            span: DUMMY_SP,
            expr: JSXExpr::Expr(value),
        })),
    })
}
