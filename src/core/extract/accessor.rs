use swc_ecma_ast::{Callee, Expr, Lit, MemberProp, ObjectLit, Prop, PropName, PropOrSpread};

use crate::core::messages::ChoiceKind;

/// Name of the accessor in call and tagged-template form.
pub const ACCESSOR_NAME: &str = "say";

/// Name of the accessor component in markup form.
pub const MARKUP_ACCESSOR_NAME: &str = "Say";

/// String-literal options passed through a wrapped accessor:
/// `say({ context: "menu", id: "open" })`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub context: Option<String>,
    pub id: Option<String>,
}

/// How an expression relates to the message accessor.
#[derive(Debug)]
pub enum AccessorMatch {
    NotAccessor,
    /// `say`, `i18n.say`, optionally followed by `.method`.
    Direct {
        accessor: Box<Expr>,
        method: Option<String>,
    },
    /// `say({ … })`, optionally followed by `.method`.
    DescriptorWrapped {
        accessor: Box<Expr>,
        descriptor: Descriptor,
        method: Option<String>,
    },
}

impl AccessorMatch {
    /// Split a match into (accessor, descriptor, method).
    pub fn into_parts(self) -> Option<(Box<Expr>, Descriptor, Option<String>)> {
        match self {
            AccessorMatch::NotAccessor => None,
            AccessorMatch::Direct { accessor, method } => {
                Some((accessor, Descriptor::default(), method))
            }
            AccessorMatch::DescriptorWrapped {
                accessor,
                descriptor,
                method,
            } => Some((accessor, descriptor, method)),
        }
    }

    fn method(&self) -> Option<&str> {
        match self {
            AccessorMatch::NotAccessor => None,
            AccessorMatch::Direct { method, .. } | AccessorMatch::DescriptorWrapped { method, .. } => {
                method.as_deref()
            }
        }
    }

    fn with_method(self, name: String) -> Self {
        match self {
            AccessorMatch::Direct { accessor, .. } => AccessorMatch::Direct {
                accessor,
                method: Some(name),
            },
            AccessorMatch::DescriptorWrapped {
                accessor,
                descriptor,
                ..
            } => AccessorMatch::DescriptorWrapped {
                accessor,
                descriptor,
                method: Some(name),
            },
            AccessorMatch::NotAccessor => AccessorMatch::NotAccessor,
        }
    }
}

/// Classify an expression used as a template tag or call callee.
pub fn classify(expr: &Expr) -> AccessorMatch {
    classify_expr(expr, true).unwrap_or(AccessorMatch::NotAccessor)
}

/// Choice kind named by the method of an accessor match, if any.
pub fn choice_method(method: Option<&str>) -> Option<ChoiceKind> {
    method.and_then(ChoiceKind::from_method)
}

fn classify_expr(expr: &Expr, allow_wrap: bool) -> Option<AccessorMatch> {
    match expr {
        Expr::Ident(ident) if ident.sym == ACCESSOR_NAME => Some(AccessorMatch::Direct {
            accessor: Box::new(expr.clone()),
            method: None,
        }),

        Expr::Member(member) => {
            if let Some(inner) = classify_expr(&member.obj, allow_wrap) {
                // Only one method segment: `say.plural`, never `say.a.plural`.
                if inner.method().is_some() {
                    return None;
                }
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                return Some(inner.with_method(prop.sym.to_string()));
            }
            match &member.prop {
                MemberProp::Ident(prop) if prop.sym == ACCESSOR_NAME => Some(AccessorMatch::Direct {
                    accessor: Box::new(expr.clone()),
                    method: None,
                }),
                _ => None,
            }
        }

        Expr::Call(call) if allow_wrap => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            let AccessorMatch::Direct {
                accessor,
                method: None,
            } = classify_expr(callee, false)?
            else {
                return None;
            };
            let [arg] = call.args.as_slice() else {
                return None;
            };
            if arg.spread.is_some() {
                return None;
            }
            let Expr::Object(options) = &*arg.expr else {
                return None;
            };
            Some(AccessorMatch::DescriptorWrapped {
                accessor,
                descriptor: read_descriptor(options),
                method: None,
            })
        }

        _ => None,
    }
}

fn read_descriptor(options: &ObjectLit) -> Descriptor {
    let mut descriptor = Descriptor::default();
    for prop in &options.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = &**prop else {
            continue;
        };
        let key = match &kv.key {
            PropName::Ident(ident) => ident.sym.to_string(),
            PropName::Str(s) => s.value.to_string_lossy().to_string(),
            _ => continue,
        };
        let Expr::Lit(Lit::Str(value)) = &*kv.value else {
            continue;
        };
        let value = value.value.to_string_lossy().to_string();
        match key.as_str() {
            "context" => descriptor.context = Some(value),
            "id" => descriptor.id = Some(value),
            _ => {}
        }
    }
    descriptor
}
