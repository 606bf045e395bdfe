//! ICU MessageFormat serializer.
//!
//! The rendered text is both the runtime format string and the hash input for
//! message identifiers, so rendering never reorders children or branches and
//! only trims whitespace at the top level.

use super::{ChoiceMessage, CompositeMessage, Message};

/// Render a message tree as ICU MessageFormat.
pub fn to_icu(message: &Message) -> String {
    let mut out = String::new();
    render(message, &mut out);
    out.trim().to_string()
}

/// Render a composite as ICU MessageFormat without wrapping it in [`Message`].
pub fn composite_to_icu(message: &CompositeMessage) -> String {
    let mut out = String::new();
    render_all(&message.children, &mut out);
    out.trim().to_string()
}

fn render(message: &Message, out: &mut String) {
    match message {
        Message::Literal(literal) => out.push_str(&literal.text),
        Message::Argument(argument) => {
            out.push('{');
            out.push_str(&argument.identifier);
            out.push('}');
        }
        Message::Element(element) => {
            let identifier = &element.identifier;
            let mut children = String::new();
            render_all(&element.children, &mut children);
            if children.is_empty() {
                out.push_str(&format!("<{identifier}/>"));
            } else {
                out.push_str(&format!("<{identifier}>{children}</{identifier}>"));
            }
        }
        Message::Choice(choice) => render_choice(choice, out),
        Message::Composite(composite) => render_all(&composite.children, out),
    }
}

fn render_all(messages: &[Message], out: &mut String) {
    for message in messages {
        render(message, out);
    }
}

fn render_choice(choice: &ChoiceMessage, out: &mut String) {
    out.push_str(&format!(
        "{{{}, {},\n",
        choice.identifier,
        choice.kind.icu_keyword()
    ));
    for branch in &choice.branches {
        let mut value = String::new();
        render(&branch.value, &mut value);
        out.push_str(&format!("  {} {{{}}}\n", branch_key(&branch.key), value));
    }
    out.push('}');
}

/// Exact-match numeric keys get the `=` prefix, category keywords pass through.
fn branch_key(key: &str) -> String {
    if is_numeric_key(key) {
        format!("={key}")
    } else {
        key.to_string()
    }
}

/// Decimal literals such as `1`, `-2` or `1.5`. `inf`, `NaN` and exponent
/// forms parse as floats but are not ICU exact-match values.
fn is_numeric_key(key: &str) -> bool {
    key.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-'))
        && key.bytes().any(|b| b.is_ascii_digit())
        && key.parse::<f64>().is_ok()
}
