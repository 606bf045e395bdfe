//! Message data model.
//!
//! A [`Message`] is the locale-independent representation of one piece of
//! localizable text found in source code. Trees are built fresh for every
//! parse of a source unit, rendered to ICU MessageFormat and turned into a
//! runtime call, then dropped.
//!
//! The syntax-tree handles (`expression`, `accessor`) are owned swc nodes so
//! the code generator can move the original expressions into the generated
//! bindings object.

pub mod hash;
pub mod icu;

use swc_ecma_ast::Expr;

pub use hash::generate_hash;
pub use icu::to_icu;

/// The branch key every choice must provide.
pub const OTHER_BRANCH: &str = "other";

/// Selection strategy of a [`ChoiceMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKind {
    Select,
    Plural,
    Ordinal,
}

impl ChoiceKind {
    /// Map an accessor method name (`say.plural`) to a kind. Names are
    /// matched exactly; the markup form lowercases its component name first.
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ChoiceKind::Select),
            "plural" => Some(ChoiceKind::Plural),
            "ordinal" => Some(ChoiceKind::Ordinal),
            _ => None,
        }
    }

    /// Keyword used for this kind in ICU MessageFormat.
    pub fn icu_keyword(self) -> &'static str {
        match self {
            ChoiceKind::Select => "select",
            ChoiceKind::Plural => "plural",
            ChoiceKind::Ordinal => "selectordinal",
        }
    }
}

/// A fixed string fragment.
#[derive(Debug, Clone)]
pub struct LiteralMessage {
    pub text: String,
}

/// A placeholder whose value is supplied at runtime by `expression`.
///
/// Rendered as `{identifier}`.
#[derive(Debug, Clone)]
pub struct ArgumentMessage {
    pub identifier: String,
    pub expression: Box<Expr>,
}

/// A span of nested messages wrapped in an XML-like tag.
///
/// Rendered as `<identifier>…</identifier>`, or `<identifier/>` when empty.
#[derive(Debug, Clone)]
pub struct ElementMessage {
    pub identifier: String,
    pub children: Vec<Message>,
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ChoiceBranch {
    pub key: String,
    pub value: Message,
}

/// A selection among sub-messages driven by `expression`.
///
/// ```text
/// {gender, select, male {He} female {She} other {They}}
/// {count, plural, =1 {one item} other {# items}}
/// {place, selectordinal, =1 {#st} other {#th}}
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceMessage {
    pub kind: ChoiceKind,
    pub identifier: String,
    pub branches: Vec<ChoiceBranch>,
    pub expression: Box<Expr>,
}

impl ChoiceMessage {
    /// Number of `other` branches. A well-formed choice has exactly one.
    pub fn other_branch_count(&self) -> usize {
        self.branches
            .iter()
            .filter(|branch| branch.key == OTHER_BRANCH)
            .count()
    }
}

/// The top-level unit produced for one matched source construct.
#[derive(Debug, Clone)]
pub struct CompositeMessage {
    pub children: Vec<Message>,
    /// Disambiguates otherwise identical text.
    pub context: Option<String>,
    /// Caller-supplied identifier that replaces the content hash.
    pub id: Option<String>,
    /// Translator comments, marker stripped.
    pub comments: Vec<String>,
    /// `file:line` provenance.
    pub references: Vec<String>,
    /// Expression the runtime call is emitted on (`say`, `i18n.say`, `Say`).
    pub accessor: Box<Expr>,
}

impl CompositeMessage {
    /// Canonical ICU text of this message.
    pub fn to_icu(&self) -> String {
        icu::composite_to_icu(self)
    }

    /// Stable identifier: the caller override when present, otherwise the
    /// hash of the canonical (text, context) pair.
    pub fn message_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => generate_hash(&self.to_icu(), self.context.as_deref()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Literal(LiteralMessage),
    Argument(ArgumentMessage),
    Element(ElementMessage),
    Choice(ChoiceMessage),
    Composite(CompositeMessage),
}

impl Message {
    pub fn literal(text: impl Into<String>) -> Self {
        Message::Literal(LiteralMessage { text: text.into() })
    }

    pub fn to_icu(&self) -> String {
        to_icu(self)
    }
}

impl From<LiteralMessage> for Message {
    fn from(value: LiteralMessage) -> Self {
        Message::Literal(value)
    }
}

impl From<ArgumentMessage> for Message {
    fn from(value: ArgumentMessage) -> Self {
        Message::Argument(value)
    }
}

impl From<ElementMessage> for Message {
    fn from(value: ElementMessage) -> Self {
        Message::Element(value)
    }
}

impl From<ChoiceMessage> for Message {
    fn from(value: ChoiceMessage) -> Self {
        Message::Choice(value)
    }
}

impl From<CompositeMessage> for Message {
    fn from(value: CompositeMessage) -> Self {
        Message::Composite(value)
    }
}

#[cfg(test)]
mod tests {
    use swc_common::util::take::Take;

    use super::*;

    #[test]
    fn test_choice_kind_from_method() {
        assert_eq!(ChoiceKind::from_method("select"), Some(ChoiceKind::Select));
        assert_eq!(ChoiceKind::from_method("plural"), Some(ChoiceKind::Plural));
        assert_eq!(ChoiceKind::from_method("Plural"), None);
        assert_eq!(ChoiceKind::from_method("SELECT"), None);
        assert_eq!(ChoiceKind::from_method("ordinal"), Some(ChoiceKind::Ordinal));
        assert_eq!(ChoiceKind::from_method("call"), None);
    }

    #[test]
    fn test_ordinal_maps_to_selectordinal() {
        assert_eq!(ChoiceKind::Ordinal.icu_keyword(), "selectordinal");
    }

    #[test]
    fn test_message_id_prefers_override() {
        let message = CompositeMessage {
            children: vec![Message::literal("Hello")],
            context: None,
            id: Some("greeting".to_string()),
            comments: vec![],
            references: vec![],
            accessor: Expr::dummy().into(),
        };
        assert_eq!(message.message_id(), "greeting");
    }

    #[test]
    fn test_message_id_hashes_text_and_context() {
        let mut message = CompositeMessage {
            children: vec![Message::literal("Open")],
            context: Some("file menu".to_string()),
            id: None,
            comments: vec![],
            references: vec![],
            accessor: Expr::dummy().into(),
        };
        let menu = message.message_id();
        message.context = Some("physical door".to_string());
        assert_ne!(menu, message.message_id());
        assert_eq!(menu, generate_hash("Open", Some("file menu")));
    }

    #[test]
    fn test_other_branch_count() {
        let choice = ChoiceMessage {
            kind: ChoiceKind::Select,
            identifier: "gender".to_string(),
            branches: vec![
                ChoiceBranch {
                    key: "male".to_string(),
                    value: Message::literal("He"),
                },
                ChoiceBranch {
                    key: "other".to_string(),
                    value: Message::literal("They"),
                },
            ],
            expression: Expr::dummy().into(),
        };
        assert_eq!(choice.other_branch_count(), 1);
    }
}
