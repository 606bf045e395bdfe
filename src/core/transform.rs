//! Transform driver: walks a parsed module, matches message constructs and
//! optionally rewrites them into runtime lookups.
//!
//! On a match the node is replaced (or left alone when only extracting) and
//! its children are not visited; otherwise traversal descends. Statement and
//! block boundaries are tracked so the matcher can collect translator
//! comments from enclosing statements.

use std::sync::Arc;

use anyhow::{Context, Result};
use swc_common::{SourceMap, Spanned};
use swc_ecma_ast::{ArrowExpr, BlockStmt, Expr, Function, JSXElement, ModuleItem, Stmt};
use swc_ecma_codegen::{Config, Emitter, text_writer::JsWriter};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::core::extract::{MatchContext, match_expr, match_jsx_element};
use crate::core::generate::{generate_call_expression, generate_markup_element};
use crate::core::messages::CompositeMessage;
use crate::core::parsers::source::{ParsedSource, parse_source};
use crate::issues::MalformedMessageIssue;

/// Messages and issues found in one module.
#[derive(Debug, Default)]
pub struct TransformOutput {
    pub messages: Vec<CompositeMessage>,
    pub issues: Vec<MalformedMessageIssue>,
}

type Observer<'a> = Box<dyn FnMut(&CompositeMessage) + 'a>;

pub struct MessageTransformer<'a> {
    ctx: MatchContext<'a>,
    rewrite: bool,
    observer: Option<Observer<'a>>,
    messages: Vec<CompositeMessage>,
}

impl<'a> MessageTransformer<'a> {
    pub fn new(ctx: MatchContext<'a>, rewrite: bool) -> Self {
        Self {
            ctx,
            rewrite,
            observer: None,
            messages: Vec::new(),
        }
    }

    /// Call `observer` for every matched message, in traversal order.
    pub fn with_observer(mut self, observer: impl FnMut(&CompositeMessage) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn finish(mut self) -> TransformOutput {
        TransformOutput {
            messages: self.messages,
            issues: self.ctx.take_issues(),
        }
    }

    fn observe(&mut self, message: CompositeMessage) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&message);
        }
        self.messages.push(message);
    }
}

impl VisitMut for MessageTransformer<'_> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if matches!(expr, Expr::TaggedTpl(_) | Expr::Call(_)) {
            self.ctx.begin_match();
            if let Some(message) = match_expr(expr, &mut self.ctx) {
                if self.rewrite {
                    *expr = generate_call_expression(&message);
                }
                self.observe(message);
                return;
            }
        }
        expr.visit_mut_children_with(self);
    }

    fn visit_mut_jsx_element(&mut self, element: &mut JSXElement) {
        self.ctx.begin_match();
        if let Some(message) = match_jsx_element(element, &mut self.ctx) {
            if self.rewrite {
                *element = generate_markup_element(&message);
            }
            self.observe(message);
            return;
        }
        element.visit_mut_children_with(self);
    }

    fn visit_mut_module_item(&mut self, item: &mut ModuleItem) {
        self.ctx.push_anchor(item.span_lo());
        item.visit_mut_children_with(self);
        self.ctx.pop_anchor();
    }

    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        self.ctx.push_anchor(stmt.span_lo());
        stmt.visit_mut_children_with(self);
        self.ctx.pop_anchor();
    }

    fn visit_mut_block_stmt(&mut self, block: &mut BlockStmt) {
        self.ctx.enter_boundary();
        block.visit_mut_children_with(self);
        self.ctx.exit_boundary();
    }

    fn visit_mut_function(&mut self, function: &mut Function) {
        self.ctx.enter_boundary();
        function.visit_mut_children_with(self);
        self.ctx.exit_boundary();
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ArrowExpr) {
        self.ctx.enter_boundary();
        arrow.visit_mut_children_with(self);
        self.ctx.exit_boundary();
    }
}

/// Find the messages of a parsed source without changing it.
pub fn extract_messages(parsed: &ParsedSource, file_name: &str) -> TransformOutput {
    let mut module = parsed.module.clone();
    let ctx = MatchContext::new(file_name, &parsed.source_map, &parsed.comments);
    let mut transformer = MessageTransformer::new(ctx, false);
    module.visit_mut_with(&mut transformer);
    transformer.finish()
}

/// Rewrite every message construct of a parsed source into a runtime lookup.
pub fn transform_module(parsed: &mut ParsedSource, file_name: &str) -> TransformOutput {
    let ParsedSource {
        module,
        source_map,
        comments,
    } = parsed;
    let ctx = MatchContext::new(file_name, source_map, comments);
    let mut transformer = MessageTransformer::new(ctx, true);
    module.visit_mut_with(&mut transformer);
    transformer.finish()
}

/// Print a parsed source back to JavaScript, keeping its comments.
pub fn emit_module(parsed: &ParsedSource) -> Result<String> {
    let comments = parsed.comments.to_swc();
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: parsed.source_map.clone(),
            comments: Some(&comments),
            wr: JsWriter::new(parsed.source_map.clone(), "\n", &mut buf, None),
        };
        emitter
            .emit_module(&parsed.module)
            .context("Failed to generate code")?;
    }
    String::from_utf8(buf).context("Generated code is not valid UTF-8")
}

/// Parse `code`, rewrite its messages and print the result.
pub fn transform_source(code: String, file_name: &str) -> Result<(String, TransformOutput)> {
    let mut parsed = parse_source(code, file_name, Arc::new(SourceMap::default()))?;
    let output = transform_module(&mut parsed, file_name);
    let code = emit_module(&parsed)?;
    Ok((code, output))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Callee, Lit, MemberProp, Module, Prop, PropOrSpread};
    use swc_ecma_visit::{Visit, VisitWith};

    use super::*;
    use crate::core::parsers::source::parse_source;

    fn parse(code: &str) -> ParsedSource {
        parse_source(code.to_string(), "src/app.tsx", Arc::new(SourceMap::default())).unwrap()
    }

    fn icu_texts(output: &TransformOutput) -> Vec<String> {
        output.messages.iter().map(|m| m.to_icu()).collect()
    }

    /// Ids passed to generated `say.call({ id })` lookups.
    #[derive(Default)]
    struct GeneratedIds(Vec<String>);

    impl Visit for GeneratedIds {
        fn visit_call_expr(&mut self, call: &swc_ecma_ast::CallExpr) {
            if let Callee::Expr(callee) = &call.callee
                && let Expr::Member(member) = &**callee
                && let MemberProp::Ident(prop) = &member.prop
                && prop.sym == "call"
                && let Some(arg) = call.args.first()
                && let Expr::Object(object) = &*arg.expr
                && let Some(PropOrSpread::Prop(prop)) = object.props.first()
                && let Prop::KeyValue(kv) = &**prop
                && let Expr::Lit(Lit::Str(id)) = &*kv.value
            {
                self.0.push(id.value.to_string_lossy().to_string());
            }
            call.visit_children_with(self);
        }
    }

    fn generated_ids(module: &Module) -> Vec<String> {
        let mut ids = GeneratedIds::default();
        module.visit_with(&mut ids);
        ids.0
    }

    const SOURCE: &str = r##"
// TRANSLATORS: Shown on the home page
export const greeting = say`Hello ${name}!`;

function Cart({ count }) {
  // TRANSLATORS: Cart summary
  const summary = say.plural(count, { one: "# item", other: "# items" });
  return <Say>You have <b>{summary}</b></Say>;
}
"##;

    #[test]
    fn test_extract_finds_all_constructs_in_order() {
        let output = extract_messages(&parse(SOURCE), "src/app.tsx");
        assert_eq!(
            icu_texts(&output),
            vec![
                "Hello {name}!".to_string(),
                "{count, plural,\n  one {# item}\n  other {# items}\n}".to_string(),
                "You have <0>{summary}</0>".to_string(),
            ]
        );
        assert!(output.issues.is_empty());
    }

    #[test]
    fn test_translator_comments_stop_at_function_boundary() {
        let output = extract_messages(&parse(SOURCE), "src/app.tsx");
        assert_eq!(output.messages[0].comments, vec!["Shown on the home page"]);
        assert_eq!(output.messages[1].comments, vec!["Cart summary"]);
        assert!(output.messages[2].comments.is_empty());
    }

    #[test]
    fn test_references_point_at_lines() {
        let output = extract_messages(&parse(SOURCE), "src/app.tsx");
        let references: Vec<_> = output.messages.iter().map(|m| m.references.clone()).collect();
        assert_eq!(
            references,
            vec![
                vec!["src/app.tsx:3".to_string()],
                vec!["src/app.tsx:7".to_string()],
                vec!["src/app.tsx:8".to_string()],
            ]
        );
    }

    #[test]
    fn test_extract_leaves_module_untouched() {
        let parsed = parse(SOURCE);
        let before = parsed.module.clone();
        extract_messages(&parsed, "src/app.tsx");
        assert_eq!(parsed.module, before);
    }

    #[test]
    fn test_transform_rewrites_to_lookups() {
        let mut parsed = parse(SOURCE);
        let output = transform_module(&mut parsed, "src/app.tsx");
        let ids: Vec<_> = output.messages.iter().map(|m| m.message_id()).collect();
        assert_eq!(generated_ids(&parsed.module), ids[..2].to_vec());

        // Rewritten output contains no further constructs.
        let again = extract_messages(&parsed, "src/app.tsx");
        assert!(again.messages.is_empty());
    }

    fn emitted_with_placeholder_ids(code: &str, output: &TransformOutput) -> String {
        output
            .messages
            .iter()
            .fold(code.to_string(), |code, message| {
                code.replace(&message.message_id(), "[id]")
            })
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_transform_source_prints_lookups() {
        let (code, output) = transform_source(
            "const greeting = say`Hello ${name}!`;\nconst label = <Say>Hi <b>{name}</b></Say>;\n"
                .to_string(),
            "src/app.tsx",
        )
        .unwrap();
        assert_eq!(output.messages.len(), 2);
        assert_snapshot!(emitted_with_placeholder_ids(&code, &output), @r#"
        const greeting = say.call({
            id: "[id]",
            name: name
        });
        const label = <Say id="[id]" _0={<b></b>} name={name}/>;
        "#);
    }

    #[test]
    fn test_emit_keeps_untouched_code_and_comments() {
        let (code, output) = transform_source(
            "// TRANSLATORS: Page title\nexport const title = say`Welcome`;\nconst plain = 1;\n"
                .to_string(),
            "src/app.ts",
        )
        .unwrap();
        assert_eq!(output.messages[0].comments, vec!["Page title"]);
        assert!(code.contains("// TRANSLATORS: Page title"));
        assert!(code.contains("const plain = 1;"));
        assert!(!code.contains("Welcome"));
    }

    #[test]
    fn test_transform_is_stable_across_runs() {
        let run = || {
            let mut parsed = parse(SOURCE);
            let output = transform_module(&mut parsed, "src/app.tsx");
            let code = emit_module(&parsed).unwrap();
            let ids: Vec<_> = output.messages.iter().map(|m| m.message_id()).collect();
            (code, ids, parsed.module)
        };
        let (first_code, first_ids, first_module) = run();
        let (second_code, second_ids, second_module) = run();
        assert_eq!(first_ids.len(), 3);
        assert_eq!(first_ids, second_ids);
        assert_eq!(first_code, second_code);
        assert_eq!(first_module, second_module);
        for id in &first_ids {
            assert!(first_code.contains(id.as_str()));
        }
    }

    #[test]
    fn test_identical_messages_share_ids_across_files() {
        let first = extract_messages(&parse("const a = say`Save`;"), "a.ts");
        let second = extract_messages(&parse("\n\nfoo(say`Save`);"), "b.ts");
        assert_eq!(
            first.messages[0].message_id(),
            second.messages[0].message_id()
        );
    }

    #[test]
    fn test_matched_node_is_not_descended() {
        let output = extract_messages(
            &parse(r#"say`Outer ${say.select(kind, { a: "A", other: "B" })}`;"#),
            "src/app.tsx",
        );
        assert_eq!(output.messages.len(), 1);
    }

    #[test]
    fn test_allocator_resets_between_messages() {
        let output = extract_messages(&parse("say`${a + b}`; say`${c + d}`;"), "src/app.tsx");
        assert_eq!(icu_texts(&output), vec!["{0}", "{0}"]);
    }

    #[test]
    fn test_malformed_call_falls_through_to_children() {
        let output = extract_messages(
            &parse(r#"say.plural(count, { one: say`One` });"#),
            "src/app.tsx",
        );
        assert_eq!(icu_texts(&output), vec!["One"]);
        assert_eq!(output.issues.len(), 1);
    }

    #[test]
    fn test_observer_sees_each_message() {
        let parsed = parse(SOURCE);
        let mut seen = Vec::new();
        let ctx = MatchContext::new("src/app.tsx", &parsed.source_map, &parsed.comments);
        let mut transformer =
            MessageTransformer::new(ctx, false).with_observer(|message| seen.push(message.to_icu()));
        let mut module = parsed.module.clone();
        module.visit_mut_with(&mut transformer);
        let output = transformer.finish();
        assert_eq!(seen, icu_texts(&output));
    }

    #[test]
    fn test_export_declaration_keeps_comment() {
        let parsed = parse("// TRANSLATORS: Title\nexport const title = say`Welcome`;");
        let output = extract_messages(&parsed, "src/app.tsx");
        assert_eq!(output.messages[0].comments, vec!["Title"]);
    }
}
