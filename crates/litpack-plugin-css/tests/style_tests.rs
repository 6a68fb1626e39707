//! Style import resolution, processing and wrapping.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use litpack_bundler::{Error, Plugin, PluginContext, PluginDriver, SharedPlugin, SourceModule};
use litpack_config::StyleConfig;
use litpack_plugin_css::{Processed, Result, StyleError, StyleImportPlugin, StyleProcessor};

#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

impl StyleProcessor for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn process(&self, css: &str, _id: &str) -> Result<Processed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(css.to_uppercase().into())
    }
}

struct Broken;

impl StyleProcessor for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn process(&self, _css: &str, id: &str) -> Result<Processed> {
        Err(StyleError::Processor {
            processor: "broken".to_string(),
            id: id.to_string(),
            message: "unsupported syntax".to_string(),
        })
    }
}

fn transform(plugin: &StyleImportPlugin, code: &str, id: &str) -> Option<String> {
    plugin
        .transform(&PluginContext::default(), code, id)
        .unwrap()
        .map(|out| out.code)
}

#[test]
fn resolves_relative_to_importer() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    let ctx = PluginContext::default();

    let resolved = plugin
        .resolve_id(&ctx, "../styles/theme.scss", Some("src/components/button.js"))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, "src/styles/theme.scss");
    assert!(!resolved.external);

    assert!(plugin.resolve_id(&ctx, "./theme.scss", None).unwrap().is_none());
    assert!(
        plugin
            .resolve_id(&ctx, "./util.js", Some("src/main.js"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn wraps_processed_css_as_default_export() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    let code = transform(&plugin, "p { color: red; }", "src/button.css").unwrap();
    assert!(code.starts_with("export default `p {"));
    assert!(code.contains("color: red"));
    assert!(code.ends_with("`;\n"));
}

#[test]
fn minifies_when_enabled() {
    let plugin = StyleImportPlugin::new(StyleConfig::default().with_minify(true));
    let code = transform(&plugin, "p {\n  color: red;\n}\n", "src/button.scss").unwrap();
    assert_eq!(code, "export default `p{color:red}`;\n");
}

#[test]
fn global_files_inject_into_head() {
    let plugin = StyleImportPlugin::new(
        StyleConfig::default().with_global_file_names(vec!["global.scss".to_string()]),
    );
    let code = transform(&plugin, "body { margin: 0 }", "src/styles/global.scss").unwrap();
    assert!(code.starts_with("const css = `"));
    assert!(code.contains("document.createElement(\"style\")"));
    assert!(code.contains("document.head.appendChild(style);"));
    assert!(code.ends_with("export default css;\n"));

    let scoped = transform(&plugin, "body { margin: 0 }", "src/styles/page.scss").unwrap();
    assert!(scoped.starts_with("export default `"));
}

#[test]
fn whitespace_only_input_skips_processors() {
    let counting = Arc::new(Counting::default());
    let plugin = StyleImportPlugin::new(StyleConfig::default())
        .with_processors(vec![counting.clone() as Arc<dyn StyleProcessor>]);

    let code = transform(&plugin, "  \n\t ", "src/empty.css").unwrap();
    assert_eq!(code, "export default ``;\n");
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

    let code = transform(&plugin, "p{}", "src/full.css").unwrap();
    assert_eq!(code, "export default `P{}`;\n");
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn template_syntax_is_escaped() {
    let plugin = StyleImportPlugin::new(StyleConfig::default()).with_processors(Vec::new());
    let code = transform(
        &plugin,
        "a::before { content: \"`${x}`\\2014\" }",
        "src/quote.css",
    )
    .unwrap();
    assert_eq!(
        code,
        "export default `a::before { content: \"\\`\\${x}\\`\\\\2014\" }`;\n"
    );
}

#[test]
fn unhandled_ids_are_skipped() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    assert!(transform(&plugin, "export {}", "src/main.js").is_none());
}

#[test]
fn output_carries_a_map() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    let out = plugin
        .transform(&PluginContext::default(), "p { color: red; }", "src/a.css")
        .unwrap()
        .unwrap();
    let map = out.map.unwrap();
    assert_eq!(map.get_tokens().count(), 1);
}

#[test]
fn processor_failure_fails_the_module() {
    let plugin: SharedPlugin = Arc::new(
        StyleImportPlugin::new(StyleConfig::default()).with_processors(vec![Arc::new(Broken)]),
    );
    let driver = PluginDriver::new(vec![plugin], Vec::new());

    let err = driver
        .transform(SourceModule::new("src/bad.scss", "p { color: red }"))
        .unwrap_err();
    match err {
        Error::Transform {
            plugin,
            id,
            message,
        } => {
            assert_eq!(plugin, StyleImportPlugin::NAME);
            assert_eq!(id, "src/bad.scss");
            assert!(message.contains("unsupported syntax"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scss_sources_keep_every_rule() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    let ctx = PluginContext::default();
    let out = plugin
        .transform(
            &ctx,
            "$primary: red;\np { color: $primary; }\n.a { .b { color: blue; } }",
            "src/theme.scss",
        )
        .unwrap()
        .unwrap();

    assert!(out.code.contains("p {"));
    assert!(out.code.contains("color: red"));
    assert!(out.code.contains(".a .b"));
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn dropped_css_rules_are_reported_with_the_file() {
    let plugin = StyleImportPlugin::new(StyleConfig::default());
    let ctx = PluginContext::default();
    let out = plugin
        .transform(
            &ctx,
            "$primary: red;\np { color: red; }\n.b { color: blue; }",
            "src/theme.css",
        )
        .unwrap()
        .unwrap();
    assert!(out.code.contains(".b"));

    let diagnostics = ctx.diagnostics.snapshot();
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].plugin, StyleImportPlugin::NAME);
    assert_eq!(diagnostics[0].id.as_deref(), Some("src/theme.css"));
    assert!(diagnostics[0].message.contains("lightningcss"));
}
