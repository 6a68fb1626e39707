//! Post-emission ordering: hooks run alongside the write, and stages that
//! read output wait for the write barrier and for file-writing stages.

mod helpers;

use std::fs::{self, File};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use helpers::{FailingWriter, PARTIAL, SlowWriter, bundle_of};
use litpack_bundler::plugins::{CompressPlugin, CopyPlugin, HtmlTemplatePlugin, SizeReportPlugin};
use litpack_bundler::{
    EmitContext, Error, FinishOptions, FsOutputWriter, Plugin, PluginRegistry, PrewrittenOutput,
    Severity, WriteContext,
};
use litpack_config::{
    CompressAlgorithm, CompressConfig, CopyConfig, HtmlConfig, SizeReportConfig,
};

/// Records that its hook ran and whether the barrier reported success.
#[derive(Default)]
struct HookRecord {
    ran: AtomicBool,
    saw_written: AtomicBool,
}

struct Recorder(Arc<HookRecord>);

#[async_trait]
impl Plugin for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn emit_complete(&self, ctx: &EmitContext) -> anyhow::Result<()> {
        self.0.ran.store(true, Ordering::SeqCst);
        if ctx.barrier.wait().await.is_ok() {
            self.0.saw_written.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct FailsFast;

#[async_trait]
impl Plugin for FailsFast {
    fn name(&self) -> &str {
        "fails-fast"
    }

    async fn emit_complete(&self, _ctx: &EmitContext) -> anyhow::Result<()> {
        anyhow::bail!("boom")
    }
}

/// Appends its name to a shared log from `before_write`, optionally failing.
struct Preparer {
    name: &'static str,
    log: Arc<parking_lot::Mutex<Vec<&'static str>>>,
    fail: bool,
}

#[async_trait]
impl Plugin for Preparer {
    fn name(&self) -> &str {
        self.name
    }

    async fn before_write(&self, ctx: &WriteContext) -> anyhow::Result<()> {
        assert!(ctx.output_dir.is_absolute());
        self.log.lock().push(self.name);
        if self.fail {
            anyhow::bail!("cannot prepare");
        }
        Ok(())
    }
}

#[tokio::test]
async fn compression_sees_final_content_only() {
    let dir = TempDir::new().unwrap();
    let body = "export const greeting = 'hello';\n".repeat(20);

    let mut registry = PluginRegistry::new();
    registry.add(CompressPlugin::new(CompressConfig::default()).unwrap());
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", body.as_str())])),
            &FinishOptions::write_to(dir.path()),
            &SlowWriter {
                delay: Duration::from_millis(200),
            },
        )
        .await
        .unwrap();

    assert!(report.diagnostics.is_empty());

    let mut gz = String::new();
    flate2::read::GzDecoder::new(File::open(dir.path().join("main.js.gz")).unwrap())
        .read_to_string(&mut gz)
        .unwrap();
    assert_eq!(gz, body);
    assert_ne!(gz, PARTIAL);

    let mut br = String::new();
    brotli::Decompressor::new(File::open(dir.path().join("main.js.br")).unwrap(), 4096)
        .read_to_string(&mut br)
        .unwrap();
    assert_eq!(br, body);

    assert!(!dir.path().join("main.js.gz.tmp").exists());
    assert!(!dir.path().join("main.js.br.tmp").exists());
}

#[tokio::test]
async fn dry_build_skips_write_and_hooks() {
    let dir = TempDir::new().unwrap();
    let record = Arc::new(HookRecord::default());

    let mut registry = PluginRegistry::new();
    registry.add(Recorder(Arc::clone(&record)));
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::dry_run(dir.path()),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert!(report.written.is_empty());
    assert!(!record.ran.load(Ordering::SeqCst));
    assert!(!dir.path().join("main.js").exists());
}

#[tokio::test]
async fn failing_hook_does_not_cancel_others() {
    let dir = TempDir::new().unwrap();
    let record = Arc::new(HookRecord::default());

    let mut registry = PluginRegistry::new();
    registry.add(FailsFast);
    registry.add(Recorder(Arc::clone(&record)));
    registry.add(CompressPlugin::new(
        CompressConfig::default().with_algorithms(vec![CompressAlgorithm::Gzip]),
    )
    .unwrap());
    let driver = registry.into_driver();

    let err = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "let a = 1;")])),
            &FinishOptions::write_to(dir.path()),
            &SlowWriter {
                delay: Duration::from_millis(50),
            },
        )
        .await
        .unwrap_err();

    match err {
        Error::EmitHooks(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].plugin, "fails-fast");
            assert_eq!(failures[0].message, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(record.saw_written.load(Ordering::SeqCst));
    assert!(dir.path().join("main.js.gz").exists());
}

#[tokio::test]
async fn write_failure_aborts_barrier_waiters() {
    let dir = TempDir::new().unwrap();
    let record = Arc::new(HookRecord::default());

    let mut registry = PluginRegistry::new();
    registry.add(Recorder(Arc::clone(&record)));
    registry.add(CompressPlugin::new(CompressConfig::default()).unwrap());
    let driver = registry.into_driver();

    let err = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path()),
            &FailingWriter,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::WriteFailure(_)));
    assert!(record.ran.load(Ordering::SeqCst));
    assert!(!record.saw_written.load(Ordering::SeqCst));
    assert!(!dir.path().join("main.js.gz").exists());
}

#[tokio::test]
async fn copy_without_overwrite_keeps_existing_destination() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("robots.txt"), "new").unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/robots.txt"), "old").unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(
        CopyPlugin::new(
            CopyConfig::default()
                .with_resource("robots.txt", "dist/robots.txt")
                .with_overwrite(false),
        )
        .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("dist/robots.txt")).unwrap(),
        "old"
    );
}

#[tokio::test]
async fn copy_failure_is_a_diagnostic_and_other_pairs_run() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("assets/img")).unwrap();
    fs::write(dir.path().join("assets/img/logo.svg"), "<svg/>").unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(
        CopyPlugin::new(
            CopyConfig::default()
                .with_resource("missing.txt", "dist/missing.txt")
                .with_resource("assets", "dist/assets"),
        )
        .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].plugin, "copy");
    assert!(report.diagnostics[0].id.as_deref().unwrap().ends_with("missing.txt"));
    assert!(dir.path().join("dist/assets/img/logo.svg").exists());
}

#[tokio::test]
async fn html_template_injects_filtered_entries() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.html"),
        "<html><head></head><body><app-root></app-root></body></html>",
    )
    .unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(
        HtmlTemplatePlugin::new(
            HtmlConfig::new("index.html", "dist/index.html").with_include(vec![r"\.js$".into()]),
        )
        .unwrap()
        .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1"), ("polyfills.js", "2"), ("main.css", "")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("dist/index.html")).unwrap(),
        "<html><head></head><body><app-root></app-root>\
         <script src=\"main.js\" type=\"module\"></script>\n\
         <script src=\"polyfills.js\" type=\"module\"></script>\n\
         </body></html>"
    );
}

#[tokio::test]
async fn html_template_with_no_matches_warns_and_still_writes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<body></body>").unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(
        HtmlTemplatePlugin::new(
            HtmlConfig::new("index.html", "out/index.html")
                .with_include(vec![r"\.mjs$".into()]),
        )
        .unwrap()
        .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    assert!(report.diagnostics[0].message.contains("main.js"));
    assert_eq!(
        fs::read_to_string(dir.path().join("out/index.html")).unwrap(),
        "<body></body>"
    );
}

#[tokio::test]
async fn html_template_missing_file_fails_the_build() {
    let dir = TempDir::new().unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(
        HtmlTemplatePlugin::new(HtmlConfig::new("nope.html", "dist/index.html"))
            .unwrap()
            .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let err = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EmitHooks(ref f) if f[0].plugin == "html-template"));
    // The bundle itself was still written.
    assert!(dir.path().join("dist/main.js").exists());
}

#[tokio::test]
async fn size_report_flags_large_files() {
    let dir = TempDir::new().unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(SizeReportPlugin::new(SizeReportConfig {
        max_bytes: Some(10),
        verbose: false,
    }));
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("small.js", "1"), ("large.js", "0123456789abcdef")])),
            &FinishOptions::write_to(dir.path()),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].id.as_deref(), Some("large.js"));
}

#[tokio::test]
async fn prewritten_output_feeds_the_barrier() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.js"), "console.log(1)".repeat(10)).unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(CompressPlugin::new(
        CompressConfig::default().with_algorithms(vec![CompressAlgorithm::Gzip]),
    )
    .unwrap());
    let driver = registry.into_driver();

    let mut bundle = bundle_of(&[]);
    bundle.manifest.insert(
        "app",
        litpack_bundler::ManifestEntry {
            file_name: "app.js".into(),
            kind: litpack_bundler::ChunkKind::Entry,
        },
    );

    let report = driver
        .finish(
            Arc::new(bundle),
            &FinishOptions::write_to(dir.path()),
            &PrewrittenOutput,
        )
        .await
        .unwrap();

    assert_eq!(report.written, vec![dir.path().join("app.js")]);
    assert!(dir.path().join("app.js.gz").exists());
}

#[tokio::test]
async fn one_failed_compression_job_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    // A directory where `bad.js.gz` should go makes only that job fail.
    fs::create_dir_all(dir.path().join("bad.js.gz")).unwrap();

    let mut registry = PluginRegistry::new();
    registry.add(CompressPlugin::new(CompressConfig::default()).unwrap());
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("bad.js", "let bad = 1;"), ("good.js", "let good = 2;")])),
            &FinishOptions::write_to(dir.path()),
            &FsOutputWriter,
        )
        .await
        .unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.plugin, "compress");
    assert!(diagnostic.id.as_deref().unwrap().ends_with("bad.js"));
    assert!(diagnostic.message.contains("gzip"));

    assert!(dir.path().join("bad.js.br").is_file());
    assert!(dir.path().join("good.js.gz").is_file());
    assert!(dir.path().join("good.js.br").is_file());
    assert!(!dir.path().join("bad.js.gz.tmp").exists());
}

#[tokio::test]
async fn compression_waits_for_copied_and_generated_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<body></body>").unwrap();
    fs::create_dir_all(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.css"), "body { margin: 0 }").unwrap();

    let mut registry = PluginRegistry::new();
    // Registered first so it starts before the stages it depends on.
    registry.add(CompressPlugin::new(
        CompressConfig::default().with_algorithms(vec![CompressAlgorithm::Gzip]),
    )
    .unwrap());
    registry.add(
        CopyPlugin::new(CopyConfig::default().with_resource("assets", "dist/assets"))
            .with_root(dir.path()),
    );
    registry.add(
        HtmlTemplatePlugin::new(HtmlConfig::new("index.html", "dist/index.html"))
            .unwrap()
            .with_root(dir.path()),
    );
    let driver = registry.into_driver();

    let report = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "export {};")])),
            &FinishOptions::write_to(dir.path().join("dist")),
            &FsOutputWriter,
        )
        .await
        .unwrap();
    assert!(report.diagnostics.is_empty());

    let dist = dir.path().join("dist");
    for name in ["main.js.gz", "index.html.gz", "assets/app.css.gz"] {
        assert!(dist.join(name).is_file(), "{name}");
    }

    let mut html = String::new();
    flate2::read::GzDecoder::new(File::open(dist.join("index.html.gz")).unwrap())
        .read_to_string(&mut html)
        .unwrap();
    assert_eq!(
        html,
        "<body><script src=\"main.js\" type=\"module\"></script>\n</body>"
    );
}

#[tokio::test]
async fn before_write_runs_in_order_and_aborts_on_failure() {
    let dir = TempDir::new().unwrap();
    let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let record = Arc::new(HookRecord::default());

    let mut registry = PluginRegistry::new();
    registry.add(Preparer { name: "first", log: Arc::clone(&log), fail: false });
    registry.add(Preparer { name: "second", log: Arc::clone(&log), fail: true });
    registry.add(Preparer { name: "third", log: Arc::clone(&log), fail: false });
    registry.add(Recorder(Arc::clone(&record)));
    let driver = registry.into_driver();

    let err = driver
        .finish(
            Arc::new(bundle_of(&[("main.js", "1")])),
            &FinishOptions::write_to(dir.path()),
            &FsOutputWriter,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Plugin { ref plugin, .. } if plugin == "second"));
    assert_eq!(*log.lock(), vec!["first", "second"]);
    assert!(!record.ran.load(Ordering::SeqCst));
    assert!(!dir.path().join("main.js").exists());
}

#[tokio::test]
async fn before_write_is_skipped_for_prewritten_bundles() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.js"), "1").unwrap();
    let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let mut registry = PluginRegistry::new();
    registry.add(Preparer { name: "prepare", log: Arc::clone(&log), fail: true });
    let driver = registry.into_driver();

    let mut bundle = bundle_of(&[]);
    bundle.manifest.insert(
        "app",
        litpack_bundler::ManifestEntry {
            file_name: "app.js".into(),
            kind: litpack_bundler::ChunkKind::Entry,
        },
    );

    driver
        .finish(Arc::new(bundle), &FinishOptions::write_to(dir.path()), &PrewrittenOutput)
        .await
        .unwrap();
    assert!(log.lock().is_empty());
}
