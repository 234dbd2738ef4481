//! Audio pre-generation against a mock provider

mod common;

use common::mock_provider::MockProvider;
use common::TestContext;
use std::sync::Arc;
use std::time::Duration;
use tippen::generator::{Generator, GenerationReport, JobOutcome, Plan};

fn generator(ctx: &TestContext, provider: Arc<MockProvider>, concurrency: usize) -> Generator {
    Generator::new(provider, &ctx.audio_dir)
        .with_concurrency(concurrency)
        .with_job_delay(Duration::from_millis(5))
}

#[test]
fn test_plan_lists_missing_and_unused() {
    let ctx = TestContext::with_levels();
    ctx.write_clip("da.mp3");
    ctx.write_clip("veraltet.mp3");

    let plan = Plan::build(&ctx.data_dir, &ctx.audio_dir).expect("Failed to build plan");
    let missing: Vec<&str> = plan.status.missing.iter().map(|(f, _)| f.as_str()).collect();

    assert_eq!(
        missing,
        vec![
            "als.mp3",
            "baer.mp3",
            "finger_auf_die_grundreihe.mp3",
            "fuss.mp3",
            "grundreihe.mp3",
            "super_gemacht.mp3",
        ]
    );
    assert_eq!(plan.status.unused, vec!["veraltet.mp3".to_string()]);

    let report = plan.status.to_string();
    assert!(report.contains("Missing audio files (6):"));
    assert!(report.contains("Unused audio files (1):"));
}

#[tokio::test]
async fn test_run_cleans_up_and_generates_missing() {
    let ctx = TestContext::with_levels();
    ctx.write_clip("da.mp3");
    ctx.write_clip("veraltet.mp3");

    let provider = Arc::new(MockProvider::new());
    let plan = Plan::build(&ctx.data_dir, &ctx.audio_dir).expect("Failed to build plan");
    let report = generator(&ctx, provider.clone(), 2).run(&plan).await;

    assert_eq!(
        report,
        GenerationReport {
            generated: 6,
            skipped: 0,
            failed: 0
        }
    );
    assert!(!ctx.clip_exists("veraltet.mp3"));
    assert!(ctx.clip_exists("baer.mp3"));
    assert!(!provider.get_requested().contains(&"da".to_string()));

    let bytes = std::fs::read(ctx.audio_dir.join("fuss.mp3")).expect("clip written");
    assert_eq!(bytes, b"ID3 Fu\xc3\x9f");

    let again = Plan::build(&ctx.data_dir, &ctx.audio_dir).expect("Failed to build plan");
    assert!(again.status.is_clean());
}

#[tokio::test]
async fn test_failures_are_counted_and_do_not_stop_the_batch() {
    let ctx = TestContext::with_levels();
    let provider = Arc::new(MockProvider::new().failing_on("Bär"));
    let plan = Plan::build(&ctx.data_dir, &ctx.audio_dir).expect("Failed to build plan");

    let report = generator(&ctx, provider, 3).run(&plan).await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.generated, 6);
    assert!(!ctx.clip_exists("baer.mp3"));
    assert!(ctx.clip_exists("fuss.mp3"));
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let ctx = TestContext::new();
    let words: Vec<String> = (0..12).map(|i| format!("Wort {}", i)).collect();
    let items: Vec<String> = words.iter().map(|w| format!(r#"{{"text":"{}"}}"#, w)).collect();
    ctx.write_data("viele.json", &format!("[{}]", items.join(",")));

    let provider = Arc::new(MockProvider::new().with_latency(Duration::from_millis(20)));
    let plan = Plan::build(&ctx.data_dir, &ctx.audio_dir).expect("Failed to build plan");
    let report = generator(&ctx, provider.clone(), 3).run(&plan).await;

    assert_eq!(report.generated, 12);
    assert!(provider.peak_concurrency() <= 3);
    assert!(provider.peak_concurrency() >= 2);
}

#[tokio::test]
async fn test_existing_clip_is_skipped() {
    let ctx = TestContext::new();
    ctx.write_clip("haus.mp3");

    let provider = Arc::new(MockProvider::new());
    let outcome = generator(&ctx, provider.clone(), 1)
        .generate_one("haus.mp3", "Haus")
        .await;

    assert_eq!(outcome, JobOutcome::Skipped);
    assert!(provider.get_requested().is_empty());
}

#[tokio::test]
async fn test_nested_target_directory_is_created() {
    let ctx = TestContext::new();
    let provider = Arc::new(MockProvider::new());
    let generator = Generator::new(provider, ctx.path().join("neu").join("audio"));

    let outcome = generator.generate_one("maus.mp3", "Maus").await;
    assert_eq!(outcome, JobOutcome::Generated);
    assert!(ctx.path().join("neu/audio/maus.mp3").exists());
}
