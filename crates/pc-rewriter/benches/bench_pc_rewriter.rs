use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pc_rewriter::{capitalize_sentences, rewrite, PromptPipeline, RuleCatalog, Validator};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const SENTENCES: &[&str] = &[
    "I would really appreciate it if you could please help me analyze this code.",
    "Thank you so much in advance for your help!",
    "Provide a detailed explanation of what the code does, how it works, and why it was implemented.",
    "The service handles 500 requests in 30 seconds and uses 12 percent of the CPU.",
    "Could you look into any potential bugs or issues that you might find, and also check for any performance problems or areas where the code could be improved or optimized?",
    "Basically, the module just reads the config and actually writes a very detailed report.",
    "Summarize the report and list the top errors by date.",
];

fn generate_prompt(size_kb: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut text = String::with_capacity(size_kb * 1024);
    while text.len() < size_kb * 1024 {
        if let Some(s) = SENTENCES.choose(&mut rng) {
            text.push_str(s);
            text.push(' ');
        }
    }
    text
}

fn bench_optimize(c: &mut Criterion) {
    let pipeline = PromptPipeline::new();
    for &kb in &[1usize, 10, 100] {
        let text = generate_prompt(kb);
        c.bench_function(&format!("optimize_{kb}kb"), |b| {
            b.iter(|| black_box(pipeline.optimize(black_box(&text))))
        });
    }
}

fn bench_stages(c: &mut Criterion) {
    let catalog = RuleCatalog::builtin();
    let validator = Validator::default();
    let text = generate_prompt(10);
    let rewritten = rewrite(&text, &catalog);

    c.bench_function("rewrite_10kb", |b| b.iter(|| black_box(rewrite(black_box(&text), &catalog))));
    c.bench_function("capitalize_10kb", |b| b.iter(|| black_box(capitalize_sentences(black_box(&rewritten)))));
    c.bench_function("validate_10kb", |b| b.iter(|| black_box(validator.validate(black_box(&rewritten)))));
}

criterion_group!(benches, bench_optimize, bench_stages);
criterion_main!(benches);
