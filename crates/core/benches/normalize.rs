use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use spritsit_core::{BoilerplateExtractor, CleanDocument, Normalizer, SmoothieExtractor, flatten_html};

fn readable_fragment() -> String {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    SmoothieExtractor::default().extract(&html, None).unwrap().content
}

fn bench_flatten(c: &mut Criterion) {
    let fragment = readable_fragment();

    c.bench_function("flatten_html", |b| b.iter(|| flatten_html(black_box(&fragment))));
}

fn bench_textify(c: &mut Criterion) {
    let fragment = readable_fragment();
    let large = fragment.repeat(50);
    let normalizer = Normalizer::default();

    let mut group = c.benchmark_group("textify");

    for (name, html) in [("article", &fragment), ("article_x50", &large)] {
        group.bench_with_input(BenchmarkId::new("textify", name), html, |b, html| {
            b.iter(|| {
                let mut doc = CleanDocument::new("https://example.com");
                doc.set_raw_html(html.as_str());
                normalizer.textify(black_box(&mut doc));
                doc
            })
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let extractor = SmoothieExtractor::default();

    c.bench_function("boilerplate_extraction", |b| b.iter(|| extractor.extract(black_box(&html), None)));
}

criterion_group!(benches, bench_flatten, bench_textify, bench_extract);
criterion_main!(benches);
