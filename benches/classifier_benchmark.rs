use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qa_chatbot::{
    normalize, Classifier, ClassifierError, InferenceEngine, LabelIndex, LabelMappingSource,
};

/// Hashes the input onto a label so lookups hit and miss the mapping
#[derive(Debug)]
struct HashingEngine {
    labels: i64,
}

impl InferenceEngine for HashingEngine {
    fn input_name(&self) -> &str {
        "input"
    }

    fn predict(&self, input: &str) -> Result<LabelIndex, ClassifierError> {
        let sum: i64 = input.bytes().map(i64::from).sum();
        Ok(LabelIndex(sum % self.labels))
    }

    fn custom_metadata(&self, _key: &str) -> Result<Option<String>, ClassifierError> {
        let entries: Vec<String> = (0..self.labels / 2)
            .map(|i| format!("\"{}\": \"answer {}\"", i, i))
            .collect();
        Ok(Some(format!("{{{}}}", entries.join(", "))))
    }
}

fn setup_benchmark_classifier(labels: i64) -> Classifier {
    Classifier::builder()
        .with_engine(HashingEngine { labels })
        .unwrap()
        .with_label_source(LabelMappingSource::model_metadata())
        .build()
        .unwrap()
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalization");

    // Configure sampling
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| {
        normalize(black_box("Is water wet?"))
    }));

    group.bench_function("long_text", |b| b.iter(|| {
        normalize(black_box(
            "This is a much longer question, with punctuation; MIXED case, digits like 42 \
             and some non-ASCII characters such as café and naïve, which all have to be \
             filtered before the text reaches the model!"
        ))
    }));

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classification");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Mapping size should not matter for a hash lookup
    let label_counts = [2, 100, 10_000];
    for &count in &label_counts {
        let classifier = setup_benchmark_classifier(count);
        group.bench_function(format!("labels_{}", count), |b| b.iter(|| {
            classifier.classify(black_box("What is the capital of France?")).unwrap()
        }));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_classification
);
criterion_main!(benches);
