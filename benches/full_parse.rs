use criterion::{black_box, criterion_group, criterion_main, Criterion};

use parseley::Parser;

fn count(parser: &Parser, sentence: &str) -> usize {
  parser.parse(sentence).map(|trees| trees.len()).unwrap_or(0)
}

fn criterion_benchmark(c: &mut Criterion) {
  let parser = Parser::new().unwrap();

  c.bench_function("parse simple", |b| {
    b.iter(|| count(black_box(&parser), black_box("The dog ran.")))
  });

  c.bench_function("parse ambiguous attachment", |b| {
    b.iter(|| count(black_box(&parser), black_box("She hunted the fox in the garden.")))
  });

  c.bench_function("parse embedded clause", |b| {
    b.iter(|| {
      count(
        black_box(&parser),
        black_box("She thinks that the dog that ran slept."),
      )
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
