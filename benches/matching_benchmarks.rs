use criterion::{Criterion, black_box, criterion_group, criterion_main};

use simeq::bank::QuestionBank;
use simeq::engine::{is_correct, normalize, tokenize};

fn all_answers(bank: &QuestionBank) -> Vec<String> {
    bank.questions()
        .iter()
        .flat_map(|q| q.accepted_answers.iter().flatten())
        .cloned()
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let bank = QuestionBank::builtin().unwrap();
    let inputs: Vec<String> = all_answers(&bank)
        .iter()
        .map(|a| format!(" {} ", a.replace('*', " × ").to_uppercase()))
        .collect();

    c.bench_function("normalize (bundled answers)", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(normalize(black_box(input)));
            }
        })
    });
}

fn bench_match(c: &mut Criterion) {
    let bank = QuestionBank::builtin().unwrap();

    // Worst case for the matcher: a wrong answer checked against every slot
    c.bench_function("is_correct miss (all slots)", |b| {
        b.iter(|| {
            for question in bank.questions() {
                for accepted in &question.accepted_answers {
                    black_box(is_correct(black_box("x + y = 1"), accepted));
                }
            }
        })
    });

    c.bench_function("is_correct hit (last form)", |b| {
        b.iter(|| {
            for question in bank.questions() {
                for accepted in &question.accepted_answers {
                    if let Some(last) = accepted.last() {
                        black_box(is_correct(black_box(last), accepted));
                    }
                }
            }
        })
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let bank = QuestionBank::builtin().unwrap();
    let answers = all_answers(&bank);

    c.bench_function("tokenize (bundled answers)", |b| {
        b.iter(|| {
            for answer in &answers {
                black_box(tokenize(black_box(answer)));
            }
        })
    });
}

criterion_group!(benches, bench_normalize, bench_match, bench_tokenize);
criterion_main!(benches);
