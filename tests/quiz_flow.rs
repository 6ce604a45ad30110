use std::fs;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use simeq::bank::QuestionBank;
use simeq::engine::{Feedback, Token, find_match, is_correct, normalize, tokenize};
use simeq::session::{InputTarget, Level, Phase, QuizSession};

fn answer_current_slots(quiz: &mut QuizSession<'_>) {
    let question = quiz.current_question().unwrap();
    for (slot, accepted) in question.accepted_answers.iter().enumerate() {
        quiz.set_input(InputTarget::Slot(slot), &accepted[0]).unwrap();
    }
    let feedback = quiz.submit_final().unwrap();
    assert!(
        feedback.iter().all(|f| f.is_correct()),
        "question {} rejected its own accepted answers",
        question.id
    );
}

#[test]
fn direct_level_full_run_is_perfect() {
    let bank = QuestionBank::builtin().unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    let mut quiz = QuizSession::with_rng(&bank, Level::Direct, &mut rng);

    let mut last_score = 0;
    while !quiz.is_complete() {
        assert_eq!(quiz.phase(), Phase::AssemblingFullEquation);
        answer_current_slots(&mut quiz);
        assert!(quiz.score() > last_score);
        last_score = quiz.score();
        quiz.advance().unwrap();
    }

    let summary = quiz.summary();
    assert_eq!(summary.score, bank.len());
    assert!(summary.is_perfect());
    assert_eq!(summary.total_attempts(), bank.len() as u32);
}

#[test]
fn guided_level_every_segment_is_solvable() {
    let bank = QuestionBank::builtin().unwrap();
    let mut rng = SmallRng::seed_from_u64(9);
    let mut quiz = QuizSession::with_rng(&bank, Level::Guided, &mut rng);

    while !quiz.is_complete() {
        let question = quiz.current_question().unwrap();
        for (s, segment) in question.segments.iter().enumerate() {
            let keyword = segment.input_keywords().next().unwrap();
            let target = InputTarget::Keyword {
                segment: s,
                keyword,
            };
            quiz.set_input(target, &segment.valid_forms[0]).unwrap();
            assert_eq!(
                quiz.submit_segment(s),
                Ok(Feedback::Correct),
                "question {} segment {s}",
                question.id
            );
        }
        assert_eq!(quiz.phase(), Phase::SegmentComplete);
        quiz.begin_full_equation().unwrap();
        answer_current_slots(&mut quiz);
        quiz.advance().unwrap();
    }
    assert_eq!(quiz.score(), bank.len());
}

#[test]
fn skipping_everything_scores_nothing() {
    let bank = QuestionBank::builtin().unwrap();
    let mut quiz = QuizSession::new(&bank, Level::Guided);
    for _ in 0..bank.len() {
        quiz.skip().unwrap();
    }
    let summary = quiz.summary();
    assert_eq!(summary.score, 0);
    assert!(summary.outcomes.iter().all(|o| !o.completed && o.attempts == 0));
}

#[test]
fn accepted_forms_are_distinct_after_normalizing() {
    let bank = QuestionBank::builtin().unwrap();
    for question in bank.questions() {
        for accepted in &question.accepted_answers {
            for (i, form) in accepted.iter().enumerate() {
                assert_eq!(find_match(form, accepted), Some(i), "{form}");
            }
        }
        for segment in &question.segments {
            let spaced = segment.valid_forms[0].replace('=', " = ");
            assert!(is_correct(&spaced, &segment.valid_forms));
        }
    }
}

#[test]
fn fraction_answers_render_stacked() {
    let bank = QuestionBank::builtin().unwrap();
    let fractions = bank
        .questions()
        .iter()
        .flat_map(|q| q.accepted_answers.iter().flatten())
        .filter(|form| form.contains('/'))
        .count();
    assert!(fractions > 0);

    for question in bank.questions() {
        for form in question.accepted_answers.iter().flatten() {
            let tokens = tokenize(form);
            assert!(!tokens.is_empty());
            if form.contains('/') {
                assert!(
                    tokens.iter().any(|t| matches!(t, Token::Fraction { .. })),
                    "{form} should contain a fraction"
                );
            }
        }
    }
}

#[test]
fn custom_bank_file_loads_and_plays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.json");
    fs::write(
        &path,
        r#"{
            "version": 1,
            "questions": [{
                "id": 7,
                "title": "Apples",
                "problem_text": "Two numbers add to ten and differ by two.",
                "variable_declaration": "x, y",
                "segments": [{
                    "display_text": "They add to ten.",
                    "keywords": ["x", "plus", "y", "is", "10"],
                    "keyword_display_order": [0, 1, 2, 3, 4],
                    "valid_forms": ["x+y=10"]
                }],
                "accepted_answers": [["x+y=10"], ["x-y=2"]]
            }]
        }"#,
    )
    .unwrap();

    let bank = QuestionBank::load(&path).unwrap();
    assert_eq!(bank.len(), 1);
    assert!(bank.cheatsheet().is_empty());

    let mut quiz = QuizSession::new(&bank, Level::Guided);
    for (keyword, text) in ["x", "+", "y", "=", "10"].iter().enumerate() {
        quiz.set_input(InputTarget::Keyword { segment: 0, keyword }, text)
            .unwrap();
    }
    assert_eq!(quiz.submit_segment(0), Ok(Feedback::Correct));
    quiz.set_input(InputTarget::Slot(0), "X + Y = 10").unwrap();
    quiz.set_input(InputTarget::Slot(1), "x - y = 2").unwrap();
    quiz.submit_final().unwrap();
    assert_eq!(quiz.advance(), Ok(Phase::SessionComplete));
    assert_eq!(quiz.score(), 1);
    assert_eq!(normalize("X + Y = 10"), "x+y=10");
}
