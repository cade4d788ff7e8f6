use criterion::{Criterion, black_box, criterion_group, criterion_main};

use kalkulacka::calculator::{Action, CalculatorState, Operator, format_number};
use kalkulacka::oracle::extract_number;

fn chain_actions(terms: usize) -> Vec<Action> {
    let ops = [Operator::Add, Operator::Multiply, Operator::Subtract, Operator::Divide];
    let mut actions = Vec::with_capacity(terms * 3);
    for i in 0..terms {
        actions.push(Action::Digit(char::from(b'1' + (i % 9) as u8)));
        actions.push(Action::DecimalPoint);
        actions.push(Action::Digit('5'));
        actions.push(Action::Operator(ops[i % ops.len()]));
    }
    actions.push(Action::Digit('2'));
    actions.push(Action::Evaluate);
    actions
}

fn bench_chain(c: &mut Criterion) {
    let actions = chain_actions(200);

    c.bench_function("chained evaluation (200 terms)", |b| {
        b.iter(|| {
            let mut state = CalculatorState::new();
            for action in &actions {
                state.dispatch(black_box(action.clone()));
            }
            state
        })
    });
}

fn bench_history(c: &mut Criterion) {
    c.bench_function("history churn (500 results)", |b| {
        b.iter(|| {
            let mut state = CalculatorState::new();
            for _ in 0..500 {
                state.dispatch(Action::Digit('9'));
                state.dispatch(Action::Operator(Operator::Multiply));
                state.dispatch(Action::Digit('3'));
                state.dispatch(Action::Evaluate);
            }
            state.history.len()
        })
    });
}

fn bench_extract(c: &mut Criterion) {
    let answers = [
        "1 500,25 Kč",
        "Výsledek je 42.",
        "x = -3,75",
        "Cena po slevě činí 12 345 678,9 Kč, tedy o něco méně.",
        "Na tohle neumím odpovědět.",
    ];

    c.bench_function("extract_number (5 answers)", |b| {
        b.iter(|| {
            for answer in &answers {
                black_box(extract_number(black_box(answer)));
            }
        })
    });

    c.bench_function("format_number", |b| {
        b.iter(|| format_number(black_box(1234.5678)))
    });
}

criterion_group!(benches, bench_chain, bench_history, bench_extract);
criterion_main!(benches);
