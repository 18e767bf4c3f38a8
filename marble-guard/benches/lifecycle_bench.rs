//! Benchmarks for the schema phase and lifecycle replay.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use marble_guard::constraints::LifecycleConstraint;
use marble_guard::core::{Dataset, DatasetCheck, DatasetValidator};
use marble_guard::schema::{columns::*, SchemaCatalog, Table};
use marble_guard::sources::MemorySource;
use marble_guard::time::format_time;

const BATTLES: usize = 50;

/// Builds a valid dataset where marble `i` fights battle `i % BATTLES` and
/// levels up once in it.
fn create_tournament(marbles: usize) -> MemorySource {
    let mut source = MemorySource::with_all_tables();
    source.push_row(Table::Colors, [(COLOR, "Red"), (HEX_CODE, "#FF0000")]);

    for battle in 0..BATTLES {
        let id = format!("B{battle}");
        let offset = 100.0 * (battle as f64 + 1.0);
        let (begin, end) = (format_time(offset + 10.0), format_time(offset + 20.0));
        source
            .push_row(
                Table::Battles,
                [(BATTLE_ID, id.as_str()), (BEGIN, begin.as_str()), (END, end.as_str())],
            )
            .push_row(
                Table::BattleColors,
                [(BATTLE_ID, id.as_str()), (COLOR, "Red"), (IS_WINNER, "true")],
            );
    }

    let survived_at = format_time(100.0 * (BATTLES as f64 + 1.0) + 50.0);
    for marble in 0..marbles {
        let name = format!("M{marble}");
        let battle = marble % BATTLES;
        let id = format!("B{battle}");
        let level_at = format_time(100.0 * (battle as f64 + 1.0) + 15.0);

        source
            .push_row(
                Table::Marbles,
                [
                    (MARBLE_NAME, name.as_str()),
                    (FULL_NAME, name.as_str()),
                    (TYPE, "Fighter"),
                    (COLOR, "Red"),
                    (FINAL_LEVEL, "2"),
                    (KILLS, "0"),
                ],
            )
            .push_row(
                Table::Begin,
                [
                    (TIME, "00:00:01.0"),
                    (MARBLE_NAME, name.as_str()),
                    (LOCATION, "-"),
                    (LEVEL, "1"),
                    (TYPE, "Born"),
                ],
            )
            .push_row(
                Table::Level,
                [(TIME, level_at.as_str()), (MARBLE_NAME, name.as_str()), (LEVEL, "2")],
            )
            .push_row(
                Table::End,
                [
                    (TIME, survived_at.as_str()),
                    (MARBLE_NAME, name.as_str()),
                    (LOCATION, "-"),
                    (LEVEL, "2"),
                    (TYPE, "Survive"),
                ],
            )
            .push_row(
                Table::BattleMarbles,
                [(BATTLE_ID, id.as_str()), (MARBLE_NAME, name.as_str())],
            );
    }
    source
}

fn bench_schema_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_phase");
    let catalog = SchemaCatalog::standard();

    for marbles in [100, 1_000, 10_000] {
        let source = create_tournament(marbles);
        group.bench_with_input(BenchmarkId::from_parameter(marbles), &source, |b, source| {
            b.iter(|| std::hint::black_box(Dataset::load(source, &catalog).unwrap()))
        });
    }
    group.finish();
}

fn bench_lifecycle_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle_replay");
    let catalog = SchemaCatalog::standard();
    let check = LifecycleConstraint::new();

    for marbles in [100, 1_000, 10_000] {
        let dataset = Dataset::load(&create_tournament(marbles), &catalog).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(marbles), &dataset, |b, dataset| {
            b.iter(|| std::hint::black_box(check.evaluate(dataset).unwrap()))
        });
    }
    group.finish();
}

fn bench_full_validation(c: &mut Criterion) {
    let validator = DatasetValidator::default();
    let source = create_tournament(1_000);

    c.bench_function("validate_1000_marbles", |b| {
        b.iter(|| std::hint::black_box(validator.validate(&source).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_schema_phase,
    bench_lifecycle_replay,
    bench_full_validation
);
criterion_main!(benches);
