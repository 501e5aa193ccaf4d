use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gic_cinema::{CenterOutPolicy, Screen, SeatRow};

fn centered_row_fill(c: &mut Criterion) {
    c.bench_function("centered_row_fill", |b| {
        b.iter(|| {
            let policy = CenterOutPolicy;
            let mut row = SeatRow::new(50);
            while !row.reserve(&policy, black_box(3)).is_empty() {}
            row
        });
    });
}

fn cascade_fill_screen(c: &mut Criterion) {
    c.bench_function("cascade_fill_screen", |b| {
        b.iter(|| {
            let mut screen = build_screen();
            loop {
                let available = screen.seats_available();
                if available == 0 {
                    break;
                }
                let tickets = available.min(black_box(7));
                let outcome = screen.reserve(None, tickets, None).expect("reserve");
                let id = outcome
                    .reservation()
                    .expect("reserved")
                    .id()
                    .as_str()
                    .to_string();
                screen.confirm_reservation(&id).expect("confirm");
            }
            screen
        });
    });
}

fn amendment_churn(c: &mut Criterion) {
    c.bench_function("amendment_churn", |b| {
        b.iter(|| {
            let mut screen = build_screen();
            let outcome = screen.reserve(None, 20, None).expect("reserve");
            let id = outcome
                .reservation()
                .expect("reserved")
                .id()
                .as_str()
                .to_string();
            for round in 0..16 {
                let start = if round % 2 == 0 { (4, 10) } else { (12, 30) };
                screen
                    .reserve(Some(&id), black_box(20), Some(start))
                    .expect("amend");
            }
            screen
        });
    });
}

fn render_map_dense(c: &mut Criterion) {
    let mut screen = build_screen();
    let outcome = screen.reserve(None, 26 * 50 - 40, None).expect("reserve");
    let id = outcome
        .reservation()
        .expect("reserved")
        .id()
        .as_str()
        .to_string();
    screen.confirm_reservation(&id).expect("confirm");

    c.bench_function("render_map_dense", |b| {
        b.iter(|| screen.render_map(black_box(&id)).expect("render"));
    });
}

fn build_screen() -> Screen {
    Screen::new("bench", 26, 50).expect("layout")
}

criterion_group!(
    benches,
    centered_row_fill,
    cascade_fill_screen,
    amendment_churn,
    render_map_dense
);
criterion_main!(benches);
