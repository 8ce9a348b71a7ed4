// benches/cards.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use trend_scrape::replay::{CategoryFixture, DashboardFixture, ReplayDriver, Screen};
use trend_scrape::scrape::PaginationExtractor;
use trend_scrape::config::Timeouts;
use trend_scrape::specs::card::{parse_card, parse_growth, RawCard};

fn sample_cards() -> Vec<RawCard> {
    let badges = ["+4,454%", "-1.2e3%", "+-18%", "n/a", "+12,345,678.9 %", ""];
    (0..600)
        .map(|i| RawCard {
            name: Some(format!("  Trend\n number {i} ")),
            growth: Some(badges[i % badges.len()].to_string()),
            ticker: (i % 4 != 0).then(|| vec![format!("TK{i}"), format!("{}%", i % 100)]),
        })
        .collect()
}

fn bench_cards(c: &mut Criterion) {
    let cards = sample_cards();

    c.bench_function("parse_card_600", |b| {
        b.iter(|| {
            let parsed: Vec<_> = cards.iter().map(|r| parse_card(black_box(r))).collect();
            black_box(parsed.len())
        })
    });

    c.bench_function("parse_growth", |b| {
        b.iter(|| black_box(parse_growth(black_box("+12,345,678.9%"))))
    });

    c.bench_function("replay_extract_11_pages", |b| {
        b.iter(|| {
            let d = ReplayDriver::new(DashboardFixture {
                start: Screen::Dashboard,
                unfiltered: CategoryFixture::synthetic("All", 15, 20).pages,
                ..DashboardFixture::default()
            });
            let t = Timeouts::default().without_settle();
            let rows = PaginationExtractor::new(&d, &t).extract_all(Some(11)).unwrap_or_default();
            black_box(rows.len())
        })
    });
}

criterion_group!(benches, bench_cards);
criterion_main!(benches);
