use criterion::{black_box, criterion_group, criterion_main, Criterion};
use farehawk::models::{Deal, DealTag};
use farehawk::services::deals::{attach_tags, sort_deals};

fn synthetic_deal(n: usize) -> Deal {
    let city = if n % 3 == 0 { "London (LHR)" } else { "Paris (CDG)" };
    Deal {
        id: format!("deal-{n}"),
        destination: "Tokyo".to_string(),
        country: "Japan".to_string(),
        flag: "🇯🇵".to_string(),
        image_url: String::new(),
        price: 380,
        original_price: 750,
        discount: 49,
        departure: city.to_string(),
        stops: "Direct".to_string(),
        cabin_type: None,
        sample_dates: None,
        departure_time: "08:45".to_string(),
        arrival_time: "16:30".to_string(),
        flight_duration: None,
        posted_by: "Deal Finder".to_string(),
        posted_by_avatar: String::new(),
        posted_by_description: None,
        likes: (n % 100) as i64,
        url: String::new(),
        deal_screenshot_url: None,
        created_at: format!("2025-01-{:02}T{:02}:00:00Z", (n % 28) + 1, n % 24),
        is_hot: n % 7 == 0,
    }
}

fn benchmark_deal_listing(c: &mut Criterion) {
    // A listing far larger than production sees, so regressions show up
    let deals: Vec<Deal> = (0..1_000).map(synthetic_deal).collect();
    let tags: Vec<DealTag> = (0..1_000)
        .flat_map(|n| {
            ["Beach", "City Break", "Hot"]
                .iter()
                .take(n % 4)
                .map(move |t| DealTag {
                    deal_id: format!("deal-{n}"),
                    tag: t.to_string(),
                })
        })
        .collect();

    let mut group = c.benchmark_group("deal_listing");

    group.bench_function("attach_tags_1k", |b| {
        b.iter(|| {
            attach_tags(
                black_box(deals.clone()),
                black_box(&tags),
                black_box(Some("London")),
            )
        })
    });

    group.bench_function("attach_and_sort_1k", |b| {
        b.iter(|| {
            let mut joined = attach_tags(
                black_box(deals.clone()),
                black_box(&tags),
                black_box(Some("London")),
            );
            sort_deals(&mut joined);
            joined
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_deal_listing);
criterion_main!(benches);
