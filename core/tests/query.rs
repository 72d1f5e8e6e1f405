mod common;

use common::{approx_eq, at, day, fixture_records, rec};
use retail_dash_core::{
    config::{CustomerIdPolicy, DashboardConfig, TimeBucket},
    dataset::Dataset,
    query::{self, compute_views, ViewFilter, ViewOptions},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn fixture() -> Dataset {
    Dataset::from_records(fixture_records(), CustomerIdPolicy::Retain)
}

fn france(start: (i32, u32, u32), end: (i32, u32, u32)) -> ViewFilter {
    ViewFilter::new(
        "France",
        day(start.0, start.1, start.2),
        day(end.0, end.1, end.2),
    )
}

// ── Filter ───────────────────────────────────────────────────────────────────

#[test]
fn filter_matches_country_and_inclusive_day_range() {
    let ds = fixture();

    let rows = query::filter_records(&ds, &france((2010, 12, 3), (2010, 12, 6)));
    let invoices: Vec<&str> = rows.iter().map(|r| r.invoice.as_str()).collect();
    assert_eq!(invoices, vec!["1002", "C1003"]);

    // End bound covers the whole last day, including 23:59.
    let rows = query::filter_records(&ds, &france((2010, 12, 7), (2010, 12, 7)));
    assert_eq!(rows.len(), 2);
}

#[test]
fn country_match_is_exact_and_case_sensitive() {
    let ds = fixture();
    let views = compute_views(
        &ds,
        &ViewFilter::new("france", day(2010, 1, 1), day(2011, 12, 31)),
        &ViewOptions::default(),
    );
    assert!(views.is_empty());
}

// ── Filtered views ───────────────────────────────────────────────────────────

#[test]
fn daily_series_is_sparse_and_chronological() {
    let views = compute_views(
        &fixture(),
        &france((2010, 12, 1), (2010, 12, 31)),
        &ViewOptions::default(),
    );

    let series: Vec<_> = views
        .revenue_series
        .iter()
        .map(|p| (p.period, p.revenue))
        .collect();
    assert_eq!(
        series,
        vec![
            (day(2010, 12, 1), 20.0),
            (day(2010, 12, 3), 25.0),
            (day(2010, 12, 6), -5.0),
            (day(2010, 12, 7), 12.0),
        ]
    );
}

#[test]
fn weekly_series_closes_on_monday() {
    let options = ViewOptions {
        bucket: TimeBucket::Week,
        ..ViewOptions::default()
    };
    let views = compute_views(&fixture(), &france((2010, 12, 1), (2010, 12, 31)), &options);

    let series: Vec<_> = views
        .revenue_series
        .iter()
        .map(|p| (p.period, p.revenue))
        .collect();
    // Wed 12-01, Fri 12-03 and Mon 12-06 share the week closing Mon 12-06;
    // Tue 12-07 opens the next one.
    assert_eq!(
        series,
        vec![(day(2010, 12, 6), 40.0), (day(2010, 12, 13), 12.0)]
    );
}

#[test]
fn bucket_period_maps_each_weekday_to_closing_monday() {
    let monday = day(2010, 12, 13);
    for offset in 0..7 {
        let d = day(2010, 12, 7 + offset);
        assert_eq!(query::bucket_period(d, TimeBucket::Week), monday, "{d}");
    }
    assert_eq!(query::bucket_period(day(2010, 12, 14), TimeBucket::Week), day(2010, 12, 20));
    assert_eq!(query::bucket_period(day(2010, 12, 14), TimeBucket::Day), day(2010, 12, 14));
}

#[test]
fn top_products_rank_by_summed_line_total() {
    let views = compute_views(
        &fixture(),
        &france((2010, 12, 1), (2010, 12, 31)),
        &ViewOptions::default(),
    );

    let ranked: Vec<_> = views
        .top_products
        .iter()
        .map(|p| (p.description.as_str(), p.revenue))
        .collect();
    assert_eq!(
        ranked,
        vec![("MUG", 30.0), ("BOWL", 12.0), ("PLATE", 10.0), ("POSTAGE", 0.0)]
    );
}

#[test]
fn top_products_truncates_to_n_and_orders_ties_by_description() {
    let when = at(2011, 3, 1, 10, 0);
    let mut records = Vec::new();
    for i in 0..15 {
        records.push(rec(
            &format!("{}", 500 + i),
            &format!("ITEM {i:02}"),
            i + 1,
            1.0,
            Some("1"),
            "Spain",
            when,
        ));
    }
    records.push(rec("600", "A TIE", 15, 1.0, Some("1"), "Spain", when));
    let ds = Dataset::from_records(records, CustomerIdPolicy::Retain);

    let views = compute_views(
        &ds,
        &ViewFilter::new("Spain", day(2011, 3, 1), day(2011, 3, 1)),
        &ViewOptions::default(),
    );

    assert_eq!(views.top_products.len(), 10);
    assert!(views
        .top_products
        .windows(2)
        .all(|w| w[0].revenue >= w[1].revenue));
    assert_eq!(views.top_products[0].description, "A TIE");
    assert_eq!(views.top_products[1].description, "ITEM 14");
}

#[test]
fn scatter_keeps_only_positive_quantity_and_price() {
    let views = compute_views(
        &fixture(),
        &france((2010, 12, 1), (2010, 12, 31)),
        &ViewOptions::default(),
    );

    assert_eq!(views.scatter_points.len(), 4);
    for p in &views.scatter_points {
        assert!(p.quantity > 0 && p.price > 0.0, "{p:?}");
        assert_eq!(p.size, p.quantity as f64 * p.price);
    }
    assert!(views.scatter_points.iter().all(|p| p.label != "POSTAGE"));
}

#[test]
fn summary_metrics_cover_the_filtered_set() {
    let views = compute_views(
        &fixture(),
        &france((2010, 12, 1), (2010, 12, 31)),
        &ViewOptions::default(),
    );

    assert_eq!(views.summary.total_revenue, 52.0);
    assert_eq!(views.summary.total_quantity, 18);
    assert_eq!(views.summary.distinct_products, 4);
    assert_eq!(views.summary.distinct_invoices, 5);
}

#[test]
fn series_total_equals_filtered_line_totals() {
    let ds = fixture();
    let filter = france((2010, 12, 1), (2010, 12, 31));
    for bucket in [TimeBucket::Day, TimeBucket::Week] {
        let options = ViewOptions {
            bucket,
            ..ViewOptions::default()
        };
        let views = compute_views(&ds, &filter, &options);
        let series_total: f64 = views.revenue_series.iter().map(|p| p.revenue).sum();
        assert!(approx_eq(series_total, views.summary.total_revenue));
    }
}

// ── Empty results ────────────────────────────────────────────────────────────

#[test]
fn reversed_range_yields_empty_views() {
    let views = compute_views(
        &fixture(),
        &france((2010, 12, 31), (2010, 12, 1)),
        &ViewOptions::default(),
    );
    assert!(views.is_empty());
    assert_eq!(views.summary.total_revenue, 0.0);
    assert_eq!(views.summary.distinct_invoices, 0);
}

#[test]
fn unknown_country_yields_empty_views() {
    let views = compute_views(
        &fixture(),
        &ViewFilter::new("Atlantis", day(2010, 1, 1), day(2011, 12, 31)),
        &ViewOptions::default(),
    );
    assert!(views.is_empty());
}

#[test]
fn range_without_rows_yields_empty_views() {
    let views = compute_views(
        &fixture(),
        &france((2011, 6, 1), (2011, 6, 30)),
        &ViewOptions::default(),
    );
    assert!(views.is_empty());
}

// ── Overview ─────────────────────────────────────────────────────────────────

#[test]
fn overview_ranks_countries_over_the_whole_dataset() {
    let overview = query::overview(&fixture(), &DashboardConfig::default_test());

    assert_eq!(overview.total_revenue, 290.0);
    let countries: Vec<_> = overview
        .top_countries
        .iter()
        .map(|c| (c.country.as_str(), c.revenue))
        .collect();
    assert_eq!(
        countries,
        vec![
            ("Germany", 200.0),
            ("France", 52.0),
            ("United Kingdom", 30.0),
            ("Unspecified", 8.0),
        ]
    );
    assert_eq!(overview.top_products[0].description, "MUG");
    assert_eq!(overview.top_products[0].revenue, 230.0);

    let weeks: Vec<_> = overview.revenue_series.iter().map(|p| p.period).collect();
    assert_eq!(weeks, vec![day(2010, 12, 6), day(2010, 12, 13)]);
}

#[test]
fn overview_truncates_country_ranking() {
    let config = DashboardConfig {
        top_countries: 2,
        ..DashboardConfig::default_test()
    };
    let overview = query::overview(&fixture(), &config);
    assert_eq!(overview.top_countries.len(), 2);

    let rows: Vec<_> = fixture_records();
    let refs: Vec<_> = rows.iter().collect();
    assert_eq!(query::revenue_by_country(&refs).len(), 4);
}

#[test]
fn computing_views_leaves_the_dataset_untouched() {
    let ds = fixture();
    let before = ds.clone();
    let filter = france((2010, 12, 1), (2010, 12, 31));
    let _ = compute_views(&ds, &filter, &ViewOptions::default());
    let _ = query::overview(&ds, &DashboardConfig::default_test());
    assert_eq!(ds, before);
}
