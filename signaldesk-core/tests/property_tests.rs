//! Property tests for plan, series, matcher, currency and history invariants.
//!
//! Uses proptest to verify:
//! 1. Level ordering: target and stop sit on opposite sides of the price
//! 2. Reward/risk identity: ratio equals round2(profit / risk)
//! 3. Series anchor: last point is exactly the current price
//! 4. Matcher allow-list: no unqualified or off-exchange candidate survives
//! 5. History bound: never more than five entries, newest first
//! 6. USD formatting: table contents never change USD output

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use std::collections::BTreeMap;

use signaldesk_core::currency::{format_amount, CurrencyTable};
use signaldesk_core::data::SearchQuote;
use signaldesk_core::domain::{Direction, PriceSignal, SeriesOrigin, TradePlan};
use signaldesk_core::plan::{compute_levels, compute_plan, round2, PlanParams};
use signaldesk_core::test_helpers::FixedSequence;
use signaldesk_core::series::{generate_series, ChartSeries};
use signaldesk_core::{HistoryLog, SymbolMatcher, HISTORY_CAPACITY};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..10_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Buy), Just(Direction::Sell)]
}

fn arb_params() -> impl Strategy<Value = PlanParams> {
    (0.01..0.5_f64, 0.005..0.5_f64).prop_map(|(t, s)| PlanParams::new(t, s))
}

fn arb_draws() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..1.0_f64, 1..64)
}

fn arb_quote() -> impl Strategy<Value = SearchQuote> {
    (
        prop::option::of("[A-Z]{1,6}(\\.NS|\\.BO)?"),
        prop::option::of(prop_oneof![
            Just("NSE".to_string()),
            Just("nse".to_string()),
            Just("BSE".to_string()),
            Just("NASDAQ".to_string()),
            Just("".to_string()),
        ]),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(symbol, exch_disp, is_yahoo_finance)| SearchQuote {
            symbol,
            shortname: Some("Name".into()),
            longname: None,
            name: None,
            exch_disp,
            is_yahoo_finance,
        })
}

fn plan_for(symbol: String) -> TradePlan {
    let signal = PriceSignal::new(symbol, 100.0, Direction::Buy);
    let chart = ChartSeries {
        points: vec![signaldesk_core::PricePoint::new(0, "Today", 100.0)],
        origin: SeriesOrigin::Synthetic,
    };
    compute_plan(
        &signal,
        &PlanParams::default(),
        chart,
        Utc::now(),
        &mut FixedSequence::constant(0.5),
    )
    .unwrap()
}

// ── 1 & 2. Levels ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn levels_bracket_the_price(
        price in arb_price(),
        direction in arb_direction(),
        params in arb_params(),
        draw in 0.0..1.0_f64,
    ) {
        let signal = PriceSignal::new("SYM", price, direction);
        let levels = compute_levels(&signal, &params, &mut FixedSequence::constant(draw)).unwrap();
        match direction {
            Direction::Buy => {
                prop_assert!(levels.stop_loss < price);
                prop_assert!(price < levels.target_price);
            }
            Direction::Sell => {
                prop_assert!(levels.target_price < price);
                prop_assert!(price < levels.stop_loss);
            }
        }
    }

    #[test]
    fn reward_risk_is_rounded_ratio(
        price in arb_price(),
        direction in arb_direction(),
        params in arb_params(),
    ) {
        let signal = PriceSignal::new("SYM", price, direction);
        let levels = compute_levels(&signal, &params, &mut FixedSequence::constant(0.5)).unwrap();
        prop_assert!(levels.risk_pct > 0.0);
        prop_assert_eq!(levels.risk_reward_ratio, round2(levels.profit_pct / levels.risk_pct));
    }

    #[test]
    fn synthesized_confidence_stays_in_band(draw in 0.0..1.0_f64) {
        let signal = PriceSignal::new("SYM", 50.0, Direction::Sell);
        let params = PlanParams::default();
        let levels = compute_levels(&signal, &params, &mut FixedSequence::constant(draw)).unwrap();
        prop_assert!(levels.confidence_pct >= params.confidence_floor);
        prop_assert!(levels.confidence_pct <= params.confidence_floor + params.confidence_spread);
    }
}

// ── 3. Series ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn series_is_anchored_and_indexed(
        price in 0.01..100_000.0_f64,
        num_days in 1usize..120,
        draws in arb_draws(),
    ) {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let points = generate_series(price, num_days, today, &mut FixedSequence::new(draws)).unwrap();

        prop_assert_eq!(points.len(), num_days + 1);
        prop_assert_eq!(points.last().unwrap().price, price);
        for pair in points.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        prop_assert!(points.iter().all(|p| p.price > 0.0));
    }
}

// ── 4. Matcher ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn matcher_never_leaks_unqualified(raw in prop::collection::vec(arb_quote(), 0..40)) {
        let matcher = SymbolMatcher::default();
        for c in matcher.filter_candidates("query", &raw) {
            prop_assert!(c.is_qualified_source);
            prop_assert!(c.exchange.to_lowercase().contains("nse"));
        }
    }

    #[test]
    fn matcher_preserves_source_order(raw in prop::collection::vec(arb_quote(), 0..40)) {
        let matcher = SymbolMatcher::default();
        let kept = matcher.filter_candidates("query", &raw);
        let mut cursor = 0;
        for c in &kept {
            let found = raw[cursor..]
                .iter()
                .position(|q| q.symbol.as_deref().map(str::trim) == Some(c.symbol.as_str()));
            prop_assert!(found.is_some());
            cursor += found.unwrap() + 1;
        }
    }
}

// ── 5. History ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn history_is_bounded_and_newest_first(n in 0usize..20) {
        let mut log = HistoryLog::new();
        for i in 0..n {
            log = log.append(plan_for(format!("P{i}")));
            prop_assert!(log.len() <= HISTORY_CAPACITY);
            prop_assert_eq!(&log.latest().unwrap().symbol, &format!("P{i}"));
        }
        prop_assert_eq!(log.len(), n.min(HISTORY_CAPACITY));
    }
}

// ── 6. Currency ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn usd_ignores_table(
        amount in 0.0..1_000_000.0_f64,
        usd_rate in 0.1..10.0_f64,
        eur_rate in 0.1..10.0_f64,
    ) {
        let mut rates = BTreeMap::new();
        rates.insert("USD".to_string(), usd_rate);
        rates.insert("EUR".to_string(), eur_rate);
        let table = CurrencyTable::from_rates(rates);

        let identity = format_amount(Some(amount), "USD", &CurrencyTable::identity());
        let with_table = format_amount(Some(amount), "USD", &table);
        prop_assert_eq!(&identity, &with_table);
        prop_assert!(with_table.starts_with('$'));

        let plain: f64 = with_table[1..].replace(',', "").parse().unwrap();
        prop_assert!((plain - amount).abs() <= 0.005 + 1e-9);
    }
}
