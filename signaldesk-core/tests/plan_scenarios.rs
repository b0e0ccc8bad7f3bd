//! End-to-end scenarios for the plan engine.
//!
//! Tests:
//! 1. BUY at 150 with defaults gives the reference LONG plan
//! 2. SELL at 200 with a 5%/2% band gives the mirrored SHORT plan
//! 3. A zero price or an unknown signal never produces a plan
//! 4. A backend JSON payload flows through to a plan with a synthetic chart
//! 5. A mock signal flows through to a plan and into a five-entry history
//! 6. The summary renders levels in the display currency

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use signaldesk_core::currency::{format_amount, CurrencyTable};
use signaldesk_core::data::{
    HistoryProvider, MockProvider, PredictionResponse, SignalProvider,
};
use signaldesk_core::domain::{ConfidenceSource, Direction, PriceSignal, SeriesOrigin};
use signaldesk_core::plan::{compute_plan, PlanError, PlanParams};
use signaldesk_core::test_helpers::FixedSequence;
use signaldesk_core::series::{generate_series, series_from_records, ChartSeries};
use signaldesk_core::{HistoryLog, TradePlan};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 17).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Build a plan with a synthetic 30-day chart and a fixed draw of 0.5.
fn synthetic_plan(signal: &PriceSignal, params: &PlanParams) -> Result<TradePlan, PlanError> {
    let mut rng = FixedSequence::constant(0.5);
    let points = generate_series(signal.current_price, 30, today(), &mut rng)
        .map_err(|_| PlanError::InvalidPrice(signal.current_price))?;
    let chart = ChartSeries {
        points,
        origin: SeriesOrigin::Synthetic,
    };
    let at = Utc.with_ymd_and_hms(2024, 10, 17, 9, 30, 0).unwrap();
    compute_plan(signal, params, chart, at, &mut rng)
}

// ──────────────────────────────────────────────
// 1 & 2. Reference plans
// ──────────────────────────────────────────────

#[test]
fn aapl_buy_produces_long_plan() {
    let signal = PriceSignal::new("AAPL", 150.0, Direction::Buy);
    let plan = synthetic_plan(&signal, &PlanParams::default()).unwrap();

    assert_eq!(plan.position_label(), "LONG");
    assert_close(plan.target_price, 165.0);
    assert_close(plan.stop_loss, 144.0);
    assert_eq!(plan.profit_pct, 10.0);
    assert_eq!(plan.risk_pct, 4.0);
    assert_eq!(plan.risk_reward_ratio, 2.5);
    assert_eq!(plan.confidence_pct, 90.0);
    assert_eq!(plan.confidence_source, ConfidenceSource::Synthesized);
    assert_eq!(plan.series.len(), 31);
    assert_eq!(plan.series.last().unwrap().price, 150.0);
}

#[test]
fn tsla_sell_produces_short_plan() {
    let signal = PriceSignal::new("TSLA", 200.0, Direction::Sell);
    let plan = synthetic_plan(&signal, &PlanParams::new(0.05, 0.02)).unwrap();

    assert_eq!(plan.position_label(), "SHORT");
    assert_close(plan.target_price, 190.0);
    assert_close(plan.stop_loss, 204.0);
    assert_eq!(plan.profit_pct, 5.0);
    assert_eq!(plan.risk_pct, 2.0);
    assert_eq!(plan.reward_risk_label(), "1:2.50");
}

// ──────────────────────────────────────────────
// 3. Rejections
// ──────────────────────────────────────────────

#[test]
fn zero_price_yields_no_plan() {
    let signal = PriceSignal::new("AAPL", 0.0, Direction::Buy);
    let chart = ChartSeries {
        points: Vec::new(),
        origin: SeriesOrigin::Synthetic,
    };
    let result = compute_plan(
        &signal,
        &PlanParams::default(),
        chart,
        Utc::now(),
        &mut FixedSequence::constant(0.5),
    );
    assert_eq!(result.unwrap_err(), PlanError::InvalidPrice(0.0));
}

#[test]
fn hold_signal_is_rejected_before_planning() {
    let body = serde_json::json!({
        "symbol": "INFY.NS",
        "current_price": 1500.0,
        "signal": "HOLD",
    });
    let response: PredictionResponse = serde_json::from_value(body).unwrap();
    let quote = response.into_quote("INFY.NS").unwrap();
    let err = PriceSignal::try_from(quote).unwrap_err();
    assert!(matches!(err, PlanError::UnknownSignal(s) if s == "HOLD"));
}

// ──────────────────────────────────────────────
// 4. Backend payload → plan
// ──────────────────────────────────────────────

#[test]
fn backend_payload_flows_into_plan() {
    let body = serde_json::json!({
        "symbol": "reliance.ns",
        "current_price": 2950.5,
        "signal": "sell",
        "confidence": 0.73,
        "details": { "rsi": 71.2, "volatility": 0.021, "ma_50": 2890.0 }
    });
    let response: PredictionResponse = serde_json::from_value(body).unwrap();
    let signal = PriceSignal::try_from(response.into_quote("RELIANCE.NS").unwrap()).unwrap();
    let plan = synthetic_plan(&signal, &PlanParams::default()).unwrap();

    assert_eq!(plan.symbol, "RELIANCE.NS");
    assert_eq!(plan.direction, Direction::Sell);
    assert_eq!(plan.confidence_pct, 73.0);
    assert_eq!(plan.confidence_source, ConfidenceSource::Model);
    assert_eq!(plan.details.as_ref().and_then(|d| d.rsi), Some(71.2));
    assert!(plan.target_price < plan.current_price);
    assert!(plan.stop_loss > plan.current_price);
}

#[test]
fn upstream_history_is_anchored_before_planning() {
    let body = serde_json::json!([
        { "time": "10/16 10:00", "price": 148.0 },
        { "time": "10/16 11:00", "price": 149.2 },
    ]);
    let records = signaldesk_core::data::wire::parse_history(body);
    let points = series_from_records(&records, 150.0).unwrap();
    let chart = ChartSeries {
        points,
        origin: SeriesOrigin::Upstream,
    };
    let signal = PriceSignal::new("AAPL", 150.0, Direction::Buy);
    let plan = compute_plan(
        &signal,
        &PlanParams::default(),
        chart,
        Utc::now(),
        &mut FixedSequence::constant(0.5),
    )
    .unwrap();

    assert_eq!(plan.series_origin, SeriesOrigin::Upstream);
    assert_eq!(plan.series.len(), 3);
    assert!(plan.series.last().unwrap().is_anchor());
}

// ──────────────────────────────────────────────
// 5. Mock source → history
// ──────────────────────────────────────────────

#[test]
fn mock_signals_fill_history_newest_first() {
    let provider = MockProvider::new(42);
    let symbols = ["AAPL", "TSLA", "TCS.NS", "INFY.NS", "MSFT", "HDFCBANK.NS"];

    let mut log = HistoryLog::new();
    for symbol in symbols {
        let quote = provider.fetch_signal(symbol).unwrap();
        assert!(provider.fetch_history(symbol).unwrap().is_empty());
        let signal = PriceSignal::try_from(quote).unwrap();
        log = log.append(synthetic_plan(&signal, &PlanParams::default()).unwrap());
    }

    let kept: Vec<_> = log.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(kept, vec!["HDFCBANK.NS", "MSFT", "INFY.NS", "TCS.NS", "TSLA"]);
}

// ──────────────────────────────────────────────
// 6. Summary in display currency
// ──────────────────────────────────────────────

#[test]
fn summary_uses_display_currency() {
    let mut rates = BTreeMap::new();
    rates.insert("EUR".to_string(), 0.5);
    let table = CurrencyTable::from_rates(rates);

    let signal = PriceSignal::new("AAPL", 150.0, Direction::Buy);
    let plan = synthetic_plan(&signal, &PlanParams::default()).unwrap();
    let text = plan.summary(|v| format_amount(Some(v), "EUR", &table));

    assert!(text.starts_with("Recommended LONG position for AAPL"));
    assert!(text.contains("entry at €75.00"));
    assert!(text.contains("€82.50 (10.00% gain)"));
    assert!(text.contains("€72.00 (4.00% risk)"));
    assert!(text.ends_with("Estimated holding period: 1-2 Weeks."));
}
