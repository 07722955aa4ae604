use std::io;
use std::time::Duration;

use async_trait::async_trait;
use canteen::{
    Canteen, CanteenError, ClaimMode, ProtocolConfig, ReadyRule, RunConfig, RunReport,
    supplier::{PlateSource, ReaderSource, ScriptedSource},
};
use common::logger::RunId;

const RUN_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------
// helpers
// -----------------------

/// Deterministic shuffle of `meals` soups, mains and desserts.
fn shuffled_balanced(meals: usize, seed: u64) -> String {
    let mut symbols: Vec<u8> = b"PCD".repeat(meals);
    let mut state = seed | 1;
    for i in (1..symbols.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        symbols.swap(i, j);
    }
    String::from_utf8(symbols).expect("ascii symbols")
}

async fn run_to_completion<S: PlateSource>(cfg: RunConfig, source: S) -> RunReport {
    let canteen = Canteen::new(cfg).expect("valid config");
    tokio::time::timeout(RUN_TIMEOUT, canteen.run(source))
        .await
        .expect("run should not hang")
        .expect("run should succeed")
}

fn assert_clean_finish(cfg: &RunConfig, report: &RunReport) {
    let target = cfg.production_target();

    assert_eq!(report.supplier.map(|s| s.delivered), Some(target));
    assert_eq!(report.counters.plates_produced, target);
    assert_eq!(report.counters.slots_claimed, target);
    assert_eq!(report.counters.plates_transferred, target);
    assert_eq!(report.plates_served(), target);
    assert_eq!(report.kitchen.total_produced, target);
    assert_eq!(report.kitchen.total_claimed, target);

    assert_eq!(report.cooks.len(), cfg.cooks);
    assert_eq!(report.students.len(), cfg.students);
    for s in &report.students {
        assert_eq!(s.rounds, cfg.rounds, "student {} rounds", s.id);
    }

    assert_eq!(report.counters.meals_claimed, cfg.meals_needed());
    assert_eq!(report.counters.meal_signals, cfg.meals_needed());
    assert_eq!(report.counters.seatings, cfg.meals_needed());
    assert_eq!(report.counters.negative_observations, 0);
    assert_eq!(report.counter.meals_served, cfg.meals_needed());

    assert!(report.is_drained(), "kitchen {} counter {}", report.kitchen.tray, report.counter.tray);
    assert_eq!(report.counter.waiting_students, 0);
    assert_eq!(report.counter.outstanding_meals, 0);
    assert!(report.peak_seated <= cfg.tables);
}

/// Yields its script, then never produces another symbol.
struct StallingSource {
    inner: ScriptedSource,
}

#[async_trait]
impl PlateSource for StallingSource {
    async fn next_symbol(&mut self) -> io::Result<Option<u8>> {
        match self.inner.next_symbol().await? {
            Some(b) => Ok(Some(b)),
            None => std::future::pending().await,
        }
    }
}

// -----------------------
// complete runs
// -----------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reference_run_drains_both_regions() {
    let cfg = RunConfig::new(3, 5, 4, 4, 3);
    assert_eq!(cfg.production_target(), 45);

    // Extra symbols past the target are never read.
    let script = format!("{}PPPXX", "PCD".repeat(15));
    let report = run_to_completion(cfg.clone(), ScriptedSource::new(script)).await;

    assert_clean_finish(&cfg, &report);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shuffled_inputs_complete_for_various_shapes() {
    let shapes = [
        RunConfig::new(3, 5, 4, 4, 3),
        RunConfig::new(3, 4, 3, 4, 1),
        RunConfig::new(4, 9, 5, 6, 2),
        RunConfig::new(5, 12, 4, 10, 4),
    ];

    for (i, cfg) in shapes.into_iter().enumerate() {
        for seed in [7u64, 1_234_567, 0xdead_beef] {
            let script = shuffled_balanced(cfg.meals_needed() as usize, seed + i as u64);
            let report = run_to_completion(cfg.clone(), ScriptedSource::new(script)).await;
            assert_clean_finish(&cfg, &report);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn grouped_input_fills_kitchen_without_deadlock() {
    // All soups first, then mains, then desserts: the worst case for a
    // bounded Kitchen under strict slot rotation.
    let cfg = RunConfig::new(3, 4, 3, 4, 2);
    let meals = cfg.meals_needed() as usize;
    let script = format!("{}{}{}", "P".repeat(meals), "C".repeat(meals), "D".repeat(meals));

    let report = run_to_completion(cfg.clone(), ScriptedSource::new(script)).await;
    assert_clean_finish(&cfg, &report);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn held_seats_never_exceed_table_count() {
    let cfg = RunConfig::new(3, 8, 3, 4, 2).with_protocol(ProtocolConfig {
        eat_duration: Duration::from_millis(5),
        ..ProtocolConfig::default()
    });

    let report = run_to_completion(cfg.clone(), ScriptedSource::balanced(cfg.meals_needed())).await;

    assert_clean_finish(&cfg, &report);
    assert!(report.peak_seated >= 1);
    assert!(report.peak_seated <= 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reads_plates_from_file() {
    let cfg = RunConfig::new(3, 4, 3, 4, 2);
    let path = std::env::temp_dir().join(format!(
        "canteen-plates-{}-{}.txt",
        std::process::id(),
        RunId::new()
    ));
    std::fs::write(&path, format!("{}\n", shuffled_balanced(8, 99))).unwrap();

    let source = ReaderSource::open(&path).await.unwrap();
    let report = run_to_completion(cfg.clone(), source).await;
    let _ = std::fs::remove_file(&path);

    assert_clean_finish(&cfg, &report);
}

// -----------------------
// compatibility protocol
// -----------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn literal_unlocked_runs_finish_but_hand_out_phantom_meals() {
    let compat = ProtocolConfig {
        claim_mode: ClaimMode::Unlocked,
        ready_rule: ReadyRule::Literal,
        ..ProtocolConfig::default()
    };
    let shapes = [
        RunConfig::new(3, 5, 4, 4, 3).with_protocol(compat.clone()),
        RunConfig::new(5, 12, 4, 10, 4).with_protocol(compat.clone()),
        RunConfig::new(6, 9, 5, 6, 3).with_protocol(compat.clone()),
    ];

    let mut runs = 0u64;
    let mut anomalies = 0u64;
    for (i, cfg) in shapes.iter().enumerate() {
        for seed in 0..8u64 {
            let script = shuffled_balanced(cfg.meals_needed() as usize, 31 * seed + i as u64 + 1);
            let report = run_to_completion(cfg.clone(), ScriptedSource::new(script)).await;

            assert_eq!(report.plates_served(), cfg.production_target());
            assert_eq!(report.students.len(), cfg.students);
            for s in &report.students {
                assert_eq!(s.rounds, cfg.rounds, "student {} rounds", s.id);
            }
            assert_eq!(report.counters.meals_claimed, cfg.meals_needed());
            assert!(report.counters.meal_signals >= cfg.meals_needed());

            // Units handed out for meals that were never complete, and claims
            // that drove a course below zero.
            anomalies += report.counters.meal_signals - cfg.meals_needed();
            anomalies += report.counters.negative_observations;
            runs += 1;
        }
    }

    assert_eq!(runs, 24);
    assert!(anomalies > 0, "no over-signal or negative claim in {runs} runs");
}

// -----------------------
// failures and cancellation
// -----------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_symbol_fails_run_instead_of_hanging() {
    let canteen = Canteen::new(RunConfig::new(3, 5, 4, 4, 3)).unwrap();
    let kitchen = canteen.kitchen();
    let counter = canteen.counter();

    let res = tokio::time::timeout(RUN_TIMEOUT, canteen.run(ScriptedSource::new("XPCD")))
        .await
        .expect("blocked cooks and students must be released");

    assert!(matches!(
        res,
        Err(CanteenError::InvalidPlate {
            symbol: 'X',
            position: 0
        })
    ));
    let k = kitchen.snapshot();
    assert!(k.tray.is_empty());
    assert_eq!(k.total_produced, 0);
    assert!(counter.snapshot().tray.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_symbol_mid_stream_keeps_earlier_plates() {
    let canteen = Canteen::new(RunConfig::new(3, 5, 4, 4, 3)).unwrap();
    let kitchen = canteen.kitchen();

    let res = tokio::time::timeout(RUN_TIMEOUT, canteen.run(ScriptedSource::new("PCDPC?D")))
        .await
        .expect("run should stop");

    assert!(matches!(
        res,
        Err(CanteenError::InvalidPlate {
            symbol: '?',
            position: 5
        })
    ));
    assert_eq!(kitchen.snapshot().total_produced, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn short_input_fails_run() {
    let canteen = Canteen::new(RunConfig::new(3, 5, 4, 4, 3)).unwrap();

    let res = tokio::time::timeout(RUN_TIMEOUT, canteen.run(ScriptedSource::balanced(10)))
        .await
        .expect("run should stop");

    assert!(matches!(
        res,
        Err(CanteenError::InputExhausted {
            produced: 30,
            target: 45
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interrupt_terminates_stalled_run() {
    let canteen = Canteen::new(RunConfig::new(3, 5, 4, 4, 3)).unwrap();
    let source = StallingSource {
        inner: ScriptedSource::balanced(4),
    };

    let res = tokio::time::timeout(
        RUN_TIMEOUT,
        canteen.run_until(source, tokio::time::sleep(Duration::from_millis(50))),
    )
    .await
    .expect("interrupt must end the run");

    assert!(matches!(res, Err(CanteenError::Interrupted)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn external_shutdown_handle_cancels_run() {
    let canteen = Canteen::new(RunConfig::new(3, 5, 4, 4, 3)).unwrap();
    let shutdown = canteen.shutdown();
    let source = StallingSource {
        inner: ScriptedSource::new("PCD"),
    };

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.trigger(canteen::sync::ShutdownReason::Interrupted);
    });

    let res = tokio::time::timeout(RUN_TIMEOUT, canteen.run(source))
        .await
        .expect("shutdown must end the run");

    assert!(matches!(res, Err(CanteenError::Interrupted)));
}

#[test]
fn invalid_config_is_rejected_before_start() {
    let err = Canteen::new(RunConfig::new(3, 3, 4, 4, 3)).err().expect("M must exceed N and T");
    assert!(err.violations.contains(&"M > N > 2"));
    assert!(err.violations.contains(&"M > T"));
}
