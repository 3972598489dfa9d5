use std::sync::Arc;
use std::time::Duration;

use policy_ripple::reference::{self, CONFIDENCE, TAX_REVENUE, TRAFFIC};
use policy_ripple::{
    MemorySink, ResultSink, RuntimeConfig, Scenario, ScenarioJob, ScenarioRuntime,
};

fn scenarios() -> Vec<Scenario> {
    (1..=12)
        .map(|step| {
            let pct = f64::from(step);
            Scenario::named(format!("sweep {step}"))
                .with_shock(TAX_REVENUE, -pct)
                .with_shock(CONFIDENCE, pct * 2.0)
                .with_shock(TRAFFIC, pct / 2.0)
        })
        .collect()
}

#[test]
fn concurrent_runs_match_serial_runs() {
    let engine = Arc::new(reference::engine().unwrap());
    let runtime = ScenarioRuntime::new(
        Arc::clone(&engine),
        RuntimeConfig {
            workers: 4,
            queue_capacity: 64,
        },
    )
    .unwrap();

    let jobs: Vec<ScenarioJob> = scenarios()
        .into_iter()
        .map(|s| ScenarioJob::new(s, 2026))
        .collect();
    let pooled = runtime.run_batch(jobs.clone());
    assert_eq!(pooled.len(), jobs.len());

    for (job, pooled) in jobs.iter().zip(pooled) {
        let pooled = pooled.unwrap();
        let serial = engine.run(&job.scenario, job.start_year, job.horizon).unwrap();
        assert_eq!(pooled.scenario_name(), job.scenario.name.as_deref());
        assert_eq!(pooled.fingerprint(), serial.fingerprint());
    }
}

#[test]
fn invalid_jobs_fail_without_poisoning_the_pool() {
    let runtime = ScenarioRuntime::new(
        Arc::new(reference::engine().unwrap()),
        RuntimeConfig::default(),
    )
    .unwrap();

    let results = runtime.run_batch(vec![
        ScenarioJob::new(reference::payroll_tax_scenario(), 2026),
        ScenarioJob::new(Scenario::new().with_shock(999, 1.0), 2026),
        ScenarioJob::new(reference::payroll_tax_scenario(), 2026).with_horizon(0),
        ScenarioJob::new(reference::payroll_tax_scenario(), 2026).with_horizon(3),
    ]);

    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_configuration());
    assert!(results[2].as_ref().unwrap_err().is_invalid_argument());
    assert_eq!(results[3].as_ref().unwrap().final_year(), 2029);
}

#[test]
fn pooled_forecasts_flow_into_a_sink() {
    let runtime = ScenarioRuntime::new(
        Arc::new(reference::engine().unwrap()),
        RuntimeConfig {
            workers: 2,
            queue_capacity: 16,
        },
    )
    .unwrap();
    let sink = MemorySink::new();

    let handles: Vec<_> = scenarios()
        .into_iter()
        .take(5)
        .map(|s| runtime.submit(ScenarioJob::new(s, 2026)).unwrap())
        .collect();
    for handle in handles {
        let forecast = handle.join_timeout(Duration::from_secs(10)).unwrap();
        sink.accept(&forecast).unwrap();
    }

    assert_eq!(sink.len().unwrap(), 5);
    let drained = sink.drain().unwrap();
    assert!(drained.iter().all(|f| f.final_year() == 2031));
    assert!(sink.is_empty().unwrap());
}

#[test]
fn shutdown_rejects_new_work() {
    let mut runtime = ScenarioRuntime::new(
        Arc::new(reference::engine().unwrap()),
        RuntimeConfig::default(),
    )
    .unwrap();
    runtime.shutdown();

    let err = runtime
        .submit(ScenarioJob::new(reference::payroll_tax_scenario(), 2026))
        .err()
        .unwrap();
    assert!(err.is_execution());
    assert!(!err.is_retryable());
}
