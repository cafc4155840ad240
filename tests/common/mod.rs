//! Shared fixtures: a deterministic pipeline and a router built around it

#![allow(dead_code)]

use anyhow::Result;
use axum::Router;
use salary_predictor::config::BatchConfig;
use salary_predictor::metrics::PredictorMetrics;
use salary_predictor::models::pipeline::{check_feature_names, check_non_empty, ColumnData, ColumnKind};
use salary_predictor::types::record::FIELD_NAMES;
use salary_predictor::web::{self, AppState};
use salary_predictor::{Pipeline, Predictor, Table};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Scores rows with a fixed rule so results are reproducible:
/// label 1 when capital-gain exceeds 5000 or educational-num is at least 13
/// with 45+ hours per week.
pub struct RulePipeline {
    features: Vec<String>,
}

impl RulePipeline {
    pub fn new() -> Self {
        Self {
            features: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ints(table: &Table, column: &str) -> Result<Vec<i64>> {
        let cells = table.column(column).unwrap_or_default();
        match ColumnData::encode(ColumnKind::Int64, column, &cells)? {
            ColumnData::Int64(v) => Ok(v),
            _ => unreachable!(),
        }
    }
}

impl Pipeline for RulePipeline {
    fn name(&self) -> &str {
        "rule"
    }

    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, table: &Table) -> Result<Vec<i64>> {
        check_feature_names(&self.features, table.columns())?;
        check_non_empty(table)?;

        let gain = Self::ints(table, "capital-gain")?;
        let edu = Self::ints(table, "educational-num")?;
        let hours = Self::ints(table, "hours-per-week")?;

        Ok((0..table.num_rows())
            .map(|i| i64::from(gain[i] > 5000 || (edu[i] >= 13 && hours[i] >= 45)))
            .collect())
    }
}

/// Holds every prediction until `release` is called, then scores with [`RulePipeline`].
/// Gives up after five seconds so a stuck test fails instead of hanging.
pub struct GatedPipeline {
    inner: RulePipeline,
    entered: Arc<AtomicBool>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

#[derive(Clone)]
pub struct Gate {
    entered: Arc<AtomicBool>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    /// True once a prediction is waiting on the gate
    pub fn entered(&self) -> bool {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        let (open, cvar) = &*self.gate;
        *open.lock().unwrap() = true;
        cvar.notify_all();
    }
}

impl GatedPipeline {
    pub fn new() -> (Self, Gate) {
        let entered = Arc::new(AtomicBool::new(false));
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let pipeline = Self {
            inner: RulePipeline::new(),
            entered: entered.clone(),
            gate: gate.clone(),
        };
        (pipeline, Gate { entered, gate })
    }
}

impl Pipeline for GatedPipeline {
    fn name(&self) -> &str {
        "gated"
    }

    fn feature_names(&self) -> &[String] {
        self.inner.feature_names()
    }

    fn predict(&self, table: &Table) -> Result<Vec<i64>> {
        self.entered.store(true, Ordering::SeqCst);
        let (open, cvar) = &*self.gate;
        let guard = open.lock().unwrap();
        let (guard, timeout) = cvar
            .wait_timeout_while(guard, Duration::from_secs(5), |open| !*open)
            .unwrap();
        drop(guard);
        if timeout.timed_out() {
            anyhow::bail!("gate was never released");
        }
        self.inner.predict(table)
    }
}

pub fn gated_app() -> (Router, Gate) {
    let (pipeline, gate) = GatedPipeline::new();
    let predictor = Arc::new(Predictor::new(Box::new(pipeline)));
    let state = AppState::new(predictor, Arc::new(PredictorMetrics::new()), BatchConfig::default());
    (web::router(state), gate)
}

pub fn predictor() -> Arc<Predictor> {
    Arc::new(Predictor::new(Box::new(RulePipeline::new())))
}

pub fn app() -> (Router, Arc<PredictorMetrics>) {
    let metrics = Arc::new(PredictorMetrics::new());
    let state = AppState::new(predictor(), metrics.clone(), BatchConfig::default());
    (web::router(state), metrics)
}

pub const BATCH_CSV: &str = "\
age,workclass,fnlwgt,educational-num,marital-status,occupation,relationship,race,gender,capital-gain,capital-loss,hours-per-week,native-country
25,Private,226802,7,Never-married,Machine-op-inspct,Own-child,Black,Male,0,0,40,United-States
38,Private,89814,9,Married-civ-spouse,Farming-fishing,Husband,White,Male,0,0,50,United-States
28,Local-gov,336951,12,Married-civ-spouse,Protective-serv,Husband,White,Male,0,0,40,United-States
44,Private,160323,10,Married-civ-spouse,Machine-op-inspct,Husband,Black,Male,7688,0,40,United-States
18,Without-pay,103497,10,Never-married,Other-service,Own-child,White,Female,0,0,30,United-States
34,Private,198693,6,Never-married,Other-service,Not-in-family,White,Male,0,0,30,United-States
63,Self-emp-not-inc,104626,15,Married-civ-spouse,Prof-specialty,Husband,White,Male,3103,0,50,United-States
";

/// Multipart body with one `file` field holding `csv`.
pub fn multipart_body(boundary: &str, csv: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"batch.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = csv
    )
}
