//! Sample Batch Generator
//!
//! Writes a CSV of random, in-range employee records for exercising the
//! batch upload.
//!
//! Usage: sample-batch [OUTPUT] [COUNT] [HIGH_EARNER_RATE]

use rand::Rng;
use salary_predictor::types::record::*;
use salary_predictor::Table;
use tracing::info;

/// Record generator for testing
struct RecordGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RecordGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    fn in_bounds(&mut self, bounds: NumericBounds) -> i64 {
        self.rng.gen_range(bounds.min..=bounds.max)
    }

    fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }

    /// A record drawn uniformly over every widget range and vocabulary
    fn generate(&mut self) -> EmployeeRecord {
        EmployeeRecord {
            age: self.in_bounds(AGE),
            workclass: self.pick(Workclass::ALL),
            fnlwgt: self.in_bounds(FNLWGT),
            educational_num: self.in_bounds(EDUCATIONAL_NUM),
            marital_status: self.pick(MaritalStatus::ALL),
            occupation: self.pick(Occupation::ALL),
            relationship: self.pick(Relationship::ALL),
            race: self.pick(Race::ALL),
            gender: self.pick(Gender::ALL),
            capital_gain: if self.rng.gen_bool(0.1) { self.in_bounds(CAPITAL_GAIN) } else { 0 },
            capital_loss: if self.rng.gen_bool(0.05) { self.in_bounds(CAPITAL_LOSS) } else { 0 },
            hours_per_week: self.in_bounds(HOURS_PER_WEEK),
            native_country: self.pick(NativeCountry::ALL),
        }
    }

    /// A record shaped like the typical high earner in census data
    fn generate_high_earner(&mut self) -> EmployeeRecord {
        EmployeeRecord {
            age: self.rng.gen_range(35..=60),
            educational_num: self.rng.gen_range(13..=16),
            marital_status: MaritalStatus::MarriedCivSpouse,
            relationship: self.pick(&[Relationship::Husband, Relationship::Wife]),
            occupation: self.pick(&[Occupation::ExecManagerial, Occupation::ProfSpecialty]),
            capital_gain: self.rng.gen_range(5_000..=99_999),
            hours_per_week: self.rng.gen_range(40..=70),
            ..self.generate()
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_batch=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("-");
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let high_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.25);

    let mut generator = RecordGenerator::new();
    let mut rng = rand::thread_rng();
    let mut high_earners = 0;

    let rows = (0..count)
        .map(|_| {
            if rng.gen_bool(high_rate.clamp(0.0, 1.0)) {
                high_earners += 1;
                generator.generate_high_earner().values()
            } else {
                generator.generate().values()
            }
        })
        .collect();

    let columns = FIELD_NAMES.iter().map(|c| c.to_string()).collect();
    let bytes = Table::from_rows(columns, rows)?.to_csv()?;

    if output == "-" {
        use std::io::Write;
        std::io::stdout().write_all(&bytes)?;
    } else {
        std::fs::write(output, &bytes)?;
    }

    info!(
        output = %output,
        rows = count,
        high_earners = high_earners,
        "Sample batch written"
    );

    Ok(())
}
