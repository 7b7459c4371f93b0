use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 2000;
const SAMPLE_PERIOD_MS: i64 = 10;
const START_MS: i64 = 1_700_000_000_000;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// A simulated sensor log.
struct SensorLog {
    timestamp: Vec<i64>,
    temperature: Vec<f64>,
    pressure: Vec<f64>,
    voltage: Vec<f64>,
    humidity: Vec<f64>,
    status: Vec<&'static str>,
}

fn simulate(rng: &mut SimpleRng) -> SensorLog {
    use std::f64::consts::TAU;

    let mut log = SensorLog {
        timestamp: Vec::with_capacity(ROWS),
        temperature: Vec::with_capacity(ROWS),
        pressure: Vec::with_capacity(ROWS),
        voltage: Vec::with_capacity(ROWS),
        humidity: Vec::with_capacity(ROWS),
        status: Vec::with_capacity(ROWS),
    };

    for i in 0..ROWS {
        let t = i as f64 / ROWS as f64;
        let temperature = 25.0 + 5.0 * (TAU * 2.0 * t).sin() + rng.gauss(0.0, 0.3);
        // Voltage ripple at 50 Hz on a 100 Hz sample clock.
        let voltage = 12.0 + 0.5 * (TAU * 50.0 * i as f64 / 100.0).sin() + rng.gauss(0.0, 0.05);

        log.timestamp.push(START_MS + i as i64 * SAMPLE_PERIOD_MS);
        log.temperature.push(temperature);
        log.pressure.push(1013.0 + 0.8 * (temperature - 25.0) + rng.gauss(0.0, 0.5));
        log.voltage.push(voltage);
        log.humidity.push((60.0 - 1.5 * (temperature - 25.0) + rng.gauss(0.0, 1.0)).clamp(0.0, 100.0));
        log.status.push(if voltage > 12.4 { "HIGH" } else { "OK" });
    }
    log
}

fn write_csv(path: &Path, log: &SensorLog) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Timestamp", "Temperature", "Pressure", "Voltage", "Humidity", "Status"])?;
    for i in 0..log.timestamp.len() {
        writer.write_record([
            log.timestamp[i].to_string(),
            format!("{:.3}", log.temperature[i]),
            format!("{:.2}", log.pressure[i]),
            format!("{:.4}", log.voltage[i]),
            format!("{:.1}", log.humidity[i]),
            log.status[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, log: &SensorLog) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Timestamp", DataType::Int64, false),
        Field::new("Temperature", DataType::Float64, false),
        Field::new("Pressure", DataType::Float64, false),
        Field::new("Voltage", DataType::Float64, false),
        Field::new("Humidity", DataType::Float64, false),
        Field::new("Status", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(log.timestamp.clone())),
        Arc::new(Float64Array::from(log.temperature.clone())),
        Arc::new(Float64Array::from(log.pressure.clone())),
        Arc::new(Float64Array::from(log.voltage.clone())),
        Arc::new(Float64Array::from(log.humidity.clone())),
        Arc::new(StringArray::from(log.status.clone())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "sample_data.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let log = simulate(&mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &log)?,
        Some("parquet") | Some("pq") => write_parquet(path, &log)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    println!("Wrote {} rows to {output}", log.timestamp.len());
    Ok(())
}
