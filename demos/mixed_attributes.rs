//! Mixed Attribute Tracking
//!
//! This example tracks an object holding scalars, a numeric array, a dict,
//! a list, a timestamp and a function reference, mirroring the log to a
//! JSON file.
//!
//! Key concepts:
//! - Initializer writes are folded into a single initial entry
//! - Containers are logged literally only when enabled
//! - The buffer keeps only the most recent entries
//! - The log file is rewritten after every change
//!
//! Run with: RUST_LOG=statesight=debug cargo run --example mixed_attributes

use chrono::Local;
use indexmap::IndexMap;
use statesight::builder::TrackerBuilder;
use statesight::core::{DynamicObject, NumericArray, Value};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn say_hello() -> String {
    println!("Hello");
    "Hello".to_string()
}

fn dict(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statesight=info")),
        )
        .with_target(false)
        .init();

    println!("=== Mixed Attribute Tracking ===\n");

    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("log.json");

    let mut obj = TrackerBuilder::new()
        .buffer_size(5)
        .log_file(&log_path)
        .log_lists(true)
        .log_dicts(true)
        .log_numpy_arrays(true)
        .construct(DynamicObject::new("MyClass"), |t| {
            t.set_attribute("x", 10)?;
            t.set_attribute("y", "Hello")?;
            t.set_attribute("array", NumericArray::from_vec(vec![1.0, 2.0, 3.0]))?;
            t.set_attribute("dict_example", dict(&[("key", "value")]))?;
            t.set_attribute("list_example", vec![1, 2, 3])?;
            t.set_attribute("some_thing", Local::now())?;
            Ok(())
        })?;

    obj.set_attribute("x", 20)?;
    obj.set_attribute("y", "World")?;
    obj.set_attribute("array", NumericArray::from_vec(vec![4.0, 5.0, 6.0]))?;
    obj.set_attribute("dict_example", dict(&[("new_key", "new_value")]))?;
    obj.set_attribute("list_example", vec![4, 5, 6])?;
    obj.set_attribute("some_thing", Local::now())?;
    obj.set_attribute("some_thing", say_hello())?;
    obj.set_attribute("some_thing", Value::function("say_hello"))?;

    println!("Current state:\n{}\n", obj.to_json()?);

    // Buffer of 5: the initial entry and the first three writes were evicted
    println!("Retained entries: {}", obj.get_log().len());
    let encoder = obj.config().encoder();
    for entry in obj.get_log() {
        println!(
            "  {} {:<14} {}",
            entry.timestamp_iso(),
            entry.changed_attribute,
            encoder.encode_change(&entry.change)
        );
    }

    println!("\nLog file {}:", log_path.display());
    println!("{}", std::fs::read_to_string(&log_path)?);

    Ok(())
}
