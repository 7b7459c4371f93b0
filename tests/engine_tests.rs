use std::thread;
use std::time::Duration;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use colscript::config::ScriptLimits;
use colscript::data::model::SourceDataSet;
use colscript::preset::ScriptPreset;
use colscript::script::{catalogue, CancelToken, ExecutionOptions, ScriptEngine};
use colscript::ScriptError;

fn temperature_engine() -> ScriptEngine {
    let mut engine = ScriptEngine::new();
    engine.set_source_data(SourceDataSet::from_columns([
        ("Temperature", vec![10.0, 20.0, 30.0, 40.0, 50.0]),
        ("Humidity", vec![80.0, 70.0, 65.0, 50.0, 45.0]),
        ("Motor Speed", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
    ]));
    engine
}

fn unbounded() -> ScriptLimits {
    ScriptLimits {
        max_operations: 0,
        ..ScriptLimits::default()
    }
}

// ---------------------------------------------------------------------------
// Result handling
// ---------------------------------------------------------------------------

#[test]
fn normalize_temperature() {
    let mut engine = temperature_engine();
    let column = engine
        .execute("return math.normalize(data.Temperature);", "T_norm")
        .unwrap();

    assert_eq!(column.name, "T_norm");
    assert_eq!(column.source_script, "return math.normalize(data.Temperature);");
    for (got, want) in column.data.iter().zip([0.0, 0.25, 0.5, 0.75, 1.0]) {
        assert_relative_eq!(*got, want);
    }
}

#[test]
fn scalar_result_is_rejected() {
    let mut engine = temperature_engine();
    let err = engine.execute("return 5;", "bad").unwrap_err();
    assert!(matches!(err, ScriptError::WrongResultType(_)));
    assert!(engine.derived_columns().is_empty());
}

#[test]
fn empty_result_is_rejected() {
    let mut engine = temperature_engine();
    assert_eq!(
        engine.execute("return [];", "bad").unwrap_err(),
        ScriptError::EmptyResult
    );
    assert!(engine.derived_columns().is_empty());
}

#[test]
fn non_numeric_element_is_reported() {
    let mut engine = temperature_engine();
    let err = engine.execute("return [1.0, \"two\"];", "bad").unwrap_err();
    assert_eq!(
        err,
        ScriptError::NonNumericElement {
            index: 1,
            type_name: "string".to_string()
        }
    );
}

#[test]
fn integer_results_widen() {
    let mut engine = temperature_engine();
    let column = engine.execute("return [1, 2, 3];", "ints").unwrap();
    assert_eq!(column.data, vec![1.0, 2.0, 3.0]);
}

// ---------------------------------------------------------------------------
// Naming and the store
// ---------------------------------------------------------------------------

#[test]
fn same_name_replaces_in_place() {
    let mut engine = temperature_engine();
    engine.execute("[1]", "first").unwrap();
    engine.execute("[2]", "second").unwrap();
    engine.execute("[3, 3]", "first").unwrap();

    let columns = engine.derived_columns();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].name, "first");
    assert_eq!(columns[0].data, vec![3.0, 3.0]);
    assert_eq!(columns[0].source_script, "[3, 3]");
    assert_eq!(columns[1].name, "second");
}

#[test]
fn source_name_collides() {
    let mut engine = temperature_engine();
    assert_eq!(
        engine.execute("[1]", "Temperature").unwrap_err(),
        ScriptError::NameCollision("Temperature".to_string())
    );
    assert_eq!(
        engine.execute("[1]", " Temperature ").unwrap_err(),
        ScriptError::NameCollision("Temperature".to_string())
    );
    assert!(engine.derived_columns().is_empty());
}

#[test]
fn blank_name_is_rejected() {
    let mut engine = temperature_engine();
    assert_eq!(
        engine.execute("[1]", " \t").unwrap_err(),
        ScriptError::EmptyOutputName
    );
}

#[test]
fn failed_run_keeps_previous_entry() {
    let mut engine = temperature_engine();
    engine.execute("[1, 2]", "kept").unwrap();
    assert!(engine.execute("return 5;", "kept").is_err());
    assert_eq!(engine.derived_column_data("kept"), vec![1.0, 2.0]);
    assert_eq!(engine.derived_columns()[0].source_script, "[1, 2]");
}

#[test]
fn remove_and_clear() {
    let mut engine = temperature_engine();
    engine.execute("[1]", "a").unwrap();
    engine.execute("[2]", "b").unwrap();

    assert!(engine.remove_derived_column("a"));
    assert!(!engine.remove_derived_column("a"));
    assert!(engine.derived_column_data("a").is_empty());

    engine.clear_derived_columns();
    assert!(engine.derived_columns().is_empty());
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[test]
fn later_scripts_see_earlier_columns() {
    let mut engine = temperature_engine();
    engine
        .execute("math.normalize(data.Temperature)", "T_norm")
        .unwrap();
    let column = engine.execute("math.scale(data.T_norm, 100)", "T_pct").unwrap();
    assert_relative_eq!(column.data[2], 50.0);
}

#[test]
fn rebinding_keeps_derived_columns() {
    let mut engine = temperature_engine();
    engine.execute("math.cumsum(data.Temperature)", "running").unwrap();

    let shadowed = engine.set_source_data(SourceDataSet::from_columns([
        ("Temperature", vec![1.0, 1.0]),
        ("running", vec![7.0]),
    ]));
    assert_eq!(shadowed, vec!["running"]);
    assert_eq!(engine.derived_column_data("running"), vec![10.0, 30.0, 60.0, 100.0, 150.0]);

    // The source column wins the shared name.
    let seen = engine.execute("data.running", "copy").unwrap();
    assert_eq!(seen.data, vec![7.0]);
    let fresh = engine.execute("math.cumsum(data.Temperature)", "fresh").unwrap();
    assert_eq!(fresh.data, vec![1.0, 2.0]);
}

#[test]
fn bracket_access_and_length() {
    let mut engine = temperature_engine();
    let column = engine
        .execute(
            "let n = data[\"Motor Speed\"].length;\nreturn math.ones(n);",
            "unit",
        )
        .unwrap();
    assert_eq!(column.data, vec![1.0; 5]);
}

#[test]
fn unknown_column_is_an_evaluation_error() {
    let mut engine = temperature_engine();
    match engine.execute("math.normalize(data.Pressure)", "p").unwrap_err() {
        ScriptError::Evaluation { message, .. } => assert!(message.contains("Pressure"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bad_argument_names_the_function() {
    let mut engine = temperature_engine();
    match engine.execute("math.normalize([1, \"x\"])", "p").unwrap_err() {
        ScriptError::Evaluation { message, .. } => {
            assert!(message.contains("math.normalize"), "{message}");
            assert!(message.contains("`a[1]`"), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn evaluate_does_not_commit() {
    let mut engine = temperature_engine();
    let preview = engine
        .evaluate("math.offset(data.Temperature, 1)", &ExecutionOptions::new())
        .unwrap();
    assert_eq!(preview[0], 11.0);
    assert!(engine.derived_columns().is_empty());
}

// ---------------------------------------------------------------------------
// Limits and cancellation
// ---------------------------------------------------------------------------

#[test]
fn runaway_loop_hits_the_budget() {
    let mut engine = temperature_engine();
    engine.set_limits(ScriptLimits {
        max_operations: 10_000,
        ..ScriptLimits::default()
    });
    assert_eq!(
        engine.execute("let x = 0; loop { x += 1; }", "spin").unwrap_err(),
        ScriptError::BudgetExceeded(10_000)
    );
    assert!(engine.derived_columns().is_empty());
}

#[test]
fn wall_clock_timeout() {
    let mut engine = temperature_engine();
    let limits = ScriptLimits {
        timeout_ms: Some(50),
        ..unbounded()
    };
    let options = ExecutionOptions::new().with_limits(limits);
    assert_eq!(
        engine
            .execute_with("let x = 0; loop { x += 1; }", "spin", &options)
            .unwrap_err(),
        ScriptError::TimedOut(Duration::from_millis(50))
    );
    // The override applied to that call only.
    assert_eq!(engine.limits(), &ScriptLimits::default());
}

#[test]
fn cancel_from_another_thread() {
    let mut engine = temperature_engine();
    let token = CancelToken::new();
    let remote = token.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.cancel();
    });

    let options = ExecutionOptions::new()
        .with_limits(unbounded())
        .with_cancel(token.clone());
    let err = engine
        .execute_with("let x = 0; loop { x += 1; }", "spin", &options)
        .unwrap_err();
    canceller.join().unwrap();
    assert_eq!(err, ScriptError::Cancelled);

    // A re-armed token lets the next run through.
    token.reset();
    assert!(engine.execute_with("[1]", "ok", &options).is_ok());
}

#[test]
fn generators_respect_the_length_cap() {
    let mut engine = temperature_engine();
    engine.set_limits(ScriptLimits {
        max_generated_len: 100,
        ..ScriptLimits::default()
    });
    match engine.execute("math.zeros(1000)", "big").unwrap_err() {
        ScriptError::Evaluation { message, .. } => assert!(message.contains("math.zeros"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(engine.execute("math.zeros(100)", "ok").is_ok());
    assert!(engine.execute("math.fft_magnitude(math.zeros(65))", "fft").is_err());

    // Built-in array functions hit the same cap.
    let err = engine
        .execute("let a = []; a.pad(1000, 0.0); a", "padded")
        .unwrap_err();
    assert!(matches!(err, ScriptError::Evaluation { .. }), "{err:?}");
    assert!(engine.execute("let a = []; a.pad(50, 0.0); a", "padded").is_ok());
}

#[test]
fn oversized_fft_frequency_is_an_error() {
    let mut engine = temperature_engine();
    let err = engine.execute("math.fft_frequency(1e19, 1)", "f").unwrap_err();
    match err {
        ScriptError::Evaluation { message, .. } => {
            assert!(message.contains("math.fft_frequency"), "{message}")
        }
        other => panic!("unexpected {other:?}"),
    }
    // Still usable afterwards.
    assert_eq!(engine.execute("math.fft_frequency(4, 8)", "f").unwrap().data, vec![0.0, 2.0, 4.0]);
}

// ---------------------------------------------------------------------------
// Library through scripts
// ---------------------------------------------------------------------------

#[test]
fn every_catalogue_example_runs() {
    let mut engine = temperature_engine();
    for f in catalogue::functions() {
        let column = engine
            .execute(f.example, "example")
            .unwrap_or_else(|e| panic!("{}: {e}", f.name));
        assert!(!column.data.is_empty(), "{}", f.name);
    }
}

#[test]
fn optional_arguments_default() {
    let mut engine = temperature_engine();
    let explicit = engine.evaluate("math.derivative(data.Temperature, 1)", &ExecutionOptions::new()).unwrap();
    let implicit = engine.evaluate("math.derivative(data.Temperature)", &ExecutionOptions::new()).unwrap();
    assert_eq!(explicit, implicit);
    assert_eq!(implicit, vec![10.0; 5]);

    let two = engine.evaluate("math.sine_wave(8, 1)", &ExecutionOptions::new()).unwrap();
    let four = engine.evaluate("math.sine_wave(8, 1, 1.0, 0.0)", &ExecutionOptions::new()).unwrap();
    assert_eq!(two, four);
}

#[test]
fn fft_peak_through_a_script() {
    let mut engine = temperature_engine();
    let spectrum = engine
        .execute("math.fft_magnitude(math.sine_wave(1024, 50, 3.0, 0.0))", "spectrum")
        .unwrap()
        .data
        .clone();
    assert_eq!(spectrum.len(), 513);
    let peak = (0..spectrum.len())
        .max_by(|&a, &b| spectrum[a].total_cmp(&spectrum[b]))
        .unwrap();
    assert_eq!(peak, 50);
    assert_abs_diff_eq!(spectrum[50], 3.0, epsilon = 1e-9);
}

#[test]
fn correlation_as_a_constant_column() {
    let mut engine = temperature_engine();
    let script = "let r = math.correlation_coefficient(data.Temperature, data.Humidity);\n\
                  return math.scale(math.ones(data.Temperature.length), r);";
    let column = engine.execute(script, "r").unwrap();
    assert_eq!(column.data.len(), 5);
    assert!(column.data[0] < -0.9);
    assert!(column.data.iter().all(|&v| v == column.data[0]));
}

#[test]
fn print_does_not_disturb_the_result() {
    let mut engine = temperature_engine();
    let column = engine
        .execute("print(\"hello\"); debug(data.Temperature); [1]", "p")
        .unwrap();
    assert_eq!(column.data, vec![1.0]);
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[test]
fn replay_continues_past_failures() {
    let mut engine = temperature_engine();
    let presets = [
        ScriptPreset::new("T_norm", "math.normalize(data.Temperature)"),
        ScriptPreset::new("broken", "return 5;"),
        ScriptPreset::new("T_pct", "math.scale(data.T_norm, 100)"),
        ScriptPreset::new("Temperature", "[1]"),
    ];

    let report = engine.replay(&presets);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.total(), 4);
    assert!(!report.is_complete());
    let failed: Vec<_> = report.failures.iter().map(|f| f.output_name.as_str()).collect();
    assert_eq!(failed, vec!["broken", "Temperature"]);
    assert!(matches!(report.failures[1].error, ScriptError::NameCollision(_)));

    let names: Vec<_> = engine.derived_columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["T_norm", "T_pct"]);
}

#[test]
fn help_lists_the_library() {
    let engine = ScriptEngine::new();
    let help = engine.help_document();
    assert!(help.contains("math.fft_magnitude(a)"));
    assert!(help.contains("data.Temperature"));
}
