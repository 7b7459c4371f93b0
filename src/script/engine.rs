use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use rhai::{Dynamic, Engine, EvalAltResult, ParseError, Position, Scope};

use super::api::{self, GeneratorCap, MathNamespace};
use super::budget::{ExecutionOptions, RunGuard, CANCELLED, CHECK_INTERVAL};
use super::catalogue;
use super::convert::{environment_to_map, result_to_column};
use crate::config::ScriptLimits;
use crate::data::binding::DataBinding;
use crate::data::model::{BoundColumn, DerivedColumn, SourceDataSet};
use crate::data::store::DerivedColumnStore;
use crate::error::{ScriptError, SourcePosition};
use crate::preset::ScriptPreset;

// ---------------------------------------------------------------------------
// ScriptEngine – evaluates scripts and owns the derived-column table
// ---------------------------------------------------------------------------

/// Evaluates column scripts against the current source data and commits
/// successful results to the derived-column store.
///
/// Not `Send`: a host that runs scripts from several threads wraps the
/// engine in a `Mutex` and serializes calls through it.
pub struct ScriptEngine {
    engine: Engine,
    binding: DataBinding,
    store: DerivedColumnStore,
    limits: ScriptLimits,
    generator_cap: GeneratorCap,
    guard: Rc<RefCell<RunGuard>>,
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngine {
    pub fn new() -> Self {
        Self::with_limits(ScriptLimits::default())
    }

    pub fn with_limits(limits: ScriptLimits) -> Self {
        let generator_cap: GeneratorCap = Rc::new(Cell::new(limits.max_generated_len));
        let guard = Rc::new(RefCell::new(RunGuard::default()));

        let mut engine = Engine::new();
        engine.disable_symbol("eval");
        engine.set_fail_on_invalid_map_property(true);
        engine.set_max_map_size(0);
        engine.on_print(|text| log::info!("[script] {text}"));
        engine.on_debug(|text, _, pos| log::debug!("[script] {pos:?}: {text}"));

        let progress = Rc::clone(&guard);
        engine.on_progress(move |ops| {
            if ops % CHECK_INTERVAL != 0 {
                return None;
            }
            progress
                .borrow()
                .interrupt()
                .map(|reason| Dynamic::from(reason.to_string()))
        });

        api::register(&mut engine, &generator_cap);
        apply_limits(&mut engine, &limits);

        Self {
            engine,
            binding: DataBinding::default(),
            store: DerivedColumnStore::new(),
            limits,
            generator_cap,
            guard,
        }
    }

    pub fn limits(&self) -> &ScriptLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: ScriptLimits) {
        self.configure(&limits);
        self.limits = limits;
    }

    // -- binding ------------------------------------------------------------

    /// Replace the source columns. Derived columns are kept.
    ///
    /// Returns the derived columns now hidden behind a source column of the
    /// same name.
    pub fn set_source_data(&mut self, source: SourceDataSet) -> Vec<String> {
        let shadowed = self.binding.bind(source, &self.store);
        for name in &shadowed {
            log::warn!("derived column \"{name}\" is shadowed by a source column");
        }
        log::info!(
            "bound {} source columns ({} rows)",
            self.binding.source().len(),
            self.binding.source().row_count()
        );
        shadowed
    }

    pub fn source_data(&self) -> &SourceDataSet {
        self.binding.source()
    }

    /// Every column a script can see: source columns first, then derived
    /// ones not hidden behind a source column.
    pub fn columns(&self) -> Vec<BoundColumn<'_>> {
        let source = self.binding.source();
        source
            .iter()
            .map(BoundColumn::Source)
            .chain(
                self.store
                    .list()
                    .iter()
                    .filter(|d| !source.contains(&d.name))
                    .map(BoundColumn::Derived),
            )
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().iter().map(|c| c.name().to_string()).collect()
    }

    // -- execution ----------------------------------------------------------

    pub fn execute(&mut self, script: &str, output_name: &str) -> Result<&DerivedColumn, ScriptError> {
        self.execute_with(script, output_name, &ExecutionOptions::default())
    }

    /// Evaluate `script` and upsert its result as `output_name`.
    ///
    /// On any error the store is left untouched.
    pub fn execute_with(
        &mut self,
        script: &str,
        output_name: &str,
        options: &ExecutionOptions,
    ) -> Result<&DerivedColumn, ScriptError> {
        let name = output_name.trim();
        if name.is_empty() {
            return Err(ScriptError::EmptyOutputName);
        }
        if self.binding.is_source_column(name) {
            return Err(ScriptError::NameCollision(name.to_string()));
        }

        let data = match self.run(script, options) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("script for \"{name}\" failed: {e}");
                return Err(e);
            }
        };
        log::info!("derived column \"{name}\" updated ({} samples)", data.len());
        Ok(self.store.upsert(DerivedColumn::new(name, data, script)))
    }

    /// Evaluate without committing anything, e.g. for a preview.
    pub fn evaluate(&mut self, script: &str, options: &ExecutionOptions) -> Result<Vec<f64>, ScriptError> {
        self.run(script, options)
    }

    fn run(&mut self, script: &str, options: &ExecutionOptions) -> Result<Vec<f64>, ScriptError> {
        if options.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Err(ScriptError::Cancelled);
        }
        let limits = match &options.limits {
            Some(overrides) => {
                self.configure(overrides);
                overrides.clone()
            }
            None => self.limits.clone(),
        };
        *self.guard.borrow_mut() = RunGuard {
            deadline: limits.timeout().map(|t| Instant::now() + t),
            cancel: options.cancel.clone(),
        };

        let started = Instant::now();
        let result = self.eval_script(script, &limits);
        log::debug!("script evaluated in {:?}", started.elapsed());

        *self.guard.borrow_mut() = RunGuard::default();
        if options.limits.is_some() {
            let own = self.limits.clone();
            self.configure(&own);
        }
        result_to_column(result?)
    }

    fn eval_script(&self, script: &str, limits: &ScriptLimits) -> Result<Dynamic, ScriptError> {
        let ast = self.engine.compile(script).map_err(parse_error)?;

        let mut scope = Scope::new();
        scope.push("data", environment_to_map(&self.binding.environment(&self.store)));
        scope.push("math", MathNamespace);

        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &ast)
            .map_err(|e| runtime_error(e, limits))
    }

    fn configure(&mut self, limits: &ScriptLimits) {
        apply_limits(&mut self.engine, limits);
        self.generator_cap.set(limits.max_generated_len);
    }

    // -- derived columns ----------------------------------------------------

    pub fn store(&self) -> &DerivedColumnStore {
        &self.store
    }

    pub fn derived_columns(&self) -> &[DerivedColumn] {
        self.store.list()
    }

    /// Data of a derived column; empty when there is none by that name.
    pub fn derived_column_data(&self, name: &str) -> Vec<f64> {
        self.store.get(name).map(<[f64]>::to_vec).unwrap_or_default()
    }

    pub fn remove_derived_column(&mut self, name: &str) -> bool {
        let removed = self.store.remove(name);
        if removed {
            log::info!("removed derived column \"{name}\"");
        }
        removed
    }

    pub fn clear_derived_columns(&mut self) {
        self.store.clear();
    }

    /// Run saved scripts in order. Failures are logged and collected; the
    /// remaining scripts still run.
    pub fn replay(&mut self, presets: &[ScriptPreset]) -> ReplayReport {
        let mut report = ReplayReport::default();
        for preset in presets {
            match self.execute(&preset.script, &preset.output_name) {
                Ok(_) => report.succeeded += 1,
                Err(error) => {
                    log::warn!("replaying \"{}\" failed: {error}", preset.output_name);
                    report.failures.push(ReplayFailure {
                        output_name: preset.output_name.clone(),
                        error,
                    });
                }
            }
        }
        log::info!(
            "replayed {} of {} scripts",
            report.succeeded,
            report.total()
        );
        report
    }

    pub fn help_document(&self) -> String {
        catalogue::help_document()
    }
}

/// Outcome of [`ScriptEngine::replay`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub succeeded: usize,
    pub failures: Vec<ReplayFailure>,
}

impl ReplayReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFailure {
    pub output_name: String,
    pub error: ScriptError,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn apply_limits(engine: &mut Engine, limits: &ScriptLimits) {
    engine.set_max_operations(limits.max_operations);
    engine.set_max_call_levels(limits.max_call_levels);
    engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
    engine.set_max_string_size(limits.max_string_size);
    // 0 would switch the check off.
    engine.set_max_array_size(limits.max_generated_len.max(1));
}

fn source_position(pos: Position) -> SourcePosition {
    SourcePosition {
        line: pos.line(),
        column: pos.position(),
    }
}

fn parse_error(err: ParseError) -> ScriptError {
    ScriptError::evaluation(err.err_type().to_string(), source_position(err.position()))
}

fn runtime_error(err: Box<EvalAltResult>, limits: &ScriptLimits) -> ScriptError {
    let mut err = innermost(err);
    match &*err {
        EvalAltResult::ErrorTooManyOperations(_) => {
            return ScriptError::BudgetExceeded(limits.max_operations)
        }
        EvalAltResult::ErrorTerminated(token, _) => {
            return if token.to_string() == CANCELLED {
                ScriptError::Cancelled
            } else {
                ScriptError::TimedOut(limits.timeout().unwrap_or_default())
            };
        }
        _ => {}
    }
    let pos = err.take_position();
    ScriptError::evaluation(err.to_string(), source_position(pos))
}

/// Errors raised inside script-defined functions arrive wrapped once per
/// call level.
fn innermost(mut err: Box<EvalAltResult>) -> Box<EvalAltResult> {
    loop {
        match *err {
            EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => err = inner,
            other => return Box::new(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScriptEngine {
        let mut engine = ScriptEngine::new();
        engine.set_source_data(SourceDataSet::from_columns([(
            "Temperature",
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
        )]));
        engine
    }

    #[test]
    fn final_expression_is_the_result() {
        let mut e = engine();
        let col = e.execute("math.scale(data.Temperature, 2)", "double").unwrap();
        assert_eq!(col.data, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn output_name_is_trimmed() {
        let mut e = engine();
        e.execute("[1]", "  padded ").unwrap();
        assert_eq!(e.derived_columns()[0].name, "padded");
        assert_eq!(
            e.execute("[1]", "   ").unwrap_err(),
            ScriptError::EmptyOutputName
        );
    }

    #[test]
    fn syntax_errors_carry_a_position() {
        let mut e = engine();
        match e.execute("let x = ;\nreturn x;", "bad").unwrap_err() {
            ScriptError::Evaluation { position, .. } => assert_eq!(position.line, Some(1)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(e.store().is_empty());
    }

    #[test]
    fn errors_in_script_functions_are_unwrapped() {
        let mut e = engine();
        let script = "fn boom(m, a) { m.add(a, [\"x\"]) }\nboom(math, data.Temperature)";
        match e.execute(script, "bad").unwrap_err() {
            ScriptError::Evaluation { message, .. } => {
                assert!(message.contains("math.add"), "{message}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn eval_is_not_available() {
        let mut e = engine();
        assert!(matches!(
            e.execute("eval(\"[1]\")", "x"),
            Err(ScriptError::Evaluation { .. })
        ));
    }

    #[test]
    fn column_names_list_source_then_derived() {
        let mut e = engine();
        e.execute("[1, 2]", "extra").unwrap();
        assert_eq!(e.column_names(), vec!["Temperature", "extra"]);
    }
}
