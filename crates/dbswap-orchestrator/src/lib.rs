//! Phase sequencing for a full schema-and-data migration run (spec.md §4.I).
//!
//! Ties every other crate in the workspace together into the one sequence
//! an operator actually wants to invoke: validate the source/target pair,
//! optionally snapshot a rollback point, extract the source schema, order
//! tables by dependency, transform and render each one onto the target,
//! copy data in the same order, then validate the result. Grounded on the
//! teacher's `sqlmodel-schema::MigrationRunner::migrate` phase loop, adapted
//! from async `Outcome`-matching to blocking `Result` propagation (spec.md
//! §9).

pub mod copy;
pub mod error;
pub mod options;
pub mod result;
pub mod run_id;

use dbswap_connector::{Connection, RollbackCollaborator, RollbackHandle};
use dbswap_dialect::{Dialect, Platform};
use dbswap_model::PostActionType;
use indexmap::IndexMap;

pub use error::{OrchestratorError, OrchestratorErrorKind, Result};
pub use options::OrchestratorOptions;
pub use result::{MigrationResult, PhaseTiming, RollbackOutcome, TableOutcome};

/// How often, in tables processed, to log a memory-pressure hint during the
/// schema phase — extraction buffers each table's full row set in memory
/// (spec.md §9), so a long run benefits from a periodic reminder in the
/// logs rather than silence until it either finishes or is killed.
const MEMORY_PRESSURE_HINT_INTERVAL: usize = 10;

pub fn migrate_schema<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    options: &OrchestratorOptions,
) -> Result<MigrationResult> {
    migrate_schema_with_cancellation(source_conn, target_conn, source_dialect, target_dialect, rollback_collaborator, options, None)
}

/// Same phase sequence as [`migrate_schema`], plus a cooperative cancellation
/// signal polled at phase boundaries and between data chunks (spec.md §5).
/// `cancellation` returning `true` aborts the run at the next check point; no
/// target transaction is ever in flight at a check point, so there is
/// nothing to roll back mid-transaction — only the run-level rollback point,
/// if one was created, is restored.
pub fn migrate_schema_with_cancellation<C: Connection>(
    source_conn: &mut C,
    target_conn: &mut C,
    source_dialect: Dialect,
    target_dialect: Dialect,
    mut rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    options: &OrchestratorOptions,
    cancellation: Option<&dyn Fn() -> bool>,
) -> Result<MigrationResult> {
    let run_id = run_id::generate();
    tracing::info!(run_id = %run_id, source = %source_dialect, target = %target_dialect, "starting migration run");

    if options.migrate.chunk_size == 0 {
        return Err(OrchestratorError::config("chunk_size must be greater than zero"));
    }

    dbswap_validate::validate_compatibility(source_dialect, target_dialect)?;

    let source_platform = Platform::new(source_dialect);
    let target_platform = Platform::new(target_dialect);

    let mut result = MigrationResult { run_id: run_id.clone(), ..MigrationResult::default() };

    check_cancelled(cancellation, "extract")?;
    let extract_start = std::time::Instant::now();
    let mut source_schema = dbswap_extractor::extract(source_conn, source_dialect)?;
    source_schema.retain(|name, _| options.table_is_selected(name));
    result.phase_timings.push(PhaseTiming { phase: "extract".to_string(), elapsed_ms: extract_start.elapsed().as_millis() });

    if options.validate_before_migration {
        check_cancelled(cancellation, "pre_validate")?;
        let phase_start = std::time::Instant::now();
        let report = dbswap_validate::pre_validate(source_conn, target_conn, source_dialect, target_dialect, &source_schema)?;
        result.pre_validation_warnings = report.warnings;
        result.phase_timings.push(PhaseTiming { phase: "pre_validate".to_string(), elapsed_ms: phase_start.elapsed().as_millis() });
    }

    check_cancelled(cancellation, "rollback_point")?;
    let rollback_handle = if options.create_rollback_point {
        if let Some(collaborator) = &mut rollback_collaborator {
            let handle = collaborator.create(target_conn.driver_name())?;
            tracing::info!(run_id = %run_id, handle = %handle.as_str(), "rollback point created");
            Some(handle)
        } else {
            tracing::warn!(run_id = %run_id, "create_rollback_point requested but no rollback collaborator was supplied");
            None
        }
    } else {
        None
    };

    let sort_result = dbswap_sorter::sort_for_create(&source_schema);
    result.cycle_warning = sort_result.cycle_warning.clone();
    if let Some(warning) = &sort_result.cycle_warning {
        tracing::warn!(run_id = %run_id, message = %warning.message, "proceeding with a best-effort table order");
    }

    let mut target_schema = IndexMap::new();
    let mut outcomes: IndexMap<String, TableOutcome> = IndexMap::new();
    let schema_phase_start = std::time::Instant::now();

    for (processed, name) in sort_result.order.iter().enumerate() {
        if processed > 0 && processed % MEMORY_PRESSURE_HINT_INTERVAL == 0 {
            tracing::debug!(run_id = %run_id, tables_processed = processed, "periodic memory-pressure checkpoint");
        }

        if cancellation.is_some_and(|is_cancelled| is_cancelled()) {
            attempt_rollback(rollback_collaborator, rollback_handle.as_ref(), &run_id);
            return Err(OrchestratorError::cancelled(format!("schema (table '{name}')")));
        }

        let Some(source_table) = source_schema.get(name) else { continue };
        let mut table_outcome = TableOutcome { table: name.clone(), ..TableOutcome::default() };

        let transform_output = match dbswap_transform::transform(source_table, source_dialect, target_dialect, &options.transform) {
            Ok(output) => output,
            Err(err) => {
                if options.stop_on_error {
                    let failure = OrchestratorError::from(err);
                    attempt_rollback(rollback_collaborator, rollback_handle.as_ref(), &run_id);
                    return Err(failure);
                }
                table_outcome.warnings.push(format!("transform failed: {err}"));
                outcomes.insert(name.clone(), table_outcome);
                continue;
            }
        };

        for action in &transform_output.post_actions {
            match action.action_type {
                PostActionType::PgGinIndex => {
                    table_outcome.pg_gin_indexes += 1;
                    table_outcome.indexes_converted += 1;
                }
                PostActionType::SqliteFtsTable => {
                    table_outcome.sqlite_fts_tables += 1;
                    table_outcome.indexes_converted += 1;
                }
                PostActionType::PgGeneratedColumn => table_outcome.pg_generated_columns += 1,
                PostActionType::SqliteFtsPopulate
                | PostActionType::SqliteFtsTriggers
                | PostActionType::PgEnumType
                | PostActionType::Trigger => {}
            }
        }
        table_outcome.warnings.extend(transform_output.warnings.iter().cloned());

        let statements = dbswap_render::render(&transform_output.table, target_platform, &transform_output.post_actions, &options.render);
        if let Err(err) = exec_all(target_conn, name, &statements, target_dialect) {
            if options.stop_on_error {
                attempt_rollback(rollback_collaborator, rollback_handle.as_ref(), &run_id);
                return Err(err);
            }
            table_outcome.warnings.push(err.to_string());
            outcomes.insert(name.clone(), table_outcome);
            continue;
        }

        target_schema.insert(name.clone(), transform_output.table);
        outcomes.insert(name.clone(), table_outcome);
    }
    result.phase_timings.push(PhaseTiming { phase: "schema".to_string(), elapsed_ms: schema_phase_start.elapsed().as_millis() });

    if options.include_data {
        let data_phase_start = std::time::Instant::now();
        for name in &sort_result.order {
            let (Some(source_table), Some(target_table)) = (source_schema.get(name), target_schema.get(name)) else {
                continue;
            };
            if cancellation.is_some_and(|is_cancelled| is_cancelled()) {
                attempt_rollback(rollback_collaborator, rollback_handle.as_ref(), &run_id);
                return Err(OrchestratorError::cancelled(format!("data copy (table '{name}')")));
            }
            let mapping = options.column_mapping_for(name);
            match copy::copy_table(source_conn, target_conn, source_table, target_table, source_platform, target_platform, &mapping, &options.migrate, cancellation) {
                Ok(copy_outcome) => {
                    if let Some(table_outcome) = outcomes.get_mut(name) {
                        table_outcome.rows_migrated = copy_outcome.rows_migrated;
                        table_outcome.row_errors = copy_outcome.row_errors;
                        table_outcome.warnings.extend(copy_outcome.warnings);
                    }
                }
                Err(err) => {
                    if options.stop_on_error {
                        let failure = OrchestratorError::from(err);
                        attempt_rollback(rollback_collaborator, rollback_handle.as_ref(), &run_id);
                        return Err(failure);
                    }
                    if let Some(table_outcome) = outcomes.get_mut(name) {
                        table_outcome.warnings.push(format!("data copy failed: {err}"));
                    }
                }
            }
        }
        result.phase_timings.push(PhaseTiming { phase: "data_copy".to_string(), elapsed_ms: data_phase_start.elapsed().as_millis() });
    }

    if options.validate_after_migration {
        check_cancelled(cancellation, "post_validate")?;
        let phase_start = std::time::Instant::now();
        let sample_probe = options.sample_probe_size.map(|sample_size| dbswap_validate::SampleProbe { sample_size });
        let report = dbswap_validate::post_validate(
            source_conn,
            target_conn,
            &source_schema,
            &target_schema,
            source_platform,
            target_platform,
            sample_probe,
        )?;
        result.post_validation_warnings = report.warnings;
        result.phase_timings.push(PhaseTiming { phase: "post_validate".to_string(), elapsed_ms: phase_start.elapsed().as_millis() });
    }

    result.tables = sort_result.order.iter().filter_map(|name| outcomes.shift_remove(name)).collect();

    tracing::info!(
        run_id = %run_id,
        tables = result.tables.len(),
        rows_migrated = result.total_rows_migrated(),
        "migration run complete"
    );

    Ok(result)
}

/// Executes every rendered DDL string against the target. A post-action's
/// SQL can itself bundle multiple statements (the SQLite full-text sync
/// triggers render as three concatenated `CREATE TRIGGER ... END;` blocks —
/// spec.md §4.E.7/§4.I require splitting on those boundaries before
/// execution), so each string is run back through the splitter rather than
/// assumed to be exactly one statement.
fn exec_all<C: Connection>(conn: &mut C, table: &str, statements: &[String], target_dialect: Dialect) -> Result<()> {
    for statement in statements {
        let outcome = dbswap_splitter::split(statement, target_dialect, &dbswap_splitter::SplitOptions::default())
            .map_err(|e| OrchestratorError::ddl_exec(table, e.to_string()))?;
        let parts: Vec<&str> = if outcome.statements.is_empty() {
            vec![statement.as_str()]
        } else {
            outcome.statements.iter().map(|s| s.sql.as_str()).collect()
        };
        for part in parts {
            conn.exec(part).map_err(|e| OrchestratorError::ddl_exec(table, e.to_string()))?;
        }
    }
    Ok(())
}

fn check_cancelled(cancellation: Option<&dyn Fn() -> bool>, phase: &str) -> Result<()> {
    if cancellation.is_some_and(|is_cancelled| is_cancelled()) {
        return Err(OrchestratorError::cancelled(phase));
    }
    Ok(())
}

fn attempt_rollback(
    rollback_collaborator: Option<&mut dyn RollbackCollaborator>,
    handle: Option<&RollbackHandle>,
    run_id: &str,
) {
    let (Some(collaborator), Some(handle)) = (rollback_collaborator, handle) else {
        return;
    };
    match collaborator.restore(handle) {
        Ok(()) => tracing::warn!(run_id, handle = %handle.as_str(), "migration aborted; rollback point restored"),
        Err(e) => tracing::error!(run_id, handle = %handle.as_str(), error = %e, "migration aborted; rollback restore also failed"),
    }
}
