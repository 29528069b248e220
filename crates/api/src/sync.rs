//! Template reconciliation orchestrator.
//!
//! Drives the pure planner in `upkeep_core::sync` against the store: loads
//! the template set and machines for a machine type, then per machine
//! deletes stale instances, instantiates missing templates, and refreshes
//! linked instances.
//!
//! Machines are processed sequentially with no cross-machine transaction.
//! A store failure aborts the run; machines already reconciled stay
//! reconciled, and the partial counts are discarded with the error. Two
//! concurrent runs for the same type can race, but deletes are keyed by id
//! so the losing delete is a no-op.

use std::collections::HashMap;

use sqlx::PgPool;
use upkeep_core::sync::{plan, SyncSummary, TaskInput, TemplateInput};
use upkeep_core::types::DbId;
use upkeep_db::models::task_template::TaskTemplate;
use upkeep_db::repositories::{MachineRepo, MaintenanceTaskRepo, TaskTemplateRepo};

/// Reconcile every machine of `machine_type` against the type's current
/// template set, returning aggregate counts.
///
/// An unknown machine type (no machines or no templates) is not an error:
/// with no templates every machine of the type is purged down to zero
/// instances, and with no machines nothing happens at all.
pub async fn synchronize_machine_type(
    pool: &PgPool,
    machine_type: &str,
) -> Result<SyncSummary, sqlx::Error> {
    let templates = TaskTemplateRepo::list_by_machine_type(pool, machine_type).await?;
    let machines = MachineRepo::list_by_type(pool, machine_type).await?;

    tracing::info!(
        machine_type,
        machines = machines.len(),
        templates = templates.len(),
        "Synchronizing machine type"
    );

    let template_inputs: Vec<TemplateInput> = templates
        .iter()
        .map(|t| TemplateInput {
            id: t.id,
            task: t.task.clone(),
            priority: t.priority.clone(),
            frequency: t.frequency.clone(),
        })
        .collect();
    let templates_by_id: HashMap<DbId, &TaskTemplate> =
        templates.iter().map(|t| (t.id, t)).collect();

    let mut summary = SyncSummary {
        machines_synchronized: machines.len() as i64,
        ..Default::default()
    };

    for machine in &machines {
        let tasks = MaintenanceTaskRepo::list_by_machine(pool, machine.id).await?;
        let task_inputs: Vec<TaskInput> = tasks
            .iter()
            .map(|t| TaskInput {
                id: t.id,
                task: t.task.clone(),
                priority: t.priority.clone(),
                frequency: t.frequency.clone(),
                task_template_id: t.task_template_id,
            })
            .collect();

        let plan = plan(&template_inputs, &task_inputs);
        if plan.is_empty() {
            continue;
        }

        summary.tasks_removed +=
            MaintenanceTaskRepo::delete_by_ids(pool, &plan.remove).await? as i64;

        for template_id in &plan.add {
            if let Some(template) = templates_by_id.get(template_id) {
                MaintenanceTaskRepo::create_from_template(pool, machine.id, template).await?;
                summary.tasks_added += 1;
            }
        }

        for (task_id, template_id) in &plan.update {
            if let Some(template) = templates_by_id.get(template_id) {
                if MaintenanceTaskRepo::refresh_from_template(pool, *task_id, template).await? {
                    summary.tasks_updated += 1;
                }
            }
        }

        tracing::debug!(
            machine = %machine.name,
            removed = plan.remove.len(),
            added = plan.add.len(),
            updated = plan.update.len(),
            "Reconciled machine tasks"
        );
    }

    Ok(summary)
}

/// Clear a template's instances off every machine of the type it is leaving.
///
/// Called before reconciling the new type when a template edit changes its
/// `machine_type`, so the moved template leaves no orphaned instances
/// behind. Returns the number of instances removed.
pub async fn detach_template_from_machine_type(
    pool: &PgPool,
    template_id: DbId,
    old_machine_type: &str,
) -> Result<u64, sqlx::Error> {
    let removed = MaintenanceTaskRepo::delete_by_template_and_machine_type(
        pool,
        template_id,
        old_machine_type,
    )
    .await?;

    if removed > 0 {
        tracing::info!(
            template_id,
            old_machine_type,
            removed,
            "Removed moved template's instances from old machine type"
        );
    }

    Ok(removed)
}
