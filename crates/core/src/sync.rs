//! Template reconciliation planning.
//!
//! Given the templates currently tagged with a machine type and one
//! machine's current task instances, [`plan`] computes which instances to
//! delete, which templates to instantiate, and which instances to refresh
//! from their template. The planner is pure set logic over task description
//! strings; applying the plan against the store is the api crate's job.
//!
//! Matching is by task **text**, not template id. A template rename with a
//! stale id linkage therefore shows up as a remove + add rather than an
//! in-place update; when the `task_template_id` linkage is intact the
//! instance is refreshed in place instead. Refreshes are planned only when
//! a field actually differs, which makes a second run over an unchanged
//! state a no-op.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// The template fields the planner needs.
#[derive(Debug, Clone)]
pub struct TemplateInput {
    pub id: DbId,
    pub task: String,
    pub priority: String,
    pub frequency: String,
}

/// The task-instance fields the planner needs.
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub id: DbId,
    pub task: String,
    pub priority: String,
    pub frequency: String,
    pub task_template_id: Option<DbId>,
}

/// Per-machine reconciliation plan.
///
/// `remove` and the `update` pairs reference existing instance ids; `add`
/// references template ids. The three sets are disjoint by construction:
/// a removed instance is never also updated, and an added template's text
/// was not present on the machine.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Instance ids whose task text matches no template. This includes
    /// manually created instances with no template linkage.
    pub remove: Vec<DbId>,
    /// Template ids with no instance of the same text on the machine.
    pub add: Vec<DbId>,
    /// `(instance id, template id)` pairs to refresh in place. Only
    /// instances with an intact linkage to a loaded template whose fields
    /// differ qualify; an instance pointing at a template outside the
    /// loaded set (for example after that template moved to another
    /// machine type) is left untouched.
    pub update: Vec<(DbId, DbId)>,
}

impl SyncPlan {
    /// True when applying the plan would not touch the store.
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty() && self.update.is_empty()
    }
}

/// Aggregate counts across all machines of a synchronize run.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub machines_synchronized: i64,
    pub tasks_removed: i64,
    pub tasks_added: i64,
    pub tasks_updated: i64,
}

/// Compute the reconciliation plan for one machine.
pub fn plan(templates: &[TemplateInput], tasks: &[TaskInput]) -> SyncPlan {
    let template_texts: HashSet<&str> = templates.iter().map(|t| t.task.as_str()).collect();
    let current_texts: HashSet<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
    let templates_by_id: HashMap<DbId, &TemplateInput> =
        templates.iter().map(|t| (t.id, t)).collect();

    let remove: Vec<DbId> = tasks
        .iter()
        .filter(|t| !template_texts.contains(t.task.as_str()))
        .map(|t| t.id)
        .collect();

    let add: Vec<DbId> = templates
        .iter()
        .filter(|t| !current_texts.contains(t.task.as_str()))
        .map(|t| t.id)
        .collect();

    let update: Vec<(DbId, DbId)> = tasks
        .iter()
        .filter(|t| template_texts.contains(t.task.as_str()))
        .filter_map(|t| {
            let template_id = t.task_template_id?;
            // A linkage pointing outside the loaded template set means the
            // template now belongs to another machine type; skip it.
            let template = templates_by_id.get(&template_id)?;
            if needs_refresh(template, t) {
                Some((t.id, template.id))
            } else {
                None
            }
        })
        .collect();

    SyncPlan {
        remove,
        add,
        update,
    }
}

/// An instance needs a refresh when any copied field drifted from its
/// template. Skipping clean instances keeps repeat runs idempotent.
fn needs_refresh(template: &TemplateInput, task: &TaskInput) -> bool {
    template.task != task.task
        || template.priority != task.priority
        || template.frequency != task.frequency
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: DbId, task: &str, priority: &str, frequency: &str) -> TemplateInput {
        TemplateInput {
            id,
            task: task.to_string(),
            priority: priority.to_string(),
            frequency: frequency.to_string(),
        }
    }

    fn task(
        id: DbId,
        text: &str,
        priority: &str,
        frequency: &str,
        template_id: Option<DbId>,
    ) -> TaskInput {
        TaskInput {
            id,
            task: text.to_string(),
            priority: priority.to_string(),
            frequency: frequency.to_string(),
            task_template_id: template_id,
        }
    }

    #[test]
    fn test_fresh_machine_gets_all_templates() {
        let templates = vec![
            template(1, "Check oil", "high", "daily"),
            template(2, "Check seals", "medium", "weekly"),
        ];
        let plan = plan(&templates, &[]);

        assert_eq!(plan.remove, Vec::<DbId>::new());
        assert_eq!(plan.add, vec![1, 2]);
        assert!(plan.update.is_empty());
    }

    #[test]
    fn test_converged_machine_is_a_no_op() {
        let templates = vec![
            template(1, "Check oil", "high", "daily"),
            template(2, "Check seals", "medium", "weekly"),
        ];
        let tasks = vec![
            task(10, "Check oil", "high", "daily", Some(1)),
            task(11, "Check seals", "medium", "weekly", Some(2)),
        ];

        assert!(plan(&templates, &tasks).is_empty());
    }

    #[test]
    fn test_priority_drift_plans_a_refresh() {
        let templates = vec![template(1, "Check oil", "high", "daily")];
        let tasks = vec![task(10, "Check oil", "low", "daily", Some(1))];
        let plan = plan(&templates, &tasks);

        assert!(plan.remove.is_empty());
        assert!(plan.add.is_empty());
        assert_eq!(plan.update, vec![(10, 1)]);
    }

    #[test]
    fn test_frequency_drift_plans_a_refresh() {
        let templates = vec![template(1, "Check oil", "high", "weekly")];
        let tasks = vec![task(10, "Check oil", "high", "daily", Some(1))];

        assert_eq!(plan(&templates, &tasks).update, vec![(10, 1)]);
    }

    #[test]
    fn test_orphaned_manual_task_is_removed() {
        let templates = vec![template(1, "Check oil", "high", "daily")];
        let tasks = vec![
            task(10, "Check oil", "high", "daily", Some(1)),
            // Manually created, no linkage, text matches no template.
            task(11, "Polish nameplate", "low", "daily", None),
        ];
        let plan = plan(&templates, &tasks);

        assert_eq!(plan.remove, vec![11]);
        assert!(plan.add.is_empty());
        assert!(plan.update.is_empty());
    }

    #[test]
    fn test_manual_task_with_matching_text_is_kept_unlinked() {
        // A manual task whose text happens to match a template is neither
        // removed nor updated (no linkage), and suppresses the add.
        let templates = vec![template(1, "Check oil", "high", "daily")];
        let tasks = vec![task(10, "Check oil", "low", "yearly", None)];

        assert!(plan(&templates, &tasks).is_empty());
    }

    #[test]
    fn test_stale_template_linkage_left_unchanged() {
        // Instance text matches a template, but its linkage points at a
        // template that is no longer in this machine type's set.
        let templates = vec![template(1, "Check oil", "high", "daily")];
        let tasks = vec![task(10, "Check oil", "low", "daily", Some(99))];

        assert!(plan(&templates, &tasks).is_empty());
    }

    #[test]
    fn test_template_rename_becomes_remove_plus_add() {
        // The template's text changed but the instance still carries the old
        // text: text matching treats this as delete-old / add-new.
        let templates = vec![template(1, "Check oil level", "high", "daily")];
        let tasks = vec![task(10, "Check oil", "high", "daily", Some(1))];
        let plan = plan(&templates, &tasks);

        assert_eq!(plan.remove, vec![10]);
        assert_eq!(plan.add, vec![1]);
        assert!(plan.update.is_empty());
    }

    #[test]
    fn test_empty_inputs_are_a_no_op() {
        assert!(plan(&[], &[]).is_empty());
    }

    #[test]
    fn test_no_templates_purges_everything() {
        let tasks = vec![
            task(10, "Check oil", "high", "daily", Some(1)),
            task(11, "Grease", "low", "weekly", None),
        ];
        let plan = plan(&[], &tasks);

        assert_eq!(plan.remove, vec![10, 11]);
        assert!(plan.add.is_empty());
        assert!(plan.update.is_empty());
    }
}
