//! Integration tests for the repository layer against a real database:
//! entity CRUD, the reconciliation primitives, and cascade behaviour.

use assert_matches::assert_matches;
use sqlx::PgPool;
use upkeep_db::models::machine::CreateMachine;
use upkeep_db::models::maintenance_task::{CompletionChange, CreateMaintenanceTask};
use upkeep_db::models::site::SiteInput;
use upkeep_db::models::task_template::{TaskTemplateInput, TaskTemplateQuery};
use upkeep_db::repositories::{MachineRepo, MaintenanceTaskRepo, SiteRepo, TaskTemplateRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_site(name: &str) -> SiteInput {
    SiteInput {
        name: name.to_string(),
        location: "Testville".to_string(),
    }
}

fn new_machine(site_id: i64, name: &str, machine_type: &str) -> CreateMachine {
    CreateMachine {
        name: name.to_string(),
        site_id,
        desired_daily_hours: 8,
        status: None,
        machine_type: Some(machine_type.to_string()),
        next_maintenance_date: None,
    }
}

fn new_template(task: &str, machine_type: &str) -> TaskTemplateInput {
    TaskTemplateInput {
        task: task.to_string(),
        priority: "high".to_string(),
        frequency: "daily".to_string(),
        machine_type: machine_type.to_string(),
        description: None,
    }
}

// ---------------------------------------------------------------------------
// Sites & machines
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_defaults_and_site_counts(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant A")).await.unwrap();

    let machine = MachineRepo::create(
        &pool,
        &CreateMachine {
            name: "Bare".to_string(),
            site_id: site.id,
            desired_daily_hours: 8,
            status: None,
            machine_type: None,
            next_maintenance_date: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(machine.machine_type, "general");
    assert_eq!(machine.status, "operational");
    assert_eq!(machine.total_hours_run, 0);
    assert!(machine.next_maintenance_date.is_some());

    let sites = SiteRepo::list_with_machine_counts(&pool).await.unwrap();
    let listed = sites.iter().find(|s| s.id == site.id).unwrap();
    assert_eq!(listed.machine_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_distinct_machine_types_skip_blank(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant B")).await.unwrap();

    MachineRepo::create(&pool, &new_machine(site.id, "M1", "Pump"))
        .await
        .unwrap();
    MachineRepo::create(&pool, &new_machine(site.id, "M2", "Pump"))
        .await
        .unwrap();
    MachineRepo::create(&pool, &new_machine(site.id, "M3", "  "))
        .await
        .unwrap();

    let types = MachineRepo::distinct_machine_types(&pool).await.unwrap();
    assert_eq!(types, vec!["Pump".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_hours_accumulate(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant C")).await.unwrap();
    let machine = MachineRepo::create(&pool, &new_machine(site.id, "Clocked", "Pump"))
        .await
        .unwrap();

    MachineRepo::increment_total_hours(&pool, machine.id, 5)
        .await
        .unwrap();
    MachineRepo::increment_total_hours(&pool, machine.id, 3)
        .await
        .unwrap();

    let machine = MachineRepo::find_by_id(&pool, machine.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(machine.total_hours_run, 8);
}

// ---------------------------------------------------------------------------
// Templates & reconciliation primitives
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_from_template_copies_fields_and_links(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant D")).await.unwrap();
    let machine = MachineRepo::create(&pool, &new_machine(site.id, "Pump 1", "Pump"))
        .await
        .unwrap();
    let template = TaskTemplateRepo::create(&pool, &new_template("Check oil", "Pump"))
        .await
        .unwrap();

    let task = MaintenanceTaskRepo::create_from_template(&pool, machine.id, &template)
        .await
        .unwrap();

    assert_eq!(task.task, "Check oil");
    assert_eq!(task.priority, "high");
    assert_eq!(task.frequency, "daily");
    assert_eq!(task.task_template_id, Some(template.id));
    assert!(!task.completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_template_counts_instances(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant E")).await.unwrap();
    let template = TaskTemplateRepo::create(&pool, &new_template("Check oil", "Pump"))
        .await
        .unwrap();

    for name in ["P1", "P2", "P3"] {
        let machine = MachineRepo::create(&pool, &new_machine(site.id, name, "Pump"))
            .await
            .unwrap();
        MaintenanceTaskRepo::create_from_template(&pool, machine.id, &template)
            .await
            .unwrap();
    }

    let deleted = MaintenanceTaskRepo::delete_by_template(&pool, template.id)
        .await
        .unwrap();
    assert_eq!(deleted, 3);

    // Second pass is a harmless no-op, and the template itself survives.
    let deleted = MaintenanceTaskRepo::delete_by_template(&pool, template.id)
        .await
        .unwrap();
    assert_eq!(deleted, 0);
    assert_matches!(
        TaskTemplateRepo::find_by_id(&pool, template.id).await,
        Ok(Some(_))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_template_and_type_scopes_to_old_type(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant F")).await.unwrap();
    let template = TaskTemplateRepo::create(&pool, &new_template("Inspect belts", "TypeA"))
        .await
        .unwrap();

    let machine_a = MachineRepo::create(&pool, &new_machine(site.id, "Alpha", "TypeA"))
        .await
        .unwrap();
    let machine_b = MachineRepo::create(&pool, &new_machine(site.id, "Beta", "TypeB"))
        .await
        .unwrap();
    MaintenanceTaskRepo::create_from_template(&pool, machine_a.id, &template)
        .await
        .unwrap();
    MaintenanceTaskRepo::create_from_template(&pool, machine_b.id, &template)
        .await
        .unwrap();

    let removed =
        MaintenanceTaskRepo::delete_by_template_and_machine_type(&pool, template.id, "TypeA")
            .await
            .unwrap();
    assert_eq!(removed, 1);

    assert!(MaintenanceTaskRepo::list_by_machine(&pool, machine_a.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        MaintenanceTaskRepo::list_by_machine(&pool, machine_b.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_query_filters(pool: PgPool) {
    TaskTemplateRepo::create(&pool, &new_template("Check oil", "Pump"))
        .await
        .unwrap();
    TaskTemplateRepo::create(
        &pool,
        &TaskTemplateInput {
            frequency: "weekly".to_string(),
            ..new_template("Check seals", "Pump")
        },
    )
    .await
    .unwrap();
    TaskTemplateRepo::create(&pool, &new_template("Check filters", "Compressor"))
        .await
        .unwrap();

    let pumps = TaskTemplateRepo::query(
        &pool,
        &TaskTemplateQuery {
            machine_type: Some("Pump".to_string()),
            frequency: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(pumps.len(), 2);

    let weekly_pumps = TaskTemplateRepo::query(
        &pool,
        &TaskTemplateQuery {
            machine_type: Some("Pump".to_string()),
            frequency: Some("weekly".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(weekly_pumps.len(), 1);
    assert_eq!(weekly_pumps[0].task, "Check seals");
}

// ---------------------------------------------------------------------------
// Task completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completion_stamps_set_and_clear(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("Plant G")).await.unwrap();
    let machine = MachineRepo::create(&pool, &new_machine(site.id, "Tasked", "Pump"))
        .await
        .unwrap();
    let task = MaintenanceTaskRepo::create(
        &pool,
        &CreateMaintenanceTask {
            machine_id: machine.id,
            task: "Grease bearings".to_string(),
            priority: "medium".to_string(),
            frequency: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(task.frequency, "daily");

    let completed = MaintenanceTaskRepo::update(
        &pool,
        task.id,
        None,
        None,
        Some(&CompletionChange {
            completed: true,
            completed_by: Some("Engineer User".to_string()),
            completed_date: Some(chrono::Utc::now()),
        }),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(completed.completed);
    assert_eq!(completed.completed_by.as_deref(), Some("Engineer User"));
    assert!(completed.completed_date.is_some());

    let reopened = MaintenanceTaskRepo::update(
        &pool,
        task.id,
        None,
        None,
        Some(&CompletionChange {
            completed: false,
            completed_by: None,
            completed_date: None,
        }),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_by.is_none());
    assert!(reopened.completed_date.is_none());
}
