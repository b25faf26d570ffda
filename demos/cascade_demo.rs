//! # Cascade Soft Delete Example
//!
//! This example walks an employee hierarchy through the cascade soft delete lifecycle:
//! - Defining models and the relationships a cascading delete follows
//! - Hiding soft deleted rows with visibility filters
//! - Soft deleting a manager together with everyone who works for them
//! - Checking, recovering and finally hard deleting a subtree
//!
//! Run with `RUST_LOG=softhaus=trace cargo run --example cascade_demo --features debug-logging`
//! to see every step the walker takes.

use softhaus::prelude::*;
use std::sync::Arc;

const CONTRACT: &str = "CascadeSoftDelete";

#[model]
#[entity(name = "employees", contracts("CascadeSoftDelete"))]
pub struct Employee {
    #[key]
    pub id: i64,
    pub name: String,
    pub manager_id: Option<i64>,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "employee_contracts", contracts("CascadeSoftDelete"))]
pub struct EmployeeContract {
    #[key]
    pub id: i64,
    pub employee_id: i64,
    pub document: String,
    pub soft_delete_level: u8,
}

async fn visible_names(session: &mut MemorySession) -> anyhow::Result<Vec<String>> {
    let ids = session.query("employees", &QueryBuilder::new(), false).await?;
    Ok(ids
        .iter()
        .filter_map(|id| session.get::<Employee>(id).map(|employee| employee.name.clone()))
        .collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "softhaus=info".into()),
        )
        .init();

    println!("🚀 Softhaus Cascade Soft Delete Example");
    println!("=======================================");

    // 1. Settings and configuration
    let app_config = AppConfig::load()?;
    let config = SoftDeleteConfiguration::<u8>::builder(CONTRACT)
        .value_field("soft_delete_level")
        .settings(&app_config.soft_delete)
        .build()?;
    println!("✅ Configured soft delete on the '{}' contract", config.contract());

    // 2. Model and visibility filters
    let metadata = ModelMetadata::builder()
        .entity::<Employee>()
        .entity::<EmployeeContract>()
        .relationship(
            Relationship::one_to_many::<Employee, Employee>("works_for_me", &["manager_id"]).with_inverse("manager"),
        )
        .relationship(Relationship::one_to_one::<Employee, EmployeeContract>("contract", &["employee_id"]))
        .build()?;

    let filters = FilterExpressionBuilder::new(&config);
    let employees_visible = filters.visible_filter::<Employee>()?;
    let contracts_visible = filters.visible_filter::<EmployeeContract>()?;
    let (predicate, params) = employees_visible.to_sql();
    println!("✅ Employees are visible when {} with {:?}", predicate, params);

    let database = Arc::new(
        MemoryDatabase::new(metadata)
            .with_visibility_filter("employees", employees_visible.into_body())
            .with_visibility_filter("employee_contracts", contracts_visible.into_body()),
    );

    // 3. Seed a small company
    let staff = [
        (1, "CEO", None),
        (2, "CTO", Some(1)),
        (3, "CFO", Some(1)),
        (4, "ProjectManager1", Some(2)),
        (5, "ProjectManager2", Some(2)),
        (6, "Dev1a", Some(4)),
        (7, "Dev2a", Some(5)),
    ];
    for (id, name, manager_id) in staff {
        database
            .insert(Employee {
                id,
                name: name.to_string(),
                manager_id,
                soft_delete_level: 0,
            })
            .await?;
        database
            .insert(EmployeeContract {
                id: id * 100,
                employee_id: id,
                document: format!("Contract for {}", name),
                soft_delete_level: 0,
            })
            .await?;
    }
    println!("✅ Seeded {} employees", database.count("employees", false).await);

    let mut session = database.session();
    println!("👥 Visible: {:?}", visible_names(&mut session).await?);

    // 4. Soft delete the CTO and everyone below
    println!("\n🗑️  Soft deleting the CTO");
    println!("------------------------");
    let mut service = CascadeSoftDeleteService::new(&mut session, config);
    let status = service.set_cascade_soft_delete_by_keys::<Employee>(&[KeyValue::from(2_i64)]).await?;
    println!("{}", status);

    let roots = service.get_soft_deleted_entries::<Employee>().await?;
    println!(
        "📋 Soft deleted directly: {:?}",
        roots.iter().map(|employee| employee.name.as_str()).collect::<Vec<_>>()
    );
    println!("👥 Visible: {:?}", visible_names(service.unit_of_work_mut()).await?);

    // 5. Resetting below the root is refused
    let status = service.reset_cascade_soft_delete_by_keys::<Employee>(&[KeyValue::from(4_i64)]).await?;
    println!("⚠️  {}", status);

    // 6. Recover the CTO's subtree
    println!("\n♻️  Recovering the CTO");
    println!("---------------------");
    let status = service.reset_cascade_soft_delete_by_keys::<Employee>(&[KeyValue::from(2_i64)]).await?;
    println!("{}", status);
    println!("👥 Visible: {:?}", visible_names(service.unit_of_work_mut()).await?);

    // 7. Soft delete a project manager, check, then hard delete
    println!("\n💥 Hard deleting ProjectManager2");
    println!("--------------------------------");
    let keys = [KeyValue::from(5_i64)];
    service.set_cascade_soft_delete_by_keys::<Employee>(&keys).await?;
    let status = service.check_cascade_soft_delete_by_keys::<Employee>(&keys).await?;
    println!("❓ {}", status);
    let status = service.hard_delete_soft_deleted_entries_by_keys::<Employee>(&keys).await?;
    println!("{}", status);

    println!(
        "\n✅ {} employees and {} contracts remain",
        database.count("employees", true).await,
        database.count("employee_contracts", true).await
    );

    Ok(())
}
