//! Shared fixtures for the integration tests
//!
//! Each fixture builds its own model, seeds a fresh `MemoryDatabase` and returns it
//! together with the soft delete configuration the tests use.

#![allow(dead_code)]

use serde_json::json;
use softhaus::prelude::*;
use std::sync::Arc;

pub const SINGLE_CONTRACT: &str = "SingleSoftDelete";
pub const CASCADE_CONTRACT: &str = "CascadeSoftDelete";
pub const USER_OWNED: &str = "UserOwned";

// ---------------------------------------------------------------------------
// Single soft delete: books owned by users, with reviews and a one-to-one detail

#[model]
#[entity(name = "books", contracts("SingleSoftDelete", "UserOwned"))]
pub struct Book {
    #[key]
    pub id: i64,
    pub title: String,
    pub user_id: Uuid,
    pub soft_deleted: bool,
}

#[model]
#[entity(name = "reviews", contracts("SingleSoftDelete"))]
pub struct Review {
    #[key]
    pub id: i64,
    pub book_id: i64,
    pub stars: i32,
    pub soft_deleted: bool,
}

#[model]
#[entity(name = "book_details", contracts("SingleSoftDelete"))]
pub struct BookDetail {
    #[key]
    pub id: i64,
    pub book_id: i64,
    pub blurb: String,
    pub soft_deleted: bool,
}

#[model]
#[entity(name = "authors")]
pub struct Author {
    #[key]
    pub id: i64,
    pub name: String,
}

pub fn user_filter(user_id: Uuid) -> FilterExpression {
    FilterExpression::new("entity", QueryFilter::eq("user_id", json!(user_id.to_string())))
}

pub fn single_config(user_id: Uuid) -> SoftDeleteConfiguration<bool> {
    SoftDeleteConfiguration::builder(SINGLE_CONTRACT)
        .value_field("soft_deleted")
        .other_filter(USER_OWNED, user_filter(user_id))
        .build()
        .unwrap()
}

pub fn book(id: i64, title: &str, user_id: Uuid) -> Book {
    Book {
        id,
        title: title.to_string(),
        user_id,
        soft_deleted: false,
    }
}

/// Books 1..=3 belong to `user_id`, book 4 to someone else
pub async fn seed_books(user_id: Uuid) -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Book>()
        .entity::<Review>()
        .entity::<BookDetail>()
        .entity::<Author>()
        .relationship(Relationship::one_to_many::<Book, Review>("reviews", &["book_id"]).with_inverse("book"))
        .relationship(Relationship::one_to_one::<Book, BookDetail>("detail", &["book_id"]))
        .build()
        .unwrap();

    let config = single_config(user_id);
    let filters = FilterExpressionBuilder::new(&config);
    let database = MemoryDatabase::new(metadata)
        .with_visibility_filter("books", filters.visible_filter::<Book>().unwrap().into_body())
        .with_visibility_filter("reviews", filters.visible_filter::<Review>().unwrap().into_body())
        .with_visibility_filter("book_details", filters.visible_filter::<BookDetail>().unwrap().into_body());
    let database = Arc::new(database);

    database.insert(book(1, "Refactoring", user_id)).await.unwrap();
    database.insert(book(2, "Domain-Driven Design", user_id)).await.unwrap();
    database.insert(book(3, "Patterns of Enterprise Application Architecture", user_id)).await.unwrap();
    database.insert(book(4, "Someone else's book", Uuid::new_v4())).await.unwrap();
    database
        .insert(Review {
            id: 1,
            book_id: 1,
            stars: 5,
            soft_deleted: false,
        })
        .await
        .unwrap();
    database
        .insert(BookDetail {
            id: 1,
            book_id: 1,
            blurb: "Improving the design of existing code".to_string(),
            soft_deleted: false,
        })
        .await
        .unwrap();
    database
        .insert(Author {
            id: 1,
            name: "Martin Fowler".to_string(),
        })
        .await
        .unwrap();

    database
}

// ---------------------------------------------------------------------------
// Cascade soft delete: an employee hierarchy, each employee with an optional contract
//
//  CEO (1)
//  ├── CTO (2)
//  │   ├── ProjectManager1 (4)
//  │   │   ├── Dev1a (6)
//  │   │   └── Dev1b (7)
//  │   └── ProjectManager2 (5)
//  │       ├── Dev2a (8)
//  │       └── Dev2b (9)
//  ├── CFO (3)
//  │   └── Accountant (10)
//  └── Secretary (11)
//
// Every employee except Dev2b and Secretary has a contract.

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

pub const CEO: i64 = 1;
pub const CTO: i64 = 2;
pub const CFO: i64 = 3;
pub const PROJECT_MANAGER_1: i64 = 4;
pub const PROJECT_MANAGER_2: i64 = 5;
pub const DEV_2A: i64 = 8;
pub const DEV_2B: i64 = 9;

pub const EMPLOYEE_COUNT: usize = 11;
pub const CONTRACT_COUNT: usize = 9;

pub fn cascade_config() -> SoftDeleteConfiguration<u8> {
    SoftDeleteConfiguration::builder(CASCADE_CONTRACT)
        .value_field("soft_delete_level")
        .build()
        .unwrap()
}

pub fn employee_id(id: i64) -> EntityId {
    EntityId::new("employees", KeyValue::from(id))
}

pub fn contract_id(id: i64) -> EntityId {
    EntityId::new("employee_contracts", KeyValue::from(id))
}

fn cascade_visibility(database: MemoryDatabase, config: &SoftDeleteConfiguration<u8>) -> MemoryDatabase {
    let models: Vec<EntityModel> = database
        .metadata()
        .entity_types()
        .filter(|model| config.participates(model))
        .cloned()
        .collect();
    let filters = FilterExpressionBuilder::new(config);
    models.iter().fold(database, |database, model| {
        let filter = filters.visible_filter_for(model).unwrap().into_body();
        database.with_visibility_filter(&model.name, filter)
    })
}

pub async fn seed_employees() -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Employee>()
        .entity::<EmployeeContract>()
        .relationship(
            Relationship::one_to_many::<Employee, Employee>("works_for_me", &["manager_id"]).with_inverse("manager"),
        )
        .relationship(Relationship::one_to_one::<Employee, EmployeeContract>("contract", &["employee_id"]))
        .build()
        .unwrap();
    let database = Arc::new(cascade_visibility(MemoryDatabase::new(metadata), &cascade_config()));

    let staff: [(i64, &str, Option<i64>); EMPLOYEE_COUNT] = [
        (CEO, "CEO", None),
        (CTO, "CTO", Some(CEO)),
        (CFO, "CFO", Some(CEO)),
        (PROJECT_MANAGER_1, "ProjectManager1", Some(CTO)),
        (PROJECT_MANAGER_2, "ProjectManager2", Some(CTO)),
        (6, "Dev1a", Some(PROJECT_MANAGER_1)),
        (7, "Dev1b", Some(PROJECT_MANAGER_1)),
        (DEV_2A, "Dev2a", Some(PROJECT_MANAGER_2)),
        (DEV_2B, "Dev2b", Some(PROJECT_MANAGER_2)),
        (10, "Accountant", Some(CFO)),
        (11, "Secretary", Some(CEO)),
    ];
    for (id, name, manager_id) in staff {
        database
            .insert(Employee {
                id,
                name: name.to_string(),
                manager_id,
                soft_delete_level: 0,
            })
            .await
            .unwrap();
        if id != DEV_2B && id != 11 {
            database
                .insert(EmployeeContract {
                    id: id * 100,
                    employee_id: id,
                    document: format!("Contract for {}", name),
                    soft_delete_level: 0,
                })
                .await
                .unwrap();
        }
    }

    database
}

// ---------------------------------------------------------------------------
// Small graphs for the walker: a chain, a cycle, a diamond and a one-to-one pair

#[model]
#[entity(name = "roots", contracts("CascadeSoftDelete"))]
pub struct ChainRoot {
    #[key]
    pub id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "children", contracts("CascadeSoftDelete"))]
pub struct ChainChild {
    #[key]
    pub id: i64,
    pub root_id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "grand_children", contracts("CascadeSoftDelete"))]
pub struct ChainGrandChild {
    #[key]
    pub id: i64,
    pub child_id: i64,
    pub soft_delete_level: u8,
}

pub fn chain_ids() -> (EntityId, EntityId, EntityId) {
    (
        EntityId::new("roots", KeyValue::from(1)),
        EntityId::new("children", KeyValue::from(10)),
        EntityId::new("grand_children", KeyValue::from(100)),
    )
}

/// roots(1) -> children(10) -> grand_children(100)
pub async fn seed_chain(shape: NavigationShape) -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<ChainRoot>()
        .entity::<ChainChild>()
        .entity::<ChainGrandChild>()
        .relationship(Relationship::one_to_many::<ChainRoot, ChainChild>("children", &["root_id"]).navigation_shape(shape))
        .relationship(Relationship::one_to_many::<ChainChild, ChainGrandChild>("grand_children", &["child_id"]))
        .build()
        .unwrap();
    let database = Arc::new(cascade_visibility(MemoryDatabase::new(metadata), &cascade_config()));

    database
        .insert(ChainRoot {
            id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(ChainChild {
            id: 10,
            root_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(ChainGrandChild {
            id: 100,
            child_id: 10,
            soft_delete_level: 0,
        })
        .await
        .unwrap();

    database
}

#[model]
#[entity(name = "nodes", contracts("CascadeSoftDelete"))]
pub struct Node {
    #[key]
    pub id: i64,
    pub parent_id: Option<i64>,
    pub soft_delete_level: u8,
}

pub fn node_id(id: i64) -> EntityId {
    EntityId::new("nodes", KeyValue::from(id))
}

/// Nodes 1 -> 2 -> 3 -> 1, each the parent of the next
pub async fn seed_cycle() -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Node>()
        .relationship(Relationship::one_to_many::<Node, Node>("children", &["parent_id"]).with_inverse("parent"))
        .build()
        .unwrap();
    let database = Arc::new(cascade_visibility(MemoryDatabase::new(metadata), &cascade_config()));

    for (id, parent_id) in [(1, 3), (2, 1), (3, 2)] {
        database
            .insert(Node {
                id,
                parent_id: Some(parent_id),
                soft_delete_level: 0,
            })
            .await
            .unwrap();
    }

    database
}

#[model]
#[entity(name = "companies", contracts("CascadeSoftDelete"))]
pub struct Company {
    #[key]
    pub id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "departments", contracts("CascadeSoftDelete"))]
pub struct Department {
    #[key]
    pub id: i64,
    pub company_id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "projects", contracts("CascadeSoftDelete"))]
pub struct Project {
    #[key]
    pub id: i64,
    pub company_id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "assignments", contracts("CascadeSoftDelete"))]
pub struct Assignment {
    #[key]
    pub id: i64,
    pub department_id: i64,
    pub project_id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "invoices", contracts("CascadeSoftDelete"))]
pub struct Invoice {
    #[key]
    pub id: i64,
    pub company_id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "audit_entries")]
pub struct AuditEntry {
    #[key]
    pub id: i64,
    pub company_id: i64,
    pub message: String,
}

pub fn company_id(id: i64) -> EntityId {
    EntityId::new("companies", KeyValue::from(id))
}

/// One company whose department and project share an assignment
///
/// The company also has an invoice it restricts deletes on, and an audit entry
/// outside the soft delete contract.
pub async fn seed_diamond() -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Company>()
        .entity::<Department>()
        .entity::<Project>()
        .entity::<Assignment>()
        .entity::<Invoice>()
        .entity::<AuditEntry>()
        .relationship(Relationship::one_to_many::<Company, Department>("departments", &["company_id"]))
        .relationship(Relationship::one_to_many::<Company, Project>("projects", &["company_id"]))
        .relationship(Relationship::one_to_many::<Department, Assignment>("assignments", &["department_id"]))
        .relationship(Relationship::one_to_many::<Project, Assignment>("assignments", &["project_id"]))
        .relationship(
            Relationship::one_to_many::<Company, Invoice>("invoices", &["company_id"]).on_delete(DeleteBehavior::Restrict),
        )
        .relationship(Relationship::one_to_many::<Company, AuditEntry>("audit_entries", &["company_id"]))
        .build()
        .unwrap();
    let database = Arc::new(cascade_visibility(MemoryDatabase::new(metadata), &cascade_config()));

    database
        .insert(Company {
            id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(Department {
            id: 1,
            company_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(Project {
            id: 1,
            company_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(Assignment {
            id: 1,
            department_id: 1,
            project_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(Invoice {
            id: 1,
            company_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(AuditEntry {
            id: 1,
            company_id: 1,
            message: "created".to_string(),
        })
        .await
        .unwrap();

    database
}

#[model]
#[entity(name = "people", contracts("CascadeSoftDelete"))]
pub struct Person {
    #[key]
    pub id: i64,
    pub soft_delete_level: u8,
}

#[model]
#[entity(name = "passports", contracts("CascadeSoftDelete"))]
pub struct Passport {
    #[key]
    pub id: i64,
    pub person_id: i64,
    pub soft_delete_level: u8,
}

/// A person with a passport, related one-to-one
pub async fn seed_one_to_one() -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Person>()
        .entity::<Passport>()
        .relationship(Relationship::one_to_one::<Person, Passport>("passport", &["person_id"]).with_inverse("holder"))
        .build()
        .unwrap();
    let database = Arc::new(cascade_visibility(MemoryDatabase::new(metadata), &cascade_config()));

    database
        .insert(Person {
            id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();
    database
        .insert(Passport {
            id: 1,
            person_id: 1,
            soft_delete_level: 0,
        })
        .await
        .unwrap();

    database
}
