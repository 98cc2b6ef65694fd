#![forbid(unsafe_code)]

use tp_core::{Priority, Status};
use tp_storage::{CreateTaskRequest, TaskStore};

const DEFAULT_DATA_DIR: &str = "data";

fn sample_tasks() -> Vec<CreateTaskRequest> {
    vec![
        CreateTaskRequest {
            title: "Prepare Q4 Planning Workshop".to_string(),
            description: Some(
                "Coordinate with department leads to define agenda and collect required \
                 materials for the upcoming planning workshop."
                    .to_string(),
            ),
            priority: Some(Priority::High),
            status: Some(Status::InProgress),
            category: Some("workshop".to_string()),
            due_date: Some("2025-10-15".to_string()),
        },
        CreateTaskRequest {
            title: "Review SAP Fiori Guidelines".to_string(),
            description: Some(
                "Ensure front-end design complies with the latest SAP Fiori UX recommendations."
                    .to_string(),
            ),
            priority: Some(Priority::Medium),
            status: Some(Status::Pending),
            category: Some("design".to_string()),
            due_date: Some("2025-10-10".to_string()),
        },
        CreateTaskRequest {
            title: "Finalize Demo Script".to_string(),
            description: Some(
                "Polish the narrative for the GitHub Copilot code review session.".to_string(),
            ),
            priority: Some(Priority::Critical),
            status: Some(Status::Pending),
            category: Some("presentation".to_string()),
            due_date: Some("2025-10-05".to_string()),
        },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir =
        std::env::var("TASK_PLANNER_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let mut store = TaskStore::open(&data_dir)?;

    for task in store.find_all()? {
        store.remove(task.id)?;
    }
    for request in sample_tasks() {
        store.create(request)?;
    }

    println!("Seed data inserted successfully.");
    Ok(())
}
