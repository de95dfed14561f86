use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use taskboard_core::{count_tasks, project, FilterMode, Priority, SortKey, Task, ViewQuery};
use uuid::Uuid;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
}

fn task(title: &str, hour: u32, priority: Priority, completed: bool) -> Task {
    let mut task = Task::with_id(Uuid::new_v4(), title, "", priority, at(hour));
    task.completed = completed;
    task
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

fn mixed_collection() -> Vec<Task> {
    vec![
        task("a", 1, Priority::Low, false),
        task("b", 2, Priority::High, true),
        task("c", 3, Priority::Medium, false),
        task("d", 4, Priority::High, false),
        task("e", 5, Priority::Low, true),
    ]
}

#[test]
fn active_and_completed_partition_all() {
    let tasks = mixed_collection();
    let all = project(&tasks, ViewQuery::new(FilterMode::All, SortKey::CreatedAt));
    let active = project(&tasks, ViewQuery::new(FilterMode::Active, SortKey::CreatedAt));
    let completed = project(
        &tasks,
        ViewQuery::new(FilterMode::Completed, SortKey::CreatedAt),
    );

    let all_ids: HashSet<Uuid> = all.iter().map(|t| t.id).collect();
    let active_ids: HashSet<Uuid> = active.iter().map(|t| t.id).collect();
    let completed_ids: HashSet<Uuid> = completed.iter().map(|t| t.id).collect();

    assert!(active_ids.is_disjoint(&completed_ids));
    assert_eq!(
        active_ids.union(&completed_ids).copied().collect::<HashSet<_>>(),
        all_ids
    );
    assert_eq!(active.len() + completed.len(), all.len());

    let counts = count_tasks(&tasks);
    assert_eq!(counts.total, 5);
    assert_eq!(counts.active, active.len());
    assert_eq!(counts.completed, completed.len());
}

#[test]
fn created_at_sort_is_newest_first() {
    let tasks = vec![
        task("t1", 1, Priority::Low, false),
        task("t2", 2, Priority::Low, false),
        task("t3", 3, Priority::Low, false),
    ];
    let view = project(&tasks, ViewQuery::default());
    assert_eq!(titles(&view), ["t3", "t2", "t1"]);
}

#[test]
fn priority_sort_is_descending_and_stable() {
    let tasks = vec![
        task("low", 1, Priority::Low, false),
        task("high", 2, Priority::High, false),
        task("medium", 3, Priority::Medium, false),
    ];
    let view = project(&tasks, ViewQuery::new(FilterMode::All, SortKey::Priority));
    assert_eq!(titles(&view), ["high", "medium", "low"]);

    let ties = mixed_collection();
    let view = project(&ties, ViewQuery::new(FilterMode::All, SortKey::Priority));
    assert_eq!(titles(&view), ["b", "d", "c", "a", "e"]);
}

#[test]
fn filter_applies_before_sort() {
    let tasks = mixed_collection();
    let view = project(&tasks, ViewQuery::new(FilterMode::Active, SortKey::Priority));
    assert_eq!(titles(&view), ["d", "c", "a"]);
}

#[test]
fn projection_leaves_canonical_order_alone() {
    let tasks = mixed_collection();
    let before = tasks.clone();
    let _ = project(&tasks, ViewQuery::new(FilterMode::Completed, SortKey::Priority));
    assert_eq!(tasks, before);
}

#[test]
fn empty_collection_projects_to_empty() {
    for filter in [FilterMode::All, FilterMode::Active, FilterMode::Completed] {
        for sort in [SortKey::CreatedAt, SortKey::Priority] {
            assert!(project(&[], ViewQuery::new(filter, sort)).is_empty());
        }
    }
}
