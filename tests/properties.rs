use std::collections::HashSet;

use data_alchemist::config::{CycleFilter, RulePolicy};
use data_alchemist::models::{CoRunRule, Record};
use data_alchemist::rules::{detect_circular_co_run, RuleGraph, RuleSet};
use data_alchemist::scheduler::suggest_assignments;
use data_alchemist::validation::{
    cross_validate, task_id_set, validate_all, validate_tasks, validate_workers, ErrorKind,
};
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("0".to_string()),
        "[A-C][0-3]",
        "[ a-z0-9,\\[\\]{}\":.-]{0,12}",
    ]
}

fn record(fields: &'static [&'static str]) -> impl Strategy<Value = Record> {
    proptest::collection::vec(proptest::option::of(cell()), fields.len()).prop_map(move |cells| {
        fields
            .iter()
            .zip(cells)
            .filter_map(|(f, c)| c.map(|c| (*f, c)))
            .collect()
    })
}

const CLIENT_FIELDS: &[&str] = &[
    "ClientID",
    "ClientName",
    "PriorityLevel",
    "RequestedTaskIDs",
    "AttributesJSON",
];
const WORKER_FIELDS: &[&str] = &["WorkerID", "WorkerName", "Skills"];
const TASK_FIELDS: &[&str] = &["TaskID", "Duration", "RequiredSkills"];

fn batch(fields: &'static [&'static str]) -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(record(fields), 0..8)
}

fn co_run_rules() -> impl Strategy<Value = Vec<CoRunRule>> {
    proptest::collection::vec(
        proptest::collection::vec("[A-F]", 0..5).prop_map(CoRunRule::new),
        0..6,
    )
}

proptest! {
    #[test]
    fn prop_validation_is_idempotent(
        clients in batch(CLIENT_FIELDS),
        workers in batch(WORKER_FIELDS),
        tasks in batch(TASK_FIELDS),
    ) {
        let first = validate_all(&clients, &workers, &tasks);
        let second = validate_all(&clients, &workers, &tasks);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_rows_index_owning_batch(
        clients in batch(CLIENT_FIELDS),
        workers in batch(WORKER_FIELDS),
        tasks in batch(TASK_FIELDS),
    ) {
        let report = validate_all(&clients, &workers, &tasks);
        for error in &report.errors {
            let len = match error.entity {
                data_alchemist::models::Entity::Clients => clients.len(),
                data_alchemist::models::Entity::Workers => workers.len(),
                data_alchemist::models::Entity::Tasks => tasks.len(),
            };
            prop_assert!(error.row < len);
        }
    }

    #[test]
    fn prop_first_occurrence_never_duplicate(ids in proptest::collection::vec("[A-C]?", 0..10)) {
        let workers: Vec<Record> = ids.iter().map(|id| Record::new().with("WorkerID", id.as_str())).collect();
        let tasks: Vec<Record> = ids.iter().map(|id| Record::new().with("TaskID", id.as_str())).collect();

        let dup_rows: Vec<usize> = validate_workers(&workers)
            .into_iter()
            .filter(|e| e.kind == ErrorKind::DuplicateWorkerId)
            .map(|e| e.row)
            .collect();
        let expected: Vec<usize> = ids
            .iter()
            .enumerate()
            .filter(|(i, id)| !id.is_empty() && ids[..*i].contains(*id))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(&dup_rows, &expected);

        let task_dups: Vec<usize> = validate_tasks(&tasks)
            .into_iter()
            .filter(|e| e.kind == ErrorKind::DuplicateTaskId)
            .map(|e| e.row)
            .collect();
        prop_assert_eq!(&task_dups, &expected);
    }

    #[test]
    fn prop_task_id_set_is_trimmed_ids(tasks in batch(TASK_FIELDS)) {
        let expected: HashSet<&str> = tasks
            .iter()
            .filter_map(|t| t.get("TaskID"))
            .map(str::trim)
            .collect();
        prop_assert_eq!(task_id_set(&tasks), expected);
    }

    #[test]
    fn prop_cross_errors_only_reference_clients_and_workers(
        clients in batch(CLIENT_FIELDS),
        workers in batch(WORKER_FIELDS),
        tasks in batch(TASK_FIELDS),
    ) {
        for error in cross_validate(&clients, &workers, &tasks) {
            prop_assert!(error.kind.is_cross_entity());
            prop_assert!(error.field == "RequestedTaskIDs" || error.field == "Skills");
        }
    }

    #[test]
    fn prop_rule_is_a_clique(tasks in proptest::collection::hash_set("[A-Z][0-9]", 0..7)) {
        let tasks: Vec<String> = tasks.into_iter().collect();
        let n = tasks.len();
        let graph = RuleGraph::from_rules(&[CoRunRule::new(tasks)]);
        prop_assert_eq!(graph.edge_count(), n * n.saturating_sub(1));
    }

    #[test]
    fn prop_cycles_follow_edges(rules in co_run_rules()) {
        let graph = RuleGraph::from_rules(&rules);
        for cycle in detect_circular_co_run(&rules) {
            prop_assert!(cycle.len() >= 2);
            for i in 0..cycle.len() {
                let next = &cycle[(i + 1) % cycle.len()];
                prop_assert!(graph.has_edge(&cycle[i], next));
            }
        }
    }

    #[test]
    fn prop_spanning_cycles_ignore_rule_order(rules in co_run_rules()) {
        let reversed: Vec<CoRunRule> = rules.iter().rev().cloned().collect();
        let forward = CycleFilter::SpanningRules.find(&rules);
        let backward = CycleFilter::SpanningRules.find(&reversed);
        prop_assert_eq!(forward.len(), backward.len());

        let graph = RuleGraph::from_rules(&rules);
        for cycle in &forward {
            prop_assert!(cycle.len() >= 3);
            prop_assert!(rules.iter().all(|r| !r.contains_all(cycle)));
            let distinct: HashSet<&String> = cycle.iter().collect();
            prop_assert_eq!(distinct.len(), cycle.len());
            for i in 0..cycle.len() {
                let next = &cycle[(i + 1) % cycle.len()];
                prop_assert!(graph.has_edge(&cycle[i], next));
            }
        }
    }

    #[test]
    fn prop_gate_ignores_rule_order(
        first in proptest::collection::vec("[A-F]", 2..5),
        second in proptest::collection::vec("[A-F]", 2..5),
    ) {
        let policy = RulePolicy::default();
        let (first, second) = (CoRunRule::new(first), CoRunRule::new(second));

        let mut forward = RuleSet::new();
        prop_assert!(forward.try_add_co_run(first.clone(), &policy).is_ok());
        let forward_ok = forward.try_add_co_run(second.clone(), &policy).is_ok();

        let mut backward = RuleSet::new();
        prop_assert!(backward.try_add_co_run(second, &policy).is_ok());
        let backward_ok = backward.try_add_co_run(first, &policy).is_ok();

        prop_assert_eq!(forward_ok, backward_ok);
    }

    #[test]
    fn prop_assignments_follow_priority(priorities in proptest::collection::vec(1u8..=5, 0..8)) {
        let clients: Vec<Record> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Record::new()
                    .with("ClientID", format!("C{i}"))
                    .with("PriorityLevel", p.to_string())
                    .with("RequestedTaskIDs", "T1")
            })
            .collect();
        let tasks = vec![Record::new().with("TaskID", "T1")];

        let order: Vec<u8> = suggest_assignments(&clients, &tasks, &[])
            .iter()
            .map(|a| {
                let idx: usize = a.client_id[1..].parse().unwrap();
                priorities[idx]
            })
            .collect();
        prop_assert_eq!(order.len(), priorities.len());
        prop_assert!(order.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_round_trip_example() {
    let tasks = vec![Record::new()
        .with("TaskID", "T1")
        .with("RequiredSkills", "[cook, clean]")];
    let workers = vec![Record::new().with("WorkerID", "W1").with("Skills", "cook")];

    let errors = cross_validate(&[], &workers, &tasks);
    assert!(errors.iter().all(|e| e.kind != ErrorKind::UnusedSkill));
}

#[test]
fn test_dangling_reference_example() {
    let clients = vec![Record::new()
        .with("ClientID", "C1")
        .with("PriorityLevel", "1")
        .with("RequestedTaskIDs", "T9")];
    let errors = cross_validate(&clients, &[], &[]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidTaskReference);
    assert_eq!(errors[0].row, 0);
    assert_eq!(errors[0].field, "RequestedTaskIDs");
}

#[test]
fn test_triangle_example() {
    let rules = vec![
        CoRunRule::new(["A", "B"]),
        CoRunRule::new(["B", "C"]),
        CoRunRule::new(["C", "A"]),
    ];
    let cycles = detect_circular_co_run(&rules);
    assert!(cycles
        .iter()
        .any(|c| ["A", "B", "C"].iter().all(|t| c.iter().any(|x| x == t))));
}
