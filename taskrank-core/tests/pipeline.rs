use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use taskrank_core::{
    COMPLETED_SENTINEL, LeaderboardRanker, LinearModel, Member, MemberTask, PriorityRanker,
    Project, RankError, RawTask, extract_features, sort_by_priority,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Small deterministic generator so batches vary without a rand dependency.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_batch(rng: &mut Lcg, n: usize) -> Vec<RawTask> {
    (0..n)
        .map(|i| {
            let deps: Vec<String> = (0..rng.below(3))
                .map(|_| format!("T{}", rng.below(n as u64)))
                .filter(|d| *d != format!("T{i}"))
                .collect();
            let deadline = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                + chrono::Days::new(rng.below(300));
            RawTask::new(
                format!("T{i}"),
                rng.below(3) == 0,
                1 + rng.below(4) as i64,
                deadline.format("%Y-%m-%d").to_string(),
            )
            .with_dependencies(deps.join(","))
        })
        .collect()
}

fn priority_model() -> LinearModel {
    LinearModel::new(vec![2.0, -0.1, 0.5, 1.0, 1.5], 0.0)
}

#[test]
fn readme_scenario() {
    let tasks = vec![
        RawTask::new("T1", true, 3, "2025-05-15").with_dependencies("T2,T3"),
        RawTask::new("T2", false, 2, "2025-05-20").with_dependencies(""),
        RawTask::new("T3", false, 4, "2025-05-10").with_dependencies(""),
    ];
    let out = PriorityRanker::new(priority_model())
        .prioritize(&tasks, now())
        .unwrap();

    let last = out.last().unwrap();
    assert_eq!(last.task_id, "T1");
    assert_eq!(last.predicted_priority, COMPLETED_SENTINEL);
    for t in out.iter().filter(|t| t.task_id != "T1") {
        assert_eq!(t.dependency_level, 1, "{}", t.task_id);
    }
}

#[test]
fn open_tasks_always_precede_completed_tasks() {
    let mut rng = Lcg(7);
    let ranker = PriorityRanker::new(priority_model());
    for n in [1, 2, 5, 17, 40] {
        let out = ranker.prioritize(&random_batch(&mut rng, n), now()).unwrap();
        let first_done = out.iter().position(|t| t.completed).unwrap_or(out.len());
        assert!(out[first_done..].iter().all(|t| t.completed));
        assert!(out[..first_done].iter().all(|t| !t.completed));
    }
}

#[test]
fn resorting_ranked_output_is_idempotent() {
    let mut rng = Lcg(11);
    // coarse model so plenty of rows tie on every key
    let ranker = PriorityRanker::new(|f: &[f64]| f[0].min(2.0));
    for n in [3, 12, 30] {
        let out = ranker.prioritize(&random_batch(&mut rng, n), now()).unwrap();
        let mut again = out.clone();
        sort_by_priority(&mut again);
        assert_eq!(again, out);
    }
}

#[test]
fn dependency_level_matches_brute_force_count() {
    let mut rng = Lcg(23);
    let batch = random_batch(&mut rng, 25);
    let features = extract_features(&batch, now()).unwrap();

    for f in &features {
        let expected = features
            .iter()
            .filter(|other| other.task_id != f.task_id)
            .map(|other| other.dependencies.iter().filter(|d| **d == f.task_id).count())
            .sum::<usize>();
        assert_eq!(f.dependency_level, expected, "{}", f.task_id);
    }
}

#[test]
fn days_left_never_negative() {
    let mut rng = Lcg(5);
    let features = extract_features(&random_batch(&mut rng, 50), now()).unwrap();
    assert!(features.iter().all(|f| f.days_left >= 0));
}

#[test]
fn one_bad_deadline_fails_the_batch() {
    let mut rng = Lcg(3);
    let mut batch = random_batch(&mut rng, 10);
    batch[6].deadline = Some("not-a-date".to_string());

    let res = PriorityRanker::new(priority_model()).prioritize(&batch, now());
    assert!(matches!(res, Err(RankError::InvalidInput(_))));
}

#[test]
fn leaderboard_end_to_end() {
    let mut members = BTreeMap::new();
    for (key, name, done) in [("a,io", "A", 3), ("b,io", "B", 3), ("c,io", "C", 1), ("d,io", "D", 0)] {
        let tasks = (0..done)
            .map(|i| {
                (
                    format!("t{i}"),
                    MemberTask::completed("2025-03-01", "2025-03-04", "2025-03-05").with_complexity(4),
                )
            })
            .collect();
        let mut projects = BTreeMap::new();
        projects.insert("p".to_string(), Project { name: None, tasks });
        members.insert(
            key.to_string(),
            Member {
                name: Some(name.to_string()),
                email: None,
                projects,
            },
        );
    }

    let model = LinearModel::new(vec![10.0, 1.0, 0.0, -1.0, 5.0], 0.0);
    let out = LeaderboardRanker::new(model).rank(&members).unwrap();

    let summary: Vec<(&str, f64, usize)> = out
        .iter()
        .map(|e| (e.name.as_str(), e.score, e.rank))
        .collect();
    // 3 tasks: 30 + 3 - 3 + 5 = 35; 1 task: 10 + 1 - 3 + 5 = 13
    assert_eq!(
        summary,
        vec![("A", 35.0, 1), ("B", 35.0, 1), ("C", 13.0, 3), ("D", 0.0, 4)]
    );
    assert_eq!(out[0].email, "a.io");
}
