//! Integration tests for matchmaking between machine and job ads

use classad::{ClassAd, matches, rank, requirements_met};

const MACHINES: [&str; 3] = [
    r#"
    Name = "small"
    Memory = 2048
    Cpus = 2
    Arch = "X86_64"
    Requirements = TARGET.RequestMemory <= Memory && TARGET.RequestCpus <= Cpus
    Rank = TARGET.Department == "physics"
    "#,
    r#"
    Name = "large"
    Memory = 65536
    Cpus = 32
    Arch = "X86_64"
    Requirements = TARGET.RequestMemory <= Memory && TARGET.RequestCpus <= Cpus
    Rank = 0
    "#,
    r#"
    Name = "arm"
    Memory = 16384
    Cpus = 8
    Arch = "AARCH64"
    Requirements = true
    "#,
];

const JOB: &str = r#"[
    Owner = "alice";
    Department = "physics";
    RequestMemory = 1024;
    RequestCpus = 2;
    Requirements = TARGET.Arch == "X86_64" && TARGET.Memory >= RequestMemory;
    Rank = TARGET.Memory / 1024 + TARGET.Cpus
]"#;

fn machines() -> Vec<ClassAd> {
    MACHINES
        .iter()
        .map(|text| ClassAd::parse(text).unwrap())
        .collect()
}

fn name(ad: &ClassAd) -> String {
    ad.evaluate_attr("Name").as_str().unwrap().to_string()
}

#[test]
fn test_rank_simple() {
    let my = ClassAd::parse("rank = TARGET.Memory + TARGET.Mips").unwrap();
    let target = ClassAd::parse("Memory = 8\nMips = 10").unwrap();
    assert_eq!(rank(&my, &target), 18.0);
}

#[test]
fn test_matching_machines() {
    let job = ClassAd::parse(JOB).unwrap();
    let matched: Vec<String> = machines()
        .iter()
        .filter(|machine| matches(machine, &job))
        .map(name)
        .collect();
    assert_eq!(matched, ["small", "large"]);
}

#[test]
fn test_requirements_are_directional() {
    let job = ClassAd::parse(JOB).unwrap();
    let machines = machines();
    let arm = &machines[2];
    assert!(requirements_met(arm, &job));
    assert!(!requirements_met(&job, arm));
    assert!(!matches(arm, &job));
}

#[test]
fn test_best_machine_by_job_rank() {
    let job = ClassAd::parse(JOB).unwrap();
    let machines = machines();
    let best = machines
        .iter()
        .filter(|machine| matches(machine, &job))
        .max_by(|a, b| rank(&job, a).total_cmp(&rank(&job, b)))
        .unwrap();
    assert_eq!(name(best), "large");
    assert_eq!(rank(&job, best), 96.0);
}

#[test]
fn test_machine_rank_prefers_department() {
    let job = ClassAd::parse(JOB).unwrap();
    let machines = machines();
    assert_eq!(rank(&machines[0], &job), 1.0);
    assert_eq!(rank(&machines[1], &job), 0.0);
    // no Rank attribute at all
    assert_eq!(rank(&machines[2], &job), 0.0);
}

#[test]
fn test_oversized_job_matches_nothing() {
    let job = ClassAd::parse(
        r#"[ RequestMemory = 1000000; RequestCpus = 1; Requirements = TARGET.Memory >= RequestMemory ]"#,
    )
    .unwrap();
    assert!(machines().iter().all(|machine| !matches(machine, &job)));

    let modest = ClassAd::parse(
        r#"[ RequestMemory = 8192; RequestCpus = 1; Requirements = TARGET.Memory >= RequestMemory ]"#,
    )
    .unwrap();
    let arm = &machines()[2];
    assert!(matches(arm, &modest));
}
