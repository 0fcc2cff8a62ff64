use plugin_template::harness::{registry, total_failures, write_report, Selection, TestRunner};

#[test]
fn registry_is_complete() {
    let tests = registry();
    let names: Vec<_> = tests.iter().map(|test| test.name).collect();
    assert_eq!(
        names,
        [
            "Plugin Basic Tests",
            "Plugin Processing Tests",
            "Plugin Parameter Tests",
            "Plugin Error Handling Tests",
            "Plugin State Tests",
            "Plugin Editor Tests",
        ]
    );
}

#[test]
fn all_groups_pass() {
    let results = TestRunner::default().run_all();
    assert_eq!(results.len(), 6);
    for result in &results {
        assert!(result.passes > 0, "'{}' made no checks", result.name);
        assert_eq!(result.failures, 0, "{:?}", result.failure_messages);
    }
    assert_eq!(total_failures(&results), 0);
}

#[test]
fn project_category() {
    let results = TestRunner::default().run_category("project");
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.category == "project"));
    assert_eq!(total_failures(&results), 0);
}

#[test]
fn unknown_category_runs_nothing() {
    assert!(TestRunner::default().run_category("Project").is_empty());
}

#[test]
fn filter_selects_groups_and_sub_tests() {
    let runner = TestRunner::default();

    let results = runner.run_matching("Editor");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Plugin Editor Tests");

    // "Program handling" only exists inside the parameter group
    let results = runner.run_matching("Program handling");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Plugin Parameter Tests");
    assert_eq!(results[0].failures, 0);
    assert!(results[0].passes < runner.run_matching("Parameter").remove(0).passes);

    assert!(runner.run_matching("no such test").is_empty());
}

#[test]
fn category_and_filter_combine() {
    let runner = TestRunner::default();
    let selection = Selection {
        category: Some(String::from("project")),
        filter: Some(String::from("Processing")),
    };
    let results = runner.run(&selection);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Plugin Processing Tests");

    let selection = Selection {
        category: Some(String::from("state")),
        filter: Some(String::from("Processing")),
    };
    assert!(runner.run(&selection).is_empty());
}

#[test]
fn report_lists_every_group() {
    let results = TestRunner::default().run_all();
    let mut out = Vec::new();
    assert_eq!(write_report(&results, &mut out).unwrap(), 0);

    let report = String::from_utf8(out).unwrap();
    let lines: Vec<_> = report.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[..6]
        .iter()
        .all(|line| line.starts_with("Test: Plugin ") && line.ends_with(" passed, 0 failed")));
    assert_eq!(lines[6], "");
    assert_eq!(lines[7], "All tests passed!");
}
