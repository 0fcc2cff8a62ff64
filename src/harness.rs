//! A small self-contained test harness for exercising a plugin the way a host would. Test groups
//! are plain functions registered in [`registry()`], and the `template-tests` binary runs them from
//! the command line.

use std::fmt::Debug;
use std::io::{self, Write};


/// A named group of related checks.
#[derive(Debug, Clone, Copy)]
pub struct UnitTest {
    pub name: &'static str,
    /// Used to select groups with `--category`.
    pub category: &'static str,
    pub run: fn(&mut TestContext),
}

/// All registered test groups, in the order they run.
pub fn registry() -> Vec<UnitTest> {
    plugin_tests::tests()
}

/// The outcome of running a single [`UnitTest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: &'static str,
    pub category: &'static str,
    pub passes: u32,
    pub failures: u32,
    /// One entry per failed expectation, prefixed with the sub-test it happened in.
    pub failure_messages: Vec<String>,
}

/// Which groups to run. Both criteria need to match when both are set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Only run groups with exactly this category.
    pub category: Option<String>,
    /// Only run groups whose name contains this string, or only the sub-tests whose name contains
    /// it if the group name doesn't match. Case sensitive.
    pub filter: Option<String>,
}

/// Collects the expectations made by a running test group.
#[derive(Debug)]
pub struct TestContext {
    /// If set, only sub-tests with a name containing this are counted.
    sub_test_filter: Option<String>,
    current_test: Option<String>,
    /// Whether expectations in the current sub-test are counted.
    active: bool,
    /// Whether any sub-test has been counted so far.
    matched: bool,
    passes: u32,
    failures: u32,
    failure_messages: Vec<String>,
}

impl TestContext {
    fn new(sub_test_filter: Option<String>) -> Self {
        Self {
            active: sub_test_filter.is_none(),
            matched: sub_test_filter.is_none(),
            sub_test_filter,
            current_test: None,
            passes: 0,
            failures: 0,
            failure_messages: Vec::new(),
        }
    }

    /// Start a new sub-test. Failure messages are attributed to the most recent sub-test.
    pub fn begin_test(&mut self, name: &str) {
        self.active = self
            .sub_test_filter
            .as_deref()
            .map_or(true, |filter| name.contains(filter));
        self.matched |= self.active;
        self.current_test = Some(name.to_owned());
    }

    /// Record a check that passes if `condition` holds.
    pub fn expect(&mut self, condition: bool, message: &str) {
        if !self.active {
            return;
        }

        if condition {
            self.passes += 1;
        } else {
            self.failures += 1;

            let message = match &self.current_test {
                Some(test) => format!("{test}: {message}"),
                None => message.to_owned(),
            };
            plugin_error!("Expectation failed in {message}");
            self.failure_messages.push(message);
        }
    }

    /// Record a check that passes if both values are equal.
    pub fn expect_eq<T: PartialEq + Debug>(&mut self, actual: T, expected: T, message: &str) {
        if actual == expected {
            self.expect(true, message);
        } else {
            self.expect(
                false,
                &format!("{message} (expected {expected:?}, got {actual:?})"),
            );
        }
    }

    /// Record a check that passes if `actual` is within `tolerance` of `expected`.
    pub fn expect_within_absolute_error(
        &mut self,
        actual: f64,
        expected: f64,
        tolerance: f64,
        message: &str,
    ) {
        if (actual - expected).abs() <= tolerance {
            self.expect(true, message);
        } else {
            self.expect(
                false,
                &format!("{message} (expected {expected} +/- {tolerance}, got {actual})"),
            );
        }
    }

    fn into_result(self, test: &UnitTest) -> TestResult {
        TestResult {
            name: test.name,
            category: test.category,
            passes: self.passes,
            failures: self.failures,
            failure_messages: self.failure_messages,
        }
    }
}

/// Runs test groups and collects their results.
#[derive(Debug, Clone)]
pub struct TestRunner {
    tests: Vec<UnitTest>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new(registry())
    }
}

impl TestRunner {
    pub fn new(tests: Vec<UnitTest>) -> Self {
        Self { tests }
    }

    pub fn tests(&self) -> &[UnitTest] {
        &self.tests
    }

    /// Run every group.
    pub fn run_all(&self) -> Vec<TestResult> {
        self.run(&Selection::default())
    }

    /// Run the groups in `category`.
    pub fn run_category(&self, category: &str) -> Vec<TestResult> {
        self.run(&Selection {
            category: Some(category.to_owned()),
            filter: None,
        })
    }

    /// Run the groups or sub-tests whose names contain `filter`.
    pub fn run_matching(&self, filter: &str) -> Vec<TestResult> {
        self.run(&Selection {
            category: None,
            filter: Some(filter.to_owned()),
        })
    }

    /// Run the groups that match `selection`. Groups that don't match at all are left out of the
    /// results.
    pub fn run(&self, selection: &Selection) -> Vec<TestResult> {
        let mut results = Vec::new();
        for test in &self.tests {
            if let Some(category) = &selection.category {
                if test.category != category.as_str() {
                    continue;
                }
            }

            // When the group's name matches the filter all of its sub-tests count
            let sub_test_filter = selection
                .filter
                .as_ref()
                .filter(|filter| !test.name.contains(filter.as_str()))
                .cloned();

            plugin_trace!("Running '{}' ({})", test.name, test.category);
            let mut context = TestContext::new(sub_test_filter);
            (test.run)(&mut context);

            if context.matched {
                results.push(context.into_result(test));
            }
        }

        if results.is_empty() {
            plugin_warn!("No tests matched {selection:?}");
        }

        results
    }
}

/// The total number of failed expectations.
pub fn total_failures(results: &[TestResult]) -> u32 {
    results.iter().map(|result| result.failures).sum()
}

/// Write one line per group followed by a summary line. Returns the total number of failures.
pub fn write_report(results: &[TestResult], mut out: impl Write) -> io::Result<u32> {
    for result in results {
        writeln!(
            out,
            "Test: {} - {} passed, {} failed",
            result.name, result.passes, result.failures
        )?;
    }

    let failures = total_failures(results);
    writeln!(out)?;
    if failures > 0 {
        writeln!(out, "{failures} test(s) failed!")?;
    } else {
        writeln!(out, "All tests passed!")?;
    }

    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing(ctx: &mut TestContext) {
        ctx.begin_test("First");
        ctx.expect(true, "always");
        ctx.begin_test("Second");
        ctx.expect_eq(2 + 2, 4, "math");
    }

    fn failing(ctx: &mut TestContext) {
        ctx.begin_test("Broken thing");
        ctx.expect(false, "this is broken");
        ctx.begin_test("Fine thing");
        ctx.expect_within_absolute_error(1.05, 1.0, 0.1, "close enough");
    }

    fn runner() -> TestRunner {
        TestRunner::new(vec![
            UnitTest {
                name: "Alpha Tests",
                category: "one",
                run: passing,
            },
            UnitTest {
                name: "Beta Tests",
                category: "two",
                run: failing,
            },
        ])
    }

    #[test]
    fn run_all_collects_counts() {
        let results = runner().run_all();
        assert_eq!(results.len(), 2);
        assert_eq!((results[0].passes, results[0].failures), (2, 0));
        assert_eq!((results[1].passes, results[1].failures), (1, 1));
        assert_eq!(
            results[1].failure_messages,
            ["Broken thing: this is broken"]
        );
        assert_eq!(total_failures(&results), 1);
    }

    #[test]
    fn category_selection() {
        let results = runner().run_category("two");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Beta Tests");
        assert!(runner().run_category("three").is_empty());
    }

    #[test]
    fn filter_on_group_name() {
        let results = runner().run_matching("Alpha");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passes, 2);
    }

    #[test]
    fn filter_on_sub_test_name() {
        let results = runner().run_matching("Fine");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Beta Tests");
        assert_eq!((results[0].passes, results[0].failures), (1, 0));
    }

    #[test]
    fn filter_is_case_sensitive() {
        assert!(runner().run_matching("alpha").is_empty());
    }

    #[test]
    fn category_and_filter_intersect() {
        let selection = Selection {
            category: Some(String::from("one")),
            filter: Some(String::from("Beta")),
        };
        assert!(runner().run(&selection).is_empty());
    }

    #[test]
    fn report_format() {
        let results = runner().run_all();
        let mut out = Vec::new();
        let failures = write_report(&results, &mut out).unwrap();

        assert_eq!(failures, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Test: Alpha Tests - 2 passed, 0 failed\n\
             Test: Beta Tests - 1 passed, 1 failed\n\
             \n\
             1 test(s) failed!\n"
        );
    }

    #[test]
    fn empty_report_passes() {
        let mut out = Vec::new();
        assert_eq!(write_report(&[], &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "\nAll tests passed!\n");
    }
}
