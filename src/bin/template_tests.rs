use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use plugin_template::harness::{self, Selection, TestRunner};
use plugin_template::{plugin_log, util};

/// Run the plugin's lifecycle tests.
#[derive(Debug, Clone, Parser)]
#[clap(about = None, long_about = None)]
struct RunnerConfig {
    /// Only run the test groups in this category, for instance 'project'.
    #[clap(value_parser, long)]
    category: Option<String>,
    /// Only run the test groups or sub-tests whose name contains this string. Case sensitive.
    #[clap(value_parser, long)]
    filter: Option<String>,
    /// List the registered test groups and their categories instead of running them.
    #[clap(long, action)]
    list: bool,
}

fn main() -> Result<()> {
    util::setup_logger();

    let config = RunnerConfig::parse();
    let runner = TestRunner::new(harness::registry());
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    if config.list {
        for test in runner.tests() {
            writeln!(stdout, "{} ({})", test.name, test.category)
                .context("Could not write to STDOUT")?;
        }

        return Ok(());
    }

    // Empty values act like the option wasn't passed at all
    let selection = Selection {
        category: config.category.filter(|category| !category.is_empty()),
        filter: config.filter.filter(|filter| !filter.is_empty()),
    };
    if let Some(filter) = &selection.filter {
        writeln!(stdout, "Filter provided: '{filter}'").context("Could not write to STDOUT")?;
    }

    let results = runner.run(&selection);
    let failures =
        harness::write_report(&results, &mut stdout).context("Could not write the test report")?;
    stdout.flush().context("Could not write to STDOUT")?;

    if failures > 0 {
        plugin_log!("{failures} expectation(s) failed");
        std::process::exit(1);
    }

    Ok(())
}
