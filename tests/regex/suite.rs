use regex_subset::{Builder, Regex};

use ret::{CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{suite, untestify_kind, Result};

/// Runs the test suite with the default configuration.
#[test]
fn default() -> Result<()> {
    let builder = Regex::builder();
    TestRunner::new()?
        .test_iter(suite()?.iter(), compiler(builder))
        .assert();
    Ok(())
}

/// Runs the test suite with prefilters disabled.
#[test]
fn no_prefilter() -> Result<()> {
    let mut builder = Regex::builder();
    builder.configure(Regex::config().prefilter(false));
    TestRunner::new()?
        .test_iter(suite()?.iter(), compiler(builder))
        .assert();
    Ok(())
}

/// Runs the test suite with a generous bound on the number of DFA states.
/// None of the tests should come close to it.
#[test]
fn state_limit() -> Result<()> {
    let mut builder = Regex::builder();
    builder.configure(Regex::config().dfa_state_limit(Some(1_000)));
    TestRunner::new()?
        .test_iter(suite()?.iter(), compiler(builder))
        .assert();
    Ok(())
}

fn compiler(
    mut builder: Builder,
) -> impl FnMut(&RegexTest, &str) -> Result<CompiledRegex> {
    move |test, regex| {
        let kind = untestify_kind(test.match_kind());
        builder.configure(Regex::config().match_kind(kind));
        let re = builder.build(regex)?;
        Ok(CompiledRegex::compiled(move |test| -> TestResult {
            run_test(&re, test)
        }))
    }
}

fn run_test(re: &Regex, test: &RegexTest) -> TestResult {
    match test.search_kind() {
        ret::SearchKind::IsMatch => {
            TestResult::is_match(re.is_match(test.input())).name("is_match")
        }
        ret::SearchKind::Search => {
            TestResult::is_match(re.search(test.input())).name("search")
        }
    }
}
