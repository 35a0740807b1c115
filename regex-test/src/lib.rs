/*!
Loads yes/no regex match tests from TOML and runs them against a matcher.

Each test names a pattern, an input and the expected outcome:

```toml
[[tests]]
name = "counted"
regex = "^(ab){3,5}$"
input = "ababab"
match = true
match_kind = "full"      # or "earliest" (the default)
search_kind = "search"   # or "is-match" (the default)
```

A pattern that must be rejected sets `compiles = false` and omits `match`.
*/

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Substrings of full test names to run (or, prefixed with `-`, to skip).
const ENV_REGEX_TEST: &str = "REGEX_TEST";
/// When set to `1`, every test's outcome is printed.
const ENV_REGEX_TEST_VERBOSE: &str = "REGEX_TEST_VERBOSE";

/// Every test loaded so far, in load order.
#[derive(Clone, Debug, Default)]
pub struct RegexTests {
    tests: Vec<RegexTest>,
    names: HashSet<String>,
}

#[derive(Deserialize)]
struct TestFile {
    tests: Vec<RegexTest>,
}

/// One pattern, one input and the expected outcome.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexTest {
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    regex: String,
    input: String,
    #[serde(rename = "match")]
    expected: Option<bool>,
    #[serde(default = "yes")]
    compiles: bool,
    #[serde(default)]
    match_kind: MatchKind,
    #[serde(default)]
    search_kind: SearchKind,
}

/// How much of the input a walk must consume before it may report a match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Report a match as soon as any prefix is accepted.
    Earliest,
    /// Report a match only if the whole remaining input is accepted.
    Full,
}

impl Default for MatchKind {
    fn default() -> MatchKind {
        MatchKind::Earliest
    }
}

/// Where matching may begin.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    /// Matching begins at the start of the input only.
    IsMatch,
    /// Matching may begin at any offset in the input.
    Search,
}

impl Default for SearchKind {
    fn default() -> SearchKind {
        SearchKind::IsMatch
    }
}

impl RegexTests {
    pub fn new() -> RegexTests {
        RegexTests::default()
    }

    /// Parse a TOML document of tests and add them under `group`.
    ///
    /// A test without a name is named by its 1-based position among the
    /// unnamed tests of the document. Full names are `group/name` and must
    /// be unique across everything loaded.
    pub fn load_slice(&mut self, group: &str, data: &[u8]) -> Result<()> {
        let file: TestFile = toml::from_slice(data)
            .with_context(|| format!("invalid TOML in group '{}'", group))?;
        let mut unnamed = 0;
        for mut test in file.tests {
            if test.name.is_empty() {
                unnamed += 1;
                test.name = unnamed.to_string();
            }
            test.full_name = format!("{}/{}", group, test.name);
            test.check()
                .with_context(|| format!("bad test '{}'", test.full_name))?;
            if !self.names.insert(test.full_name.clone()) {
                bail!("test name '{}' is used twice", test.full_name);
            }
            self.tests.push(test);
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegexTest> {
        self.tests.iter()
    }
}

impl RegexTest {
    fn check(&self) -> Result<()> {
        match (self.compiles, self.expected) {
            (true, None) => bail!("'match' is required"),
            (false, Some(_)) => {
                bail!("'match' makes no sense with 'compiles = false'")
            }
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group and name joined by `/`. This is what `REGEX_TEST` filters
    /// on.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn regex(&self) -> &str {
        &self.regex
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    pub fn search_kind(&self) -> SearchKind {
        self.search_kind
    }

    /// The expected outcome. Always false when the regex must not compile.
    pub fn is_match(&self) -> bool {
        self.expected == Some(true)
    }

    pub fn compiles(&self) -> bool {
        self.compiles
    }
}

/// A compiled regex, as a closure that runs it on a test's input.
pub struct CompiledRegex(Box<dyn Fn(&RegexTest) -> TestResult>);

impl CompiledRegex {
    pub fn compiled(
        run: impl Fn(&RegexTest) -> TestResult + 'static,
    ) -> CompiledRegex {
        CompiledRegex(Box::new(run))
    }
}

impl fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("CompiledRegex(..)")
    }
}

/// The outcome of running a compiled regex, tagged with the routine that
/// produced it.
#[derive(Clone, Debug)]
pub struct TestResult {
    matched: bool,
    routine: String,
}

impl TestResult {
    pub fn is_match(matched: bool) -> TestResult {
        TestResult { matched, routine: String::new() }
    }

    /// Name the routine that produced this result, for failure reports.
    pub fn name(mut self, routine: &str) -> TestResult {
        self.routine = routine.to_string();
        self
    }
}

/// Runs tests and collects failures, panicking in [`TestRunner::assert`] if
/// there were any.
///
/// `REGEX_TEST` holds comma separated substrings of full test names. A
/// substring prefixed with `-` excludes the tests it matches. If any
/// substring is not prefixed, only tests matching some substring run. When
/// several substrings match a test, the last one decides.
#[derive(Debug)]
pub struct TestRunner {
    filters: Vec<(bool, String)>,
    verbose: bool,
    passed: usize,
    skipped: usize,
    failures: Vec<Failure>,
}

#[derive(Debug)]
struct Failure {
    test: RegexTest,
    routine: String,
    reason: Reason,
}

#[derive(Debug)]
enum Reason {
    WrongAnswer,
    ShouldNotCompile,
    DidNotCompile(String),
    PanicWhileCompiling(String),
    PanicWhileMatching(String),
}

impl TestRunner {
    pub fn new() -> Result<TestRunner> {
        let filters = read_env(ENV_REGEX_TEST)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('-') {
                Some(rest) => (false, rest.to_string()),
                None => (true, s.to_string()),
            })
            .collect();
        Ok(TestRunner {
            filters,
            verbose: read_env(ENV_REGEX_TEST_VERBOSE)? == "1",
            passed: 0,
            skipped: 0,
            failures: vec![],
        })
    }

    /// Compile and run every selected test. `compile` receives the test
    /// and its pattern.
    pub fn test_iter<I, T>(
        &mut self,
        tests: I,
        mut compile: impl FnMut(
            &RegexTest,
            &str,
        ) -> std::result::Result<
            CompiledRegex,
            Box<dyn std::error::Error>,
        >,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<RegexTest>,
    {
        for test in tests {
            let test = test.borrow();
            if !self.selected(test) {
                self.skipped += 1;
                if self.verbose {
                    println!("skip: {}", test.full_name());
                }
                continue;
            }
            let outcome = self.run(test, &mut compile);
            if self.verbose {
                let status = if outcome.is_ok() { "pass" } else { "FAIL" };
                println!("{}: {}", status, test.full_name());
            }
            match outcome {
                Ok(()) => self.passed += 1,
                Err((routine, reason)) => self.failures.push(Failure {
                    test: test.clone(),
                    routine,
                    reason,
                }),
            }
        }
        self
    }

    fn run(
        &self,
        test: &RegexTest,
        compile: &mut impl FnMut(
            &RegexTest,
            &str,
        ) -> std::result::Result<
            CompiledRegex,
            Box<dyn std::error::Error>,
        >,
    ) -> std::result::Result<(), (String, Reason)> {
        let no_routine = String::new;
        let compiled = match catch_panic(|| compile(test, test.regex())) {
            Err(msg) => {
                return Err((no_routine(), Reason::PanicWhileCompiling(msg)))
            }
            Ok(Err(_)) if !test.compiles() => return Ok(()),
            Ok(Err(err)) => {
                return Err((
                    no_routine(),
                    Reason::DidNotCompile(err.to_string()),
                ))
            }
            Ok(Ok(_)) if !test.compiles() => {
                return Err((no_routine(), Reason::ShouldNotCompile))
            }
            Ok(Ok(compiled)) => compiled,
        };
        let result = catch_panic(|| (compiled.0)(test))
            .map_err(|msg| (no_routine(), Reason::PanicWhileMatching(msg)))?;
        if result.matched != test.is_match() {
            return Err((result.routine, Reason::WrongAnswer));
        }
        Ok(())
    }

    fn selected(&self, test: &RegexTest) -> bool {
        let mut selected = !self.filters.iter().any(|&(include, _)| include);
        for &(include, ref needle) in &self.filters {
            if test.full_name().contains(needle.as_str()) {
                selected = include;
            }
        }
        selected
    }

    /// Panic with a report of every failed test, if there were any.
    pub fn assert(&mut self) {
        if self.verbose {
            println!(
                "passed: {}, skipped: {}, failed: {}",
                self.passed,
                self.skipped,
                self.failures.len(),
            );
        }
        if self.failures.is_empty() {
            return;
        }
        let report: Vec<String> =
            self.failures.iter().map(|f| f.to_string()).collect();
        panic!(
            "{} tests failed:\n\n{}\n\n\
             REGEX_TEST=name,-other reruns only tests whose full name \
             contains 'name' but not 'other'",
            self.failures.len(),
            report.join("\n\n"),
        );
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = &self.test;
        write!(f, "{}", t.full_name())?;
        if !self.routine.is_empty() {
            write!(f, " ({})", self.routine)?;
        }
        match self.reason {
            Reason::WrongAnswer if t.is_match() => {
                write!(f, ": expected a match, found none")?
            }
            Reason::WrongAnswer => write!(f, ": expected no match, found one")?,
            Reason::ShouldNotCompile => {
                write!(f, ": compiled, but should have been rejected")?
            }
            Reason::DidNotCompile(ref err) => {
                write!(f, ": failed to compile: {}", err)?
            }
            Reason::PanicWhileCompiling(ref msg) => {
                write!(f, ": panicked while compiling: {}", msg)?
            }
            Reason::PanicWhileMatching(ref msg) => {
                write!(f, ": panicked while matching: {}", msg)?
            }
        }
        write!(
            f,
            "\n  regex: {:?}\n  input: {:?}\n  kinds: {:?}, {:?}",
            t.regex(),
            t.input(),
            t.match_kind(),
            t.search_kind(),
        )
    }
}

/// Read an environment variable, treating an unset one as empty.
fn read_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(val) => Ok(val),
        Err(std::env::VarError::NotPresent) => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("reading ${}", var)),
    }
}

fn catch_panic<T>(f: impl FnOnce() -> T) -> std::result::Result<T, String> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|p| {
        if let Some(s) = p.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = p.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        }
    })
}

fn yes() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(data: &str) -> Result<RegexTests> {
        let mut tests = RegexTests::new();
        tests.load_slice("group", data.as_bytes())?;
        Ok(tests)
    }

    fn runner(filters: &[(bool, &str)]) -> TestRunner {
        TestRunner {
            filters: filters
                .iter()
                .map(|&(include, s)| (include, s.to_string()))
                .collect(),
            verbose: false,
            passed: 0,
            skipped: 0,
            failures: vec![],
        }
    }

    const TWO: &str = r#"
[[tests]]
name = "ab"
regex = "ab"
input = "ab"
match = true

[[tests]]
name = "bad"
regex = "a{"
input = ""
compiles = false
"#;

    #[test]
    fn rejects_malformed_tests() {
        // missing regex
        assert!(load("[[tests]]\ninput = \"a\"\nmatch = true\n").is_err());
        // unknown field
        assert!(load(
            "[[tests]]\nregex = \"a\"\ninput = \"a\"\nmatch = true\nx = 0\n"
        )
        .is_err());
        // compiling test without an expectation
        assert!(load("[[tests]]\nregex = \"a\"\ninput = \"a\"\n").is_err());
        // expectation on a test that must not compile
        assert!(load(
            "[[tests]]\nregex = \"a{\"\ninput = \"\"\nmatch = false\n\
             compiles = false\n"
        )
        .is_err());
    }

    #[test]
    fn rejects_duplicate_names_across_loads() {
        let mut tests = load(TWO).unwrap();
        assert!(tests.load_slice("group", TWO.as_bytes()).is_err());
        assert!(tests.load_slice("other", TWO.as_bytes()).is_ok());
    }

    #[test]
    fn fields_and_defaults() {
        let tests = load(
            r#"
[[tests]]
regex = "(a|b)a+"
input = "aaaaafoobar"
match = true
match_kind = "full"
search_kind = "search"

[[tests]]
regex = "a{2,1}"
input = ""
compiles = false
"#,
        )
        .unwrap();
        let all: Vec<&RegexTest> = tests.iter().collect();

        assert_eq!("group/1", all[0].full_name());
        assert_eq!("(a|b)a+", all[0].regex());
        assert_eq!("aaaaafoobar", all[0].input());
        assert!(all[0].is_match());
        assert!(all[0].compiles());
        assert_eq!(MatchKind::Full, all[0].match_kind());
        assert_eq!(SearchKind::Search, all[0].search_kind());

        assert_eq!("2", all[1].name());
        assert!(!all[1].compiles());
        assert!(!all[1].is_match());
        assert_eq!(MatchKind::Earliest, all[1].match_kind());
        assert_eq!(SearchKind::IsMatch, all[1].search_kind());
    }

    #[test]
    fn filters_last_match_wins() {
        let tests = load(TWO).unwrap();
        let all: Vec<&RegexTest> = tests.iter().collect();

        assert!(runner(&[]).selected(all[0]));
        assert!(!runner(&[(false, "ab")]).selected(all[0]));
        assert!(runner(&[(false, "ab")]).selected(all[1]));
        assert!(!runner(&[(true, "bad")]).selected(all[0]));
        assert!(runner(&[(false, "group"), (true, "ab")]).selected(all[0]));
    }

    #[test]
    fn records_outcomes() {
        let tests = load(TWO).unwrap();
        let mut runner = runner(&[]);
        runner.test_iter(tests.iter(), |_, regex| {
            if regex.contains('{') {
                return Err("unclosed".into());
            }
            Ok(CompiledRegex::compiled(|t| {
                TestResult::is_match(t.input() == "ab")
            }))
        });
        assert_eq!(2, runner.passed);
        assert!(runner.failures.is_empty());

        runner.test_iter(tests.iter(), |_, _| {
            Ok(CompiledRegex::compiled(|_| panic!("boom")))
        });
        assert_eq!(2, runner.failures.len());
        assert!(matches!(
            runner.failures[0].reason,
            Reason::PanicWhileMatching(ref msg) if msg == "boom"
        ));
        assert!(matches!(runner.failures[1].reason, Reason::ShouldNotCompile));
    }
}
