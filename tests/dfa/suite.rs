use regex_subset::{
    dfa::{Determinizer, DFA},
    nfa::thompson::NFA,
    util::{alphabet::Units, id::StateID},
};

use ret::{CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{suite, Result};

/// Runs the test suite by walking a DFA directly, without going through
/// `Regex`. This exercises the public automaton APIs and checks that the
/// search routines in `Regex` agree with a straight-forward walk.
#[test]
fn walk_default() -> Result<()> {
    TestRunner::new()?
        .test_iter(suite()?.iter(), |_, regex| {
            let nfa = NFA::new(regex)?;
            let dfa = DFA::new(&nfa)?;
            Ok(CompiledRegex::compiled(move |test| -> TestResult {
                run_test(&dfa, test)
            }))
        })
        .assert();
    Ok(())
}

/// Like `walk_default`, but determinizes with a state limit.
#[test]
fn walk_state_limit() -> Result<()> {
    let det = Determinizer::new().state_limit(Some(1_000));
    TestRunner::new()?
        .test_iter(suite()?.iter(), |_, regex| {
            let nfa = NFA::new(regex)?;
            let dfa = det.build(&nfa)?;
            Ok(CompiledRegex::compiled(move |test| -> TestResult {
                run_test(&dfa, test)
            }))
        })
        .assert();
    Ok(())
}

fn run_test(dfa: &DFA, test: &RegexTest) -> TestResult {
    let full = test.match_kind() == ret::MatchKind::Full;
    let input = test.input();
    if input.is_empty() {
        return TestResult::is_match(dfa.accepts_empty());
    }
    let matched = match test.search_kind() {
        ret::SearchKind::IsMatch => walk(dfa, dfa.text_start(), input, full),
        ret::SearchKind::Search => {
            walk(dfa, dfa.text_start(), input, full)
                || (1..=input.len())
                    .filter(|&at| input.is_char_boundary(at))
                    .any(|at| walk(dfa, dfa.start(), &input[at..], full))
        }
    };
    TestResult::is_match(matched)
}

fn walk(dfa: &DFA, start: StateID, haystack: &str, full: bool) -> bool {
    let mut sid = start;
    for unit in Units::new(haystack) {
        if !full && dfa.state(sid).is_accept() {
            return true;
        }
        sid = match dfa.next_state(sid, unit) {
            None => return false,
            Some(sid) => sid,
        };
    }
    dfa.accepts_at_end(sid)
}
