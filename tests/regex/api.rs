use std::error::Error;

use regex_subset::{ErrorKind, MatchKind, Regex};

// The scenarios used to introduce the library all behave as advertised
// through the top-level convenience routines.
#[test]
fn one_off_routines() -> Result<(), Box<dyn Error>> {
    assert!(regex_subset::is_match("ab", "ab")?);
    assert!(!regex_subset::is_match("ab", "ba")?);
    assert!(regex_subset::is_match("(a|b)", "a")?);
    assert!(regex_subset::is_match("(a|b)", "b")?);
    assert!(!regex_subset::is_match("(a|b)", "c")?);
    assert!(regex_subset::is_match("(a|b)a+", "aaaaafoobar")?);
    assert!(!regex_subset::is_match("(a|b)a+", "a")?);
    assert!(regex_subset::search("(abc)(def)+", "xzvfabcdefdefdeffffff")?);
    assert!(!regex_subset::search("(abc)(def)+", "xzvfabc")?);

    let re = regex_subset::compile("^(ab){3,5}$")?;
    assert!(re.is_match("ababab"));
    assert!(re.is_match("ababababab"));
    assert!(!re.is_match("ab"));
    assert!(!re.is_match("abababababab"));
    Ok(())
}

// A pattern that fails to compile is reported through the one-off routines
// rather than treated as a non-match.
#[test]
fn one_off_error() {
    let err = regex_subset::is_match("a{3,2}", "aaa").unwrap_err();
    assert_eq!(
        &ErrorKind::InvalidRepetitionRange { min: 3, max: 2 },
        err.kind()
    );
    assert!(err.is_syntax());
    assert!(regex_subset::search("(a", "a").is_err());
}

// A configured state limit surfaces as an error that is not a syntax error.
#[test]
fn state_limit_exceeded() {
    let err = Regex::builder()
        .configure(Regex::config().dfa_state_limit(Some(3)))
        .build("[ab]*a[ab]{4}")
        .unwrap_err();
    assert_eq!(&ErrorKind::TooManyStates { limit: 3 }, err.kind());
    assert!(!err.is_syntax());
}

// Configuration is layered: options not set by a later call are kept.
#[test]
fn configure_layers() -> Result<(), Box<dyn Error>> {
    let mut builder = Regex::builder();
    builder.configure(Regex::config().match_kind(MatchKind::Full));
    builder.configure(Regex::config().prefilter(false));
    let re = builder.build("ab")?;
    assert_eq!(MatchKind::Full, re.match_kind());
    assert!(!re.has_prefilter());
    assert!(!re.is_match("abc"));
    Ok(())
}

#[test]
fn accessors() -> Result<(), Box<dyn Error>> {
    let re = Regex::new("a|b")?;
    assert_eq!("a|b", re.pattern());
    assert_eq!(MatchKind::Earliest, re.match_kind());
    assert!(re.has_prefilter());
    assert!(!re.nfa().is_empty());
    assert!(!re.dfa().is_empty());
    assert!(!re.dfa().state(re.dfa().start()).is_accept());
    Ok(())
}

// A cloned regex behaves identically to the original.
#[test]
fn clone() -> Result<(), Box<dyn Error>> {
    let re = Regex::new(r"\d+-\d+")?;
    let re2 = re.clone();
    for haystack in &["12-34", "x12-34", "12-", "-34"] {
        assert_eq!(re.is_match(haystack), re2.is_match(haystack));
        assert_eq!(re.search(haystack), re2.search(haystack));
    }
    Ok(())
}

// The prefilter must never change the outcome of a search.
#[test]
fn prefilter_agrees() -> Result<(), Box<dyn Error>> {
    let with = Regex::new("(x|y)z+")?;
    let without = Regex::builder()
        .configure(Regex::config().prefilter(false))
        .build("(x|y)z+")?;
    assert!(with.has_prefilter());
    assert!(!without.has_prefilter());
    let haystacks = &[
        "", "x", "xz", "ayz", "aaaaaaaaaaxz", "axaybz", "ééyz", "zzzz",
    ];
    for haystack in haystacks {
        assert_eq!(
            without.search(haystack),
            with.search(haystack),
            "haystack: {:?}",
            haystack
        );
    }
    Ok(())
}

#[test]
fn oibits() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Regex>();
    assert_send_sync::<regex_subset::Error>();
}
