use matchable::{Matchable, matchable};

#[matchable(unescape)]
#[allow(non_camel_case_types)]
pub enum Status {
    invalid_spc_input,
    timed_spc_out,
    O_pl_n_pr_,
    #[matchable(rename = "renamed wins")]
    esc_renamed,
    esc_17,
    esc_type,
    r#match,
}

#[matchable]
#[allow(non_camel_case_types)]
pub enum Keyword {
    r#type,
    r#fn,
    #[matchable(rename = "_spc_")]
    Literal,
}

#[test]
fn unescaped_display_strings() {
    assert_eq!(Status::invalid_spc_input.as_str(), "invalid input");
    assert_eq!(Status::from_string("timed out"), Some(Status::timed_spc_out));
    assert_eq!(Status::O_pl_n_pr_.as_str(), "O(n)");
    assert_eq!(Status::esc_17.as_str(), "17");
    assert_eq!(Status::esc_type.as_str(), "type");
    assert_eq!(Status::r#match.as_str(), "match");
}

#[test]
fn rename_takes_precedence() {
    assert_eq!(Status::esc_renamed.as_str(), "renamed wins");
    assert_eq!(Keyword::Literal.as_str(), "_spc_");
}

#[test]
fn identifiers_are_kept() {
    assert_eq!(Status::timed_spc_out.identifier_str(), "timed_spc_out");
    assert_eq!(
        Status::from_identifier_string("esc_17"),
        Some(Status::esc_17)
    );
    assert_eq!(Status::r#match.identifier_str(), "r#match");
}

#[test]
fn raw_identifiers_without_unescape() {
    assert_eq!(Keyword::r#type.as_str(), "type");
    assert_eq!(Keyword::from_string("fn"), Some(Keyword::r#fn));
    assert_eq!(Keyword::r#fn.identifier_str(), "r#fn");
}
