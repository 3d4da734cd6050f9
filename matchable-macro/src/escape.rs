/// Escape sequences usable in identifiers with `#[matchable(unescape)]`, and the text each stands for.
const ESCAPES: &[(&str, &str)] = &[
    ("_spc_", " "),
    ("_bng_", "!"),
    ("_qt_", "\""),
    ("_hsh_", "#"),
    ("_dol_", "$"),
    ("_pct_", "%"),
    ("_amp_", "&"),
    ("_sqt_", "'"),
    ("_pl_", "("),
    ("_pr_", ")"),
    ("_ast_", "*"),
    ("_pls_", "+"),
    ("_cma_", ","),
    ("_mns_", "-"),
    ("_dot_", "."),
    ("_slsh_", "/"),
    ("_cln_", ":"),
    ("_scln_", ";"),
    ("_lt_", "<"),
    ("_eq_", "="),
    ("_gt_", ">"),
    ("_q_", "?"),
    ("_at_", "@"),
    ("_sbl_", "["),
    ("_bslsh_", "\\"),
    ("_sbr_", "]"),
    ("_crt_", "^"),
    ("_bqt_", "`"),
    ("_cbl_", "{"),
    ("_pip_", "|"),
    ("_cbr_", "}"),
    ("_tld_", "~"),
];

/// Strips a leading `esc_`, then replaces every escape sequence.
///
/// Sequences are replaced one kind at a time in table order, scanning left to right,
/// and replaced text is never rescanned for the same kind.
pub(crate) fn unescape(identifier: &str) -> String {
    let mut text = identifier
        .strip_prefix("esc_")
        .unwrap_or(identifier)
        .to_owned();

    for (escape, replacement) in ESCAPES {
        text = text.replace(escape, replacement);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::unescape;

    #[test]
    fn sequences() {
        assert_eq!(unescape("timed_spc_out"), "timed out");
        assert_eq!(unescape("O_pl_n_pr_"), "O(n)");
        assert_eq!(unescape("a_spc__mns__spc_b"), "a - b");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn esc_prefix() {
        assert_eq!(unescape("esc_17"), "17");
        assert_eq!(unescape("esc_type"), "type");
        assert_eq!(unescape("not_esc_x"), "not_esc_x");
    }
}
