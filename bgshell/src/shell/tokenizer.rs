// SPDX-License-Identifier: MIT

/// Splits a line on whitespace. No quoting or escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        assert_eq!(tokenize("  bg  sleep\t100 "), vec!["bg", "sleep", "100"]);
        assert!(tokenize("   ").is_empty());
        assert_eq!(tokenize("echo \"a b\""), vec!["echo", "\"a", "b\""]);
    }
}
