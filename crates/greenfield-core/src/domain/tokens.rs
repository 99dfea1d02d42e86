//! Ordered token substitution for template rewriting.

use crate::domain::project::{ProjectName, TemplateName};

/// Ordered list of `(old, new)` substitutions derived from the template and
/// project names.
///
/// The snake-case pair is applied before the hyphenated pair so the
/// module-directory token is rewritten whole, never via a partial match on
/// the hyphenated form. Substitution is literal and byte-level: every file,
/// every occurrence, regardless of encoding.
///
/// Running the map twice over the same tree is NOT guaranteed to be a no-op;
/// the pipeline applies it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMap {
    pairs: Vec<(String, String)>,
}

impl TokenMap {
    /// Derive the two substitution pairs for a run.
    pub fn derive(template: &TemplateName, project: &ProjectName) -> Self {
        Self {
            pairs: vec![
                (template.snake_case(), project.snake_case()),
                (template.as_str().to_owned(), project.as_str().to_owned()),
            ],
        }
    }

    /// The substitution pairs, in application order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Apply every pair in order to `input`.
    ///
    /// Returns the rewritten bytes, or `None` when no pair occurred (so
    /// callers can skip the write-back).
    pub fn apply(&self, input: &[u8]) -> Option<Vec<u8>> {
        let mut current: Option<Vec<u8>> = None;
        for (old, new) in &self.pairs {
            let haystack = current.as_deref().unwrap_or(input);
            if let Some(replaced) = replace_all(haystack, old.as_bytes(), new.as_bytes()) {
                current = Some(replaced);
            }
        }
        current
    }
}

/// Literal byte-level find/replace. Returns `None` when the needle does not
/// occur in the haystack.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Option<Vec<u8>> {
    debug_assert!(!needle.is_empty());

    let mut out = Vec::with_capacity(haystack.len());
    let mut matched = false;
    let mut i = 0;
    while i < haystack.len() {
        if haystack.len() - i >= needle.len() && &haystack[i..i + needle.len()] == needle {
            out.extend_from_slice(replacement);
            i += needle.len();
            matched = true;
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    matched.then_some(out)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> TokenMap {
        let template = TemplateName::parse("st-experiment-template").unwrap();
        let project = ProjectName::parse("my-widget").unwrap();
        TokenMap::derive(&template, &project)
    }

    #[test]
    fn snake_pair_comes_first() {
        let map = map();
        assert_eq!(
            map.pairs(),
            &[
                ("st_experiment_template".into(), "my_widget".into()),
                ("st-experiment-template".into(), "my-widget".into()),
            ]
        );
    }

    #[test]
    fn both_tokens_are_replaced_everywhere() {
        let input =
            b"import st_experiment_template  # shipped with st-experiment-template\n\
              from st_experiment_template.io import load\n";
        let output = map().apply(input).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(!text.contains("st_experiment_template"));
        assert!(!text.contains("st-experiment-template"));
        assert!(text.contains("import my_widget"));
        assert!(text.contains("shipped with my-widget"));
        assert!(text.contains("from my_widget.io import load"));
    }

    #[test]
    fn untouched_input_returns_none() {
        assert_eq!(map().apply(b"nothing to see here"), None);
    }

    #[test]
    fn repeated_occurrences_on_one_line() {
        let output = map()
            .apply(b"st-experiment-template st-experiment-template")
            .unwrap();
        assert_eq!(output, b"my-widget my-widget");
    }

    #[test]
    fn substitution_works_on_non_utf8_bytes() {
        let mut input = vec![0x00, 0xff, 0xfe];
        input.extend_from_slice(b"st_experiment_template");
        input.push(0x80);

        let output = map().apply(&input).unwrap();

        let mut expected = vec![0x00, 0xff, 0xfe];
        expected.extend_from_slice(b"my_widget");
        expected.push(0x80);
        assert_eq!(output, expected);
    }

    #[test]
    fn growing_replacement_is_handled() {
        // A hyphen-free template collapses both forms onto the snake pair,
        // which runs first.
        let template = TemplateName::parse("tpl").unwrap();
        let project = ProjectName::parse("much-longer-name").unwrap();
        let map = TokenMap::derive(&template, &project);

        assert_eq!(
            map.apply(b"tpl/tpl").unwrap(),
            b"much_longer_name/much_longer_name"
        );
    }
}
