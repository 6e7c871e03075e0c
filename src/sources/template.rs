//! Template substitution.

use crate::domain::UrlTemplate;

/// One URL per fragment: `base[..start] + fragment + base[end..]`.
///
/// Fragments may be longer or shorter than the window; the tail after `end` is kept
/// as-is. The result is not validated as a URL.
pub fn expand_urls(template: &UrlTemplate, fragments: &[String]) -> Vec<String> {
    let base = template.base_url();
    let head = &base[..template.start()];
    let tail = &base[template.end()..];

    fragments
        .iter()
        .map(|fragment| {
            let mut url = String::with_capacity(head.len() + fragment.len() + tail.len());
            url.push_str(head);
            url.push_str(fragment);
            url.push_str(tail);
            url
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_window_verbatim() {
        let template = UrlTemplate::new("XXXXXXXXXXXXXXXXXXXXXX", 10, 12).unwrap();
        let urls = expand_urls(&template, &["AB".to_string()]);
        assert_eq!(urls, ["XXXXXXXXXXABXXXXXXXXXX"]);
    }

    #[test]
    fn head_and_tail_survive_any_fragment_length() {
        let base = "https://host/path/0123456789";
        let template = UrlTemplate::new(base, 20, 23).unwrap();
        for fragment in ["", "Q", "QRSTUV"] {
            let urls = expand_urls(&template, &[fragment.to_string()]);
            let url = &urls[0];
            assert_eq!(&url[..20], &base[..20]);
            assert_eq!(&url[20 + fragment.len()..], &base[23..]);
        }
    }
}
