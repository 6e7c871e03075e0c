//! The hand-authored B3 listing sources.
//!
//! The last path segment of each base URL is base64 of
//! `{"language":"pt-br","pageNumber":N,"pageSize":120}`. Rewriting bytes of that
//! segment makes the endpoint serve alternate result pages.

use crate::domain::{FragmentStrategy, SourceConfig};

const LISTING_PREFIX: &str =
    "https://sistemaswebb3-listados.b3.com.br/listedCompaniesProxy/CompanyCall/GetInitialCompanies/";

const PAGE_1: &str = "eyJsYW5ndWFnZSI6InB0LWJyIiwicGFnZU51bWJlciI6MSwicGFnZVNpemUiOjEyMH0=";
const PAGE_10: &str = "eyJsYW5ndWFnZSI6InB0LWJyIiwicGFnZU51bWJlciI6MTAsInBhZ2VTaXplIjoxMjB9";
const PAGE_17: &str = "eyJsYW5ndWFnZSI6InB0LWJyIiwicGFnZU51bWJlciI6MTcsInBhZ2VTaXplIjoxMjB9";
const PAGE_20: &str = "eyJsYW5ndWFnZSI6InB0LWJyIiwicGFnZU51bWJlciI6MjAsInBhZ2VTaXplIjoxMjB9";

fn listing_url(page_segment: &str) -> String {
    format!("{LISTING_PREFIX}{page_segment}")
}

fn letters(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}

/// Default source list used when no `--sources` file is given.
pub fn builtin_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            base_url: listing_url(PAGE_1),
            start: 138,
            end: 140,
            fragments: FragmentStrategy::Product {
                outer: ('M'..='Z').collect(),
                inner: "CSiyCSiyCSiy".chars().collect(),
            },
        },
        SourceConfig {
            base_url: listing_url(PAGE_10),
            start: 140,
            end: 141,
            fragments: FragmentStrategy::Stepped {
                start: 'A',
                step: 4,
            },
        },
        SourceConfig {
            base_url: listing_url(PAGE_17),
            start: 140,
            end: 141,
            fragments: FragmentStrategy::List {
                values: letters("cgkosuw"),
            },
        },
        SourceConfig {
            base_url: listing_url(PAGE_20),
            start: 140,
            end: 141,
            fragments: FragmentStrategy::List {
                values: letters("AEIOSY"),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::enumerate_source;

    #[test]
    fn builtin_windows_are_valid() {
        for source in builtin_sources() {
            assert!(source.template().is_ok(), "bad window in {}", source.base_url);
        }
    }

    #[test]
    fn builtin_url_counts() {
        let counts: Vec<usize> = builtin_sources()
            .iter()
            .map(|s| enumerate_source(s).unwrap().len())
            .collect();
        assert_eq!(counts, [14 * 12, 7, 7, 6]);
    }

    #[test]
    fn first_source_rewrites_page_number_bytes() {
        let sources = builtin_sources();
        let urls = enumerate_source(&sources[0]).unwrap();
        assert!(urls[0].ends_with("MCwicGFnZVNpemUiOjEyMH0="));
        assert_eq!(urls[0].len(), sources[0].base_url.len());
    }
}
