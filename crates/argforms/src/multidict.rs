//! A read-only multi-value view of parsed command-line arguments.
//!
//! [`Multidict`] wraps [`MultiValueDict`] to give forms a key → values
//! mapping, whether the values came from a parsed [`clap::ArgMatches`] or
//! were supplied directly (in tests, or by callers with their own parser).

use argforms_core::utils::MultiValueDict;
use clap::parser::ValueSource;
use clap::ArgMatches;

/// An immutable mapping from argument ids to the raw strings supplied.
///
/// # Examples
///
/// ```
/// use argforms::Multidict;
///
/// let args = Multidict::from_pairs([("color", "red"), ("color", "blue"), ("size", "large")]);
/// assert_eq!(args.get("color"), Some("red"));
/// assert_eq!(args.get_list("color"), Some(&["red".to_string(), "blue".to_string()][..]));
/// assert_eq!(args.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multidict {
    data: MultiValueDict<String, String>,
}

impl Multidict {
    /// Creates an empty `Multidict`.
    pub const fn new() -> Self {
        Self {
            data: MultiValueDict::new(),
        }
    }

    /// Builds a `Multidict` from key/value pairs, keeping repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }

    /// Collects the values the user supplied in `matches`.
    ///
    /// Only values given on the command line or through an environment
    /// variable are included; clap defaults are left out so that the form
    /// can apply its own defaults.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut data = MultiValueDict::new();
        for id in matches.ids() {
            let supplied = matches!(
                matches.value_source(id.as_str()),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            );
            if !supplied {
                continue;
            }
            let Ok(Some(raw)) = matches.try_get_raw(id.as_str()) else {
                continue;
            };
            data.extend(
                id.as_str().to_string(),
                raw.map(|value| value.to_string_lossy().into_owned()),
            );
        }
        tracing::debug!(keys = data.len(), "collected supplied arguments");
        Self { data }
    }

    /// Returns the first value for `key`, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.first(key).map(String::as_str)
    }

    /// Returns all values for `key`, or `None` if it is absent.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.data.get_list(key)
    }

    /// Returns `true` if `key` was supplied.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Iterates over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no keys are present.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FromIterator<(String, String)> for Multidict {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
