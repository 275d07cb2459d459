use std::fmt;

/// Outcome of a failed symbolic lookup. `Ambiguous` carries the surviving
/// candidates so callers can show the user what almost matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    NotFound { input: String },
    Ambiguous { input: String, candidates: Vec<String> },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotFound { input } => write!(f, "{input:?} matches nothing"),
            MatchError::Ambiguous { input, candidates } => {
                write!(f, "{input:?} is ambiguous: {}", candidates.join(", "))
            }
        }
    }
}

impl std::error::Error for MatchError {}

/// Lowercase with punctuation and whitespace stripped, so "Left_outer" and
/// "left outer" compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve `input` against named candidates through five tiers, strictest
/// first: exact, case-insensitive, punctuation-normalized, prefix,
/// substring. The first tier with exactly one hit wins; a tier with several
/// hits is ambiguous even if a later tier would be unique.
pub fn resolve<T: Clone>(input: &str, candidates: &[(String, T)]) -> Result<T, MatchError> {
    let tiers: [&dyn Fn(&str, &str) -> bool; 5] = [
        &|name, input| name == input,
        &|name, input| name.eq_ignore_ascii_case(input),
        &|name, input| normalize(name) == normalize(input),
        &|name, input| normalize(name).starts_with(&normalize(input)),
        &|name, input| normalize(name).contains(&normalize(input)),
    ];

    for tier in tiers {
        let hits: Vec<&(String, T)> = candidates
            .iter()
            .filter(|(name, _)| tier(name, input))
            .collect();
        match hits.as_slice() {
            [] => continue,
            [(_, value)] => return Ok(value.clone()),
            _ => {
                return Err(MatchError::Ambiguous {
                    input: input.to_string(),
                    candidates: hits.iter().map(|(name, _)| name.clone()).collect(),
                });
            }
        }
    }
    Err(MatchError::NotFound {
        input: input.to_string(),
    })
}

/// Convenience for the static `(id, name)` tables.
pub fn resolve_id(input: &str, table: &[(u8, &str)]) -> Result<u8, MatchError> {
    let candidates: Vec<(String, u8)> = table
        .iter()
        .map(|&(id, name)| (name.to_string(), id))
        .collect();
    resolve(input, &candidates)
}
