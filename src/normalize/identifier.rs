//! Publication identifier recognition.
//!
//! Values arrive either prefixed with a scheme (`isbn:…`, `urn:isbn:…`,
//! `doi:…`, `https://doi.org/…`) or bare. Bare values are classified by
//! shape. Anything that does not validate against a known scheme is not an
//! identifier and is dropped by [`filter_identifiers`].

use std::fmt;

/// Identifier schemes the index understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierScheme {
    Isbn,
    Issn,
    Doi,
    Oclc,
    Lccn,
    Upc,
}

impl IdentifierScheme {
    pub const fn prefix(self) -> &'static str {
        match self {
            IdentifierScheme::Isbn => "isbn",
            IdentifierScheme::Issn => "issn",
            IdentifierScheme::Doi => "doi",
            IdentifierScheme::Oclc => "oclc",
            IdentifierScheme::Lccn => "lccn",
            IdentifierScheme::Upc => "upc",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "isbn" => Some(IdentifierScheme::Isbn),
            "issn" | "eissn" => Some(IdentifierScheme::Issn),
            "doi" => Some(IdentifierScheme::Doi),
            "oclc" | "ocolc" => Some(IdentifierScheme::Oclc),
            "lccn" => Some(IdentifierScheme::Lccn),
            "upc" => Some(IdentifierScheme::Upc),
            _ => None,
        }
    }

    /// Validate `value` against this scheme, returning its normal form.
    fn normalize(self, value: &str) -> Option<String> {
        match self {
            IdentifierScheme::Isbn => normalize_isbn(value),
            IdentifierScheme::Issn => normalize_issn(value),
            IdentifierScheme::Doi => normalize_doi(value),
            IdentifierScheme::Oclc => normalize_oclc(value, true),
            IdentifierScheme::Lccn => normalize_lccn(value),
            IdentifierScheme::Upc => normalize_upc(value),
        }
    }
}

/// A validated identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub scheme: IdentifierScheme,
    pub value: String,
}

impl Identifier {
    /// Recognise `input` as a publication identifier.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(doi) = strip_doi_resolver(input) {
            return Self::with_scheme(IdentifierScheme::Doi, doi);
        }

        let lowered = input.to_ascii_lowercase();
        for urn in ["urn:isbn:", "urn:issn:"] {
            if lowered.starts_with(urn) {
                let scheme = IdentifierScheme::from_prefix(&urn[4..8])?;
                return Self::with_scheme(scheme, &input[urn.len()..]);
            }
        }

        if let Some((prefix, rest)) = input.split_once(':') {
            if let Some(scheme) = IdentifierScheme::from_prefix(prefix.trim()) {
                return Self::with_scheme(scheme, rest);
            }
            // `(OCoLC)` style qualifiers and URLs are not bare identifiers
            if !prefix.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
        }

        classify_bare(input)
    }

    fn with_scheme(scheme: IdentifierScheme, value: &str) -> Option<Self> {
        scheme.normalize(value.trim()).map(|value| Self { scheme, value })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme.prefix(), self.value)
    }
}

/// Keep only values recognised as identifiers, in `scheme:value` form.
/// Duplicates after normalization keep their first position.
pub fn filter_identifiers(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for identifier in values.iter().filter_map(|value| Identifier::parse(value)) {
        let identifier = identifier.to_string();
        if !out.contains(&identifier) {
            out.push(identifier);
        }
    }
    out
}

fn classify_bare(input: &str) -> Option<Identifier> {
    const ORDER: [IdentifierScheme; 5] = [
        IdentifierScheme::Isbn,
        IdentifierScheme::Issn,
        IdentifierScheme::Doi,
        IdentifierScheme::Upc,
        IdentifierScheme::Lccn,
    ];
    if let Some(value) = normalize_oclc(input, false) {
        return Some(Identifier {
            scheme: IdentifierScheme::Oclc,
            value,
        });
    }
    ORDER.into_iter().find_map(|scheme| Identifier::with_scheme(scheme, input))
}

fn strip_doi_resolver(input: &str) -> Option<&str> {
    ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "http://dx.doi.org/"]
        .into_iter()
        .find_map(|resolver| input.strip_prefix(resolver))
}

fn digits_of(value: &str) -> Option<Vec<u32>> {
    value.chars().map(|c| c.to_digit(10)).collect()
}

/// Strip hyphens and spaces, which are presentation only.
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

fn normalize_isbn(value: &str) -> Option<String> {
    let compact = compact(value).to_ascii_uppercase();
    match compact.len() {
        13 => {
            let digits = digits_of(&compact)?;
            if !(compact.starts_with("978") || compact.starts_with("979")) {
                return None;
            }
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
                .sum();
            (sum % 10 == 0).then_some(compact)
        },
        10 => {
            let mut sum = 0;
            for (i, c) in compact.chars().enumerate() {
                let d = match c {
                    'X' if i == 9 => 10,
                    _ => c.to_digit(10)?,
                };
                sum += (10 - i as u32) * d;
            }
            (sum % 11 == 0).then_some(compact)
        },
        _ => None,
    }
}

fn normalize_issn(value: &str) -> Option<String> {
    let compact = compact(value).to_ascii_uppercase();
    if !compact.is_ascii() || compact.len() != 8 {
        return None;
    }
    let digits = digits_of(&compact[..7])?;
    let sum: u32 = digits.iter().zip((2..=8).rev()).map(|(d, w)| d * w).sum();
    let check = match (11 - sum % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10)?,
    };
    compact
        .ends_with(check)
        .then(|| format!("{}-{}", &compact[..4], &compact[4..]))
}

fn normalize_doi(value: &str) -> Option<String> {
    let value = strip_doi_resolver(value).unwrap_or(value).trim();
    let (prefix, suffix) = value.split_once('/')?;
    let registrant = prefix.strip_prefix("10.")?;
    if registrant.is_empty() || suffix.is_empty() || value.contains(char::is_whitespace) {
        return None;
    }
    Some(value.to_lowercase())
}

/// OCLC numbers: digits, optionally behind `(OCoLC)`, `ocm`, `ocn` or
/// `on`. Without an explicit scheme a prefix is required, since bare digits
/// are indistinguishable from other numbers.
fn normalize_oclc(value: &str, explicit: bool) -> Option<String> {
    let value = value.trim();
    let value = value.strip_prefix("(OCoLC)").unwrap_or(value);
    let (digits, prefixed) = ["ocm", "ocn", "on"]
        .into_iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .map_or((value, false), |rest| (rest, true));
    if !(explicit || prefixed) || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.trim_start_matches('0').to_string()).filter(|d| !d.is_empty())
}

/// LCCN: an optional alphabetic prefix of up to three letters followed by
/// eight to ten digits.
fn normalize_lccn(value: &str) -> Option<String> {
    let compact: String = value.split_whitespace().collect::<String>().to_ascii_lowercase();
    let compact = match compact.split_once('-') {
        // `2001-12345` is the hyphenated form of `2001012345`
        Some((year, serial)) if serial.len() <= 6 => format!("{year}{serial:0>6}"),
        Some(_) => return None,
        None => compact,
    };
    let split = compact
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(compact.len());
    let (letters, digits) = compact.split_at(split);
    let valid = letters.len() <= 3
        && letters.chars().all(|c| c.is_ascii_lowercase())
        && (8..=10).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());
    valid.then_some(compact)
}

fn normalize_upc(value: &str) -> Option<String> {
    let compact = compact(value);
    if compact.len() != 12 {
        return None;
    }
    let digits = digits_of(&compact)?;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (sum % 10 == 0).then_some(compact)
}
