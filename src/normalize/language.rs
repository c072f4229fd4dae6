//! Language code normalization to ISO 639-2/B.

use phf::phf_map;

/// ISO 639-1 two-letter codes.
static ALPHA2: phf::Map<&'static str, &'static str> = phf_map! {
    "af" => "afr", "am" => "amh", "ar" => "ara", "az" => "aze", "be" => "bel",
    "bg" => "bul", "bn" => "ben", "bo" => "tib", "bs" => "bos", "ca" => "cat",
    "cs" => "cze", "cy" => "wel", "da" => "dan", "de" => "ger", "el" => "gre",
    "en" => "eng", "eo" => "epo", "es" => "spa", "et" => "est", "eu" => "baq",
    "fa" => "per", "fi" => "fin", "fr" => "fre", "ga" => "gle", "gd" => "gla",
    "gl" => "glg", "gu" => "guj", "he" => "heb", "hi" => "hin", "hr" => "hrv",
    "ht" => "hat", "hu" => "hun", "hy" => "arm", "id" => "ind", "is" => "ice",
    "it" => "ita", "iu" => "iku", "ja" => "jpn", "ka" => "geo", "kk" => "kaz",
    "km" => "khm", "kn" => "kan", "ko" => "kor", "ku" => "kur", "la" => "lat",
    "lo" => "lao", "lt" => "lit", "lv" => "lav", "mi" => "mao", "mk" => "mac",
    "ml" => "mal", "mn" => "mon", "mr" => "mar", "ms" => "may", "mt" => "mlt",
    "my" => "bur", "nb" => "nob", "ne" => "nep", "nl" => "dut", "nn" => "nno",
    "no" => "nor", "pa" => "pan", "pl" => "pol", "ps" => "pus", "pt" => "por",
    "ro" => "rum", "ru" => "rus", "sa" => "san", "sk" => "slo", "sl" => "slv",
    "so" => "som", "sq" => "alb", "sr" => "srp", "sv" => "swe", "sw" => "swa",
    "ta" => "tam", "te" => "tel", "th" => "tha", "tl" => "tgl", "tr" => "tur",
    "uk" => "ukr", "ur" => "urd", "uz" => "uzb", "vi" => "vie", "yi" => "yid",
    "yo" => "yor", "zh" => "chi", "zu" => "zul",
};

/// ISO 639-2/T codes whose bibliographic form differs.
static TERMINOLOGIC: phf::Map<&'static str, &'static str> = phf_map! {
    "bod" => "tib", "ces" => "cze", "cym" => "wel", "deu" => "ger", "ell" => "gre",
    "eus" => "baq", "fas" => "per", "fra" => "fre", "hye" => "arm", "isl" => "ice",
    "kat" => "geo", "mkd" => "mac", "mri" => "mao", "msa" => "may", "mya" => "bur",
    "nld" => "dut", "ron" => "rum", "slk" => "slo", "sqi" => "alb", "zho" => "chi",
};

/// English language names, lower case.
static NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "afrikaans" => "afr", "albanian" => "alb", "amharic" => "amh", "arabic" => "ara",
    "armenian" => "arm", "basque" => "baq", "bengali" => "ben", "bulgarian" => "bul",
    "burmese" => "bur", "catalan" => "cat", "chinese" => "chi", "croatian" => "hrv",
    "czech" => "cze", "danish" => "dan", "dutch" => "dut", "english" => "eng",
    "esperanto" => "epo", "estonian" => "est", "finnish" => "fin", "french" => "fre",
    "georgian" => "geo", "german" => "ger", "greek" => "gre", "gujarati" => "guj",
    "haitian creole" => "hat", "hebrew" => "heb", "hindi" => "hin", "hungarian" => "hun",
    "icelandic" => "ice", "indonesian" => "ind", "irish" => "gle", "italian" => "ita",
    "japanese" => "jpn", "kannada" => "kan", "korean" => "kor", "latin" => "lat",
    "latvian" => "lav", "lithuanian" => "lit", "macedonian" => "mac", "malay" => "may",
    "maori" => "mao", "marathi" => "mar", "norwegian" => "nor", "persian" => "per",
    "polish" => "pol", "portuguese" => "por", "punjabi" => "pan", "romanian" => "rum",
    "russian" => "rus", "sanskrit" => "san", "serbian" => "srp", "slovak" => "slo",
    "slovenian" => "slv", "somali" => "som", "spanish" => "spa", "swahili" => "swa",
    "swedish" => "swe", "tagalog" => "tgl", "tamil" => "tam", "telugu" => "tel",
    "thai" => "tha", "tibetan" => "tib", "turkish" => "tur", "ukrainian" => "ukr",
    "urdu" => "urd", "vietnamese" => "vie", "welsh" => "wel", "yiddish" => "yid",
    "yoruba" => "yor", "zulu" => "zul",
};

/// Normalize one language value to its ISO 639-2/B code.
///
/// Region and script subtags are ignored (`en-US` → `eng`). Values that are
/// not recognised are returned unchanged.
pub fn normalize_language(value: &str) -> String {
    let trimmed = value.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let primary = lowered.split(['-', '_']).next().unwrap_or_default();

    let code = match primary.len() {
        2 => ALPHA2.get(primary).copied(),
        3 if primary.chars().all(|c| c.is_ascii_lowercase()) => {
            Some(TERMINOLOGIC.get(primary).copied().unwrap_or(primary))
        },
        _ => None,
    };
    code.or_else(|| NAMES.get(lowered.as_str()).copied())
        .map_or_else(|| trimmed.to_string(), str::to_string)
}

/// Normalize every value of a language field.
pub fn normalize_languages(values: &[String]) -> Vec<String> {
    values.iter().map(|value| normalize_language(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_forms() {
        assert_eq!(normalize_language("en"), "eng");
        assert_eq!(normalize_language("en-US"), "eng");
        assert_eq!(normalize_language("English"), "eng");
        assert_eq!(normalize_language(" fr_CA "), "fre");
    }

    #[test]
    fn test_terminologic_codes_map_to_bibliographic() {
        assert_eq!(normalize_language("deu"), "ger");
        assert_eq!(normalize_language("zho"), "chi");
        assert_eq!(normalize_language("eng"), "eng");
        assert_eq!(normalize_language("haw"), "haw");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(normalize_language("Klingon"), "Klingon");
        assert_eq!(normalize_language("xx"), "xx");
        assert_eq!(normalize_language(""), "");
    }
}
