//! Bounded affix-stripping stemmer for Indonesian.
//!
//! Follows the Nazief–Adriani family of rules: strip inflectional
//! particle and possessive-pronoun suffixes, derivational suffixes, and
//! derivational prefixes (with allomorphic recoding), validating every
//! intermediate form against an embedded root-word dictionary. Prefix
//! stripping is capped at [`MAX_PREFIX_PASSES`] and a prefix class is
//! never stripped twice, so the reducer terminates on any input; a token
//! that never reaches a known root is returned unchanged.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref ROOTS: HashSet<&'static str> = include_str!("../data/root-words.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
}

/// Upper bound on prefix-stripping passes (Indonesian words carry at
/// most two stacked derivational prefixes; three leaves headroom).
const MAX_PREFIX_PASSES: usize = 3;

const PARTICLE_SUFFIXES: &[&str] = &["lah", "kah", "tah", "pun"];
const POSSESSIVE_SUFFIXES: &[&str] = &["nya", "ku", "mu"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixClass {
    Di,
    Ke,
    Se,
    Te,
    Be,
    Me,
    Pe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DerivSuffix {
    I,
    Kan,
    An,
}

pub fn is_root(word: &str) -> bool {
    ROOTS.contains(word)
}

/// Reduce one token to its root. Tokens already in the root dictionary
/// (and tokens shorter than four characters) are returned as-is.
pub fn stem(word: &str) -> String {
    if word.chars().count() < 4 || is_root(word) {
        return word.to_string();
    }
    let variants = suffix_variants(word);
    for (candidate, _) in &variants {
        if is_root(candidate) {
            return candidate.clone();
        }
    }
    for (candidate, stripped) in &variants {
        if let Some(root) = strip_prefixes(candidate, *stripped, &[], MAX_PREFIX_PASSES) {
            return root;
        }
    }
    word.to_string()
}

/// All suffix-stripped forms of `word`, most-stripped first, tagged with
/// the derivational suffix removed (needed for confix-pair checks).
/// Always ends with the untouched word itself.
fn suffix_variants(word: &str) -> Vec<(String, Option<DerivSuffix>)> {
    let mut stems = vec![word.to_string()];
    for particle in PARTICLE_SUFFIXES {
        if let Some(s) = strip_suffix_min(word, particle) {
            stems.insert(0, s);
        }
    }
    let mut with_possessive = Vec::new();
    for base in &stems {
        for possessive in POSSESSIVE_SUFFIXES {
            if let Some(s) = strip_suffix_min(base, possessive) {
                with_possessive.push(s);
            }
        }
    }
    with_possessive.extend(stems);

    let mut out: Vec<(String, Option<DerivSuffix>)> = Vec::new();
    for base in &with_possessive {
        if let Some(s) = strip_suffix_min(base, "kan") {
            out.push((s, Some(DerivSuffix::Kan)));
        }
        if let Some(s) = strip_suffix_min(base, "an") {
            out.push((s, Some(DerivSuffix::An)));
        }
        if let Some(s) = strip_suffix_min(base, "i") {
            out.push((s, Some(DerivSuffix::I)));
        }
    }
    for base in with_possessive {
        out.push((base, None));
    }
    let mut seen = HashSet::new();
    out.retain(|entry| seen.insert(entry.clone()));
    out
}

/// Strip `suffix` if the remainder keeps at least two characters.
fn strip_suffix_min(word: &str, suffix: &str) -> Option<String> {
    let rest = word.strip_suffix(suffix)?;
    if rest.chars().count() < 2 {
        return None;
    }
    Some(rest.to_string())
}

/// Depth-bounded search over prefix-stripped candidates. Returns the
/// first dictionary-validated root, or `None` once passes run out.
fn strip_prefixes(
    word: &str,
    stripped: Option<DerivSuffix>,
    used: &[PrefixClass],
    passes_left: usize,
) -> Option<String> {
    if passes_left == 0 {
        return None;
    }
    for (class, candidate) in prefix_candidates(word) {
        if used.contains(&class) || forbidden_pair(class, stripped) {
            continue;
        }
        if candidate.chars().count() < 2 {
            continue;
        }
        if is_root(&candidate) {
            return Some(candidate);
        }
        let mut next_used = used.to_vec();
        next_used.push(class);
        if let Some(root) = strip_prefixes(&candidate, stripped, &next_used, passes_left - 1) {
            return Some(root);
        }
    }
    None
}

/// Confix pairs that never co-occur in Indonesian morphology.
fn forbidden_pair(class: PrefixClass, stripped: Option<DerivSuffix>) -> bool {
    use DerivSuffix::*;
    use PrefixClass::*;
    matches!(
        (class, stripped),
        (Be, Some(I))
            | (Di, Some(An))
            | (Ke, Some(I))
            | (Ke, Some(Kan))
            | (Me, Some(An))
            | (Se, Some(I))
            | (Se, Some(Kan))
            | (Te, Some(An))
    )
}

fn starts_with_vowel(s: &str) -> bool {
    matches!(s.chars().next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// One stripping step: every plausible (prefix class, remainder) pair,
/// including allomorphic restorations. More specific prefixes come
/// first so e.g. `meng-` wins over `me-` when both could match.
fn prefix_candidates(word: &str) -> Vec<(PrefixClass, String)> {
    use PrefixClass::*;
    let mut out = Vec::new();

    if let Some(r) = word.strip_prefix("di") {
        out.push((Di, r.to_string()));
    }
    if let Some(r) = word.strip_prefix("ke") {
        out.push((Ke, r.to_string()));
    }
    if let Some(r) = word.strip_prefix("se") {
        out.push((Se, r.to_string()));
    }

    if let Some(r) = word.strip_prefix("ter") {
        out.push((Te, r.to_string()));
        if starts_with_vowel(r) {
            // ter + r-initial root: "terasa" -> rasa
            out.push((Te, format!("r{r}")));
        }
    } else if let Some(r) = word.strip_prefix("te") {
        out.push((Te, r.to_string()));
    }

    if let Some(r) = word.strip_prefix("bel") {
        // "belajar" -> ajar, with l-restoration for pe/be + l-initial roots
        out.push((Be, r.to_string()));
        out.push((Be, format!("l{r}")));
    } else if let Some(r) = word.strip_prefix("ber") {
        out.push((Be, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Be, format!("r{r}")));
        }
    } else if let Some(r) = word.strip_prefix("be") {
        out.push((Be, r.to_string()));
    }

    if let Some(r) = word.strip_prefix("menge") {
        // menge + monosyllabic root: "mengebom" -> bom
        out.push((Me, r.to_string()));
    }
    if let Some(r) = word.strip_prefix("meny") {
        if starts_with_vowel(r) {
            out.push((Me, format!("s{r}")));
        }
        out.push((Me, format!("ny{r}")));
    } else if let Some(r) = word.strip_prefix("meng") {
        out.push((Me, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Me, format!("k{r}")));
        }
    } else if let Some(r) = word.strip_prefix("men") {
        out.push((Me, r.to_string()));
        if starts_with_vowel(r) {
            // nasal assimilation is ambiguous: "menulis" -> tulis,
            // "menilai" -> nilai
            out.push((Me, format!("t{r}")));
            out.push((Me, format!("n{r}")));
        }
    } else if let Some(r) = word.strip_prefix("mem") {
        out.push((Me, r.to_string()));
        if starts_with_vowel(r) {
            // "memilih" -> pilih, "memakan" -> makan
            out.push((Me, format!("p{r}")));
            out.push((Me, format!("m{r}")));
        }
    } else if let Some(r) = word.strip_prefix("me") {
        out.push((Me, r.to_string()));
    }

    if let Some(r) = word.strip_prefix("penge") {
        out.push((Pe, r.to_string()));
    }
    if let Some(r) = word.strip_prefix("peny") {
        if starts_with_vowel(r) {
            out.push((Pe, format!("s{r}")));
        }
        out.push((Pe, format!("ny{r}")));
    } else if let Some(r) = word.strip_prefix("peng") {
        out.push((Pe, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Pe, format!("k{r}")));
        }
    } else if let Some(r) = word.strip_prefix("pen") {
        out.push((Pe, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Pe, format!("t{r}")));
            out.push((Pe, format!("n{r}")));
        }
    } else if let Some(r) = word.strip_prefix("pem") {
        out.push((Pe, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Pe, format!("p{r}")));
            out.push((Pe, format!("m{r}")));
        }
    } else if let Some(r) = word.strip_prefix("pel") {
        out.push((Pe, r.to_string()));
        out.push((Pe, format!("l{r}")));
    } else if let Some(r) = word.strip_prefix("per") {
        out.push((Pe, r.to_string()));
        if starts_with_vowel(r) {
            out.push((Pe, format!("r{r}")));
        }
    } else if let Some(r) = word.strip_prefix("pe") {
        out.push((Pe, r.to_string()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_roots_pass_through() {
        for w in ["makan", "kucing", "ikan", "sekolah", "main"] {
            assert_eq!(stem(w), w);
        }
    }

    #[test]
    fn short_tokens_are_untouched() {
        assert_eq!(stem("ke7"), "ke7");
        assert_eq!(stem("ibu"), "ibu");
        assert_eq!(stem("xy"), "xy");
    }

    #[test]
    fn strips_inflectional_suffixes() {
        assert_eq!(stem("makanlah"), "makan");
        assert_eq!(stem("kucingnya"), "kucing");
        assert_eq!(stem("bukumu"), "buku");
        assert_eq!(stem("rumahkulah"), "rumah");
    }

    #[test]
    fn strips_derivational_suffixes() {
        assert_eq!(stem("makanan"), "makan");
        assert_eq!(stem("gerakan"), "gerak");
        assert_eq!(stem("berikan"), "beri");
    }

    #[test]
    fn strips_prefix_allomorphs() {
        assert_eq!(stem("membaca"), "baca");
        assert_eq!(stem("memilih"), "pilih");
        assert_eq!(stem("menulis"), "tulis");
        assert_eq!(stem("mendengar"), "dengar");
        assert_eq!(stem("menggonggong"), "gonggong");
        assert_eq!(stem("mengambil"), "ambil");
        assert_eq!(stem("menyapu"), "sapu");
        assert_eq!(stem("menyanyi"), "nyanyi");
        assert_eq!(stem("mengebom"), "bom");
        assert_eq!(stem("bermain"), "main");
        assert_eq!(stem("beracun"), "racun");
        assert_eq!(stem("belajar"), "ajar");
        assert_eq!(stem("terlihat"), "lihat");
        assert_eq!(stem("terasa"), "rasa");
        assert_eq!(stem("dimakan"), "makan");
        assert_eq!(stem("pelari"), "lari");
    }

    #[test]
    fn strips_confixes() {
        assert_eq!(stem("ketakutan"), "takut");
        assert_eq!(stem("kemerdekaan"), "merdeka");
        assert_eq!(stem("pelajaran"), "ajar");
        assert_eq!(stem("ditawarkan"), "tawar");
        assert_eq!(stem("memakan"), "makan");
    }

    #[test]
    fn stacked_prefixes_within_pass_bound() {
        assert_eq!(stem("mempermainkan"), "main");
        assert_eq!(stem("memperbarui"), "baru");
    }

    #[test]
    fn unknown_tokens_come_back_unchanged() {
        assert_eq!(stem("zzyqx"), "zzyqx");
        assert_eq!(stem("blorbification"), "blorbification");
    }

    #[test]
    fn terminates_on_pathological_affix_chains() {
        let pathological = "mememememememememememe";
        assert_eq!(stem(pathological), pathological);
        let spiky = "berberberberan";
        // whatever comes back, it must be stable under a second pass
        let once = stem(spiky);
        assert_eq!(stem(&once), once);
    }

    #[test]
    fn idempotent_on_every_output() {
        for w in ["mempermainkan", "makanan", "kucingnya", "zzyqx", "terlihat"] {
            let once = stem(w);
            assert_eq!(stem(&once), once, "stem not idempotent for {w}");
        }
    }
}

