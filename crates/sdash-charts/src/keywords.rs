//! Keyword frequency and topic matching over comment text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Keywords returned by [`extract_keywords`].
pub const TOP_KEYWORDS: usize = 10;
/// Topics returned by [`match_topics`].
pub const TOP_TOPICS: usize = 5;
/// Tokens this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 3;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("valid punctuation regex"));

/// Spanish and English words too common to say anything.
pub(crate) const STOP_WORDS: &[&str] = &[
    // Spanish
    "para", "pero", "como", "este", "esta", "esto", "estos", "estas", "eso", "esos", "aquí",
    "allí", "también", "porque", "cuando", "donde", "muy", "más", "menos", "todo", "todos",
    "toda", "todas", "nada", "algo", "sobre", "entre", "desde", "hasta", "hacia", "sin", "con",
    "ellos", "ellas", "nosotros", "usted", "ustedes", "ser", "estar", "tiene", "tienen",
    "hace", "hacer", "puede", "pueden", "fue", "son", "está", "están", "era", "han", "hay",
    "sus", "una", "unos", "unas", "del", "las", "los", "que", "qué", "cual", "cuál", "quien",
    "siempre", "nunca", "solo", "sólo", "gracias", "bien", "ahora", "entonces", "mismo",
    "otra", "otro", "otros", "cada", "mucho", "mucha", "muchos", "muchas",
    // English
    "this", "that", "these", "those", "with", "from", "have", "has", "had", "were", "been",
    "being", "what", "when", "where", "which", "while", "there", "their", "them", "they",
    "your", "yours", "about", "would", "could", "should", "will", "just", "than", "then",
    "very", "really", "more", "most", "some", "such", "only", "also", "into", "over",
    "after", "before", "because", "here", "like", "does", "doing", "thanks",
];

/// Fixed topic vocabularies. A comment matches a topic when it contains any
/// of its keywords.
pub(crate) const TOPICS: &[(&str, &[&str])] = &[
    (
        "Precio",
        &["precio", "caro", "barato", "costo", "coste", "oferta", "descuento", "price", "expensive", "cheap", "discount"],
    ),
    (
        "Calidad",
        &["calidad", "excelente", "malo", "defecto", "roto", "quality", "broken", "excellent"],
    ),
    (
        "Atención al cliente",
        &["atención", "servicio", "respuesta", "soporte", "ayuda", "service", "support", "help"],
    ),
    (
        "Envío",
        &["envío", "envio", "entrega", "llegó", "pedido", "retraso", "shipping", "delivery", "order"],
    ),
    (
        "Producto",
        &["producto", "sabor", "tamaño", "diseño", "product", "flavor", "size", "design"],
    ),
    (
        "Experiencia",
        &["experiencia", "encanta", "recomiendo", "feliz", "love", "recommend", "happy", "experience"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

/// Lower-cases and drops punctuation.
fn clean(text: &str) -> String {
    PUNCTUATION_RE.replace_all(&text.to_lowercase(), "").into_owned()
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_CHARS && !STOP_WORDS.contains(&token)
}

/// The [`TOP_KEYWORDS`] most frequent words across `texts`. Ties keep
/// first-seen order.
#[must_use]
pub fn extract_keywords<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<KeywordCount> {
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let cleaned = clean(text);
        for token in cleaned.split_whitespace().filter(|t| is_keyword(t)) {
            match index.get(token) {
                Some(&pos) => counts[pos].count += 1,
                None => {
                    index.insert(token.to_string(), counts.len());
                    counts.push(KeywordCount {
                        word: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_KEYWORDS);
    counts
}

/// The [`TOP_TOPICS`] topics matched by the most texts. One text may count
/// toward several topics; topics nothing matched are left out.
#[must_use]
pub fn match_topics<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<TopicCount> {
    let mut counts = vec![0_u64; TOPICS.len()];

    for text in texts {
        let cleaned = clean(text);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        for (slot, (_, keywords)) in counts.iter_mut().zip(TOPICS) {
            if keywords.iter().any(|k| tokens.contains(k)) {
                *slot += 1;
            }
        }
    }

    let mut topics: Vec<TopicCount> = TOPICS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((topic, _), count)| TopicCount {
            topic: (*topic).to_string(),
            count,
        })
        .collect();
    topics.sort_by(|a, b| b.count.cmp(&a.count));
    topics.truncate(TOP_TOPICS);
    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_keywords([]).is_empty());
        assert!(match_topics([]).is_empty());
    }

    #[test]
    fn short_tokens_and_stop_words_are_dropped() {
        let keywords = extract_keywords(["the cat para perro muy bonito"]);
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["perro", "bonito"]);
    }

    #[test]
    fn punctuation_is_stripped_and_case_folded() {
        let keywords = extract_keywords(["¡Genial! genial, GENIAL."]);
        assert_eq!(
            keywords,
            vec![KeywordCount {
                word: "genial".into(),
                count: 3
            }]
        );
    }

    #[test]
    fn accented_words_survive_cleaning() {
        let keywords = extract_keywords(["Diseño increíble"]);
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["diseño", "increíble"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let keywords = extract_keywords(["zeta alfa", "alfa zeta beta", "gamma"]);
        let got: Vec<_> = keywords.iter().map(|k| (k.word.as_str(), k.count)).collect();
        assert_eq!(got, vec![("zeta", 2), ("alfa", 2), ("beta", 1), ("gamma", 1)]);
    }

    #[test]
    fn at_most_ten_keywords() {
        let text = "uno1 dos22 tres3 cuatro seis6 siete ocho8 nueve diez1 once1 doce1 trece";
        assert_eq!(extract_keywords([text]).len(), TOP_KEYWORDS);
    }

    #[test]
    fn a_comment_can_match_several_topics() {
        let topics = match_topics([
            "El precio es caro pero la calidad es excelente",
            "Precio justo",
        ]);
        let got: Vec<_> = topics.iter().map(|t| (t.topic.as_str(), t.count)).collect();
        assert_eq!(got, vec![("Precio", 2), ("Calidad", 1)]);
    }

    #[test]
    fn unmatched_topics_are_omitted() {
        let topics = match_topics(["nada que ver aquí"]);
        assert!(topics.is_empty());
    }
}
