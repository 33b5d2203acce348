use crate::errors::{CorpusError, CorpusResult};
use crate::frequency_index::TokenFrequencyIndex;
use std::collections::{BTreeSet, HashSet};

/// Portuguese function words plus the canonical address form left behind by
/// normalization ("Sr.", "Sras." -> "sr").
pub static BASE_STOPWORDS: &[&str] = &[
    "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "com", "nao", "uma",
    "os", "no", "se", "na", "por", "mais", "as", "dos", "como", "mas", "ao", "ele",
    "das", "seu", "sua", "ou", "quando", "muito", "nos", "ja", "eu", "tambem", "so",
    "pelo", "pela", "ate", "isso", "ela", "entre", "depois", "sem", "mesmo", "aos",
    "seus", "quem", "nas", "me", "esse", "eles", "voce", "essa", "num", "nem",
    "suas", "meu", "minha", "numa", "pelos", "elas", "qual", "lhe", "deles",
    "essas", "esses", "pelas", "este", "dele", "tu", "te", "voces", "vos", "lhes",
    "meus", "minhas", "teu", "tua", "teus", "tuas", "nosso", "nossa", "nossos",
    "nossas", "dela", "delas", "esta", "estes", "estas", "aquele", "aquela",
    "aqueles", "aquelas", "isto", "aquilo", "estou", "estamos", "estao", "estive",
    "esteve", "estivemos", "estiveram", "estava", "estavamos", "estavam",
    "estivera", "estiveramos", "esteja", "estejamos", "estejam", "estivesse",
    "estivessemos", "estivessem", "estiver", "estivermos", "estiverem", "hei", "ha",
    "havemos", "hao", "houve", "houvemos", "houveram", "houvera", "houveramos",
    "haja", "hajamos", "hajam", "houvesse", "houvessemos", "houvessem", "houver",
    "houvermos", "houverem", "houverei", "houveremos", "houverao", "houveria",
    "houveriamos", "houveriam", "sou", "somos", "sao", "era", "eramos", "eram",
    "fui", "foi", "fomos", "foram", "fora", "foramos", "seja", "sejamos", "sejam",
    "fosse", "fossemos", "fossem", "for", "formos", "forem", "serei", "sera",
    "seremos", "serao", "seria", "seriamos", "seriam", "tenho", "tem", "temos",
    "tinha", "tinhamos", "tinham", "tive", "teve", "tivemos", "tiveram", "tivera",
    "tiveramos", "tenha", "tenhamos", "tenham", "tivesse", "tivessemos", "tivessem",
    "tiver", "tivermos", "tiverem", "terei", "tera", "teremos", "terao", "teria",
    "teriamos", "teriam", "agora", "ainda", "alguem", "algum", "alguma", "algumas",
    "alguns", "ampla", "amplas", "amplo", "amplos", "ante", "antes", "apos",
    "atraves", "cada", "coisa", "coisas", "contra", "contudo", "daquele",
    "daqueles", "dessa", "dessas", "desse", "desses", "desta", "destas", "deste",
    "destes", "deve", "devem", "devendo", "dever", "devera", "deverao", "deveria",
    "deveriam", "devia", "deviam", "disso", "disto", "dito", "diz", "dizem",
    "enquanto", "fazendo", "fazer", "feita", "feitas", "feito", "feitos", "grande",
    "grandes", "la", "lo", "mesma", "mesmas", "mesmos", "muita", "muitas", "muitos",
    "nenhum", "nessa", "nessas", "nesta", "nestas", "ninguem", "nunca", "outra",
    "outras", "outro", "outros", "pequena", "pequenas", "pequeno", "pequenos",
    "per", "perante", "pode", "podendo", "poder", "poderia", "poderiam", "podia",
    "podiam", "pois", "porem", "porque", "posso", "pouca", "poucas", "pouco",
    "poucos", "primeiro", "primeiros", "propria", "proprias", "proprio", "proprios",
    "quais", "quanto", "quantos", "sempre", "sendo", "si", "sido", "sob", "sobre",
    "talvez", "tampouco", "tendo", "ter", "ti", "tido", "toda", "todas", "todavia",
    "todo", "todos", "tudo", "ultima", "ultimas", "ultimo", "ultimos", "umas",
    "uns", "vendo", "ver", "vez", "vindo", "vir", "ah", "ai", "algo", "alo",
    "ambos", "apenas", "bis", "certa", "certas", "certo", "certos", "chi", "comigo",
    "conforme", "conosco", "consigo", "contigo", "convosco", "cuja", "cujas",
    "cujo", "cujos", "desde", "daquela", "daquelas", "daquilo", "eia", "embora",
    "hem", "hum", "ih", "logo", "menos", "mim", "nada", "nela", "nelas", "nele",
    "neles", "nenhuma", "nenhumas", "nenhuns", "nesse", "nesses", "nisso", "neste",
    "nestes", "nisto", "naquela", "naquelas", "naquele", "naqueles", "naquilo",
    "oba", "oh", "ola", "onde", "opa", "ora", "outrem", "portanto", "psit", "psiu",
    "quaisquer", "qualquer", "quanta", "quantas", "tanta", "tantas", "tanto",
    "tantos", "tras", "ue", "uh", "ui", "varia", "varias", "vario", "varios",
    "vossa", "vossas", "vosso", "vossos", "sr", "sra", "srs", "sras",
];

/// Fixed base stopword list extended once per run from corpus statistics.
#[derive(Debug, Clone)]
pub struct StopwordPolicy {
    base: HashSet<String>,
    adaptive: BTreeSet<String>,
    finalized: bool,
}

impl StopwordPolicy {
    pub fn new() -> Self {
        Self::with_base(BASE_STOPWORDS)
    }

    pub fn with_base(words: &[&str]) -> Self {
        StopwordPolicy {
            base: words.iter().map(|w| w.to_string()).collect(),
            adaptive: BTreeSet::new(),
            finalized: false,
        }
    }

    /// Adds every token whose document count is at or above
    /// `total_docs * high_threshold` or at or below `total_docs * low_threshold`.
    ///
    /// Returns the number of tokens added on top of the base list. A policy
    /// can be finalized exactly once.
    pub fn finalize(
        &mut self,
        index: &TokenFrequencyIndex,
        total_docs: usize,
        high_threshold: f64,
        low_threshold: f64,
    ) -> CorpusResult<usize> {
        if self.finalized {
            return Err(CorpusError::PolicyAlreadyFinalized);
        }

        let high_cut = total_docs as f64 * high_threshold;
        let low_cut = total_docs as f64 * low_threshold;

        for (token, count) in index.most_common() {
            let count = count as f64;
            if (count >= high_cut || count <= low_cut) && !self.base.contains(token) {
                self.adaptive.insert(token.to_string());
            }
        }

        self.finalized = true;
        Ok(self.adaptive.len())
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.base.contains(token) || self.adaptive.contains(token)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn base_len(&self) -> usize {
        self.base.len()
    }

    /// Corpus-derived stopwords in lexical order.
    pub fn adaptive(&self) -> impl Iterator<Item = &str> {
        self.adaptive.iter().map(String::as_str)
    }

    pub fn adaptive_len(&self) -> usize {
        self.adaptive.len()
    }
}

impl Default for StopwordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_index(documents: usize, token_docs: &[(&str, usize)]) -> TokenFrequencyIndex {
        let mut index = TokenFrequencyIndex::new();
        for doc in 0..documents {
            let tokens: Vec<&str> = token_docs
                .iter()
                .filter(|(_, count)| doc < *count)
                .map(|(token, _)| *token)
                .collect();
            index.register_document(tokens);
        }
        index
    }

    #[test]
    fn test_base_list_contents() {
        let policy = StopwordPolicy::new();
        for word in ["o", "que", "sr", "de", "nao"] {
            assert!(policy.is_stopword(word), "{} should be a base stopword", word);
        }
        for word in ["presidente", "disse", "vota", "sim", "vezes"] {
            assert!(!policy.is_stopword(word), "{} should not be a base stopword", word);
        }
        assert_eq!(policy.base_len(), BASE_STOPWORDS.len());
    }

    #[test]
    fn test_high_and_low_boundaries_are_inclusive() {
        let index = corpus_index(50, &[("camara", 50), ("raro", 1), ("medio", 25)]);
        let mut policy = StopwordPolicy::new();

        let added = policy.finalize(&index, 50, 0.9, 0.02).unwrap();

        assert!(policy.is_stopword("camara"));
        assert!(policy.is_stopword("raro"));
        assert!(!policy.is_stopword("medio"));
        assert_eq!(added, 2);
        assert_eq!(policy.adaptive().collect::<Vec<_>>(), vec!["camara", "raro"]);
    }

    #[test]
    fn test_exact_high_threshold_count() {
        let index = corpus_index(10, &[("limite", 9), ("abaixo", 8)]);
        let mut policy = StopwordPolicy::new();
        policy.finalize(&index, 10, 0.9, 0.0).unwrap();

        assert!(policy.is_stopword("limite"));
        assert!(!policy.is_stopword("abaixo"));
    }

    #[test]
    fn test_base_words_are_not_counted_as_adaptive() {
        let index = corpus_index(4, &[("que", 4), ("reforma", 4)]);
        let mut policy = StopwordPolicy::new();
        let added = policy.finalize(&index, 4, 0.9, 0.0).unwrap();

        assert_eq!(added, 1);
        assert!(policy.is_stopword("que"));
        assert!(policy.is_stopword("reforma"));
    }

    #[test]
    fn test_second_finalize_is_rejected() {
        let index = corpus_index(2, &[("orcamento", 1)]);
        let mut policy = StopwordPolicy::new();
        policy.finalize(&index, 2, 0.9, 0.01).unwrap();

        assert!(policy.is_finalized());
        assert!(matches!(
            policy.finalize(&index, 2, 0.9, 0.01),
            Err(CorpusError::PolicyAlreadyFinalized)
        ));
    }
}
