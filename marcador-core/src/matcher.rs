//! # Casador de Padrões de Frase
//!
//! Complementa o reconhecedor estatístico com conhecimento explícito de
//! domínio: o usuário fornece padrões `{rótulo, formas de superfície}` e o
//! casador devolve um span para cada ocorrência literal dessas frases no
//! texto. "Formas de superfície" são frases literais (ex: "Go", "machine
//! learning"), em oposição à inferência estatística.
//!
//! O contrato é uma trait ([`Matcher`]) para permitir qualquer backend de
//! casamento (regex, trie, serviço externo). A implementação padrão
//! ([`PhraseMatcher`]) tokeniza texto e formas e compara n-gramas sem
//! diferenciar maiúsculas, com a forma mais longa vencendo em cada posição.

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::span::{EntitySpan, SpanSource};
use crate::tokenizer::tokenize;

/// Um padrão de entidade customizado fornecido pelo usuário.
///
/// Desserializável de JSON para carregar arquivos de padrões na CLI:
/// `[{"label": "LANG", "surface_forms": ["Go", "Rust"]}]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPattern {
    /// Rótulo atribuído às ocorrências (ex: "LANG", "LIBRARY").
    pub label: String,
    /// Frases literais que identificam a entidade.
    pub surface_forms: Vec<String>,
}

impl EntityPattern {
    pub fn new(label: impl Into<String>, surface_forms: &[&str]) -> Self {
        Self {
            label: label.into(),
            surface_forms: surface_forms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Colaborador de casamento de padrões.
///
/// Cada span devolvido deve ter `source == Pattern` e a lista deve ser
/// internamente livre de sobreposições (pré-condição da reconciliação,
/// verificada na ingestão pelo pipeline).
pub trait Matcher: Send + Sync {
    fn find_matches(
        &self,
        text: &str,
        patterns: &[EntityPattern],
    ) -> Result<Vec<EntitySpan>, CollaboratorError>;
}

/// Casador de frases padrão, baseado em comparação de n-gramas de tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseMatcher;

impl PhraseMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for PhraseMatcher {
    fn find_matches(
        &self,
        text: &str,
        patterns: &[EntityPattern],
    ) -> Result<Vec<EntitySpan>, CollaboratorError> {
        let tokens = tokenize(text);
        if tokens.is_empty() || patterns.is_empty() {
            return Ok(Vec::new());
        }

        // Compila cada forma de superfície na sua sequência de palavras (lowercase)
        let mut compiled: Vec<(&str, Vec<String>)> = Vec::new();
        for pattern in patterns {
            for form in &pattern.surface_forms {
                let words: Vec<String> = tokenize(form)
                    .iter()
                    .map(|t| t.text.to_lowercase())
                    .collect();
                if !words.is_empty() {
                    compiled.push((pattern.label.as_str(), words));
                }
            }
        }

        let mut occupied = vec![false; tokens.len()];
        let mut spans = Vec::new();

        for i in 0..tokens.len() {
            if occupied[i] {
                continue;
            }

            // A forma mais longa que casa nesta posição vence
            let mut best: Option<(&str, usize)> = None;
            for (label, words) in &compiled {
                let n = words.len();
                if i + n > tokens.len() || best.map(|(_, bn)| n <= bn).unwrap_or(false) {
                    continue;
                }
                if (i..i + n).any(|j| occupied[j]) {
                    continue;
                }
                let matched = words
                    .iter()
                    .enumerate()
                    .all(|(j, word)| tokens[i + j].text.to_lowercase() == *word);
                if matched {
                    best = Some((*label, n));
                }
            }

            if let Some((label, n)) = best {
                let start = tokens[i].start;
                let end = tokens[i + n - 1].end;
                spans.push(EntitySpan::from_text(text, start, end, label, SpanSource::Pattern)?);
                for slot in occupied.iter_mut().skip(i).take(n) {
                    *slot = true;
                }
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_forms() {
        let matcher = PhraseMatcher::new();
        let patterns = vec![EntityPattern::new("LANG", &["Go", "Rust"])];
        let spans = matcher
            .find_matches("Go and Rust are languages.", &patterns)
            .unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end, spans[0].text.as_str()), (0, 2, "Go"));
        assert_eq!((spans[1].start, spans[1].end, spans[1].text.as_str()), (7, 11, "Rust"));
        assert!(spans.iter().all(|s| s.label == "LANG" && s.source == SpanSource::Pattern));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = PhraseMatcher::new();
        let patterns = vec![EntityPattern::new("LIB", &["tensorflow"])];
        let spans = matcher.find_matches("Usamos TensorFlow aqui.", &patterns).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "TensorFlow"); // texto original preservado
    }

    #[test]
    fn test_multiword_form() {
        let matcher = PhraseMatcher::new();
        let patterns = vec![EntityPattern::new("TOPIC", &["machine learning"])];
        let text = "Estuda machine learning há anos.";
        let spans = matcher.find_matches(text, &patterns).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "machine learning");
        assert_eq!(&text[spans[0].start..spans[0].end], "machine learning");
    }

    #[test]
    fn test_longest_form_wins() {
        let matcher = PhraseMatcher::new();
        let patterns = vec![
            EntityPattern::new("CITY", &["York"]),
            EntityPattern::new("CITY", &["New York"]),
        ];
        let spans = matcher.find_matches("Mora em New York.", &patterns).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "New York");
    }

    #[test]
    fn test_no_internal_overlap() {
        let matcher = PhraseMatcher::new();
        let patterns = vec![
            EntityPattern::new("A", &["Rio de Janeiro"]),
            EntityPattern::new("B", &["Janeiro"]),
        ];
        let spans = matcher
            .find_matches("Cheguei ao Rio de Janeiro em janeiro.", &patterns)
            .unwrap();
        // "Janeiro" dentro de "Rio de Janeiro" não gera segundo span,
        // mas o "janeiro" solto no fim sim
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "A");
        assert_eq!(spans[1].label, "B");
        assert!(!spans[0].overlaps(&spans[1]));
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = PhraseMatcher::new();
        assert!(matcher.find_matches("", &[EntityPattern::new("X", &["a"])]).unwrap().is_empty());
        assert!(matcher.find_matches("algum texto", &[]).unwrap().is_empty());
    }
}
