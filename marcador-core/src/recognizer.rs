//! # Reconhecedor de Entidades
//!
//! O contrato do reconhecedor estatístico é uma trait ([`Recognizer`]): o
//! pipeline recebe a instância por injeção de dependência, o que permite
//! substituí-la por um modelo real (ONNX, serviço externo) ou por um stub nos
//! testes, sem estado global de processo.
//!
//! A implementação embutida ([`HeuristicRecognizer`]) combina três famílias
//! de regras determinísticas:
//!
//! | Família            | Exemplo                          | Rótulo          |
//! |--------------------|----------------------------------|-----------------|
//! | Gazetteers         | "Ada Lovelace", "Mozilla"        | PER, LOC, ORG   |
//! | Regras de contexto | "Dr. Silva", "Acme Inc."         | PER, ORG        |
//! | Formato (regex)    | "2024-01-15", "$1.5 million", 3% | DATE, MONEY, PERCENT |
//!
//! A saída é sempre internamente livre de sobreposições: cada regra só marca
//! um intervalo ainda não reivindicado (primeira regra a reivindicar vence).

use regex::Regex;

use crate::error::CollaboratorError;
use crate::span::{EntitySpan, SpanSource};
use crate::tokenizer::{tokenize, Token};

/// Colaborador de reconhecimento estatístico.
///
/// Cada span devolvido deve ter `source == Model` e a lista deve ser
/// internamente livre de sobreposições.
pub trait Recognizer: Send + Sync {
    fn infer(&self, text: &str) -> Result<Vec<EntitySpan>, CollaboratorError>;
}

/// Reconhecedor embutido baseado em gazetteers, contexto e formato.
pub struct HeuristicRecognizer {
    /// Nomes de pessoas conhecidas (n-gramas lowercase).
    person_names: Vec<Vec<String>>,
    /// Locais conhecidos (n-gramas lowercase).
    location_names: Vec<Vec<String>>,
    /// Organizações conhecidas (n-gramas lowercase).
    org_names: Vec<Vec<String>>,
    /// Títulos que precedem nomes de pessoas ("dr.", "professor").
    person_titles: Vec<String>,
    /// Sufixos corporativos que seguem nomes de organizações ("inc.", "ltd.").
    org_suffixes: Vec<String>,
    /// Padrões de formato: (regex, rótulo).
    format_rules: Vec<(Regex, &'static str)>,
}

impl HeuristicRecognizer {
    /// Constrói o reconhecedor com gazetteers e padrões de formato padrão.
    pub fn new() -> Self {
        let format_rules = vec![
            (Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("regex de data ISO"), "DATE"),
            (Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").expect("regex de data US"), "DATE"),
            (
                Regex::new(
                    r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?\b",
                )
                .expect("regex de data por extenso"),
                "DATE",
            ),
            (
                Regex::new(r"\$[\d,]+(?:\.\d+)?(?:\s?(?:billion|million|thousand))?")
                    .expect("regex de valores monetários"),
                "MONEY",
            ),
            (Regex::new(r"\b\d+(?:\.\d+)?%").expect("regex de porcentagem"), "PERCENT"),
        ];

        let mut recognizer = Self {
            person_names: Vec::new(),
            location_names: Vec::new(),
            org_names: Vec::new(),
            person_titles: [
                "dr", "dr.", "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "prof", "prof.",
                "professor", "president", "senator", "ceo", "founder", "director",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            org_suffixes: ["inc", "inc.", "ltd", "ltd.", "corp", "corp.", "co", "co.", "llc", "gmbh", "s.a."]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            format_rules,
        };

        for name in ["Matthew Honnibal", "Ines Montani", "Alan Turing", "Grace Hopper", "Ada Lovelace"] {
            recognizer.add_person(name);
        }
        for name in ["New York", "London", "Berlin", "San Francisco", "Brazil", "United States"] {
            recognizer.add_location(name);
        }
        for name in ["Google", "Microsoft", "Mozilla", "Explosion", "NLTK", "MIT"] {
            recognizer.add_org(name);
        }

        recognizer
    }

    pub fn add_person(&mut self, name: &str) {
        push_entry(&mut self.person_names, name);
    }

    pub fn add_location(&mut self, name: &str) {
        push_entry(&mut self.location_names, name);
    }

    pub fn add_org(&mut self, name: &str) {
        push_entry(&mut self.org_names, name);
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn push_entry(entries: &mut Vec<Vec<String>>, name: &str) {
    let parts: Vec<String> = name.split_whitespace().map(|p| p.to_lowercase()).collect();
    if !parts.is_empty() {
        entries.push(parts);
    }
}

/// Verifica se o intervalo de bytes já foi reivindicado por algum span.
fn claimed(spans: &[EntitySpan], start: usize, end: usize) -> bool {
    spans.iter().any(|s| s.start < end && start < s.end)
}

impl Recognizer for HeuristicRecognizer {
    fn infer(&self, text: &str) -> Result<Vec<EntitySpan>, CollaboratorError> {
        let tokens = tokenize(text);
        let mut spans: Vec<EntitySpan> = Vec::new();

        // 1. Gazetteers (organizações antes de locais antes de pessoas,
        //    n-grama mais longo primeiro em cada posição)
        for (entries, label) in [
            (&self.org_names, "ORG"),
            (&self.location_names, "LOC"),
            (&self.person_names, "PER"),
        ] {
            for i in 0..tokens.len() {
                let mut best_len = 0usize;
                for entry in entries {
                    let n = entry.len();
                    if n <= best_len || i + n > tokens.len() {
                        continue;
                    }
                    let matched = entry
                        .iter()
                        .enumerate()
                        .all(|(j, word)| tokens[i + j].text.to_lowercase() == *word);
                    if matched {
                        best_len = n;
                    }
                }
                if best_len > 0 {
                    let (start, end) = (tokens[i].start, tokens[i + best_len - 1].end);
                    if !claimed(&spans, start, end) {
                        spans.push(EntitySpan::from_text(text, start, end, label, SpanSource::Model)?);
                    }
                }
            }
        }

        // 2. Regra de título: "Dr. Silva" → "Silva" é PER
        for i in 0..tokens.len().saturating_sub(1) {
            if self.person_titles.contains(&tokens[i].text.to_lowercase()) {
                let next = &tokens[i + 1];
                if starts_uppercase(next) && !claimed(&spans, next.start, next.end) {
                    spans.push(EntitySpan::from_text(text, next.start, next.end, "PER", SpanSource::Model)?);
                }
            }
        }

        // 3. Sufixo corporativo: "Acme Inc." → "Acme Inc." é ORG
        for i in 1..tokens.len() {
            if self.org_suffixes.contains(&tokens[i].text.to_lowercase()) {
                let prev = &tokens[i - 1];
                if starts_uppercase(prev) && !claimed(&spans, prev.start, tokens[i].end) {
                    spans.push(EntitySpan::from_text(
                        text,
                        prev.start,
                        tokens[i].end,
                        "ORG",
                        SpanSource::Model,
                    )?);
                }
            }
        }

        // 4. Regras de formato sobre o texto cru
        for (pattern, label) in &self.format_rules {
            for m in pattern.find_iter(text) {
                if !claimed(&spans, m.start(), m.end()) {
                    spans.push(EntitySpan::from_text(text, m.start(), m.end(), *label, SpanSource::Model)?);
                }
            }
        }

        spans.sort_by_key(|s| (s.start, s.end));
        Ok(spans)
    }
}

fn starts_uppercase(token: &Token) -> bool {
    token.text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}
