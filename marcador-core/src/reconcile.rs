//! # Reconciliação de Spans
//!
//! O coração do sistema: funde as duas listas de spans produzidas
//! independentemente (modelo estatístico e padrões de frase) em **uma**
//! sequência canônica — ordenada por posição, determinística e livre de
//! sobreposições.
//!
//! ## Algoritmo
//!
//! 1. Concatena as duas listas (modelo primeiro, padrões depois).
//! 2. Ordenação estável por `(start, end)` — empate total preserva a ordem
//!    original das listas.
//! 3. Varredura da esquerda para a direita mantendo o `end` mais à direita
//!    já aceito. Um candidato que começa antes desse `end` está em conflito
//!    com o último span aceito; a [`ConflictPolicy`] decide quem sobrevive.
//!
//! Como a lista está ordenada por `start`, um candidato só pode sobrepor o
//! **último** span aceito: se o vencedor do conflito for o candidato, basta
//! remover o perdedor do topo e empilhar o vencedor (`candidate.start >=
//! loser.start >= end do aceito anterior`).
//!
//! ## Pré-condição
//!
//! Cada lista de entrada deve ser internamente livre de sobreposições. O
//! pipeline garante isso na ingestão via [`crate::span::validate_spans`];
//! chamado isoladamente, `reconcile` não revalida.

use serde::{Deserialize, Serialize};

use crate::span::{EntitySpan, SpanSource};

/// Política de resolução quando um span do modelo e um de padrão se sobrepõem.
///
/// O comportamento original ao fundir as duas fontes não é documentado além
/// de "ordenar e iterar"; por isso a preferência é configurável em vez de lei
/// fixa. O padrão assume que padrões de domínio são mais precisos para os
/// termos que cobrem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Spans de padrão vencem spans do modelo (padrão).
    #[default]
    PreferPattern,
    /// Spans do modelo vencem spans de padrão.
    PreferModel,
}

impl ConflictPolicy {
    fn preferred_source(&self) -> SpanSource {
        match self {
            ConflictPolicy::PreferPattern => SpanSource::Pattern,
            ConflictPolicy::PreferModel => SpanSource::Model,
        }
    }
}

/// Funde as duas listas em uma sequência ordenada e sem sobreposições.
///
/// Função pura: sem efeitos colaterais, saída byte-idêntica para entradas
/// idênticas. Duplicatas exatas colapsam em uma só. Listas vazias são casos
/// normais, não erros.
///
/// Desempate em conflito:
/// 1. Fonte preferida pela política vence a outra fonte.
/// 2. Mesma fonte: o span mais longo vence.
/// 3. Empate total: vence quem apareceu primeiro (ordem estável).
pub fn reconcile(
    model_spans: &[EntitySpan],
    pattern_spans: &[EntitySpan],
    policy: ConflictPolicy,
) -> Vec<EntitySpan> {
    let mut candidates: Vec<EntitySpan> = Vec::with_capacity(model_spans.len() + pattern_spans.len());
    candidates.extend_from_slice(model_spans);
    candidates.extend_from_slice(pattern_spans);
    candidates.sort_by_key(|s| (s.start, s.end)); // sort estável

    let mut accepted: Vec<EntitySpan> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match accepted.last() {
            Some(last) if candidate.start < last.end => {
                if candidate == *last {
                    continue; // duplicata exata: colapsa
                }
                if beats(&candidate, last, policy) {
                    accepted.pop();
                    accepted.push(candidate);
                }
            }
            _ => accepted.push(candidate),
        }
    }
    accepted
}

/// Decide se o candidato desbanca o span já aceito com que conflita.
fn beats(challenger: &EntitySpan, incumbent: &EntitySpan, policy: ConflictPolicy) -> bool {
    if challenger.source != incumbent.source {
        return challenger.source == policy.preferred_source();
    }
    // Mesma fonte: mais longo vence; empate mantém o incumbente
    challenger.len() > incumbent.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanSource;

    fn span(text: &str, start: usize, end: usize, label: &str, source: SpanSource) -> EntitySpan {
        EntitySpan::from_text(text, start, end, label, source).unwrap()
    }

    const TEXT: &str = "abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn test_empty_lists() {
        assert!(reconcile(&[], &[], ConflictPolicy::default()).is_empty());
    }

    #[test]
    fn test_disjoint_spans_all_kept_in_order() {
        let model = vec![span(TEXT, 10, 14, "B", SpanSource::Model)];
        let pattern = vec![
            span(TEXT, 0, 4, "A", SpanSource::Pattern),
            span(TEXT, 20, 24, "C", SpanSource::Pattern),
        ];
        let out = reconcile(&model, &pattern, ConflictPolicy::default());
        let labels: Vec<&str> = out.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_pattern_wins_over_model() {
        // Modelo [0,10) ORG vs padrão [2,8) LIB: o padrão sobrevive
        let model = vec![span(TEXT, 0, 10, "ORG", SpanSource::Model)];
        let pattern = vec![span(TEXT, 2, 8, "LIB", SpanSource::Pattern)];
        let out = reconcile(&model, &pattern, ConflictPolicy::PreferPattern);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "LIB");
        assert_eq!((out[0].start, out[0].end), (2, 8));
    }

    #[test]
    fn test_prefer_model_policy_inverts() {
        let model = vec![span(TEXT, 0, 10, "ORG", SpanSource::Model)];
        let pattern = vec![span(TEXT, 2, 8, "LIB", SpanSource::Pattern)];
        let out = reconcile(&model, &pattern, ConflictPolicy::PreferModel);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "ORG");
    }

    #[test]
    fn test_same_source_longer_wins() {
        let model = vec![
            span(TEXT, 0, 3, "A", SpanSource::Model),
            span(TEXT, 2, 9, "B", SpanSource::Model),
        ];
        // Nota: entrada com sobreposição interna viola a pré-condição do
        // pipeline, mas a regra de desempate em si é testável diretamente
        let out = reconcile(&model, &[], ConflictPolicy::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "B");
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let pattern = vec![span(TEXT, 5, 9, "X", SpanSource::Pattern)];
        let out = reconcile(&[], &[pattern[0].clone(), pattern[0].clone()], ConflictPolicy::default());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_non_overlap_invariant() {
        let model = vec![
            span(TEXT, 0, 6, "A", SpanSource::Model),
            span(TEXT, 8, 12, "B", SpanSource::Model),
            span(TEXT, 14, 20, "C", SpanSource::Model),
        ];
        let pattern = vec![
            span(TEXT, 4, 9, "D", SpanSource::Pattern),
            span(TEXT, 15, 18, "E", SpanSource::Pattern),
        ];
        let out = reconcile(&model, &pattern, ConflictPolicy::default());
        for pair in out.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]), "{:?} sobrepõe {:?}", pair[0], pair[1]);
            assert!((pair[0].start, pair[0].end) <= (pair[1].start, pair[1].end));
        }
    }

    #[test]
    fn test_coverage_of_non_conflicting_patterns() {
        // Todo span de padrão que não sobrepõe nenhum span do modelo
        // aparece inalterado na saída
        let model = vec![span(TEXT, 0, 4, "M", SpanSource::Model)];
        let pattern = vec![
            span(TEXT, 6, 10, "P1", SpanSource::Pattern),
            span(TEXT, 12, 16, "P2", SpanSource::Pattern),
        ];
        let out = reconcile(&model, &pattern, ConflictPolicy::default());
        assert!(pattern.iter().all(|p| out.contains(p)));
    }

    #[test]
    fn test_idempotence() {
        let model = vec![
            span(TEXT, 0, 6, "A", SpanSource::Model),
            span(TEXT, 10, 14, "B", SpanSource::Model),
        ];
        let pattern = vec![span(TEXT, 4, 8, "C", SpanSource::Pattern)];
        let first = reconcile(&model, &pattern, ConflictPolicy::default());
        let second = reconcile(&model, &pattern, ConflictPolicy::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_replacement_does_not_reintroduce_overlap() {
        // O padrão [2,8) desbanca o modelo [0,10); o próximo candidato
        // [9,12) não sobrepõe o vencedor e deve entrar
        let model = vec![
            span(TEXT, 0, 10, "A", SpanSource::Model),
            span(TEXT, 11, 13, "B", SpanSource::Model),
        ];
        let pattern = vec![
            span(TEXT, 2, 8, "C", SpanSource::Pattern),
            span(TEXT, 9, 11, "D", SpanSource::Pattern),
        ];
        let out = reconcile(&model, &pattern, ConflictPolicy::default());
        let labels: Vec<&str> = out.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "D", "B"]);
    }
}
