//! # Agregador de Sumário
//!
//! Transforma a sequência reconciliada em duas visões tabulares:
//! os registros individuais (um por span, na ordem reconciliada) e a
//! contagem de spans por rótulo. Transformações puras, sem mutação da entrada.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::span::{EntitySpan, SpanSource};

/// Uma linha da tabela de entidades exposta ao chamador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub source: SpanSource,
}

/// Contagem de spans de um rótulo.
///
/// O sumário é um `Vec<LabelCount>` em vez de um mapa hash: a ordem de
/// relatório (contagem decrescente, depois rótulo alfabético) faz parte do
/// contrato e precisa ser determinística e serializável como está.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Converte a sequência reconciliada em registros tabulares, preservando a ordem.
pub fn records(reconciled: &[EntitySpan]) -> Vec<EntityRecord> {
    reconciled
        .iter()
        .map(|span| EntityRecord {
            text: span.text.clone(),
            label: span.label.clone(),
            start: span.start,
            end: span.end,
            source: span.source,
        })
        .collect()
}

/// Conta spans por rótulo, em ordem de contagem decrescente e depois alfabética.
pub fn summarize(reconciled: &[EntitySpan]) -> Vec<LabelCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for span in reconciled {
        *counts.entry(span.label.as_str()).or_insert(0) += 1;
    }

    // O BTreeMap já entrega ordem alfabética; o sort estável por contagem
    // decrescente preserva o alfabético nos empates
    let mut summary: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    summary.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}
