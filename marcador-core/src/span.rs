//! # Spans de Entidade
//!
//! O [`EntitySpan`] é a única entidade de domínio do sistema: um intervalo
//! rotulado de bytes dentro de um texto fonte imutável. Diferente do objeto
//! de documento mutável das bibliotecas de NLP dinâmicas, aqui o span é um
//! **tipo-valor imutável** com campos explícitos — o campo `text` é sempre
//! derivado da fatia `source_text[start..end]` no momento da construção,
//! nunca definido de forma independente.
//!
//! ## Offsets
//!
//! Os offsets são posições de **byte** no texto original (inclusivo/exclusivo),
//! como em [`crate::tokenizer::Token`]. Eles precisam cair em fronteiras UTF-8
//! válidas; a validação na ingestão rejeita qualquer span que não respeite isso.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Proveniência de um span: de onde a anotação veio.
///
/// Mantida para depuração e exibida na tabela final, mas sem peso semântico
/// após a reconciliação — exceto na resolução de conflitos, onde a política
/// padrão prefere `Pattern` (padrões de domínio são mais precisos para os
/// termos que cobrem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSource {
    /// Predito pelo reconhecedor estatístico.
    Model,
    /// Produzido pelo casador de padrões de frase.
    Pattern,
}

impl SpanSource {
    pub fn name(&self) -> &'static str {
        match self {
            SpanSource::Model => "model",
            SpanSource::Pattern => "pattern",
        }
    }
}

/// Um intervalo rotulado de texto denotando uma entidade reconhecida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Offset de byte inicial no texto original (inclusivo).
    pub start: usize,
    /// Offset de byte final no texto original (exclusivo). Sempre `> start`.
    pub end: usize,
    /// O trecho `source_text[start..end]`, derivado na construção.
    pub text: String,
    /// Categoria da entidade (ex: "PER", "ORG" ou um rótulo customizado).
    pub label: String,
    /// Proveniência: modelo estatístico ou padrão de frase.
    pub source: SpanSource,
}

impl EntitySpan {
    /// Constrói um span validado, derivando `text` da fatia do texto fonte.
    ///
    /// Rejeita `end <= start`, offsets além do texto, fronteiras UTF-8
    /// inválidas e rótulos vazios.
    pub fn from_text(
        source_text: &str,
        start: usize,
        end: usize,
        label: impl Into<String>,
        source: SpanSource,
    ) -> Result<Self, AnalysisError> {
        let label = label.into();
        if label.is_empty() {
            return Err(AnalysisError::InvalidSpan {
                start,
                end,
                reason: "rótulo vazio".to_string(),
            });
        }
        if end <= start {
            return Err(AnalysisError::InvalidSpan {
                start,
                end,
                reason: "end deve ser maior que start".to_string(),
            });
        }
        if end > source_text.len() {
            return Err(AnalysisError::InvalidSpan {
                start,
                end,
                reason: format!("end além do texto de {} bytes", source_text.len()),
            });
        }
        let text = source_text
            .get(start..end)
            .ok_or_else(|| AnalysisError::InvalidSpan {
                start,
                end,
                reason: "offsets fora de fronteira UTF-8".to_string(),
            })?;
        Ok(Self {
            start,
            end,
            text: text.to_string(),
            label,
            source,
        })
    }

    /// Comprimento do span em bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Um span validado nunca é vazio (`end > start` garantido na construção).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Verifica se dois spans compartilham ao menos um offset.
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Valida uma lista de spans vinda de um colaborador, na ingestão.
///
/// Verifica cada span individualmente (offsets, fronteiras, consistência do
/// `text` com a fatia original) e garante a pré-condição da reconciliação:
/// **nenhuma sobreposição interna** dentro da mesma lista.
pub fn validate_spans(source_text: &str, spans: &[EntitySpan]) -> Result<(), AnalysisError> {
    for span in spans {
        let rebuilt = EntitySpan::from_text(
            source_text,
            span.start,
            span.end,
            span.label.clone(),
            span.source,
        )?;
        if rebuilt.text != span.text {
            return Err(AnalysisError::InvalidSpan {
                start: span.start,
                end: span.end,
                reason: format!(
                    "texto do span ({:?}) não corresponde à fatia original ({:?})",
                    span.text, rebuilt.text
                ),
            });
        }
    }

    // Pré-condição: cada produtor upstream é internamente consistente
    let mut ranges: Vec<(usize, usize)> = spans.iter().map(|s| (s.start, s.end)).collect();
    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        if pair[1].0 < pair[0].1 {
            return Err(AnalysisError::OverlappingInput {
                first_start: pair[0].0,
                first_end: pair[0].1,
                second_start: pair[1].0,
                second_end: pair[1].1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_derives_slice() {
        let span = EntitySpan::from_text("Rust é rápido", 0, 4, "LANG", SpanSource::Pattern).unwrap();
        assert_eq!(span.text, "Rust");
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = EntitySpan::from_text("abc", 2, 2, "X", SpanSource::Model);
        assert!(matches!(err, Err(AnalysisError::InvalidSpan { .. })));
    }

    #[test]
    fn test_rejects_end_beyond_text() {
        let err = EntitySpan::from_text("abc", 0, 10, "X", SpanSource::Model);
        assert!(matches!(err, Err(AnalysisError::InvalidSpan { .. })));
    }

    #[test]
    fn test_rejects_non_utf8_boundary() {
        // "é" ocupa 2 bytes; cortar no meio é inválido
        let err = EntitySpan::from_text("é", 0, 1, "X", SpanSource::Model);
        assert!(matches!(err, Err(AnalysisError::InvalidSpan { .. })));
    }

    #[test]
    fn test_overlap_detection() {
        let text = "abcdefghij";
        let a = EntitySpan::from_text(text, 0, 5, "A", SpanSource::Model).unwrap();
        let b = EntitySpan::from_text(text, 4, 8, "B", SpanSource::Model).unwrap();
        let c = EntitySpan::from_text(text, 5, 8, "C", SpanSource::Model).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // end exclusivo: adjacente não sobrepõe
    }

    #[test]
    fn test_validate_rejects_internal_overlap() {
        let text = "abcdefghij";
        let spans = vec![
            EntitySpan::from_text(text, 0, 5, "A", SpanSource::Model).unwrap(),
            EntitySpan::from_text(text, 3, 8, "B", SpanSource::Model).unwrap(),
        ];
        assert!(matches!(
            validate_spans(text, &spans),
            Err(AnalysisError::OverlappingInput { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_tampered_text() {
        let text = "abcdefghij";
        let mut span = EntitySpan::from_text(text, 0, 3, "A", SpanSource::Model).unwrap();
        span.text = "zzz".to_string();
        assert!(matches!(
            validate_spans(text, &[span]),
            Err(AnalysisError::InvalidSpan { .. })
        ));
    }
}
