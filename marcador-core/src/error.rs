//! # Erros do Pipeline de Análise
//!
//! Tipos de erro do pipeline. Cada falha carrega o **estágio** em que ocorreu
//! (reconhecimento, casamento de padrões, reconciliação ou renderização),
//! permitindo que a CLI informe ao usuário exatamente onde o processo parou.
//!
//! Não há retentativas em nenhum ponto: todas as operações do núcleo são
//! funções puras e determinísticas, e as chamadas aos colaboradores externos
//! falham rápido (fail-fast).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erro opaco devolvido pelos colaboradores externos (reconhecedor, matcher, renderer).
///
/// O núcleo não consegue reparar um modelo ausente ou um renderer quebrado,
/// então a falha é propagada inalterada até o chamador, apenas anotada com o estágio.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Estágio do pipeline onde uma falha ocorreu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Inferência do reconhecedor estatístico (spans `model`).
    Recognition,
    /// Casamento de padrões de frase (spans `pattern`).
    PatternMatching,
    /// Fusão das duas listas de spans em uma sequência canônica.
    Reconciliation,
    /// Geração do HTML de visualização.
    Rendering,
}

impl Stage {
    /// Nome legível do estágio (para mensagens da CLI).
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Recognition => "reconhecimento",
            Stage::PatternMatching => "casamento de padrões",
            Stage::Reconciliation => "reconciliação",
            Stage::Rendering => "renderização",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Erros possíveis de uma chamada de análise.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Span malformado vindo de um colaborador: `end <= start`, offset além do
    /// texto, fronteira UTF-8 inválida, rótulo vazio ou texto inconsistente
    /// com a fatia original. Detectado na ingestão, falha a análise inteira.
    #[error("span inválido {start}..{end}: {reason}")]
    InvalidSpan {
        start: usize,
        end: usize,
        reason: String,
    },

    /// Violação da pré-condição de entrada: uma mesma fonte produziu spans
    /// sobrepostos entre si. Cada produtor upstream deve ser internamente
    /// consistente; isto é verificado na ingestão em vez de virar
    /// comportamento indefinido.
    #[error("spans sobrepostos na mesma fonte: {first_start}..{first_end} e {second_start}..{second_end}")]
    OverlappingInput {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// Falha de um colaborador externo, propagada inalterada com o estágio anotado.
    #[error("falha no estágio de {stage}: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: CollaboratorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Recognition.name(), "reconhecimento");
        assert_eq!(Stage::Rendering.to_string(), "renderização");
    }

    #[test]
    fn test_collaborator_error_names_stage() {
        let err = AnalysisError::Collaborator {
            stage: Stage::PatternMatching,
            source: "modelo não carregado".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("casamento de padrões"), "mensagem deve nomear o estágio: {msg}");
    }
}
