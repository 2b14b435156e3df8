//! # Pipeline de Análise — Orquestrador
//!
//! Conecta os colaboradores (reconhecedor, casador de padrões, renderizador)
//! ao núcleo de reconciliação e agregação. Os colaboradores entram por
//! **injeção de dependência** explícita: nada de modelo carregado em estado
//! global de processo, e os testes substituem qualquer um deles por stubs.
//!
//! O fluxo de uma análise é linear e síncrono:
//!
//! ```text
//! texto → [reconhecedor, casador] → listas cruas → validação na ingestão
//!       → reconciliação → sequência canônica → {sumário, renderização}
//!       → AnalysisReport
//! ```
//!
//! Não há estado mutável compartilhado entre chamadas; cada invocação opera
//! sobre seu próprio texto e produz seu próprio resultado imutável. Para
//! lotes, [`AnalysisPipeline::analyze_batch`] paraleliza as análises
//! independentes com `rayon`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Stage};
use crate::matcher::{EntityPattern, Matcher, PhraseMatcher};
use crate::recognizer::{HeuristicRecognizer, Recognizer};
use crate::reconcile::{reconcile, ConflictPolicy};
use crate::render::{HtmlRenderer, Renderer};
use crate::span::validate_spans;
use crate::summary::{records, summarize, EntityRecord, LabelCount};

/// Resultado completo de uma análise.
///
/// Os três campos espelham a superfície original do sistema:
/// a tabela de entidades, o sumário por rótulo e o HTML de visualização.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Um registro por entidade reconciliada, em ordem de posição no texto.
    pub all_entities: Vec<EntityRecord>,
    /// Contagem por rótulo, em ordem de contagem decrescente e depois alfabética.
    pub entity_summary: Vec<LabelCount>,
    /// Página HTML com as entidades destacadas inline.
    pub visualization_html: String,
}

/// O pipeline de análise NER.
pub struct AnalysisPipeline {
    recognizer: Box<dyn Recognizer>,
    matcher: Box<dyn Matcher>,
    renderer: Box<dyn Renderer>,
    policy: ConflictPolicy,
}

impl AnalysisPipeline {
    /// Cria o pipeline com os colaboradores embutidos
    /// (reconhecedor heurístico, casador de frases, renderizador HTML).
    pub fn new() -> Self {
        Self::with_collaborators(
            Box::new(HeuristicRecognizer::new()),
            Box::new(PhraseMatcher::new()),
            Box::new(HtmlRenderer::new()),
        )
    }

    /// Cria o pipeline injetando os três colaboradores.
    pub fn with_collaborators(
        recognizer: Box<dyn Recognizer>,
        matcher: Box<dyn Matcher>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            recognizer,
            matcher,
            renderer,
            policy: ConflictPolicy::default(),
        }
    }

    /// Define a política de resolução de conflitos entre modelo e padrões.
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executa uma análise completa sobre um texto.
    ///
    /// Texto vazio ou só de espaços **não é erro**: a análise curto-circuita
    /// para um relatório com todos os campos vazios, já que ausência de
    /// conteúdo não é condição excepcional.
    ///
    /// Falhas de colaborador são propagadas inalteradas, anotadas com o
    /// estágio; spans malformados ou sobrepostos dentro de uma mesma fonte
    /// falham a análise inteira na ingestão.
    pub fn analyze(
        &self,
        text: &str,
        patterns: &[EntityPattern],
    ) -> Result<AnalysisReport, AnalysisError> {
        if text.trim().is_empty() {
            debug!("texto vazio: curto-circuito para relatório vazio");
            return Ok(AnalysisReport::default());
        }

        let model_spans = self
            .recognizer
            .infer(text)
            .map_err(|source| AnalysisError::Collaborator {
                stage: Stage::Recognition,
                source,
            })?;
        validate_spans(text, &model_spans)?;
        debug!(spans = model_spans.len(), "reconhecimento concluído");

        let pattern_spans = self
            .matcher
            .find_matches(text, patterns)
            .map_err(|source| AnalysisError::Collaborator {
                stage: Stage::PatternMatching,
                source,
            })?;
        validate_spans(text, &pattern_spans)?;
        debug!(spans = pattern_spans.len(), "casamento de padrões concluído");

        let reconciled = reconcile(&model_spans, &pattern_spans, self.policy);
        debug_assert!(
            reconciled.windows(2).all(|w| w[0].end <= w[1].start),
            "sequência reconciliada deve ser livre de sobreposições"
        );
        debug!(spans = reconciled.len(), "reconciliação concluída");

        let all_entities = records(&reconciled);
        let entity_summary = summarize(&reconciled);

        let visualization_html = self
            .renderer
            .render(text, &reconciled)
            .map_err(|source| AnalysisError::Collaborator {
                stage: Stage::Rendering,
                source,
            })?;

        Ok(AnalysisReport {
            all_entities,
            entity_summary,
            visualization_html,
        })
    }

    /// Analisa um lote de textos independentes em paralelo.
    ///
    /// Cada texto é uma análise isolada (mesmos padrões, mesma política);
    /// os colaboradores são compartilhados somente para leitura (`Sync` é
    /// exigido pelas traits). A ordem dos resultados segue a dos textos.
    pub fn analyze_batch(
        &self,
        texts: &[&str],
        patterns: &[EntityPattern],
    ) -> Vec<Result<AnalysisReport, AnalysisError>> {
        texts
            .par_iter()
            .map(|text| self.analyze(text, patterns))
            .collect()
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}
