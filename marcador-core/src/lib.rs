//! # marcador-core — Análise de Entidades Nomeadas com Reconciliação de Spans
//!
//! Este crate implementa um pipeline de Reconhecimento de Entidades Nomeadas
//! que combina duas fontes heterogêneas de anotação — um reconhecedor
//! estatístico e padrões de frase definidos pelo usuário — em uma única
//! sequência consistente de entidades, e a apresenta como tabela, sumário e
//! visualização HTML.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em um pipeline linear, das folhas para o resultado:
//!
//! 1. **Entrada**: Texto bruto imutável (String).
//! 2. **Colaboradores** ([`recognizer`], [`matcher`]): produzem, de forma
//!    independente, listas cruas de [`EntitySpan`] — o reconhecedor marca
//!    entidades previstas (`source = model`), o casador marca ocorrências
//!    literais dos padrões do usuário (`source = pattern`).
//! 3. **Reconciliação** ([`reconcile`](mod@reconcile)): funde as duas listas em uma sequência
//!    ordenada, determinística e livre de sobreposições, resolvendo conflitos
//!    pela [`ConflictPolicy`].
//! 4. **Agregação** ([`summary`]): tabela de registros + contagem por rótulo.
//! 5. **Apresentação** ([`render`]): HTML com as entidades destacadas inline.
//!
//! Os três colaboradores são traits injetadas no [`AnalysisPipeline`],
//! substituíveis por stubs em teste ou por backends reais em produção.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use marcador_core::{AnalysisPipeline, EntityPattern};
//!
//! let pipeline = AnalysisPipeline::new();
//! let patterns = vec![EntityPattern::new("LANG", &["Go", "Rust"])];
//!
//! let report = pipeline
//!     .analyze("Go and Rust are languages.", &patterns)
//!     .expect("análise");
//!
//! for record in &report.all_entities {
//!     println!("{} [{}..{}] → {}", record.text, record.start, record.end, record.label);
//! }
//! for count in &report.entity_summary {
//!     println!("{}: {}", count.label, count.count);
//! }
//! ```

pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod recognizer;
pub mod reconcile;
pub mod render;
pub mod span;
pub mod summary;
pub mod tokenizer;

pub use error::{AnalysisError, CollaboratorError, Stage};
pub use matcher::{EntityPattern, Matcher, PhraseMatcher};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use recognizer::{HeuristicRecognizer, Recognizer};
pub use reconcile::{reconcile, ConflictPolicy};
pub use render::{HtmlRenderer, Renderer};
pub use span::{validate_spans, EntitySpan, SpanSource};
pub use summary::{records, summarize, EntityRecord, LabelCount};
pub use tokenizer::{tokenize, Token};
