//! CLI do marcador: lê um arquivo de texto, roda a análise NER com padrões
//! customizados opcionais e grava a visualização HTML no caminho de saída.
//!
//! Código de saída 0 em sucesso; qualquer falha (arquivo ausente, codificação
//! inválida, erro de análise) termina com código diferente de zero e uma
//! mensagem nomeando o estágio que falhou.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use marcador_core::{AnalysisPipeline, ConflictPolicy, EntityPattern};

#[derive(Debug, Parser)]
#[command(
    name = "marcador",
    version,
    about = "Reconhecimento de Entidades Nomeadas com padrões customizados e visualização HTML"
)]
struct Cli {
    /// Arquivo de texto UTF-8 de entrada
    #[arg(long, short = 'i', value_name = "FILE")]
    input: PathBuf,

    /// Arquivo HTML de saída
    #[arg(long, short = 'o', value_name = "FILE")]
    output: PathBuf,

    /// Arquivo JSON de padrões: [{"label": "LANG", "surface_forms": ["Go", "Rust"]}]
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Política de conflito entre spans do modelo e dos padrões
    #[arg(long, value_enum, default_value_t = PolicyArg::PreferPattern)]
    policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    PreferPattern,
    PreferModel,
}

impl From<PolicyArg> for ConflictPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PreferPattern => ConflictPolicy::PreferPattern,
            PolicyArg::PreferModel => ConflictPolicy::PreferModel,
        }
    }
}

fn load_patterns(path: Option<&PathBuf>) -> Result<Vec<EntityPattern>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("falha ao ler o arquivo de padrões {}", path.display()))?;
            let patterns: Vec<EntityPattern> = serde_json::from_str(&raw)
                .with_context(|| format!("JSON de padrões inválido em {}", path.display()))?;
            Ok(patterns)
        }
        None => Ok(Vec::new()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("falha ao ler o arquivo de entrada {}", cli.input.display()))?;
    let patterns = load_patterns(cli.patterns.as_ref())?;

    let pipeline = AnalysisPipeline::new().with_policy(cli.policy.into());
    let report = pipeline
        .analyze(&text, &patterns)
        .context("a análise NER falhou")?;

    info!(
        "{} entidades encontradas, {} tipos distintos",
        report.all_entities.len(),
        report.entity_summary.len()
    );
    for count in &report.entity_summary {
        info!("  {}: {}", count.label, count.count);
    }
    for record in &report.all_entities {
        info!(
            "  [{:>4}..{:<4}] {} ({}, {})",
            record.start,
            record.end,
            record.text,
            record.label,
            record.source.name()
        );
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("falha ao criar o diretório {}", parent.display()))?;
        }
    }
    fs::write(&cli.output, report.visualization_html.as_bytes())
        .with_context(|| format!("falha ao escrever a saída em {}", cli.output.display()))?;
    info!("Visualização salva em {}", cli.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_patterns_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"label": "LANG", "surface_forms": ["Go", "Rust"]}}]"#
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let patterns = load_patterns(Some(&path)).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].label, "LANG");
        assert_eq!(patterns[0].surface_forms, vec!["Go", "Rust"]);
    }

    #[test]
    fn test_load_patterns_absent_is_empty() {
        assert!(load_patterns(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_patterns_bad_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "não é json").unwrap();
        let path = file.path().to_path_buf();
        assert!(load_patterns(Some(&path)).is_err());
    }
}
